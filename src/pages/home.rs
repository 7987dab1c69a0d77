use leptos::prelude::*;
use log::debug;
use wasm_bindgen_futures::spawn_local;
use web_sys::KeyboardEvent;

use crate::ai::SharedGenerator;
use crate::chat::{Conversation, exchange};
use crate::components::chat_message::ChatMessage;

/// The chat page: message log, thinking indicator and input row.
#[component]
pub fn Home(generator: SharedGenerator) -> impl IntoView {
	let conversation = RwSignal::new(Conversation::with_greeting());
	let input = RwSignal::new(String::new());
	let log_end = NodeRef::<leptos::html::Div>::new();

	let thinking = move || conversation.with(Conversation::is_thinking);
	let can_send = move || input.with(|text| conversation.with(|c| c.can_submit(text)));

	Effect::new(move |_| {
		conversation.track();
		if let Some(end) = log_end.get() {
			end.scroll_into_view();
		}
	});

	let send = move || {
		let text = input.get_untracked();
		let Some(turn) = conversation.try_update(|c| c.submit(&text)).flatten() else {
			return;
		};
		input.set(String::new());

		let generator = generator.clone();
		spawn_local(async move {
			let outcome = exchange(generator.as_ref(), &turn).await;
			if conversation
				.try_update(|c| c.resolve(turn, outcome))
				.is_none()
			{
				debug!("chat view gone before the reply arrived");
			}
		});
	};

	let send_on_enter = send.clone();
	let on_keydown = move |ev: KeyboardEvent| {
		if ev.key() == "Enter" && !ev.shift_key() {
			ev.prevent_default();
			send_on_enter();
		}
	};

	view! {
		<div class="chat-app">
			<header class="chat-header">
				<div class="brand">
					<h1>"Syntactic-Ru " <span class="accent">"AI"</span></h1>
					<p class="status-line">
						<span class="pulse"></span>
						"Mathematical Core Active"
					</p>
				</div>
				<div class="header-meta">
					<span>"MODEL: VECTOR-FLOW-V1"</span>
					<span>"LANG: RU-NATIVE"</span>
				</div>
			</header>

			<main class="chat-log">
				<div class="chat-column">
					<For
						each=move || conversation.with(|c| c.messages().to_vec())
						key=|message| message.id
						children=move |message| view! { <ChatMessage message=message /> }
					/>
					<Show when=thinking>
						<div class="thinking">"Computing vector weights..."</div>
					</Show>
					<div node_ref=log_end></div>
				</div>
			</main>

			<footer class="chat-input">
				<div class="input-row">
					<input
						type="text"
						placeholder="Введите запрос для анализа..."
						prop:value=move || input.get()
						on:input=move |ev| input.set(event_target_value(&ev))
						on:keydown=on_keydown
						disabled=thinking
					/>
					<button class="send" on:click=move |_| send() disabled=move || !can_send()>
						"Отправить"
					</button>
				</div>
				<p class="hint">
					"Система обучается на лету. Ввод только на русском языке для корректной работы математической модели."
				</p>
			</footer>
		</div>
	}
}
