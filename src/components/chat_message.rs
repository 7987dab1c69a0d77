use leptos::prelude::*;

use crate::chat::Message;
use crate::components::force_graph::ForceGraphCanvas;

const GRAPH_WIDTH: f64 = 300.0;
const GRAPH_HEIGHT: f64 = 200.0;

/// One chat bubble, with the word graph under AI replies that have one.
#[component]
pub fn ChatMessage(message: Message) -> impl IntoView {
	let is_ai = message.is_ai();
	let row_class = format!("message-row message-row--{}", message.role.as_str());
	let graph = message.visible_graph().cloned();
	let time = message.local_time();

	view! {
		<div class=row_class>
			<div class="avatar">{if is_ai { "AI" } else { "Вы" }}</div>
			<div class="message-body">
				<div class="bubble">
					<p class="bubble-text">{message.content}</p>
				</div>
				{graph
					.map(|graph| {
						view! {
							<div class="analysis">
								<div class="analysis-header">
									<span>"Syntactic Analysis"</span>
									<div class="analysis-rule"></div>
								</div>
								<ForceGraphCanvas
									data=Signal::stored(graph)
									width=GRAPH_WIDTH
									height=GRAPH_HEIGHT
								/>
								<p class="analysis-note">
									"*Visualizing vector flow and grammatical weights"
								</p>
							</div>
						}
					})}
				<span class="timestamp">{time}</span>
			</div>
		</div>
	}
}
