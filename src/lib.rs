//! Leptos client-side chat that asks a hosted model for a Russian reply and
//! draws the word/role graph that comes back with it.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info, warn};

// Modules
pub mod ai;
pub mod chat;
mod components;
pub mod config;
mod pages;

pub use components::force_graph::{SyntaxGraph, SyntaxLink, SyntaxNode};

// Top-Level pages
use crate::ai::{GeminiClient, SharedGenerator};
use crate::config::ClientConfig;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the chat page and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	let config = ClientConfig::from_env();
	if config.api_key().is_none() {
		warn!("no API_KEY at build time; every request will fail");
	}
	let generator: SharedGenerator = Arc::new(GeminiClient::new(config));

	view! {
		<Html attr:lang="ru" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Syntactic-Ru AI" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route
					path=path!("/")
					view=move || view! { <Home generator=generator.clone() /> }
				/>
			</Routes>
		</Router>
	}
}
