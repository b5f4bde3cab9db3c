//! Leptos client-side app wiring and routes.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, error, info, warn};

// Modules
mod components;
mod data;
mod deep_link;
mod error;
mod i18n;
mod pages;

// Top-Level pages
use crate::components::crafting_graph::RelationIndex;
use crate::i18n::Translations;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

fn load_index() -> RelationIndex {
	match RelationIndex::from_json(data::RELATIONS) {
		Ok(index) if index.is_empty() => {
			warn!("relation table is empty, every item will be missing");
			index
		}
		Ok(index) => {
			info!("loaded {} relation records", index.len());
			index
		}
		Err(e) => {
			error!("relation table unusable, every item will be missing: {e}");
			RelationIndex::default()
		}
	}
}

fn load_translations() -> Translations {
	Translations::from_json(data::TRANSLATIONS_EN).unwrap_or_else(|e| {
		error!("translation table unusable, showing canonical labels: {e}");
		Translations::default()
	})
}

/// An app router which renders the crafting graph and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();
	let translations = load_translations();
	let lang = match translations.language.as_str() {
		"" => "en".to_string(),
		language => language.to_string(),
	};
	provide_context(Arc::new(load_index()));
	provide_context(Arc::new(translations));

	view! {
		<Html attr:lang=lang attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Crafting Graph" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
