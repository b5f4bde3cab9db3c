use std::sync::Arc;

use leptos::prelude::*;

use super::index::RelationIndex;
use crate::i18n::{Translate, Translations};

/// Search box jumping the graph to any item by canonical or translated name.
#[component]
pub fn QuickSearch(#[prop(into)] on_select: Callback<String>) -> impl IntoView {
	let index = expect_context::<Arc<RelationIndex>>();
	let i18n = expect_context::<Arc<Translations>>();
	let query = RwSignal::new(String::new());
	let focused = RwSignal::new(false);

	let placeholder = i18n.translate("search.placeholder");
	let no_results = i18n.translate("search.noResults");
	let search_tr = i18n.clone();
	let results = Memo::new(move |_| {
		query.with(|q| {
			index
				.search(q, search_tr.as_ref())
				.into_iter()
				.map(String::from)
				.collect::<Vec<_>>()
		})
	});

	let dropdown = move || {
		if !focused.get() || query.with(|q| q.trim().is_empty()) {
			return None;
		}
		let hits = results.get();
		if hits.is_empty() {
			return Some(
				view! { <div class="quick-search__empty">{no_results.clone()}</div> }.into_any(),
			);
		}
		let rows = hits
			.into_iter()
			.map(|name| {
				let label = i18n.translate_item(&name);
				view! {
					<li>
						// mousedown fires before the input loses focus
						<button on:mousedown=move |_| {
							on_select.run(name.clone());
							query.set(String::new());
							focused.set(false);
						}>{label}</button>
					</li>
				}
			})
			.collect_view();
		Some(view! { <ul class="quick-search__results">{rows}</ul> }.into_any())
	};

	view! {
		<div class="quick-search">
			<input
				type="text"
				class="quick-search__input"
				placeholder=placeholder
				prop:value=move || query.get()
				on:input=move |ev| query.set(event_target_value(&ev))
				on:focus=move |_| focused.set(true)
				on:blur=move |_| focused.set(false)
			/>
			{dropdown}
		</div>
	}
}
