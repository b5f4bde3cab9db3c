use std::sync::Arc;

use leptos::prelude::*;

use super::relation::{Category, EdgeFilter};
use crate::i18n::{Translate, Translations};

const INACTIVE_STYLE: &str = "border-color: rgba(139, 92, 246, 0.2); color: #9ca3af;";

/// Floating panel toggling which relation categories are drawn.
#[component]
pub fn FilterPanel(filter: RwSignal<EdgeFilter>, #[prop(into)] on_close: Callback<()>) -> impl IntoView {
	let i18n = expect_context::<Arc<Translations>>();

	let toggles = Category::FILTERABLE
		.into_iter()
		.map(|category| {
			let label = i18n.relation_label(&category);
			let color = category.color();
			let shown = category.clone();
			let style = move || {
				if filter.with(|f| f.contains(&shown)) {
					format!("border-color: {color}; color: {color};")
				} else {
					INACTIVE_STYLE.to_string()
				}
			};
			view! {
				<button
					class="filter-panel__toggle"
					style=style
					on:click=move |_| filter.update(|f| *f = f.toggled(&category))
				>
					{label}
				</button>
			}
		})
		.collect_view();

	view! {
		<div class="filter-panel">
			<div class="filter-panel__header">
				<h2>{i18n.translate("filter.title")}</h2>
				<button class="filter-panel__close" on:click=move |_| on_close.run(())>
					"✕"
				</button>
			</div>
			<div class="filter-panel__grid">{toggles}</div>
			<div class="filter-panel__actions">
				<button on:click=move |_| filter.set(EdgeFilter::all())>
					{i18n.translate("filter.all")}
				</button>
				<button on:click=move |_| filter.set(EdgeFilter::none())>
					{i18n.translate("filter.none")}
				</button>
			</div>
		</div>
	}
}
