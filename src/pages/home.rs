use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_query_map};
use log::debug;

use crate::components::crafting_graph::CraftingGraph;
use crate::deep_link::{DEFAULT_ITEM, FILTERS_PARAM, GRAPH_PARAM, GraphLink};
use crate::i18n::{Translate, Translations};

/// Default Home Page
///
/// The graph opens straight away when the page is loaded from a `?graph=` link.
#[component]
pub fn Home() -> impl IntoView {
	let i18n = expect_context::<Arc<Translations>>();
	let query = use_query_map();
	let navigate = use_navigate();

	let initial = query.with_untracked(|q| GraphLink::from_params(q.get(GRAPH_PARAM), q.get(FILTERS_PARAM)));
	let open = RwSignal::new(initial.item.is_some());
	let focal = RwSignal::new(initial.item.unwrap_or_else(|| DEFAULT_ITEM.to_string()));
	let filter = RwSignal::new(initial.filter);

	// Keep the address bar bookmarkable.
	Effect::new(move |_| {
		let link = if open.get() {
			GraphLink::open(&focal.get(), filter.get())
		} else {
			GraphLink::default()
		};
		let href = link.to_href();
		debug!("syncing location to {href}");
		navigate(
			&href,
			NavigateOptions {
				replace: true,
				..Default::default()
			},
		);
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<main class="home">
				<h1>{i18n.translate("item.craftingGraph")}</h1>
				<p class="subtitle">
					"Tap an item to follow it. Drag to pan. Scroll to zoom. Escape closes the graph."
				</p>
				<button class="home__open" on:click=move |_| open.set(true)>
					{i18n.translate("nav.craftingGraph")}
				</button>
			</main>
			<Show when=move || open.get()>
				<div class="fullscreen-graph">
					<CraftingGraph
						focal=focal
						filter=filter
						on_close=Callback::new(move |_| open.set(false))
						fullscreen=true
					/>
				</div>
			</Show>
		</ErrorBoundary>
	}
}
