use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use leptos::prelude::*;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent, Window,
};

use super::camera::Viewport;
use super::controller::{EngineFactory, GraphStatus, NavigationController, Transition};
use super::index::RelationIndex;
use super::relation::EdgeFilter;
use super::render;
use super::search::QuickSearch;
use super::settings::FilterPanel;
use super::state::GraphCanvasState;
use super::types::GraphScene;
use crate::deep_link::{DEFAULT_ITEM, GraphLink};
use crate::error::GraphError;
use crate::i18n::{Translate, Translations};

type CanvasRef = NodeRef<leptos::html::Canvas>;
type Controller = Rc<RefCell<NavigationController<CanvasSurface>>>;
type FrameLoop = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Window hooks of one mounted graph. Dropping this detaches all of them.
struct WindowBindings {
	window: Window,
	frame: Rc<Cell<Option<i32>>>,
	animate: FrameLoop,
	on_resize: Closure<dyn FnMut()>,
	on_keydown: Closure<dyn FnMut(KeyboardEvent)>,
}

impl WindowBindings {
	fn attach(
		window: Window,
		frame: Rc<Cell<Option<i32>>>,
		animate: FrameLoop,
		on_resize: Closure<dyn FnMut()>,
		on_keydown: Closure<dyn FnMut(KeyboardEvent)>,
	) -> Self {
		let _ = window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
		let _ =
			window.add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref());
		if let Some(cb) = animate.borrow().as_ref() {
			frame.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
		Self {
			window,
			frame,
			animate,
			on_resize,
			on_keydown,
		}
	}
}

impl Drop for WindowBindings {
	fn drop(&mut self) {
		if let Some(id) = self.frame.take() {
			let _ = self.window.cancel_animation_frame(id);
		}
		let _ = self
			.window
			.remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref());
		let _ = self
			.window
			.remove_event_listener_with_callback("keydown", self.on_keydown.as_ref().unchecked_ref());
		// the frame closure holds its own cell; emptying it frees the controller
		let frame_loop = self.animate.borrow_mut().take();
		drop(frame_loop);
	}
}

/// Builds canvas engines sized to the canvas container (or the window when fullscreen).
struct CanvasSurface {
	canvas: CanvasRef,
	fullscreen: bool,
}

impl EngineFactory for CanvasSurface {
	type Engine = GraphCanvasState;

	fn create(&mut self, scene: &GraphScene) -> Result<GraphCanvasState, GraphError> {
		let canvas = self
			.canvas
			.get_untracked()
			.ok_or(GraphError::DetachedSurface)?;
		let viewport = measure(&canvas, self.fullscreen)?;
		canvas.set_width(viewport.width as u32);
		canvas.set_height(viewport.height as u32);
		GraphCanvasState::new(scene, viewport)
	}
}

fn measure(canvas: &HtmlCanvasElement, fullscreen: bool) -> Result<Viewport, GraphError> {
	if fullscreen {
		let window = web_sys::window().ok_or(GraphError::DetachedSurface)?;
		let size = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
		return Ok(Viewport::new(
			size(window.inner_width()),
			size(window.inner_height()),
		));
	}
	let parent = canvas.parent_element().ok_or(GraphError::DetachedSurface)?;
	Ok(Viewport::new(
		parent.client_width() as f64,
		parent.client_height() as f64,
	))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, GraphError> {
	canvas
		.get_context("2d")
		.ok()
		.flatten()
		.and_then(|ctx| ctx.dyn_into().ok())
		.ok_or(GraphError::Context)
}

fn now_ms() -> f64 {
	web_sys::window()
		.and_then(|w| w.performance())
		.map(|p| p.now())
		.unwrap_or(0.0)
}

fn pointer(ev: &MouseEvent, canvas: CanvasRef) -> Option<(f64, f64)> {
	let canvas = canvas.get_untracked()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// The crafting graph view: canvas, search, filters and the not-found state.
///
/// `focal` and `filter` are the host's deep-link state; in-graph navigation writes back to `focal`.
#[component]
pub fn CraftingGraph(
	focal: RwSignal<String>,
	filter: RwSignal<EdgeFilter>,
	#[prop(into)] on_close: Callback<()>,
	#[prop(default = false)] fullscreen: bool,
) -> impl IntoView {
	let index = expect_context::<Arc<RelationIndex>>();
	let i18n = expect_context::<Arc<Translations>>();
	let canvas_ref = CanvasRef::new();
	let status = RwSignal::new(GraphStatus::Closed);
	let settings_open = RwSignal::new(false);

	let surface = CanvasSurface {
		canvas: canvas_ref,
		fullscreen,
	};
	let controller: Controller = Rc::new(RefCell::new(
		NavigationController::new(index, i18n.clone(), surface)
			.on_navigate(move |name| focal.set(name.to_string())),
	));

	// Focus and filter changes from the host.
	let nav_sync = controller.clone();
	Effect::new(move |_| {
		let item = focal.get();
		let edge_filter = filter.get();
		if canvas_ref.get().is_none() {
			return;
		}
		let mut nav = nav_sync.borrow_mut();
		let outcome = if !nav.is_open() {
			nav.open_with(&item, edge_filter)
		} else {
			// filter first so a simultaneous focus change still animates
			let mut outcome = Transition::Unchanged;
			if nav.filter() != Some(&edge_filter) {
				outcome = nav.set_filter(edge_filter);
			}
			match nav.navigate_to(&item) {
				Transition::Unchanged => outcome,
				moved => moved,
			}
		};
		debug!("graph sync for {:?}: {outcome:?}", nav.focal());
		status.set(nav.status());
	});

	// Render loop.
	let frame = Rc::new(Cell::new(None::<i32>));
	let animate: FrameLoop = Rc::new(RefCell::new(None));
	let (nav_anim, animate_inner, frame_inner) = (controller.clone(), animate.clone(), frame.clone());
	let last_frame = Rc::new(Cell::new(None::<f64>));
	*animate.borrow_mut() = Some(Closure::new(move || {
		let mut nav = nav_anim.borrow_mut();
		let now = now_ms();
		let dt = now - last_frame.replace(Some(now)).unwrap_or(now);
		nav.tick(now);
		let engine = nav.engine_mut().filter(|e| !e.is_destroyed());
		if let (Some(engine), Some(canvas)) = (engine, canvas_ref.get_untracked()) {
			engine.tick(dt);
			if canvas.width() != engine.width as u32 || canvas.height() != engine.height as u32 {
				canvas.set_width(engine.width as u32);
				canvas.set_height(engine.height as u32);
			}
			if let Ok(ctx) = context_2d(&canvas) {
				render::render(engine, &ctx);
			}
		}
		drop(nav);
		if let (Some(cb), Some(window)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
			frame_inner.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
	}));

	let nav_resize = controller.clone();
	let on_resize = Closure::<dyn FnMut()>::new(move || {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		if let Ok(viewport) = measure(&canvas, fullscreen) {
			nav_resize.borrow_mut().resize(viewport, now_ms());
		}
	});
	let on_keydown = Closure::<dyn FnMut(KeyboardEvent)>::new(move |ev: KeyboardEvent| {
		if ev.key() == "Escape" {
			on_close.run(());
		}
	});

	// Window hooks go away with the view.
	let bindings = web_sys::window().map(|window| {
		WindowBindings::attach(window, frame, animate, on_resize, on_keydown)
	});
	let bindings = StoredValue::new_local(bindings);
	on_cleanup(move || {
		bindings.try_update_value(|bindings| {
			bindings.take();
		});
	});

	let nav_md = controller.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(&ev, canvas_ref) else {
			return;
		};
		if let Some(engine) = nav_md.borrow_mut().engine_mut() {
			engine.begin_pan(x, y);
		}
	};

	let nav_mm = controller.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(&ev, canvas_ref) else {
			return;
		};
		if let Some(engine) = nav_mm.borrow_mut().engine_mut() {
			if engine.pan.active {
				engine.pan_to(x, y);
			} else {
				let hovered = engine.node_index_at(x, y);
				engine.set_hover(hovered);
			}
		}
	};

	let nav_mu = controller.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(&ev, canvas_ref) else {
			return;
		};
		let tapped = {
			let mut nav = nav_mu.borrow_mut();
			let Some(engine) = nav.engine_mut() else {
				return;
			};
			if engine.end_pan() {
				None
			} else {
				engine.node_at_position(x, y).map(|n| n.id.clone())
			}
		};
		if let Some(id) = tapped {
			let mut nav = nav_mu.borrow_mut();
			let outcome = nav.tap_node(&id);
			debug!("tap on {id:?}: {outcome:?}, focus {:?}", nav.focal());
			status.set(nav.status());
		}
	};

	let nav_ml = controller.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(engine) = nav_ml.borrow_mut().engine_mut() {
			engine.end_pan();
			engine.set_hover(None);
		}
	};

	let nav_wh = controller.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(&ev, canvas_ref) else {
			return;
		};
		if let Some(engine) = nav_wh.borrow_mut().engine_mut() {
			engine.zoom_at(x, y, ev.delta_y());
		}
	};

	let nav_close = controller;
	let close = move |_| {
		nav_close.borrow_mut().close();
		on_close.run(());
	};

	let title_tr = i18n.clone();
	let title = move || {
		format!(
			"{}: {}",
			title_tr.translate("item.craftingGraph"),
			title_tr.translate_item(&focal.get())
		)
	};
	let overlay_tr = i18n.clone();
	let overlay = move || match status.get() {
		GraphStatus::NotFound(name) => Some(
			view! {
				<div class="crafting-graph__overlay">
					<p class="crafting-graph__overlay-title">
						{overlay_tr.translate("error.itemNotFound")}
					</p>
					<p>{format!("\"{name}\" {}", overlay_tr.translate("error.couldNotBeFound"))}</p>
					<a
						href=GraphLink::open(DEFAULT_ITEM, filter.get_untracked()).to_href()
						on:click=move |ev| {
							ev.prevent_default();
							focal.set(DEFAULT_ITEM.to_string());
						}
					>
						{overlay_tr.translate("error.goToPowerRod")}
					</a>
				</div>
			}
			.into_any(),
		),
		GraphStatus::Failed => Some(
			view! {
				<div class="crafting-graph__overlay">
					<p>{overlay_tr.translate("error.graphUnavailable")}</p>
				</div>
			}
			.into_any(),
		),
		_ => None,
	};

	view! {
		<div class="crafting-graph">
			<header class="crafting-graph__header">
				<h2>{title}</h2>
				<button
					class="crafting-graph__close"
					aria-label=i18n.translate("buttons.close")
					on:click=close
				>
					"✕"
				</button>
			</header>
			<div class="crafting-graph__body">
				<canvas
					node_ref=canvas_ref
					class="crafting-graph__canvas"
					on:mousedown=on_mousedown
					on:mousemove=on_mousemove
					on:mouseup=on_mouseup
					on:mouseleave=on_mouseleave
					on:wheel=on_wheel
					style="display: block; cursor: grab;"
				/>
				<div class="crafting-graph__search">
					<QuickSearch on_select=Callback::new(move |name: String| focal.set(name)) />
				</div>
				<button
					class="crafting-graph__settings-toggle"
					aria-label=i18n.translate("buttons.openRelationFilters")
					on:click=move |_| settings_open.update(|open| *open = !*open)
				>
					"⚙"
				</button>
				<Show when=move || settings_open.get()>
					<FilterPanel filter=filter on_close=Callback::new(move |_| settings_open.set(false)) />
				</Show>
				{overlay}
			</div>
		</div>
	}
}
