use std::sync::Arc;

use log::{debug, error, info, warn};

use super::builder::build_elements;
use super::camera::{CameraMove, Viewport, plan_focus};
use super::index::RelationIndex;
use super::layout::layout;
use super::relation::EdgeFilter;
use super::types::{GraphScene, NodeRole};
use crate::error::GraphError;
use crate::i18n::Translate;

pub const INITIAL_FIT_PADDING: f64 = 150.0;
pub const RESIZE_FIT_PADDING: f64 = 120.0;
pub const RESIZE_DEBOUNCE_MS: f64 = 150.0;

/// One live rendering engine instance bound to a single scene.
pub trait GraphEngine {
	fn fit(&mut self, padding: f64);
	fn zoom(&self) -> f64;
	fn viewport(&self) -> Viewport;
	fn animate(&mut self, camera: CameraMove);
	fn resize(&mut self, viewport: Viewport);
	fn destroy(&mut self);
}

/// Builds engine instances against whatever surface the host provides.
pub trait EngineFactory {
	type Engine: GraphEngine;

	fn create(&mut self, scene: &GraphScene) -> Result<Self::Engine, GraphError>;
}

/// Cancel-and-reschedule timer: only the last resize inside the window fires.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResizeDebounce {
	due_at: Option<f64>,
	viewport: Viewport,
}

impl ResizeDebounce {
	pub fn schedule(&mut self, viewport: Viewport, now_ms: f64) {
		self.viewport = viewport;
		self.due_at = Some(now_ms + RESIZE_DEBOUNCE_MS);
	}

	pub fn take_due(&mut self, now_ms: f64) -> Option<Viewport> {
		match self.due_at {
			Some(due) if now_ms >= due => {
				self.due_at = None;
				Some(self.viewport)
			}
			_ => None,
		}
	}

	pub fn cancel(&mut self) {
		self.due_at = None;
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum FocalView {
	Pending,
	Ready(GraphScene),
	/// The focal item has no relation record; nothing is drawn.
	NotFound,
	/// The engine could not be constructed; nothing is drawn.
	Failed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
	pub focal: String,
	pub filter: EdgeFilter,
	pub last_animated: Option<String>,
	pub view: FocalView,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum NavState {
	#[default]
	Closed,
	Open(Session),
}

/// Result of a host or user action on the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
	Rendered { animated: bool },
	NotFound,
	EngineFailed,
	Unchanged,
	/// The action is not valid in the current state and was ignored.
	Rejected,
}

/// What the host should show around the canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphStatus {
	Closed,
	Ready,
	NotFound(String),
	Failed,
}

/// Walks the relation graph one focal item at a time and owns the engine bound to it.
pub struct NavigationController<F: EngineFactory> {
	index: Arc<RelationIndex>,
	translator: Arc<dyn Translate + Send + Sync>,
	factory: F,
	state: NavState,
	engine: Option<F::Engine>,
	resize: ResizeDebounce,
	on_navigate: Option<Box<dyn FnMut(&str)>>,
}

impl<F: EngineFactory> NavigationController<F> {
	pub fn new(
		index: Arc<RelationIndex>,
		translator: Arc<dyn Translate + Send + Sync>,
		factory: F,
	) -> Self {
		Self {
			index,
			translator,
			factory,
			state: NavState::Closed,
			engine: None,
			resize: ResizeDebounce::default(),
			on_navigate: None,
		}
	}

	/// Called with the new focal item whenever an in-graph tap moves focus.
	pub fn on_navigate(mut self, callback: impl FnMut(&str) + 'static) -> Self {
		self.on_navigate = Some(Box::new(callback));
		self
	}

	#[cfg(test)]
	pub fn state(&self) -> &NavState {
		&self.state
	}

	pub fn is_open(&self) -> bool {
		matches!(self.state, NavState::Open(_))
	}

	fn session(&self) -> Option<&Session> {
		match &self.state {
			NavState::Open(session) => Some(session),
			NavState::Closed => None,
		}
	}

	pub fn focal(&self) -> Option<&str> {
		self.session().map(|s| s.focal.as_str())
	}

	pub fn filter(&self) -> Option<&EdgeFilter> {
		self.session().map(|s| &s.filter)
	}

	#[cfg(test)]
	pub fn last_animated(&self) -> Option<&str> {
		self.session().and_then(|s| s.last_animated.as_deref())
	}

	pub fn scene(&self) -> Option<&GraphScene> {
		match self.session().map(|s| &s.view) {
			Some(FocalView::Ready(scene)) => Some(scene),
			_ => None,
		}
	}

	#[cfg(test)]
	pub fn engine(&self) -> Option<&F::Engine> {
		self.engine.as_ref()
	}

	pub fn engine_mut(&mut self) -> Option<&mut F::Engine> {
		self.engine.as_mut()
	}

	pub fn status(&self) -> GraphStatus {
		match self.session() {
			None => GraphStatus::Closed,
			Some(Session {
				view: FocalView::NotFound,
				focal,
				..
			}) => GraphStatus::NotFound(focal.clone()),
			Some(Session {
				view: FocalView::Failed,
				..
			}) => GraphStatus::Failed,
			Some(_) => GraphStatus::Ready,
		}
	}

	/// Opens with every category selected.
	pub fn open(&mut self, item: &str) -> Transition {
		self.open_with(item, EdgeFilter::all())
	}

	/// Opens a fresh session; an already open one is discarded first.
	pub fn open_with(&mut self, item: &str, filter: EdgeFilter) -> Transition {
		if self.is_open() {
			self.teardown();
		}
		info!("opening crafting graph for {item:?}");
		self.state = NavState::Open(Session {
			focal: item.to_string(),
			filter,
			last_animated: None,
			view: FocalView::Pending,
		});
		self.rebuild()
	}

	/// Host-driven focus change. Opens when closed; the current focal item is a no-op
	/// unless its engine failed, in which case the build is retried.
	pub fn navigate_to(&mut self, item: &str) -> Transition {
		let NavState::Open(session) = &mut self.state else {
			return self.open(item);
		};
		if session.focal == item && session.view != FocalView::Failed {
			return Transition::Unchanged;
		}
		info!("navigating to {item:?}");
		session.focal = item.to_string();
		self.rebuild()
	}

	/// Moves focus to a counterpart picked inside the graph and notifies the host.
	pub fn select_counterpart(&mut self, name: &str) -> Transition {
		let NavState::Open(session) = &mut self.state else {
			debug!("ignoring counterpart selection while closed");
			return Transition::Rejected;
		};
		let changed = session.focal != name;
		session.focal = name.to_string();
		info!("selected counterpart {name:?}");
		let outcome = self.rebuild();
		if changed {
			if let Some(callback) = self.on_navigate.as_mut() {
				callback(name);
			}
		}
		outcome
	}

	/// Dispatches a tap on a rendered node; the center node ignores taps.
	pub fn tap_node(&mut self, id: &str) -> Transition {
		let target = self
			.scene()
			.and_then(|scene| scene.elements.node(id))
			.filter(|node| node.role != NodeRole::Center)
			.and_then(|node| node.counterpart.clone());
		match target {
			Some(name) => self.select_counterpart(&name),
			None => Transition::Unchanged,
		}
	}

	/// Replaces the filter and always rebuilds from scratch.
	pub fn set_filter(&mut self, filter: EdgeFilter) -> Transition {
		let NavState::Open(session) = &mut self.state else {
			debug!("ignoring filter change while closed");
			return Transition::Rejected;
		};
		session.filter = filter;
		self.rebuild()
	}

	pub fn close(&mut self) {
		if self.is_open() {
			info!("closing crafting graph");
		}
		self.teardown();
		self.state = NavState::Closed;
	}

	/// Schedules a re-fit of the current engine; the latest viewport within the window wins.
	pub fn resize(&mut self, viewport: Viewport, now_ms: f64) -> bool {
		if !self.is_open() {
			debug!("ignoring resize while closed");
			return false;
		}
		self.resize.schedule(viewport, now_ms);
		true
	}

	/// Fires a due resize. Returns whether the engine was re-fitted.
	pub fn tick(&mut self, now_ms: f64) -> bool {
		let Some(viewport) = self.resize.take_due(now_ms) else {
			return false;
		};
		match self.engine.as_mut() {
			Some(engine) => {
				debug!("re-fitting graph to {}x{}", viewport.width, viewport.height);
				engine.resize(viewport);
				engine.fit(RESIZE_FIT_PADDING);
				true
			}
			None => false,
		}
	}

	// The previous engine is gone before the next one exists.
	fn teardown(&mut self) {
		self.resize.cancel();
		if let Some(mut engine) = self.engine.take() {
			engine.destroy();
		}
	}

	fn rebuild(&mut self) -> Transition {
		self.teardown();
		let NavState::Open(session) = &mut self.state else {
			return Transition::Rejected;
		};
		let Some(record) = self.index.get(&session.focal) else {
			warn!("no relation record for {:?}", session.focal);
			session.view = FocalView::NotFound;
			return Transition::NotFound;
		};

		let elements = build_elements(
			record,
			&self.index,
			&session.filter,
			self.translator.as_ref(),
		);
		let scene = layout(elements);
		debug!(
			"rebuilt {:?}: {} nodes, {} edges",
			session.focal,
			scene.elements.nodes.len(),
			scene.elements.edges.len()
		);

		let mut engine = match self.factory.create(&scene) {
			Ok(engine) => engine,
			Err(err) => {
				error!("failed to construct graph engine: {err}");
				session.view = FocalView::Failed;
				return Transition::EngineFailed;
			}
		};
		engine.fit(INITIAL_FIT_PADDING);

		let animated = session.last_animated.as_deref() != Some(session.focal.as_str());
		if animated {
			session.last_animated = Some(session.focal.clone());
			let center = scene.positions.first().copied().unwrap_or_default();
			let camera = plan_focus(engine.zoom(), engine.viewport().height, center);
			engine.animate(camera);
		}

		session.view = FocalView::Ready(scene);
		self.engine = Some(engine);
		Transition::Rendered { animated }
	}
}

impl<F: EngineFactory> Drop for NavigationController<F> {
	fn drop(&mut self) {
		self.teardown();
	}
}

#[cfg(test)]
mod tests {
	use std::cell::{Cell, RefCell};
	use std::rc::Rc;

	use super::*;
	use crate::components::crafting_graph::relation::Category;
	use crate::components::crafting_graph::types::{Dependency, Direction, Edge, RelationRecord};
	use crate::i18n::Canonical;

	type Log = Rc<RefCell<Vec<String>>>;

	struct FakeEngine {
		log: Log,
		viewport: Viewport,
		zoom: f64,
	}

	impl GraphEngine for FakeEngine {
		fn fit(&mut self, padding: f64) {
			self.log.borrow_mut().push(format!("fit {padding}"));
		}

		fn zoom(&self) -> f64 {
			self.zoom
		}

		fn viewport(&self) -> Viewport {
			self.viewport
		}

		fn animate(&mut self, camera: CameraMove) {
			self.zoom = camera.zoom;
			self.log
				.borrow_mut()
				.push(format!("animate {:.3} {}", camera.zoom, camera.duration_ms));
		}

		fn resize(&mut self, viewport: Viewport) {
			self.viewport = viewport;
			self.log
				.borrow_mut()
				.push(format!("resize {}x{}", viewport.width, viewport.height));
		}

		fn destroy(&mut self) {
			self.log.borrow_mut().push("destroy".into());
		}
	}

	#[derive(Default)]
	struct FakeFactory {
		log: Log,
		broken: Rc<Cell<bool>>,
	}

	impl EngineFactory for FakeFactory {
		type Engine = FakeEngine;

		fn create(&mut self, scene: &GraphScene) -> Result<FakeEngine, GraphError> {
			if self.broken.get() {
				return Err(GraphError::EmptySurface {
					width: 0.0,
					height: 0.0,
				});
			}
			let center = scene.elements.center().map(|n| n.id.clone()).unwrap_or_default();
			self.log.borrow_mut().push(format!("create {center}"));
			Ok(FakeEngine {
				log: self.log.clone(),
				viewport: Viewport::new(1000.0, 800.0),
				zoom: 0.5,
			})
		}
	}

	fn index() -> Arc<RelationIndex> {
		let mut craft = Edge::new("craft_from", "Scrap Metal", Direction::In);
		craft.quantity = Some(3);
		let mut sold = Edge::new("sold_by", "Trader Jin", Direction::Out);
		sold.dependency = vec![Dependency {
			kind: "price".into(),
			amount: Some(120.0),
			currency: Some("coins".into()),
		}];
		Arc::new(RelationIndex::new(vec![
			RelationRecord::new(
				"Power Rod",
				vec![
					craft,
					Edge::new("repair_from", "Scrap Metal", Direction::In),
					sold,
				],
			),
			RelationRecord::new(
				"Scrap Metal",
				vec![Edge::new("craft_to", "Power Rod", Direction::Out)],
			),
			RelationRecord::new("Trader Jin", Vec::new()),
		]))
	}

	fn controller() -> (NavigationController<FakeFactory>, Log, Rc<Cell<bool>>) {
		let factory = FakeFactory::default();
		let (log, broken) = (factory.log.clone(), factory.broken.clone());
		let nav = NavigationController::new(index(), Arc::new(Canonical), factory);
		(nav, log, broken)
	}

	fn drain(log: &Log) -> Vec<String> {
		log.borrow_mut().drain(..).collect()
	}

	#[test]
	fn open_builds_fits_and_animates() {
		let (mut nav, log, _) = controller();
		assert_eq!(nav.status(), GraphStatus::Closed);

		assert_eq!(nav.open("Power Rod"), Transition::Rendered { animated: true });
		assert_eq!(nav.last_animated(), Some("Power Rod"));
		assert_eq!(nav.filter(), Some(&EdgeFilter::all()));
		assert_eq!(nav.status(), GraphStatus::Ready);
		// target zoom 800 * 0.22 / 250 = 0.704, fit zoom 0.5 is below 80% of it
		assert_eq!(
			drain(&log),
			vec!["create center-Power Rod", "fit 150", "animate 0.750 1300"]
		);

		let scene = nav.scene().unwrap();
		assert_eq!(scene.elements.nodes.len(), 3);
		assert_eq!(scene.elements.edges[0].label, "craft (3x)\nrepair");
	}

	#[test]
	fn filter_change_rebuilds_without_animating() {
		let (mut nav, log, _) = controller();
		nav.open("Power Rod");
		drain(&log);

		let trade_only = EdgeFilter::Only([Category::SoldBy].into_iter().collect());
		assert_eq!(
			nav.set_filter(trade_only.clone()),
			Transition::Rendered { animated: false }
		);
		assert_eq!(drain(&log), vec!["destroy", "create center-Power Rod", "fit 150"]);
		assert_eq!(nav.focal(), Some("Power Rod"));
		assert_eq!(nav.filter(), Some(&trade_only));

		let ids: Vec<&str> = nav
			.scene()
			.unwrap()
			.elements
			.nodes
			.iter()
			.map(|n| n.id.as_str())
			.collect();
		assert_eq!(ids, vec!["center-Power Rod", "right-Trader Jin"]);

		assert_eq!(nav.set_filter(EdgeFilter::none()), Transition::Rendered { animated: false });
		assert_eq!(nav.scene().unwrap().elements.nodes.len(), 1);
	}

	#[test]
	fn each_new_focal_item_animates_once() {
		let (nav, log, _) = controller();
		let visited = Rc::new(RefCell::new(Vec::new()));
		let sink = visited.clone();
		let mut nav = nav.on_navigate(move |name| sink.borrow_mut().push(name.to_string()));

		nav.open("Power Rod");
		assert_eq!(
			nav.tap_node("left-Scrap Metal"),
			Transition::Rendered { animated: true }
		);
		assert_eq!(nav.focal(), Some("Scrap Metal"));
		assert_eq!(nav.last_animated(), Some("Scrap Metal"));

		assert_eq!(
			nav.set_filter(EdgeFilter::Any),
			Transition::Rendered { animated: false }
		);
		assert_eq!(
			nav.select_counterpart("Power Rod"),
			Transition::Rendered { animated: true }
		);
		assert_eq!(*visited.borrow(), vec!["Scrap Metal", "Power Rod"]);

		let animations = drain(&log).iter().filter(|l| l.starts_with("animate")).count();
		assert_eq!(animations, 3);
	}

	#[test]
	fn tapping_the_center_does_nothing() {
		let (mut nav, log, _) = controller();
		nav.open("Power Rod");
		drain(&log);
		assert_eq!(nav.tap_node("center-Power Rod"), Transition::Unchanged);
		assert_eq!(nav.tap_node("left-Nowhere"), Transition::Unchanged);
		assert!(drain(&log).is_empty());
	}

	#[test]
	fn host_navigation_to_current_item_is_a_no_op() {
		let (mut nav, log, _) = controller();
		assert_eq!(nav.navigate_to("Power Rod"), Transition::Rendered { animated: true });
		drain(&log);
		assert_eq!(nav.navigate_to("Power Rod"), Transition::Unchanged);
		assert!(drain(&log).is_empty());
		assert_eq!(nav.navigate_to("Trader Jin"), Transition::Rendered { animated: true });
	}

	#[test]
	fn missing_item_renders_not_found() {
		let (mut nav, log, _) = controller();
		nav.open("Power Rod");
		drain(&log);

		assert_eq!(nav.navigate_to("Ghost Part"), Transition::NotFound);
		assert_eq!(drain(&log), vec!["destroy"]);
		assert!(nav.engine().is_none());
		assert!(nav.scene().is_none());
		assert_eq!(nav.status(), GraphStatus::NotFound("Ghost Part".into()));
		assert_eq!(nav.last_animated(), Some("Power Rod"));

		assert_eq!(nav.navigate_to("Power Rod"), Transition::Rendered { animated: false });
	}

	#[test]
	fn engine_failure_keeps_no_engine() {
		let (mut nav, log, broken) = controller();
		broken.set(true);
		assert_eq!(nav.open("Power Rod"), Transition::EngineFailed);
		assert!(nav.engine().is_none());
		assert_eq!(nav.status(), GraphStatus::Failed);
		assert_eq!(nav.last_animated(), None);
		assert!(drain(&log).is_empty());

		broken.set(false);
		assert_eq!(
			nav.set_filter(EdgeFilter::all()),
			Transition::Rendered { animated: true }
		);
		assert!(nav.engine().is_some());
	}

	#[test]
	fn failed_focal_item_can_be_retried() {
		let (mut nav, log, broken) = controller();
		broken.set(true);
		assert_eq!(nav.open("Power Rod"), Transition::EngineFailed);
		assert_eq!(nav.navigate_to("Power Rod"), Transition::EngineFailed);

		broken.set(false);
		assert_eq!(
			nav.navigate_to("Power Rod"),
			Transition::Rendered { animated: true }
		);
		assert_eq!(nav.status(), GraphStatus::Ready);
		assert_eq!(
			drain(&log),
			vec!["create center-Power Rod", "fit 150", "animate 0.750 1300"]
		);
		assert_eq!(nav.navigate_to("Power Rod"), Transition::Unchanged);
	}

	#[test]
	fn resize_is_debounced_latest_wins() {
		let (mut nav, log, _) = controller();
		nav.open("Power Rod");
		drain(&log);

		assert!(nav.resize(Viewport::new(900.0, 700.0), 0.0));
		assert!(nav.resize(Viewport::new(640.0, 480.0), 100.0));
		assert!(!nav.tick(200.0));
		assert!(nav.tick(250.0));
		assert!(!nav.tick(400.0));

		assert_eq!(drain(&log), vec!["resize 640x480", "fit 120"]);
		assert_eq!(nav.last_animated(), Some("Power Rod"));
		assert_eq!(nav.focal(), Some("Power Rod"));
	}

	#[test]
	fn rebuild_cancels_pending_resize() {
		let (mut nav, log, _) = controller();
		nav.open("Power Rod");
		nav.resize(Viewport::new(640.0, 480.0), 0.0);
		nav.set_filter(EdgeFilter::Any);
		drain(&log);
		assert!(!nav.tick(1000.0));
		assert!(drain(&log).is_empty());
	}

	#[test]
	fn closed_controller_rejects_actions() {
		let (mut nav, log, _) = controller();
		assert_eq!(nav.set_filter(EdgeFilter::none()), Transition::Rejected);
		assert_eq!(nav.select_counterpart("Power Rod"), Transition::Rejected);
		assert!(!nav.resize(Viewport::new(10.0, 10.0), 0.0));
		assert!(drain(&log).is_empty());
	}

	#[test]
	fn close_and_reopen_resets_animation_memo() {
		let (mut nav, log, _) = controller();
		nav.open("Power Rod");
		nav.close();
		assert_eq!(nav.state(), &NavState::Closed);
		assert!(nav.engine().is_none());
		assert_eq!(drain(&log).last().map(String::as_str), Some("destroy"));

		assert_eq!(nav.open("Power Rod"), Transition::Rendered { animated: true });
	}

	#[test]
	fn dropping_the_controller_destroys_the_engine() {
		let (mut nav, log, _) = controller();
		nav.open("Power Rod");
		drain(&log);
		drop(nav);
		assert_eq!(drain(&log), vec!["destroy"]);
	}
}
