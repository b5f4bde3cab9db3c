use super::camera::{
	CameraAnimation, CameraMove, MAX_ZOOM, MIN_ZOOM, NOMINAL_CENTER_HEIGHT, ViewTransform,
	Viewport,
};
use super::controller::GraphEngine;
use super::types::{GraphNode, GraphScene, NodeRole};
use crate::error::GraphError;

pub const CENTER_RADIUS: f64 = NOMINAL_CENTER_HEIGHT / 2.0;
pub const NODE_RADIUS: f64 = 70.0;
/// Pointer travel, in screen pixels, after which a press counts as a drag.
pub const DRAG_THRESHOLD: f64 = 4.0;

pub fn node_radius(role: NodeRole) -> f64 {
	match role {
		NodeRole::Center => CENTER_RADIUS,
		_ => NODE_RADIUS,
	}
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Canvas-backed engine instance: one scene at preset positions plus the camera.
pub struct GraphCanvasState {
	pub scene: GraphScene,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub hover: Option<usize>,
	pub width: f64,
	pub height: f64,
	animation: Option<CameraAnimation>,
	destroyed: bool,
}

impl GraphCanvasState {
	pub fn new(scene: &GraphScene, viewport: Viewport) -> Result<Self, GraphError> {
		if viewport.is_empty() {
			return Err(GraphError::EmptySurface {
				width: viewport.width,
				height: viewport.height,
			});
		}
		Ok(Self {
			scene: scene.clone(),
			transform: ViewTransform {
				x: viewport.width / 2.0,
				y: viewport.height / 2.0,
				k: 1.0,
			},
			pan: PanState::default(),
			hover: None,
			width: viewport.width,
			height: viewport.height,
			animation: None,
			destroyed: false,
		})
	}

	pub fn is_destroyed(&self) -> bool {
		self.destroyed
	}

	#[cfg(test)]
	pub fn is_animating(&self) -> bool {
		self.animation.is_some()
	}

	/// Topmost node under a screen position.
	pub fn node_index_at(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.transform.screen_to_graph(sx, sy);
		let nodes = &self.scene.elements.nodes;
		self.scene
			.positions
			.iter()
			.zip(nodes)
			.enumerate()
			.rev()
			.find(|(_, (p, node))| {
				let (dx, dy) = (p.x - gx, p.y - gy);
				// radius is in graph units, so hits scale with zoom like the nodes do
				(dx * dx + dy * dy).sqrt() < node_radius(node.role)
			})
			.map(|(i, _)| i)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<&GraphNode> {
		self.node_index_at(sx, sy)
			.map(|i| &self.scene.elements.nodes[i])
	}

	pub fn set_hover(&mut self, idx: Option<usize>) {
		self.hover = idx;
	}

	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		self.animation = None;
		self.pan = PanState {
			active: true,
			moved: false,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn pan_to(&mut self, sx: f64, sy: f64) {
		if !self.pan.active {
			return;
		}
		let (dx, dy) = (sx - self.pan.start_x, sy - self.pan.start_y);
		// the camera stays put until the press becomes a drag
		if !self.pan.moved && (dx * dx + dy * dy).sqrt() <= DRAG_THRESHOLD {
			return;
		}
		self.pan.moved = true;
		self.transform.x = self.pan.transform_start_x + dx;
		self.transform.y = self.pan.transform_start_y + dy;
	}

	/// Ends a pan; returns whether the pointer travelled far enough to be a drag.
	pub fn end_pan(&mut self) -> bool {
		let moved = self.pan.active && self.pan.moved;
		self.pan = PanState::default();
		moved
	}

	/// Wheel zoom keeping the graph point under the cursor fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, delta_y: f64) {
		self.animation = None;
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Advances the camera animation; returns whether one is still running.
	pub fn tick(&mut self, dt_ms: f64) -> bool {
		let Some(animation) = self.animation.as_mut() else {
			return false;
		};
		self.transform = animation.advance(dt_ms);
		if animation.is_finished() {
			self.animation = None;
		}
		self.animation.is_some()
	}

	fn viewport_size(&self) -> Viewport {
		Viewport::new(self.width, self.height)
	}
}

impl GraphEngine for GraphCanvasState {
	fn fit(&mut self, padding: f64) {
		self.animation = None;
		self.transform = ViewTransform::fit(
			&self.scene.positions,
			CENTER_RADIUS,
			self.viewport_size(),
			padding,
		);
	}

	fn zoom(&self) -> f64 {
		self.transform.k
	}

	fn viewport(&self) -> Viewport {
		self.viewport_size()
	}

	fn animate(&mut self, camera: CameraMove) {
		self.animation = Some(CameraAnimation::new(
			self.transform,
			&camera,
			self.viewport_size(),
		));
	}

	fn resize(&mut self, viewport: Viewport) {
		if viewport.is_empty() {
			return;
		}
		self.width = viewport.width;
		self.height = viewport.height;
	}

	fn destroy(&mut self) {
		self.animation = None;
		self.pan = PanState::default();
		self.hover = None;
		self.scene = GraphScene::default();
		self.destroyed = true;
	}
}
