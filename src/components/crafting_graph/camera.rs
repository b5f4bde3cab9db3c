use super::types::Point;

pub const FOCUS_DURATION_MS: f64 = 1300.0;
/// Height the center node is drawn at, in graph units.
pub const NOMINAL_CENTER_HEIGHT: f64 = 250.0;
/// Share of the viewport height the center node should fill after focusing.
pub const TARGET_SCREEN_SHARE: f64 = 0.22;
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
	EaseOutCubic,
}

impl Easing {
	pub fn apply(self, t: f64) -> f64 {
		match self {
			Self::EaseOutCubic => ease_out_cubic(t.clamp(0.0, 1.0)),
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	pub fn is_empty(&self) -> bool {
		self.width <= 0.0 || self.height <= 0.0
	}
}

/// Screen = graph * k + (x, y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Transform placing `center` in the middle of the viewport at zoom `k`.
	pub fn centered_on(center: Point, k: f64, viewport: Viewport) -> Self {
		Self {
			x: viewport.width / 2.0 - center.x * k,
			y: viewport.height / 2.0 - center.y * k,
			k,
		}
	}

	/// Fits every point, grown by `extent` on each side, inside the viewport minus `padding`.
	pub fn fit(points: &[Point], extent: f64, viewport: Viewport, padding: f64) -> Self {
		if points.is_empty() {
			return Self::centered_on(Point::default(), 1.0, viewport);
		}
		let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
		let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
		for p in points {
			min_x = min_x.min(p.x - extent);
			min_y = min_y.min(p.y - extent);
			max_x = max_x.max(p.x + extent);
			max_y = max_y.max(p.y + extent);
		}
		let (bw, bh) = ((max_x - min_x).max(1.0), (max_y - min_y).max(1.0));
		let (aw, ah) = (
			(viewport.width - 2.0 * padding).max(1.0),
			(viewport.height - 2.0 * padding).max(1.0),
		);
		let k = (aw / bw).min(ah / bh).clamp(MIN_ZOOM, MAX_ZOOM);
		let center = Point {
			x: (min_x + max_x) / 2.0,
			y: (min_y + max_y) / 2.0,
		};
		Self::centered_on(center, k, viewport)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	pub fn lerp(&self, to: &Self, t: f64) -> Self {
		Self {
			x: self.x + (to.x - self.x) * t,
			y: self.y + (to.y - self.y) * t,
			k: self.k + (to.k - self.k) * t,
		}
	}
}

/// A requested camera transition, independent of any drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraMove {
	pub zoom: f64,
	pub center: Point,
	pub duration_ms: f64,
	pub easing: Easing,
}

/// Chooses the focus transition after a rebuild.
///
/// When the fitted graph leaves the center node well under its target size the
/// camera zooms in; otherwise it eases out a little so sparse graphs still settle.
pub fn plan_focus(current_zoom: f64, viewport_height: f64, center: Point) -> CameraMove {
	let target_zoom = viewport_height * TARGET_SCREEN_SHARE / NOMINAL_CENTER_HEIGHT;
	let zoom = if current_zoom < target_zoom * 0.8 {
		(current_zoom * 1.5).max(target_zoom)
	} else {
		current_zoom * 0.85
	};
	CameraMove {
		zoom,
		center,
		duration_ms: FOCUS_DURATION_MS,
		easing: Easing::EaseOutCubic,
	}
}

/// An in-flight transition between two transforms.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraAnimation {
	from: ViewTransform,
	to: ViewTransform,
	duration_ms: f64,
	elapsed_ms: f64,
	easing: Easing,
}

impl CameraAnimation {
	pub fn new(from: ViewTransform, camera: &CameraMove, viewport: Viewport) -> Self {
		Self {
			from,
			to: ViewTransform::centered_on(camera.center, camera.zoom, viewport),
			duration_ms: camera.duration_ms,
			elapsed_ms: 0.0,
			easing: camera.easing,
		}
	}

	#[cfg(test)]
	pub fn target(&self) -> ViewTransform {
		self.to
	}

	pub fn advance(&mut self, dt_ms: f64) -> ViewTransform {
		self.elapsed_ms = (self.elapsed_ms + dt_ms).min(self.duration_ms);
		if self.is_finished() {
			return self.to;
		}
		let t = self.easing.apply(self.elapsed_ms / self.duration_ms);
		self.from.lerp(&self.to, t)
	}

	pub fn is_finished(&self) -> bool {
		self.elapsed_ms >= self.duration_ms
	}
}
