use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::relation::Category;
use super::state::{GraphCanvasState, node_radius};
use super::types::{GraphEdge, NodeRole, Point};

const BACKGROUND: &str = "#07020b";
const LABEL_LINE_HEIGHT: f64 = 18.0;
const ARROW_SIZE: f64 = 14.0;

pub fn rarity_color(rarity: Option<&str>) -> &'static str {
	match rarity.map(str::to_ascii_lowercase).as_deref() {
		Some("uncommon") => "#22c55e",
		Some("rare") => "#3b82f6",
		Some("epic") => "#a855f7",
		Some("legendary") => "#f59e0b",
		_ => "#6b7280",
	}
}

/// Control point of an edge bent perpendicular to its chord by `curvature` graph units.
pub fn control_point(from: Point, to: Point, curvature: f64) -> Point {
	let (dx, dy) = (to.x - from.x, to.y - from.y);
	let dist = (dx * dx + dy * dy).sqrt().max(f64::EPSILON);
	Point {
		x: (from.x + to.x) / 2.0 - dy / dist * curvature,
		y: (from.y + to.y) / 2.0 + dx / dist * curvature,
	}
}

pub fn render(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	for edge in &state.scene.elements.edges {
		draw_edge(state, edge, ctx);
	}
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edge(state: &GraphCanvasState, edge: &GraphEdge, ctx: &CanvasRenderingContext2d) {
	let (Some(from), Some(to)) = (
		state.scene.position_of(&edge.source),
		state.scene.position_of(&edge.target),
	) else {
		return;
	};
	let lead = edge.relation_tags.first();
	let color = lead.map(Category::color).unwrap_or("#9ca3af");
	let control = control_point(from, to, edge.curvature);

	// Trim both ends to the node rims.
	let source_radius = radius_of(state, &edge.source);
	let target_radius = radius_of(state, &edge.target);
	let start = toward(from, control, source_radius);
	let tip = toward(to, control, target_radius);

	ctx.set_stroke_style_str(color);
	ctx.set_line_width(3.0);
	if lead == Some(&Category::SoldBy) {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(12.0),
			&JsValue::from_f64(6.0),
		));
	}
	ctx.begin_path();
	ctx.move_to(start.x, start.y);
	ctx.quadratic_curve_to(control.x, control.y, tip.x, tip.y);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	let (ux, uy) = unit(control, tip);
	let (back_x, back_y) = (tip.x - ux * ARROW_SIZE, tip.y - uy * ARROW_SIZE);
	let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
	ctx.set_fill_style_str(color);
	ctx.begin_path();
	ctx.move_to(tip.x, tip.y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();

	// Label sits on the curve's midpoint.
	let mid = Point {
		x: 0.25 * from.x + 0.5 * control.x + 0.25 * to.x,
		y: 0.25 * from.y + 0.5 * control.y + 0.25 * to.y,
	};
	let lines: Vec<&str> = edge.label.lines().collect();
	let top = mid.y - (lines.len().saturating_sub(1)) as f64 * LABEL_LINE_HEIGHT / 2.0;
	ctx.set_font("600 14px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	for (i, line) in lines.iter().enumerate() {
		let y = top + i as f64 * LABEL_LINE_HEIGHT;
		ctx.set_fill_style_str("rgba(7, 2, 11, 0.8)");
		let width = line.chars().count() as f64 * 7.5 + 10.0;
		ctx.fill_rect(mid.x - width / 2.0, y - LABEL_LINE_HEIGHT / 2.0, width, LABEL_LINE_HEIGHT);
		ctx.set_fill_style_str(color);
		let _ = ctx.fill_text(line, mid.x, y);
	}
}

fn draw_nodes(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
	let nodes = &state.scene.elements.nodes;
	for (i, (node, p)) in nodes.iter().zip(&state.scene.positions).enumerate() {
		let radius = node_radius(node.role);
		let hovered = state.hover == Some(i);
		let fill = rarity_color(node.rarity.as_deref());

		if hovered {
			let glow = radius * 1.2;
			ctx.begin_path();
			let _ = ctx.arc(p.x, p.y, glow, 0.0, 2.0 * PI);
			ctx.set_fill_style_str("rgba(200, 220, 255, 0.15)");
			ctx.fill();
		}

		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
		ctx.set_global_alpha(0.35);
		ctx.set_fill_style_str(fill);
		ctx.fill();
		ctx.set_global_alpha(1.0);
		ctx.set_stroke_style_str(match node.role {
			NodeRole::Center => "#c084fc",
			_ => fill,
		});
		ctx.set_line_width(if node.role == NodeRole::Center { 6.0 } else { 3.0 });
		ctx.stroke();

		let font_px = if node.role == NodeRole::Center { 26.0 } else { 18.0 };
		ctx.set_font(&format!("bold {font_px}px sans-serif"));
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		ctx.set_fill_style_str("white");
		let _ = ctx.fill_text(&node.label, p.x, p.y);
	}
}

fn radius_of(state: &GraphCanvasState, id: &str) -> f64 {
	state
		.scene
		.elements
		.node(id)
		.map(|n| node_radius(n.role))
		.unwrap_or(0.0)
}

fn unit(from: Point, to: Point) -> (f64, f64) {
	let (dx, dy) = (to.x - from.x, to.y - from.y);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return (0.0, 0.0);
	}
	(dx / dist, dy / dist)
}

fn toward(p: Point, target: Point, distance: f64) -> Point {
	let (ux, uy) = unit(p, target);
	Point {
		x: p.x + ux * distance,
		y: p.y + uy * distance,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rarity_colors_ignore_case() {
		assert_eq!(rarity_color(Some("Rare")), rarity_color(Some("rare")));
		assert_eq!(rarity_color(None), rarity_color(Some("Common")));
		assert_ne!(rarity_color(Some("Legendary")), rarity_color(None));
	}

	#[test]
	fn control_point_bends_perpendicular() {
		let from = Point { x: 250.0, y: 400.0 };
		let to = Point { x: 700.0, y: 400.0 };
		assert_eq!(control_point(from, to, 0.0), Point { x: 475.0, y: 400.0 });
		assert_eq!(control_point(from, to, 90.0), Point { x: 475.0, y: 490.0 });
		assert_eq!(control_point(from, to, -90.0), Point { x: 475.0, y: 310.0 });
	}
}
