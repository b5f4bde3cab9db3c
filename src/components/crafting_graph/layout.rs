use super::types::{GraphElements, GraphNode, GraphScene, Group, NodeRole, Point};

pub const INPUT_X: f64 = 250.0;
pub const CENTER_X: f64 = 700.0;
pub const OUTPUT_X: f64 = 1150.0;
pub const CENTER_Y: f64 = 400.0;
pub const SPACING: f64 = 180.0;

/// Preset coordinate of a node: three columns, each side centred vertically on the focal item.
///
/// The row comes from the node's group index, so the result only depends on group order.
pub fn position(node: &GraphNode, input_groups: &[Group], output_groups: &[Group]) -> Point {
	let (x, groups) = match node.role {
		NodeRole::Center => {
			return Point {
				x: CENTER_X,
				y: CENTER_Y,
			};
		}
		NodeRole::Input => (INPUT_X, input_groups),
		NodeRole::Output => (OUTPUT_X, output_groups),
	};
	let row = node
		.counterpart
		.as_deref()
		.and_then(|name| groups.iter().position(|g| g.counterpart == name))
		.unwrap_or(0);
	let count = groups.len().max(1);
	let start = CENTER_Y - (count - 1) as f64 * SPACING / 2.0;
	Point {
		x,
		y: start + row as f64 * SPACING,
	}
}

/// Positions every node and packages the result for a rendering engine.
pub fn layout(elements: GraphElements) -> GraphScene {
	let positions = elements
		.nodes
		.iter()
		.map(|n| position(n, &elements.input_groups, &elements.output_groups))
		.collect();
	GraphScene {
		elements,
		positions,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::crafting_graph::builder::build_elements;
	use crate::components::crafting_graph::index::RelationIndex;
	use crate::components::crafting_graph::relation::EdgeFilter;
	use crate::components::crafting_graph::types::{Direction, Edge, RelationRecord};
	use crate::i18n::Canonical;

	fn fan(inputs: usize, outputs: usize) -> GraphElements {
		let mut edges = Vec::new();
		for i in 0..inputs {
			edges.push(Edge::new("craft_from", &format!("In {i}"), Direction::In));
		}
		for i in 0..outputs {
			edges.push(Edge::new("recycle_to", &format!("Out {i}"), Direction::Out));
		}
		let focal = RelationRecord::new("Hub", edges);
		build_elements(&focal, &RelationIndex::default(), &EdgeFilter::Any, &Canonical)
	}

	#[test]
	fn center_is_fixed() {
		let scene = layout(fan(0, 0));
		assert_eq!(scene.positions, vec![Point { x: 700.0, y: 400.0 }]);
	}

	#[test]
	fn sides_are_centred_on_the_focal_item() {
		let scene = layout(fan(3, 2));
		let ys: Vec<(f64, f64)> = scene.positions.iter().map(|p| (p.x, p.y)).collect();
		assert_eq!(
			ys,
			vec![
				(700.0, 400.0),
				(250.0, 220.0),
				(250.0, 400.0),
				(250.0, 580.0),
				(1150.0, 310.0),
				(1150.0, 490.0),
			]
		);
	}

	#[test]
	fn position_is_pure() {
		let elements = fan(4, 5);
		for node in &elements.nodes {
			let a = position(node, &elements.input_groups, &elements.output_groups);
			let b = position(node, &elements.input_groups, &elements.output_groups);
			assert_eq!(a.x.to_bits(), b.x.to_bits());
			assert_eq!(a.y.to_bits(), b.y.to_bits());
		}
	}

	#[test]
	fn scene_lookup_by_id() {
		let scene = layout(fan(1, 1));
		assert_eq!(
			scene.position_of("right-Out 0"),
			Some(Point { x: 1150.0, y: 400.0 })
		);
		assert_eq!(scene.position_of("left-Missing"), None);
	}
}
