use super::index::RelationIndex;
use super::relation::{EdgeFilter, format_label};
use super::types::{
	Direction, Edge, GraphEdge, GraphElements, GraphNode, Group, NodeKind, NodeRole,
	RelationRecord,
};
use crate::i18n::Translate;

/// Bend applied to fanned-out edges, in graph units.
pub const CURVATURE: f64 = 90.0;

pub fn center_id(name: &str) -> String {
	format!("center-{name}")
}

fn side_id(role: NodeRole, name: &str) -> String {
	match role {
		NodeRole::Input => format!("left-{name}"),
		_ => format!("right-{name}"),
	}
}

/// Turns the focal record into one center node plus one node and one
/// aggregate edge per visible counterpart on each side.
pub fn build_elements(
	focal: &RelationRecord,
	index: &RelationIndex,
	filter: &EdgeFilter,
	tr: &dyn Translate,
) -> GraphElements {
	let center = center_id(&focal.name);
	let mut elements = GraphElements::default();
	elements.nodes.push(GraphNode {
		id: center.clone(),
		label: tr.translate_item(&focal.name),
		role: NodeRole::Center,
		node_kind: focal.node_kind.clone(),
		rarity: focal.rarity.clone(),
		image_ref: focal.image_ref.clone(),
		counterpart: None,
	});

	let visible = focal
		.edges
		.iter()
		.filter(|e| filter.is_visible(&e.relation));
	let (inputs, outputs): (Vec<&Edge>, Vec<&Edge>) =
		visible.partition(|e| e.direction == Direction::In);

	let input_groups = sorted_groups(inputs);
	let output_groups = sorted_groups(outputs);

	for (role, groups) in [
		(NodeRole::Input, &input_groups),
		(NodeRole::Output, &output_groups),
	] {
		let count = groups.len();
		for (i, group) in groups.iter().enumerate() {
			let id = side_id(role, &group.counterpart);
			let related = index.get(&group.counterpart);
			elements.nodes.push(GraphNode {
				id: id.clone(),
				label: tr.translate_item(&group.counterpart),
				role,
				node_kind: related.map(|r| r.node_kind.clone()).unwrap_or(NodeKind::Item),
				rarity: related.and_then(|r| r.rarity.clone()),
				image_ref: related.and_then(|r| r.image_ref.clone()),
				counterpart: Some(group.counterpart.clone()),
			});

			let label = group
				.edges
				.iter()
				.map(|e| format_label(e, tr))
				.collect::<Vec<_>>()
				.join("\n");
			let mut relation_tags = Vec::new();
			for edge in &group.edges {
				if !relation_tags.contains(&edge.relation) {
					relation_tags.push(edge.relation.clone());
				}
			}
			let (source, target) = match role {
				NodeRole::Input => (id, center.clone()),
				_ => (center.clone(), id),
			};
			elements.edges.push(GraphEdge {
				source,
				target,
				label,
				relation_tags,
				curvature: curvature(role, i, count),
			});
		}
	}

	elements.input_groups = input_groups;
	elements.output_groups = output_groups;
	elements
}

// Groups keep first-appearance order until sorted; both sorts are stable.
fn sorted_groups(edges: Vec<&Edge>) -> Vec<Group> {
	let mut groups: Vec<Group> = Vec::new();
	for edge in edges {
		match groups.iter_mut().find(|g| g.counterpart == edge.counterpart) {
			Some(group) => group.edges.push(edge.clone()),
			None => groups.push(Group {
				counterpart: edge.counterpart.clone(),
				edges: vec![edge.clone()],
			}),
		}
	}
	for group in &mut groups {
		group.edges.sort_by_key(|e| e.relation.priority());
	}
	groups.sort_by_key(|g| g.edges[0].relation.priority());
	groups
}

/// Fans edges out symmetrically: the first half bends one way, the second half
/// the other, and the middle of an odd count stays straight. Outputs mirror inputs.
pub fn curvature(role: NodeRole, index: usize, count: usize) -> f64 {
	let half = count / 2;
	let bend = if count % 2 == 0 {
		if index < half { -CURVATURE } else { CURVATURE }
	} else if index < half {
		-CURVATURE
	} else if index > half {
		CURVATURE
	} else {
		0.0
	};
	match role {
		NodeRole::Output => -bend,
		_ => bend,
	}
}
