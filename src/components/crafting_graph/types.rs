use serde::Deserialize;

use super::relation::Category;

/// Which side of the focal item a counterpart renders on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
	In,
	#[serde(other)]
	Out,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum NodeKind {
	#[default]
	Item,
	Other(String),
}

impl From<String> for NodeKind {
	fn from(kind: String) -> Self {
		if kind == "item" {
			Self::Item
		} else {
			Self::Other(kind)
		}
	}
}

/// Extra requirement attached to an edge, e.g. the trader's asking price.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Dependency {
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(default)]
	pub amount: Option<f64>,
	#[serde(default)]
	pub currency: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Edge {
	pub relation: Category,
	#[serde(rename = "name")]
	pub counterpart: String,
	pub direction: Direction,
	#[serde(default)]
	pub quantity: Option<u32>,
	#[serde(default)]
	pub input_level: Option<String>,
	#[serde(default)]
	pub output_level: Option<String>,
	#[serde(default)]
	pub dependency: Vec<Dependency>,
}

impl Edge {
	#[cfg(test)]
	pub fn new(relation: &str, counterpart: &str, direction: Direction) -> Self {
		Self {
			relation: Category::from(relation),
			counterpart: counterpart.to_string(),
			direction,
			quantity: None,
			input_level: None,
			output_level: None,
			dependency: Vec::new(),
		}
	}

	pub fn price(&self) -> Option<&Dependency> {
		self.dependency.iter().find(|d| d.kind == "price")
	}
}

/// One row of the relation table. Loaded once, never mutated.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "RecordRow")]
pub struct RelationRecord {
	pub name: String,
	pub node_kind: NodeKind,
	pub rarity: Option<String>,
	pub image_ref: Option<String>,
	pub edges: Vec<Edge>,
}

#[cfg(test)]
impl RelationRecord {
	pub fn new(name: &str, edges: Vec<Edge>) -> Self {
		Self {
			name: name.to_string(),
			node_kind: NodeKind::Item,
			rarity: None,
			image_ref: None,
			edges,
		}
	}
}

// Shape of a record in the data file.
#[derive(Deserialize)]
struct RecordRow {
	name: String,
	#[serde(default)]
	node_type: Option<NodeKind>,
	#[serde(default)]
	infobox: Option<InfoboxRow>,
	#[serde(default)]
	image_urls: Option<ImageRow>,
	#[serde(default)]
	edges: Vec<Edge>,
}

#[derive(Deserialize)]
struct InfoboxRow {
	#[serde(default)]
	rarity: Option<String>,
}

#[derive(Deserialize)]
struct ImageRow {
	#[serde(default)]
	thumb: Option<String>,
}

impl From<RecordRow> for RelationRecord {
	fn from(row: RecordRow) -> Self {
		Self {
			name: row.name,
			node_kind: row.node_type.unwrap_or_default(),
			rarity: row.infobox.and_then(|i| i.rarity),
			image_ref: row.image_urls.and_then(|i| i.thumb),
			edges: row.edges,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeRole {
	Center,
	Input,
	Output,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub label: String,
	pub role: NodeRole,
	pub node_kind: NodeKind,
	pub rarity: Option<String>,
	pub image_ref: Option<String>,
	/// Canonical item name to navigate to; `None` on the center node.
	pub counterpart: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphEdge {
	pub source: String,
	pub target: String,
	/// One line per contributing raw edge.
	pub label: String,
	pub relation_tags: Vec<Category>,
	pub curvature: f64,
}

/// All raw edges between the focal item and one counterpart on one side.
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
	pub counterpart: String,
	pub edges: Vec<Edge>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphElements {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
	pub input_groups: Vec<Group>,
	pub output_groups: Vec<Group>,
}

impl GraphElements {
	#[cfg(test)]
	pub fn center(&self) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.role == NodeRole::Center)
	}

	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

/// Elements plus their preset coordinates; `positions[i]` belongs to `elements.nodes[i]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphScene {
	pub elements: GraphElements,
	pub positions: Vec<Point>,
}

impl GraphScene {
	pub fn position_of(&self, id: &str) -> Option<Point> {
		self.elements
			.nodes
			.iter()
			.position(|n| n.id == id)
			.and_then(|i| self.positions.get(i).copied())
	}
}
