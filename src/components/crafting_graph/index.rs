use std::collections::HashMap;

use super::types::RelationRecord;
use crate::error::GraphError;
use crate::i18n::Translate;

/// Maximum number of quick-search suggestions.
pub const SEARCH_LIMIT: usize = 10;

/// Name-keyed lookup over the relation table. Built once at start-up.
#[derive(Clone, Debug, Default)]
pub struct RelationIndex {
	records: Vec<RelationRecord>,
	by_name: HashMap<String, usize>,
}

impl RelationIndex {
	/// Later duplicates of a name replace earlier ones in the lookup.
	pub fn new(records: Vec<RelationRecord>) -> Self {
		let by_name = records
			.iter()
			.enumerate()
			.map(|(i, r)| (r.name.clone(), i))
			.collect();
		Self { records, by_name }
	}

	pub fn from_json(raw: &str) -> Result<Self, GraphError> {
		let records: Vec<RelationRecord> = serde_json::from_str(raw)?;
		Ok(Self::new(records))
	}

	pub fn get(&self, name: &str) -> Option<&RelationRecord> {
		self.by_name.get(name).map(|&i| &self.records[i])
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Case-insensitive substring match on canonical or translated names, in table order.
	pub fn search(&self, query: &str, tr: &dyn Translate) -> Vec<&str> {
		let query = query.trim().to_lowercase();
		if query.is_empty() {
			return Vec::new();
		}
		self.records
			.iter()
			.map(|r| r.name.as_str())
			.filter(|name| {
				name.to_lowercase().contains(&query)
					|| tr.translate_item(name).to_lowercase().contains(&query)
			})
			.take(SEARCH_LIMIT)
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::crafting_graph::relation::Category;
	use crate::components::crafting_graph::types::{Direction, NodeKind};
	use crate::i18n::{Canonical, Translations};

	const TABLE: &str = r#"[
		{
			"name": "Power Rod",
			"wiki_url": "https://example.invalid/Power_Rod",
			"infobox": { "rarity": "Rare" },
			"image_urls": { "thumb": "https://example.invalid/power_rod.png" },
			"edges": [
				{ "relation": "craft_from", "name": "Scrap Metal", "direction": "in", "quantity": 3 },
				{ "relation": "sold_by", "name": "Trader Jin", "direction": "out",
				  "dependency": [{ "type": "price", "amount": 120, "currency": "coins" }] }
			]
		},
		{ "name": "Scrap Metal", "edges": [] },
		{ "name": "Trader Jin", "node_type": "trader", "edges": [] }
	]"#;

	#[test]
	fn parses_data_file_rows() {
		let index = RelationIndex::from_json(TABLE).unwrap();
		assert_eq!(index.len(), 3);

		let rod = index.get("Power Rod").unwrap();
		assert_eq!(rod.rarity.as_deref(), Some("Rare"));
		assert_eq!(
			rod.image_ref.as_deref(),
			Some("https://example.invalid/power_rod.png")
		);
		assert_eq!(rod.node_kind, NodeKind::Item);
		assert_eq!(rod.edges[0].relation, Category::Craft);
		assert_eq!(rod.edges[0].direction, Direction::In);
		assert_eq!(rod.edges[0].quantity, Some(3));
		assert_eq!(rod.edges[1].price().and_then(|p| p.amount), Some(120.0));

		let jin = index.get("Trader Jin").unwrap();
		assert_eq!(jin.node_kind, NodeKind::Other("trader".into()));
		assert!(index.get("Nope").is_none());
	}

	#[test]
	fn unknown_direction_counts_as_output() {
		let raw = r#"[{ "name": "A", "edges": [{ "relation": "x", "name": "B", "direction": "sideways" }] }]"#;
		let index = RelationIndex::from_json(raw).unwrap();
		assert_eq!(index.get("A").unwrap().edges[0].direction, Direction::Out);
	}

	#[test]
	fn malformed_table_is_an_error() {
		assert!(matches!(
			RelationIndex::from_json("{\"name\": 1}"),
			Err(GraphError::Data(_))
		));
	}

	#[test]
	fn search_matches_translated_names() {
		let index = RelationIndex::from_json(TABLE).unwrap();
		assert_eq!(index.search("  ", &Canonical), Vec::<&str>::new());
		assert_eq!(index.search("ROD", &Canonical), vec!["Power Rod"]);

		let tr = Translations::from_json(r#"{ "items": { "Scrap Metal": "Altmetall" } }"#).unwrap();
		assert_eq!(index.search("altm", &tr), vec!["Scrap Metal"]);
	}

	#[test]
	fn search_is_capped() {
		let records = (0..25)
			.map(|i| RelationRecord::new(&format!("Part {i}"), Vec::new()))
			.collect();
		let index = RelationIndex::new(records);
		let hits = index.search("part", &Canonical);
		assert_eq!(hits.len(), SEARCH_LIMIT);
		assert_eq!(hits[0], "Part 0");
	}
}
