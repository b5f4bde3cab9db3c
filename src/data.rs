//! Data bundled into the binary.

/// The relation table, one record per item or trader.
pub const RELATIONS: &str = include_str!("../assets/items_relation.json");

/// English UI, relation and item labels.
pub const TRANSLATIONS_EN: &str = include_str!("../assets/i18n/en.json");

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::crafting_graph::RelationIndex;
	use crate::deep_link::DEFAULT_ITEM;
	use crate::components::crafting_graph::Category;
	use crate::i18n::{Translate, Translations};

	#[test]
	fn bundled_tables_parse() {
		let index = RelationIndex::from_json(RELATIONS).unwrap();
		assert!(index.get(DEFAULT_ITEM).is_some());

		let tr = Translations::from_json(TRANSLATIONS_EN).unwrap();
		assert_eq!(tr.language, "en");
		assert_ne!(tr.translate("error.goToPowerRod"), "error.goToPowerRod");
	}

	#[test]
	fn english_labels_name_traders() {
		let tr = Translations::from_json(TRANSLATIONS_EN).unwrap();
		assert_eq!(tr.relation_label(&Category::SoldBy), "Trader");
		assert_eq!(tr.relation_label(&Category::Craft), "craft");
	}

	#[test]
	fn bundled_edges_point_at_known_records() {
		let index = RelationIndex::from_json(RELATIONS).unwrap();
		let record = index.get(DEFAULT_ITEM).unwrap();
		for edge in &record.edges {
			assert!(index.get(&edge.counterpart).is_some(), "{}", edge.counterpart);
		}
	}
}
