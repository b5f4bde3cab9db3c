//! Label translation. Only ever changes displayed text, never graph topology.

use std::collections::HashMap;

use serde::Deserialize;

use crate::components::crafting_graph::Category;
use crate::error::GraphError;

/// Source of localized strings.
pub trait Translate {
	/// Looks up a UI or relation key.
	fn lookup(&self, key: &str) -> Option<String>;

	/// Looks up the localized name of an item.
	fn lookup_item(&self, name: &str) -> Option<String>;

	/// Localized text for `key`, or the key itself.
	fn translate(&self, key: &str) -> String {
		self.lookup(key).unwrap_or_else(|| key.to_string())
	}

	/// Localized item name, or the canonical name.
	fn translate_item(&self, name: &str) -> String {
		self.lookup_item(name).unwrap_or_else(|| name.to_string())
	}

	/// Display word for a relation category, falling back to its canonical key.
	fn relation_label(&self, category: &Category) -> String {
		self.lookup(&format!("relation.{}", category.key()))
			.unwrap_or_else(|| category.key().to_string())
	}
}

/// Identity translator: every label stays canonical.
#[cfg(test)]
#[derive(Clone, Copy, Debug, Default)]
pub struct Canonical;

#[cfg(test)]
impl Translate for Canonical {
	fn lookup(&self, _key: &str) -> Option<String> {
		None
	}

	fn lookup_item(&self, _name: &str) -> Option<String> {
		None
	}
}

/// Translation tables for one language.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Translations {
	#[serde(default)]
	pub language: String,
	#[serde(default)]
	labels: HashMap<String, String>,
	#[serde(default)]
	items: HashMap<String, String>,
}

impl Translations {
	pub fn from_json(raw: &str) -> Result<Self, GraphError> {
		Ok(serde_json::from_str(raw)?)
	}
}

impl Translate for Translations {
	fn lookup(&self, key: &str) -> Option<String> {
		self.labels.get(key).cloned()
	}

	fn lookup_item(&self, name: &str) -> Option<String> {
		self.items.get(name).cloned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const TABLE: &str = r#"{
		"language": "de",
		"labels": { "relation.craft": "Herstellen", "error.itemNotFound": "Nicht gefunden" },
		"items": { "Scrap Metal": "Altmetall" }
	}"#;

	#[test]
	fn falls_back_to_canonical() {
		let tr = Translations::from_json(TABLE).unwrap();
		assert_eq!(tr.translate("error.itemNotFound"), "Nicht gefunden");
		assert_eq!(tr.translate("search.placeholder"), "search.placeholder");
		assert_eq!(tr.translate_item("Scrap Metal"), "Altmetall");
		assert_eq!(tr.translate_item("Power Rod"), "Power Rod");
		assert_eq!(tr.relation_label(&Category::Craft), "Herstellen");
		assert_eq!(tr.relation_label(&Category::SoldBy), "sold_by");
	}

	#[test]
	fn rejects_malformed_tables() {
		assert!(matches!(
			Translations::from_json("{ \"labels\": 3 }"),
			Err(GraphError::Data(_))
		));
	}
}
