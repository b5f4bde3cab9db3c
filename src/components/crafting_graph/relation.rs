use std::collections::BTreeSet;
use std::fmt::Write as _;

use serde::Deserialize;

use super::types::Edge;
use crate::i18n::Translate;

/// Normalized relation type. Parsed once from strings like `craft_from` or `salvage_to`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(from = "String")]
pub enum Category {
	Craft,
	Repair,
	Upgrade,
	Recycle,
	Salvage,
	/// Covers both `sold_by` and `trader` relations.
	SoldBy,
	Unknown(String),
}

impl Category {
	/// The six categories a user can filter on, in priority order.
	pub const FILTERABLE: [Category; 6] = [
		Category::Craft,
		Category::Repair,
		Category::Upgrade,
		Category::Recycle,
		Category::Salvage,
		Category::SoldBy,
	];

	/// Sort rank; lower sorts first.
	pub fn priority(&self) -> u32 {
		match self {
			Self::Craft => 0,
			Self::Repair => 1,
			Self::Upgrade => 2,
			Self::Recycle => 3,
			Self::Salvage => 4,
			Self::SoldBy => 5,
			Self::Unknown(_) => 999,
		}
	}

	pub fn key(&self) -> &str {
		match self {
			Self::Craft => "craft",
			Self::Repair => "repair",
			Self::Upgrade => "upgrade",
			Self::Recycle => "recycle",
			Self::Salvage => "salvage",
			Self::SoldBy => "sold_by",
			Self::Unknown(other) => other,
		}
	}

	/// Parses a filter key as found in deep links. Only filterable categories are accepted.
	pub fn from_filter_key(key: &str) -> Option<Self> {
		match Self::from(key.trim()) {
			Self::Unknown(other) if other == "trade" => Some(Self::SoldBy),
			Self::Unknown(_) => None,
			category => Some(category),
		}
	}

	/// Stroke colour used by the settings panel and the canvas.
	pub fn color(&self) -> &'static str {
		match self {
			Self::Craft => "#60a5fa",
			Self::Repair => "#ef4444",
			Self::Upgrade => "#ec4899",
			Self::Recycle => "#34d399",
			Self::Salvage => "#10b981",
			Self::SoldBy => "#fbbf24",
			Self::Unknown(_) => "#9ca3af",
		}
	}
}

/// Strips one trailing `_from` / `_to`.
pub fn normalize(relation: &str) -> &str {
	relation
		.strip_suffix("_from")
		.or_else(|| relation.strip_suffix("_to"))
		.unwrap_or(relation)
}

impl From<&str> for Category {
	fn from(relation: &str) -> Self {
		match normalize(relation) {
			"craft" => Self::Craft,
			"repair" => Self::Repair,
			"upgrade" => Self::Upgrade,
			"recycle" => Self::Recycle,
			"salvage" => Self::Salvage,
			"sold_by" | "trader" => Self::SoldBy,
			other => Self::Unknown(other.to_string()),
		}
	}
}

impl From<String> for Category {
	fn from(relation: String) -> Self {
		Self::from(relation.as_str())
	}
}

/// Which categories are currently shown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EdgeFilter {
	/// No filter at all; every relation is shown, unknown ones included.
	#[cfg(test)]
	Any,
	Only(BTreeSet<Category>),
}

impl Default for EdgeFilter {
	fn default() -> Self {
		Self::all()
	}
}

impl EdgeFilter {
	/// Every filterable category selected.
	pub fn all() -> Self {
		Self::Only(Category::FILTERABLE.into_iter().collect())
	}

	pub fn none() -> Self {
		Self::Only(BTreeSet::new())
	}

	pub fn is_visible(&self, category: &Category) -> bool {
		match self {
			#[cfg(test)]
			Self::Any => true,
			Self::Only(selected) => selected.contains(category),
		}
	}

	pub fn contains(&self, category: &Category) -> bool {
		self.is_visible(category)
	}

	/// Flips one category, turning `Any` into an explicit set first.
	pub fn toggled(&self, category: &Category) -> Self {
		let mut selected = match self {
			#[cfg(test)]
			Self::Any => Category::FILTERABLE.into_iter().collect(),
			Self::Only(selected) => selected.clone(),
		};
		if !selected.remove(category) {
			selected.insert(category.clone());
		}
		Self::Only(selected)
	}
}

/// Formats one raw edge as a single label line, e.g. `craft (3x)` or `sold_by [120 coins]`.
pub fn format_label(edge: &Edge, tr: &dyn Translate) -> String {
	let mut label = tr.relation_label(&edge.relation);
	if let Some(quantity) = edge.quantity.filter(|q| *q > 1) {
		let _ = write!(label, " ({quantity}x)");
	}
	let price = edge.price().and_then(|p| {
		let amount = p.amount?;
		Some(match &p.currency {
			Some(currency) => format!("{amount} {currency}"),
			None => amount.to_string(),
		})
	});
	let level = edge.input_level.as_deref().or(edge.output_level.as_deref());
	if let Some(price) = price {
		let _ = write!(label, " [{price}]");
	} else if let Some(level) = level.filter(|l| !l.is_empty()) {
		let _ = write!(label, " [{level}]");
	}
	label
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::crafting_graph::types::{Dependency, Direction};
	use crate::i18n::Canonical;

	#[test]
	fn normalize_strips_direction_suffix() {
		assert_eq!(normalize("craft_from"), "craft");
		assert_eq!(normalize("salvage_to"), "salvage");
		assert_eq!(normalize("sold_by"), "sold_by");
		assert_eq!(Category::from("trader"), Category::SoldBy);
		assert_eq!(
			Category::from("quest_from"),
			Category::Unknown("quest".into())
		);
	}

	#[test]
	fn priority_table() {
		let ranks: Vec<u32> = Category::FILTERABLE.iter().map(Category::priority).collect();
		assert_eq!(ranks, vec![0, 1, 2, 3, 4, 5]);
		assert_eq!(Category::from("trader").priority(), 5);
		assert_eq!(Category::from("mystery").priority(), 999);
	}

	#[test]
	fn filter_visibility() {
		assert!(EdgeFilter::Any.is_visible(&Category::Unknown("quest".into())));
		assert!(!EdgeFilter::none().is_visible(&Category::Craft));
		assert!(!EdgeFilter::all().is_visible(&Category::Unknown("quest".into())));

		let only_trade = EdgeFilter::Only([Category::SoldBy].into_iter().collect());
		assert!(only_trade.is_visible(&Category::from("trader")));
		assert!(only_trade.is_visible(&Category::from("sold_by")));
		assert!(!only_trade.is_visible(&Category::from("craft_from")));
	}

	#[test]
	fn toggling_any_starts_from_all() {
		let filter = EdgeFilter::Any.toggled(&Category::Craft);
		assert!(!filter.contains(&Category::Craft));
		assert!(filter.contains(&Category::SoldBy));
		assert_eq!(filter.toggled(&Category::Craft), EdgeFilter::all());
	}

	#[test]
	fn filter_keys_accept_aliases() {
		assert_eq!(Category::from_filter_key("trade"), Some(Category::SoldBy));
		assert_eq!(Category::from_filter_key(" trader "), Some(Category::SoldBy));
		assert_eq!(Category::from_filter_key("craft"), Some(Category::Craft));
		assert_eq!(Category::from_filter_key("quest"), None);
	}

	#[test]
	fn label_quantity_and_level() {
		let mut edge = Edge::new("craft_from", "Scrap Metal", Direction::In);
		edge.quantity = Some(3);
		assert_eq!(format_label(&edge, &Canonical), "craft (3x)");

		edge.quantity = Some(1);
		edge.input_level = Some("Lv. 2".into());
		assert_eq!(format_label(&edge, &Canonical), "craft [Lv. 2]");

		edge.input_level = None;
		edge.output_level = Some("Lv. 3".into());
		assert_eq!(format_label(&edge, &Canonical), "craft [Lv. 3]");
	}

	#[test]
	fn price_takes_precedence_over_level() {
		let mut edge = Edge::new("sold_by", "Trader Jin", Direction::Out);
		edge.input_level = Some("Lv. 1".into());
		edge.dependency = vec![Dependency {
			kind: "price".into(),
			amount: Some(120.0),
			currency: Some("coins".into()),
		}];
		assert_eq!(format_label(&edge, &Canonical), "sold_by [120 coins]");
	}

	#[test]
	fn missing_price_falls_back() {
		let mut edge = Edge::new("trader", "Trader Jin", Direction::Out);
		edge.dependency = vec![Dependency {
			kind: "reputation".into(),
			amount: Some(2.0),
			currency: None,
		}];
		assert_eq!(format_label(&edge, &Canonical), "sold_by");

		edge.output_level = Some("Tier 2".into());
		assert_eq!(format_label(&edge, &Canonical), "sold_by [Tier 2]");
	}
}
