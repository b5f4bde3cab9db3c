//! Bookmarkable graph state: `/?graph=<item>&filters=<key,key,...>`.

use url::form_urlencoded;

use crate::components::crafting_graph::{Category, EdgeFilter};

/// Item shown when nothing else is requested, and the not-found escape hatch.
pub const DEFAULT_ITEM: &str = "Power Rod";
pub const GRAPH_PARAM: &str = "graph";
pub const FILTERS_PARAM: &str = "filters";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphLink {
	/// `None` means the graph view is closed.
	pub item: Option<String>,
	pub filter: EdgeFilter,
}

impl Default for GraphLink {
	fn default() -> Self {
		Self {
			item: None,
			filter: EdgeFilter::all(),
		}
	}
}

impl GraphLink {
	pub fn open(item: &str, filter: EdgeFilter) -> Self {
		Self {
			item: Some(item.to_string()),
			filter,
		}
	}

	/// A missing `filters` value selects every category; an empty one selects none.
	pub fn from_params(item: Option<String>, filters: Option<String>) -> Self {
		Self {
			item: item.filter(|i| !i.trim().is_empty()),
			filter: filters
				.as_deref()
				.map(parse_filter)
				.unwrap_or_else(EdgeFilter::all),
		}
	}

	#[cfg(test)]
	pub fn from_query(query: &str) -> Self {
		let (mut item, mut filters) = (None, None);
		for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
			match key.as_ref() {
				GRAPH_PARAM => item = Some(value.into_owned()),
				FILTERS_PARAM => filters = Some(value.into_owned()),
				_ => {}
			}
		}
		Self::from_params(item, filters)
	}

	pub fn to_href(&self) -> String {
		let Some(item) = &self.item else {
			return "/".to_string();
		};
		let mut query = form_urlencoded::Serializer::new(String::new());
		query.append_pair(GRAPH_PARAM, item);
		if let Some(filters) = serialize_filter(&self.filter) {
			query.append_pair(FILTERS_PARAM, &filters);
		}
		format!("/?{}", query.finish())
	}
}

/// Unknown keys are dropped; `trade` and `trader` mean `sold_by`.
pub fn parse_filter(raw: &str) -> EdgeFilter {
	EdgeFilter::Only(
		raw.split(',')
			.filter(|key| !key.trim().is_empty())
			.filter_map(Category::from_filter_key)
			.collect(),
	)
}

/// `None` when the filter is the default and can be left out of the link.
pub fn serialize_filter(filter: &EdgeFilter) -> Option<String> {
	match filter {
		#[cfg(test)]
		EdgeFilter::Any => None,
		only if *only == EdgeFilter::all() => None,
		EdgeFilter::Only(selected) => Some(
			selected
				.iter()
				.map(Category::key)
				.collect::<Vec<_>>()
				.join(","),
		),
	}
}
