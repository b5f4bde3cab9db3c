//! Focused crafting-relation graph: one item in the middle, what feeds it on the left,
//! what it turns into on the right.

mod builder;
mod camera;
mod component;
mod controller;
mod index;
mod layout;
mod relation;
mod render;
mod search;
mod settings;
mod state;
mod types;

pub use component::CraftingGraph;
pub use index::RelationIndex;
pub use relation::{Category, EdgeFilter};
