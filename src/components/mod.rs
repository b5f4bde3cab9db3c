pub mod crafting_graph;
