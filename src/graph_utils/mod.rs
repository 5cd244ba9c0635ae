pub mod geometry;
pub mod graph;
pub mod ids;
pub mod placement;
pub mod reducer;
