//! Interactive node-graph sketching: quadrant-bisection placement of new
//! nodes, a pointer-drag state machine, a reducer over the graph document,
//! versioned persistence, and an egui front end tying them together.

pub mod graph_utils;
pub mod gui;
pub mod interaction;
pub mod persistence;
