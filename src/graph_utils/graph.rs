use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Nodes and edges share one id namespace
pub type ElementId = Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    pub text: String,
}

impl Node {
    pub fn new(id: ElementId, x: f64, y: f64, text: impl Into<String>) -> Self {
        Self { id, x, y, text: text.into() }
    }

    /// Same node drawn at the same place. Labels are not compared.
    pub fn same_placement(&self, other: &Node) -> bool {
        self.id == other.id && self.x == other.x && self.y == other.y
    }

    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self { text: text.into(), ..self.clone() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: ElementId,
    pub start: ElementId,
    pub end: ElementId,
}

impl Edge {
    pub fn touches(&self, node: ElementId) -> bool {
        self.start == node || self.end == node
    }

    // Direction is ignored for uniqueness
    pub fn connects(&self, a: ElementId, b: ElementId) -> bool {
        (self.start == a && self.end == b) || (self.start == b && self.end == a)
    }
}

/// The whole editable document. Replaced wholesale on every transition.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphState {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub selected_id: Option<ElementId>,
}

impl GraphState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: ElementId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: ElementId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn has_node(&self, id: ElementId) -> bool {
        self.node(id).is_some()
    }

    pub fn has_edge_between(&self, a: ElementId, b: ElementId) -> bool {
        self.edges.iter().any(|e| e.connects(a, b))
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selected_id == Some(id)
    }

    pub fn can_remove(&self) -> bool {
        self.selected_id.is_some()
    }
}
