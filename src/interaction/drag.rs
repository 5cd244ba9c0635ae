//! Pointer-drag gesture tracking for nodes.
//!
//! A gesture starts with a press on a node, produces preview positions
//! while the pointer moves, and ends with a release anywhere. Only a
//! gesture that actually moved its node results in a commit; a press and
//! release without movement is a plain click.

use log::debug;

use crate::graph_utils::geometry::{Point, Scale};
use crate::graph_utils::graph::{ElementId, Node};

/// State of one active drag: the node as it was when grabbed, where the
/// pointer went down and where it is now (both in screen coordinates).
#[derive(Clone, Debug, PartialEq)]
pub struct DragPayload {
    pub node: Node,
    pub start: Point,
    pub current: Point,
}

impl DragPayload {
    pub fn new(node: Node, at: Point) -> Self {
        Self { node, start: at, current: at }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    pub payload: DragPayload,
    // Last preview handed out; None until the node first moves.
    preview: Option<Node>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Where the grabbed node would be if the gesture ended now. The screen
/// delta is converted to logical units and the result floored.
pub fn candidate_node(payload: &DragPayload, scale: Scale) -> Node {
    let delta = scale.to_logical(Point::new(
        payload.current.x - payload.start.x,
        payload.current.y - payload.start.y,
    ));
    Node {
        x: (payload.node.x + delta.x).floor(),
        y: (payload.node.y + delta.y).floor(),
        ..payload.node.clone()
    }
}

#[derive(Clone, Debug, Default)]
pub struct DragMachine {
    state: DragState,
    scale: Scale,
}

impl DragMachine {
    pub fn new(scale: Scale) -> Self {
        Self { state: DragState::Idle, scale }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn dragged_id(&self) -> Option<ElementId> {
        match &self.state {
            DragState::Dragging(s) => Some(s.payload.node.id),
            DragState::Idle => None,
        }
    }

    /// The node to draw as the live overlay, once the gesture has moved it.
    pub fn preview(&self) -> Option<&Node> {
        match &self.state {
            DragState::Dragging(s) => s.preview.as_ref(),
            DragState::Idle => None,
        }
    }

    /// Grab `node`. Any unfinished gesture is dropped without committing.
    pub fn pointer_down(&mut self, node: &Node, at: Point) {
        debug!("drag start on {} at ({}, {})", node.id, at.x, at.y);
        self.state = DragState::Dragging(DragSession {
            payload: DragPayload::new(node.clone(), at),
            preview: None,
        });
    }

    /// Track the pointer. Returns the new preview when the candidate
    /// position differs from what was last drawn.
    pub fn pointer_move(&mut self, at: Point) -> Option<Node> {
        let DragState::Dragging(session) = &mut self.state else {
            return None;
        };
        session.payload.current = at;
        let candidate = candidate_node(&session.payload, self.scale);
        let drawn = session.preview.as_ref().unwrap_or(&session.payload.node);
        if candidate.same_placement(drawn) {
            return None;
        }
        session.preview = Some(candidate.clone());
        Some(candidate)
    }

    /// End the gesture. Returns the node to commit if the gesture ever
    /// produced a preview.
    pub fn pointer_up(&mut self, at: Point) -> Option<Node> {
        let DragState::Dragging(mut session) = std::mem::take(&mut self.state) else {
            return None;
        };
        session.payload.current = at;
        if session.preview.is_none() {
            return None;
        }
        let committed = candidate_node(&session.payload, self.scale);
        debug!("drag end on {} at ({}, {})", committed.id, committed.x, committed.y);
        Some(committed)
    }

    /// Abandon the gesture without committing.
    pub fn cancel(&mut self) {
        if self.is_dragging() {
            debug!("drag cancelled");
        }
        self.state = DragState::Idle;
    }
}
