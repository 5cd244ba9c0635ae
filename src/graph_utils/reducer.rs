use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::geometry::Stage;
use super::graph::{Edge, ElementId, GraphState, Node};
use super::ids::{IdSource, UuidSource};
use super::placement::{generate_nodes, guess_node};

/// Every mutation the editor can make to a [`GraphState`].
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Load(GraphState),
    Randomize { stage: Stage },
    Clear,
    AddNode { stage: Stage },
    RemoveSelected,
    UpdateNode(Node),
    Select(ElementId),
    Deselect,
    AddEdge { start: Option<ElementId>, end: ElementId },
}

/// Applies [`Action`]s to produce the next document revision.
///
/// Owns the collaborators that make some transitions non-deterministic:
/// the id source for new elements and the random generator used for
/// sample documents.
pub struct Reducer<I = UuidSource, R = StdRng> {
    ids: I,
    rng: R,
}

impl Reducer {
    pub fn new() -> Self {
        Self { ids: UuidSource, rng: StdRng::from_entropy() }
    }
}

impl Default for Reducer {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: IdSource, R: rand::Rng> Reducer<I, R> {
    pub fn with_sources(ids: I, rng: R) -> Self {
        Self { ids, rng }
    }

    pub fn reduce(&mut self, state: &GraphState, action: Action) -> GraphState {
        match action {
            Action::Load(loaded) => {
                info!("loaded graph with {} nodes, {} edges", loaded.nodes.len(), loaded.edges.len());
                loaded
            }
            Action::Randomize { stage } => GraphState {
                nodes: generate_nodes(stage, &mut self.ids, &mut self.rng),
                edges: Vec::new(),
                selected_id: None,
            },
            Action::Clear => GraphState::default(),
            Action::AddNode { stage } => {
                let node = guess_node(&state.nodes, stage, &mut self.ids);
                let mut next = state.clone();
                next.nodes.push(node);
                next
            }
            Action::RemoveSelected => remove_selected(state),
            Action::UpdateNode(node) => GraphState {
                nodes: state
                    .nodes
                    .iter()
                    .map(|n| if n.id == node.id { node.clone() } else { n.clone() })
                    .collect(),
                ..state.clone()
            },
            Action::Select(id) => GraphState { selected_id: Some(id), ..state.clone() },
            Action::Deselect => GraphState { selected_id: None, ..state.clone() },
            Action::AddEdge { start, end } => self.add_edge(state, start, end),
        }
    }

    fn add_edge(&mut self, state: &GraphState, start: Option<ElementId>, end: ElementId) -> GraphState {
        let Some(start) = start else {
            return state.clone();
        };
        if start == end
            || !state.has_node(start)
            || !state.has_node(end)
            || state.has_edge_between(start, end)
        {
            debug!("rejected edge {} -> {}", start, end);
            return state.clone();
        }
        let mut next = state.clone();
        next.edges.push(Edge { id: self.ids.next_id(), start, end });
        next
    }
}

// A selected node takes its edges with it; a selected edge goes alone.
// The selection is cleared afterwards so it never names a removed element.
fn remove_selected(state: &GraphState) -> GraphState {
    let Some(selected) = state.selected_id else {
        return state.clone();
    };
    if !state.has_node(selected) && state.edge(selected).is_none() {
        return state.clone();
    }
    let nodes = state.nodes.iter().filter(|n| n.id != selected).cloned().collect();
    let edges = state
        .edges
        .iter()
        .filter(|e| e.id != selected && !e.touches(selected))
        .cloned()
        .collect();
    debug!("removed element {}", selected);
    GraphState { nodes, edges, selected_id: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_utils::ids::SequentialIds;
    use uuid::Uuid;

    fn reducer() -> Reducer<SequentialIds, StdRng> {
        Reducer::with_sources(SequentialIds::new(), StdRng::seed_from_u64(1))
    }

    fn r_select(s: &GraphState, id: ElementId) -> GraphState {
        reducer().reduce(s, Action::Select(id))
    }

    fn three_nodes() -> (GraphState, [ElementId; 3]) {
        let ids = [Uuid::from_u128(100), Uuid::from_u128(101), Uuid::from_u128(102)];
        let nodes = ids.iter().enumerate().map(|(i, id)| Node::new(*id, i as f64, 0.0, "")).collect();
        (GraphState { nodes, ..GraphState::default() }, ids)
    }

    #[test]
    fn add_node_appends_at_guessed_position() {
        let mut r = reducer();
        let s = r.reduce(&GraphState::new(), Action::AddNode { stage: Stage::new(100.0, 100.0) });
        assert_eq!(s.nodes.len(), 1);
        assert_eq!((s.nodes[0].x, s.nodes[0].y), (50.0, 50.0));
        let s = r.reduce(&s, Action::AddNode { stage: Stage::new(100.0, 100.0) });
        assert_eq!((s.nodes[1].x, s.nodes[1].y), (75.0, 25.0));
    }

    #[test]
    fn update_replaces_matching_node_in_place() {
        let (s, [a, b, c]) = three_nodes();
        let moved = Node::new(b, 9.0, 9.0, "b");
        let next = reducer().reduce(&s, Action::UpdateNode(moved.clone()));
        let ids: Vec<_> = next.nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![a, b, c]);
        assert_eq!(next.nodes[1], moved);
        assert_eq!(next.nodes[0], s.nodes[0]);
    }

    #[test]
    fn add_edge_rejections_leave_state_unchanged() {
        let (s, [a, b, _]) = three_nodes();
        let mut r = reducer();
        let stranger = Uuid::from_u128(999);
        for (start, end) in [(None, b), (Some(a), a), (Some(a), stranger), (Some(stranger), a)] {
            assert_eq!(r.reduce(&s, Action::AddEdge { start, end }), s);
        }
        let s = r.reduce(&s, Action::AddEdge { start: Some(a), end: b });
        assert_eq!(s.edges.len(), 1);
        assert_eq!(r.reduce(&s, Action::AddEdge { start: Some(b), end: a }), s);
    }

    #[test]
    fn removing_edge_keeps_nodes() {
        let (s, [a, b, c]) = three_nodes();
        let mut r = reducer();
        let s = r.reduce(&s, Action::AddEdge { start: Some(a), end: b });
        let s = r.reduce(&s, Action::AddEdge { start: Some(b), end: c });
        let edge = s.edges[0].id;
        let s = r.reduce(&s, Action::Select(edge));
        let s = r.reduce(&s, Action::RemoveSelected);
        assert_eq!(s.nodes.len(), 3);
        assert_eq!(s.edges.len(), 1);
        assert_eq!((s.edges[0].start, s.edges[0].end), (b, c));
        assert_eq!(s.selected_id, None);
    }

    #[test]
    fn remove_without_selection_is_noop() {
        let (s, _) = three_nodes();
        assert_eq!(reducer().reduce(&s, Action::RemoveSelected), s);
        let dangling = r_select(&s, Uuid::from_u128(5));
        assert_eq!(reducer().reduce(&dangling, Action::RemoveSelected), dangling);
    }

    #[test]
    fn select_does_not_validate() {
        let (s, _) = three_nodes();
        let unknown = Uuid::from_u128(77);
        let s = r_select(&s, unknown);
        assert_eq!(s.selected_id, Some(unknown));
        let s = reducer().reduce(&s, Action::Deselect);
        assert_eq!(s.selected_id, None);
    }

    #[test]
    fn randomize_replaces_everything() {
        let (s, [a, b, _]) = three_nodes();
        let mut r = reducer();
        let s = r.reduce(&s, Action::AddEdge { start: Some(a), end: b });
        let s = r.reduce(&s, Action::Select(a));
        let s = r.reduce(&s, Action::Randomize { stage: Stage::new(50.0, 50.0) });
        assert_eq!(s.nodes.len(), 5);
        assert!(s.edges.is_empty());
        assert_eq!(s.selected_id, None);
        assert!(s.nodes.iter().all(|n| !n.id.is_nil() && n.id != a));
    }

    #[test]
    fn clear_and_load_replace_wholesale() {
        let (s, _) = three_nodes();
        let mut r = reducer();
        let cleared = r.reduce(&s, Action::Clear);
        assert_eq!(cleared, GraphState::default());
        assert_eq!(r.reduce(&cleared, Action::Load(s.clone())), s);
    }
}
