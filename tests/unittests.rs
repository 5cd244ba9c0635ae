use graph_sketch::graph_utils::geometry::{Point, Region, Scale, Stage};
use graph_sketch::graph_utils::graph::{ElementId, GraphState, Node};
use graph_sketch::graph_utils::ids::SequentialIds;
use graph_sketch::graph_utils::placement::guess_position;
use graph_sketch::graph_utils::reducer::{Action, Reducer};
use graph_sketch::interaction::drag::DragMachine;
use graph_sketch::persistence::persist::{self, STORAGE_STATE_KEY};
use graph_sketch::persistence::store::{FileStore, KeyValueStore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

fn new_reducer(seed: u64) -> Reducer<SequentialIds, StdRng> {
    Reducer::with_sources(SequentialIds::new(), StdRng::seed_from_u64(seed))
}

fn node(id: u128, x: f64, y: f64) -> Node {
    Node::new(Uuid::from_u128(id), x, y, "")
}

#[test]
fn placement_on_empty_canvas_is_region_center() {
    for region in [
        Region::new(0.0, 0.0, 100.0, 100.0),
        Region::new(-40.0, 10.0, 7.0, 3.0),
        Region::new(5.0, 5.0, 0.0, 0.0),
    ] {
        assert_eq!(guess_position(&[], region), region.center());
    }
}

#[test]
fn placement_avoids_quadrant_of_single_center_node() {
    let region = Region::new(0.0, 0.0, 100.0, 100.0);
    let p = guess_position(&[node(1, 50.0, 50.0)], region);
    let others = [Point::new(75.0, 25.0), Point::new(25.0, 75.0), Point::new(75.0, 75.0)];
    assert!(others.contains(&p), "unexpected guess {:?}", p);
}

#[test]
fn placement_terminates_for_stacked_and_random_inputs() {
    let region = Region::new(0.0, 0.0, 640.0, 480.0);
    let stacked: Vec<Node> = (0..200).map(|i| node(i, 12.0, 12.0)).collect();
    let p = guess_position(&stacked, region);
    assert!(p.x > 12.0 || p.y > 12.0);

    let mut rng = StdRng::seed_from_u64(42);
    for round in 0..50 {
        let nodes: Vec<Node> = (0..round)
            .map(|i| node(i as u128, rng.gen_range(0.0..640.0), rng.gen_range(0.0..480.0)))
            .collect();
        let p = guess_position(&nodes, region);
        assert!(p.x >= 0.0 && p.x <= 640.0 && p.y >= 0.0 && p.y <= 480.0);
    }
}

#[test]
fn edges_stay_unique_and_loop_free() {
    let mut r = new_reducer(3);
    let mut state = r.reduce(&GraphState::new(), Action::Randomize { stage: Stage::new(300.0, 300.0) });
    let ids: Vec<ElementId> = state.nodes.iter().map(|n| n.id).collect();
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..200 {
        let start = if rng.gen_bool(0.1) { None } else { Some(ids[rng.gen_range(0..ids.len())]) };
        let end = ids[rng.gen_range(0..ids.len())];
        state = r.reduce(&state, Action::AddEdge { start, end });
    }
    for (i, e) in state.edges.iter().enumerate() {
        assert_ne!(e.start, e.end);
        for other in &state.edges[i + 1..] {
            assert!(!other.connects(e.start, e.end), "duplicate pair {:?}", e);
        }
    }
    // Five nodes give at most ten unordered pairs
    assert!(state.edges.len() <= 10);
}

#[test]
fn removing_node_cascades_to_its_edges_only() {
    let (a, b, c) = (node(1, 0.0, 0.0), node(2, 10.0, 0.0), node(3, 20.0, 0.0));
    let mut r = new_reducer(0);
    let mut state = GraphState { nodes: vec![a.clone(), b.clone(), c.clone()], ..GraphState::default() };
    state = r.reduce(&state, Action::AddEdge { start: Some(a.id), end: b.id });
    state = r.reduce(&state, Action::AddEdge { start: Some(b.id), end: c.id });
    assert_eq!(state.edges.len(), 2);

    state = r.reduce(&state, Action::Select(b.id));
    state = r.reduce(&state, Action::RemoveSelected);
    assert!(state.edges.is_empty());
    assert_eq!(state.nodes, vec![a.clone(), c.clone()]);

    // An unrelated edge survives the removal of another node
    let d = node(4, 30.0, 0.0);
    state.nodes.push(d.clone());
    state = r.reduce(&state, Action::AddEdge { start: Some(a.id), end: c.id });
    state = r.reduce(&state, Action::AddEdge { start: Some(c.id), end: d.id });
    state = r.reduce(&state, Action::Select(a.id));
    state = r.reduce(&state, Action::RemoveSelected);
    assert_eq!(state.edges.len(), 1);
    assert_eq!((state.edges[0].start, state.edges[0].end), (c.id, d.id));
}

#[test]
fn drag_without_movement_does_not_commit() {
    let mut m = DragMachine::new(Scale::default());
    let n = node(1, 40.0, 40.0);
    m.pointer_down(&n, Point::new(200.0, 120.0));
    assert_eq!(m.pointer_up(Point::new(200.0, 120.0)), None);
}

#[test]
fn drag_commit_feeds_the_reducer() {
    let mut r = new_reducer(0);
    let n = node(1, 40.0, 40.0);
    let state = GraphState { nodes: vec![n.clone()], ..GraphState::default() };

    let mut m = DragMachine::new(Scale::new(2.0, 0.5));
    m.pointer_down(&n, Point::new(0.0, 0.0));
    let preview = m.pointer_move(Point::new(21.0, 3.0)).expect("moved");
    assert_eq!((preview.x, preview.y), (50.0, 46.0));
    // Previews never touch the document
    assert_eq!(state.nodes[0], n);

    let committed = m.pointer_up(Point::new(-9.0, 3.0)).expect("commit");
    let state = r.reduce(&state, Action::UpdateNode(committed));
    assert_eq!((state.nodes[0].x, state.nodes[0].y), (35.0, 46.0));
}

#[test]
fn persistence_round_trips_through_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path());
    assert_eq!(persist::load(&store), None);

    let mut r = new_reducer(5);
    let mut state = r.reduce(&GraphState::new(), Action::Randomize { stage: Stage::new(800.0, 600.0) });
    let (a, b) = (state.nodes[0].id, state.nodes[1].id);
    state = r.reduce(&state, Action::AddEdge { start: Some(a), end: b });
    state = r.reduce(&state, Action::Select(b));

    persist::save(&mut store, &state).unwrap();
    assert!(store.path_for(STORAGE_STATE_KEY).exists());
    assert_eq!(persist::load(&store), Some(state.clone()));
    assert_eq!(persist::deserialize(&persist::serialize(&state).unwrap()), Some(state));
}

#[test]
fn foreign_or_stale_blobs_load_as_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path());
    for blob in [
        "{",
        "[]",
        r#"{"version":0,"data":{"nodes":[],"edges":[],"selectedId":null}}"#,
        r#"{"version":"1","data":{"nodes":[],"edges":[],"selectedId":null}}"#,
        r#"{"version":1,"data":{"nodes":[{"id":"x"}],"edges":[],"selectedId":null}}"#,
    ] {
        store.set(STORAGE_STATE_KEY, blob).unwrap();
        assert_eq!(persist::load(&store), None, "blob {}", blob);
    }
    store
        .set(STORAGE_STATE_KEY, r#"{"version":1,"data":{"nodes":[],"edges":[],"selectedId":null}}"#)
        .unwrap();
    assert_eq!(persist::load(&store), Some(GraphState::default()));
}
