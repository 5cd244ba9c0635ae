//! Placement of new nodes by recursive quadrant bisection.
//!
//! The region is split into four equal quadrants, the one holding the
//! fewest nodes is kept, and the search continues inside it until an
//! empty quadrant is found or the split stops separating nodes. The
//! centre of the final quadrant is the guess.

use log::debug;
use rand::Rng;

use super::geometry::{Point, Region, Stage};
use super::graph::Node;
use super::ids::IdSource;

/// Number of nodes produced by [`generate_nodes`].
pub const SAMPLE_SIZE: usize = 5;
pub const SAMPLE_TEXT: &str = "sample";

/// Guess a point inside `region` that is as far from existing nodes as the
/// quadrant heuristic can tell.
pub fn guess_position(nodes: &[Node], region: Region) -> Point {
    let subset: Vec<&Node> = nodes.iter().collect();
    available_region(region, &subset).center()
}

/// A fresh, unlabeled node at the guessed position on the stage.
pub fn guess_node(nodes: &[Node], stage: Stage, ids: &mut dyn IdSource) -> Node {
    let p = guess_position(nodes, Region::from(stage));
    let node = Node::new(ids.next_id(), p.x, p.y, "");
    debug!("placed node {} at ({}, {})", node.id, node.x, node.y);
    node
}

/// A sample document: [`SAMPLE_SIZE`] nodes at random whole coordinates
/// within the stage.
pub fn generate_nodes<R: Rng + ?Sized>(stage: Stage, ids: &mut dyn IdSource, rng: &mut R) -> Vec<Node> {
    (0..SAMPLE_SIZE)
        .map(|_| {
            let x = random_coordinate(stage.width, rng);
            let y = random_coordinate(stage.height, rng);
            Node::new(ids.next_id(), x, y, SAMPLE_TEXT)
        })
        .collect()
}

fn random_coordinate<R: Rng + ?Sized>(extent: f64, rng: &mut R) -> f64 {
    (rng.r#gen::<f64>() * extent).floor()
}

fn available_region(region: Region, nodes: &[&Node]) -> Region {
    if nodes.is_empty() {
        return region;
    }

    let c = region.center();
    // top-left, top-right, bottom-left, bottom-right
    let mut buckets: [Vec<&Node>; 4] = Default::default();
    for &node in nodes {
        let col = if node.x <= c.x { 0 } else { 1 };
        let row = if node.y <= c.y { 0 } else { 2 };
        buckets[row + col].push(node);
    }

    // Fewest nodes wins; ties go to the earlier quadrant.
    let mut best = 0;
    for i in 1..buckets.len() {
        if buckets[i].len() < buckets[best].len() {
            best = i;
        }
    }

    let quadrant = region.quadrants()[best];
    if is_same(nodes, &buckets[best]) {
        quadrant
    } else {
        available_region(quadrant, &buckets[best])
    }
}

// Identity, not value equality: two distinct nodes at one spot still differ.
fn is_same(xs: &[&Node], ys: &[&Node]) -> bool {
    xs.len() == ys.len() && xs.iter().zip(ys).all(|(a, b)| std::ptr::eq(*a, *b))
}
