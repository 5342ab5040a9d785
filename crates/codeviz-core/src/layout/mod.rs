//! Deterministic 2D layout.
//!
//! The same `(source, language, diagram)` request always yields the same
//! coordinates: the seed is derived from a hash of the request
//! ([`layout_seed`]) and threaded explicitly through the force simulation.
//!
//! Tree-shaped graphs get a second pass that re-ranks the vertical axis by
//! breadth-first depth from the roots.

mod force;
mod seed;

use std::collections::BTreeMap;
use std::f64::consts::TAU;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LayoutConfig;
use crate::graph::{Graph, NodeId};
use force::ForceParams;

pub use seed::layout_seed;

/// A node position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };
}

/// Node id to position.
pub type Positions = BTreeMap<NodeId, Point>;

/// Assigns coordinates to graph nodes.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Lay out `graph` with an explicit seed.
    ///
    /// With `tree` set, the y axis encodes depth from the roots (root at the
    /// top, `y = scale`) and x keeps the force-directed ordering.
    pub fn layout(&self, graph: &Graph, seed: u64, tree: bool) -> Positions {
        self.layout_until(graph, seed, tree, None)
    }

    /// Like [`layout`](Self::layout), but the force simulation stops early
    /// once `deadline` passes. Every node is still placed.
    pub fn layout_until(&self, graph: &Graph, seed: u64, tree: bool, deadline: Option<Instant>) -> Positions {
        let scale = self.config.scale;
        let nodes = graph.nodes();

        match nodes.len() {
            0 => return Positions::new(),
            1 => return Positions::from([(nodes[0].id, Point::ORIGIN)]),
            _ => {}
        }
        if graph.edge_count() == 0 {
            debug!(nodes = nodes.len(), "no edges; circular layout");
            return circle(graph, scale);
        }

        let edges: Vec<(usize, usize)> = graph
            .edges()
            .iter()
            .filter_map(|e| Some((graph.index_of(e.source)?, graph.index_of(e.target)?)))
            .collect();

        let mut rng = StdRng::seed_from_u64(seed);
        let params = ForceParams {
            iterations: self.config.iterations,
            spring_length: self.config.spring_length,
            deadline,
        };
        let mut pos = force::place(nodes.len(), &edges, params, &mut rng);
        force::rescale(&mut pos, scale);

        if tree {
            rank_by_depth(graph, &mut pos, scale);
        }

        debug!(nodes = nodes.len(), edges = edges.len(), seed, tree, "computed layout");
        nodes
            .iter()
            .zip(pos)
            .map(|(node, [x, y])| (node.id, Point { x, y }))
            .collect()
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

/// Evenly spaced on a circle of radius `scale`, in insertion order.
fn circle(graph: &Graph, scale: f64) -> Positions {
    let n = graph.node_count() as f64;
    graph
        .nodes()
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let angle = TAU * i as f64 / n;
            (
                node.id,
                Point {
                    x: scale * angle.cos(),
                    y: scale * angle.sin(),
                },
            )
        })
        .collect()
}

/// Overwrite y with `scale` at depth 0 down to `-scale` at the deepest level.
/// Nodes unreachable from a root keep their force-directed y.
fn rank_by_depth(graph: &Graph, pos: &mut [[f64; 2]], scale: f64) {
    let depths = graph.depths_from_roots();
    let deepest = depths.values().copied().max().unwrap_or(0);
    if deepest == 0 {
        return;
    }
    for (node, p) in graph.nodes().iter().zip(pos.iter_mut()) {
        if let Some(&depth) = depths.get(&node.id) {
            p[1] = scale - 2.0 * scale * depth as f64 / deepest as f64;
        }
    }
}
