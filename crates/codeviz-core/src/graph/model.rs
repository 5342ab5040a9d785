//! Uniform directed-graph model shared by every diagram type.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::kind::NodeKind;

/// Opaque node identity, valid only within one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Relation carried by an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// Parent contains child (AST).
    Contains,
    /// Caller invokes callee (CFG).
    Calls,
    Extends,
    Implements,
    /// Definition reaches a use (DDG).
    Defines,
    /// Parameter feeds its function (DDG).
    Uses,
    /// Entry/function/exit sequencing (CFG).
    Flow,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::Calls => "calls",
            Self::Extends => "extends",
            Self::Implements => "implements",
            Self::Defines => "defines",
            Self::Uses => "uses",
            Self::Flow => "flow",
        }
    }
}

/// A graph vertex.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    /// Grammar kind (`function_definition`) or synthetic tag (`entry`).
    #[serde(rename = "type")]
    pub node_type: String,
    pub kind: NodeKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

/// A directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<Relation>,
}

/// Node set plus edge set with idempotent edge insertion.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    #[serde(skip)]
    index: HashMap<NodeId, usize>,
    #[serde(skip)]
    seen_edges: HashSet<Edge>,
    #[serde(skip)]
    next_id: u32,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A graph holding a single informational node.
    pub fn placeholder(node_type: &str, kind: NodeKind, label: impl Into<String>) -> Self {
        let mut graph = Self::new();
        graph.add_node(node_type, kind, label, None);
        graph
    }

    /// Add a node with a fresh id.
    pub fn add_node(
        &mut self,
        node_type: impl Into<String>,
        kind: NodeKind,
        label: impl Into<String>,
        line: Option<u32>,
    ) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.index.insert(id, self.nodes.len());
        self.nodes.push(Node {
            id,
            node_type: node_type.into(),
            kind,
            label: label.into(),
            line,
        });
        id
    }

    /// Insert an edge. Returns `false` if it already exists or an endpoint is unknown.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, relation: Option<Relation>) -> bool {
        if !self.index.contains_key(&source) || !self.index.contains_key(&target) {
            return false;
        }
        let edge = Edge {
            source,
            target,
            relation,
        };
        if !self.seen_edges.insert(edge) {
            return false;
        }
        self.edges.push(edge);
        true
    }

    pub fn has_edge(&self, source: NodeId, target: NodeId, relation: Option<Relation>) -> bool {
        self.seen_edges.contains(&Edge {
            source,
            target,
            relation,
        })
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Position of a node in [`Graph::nodes`].
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// First node with the given label.
    pub fn find_by_label(&self, label: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.label == label)
    }

    /// Nodes with no incoming edge, in insertion order.
    pub fn roots(&self) -> Vec<NodeId> {
        let targets: HashSet<NodeId> = self.edges.iter().map(|e| e.target).collect();
        self.nodes
            .iter()
            .map(|n| n.id)
            .filter(|id| !targets.contains(id))
            .collect()
    }

    /// Number of incoming edges per node.
    pub fn in_degrees(&self) -> HashMap<NodeId, usize> {
        let mut degrees: HashMap<NodeId, usize> = self.nodes.iter().map(|n| (n.id, 0)).collect();
        for edge in &self.edges {
            *degrees.entry(edge.target).or_default() += 1;
        }
        degrees
    }

    /// Breadth-first distance of every reachable node from the roots.
    pub fn depths_from_roots(&self) -> HashMap<NodeId, usize> {
        let mut children: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for edge in &self.edges {
            children.entry(edge.source).or_default().push(edge.target);
        }

        let mut depths = HashMap::new();
        let mut queue = VecDeque::new();
        for root in self.roots() {
            depths.insert(root, 0);
            queue.push_back(root);
        }
        while let Some(id) = queue.pop_front() {
            let depth = depths[&id];
            for &child in children.get(&id).into_iter().flatten() {
                if !depths.contains_key(&child) {
                    depths.insert(child, depth + 1);
                    queue.push_back(child);
                }
            }
        }
        depths
    }

    /// Drop nodes without incident edges. Returns how many were removed.
    pub fn retain_connected(&mut self) -> usize {
        let connected: HashSet<NodeId> = self
            .edges
            .iter()
            .flat_map(|e| [e.source, e.target])
            .collect();
        let before = self.nodes.len();
        self.nodes.retain(|n| connected.contains(&n.id));
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id, i))
            .collect();
        before - self.nodes.len()
    }
}
