//! Label-tagged property graph and its query facade.
//!
//! Nodes and edges carry string labels and arbitrary JSON properties. The
//! graph keeps per-node, per-label adjacency indices that are updated on every
//! edge insertion, so neighbor queries cost O(degree) instead of a scan over
//! all edges.

pub mod export;

use crate::core::{Error, Result};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

pub use export::{load_graph, parse_graph};

/// A graph node
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub labels: Vec<String>,
    pub properties: Map<String, Value>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            labels: Vec::new(),
            properties: Map::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// String-valued property; non-string values read as absent
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }
}

/// A directed, labeled edge
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
    pub properties: Map<String, Value>,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: label.into(),
            properties: Map::new(),
        }
    }
}

/// Read access to a graph, as needed by the layer analysis
pub trait GraphQuery {
    fn node_by_id(&self, id: &str) -> Option<&Node>;

    /// Nodes carrying `label`, in insertion order
    fn nodes_with_label(&self, label: &str) -> Vec<&Node>;

    /// Edges optionally filtered by label and predicate, in insertion order
    fn edges(&self, label: Option<&str>, predicate: Option<&dyn Fn(&Edge) -> bool>)
        -> Vec<&Edge>;

    /// Distinct targets of `label` edges leaving `id`, in first-seen edge order.
    /// Parallel edges yield their endpoint once.
    fn outgoing_neighbors(&self, id: &str, label: &str) -> Vec<&Node>;

    /// Distinct sources of `label` edges entering `id`, in first-seen edge order
    fn incoming_neighbors(&self, id: &str, label: &str) -> Vec<&Node>;
}

type LabelIndex = HashMap<String, Vec<usize>>;

/// In-memory graph with adjacency indices
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    node_index: HashMap<String, usize>,
    edges: Vec<Edge>,
    outgoing: Vec<LabelIndex>,
    incoming: Vec<LabelIndex>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from node and edge lists, validating references
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self> {
        let mut graph = Self::new();
        for node in nodes {
            graph.add_node(node)?;
        }
        for edge in edges {
            graph.add_edge(edge)?;
        }
        Ok(graph)
    }

    pub fn add_node(&mut self, node: Node) -> Result<()> {
        if self.node_index.contains_key(&node.id) {
            return Err(Error::InvalidGraph(format!("duplicate node id '{}'", node.id)));
        }
        self.node_index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        self.outgoing.push(LabelIndex::new());
        self.incoming.push(LabelIndex::new());
        Ok(())
    }

    pub fn add_edge(&mut self, edge: Edge) -> Result<()> {
        let source = self.require_index(&edge.source, &edge.id)?;
        let target = self.require_index(&edge.target, &edge.id)?;
        let edge_idx = self.edges.len();

        self.outgoing[source]
            .entry(edge.label.clone())
            .or_default()
            .push(edge_idx);
        self.incoming[target]
            .entry(edge.label.clone())
            .or_default()
            .push(edge_idx);
        self.edges.push(edge);
        Ok(())
    }

    fn require_index(&self, node_id: &str, edge_id: &str) -> Result<usize> {
        self.node_index.get(node_id).copied().ok_or_else(|| {
            Error::InvalidGraph(format!(
                "edge '{}' references unknown node '{}'",
                edge_id, node_id
            ))
        })
    }

    /// Set a property on a node. Returns false when the node does not exist.
    pub fn set_property(&mut self, id: &str, key: &str, value: impl Into<Value>) -> bool {
        match self.node_index.get(id) {
            Some(&idx) => {
                self.nodes[idx].properties.insert(key.to_string(), value.into());
                true
            }
            None => false,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn neighbors(
        &self,
        index: &[LabelIndex],
        id: &str,
        label: &str,
        pick_target: bool,
    ) -> Vec<&Node> {
        let Some(&idx) = self.node_index.get(id) else {
            return Vec::new();
        };
        let Some(edge_ids) = index[idx].get(label) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        edge_ids
            .iter()
            .map(|&e| {
                let edge = &self.edges[e];
                let other = if pick_target { &edge.target } else { &edge.source };
                self.node_index[other]
            })
            .filter(|&other| seen.insert(other))
            .map(|other| &self.nodes[other])
            .collect()
    }
}

impl GraphQuery for Graph {
    fn node_by_id(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx])
    }

    fn nodes_with_label(&self, label: &str) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.has_label(label)).collect()
    }

    fn edges(
        &self,
        label: Option<&str>,
        predicate: Option<&dyn Fn(&Edge) -> bool>,
    ) -> Vec<&Edge> {
        self.edges
            .iter()
            .filter(|e| label.is_none_or(|l| e.label == l))
            .filter(|e| predicate.is_none_or(|p| p(e)))
            .collect()
    }

    fn outgoing_neighbors(&self, id: &str, label: &str) -> Vec<&Node> {
        self.neighbors(&self.outgoing, id, label, true)
    }

    fn incoming_neighbors(&self, id: &str, label: &str) -> Vec<&Node> {
        self.neighbors(&self.incoming, id, label, false)
    }
}
