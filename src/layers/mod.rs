//! Layer table construction.
//!
//! A [`LayerTable`] is the ordered list of architectural layers used for
//! adjacency checks and tie-breaking. Index 0 is reserved as the "no layer"
//! sentinel, so real layers are addressed by indices `1..=N`.
//!
//! The table comes from one of three sources, in order of precedence:
//! an explicit configured order, a breadth-first walk of the allowed-dependency
//! graph between layer-marker nodes, or the built-in four-layer default.

pub mod hue;

use crate::config::GraphLabels;
use crate::core::{Error, Result, ResultExt};
use crate::graph::GraphQuery;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};

pub use hue::HuePalette;

/// Built-in layer order used when neither configuration nor graph provide one
pub const DEFAULT_LAYERS: [&str; 4] = [
    "Presentation Layer",
    "Service Layer",
    "Domain Layer",
    "Data Source Layer",
];

/// Ordered layer names with an implicit sentinel at index 0
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerTable {
    layers: Vec<String>,
}

impl Default for LayerTable {
    fn default() -> Self {
        Self {
            layers: DEFAULT_LAYERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl LayerTable {
    /// Build a table from an explicit order. Names must be unique and non-empty.
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let layers: Vec<String> = names.into_iter().map(Into::into).collect();
        if layers.is_empty() {
            return Err(Error::Configuration(
                "layer order must name at least one layer".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for name in &layers {
            if name.trim().is_empty() {
                return Err(Error::Configuration("layer names must not be blank".into()));
            }
            if !seen.insert(name.as_str()) {
                return Err(Error::Configuration(format!(
                    "layer '{}' appears more than once",
                    name
                )));
            }
        }
        Ok(Self { layers })
    }

    /// Derive the order by walking `(from, to)` allowed-dependency edges
    /// breadth-first from the unique root.
    ///
    /// An empty edge list yields the default table.
    pub fn from_dependency_edges(edges: &[(String, String)]) -> Result<Self> {
        if edges.is_empty() {
            return Ok(Self::default());
        }

        let mut graph: DiGraph<&str, ()> = DiGraph::new();
        let mut index: HashMap<&str, NodeIndex> = HashMap::new();
        for (from, to) in edges {
            let a = *index
                .entry(from.as_str())
                .or_insert_with(|| graph.add_node(from.as_str()));
            let b = *index
                .entry(to.as_str())
                .or_insert_with(|| graph.add_node(to.as_str()));
            graph.add_edge(a, b, ());
        }

        let roots: Vec<NodeIndex> = graph
            .node_indices()
            .filter(|&n| {
                graph
                    .neighbors_directed(n, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .collect();

        let root = match roots.as_slice() {
            [root] => *root,
            [] => {
                return Err(Error::Configuration(
                    "layer dependency graph has no root layer (every layer is depended upon)"
                        .to_string(),
                ))
            }
            many => {
                let names: Vec<&str> = many.iter().map(|&n| graph[n]).collect();
                return Err(Error::Configuration(format!(
                    "layer dependency graph has several root layers: {}",
                    names.join(", ")
                )));
            }
        };

        let order = breadth_first_order(&graph, root);
        if order.len() < graph.node_count() {
            let reached: HashSet<&str> = order.iter().copied().collect();
            let unreachable: Vec<&str> = graph
                .node_indices()
                .map(|n| graph[n])
                .filter(|name| !reached.contains(name))
                .collect();
            tracing::warn!(
                ?unreachable,
                "Layers not reachable from root layer '{}' are left out of the layer table",
                graph[root]
            );
        }

        Self::from_names(order)
    }

    /// Derive the order from allowed-dependency edges stored in the graph itself
    pub fn from_graph<G: GraphQuery>(graph: &G, labels: &GraphLabels) -> Result<Self> {
        Self::from_dependency_edges(&dependency_edges_from_graph(graph, labels))
    }

    /// 1-based index of `name`, `None` for unknown layers
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l == name).map(|i| i + 1)
    }

    /// Position used by adjacency checks and scores: unknown layers are -1
    pub fn signed_index(&self, name: &str) -> i64 {
        self.index_of(name).map_or(-1, |i| i as i64)
    }

    pub fn is_valid(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Real layers in order, without the sentinel
    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    /// Consecutive layer pairs `(l1, l2), (l2, l3), ...`
    pub fn adjacent_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.layers
            .windows(2)
            .map(|w| (w[0].as_str(), w[1].as_str()))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Where a layer table comes from
#[derive(Debug, Clone)]
pub enum LayerSource {
    Explicit(Vec<String>),
    DependencyEdges(Vec<(String, String)>),
    Default,
}

/// Build the layer table for one analysis run
pub fn build_layer_table(source: LayerSource) -> Result<LayerTable> {
    match source {
        LayerSource::Explicit(names) => {
            LayerTable::from_names(names).context("Explicit layer order")
        }
        LayerSource::DependencyEdges(edges) => {
            LayerTable::from_dependency_edges(&edges).context("Layer dependency graph")
        }
        LayerSource::Default => Ok(LayerTable::default()),
    }
}

/// Allowed-dependency edges between layer-marker nodes, as layer name pairs
pub fn dependency_edges_from_graph<G: GraphQuery>(
    graph: &G,
    labels: &GraphLabels,
) -> Vec<(String, String)> {
    let layer_name = |id: &str| -> Option<String> {
        let node = graph.node_by_id(id)?;
        node.has_label(&labels.layer_marker).then(|| {
            node.property_str(&labels.name_property)
                .unwrap_or(&node.id)
                .to_string()
        })
    };

    graph
        .edges(Some(labels.layer_dependency.as_str()), None)
        .into_iter()
        .filter_map(|e| Some((layer_name(&e.source)?, layer_name(&e.target)?)))
        .collect()
}

fn breadth_first_order<'a>(graph: &DiGraph<&'a str, ()>, root: NodeIndex) -> Vec<&'a str> {
    let mut order = Vec::with_capacity(graph.node_count());
    let mut discovered = HashSet::from([root]);
    let mut queue = VecDeque::from([root]);

    while let Some(node) = queue.pop_front() {
        order.push(graph[node]);

        // petgraph lists edges newest first; walk them in insertion order
        let mut out: Vec<_> = graph.edges(node).collect();
        out.sort_by_key(|e| e.id());
        for edge in out {
            let next = edge.target();
            if discovered.insert(next) {
                queue.push_back(next);
            }
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Graph, Node};

    fn edges(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    #[test]
    fn test_default_table_indices_start_at_one() {
        let table = LayerTable::default();
        assert_eq!(table.len(), 4);
        assert_eq!(table.index_of("Presentation Layer"), Some(1));
        assert_eq!(table.index_of("Data Source Layer"), Some(4));
        assert_eq!(
            table.adjacent_pairs().collect::<Vec<_>>(),
            vec![
                ("Presentation Layer", "Service Layer"),
                ("Service Layer", "Domain Layer"),
                ("Domain Layer", "Data Source Layer"),
            ]
        );
    }

    #[test]
    fn test_unknown_layer_has_negative_index() {
        let table = LayerTable::default();
        assert_eq!(table.signed_index("Undefined"), -1);
        assert_eq!(table.signed_index("Domain Layer"), 3);
        assert!(!table.is_valid("Undefined"));
    }

    #[test]
    fn test_bfs_order_from_root() {
        let table = LayerTable::from_dependency_edges(&edges(&[
            ("UI", "App"),
            ("App", "Domain"),
            ("App", "Infra"),
            ("Domain", "Infra"),
        ]))
        .unwrap();
        assert_eq!(table.layers(), &["UI", "App", "Domain", "Infra"]);
    }

    #[test]
    fn test_bfs_follows_edge_insertion_order() {
        let table = LayerTable::from_dependency_edges(&edges(&[
            ("Root", "B"),
            ("Root", "A"),
            ("A", "C"),
        ]))
        .unwrap();
        assert_eq!(table.layers(), &["Root", "B", "A", "C"]);
    }

    #[test]
    fn test_cyclic_graph_has_no_root() {
        let err = LayerTable::from_dependency_edges(&edges(&[("A", "B"), ("B", "A")]))
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_ambiguous_roots_rejected() {
        let err = LayerTable::from_dependency_edges(&edges(&[("A", "C"), ("B", "C")]))
            .unwrap_err();
        assert!(err.to_string().contains("several root layers"));
    }

    #[test]
    fn test_build_errors_name_their_source() {
        let err = build_layer_table(LayerSource::DependencyEdges(edges(&[("A", "B"), ("B", "A")])))
            .unwrap_err();
        assert!(matches!(err, Error::WithContext { .. }));
        assert!(err.to_string().starts_with("Layer dependency graph: "));
        assert!(err.to_string().contains("no root layer"));

        let err = build_layer_table(LayerSource::Explicit(vec!["A".into(), "A".into()]))
            .unwrap_err();
        assert!(err.to_string().starts_with("Explicit layer order: "));
    }

    #[test]
    fn test_empty_edges_fall_back_to_default() {
        let table = build_layer_table(LayerSource::DependencyEdges(vec![])).unwrap();
        assert_eq!(table, LayerTable::default());
    }

    #[test]
    fn test_explicit_names_validated() {
        assert!(LayerTable::from_names(Vec::<String>::new()).is_err());
        assert!(LayerTable::from_names(["A", "A"]).is_err());
        assert!(LayerTable::from_names(["A", " "]).is_err());
        let table = build_layer_table(LayerSource::Explicit(vec!["X".into(), "Y".into()])).unwrap();
        assert_eq!(table.adjacent_pairs().collect::<Vec<_>>(), vec![("X", "Y")]);
    }

    #[test]
    fn test_dependency_edges_read_from_graph() {
        let labels = GraphLabels::default();
        let graph = Graph::from_parts(
            vec![
                Node::new("g1")
                    .with_label(&labels.layer_marker)
                    .with_property(&labels.name_property, "Presentation Layer"),
                Node::new("g2")
                    .with_label(&labels.layer_marker)
                    .with_property(&labels.name_property, "Domain Layer"),
                Node::new("g3").with_label(&labels.layer_marker),
                Node::new("other"),
            ],
            vec![
                Edge::new("d1", "g1", "g2", &labels.layer_dependency),
                Edge::new("d2", "g2", "g3", &labels.layer_dependency),
                Edge::new("d3", "g3", "other", &labels.layer_dependency),
            ],
        )
        .unwrap();

        let table = LayerTable::from_graph(&graph, &labels).unwrap();
        assert_eq!(table.layers(), &["Presentation Layer", "Domain Layer", "g3"]);
    }
}
