//! JSON graph export loader.
//!
//! Accepts the export schema produced by the architecture extraction tools:
//!
//! ```json
//! { "elements": {
//!     "nodes": [ { "data": { "id": "...", "labels": ["..."], "properties": { } } } ],
//!     "edges": [ { "data": { "id": "...", "source": "...", "target": "...",
//!                            "label": "...", "properties": { } } } ] } }
//! ```
//!
//! The `elements` wrapper is optional.

use super::{Edge, Graph, Node};
use crate::core::{Error, Result, ResultExt};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GraphExport {
    Wrapped { elements: Elements },
    Bare(Elements),
}

#[derive(Debug, Default, Deserialize)]
struct Elements {
    #[serde(default)]
    nodes: Vec<Record<NodeData>>,
    #[serde(default)]
    edges: Vec<Record<EdgeData>>,
}

#[derive(Debug, Deserialize)]
struct Record<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct NodeData {
    id: String,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    properties: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct EdgeData {
    #[serde(default)]
    id: Option<String>,
    source: String,
    target: String,
    label: String,
    #[serde(default)]
    properties: Map<String, Value>,
}

/// Parse a graph export from a JSON string
pub fn parse_graph(contents: &str) -> Result<Graph> {
    let export: GraphExport = serde_json::from_str(contents)?;
    let elements = match export {
        GraphExport::Wrapped { elements } => elements,
        GraphExport::Bare(elements) => elements,
    };

    let nodes = elements
        .nodes
        .into_iter()
        .map(|Record { data }| Node {
            id: data.id,
            labels: data.labels,
            properties: data.properties,
        })
        .collect();

    let edges = elements
        .edges
        .into_iter()
        .enumerate()
        .map(|(i, Record { data })| Edge {
            id: data.id.unwrap_or_else(|| format!("e{}", i)),
            source: data.source,
            target: data.target,
            label: data.label,
            properties: data.properties,
        })
        .collect();

    let graph = Graph::from_parts(nodes, edges)?;
    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Parsed graph export"
    );
    Ok(graph)
}

/// Read and parse a graph export file
pub fn load_graph(path: &Path) -> Result<Graph> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::file_system("Failed to read graph export", path, e))?;
    parse_graph(&contents).context("Failed to parse graph export")
}
