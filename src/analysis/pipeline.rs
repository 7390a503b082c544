//! Whole-graph layer analysis.

use super::bucketing::{bucket_packages_by_layer, LayerBuckets};
use super::package::aggregate_package;
use super::LayerContext;
use crate::config::LayermapConfig;
use crate::core::{BubbleTeaData, Result};
use crate::graph::{Graph, GraphQuery};
use crate::layers::{build_layer_table, dependency_edges_from_graph, LayerSource, LayerTable};
use crate::observability::{
    increment_processed, set_current_package, set_phase, set_progress, AnalysisPhase,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

/// Result of one analysis pass
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchitectureReport {
    pub layers: Vec<String>,
    pub summary: ReportSummary,
    pub buckets: LayerBuckets,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub package_count: usize,
    pub class_count: usize,
    pub cross_cutting_count: usize,
    /// Occupied buckets as (label, package count), in bucket order
    pub bucket_counts: Vec<(String, usize)>,
}

impl ReportSummary {
    fn from_buckets(buckets: &LayerBuckets) -> Self {
        let packages = || buckets.iter().flat_map(|b| b.packages.iter());
        Self {
            package_count: buckets.total_packages(),
            class_count: packages().map(BubbleTeaData::class_count).sum(),
            cross_cutting_count: buckets.cross_cutting().len(),
            bucket_counts: buckets
                .occupied()
                .map(|b| (b.key.label(), b.packages.len()))
                .collect(),
        }
    }
}

/// One configured analysis run over a graph
#[derive(Debug, Clone)]
pub struct LayerAnalysis {
    ctx: LayerContext,
}

impl LayerAnalysis {
    /// Build the run's context.
    ///
    /// The layer table comes from, in order: `explicit_layers`, the
    /// configured `[layers] order`, the graph's allowed-dependency edges, and
    /// finally the built-in default.
    pub fn new<G: GraphQuery>(
        config: &LayermapConfig,
        graph: &G,
        explicit_layers: Option<Vec<String>>,
    ) -> Result<Self> {
        let _phase = set_phase(AnalysisPhase::BuildingLayerTable);

        let source = match explicit_layers {
            Some(layers) if !layers.is_empty() => LayerSource::Explicit(layers),
            _ => match config.layer_order() {
                Some(order) => LayerSource::Explicit(order.to_vec()),
                None => match dependency_edges_from_graph(graph, &config.labels) {
                    edges if edges.is_empty() => LayerSource::Default,
                    edges => LayerSource::DependencyEdges(edges),
                },
            },
        };
        tracing::debug!(?source, "Resolving layer table");

        let table = build_layer_table(source)?;
        tracing::info!(layers = ?table.layers(), "Layer table ready");
        Ok(Self::with_context(LayerContext::from_config(table, config)))
    }

    pub fn with_context(ctx: LayerContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &LayerContext {
        &self.ctx
    }

    pub fn table(&self) -> &LayerTable {
        &self.ctx.table
    }

    /// Aggregate every package node in graph order, without touching the graph
    pub fn aggregate_all<G: GraphQuery>(&self, graph: &G) -> Vec<BubbleTeaData> {
        let _phase = set_phase(AnalysisPhase::AggregatingPackages);
        let packages = graph.nodes_with_label(&self.ctx.labels.package);
        set_progress(0, packages.len());
        packages
            .into_iter()
            .map(|package| {
                let _package = set_current_package(&package.id);
                let aggregate = aggregate_package(graph, package, &self.ctx);
                increment_processed();
                aggregate
            })
            .collect()
    }

    /// Run the full pass: aggregate, annotate the graph, bucket.
    ///
    /// Each class gets its resolved layer (dominant layers joined with ",")
    /// written to the layer property, and a `package` back-reference. A class
    /// contained in several packages is annotated once, by the first of them
    /// in graph order.
    pub fn run(&self, graph: &mut Graph) -> ArchitectureReport {
        let span = tracing::info_span!(
            "layer_analysis",
            nodes = graph.node_count(),
            edges = graph.edge_count()
        );
        let _enter = span.enter();

        let aggregates = self.aggregate_all(graph);
        self.annotate(graph, &aggregates);

        let buckets = {
            let _phase = set_phase(AnalysisPhase::Bucketing);
            bucket_packages_by_layer(aggregates, &self.ctx)
        };
        let summary = ReportSummary::from_buckets(&buckets);
        tracing::info!(
            packages = summary.package_count,
            classes = summary.class_count,
            cross_cutting = summary.cross_cutting_count,
            "Layer analysis complete"
        );

        ArchitectureReport {
            layers: self.ctx.table.layers().to_vec(),
            summary,
            buckets,
            generated_at: Utc::now(),
        }
    }

    fn annotate(&self, graph: &mut Graph, aggregates: &[BubbleTeaData]) {
        let _phase = set_phase(AnalysisPhase::AnnotatingGraph);
        let mut annotated = HashSet::new();
        for aggregate in aggregates {
            for class in &aggregate.bubble_data {
                if !annotated.insert(class.class.as_str()) {
                    tracing::debug!(
                        class = %class.class,
                        package = %aggregate.package,
                        "Class already annotated by an earlier package"
                    );
                    continue;
                }
                let layer = self.ctx.dominant_layers(&class.bubble_data).join(",");
                graph.set_property(&class.class, &self.ctx.labels.layer_property, layer);
                graph.set_property(&class.class, "package", aggregate.package.as_str());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Node};

    fn sample_graph() -> Graph {
        let mut nodes = vec![
            Node::new("ui").with_label("Container"),
            Node::new("db").with_label("Container"),
            Node::new("View").with_label("Structure"),
            Node::new("Repo").with_label("Structure"),
        ];
        let mut edges = vec![
            Edge::new("c1", "ui", "View", "contains"),
            Edge::new("c2", "db", "Repo", "contains"),
        ];
        for (i, (class, layer)) in [
            ("View", "Presentation Layer"),
            ("View", "Presentation Layer"),
            ("Repo", "Data Source Layer"),
        ]
        .iter()
        .enumerate()
        {
            let method = format!("m{}", i);
            nodes.push(Node::new(&method).with_property("layer", *layer));
            edges.push(Edge::new(format!("h{}", i), *class, method, "hasScript"));
        }
        Graph::from_parts(nodes, edges).unwrap()
    }

    #[test]
    fn test_run_buckets_and_summarizes() {
        let mut graph = sample_graph();
        let analysis = LayerAnalysis::new(&LayermapConfig::default(), &graph, None).unwrap();
        let report = analysis.run(&mut graph);

        assert_eq!(report.layers.len(), 4);
        assert_eq!(report.summary.package_count, 2);
        assert_eq!(report.summary.class_count, 2);
        assert_eq!(report.summary.cross_cutting_count, 0);
        assert_eq!(
            report.summary.bucket_counts,
            vec![
                ("Presentation Layer".to_string(), 1),
                ("Data Source Layer".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_run_annotates_classes() {
        let mut graph = sample_graph();
        let analysis = LayerAnalysis::new(&LayermapConfig::default(), &graph, None).unwrap();
        analysis.run(&mut graph);

        let view = graph.node_by_id("View").unwrap();
        assert_eq!(view.property_str("layer"), Some("Presentation Layer"));
        assert_eq!(view.property_str("package"), Some("ui"));
    }

    #[test]
    fn test_shared_class_annotated_by_first_package() {
        let mut graph = sample_graph();
        graph.add_edge(Edge::new("c3", "db", "View", "contains")).unwrap();
        let analysis = LayerAnalysis::new(&LayermapConfig::default(), &graph, None).unwrap();
        let report = analysis.run(&mut graph);

        assert_eq!(report.summary.class_count, 3);
        let view = graph.node_by_id("View").unwrap();
        assert_eq!(view.property_str("package"), Some("ui"));
        assert_eq!(view.property_str("layer"), Some("Presentation Layer"));
    }

    #[test]
    fn test_explicit_layers_take_precedence() {
        let graph = sample_graph();
        let mut config = LayermapConfig::default();
        config.layers = Some(crate::config::LayersConfig {
            order: Some(vec!["Configured".into()]),
        });

        let analysis =
            LayerAnalysis::new(&config, &graph, Some(vec!["A".into(), "B".into()])).unwrap();
        assert_eq!(analysis.table().layers(), &["A", "B"]);

        let analysis = LayerAnalysis::new(&config, &graph, None).unwrap();
        assert_eq!(analysis.table().layers(), &["Configured"]);
    }

    #[test]
    fn test_layer_table_read_from_graph() {
        let mut graph = sample_graph();
        graph
            .add_node(Node::new("top").with_label("Grouping").with_property("simpleName", "Top"))
            .unwrap();
        graph
            .add_node(Node::new("bottom").with_label("Grouping").with_property("simpleName", "Bottom"))
            .unwrap();
        graph
            .add_edge(Edge::new("d1", "top", "bottom", "allowedDependency"))
            .unwrap();

        let analysis = LayerAnalysis::new(&LayermapConfig::default(), &graph, None).unwrap();
        assert_eq!(analysis.table().layers(), &["Top", "Bottom"]);
    }

    #[test]
    fn test_ambiguous_layer_graph_is_fatal() {
        let mut graph = sample_graph();
        for id in ["a", "b", "c"] {
            graph.add_node(Node::new(id).with_label("Grouping")).unwrap();
        }
        graph.add_edge(Edge::new("d1", "a", "c", "allowedDependency")).unwrap();
        graph.add_edge(Edge::new("d2", "b", "c", "allowedDependency")).unwrap();

        let err = LayerAnalysis::new(&LayermapConfig::default(), &graph, None).unwrap_err();
        assert!(matches!(err, crate::core::Error::WithContext { .. }));
        assert!(err.to_string().contains("several root layers: a, b"));
    }
}
