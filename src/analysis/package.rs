//! Package-level aggregation of class compositions.

use super::comparator::CompositionComparator;
use super::composition::analyze_class;
use super::LayerContext;
use crate::core::{total_count, BubbleTeaData, ClassComposition, CompositionEntry};
use crate::graph::{GraphQuery, Node};

/// Aggregate every class contained in `package`.
///
/// Each class vector is normalized to sum 1, the package vector is the mean
/// of those normalized vectors, and the package's dominant layers are
/// resolved on the mean. Per-class raw vectors are kept, sorted into layout
/// order.
pub fn aggregate_package<G: GraphQuery>(
    graph: &G,
    package: &Node,
    ctx: &LayerContext,
) -> BubbleTeaData {
    let mut bubble_data: Vec<ClassComposition> = graph
        .outgoing_neighbors(&package.id, &ctx.labels.contains)
        .into_iter()
        .filter(|node| node.has_label(&ctx.labels.class))
        .map(|class| analyze_class(graph, class, ctx))
        .collect();

    let bubble_tea_data = average_compositions(&bubble_data, ctx);
    let dominant = ctx.dominant_layers(&bubble_tea_data);

    let comparator = CompositionComparator::new(&ctx.table, &ctx.dominance);
    bubble_data.sort_by(|a, b| comparator.compare(&a.bubble_data, &b.bubble_data));

    tracing::debug!(
        package = %package.id,
        classes = bubble_data.len(),
        ?dominant,
        "Aggregated package"
    );

    BubbleTeaData {
        package: package.id.clone(),
        dominant,
        bubble_tea_data,
        bubble_data,
    }
}

/// Scale a vector so its counts sum to 1.
///
/// A zero-total vector cannot come out of the class analyzer; if one shows up
/// anyway it becomes an all-zero share vector instead of NaN.
pub fn normalize_composition(vector: &[CompositionEntry]) -> Vec<CompositionEntry> {
    let total = total_count(vector);
    if total == 0.0 {
        if !vector.is_empty() {
            tracing::warn!(
                entries = vector.len(),
                "Composition with zero total count; treating all shares as zero"
            );
        }
        return vector
            .iter()
            .map(|e| CompositionEntry { count: 0.0, ..e.clone() })
            .collect();
    }
    vector
        .iter()
        .map(|e| CompositionEntry {
            count: e.count / total,
            ..e.clone()
        })
        .collect()
}

/// Mean of the normalized class vectors, one entry per distinct layer in
/// first-seen order. Classes lacking a layer contribute 0 to its mean.
pub fn average_compositions(
    classes: &[ClassComposition],
    ctx: &LayerContext,
) -> Vec<CompositionEntry> {
    if classes.is_empty() {
        return Vec::new();
    }

    let normalized: Vec<Vec<CompositionEntry>> = classes
        .iter()
        .map(|c| normalize_composition(&c.bubble_data))
        .collect();

    let mut layers: Vec<&str> = Vec::new();
    for entry in normalized.iter().flatten() {
        if !entry.layer.is_empty() && !layers.contains(&entry.layer.as_str()) {
            layers.push(&entry.layer);
        }
    }

    let class_count = classes.len() as f64;
    layers
        .into_iter()
        .map(|layer| {
            let share_sum: f64 = normalized
                .iter()
                .flatten()
                .filter(|e| e.layer == layer)
                .map(|e| e.count)
                .sum();
            ctx.entry(layer, share_sum / class_count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::UNDEFINED_LAYER;
    use crate::graph::{Edge, Graph};

    const P: &str = "Presentation Layer";
    const S: &str = "Service Layer";

    /// Package "pkg" holding classes described as (id, method layers)
    fn package_graph(classes: &[(&str, &[&str])]) -> Graph {
        let mut nodes = vec![Node::new("pkg").with_label("Container")];
        let mut edges = Vec::new();
        for (class, methods) in classes {
            nodes.push(Node::new(*class).with_label("Structure"));
            edges.push(Edge::new(format!("c-{}", class), "pkg", *class, "contains"));
            for (i, layer) in methods.iter().enumerate() {
                let method = format!("{}.m{}", class, i);
                nodes.push(Node::new(&method).with_property("layer", *layer));
                edges.push(Edge::new(format!("h-{}", method), *class, method, "hasScript"));
            }
        }
        Graph::from_parts(nodes, edges).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_single_class_package_matches_class_shares() {
        let graph = package_graph(&[("A", &[P, P, P, P, P, P, S])]);
        let ctx = LayerContext::default();
        let result = aggregate_package(&graph, graph.node_by_id("pkg").unwrap(), &ctx);

        assert_eq!(result.package, "pkg");
        assert_eq!(result.dominant, vec![P]);
        assert_eq!(result.bubble_tea_data.len(), 2);
        assert!(close(result.bubble_tea_data[0].count, 6.0 / 7.0));
        assert!(close(result.bubble_tea_data[1].count, 1.0 / 7.0));
        assert_eq!(result.bubble_data[0].bubble_data[0].count, 6.0);
    }

    #[test]
    fn test_equal_single_layer_classes_average_to_one() {
        let graph = package_graph(&[("A", &[S, S]), ("B", &[S, S]), ("C", &[S, S])]);
        let ctx = LayerContext::default();
        let result = aggregate_package(&graph, graph.node_by_id("pkg").unwrap(), &ctx);

        assert_eq!(result.bubble_tea_data.len(), 1);
        assert_eq!(result.bubble_tea_data[0].layer, S);
        assert!(close(result.bubble_tea_data[0].count, 1.0));
        assert!(result.bubble_tea_data[0].valid);
        assert_eq!(result.dominant, vec![S]);
    }

    #[test]
    fn test_missing_layers_contribute_zero() {
        // A: all presentation; B: all service -> 0.5 / 0.5
        let graph = package_graph(&[("A", &[P]), ("B", &[S, S, S])]);
        let ctx = LayerContext::default();
        let result = aggregate_package(&graph, graph.node_by_id("pkg").unwrap(), &ctx);

        assert!(close(result.bubble_tea_data[0].count, 0.5));
        assert!(close(result.bubble_tea_data[1].count, 0.5));
        assert_eq!(result.dominant, vec![P, S]);
    }

    #[test]
    fn test_empty_package() {
        let graph = package_graph(&[]);
        let ctx = LayerContext::default();
        let result = aggregate_package(&graph, graph.node_by_id("pkg").unwrap(), &ctx);

        assert!(result.bubble_tea_data.is_empty());
        assert!(result.bubble_data.is_empty());
        assert!(result.dominant.is_empty());
    }

    #[test]
    fn test_methodless_class_counts_as_undefined() {
        let graph = package_graph(&[("A", &[])]);
        let ctx = LayerContext::default();
        let result = aggregate_package(&graph, graph.node_by_id("pkg").unwrap(), &ctx);

        assert_eq!(result.bubble_tea_data[0].layer, UNDEFINED_LAYER);
        assert!(close(result.bubble_tea_data[0].count, 1.0));
        assert_eq!(result.dominant, vec![UNDEFINED_LAYER]);
    }

    #[test]
    fn test_non_class_children_ignored() {
        let mut graph = package_graph(&[("A", &[P])]);
        graph.add_node(Node::new("sub").with_label("Container")).unwrap();
        graph
            .add_edge(Edge::new("c-sub", "pkg", "sub", "contains"))
            .unwrap();
        let ctx = LayerContext::default();
        let result = aggregate_package(&graph, graph.node_by_id("pkg").unwrap(), &ctx);
        assert_eq!(result.bubble_data.len(), 1);
    }

    #[test]
    fn test_classes_sorted_for_layout() {
        let graph = package_graph(&[("Svc", &[S]), ("Ui", &[P])]);
        let ctx = LayerContext::default();
        let result = aggregate_package(&graph, graph.node_by_id("pkg").unwrap(), &ctx);
        let order: Vec<_> = result.bubble_data.iter().map(|c| c.class.as_str()).collect();
        assert_eq!(order, vec!["Ui", "Svc"]);
    }

    #[test]
    fn test_normalize_zero_total() {
        let zero = vec![CompositionEntry::new(P, 0.0)];
        let normalized = normalize_composition(&zero);
        assert_eq!(normalized[0].count, 0.0);
        assert!(normalize_composition(&[]).is_empty());
    }
}
