//! Per-class layer composition.

use super::LayerContext;
use crate::core::{ClassComposition, CompositionEntry, UNDEFINED_LAYER};
use crate::graph::{GraphQuery, Node};
use std::collections::HashMap;

/// Count `class`'s methods by assigned layer.
///
/// Methods are the targets of the class's methods-labeled edges; a method
/// without a (non-empty string) layer property counts as `Undefined`. Groups
/// appear in first-seen order. A class without methods gets the single
/// synthetic entry `{Undefined, 1}`, so every class vector has a total of at
/// least 1.
pub fn analyze_class<G: GraphQuery>(
    graph: &G,
    class: &Node,
    ctx: &LayerContext,
) -> ClassComposition {
    let methods = graph.outgoing_neighbors(&class.id, &ctx.labels.methods);
    let layers = methods.iter().map(|method| {
        method
            .property_str(&ctx.labels.layer_property)
            .filter(|layer| !layer.is_empty())
            .unwrap_or(UNDEFINED_LAYER)
    });

    let bubble_data = match count_by_layer(layers) {
        counts if counts.is_empty() => vec![CompositionEntry::undefined()],
        counts => counts
            .into_iter()
            .map(|(layer, count)| ctx.entry(layer, count as f64))
            .collect(),
    };

    ClassComposition {
        class: class.id.clone(),
        bubble_data,
    }
}

/// Group sizes in first-seen order
fn count_by_layer<'a>(layers: impl Iterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for layer in layers {
        match positions.get(layer) {
            Some(&i) => counts[i].1 += 1,
            None => {
                positions.insert(layer, counts.len());
                counts.push((layer, 1));
            }
        }
    }
    counts
}
