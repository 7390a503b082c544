//! Dominant layer resolution.
//!
//! Decides which zero, one or two layers characterize a composition vector:
//!
//! - one layer when it outweighs the runner-up by more than `ratio` (1.5);
//! - the top two, in layer-table order, when neither dominates but they are
//!   adjacent (index distance below `adjacency_distance`, 2) and either the
//!   vector has exactly two entries or some entry is clearly minor;
//! - nothing (cross-cutting) otherwise.
//!
//! The scan order matters: ties keep the first-seen entry.

use crate::config::DominanceConfig;
use crate::core::CompositionEntry;
use crate::layers::LayerTable;

/// Dominant layers using the default thresholds
pub fn resolve_dominant_layers(vector: &[CompositionEntry], table: &LayerTable) -> Vec<String> {
    resolve_dominant_layers_with(vector, table, &DominanceConfig::default())
}

pub fn resolve_dominant_layers_with(
    vector: &[CompositionEntry],
    table: &LayerTable,
    config: &DominanceConfig,
) -> Vec<String> {
    let Some(top) = TopTwo::scan(vector) else {
        return Vec::new();
    };
    let (layer1, max1) = top.first;
    let Some((layer2, max2)) = top.second else {
        return vec![layer1.to_string()];
    };

    if max1 > config.ratio * max2 {
        return vec![layer1.to_string()];
    }

    let has_minor_entry = vector.iter().any(|e| e.count * config.ratio < max1);
    if vector.len() == 2 || has_minor_entry {
        let (index1, index2) = (table.signed_index(layer1), table.signed_index(layer2));
        if (index1 - index2).abs() < i64::from(config.adjacency_distance) {
            return if index2 < index1 {
                vec![layer2.to_string(), layer1.to_string()]
            } else {
                vec![layer1.to_string(), layer2.to_string()]
            };
        }
    }

    Vec::new()
}

/// Running top-2 of a single scan with strict comparisons
struct TopTwo<'a> {
    first: (&'a str, f64),
    second: Option<(&'a str, f64)>,
}

impl<'a> TopTwo<'a> {
    fn scan(vector: &'a [CompositionEntry]) -> Option<Self> {
        let mut first: Option<(&str, f64)> = None;
        let mut second: Option<(&str, f64)> = None;

        for entry in vector {
            let candidate = (entry.layer.as_str(), entry.count);
            if first.is_none_or(|(_, max1)| entry.count > max1) {
                second = first;
                first = Some(candidate);
            } else if second.is_none_or(|(_, max2)| entry.count > max2) {
                second = Some(candidate);
            }
        }

        first.map(|first| Self { first, second })
    }
}
