//! Layout ordering of compositions.
//!
//! Compositions with the same dominant set are ordered by how much of their
//! total the dominant set holds (higher first). Otherwise they are ordered by
//! dominance score, lower first: a single layer scores its table index, a
//! pair the mean of both indices, and cross-cutting compositions score 100 so
//! they sort last.

use super::dominance::resolve_dominant_layers_with;
use super::LayerContext;
use crate::config::DominanceConfig;
use crate::core::{total_count, CompositionEntry};
use crate::layers::LayerTable;
use std::cmp::Ordering;

/// Score of a composition without dominant layers
pub const CROSS_CUTTING_SCORE: f64 = 100.0;

/// Orders composition vectors for layout
#[derive(Debug, Clone, Copy)]
pub struct CompositionComparator<'a> {
    table: &'a LayerTable,
    dominance: &'a DominanceConfig,
}

impl<'a> CompositionComparator<'a> {
    pub fn new(table: &'a LayerTable, dominance: &'a DominanceConfig) -> Self {
        Self { table, dominance }
    }

    pub fn compare(&self, a: &[CompositionEntry], b: &[CompositionEntry]) -> Ordering {
        let dominant_a = resolve_dominant_layers_with(a, self.table, self.dominance);
        let dominant_b = resolve_dominant_layers_with(b, self.table, self.dominance);

        // Equal dominant sets have equal scores, so this falls through to the
        // proportion. Distinct sets with equal scores (unknown layers) also use
        // the proportion so sorting sees a consistent total order.
        let score_a = self.dominance_score(&dominant_a);
        let score_b = self.dominance_score(&dominant_b);
        score_a.total_cmp(&score_b).then_with(|| {
            dominant_proportion(b, &dominant_b).total_cmp(&dominant_proportion(a, &dominant_a))
        })
    }

    /// Mean table index of the dominant layers; unknown layers count as -1
    pub fn dominance_score(&self, dominant: &[String]) -> f64 {
        if dominant.is_empty() {
            return CROSS_CUTTING_SCORE;
        }
        let sum: i64 = dominant.iter().map(|l| self.table.signed_index(l)).sum();
        sum as f64 / dominant.len() as f64
    }
}

/// Share of the vector's total held by the dominant layers.
///
/// Class vectors always total at least 1, so the division is well defined for
/// every vector produced by the analyzer.
pub fn dominant_proportion(vector: &[CompositionEntry], dominant: &[String]) -> f64 {
    let held: f64 = vector
        .iter()
        .filter(|e| dominant.contains(&e.layer))
        .map(|e| e.count)
        .sum();
    held / total_count(vector)
}

/// Comparator closure bound to one run's table and thresholds
pub fn compare_compositions(
    ctx: &LayerContext,
) -> impl Fn(&[CompositionEntry], &[CompositionEntry]) -> Ordering + '_ {
    let comparator = CompositionComparator::new(&ctx.table, &ctx.dominance);
    move |a, b| comparator.compare(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(entries: &[(&str, f64)]) -> Vec<CompositionEntry> {
        entries
            .iter()
            .map(|(layer, count)| CompositionEntry::new(*layer, *count))
            .collect()
    }

    const P: &str = "Presentation Layer";
    const S: &str = "Service Layer";
    const D: &str = "Domain Layer";
    const DS: &str = "Data Source Layer";

    #[test]
    fn test_same_dominant_orders_by_proportion_descending() {
        let ctx = LayerContext::default();
        let cmp = compare_compositions(&ctx);
        let pure = vector(&[(P, 5.0)]);
        let mixed = vector(&[(P, 6.0), (S, 1.0)]);

        assert_eq!(cmp(&pure, &mixed), Ordering::Less);
        assert_eq!(cmp(&mixed, &pure), Ordering::Greater);
        assert_eq!(cmp(&pure, &pure), Ordering::Equal);
    }

    #[test]
    fn test_different_dominant_orders_by_layer_index() {
        let ctx = LayerContext::default();
        let cmp = compare_compositions(&ctx);
        let presentation = vector(&[(P, 1.0)]);
        let service_domain = vector(&[(S, 3.0), (D, 2.0)]);
        let data = vector(&[(DS, 4.0)]);

        assert_eq!(cmp(&presentation, &service_domain), Ordering::Less);
        assert_eq!(cmp(&service_domain, &data), Ordering::Less);
        assert_eq!(cmp(&data, &presentation), Ordering::Greater);
    }

    #[test]
    fn test_cross_cutting_sorts_last() {
        let ctx = LayerContext::default();
        let cmp = compare_compositions(&ctx);
        let cross = vector(&[(P, 4.0), (D, 4.0)]);
        let data = vector(&[(DS, 1.0)]);
        assert_eq!(cmp(&data, &cross), Ordering::Less);
    }

    #[test]
    fn test_dominance_score() {
        let table = LayerTable::default();
        let dominance = DominanceConfig::default();
        let comparator = CompositionComparator::new(&table, &dominance);
        assert_eq!(comparator.dominance_score(&[]), CROSS_CUTTING_SCORE);
        assert_eq!(comparator.dominance_score(&[S.to_string()]), 2.0);
        assert_eq!(
            comparator.dominance_score(&[S.to_string(), D.to_string()]),
            2.5
        );
    }

    #[test]
    fn test_dominant_proportion() {
        let v = vector(&[(P, 3.0), (S, 2.0), (D, 5.0)]);
        assert_eq!(dominant_proportion(&v, &[P.to_string(), S.to_string()]), 0.5);
        assert_eq!(dominant_proportion(&v, &[]), 0.0);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let ctx = LayerContext::default();
        let cmp = compare_compositions(&ctx);
        let mut classes = vec![
            vector(&[(DS, 2.0)]),
            vector(&[(P, 3.0), (D, 3.0)]),
            vector(&[(P, 6.0), (S, 1.0)]),
            vector(&[(S, 2.0), (D, 2.0)]),
            vector(&[(P, 2.0)]),
        ];
        classes.sort_by(|a, b| cmp(a, b));
        let once = classes.clone();
        classes.sort_by(|a, b| cmp(a, b));
        assert_eq!(classes, once);
        assert_eq!(classes[0], vector(&[(P, 2.0)]));
        assert_eq!(classes[4], vector(&[(P, 3.0), (D, 3.0)]));
    }
}
