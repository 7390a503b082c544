//! Grouping of packages into layer buckets.
//!
//! Valid keys are every single layer, every adjacent pair of consecutive
//! layers and the empty cross-cutting key. A package lands in the bucket whose
//! key equals its dominant layers sorted into table order; anything else is
//! demoted to cross-cutting.

use super::comparator::CompositionComparator;
use super::LayerContext;
use crate::core::BubbleTeaData;
use crate::layers::LayerTable;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Canonical bucket key: zero, one or two layer names in table order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BucketKey(Vec<String>);

impl BucketKey {
    pub fn cross_cutting() -> Self {
        Self(Vec::new())
    }

    pub fn single(layer: impl Into<String>) -> Self {
        Self(vec![layer.into()])
    }

    pub fn pair(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self(vec![first.into(), second.into()])
    }

    /// Key for a dominant set, sorted into table order (unknown layers first)
    pub fn from_dominant(dominant: &[String], table: &LayerTable) -> Self {
        let mut layers = dominant.to_vec();
        layers.sort_by_key(|l| table.signed_index(l));
        Self(layers)
    }

    pub fn layers(&self) -> &[String] {
        &self.0
    }

    pub fn is_cross_cutting(&self) -> bool {
        self.0.is_empty()
    }

    /// Human readable name for reports
    pub fn label(&self) -> String {
        match self.0.as_slice() {
            [] => "Cross-cutting".to_string(),
            [single] => single.clone(),
            layers => layers.join(" + "),
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(","))
    }
}

/// Packages sharing one bucket key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerBucket {
    pub key: BucketKey,
    pub packages: Vec<BubbleTeaData>,
}

impl LayerBucket {
    fn empty(key: BucketKey) -> Self {
        Self {
            key,
            packages: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// Every bucket of one run: cross-cutting first, then layers and adjacent
/// pairs in table order (`L1`, `L1+L2`, `L2`, ...). Empty buckets are kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LayerBuckets {
    buckets: Vec<LayerBucket>,
    #[serde(skip)]
    positions: HashMap<BucketKey, usize>,
}

impl LayerBuckets {
    fn for_table(table: &LayerTable) -> Self {
        let buckets: Vec<LayerBucket> = bucket_keys(table)
            .into_iter()
            .map(LayerBucket::empty)
            .collect();
        let positions = buckets
            .iter()
            .enumerate()
            .map(|(i, b)| (b.key.clone(), i))
            .collect();
        Self { buckets, positions }
    }

    pub fn get(&self, key: &BucketKey) -> Option<&LayerBucket> {
        self.positions.get(key).map(|&i| &self.buckets[i])
    }

    pub fn cross_cutting(&self) -> &[BubbleTeaData] {
        self.get(&BucketKey::cross_cutting())
            .map(|b| b.packages.as_slice())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayerBucket> {
        self.buckets.iter()
    }

    /// Buckets holding at least one package
    pub fn occupied(&self) -> impl Iterator<Item = &LayerBucket> {
        self.buckets.iter().filter(|b| !b.is_empty())
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total_packages(&self) -> usize {
        self.buckets.iter().map(|b| b.packages.len()).sum()
    }
}

/// All valid keys for `table`, cross-cutting first
pub fn bucket_keys(table: &LayerTable) -> Vec<BucketKey> {
    let mut keys = Vec::with_capacity(table.len() * 2);
    keys.push(BucketKey::cross_cutting());
    let mut pairs = table.adjacent_pairs();
    for layer in table.layers() {
        keys.push(BucketKey::single(layer.as_str()));
        if let Some((upper, lower)) = pairs.next() {
            keys.push(BucketKey::pair(upper, lower));
        }
    }
    keys
}

/// Place every aggregate into exactly one bucket.
///
/// Packages whose dominant set matches no key get `dominant = []` and go to
/// the cross-cutting bucket. Within a bucket, packages are ordered by their
/// averaged vectors.
pub fn bucket_packages_by_layer(aggregates: Vec<BubbleTeaData>, ctx: &LayerContext) -> LayerBuckets {
    let mut buckets = LayerBuckets::for_table(&ctx.table);
    let cross_cutting = buckets.positions[&BucketKey::cross_cutting()];

    for mut aggregate in aggregates {
        let key = BucketKey::from_dominant(&aggregate.dominant, &ctx.table);
        let slot = match buckets.positions.get(&key) {
            Some(&slot) => slot,
            None => {
                tracing::debug!(
                    package = %aggregate.package,
                    dominant = %key,
                    "No bucket for dominant layers, treating package as cross-cutting"
                );
                aggregate.dominant.clear();
                cross_cutting
            }
        };
        buckets.buckets[slot].packages.push(aggregate);
    }

    let comparator = CompositionComparator::new(&ctx.table, &ctx.dominance);
    for bucket in &mut buckets.buckets {
        bucket
            .packages
            .sort_by(|a, b| comparator.compare(&a.bubble_tea_data, &b.bubble_tea_data));
    }

    buckets
}
