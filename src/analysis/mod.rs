//! Layer composition analysis.
//!
//! The pipeline runs leaf-first:
//!
//! 1. [`composition`] counts each class's methods per assigned layer.
//! 2. [`dominance`] picks the zero, one or two layers that characterize a
//!    composition vector.
//! 3. [`package`] averages class compositions into a package composition.
//! 4. [`comparator`] orders classes and packages for layout.
//! 5. [`bucketing`] groups packages by single layer, adjacent layer pair or
//!    cross-cutting.
//!
//! [`pipeline::LayerAnalysis`] ties the stages together over a whole graph.

pub mod bucketing;
pub mod comparator;
pub mod composition;
pub mod dominance;
pub mod package;
pub mod pipeline;

pub use bucketing::{bucket_keys, bucket_packages_by_layer, BucketKey, LayerBucket, LayerBuckets};
pub use comparator::{compare_compositions, CompositionComparator};
pub use composition::analyze_class;
pub use dominance::{resolve_dominant_layers, resolve_dominant_layers_with};
pub use package::{aggregate_package, average_compositions, normalize_composition};
pub use pipeline::{ArchitectureReport, LayerAnalysis, ReportSummary};

use crate::config::{DominanceConfig, GraphLabels, LayermapConfig};
use crate::core::CompositionEntry;
use crate::layers::{HuePalette, LayerTable};

/// Settings for one analysis run, built once and read by every stage
#[derive(Debug, Clone)]
pub struct LayerContext {
    pub table: LayerTable,
    pub labels: GraphLabels,
    pub dominance: DominanceConfig,
    pub hues: HuePalette,
}

impl LayerContext {
    /// Context with default labels, thresholds and hues
    pub fn new(table: LayerTable) -> Self {
        Self {
            table,
            labels: GraphLabels::default(),
            dominance: DominanceConfig::default(),
            hues: HuePalette::default(),
        }
    }

    pub fn from_config(table: LayerTable, config: &LayermapConfig) -> Self {
        Self {
            table,
            labels: config.labels.clone(),
            dominance: config.dominance(),
            hues: config.hue_palette(),
        }
    }

    /// Dominant layers of `vector` under this run's table and thresholds
    pub fn dominant_layers(&self, vector: &[CompositionEntry]) -> Vec<String> {
        resolve_dominant_layers_with(vector, &self.table, &self.dominance)
    }

    /// Entry with `valid` and `hue` derived from the table and palette
    pub fn entry(&self, layer: impl Into<String>, count: f64) -> CompositionEntry {
        let layer = layer.into();
        CompositionEntry {
            valid: self.table.is_valid(&layer),
            hue: self.hues.hue_for(&layer),
            layer,
            count,
        }
    }
}

impl Default for LayerContext {
    fn default() -> Self {
        Self::new(LayerTable::default())
    }
}
