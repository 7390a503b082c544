pub mod errors;

pub use errors::{Error, Result, ResultExt};

use serde::{Deserialize, Serialize};

/// Layer name used for methods without a layer assignment and for method-less classes
pub const UNDEFINED_LAYER: &str = "Undefined";

/// One layer's share of an entity's behavior.
///
/// For classes `count` is a raw method count; for packages it is the mean of
/// per-class normalized shares.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CompositionEntry {
    pub layer: String,
    pub count: f64,
    /// Whether `layer` is a real entry of the layer table
    #[serde(default)]
    pub valid: bool,
    /// Presentation hue in degrees
    #[serde(default)]
    pub hue: u16,
}

impl CompositionEntry {
    /// Bare entry without derived presentation data
    pub fn new(layer: impl Into<String>, count: f64) -> Self {
        Self {
            layer: layer.into(),
            count,
            valid: false,
            hue: 0,
        }
    }

    /// The synthetic entry standing in for a class with no methods
    pub fn undefined() -> Self {
        Self::new(UNDEFINED_LAYER, 1.0)
    }
}

/// Sum of all counts in a composition vector
pub fn total_count(entries: &[CompositionEntry]) -> f64 {
    entries.iter().map(|e| e.count).sum()
}

/// Raw composition of a single class
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassComposition {
    /// Class node id
    pub class: String,
    pub bubble_data: Vec<CompositionEntry>,
}

/// Package-level aggregate consumed by the renderer
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BubbleTeaData {
    /// Package node id
    pub package: String,
    /// Zero, one or two dominant layer names
    pub dominant: Vec<String>,
    /// Averaged per-class normalized composition
    pub bubble_tea_data: Vec<CompositionEntry>,
    /// Raw per-class compositions, in layout order
    pub bubble_data: Vec<ClassComposition>,
}

impl BubbleTeaData {
    pub fn class_count(&self) -> usize {
        self.bubble_data.len()
    }

    pub fn is_cross_cutting(&self) -> bool {
        self.dominant.is_empty()
    }
}
