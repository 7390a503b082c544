//! Presentation hues for layers.
//!
//! Known layers get a fixed hue; any other name is hashed into one of 18
//! steps of 20 degrees so it keeps the same color across runs.

use crate::core::UNDEFINED_LAYER;
use std::collections::HashMap;
use xxhash_rust::xxh64::xxh64;

const HUE_STEP: u16 = 20;
const HUE_STEPS: u64 = 18;

/// Layer name to hue mapping
#[derive(Debug, Clone, PartialEq)]
pub struct HuePalette {
    known: HashMap<String, u16>,
}

impl Default for HuePalette {
    fn default() -> Self {
        let known = [
            ("Presentation Layer", 200),
            ("Service Layer", 140),
            ("Domain Layer", 60),
            ("Data Source Layer", 20),
            (UNDEFINED_LAYER, 0),
        ]
        .into_iter()
        .map(|(name, hue)| (name.to_string(), hue))
        .collect();
        Self { known }
    }
}

impl HuePalette {
    /// Default palette with configured overrides applied on top
    pub fn with_overrides(overrides: &HashMap<String, u16>) -> Self {
        let mut palette = Self::default();
        for (name, hue) in overrides {
            palette.known.insert(name.clone(), hue % 360);
        }
        palette
    }

    pub fn hue_for(&self, layer: &str) -> u16 {
        self.known
            .get(layer)
            .copied()
            .unwrap_or_else(|| hashed_hue(layer))
    }
}

fn hashed_hue(layer: &str) -> u16 {
    (xxh64(layer.as_bytes(), 0) % HUE_STEPS) as u16 * HUE_STEP
}
