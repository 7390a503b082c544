use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::layers::HuePalette;

/// Root configuration structure for layermap
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LayermapConfig {
    /// Explicit layer ordering
    #[serde(default)]
    pub layers: Option<LayersConfig>,

    /// Graph vocabulary (node and edge labels, property keys)
    #[serde(default)]
    pub labels: GraphLabels,

    /// Dominance heuristic tunables
    #[serde(default)]
    pub dominance: Option<DominanceConfig>,

    /// Hue overrides keyed by layer name
    #[serde(default)]
    pub hues: HashMap<String, u16>,

    /// Output configuration
    #[serde(default)]
    pub output: Option<OutputConfig>,
}

impl LayermapConfig {
    /// Configured layer order, if any
    pub fn layer_order(&self) -> Option<&[String]> {
        self.layers
            .as_ref()
            .and_then(|l| l.order.as_deref())
            .filter(|order| !order.is_empty())
    }

    pub fn dominance(&self) -> DominanceConfig {
        self.dominance.clone().unwrap_or_default()
    }

    pub fn hue_palette(&self) -> HuePalette {
        HuePalette::with_overrides(&self.hues)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LayersConfig {
    /// Layer names from the topmost (presentation) to the bottom layer
    #[serde(default)]
    pub order: Option<Vec<String>>,
}

/// Labels and property keys the analysis reads from the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphLabels {
    /// Node label of packages
    pub package: String,
    /// Node label of classes
    pub class: String,
    /// Node label of layer marker nodes
    pub layer_marker: String,
    /// Edge label from a package to the classes it contains
    pub contains: String,
    /// Edge label from a class to its methods
    pub methods: String,
    /// Edge label of allowed dependencies between layer markers
    pub layer_dependency: String,
    /// Method property holding the assigned layer
    pub layer_property: String,
    /// Property holding a node's display name
    pub name_property: String,
}

impl Default for GraphLabels {
    fn default() -> Self {
        Self {
            package: "Container".to_string(),
            class: "Structure".to_string(),
            layer_marker: "Grouping".to_string(),
            contains: "contains".to_string(),
            methods: "hasScript".to_string(),
            layer_dependency: "allowedDependency".to_string(),
            layer_property: "layer".to_string(),
            name_property: "simpleName".to_string(),
        }
    }
}

/// Dominance heuristic tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DominanceConfig {
    /// A top layer dominates outright when its share exceeds `ratio` times the runner-up
    pub ratio: f64,
    /// Two layers may be co-dominant only when their index distance is below this
    pub adjacency_distance: u32,
}

impl Default for DominanceConfig {
    fn default() -> Self {
        Self {
            ratio: 1.5,
            adjacency_distance: 2,
        }
    }
}

impl DominanceConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.ratio.is_finite() || self.ratio < 1.0 {
            return Err(format!(
                "dominance.ratio must be a finite number >= 1.0, got {}",
                self.ratio
            ));
        }
        if self.adjacency_distance == 0 {
            return Err("dominance.adjacency_distance must be at least 1".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// "terminal" or "json"
    pub default_format: Option<String>,
}
