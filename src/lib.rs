// Export modules for library usage
pub mod analysis;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod graph;
pub mod io;
pub mod layers;
pub mod observability;

// Re-export commonly used types
pub use crate::core::{
    BubbleTeaData, ClassComposition, CompositionEntry, Error, Result, UNDEFINED_LAYER,
};

pub use crate::graph::{load_graph, parse_graph, Edge, Graph, GraphQuery, Node};

pub use crate::layers::{build_layer_table, HuePalette, LayerSource, LayerTable, DEFAULT_LAYERS};

pub use crate::analysis::{
    aggregate_package, analyze_class, bucket_packages_by_layer, compare_compositions,
    resolve_dominant_layers, ArchitectureReport, BucketKey, LayerAnalysis, LayerBuckets,
    LayerContext,
};

pub use crate::config::{load_config, LayermapConfig};

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};
