// Core configuration types
mod core;
mod loader;

// Re-export core types
pub use core::{DominanceConfig, GraphLabels, LayersConfig, LayermapConfig, OutputConfig};

// Re-export loader functions
pub use loader::{
    discover_config, load_config, load_config_from_path, parse_and_validate_config,
    CONFIG_FILE_NAME,
};
