//! CLI command implementations.
//!
//! - **analyze**: load a graph export, run the layer analysis, write the report
//! - **init**: write a default `.layermap.toml`

pub mod analyze;
pub mod init;

pub use analyze::{analyze_graph, handle_analyze, AnalyzeConfig};
pub use init::{init_config, init_config_in};
