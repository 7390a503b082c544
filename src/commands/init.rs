use crate::config::CONFIG_FILE_NAME;
use crate::io;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = r#"# Layermap Configuration

# Explicit layer order, top to bottom. When omitted, the order is derived
# from allowed-dependency edges in the graph, or the built-in default.
# [layers]
# order = ["Presentation Layer", "Service Layer", "Domain Layer", "Data Source Layer"]

[labels]
package = "Container"
class = "Structure"
layer_marker = "Grouping"
contains = "contains"
methods = "hasScript"
layer_dependency = "allowedDependency"
layer_property = "layer"
name_property = "simpleName"

[dominance]
# A layer dominates outright when it exceeds the runner-up by this factor
ratio = 1.5
# Two layers share dominance only when their distance in the order is below this
adjacency_distance = 2

# Hue overrides in degrees, keyed by layer name
# [hues]
# "Presentation Layer" = 200

[output]
default_format = "terminal"
"#;

/// Write the default configuration into the working directory
pub fn init_config(force: bool) -> Result<()> {
    let path = init_config_in(Path::new("."), force)?;
    println!("Created {} configuration file", path.display());
    Ok(())
}

pub fn init_config_in(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG)?;
    log::info!("Wrote default configuration to {}", config_path.display());
    Ok(config_path)
}
