//! `.layermap.toml` lookup and parsing.
//!
//! Discovery walks from the working directory towards the filesystem root and
//! takes the first config file that parses. An unreadable or malformed file
//! found along the way is logged and skipped.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::core::{DominanceConfig, LayermapConfig};
use crate::core::{Error, Result};

/// File name searched for in the working directory and its ancestors
pub const CONFIG_FILE_NAME: &str = ".layermap.toml";

/// How many directories discovery inspects, the start directory included
const MAX_SEARCH_DEPTH: usize = 10;

/// Parse a config, replacing out-of-range dominance tunables with defaults
pub fn parse_and_validate_config(contents: &str) -> std::result::Result<LayermapConfig, String> {
    let mut config = toml::from_str::<LayermapConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))?;

    if let Some(Err(e)) = config.dominance.as_ref().map(DominanceConfig::validate) {
        log::warn!("Invalid [dominance] settings ({}), using defaults", e);
        config.dominance = Some(DominanceConfig::default());
    }

    Ok(config)
}

/// Config file in `dir`, if one exists and parses
fn config_in_dir(dir: &Path) -> Option<(PathBuf, LayermapConfig)> {
    let path = dir.join(CONFIG_FILE_NAME);
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            log::warn!("Skipping unreadable {}: {}", path.display(), e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => Some((path, config)),
        Err(e) => {
            log::warn!("Skipping {}: {}", path.display(), e);
            None
        }
    }
}

/// Nearest usable config file at or above `start`, with its path
pub fn discover_config(start: &Path) -> Option<(PathBuf, LayermapConfig)> {
    start
        .ancestors()
        .take(MAX_SEARCH_DEPTH)
        .find_map(config_in_dir)
}

/// Config for the working directory, or the defaults when none is found
pub fn load_config() -> LayermapConfig {
    let cwd = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!("Cannot determine working directory ({}), using default config", e);
            return LayermapConfig::default();
        }
    };

    match discover_config(&cwd) {
        Some((path, config)) => {
            log::debug!("Loaded config from {}", path.display());
            config
        }
        None => {
            log::debug!("No {} found, using default config", CONFIG_FILE_NAME);
            LayermapConfig::default()
        }
    }
}

/// Load an explicitly requested config file. Unlike [`load_config`], a
/// missing or malformed file is an error.
pub fn load_config_from_path(path: &Path) -> Result<LayermapConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::file_system("Failed to read config file", path, e))?;
    parse_and_validate_config(&contents).map_err(Error::Configuration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config = parse_and_validate_config(indoc! {r#"
            [layers]
            order = ["UI", "Logic", "Storage"]

            [labels]
            class = "Class"
            methods = "declares"

            [dominance]
            ratio = 2.0

            [hues]
            UI = 180
        "#})
        .unwrap();

        assert_eq!(
            config.layer_order(),
            Some(&["UI".to_string(), "Logic".into(), "Storage".into()][..])
        );
        assert_eq!(config.labels.class, "Class");
        assert_eq!(config.labels.methods, "declares");
        assert_eq!(config.labels.contains, "contains");
        assert_eq!(config.dominance().ratio, 2.0);
        assert_eq!(config.dominance().adjacency_distance, 2);
        assert_eq!(config.hue_palette().hue_for("UI"), 180);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_and_validate_config("").unwrap();
        assert!(config.layer_order().is_none());
        assert_eq!(config.dominance(), DominanceConfig::default());
        assert_eq!(config.labels.package, "Container");
    }

    #[test]
    fn test_invalid_dominance_falls_back() {
        let config = parse_and_validate_config("[dominance]\nratio = 0.5\n").unwrap();
        assert_eq!(config.dominance(), DominanceConfig::default());
    }

    #[test]
    fn test_malformed_toml_is_error() {
        assert!(parse_and_validate_config("[layers\norder = 1").is_err());
    }

    #[test]
    fn test_discover_config_in_ancestor() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.path().join(CONFIG_FILE_NAME), "[layers]\norder = [\"Top\"]\n").unwrap();

        let (path, config) = discover_config(&nested).unwrap();
        assert_eq!(path, root.path().join(CONFIG_FILE_NAME));
        assert_eq!(config.layer_order().map(|o| o.len()), Some(1));
    }

    #[test]
    fn test_discover_skips_malformed_config() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("inner");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join(CONFIG_FILE_NAME), "[layers\n").unwrap();
        fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "[output]\ndefault_format = \"json\"\n",
        )
        .unwrap();

        let (path, _) = discover_config(&nested).unwrap();
        assert_eq!(path, root.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_discover_config_respects_depth() {
        let root = TempDir::new().unwrap();
        let deep = (0..MAX_SEARCH_DEPTH)
            .fold(root.path().to_path_buf(), |dir, i| dir.join(format!("d{}", i)));
        fs::create_dir_all(&deep).unwrap();
        fs::write(root.path().join(CONFIG_FILE_NAME), "").unwrap();

        assert!(discover_config(&deep).is_none());
        assert!(discover_config(deep.parent().unwrap()).is_some());
    }

    #[test]
    fn test_load_config_from_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[layers]\norder = [\"A\", \"B\"]\n").unwrap();

        let config = load_config_from_path(&path).unwrap();
        assert_eq!(config.layer_order().map(|o| o.len()), Some(2));

        let missing = load_config_from_path(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(Error::FileSystem { .. })));
    }
}
