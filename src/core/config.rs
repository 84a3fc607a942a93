use crate::core::error::ShelfError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// User configuration loaded from `.shelf/config.toml`.
///
/// Supplies CLI paging defaults only. The catalog service never reads it;
/// explicit command-line flags always win over configured values.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ShelfConfig {
    /// Default page size for `list` and `search` (falls back to 20).
    pub page_size: Option<u32>,
    /// Default sort spec, e.g. "id,desc" or "name".
    pub sort: Option<String>,
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(".shelf").join("config.toml")
}

/// Load config from the store root. No config file = defaults (not an error).
pub fn load_config(root: &Path) -> Result<ShelfConfig, ShelfError> {
    let path = config_path(root);
    if path.exists() {
        let content = fs::read_to_string(&path).map_err(ShelfError::IoError)?;
        let config: ShelfConfig =
            toml::from_str(&content).map_err(|e| ShelfError::ValidationError(e.to_string()))?;
        return Ok(config);
    }
    Ok(ShelfConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_config_is_defaults() {
        let tmp = tempdir().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert!(config.page_size.is_none());
        assert!(config.sort.is_none());
    }

    #[test]
    fn test_load_config_values() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join(".shelf");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), "page_size = 50\nsort = \"name,asc\"\n").unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.page_size, Some(50));
        assert_eq!(config.sort.as_deref(), Some("name,asc"));
    }

    #[test]
    fn test_malformed_config_is_rejected() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join(".shelf");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), "page_size = \"lots\"\n").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }
}
