use crate::error::{PlanbookError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// DistrictDefaults
// ---------------------------------------------------------------------------

/// Branding applied to newly created districts unless overridden.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistrictDefaults {
    #[serde(default = "default_primary_color")]
    pub primary_color: String,
    #[serde(default = "default_secondary_color")]
    pub secondary_color: String,
    #[serde(default = "default_public")]
    pub public_dashboards: bool,
}

fn default_primary_color() -> String {
    "#003366".to_string()
}

fn default_secondary_color() -> String {
    "#0099CC".to_string()
}

fn default_public() -> bool {
    true
}

impl Default for DistrictDefaults {
    fn default() -> Self {
        Self {
            primary_color: default_primary_color(),
            secondary_color: default_secondary_color(),
            public_dashboards: default_public(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub organization: String,
    #[serde(default)]
    pub defaults: DistrictDefaults,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(organization: impl Into<String>) -> Self {
        Self {
            version: 1,
            organization: organization.into(),
            defaults: DistrictDefaults::default(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(PlanbookError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&data)?;
        Ok(config)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn config_round_trip() {
        let dir = TempDir::new().unwrap();
        let config = Config::new("Springfield Public Schools");
        config.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.organization, "Springfield Public Schools");
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.defaults.primary_color, "#003366");
        assert!(loaded.defaults.public_dashboards);
    }

    #[test]
    fn load_fails_when_not_initialized() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(PlanbookError::NotInitialized)
        ));
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let dir = TempDir::new().unwrap();
        let path = paths::config_path(dir.path());
        crate::io::atomic_write(&path, b"organization: Minimal District\n").unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.defaults.secondary_color, "#0099CC");
    }
}
