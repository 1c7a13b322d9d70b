use crate::error::{PlanbookError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const PLANBOOK_DIR: &str = ".planbook";
pub const DISTRICTS_DIR: &str = ".planbook/districts";

pub const CONFIG_FILE: &str = ".planbook/config.yaml";

pub const DISTRICT_MANIFEST: &str = "district.yaml";
pub const GOALS_DIR: &str = "goals";
pub const METRICS_DIR: &str = "metrics";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn planbook_dir(root: &Path) -> PathBuf {
    root.join(PLANBOOK_DIR)
}

pub fn districts_dir(root: &Path) -> PathBuf {
    root.join(DISTRICTS_DIR)
}

pub fn district_dir(root: &Path, slug: &str) -> PathBuf {
    districts_dir(root).join(slug)
}

pub fn district_manifest(root: &Path, slug: &str) -> PathBuf {
    district_dir(root, slug).join(DISTRICT_MANIFEST)
}

pub fn goals_dir(root: &Path, slug: &str) -> PathBuf {
    district_dir(root, slug).join(GOALS_DIR)
}

pub fn goal_path(root: &Path, slug: &str, id: Uuid) -> PathBuf {
    goals_dir(root, slug).join(format!("{id}.yaml"))
}

pub fn metrics_dir(root: &Path, slug: &str) -> PathBuf {
    district_dir(root, slug).join(METRICS_DIR)
}

pub fn metric_path(root: &Path, slug: &str, id: Uuid) -> PathBuf {
    metrics_dir(root, slug).join(format!("{id}.yaml"))
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

// ---------------------------------------------------------------------------
// Slug validation
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.len() > 64 || !slug_re().is_match(slug) {
        return Err(PlanbookError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
