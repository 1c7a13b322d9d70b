use crate::config::Config;
use crate::error::{PlanbookError, Result};
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// District
// ---------------------------------------------------------------------------

/// Tenant boundary: every goal and metric belongs to exactly one district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct District {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub primary_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_email: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl District {
    pub fn new(
        slug: impl Into<String>,
        name: impl Into<String>,
        defaults: &crate::config::DistrictDefaults,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            slug: slug.into(),
            name: name.into(),
            primary_color: defaults.primary_color.clone(),
            secondary_color: Some(defaults.secondary_color.clone()),
            logo_url: None,
            admin_email: None,
            is_public: defaults.public_dashboards,
            created_at: now,
            updated_at: now,
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn create(root: &Path, slug: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let slug = slug.into();
        paths::validate_slug(&slug)?;

        let config = Config::load(root)?;
        let dir = paths::district_dir(root, &slug);
        if dir.exists() {
            return Err(PlanbookError::DistrictExists(slug));
        }

        let district = Self::new(slug, name, &config.defaults);
        district.save(root)?;
        crate::io::ensure_dir(&paths::goals_dir(root, &district.slug))?;
        crate::io::ensure_dir(&paths::metrics_dir(root, &district.slug))?;
        Ok(district)
    }

    pub fn load(root: &Path, slug: &str) -> Result<Self> {
        let manifest = paths::district_manifest(root, slug);
        if !manifest.exists() {
            return Err(PlanbookError::DistrictNotFound(slug.to_string()));
        }
        let data = std::fs::read_to_string(&manifest)?;
        let district: District = serde_yaml::from_str(&data)?;
        Ok(district)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let manifest = paths::district_manifest(root, &self.slug);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&manifest, data.as_bytes())
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let districts_dir = paths::districts_dir(root);
        if !districts_dir.exists() {
            return Ok(Vec::new());
        }

        let mut districts = Vec::new();
        for entry in std::fs::read_dir(&districts_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                let slug = entry.file_name().to_string_lossy().into_owned();
                match Self::load(root, &slug) {
                    Ok(d) => districts.push(d),
                    Err(PlanbookError::DistrictNotFound(_)) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        districts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(districts)
    }

    /// Delete a district. Refuses when goals remain unless `cascade` is set,
    /// in which case goals and their metrics are removed with it.
    pub fn delete(root: &Path, slug: &str, cascade: bool) -> Result<()> {
        let dir = paths::district_dir(root, slug);
        if !paths::district_manifest(root, slug).exists() {
            return Err(PlanbookError::DistrictNotFound(slug.to_string()));
        }

        if !cascade && !crate::goal::Goal::list(root, slug)?.is_empty() {
            return Err(PlanbookError::DistrictNotEmpty(slug.to_string()));
        }

        std::fs::remove_dir_all(&dir)?;
        Ok(())
    }

    // ---------------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------------

    pub fn update_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }

    pub fn set_primary_color(&mut self, color: impl Into<String>) {
        self.primary_color = color.into();
        self.updated_at = Utc::now();
    }

    pub fn set_secondary_color(&mut self, color: Option<String>) {
        self.secondary_color = color;
        self.updated_at = Utc::now();
    }

    pub fn set_logo_url(&mut self, url: Option<String>) {
        self.logo_url = url;
        self.updated_at = Utc::now();
    }

    pub fn set_admin_email(&mut self, email: Option<String>) {
        self.admin_email = email;
        self.updated_at = Utc::now();
    }

    pub fn set_public(&mut self, is_public: bool) {
        self.is_public = is_public;
        self.updated_at = Utc::now();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup(dir: &TempDir) {
        Config::new("test").save(dir.path()).unwrap();
    }

    #[test]
    fn district_create_load() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        let d = District::create(dir.path(), "springfield", "Springfield USD").unwrap();
        assert_eq!(d.slug, "springfield");
        assert_eq!(d.primary_color, "#003366");
        assert!(d.is_public);

        let loaded = District::load(dir.path(), "springfield").unwrap();
        assert_eq!(loaded.name, "Springfield USD");
        assert_eq!(loaded.id, d.id);
    }

    #[test]
    fn district_create_requires_init() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            District::create(dir.path(), "springfield", "Springfield USD"),
            Err(PlanbookError::NotInitialized)
        ));
    }

    #[test]
    fn district_duplicate_fails() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        District::create(dir.path(), "springfield", "Springfield USD").unwrap();
        assert!(matches!(
            District::create(dir.path(), "springfield", "Again"),
            Err(PlanbookError::DistrictExists(_))
        ));
    }

    #[test]
    fn district_rejects_bad_slug() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        assert!(matches!(
            District::create(dir.path(), "Springfield USD", "Springfield"),
            Err(PlanbookError::InvalidSlug(_))
        ));
    }

    #[test]
    fn district_list_sorted_by_name() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        District::create(dir.path(), "zzz", "Zenith USD").unwrap();
        District::create(dir.path(), "aaa", "Aurora USD").unwrap();

        let names: Vec<String> = District::list(dir.path())
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["Aurora USD", "Zenith USD"]);
    }

    #[test]
    fn delete_refuses_when_goals_exist() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        District::create(dir.path(), "springfield", "Springfield USD").unwrap();
        crate::goal::Goal::create(dir.path(), "springfield", None, "Achievement").unwrap();

        assert!(matches!(
            District::delete(dir.path(), "springfield", false),
            Err(PlanbookError::DistrictNotEmpty(_))
        ));

        District::delete(dir.path(), "springfield", true).unwrap();
        assert!(matches!(
            District::load(dir.path(), "springfield"),
            Err(PlanbookError::DistrictNotFound(_))
        ));
    }

    #[test]
    fn update_branding() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        let mut d = District::create(dir.path(), "springfield", "Springfield USD").unwrap();
        d.set_primary_color("#112233");
        d.set_public(false);
        d.save(dir.path()).unwrap();

        let loaded = District::load(dir.path(), "springfield").unwrap();
        assert_eq!(loaded.primary_color, "#112233");
        assert!(!loaded.is_public);
    }
}
