use crate::error::{PlanbookError, Result};
use crate::paths;
use crate::types::MetricType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// SurveyPoint
// ---------------------------------------------------------------------------

/// One year of survey results attached to a survey metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyPoint {
    pub year: i32,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

// ---------------------------------------------------------------------------
// Metric
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub id: Uuid,
    pub goal_id: Uuid,
    pub name: String,
    pub metric_type: MetricType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default)]
    pub display_order: u32,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative_text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub survey_data: Vec<SurveyPoint>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Metric {
    pub fn new(goal_id: Uuid, name: impl Into<String>, metric_type: MetricType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            goal_id,
            name: name.into(),
            metric_type,
            current_value: None,
            target_value: None,
            unit: None,
            display_order: 0,
            is_primary: false,
            narrative_text: None,
            survey_data: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    /// Create a metric on an existing goal. The new metric lands at the end of
    /// the goal's display order.
    pub fn create(
        root: &Path,
        district_slug: &str,
        goal_id: Uuid,
        name: impl Into<String>,
        metric_type: MetricType,
    ) -> Result<Self> {
        crate::goal::Goal::load(root, district_slug, goal_id)?;

        let mut metric = Self::new(goal_id, name, metric_type);
        metric.display_order = Self::list_for_goal(root, district_slug, goal_id)?.len() as u32;
        metric.save(root, district_slug)?;
        Ok(metric)
    }

    pub fn load(root: &Path, district_slug: &str, id: Uuid) -> Result<Self> {
        let path = paths::metric_path(root, district_slug, id);
        if !path.exists() {
            return Err(PlanbookError::MetricNotFound(id.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        let metric: Metric = serde_yaml::from_str(&data)?;
        Ok(metric)
    }

    pub fn save(&self, root: &Path, district_slug: &str) -> Result<()> {
        let path = paths::metric_path(root, district_slug, self.id);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// All metrics of a district, ordered by display order then name.
    pub fn list(root: &Path, district_slug: &str) -> Result<Vec<Self>> {
        let dir = paths::metrics_dir(root, district_slug);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut metrics = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.path().extension().is_some_and(|e| e == "yaml") {
                let data = std::fs::read_to_string(entry.path())?;
                let metric: Metric = serde_yaml::from_str(&data)?;
                metrics.push(metric);
            }
        }
        metrics.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(metrics)
    }

    pub fn list_for_goal(root: &Path, district_slug: &str, goal_id: Uuid) -> Result<Vec<Self>> {
        let mut metrics = Self::list(root, district_slug)?;
        metrics.retain(|m| m.goal_id == goal_id);
        Ok(metrics)
    }

    pub fn delete(root: &Path, district_slug: &str, id: Uuid) -> Result<()> {
        let path = paths::metric_path(root, district_slug, id);
        if !path.exists() {
            return Err(PlanbookError::MetricNotFound(id.to_string()));
        }
        std::fs::remove_file(&path)?;
        Ok(())
    }

    /// Replace the display order of a goal's metrics with `ordered`. Every
    /// metric currently attached to the goal must appear exactly once.
    pub fn reorder(
        root: &Path,
        district_slug: &str,
        goal_id: Uuid,
        ordered: &[Uuid],
    ) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for id in ordered {
            if !seen.insert(*id) {
                return Err(PlanbookError::InvalidMetricOrder(format!(
                    "duplicate metric in order list: '{id}'"
                )));
            }
        }

        let existing = Self::list_for_goal(root, district_slug, goal_id)?;
        let existing_ids: std::collections::HashSet<Uuid> =
            existing.iter().map(|m| m.id).collect();

        for id in ordered {
            if !existing_ids.contains(id) {
                return Err(PlanbookError::InvalidMetricOrder(format!(
                    "'{id}' is not attached to this goal"
                )));
            }
        }
        for m in &existing {
            if !seen.contains(&m.id) {
                return Err(PlanbookError::InvalidMetricOrder(format!(
                    "missing metric in order list: '{}'",
                    m.id
                )));
            }
        }

        for (position, id) in ordered.iter().enumerate() {
            let mut metric = Self::load(root, district_slug, *id)?;
            metric.display_order = position as u32;
            metric.updated_at = Utc::now();
            metric.save(root, district_slug)?;
        }
        Ok(())
    }

    // ---------------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------------

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }

    pub fn set_metric_type(&mut self, metric_type: MetricType) {
        self.metric_type = metric_type;
        self.updated_at = Utc::now();
    }

    pub fn set_values(&mut self, current: Option<f64>, target: Option<f64>) {
        self.current_value = current;
        self.target_value = target;
        self.updated_at = Utc::now();
    }

    pub fn set_unit(&mut self, unit: Option<String>) {
        self.unit = unit;
        self.updated_at = Utc::now();
    }

    pub fn set_primary(&mut self, is_primary: bool) {
        self.is_primary = is_primary;
        self.updated_at = Utc::now();
    }

    pub fn set_narrative(&mut self, text: Option<String>) {
        self.narrative_text = text;
        self.updated_at = Utc::now();
    }

    pub fn set_survey_data(&mut self, points: Vec<SurveyPoint>) {
        self.survey_data = points;
        self.updated_at = Utc::now();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::district::District;
    use crate::goal::Goal;
    use tempfile::TempDir;

    fn setup(dir: &TempDir) -> Goal {
        Config::new("test").save(dir.path()).unwrap();
        District::create(dir.path(), "springfield", "Springfield USD").unwrap();
        Goal::create(dir.path(), "springfield", None, "Achievement").unwrap()
    }

    #[test]
    fn metric_create_load() {
        let dir = TempDir::new().unwrap();
        let goal = setup(&dir);

        let mut metric = Metric::create(
            dir.path(),
            "springfield",
            goal.id,
            "Reading Proficiency",
            MetricType::Percent,
        )
        .unwrap();
        metric.set_values(Some(72.0), Some(80.0));
        metric.set_unit(Some("%".to_string()));
        metric.save(dir.path(), "springfield").unwrap();

        let loaded = Metric::load(dir.path(), "springfield", metric.id).unwrap();
        assert_eq!(loaded.name, "Reading Proficiency");
        assert_eq!(loaded.current_value, Some(72.0));
        assert_eq!(loaded.unit.as_deref(), Some("%"));
    }

    #[test]
    fn metric_requires_existing_goal() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        assert!(matches!(
            Metric::create(
                dir.path(),
                "springfield",
                Uuid::new_v4(),
                "Ghost",
                MetricType::Number
            ),
            Err(PlanbookError::GoalNotFound(_))
        ));
    }

    #[test]
    fn new_metrics_append_to_display_order() {
        let dir = TempDir::new().unwrap();
        let goal = setup(&dir);

        let a = Metric::create(dir.path(), "springfield", goal.id, "A", MetricType::Percent)
            .unwrap();
        let b = Metric::create(dir.path(), "springfield", goal.id, "B", MetricType::Rating)
            .unwrap();

        assert_eq!(a.display_order, 0);
        assert_eq!(b.display_order, 1);
    }

    #[test]
    fn reorder_basic() {
        let dir = TempDir::new().unwrap();
        let goal = setup(&dir);

        let a = Metric::create(dir.path(), "springfield", goal.id, "A", MetricType::Percent)
            .unwrap();
        let b = Metric::create(dir.path(), "springfield", goal.id, "B", MetricType::Percent)
            .unwrap();
        let c = Metric::create(dir.path(), "springfield", goal.id, "C", MetricType::Percent)
            .unwrap();

        Metric::reorder(dir.path(), "springfield", goal.id, &[c.id, a.id, b.id]).unwrap();

        let names: Vec<String> = Metric::list_for_goal(dir.path(), "springfield", goal.id)
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn reorder_rejects_missing_metric() {
        let dir = TempDir::new().unwrap();
        let goal = setup(&dir);

        let a = Metric::create(dir.path(), "springfield", goal.id, "A", MetricType::Percent)
            .unwrap();
        Metric::create(dir.path(), "springfield", goal.id, "B", MetricType::Percent).unwrap();

        let err = Metric::reorder(dir.path(), "springfield", goal.id, &[a.id]).unwrap_err();
        assert!(err.to_string().contains("missing metric in order list"));
    }

    #[test]
    fn reorder_rejects_foreign_metric() {
        let dir = TempDir::new().unwrap();
        let goal = setup(&dir);

        let a = Metric::create(dir.path(), "springfield", goal.id, "A", MetricType::Percent)
            .unwrap();
        let ghost = Uuid::new_v4();

        let err =
            Metric::reorder(dir.path(), "springfield", goal.id, &[a.id, ghost]).unwrap_err();
        assert!(err.to_string().contains("not attached to this goal"));
    }

    #[test]
    fn reorder_rejects_duplicate() {
        let dir = TempDir::new().unwrap();
        let goal = setup(&dir);

        let a = Metric::create(dir.path(), "springfield", goal.id, "A", MetricType::Percent)
            .unwrap();
        Metric::create(dir.path(), "springfield", goal.id, "B", MetricType::Percent).unwrap();

        let err =
            Metric::reorder(dir.path(), "springfield", goal.id, &[a.id, a.id]).unwrap_err();
        assert!(err.to_string().contains("duplicate metric in order list"));
    }

    #[test]
    fn survey_data_round_trip() {
        let dir = TempDir::new().unwrap();
        let goal = setup(&dir);

        let mut metric = Metric::create(
            dir.path(),
            "springfield",
            goal.id,
            "Family Survey",
            MetricType::Survey,
        )
        .unwrap();
        metric.set_survey_data(vec![
            SurveyPoint {
                year: 2024,
                value: 3.4,
                label: None,
            },
            SurveyPoint {
                year: 2025,
                value: 3.7,
                label: Some("post-pandemic rebound".to_string()),
            },
        ]);
        metric.save(dir.path(), "springfield").unwrap();

        let loaded = Metric::load(dir.path(), "springfield", metric.id).unwrap();
        assert_eq!(loaded.survey_data.len(), 2);
        assert_eq!(loaded.survey_data[1].year, 2025);
    }

    #[test]
    fn delete_unknown_metric_fails() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        assert!(matches!(
            Metric::delete(dir.path(), "springfield", Uuid::new_v4()),
            Err(PlanbookError::MetricNotFound(_))
        ));
    }
}
