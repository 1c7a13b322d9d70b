use crate::district::District;
use crate::error::{PlanbookError, Result};
use crate::numbering;
use crate::paths;
use crate::types::Level;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Goal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub district_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    pub goal_number: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub level: Level,
    #[serde(default)]
    pub order_position: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(
        district_id: Uuid,
        parent_id: Option<Uuid>,
        goal_number: impl Into<String>,
        title: impl Into<String>,
        level: Level,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            district_id,
            parent_id,
            goal_number: goal_number.into(),
            title: title.into(),
            description: None,
            level,
            order_position: 0,
            created_at: now,
            updated_at: now,
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    /// Create a goal under `parent_id` (or a top-level objective when `None`),
    /// computing its number server-side. The level is derived from the parent:
    /// objectives hold goals, goals hold sub-goals, sub-goals hold nothing.
    pub fn create(
        root: &Path,
        district_slug: &str,
        parent_id: Option<Uuid>,
        title: impl Into<String>,
    ) -> Result<Self> {
        Self::create_with_description(root, district_slug, parent_id, title, None)
    }

    pub fn create_with_description(
        root: &Path,
        district_slug: &str,
        parent_id: Option<Uuid>,
        title: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self> {
        let district = District::load(root, district_slug)?;
        let goals = Self::list(root, district_slug)?;

        let (level, goal_number, scope) = match parent_id {
            None => {
                let tops = goals
                    .iter()
                    .filter(|g| g.parent_id.is_none())
                    .map(|g| g.goal_number.as_str());
                (
                    Level::Objective,
                    numbering::next_top_number(tops)?,
                    format!("district '{district_slug}'"),
                )
            }
            Some(pid) => {
                let parent = goals
                    .iter()
                    .find(|g| g.id == pid)
                    .ok_or_else(|| PlanbookError::GoalNotFound(pid.to_string()))?;
                let level = parent.level.child().ok_or_else(|| {
                    PlanbookError::InvalidParent(format!(
                        "'{}' is a sub-goal and cannot contain goals",
                        parent.goal_number
                    ))
                })?;
                let siblings = goals
                    .iter()
                    .filter(|g| g.parent_id == Some(pid))
                    .map(|g| g.goal_number.as_str());
                let number = numbering::next_child_number(&parent.goal_number, siblings)?;
                (level, number, format!("goal '{}'", parent.goal_number))
            }
        };

        // Re-read before the write: a concurrent create under the same parent
        // may have claimed the computed number since the list above.
        let fresh = Self::list(root, district_slug)?;
        if fresh
            .iter()
            .any(|g| g.parent_id == parent_id && g.goal_number == goal_number)
        {
            return Err(PlanbookError::DuplicateGoalNumber {
                number: goal_number,
                scope,
            });
        }

        let mut goal = Self::new(district.id, parent_id, goal_number, title, level);
        goal.description = description;
        goal.save(root, district_slug)?;
        Ok(goal)
    }

    pub fn load(root: &Path, district_slug: &str, id: Uuid) -> Result<Self> {
        let path = paths::goal_path(root, district_slug, id);
        if !path.exists() {
            return Err(PlanbookError::GoalNotFound(id.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        let goal: Goal = serde_yaml::from_str(&data)?;
        Ok(goal)
    }

    pub fn save(&self, root: &Path, district_slug: &str) -> Result<()> {
        let path = paths::goal_path(root, district_slug, self.id);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// All goals of a district, ordered by goal number (numeric per segment)
    /// then order position.
    pub fn list(root: &Path, district_slug: &str) -> Result<Vec<Self>> {
        let dir = paths::goals_dir(root, district_slug);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut goals = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.path().extension().is_some_and(|e| e == "yaml") {
                let data = std::fs::read_to_string(entry.path())?;
                let goal: Goal = serde_yaml::from_str(&data)?;
                goals.push(goal);
            }
        }
        goals.sort_by(|a, b| {
            numbering::compare_numbers(&a.goal_number, &b.goal_number)
                .then(a.order_position.cmp(&b.order_position))
        });
        Ok(goals)
    }

    /// Delete a goal together with its descendants and all their metrics.
    pub fn delete(root: &Path, district_slug: &str, id: Uuid) -> Result<()> {
        let goals = Self::list(root, district_slug)?;
        if !goals.iter().any(|g| g.id == id) {
            return Err(PlanbookError::GoalNotFound(id.to_string()));
        }

        let mut doomed: HashSet<Uuid> = HashSet::from([id]);
        loop {
            let before = doomed.len();
            for g in &goals {
                if let Some(parent) = g.parent_id {
                    if doomed.contains(&parent) {
                        doomed.insert(g.id);
                    }
                }
            }
            if doomed.len() == before {
                break;
            }
        }

        for metric in crate::metric::Metric::list(root, district_slug)? {
            if doomed.contains(&metric.goal_id) {
                std::fs::remove_file(paths::metric_path(root, district_slug, metric.id))?;
            }
        }
        for goal_id in &doomed {
            std::fs::remove_file(paths::goal_path(root, district_slug, *goal_id))?;
        }
        Ok(())
    }

    // ---------------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------------

    pub fn update_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.updated_at = Utc::now();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
        self.updated_at = Utc::now();
    }

    pub fn clear_description(&mut self) {
        self.description = None;
        self.updated_at = Utc::now();
    }

    pub fn set_order_position(&mut self, position: u32) {
        self.order_position = position;
        self.updated_at = Utc::now();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
