use crate::error::Result;
use crate::goal::Goal;
use crate::metric::Metric;
use crate::types::Level;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

// ---------------------------------------------------------------------------
// DistrictSummary
// ---------------------------------------------------------------------------

/// Headline counts shown on the district picker and admin overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictSummary {
    pub objective_count: usize,
    pub goal_count: usize,
    pub sub_goal_count: usize,
    pub metric_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
}

pub fn summarize(goals: &[Goal], metrics: &[Metric]) -> DistrictSummary {
    let count_level = |level: Level| goals.iter().filter(|g| g.level == level).count();

    let last_activity = goals
        .iter()
        .map(|g| g.updated_at)
        .chain(metrics.iter().map(|m| m.updated_at))
        .max();

    DistrictSummary {
        objective_count: count_level(Level::Objective),
        goal_count: count_level(Level::Goal),
        sub_goal_count: count_level(Level::SubGoal),
        metric_count: metrics.len(),
        last_activity,
    }
}

/// Load-and-summarize convenience for one district.
pub fn district_summary(root: &Path, district_slug: &str) -> Result<DistrictSummary> {
    let goals = Goal::list(root, district_slug)?;
    let metrics = Metric::list(root, district_slug)?;
    Ok(summarize(&goals, &metrics))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MetricType;
    use uuid::Uuid;

    #[test]
    fn counts_by_level() {
        let obj = Goal::new(Uuid::nil(), None, "1", "Objective", Level::Objective);
        let child = Goal::new(Uuid::nil(), Some(obj.id), "1.1", "Goal", Level::Goal);
        let sub = Goal::new(Uuid::nil(), Some(child.id), "1.1.1", "Sub", Level::SubGoal);
        let metric = Metric::new(sub.id, "m", MetricType::Number);

        let summary = summarize(&[obj, child, sub], &[metric]);
        assert_eq!(summary.objective_count, 1);
        assert_eq!(summary.goal_count, 1);
        assert_eq!(summary.sub_goal_count, 1);
        assert_eq!(summary.metric_count, 1);
        assert!(summary.last_activity.is_some());
    }

    #[test]
    fn empty_district_has_no_activity() {
        let summary = summarize(&[], &[]);
        assert_eq!(summary.metric_count, 0);
        assert!(summary.last_activity.is_none());
    }

    #[test]
    fn last_activity_tracks_latest_metric_update() {
        let obj = Goal::new(Uuid::nil(), None, "1", "Objective", Level::Objective);
        let mut metric = Metric::new(obj.id, "m", MetricType::Number);
        metric.set_values(Some(1.0), Some(2.0));

        let summary = summarize(std::slice::from_ref(&obj), std::slice::from_ref(&metric));
        assert_eq!(summary.last_activity, Some(metric.updated_at));
    }
}
