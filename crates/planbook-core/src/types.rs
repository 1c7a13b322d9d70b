use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// Depth of a goal in the plan hierarchy: objectives hold goals, goals hold
/// sub-goals. Sub-goals are the deepest level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Objective,
    Goal,
    SubGoal,
}

impl Level {
    pub fn all() -> &'static [Level] {
        &[Level::Objective, Level::Goal, Level::SubGoal]
    }

    /// Numeric level as stored by the dashboard API (objective = 0).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Number of dotted segments a goal_number at this level carries.
    pub fn depth(self) -> usize {
        self.index() + 1
    }

    /// The level of a child nested under this one, if nesting is allowed.
    pub fn child(self) -> Option<Level> {
        match self {
            Level::Objective => Some(Level::Goal),
            Level::Goal => Some(Level::SubGoal),
            Level::SubGoal => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Objective => "objective",
            Level::Goal => "goal",
            Level::SubGoal => "sub_goal",
        }
    }

    /// Human label used on dashboards.
    pub fn display_name(self) -> &'static str {
        match self {
            Level::Objective => "Strategic Objective",
            Level::Goal => "Goal",
            Level::SubGoal => "Sub-goal",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Level {
    type Err = crate::error::PlanbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "objective" | "0" => Ok(Level::Objective),
            "goal" | "1" => Ok(Level::Goal),
            "sub_goal" | "sub-goal" | "2" => Ok(Level::SubGoal),
            _ => Err(crate::error::PlanbookError::InvalidLevel(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// MetricType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    Percent,
    Number,
    Rating,
    Survey,
    Narrative,
}

impl MetricType {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricType::Percent => "percent",
            MetricType::Number => "number",
            MetricType::Rating => "rating",
            MetricType::Survey => "survey",
            MetricType::Narrative => "narrative",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MetricType {
    type Err = crate::error::PlanbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percent" => Ok(MetricType::Percent),
            "number" => Ok(MetricType::Number),
            "rating" => Ok(MetricType::Rating),
            "survey" => Ok(MetricType::Survey),
            "narrative" => Ok(MetricType::Narrative),
            _ => Err(crate::error::PlanbookError::InvalidMetricType(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// MetricStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricStatus {
    OnTarget,
    NeedsAttention,
    AtRisk,
}

impl MetricStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricStatus::OnTarget => "on-target",
            MetricStatus::NeedsAttention => "needs-attention",
            MetricStatus::AtRisk => "at-risk",
        }
    }

    /// Badge label used on dashboards.
    pub fn display_name(self) -> &'static str {
        match self {
            MetricStatus::OnTarget => "On Target",
            MetricStatus::NeedsAttention => "Needs Attention",
            MetricStatus::AtRisk => "At Risk",
        }
    }
}

impl fmt::Display for MetricStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn level_ordering() {
        assert!(Level::Objective < Level::Goal);
        assert!(Level::Goal < Level::SubGoal);
    }

    #[test]
    fn level_depth_matches_segment_count() {
        assert_eq!(Level::Objective.depth(), 1);
        assert_eq!(Level::Goal.depth(), 2);
        assert_eq!(Level::SubGoal.depth(), 3);
    }

    #[test]
    fn level_child() {
        assert_eq!(Level::Objective.child(), Some(Level::Goal));
        assert_eq!(Level::Goal.child(), Some(Level::SubGoal));
        assert_eq!(Level::SubGoal.child(), None);
    }

    #[test]
    fn level_roundtrip() {
        for level in Level::all() {
            let parsed = Level::from_str(level.as_str()).unwrap();
            assert_eq!(*level, parsed);
        }
    }

    #[test]
    fn level_parses_numeric_form() {
        assert_eq!(Level::from_str("0").unwrap(), Level::Objective);
        assert_eq!(Level::from_str("2").unwrap(), Level::SubGoal);
        assert!(Level::from_str("3").is_err());
    }

    #[test]
    fn metric_type_roundtrip() {
        for s in ["percent", "number", "rating", "survey", "narrative"] {
            assert_eq!(MetricType::from_str(s).unwrap().as_str(), s);
        }
        assert!(MetricType::from_str("currency").is_err());
    }

    #[test]
    fn status_serializes_kebab_case() {
        let json = serde_json::to_string(&MetricStatus::NeedsAttention).unwrap();
        assert_eq!(json, "\"needs-attention\"");
    }
}
