use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanbookError {
    #[error("not initialized: run 'planbook init'")]
    NotInitialized,

    #[error("district not found: {0}")]
    DistrictNotFound(String),

    #[error("district already exists: {0}")]
    DistrictExists(String),

    #[error("district '{0}' still has goals: delete with cascade to remove them")]
    DistrictNotEmpty(String),

    #[error("goal not found: {0}")]
    GoalNotFound(String),

    #[error("metric not found: {0}")]
    MetricNotFound(String),

    #[error("invalid slug '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSlug(String),

    #[error("invalid level: {0}")]
    InvalidLevel(String),

    #[error("invalid metric type: {0}")]
    InvalidMetricType(String),

    #[error("invalid parent: {0}")]
    InvalidParent(String),

    #[error("goal number '{number}' already exists under {scope}")]
    DuplicateGoalNumber { number: String, scope: String },

    #[error("malformed goal number '{0}': trailing segment is not numeric")]
    MalformedNumber(String),

    #[error("invalid metric order: {0}")]
    InvalidMetricOrder(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, PlanbookError>;
