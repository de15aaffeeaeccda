use thiserror::Error;

#[derive(Debug, Error)]
pub enum StepwiseError {
    #[error("goal not found: {0}")]
    GoalNotFound(String),

    #[error("step not found: {0}")]
    StepNotFound(String),

    #[error("forbidden: resource belongs to another user")]
    Forbidden,

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("title must not be empty")]
    InvalidTitle,

    #[error("invalid deadline '{0}': expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDeadline(String),

    #[error("deadline must not be in the past")]
    DeadlineInPast,

    #[error("model output is not a valid step plan: {0}")]
    PlanUnparsable(String),

    #[error("model returned no usable steps")]
    PlanEmpty,

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Db(#[from] sqlx::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StepwiseError>;
