//! Error types for multi_drone_prm

use thiserror::Error;

/// Abnormal conditions: bad parameters, broken oracles, I/O.
///
/// Expected planning failures are reported through [`PlanFailure`] instead.
#[derive(Debug, Error)]
pub enum RoboticsError {
    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// The validity/motion oracle could not answer
    #[error("Oracle failure: {0}")]
    OracleFailure(String),
    /// Configuration file could not be parsed
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Visualization error
    #[error("Visualization error: {0}")]
    VisualizationError(String),
}

impl From<toml::de::Error> for RoboticsError {
    fn from(e: toml::de::Error) -> Self {
        RoboticsError::ConfigError(e.to_string())
    }
}

/// Result type alias for robotics operations
pub type RoboticsResult<T> = Result<T, RoboticsError>;

/// Normal, expected ways a time-bounded probabilistic plan can come back empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlanFailure {
    #[error("start or goal configuration is invalid")]
    EndpointInvalid,
    #[error("time budget exhausted before search")]
    BudgetExhausted,
    #[error("no path between start and goal in the roadmap")]
    NoPathFound,
}
