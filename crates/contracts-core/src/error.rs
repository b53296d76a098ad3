use thiserror::Error;

/// Top-level error type for shared contract search concerns.
#[derive(Error, Debug)]
pub enum ContractsError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid clause type: {0:?}")]
    InvalidClauseType(String),
}
