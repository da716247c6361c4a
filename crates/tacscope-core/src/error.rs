use thiserror::Error;

/// Validation errors for `.tacscope.toml` contents.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("[rules].min_cost_reduction must be a finite, non-negative percentage, got {0}")]
    InvalidThreshold(f64),
}
