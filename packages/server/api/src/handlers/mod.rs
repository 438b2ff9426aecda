use crate::error::ApiError;

pub mod health;
pub mod machines;
pub mod settings;
pub mod tools;

/// Parses a numeric path id, rejecting anything else as a client error.
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<i64, ApiError> {
    raw.trim().parse::<i64>().map_err(|_| {
        ApiError::InvalidArgument(format!("{} must be an integer, got '{}'", what, raw))
    })
}
