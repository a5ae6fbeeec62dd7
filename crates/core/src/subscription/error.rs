use thiserror::Error;

/// Malformed month/year text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid date {input:?}, expected format MM-YYYY")]
pub struct FormatError {
    input: String,
}

impl FormatError {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// The text that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// A summary range whose bounds could not be parsed.
///
/// Both raw bounds are kept so the caller can report exactly what was sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid summary range (from {from:?}, to {to:?})")]
pub struct RangeError {
    pub from: String,
    pub to: String,
    #[source]
    pub source: FormatError,
}

/// Errors that can occur when validating subscription data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Service name cannot be empty")]
    EmptyServiceName,
    #[error("Price cannot be negative: {0}")]
    NegativePrice(i64),
    #[error("User ID is required")]
    EmptyUserId,
    #[error("Start date is required")]
    MissingStartDate,
    #[error("End date must be after or equal to start date")]
    EndBeforeStart,
}
