use thiserror::Error;

/// Errors raised when text from the outside world has to become a typed value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GapError {
    #[error("unknown {kind} value: {value:?}")]
    UnknownValue { kind: &'static str, value: String },
    #[error("unknown sort field {0:?} (expected id, credit_hours, gap_amount or risk_level)")]
    UnknownSortField(String),
    #[error("unknown sort direction {0:?} (expected asc or desc)")]
    UnknownSortDirection(String),
}
