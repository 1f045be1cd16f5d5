use serde::Serialize;
use thiserror::Error;

/// Problems confined to a single test case. They are turned into an
/// errored outcome and never abort the rest of the suite.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum CaseError {
    /// The `type` tag is not one of the known comparison kinds.
    #[error("Unsupported comparison type: {0}")]
    UnsupportedComparisonType(String),

    /// The descriptor could not be read as a test case.
    #[error("Malformed test case: {0}")]
    Malformed(String),
}

/// Failures of a whole suite run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuiteError {
    /// The input is not a sequence of test cases.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
