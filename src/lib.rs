pub mod engine;
pub mod error;
pub mod i18n;
pub mod loader;
pub mod report;
pub mod types;
pub mod value;

// Re-export the localization functions behind `t!` / `t_args!`
pub use crate::i18n::{t, t_with_args};

pub use crate::engine::{run_cases, run_entries, run_suite};
pub use crate::error::{CaseError, SuiteError};
pub use crate::types::{
    CaseEntry, ComparisonKind, OutcomeStatus, OverallStatus, SuiteReport, TestCase, TestOutcome,
    Value,
};
