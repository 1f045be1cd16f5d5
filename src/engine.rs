use crate::error::{CaseError, SuiteError};
use crate::loader::parse_document;
use crate::types::{
    CaseEntry, ComparisonKind, OutcomeStatus, OverallStatus, SuiteReport, TestCase, TestOutcome,
    TestSuite, Value,
};
use crate::value::{
    is_truthy, less_than, loose_equals, strict_equals, to_display_string, type_of,
};
use rayon::prelude::*;
use tracing::debug;

/// Decides whether a single case holds.
pub fn evaluate(case: &TestCase) -> Result<bool, CaseError> {
    let (actual, expected) = (&case.actual, &case.expected);
    match &case.kind {
        ComparisonKind::StrictEqual => Ok(strict_equals(actual, expected)),
        ComparisonKind::LooseEqual => Ok(loose_equals(actual, expected)),
        ComparisonKind::TypeCheck => Ok(match expected {
            Value::String(tag) => type_of(actual) == tag.as_str(),
            _ => false,
        }),
        ComparisonKind::Truthy => Ok(is_truthy(actual)),
        ComparisonKind::LessThan => Ok(less_than(actual, expected)),
        ComparisonKind::Unsupported(tag) => {
            Err(CaseError::UnsupportedComparisonType(tag.clone()))
        }
    }
}

/// The comparison written out the way it reads in a script, e.g. `250 < 200`.
pub fn describe(case: &TestCase) -> String {
    let actual = to_display_string(&case.actual);
    let expected = to_display_string(&case.expected);
    match &case.kind {
        ComparisonKind::StrictEqual => format!("{actual} === {expected}"),
        ComparisonKind::LooseEqual => format!("{actual} == {expected}"),
        ComparisonKind::TypeCheck => format!("typeof {actual} === '{expected}'"),
        ComparisonKind::Truthy => format!("Boolean({actual})"),
        ComparisonKind::LessThan => format!("{actual} < {expected}"),
        ComparisonKind::Unsupported(_) => String::new(),
    }
}

fn outcome_for(index: usize, entry: &CaseEntry) -> TestOutcome {
    match entry {
        CaseEntry::Malformed(m) => {
            let error = CaseError::Malformed(m.reason.clone());
            TestOutcome {
                index,
                name: m.name.clone(),
                kind: None,
                status: OutcomeStatus::Errored,
                detail: error.to_string(),
                expected: String::new(),
                actual: String::new(),
                error: Some(error),
            }
        }
        CaseEntry::Case(case) => {
            let (status, detail, error) = match evaluate(case) {
                Ok(true) => (OutcomeStatus::Passed, describe(case), None),
                Ok(false) => (OutcomeStatus::Failed, describe(case), None),
                Err(e) => (OutcomeStatus::Errored, e.to_string(), Some(e)),
            };
            TestOutcome {
                index,
                name: case.name.clone(),
                kind: Some(case.kind.clone()),
                status,
                detail,
                expected: to_display_string(&case.expected),
                actual: to_display_string(&case.actual),
                error,
            }
        }
    }
}

/// Builds the report from outcomes that are already in input order.
/// Nothing is re-evaluated here.
fn summarize(name: &str, outcomes: Vec<TestOutcome>) -> SuiteReport {
    let mut passed = 0;
    let mut failed = 0;
    let mut errored = 0;
    for o in &outcomes {
        match o.status {
            OutcomeStatus::Passed => passed += 1,
            OutcomeStatus::Failed => failed += 1,
            OutcomeStatus::Errored => errored += 1,
        }
    }
    let total = outcomes.len();

    let consecutive_passes_from_start = outcomes.iter().take_while(|o| o.passed()).count();
    // Errored entries are not failures for this index.
    let first_failure_index = outcomes
        .iter()
        .position(|o| o.status == OutcomeStatus::Failed);
    let first_error_index = outcomes
        .iter()
        .position(|o| o.status == OutcomeStatus::Errored);

    let pass_rate = if total == 0 {
        0.0
    } else {
        passed as f64 / total as f64 * 100.0
    };
    let overall_status = if failed == 0 && errored == 0 {
        OverallStatus::Passed
    } else {
        OverallStatus::Failed
    };

    debug!(
        suite = name,
        total, passed, failed, errored, "suite evaluated"
    );

    SuiteReport {
        name: name.to_string(),
        total,
        passed,
        failed,
        errored,
        pass_rate,
        consecutive_passes_from_start,
        first_failure_index,
        first_error_index,
        overall_status,
        outcomes,
    }
}

/// Evaluates every entry in order. Never fails: problems with an individual
/// entry become an errored outcome.
pub fn run_entries(entries: &[CaseEntry]) -> SuiteReport {
    let outcomes = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| outcome_for(idx, entry))
        .collect();
    summarize("", outcomes)
}

/// Same result as [`run_entries`], with entries evaluated on the rayon pool.
/// Outcomes are collected in input order, so order-dependent figures match.
pub fn run_entries_parallel(entries: &[CaseEntry]) -> SuiteReport {
    let outcomes = entries
        .par_iter()
        .enumerate()
        .map(|(idx, entry)| outcome_for(idx, entry))
        .collect();
    summarize("", outcomes)
}

pub fn run_cases(cases: &[TestCase]) -> SuiteReport {
    let entries: Vec<CaseEntry> = cases.iter().cloned().map(CaseEntry::Case).collect();
    run_entries(&entries)
}

/// Evaluates an already-parsed document: a sequence of case descriptors, or
/// a mapping with a `Tests` sequence. Anything else is rejected up front.
pub fn run_suite(input: &serde_json::Value) -> Result<SuiteReport, SuiteError> {
    let (name, entries) = parse_document(input)?;
    let mut report = run_entries(&entries);
    report.name = name.unwrap_or_default();
    Ok(report)
}

pub fn run_test_suite(suite: &TestSuite, parallel: bool) -> SuiteReport {
    let mut report = if parallel {
        run_entries_parallel(&suite.entries)
    } else {
        run_entries(&suite.entries)
    };
    report.name = suite.name.clone();
    report
}

pub fn run_suites(suites: &[TestSuite], parallel: bool) -> Vec<SuiteReport> {
    suites
        .iter()
        .map(|s| run_test_suite(s, parallel))
        .collect()
}
