use crate::error::CaseError;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// A dynamically typed value as it appears in a test descriptor.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        Value::from(v.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

/// Strategy used to compare `actual` against `expected`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum ComparisonKind {
    StrictEqual,
    LooseEqual,
    TypeCheck,
    Truthy,
    LessThan,
    /// Any tag outside the vocabulary, kept verbatim for the error message.
    Unsupported(String),
}

impl ComparisonKind {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "strictEqual" => ComparisonKind::StrictEqual,
            "looseEqual" => ComparisonKind::LooseEqual,
            "typeCheck" => ComparisonKind::TypeCheck,
            "truthy" => ComparisonKind::Truthy,
            "lessThan" => ComparisonKind::LessThan,
            other => ComparisonKind::Unsupported(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ComparisonKind::StrictEqual => "strictEqual",
            ComparisonKind::LooseEqual => "looseEqual",
            ComparisonKind::TypeCheck => "typeCheck",
            ComparisonKind::Truthy => "truthy",
            ComparisonKind::LessThan => "lessThan",
            ComparisonKind::Unsupported(tag) => tag,
        }
    }
}

impl From<&str> for ComparisonKind {
    fn from(tag: &str) -> Self {
        ComparisonKind::parse(tag)
    }
}

impl From<ComparisonKind> for String {
    fn from(kind: ComparisonKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ComparisonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    pub name: String,
    pub actual: Value,
    pub expected: Value,
    pub kind: ComparisonKind,
}

impl TestCase {
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<ComparisonKind>,
        actual: impl Into<Value>,
        expected: impl Into<Value>,
    ) -> Self {
        TestCase {
            name: name.into(),
            actual: actual.into(),
            expected: expected.into(),
            kind: kind.into(),
        }
    }
}

/// A descriptor that could not be read as a [`TestCase`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedCase {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaseEntry {
    Case(TestCase),
    Malformed(MalformedCase),
}

impl From<TestCase> for CaseEntry {
    fn from(case: TestCase) -> Self {
        CaseEntry::Case(case)
    }
}

#[derive(Debug, Clone)]
pub struct TestSuite {
    pub name: String,
    pub entries: Vec<CaseEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Passed,
    Failed,
    Errored,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestOutcome {
    pub index: usize,
    pub name: String,
    pub kind: Option<ComparisonKind>, // None for malformed descriptors
    pub status: OutcomeStatus,
    pub detail: String, // comparison as written, or the error text
    pub expected: String,
    pub actual: String,
    pub error: Option<CaseError>,
}

impl TestOutcome {
    pub fn passed(&self) -> bool {
        self.status == OutcomeStatus::Passed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OverallStatus {
    #[default]
    Passed,
    Failed,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SuiteReport {
    pub name: String,
    pub total: usize,   // Number of entries evaluated
    pub passed: usize,  // Comparisons that held
    pub failed: usize,  // Comparisons that did not hold
    pub errored: usize, // Entries that could not be evaluated
    pub pass_rate: f64, // Percentage, 0 for an empty suite
    pub consecutive_passes_from_start: usize,
    pub first_failure_index: Option<usize>,
    pub first_error_index: Option<usize>,
    pub overall_status: OverallStatus,
    pub outcomes: Vec<TestOutcome>,
}

/// Totals across several suite runs.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    pub suites: usize,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
}

impl Summary {
    pub fn absorb(&mut self, report: &SuiteReport) {
        self.suites += 1;
        self.total += report.total;
        self.passed += report.passed;
        self.failed += report.failed;
        self.errored += report.errored;
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }
}
