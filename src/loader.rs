use crate::error::SuiteError;
use crate::types::{CaseEntry, ComparisonKind, MalformedCase, TestCase, TestSuite, Value};
use crate::{t, t_args};
use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

// A document is either a bare list of cases or a named suite
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDocument {
    Cases(Vec<serde_json::Value>),
    Suite(RawSuite),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawSuite {
    #[serde(alias = "name")]
    name: Option<String>,
    #[serde(alias = "tests")]
    tests: Vec<serde_json::Value>,
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "sequence",
        serde_json::Value::Object(_) => "mapping",
    }
}

/// Reads one case descriptor. Problems are recorded on the entry rather
/// than returned, so the rest of the suite can still run.
pub fn parse_entry(index: usize, item: &serde_json::Value) -> CaseEntry {
    let fallback_name = format!("case #{}", index + 1);
    let Some(map) = item.as_object() else {
        return CaseEntry::Malformed(MalformedCase {
            name: fallback_name,
            reason: format!("expected a mapping, found {}", json_kind(item)),
        });
    };

    let mut problems = Vec::new();
    let name = match map.get("name") {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(other) => {
            problems.push(format!("field `name` must be a string, found {}", json_kind(other)));
            None
        }
        None => {
            problems.push("missing field `name`".to_string());
            None
        }
    };
    for field in ["actual", "expected"] {
        if !map.contains_key(field) {
            problems.push(format!("missing field `{field}`"));
        }
    }
    let kind = match map.get("type") {
        Some(serde_json::Value::String(s)) => Some(ComparisonKind::parse(s)),
        Some(other) => {
            problems.push(format!("field `type` must be a string, found {}", json_kind(other)));
            None
        }
        None => {
            problems.push("missing field `type`".to_string());
            None
        }
    };

    match (name, kind) {
        (Some(name), Some(kind)) if problems.is_empty() => CaseEntry::Case(TestCase {
            name,
            actual: map.get("actual").map(Value::from).unwrap_or_default(),
            expected: map.get("expected").map(Value::from).unwrap_or_default(),
            kind,
        }),
        (name, _) => CaseEntry::Malformed(MalformedCase {
            name: name.unwrap_or(fallback_name),
            reason: problems.join(", "),
        }),
    }
}

/// Splits a parsed document into its optional suite name and its entries.
pub fn parse_document(
    doc: &serde_json::Value,
) -> std::result::Result<(Option<String>, Vec<CaseEntry>), SuiteError> {
    let raw = RawDocument::deserialize(doc).map_err(|_| {
        SuiteError::InvalidInput(format!(
            "expected a sequence of test cases or a mapping with `Tests`, found {}",
            json_kind(doc)
        ))
    })?;
    let (name, items) = match raw {
        RawDocument::Cases(items) => (None, items),
        RawDocument::Suite(s) => (s.name.map(|n| n.trim().to_string()), s.tests),
    };
    let entries = items
        .iter()
        .enumerate()
        .map(|(idx, item)| parse_entry(idx, item))
        .collect();
    Ok((name, entries))
}

fn suite_from_document(doc: &serde_json::Value, default_name: String) -> Result<TestSuite> {
    let (name, entries) = parse_document(doc)?;
    Ok(TestSuite {
        name: name.unwrap_or(default_name),
        entries,
    })
}

/// Loads a suite from a JSON string, as given on the command line.
pub fn load_json_str(input: &str) -> Result<TestSuite> {
    let doc: serde_json::Value =
        serde_json::from_str(input).with_context(|| t!("loader-inline-json-error"))?;
    suite_from_document(&doc, t!("loader-inline-suite-name"))
}

fn is_suite_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("json" | "yaml" | "yml")
    )
}

fn read_document(path: &Path) -> Result<serde_json::Value> {
    let content = fs::read_to_string(path)
        .with_context(|| t_args!("loader-failed-to-read", "file" => path.display()))?;
    let doc = if path.extension().is_some_and(|e| e == "json") {
        serde_json::from_str(&content)
            .with_context(|| t_args!("loader-json-error", "file" => path.display()))?
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| t_args!("loader-yaml-error", "file" => path.display()))?
    };
    Ok(doc)
}

/// Loads one suite per file. Directories are walked for `.json`, `.yaml`
/// and `.yml` files in file-name order.
pub fn load_suites(paths: &[PathBuf]) -> Result<Vec<TestSuite>> {
    let mut files = Vec::new();
    for p in paths {
        if p.is_dir() {
            for entry in WalkDir::new(p).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_file() && is_suite_file(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else if p.exists() {
            files.push(p.clone());
        } else {
            return Err(anyhow!(t_args!("loader-missing-path", "file" => p.display())));
        }
    }
    debug!("{}", t_args!("debug-loader-files", "count" => files.len()));

    let mut out = Vec::new();
    for f in files {
        let doc = read_document(&f)?;
        let default_name = f
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "suite".to_string());
        let suite = suite_from_document(&doc, default_name)
            .with_context(|| t_args!("loader-invalid-suite", "file" => f.display()))?;
        info!(
            "{}",
            t_args!("info-loaded-suite", "name" => &suite.name, "count" => suite.entries.len())
        );
        out.push(suite);
    }
    Ok(out)
}
