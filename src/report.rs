use crate::types::{OutcomeStatus, OverallStatus, SuiteReport, Summary, TestOutcome};
use crate::{t, t_args};
use anyhow::Result;
use colored::Colorize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputKind {
    /// Every case, failure details and the summary block
    #[default]
    Normal,
    /// One line per case and the summary block
    Compact,
    /// One symbol per case and a one-line summary
    Terse,
    /// Summary block only
    Final,
    /// The whole report as JSON
    Json,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub kind: OutputKind,
    pub hide_passes: bool,
    pub hide_fails: bool,
}

fn shown(o: &TestOutcome, opts: &RenderOptions) -> bool {
    match o.status {
        OutcomeStatus::Passed => !opts.hide_passes,
        OutcomeStatus::Failed | OutcomeStatus::Errored => !opts.hide_fails,
    }
}

fn case_line(o: &TestOutcome) -> String {
    match o.status {
        OutcomeStatus::Passed => format!("{} {} ({})\n", "[PASS]".green().bold(), o.name.green(), o.detail),
        OutcomeStatus::Failed => format!(
            "{} {} ({})\n",
            "[FAIL]".red().bold(),
            o.name.red().bold(),
            o.detail
        ),
        OutcomeStatus::Errored => format!(
            "{} {} ({})\n",
            "[ERROR]".yellow().bold(),
            o.name.yellow().bold(),
            o.detail
        ),
    }
}

fn failure_details(o: &TestOutcome) -> String {
    let mut out = String::new();
    if o.status != OutcomeStatus::Failed {
        return out;
    }
    if let Some(kind) = &o.kind {
        out.push_str(&format!("  {} {}\n", t!("report-kind").bold(), kind));
    }
    out.push_str(&format!("  {} {}\n", t!("report-expected").bold(), o.expected));
    out.push_str(&format!("  {} {}\n", t!("report-actual").bold(), o.actual));
    out
}

fn status_text(status: OverallStatus) -> String {
    match status {
        OverallStatus::Passed => t!("status-passed").green().bold().to_string(),
        OverallStatus::Failed => t!("status-failed").red().bold().to_string(),
    }
}

fn count(n: usize, bad: bool) -> String {
    if bad && n > 0 {
        n.to_string().red().bold().to_string()
    } else {
        n.to_string()
    }
}

fn summary_block(report: &SuiteReport) -> String {
    let mut out = String::new();
    let header = if report.name.is_empty() {
        t!("summary-header")
    } else {
        t_args!("summary-header-named", "name" => &report.name)
    };
    out.push_str(&format!("{}\n", header.bold()));
    out.push_str(&t_args!("summary-total", "count" => report.total));
    out.push('\n');
    out.push_str(&t_args!("summary-passed", "count" => report.passed.to_string().green()));
    out.push('\n');
    out.push_str(&t_args!("summary-failed", "count" => count(report.failed, true)));
    out.push('\n');
    out.push_str(&t_args!("summary-errored", "count" => count(report.errored, true)));
    out.push('\n');
    out.push_str(&t_args!("summary-pass-rate", "rate" => format!("{:.2}", report.pass_rate)));
    out.push('\n');
    out.push_str(&t_args!("summary-overall", "status" => status_text(report.overall_status)));
    out.push('\n');
    out.push_str(&t_args!(
        "summary-consecutive",
        "count" => report.consecutive_passes_from_start
    ));
    out.push('\n');
    match report.first_failure_index {
        Some(idx) => {
            let name = report.outcomes.get(idx).map(|o| o.name.as_str()).unwrap_or("");
            out.push_str(&t_args!("summary-first-failure", "index" => idx, "name" => name));
        }
        None => out.push_str(&t!("summary-no-failures")),
    }
    out.push('\n');
    if let Some(idx) = report.first_error_index {
        let name = report.outcomes.get(idx).map(|o| o.name.as_str()).unwrap_or("");
        out.push_str(&t_args!("summary-first-error", "index" => idx, "name" => name));
        out.push('\n');
    }
    out
}

fn terse_line(report: &SuiteReport) -> String {
    let marks: String = report
        .outcomes
        .iter()
        .map(|o| match o.status {
            OutcomeStatus::Passed => ".".green().to_string(),
            OutcomeStatus::Failed => "F".red().bold().to_string(),
            OutcomeStatus::Errored => "E".yellow().bold().to_string(),
        })
        .collect();
    format!(
        "{}\n{}\n",
        marks,
        t_args!("summary-terse",
            "passed" => report.passed,
            "failed" => report.failed,
            "errored" => report.errored,
            "rate" => format!("{:.2}", report.pass_rate),
            "status" => status_text(report.overall_status)
        )
    )
}

/// Normal human-readable transcript: every case, then the summary.
pub fn render_human(report: &SuiteReport) -> String {
    render_text(report, &RenderOptions::default())
}

fn render_text(report: &SuiteReport, opts: &RenderOptions) -> String {
    let mut out = String::new();
    match opts.kind {
        OutputKind::Terse => return terse_line(report),
        OutputKind::Final => return summary_block(report),
        OutputKind::Normal | OutputKind::Compact | OutputKind::Json => {}
    }
    for o in report.outcomes.iter().filter(|o| shown(o, opts)) {
        out.push_str(&case_line(o));
        if opts.kind == OutputKind::Normal {
            out.push_str(&failure_details(o));
        }
    }
    out.push_str(&summary_block(report));
    out
}

pub fn render_json(report: &SuiteReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Renders a report; reads the report only and never changes it.
pub fn render(report: &SuiteReport, opts: &RenderOptions) -> Result<String> {
    match opts.kind {
        OutputKind::Json => render_json(report).map(|s| s + "\n"),
        _ => Ok(render_text(report, opts)),
    }
}

/// Several reports as one JSON array.
pub fn render_json_all(reports: &[SuiteReport]) -> Result<String> {
    Ok(serde_json::to_string_pretty(reports)? + "\n")
}

pub fn print_report(report: &SuiteReport, opts: &RenderOptions) -> Result<()> {
    print!("{}", render(report, opts)?);
    Ok(())
}

/// One-line total across every suite in the run.
pub fn render_aggregate(summary: &Summary) -> String {
    t_args!("summary-aggregate",
        "suites" => summary.suites,
        "total" => summary.total,
        "passed" => summary.passed,
        "failed" => summary.failed,
        "errored" => summary.errored
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::run_cases;
    use crate::types::TestCase;

    fn sample() -> SuiteReport {
        colored::control::set_override(false);
        run_cases(&[
            TestCase::new("ok", "strictEqual", 1, 1),
            TestCase::new("bad", "lessThan", 250, 200),
            TestCase::new("odd", "bogus", 1, 1),
        ])
    }

    #[test]
    fn normal_output_shows_every_case() {
        let text = render_human(&sample());
        assert!(text.contains("[PASS] ok (1 === 1)"));
        assert!(text.contains("[FAIL] bad (250 < 200)"));
        assert!(text.contains("[ERROR] odd (Unsupported comparison type: bogus)"));
    }

    #[test]
    fn hide_passes_keeps_summary() {
        let opts = RenderOptions {
            kind: OutputKind::Compact,
            hide_passes: true,
            hide_fails: false,
        };
        let text = render(&sample(), &opts).unwrap();
        assert!(!text.contains("[PASS]"));
        assert!(text.contains("[FAIL]"));
        assert!(text.contains("33.33"));
    }

    #[test]
    fn terse_output_has_one_mark_per_case() {
        let opts = RenderOptions {
            kind: OutputKind::Terse,
            ..Default::default()
        };
        let text = render(&sample(), &opts).unwrap();
        assert!(text.starts_with(".FE\n"));
    }

    #[test]
    fn json_output_is_the_report() {
        let opts = RenderOptions {
            kind: OutputKind::Json,
            ..Default::default()
        };
        let text = render(&sample(), &opts).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["total"], 3);
        assert_eq!(v["first_failure_index"], 1);
        assert_eq!(v["first_error_index"], 2);
        assert_eq!(v["overall_status"], "FAILED");
        assert_eq!(v["outcomes"][2]["error"]["kind"], "unsupported_comparison_type");
    }

    #[test]
    fn several_reports_form_one_json_array() {
        let text = render_json_all(&[sample(), sample()]).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v.as_array().map(Vec::len), Some(2));
        assert_eq!(v[1]["errored"], 1);
    }

    #[test]
    fn rendering_does_not_change_the_report() {
        let report = sample();
        let before = format!("{report:?}");
        let _ = render_human(&report);
        assert_eq!(format!("{report:?}"), before);
    }
}
