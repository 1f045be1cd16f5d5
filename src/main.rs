use anyhow::Result;
use clap::{CommandFactory, Parser, ValueEnum, error::ErrorKind};
use colored::Colorize;
use colored::control::set_override as set_color_override;
use mini_suite::engine::run_test_suite;
use mini_suite::i18n;
use mini_suite::loader::{load_json_str, load_suites};
use mini_suite::report::{
    OutputKind, RenderOptions, print_report, render_aggregate, render_json_all,
};
use mini_suite::types::{Summary, TestSuite};
use mini_suite::{t, t_args};
use regex::Regex;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Normal,
    Compact,
    Terse,
    Final,
    Json,
}

impl From<OutputFormat> for OutputKind {
    fn from(v: OutputFormat) -> Self {
        match v {
            OutputFormat::Normal => OutputKind::Normal,
            OutputFormat::Compact => OutputKind::Compact,
            OutputFormat::Terse => OutputKind::Terse,
            OutputFormat::Final => OutputKind::Final,
            OutputFormat::Json => OutputKind::Json,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    version,
    author,
    about = t!("cli-about")
)]
struct Cli {
    // TEST_PATHS: JSON/YAML files or directories holding test cases
    #[arg(
        value_name = "TEST_PATHS",
        required_unless_present = "json",
        help = t!("cli-paths")
    )]
    tests: Vec<PathBuf>,

    // Inline JSON array of test cases
    #[arg(long, value_name = "JSON", help = t!("cli-json"))]
    json: Option<String>,

    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value = "normal",
        help = t!("cli-output")
    )]
    output: OutputFormat,

    #[arg(
        short = 'f',
        long = "hide-fails",
        conflicts_with = "hide_passes",
        help = t!("cli-hide-fails")
    )]
    hide_fails: bool,

    #[arg(
        short = 'p',
        long = "hide-passes",
        conflicts_with = "hide_fails",
        help = t!("cli-hide-passes")
    )]
    hide_passes: bool,

    #[arg(short = 'q', long = "silent", help = t!("cli-silent"))]
    silent: bool,

    #[arg(short = 'v', long = "verbose", help = t!("cli-verbose"))]
    verbose: bool,

    // Color control: auto unless one of these is given
    #[arg(
        short = 'c',
        long = "color",
        alias = "colour",
        conflicts_with = "no_color",
        help = t!("cli-color")
    )]
    color: bool,

    #[arg(long = "no-color", help = t!("cli-no-color"))]
    no_color: bool,

    // Evaluate cases on a thread pool; report order is unchanged
    #[arg(long = "parallel", help = t!("cli-parallel"))]
    parallel: bool,
}

/// Format CLI flags to be bold using regex matching
fn format_flags_bold(text: &str) -> String {
    let Ok(flag_regex) = Regex::new(r"(?m)^(\s*)(--?\w+(?:-\w+[^<\n]*)*)") else {
        return text.to_string();
    };
    flag_regex
        .replace_all(text, |caps: &regex::Captures| {
            format!("{}{}", &caps[1], caps[2].bold())
        })
        .to_string()
}

fn localize_headings(text: &str) -> String {
    text.replace("Usage:", &t!("cli-usage").bold().underline().to_string())
        .replace("Arguments:", &t!("cli-help-arguments").bold().underline().to_string())
        .replace("Options:", &t!("cli-help-options").bold().underline().to_string())
        .replace("[default:", &format!("[{}:", t!("cli-help-default")))
        .replace("[aliases:", &format!("[{}:", t!("cli-help-aliases")))
        .replace("[possible values:", &format!("[{}:", t!("cli-help-possible-values")))
        .replace("Print help", &t!("cli-help-print-help"))
        .replace("Print version", &t!("cli-help-print-version"))
}

/// Format clap errors with localized messages
fn format_clap_error(error: &clap::Error) -> String {
    let mut msg = localize_headings(&error.to_string());
    msg = msg.replace("For more information, try '--help'.", &t!("cli-error-help-info"));
    msg = msg.replace("error:", &t!("cli-error-label").red().bold().to_string());
    msg = msg.replace("tip:", &t!("cli-tip-label"));
    msg = format_flags_bold(&msg);

    match error.kind() {
        ErrorKind::MissingRequiredArgument => msg.replace(
            "the following required arguments were not provided:",
            &t!("cli-error-missing-args"),
        ),
        ErrorKind::InvalidValue => msg.replace("invalid value", &t!("cli-error-invalid-value")),
        ErrorKind::UnknownArgument => {
            msg.replace("unexpected argument", &t!("cli-error-unexpected-arg"))
        }
        _ => msg,
    }
}

/// Localized help text with blank-line runs collapsed
fn create_custom_help() -> String {
    let help = Cli::command().render_long_help().to_string();
    let help = format_flags_bold(&localize_headings(&help));

    let mut cleaned = Vec::new();
    let mut prev_was_empty = false;
    for line in help.lines() {
        let is_empty = line.trim().is_empty();
        if is_empty && prev_was_empty {
            continue;
        }
        cleaned.push(line);
        prev_was_empty = is_empty;
    }
    cleaned.join("\n")
}

fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => match error.kind() {
            ErrorKind::DisplayHelp => {
                println!("{}", create_custom_help());
                std::process::exit(0);
            }
            ErrorKind::DisplayVersion => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            _ => {
                eprintln!("{}", format_clap_error(&error));
                std::process::exit(2);
            }
        },
    }
}

fn collect_suites(cli: &Cli) -> Result<Vec<TestSuite>> {
    let mut suites = Vec::new();
    if let Some(json) = &cli.json {
        suites.push(load_json_str(json)?);
    }
    if !cli.tests.is_empty() {
        suites.extend(load_suites(&cli.tests)?);
    }
    Ok(suites)
}

fn main() -> Result<()> {
    i18n::init();
    let cli = parse_cli();

    // With -v, show INFO and above; RUST_LOG always wins
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "mini_suite=info".to_string()
        } else {
            "mini_suite=warn".to_string()
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        set_color_override(false);
    } else if cli.color {
        set_color_override(true);
    } else if !std::io::stdout().is_terminal() {
        set_color_override(false);
    }

    let suites = match collect_suites(&cli) {
        Ok(suites) => suites,
        Err(e) => {
            error!("{}", t_args!("error-loading", "error" => format!("{e:#}")));
            eprintln!("{} {e:#}", t!("cli-error-label").red().bold());
            std::process::exit(2);
        }
    };

    info!(
        "{}",
        t_args!("info-version",
            "name" => env!("CARGO_PKG_NAME"),
            "version" => env!("CARGO_PKG_VERSION")
        )
    );

    let opts = RenderOptions {
        kind: cli.output.into(),
        hide_passes: cli.hide_passes,
        hide_fails: cli.hide_fails,
    };

    // Several suites in JSON form are printed together as one array
    let json_array = opts.kind == OutputKind::Json && suites.len() > 1;
    let mut reports = Vec::with_capacity(suites.len());
    let mut aggregate = Summary::default();
    for suite in &suites {
        info!(
            "{}",
            t_args!("info-starting-suite", "name" => &suite.name, "count" => suite.entries.len())
        );
        let report = run_test_suite(suite, cli.parallel);
        info!(
            "{}",
            t_args!("info-finished",
                "passed" => report.passed,
                "failed" => report.failed,
                "errored" => report.errored
            )
        );
        if !cli.silent && !json_array {
            print_report(&report, &opts)?;
        }
        aggregate.absorb(&report);
        reports.push(report);
    }

    if !cli.silent && json_array {
        print!("{}", render_json_all(&reports)?);
    }

    if !cli.silent && suites.len() > 1 && opts.kind != OutputKind::Json {
        println!("{}", render_aggregate(&aggregate));
    }

    if !aggregate.all_passed() {
        std::process::exit(1);
    }
    Ok(())
}
