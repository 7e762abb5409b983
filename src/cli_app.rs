//! Top-level CLI definition and dispatch.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::control;
use serde_json::{Value, json};
use thiserror::Error;

use commit_size_guard::core::config::{CheckSettings, Config, ListFailurePolicy};
use commit_size_guard::core::errors::GuardError;
use commit_size_guard::gate::evaluator::{FsSizeProbe, Verdict};
use commit_size_guard::gate::report::{ReportStyle, render_report};
use commit_size_guard::gate::{CheckOutcome, check_staged_additions};
use commit_size_guard::logger::console::{Console, Verbosity};
use commit_size_guard::logger::jsonl::{EventType, JsonlConfig, JsonlWriter, LogEntry, Severity};
use commit_size_guard::vcs::process::SystemProcessRunner;
use commit_size_guard::vcs::staged::StagedAdditionsLister;

const CHECK_COMMAND: &str = "check-added-large-files";

/// Commit Size Guard — refuses commits that add files above a size limit.
#[derive(Debug, Parser)]
#[command(
    name = "csg",
    author,
    version,
    about = "Commit Size Guard - pre-commit hooks",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Increase verbosity.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Quiet mode (errors only).
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Prevent giant files from being committed.
    #[command(name = "check-added-large-files")]
    CheckAddedLargeFiles(CheckArgs),
    /// View and validate configuration.
    Config(ConfigArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args, Default)]
struct CheckArgs {
    /// Maximum allowable MiB for added files (0 disables the check) [default: 1.0].
    #[arg(long, value_name = "MIB", allow_negative_numbers = true)]
    max_mib: Option<f64>,
    /// Whether to display the remediation hint.
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    hint: Option<bool>,
    /// What to do when git cannot list staged files.
    #[arg(long, value_enum, value_name = "POLICY")]
    on_list_failure: Option<ListFailurePolicy>,
    /// Filenames passed by pre-commit; ignored, staged additions come from git.
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,
}

impl CheckArgs {
    /// Command-line flags win over file and environment configuration.
    fn apply_to(&self, settings: &mut CheckSettings) {
        if let Some(max_mib) = self.max_mib {
            settings.max_mib = max_mib;
        }
        if let Some(hint) = self.hint {
            settings.hint = hint;
        }
        if let Some(policy) = self.on_list_failure {
            settings.on_list_failure = policy;
        }
    }
}

#[derive(Debug, Clone, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Debug, Clone, Subcommand)]
enum ConfigCommand {
    /// Print the config file path.
    Path,
    /// Print the effective configuration.
    Show,
    /// Validate the effective configuration.
    Validate,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Shell to generate completion script for.
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
///
/// A refused commit is not an error; it is the `Ok(1)` exit status.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input or configuration.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI. `1` is reserved for refusal.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) | Self::Runtime(_) | Self::Io(_) => 2,
            Self::Json(_) => 3,
        }
    }
}

impl From<GuardError> for CliError {
    fn from(value: GuardError) -> Self {
        match value {
            GuardError::InvalidConfig { .. }
            | GuardError::MissingConfig { .. }
            | GuardError::ConfigParse { .. } => Self::User(value.to_string()),
            other => Self::Runtime(other.to_string()),
        }
    }
}

/// Dispatch CLI commands. Returns the process exit status on success.
pub fn run(cli: &Cli) -> Result<i32, CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    match &cli.command {
        Command::CheckAddedLargeFiles(args) => run_check(cli, args),
        Command::Config(args) => run_config(cli, args).map(|()| 0),
        Command::Completions(args) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(0)
        }
    }
}

fn run_check(cli: &Cli, args: &CheckArgs) -> Result<i32, CliError> {
    let console = console(cli);
    let mut config = Config::load(cli.config.as_deref())?;
    args.apply_to(&mut config.check);
    config.validate()?;
    let settings = config.check;

    if !args.files.is_empty() {
        console.info(
            "CSG-CHECK",
            &format!(
                "ignoring {} filename argument(s); staged additions are read from git",
                args.files.len()
            ),
        );
    }

    let runner = SystemProcessRunner;
    let lister = StagedAdditionsLister::new(&runner, &config.git.binary);
    let outcome = match check_staged_additions(&lister, &FsSizeProbe, settings) {
        Ok(outcome) => outcome,
        Err(err) => {
            if err.is_external_tool() {
                console.error(
                    "CSG-GIT",
                    &format!("{err}; aborting (on_list_failure=strict)"),
                );
                let entry =
                    LogEntry::new(EventType::ListFailure, Severity::Critical).with_error(&err);
                record_activity(&config, entry);
            }
            return Err(err.into());
        }
    };

    if let Some(err) = &outcome.list_error {
        console.warn(
            "CSG-GIT",
            &format!("{err}; continuing with no staged files (on_list_failure=lenient)"),
        );
    }
    if outcome.disabled {
        console.info("CSG-CHECK", "max_mib is 0, check disabled");
    } else {
        console.info(
            "CSG-CHECK",
            &format!(
                "{} staged addition(s), limit {:.1} MiB",
                outcome.listed, settings.max_mib
            ),
        );
    }
    for skipped in &outcome.evaluation.skipped {
        console.warn(
            "CSG-STAT",
            &format!(
                "error accessing file {}: {}",
                skipped.path.display(),
                skipped.error
            ),
        );
    }

    match output_mode(cli) {
        OutputMode::Human => {
            let report = render_report(
                &outcome.evaluation.refused,
                settings.max_mib,
                settings.hint,
                report_style(cli),
            );
            if !report.is_empty() {
                let mut stdout = io::stdout().lock();
                stdout.write_all(report.as_bytes())?;
                stdout.flush()?;
            }
        }
        OutputMode::Json => write_json_line(&check_payload(&outcome, settings)?)?,
    }

    record_activity(&config, activity_entry(&config, &outcome, settings));
    Ok(outcome.evaluation.verdict.exit_code())
}

fn check_payload(outcome: &CheckOutcome, settings: CheckSettings) -> Result<Value, CliError> {
    let evaluation = &outcome.evaluation;
    Ok(json!({
        "command": CHECK_COMMAND,
        "verdict": evaluation.verdict.as_str(),
        "disabled": outcome.disabled,
        "max_mib": settings.max_mib,
        "listed": outcome.listed,
        "refused": serde_json::to_value(&evaluation.refused)?,
        "skipped": serde_json::to_value(&evaluation.skipped)?,
        "max_refused_mib": evaluation.max_refused_mib(),
        "list_error": outcome.list_error.as_ref().map(|e| json!({
            "code": e.code(),
            "message": e.to_string(),
        })),
        "exit_code": evaluation.verdict.exit_code(),
    }))
}

fn activity_entry(config: &Config, outcome: &CheckOutcome, settings: CheckSettings) -> LogEntry {
    let evaluation = &outcome.evaluation;
    let (event, severity) = if outcome.disabled {
        (EventType::CheckDisabled, Severity::Info)
    } else if outcome.list_error.is_some() {
        (EventType::ListFailure, Severity::Warning)
    } else if evaluation.verdict == Verdict::Refuse {
        (EventType::CheckRefused, Severity::Warning)
    } else {
        (EventType::CheckAccepted, Severity::Info)
    };

    let mut entry = match &outcome.list_error {
        Some(err) => LogEntry::new(event, severity).with_error(err),
        None => LogEntry::new(event, severity),
    };
    entry.max_mib = Some(settings.max_mib);
    entry.config_hash = config.stable_hash().ok();
    if !outcome.disabled {
        entry.listed = Some(outcome.listed);
        entry.refused_count = Some(evaluation.refused.len());
        entry.skipped_count = Some(evaluation.skipped.len());
    }
    if !evaluation.refused.is_empty() {
        entry.paths = Some(
            evaluation
                .refused
                .iter()
                .map(|r| r.path.display().to_string())
                .collect(),
        );
    }
    entry
}

fn record_activity(config: &Config, entry: LogEntry) {
    if let Some(path) = &config.paths.jsonl_log {
        JsonlWriter::open(JsonlConfig::new(path)).write_entry(&entry);
    }
}

fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<(), CliError> {
    match args.command.as_ref().unwrap_or(&ConfigCommand::Show) {
        ConfigCommand::Path => {
            let path = cli.config.clone().unwrap_or_else(Config::default_path);
            match output_mode(cli) {
                OutputMode::Human => println!("{}", path.display()),
                OutputMode::Json => write_json_line(&json!({
                    "command": "config path",
                    "path": path.to_string_lossy(),
                    "exists": path.exists(),
                }))?,
            }
        }
        ConfigCommand::Show => {
            let config = Config::load(cli.config.as_deref())?;
            match output_mode(cli) {
                OutputMode::Human => print!("{}", config.to_toml()?),
                OutputMode::Json => write_json_line(&json!({
                    "command": "config show",
                    "path": config.paths.config_file.to_string_lossy(),
                    "config": serde_json::to_value(&config)?,
                    "hash": config.stable_hash()?,
                }))?,
            }
        }
        ConfigCommand::Validate => {
            let config = Config::load(cli.config.as_deref())?;
            match output_mode(cli) {
                OutputMode::Human => {
                    println!("config ok: {}", config.paths.config_file.display());
                }
                OutputMode::Json => write_json_line(&json!({
                    "command": "config validate",
                    "status": "ok",
                    "path": config.paths.config_file.to_string_lossy(),
                }))?,
            }
        }
    }
    Ok(())
}

fn console(cli: &Cli) -> Console {
    Console::new(Verbosity::from_flags(cli.verbose, cli.quiet))
}

fn report_style(cli: &Cli) -> ReportStyle {
    let no_color_env = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    ReportStyle {
        color: !cli.no_color && !no_color_env && io::stdout().is_terminal(),
    }
}

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("CSG_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref())
}

/// Hooks usually run with stdout piped, so unlike a tty-aware default the
/// human report stays the fallback.
fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    match env_mode
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputMode::Json,
        _ => OutputMode::Human,
    }
}
