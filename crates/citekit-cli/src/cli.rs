//! CLI definition and command dispatch for citekit.
//!
//! ## Configuration Precedence
//!
//! Configuration is resolved with the following precedence (highest to lowest):
//! 1. CLI flags (e.g., `--config`, `--strategy`, `--verbose`)
//! 2. Environment variables (`CITEKIT_CONFIG`, `CITEKIT_STRATEGY`, `CITEKIT_VERBOSE`)
//! 3. Config file (`~/.citekit/config.yaml` or path from `--config`/`CITEKIT_CONFIG`)
//! 4. Built-in defaults

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::ui::format::truncate_snippet;
use crate::ui::{ColorMode, MessageType, Style};

use citekit_core::{
    parse_ledger, parse_results, AggregateSearchResult, CitationStrategy, CiteConfig, CiteEngine,
    CiteError, FinalizeReport, ScannedCitation, SearchResultsCollector,
};

// ============================================================================
// CLI Definition
// ============================================================================

/// Version string including git commit hash
const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

/// Snippets longer than this are truncated in human-readable output.
const SNIPPET_DISPLAY_CHARS: usize = 72;

/// citekit - resolve bracketed citations in model answers
#[derive(Parser, Debug)]
#[command(name = "citekit")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, env = "CITEKIT_VERBOSE")]
    pub verbose: bool,

    /// Suppress informational messages
    #[arg(short, long, global = true, env = "CITEKIT_QUIET")]
    pub quiet: bool,

    /// Path to configuration file (default: ~/.citekit/config.yaml)
    #[arg(long, global = true, env = "CITEKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Color output mode: always, never, or auto (default: auto)
    #[arg(long, global = true, env = "CITEKIT_COLOR", default_value = "auto")]
    pub color: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List bracket references and their sentence snippets
    #[command(after_help = r#"EXAMPLES:
    # Scan an answer file
    citekit scan answer.txt

    # Scan from stdin as JSON
    echo "Paris[2] is big." | citekit scan --json
"#)]
    Scan {
        /// Answer text file, or `-` for stdin
        #[arg(default_value = "-")]
        input: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Renumber references and bind them to retrieved sources
    #[command(after_help = r#"EXAMPLES:
    # Finalize with the configured strategy
    citekit finalize answer.txt --results results.json

    # Force the aggregator strategy and emit JSON
    citekit finalize answer.txt --results results.json --strategy aggregator --json

    # Bind against the ledger recorded during retrieval
    citekit finalize answer.txt -r results.json --ledger ledger.json --strategy aggregator
"#)]
    Finalize {
        /// Answer text file, or `-` for stdin
        #[arg(default_value = "-")]
        input: String,

        /// Aggregate search results (JSON)
        #[arg(long, short)]
        results: PathBuf,

        /// Collector ledger recorded during retrieval (JSON array); defaults to
        /// the results in category order
        #[arg(long)]
        ledger: Option<PathBuf>,

        /// Citation strategy: position or aggregator
        #[arg(long, env = "CITEKIT_STRATEGY")]
        strategy: Option<String>,

        /// Output the full report as JSON
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(long, requires = "json")]
        pretty: bool,
    },

    /// Render retrieved sources for a prompt or a client stream
    Render {
        #[command(subcommand)]
        target: RenderTarget,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum RenderTarget {
    /// Plain text with `Source [n]:` headers
    Prompt {
        /// Aggregate search results (JSON)
        #[arg(long, short)]
        results: PathBuf,

        /// Collector ledger supplying the aggregator indices (JSON array)
        #[arg(long)]
        ledger: Option<PathBuf>,
    },
    /// `<tag>[json]</tag>` segments
    Stream {
        /// Aggregate search results (JSON)
        #[arg(long, short)]
        results: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved configuration
    Show {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Validate the configuration file
    Check {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

// ============================================================================
// Entry point
// ============================================================================

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Warnings always (config issues), debug only with --verbose.
    let log_level = if cli.verbose { "debug" } else { "warn" };
    let filter = format!("citekit_core={},citekit_cli={}", log_level, log_level);

    tracing_subscriber::fmt()
        .with_env_filter(&filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let color_mode = ColorMode::from_flag(&cli.color).unwrap_or_default();
    let style = Style::new(color_mode);

    // Config commands report on the file themselves, before an engine exists.
    if let Command::Config { action } = &cli.command {
        return finish(&style, handle_config(&style, cli.config.as_deref(), action));
    }

    let engine = match &cli.config {
        Some(config_path) => CiteEngine::with_config(config_path),
        None => CiteEngine::with_defaults(),
    };

    let mut engine = match engine {
        Ok(engine) => engine,
        Err(e) => {
            let hint = match &cli.config {
                Some(path) => format!("Check your config at {}", path.display()),
                None => "Check your config at ~/.citekit/config.yaml".to_string(),
            };
            eprintln!(
                "{}",
                style.error_with_context(
                    "Failed to initialize citekit engine",
                    Some(&e.to_string()),
                    Some(&hint),
                )
            );
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Command::Scan { input, json } => handle_scan(&style, &engine, &input, json, cli.quiet),
        Command::Finalize {
            input,
            results,
            ledger,
            strategy,
            json,
            pretty,
        } => {
            if let Some(name) = strategy {
                match name.parse::<CitationStrategy>() {
                    Ok(s) => engine.set_strategy(s),
                    Err(e) => {
                        eprintln!(
                            "{}",
                            style.error_with_context(
                                &format!("Invalid strategy '{}'", name),
                                Some(&e.to_string()),
                                Some("Valid options: position, aggregator"),
                            )
                        );
                        return ExitCode::FAILURE;
                    }
                }
            }
            let paths = FinalizePaths {
                input: &input,
                results: &results,
                ledger: ledger.as_deref(),
            };
            handle_finalize(&style, &engine, paths, json, pretty, cli.quiet)
        }
        Command::Render { target } => handle_render(&engine, target),
        Command::Config { .. } => Ok(()),
    };

    finish(&style, result)
}

fn finish(style: &Style, result: Result<(), CiteError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", style.message(MessageType::Err, &e.to_string()));
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// Input helpers
// ============================================================================

fn read_input(input: &str) -> Result<String, CiteError> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    fs::read_to_string(input)
        .map_err(|e| CiteError::InvalidInput(format!("cannot read `{}`: {}", input, e)))
}

fn load_results(path: &Path) -> Result<AggregateSearchResult, CiteError> {
    let content = fs::read_to_string(path).map_err(|e| {
        CiteError::InvalidInput(format!("cannot read results `{}`: {}", path.display(), e))
    })?;
    let results = parse_results(&content)?;
    tracing::debug!("Loaded {} sources from {}", results.len(), path.display());
    Ok(results)
}

fn load_ledger(path: &Path) -> Result<SearchResultsCollector, CiteError> {
    let content = fs::read_to_string(path).map_err(|e| {
        CiteError::InvalidInput(format!("cannot read ledger `{}`: {}", path.display(), e))
    })?;
    let ledger = parse_ledger(&content)?;
    tracing::debug!("Loaded {} ledger entries from {}", ledger.len(), path.display());
    Ok(ledger)
}

// ============================================================================
// Command handlers
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanEntry<'a> {
    #[serde(flatten)]
    occurrence: ScannedCitation,
    snippet: &'a str,
}

fn handle_scan(
    style: &Style,
    engine: &CiteEngine,
    input: &str,
    json: bool,
    quiet: bool,
) -> Result<(), CiteError> {
    let text = read_input(input)?;
    let found = engine.scan(&text);

    if json {
        let entries: Vec<ScanEntry> = found
            .iter()
            .map(|occ| ScanEntry {
                occurrence: *occ,
                snippet: text
                    .get(occ.snippet_start_index..occ.snippet_end_index)
                    .unwrap_or_default(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if !quiet {
        println!(
            "{}",
            style.message(MessageType::Info, &format!("Found {} citation(s)", found.len()))
        );
    }
    for occ in &found {
        let snippet = text
            .get(occ.snippet_start_index..occ.snippet_end_index)
            .unwrap_or_default();
        println!(
            "  {} {}..{}  {}",
            style.bracket(occ.raw_index),
            occ.start_index,
            occ.end_index,
            truncate_snippet(snippet, SNIPPET_DISPLAY_CHARS)
        );
    }
    Ok(())
}

struct FinalizePaths<'a> {
    input: &'a str,
    results: &'a Path,
    ledger: Option<&'a Path>,
}

fn handle_finalize(
    style: &Style,
    engine: &CiteEngine,
    paths: FinalizePaths<'_>,
    json: bool,
    pretty: bool,
    quiet: bool,
) -> Result<(), CiteError> {
    let text = read_input(paths.input)?;
    let results = load_results(paths.results)?;
    let report = match paths.ledger {
        Some(path) => engine.finalize_with_ledger(&text, &results, &load_ledger(path)?),
        None => engine.finalize(&text, &results),
    };

    if json {
        let out = if pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        println!("{}", out);
        return Ok(());
    }

    println!("{}", report.text);
    if quiet {
        return Ok(());
    }

    println!();
    print_report_summary(style, &report);
    Ok(())
}

fn print_report_summary(style: &Style, report: &FinalizeReport) {
    println!("{}", style.section("CITATIONS"));
    for cit in &report.citations {
        let label = cit
            .source_type()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "none".to_string());
        println!(
            "  {} <- [{}]  {}",
            style.bracket(cit.index),
            cit.raw_index,
            style.source_label(&label, cit.is_resolved())
        );
    }
    println!();

    println!("{}", style.key_value("Strategy", &report.strategy.to_string()));
    if let Some(ledger) = &report.ledger {
        let order: Vec<String> = ledger.iter().map(|r| r.aggregator_index.to_string()).collect();
        println!("{}", style.key_value("Ledger order", &order.join(", ")));
    }
    let summary = format!(
        "{} citation(s), {} resolved, {} unresolved",
        report.citations.len(),
        report.resolved,
        report.unresolved
    );
    if report.unresolved == 0 {
        println!("{}", style.message(MessageType::Ok, &summary));
    } else {
        println!("{}", style.message(MessageType::Warn, &summary));
    }
}

fn handle_render(engine: &CiteEngine, target: RenderTarget) -> Result<(), CiteError> {
    match target {
        RenderTarget::Prompt { results, ledger } => {
            let results = load_results(&results)?;
            let prompt = match ledger {
                Some(path) => engine.render_prompt_with_ledger(&results, &load_ledger(&path)?),
                None => engine.render_prompt(&results),
            };
            println!("{}", prompt);
        }
        RenderTarget::Stream { results } => {
            let results = load_results(&results)?;
            println!("{}", engine.render_stream(&results));
        }
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigCheck {
    path: Option<PathBuf>,
    exists: bool,
    valid: bool,
    warnings: Vec<String>,
    errors: Vec<String>,
}

fn handle_config(
    style: &Style,
    config_path: Option<&Path>,
    action: &ConfigAction,
) -> Result<(), CiteError> {
    let path = config_path
        .map(Path::to_path_buf)
        .or_else(CiteConfig::default_path);

    match action {
        ConfigAction::Show { json } => handle_config_show(style, path.as_deref(), *json),
        ConfigAction::Check { json } => handle_config_check(style, path, *json),
    }
}

/// Show the resolved configuration (file merged over defaults).
fn handle_config_show(style: &Style, path: Option<&Path>, json: bool) -> Result<(), CiteError> {
    let config = match path {
        Some(p) => CiteConfig::from_path(p)?,
        None => CiteConfig::default(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        let source = path
            .filter(|p| p.exists())
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in defaults".to_string());
        println!(
            "{}",
            style.message(MessageType::Info, &format!("Resolved configuration ({}):", source))
        );
        println!();
        print!("{}", config.to_yaml()?);
    }
    Ok(())
}

/// Validate the configuration file and report errors/warnings.
fn handle_config_check(style: &Style, path: Option<PathBuf>, json: bool) -> Result<(), CiteError> {
    let exists = path.as_deref().is_some_and(Path::exists);
    let mut check = ConfigCheck {
        path: path.clone(),
        exists,
        valid: true,
        warnings: Vec::new(),
        errors: Vec::new(),
    };

    if let Some(p) = path.as_deref() {
        match CiteConfig::from_path(p) {
            Ok(config) => check.warnings = config.validate()?,
            Err(e) => {
                check.valid = false;
                check.errors.push(e.to_string());
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&check)?);
    } else {
        let status = match (check.exists, check.valid) {
            (false, _) => "-",
            (true, true) => "✓",
            (true, false) => "✗",
        };
        let shown = check
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(no home directory)".to_string());
        println!("  {} {}", status, shown);
        println!();

        if !check.warnings.is_empty() {
            println!(
                "{}",
                style.message(MessageType::Warn, &format!("{} warning(s):", check.warnings.len()))
            );
            for warning in &check.warnings {
                println!("  • {}", warning);
            }
            println!();
        }
        for error in &check.errors {
            println!("  • {}", error);
        }

        if !check.valid {
            println!("{}", style.message(MessageType::Err, "Configuration has errors"));
        } else if !check.exists {
            println!(
                "{}",
                style.message(MessageType::Ok, "No configuration file, using defaults")
            );
            println!(
                "{}",
                style.message(
                    MessageType::Hint,
                    "Create the file with a `citations:` section to override defaults"
                )
            );
        } else if check.warnings.is_empty() {
            println!("{}", style.message(MessageType::Ok, "Configuration is valid"));
        } else {
            println!(
                "{}",
                style.message(MessageType::Ok, "Configuration is valid with warnings")
            );
        }
    }

    if !check.valid {
        return Err(CiteError::InvalidConfiguration {
            message: format!("{} configuration error(s) found", check.errors.len()),
            hint: "Run `citekit config check` for details".to_string(),
        });
    }
    Ok(())
}
