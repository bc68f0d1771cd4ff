mod error_formatter;
mod formatter;

use aisp::report::ErrorReport;
use aisp::{parse, AispError, DocumentReport, Lexer, Registry, RegistryConfig, TokenKind};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use formatter::Formatter;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "aisp")]
#[command(about = "Static validator for AISP symbolic documents.")]
#[command(
    long_about = "AISP documents are dense symbolic statements meant for machine consumption.\nThe CLI parses .aisp files, type-checks their bindings, and reports density, ambiguity and quality tier."
)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate documents and report their tier
    ///
    /// Accepts files and directories; directories are searched for .aisp
    /// files. Exits with status 1 when any document fails to parse, fails
    /// validation, or exceeds the ambiguity ceiling.
    Check {
        /// Files or directories to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
        /// Fail documents whose ambiguity exceeds this ceiling
        #[arg(long, value_name = "CEILING")]
        max_ambiguity: Option<f32>,
        /// JSON registry configuration (limits and slot count)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the token stream of a document
    Tokens {
        /// Document to tokenize
        file: PathBuf,
    },
    /// Show the terms and bindings of a document
    ///
    /// Bindings are listed with their compatibility class.
    Inspect {
        /// Document to inspect
        file: PathBuf,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Result of checking one file
#[derive(Debug, Serialize)]
pub struct FileOutcome {
    pub path: String,
    pub passed: bool,
    pub report: Option<DocumentReport>,
    pub error: Option<ErrorReport>,
    #[serde(skip)]
    pub failure: Option<AispError>,
}

impl FileOutcome {
    fn failed(path: String, report: Option<DocumentReport>, failure: AispError) -> Self {
        Self {
            path,
            passed: false,
            report,
            error: Some(ErrorReport::from(&failure)),
            failure: Some(failure),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Check {
            paths,
            format,
            max_ambiguity,
            config,
        } => check_command(paths, *format, *max_ambiguity, config.as_deref()),
        Commands::Tokens { file } => tokens_command(file),
        Commands::Inspect { file } => inspect_command(file),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "aisp=warn",
        1 => "aisp=debug",
        _ => "aisp=trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(io::stderr)
        .init();
}

/// Returns whether every document passed
fn check_command(
    paths: &[PathBuf],
    format: OutputFormat,
    max_ambiguity: Option<f32>,
    config: Option<&Path>,
) -> Result<bool> {
    let config = match config {
        Some(path) => load_config(path)?,
        None => RegistryConfig::default(),
    };
    let mut registry = Registry::with_config(config);

    let files = collect_files(paths)?;
    info!(files = files.len(), "checking documents");

    let mut outcomes = Vec::with_capacity(files.len());
    for path in &files {
        let source = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let outcome = check_file(&mut registry, path, &source, max_ambiguity)?;

        if format == OutputFormat::Text {
            if let Some(failure) = &outcome.failure {
                let text = String::from_utf8_lossy(&source);
                eprintln!(
                    "{}",
                    error_formatter::format_error(failure, &outcome.path, &text)
                );
            }
        }
        outcomes.push(outcome);
    }

    let formatter = Formatter::default();
    match format {
        OutputFormat::Text => print!("{}", formatter.format_check_summary(&outcomes)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcomes)?),
    }

    Ok(outcomes.iter().all(|outcome| outcome.passed))
}

fn check_file(
    registry: &mut Registry,
    path: &Path,
    source: &[u8],
    max_ambiguity: Option<f32>,
) -> Result<FileOutcome> {
    let path = path.display().to_string();

    let handle = match registry.parse(source) {
        Ok(handle) => handle,
        Err(e) => {
            debug!(%path, error = %e, "parse failed");
            return Ok(FileOutcome::failed(path, None, e));
        }
    };

    let outcome = match registry.report(handle) {
        Ok(report) => {
            // Repeats the verdict the report already holds
            let failure = registry.validate(handle).err().or_else(|| {
                max_ambiguity.and_then(|ceiling| registry.check_ambiguity(handle, ceiling).err())
            });
            match failure {
                Some(e) => FileOutcome::failed(path, Some(report), e),
                None => FileOutcome {
                    path,
                    passed: true,
                    report: Some(report),
                    error: None,
                    failure: None,
                },
            }
        }
        Err(e) => FileOutcome::failed(path, None, e),
    };

    registry
        .release(handle)
        .with_context(|| format!("releasing {}", outcome.path))?;
    Ok(outcome)
}

fn tokens_command(file: &Path) -> Result<bool> {
    let source = read_source(file)?;
    let limits = RegistryConfig::default().limits;

    let tokens = Lexer::new(&source, &limits)
        .and_then(|lexer| lexer.tokenize())
        .map_err(|e| report_error(&e, file, &source))?;

    let tokens: Vec<_> = tokens
        .into_iter()
        .filter(|token| token.kind != TokenKind::Eof)
        .collect();
    print!("{}", Formatter::default().format_tokens(&tokens));
    Ok(true)
}

fn inspect_command(file: &Path) -> Result<bool> {
    let source = read_source(file)?;
    let limits = RegistryConfig::default().limits;

    let mut document = parse(&source, &limits).map_err(|e| report_error(&e, file, &source))?;
    let valid = match document.validate() {
        Ok(()) => true,
        Err(e) => {
            let text = String::from_utf8_lossy(&source);
            eprintln!(
                "{}",
                error_formatter::format_error(&e, &file.display().to_string(), &text)
            );
            false
        }
    };

    print!(
        "{}",
        Formatter::default().format_document_inspection(&document)
    );
    Ok(valid)
}

fn read_source(file: &Path) -> Result<Vec<u8>> {
    fs::read(file).with_context(|| format!("reading {}", file.display()))
}

fn report_error(error: &AispError, file: &Path, source: &[u8]) -> anyhow::Error {
    let text = String::from_utf8_lossy(source);
    eprintln!(
        "{}",
        error_formatter::format_error(error, &file.display().to_string(), &text)
    );
    anyhow::anyhow!("{} failed to parse", file.display())
}

fn load_config(path: &Path) -> Result<RegistryConfig> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

/// Expand directories into their .aisp files, keeping explicit files as given
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry?;
                if entry.path().extension().and_then(|s| s.to_str()) == Some("aisp") {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else if path.exists() {
            files.push(path.clone());
        } else {
            anyhow::bail!("{} does not exist", path.display());
        }
    }
    Ok(files)
}
