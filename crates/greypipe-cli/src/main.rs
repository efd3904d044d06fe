use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::glob;
use tracing_subscriber::EnvFilter;

use greypipe_core::{RelayOptions, StreamInput, StreamOutput, relay_stream};

#[derive(Parser, Debug)]
#[command(name = "greypipe")]
#[command(version)]
#[command(long_version = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("GREYPIPE_BUILD_COMMIT"),
    ", ",
    env!("GREYPIPE_BUILD_DATE"),
    ")"
))]
#[command(
    about = "Converts a GREY-encoded video stream into lighting daemon command lines.",
    long_about = None,
    after_help = "Examples:\n  ffmpeg -i show.mkv -f yuv4mpegpipe - | greypipe convert\n  greypipe convert capture.grey -o commands.txt\n  greypipe convert capture.grey --summary summary.json --pretty"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a GREY byte stream into one command line per frame.
    #[command(
        after_help = "Examples:\n  greypipe convert capture.grey\n  greypipe convert - --progress 100 | ola_streaming_client --stdin"
    )]
    Convert {
        /// Path to a GREY stream dump, or `-` for stdin (the default)
        input: Option<PathBuf>,

        /// Output path for command lines (defaults to stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Write a JSON conversion summary here once the stream ends
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Pretty-print the JSON summary
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON summary (default)
        #[arg(long)]
        compact: bool,

        /// Log conversion progress every N frames (0 = off)
        #[arg(long, default_value_t = 0)]
        progress: u64,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            summary,
            pretty,
            compact,
            progress,
            quiet,
        } => {
            init_logging(quiet);
            cmd_convert(input, output, summary, pretty, compact, progress, quiet)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

fn init_logging(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_convert(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    summary_path: Option<PathBuf>,
    pretty: bool,
    compact: bool,
    progress: u64,
    quiet: bool,
) -> Result<(), CliError> {
    let input_path = match input {
        None => None,
        Some(path) if path.as_os_str() == "-" => None,
        Some(path) => {
            let resolved = resolve_input_path(&path)?;
            validate_input_file(&resolved)?;
            tracing::debug!(input = %resolved.display(), "resolved input path");
            Some(resolved)
        }
    };

    let stream_input = StreamInput::open(input_path.as_deref()).map_err(|err| {
        CliError::new(
            err.to_string(),
            Some("use a readable GREY stream dump, or `-` for stdin".to_string()),
        )
    })?;

    if let Some(parent) = output.as_ref().and_then(|path| path.parent()) {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    let stream_output = StreamOutput::create(output.as_deref()).map_err(|err| {
        CliError::new(
            err.to_string(),
            Some("choose a writable output path, or omit -o for stdout".to_string()),
        )
    })?;

    let options = RelayOptions {
        progress_interval: progress,
    };
    let summary = relay_stream(stream_input, stream_output, &options)
        .context("GREY stream conversion failed")?;

    if let Some(path) = summary_path {
        let json = serialize_summary(&summary, pretty, compact)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create summary directory: {}", parent.display())
                })?;
            }
        }
        fs::write(&path, json)
            .with_context(|| format!("Failed to write summary: {}", path.display()))?;
        if !quiet {
            eprintln!("OK: summary written -> {}", path.display());
        }
    }

    if !quiet {
        eprintln!("OK: {} frame(s) converted", summary.frames_converted);
    }
    Ok(())
}

fn serialize_summary(
    summary: &greypipe_core::RelaySummary,
    pretty: bool,
    compact: bool,
) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one summary format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(summary)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(summary)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn validate_input_file(input: &PathBuf) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a GREY stream dump, or `-` for stdin".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a GREY stream dump, or `-` for stdin".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &PathBuf) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.clone());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let hint = "pass a single stream dump, or run once per file".to_string();
        let mut message = format!(
            "multiple files match pattern '{}' ({} matches)",
            pattern,
            matches.len()
        );
        let listed = matches.iter().take(3).collect::<Vec<_>>();
        if !listed.is_empty() {
            let mut details = String::new();
            details.push_str("; matches: ");
            details.push_str(
                &listed
                    .into_iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            );
            if matches.len() > 3 {
                details.push_str(", ...");
            }
            message.push_str(&details);
        }
        return Err(CliError::new(message, Some(hint)));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
