//! CLI entry and dispatch.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use cuecraft_lib::core::captions::{parse_file, parse_reader, Document, ParseOptions, ParsedDocument};
use cuecraft_lib::core::settings::{default_settings_dir, AppSettings, SettingsManager};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "cuecraft")]
#[command(version)]
#[command(about = "Inspect, re-chunk and regenerate WebVTT captions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,
}

/// Options shared by every subcommand.
#[derive(clap::Args, Debug, Clone, Default)]
struct GlobalArgs {
    /// Break transcript lines into entries of at most --max-tokens words
    #[arg(long, global = true)]
    wrap: bool,

    /// Words per transcript entry (implies --wrap)
    #[arg(long, value_name = "N", global = true)]
    max_tokens: Option<usize>,

    /// Split cues holding more than --max-lines transcript lines
    #[arg(long, global = true)]
    split: bool,

    /// Transcript lines per cue (implies --split)
    #[arg(long, value_name = "N", global = true)]
    max_lines: Option<usize>,

    /// Settings directory (default: platform config dir)
    #[arg(long, value_name = "DIR", global = true)]
    config_dir: Option<PathBuf>,

    /// Fail on the first malformed timestamp line instead of skipping it
    #[arg(long, global = true)]
    strict: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Parse a WebVTT file and write it back in canonical form
    Convert {
        /// Input file, or - for stdin
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Print the parsed cues
    Inspect {
        /// Input file, or - for stdin
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output format (default: from settings)
        #[arg(long, value_enum)]
        format: Option<commands::inspect::InspectFormat>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ConfigCommands {
    /// Print the effective settings as JSON
    Show,
    /// Print the path of the settings file
    Path,
    /// Delete the settings file, restoring defaults
    Reset,
    /// Write a default settings file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);
    tracing::trace!("Args: {:?}", cli);
    dispatch(cli)
}

fn dispatch(cli: Cli) -> Result<()> {
    let manager = settings_manager(&cli.global);
    let mut settings = manager.load();
    apply_overrides(&mut settings, &cli.global);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Convert { input, output } => commands::convert::run(
            &input,
            output.as_deref(),
            &settings,
            cli.global.strict,
            &mut out,
        ),

        Commands::Inspect { input, format } => {
            commands::inspect::run(&input, format, &settings, cli.global.strict, &mut out)
        }

        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config::show(&settings, &mut out),
            ConfigCommands::Path => commands::config::path(&manager, &mut out),
            ConfigCommands::Reset => commands::config::reset(&manager, &mut out),
            ConfigCommands::Init => commands::config::init(&manager, &mut out),
        },
    }
}

/// Installs the stderr subscriber; stdout carries command output only.
fn init_logging(verbose: u8) {
    use tracing_subscriber::prelude::*;

    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let env_filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer);

    // Avoid panics if already initialized.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn settings_manager(global: &GlobalArgs) -> SettingsManager {
    let dir = global
        .config_dir
        .clone()
        .unwrap_or_else(default_settings_dir);
    SettingsManager::new(dir)
}

/// Applies command-line flags on top of the loaded settings for this run only.
fn apply_overrides(settings: &mut AppSettings, global: &GlobalArgs) {
    if global.wrap {
        settings.word_wrap.enabled = true;
    }
    if let Some(max) = global.max_tokens {
        settings.word_wrap.enabled = true;
        settings.word_wrap.max_tokens_per_line = max;
    }
    if global.split {
        settings.cue_split.enabled = true;
    }
    if let Some(max) = global.max_lines {
        settings.cue_split.enabled = true;
        settings.cue_split.max_lines_per_cue = max;
    }
    settings.normalize();
}

/// Parses `input`, where `-` means stdin.
pub(crate) fn read_document(input: &Path, options: &ParseOptions) -> Result<ParsedDocument> {
    if input == Path::new("-") {
        let stdin = std::io::stdin();
        parse_reader(stdin.lock(), options).context("read WebVTT from stdin")
    } else {
        parse_file(input, options).with_context(|| format!("read {}", input.display()))
    }
}

/// Reports skipped timestamp lines on stderr; in strict mode the first one is fatal.
pub(crate) fn accept_document(parsed: ParsedDocument, input: &Path, strict: bool) -> Result<Document> {
    if strict {
        return parsed
            .into_strict()
            .with_context(|| format!("malformed timestamp in {}", input.display()));
    }

    for err in &parsed.errors {
        eprintln!(
            "warning: {}:{}: {} (cue skipped)",
            input.display(),
            err.line,
            err.error
        );
    }
    Ok(parsed.document)
}
