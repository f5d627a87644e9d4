// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use padcast::app_config::{self, Config, ProbeMode};
use padcast::app_controller::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the entry of a single pad (default command)
    Entry(EntryArgs),

    /// Create entries for all listed pads that have audio but no entry yet
    Bulk(BulkArgs),

    /// Generate shell completions for padcast
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by all processing commands
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Content file the entries are merged into
    #[arg(short = 'o', long)]
    content_file: Option<String>,

    /// File receiving summaries and warnings for reviewers
    #[arg(long)]
    comments_file: Option<String>,

    /// Print the entry instead of writing any file
    #[arg(long)]
    dry_run: bool,

    /// Refuse entries that raised warnings
    #[arg(long)]
    strict: bool,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Args, Debug)]
struct EntryArgs {
    /// Pad to process; defaults to the first pad linked on the listing page
    #[arg(value_name = "PAD_URL")]
    pad_url: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug)]
struct BulkArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Only report which pads lack entries or audio
    #[arg(short, long)]
    map_only: bool,

    /// Stop after creating this many entries (0 = no limit)
    #[arg(short = 'n', long)]
    max_new_entries: Option<usize>,

    /// Check the published media location instead of a local directory
    #[arg(long, alias = "file-online")]
    online: bool,

    /// Directory holding the recorded shows
    #[arg(short, long)]
    sound_dir: Option<String>,

    /// Skip pads that fail and keep going (default)
    #[arg(long, conflicts_with = "stop_on_error")]
    continue_on_error: bool,

    /// Abort at the first pad that fails
    #[arg(long)]
    stop_on_error: bool,
}

/// padcast - turns broadcast pads into podcast feed entries
///
/// Reads the collaborative notes pad of a broadcast, builds an episode entry
/// from its sections and merges it into the date-ordered content file.
#[derive(Parser, Debug)]
#[command(name = "padcast")]
#[command(version)]
#[command(about = "Turns broadcast pads into podcast feed entries")]
#[command(long_about = "padcast reads the HedgeDoc pad of a broadcast and merges an episode entry into the content file.

EXAMPLES:
    padcast                                          # Entry for the first pad on the listing page
    padcast https://pad.ccc-p.org/Radio_2024-01-15   # Entry for a specific pad
    padcast --dry-run https://pad.ccc-p.org/Radio_2024-01-15
    padcast bulk --sound-dir /srv/recordings         # Entries for every recorded pad
    padcast bulk --online --map-only                 # Report pads without entries
    padcast completions bash > padcast.bash          # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Pad to process; defaults to the first pad linked on the listing page
    #[arg(value_name = "PAD_URL")]
    pad_url: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for log level
    fn decoration_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌", "1;31"),
            Level::Warn => ("🚧", "1;33"),
            Level::Info => ("", "1;32"),
            Level::Debug => ("🔍", "1;36"),
            Level::Trace => ("📋", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, color) = Self::decoration_for_level(record.level());

            // stdout carries machine readable output only
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The level is lowered or raised once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "padcast", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Entry(args)) => run_entry(args).await,
        Some(Commands::Bulk(args)) => run_bulk(args).await,
        None => {
            run_entry(EntryArgs {
                pad_url: cli.pad_url,
                common: cli.common,
            })
            .await
        }
    }
}

async fn run_entry(args: EntryArgs) -> Result<()> {
    let config = load_config(&args.common)?;
    let controller = Controller::with_config(config)?;

    let summary = controller.run_single(args.pad_url).await?;
    println!("entrydate={}", summary.entry_date);
    if let Some(rendered) = summary.rendered {
        print!("{}", rendered);
    }
    Ok(())
}

async fn run_bulk(args: BulkArgs) -> Result<()> {
    let mut config = load_config(&args.common)?;

    if args.map_only {
        config.processing.map_only = true;
    }
    if let Some(max_new_entries) = args.max_new_entries {
        config.processing.max_new_entries = max_new_entries;
    }
    if args.online {
        config.audio.probe = ProbeMode::Remote;
    }
    if let Some(sound_dir) = args.sound_dir {
        config.audio.sound_dir = Some(sound_dir);
    }
    if args.continue_on_error {
        config.processing.continue_on_error = true;
    }
    if args.stop_on_error {
        config.processing.continue_on_error = false;
    }
    config.validate().context("Configuration validation failed")?;

    info!("Checking audio {}", config.audio.probe);
    let controller = Controller::with_config(config)?;
    let summary = controller.run_bulk().await?;

    if let Some(date) = summary.last_entry_date {
        println!("entrydate={}", date);
    }
    Ok(())
}

/// Load or create the configuration and apply the common CLI overrides
fn load_config(options: &CommonArgs) -> Result<Config> {
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(content_file) = &options.content_file {
        config.output.content_file = Some(content_file.clone());
    }
    if let Some(comments_file) = &options.comments_file {
        config.output.comments_file = Some(comments_file.clone());
    }
    if options.dry_run {
        config.output.content_file = None;
        config.output.comments_file = None;
    }
    if options.strict {
        config.processing.strict = true;
    }

    config.validate().context("Configuration validation failed")?;

    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    Ok(config)
}
