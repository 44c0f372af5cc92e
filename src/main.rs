// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::database::models::EntityDef;

mod app_config;
mod codec;
mod database;
mod embedded;
mod errors;
mod locale;
mod locale_utils;
mod migration;

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

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a migration creating the companion translations table
    #[command(alias = "l10n-table")]
    MakeTable(MakeTableArgs),

    /// Generate shell completions for lingostore
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct MakeTableArgs {
    /// Parent table name (e.g. 'posts')
    #[arg(value_name = "TABLE")]
    table: String,

    /// Translatable column to declare (repeatable)
    #[arg(short = 'C', long = "column", value_name = "NAME")]
    columns: Vec<String>,

    /// Directory receiving the migration file
    #[arg(short, long, default_value = "migrations")]
    dir: PathBuf,

    /// Primary key column name of the parent table
    #[arg(long, default_value = "id")]
    key_name: String,

    /// Declared type of the parent primary key
    #[arg(long, default_value = "INTEGER")]
    key_type: String,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// lingostore - locale-aware persistence for SQLite records
///
/// Stores per-locale attribute values either embedded in the parent row or
/// in a companion translations table, and generates the migrations for the
/// companion-table strategy.
#[derive(Parser, Debug)]
#[command(name = "lingostore")]
#[command(version = "0.1.0")]
#[command(about = "Locale-aware persistence toolkit")]
#[command(long_about = "lingostore manages per-locale attribute values for SQLite records.

EXAMPLES:
    lingostore make-table posts -C title -C content   # Migration for posts_l10n
    lingostore make-table posts -C title -d db/migrations
    lingostore make-table products -C name --key-type TEXT
    lingostore completions bash > lingostore.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
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

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "lingostore", &mut std::io::stdout());
            Ok(())
        }
        Commands::MakeTable(args) => run_make_table(args),
    }
}

fn run_make_table(options: MakeTableArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        // Create default configuration if not exists
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );

        let config = Config::default();
        config
            .save_to_file(config_path)
            .with_context(|| format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    if options.columns.is_empty() {
        return Err(anyhow!(
            "At least one translatable column is required (use --column)"
        ));
    }

    let columns: Vec<&str> = options.columns.iter().map(String::as_str).collect();
    let entity = EntityDef::new(options.table.clone(), &columns)
        .with_primary_key(options.key_name.clone());

    let path = migration::generate_l10n_migration(
        &options.dir,
        &entity,
        &config,
        &options.key_type,
    )
    .with_context(|| format!("Failed to generate migration for table '{}'", options.table))?;

    info!("Migration created at {}", path.display());
    Ok(())
}
