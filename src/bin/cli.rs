//! Rozklad CLI
//!
//! Parses rozklad.kpi.ua group schedule pages into JSON timetables.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rozklad::{
    error::{AppError, Result},
    models::{Config, SlotIdentifier},
    pipeline,
};

/// rozklad - KPI timetable parser
#[derive(Parser, Debug)]
#[command(
    name = "rozklad",
    version,
    about = "Reconstructs timetables from rozklad.kpi.ua schedule pages"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "rozklad.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a group schedule page into JSON
    Parse {
        #[command(flatten)]
        source: PageSource,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the lesson a teacher holds in one slot
    Teacher {
        /// Teacher schedule reference (the `v=` value)
        teacher_ref: String,

        /// One-based pair number
        #[arg(long)]
        pair: u8,

        /// One-based day number (1 = Monday)
        #[arg(long)]
        day: u8,

        /// Week number (1 or 2)
        #[arg(long, default_value_t = 1)]
        week: u8,
    },

    /// Validate the configuration file
    Validate,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct PageSource {
    /// Group schedule reference (the `g=` value)
    #[arg(long)]
    group: Option<String>,

    /// Saved group schedule page
    #[arg(long)]
    file: Option<PathBuf>,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Validation must see the file as written, not the defaults
    let config = match cli.command {
        Command::Validate => Config::load(&cli.config)?,
        _ => Config::load_or_default(&cli.config),
    };

    match cli.command {
        Command::Parse { source, output } => {
            config.validate()?;

            let report = match (source.group, source.file) {
                (Some(group), _) => pipeline::run_group(&config, &group).await?,
                (None, Some(file)) => pipeline::run_file(&config, &file).await?,
                (None, None) => {
                    return Err(AppError::config("Either --group or --file is required"));
                }
            };

            pipeline::write_output(&report.schedule, output.as_deref()).await?;

            let summary = &report.summary;
            log::info!("Lessons: {}", summary.lesson_count);
            log::info!("Fingerprint: {}", summary.fingerprint);
            for issue in &summary.shape_issues {
                log::warn!(
                    "Week {} left empty: table has {} rows, {} columns",
                    issue.week_number,
                    issue.rows,
                    issue.columns
                );
            }
        }

        Command::Teacher {
            teacher_ref,
            pair,
            day,
            week,
        } => {
            config.validate()?;

            let pair_index = pair
                .checked_sub(1)
                .ok_or_else(|| AppError::invalid_slot("pair numbers start at 1"))?;
            let day_index = day
                .checked_sub(1)
                .ok_or_else(|| AppError::invalid_slot("day numbers start at 1"))?;
            let slot = SlotIdentifier::new(pair_index, day_index, week, config.parser.semester)?;
            let teacher_pair = pipeline::run_teacher(&config, &teacher_ref, &slot).await?;
            println!("{}", serde_json::to_string_pretty(&teacher_pair)?);
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
            log::debug!("Effective configuration:\n{}", config.to_toml()?);
        }
    }

    Ok(())
}
