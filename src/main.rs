//! Statusctl — reports and retention for a project status-change log.
//!
//! Reads a status-change database and turns it into weekly and monthly
//! reports, AI-ready context bundles, and a monthly retention cleanup.
//!
//! Quick start:
//!   statusctl init       # write a starter config
//!   statusctl weekly     # build this week's report
//!   statusctl status     # check database and retention health
//!
//! For more info: statusctl --help

// Suppress warnings for items that are public API (used by integration tests)
#![allow(dead_code, unused_imports)]

mod cli;
mod config;
mod feed;
mod mock;
mod record;
mod report;
mod retention;
mod store;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

/// Statusctl — reports and retention for project status-change logs.
///
/// Builds weekly and monthly reports, AI-ready context bundles, and a
/// monthly retention cleanup plan from a status-change log database.
#[derive(Parser)]
#[command(
    name = "statusctl",
    version,
    about = "Reports and retention for project status-change logs",
    long_about = "Statusctl reads a project status-change log database and builds\n\
                  weekly and monthly reports, AI-ready context bundles, and a\n\
                  monthly data-retention cleanup plan.\n\n\
                  Quick start:\n  \
                  statusctl init       # write a starter config\n  \
                  statusctl weekly     # build this week's report\n  \
                  statusctl status     # check database and retention health"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the weekly status report
    Weekly {
        /// Number of weeks to look back
        #[arg(long, default_value_t = 1)]
        weeks: u32,

        /// Read records from a JSON dump instead of the live database
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Print the report without saving it
        #[arg(long)]
        no_save: bool,
    },

    /// Build a calendar-month status report
    Monthly {
        /// Month number (1-12), defaults to the current month
        #[arg(long)]
        month: Option<u32>,

        /// Year, defaults to the current year
        #[arg(long)]
        year: Option<i32>,

        /// Read records from a JSON dump instead of the live database
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Print the report without saving it
        #[arg(long)]
        no_save: bool,
    },

    /// Build an AI-ready context bundle from recent activity
    Context {
        /// Days of history to include (default from config)
        #[arg(long)]
        days: Option<u32>,

        /// Cap on records included in the bundle (default from config)
        #[arg(long)]
        max_records: Option<usize>,

        /// Read records from a JSON dump instead of the live database
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Print the bundle without saving it
        #[arg(long)]
        no_save: bool,
    },

    /// Plan or run the monthly retention cleanup
    Cleanup {
        /// Archive expired records instead of the default dry run
        #[arg(long)]
        execute: bool,

        /// Confirm the deletion (nothing is archived without this)
        #[arg(long)]
        confirm: bool,

        /// Read records from a JSON dump instead of the live database
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Check database and retention health
    Status {
        /// Read records from a JSON dump instead of the live database
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Write a starter .statusctl.yaml config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,

        /// Where to write the file (defaults to the current directory)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    // ── Power user commands (hidden from main help) ──

    /// Generate a deterministic sample data dump [advanced]
    #[command(hide = true)]
    Mock {
        /// Output file for the JSON dump
        #[arg(long, value_name = "FILE")]
        out: PathBuf,

        /// Number of records to generate
        #[arg(long, default_value_t = 150)]
        count: usize,

        /// RNG seed
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[tokio::main]
async fn main() {
    // Set up tracing (only warnings and above by default to keep output clean)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("statusctl=warn".parse().unwrap()),
        )
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        // ── No subcommand: smart default ──
        None => run_smart_default(),

        // ── Report commands ──
        Some(Commands::Weekly {
            weeks,
            input,
            no_save,
        }) => cli::weekly::run_weekly(weeks, input.as_deref(), no_save).await,

        Some(Commands::Monthly {
            month,
            year,
            input,
            no_save,
        }) => cli::monthly::run_monthly(month, year, input.as_deref(), no_save).await,

        Some(Commands::Context {
            days,
            max_records,
            input,
            no_save,
        }) => cli::context::run_context(days, max_records, input.as_deref(), no_save).await,

        // ── Maintenance commands ──
        Some(Commands::Cleanup {
            execute,
            confirm,
            input,
        }) => cli::cleanup::run_cleanup(execute, confirm, input.as_deref()).await,

        Some(Commands::Status { input }) => cli::status::run_status(input.as_deref()).await,

        Some(Commands::Init { force, output }) => cli::init::run_init(force, output.as_deref()),

        // ── Power user commands ──
        Some(Commands::Mock { out, count, seed }) => cli::mock::run_mock(&out, count, seed),
    };

    if let Err(e) = result {
        eprintln!();
        eprintln!("  {} {}", "✗".red().bold(), e);
        for cause in e.chain().skip(1) {
            eprintln!("  {} {}", "caused by:".dimmed(), cause);
        }
        eprintln!();
        std::process::exit(1);
    }
}

/// When the user just types `statusctl` with no arguments:
/// - No config file? → point them at `statusctl init`
/// - Has config? → show the command overview
fn run_smart_default() -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    println!();
    println!(
        "  {}  {}",
        "statusctl".bold(),
        "— status-change reports and retention".dimmed()
    );
    println!(
        "  {}",
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".dimmed()
    );
    println!();

    match find_config_walking_up(&cwd) {
        None => {
            println!("  No config file found yet. To get started:");
            println!();
            println!(
                "    1. Write a starter config: {}",
                "statusctl init".bold()
            );
            println!(
                "    2. Set credentials: {}",
                "export STATUSCTL_TOKEN=... STATUSCTL_DATABASE_ID=...".dimmed()
            );
            println!(
                "    3. Build a report: {}",
                "statusctl weekly".bold()
            );
        }
        Some(path) => {
            println!(
                "  Config: {}",
                path.display().to_string().dimmed()
            );
            println!();
            println!("  {}", "Commands:".dimmed());
            println!(
                "    {}    build this week's report",
                "statusctl weekly".bold()
            );
            println!(
                "    {}   build a calendar-month report",
                "statusctl monthly".bold()
            );
            println!(
                "    {}   build an AI-ready context bundle",
                "statusctl context".bold()
            );
            println!(
                "    {}   plan the monthly retention cleanup",
                "statusctl cleanup".bold()
            );
            println!(
                "    {}    check database and retention health",
                "statusctl status".bold()
            );
            println!();
            println!("  {}", "Examples:".dimmed());
            println!("    statusctl weekly");
            println!("    statusctl monthly --month 7 --year 2025");
            println!("    statusctl context --days 30");
            println!("    statusctl cleanup --execute --confirm");
        }
    }

    println!();
    Ok(())
}

/// Find .statusctl.yaml walking up the directory tree.
fn find_config_walking_up(start: &std::path::Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(config::CONFIG_FILE_NAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}
