//! OpSkill CLI - operations entry point for the marketplace database
//! Composition root: settings -> logging -> SQLite adapters -> use cases

mod commands;
mod logging;
mod output;
mod seed;
mod settings;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{App, JobSearchArgs, TalentSearchArgs};
use settings::Settings;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "opskill")]
#[command(about = "OpSkill marketplace CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML settings file (default: ./opskill.toml when present)
    #[arg(long, global = true, env = "OPSKILL_CONFIG")]
    config: Option<PathBuf>,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate,

    /// Check database connectivity and report uptime
    Health,

    /// Load deterministic demo data (refused in production)
    Seed,

    /// Job postings
    Jobs {
        #[command(subcommand)]
        command: JobsCommand,
    },

    /// Talent profiles
    Talents {
        #[command(subcommand)]
        command: TalentsCommand,
    },

    /// Support tickets
    Tickets {
        #[command(subcommand)]
        command: TicketsCommand,
    },
}

#[derive(Subcommand)]
enum JobsCommand {
    /// Search OPEN jobs; all filters combine
    Search(JobSearchArgs),
}

#[derive(Subcommand)]
enum TalentsCommand {
    /// Search non-banned talents by skill, location and rating
    Search(TalentSearchArgs),
}

#[derive(Subcommand)]
enum TicketsCommand {
    /// List tickets, newest first
    List {
        /// Only tickets raised by this user id
        #[arg(long)]
        user: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load configuration (fails with one line per invalid key)
    let settings = Settings::load(cli.config.as_deref())?;

    // 2. Initialize logging
    logging::init(&settings.log_format);
    info!(
        environment = %settings.environment,
        "OpSkill v{} starting...",
        opskill_core::VERSION
    );

    // 3. Open the database and dispatch
    let app = App::connect(&settings, cli.json).await?;

    match cli.command {
        Commands::Migrate => app.migrate().await,
        Commands::Health => app.health(&settings).await,
        Commands::Seed => app.seed(&settings).await,
        Commands::Jobs {
            command: JobsCommand::Search(args),
        } => app.search_jobs(args).await,
        Commands::Talents {
            command: TalentsCommand::Search(args),
        } => app.search_talents(args).await,
        Commands::Tickets {
            command: TicketsCommand::List { user },
        } => app.list_tickets(user).await,
    }
}
