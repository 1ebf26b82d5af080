use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

use cli::CliContext;
use cli::events::CounterUpdate;

#[derive(Parser)]
#[command(name = "xpledger")]
#[command(about = "Progression ledger - XP, levels, achievements and badges")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.xpledger/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the ledger database (overrides the config)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file and create the database
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Trigger an achievement key for a user
    Trigger {
        user: String,
        key: String,
        /// JSON object stored with the earned achievement
        #[arg(long)]
        meta: Option<String>,
    },

    /// Report a collaborator action (e.g. job-application-created)
    Action {
        user: String,
        action: String,
        #[arg(long)]
        meta: Option<String>,
    },

    /// Re-check threshold achievements against the user's counters
    Scan { user: String },

    /// Complete a daily challenge
    Daily { user: String, challenge: String },

    /// Claim an earned achievement
    Redeem {
        user: String,
        /// Id of the earned achievement (see `status`)
        id: i64,
    },

    /// Show a user's XP, level, achievements, badges and daily challenges
    Status { user: String },

    /// List achievements, with progress when a user is given
    Achievements {
        #[arg(long)]
        user: Option<String>,
    },

    /// List badge definitions
    Badges,

    /// Show the top active users
    Leaderboard {
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List every event key the ledger accepts
    Keys,

    /// Update an activity counter (applications, posts, skills, ...)
    Record {
        user: String,
        counter: String,
        /// Decrement instead of increment
        #[arg(long, conflicts_with = "set")]
        retract: bool,
        /// Overwrite the total
        #[arg(long)]
        set: Option<u64>,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Register a user (generates an id when none is given)
    Add {
        id: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Hide a user from the leaderboard
    Deactivate { id: String },
    /// Show a user on the leaderboard again
    Activate { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let ctx = CliContext {
        config_path: cli.config,
        db_path: cli.db,
        json: cli.json,
    };

    match cli.command {
        Commands::Init { force } => cli::init::init_command(&ctx, force)?,
        Commands::User { command } => match command {
            UserCommands::Add { id, name } => cli::user::user_add_command(&ctx, id, name)?,
            UserCommands::Deactivate { id } => cli::user::user_set_active_command(&ctx, &id, false)?,
            UserCommands::Activate { id } => cli::user::user_set_active_command(&ctx, &id, true)?,
        },
        Commands::Trigger { user, key, meta } => {
            cli::events::trigger_command(&ctx, &user, &key, meta.as_deref())?
        }
        Commands::Action { user, action, meta } => {
            cli::events::action_command(&ctx, &user, &action, meta.as_deref())?
        }
        Commands::Scan { user } => cli::events::scan_command(&ctx, &user)?,
        Commands::Daily { user, challenge } => cli::events::daily_command(&ctx, &user, &challenge)?,
        Commands::Redeem { user, id } => cli::events::redeem_command(&ctx, &user, id)?,
        Commands::Status { user } => cli::report::status_command(&ctx, &user)?,
        Commands::Achievements { user } => cli::report::achievements_command(&ctx, user.as_deref())?,
        Commands::Badges => cli::report::badges_command(&ctx)?,
        Commands::Leaderboard { limit } => cli::report::leaderboard_command(&ctx, limit)?,
        Commands::Keys => cli::report::keys_command(&ctx)?,
        Commands::Record {
            user,
            counter,
            retract,
            set,
        } => {
            let update = match (set, retract) {
                (Some(n), _) => CounterUpdate::Set(n),
                (None, true) => CounterUpdate::Decrement,
                (None, false) => CounterUpdate::Increment,
            };
            cli::events::record_command(&ctx, &user, &counter, update)?
        }
    }

    Ok(())
}
