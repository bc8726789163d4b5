//! # CLI Module
//!
//! This module provides the command-line interface for logvault. It parses
//! commands and runs them against the configured log store.
//!
//! ## Commands
//!
//! ### Log Entries
//! - `add`: Store a new log entry
//! - `find`: List entries matching criteria, as a table or JSON
//! - `remove`: Delete entries matching criteria (`--all` required for empty criteria)
//! - `reset`: Delete every entry in the collection
//! - `count`: Print the number of stored entries
//!
//! ### Maintenance
//! - `migrate`: Show or apply schema migrations for the collection
//! - `env`: Validate the environment or print an example `.env`
//!
//! ## Criteria Flags
//!
//! `--label`, `--keyword`, `--origin-service` and `--level` may be repeated;
//! values of one flag are alternatives, different flags must all hold.
//! `--start` / `--end` are exclusive epoch-millisecond bounds.
//!
//! ## Usage Example
//!
//! ```bash
//! logvault add --level ERROR --origin-service svc-a --label storage --message "disk full"
//! logvault find --level ERROR --level WARN --keyword disk --limit 20
//! logvault remove --origin-service svc-a --end 1700000000000
//! ```

use crate::database::{DatabaseManager, MigrationError, PoolSettings};
use crate::env::{self, StoreConfig};
use crate::models::{INFO, LOG_LEVELS, LogEntry, MatchCriteria, is_valid_log_level};
use crate::store::{LogStore, SqliteLogStore};
use clap::{Args, Parser, Subcommand};
use std::error::Error;
use tracing::info;

pub type CliResult = Result<(), Box<dyn Error + Send + Sync>>;

///////////////////////////////////////////////////////////////////////////////
//****                         Public Structs                            ****//
///////////////////////////////////////////////////////////////////////////////

#[derive(Parser, Debug)]
#[command(name = "logvault")]
#[command(about = "Centralized log entry store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Filter flags shared by find and remove
#[derive(Args, Debug, Default, Clone)]
pub struct CriteriaArgs {
    #[arg(long = "label", help = "Match entries carrying this label (repeatable)")]
    pub labels: Vec<String>,
    #[arg(
        long = "keyword",
        help = "Match entries whose message contains this keyword (repeatable)"
    )]
    pub keywords: Vec<String>,
    #[arg(long = "origin-service", help = "Match entries from this service (repeatable)")]
    pub origin_services: Vec<String>,
    #[arg(long = "level", help = "Match entries at this log level (repeatable)")]
    pub log_levels: Vec<String>,
    #[arg(long, default_value_t = 0, help = "Only entries created after this epoch ms")]
    pub start: i64,
    #[arg(long, default_value_t = 0, help = "Only entries created before this epoch ms")]
    pub end: i64,
}

impl CriteriaArgs {
    pub fn into_criteria(self, limit: i64) -> MatchCriteria {
        MatchCriteria {
            labels: self.labels,
            keywords: self.keywords,
            origin_services: self.origin_services,
            log_levels: self.log_levels,
            start: self.start,
            end: self.end,
            limit,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store a new log entry
    #[command(name = "add")]
    Add {
        #[arg(long)]
        message: String,
        #[arg(long, default_value = INFO)]
        level: String,
        #[arg(long)]
        origin_service: Option<String>,
        #[arg(long = "label")]
        labels: Vec<String>,
        #[arg(long, help = "Creation time in epoch ms (default: now)")]
        created: Option<i64>,
    },
    /// List log entries matching the given criteria
    #[command(name = "find")]
    Find {
        #[command(flatten)]
        criteria: CriteriaArgs,
        #[arg(long, default_value_t = 0, help = "Maximum entries to return (0 = no limit)")]
        limit: i64,
        #[arg(long, help = "Print entries as JSON")]
        json: bool,
    },
    /// Delete log entries matching the given criteria
    #[command(name = "remove")]
    Remove {
        #[command(flatten)]
        criteria: CriteriaArgs,
        #[arg(long, help = "Allow empty criteria, deleting every entry")]
        all: bool,
    },
    /// Delete every log entry in the collection
    #[command(name = "reset")]
    Reset,
    /// Print the number of stored log entries
    #[command(name = "count")]
    Count,
    /// Database migration commands
    #[command(name = "migrate")]
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Environment configuration commands
    #[command(name = "env")]
    Env {
        #[command(subcommand)]
        action: EnvAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Show migration status
    Status,
    /// Apply all pending migrations
    ApplyAll,
    /// Apply a specific migration version
    Apply {
        #[arg(help = "Migration version to apply")]
        version: u32,
    },
}

#[derive(Subcommand, Debug)]
pub enum EnvAction {
    /// Validate environment variables and print the resulting configuration
    Check,
    /// Print an example .env file
    Example,
}

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Run a command that needs the log store
pub async fn run_store_command(store: &SqliteLogStore, command: Commands) -> CliResult {
    match command {
        Commands::Add {
            message,
            level,
            origin_service,
            labels,
            created,
        } => {
            if !is_valid_log_level(&level) {
                return Err(format!(
                    "Unknown log level '{}', expected one of {}",
                    level,
                    LOG_LEVELS.join(", ")
                )
                .into());
            }

            let mut entry = LogEntry::new(level, message);
            if let Some(origin_service) = origin_service {
                entry = entry.with_origin_service(origin_service);
            }
            if let Some(created) = created {
                entry = entry.with_created(created);
            }
            entry.labels = labels;

            store.add(&entry).await?;
            println!("Added log entry: [{}] {}", entry.level, entry.message);
        }
        Commands::Find {
            criteria,
            limit,
            json,
        } => {
            let entries = store.find(&criteria.into_criteria(limit)).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print_entries(&entries);
            }
        }
        Commands::Remove { criteria, all } => {
            let criteria = criteria.into_criteria(0);
            if criteria.is_unrestricted() && !all {
                return Err(
                    "Refusing to remove every log entry; pass --all to confirm".into(),
                );
            }
            let removed = store.remove(&criteria).await?;
            println!("Removed {} log entries", removed);
        }
        Commands::Reset => {
            store.reset().await;
            println!("Reset collection '{}'", store.collection());
        }
        Commands::Count => {
            println!("{}", store.count().await?);
        }
        Commands::Migrate { .. } | Commands::Env { .. } => {
            return Err("command does not run against the log store".into());
        }
    }
    Ok(())
}

/// Run a migration command on a pool that has not been migrated yet
pub async fn run_migrate_command(config: &StoreConfig, action: MigrateAction) -> CliResult {
    let settings = PoolSettings {
        database_url: config.database_url.clone(),
        max_connections: 1,
        connect_timeout: config.connect_timeout(),
        socket_timeout: config.socket_timeout(),
    };
    let pool = DatabaseManager::connect(&settings).await?;
    let db_manager = DatabaseManager::new(pool, config.collection.clone());
    db_manager.initialize().await?;

    let result: CliResult = match action {
        MigrateAction::Status => {
            let (applied, pending) = db_manager.migration_status().await?;
            println!("Applied migrations: {:?}", applied);
            println!("Pending migrations: {:?}", pending);
            Ok(())
        }
        MigrateAction::ApplyAll => {
            db_manager.apply_pending_migrations().await?;
            println!("All pending migrations applied.");
            Ok(())
        }
        MigrateAction::Apply { version } => match db_manager.apply_migration(version).await {
            Ok(()) => {
                println!("Migration {} applied successfully.", version);
                Ok(())
            }
            Err(e @ MigrationError::AlreadyApplied(_)) => {
                info!("{}", e);
                println!("Migration {} already applied.", version);
                Ok(())
            }
            Err(e) => Err(e.into()),
        },
    };

    db_manager.pool().close().await;
    result
}

/// Run an environment command; never touches the database
pub fn run_env_command(action: EnvAction) -> CliResult {
    match action {
        EnvAction::Check => {
            let result = env::validate_environment();
            env::print_validation_results(&result);
            if result.is_err() {
                return Err("environment validation failed".into());
            }
        }
        EnvAction::Example => {
            print!("{}", env::generate_env_example());
        }
    }
    Ok(())
}

///////////////////////////////////////////////////////////////////////////////
//****                       Private Functions                           ****//
///////////////////////////////////////////////////////////////////////////////

fn print_entries(entries: &[LogEntry]) {
    if entries.is_empty() {
        println!("No log entries found");
        return;
    }

    println!(
        "\n{:<23} | {:<5} | {:<15} | {:<20} | {}",
        "Created", "Level", "Origin Service", "Labels", "Message"
    );
    println!("{:-<100}", "");

    for entry in entries {
        println!(
            "{:<23} | {:<5} | {:<15} | {:<20} | {}",
            format_created(entry.created),
            entry.level,
            entry.origin_service,
            entry.labels.join(","),
            entry.message
        );
    }
}

fn format_created(created: i64) -> String {
    chrono::DateTime::from_timestamp_millis(created)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| created.to_string())
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////
