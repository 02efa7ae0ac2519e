//! taskkeeper - housekeeping for an Asana project.
//!
//! # Examples
//!
//! ```bash
//! # Create a task due in three days
//! taskkeeper --config session.json create "Renew passport" --offset 3
//!
//! # Push really-late tasks to tomorrow
//! taskkeeper reschedule --offset 1
//!
//! # Create tomorrow's recurring tasks from the configured feed
//! taskkeeper recur
//!
//! # ...or from a local file
//! taskkeeper recur --feed recurring.yaml
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use taskkeeper::config::FeedConfig;
use taskkeeper::{AsanaClient, Session, SessionConfig, SystemClock};

/// Create, delete and reschedule tasks in an Asana project.
#[derive(Parser)]
#[command(name = "taskkeeper")]
#[command(version)]
struct Cli {
    /// Session config file (or set `TASKKEEPER_CONFIG`)
    #[arg(long, short, env = "TASKKEEPER_CONFIG", default_value = "session.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a task due a number of days from today
    Create {
        /// Task name
        name: String,

        /// Days from today the task is due
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i64,
    },

    /// Print a task's details
    Details {
        /// Task ID
        id: String,
    },

    /// Delete every task in the project with this name
    Delete {
        /// Task name (case-insensitive)
        name: String,
    },

    /// Move really-late tasks to a new due date
    Reschedule {
        /// Days from today the rescheduled tasks are due
        #[arg(long, default_value_t = 1, allow_hyphen_values = true)]
        offset: i64,
    },

    /// Create today's recurring tasks
    Recur {
        /// Read records from this JSON/YAML file instead of the configured feed
        #[arg(long)]
        feed: Option<PathBuf>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskkeeper=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = SessionConfig::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    let store = Arc::new(AsanaClient::with_base_url(
        &config.access_token,
        &config.api_base_url,
    ));
    let session = Session::connect(&config, store, Arc::new(SystemClock)).await?;

    match cli.command {
        Commands::Create { name, offset } => {
            let task = session.create_task(&name, offset).await?;
            print_json(&task)?;
        }
        Commands::Details { id } => {
            let task = session.get_task_details(&id).await?;
            print_json(&task)?;
        }
        Commands::Delete { name } => {
            let deleted = session.delete_task(&name).await?;
            print_json(&deleted)?;
        }
        Commands::Reschedule { offset } => {
            let report = session.update_due_dates(offset).await?;
            print_json(&report)?;
        }
        Commands::Recur { feed } => {
            let feed = match (feed, config.recurrence_feed.clone()) {
                (Some(path), _) => FeedConfig::File { path },
                (None, Some(configured)) => configured,
                (None, None) => anyhow::bail!(
                    "No recurrence feed: pass --feed or set recurrence_feed in {}",
                    cli.config.display()
                ),
            };
            let report = session.load_recurring_from(feed.into_feed().as_ref()).await?;
            print_json(&report)?;
        }
    }

    Ok(())
}
