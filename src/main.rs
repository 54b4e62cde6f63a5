//! Food Expiry Tracker - Main Entry Point
//!
//! Command-line front end over the `food_expiry` library.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use food_expiry::notify::run_once;
use food_expiry::{
    Config, ExpiryService, ItemUpdate, NotificationEvent, ReminderDriver, SystemClock, formatting,
    logging, validation,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Food Expiry Tracker - keep track of what expires when
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the pantry data file (overrides the config)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add an item
    Add {
        /// Item name
        name: String,
        /// Expiration date: YYYY-MM-DD
        date: String,
    },
    /// Change the name and/or expiration date of an item
    Edit {
        /// Item ID (e.g., "#3" or "3")
        id: String,
        #[arg(long)]
        name: Option<String>,
        /// New expiration date: YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
    },
    /// Remove an item (undoable for the configured undo window)
    Remove { id: String },
    /// Restore a removed item
    Undo { id: String },
    /// Delete an item permanently
    Delete { id: String },
    /// Permanently delete removed items whose undo window elapsed
    Purge,
    /// Show items grouped by expiration
    List {
        /// Show every stored item, including removed ones
        #[arg(long)]
        all: bool,
    },
    /// Run one reminder pass and print the reminders due now
    Tick,
    /// Keep running and print reminders as they become due
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config_path = cli.config.clone().unwrap_or_else(Config::default_config_path);
    let mut config = if config_path.exists() {
        Config::from_file(&config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else if cli.config.is_some() {
        anyhow::bail!("Config file {} does not exist", config_path.display());
    } else {
        Config::default()
    };
    if let Some(data) = cli.data {
        config.data_file = Some(data);
    }

    let service = ExpiryService::open(&config, Arc::new(SystemClock))
        .with_context(|| format!("Failed to open {}", config.data_path().display()))?;

    match cli.command {
        Command::Add { name, date } => {
            let date = validation::parse_date(&date)?;
            let id = service.insert(&name, date)?;
            println!("Item created with ID: {}", id);
        }
        Command::Edit { id, name, date } => {
            let id = validation::parse_item_id(&id)?;
            let update = ItemUpdate {
                name,
                expiration_date: date.as_deref().map(validation::parse_date).transpose()?,
            };
            if update.is_empty() {
                anyhow::bail!("Nothing to change. Pass --name and/or --date.");
            }
            let item = service.update(id, update)?;
            println!(
                "Item {} updated: {} (expires: {})",
                item.id(),
                item.name(),
                item.expiration_date()
            );
        }
        Command::Remove { id } => {
            let pending = service.soft_delete(validation::parse_item_id(&id)?)?;
            println!("{}", formatting::format_pending_undo(&pending));
        }
        Command::Undo { id } => {
            let id = validation::parse_item_id(&id)?;
            service.undo(id)?;
            println!("Item {} restored", id);
        }
        Command::Delete { id } => {
            let item = service.hard_delete(validation::parse_item_id(&id)?)?;
            println!("Deleted {} [{}]", item.name(), item.id());
        }
        Command::Purge => {
            let purged = service.purge_expired()?;
            println!("Deleted {} item(s)", purged.len());
        }
        Command::List { all } => {
            if all {
                println!("{}", formatting::format_items(&service.list_all()));
            } else {
                service.purge_expired()?;
                println!("{}", formatting::format_groups(&service.grouped()?));
            }
        }
        Command::Tick => {
            let delivered = run_once(&service, &print_event);
            if delivered == 0 {
                println!("No reminders due");
            }
        }
        Command::Watch => {
            let mut driver = ReminderDriver::new(
                Arc::new(service),
                Arc::new(print_event),
                config.tick_interval(),
            );
            driver.start();
            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for Ctrl-C")?;
            driver.stop().await;
        }
    }

    Ok(())
}

fn print_event(event: &NotificationEvent) {
    println!("{}", formatting::format_event(event));
}
