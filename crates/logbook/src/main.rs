//! `logbook` - CLI for the contact logbook
//!
//! This binary adds, fetches and lists logbook entries. Each invocation opens
//! the store, runs one operation and closes it again.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use logbook::cli::input::read_entry_fields;
use logbook::cli::table::{entry_detail_table, entry_summary_table};
use logbook::cli::{AddCommand, Cli, Command, ConfigCommand, GetCommand};
use logbook::{init_logging, Config, Entry, Store, StoreOptions};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    let mut options = config.store_options();
    if let Some(path) = &cli.database {
        options.path.clone_from(path);
    }
    debug!("Using database {}", options.path.display());

    match cli.command {
        Command::Add(add_cmd) => handle_add(options, &add_cmd),
        Command::Get(get_cmd) => handle_get(options, &get_cmd),
        Command::List => handle_list(options),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn handle_add(options: StoreOptions, cmd: &AddCommand) -> anyhow::Result<()> {
    let (call_sign, name) = read_entry_fields(
        &mut io::stdin().lock(),
        &mut io::stdout(),
        cmd.callsign.as_deref(),
        cmd.name.as_deref(),
    )?;

    let mut entry = Entry::new(call_sign, name);
    Store::session(options, |store| store.put_entry(&mut entry))
        .with_context(|| format!("saving entry for {}", entry.call_sign))?;

    println!();
    println!("saved");
    Ok(())
}

fn handle_get(options: StoreOptions, cmd: &GetCommand) -> anyhow::Result<()> {
    let entry = Store::session(options, |store| store.get_entry(cmd.callsign.as_bytes()))
        .with_context(|| format!("looking up {}", cmd.callsign))?;

    println!();
    print!("{}", entry_detail_table(&[entry]).render());
    println!();
    Ok(())
}

fn handle_list(options: StoreOptions) -> anyhow::Result<()> {
    let entries = Store::session(options, |store| store.list_entries())
        .context("listing entries")?;

    println!();
    print!("{}", entry_summary_table(&entries).render());
    println!();
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!(
                    "  Database path:      {}",
                    config.storage.database_path.display()
                );
                println!("  File mode:          {:o}", config.storage.file_mode);
                println!("  Lock timeout (ms):  {}", config.storage.lock_timeout_ms);
                println!("  Bucket:             {}", config.storage.bucket);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(path)).context("configuration is invalid")?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
