use std::{io, path::PathBuf};

use book_catalog::{
    CatalogConfig, CatalogError, Inventory, Menu, logging::setup_tracing, observers::ChangeLogger,
};
use clap::Parser;
use colored::Colorize;
use tracing::info;

/// Command-line arguments for the catalog
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Catalog file to use instead of the configured one
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Print without colors
    #[arg(long)]
    no_color: bool,

    /// Write the catalog as JSON to this path and exit
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,
}

fn main() -> Result<(), CatalogError> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => CatalogConfig::load(path)?,
        None => CatalogConfig::default(),
    };

    setup_tracing(if args.verbose { "debug" } else { config.log_level.as_str() });
    if args.no_color {
        colored::control::set_override(false);
    }

    let data_file = args.file.unwrap_or_else(|| config.data_file.clone());
    info!(path = %data_file.display(), "opening catalog");

    let mut inventory = Inventory::new(data_file).with_save_mode(config.save_mode());
    inventory.register_observer(Box::new(ChangeLogger));

    if let Err(e) = inventory.load() {
        println!("{}", e.to_string().red());
    }

    if let Some(path) = args.export {
        inventory.export_to_file(&path)?;
        println!("Exported {} books to {}", inventory.len(), path.display());
        return Ok(());
    }

    let stdin = io::stdin();
    Menu::new(&mut inventory, stdin.lock(), io::stdout().lock()).run()?;
    Ok(())
}
