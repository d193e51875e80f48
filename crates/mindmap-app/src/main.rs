//! Command-line shell for the mind-map editor.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mindmap", about = "Create, lay out and inspect mind-map files")]
struct Cli {
    /// JSON file with editor settings (viewport, layout, gestures)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding the maps (defaults to the platform data directory)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a map holding a single root node
    New {
        /// Name of the map
        #[arg(default_value = commands::DEFAULT_MAP)]
        name: String,
        /// Replace an existing map of the same name
        #[arg(long)]
        force: bool,
    },
    /// Arrange a saved map as a top-down tree and save it again
    Layout {
        #[arg(default_value = commands::DEFAULT_MAP)]
        name: String,
        /// Save the result under this name instead
        #[arg(long)]
        output: Option<String>,
    },
    /// Print node and edge counts and the layout root
    Stats {
        #[arg(default_value = commands::DEFAULT_MAP)]
        name: String,
    },
    /// List saved maps
    List,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = commands::load_config(cli.config.as_deref())?;
    let storage = commands::open_storage(cli.dir)?;

    match cli.command {
        Command::New { name, force } => commands::new_map(&storage, config, &name, force),
        Command::Layout { name, output } => {
            let report = commands::layout_map(&storage, config, &name, output.as_deref())?;
            println!("{report}");
            Ok(())
        }
        Command::Stats { name } => {
            let stats = commands::stats(&storage, config, &name)?;
            println!("{stats}");
            Ok(())
        }
        Command::List => {
            for name in commands::list(&storage)? {
                println!("{name}");
            }
            Ok(())
        }
    }
}
