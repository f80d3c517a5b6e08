use clap::{Parser, Subcommand};
use tracing::Level;

/// Kitchen Rush: a turn-based sandwich kitchen in the terminal.
#[derive(Parser, Debug)]
#[command(name = "kitchen_rush")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the session config JSON file; built-in defaults when missing.
    #[arg(short, long, default_value = "kitchen.json")]
    pub config: String,

    /// Path to the recipe catalog JSON file; built-in menu when missing.
    #[arg(short, long, default_value = "recipes.json")]
    pub recipes: String,

    /// Seed for menu rotation.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log debug output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.verbose { Level::DEBUG } else { Level::WARN }
    }
}

#[derive(Subcommand, Debug, Clone, Default)]
pub enum Command {
    /// Play a round in the terminal.
    #[default]
    Play,

    /// List every recipe in the catalog.
    Menu,

    /// Show one recipe, looked up by approximate name.
    Recipe {
        /// Recipe name or id.
        name: String,
    },

    /// Write the default config and recipe files.
    Init {
        /// Overwrite existing files.
        #[arg(long)]
        force: bool,
    },
}
