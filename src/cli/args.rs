//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};
use clap_complete::Shell;

/// Path-addressed tree: run tree scripts against an in-memory namespace
#[derive(Parser, Debug)]
#[command(name = "pathtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (repeat for more: -d, -dd, -ddd)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Settings file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath, env = "PATHTREE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Render bare node names without values
    #[arg(long, global = true)]
    pub no_values: bool,

    /// Generate shell completions and exit
    #[arg(long = "completions", value_enum)]
    pub generator: Option<Shell>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a tree script from FILE, or stdin when omitted
    Run {
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Run the built-in demo script
    Demo,

    /// Inspect settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print effective settings as TOML
    Show,

    /// Print the global config file location
    Path,
}
