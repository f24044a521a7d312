use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "heirlooms")]
#[command(about = "Keep a description and a picture of every family heirloom", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (defaults to heirlooms.toml in the OS config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Records root, overriding the configuration
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Username, required when an auth file is configured
    #[arg(long, global = true, env = "HEIRLOOMS_USER")]
    pub user: Option<String>,

    /// Password, required when an auth file is configured
    #[arg(long, global = true, env = "HEIRLOOMS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new heirloom
    #[command(alias = "n")]
    Create {
        /// Description text
        #[arg(short, long)]
        description: Option<String>,

        /// Image file to store with the heirloom
        #[arg(short, long)]
        image: Option<PathBuf>,
    },

    /// List heirlooms
    #[command(alias = "ls")]
    List,

    /// View a heirloom
    #[command(alias = "v")]
    View { id: String },

    /// Edit a heirloom's description, and optionally its image
    #[command(alias = "e")]
    Edit {
        id: String,

        /// New description text
        #[arg(short, long)]
        description: Option<String>,

        /// Replacement image file (the current image is kept if omitted)
        #[arg(short, long)]
        image: Option<PathBuf>,
    },

    /// Delete a heirloom permanently
    #[command(alias = "rm")]
    Delete { id: String },

    /// Write a heirloom's image to stdout or a file
    Image {
        id: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Search heirlooms (not implemented yet)
    Search { term: String },

    /// Print the resolved configuration
    Config,
}
