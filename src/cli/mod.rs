//! CLI command definitions and parsing
use crate::analysis::Sentiment;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sentim",
    version,
    author = "neur0map",
    about = "Sentiment dashboard for video comments",
    long_about = "Sentim fetches every top-level comment of a video, sends them to a sentiment \
                  classification backend, and collects a pie chart, a word cloud and a \
                  sentiment trend graph for the result."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/sentim/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Profile to apply on top of the config file
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze the comments of a video
    Analyze {
        /// Video link (watch, share or embed form)
        url: String,

        /// Show only comments with this sentiment (positive, neutral, negative)
        #[arg(short, long)]
        filter: Option<Sentiment>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Directory for chart images (overrides output.chart_dir)
        #[arg(long, value_name = "DIR")]
        charts_dir: Option<PathBuf>,
    },

    /// Print the video identifier contained in a link
    VideoId {
        /// Video link
        url: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Validate configuration file
    Validate {
        /// Path to config file (defaults to standard location)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
