//! Command-line argument parsing for climateframe
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use crate::config::{Config, Provider};
use crate::sources::SourceBias;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// climateframe - Classify hero/villain/victim, action and story framing in climate news
#[derive(Parser, Debug)]
#[command(name = "climateframe")]
#[command(version)]
#[command(about = "Classify how climate news articles frame actors, actions and stories", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend provider (overrides configuration)
    #[arg(long, global = true)]
    pub provider: Option<Provider>,

    /// Model name for the active provider (overrides configuration)
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify one article read from a file or stdin
    Classify {
        /// Article title
        #[arg(long, default_value = "Untitled")]
        title: String,

        /// Publishing source
        #[arg(long)]
        source: Option<String>,

        /// Article body file (stdin when omitted)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Classify a JSON array of articles and print results
    Batch {
        /// JSON file with an array of articles
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Skip articles without climate keywords
        #[arg(long)]
        climate_only: bool,

        /// Print framing statistics instead of per-article results
        #[arg(long)]
        stats: bool,

        /// Number of weekly trend buckets to include with --stats
        #[arg(long, default_value_t = 12)]
        trend_weeks: usize,

        /// Only count articles from this ISO year in --stats
        #[arg(long)]
        year: Option<i32>,

        /// Only count these ISO week numbers in --stats (comma separated)
        #[arg(long, value_delimiter = ',')]
        weeks: Vec<u32>,

        /// Only count sources with this bias in --stats (left, center)
        #[arg(long)]
        bias: Option<SourceBias>,
    },

    /// Print the label taxonomies per task
    Taxonomy,

    /// Check that the configured backend is reachable
    Doctor,

    /// Display effective configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Apply command-line overrides on top of loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(provider) = self.provider {
            config.backend.provider = provider;
        }
        if let Some(model) = &self.model {
            config.set_model(model.clone());
        }
    }
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Default tracing filter directive for this level
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "info",
            Verbosity::VeryVerbose => "debug",
        }
    }
}
