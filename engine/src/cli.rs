//! CLI interface for Compass
//!
//! This module provides the command-line interface using clap's derive API.
//! It defines all commands and global flags for the `compass` binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Compass student career advisor
///
/// Serves the registration, login and advisor web pages, and can run the
/// advisor once from the terminal.
#[derive(Parser, Debug)]
#[command(name = "compass")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the web server until Ctrl-C
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Write the default configuration file if it does not exist
    Init,

    /// Ask the advisor once from the terminal
    Advise {
        /// Student name
        #[arg(long)]
        name: String,

        /// Grade level
        #[arg(long)]
        grade: Option<String>,

        /// Interest (repeatable)
        #[arg(long = "interest", value_name = "INTEREST")]
        interests: Vec<String>,

        /// Career goal
        #[arg(long)]
        goals: Option<String>,

        /// Question for the advisor
        prompt: Option<String>,
    },

    /// Inspect registered users
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },
}

/// User inspection actions
#[derive(Subcommand, Debug)]
pub enum UsersAction {
    /// Print the number of registered users
    Count,
}
