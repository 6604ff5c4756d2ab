//! Command-line interface for rosterd.
//!
//! `serve` runs the API; every other command is a client of it (or of the
//! database directly with `--local`).

mod commands;
pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, DashboardCommand, DeleteCommand, GenderArg, ListCommand,
    ShowCommand, SortKeyArg, UpdateCommand,
};

use crate::logging::Verbosity;

/// rosterd - student records service and client
#[derive(Debug, Parser)]
#[command(name = "rosterd")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Read and write the configured database directly instead of the API
    #[arg(long, global = true)]
    pub local: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve,

    /// Show totals, average marks and students per class
    Dashboard(DashboardCommand),

    /// Search, filter and sort the student table
    List(ListCommand),

    /// Show one student
    Show(ShowCommand),

    /// Add a student
    Add(AddCommand),

    /// Update a student
    Update(UpdateCommand),

    /// Delete a student
    Delete(DeleteCommand),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
