//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Banto - Izakaya chain business analytics
#[derive(Parser)]
#[command(name = "banto")]
#[command(about = "Self-hosted restaurant chain analytics tool", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "banto.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Show database status
    Status,

    /// Ask the analysis engine a question
    Ask {
        /// Natural language query (Japanese keywords route the analysis)
        query: String,

        /// Limit analysis to a single store id
        #[arg(short, long)]
        store: Option<String>,
    },

    /// Import daily records from CSV
    Import {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Manage daily records
    Records {
        #[command(subcommand)]
        action: RecordsAction,
    },

    /// Manage generated reports
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },

    /// List report schedules
    Schedules,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// By default, the server requires an API key from BANTO_API_KEYS.
        #[arg(long)]
        no_auth: bool,
    },
}

#[derive(Subcommand)]
pub enum RecordsAction {
    /// List daily records
    List {
        /// Limit to a single store id
        #[arg(short, long)]
        store: Option<String>,

        /// Maximum number of records to show
        #[arg(short, long, default_value = "30")]
        limit: u32,
    },

    /// Add or replace one daily record
    Add {
        /// Business date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Store id
        #[arg(long)]
        store_id: String,

        /// Store display name
        #[arg(long)]
        store_name: String,

        /// Sales for the day (yen)
        #[arg(long)]
        sales: f64,

        /// Purchase cost (yen)
        #[arg(long, default_value = "0")]
        purchase: f64,

        /// Labor cost (yen)
        #[arg(long, default_value = "0")]
        labor_cost: f64,

        /// Utility cost (yen)
        #[arg(long, default_value = "0")]
        utilities: f64,

        /// Promotion cost (yen)
        #[arg(long, default_value = "0")]
        promotion: f64,

        /// Cleaning cost (yen)
        #[arg(long, default_value = "0")]
        cleaning: f64,

        /// Miscellaneous cost (yen)
        #[arg(long, default_value = "0")]
        misc: f64,

        /// Communication cost (yen)
        #[arg(long, default_value = "0")]
        communication: f64,

        /// Other costs (yen)
        #[arg(long, default_value = "0")]
        others: f64,

        /// Free-form daily report text
        #[arg(long)]
        report: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ReportAction {
    /// Generate a report for the current period
    Generate {
        /// Report type: weekly or monthly
        #[arg(short = 't', long, default_value = "weekly")]
        report_type: String,

        /// Limit the report to a single store id
        #[arg(short, long)]
        store: Option<String>,
    },

    /// List generated reports
    List {
        /// Filter by report type: weekly or monthly
        #[arg(short = 't', long)]
        report_type: Option<String>,
    },

    /// Show one report in full
    Show {
        /// Report id
        id: i64,
    },

    /// Delete a report
    Delete {
        /// Report id
        id: i64,
    },
}
