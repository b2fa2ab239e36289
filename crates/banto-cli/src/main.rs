//! Banto CLI - Restaurant chain analytics
//!
//! Usage:
//!   banto init                 Initialize database
//!   banto import --file CSV    Import daily records
//!   banto ask "今月の業績は？"   Ask the analysis engine
//!   banto serve --port 3000    Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Status => commands::cmd_status(&cli.db),
        Commands::Ask { query, store } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_ask(&db, &query, store.as_deref())
        }
        Commands::Import { file } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_import(&db, &file)
        }
        Commands::Records { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                RecordsAction::List { store, limit } => {
                    commands::cmd_records_list(&db, store.as_deref(), limit)
                }
                RecordsAction::Add {
                    date,
                    store_id,
                    store_name,
                    sales,
                    purchase,
                    labor_cost,
                    utilities,
                    promotion,
                    cleaning,
                    misc,
                    communication,
                    others,
                    report,
                } => commands::cmd_records_add(
                    &db,
                    commands::RecordArgs {
                        date,
                        store_id,
                        store_name,
                        sales,
                        purchase,
                        labor_cost,
                        utilities,
                        promotion,
                        cleaning,
                        misc,
                        communication,
                        others,
                        report,
                    },
                ),
            }
        }
        Commands::Report { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                ReportAction::Generate { report_type, store } => {
                    commands::cmd_report_generate(&db, &report_type, store.as_deref())
                }
                ReportAction::List { report_type } => {
                    commands::cmd_report_list(&db, report_type.as_deref())
                }
                ReportAction::Show { id } => commands::cmd_report_show(&db, id),
                ReportAction::Delete { id } => commands::cmd_report_delete(&db, id),
            }
        }
        Commands::Schedules => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_schedules_list(&db)
        }
        Commands::Serve {
            port,
            host,
            no_auth,
        } => commands::cmd_serve(&cli.db, &host, port, no_auth).await,
    }
}
