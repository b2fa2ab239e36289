//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database
//! - `cmd_status` - Show database status

use std::path::Path;

use anyhow::{Context, Result};
use banto_core::{format_yen, Database, RecordQuery};

/// Open the database, running migrations if needed
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path.to_string_lossy();
    Database::new(&path_str).context("Failed to open database")
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path)?;

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Import daily records: banto import --file records.csv");
    println!("  2. Ask a question: banto ask \"今月の業績は？\"");
    println!("  3. Start web UI: banto serve");

    Ok(())
}

pub fn cmd_status(db_path: &Path) -> Result<()> {
    use std::fs;

    println!();
    println!("📊 Banto Status");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Database: {}", db_path.display());

    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }

        match open_db(db_path) {
            Ok(db) => {
                let stores = db.list_stores()?;
                let records = db.list_daily_records(&RecordQuery::default())?;
                let total_sales: f64 = records.iter().map(|r| r.sales).sum();
                let schedules = db.list_schedules()?;

                println!();
                println!("   Stores: {}", stores.len());
                println!("   Daily records: {}", records.len());
                println!("   Total sales: {}", format_yen(total_sales));
                println!("   Schedules: {}", schedules.len());
            }
            Err(e) => {
                println!();
                println!("   ❌ Error opening database: {}", e);
            }
        }
    } else {
        println!("   Size: (database not initialized)");
        println!();
        println!("   Run 'banto init' to create it.");
    }

    println!();
    Ok(())
}
