//! Report schedule commands

use anyhow::Result;
use banto_core::Database;

pub fn cmd_schedules_list(db: &Database) -> Result<()> {
    let schedules = db.list_schedules()?;

    if schedules.is_empty() {
        println!("No report schedules configured.");
        return Ok(());
    }

    println!();
    println!(
        "{:<6} {:<9} {:<12} {:<9} {:<22} {}",
        "ID", "Type", "Store", "Enabled", "Next run", "Cron"
    );
    println!("{}", "─".repeat(80));

    for s in &schedules {
        println!(
            "{:<6} {:<9} {:<12} {:<9} {:<22} {}",
            s.id,
            s.report_type,
            s.store_id.as_deref().unwrap_or("all"),
            if s.is_enabled { "yes" } else { "no" },
            s.next_run_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
            s.cron_expression,
        );
    }

    println!();
    println!("{} schedules", schedules.len());
    Ok(())
}
