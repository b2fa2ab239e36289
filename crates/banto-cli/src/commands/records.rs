//! Daily record commands (list, add)

use anyhow::{Context, Result};
use chrono::NaiveDate;
use banto_core::{format_yen, Database, NewDailyRecord, RecordQuery};

use super::truncate;

/// Arguments for `records add`, collected from the CLI flags
pub struct RecordArgs {
    pub date: String,
    pub store_id: String,
    pub store_name: String,
    pub sales: f64,
    pub purchase: f64,
    pub labor_cost: f64,
    pub utilities: f64,
    pub promotion: f64,
    pub cleaning: f64,
    pub misc: f64,
    pub communication: f64,
    pub others: f64,
    pub report: Option<String>,
}

pub fn cmd_records_list(db: &Database, store: Option<&str>, limit: u32) -> Result<()> {
    let query = RecordQuery {
        store_id: store.map(String::from),
        limit: Some(limit),
        ..Default::default()
    };
    let records = db.list_daily_records(&query)?;

    if records.is_empty() {
        println!("No daily records found. Import some with 'banto import --file records.csv'.");
        return Ok(());
    }

    println!();
    println!(
        "{:<6} {:<12} {:<12} {:>14} {:>14} {:>8}  {}",
        "ID", "Date", "Store", "Sales", "Profit", "Margin", "Report"
    );
    println!("{}", "─".repeat(90));

    for r in &records {
        let profit = r.profit();
        let margin = if r.sales > 0.0 {
            profit / r.sales * 100.0
        } else {
            0.0
        };
        println!(
            "{:<6} {:<12} {:<12} {:>14} {:>14} {:>7.1}%  {}",
            r.id,
            r.date,
            truncate(&r.store_name, 10),
            format_yen(r.sales),
            format_yen(profit),
            margin,
            truncate(r.report_text.as_deref().unwrap_or(""), 20),
        );
    }

    println!();
    println!("{} records", records.len());
    Ok(())
}

pub fn cmd_records_add(db: &Database, args: RecordArgs) -> Result<()> {
    let date = NaiveDate::parse_from_str(&args.date, "%Y-%m-%d")
        .context("Invalid --date format (use YYYY-MM-DD)")?;

    let new = NewDailyRecord {
        date,
        store_id: args.store_id,
        store_name: args.store_name,
        sales: args.sales,
        purchase: args.purchase,
        labor_cost: args.labor_cost,
        utilities: args.utilities,
        promotion: args.promotion,
        cleaning: args.cleaning,
        misc: args.misc,
        communication: args.communication,
        others: args.others,
        report_text: args.report,
    };

    let record = db.upsert_daily_record(&new)?;

    println!(
        "✅ Recorded {} for {} on {} (id {})",
        format_yen(record.sales),
        record.store_name,
        record.date,
        record.id
    );
    println!(
        "   Profit: {} ({} expenses)",
        format_yen(record.profit()),
        format_yen(record.total_expenses())
    );

    Ok(())
}
