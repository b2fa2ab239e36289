//! Report command implementations

use anyhow::{anyhow, Result};
use chrono::Utc;
use banto_core::{
    build_periodic_report, format_yen, Database, GenerationStatus, RecordQuery, ReportType,
    StoreFilter,
};

use super::truncate;

fn parse_report_type(s: &str) -> Result<ReportType> {
    s.parse::<ReportType>().map_err(|e| anyhow!(e))
}

pub fn cmd_report_generate(db: &Database, report_type: &str, store: Option<&str>) -> Result<()> {
    let report_type = parse_report_type(report_type)?;
    let now = Utc::now();
    let today = now.date_naive();
    let filter = match store {
        Some(id) => StoreFilter::Store(id.to_string()),
        None => StoreFilter::All,
    };

    println!("📝 Generating {} report...", report_type);

    let log_id = db.start_generation_log(None, report_type, store, now)?;

    let records = db.list_daily_records(&RecordQuery::default())?;
    let report = build_periodic_report(&records, report_type, &filter, today, "manual");
    let (start, end) = (report.period_start, report.period_end);

    let in_period = records
        .iter()
        .filter(|r| r.date >= start && r.date <= end && filter.matches(r))
        .count() as i64;
    let store_count = db.store_count_in_range(start, end)?;

    match db.insert_generated_report(&report) {
        Ok(stored) => {
            db.complete_generation_log(
                log_id,
                GenerationStatus::Success,
                Some(stored.id),
                None,
                in_period,
                store_count,
                Utc::now(),
            )?;
            println!("✅ {} (id {})", stored.title, stored.id);
            println!("   Period: {} 〜 {}", stored.period_start, stored.period_end);
            println!("   Sales: {}", format_yen(stored.metrics.total_sales));
            println!(
                "   Operating profit: {} ({:.1}%)",
                format_yen(stored.metrics.operating_profit),
                stored.metrics.profit_margin
            );
            Ok(())
        }
        Err(e) => {
            db.complete_generation_log(
                log_id,
                GenerationStatus::Failed,
                None,
                Some(&e.to_string()),
                0,
                0,
                Utc::now(),
            )?;
            Err(e.into())
        }
    }
}

pub fn cmd_report_list(db: &Database, report_type: Option<&str>) -> Result<()> {
    let filter = report_type.map(parse_report_type).transpose()?;
    let reports = db.list_generated_reports(filter, 50)?;

    if reports.is_empty() {
        println!("No reports yet. Generate one with 'banto report generate'.");
        return Ok(());
    }

    println!();
    println!(
        "{:<6} {:<9} {:<24} {:>14} {:>8}  {}",
        "ID", "Type", "Period", "Sales", "Margin", "Title"
    );
    println!("{}", "─".repeat(90));

    for r in &reports {
        println!(
            "{:<6} {:<9} {:<24} {:>14} {:>7.1}%  {}",
            r.id,
            r.report_type,
            format!("{} 〜 {}", r.period_start, r.period_end),
            format_yen(r.metrics.total_sales),
            r.metrics.profit_margin,
            truncate(&r.title, 28),
        );
    }

    println!();
    println!("{} reports", reports.len());
    Ok(())
}

pub fn cmd_report_show(db: &Database, id: i64) -> Result<()> {
    let report = db.get_generated_report(id)?;

    println!();
    println!("📄 {}", report.title);
    println!("   {}", "─".repeat(60));
    println!(
        "   Period: {} 〜 {} ({})",
        report.period_start, report.period_end, report.report_type
    );
    println!("   Generated: {} ({})", report.generated_at, report.generated_by);
    println!();
    println!("{}", report.summary);
    println!();
    println!("   Sales: {}", format_yen(report.metrics.total_sales));
    println!("   Expenses: {}", format_yen(report.metrics.total_expenses));
    println!("   Gross profit: {}", format_yen(report.metrics.gross_profit));
    println!(
        "   Operating profit: {} ({:.1}%)",
        format_yen(report.metrics.operating_profit),
        report.metrics.profit_margin
    );
    println!("   Cost rate: {:.1}%", report.metrics.cost_rate);
    println!("   Labor rate: {:.1}%", report.metrics.labor_rate);

    if !report.metrics.store_breakdown.is_empty() {
        println!();
        println!("   Store breakdown:");
        for s in &report.metrics.store_breakdown {
            println!(
                "     {}: Sales {}, Profit {} ({:.1}%)",
                s.store_name,
                format_yen(s.sales),
                format_yen(s.profit),
                s.profit_margin
            );
        }
    }

    if !report.key_insights.is_empty() {
        println!();
        println!("   Insights:");
        for insight in &report.key_insights {
            println!("     ・{}", insight);
        }
    }

    if !report.recommendations.is_empty() {
        println!();
        println!("   Recommendations:");
        for rec in &report.recommendations {
            println!("     ・{}", rec);
        }
    }

    println!();
    Ok(())
}

pub fn cmd_report_delete(db: &Database, id: i64) -> Result<()> {
    db.delete_generated_report(id)?;
    println!("🗑️  Deleted report {}", id);
    Ok(())
}
