//! Periodic report builder for stored weekly and monthly reports

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{
    DailyRecord, NewGeneratedReport, ReportMetrics, ReportType, StoreFilter, StoreMetrics,
};

/// Cost-rate ceiling above which a report flags purchasing
const COST_RATE_CEILING: f64 = 35.0;
/// Labor-rate ceiling above which a report flags staffing
const LABOR_RATE_CEILING: f64 = 30.0;

/// Inclusive date range covered by a report ending at `today`
pub fn report_period(report_type: ReportType, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    match report_type {
        ReportType::Weekly => (today - Duration::days(6), today),
        ReportType::Monthly => {
            let first = today.with_day(1).unwrap_or(today);
            (first, today)
        }
    }
}

fn pct(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator * 100.0
    } else {
        0.0
    }
}

/// Build a periodic report over the records in the period, ready for
/// persistence. Pure: the caller supplies the record set and evaluation
/// date, and writes the result (and its generation log) itself.
pub fn build_periodic_report(
    records: &[DailyRecord],
    report_type: ReportType,
    filter: &StoreFilter,
    today: NaiveDate,
    generated_by: &str,
) -> NewGeneratedReport {
    let (start, end) = report_period(report_type, today);
    let in_period: Vec<&DailyRecord> = records
        .iter()
        .filter(|r| r.date >= start && r.date <= end && filter.matches(r))
        .collect();

    let mut total_sales = 0.0;
    let mut total_expenses = 0.0;
    let mut total_purchase = 0.0;
    let mut total_labor = 0.0;
    let mut by_store: BTreeMap<(&str, &str), (f64, f64, f64, f64)> = BTreeMap::new();
    for r in &in_period {
        total_sales += r.sales;
        total_expenses += r.total_expenses();
        total_purchase += r.purchase;
        total_labor += r.labor_cost;
        let entry = by_store
            .entry((r.store_id.as_str(), r.store_name.as_str()))
            .or_default();
        entry.0 += r.sales;
        entry.1 += r.total_expenses();
        entry.2 += r.purchase;
        entry.3 += r.labor_cost;
    }

    let operating_profit = total_sales - total_expenses;
    let gross_profit = total_sales - total_purchase;
    let profit_margin = pct(operating_profit, total_sales);
    let cost_rate = pct(total_purchase, total_sales);
    let labor_rate = pct(total_labor, total_sales);

    let mut store_breakdown: Vec<StoreMetrics> = by_store
        .into_iter()
        .map(|((id, name), (sales, expenses, purchase, labor))| StoreMetrics {
            store_id: id.to_string(),
            store_name: name.to_string(),
            sales,
            expenses,
            profit: sales - expenses,
            profit_margin: pct(sales - expenses, sales),
            cost_rate: pct(purchase, sales),
            labor_rate: pct(labor, sales),
        })
        .collect();
    store_breakdown.sort_by(|a, b| b.sales.total_cmp(&a.sales));

    let title = match report_type {
        ReportType::Weekly => format!("週次レポート（{}〜{}）", start, end),
        ReportType::Monthly => format!("月次レポート（{}年{}月）", today.year(), today.month()),
    };

    let summary = format!(
        "対象期間の売上は¥{:.0}、営業利益は¥{:.0}（利益率{:.1}%）でした。報告数は{}件です。",
        total_sales,
        operating_profit,
        profit_margin,
        in_period.len(),
    );

    let mut key_insights = Vec::new();
    if profit_margin >= 20.0 {
        key_insights.push("利益率20%以上を維持しています".to_string());
    } else if profit_margin < 10.0 {
        key_insights.push("利益率が10%を下回っています".to_string());
    }
    if cost_rate > COST_RATE_CEILING {
        key_insights.push(format!("原価率が{:.1}%と高水準です", cost_rate));
    }
    if labor_rate > LABOR_RATE_CEILING {
        key_insights.push(format!("人件費率が{:.1}%と高水準です", labor_rate));
    }
    if let Some(top) = store_breakdown.first() {
        if store_breakdown.len() > 1 {
            key_insights.push(format!("売上トップは{}です", top.store_name));
        }
    }

    let mut recommendations = Vec::new();
    if cost_rate > COST_RATE_CEILING {
        recommendations.push("仕入先の見直しとボリューム割引交渉を検討してください".to_string());
    }
    if labor_rate > LABOR_RATE_CEILING {
        recommendations.push("シフト配置の最適化を検討してください".to_string());
    }
    if recommendations.is_empty() {
        recommendations.push("現在のコスト構造を維持してください".to_string());
    }

    NewGeneratedReport {
        store_id: filter.store_id().map(|s| s.to_string()),
        report_type,
        period_start: start,
        period_end: end,
        title,
        summary,
        key_insights,
        recommendations,
        metrics: ReportMetrics {
            total_sales,
            total_expenses,
            gross_profit,
            operating_profit,
            profit_margin,
            cost_rate,
            labor_rate,
            store_breakdown,
        },
        generated_by: generated_by.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(date: &str, store: &str, sales: f64, purchase: f64, labor: f64) -> DailyRecord {
        DailyRecord {
            id: 0,
            date: date.parse().unwrap(),
            store_id: store.to_string(),
            store_name: format!("{}店", store),
            sales,
            purchase,
            labor_cost: labor,
            utilities: 0.0,
            promotion: 0.0,
            cleaning: 0.0,
            misc: 0.0,
            communication: 0.0,
            others: 0.0,
            report_text: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_weekly_period_is_trailing_seven_days() {
        let today: NaiveDate = "2026-08-30".parse().unwrap();
        let (start, end) = report_period(ReportType::Weekly, today);
        assert_eq!(start, "2026-08-24".parse::<NaiveDate>().unwrap());
        assert_eq!(end, today);
    }

    #[test]
    fn test_monthly_period_starts_at_first() {
        let today: NaiveDate = "2026-08-30".parse().unwrap();
        let (start, end) = report_period(ReportType::Monthly, today);
        assert_eq!(start, "2026-08-01".parse::<NaiveDate>().unwrap());
        assert_eq!(end, today);
    }

    #[test]
    fn test_gross_vs_operating_profit() {
        let today: NaiveDate = "2026-08-30".parse().unwrap();
        let records = vec![record("2026-08-28", "hon", 1000.0, 300.0, 200.0)];
        let report =
            build_periodic_report(&records, ReportType::Weekly, &StoreFilter::All, today, "manual");
        assert_eq!(report.metrics.gross_profit, 700.0);
        assert_eq!(report.metrics.operating_profit, 500.0);
        assert!((report.metrics.cost_rate - 30.0).abs() < 1e-9);
        assert!((report.metrics.labor_rate - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_period_records_excluded() {
        let today: NaiveDate = "2026-08-30".parse().unwrap();
        let records = vec![
            record("2026-08-28", "hon", 1000.0, 0.0, 0.0),
            record("2026-08-20", "hon", 9999.0, 0.0, 0.0),
        ];
        let report =
            build_periodic_report(&records, ReportType::Weekly, &StoreFilter::All, today, "manual");
        assert_eq!(report.metrics.total_sales, 1000.0);
    }

    #[test]
    fn test_store_breakdown_sorted_by_sales() {
        let today: NaiveDate = "2026-08-30".parse().unwrap();
        let records = vec![
            record("2026-08-28", "hon", 500.0, 0.0, 0.0),
            record("2026-08-28", "ekimae", 800.0, 0.0, 0.0),
        ];
        let report =
            build_periodic_report(&records, ReportType::Weekly, &StoreFilter::All, today, "manual");
        let names: Vec<_> = report
            .metrics
            .store_breakdown
            .iter()
            .map(|s| s.store_name.as_str())
            .collect();
        assert_eq!(names, vec!["ekimae店", "hon店"]);
        assert!(report
            .key_insights
            .iter()
            .any(|i| i.contains("売上トップはekimae店")));
    }

    #[test]
    fn test_high_cost_rate_flagged() {
        let today: NaiveDate = "2026-08-30".parse().unwrap();
        let records = vec![record("2026-08-28", "hon", 1000.0, 400.0, 100.0)];
        let report =
            build_periodic_report(&records, ReportType::Weekly, &StoreFilter::All, today, "manual");
        assert!(report.key_insights.iter().any(|i| i.contains("原価率")));
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("仕入先の見直し")));
    }

    #[test]
    fn test_empty_period_degrades_to_zeros() {
        let today: NaiveDate = "2026-08-30".parse().unwrap();
        let report =
            build_periodic_report(&[], ReportType::Monthly, &StoreFilter::All, today, "schedule");
        assert_eq!(report.metrics.total_sales, 0.0);
        assert_eq!(report.metrics.profit_margin, 0.0);
        assert!(report.metrics.store_breakdown.is_empty());
        assert_eq!(report.generated_by, "schedule");
    }

    #[test]
    fn test_store_filter_scopes_report() {
        let today: NaiveDate = "2026-08-30".parse().unwrap();
        let records = vec![
            record("2026-08-28", "hon", 500.0, 0.0, 0.0),
            record("2026-08-28", "ekimae", 800.0, 0.0, 0.0),
        ];
        let filter = StoreFilter::Store("hon".to_string());
        let report = build_periodic_report(&records, ReportType::Weekly, &filter, today, "manual");
        assert_eq!(report.store_id.as_deref(), Some("hon"));
        assert_eq!(report.metrics.total_sales, 500.0);
        assert_eq!(report.metrics.store_breakdown.len(), 1);
    }
}
