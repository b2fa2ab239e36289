//! Integration tests for banto-core
//!
//! These tests exercise the full import → store → analyze workflow and the
//! engine's fixed-formula behaviors end to end.

use banto_core::{
    aggregate, build_periodic_report, import_csv, route,
    models::{DailyRecord, NewDailyRecord, ReportType, StoreFilter},
    Analyst, Database, Intent, RecordQuery, VisualPayload,
};
use chrono::{Duration, NaiveDate, Utc};

fn record(date: &str, store: &str, sales: f64, purchase: f64) -> DailyRecord {
    DailyRecord {
        id: 0,
        date: date.parse().unwrap(),
        store_id: store.to_string(),
        store_name: store.to_string(),
        sales,
        purchase,
        labor_cost: 0.0,
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

fn ikki_csv() -> &'static str {
    "\
date,store_id,store_name,sales,purchase,labor_cost,utilities,promotion,cleaning,misc,communication,others,report_text
2026-08-27,hon,本店,180000,54000,36000,9000,3000,2000,1000,1000,0,宴会予約が好調
2026-08-28,hon,本店,210000,63000,40000,9000,3000,2000,1000,1000,0,
2026-08-28,ekimae,駅前店,150000,52000,38000,8000,2000,2000,1000,1000,0,雨で客足鈍い
2026-08-29,hon,本店,240000,70000,42000,9000,3000,2000,1000,1000,0,
2026-08-29,ekimae,駅前店,160000,55000,39000,8000,2000,2000,1000,1000,0,
"
}

#[test]
fn test_full_import_analyze_workflow() {
    let db = Database::in_memory().expect("Failed to create in-memory database");

    let result = import_csv(&db, ikki_csv().as_bytes()).expect("Failed to import CSV");
    assert_eq!(result.imported, 5);
    assert_eq!(result.replaced, 0);

    // Re-import replaces, never duplicates
    let again = import_csv(&db, ikki_csv().as_bytes()).unwrap();
    assert_eq!(again.imported, 0);
    assert_eq!(again.replaced, 5);

    let records = db.list_daily_records(&RecordQuery::default()).unwrap();
    assert_eq!(records.len(), 5);
    let stores = db.list_stores().unwrap();
    assert_eq!(stores.len(), 2);

    let analyst = Analyst::new(stores);
    let today: NaiveDate = "2026-08-30".parse().unwrap();
    let response = analyst.analyze("今月の業績サマリー", &records, &StoreFilter::All, today);
    assert!(response.narrative.contains("全店舗"));
    assert!(matches!(response.visual, Some(VisualPayload::Chart { .. })));
}

#[test]
fn test_aggregation_is_order_independent() {
    let mut records = vec![
        record("2026-08-01", "a", 100.0, 30.0),
        record("2026-08-02", "b", 200.0, 80.0),
        record("2026-08-03", "a", 150.0, 40.0),
    ];
    let forward = aggregate(&records);
    records.reverse();
    let backward = aggregate(&records);

    assert_eq!(forward.sales, backward.sales);
    assert_eq!(forward.expenses, backward.expenses);
    assert_eq!(forward.profit, backward.profit);
    assert_eq!(forward.count, backward.count);
    // Profit identity holds by construction
    assert_eq!(forward.profit, forward.sales - forward.expenses);
}

#[test]
fn test_routing_is_deterministic_and_total() {
    let queries = [
        ("今月の業績は？", Intent::Summary),
        ("店舗ごとの比較をして", Intent::StoreComparison),
        ("来月の売上見込み", Intent::Forecast),
        ("改善提案がほしい", Intent::Improvement),
        ("目標達成できそう？", Intent::GoalTracking),
        ("経費の内訳", Intent::CostBreakdown),
        ("こんにちは", Intent::Fallback),
    ];
    for (query, expected) in queries {
        for _ in 0..3 {
            assert_eq!(route(query), expected, "query {:?}", query);
        }
    }
}

#[test]
fn test_routing_priority_summary_wins() {
    // 分析 alone is not a comparison without 店舗; with both summary and
    // comparison keywords present, summary is evaluated first.
    assert_eq!(route("店舗の業績比較"), Intent::Summary);
    assert_eq!(route("店舗の分析"), Intent::StoreComparison);
    assert_eq!(route("比較して"), Intent::Fallback);
}

#[test]
fn test_empty_record_set_short_circuits() {
    let analyst = Analyst::new(vec![]);
    let today: NaiveDate = "2026-08-30".parse().unwrap();
    let response = analyst.analyze("今月の業績サマリー", &[], &StoreFilter::All, today);
    assert!(response.narrative.contains("分析可能なデータがまだありません"));
    assert!(response.visual.is_none());
}

#[test]
fn test_store_comparison_example() {
    // Store A margin 20%, store B margin 30%; B leads on sales
    let records = vec![
        record("2026-08-10", "A", 100.0, 80.0),
        record("2026-08-11", "B", 200.0, 140.0),
    ];
    let analyst = Analyst::new(vec![]);
    let today: NaiveDate = "2026-08-30".parse().unwrap();
    let response = analyst.analyze("店舗比較", &records, &StoreFilter::All, today);
    match response.visual {
        Some(VisualPayload::Comparison {
            series,
            recommendations,
            ..
        }) => {
            assert_eq!(series[0].name, "B");
            assert_eq!(series[1].name, "A");
            assert!((series[0].profit_margin - 30.0).abs() < 1e-9);
            assert!((series[1].profit_margin - 20.0).abs() < 1e-9);
            assert_eq!(recommendations.len(), 1);
            assert!(recommendations[0].contains('A'));
        }
        other => panic!("unexpected payload: {:?}", other),
    }
}

#[test]
fn test_forecast_example_numbers() {
    // Weekly sales 100, 110, 120, 130 oldest to newest:
    // avg 115, slope 10, next week 125, next month 125 * 4.33 = 541.25
    let today: NaiveDate = "2026-08-30".parse().unwrap();
    let records: Vec<DailyRecord> = (0..4)
        .map(|i| {
            let date = today - Duration::days(7 * (3 - i));
            record(&date.to_string(), "hon", 100.0 + 10.0 * i as f64, 0.0)
        })
        .collect();
    let analyst = Analyst::new(vec![]);
    let response = analyst.analyze("売上予測", &records, &StoreFilter::All, today);
    match response.visual {
        Some(VisualPayload::Prediction { predictions, .. }) => {
            assert!((predictions[0].value - 125.0).abs() < 1e-9);
            assert!((predictions[1].value - 541.25).abs() < 1e-9);
        }
        other => panic!("unexpected payload: {:?}", other),
    }
}

#[test]
fn test_cost_breakdown_sorted_with_zeros_dropped() {
    let mut r = record("2026-08-10", "hon", 0.0, 100.0);
    r.labor_cost = 300.0;
    r.utilities = 50.0;
    let analyst = Analyst::new(vec![]);
    let today: NaiveDate = "2026-08-30".parse().unwrap();
    let response = analyst.analyze("経費の内訳", &[r], &StoreFilter::All, today);
    match response.visual {
        Some(VisualPayload::Chart { series, total, .. }) => {
            let slices = match series {
                banto_core::analysis::payload::ChartSeries::Slices(s) => s,
                other => panic!("unexpected series: {:?}", other),
            };
            let names: Vec<&str> = slices.iter().map(|s| s.name.as_str()).collect();
            assert_eq!(names, vec!["人件費", "仕入", "光熱費"]);
            assert_eq!(total, Some(450.0));
        }
        other => panic!("unexpected payload: {:?}", other),
    }
}

#[test]
fn test_goal_tracking_example() {
    // 10M sales against the 25M all-stores goal: 40%, 15M remaining
    let records = vec![record("2026-08-05", "hon", 10_000_000.0, 0.0)];
    let analyst = Analyst::new(vec![]);
    let today: NaiveDate = "2026-08-15".parse().unwrap();
    let response = analyst.analyze("目標の進捗", &records, &StoreFilter::All, today);
    match response.visual {
        Some(VisualPayload::Metrics {
            achievement,
            target,
            ..
        }) => {
            assert_eq!(target, 25_000_000.0);
            assert!((achievement - 40.0).abs() < 1e-9);
        }
        other => panic!("unexpected payload: {:?}", other),
    }
    assert!(response.narrative.contains("¥15,000,000"));
}

#[test]
fn test_visual_payload_serialization_is_tagged() {
    let analyst = Analyst::new(vec![]);
    let today: NaiveDate = "2026-08-30".parse().unwrap();
    let records = vec![record("2026-08-29", "hon", 100.0, 10.0)];
    let response = analyst.analyze("業績", &records, &StoreFilter::All, today);
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["visual"]["type"], "chart");
    assert_eq!(json["visual"]["chart_type"], "area");
    assert!(json["suggestions"].is_array());
}

#[test]
fn test_periodic_report_persists_and_lists() {
    let db = Database::in_memory().unwrap();
    import_csv(&db, ikki_csv().as_bytes()).unwrap();
    let records = db.list_daily_records(&RecordQuery::default()).unwrap();

    let today: NaiveDate = "2026-08-30".parse().unwrap();
    let new_report =
        build_periodic_report(&records, ReportType::Weekly, &StoreFilter::All, today, "manual");
    let stored = db.insert_generated_report(&new_report).unwrap();

    // Gross profit excludes only purchase; operating profit excludes all costs
    assert!(stored.metrics.gross_profit > stored.metrics.operating_profit);
    assert_eq!(stored.metrics.store_breakdown.len(), 2);

    let listed = db.list_generated_reports(Some(ReportType::Weekly), 10).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, stored.id);
}

#[test]
fn test_same_day_same_store_upsert_wins() {
    // Same store, same day entered twice: the second entry replaces the first
    let db = Database::in_memory().unwrap();
    let base = NewDailyRecord {
        date: "2026-08-01".parse().unwrap(),
        store_id: "hon".to_string(),
        store_name: "本店".to_string(),
        sales: 100.0,
        purchase: 0.0,
        labor_cost: 0.0,
        utilities: 0.0,
        promotion: 0.0,
        cleaning: 0.0,
        misc: 0.0,
        communication: 0.0,
        others: 0.0,
        report_text: None,
    };
    db.upsert_daily_record(&base).unwrap();
    let mut updated = base.clone();
    updated.sales = 250.0;
    db.upsert_daily_record(&updated).unwrap();

    let records = db.list_daily_records(&RecordQuery::default()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].sales, 250.0);
}
