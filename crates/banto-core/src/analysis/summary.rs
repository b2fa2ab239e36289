//! Current-month performance summary with a two-week daily trend chart

use chrono::Datelike;

use super::aggregate::bucket_by_day;
use super::payload::{ChartKind, ChartSeries, DailyPoint, Metric, Tone, VisualPayload};
use super::{AnalysisContext, AnalystResponse};

const TREND_WINDOW_DAYS: usize = 14;

pub(super) fn run(ctx: &AnalysisContext<'_>) -> AnalystResponse {
    let totals = ctx.current_month_totals();
    let margin = totals.profit_margin();

    let assessment = if margin >= 20.0 {
        "🎉 優秀な業績です！"
    } else if margin >= 15.0 {
        "👍 良好な業績です"
    } else {
        "⚠️ 改善の余地があります"
    };

    let narrative = format!(
        "📊 **{}の今月業績**\n\n売上: {}\n利益: {}\n利益率: {}\n報告数: {}件\n\n{}",
        ctx.filter_label(),
        ctx.currency(totals.sales),
        ctx.currency(totals.profit),
        ctx.percent(margin),
        totals.count,
        assessment,
    );

    // The trend chart is deliberately unfiltered: the daily series shows the
    // whole business even when the headline numbers are scoped to one store.
    let series: Vec<DailyPoint> = bucket_by_day(ctx.records, TREND_WINDOW_DAYS)
        .into_iter()
        .map(|day| DailyPoint {
            date: format!("{}月{}日", day.date.month(), day.date.day()),
            sales: day.totals.sales,
            profit: day.totals.profit,
            reports: day.reports,
        })
        .collect();

    let metrics = vec![
        Metric {
            label: "今月売上".to_string(),
            value: ctx.currency(totals.sales),
            tone: Tone::Neutral,
        },
        Metric {
            label: "今月利益".to_string(),
            value: ctx.currency(totals.profit),
            tone: if totals.profit >= 0.0 {
                Tone::Positive
            } else {
                Tone::Negative
            },
        },
        Metric {
            label: "利益率".to_string(),
            value: ctx.percent(margin),
            tone: if margin >= 15.0 {
                Tone::Positive
            } else {
                Tone::Neutral
            },
        },
        Metric {
            label: "報告数".to_string(),
            value: format!("{}件", totals.count),
            tone: Tone::Neutral,
        },
    ];

    AnalystResponse {
        narrative,
        visual: Some(VisualPayload::Chart {
            chart_type: ChartKind::Area,
            series: ChartSeries::Daily(series),
            title: "過去2週間の売上・利益推移".to_string(),
            metrics: Some(metrics),
            total: None,
        }),
        suggestions: vec![
            "詳細な店舗別分析".to_string(),
            "来月の売上予測".to_string(),
            "経営改善提案".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Formatters;
    use crate::models::{DailyRecord, StoreFilter};
    use chrono::{NaiveDate, Utc};

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

    fn run_with(records: &[DailyRecord], filter: &StoreFilter, today: &str) -> AnalystResponse {
        let today: NaiveDate = today.parse().unwrap();
        let formatters = Formatters::default();
        let ctx = AnalysisContext {
            records,
            filter,
            today,
            stores: &[],
            formatters: &formatters,
        };
        run(&ctx)
    }

    #[test]
    fn test_headline_scoped_to_current_month_and_filter() {
        let records = vec![
            record("2026-08-10", "a", 100_000.0, 20_000.0),
            record("2026-08-12", "b", 50_000.0, 10_000.0),
            // previous month, must not count
            record("2026-07-31", "a", 999_999.0, 0.0),
        ];
        let filter = StoreFilter::Store("a".to_string());
        let response = run_with(&records, &filter, "2026-08-30");
        assert!(response.narrative.contains("¥100,000"));
        assert!(response.narrative.contains("¥80,000"));
        assert!(response.narrative.contains("1件"));
    }

    #[test]
    fn test_assessment_tiers() {
        let high = vec![record("2026-08-10", "a", 100.0, 75.0)]; // 25% margin
        assert!(run_with(&high, &StoreFilter::All, "2026-08-30")
            .narrative
            .contains("優秀な業績"));

        let mid = vec![record("2026-08-10", "a", 100.0, 83.0)]; // 17%
        assert!(run_with(&mid, &StoreFilter::All, "2026-08-30")
            .narrative
            .contains("良好な業績"));

        let low = vec![record("2026-08-10", "a", 100.0, 95.0)]; // 5%
        assert!(run_with(&low, &StoreFilter::All, "2026-08-30")
            .narrative
            .contains("改善の余地"));
    }

    #[test]
    fn test_trend_series_ignores_store_filter() {
        let records = vec![
            record("2026-08-10", "a", 100.0, 0.0),
            record("2026-08-11", "b", 200.0, 0.0),
        ];
        let filter = StoreFilter::Store("a".to_string());
        let response = run_with(&records, &filter, "2026-08-30");
        match response.visual {
            Some(VisualPayload::Chart {
                series: ChartSeries::Daily(points),
                ..
            }) => {
                assert_eq!(points.len(), 2);
                assert_eq!(points[0].date, "8月10日");
                assert_eq!(points[1].sales, 200.0);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_zero_sales_month_degrades_to_zero_margin() {
        let records = vec![record("2026-07-10", "a", 100.0, 0.0)];
        let response = run_with(&records, &StoreFilter::All, "2026-08-30");
        assert!(response.narrative.contains("0.0%"));
        assert!(response.narrative.contains("0件"));
    }
}
