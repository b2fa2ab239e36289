//! Short-horizon sales forecast from a four-week trailing window

use chrono::Duration;

use super::aggregate::bucket_by_week;
use super::payload::{ChartKind, PredictionPoint, VisualPayload, WeekPoint};
use super::{AnalysisContext, AnalystResponse};

const LOOKBACK_DAYS: i64 = 30;
const WEEKS: usize = 4;

/// Average weeks per month, used to scale the weekly projection
const WEEKS_PER_MONTH: f64 = 4.33;

pub(super) fn run(ctx: &AnalysisContext<'_>) -> AnalystResponse {
    let cutoff = ctx.today - Duration::days(LOOKBACK_DAYS);
    let recent: Vec<_> = ctx
        .records
        .iter()
        .filter(|r| r.date >= cutoff)
        .cloned()
        .collect();

    let weeks = bucket_by_week(&recent, ctx.today, WEEKS);
    let weekly_sales: Vec<f64> = weeks.iter().map(|w| w.totals.sales).collect();

    let avg = weekly_sales.iter().sum::<f64>() / WEEKS as f64;
    // Two-point slope: only the oldest and newest weeks participate, the
    // middle weeks contribute to the average but not the direction.
    let slope = (weekly_sales[WEEKS - 1] - weekly_sales[0]) / (WEEKS - 1) as f64;
    let next_week = avg + slope;
    let next_month = next_week * WEEKS_PER_MONTH;

    // Volatility ratio drives both confidence figures. The narrative one is
    // gentler than the chart one on purpose: the headline should not swing
    // as hard as the per-point annotation.
    let ratio = if avg == 0.0 { 0.0 } else { slope.abs() / avg };
    let narrative_confidence = (85.0 - ratio * 50.0).max(65.0);
    let series_confidence = (90.0 - ratio * 100.0).max(60.0);

    let trend = if slope > 0.0 {
        "📈 上昇傾向"
    } else if slope < 0.0 {
        "📉 下降傾向"
    } else {
        "📊 安定推移"
    };

    let narrative = format!(
        "🔮 **売上予測分析**\n\n来週予測: {}\n来月予測: {}\nトレンド: {}\n予測信頼度: {}\n\n直近4週間の推移から算出しています。",
        ctx.currency(next_week),
        ctx.currency(next_month),
        trend,
        ctx.percent(narrative_confidence),
    );

    let mut series: Vec<WeekPoint> = weeks
        .iter()
        .map(|w| WeekPoint {
            week: w.label.clone(),
            sales: w.totals.sales,
            delta: Some(w.delta),
            is_prediction: false,
            confidence: None,
        })
        .collect();
    series.push(WeekPoint {
        week: "来週予測".to_string(),
        sales: next_week,
        delta: None,
        is_prediction: true,
        confidence: Some(series_confidence),
    });

    AnalystResponse {
        narrative,
        visual: Some(VisualPayload::Prediction {
            chart_type: ChartKind::Line,
            series,
            title: "売上トレンド予測（4週間＋来週）".to_string(),
            predictions: vec![
                PredictionPoint {
                    period: "来週".to_string(),
                    value: next_week,
                    kind: "week".to_string(),
                },
                PredictionPoint {
                    period: "来月".to_string(),
                    value: next_month,
                    kind: "month".to_string(),
                },
            ],
        }),
        suggestions: vec![
            "予測の改善要因".to_string(),
            "売上向上戦略".to_string(),
            "リスク要因の分析".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Formatters;
    use crate::models::{DailyRecord, StoreFilter};
    use chrono::{NaiveDate, Utc};

    fn record(date: NaiveDate, sales: f64) -> DailyRecord {
        DailyRecord {
            id: 0,
            date,
            store_id: "a".to_string(),
            store_name: "a".to_string(),
            sales,
            purchase: 0.0,
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

    fn run_with(records: &[DailyRecord], today: &str) -> AnalystResponse {
        let formatters = Formatters::default();
        let ctx = AnalysisContext {
            records,
            filter: &StoreFilter::All,
            today: today.parse().unwrap(),
            stores: &[],
            formatters: &formatters,
        };
        run(&ctx)
    }

    /// One record per weekly window, oldest to newest: 100, 110, 120, 130
    fn rising_weeks(today: NaiveDate) -> Vec<DailyRecord> {
        (0..4)
            .map(|i| {
                let date = today - Duration::days(7 * (3 - i));
                record(date, 100.0 + 10.0 * i as f64)
            })
            .collect()
    }

    #[test]
    fn test_forecast_numbers_for_steady_rise() {
        let today: NaiveDate = "2026-08-30".parse().unwrap();
        let records = rising_weeks(today);
        let response = run_with(&records, "2026-08-30");
        match response.visual {
            Some(VisualPayload::Prediction {
                series,
                predictions,
                ..
            }) => {
                // avg 115, slope 10, next week 125, next month 125 * 4.33
                assert_eq!(series.len(), 5);
                let prediction = &series[4];
                assert!(prediction.is_prediction);
                assert_eq!(prediction.week, "来週予測");
                assert!((prediction.sales - 125.0).abs() < 1e-9);
                assert!((predictions[0].value - 125.0).abs() < 1e-9);
                assert!((predictions[1].value - 541.25).abs() < 1e-9);
                assert_eq!(predictions[1].kind, "month");
            }
            other => panic!("unexpected payload: {:?}", other),
        }
        assert!(response.narrative.contains("上昇傾向"));
    }

    #[test]
    fn test_confidence_floors() {
        // One huge newest week makes |slope|/avg large enough to hit both
        // lower bounds.
        let today: NaiveDate = "2026-08-30".parse().unwrap();
        let records = vec![record(today, 1_000_000.0)];
        let response = run_with(&records, "2026-08-30");
        match response.visual {
            Some(VisualPayload::Prediction { series, .. }) => {
                assert_eq!(series[4].confidence, Some(60.0));
            }
            other => panic!("unexpected payload: {:?}", other),
        }
        assert!(response.narrative.contains("65.0%"));
    }

    #[test]
    fn test_no_recent_records_degrades_to_zero() {
        let old: NaiveDate = "2026-06-01".parse().unwrap();
        let records = vec![record(old, 500.0)];
        let response = run_with(&records, "2026-08-30");
        match response.visual {
            Some(VisualPayload::Prediction { series, .. }) => {
                assert!(series[..4].iter().all(|w| w.sales == 0.0));
                assert_eq!(series[4].sales, 0.0);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
        assert!(response.narrative.contains("安定推移"));
    }

    #[test]
    fn test_historic_points_carry_deltas() {
        let today: NaiveDate = "2026-08-30".parse().unwrap();
        let records = rising_weeks(today);
        match run_with(&records, "2026-08-30").visual {
            Some(VisualPayload::Prediction { series, .. }) => {
                assert_eq!(series[0].delta, Some(0.0));
                assert_eq!(series[1].delta, Some(10.0));
                assert_eq!(series[3].delta, Some(10.0));
                assert_eq!(series[4].delta, None);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }
}
