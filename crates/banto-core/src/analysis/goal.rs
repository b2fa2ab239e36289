//! Monthly sales goal tracking with a progress gauge

use chrono::Datelike;

use super::payload::{ChartKind, ProgressSlice, VisualPayload};
use super::{AnalysisContext, AnalystResponse};
use crate::models::StoreFilter;

/// Fixed monthly sales goals in yen
const GOAL_ALL_STORES: f64 = 25_000_000.0;
const GOAL_SINGLE_STORE: f64 = 8_000_000.0;

/// Months are treated as 30 days for the daily-target split
const MONTH_DAYS: u32 = 30;

pub(super) fn run(ctx: &AnalysisContext<'_>) -> AnalystResponse {
    let totals = ctx.current_month_totals();
    let goal = match ctx.filter {
        StoreFilter::All => GOAL_ALL_STORES,
        StoreFilter::Store(_) => GOAL_SINGLE_STORE,
    };

    let achievement = if goal > 0.0 {
        totals.sales / goal * 100.0
    } else {
        0.0
    };
    let remaining = (goal - totals.sales).max(0.0);
    let days_left = MONTH_DAYS.saturating_sub(ctx.today.day());
    let daily_target = if days_left > 0 {
        remaining / days_left as f64
    } else {
        0.0
    };

    let status = if achievement >= 100.0 {
        "🎉 目標達成おめでとうございます！"
    } else if achievement >= 80.0 {
        "💪 目標達成まであと一息です"
    } else {
        "📣 ペースアップが必要です"
    };

    let narrative = format!(
        "🎯 **{}の目標進捗**\n\n月間目標: {}\n現在売上: {}\n達成率: {}\n残り: {}\n必要日販: {}\n\n{}",
        ctx.filter_label(),
        ctx.currency(goal),
        ctx.currency(totals.sales),
        ctx.percent(achievement),
        ctx.currency(remaining),
        ctx.currency(daily_target),
        status,
    );

    let progress = vec![
        ProgressSlice {
            label: "達成済み".to_string(),
            value: totals.sales.min(goal),
            color: "#10b981".to_string(),
        },
        ProgressSlice {
            label: "未達成".to_string(),
            value: remaining,
            color: "#e5e7eb".to_string(),
        },
    ];

    AnalystResponse {
        narrative,
        visual: Some(VisualPayload::Metrics {
            chart_type: ChartKind::Progress,
            progress,
            achievement,
            target: goal,
            current: totals.sales,
            daily_target,
        }),
        suggestions: vec![
            "目標達成戦略".to_string(),
            "日次アクションプラン".to_string(),
            "緊急対策案".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Formatters;
    use crate::models::DailyRecord;
    use chrono::Utc;

    fn record(date: &str, store: &str, sales: f64) -> DailyRecord {
        DailyRecord {
            id: 0,
            date: date.parse().unwrap(),
            store_id: store.to_string(),
            store_name: store.to_string(),
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

    fn run_with(records: &[DailyRecord], filter: &StoreFilter, today: &str) -> AnalystResponse {
        let formatters = Formatters::default();
        let ctx = AnalysisContext {
            records,
            filter,
            today: today.parse().unwrap(),
            stores: &[],
            formatters: &formatters,
        };
        run(&ctx)
    }

    #[test]
    fn test_all_stores_goal_and_achievement() {
        let records = vec![record("2026-08-05", "a", 10_000_000.0)];
        match run_with(&records, &StoreFilter::All, "2026-08-15").visual {
            Some(VisualPayload::Metrics {
                achievement,
                target,
                current,
                daily_target,
                progress,
                ..
            }) => {
                assert_eq!(target, 25_000_000.0);
                assert_eq!(current, 10_000_000.0);
                assert!((achievement - 40.0).abs() < 1e-9);
                // remaining 15M over 15 days left of a 30-day month
                assert!((daily_target - 1_000_000.0).abs() < 1e-6);
                assert_eq!(progress[0].value, 10_000_000.0);
                assert_eq!(progress[1].value, 15_000_000.0);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_single_store_uses_smaller_goal() {
        let records = vec![
            record("2026-08-05", "a", 4_000_000.0),
            record("2026-08-06", "b", 9_000_000.0),
        ];
        let filter = StoreFilter::Store("a".to_string());
        match run_with(&records, &filter, "2026-08-15").visual {
            Some(VisualPayload::Metrics {
                achievement, target, ..
            }) => {
                assert_eq!(target, 8_000_000.0);
                assert!((achievement - 50.0).abs() < 1e-9);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_month_end_daily_target_is_zero() {
        let records = vec![record("2026-08-05", "a", 1_000_000.0)];
        for today in ["2026-08-30", "2026-08-31"] {
            match run_with(&records, &StoreFilter::All, today).visual {
                Some(VisualPayload::Metrics { daily_target, .. }) => {
                    assert_eq!(daily_target, 0.0);
                }
                other => panic!("unexpected payload: {:?}", other),
            }
        }
    }

    #[test]
    fn test_overachievement_caps_progress_not_rate() {
        let records = vec![record("2026-08-05", "a", 30_000_000.0)];
        let response = run_with(&records, &StoreFilter::All, "2026-08-15");
        match response.visual {
            Some(VisualPayload::Metrics {
                achievement,
                progress,
                ..
            }) => {
                assert!(achievement > 100.0);
                assert_eq!(progress[0].value, 25_000_000.0);
                assert_eq!(progress[1].value, 0.0);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
        assert!(response.narrative.contains("目標達成おめでとうございます"));
    }
}
