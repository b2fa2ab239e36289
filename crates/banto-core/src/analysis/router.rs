//! Intent classification for free-text queries
//!
//! Routing is keyword matching, not semantic parsing: an ordered list of
//! predicates evaluated first-match-wins. The order is part of the contract;
//! a query containing both a summary term and a forecast term routes to
//! Summary because Summary is checked first.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The classified analysis mode for a query.
///
/// Selection is total (Fallback always applies when nothing matches) and
/// deterministic for a fixed predicate order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Summary,
    StoreComparison,
    Forecast,
    Improvement,
    GoalTracking,
    CostBreakdown,
    Fallback,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Summary => "summary",
            Intent::StoreComparison => "store_comparison",
            Intent::Forecast => "forecast",
            Intent::Improvement => "improvement",
            Intent::GoalTracking => "goal_tracking",
            Intent::CostBreakdown => "cost_breakdown",
            Intent::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summary" => Ok(Intent::Summary),
            "store_comparison" => Ok(Intent::StoreComparison),
            "forecast" => Ok(Intent::Forecast),
            "improvement" => Ok(Intent::Improvement),
            "goal_tracking" => Ok(Intent::GoalTracking),
            "cost_breakdown" => Ok(Intent::CostBreakdown),
            "fallback" => Ok(Intent::Fallback),
            _ => Err(format!("Unknown intent: {}", s)),
        }
    }
}

/// Lowercase the query once; all predicates match against this form
pub fn normalize(query: &str) -> String {
    query.to_lowercase()
}

fn contains_any(q: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| q.contains(t))
}

/// 業績サマリー queries
pub fn matches_summary(q: &str) -> bool {
    contains_any(q, &["業績", "サマリー", "概要"])
}

/// Store comparison requires co-occurrence of a store term and a
/// comparison/analysis/ranking term; either alone is not enough.
pub fn matches_store_comparison(q: &str) -> bool {
    q.contains("店舗") && contains_any(q, &["比較", "分析", "ランキング"])
}

/// 売上予測 queries
pub fn matches_forecast(q: &str) -> bool {
    contains_any(q, &["予測", "将来", "来月", "見込み"])
}

/// 経営改善 queries
pub fn matches_improvement(q: &str) -> bool {
    contains_any(q, &["改善", "提案", "最適化"])
}

/// 目標達成 queries
pub fn matches_goal_tracking(q: &str) -> bool {
    contains_any(q, &["目標", "達成"])
}

/// 経費分析 queries
pub fn matches_cost_breakdown(q: &str) -> bool {
    contains_any(q, &["経費", "コスト"])
}

/// Priority-ordered predicate table. First match wins; Fallback is the
/// total-function guarantee at the end.
const RULES: [(Intent, fn(&str) -> bool); 6] = [
    (Intent::Summary, matches_summary),
    (Intent::StoreComparison, matches_store_comparison),
    (Intent::Forecast, matches_forecast),
    (Intent::Improvement, matches_improvement),
    (Intent::GoalTracking, matches_goal_tracking),
    (Intent::CostBreakdown, matches_cost_breakdown),
];

/// Classify a query. Pure: same text always yields the same intent.
pub fn route(query: &str) -> Intent {
    let q = normalize(query);
    for (intent, predicate) in RULES {
        if predicate(&q) {
            return intent;
        }
    }
    Intent::Fallback
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_each_intent() {
        assert_eq!(route("今月の業績サマリーを表示"), Intent::Summary);
        assert_eq!(route("店舗別パフォーマンス分析"), Intent::StoreComparison);
        assert_eq!(route("来月の売上予測"), Intent::Forecast);
        assert_eq!(route("経営改善の提案をください"), Intent::Improvement);
        assert_eq!(route("目標達成ロードマップ"), Intent::GoalTracking);
        assert_eq!(route("経費の内訳を見たい"), Intent::CostBreakdown);
        assert_eq!(route("こんにちは"), Intent::Fallback);
    }

    #[test]
    fn test_route_is_total() {
        for q in ["", "???", "12345", "hello world", "　"] {
            // every string maps to exactly one intent without panicking
            let _ = route(q);
        }
        assert_eq!(route(""), Intent::Fallback);
    }

    #[test]
    fn test_priority_order_first_match_wins() {
        // contains both a summary term and a forecast term
        assert_eq!(route("業績の予測を見たい"), Intent::Summary);
        // comparison term and cost term; comparison is checked first but
        // needs the store co-occurrence, which is present here
        assert_eq!(route("店舗比較とコスト"), Intent::StoreComparison);
        // improvement outranks cost breakdown
        assert_eq!(route("経費の最適化"), Intent::Improvement);
    }

    #[test]
    fn test_store_comparison_needs_both_terms() {
        assert_eq!(route("店舗について"), Intent::Fallback);
        assert_eq!(route("ランキングを見たい"), Intent::Fallback);
        assert_eq!(route("店舗ランキング"), Intent::StoreComparison);
    }

    #[test]
    fn test_route_is_case_insensitive() {
        // keyword matching runs on the lowercased query
        assert!(normalize("ABC業績") == "abc業績");
        assert_eq!(route("ABC業績"), Intent::Summary);
    }

    #[test]
    fn test_intent_string_roundtrip() {
        for intent in [
            Intent::Summary,
            Intent::StoreComparison,
            Intent::Forecast,
            Intent::Improvement,
            Intent::GoalTracking,
            Intent::CostBreakdown,
            Intent::Fallback,
        ] {
            assert_eq!(intent.as_str().parse::<Intent>().unwrap(), intent);
        }
    }
}
