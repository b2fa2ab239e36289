//! The natural-language-routed analysis engine
//!
//! One query in, one response out: the router classifies the query text,
//! the matching analysis mode aggregates and shapes the record set, and the
//! result is a `(narrative, visual payload, suggestions)` triple. The whole
//! pipeline is a pure function of (query, records, store filter, evaluation
//! date) with no shared state between invocations.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::format::Formatters;
use crate::models::{DailyRecord, Store, StoreFilter};

pub mod aggregate;
pub mod payload;
pub mod router;

mod comparison;
mod costs;
mod forecast;
mod goal;
mod improvement;
mod summary;

pub use aggregate::{aggregate, bucket_by_day, bucket_by_week, AggregatedPeriod};
pub use payload::VisualPayload;
pub use router::{route, Intent};

/// Everything an analysis mode may consult, captured once per invocation.
///
/// `today` is the single evaluation instant: current-month boundaries,
/// trailing windows, and days-remaining math all derive from it so one
/// response is internally consistent.
pub struct AnalysisContext<'a> {
    pub records: &'a [DailyRecord],
    pub filter: &'a StoreFilter,
    pub today: NaiveDate,
    pub stores: &'a [Store],
    pub formatters: &'a Formatters,
}

impl<'a> AnalysisContext<'a> {
    /// Records whose date falls in the same calendar month as `today`,
    /// restricted to the active store filter.
    pub fn current_month_records(&self) -> impl Iterator<Item = &'a DailyRecord> + '_ {
        let year = self.today.year();
        let month = self.today.month();
        self.records.iter().filter(move |r| {
            r.date.year() == year && r.date.month() == month && self.filter.matches(r)
        })
    }

    /// Totals for the current-month, store-filtered subset
    pub fn current_month_totals(&self) -> AggregatedPeriod {
        aggregate(self.current_month_records())
    }

    /// Human label for the active filter, resolved via the store directory
    pub fn filter_label(&self) -> String {
        match self.filter {
            StoreFilter::All => "全店舗".to_string(),
            StoreFilter::Store(id) => self
                .stores
                .iter()
                .find(|s| &s.id == id)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| id.clone()),
        }
    }

    pub fn currency(&self, value: f64) -> String {
        (self.formatters.currency)(value)
    }

    pub fn percent(&self, value: f64) -> String {
        (self.formatters.percent)(value)
    }
}

/// What the engine hands back to the conversational shell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalystResponse {
    pub narrative: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual: Option<VisualPayload>,
    pub suggestions: Vec<String>,
}

impl AnalystResponse {
    fn text_only(narrative: impl Into<String>, suggestions: &[&str]) -> Self {
        Self {
            narrative: narrative.into(),
            visual: None,
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The analysis engine. Holds only configuration (store directory and
/// formatting functions); every `analyze` call is independent.
#[derive(Debug, Clone, Default)]
pub struct Analyst {
    stores: Vec<Store>,
    formatters: Formatters,
}

impl Analyst {
    pub fn new(stores: Vec<Store>) -> Self {
        Self {
            stores,
            formatters: Formatters::default(),
        }
    }

    /// Override the injected formatting functions
    pub fn with_formatters(mut self, formatters: Formatters) -> Self {
        self.formatters = formatters;
        self
    }

    /// Run one query against the record set.
    ///
    /// An empty record set short-circuits to the fixed no-data response
    /// before any routing happens; with data present, exactly one of the
    /// analysis modes always produces a response. Nothing here can fail:
    /// sparse data degrades to zeros, not errors.
    pub fn analyze(
        &self,
        query: &str,
        records: &[DailyRecord],
        filter: &StoreFilter,
        today: NaiveDate,
    ) -> AnalystResponse {
        if records.is_empty() {
            return no_data_response();
        }

        let intent = router::route(query);
        tracing::debug!(
            intent = intent.as_str(),
            records = records.len(),
            filter = %filter,
            "Routed analysis query"
        );

        let ctx = AnalysisContext {
            records,
            filter,
            today,
            stores: &self.stores,
            formatters: &self.formatters,
        };

        match intent {
            Intent::Summary => summary::run(&ctx),
            Intent::StoreComparison => comparison::run(&ctx),
            Intent::Forecast => forecast::run(&ctx),
            Intent::Improvement => improvement::run(&ctx),
            Intent::GoalTracking => goal::run(&ctx),
            Intent::CostBreakdown => costs::run(&ctx),
            Intent::Fallback => fallback_response(),
        }
    }
}

/// Fixed response when no records exist at all, regardless of query text
fn no_data_response() -> AnalystResponse {
    AnalystResponse::text_only(
        "📊 分析可能なデータがまだありません。\n\n「新規報告」から日次報告を作成してください。",
        &["デモデータを生成", "サンプル分析を表示"],
    )
}

/// Fixed menu-of-capabilities response for unclassified queries
fn fallback_response() -> AnalystResponse {
    AnalystResponse::text_only(
        "🤖 **分析システム待機中**\n\n利用可能な分析機能:\n📊 業績分析\n🏆 店舗比較\n🔮 売上予測\n💡 改善提案\n🎯 目標分析\n\n具体的な質問をお聞かせください。",
        &[
            "今月の業績サマリーを表示",
            "店舗別パフォーマンス分析",
            "来月の売上予測",
            "経費最適化提案",
        ],
    )
}
