//! Visual payload schema
//!
//! The structured, renderer-agnostic output contract. The rendering layer
//! pattern-matches on the variant tag to pick a chart or widget; every
//! variant is self-contained and carries values, never references.
//! Payloads are built fresh per query and never mutated after return.

use serde::{Deserialize, Serialize};

/// Chart widget selector for the rendering layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Area,
    Pie,
    Bar,
    Line,
    Progress,
}

/// Semantic color tag for headline metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

/// One pre-formatted headline metric
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
    pub tone: Tone,
}

/// One day's point in a trend series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    /// Display label, e.g. 8月30日
    pub date: String,
    pub sales: f64,
    pub profit: f64,
    /// Number of store reports behind this point
    pub reports: usize,
}

/// One slice of the cost breakdown pie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSlice {
    pub name: String,
    pub value: f64,
    pub color: String,
}

/// Per-store bar in the comparison chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorePerformance {
    pub name: String,
    pub sales: f64,
    pub profit: f64,
    pub profit_margin: f64,
    /// Average sales per record
    pub efficiency: f64,
}

/// One point in the forecast line: four historical weeks plus one
/// appended prediction point flagged for dashed rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekPoint {
    pub week: String,
    pub sales: f64,
    /// Sales change versus the previous week (historical points only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_prediction: bool,
    /// Confidence percentage attached to the prediction point
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// A headline prediction figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    /// Display label, e.g. 来週 or 来月
    pub period: String,
    pub value: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// One improvement proposal with fixed metadata and a formulaic saving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    pub category: String,
    pub impact: String,
    pub timeframe: String,
    pub actions: Vec<String>,
    pub expected_savings: f64,
}

/// One slice of the goal progress ring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSlice {
    pub label: String,
    pub value: f64,
    pub color: String,
}

/// Series data for `VisualPayload::Chart`; the shape depends on the
/// chart kind (area charts carry daily points, pies carry slices).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartSeries {
    Daily(Vec<DailyPoint>),
    Slices(Vec<CostSlice>),
}

/// The structured output consumed by the rendering layer, one variant
/// per analysis mode. Matching is exhaustive: a renderer cannot reach
/// for fields the active variant does not carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VisualPayload {
    Chart {
        chart_type: ChartKind,
        series: ChartSeries,
        title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        metrics: Option<Vec<Metric>>,
        /// Grand total behind a pie chart, for percentage tooltips
        #[serde(skip_serializing_if = "Option::is_none")]
        total: Option<f64>,
    },
    Comparison {
        chart_type: ChartKind,
        series: Vec<StorePerformance>,
        title: String,
        recommendations: Vec<String>,
    },
    Prediction {
        chart_type: ChartKind,
        series: Vec<WeekPoint>,
        title: String,
        predictions: Vec<PredictionPoint>,
    },
    Recommendations {
        improvements: Vec<Improvement>,
        current_profit: f64,
        projected_profit: f64,
        current_margin: f64,
        projected_margin: f64,
    },
    Metrics {
        chart_type: ChartKind,
        progress: Vec<ProgressSlice>,
        achievement: f64,
        target: f64,
        current: f64,
        daily_target: f64,
    },
}

impl VisualPayload {
    /// Variant tag as serialized, for logging and tests
    pub fn kind(&self) -> &'static str {
        match self {
            VisualPayload::Chart { .. } => "chart",
            VisualPayload::Comparison { .. } => "comparison",
            VisualPayload::Prediction { .. } => "prediction",
            VisualPayload::Recommendations { .. } => "recommendations",
            VisualPayload::Metrics { .. } => "metrics",
        }
    }
}
