//! Data models shared across the workspace

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One daily per-store operational entry: sales plus eight cost categories.
///
/// Records are append-only historical facts. The analysis engine never
/// mutates them; all derived figures are recomputed per query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRecord {
    pub id: i64,
    pub date: NaiveDate,
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
    /// Free-text notes from the submitting staff member
    pub report_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DailyRecord {
    /// Sum of the eight cost fields
    pub fn total_expenses(&self) -> f64 {
        self.purchase
            + self.labor_cost
            + self.utilities
            + self.promotion
            + self.cleaning
            + self.misc
            + self.communication
            + self.others
    }

    /// Sales minus total expenses
    pub fn profit(&self) -> f64 {
        self.sales - self.total_expenses()
    }
}

/// A daily record before insertion (no id or created_at yet)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDailyRecord {
    pub date: NaiveDate,
    pub store_id: String,
    pub store_name: String,
    pub sales: f64,
    #[serde(default)]
    pub purchase: f64,
    #[serde(default)]
    pub labor_cost: f64,
    #[serde(default)]
    pub utilities: f64,
    #[serde(default)]
    pub promotion: f64,
    #[serde(default)]
    pub cleaning: f64,
    #[serde(default)]
    pub misc: f64,
    #[serde(default)]
    pub communication: f64,
    #[serde(default)]
    pub others: f64,
    #[serde(default)]
    pub report_text: Option<String>,
}

/// Store directory entry, used to resolve filter labels for narrative text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: String,
    pub name: String,
}

/// Scopes which records an analysis mode considers: a specific store,
/// or the "all stores" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StoreFilter {
    #[default]
    All,
    Store(String),
}

impl StoreFilter {
    /// Whether a record passes the filter
    pub fn matches(&self, record: &DailyRecord) -> bool {
        match self {
            StoreFilter::All => true,
            StoreFilter::Store(id) => &record.store_id == id,
        }
    }

    pub fn store_id(&self) -> Option<&str> {
        match self {
            StoreFilter::All => None,
            StoreFilter::Store(id) => Some(id),
        }
    }
}

impl fmt::Display for StoreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreFilter::All => write!(f, "all"),
            StoreFilter::Store(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for StoreFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" | "" => Ok(StoreFilter::All),
            id => Ok(StoreFilter::Store(id.to_string())),
        }
    }
}

impl Serialize for StoreFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StoreFilter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or_default())
    }
}

/// The eight cost categories of a daily record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Purchase,
    LaborCost,
    Utilities,
    Promotion,
    Cleaning,
    Communication,
    Misc,
    Others,
}

impl ExpenseCategory {
    /// All categories in display order
    pub const ALL: [ExpenseCategory; 8] = [
        ExpenseCategory::Purchase,
        ExpenseCategory::LaborCost,
        ExpenseCategory::Utilities,
        ExpenseCategory::Promotion,
        ExpenseCategory::Cleaning,
        ExpenseCategory::Communication,
        ExpenseCategory::Misc,
        ExpenseCategory::Others,
    ];

    /// Display label for the renderer and narrative text
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Purchase => "仕入",
            ExpenseCategory::LaborCost => "人件費",
            ExpenseCategory::Utilities => "光熱費",
            ExpenseCategory::Promotion => "販促費",
            ExpenseCategory::Cleaning => "清掃費",
            ExpenseCategory::Communication => "通信費",
            ExpenseCategory::Misc => "雑費",
            ExpenseCategory::Others => "その他",
        }
    }

    /// Fixed display color for chart slices
    pub fn color(&self) -> &'static str {
        match self {
            ExpenseCategory::Purchase => "#ef4444",
            ExpenseCategory::LaborCost => "#f97316",
            ExpenseCategory::Utilities => "#3b82f6",
            ExpenseCategory::Promotion => "#10b981",
            ExpenseCategory::Cleaning => "#8b5cf6",
            ExpenseCategory::Communication => "#06b6d4",
            ExpenseCategory::Misc => "#f59e0b",
            ExpenseCategory::Others => "#6b7280",
        }
    }

    /// Read this category's amount from a record
    pub fn amount(&self, record: &DailyRecord) -> f64 {
        match self {
            ExpenseCategory::Purchase => record.purchase,
            ExpenseCategory::LaborCost => record.labor_cost,
            ExpenseCategory::Utilities => record.utilities,
            ExpenseCategory::Promotion => record.promotion,
            ExpenseCategory::Cleaning => record.cleaning,
            ExpenseCategory::Communication => record.communication,
            ExpenseCategory::Misc => record.misc,
            ExpenseCategory::Others => record.others,
        }
    }
}

/// Period kind for stored periodic reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Weekly,
    Monthly,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Weekly => "weekly",
            ReportType::Monthly => "monthly",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(ReportType::Weekly),
            "monthly" => Ok(ReportType::Monthly),
            _ => Err(format!("Unknown report type: {}", s)),
        }
    }
}

/// Headline metrics of a stored periodic report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetrics {
    pub total_sales: f64,
    pub total_expenses: f64,
    /// Sales minus purchase cost
    pub gross_profit: f64,
    /// Sales minus all eight expense categories
    pub operating_profit: f64,
    pub profit_margin: f64,
    /// Purchase cost as a share of sales
    pub cost_rate: f64,
    /// Labor cost as a share of sales
    pub labor_rate: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub store_breakdown: Vec<StoreMetrics>,
}

/// Per-store slice of a report's metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreMetrics {
    pub store_id: String,
    pub store_name: String,
    pub sales: f64,
    pub expenses: f64,
    pub profit: f64,
    pub profit_margin: f64,
    pub cost_rate: f64,
    pub labor_rate: f64,
}

/// A stored periodic report (persisted)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedReport {
    pub id: i64,
    pub store_id: Option<String>,
    pub report_type: ReportType,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub title: String,
    pub summary: String,
    pub key_insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub metrics: ReportMetrics,
    pub generated_by: String,
    pub generated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A periodic report ready for persistence (no id or created_at yet)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGeneratedReport {
    pub store_id: Option<String>,
    pub report_type: ReportType,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub title: String,
    pub summary: String,
    pub key_insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub metrics: ReportMetrics,
    pub generated_by: String,
}

/// Recurring report generation schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSchedule {
    pub id: i64,
    pub report_type: ReportType,
    pub store_id: Option<String>,
    pub is_enabled: bool,
    pub cron_expression: String,
    pub last_run_at: Option<DateTime<Utc>>,
    pub next_run_at: Option<DateTime<Utc>>,
    pub notification_emails: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Schedule creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReportSchedule {
    pub report_type: ReportType,
    #[serde(default)]
    pub store_id: Option<String>,
    #[serde(default = "default_true")]
    pub is_enabled: bool,
    pub cron_expression: String,
    #[serde(default)]
    pub next_run_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notification_emails: Vec<String>,
}

fn default_true() -> bool {
    true
}

/// Outcome of one report generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    InProgress,
    Success,
    Failed,
}

impl GenerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStatus::InProgress => "in_progress",
            GenerationStatus::Success => "success",
            GenerationStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GenerationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(GenerationStatus::InProgress),
            "success" => Ok(GenerationStatus::Success),
            "failed" => Ok(GenerationStatus::Failed),
            _ => Err(format!("Unknown generation status: {}", s)),
        }
    }
}

/// Audit row for one report generation attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationLog {
    pub id: i64,
    pub schedule_id: Option<i64>,
    pub report_id: Option<i64>,
    pub report_type: ReportType,
    pub store_id: Option<String>,
    pub status: GenerationStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub record_count: i64,
    pub store_count: i64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sales: f64, purchase: f64, labor: f64) -> DailyRecord {
        DailyRecord {
            id: 1,
            date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            store_id: "ikki-hon".to_string(),
            store_name: "本店".to_string(),
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
    fn test_total_expenses_sums_all_eight_fields() {
        let mut r = record(100_000.0, 30_000.0, 20_000.0);
        r.utilities = 1.0;
        r.promotion = 2.0;
        r.cleaning = 3.0;
        r.misc = 4.0;
        r.communication = 5.0;
        r.others = 6.0;
        assert_eq!(r.total_expenses(), 50_021.0);
        assert_eq!(r.profit(), 100_000.0 - 50_021.0);
    }

    #[test]
    fn test_store_filter_parsing() {
        assert_eq!("all".parse::<StoreFilter>().unwrap(), StoreFilter::All);
        assert_eq!(
            "ikki-ekimae".parse::<StoreFilter>().unwrap(),
            StoreFilter::Store("ikki-ekimae".to_string())
        );
        assert_eq!(StoreFilter::All.to_string(), "all");
    }

    #[test]
    fn test_store_filter_matches() {
        let r = record(1.0, 0.0, 0.0);
        assert!(StoreFilter::All.matches(&r));
        assert!(StoreFilter::Store("ikki-hon".to_string()).matches(&r));
        assert!(!StoreFilter::Store("ikki-ekimae".to_string()).matches(&r));
    }

    #[test]
    fn test_expense_category_roundtrip() {
        let mut r = record(0.0, 11.0, 22.0);
        r.communication = 33.0;
        assert_eq!(ExpenseCategory::Purchase.amount(&r), 11.0);
        assert_eq!(ExpenseCategory::LaborCost.amount(&r), 22.0);
        assert_eq!(ExpenseCategory::Communication.amount(&r), 33.0);
        let total: f64 = ExpenseCategory::ALL.iter().map(|c| c.amount(&r)).sum();
        assert_eq!(total, r.total_expenses());
    }

    #[test]
    fn test_report_type_serialization() {
        assert_eq!(ReportType::Weekly.as_str(), "weekly");
        assert_eq!("monthly".parse::<ReportType>().unwrap(), ReportType::Monthly);
        assert!("daily".parse::<ReportType>().is_err());
    }
}
