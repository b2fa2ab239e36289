//! Banto Core Library
//!
//! Shared functionality for the Banto restaurant analytics tool:
//! - Natural-language-routed analysis engine over daily records
//! - Record aggregation and period bucketing
//! - Database access and migrations
//! - Periodic report builder for weekly and monthly reports
//! - CSV import for daily records

pub mod analysis;
pub mod db;
pub mod error;
pub mod format;
pub mod import;
pub mod models;
pub mod report;

pub use analysis::{
    aggregate, bucket_by_day, bucket_by_week, route, AggregatedPeriod, AnalysisContext, Analyst,
    AnalystResponse, Intent, VisualPayload,
};
pub use db::{Database, RecordQuery};
pub use error::{Error, Result};
pub use format::{format_percent, format_yen, Formatters};
pub use import::{import_csv, parse_csv, ImportResult};
pub use models::{
    DailyRecord, ExpenseCategory, GeneratedReport, GenerationLog, GenerationStatus,
    NewDailyRecord, NewGeneratedReport, NewReportSchedule, ReportMetrics, ReportSchedule,
    ReportType, Store, StoreFilter, StoreMetrics,
};
pub use report::{build_periodic_report, report_period};
