//! Generated report, schedule, and generation log database operations

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{format_datetime, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{
    GeneratedReport, GenerationLog, GenerationStatus, NewGeneratedReport, NewReportSchedule,
    ReportSchedule, ReportType,
};

const REPORT_COLUMNS: &str = "id, store_id, report_type, period_start, period_end, title, \
     summary, key_insights, recommendations, metrics, generated_by, generated_at, created_at";

const SCHEDULE_COLUMNS: &str = "id, report_type, store_id, is_enabled, cron_expression, \
     last_run_at, next_run_at, notification_emails, created_at, updated_at";

const LOG_COLUMNS: &str = "id, schedule_id, report_id, report_type, store_id, status, \
     started_at, completed_at, error_message, record_count, store_count, created_at";

fn parse_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<chrono::NaiveDate> {
    let s: String = row.get(idx)?;
    s.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_report_type(row: &Row<'_>, idx: usize) -> rusqlite::Result<ReportType> {
    let s: String = row.get(idx)?;
    s.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("Unknown report type: {}", s).into(),
        )
    })
}

fn row_to_report(row: &Row<'_>) -> rusqlite::Result<GeneratedReport> {
    let key_insights: String = row.get(7)?;
    let recommendations: String = row.get(8)?;
    let metrics: String = row.get(9)?;
    let generated_at: String = row.get(11)?;
    let created_at: String = row.get(12)?;

    Ok(GeneratedReport {
        id: row.get(0)?,
        store_id: row.get(1)?,
        report_type: parse_report_type(row, 2)?,
        period_start: parse_date(row, 3)?,
        period_end: parse_date(row, 4)?,
        title: row.get(5)?,
        summary: row.get(6)?,
        key_insights: serde_json::from_str(&key_insights).unwrap_or_default(),
        recommendations: serde_json::from_str(&recommendations).unwrap_or_default(),
        metrics: serde_json::from_str(&metrics).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(9, rusqlite::types::Type::Text, Box::new(e))
        })?,
        generated_by: row.get(10)?,
        generated_at: parse_datetime(&generated_at),
        created_at: parse_datetime(&created_at),
    })
}

fn row_to_schedule(row: &Row<'_>) -> rusqlite::Result<ReportSchedule> {
    let last_run_at: Option<String> = row.get(5)?;
    let next_run_at: Option<String> = row.get(6)?;
    let emails: String = row.get(7)?;
    let created_at: String = row.get(8)?;
    let updated_at: String = row.get(9)?;

    Ok(ReportSchedule {
        id: row.get(0)?,
        report_type: parse_report_type(row, 1)?,
        store_id: row.get(2)?,
        is_enabled: row.get(3)?,
        cron_expression: row.get(4)?,
        last_run_at: last_run_at.as_deref().map(parse_datetime),
        next_run_at: next_run_at.as_deref().map(parse_datetime),
        notification_emails: serde_json::from_str(&emails).unwrap_or_default(),
        created_at: parse_datetime(&created_at),
        updated_at: parse_datetime(&updated_at),
    })
}

fn row_to_log(row: &Row<'_>) -> rusqlite::Result<GenerationLog> {
    let status: String = row.get(5)?;
    let started_at: String = row.get(6)?;
    let completed_at: Option<String> = row.get(7)?;
    let created_at: String = row.get(11)?;

    Ok(GenerationLog {
        id: row.get(0)?,
        schedule_id: row.get(1)?,
        report_id: row.get(2)?,
        report_type: parse_report_type(row, 3)?,
        store_id: row.get(4)?,
        status: status.parse().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                rusqlite::types::Type::Text,
                format!("Unknown generation status: {}", status).into(),
            )
        })?,
        started_at: parse_datetime(&started_at),
        completed_at: completed_at.as_deref().map(parse_datetime),
        error_message: row.get(8)?,
        record_count: row.get(9)?,
        store_count: row.get(10)?,
        created_at: parse_datetime(&created_at),
    })
}

impl Database {
    /// Persist a generated report
    pub fn insert_generated_report(&self, new: &NewGeneratedReport) -> Result<GeneratedReport> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO generated_reports (
                store_id, report_type, period_start, period_end, title, summary,
                key_insights, recommendations, metrics, generated_by, generated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, datetime('now'))
            "#,
            params![
                new.store_id,
                new.report_type.as_str(),
                new.period_start.to_string(),
                new.period_end.to_string(),
                new.title,
                new.summary,
                serde_json::to_string(&new.key_insights)?,
                serde_json::to_string(&new.recommendations)?,
                serde_json::to_string(&new.metrics)?,
                new.generated_by,
            ],
        )?;
        self.get_generated_report(conn.last_insert_rowid())
    }

    /// Get a generated report by id
    pub fn get_generated_report(&self, id: i64) -> Result<GeneratedReport> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM generated_reports WHERE id = ?", REPORT_COLUMNS),
            params![id],
            row_to_report,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Report {} not found", id)))
    }

    /// List generated reports, newest first, optionally filtered by type
    pub fn list_generated_reports(
        &self,
        report_type: Option<ReportType>,
        limit: u32,
    ) -> Result<Vec<GeneratedReport>> {
        let conn = self.conn()?;
        let reports = if let Some(rt) = report_type {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM generated_reports WHERE report_type = ?
                 ORDER BY generated_at DESC, id DESC LIMIT ?",
                REPORT_COLUMNS
            ))?;
            let rows = stmt.query_map(params![rt.as_str(), limit as i64], row_to_report)?;
            rows.collect::<std::result::Result<Vec<_>, _>>()?
        } else {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM generated_reports ORDER BY generated_at DESC, id DESC LIMIT ?",
                REPORT_COLUMNS
            ))?;
            let rows = stmt.query_map(params![limit as i64], row_to_report)?;
            rows.collect::<std::result::Result<Vec<_>, _>>()?
        };
        Ok(reports)
    }

    /// Delete a generated report by id
    pub fn delete_generated_report(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM generated_reports WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Report {} not found", id)));
        }
        Ok(())
    }

    /// Create a report schedule
    pub fn insert_schedule(&self, new: &NewReportSchedule) -> Result<ReportSchedule> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO report_schedules (
                report_type, store_id, is_enabled, cron_expression, next_run_at, notification_emails
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                new.report_type.as_str(),
                new.store_id,
                new.is_enabled,
                new.cron_expression,
                new.next_run_at.as_ref().map(format_datetime),
                serde_json::to_string(&new.notification_emails)?,
            ],
        )?;
        self.get_schedule(conn.last_insert_rowid())
    }

    /// Get a schedule by id
    pub fn get_schedule(&self, id: i64) -> Result<ReportSchedule> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM report_schedules WHERE id = ?", SCHEDULE_COLUMNS),
            params![id],
            row_to_schedule,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Schedule {} not found", id)))
    }

    /// List all schedules, oldest first
    pub fn list_schedules(&self) -> Result<Vec<ReportSchedule>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM report_schedules ORDER BY id",
            SCHEDULE_COLUMNS
        ))?;
        let rows = stmt.query_map([], row_to_schedule)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Enable or disable a schedule
    pub fn set_schedule_enabled(&self, id: i64, enabled: bool) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE report_schedules SET is_enabled = ?, updated_at = datetime('now') WHERE id = ?",
            params![enabled, id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Schedule {} not found", id)));
        }
        Ok(())
    }

    /// Record a schedule run and its next due time
    pub fn update_schedule_run(
        &self,
        id: i64,
        last_run_at: DateTime<Utc>,
        next_run_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE report_schedules
             SET last_run_at = ?, next_run_at = ?, updated_at = datetime('now')
             WHERE id = ?",
            params![
                format_datetime(&last_run_at),
                next_run_at.as_ref().map(format_datetime),
                id
            ],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Schedule {} not found", id)));
        }
        Ok(())
    }

    /// Delete a schedule by id
    pub fn delete_schedule(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM report_schedules WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Schedule {} not found", id)));
        }
        Ok(())
    }

    /// Enabled schedules whose next run time has passed
    pub fn due_schedules(&self, now: DateTime<Utc>) -> Result<Vec<ReportSchedule>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM report_schedules
             WHERE is_enabled = 1 AND next_run_at IS NOT NULL AND next_run_at <= ?
             ORDER BY next_run_at",
            SCHEDULE_COLUMNS
        ))?;
        let rows = stmt.query_map(params![format_datetime(&now)], row_to_schedule)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Open a generation log entry in the in_progress state
    pub fn start_generation_log(
        &self,
        schedule_id: Option<i64>,
        report_type: ReportType,
        store_id: Option<&str>,
        started_at: DateTime<Utc>,
    ) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO report_generation_logs (schedule_id, report_type, store_id, status, started_at)
            VALUES (?, ?, ?, 'in_progress', ?)
            "#,
            params![
                schedule_id,
                report_type.as_str(),
                store_id,
                format_datetime(&started_at)
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Close a generation log entry with its outcome
    #[allow(clippy::too_many_arguments)]
    pub fn complete_generation_log(
        &self,
        id: i64,
        status: GenerationStatus,
        report_id: Option<i64>,
        error_message: Option<&str>,
        record_count: i64,
        store_count: i64,
        completed_at: DateTime<Utc>,
    ) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            r#"
            UPDATE report_generation_logs
            SET status = ?, report_id = ?, error_message = ?,
                record_count = ?, store_count = ?, completed_at = ?
            WHERE id = ?
            "#,
            params![
                status.as_str(),
                report_id,
                error_message,
                record_count,
                store_count,
                format_datetime(&completed_at),
                id
            ],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Generation log {} not found", id)));
        }
        Ok(())
    }

    /// List generation log entries, newest first
    pub fn list_generation_logs(&self, limit: u32) -> Result<Vec<GenerationLog>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM report_generation_logs ORDER BY started_at DESC, id DESC LIMIT ?",
            LOG_COLUMNS
        ))?;
        let rows = stmt.query_map(params![limit as i64], row_to_log)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}
