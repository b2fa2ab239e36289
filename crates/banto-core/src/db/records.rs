//! Store and daily record database operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{DailyRecord, NewDailyRecord, Store};

const RECORD_COLUMNS: &str = "id, date, store_id, store_name, sales, purchase, labor_cost, \
     utilities, promotion, cleaning, misc, communication, others, report_text, created_at";

/// Filter for listing daily records
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    pub store_id: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub limit: Option<u32>,
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<DailyRecord> {
    let date_str: String = row.get(1)?;
    let date = date_str.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let created_at: String = row.get(14)?;

    Ok(DailyRecord {
        id: row.get(0)?,
        date,
        store_id: row.get(2)?,
        store_name: row.get(3)?,
        sales: row.get(4)?,
        purchase: row.get(5)?,
        labor_cost: row.get(6)?,
        utilities: row.get(7)?,
        promotion: row.get(8)?,
        cleaning: row.get(9)?,
        misc: row.get(10)?,
        communication: row.get(11)?,
        others: row.get(12)?,
        report_text: row.get(13)?,
        created_at: parse_datetime(&created_at),
    })
}

impl Database {
    /// Register (or rename) a store
    pub fn upsert_store(&self, store: &Store) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO stores (id, name) VALUES (?, ?)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name",
            params![store.id, store.name],
        )?;
        Ok(())
    }

    /// List all registered stores, ordered by id
    pub fn list_stores(&self) -> Result<Vec<Store>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name FROM stores ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Store {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Insert a daily record, replacing any existing row for the same
    /// (date, store) pair. The store directory picks up the name as a
    /// side effect so filters can resolve labels later.
    pub fn upsert_daily_record(&self, new: &NewDailyRecord) -> Result<DailyRecord> {
        self.upsert_store(&Store {
            id: new.store_id.clone(),
            name: new.store_name.clone(),
        })?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO daily_records (
                date, store_id, store_name, sales, purchase, labor_cost,
                utilities, promotion, cleaning, misc, communication, others, report_text
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(date, store_id) DO UPDATE SET
                store_name = excluded.store_name,
                sales = excluded.sales,
                purchase = excluded.purchase,
                labor_cost = excluded.labor_cost,
                utilities = excluded.utilities,
                promotion = excluded.promotion,
                cleaning = excluded.cleaning,
                misc = excluded.misc,
                communication = excluded.communication,
                others = excluded.others,
                report_text = excluded.report_text
            "#,
            params![
                new.date.to_string(),
                new.store_id,
                new.store_name,
                new.sales,
                new.purchase,
                new.labor_cost,
                new.utilities,
                new.promotion,
                new.cleaning,
                new.misc,
                new.communication,
                new.others,
                new.report_text,
            ],
        )?;

        let record = conn
            .query_row(
                &format!(
                    "SELECT {} FROM daily_records WHERE date = ? AND store_id = ?",
                    RECORD_COLUMNS
                ),
                params![new.date.to_string(), new.store_id],
                row_to_record,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound("Record vanished after upsert".to_string()))?;
        Ok(record)
    }

    /// Get a single daily record by id
    pub fn get_daily_record(&self, id: i64) -> Result<DailyRecord> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM daily_records WHERE id = ?", RECORD_COLUMNS),
            params![id],
            row_to_record,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Daily record {} not found", id)))
    }

    /// List daily records matching a query, ordered by date ascending
    pub fn list_daily_records(&self, query: &RecordQuery) -> Result<Vec<DailyRecord>> {
        let conn = self.conn()?;

        let mut sql = format!(
            "SELECT {} FROM daily_records WHERE 1=1",
            RECORD_COLUMNS
        );
        let mut args: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(store_id) = &query.store_id {
            sql.push_str(" AND store_id = ?");
            args.push(Box::new(store_id.clone()));
        }
        if let Some(start) = query.start {
            sql.push_str(" AND date >= ?");
            args.push(Box::new(start.to_string()));
        }
        if let Some(end) = query.end {
            sql.push_str(" AND date <= ?");
            args.push(Box::new(end.to_string()));
        }
        sql.push_str(" ORDER BY date, store_id");
        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            args.push(Box::new(limit as i64));
        }

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), row_to_record)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Delete a daily record by id
    pub fn delete_daily_record(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM daily_records WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Daily record {} not found", id)));
        }
        Ok(())
    }

    /// Number of distinct stores with at least one record in a date range
    pub fn store_count_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(DISTINCT store_id) FROM daily_records WHERE date >= ? AND date <= ?",
            params![start.to_string(), end.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
