//! CSV import for daily records

use csv::ReaderBuilder;
use serde::Deserialize;
use std::io::Read;
use tracing::debug;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::NewDailyRecord;

/// One row of a daily-record CSV
///
/// Expected header: date, store_id, store_name, sales, purchase, labor_cost,
/// utilities, promotion, cleaning, misc, communication, others, report_text.
/// Cost columns and report_text may be omitted.
#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    store_id: String,
    store_name: String,
    sales: f64,
    #[serde(default)]
    purchase: f64,
    #[serde(default)]
    labor_cost: f64,
    #[serde(default)]
    utilities: f64,
    #[serde(default)]
    promotion: f64,
    #[serde(default)]
    cleaning: f64,
    #[serde(default)]
    misc: f64,
    #[serde(default)]
    communication: f64,
    #[serde(default)]
    others: f64,
    #[serde(default)]
    report_text: Option<String>,
}

/// Outcome of a CSV import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportResult {
    pub imported: usize,
    pub replaced: usize,
}

/// Parse a daily-record CSV into insertable records
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<NewDailyRecord>> {
    let mut csv_reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut records = Vec::new();
    for (i, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let row = row?;
        let date = row.date.parse().map_err(|_| {
            Error::InvalidData(format!("Row {}: invalid date {:?}", i + 1, row.date))
        })?;
        if row.store_id.is_empty() {
            return Err(Error::InvalidData(format!("Row {}: empty store_id", i + 1)));
        }
        records.push(NewDailyRecord {
            date,
            store_id: row.store_id,
            store_name: row.store_name,
            sales: row.sales,
            purchase: row.purchase,
            labor_cost: row.labor_cost,
            utilities: row.utilities,
            promotion: row.promotion,
            cleaning: row.cleaning,
            misc: row.misc,
            communication: row.communication,
            others: row.others,
            report_text: row.report_text.filter(|s| !s.is_empty()),
        });
    }
    Ok(records)
}

/// Import a daily-record CSV into the database.
///
/// Rows for an already-recorded (date, store) pair replace the existing
/// record, matching the upsert semantics of manual entry.
pub fn import_csv<R: Read>(db: &Database, reader: R) -> Result<ImportResult> {
    let records = parse_csv(reader)?;

    let mut result = ImportResult::default();
    for record in &records {
        let existing = db.list_daily_records(&crate::db::RecordQuery {
            store_id: Some(record.store_id.clone()),
            start: Some(record.date),
            end: Some(record.date),
            limit: Some(1),
        })?;
        db.upsert_daily_record(record)?;
        if existing.is_empty() {
            result.imported += 1;
        } else {
            result.replaced += 1;
        }
    }

    debug!(
        imported = result.imported,
        replaced = result.replaced,
        "CSV import complete"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
date,store_id,store_name,sales,purchase,labor_cost,utilities,promotion,cleaning,misc,communication,others,report_text
2026-08-01,hon,本店,100000,30000,20000,0,0,0,0,0,0,順調でした
2026-08-01,ekimae,駅前店,80000,25000,15000,0,0,0,0,0,0,
";

    #[test]
    fn test_parse_csv() {
        let records = parse_csv(CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].store_name, "本店");
        assert_eq!(records[0].sales, 100000.0);
        assert_eq!(records[0].report_text.as_deref(), Some("順調でした"));
        assert_eq!(records[1].report_text, None);
    }

    #[test]
    fn test_invalid_date_rejected() {
        let bad = "date,store_id,store_name,sales\n08/01/2026,hon,本店,100\n";
        assert!(matches!(
            parse_csv(bad.as_bytes()),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_missing_cost_columns_default_to_zero() {
        let minimal = "date,store_id,store_name,sales\n2026-08-01,hon,本店,100\n";
        let records = parse_csv(minimal.as_bytes()).unwrap();
        assert_eq!(records[0].purchase, 0.0);
        assert_eq!(records[0].others, 0.0);
    }

    #[test]
    fn test_import_counts_replacements() {
        let db = Database::in_memory().unwrap();
        let first = import_csv(&db, CSV.as_bytes()).unwrap();
        assert_eq!(first, ImportResult { imported: 2, replaced: 0 });

        let second = import_csv(&db, CSV.as_bytes()).unwrap();
        assert_eq!(second, ImportResult { imported: 0, replaced: 2 });

        let all = db
            .list_daily_records(&crate::db::RecordQuery::default())
            .unwrap();
        assert_eq!(all.len(), 2);
    }
}
