//! Record aggregation and calendar bucketing
//!
//! The aggregator is a pure fold: commutative and associative, so record
//! order never affects the result. All period math takes an explicit
//! evaluation date rather than reading the wall clock.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::DailyRecord;

/// Summed sales, expenses, and profit over an arbitrary record subset.
///
/// `profit == sales - expenses` holds by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedPeriod {
    pub sales: f64,
    pub expenses: f64,
    pub profit: f64,
    pub count: u32,
}

impl AggregatedPeriod {
    /// Fold one record into the accumulator
    pub fn add(&mut self, record: &DailyRecord) {
        let expenses = record.total_expenses();
        self.sales += record.sales;
        self.expenses += expenses;
        self.profit += record.sales - expenses;
        self.count += 1;
    }

    /// Profit as a percentage of sales; 0 when there are no sales
    pub fn profit_margin(&self) -> f64 {
        if self.sales > 0.0 {
            self.profit / self.sales * 100.0
        } else {
            0.0
        }
    }

    /// Average sales per record; 0 when empty
    pub fn sales_per_record(&self) -> f64 {
        if self.count > 0 {
            self.sales / self.count as f64
        } else {
            0.0
        }
    }
}

/// Reduce a record sequence into period totals. Empty input yields all
/// zeros with count 0, which is a valid displayable state.
pub fn aggregate<'a, I>(records: I) -> AggregatedPeriod
where
    I: IntoIterator<Item = &'a DailyRecord>,
{
    let mut acc = AggregatedPeriod::default();
    for record in records {
        acc.add(record);
    }
    acc
}

/// One calendar day's totals
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub totals: AggregatedPeriod,
    /// How many records (stores) reported on this day
    pub reports: usize,
}

/// Partition records into per-day buckets, keeping the most recent
/// `window_days` distinct dates present in the data, oldest first.
/// Shorter history simply yields fewer buckets.
pub fn bucket_by_day(records: &[DailyRecord], window_days: usize) -> Vec<DayBucket> {
    let mut dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
    dates.sort();
    dates.dedup();

    let skip = dates.len().saturating_sub(window_days);
    dates
        .into_iter()
        .skip(skip)
        .map(|date| {
            let day_records: Vec<&DailyRecord> =
                records.iter().filter(|r| r.date == date).collect();
            DayBucket {
                date,
                reports: day_records.len(),
                totals: aggregate(day_records.into_iter()),
            }
        })
        .collect()
}

/// One trailing 7-day window's totals
#[derive(Debug, Clone, PartialEq)]
pub struct WeekBucket {
    /// Display label, 第1週 (oldest) through 第N週 (most recent)
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub totals: AggregatedPeriod,
    /// Sales change versus the previous bucket; 0 for the oldest
    pub delta: f64,
}

/// Partition records into `weeks` disjoint trailing 7-day windows ending
/// at `today`, oldest first. Window boundaries depend only on `today`, so
/// identical inputs and evaluation date always bucket identically.
pub fn bucket_by_week(records: &[DailyRecord], today: NaiveDate, weeks: usize) -> Vec<WeekBucket> {
    let mut buckets = Vec::with_capacity(weeks);

    // Walk newest window first, then reverse so output is oldest first
    for i in 0..weeks {
        let end = today - Duration::days(7 * i as i64);
        let start = end - Duration::days(6);
        let in_window = records
            .iter()
            .filter(|r| r.date >= start && r.date <= end);
        buckets.push(WeekBucket {
            label: format!("第{}週", weeks - i),
            start,
            end,
            totals: aggregate(in_window),
            delta: 0.0,
        });
    }
    buckets.reverse();

    for i in 1..buckets.len() {
        buckets[i].delta = buckets[i].totals.sales - buckets[i - 1].totals.sales;
    }

    buckets
}
