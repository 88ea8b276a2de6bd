//! Multi-year consolidation and CSV export.
use std::collections::BTreeSet;
use std::io::Write;

use serde::Serialize;
use thiserror::Error;

use crate::tabulate::YearTable;

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("no data processed: no year produced a tabulation")]
    NoData,

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// One record of the consolidated CSV. Field renames fix the column header
/// to `ano,classe,num_px,porc_rel`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatRecord {
    #[serde(rename = "ano")]
    pub year: i32,
    #[serde(rename = "classe")]
    pub class_code: u32,
    #[serde(rename = "num_px")]
    pub pixel_count: u64,
    #[serde(rename = "porc_rel")]
    pub percent: f64,
}

/// Flatten per-year tables into records ordered by year ascending and, within
/// a year, pixel count descending.
pub fn flatten_sorted(tables: &[YearTable]) -> Vec<FlatRecord> {
    let mut records: Vec<FlatRecord> = tables
        .iter()
        .flat_map(|table| {
            table.rows.iter().map(|row| FlatRecord {
                year: table.year,
                class_code: row.class_code,
                pixel_count: row.pixel_count,
                percent: row.percent,
            })
        })
        .collect();
    records.sort_by(|a, b| {
        a.year
            .cmp(&b.year)
            .then(b.pixel_count.cmp(&a.pixel_count))
    });
    records
}

/// Serialize records as CSV with a header row. An empty record set is
/// `AggregateError::NoData`; nothing is written in that case.
pub fn write_csv<W: Write>(writer: W, records: &[FlatRecord]) -> Result<(), AggregateError> {
    if records.is_empty() {
        return Err(AggregateError::NoData);
    }
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Per-year roll-up for the console summary.
#[derive(Debug, Clone, PartialEq)]
pub struct YearSummary {
    pub year: i32,
    pub class_count: usize,
    pub total_px: u64,
    /// Sum of the year's percentages. Stays within float noise of 100.
    pub percent_sum: f64,
}

/// Summaries in ascending year order.
pub fn per_year_summary(tables: &[YearTable]) -> Vec<YearSummary> {
    let mut summaries: Vec<YearSummary> = tables
        .iter()
        .map(|table| YearSummary {
            year: table.year,
            class_count: table.rows.len(),
            total_px: table.rows.iter().map(|r| r.pixel_count).sum(),
            percent_sum: table.rows.iter().map(|r| r.percent).sum(),
        })
        .collect();
    summaries.sort_by_key(|s| s.year);
    summaries
}

/// Distinct class codes across all years.
pub fn unique_class_count(tables: &[YearTable]) -> usize {
    tables
        .iter()
        .flat_map(|table| table.rows.iter().map(|row| row.class_code))
        .collect::<BTreeSet<u32>>()
        .len()
}
