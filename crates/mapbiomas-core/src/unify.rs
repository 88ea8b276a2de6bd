//! Cross-year class unification for the animated chart.
//!
//! The chart animates a fixed set of classes: the union of every year's top
//! `top_n`. Years where a union class fell outside the tabulation still get
//! a row for it, with zero percent, so interpolation always has both
//! endpoints.
use std::collections::{BTreeMap, BTreeSet};

use crate::tabulate::YearTable;

/// One (year, class) cell of the unified grid.
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedRow {
    pub year: i32,
    pub class_code: u32,
    pub percent: f64,
    pub name_pt: String,
    pub color_hex: String,
    /// 1-based position within the year's top `top_n`; `top_n + 1` for
    /// classes outside it, including zero-filled cells.
    pub rank: usize,
}

/// Dense (year × union class) table.
#[derive(Debug, Clone)]
pub struct UnifiedTable {
    pub top_n: usize,
    /// Processed years, ascending.
    pub years: Vec<i32>,
    /// Union of per-year top `top_n` class codes, ascending.
    pub classes: Vec<u32>,
    /// Exactly one row per (year, class), grouped by year ascending with
    /// classes ascending inside each group.
    pub rows: Vec<UnifiedRow>,
}

impl UnifiedTable {
    /// The rows of one year, in ascending class order. `None` for a year
    /// that was never processed.
    pub fn year_rows(&self, year: i32) -> Option<&[UnifiedRow]> {
        let idx = self.years.iter().position(|&y| y == year)?;
        let n = self.classes.len();
        Some(&self.rows[idx * n..(idx + 1) * n])
    }
}

/// Build the unified table from per-year tabulations.
///
/// Metadata (name, color) for a zero-filled cell comes from the first
/// processed year that observed the class. Union members come from the year
/// tables themselves, so such a year always exists.
pub fn unify(tables: &[YearTable], top_n: usize) -> UnifiedTable {
    let mut by_year: BTreeMap<i32, &YearTable> = BTreeMap::new();
    for table in tables {
        by_year.insert(table.year, table);
    }

    let mut classes: BTreeSet<u32> = BTreeSet::new();
    for table in by_year.values() {
        classes.extend(table.rows.iter().take(top_n).map(|r| r.class_code));
    }

    // First-occurrence metadata, scanning years in ascending order.
    let mut metadata: BTreeMap<u32, (String, String)> = BTreeMap::new();
    for table in by_year.values() {
        for row in &table.rows {
            metadata
                .entry(row.class_code)
                .or_insert_with(|| (row.name_pt.clone(), row.color_hex.clone()));
        }
    }

    let mut rows = Vec::with_capacity(by_year.len() * classes.len());
    for (&year, table) in &by_year {
        let mut positions: BTreeMap<u32, usize> = BTreeMap::new();
        for (idx, row) in table.rows.iter().enumerate() {
            positions.insert(row.class_code, idx);
        }

        for &class_code in &classes {
            let row = match positions.get(&class_code) {
                Some(&idx) => {
                    let observed = &table.rows[idx];
                    UnifiedRow {
                        year,
                        class_code,
                        percent: observed.percent,
                        name_pt: observed.name_pt.clone(),
                        color_hex: observed.color_hex.clone(),
                        rank: if idx < top_n { idx + 1 } else { top_n + 1 },
                    }
                }
                None => {
                    let (name_pt, color_hex) = metadata
                        .get(&class_code)
                        .cloned()
                        .expect("union class must appear in at least one year table");
                    UnifiedRow {
                        year,
                        class_code,
                        percent: 0.0,
                        name_pt,
                        color_hex,
                        rank: top_n + 1,
                    }
                }
            };
            rows.push(row);
        }
    }

    UnifiedTable {
        top_n,
        years: by_year.keys().copied().collect(),
        classes: classes.into_iter().collect(),
        rows,
    }
}
