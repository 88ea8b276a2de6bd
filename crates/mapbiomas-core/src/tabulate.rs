//! Per-class pixel tabulation for one yearly raster.
use std::collections::BTreeMap;

use thiserror::Error;

use crate::legend::{missing_class_name, Legend, FALLBACK_COLOR};
use crate::raster::ClassGrid;

/// Class code reserved for no-data pixels. Never counted, never reported.
pub const NODATA_CODE: u32 = 0;

#[derive(Debug, Error)]
pub enum TabulateError {
    #[error("raster for {year} has no valid pixels (everything is no-data)")]
    EmptyRaster { year: i32 },
}

/// One tabulated class within a year.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassRow {
    pub class_code: u32,
    pub pixel_count: u64,
    /// Share of the year's valid pixels, in percent.
    pub percent: f64,
    pub name_pt: String,
    pub color_hex: String,
}

/// Tabulation of one year: every observed class except no-data, sorted by
/// pixel count descending (ties toward the smaller class code).
#[derive(Debug, Clone)]
pub struct YearTable {
    pub year: i32,
    /// Valid (non-zero-code) pixel count of the raster.
    pub total_valid: u64,
    pub rows: Vec<ClassRow>,
}

/// Count class codes in `grid`, drop the no-data code, and join the legend.
///
/// Percentages are relative to the valid pixel total, so they sum to 100.
/// Codes the legend does not know get the placeholder name and the fallback
/// gray, per class, at this call site.
pub fn tabulate_grid(
    year: i32,
    grid: &ClassGrid,
    legend: &Legend,
) -> Result<YearTable, TabulateError> {
    let mut counts: BTreeMap<u32, u64> = BTreeMap::new();
    for &code in &grid.data {
        *counts.entry(code).or_insert(0) += 1;
    }
    counts.remove(&NODATA_CODE);

    let total_valid: u64 = counts.values().sum();
    if total_valid == 0 {
        return Err(TabulateError::EmptyRaster { year });
    }

    let mut rows: Vec<ClassRow> = counts
        .into_iter()
        .map(|(class_code, pixel_count)| {
            let (name_pt, color_hex) = match legend.get(class_code) {
                Some(entry) => (entry.name_pt.clone(), entry.color_hex.clone()),
                None => (missing_class_name(class_code), FALLBACK_COLOR.to_string()),
            };
            ClassRow {
                class_code,
                pixel_count,
                percent: 100.0 * pixel_count as f64 / total_valid as f64,
                name_pt,
                color_hex,
            }
        })
        .collect();

    // Rows arrive in ascending code order; the stable sort keeps that order
    // between equal counts.
    rows.sort_by(|a, b| b.pixel_count.cmp(&a.pixel_count));

    Ok(YearTable {
        year,
        total_valid,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn forest_legend() -> Legend {
        Legend::from_json(r##"{ "3": { "PT": "Forest", "HEX_COL": "#006400" } }"##).unwrap()
    }

    #[test]
    fn counts_join_and_sort() {
        let grid = ClassGrid::new(3, 2, vec![0, 0, 3, 3, 3, 4]);
        let table = tabulate_grid(2020, &grid, &forest_legend()).unwrap();

        assert_eq!(table.year, 2020);
        assert_eq!(table.total_valid, 4);
        assert_eq!(table.rows.len(), 2);

        let first = &table.rows[0];
        assert_eq!(first.class_code, 3);
        assert_eq!(first.pixel_count, 3);
        assert_relative_eq!(first.percent, 75.0);
        assert_eq!(first.name_pt, "Forest");
        assert_eq!(first.color_hex, "#006400");

        let second = &table.rows[1];
        assert_eq!(second.class_code, 4);
        assert_eq!(second.pixel_count, 1);
        assert_relative_eq!(second.percent, 25.0);
        assert_eq!(second.name_pt, "Classe 4 (não encontrada)");
        assert_eq!(second.color_hex, FALLBACK_COLOR);
    }

    #[test]
    fn all_nodata_is_an_error() {
        let grid = ClassGrid::new(2, 2, vec![0, 0, 0, 0]);
        let err = tabulate_grid(1999, &grid, &Legend::empty()).unwrap_err();
        assert!(matches!(err, TabulateError::EmptyRaster { year: 1999 }));
    }

    #[test]
    fn nodata_never_appears_in_rows() {
        let grid = ClassGrid::new(4, 1, vec![0, 5, 0, 5]);
        let table = tabulate_grid(2001, &grid, &Legend::empty()).unwrap();
        assert!(table.rows.iter().all(|r| r.class_code != NODATA_CODE));
        assert_eq!(table.total_valid, 2);
    }

    #[test]
    fn percents_sum_to_one_hundred() {
        let grid = ClassGrid::new(7, 1, vec![3, 3, 3, 4, 4, 9, 12]);
        let table = tabulate_grid(2010, &grid, &Legend::empty()).unwrap();
        let sum: f64 = table.rows.iter().map(|r| r.percent).sum();
        assert_relative_eq!(sum, 100.0, max_relative = 1e-6);
    }

    #[test]
    fn equal_counts_tie_toward_smaller_code() {
        let grid = ClassGrid::new(4, 1, vec![9, 4, 9, 4]);
        let table = tabulate_grid(2015, &grid, &Legend::empty()).unwrap();
        let codes: Vec<u32> = table.rows.iter().map(|r| r.class_code).collect();
        assert_eq!(codes, vec![4, 9]);
    }

    #[test]
    fn empty_legend_uses_placeholders_everywhere() {
        let grid = ClassGrid::new(2, 1, vec![15, 15]);
        let table = tabulate_grid(1990, &grid, &Legend::empty()).unwrap();
        assert_eq!(table.rows[0].name_pt, "Classe 15 (não encontrada)");
        assert_eq!(table.rows[0].color_hex, FALLBACK_COLOR);
    }
}
