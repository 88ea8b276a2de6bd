//! Shared driver for the command-line tools: the legend fallback policy and
//! the year-range walk with per-year skip semantics.
//!
//! Both tools process the same closed year range and skip years whose raster
//! is missing, unreadable, or empty without aborting the run. The walk itself
//! prints nothing; every outcome is handed to the caller's observer, which
//! decides what to report.
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::legend::{Legend, LegendError};
use crate::raster::{read_class_grid, PathTemplate, RasterError};
use crate::tabulate::{tabulate_grid, TabulateError, YearTable};

/// A year that contributed no table, and why. Skips are notices, never
/// run failures.
#[derive(Debug, Error)]
pub enum YearSkip {
    #[error("missing raster for {year}: {}", .path.display())]
    Missing { year: i32, path: PathBuf },

    #[error("cannot read {} ({error})", .path.display())]
    Unreadable {
        year: i32,
        path: PathBuf,
        #[source]
        error: RasterError,
    },

    #[error("{error}")]
    Empty {
        year: i32,
        #[source]
        error: TabulateError,
    },
}

impl YearSkip {
    /// The year the skip applies to.
    pub fn year(&self) -> i32 {
        match self {
            YearSkip::Missing { year, .. }
            | YearSkip::Unreadable { year, .. }
            | YearSkip::Empty { year, .. } => *year,
        }
    }
}

/// One per-year outcome, reported to the observer in year order.
#[derive(Debug)]
pub enum YearEvent<'a> {
    /// The year tabulated; its table joins the returned set.
    Loaded(&'a YearTable),
    /// The year contributed nothing; the walk moves on.
    Skipped(YearSkip),
}

/// Load the legend, falling back to the empty legend when the file cannot be
/// used. The error comes back alongside so the caller can warn about it;
/// every lookup against the empty legend resolves to the placeholders.
pub fn load_legend_or_empty(path: &Path) -> (Legend, Option<LegendError>) {
    match Legend::from_path(path) {
        Ok(legend) => (legend, None),
        Err(error) => (Legend::empty(), Some(error)),
    }
}

/// Tabulate every year in the closed range, skipping years whose raster is
/// missing, unreadable, or all no-data. Skipped years simply do not appear
/// in the result, so nothing downstream sees them.
pub fn collect_year_tables(
    template: &PathTemplate,
    start_year: i32,
    end_year: i32,
    legend: &Legend,
    mut observer: impl FnMut(YearEvent),
) -> Vec<YearTable> {
    let mut tables = Vec::new();
    for year in start_year..=end_year {
        let path = template.path_for(year);
        if !path.exists() {
            observer(YearEvent::Skipped(YearSkip::Missing { year, path }));
            continue;
        }

        let grid = match read_class_grid(&path) {
            Ok(grid) => grid,
            Err(error) => {
                observer(YearEvent::Skipped(YearSkip::Unreadable { year, path, error }));
                continue;
            }
        };
        match tabulate_grid(year, &grid, legend) {
            Ok(table) => {
                observer(YearEvent::Loaded(&table));
                tables.push(table);
            }
            Err(error) => {
                observer(YearEvent::Skipped(YearSkip::Empty { year, error }));
            }
        }
    }
    tables
}
