//! Shared library for the MapBiomas raster statistics tools: legend loading,
//! classification raster decoding, per-year tabulation, multi-year CSV
//! consolidation, and the animated top-classes chart.
pub mod aggregate;
pub mod chart;
pub mod collect;
pub mod frames;
pub mod legend;
pub mod raster;
pub mod tabulate;
pub mod unify;

pub use aggregate::{
    flatten_sorted, per_year_summary, unique_class_count, write_csv, AggregateError, FlatRecord,
    YearSummary,
};
pub use chart::{render_frames, render_gif, ChartError, FrameImage, RenderConfig};
pub use collect::{collect_year_tables, load_legend_or_empty, YearEvent, YearSkip};
pub use frames::{build_frames, Frame, FrameBar};
pub use legend::{missing_class_name, Legend, LegendEntry, LegendError, FALLBACK_COLOR};
pub use raster::{read_class_grid, ClassGrid, PathTemplate, RasterError};
pub use tabulate::{tabulate_grid, ClassRow, TabulateError, YearTable, NODATA_CODE};
pub use unify::{unify, UnifiedRow, UnifiedTable};
