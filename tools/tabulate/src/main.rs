/// Multi-year CSV export: tabulates per-class pixel counts for every year in
/// the range and writes one consolidated `ano,classe,num_px,porc_rel` table,
/// ordered by year ascending and pixel count descending.
///
/// Missing or unreadable rasters skip their year with a notice; the run only
/// counts as failed when configuration itself is broken.
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use mapbiomas_core::{
    collect_year_tables, flatten_sorted, load_legend_or_empty, per_year_summary,
    unique_class_count, write_csv, PathTemplate, YearEvent,
};

#[derive(Parser, Debug)]
#[command(
    name = "tabulate",
    about = "Consolidate per-class pixel counts of yearly MapBiomas rasters into one CSV"
)]
struct Args {
    /// Class legend JSON (code → name + color)
    #[arg(long, default_value = "mapbiomas_colec_10.json")]
    legend: PathBuf,

    /// Raster path template; {} is replaced by the year
    #[arg(long, default_value = "classificacao_{}.tif")]
    rasters: String,

    /// First year of the range (inclusive)
    #[arg(long, default_value = "1985")]
    start_year: i32,

    /// Last year of the range (inclusive)
    #[arg(long, default_value = "2024")]
    end_year: i32,

    /// Output CSV path (parent directories are created)
    #[arg(short, long, default_value = "classes_mapbiomas_1985-2024.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.start_year > args.end_year {
        bail!(
            "start year {} is after end year {}",
            args.start_year,
            args.end_year
        );
    }

    let template = PathTemplate::new(&args.rasters)?;

    let (legend, legend_warning) = load_legend_or_empty(&args.legend);
    match &legend_warning {
        None => eprintln!(
            "[tabulate] Legend: {} classes from {}",
            legend.len(),
            args.legend.display()
        ),
        Some(e) => eprintln!(
            "  [warn] Cannot load legend {} ({}) — continuing with placeholder names",
            args.legend.display(),
            e
        ),
    }

    eprintln!(
        "[tabulate] Tabulating {}–{}",
        args.start_year, args.end_year
    );
    let tables = collect_year_tables(
        &template,
        args.start_year,
        args.end_year,
        &legend,
        |event| match event {
            YearEvent::Loaded(table) => eprintln!(
                "  {}: {} classes, {} valid pixels",
                table.year,
                table.rows.len(),
                table.total_valid
            ),
            YearEvent::Skipped(skip) => eprintln!("  [warn] {} — skipping", skip),
        },
    );

    if tables.is_empty() {
        eprintln!("[tabulate] No data processed — no output written.");
        return Ok(());
    }

    let records = flatten_sorted(&tables);

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create {}", parent.display()))?;
        }
    }
    let file = fs::File::create(&args.output)
        .with_context(|| format!("Cannot create {}", args.output.display()))?;
    write_csv(file, &records)?;

    eprintln!(
        "[tabulate] Wrote {} — {} records",
        args.output.display(),
        records.len()
    );
    eprintln!(
        "[tabulate] Years {}–{} ({} processed), {} unique classes",
        tables[0].year,
        tables[tables.len() - 1].year,
        tables.len(),
        unique_class_count(&tables)
    );

    eprintln!("[tabulate] First records:");
    for record in records.iter().take(10) {
        eprintln!(
            "  {} {} {} {:.4}",
            record.year, record.class_code, record.pixel_count, record.percent
        );
    }

    eprintln!("[tabulate] Per-year summary:");
    for summary in per_year_summary(&tables) {
        eprintln!(
            "  {}: {} classes, {} px, percent sum {:.3}",
            summary.year, summary.class_count, summary.total_px, summary.percent_sum
        );
    }

    eprintln!("[tabulate] Done.");
    Ok(())
}
