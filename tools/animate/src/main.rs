/// Animated top-classes chart: tabulates every year in the range, unifies
/// the per-year top classes into one bar set, and renders a GIF that blends
/// smoothly between consecutive years.
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use mapbiomas_core::{
    build_frames, collect_year_tables, load_legend_or_empty, render_gif, unify, PathTemplate,
    RenderConfig, YearEvent,
};

#[derive(Parser, Debug)]
#[command(
    name = "animate",
    about = "Render the evolution of the largest MapBiomas classes as an animated bar chart"
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

    /// How many classes each year contributes to the chart
    #[arg(long, default_value = "5")]
    top_n: usize,

    /// Frames per year transition; 1 disables blending
    #[arg(long, default_value = "10")]
    frames_per_year: usize,

    /// Frame width in pixels
    #[arg(long, default_value = "1280")]
    width: u32,

    /// Frame height in pixels
    #[arg(long, default_value = "720")]
    height: u32,

    /// GIF frame delay in milliseconds
    #[arg(long, default_value = "50")]
    frame_delay_ms: u32,

    /// Output GIF path (parent directories are created)
    #[arg(short, long, default_value = "histogram_animation_smooth_1985_2024.gif")]
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
    if args.top_n == 0 {
        bail!("--top-n must be at least 1");
    }
    if args.frames_per_year == 0 {
        bail!("--frames-per-year must be at least 1");
    }

    let template = PathTemplate::new(&args.rasters)?;

    let (legend, legend_warning) = load_legend_or_empty(&args.legend);
    match &legend_warning {
        None => eprintln!(
            "[animate] Legend: {} classes from {}",
            legend.len(),
            args.legend.display()
        ),
        Some(e) => eprintln!(
            "  [warn] Cannot load legend {} ({}) — continuing with placeholder names",
            args.legend.display(),
            e
        ),
    }

    eprintln!("[animate] Tabulating {}–{}", args.start_year, args.end_year);
    let tables = collect_year_tables(
        &template,
        args.start_year,
        args.end_year,
        &legend,
        |event| match event {
            YearEvent::Loaded(table) => {
                let top: Vec<&str> = table
                    .rows
                    .iter()
                    .take(args.top_n)
                    .map(|row| row.name_pt.as_str())
                    .collect();
                eprintln!(
                    "  {}: {} valid pixels; top classes: {}",
                    table.year,
                    table.total_valid,
                    top.join(", ")
                );
            }
            YearEvent::Skipped(skip) => eprintln!("  [warn] {} — skipping", skip),
        },
    );

    if tables.is_empty() {
        eprintln!("[animate] No data processed — no animation written.");
        return Ok(());
    }

    let unified = unify(&tables, args.top_n);
    let frames = build_frames(&unified, args.frames_per_year);
    eprintln!(
        "[animate] {} years, {} classes in the chart, {} frames",
        unified.years.len(),
        unified.classes.len(),
        frames.len()
    );

    let config = RenderConfig {
        width: args.width,
        height: args.height,
        top_n: args.top_n,
        frame_delay_ms: args.frame_delay_ms,
        ..RenderConfig::default()
    };

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create {}", parent.display()))?;
        }
    }
    render_gif(&args.output, &frames, &config)
        .with_context(|| format!("Cannot render {}", args.output.display()))?;

    eprintln!("[animate] Wrote {}", args.output.display());
    Ok(())
}
