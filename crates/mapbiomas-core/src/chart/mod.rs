//! Animated bar-chart rendering.
//!
//! Frames are painted on plotters' bitmap backend with a fixed-margin pixel
//! layout: y axis on the left with percent gridlines, one colored bar per
//! top class, value labels above tall bars, the year in the title. The same
//! painter feeds both the streaming GIF writer and the in-memory sequence.
mod text;

use std::path::Path;

use plotters::prelude::*;
use thiserror::Error;

use crate::frames::Frame;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("no frames to render")]
    NoFrames,

    #[error("canvas {width}×{height} is too small for the chart layout")]
    CanvasTooSmall { width: u32, height: u32 },

    #[error("chart backend failed: {0}")]
    Backend(String),

    #[error("chart drawing failed: {0}")]
    Draw(String),
}

/// Chart geometry and styling.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Bars drawn per frame.
    pub top_n: usize,
    /// GIF frame delay in milliseconds.
    pub frame_delay_ms: u32,
    /// Title text height in pixels.
    pub title_px: u32,
    /// Label text height in pixels.
    pub label_px: u32,
    /// Bars at or below this percent get no value label.
    pub label_threshold: f64,
    /// Multiplier applied to the largest percent to fix the y-axis top.
    pub y_headroom: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            top_n: 5,
            frame_delay_ms: 50,
            title_px: 21,
            label_px: 14,
            label_threshold: 1.0,
            y_headroom: 1.1,
        }
    }
}

/// One rendered frame as raw RGB24 bytes, row-major.
#[derive(Debug, Clone)]
pub struct FrameImage {
    pub width: u32,
    pub height: u32,
    /// `width * height * 3` bytes.
    pub pixels: Vec<u8>,
}

/// Stream every frame into an animated GIF at the configured frame delay.
pub fn render_gif(path: &Path, frames: &[Frame], config: &RenderConfig) -> Result<(), ChartError> {
    if frames.is_empty() {
        return Err(ChartError::NoFrames);
    }
    let y_max = y_axis_top(frames, config);

    let backend = BitMapBackend::gif(path, (config.width, config.height), config.frame_delay_ms)
        .map_err(|e| ChartError::Backend(e.to_string()))?;
    let root = backend.into_drawing_area();

    for frame in frames {
        draw_frame(&root, frame, config, y_max)?;
        root.present()
            .map_err(|e| ChartError::Backend(e.to_string()))?;
    }
    Ok(())
}

/// Render every frame into memory instead of a file.
pub fn render_frames(
    frames: &[Frame],
    config: &RenderConfig,
) -> Result<Vec<FrameImage>, ChartError> {
    if frames.is_empty() {
        return Err(ChartError::NoFrames);
    }
    let y_max = y_axis_top(frames, config);

    let mut images = Vec::with_capacity(frames.len());
    for frame in frames {
        let mut pixels = vec![0u8; config.width as usize * config.height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut pixels, (config.width, config.height))
                .into_drawing_area();
            draw_frame(&root, frame, config, y_max)?;
            root.present()
                .map_err(|e| ChartError::Backend(e.to_string()))?;
        }
        images.push(FrameImage {
            width: config.width,
            height: config.height,
            pixels,
        });
    }
    Ok(images)
}

/// Fixed y-axis top for the whole animation: the largest percent across all
/// frames times the headroom factor, never below 1.
fn y_axis_top(frames: &[Frame], config: &RenderConfig) -> f64 {
    let max_percent = frames
        .iter()
        .flat_map(|f| f.bars.iter().map(|b| b.percent))
        .fold(0.0f64, f64::max);
    (max_percent * config.y_headroom).max(1.0)
}

/// Gridline spacing: roughly five ticks, snapped to a 1/2/5 decade step.
fn tick_step(y_max: f64) -> f64 {
    let raw = y_max / 5.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Parse `#rrggbb`; anything else renders as the fallback gray.
fn parse_hex_color(hex: &str) -> RGBColor {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() == 6 {
        if let Ok(value) = u32::from_str_radix(digits, 16) {
            return RGBColor((value >> 16) as u8, (value >> 8) as u8, value as u8);
        }
    }
    RGBColor(128, 128, 128)
}

/// Keep the longest prefix of `name` that fits in `max_px` at `scale`.
fn fit_label(name: &str, scale: i32, max_px: i32) -> &str {
    let mut end = 0;
    let mut used = 0;
    for (idx, ch) in name.char_indices() {
        let advance = text::advance(ch, scale);
        if used + advance > max_px {
            break;
        }
        used += advance;
        end = idx + ch.len_utf8();
    }
    &name[..end]
}

fn draw_frame<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    frame: &Frame,
    config: &RenderConfig,
    y_max: f64,
) -> Result<(), ChartError> {
    let draw_err = |e| ChartError::Draw(format!("{}", e));

    let width = config.width as i32;
    let height = config.height as i32;
    let plot_left = 90;
    let plot_right = width - 40;
    let plot_top = 60;
    let plot_bottom = height - 90;
    if plot_right - plot_left < 10 || plot_bottom - plot_top < 10 {
        return Err(ChartError::CanvasTooSmall {
            width: config.width,
            height: config.height,
        });
    }
    let plot_width = plot_right - plot_left;
    let plot_height = plot_bottom - plot_top;

    let title_scale = (config.title_px as i32 / text::GLYPH_HEIGHT as i32).max(1);
    let label_scale = (config.label_px as i32 / text::GLYPH_HEIGHT as i32).max(1);
    let label_height = text::GLYPH_HEIGHT as i32 * label_scale;

    let y_px = |percent: f64| plot_bottom - (percent / y_max * plot_height as f64).round() as i32;

    root.fill(&WHITE).map_err(draw_err)?;

    // Horizontal gridlines with percent labels on the left.
    let step = tick_step(y_max);
    let mut tick = 0.0;
    while tick <= y_max + 1e-9 {
        let y = y_px(tick);
        if tick > 0.0 {
            root.draw(&PathElement::new(
                vec![(plot_left, y), (plot_right, y)],
                BLACK.mix(0.3),
            ))
            .map_err(draw_err)?;
        }
        let label = if step >= 1.0 {
            format!("{:.0}", tick)
        } else {
            format!("{:.1}", tick)
        };
        text::draw_text(
            root,
            &label,
            (
                plot_left - 8 - text::text_width(&label, label_scale),
                y - label_height / 2,
            ),
            label_scale,
            &BLACK,
        )?;
        tick += step;
    }

    // Axes.
    root.draw(&PathElement::new(
        vec![(plot_left, plot_top), (plot_left, plot_bottom)],
        &BLACK,
    ))
    .map_err(draw_err)?;
    root.draw(&PathElement::new(
        vec![(plot_left, plot_bottom), (plot_right, plot_bottom)],
        &BLACK,
    ))
    .map_err(draw_err)?;

    // Bars for the frame's leading classes, tallest first.
    let shown: Vec<_> = frame.bars.iter().take(config.top_n).collect();
    if !shown.is_empty() {
        let slot = plot_width as f64 / shown.len() as f64;
        for (i, bar) in shown.iter().enumerate() {
            let center_x = plot_left + (slot * (i as f64 + 0.5)) as i32;
            let half_bar = (slot * 0.4) as i32;
            let bar_top = y_px(bar.percent);

            if bar_top < plot_bottom {
                let fill = parse_hex_color(&bar.color_hex).mix(0.8).filled();
                root.draw(&Rectangle::new(
                    [
                        (center_x - half_bar, bar_top),
                        (center_x + half_bar, plot_bottom - 1),
                    ],
                    fill,
                ))
                .map_err(draw_err)?;
            }

            if bar.percent > config.label_threshold {
                let value = format!("{:.1}%", bar.percent);
                text::draw_text(
                    root,
                    &value,
                    (
                        center_x - text::text_width(&value, label_scale) / 2,
                        bar_top - label_height - 4,
                    ),
                    label_scale,
                    &BLACK,
                )?;
            }

            let name = fit_label(&bar.name_pt, label_scale, slot as i32 - 10);
            text::draw_text(
                root,
                name,
                (
                    center_x - text::text_width(name, label_scale) / 2,
                    plot_bottom + 10,
                ),
                label_scale,
                &BLACK,
            )?;
        }
    }

    // Axis captions and title.
    let x_caption = "Classes";
    text::draw_text(
        root,
        x_caption,
        (
            plot_left + (plot_width - text::text_width(x_caption, label_scale)) / 2,
            plot_bottom + 10 + label_height + 12,
        ),
        label_scale,
        &BLACK,
    )?;

    let y_caption = "Porcentagem (%)";
    text::draw_text_vertical(
        root,
        y_caption,
        (
            14,
            plot_top + (plot_height + text::text_width(y_caption, label_scale)) / 2,
        ),
        label_scale,
        &BLACK,
    )?;

    let title = format!(
        "Evolução das {} maiores classes - {}",
        config.top_n, frame.label_year
    );
    text::draw_text(
        root,
        &title,
        (
            (width - text::text_width(&title, title_scale)) / 2,
            18,
        ),
        title_scale,
        &BLACK,
    )?;

    Ok(())
}
