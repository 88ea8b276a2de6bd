//! Interpolated frame sequence for the animation.
//!
//! Every processed year contributes one exact frame; between consecutive
//! years `frames_per_year - 1` transition frames blend the percentages
//! linearly. Bar heights move, bar identities do not.
use crate::unify::{UnifiedRow, UnifiedTable};

/// One bar of a frame, carrying its display metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBar {
    pub class_code: u32,
    pub percent: f64,
    pub name_pt: String,
    pub color_hex: String,
}

/// One animation frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Fractional year position, e.g. 1985.3.
    pub time: f64,
    /// Year shown in the title: the floor of `time`.
    pub label_year: i32,
    /// Every union class, sorted by percent descending. The renderer draws
    /// the leading `top_n`.
    pub bars: Vec<FrameBar>,
}

fn lerp(a: f64, b: f64, alpha: f64) -> f64 {
    a * (1.0 - alpha) + b * alpha
}

fn make_frame(time: f64, prev: &[UnifiedRow], next: &[UnifiedRow], alpha: f64) -> Frame {
    let mut bars: Vec<FrameBar> = prev
        .iter()
        .zip(next)
        .map(|(a, b)| FrameBar {
            class_code: a.class_code,
            percent: lerp(a.percent, b.percent, alpha),
            name_pt: a.name_pt.clone(),
            color_hex: a.color_hex.clone(),
        })
        .collect();
    bars.sort_by(|x, y| y.percent.total_cmp(&x.percent));
    Frame {
        time,
        label_year: time.floor() as i32,
        bars,
    }
}

/// Expand the unified table into the frame sequence.
///
/// For `n` processed years the result holds `(n - 1) * frames_per_year + 1`
/// frames: each consecutive year pair contributes the first year's exact
/// frame plus `frames_per_year - 1` blends, and the final year closes the
/// sequence. Interpolation runs between consecutive processed years, so a
/// skipped year shortens the sequence instead of fabricating data.
pub fn build_frames(table: &UnifiedTable, frames_per_year: usize) -> Vec<Frame> {
    let years = &table.years;
    if years.is_empty() {
        return Vec::new();
    }

    let year_rows = |year: i32| {
        table
            .year_rows(year)
            .expect("years listed by the table must have rows")
    };

    if years.len() == 1 {
        let rows = year_rows(years[0]);
        return vec![make_frame(years[0] as f64, rows, rows, 0.0)];
    }

    let mut frames = Vec::with_capacity((years.len() - 1) * frames_per_year + 1);
    for pair in years.windows(2) {
        let (ya, yb) = (pair[0], pair[1]);
        let rows_a = year_rows(ya);
        let rows_b = year_rows(yb);

        frames.push(make_frame(ya as f64, rows_a, rows_b, 0.0));
        for step in 1..frames_per_year {
            let alpha = step as f64 / frames_per_year as f64;
            let time = ya as f64 + alpha * (yb - ya) as f64;
            frames.push(make_frame(time, rows_a, rows_b, alpha));
        }
    }

    let last = years[years.len() - 1];
    let rows_last = year_rows(last);
    frames.push(make_frame(last as f64, rows_last, rows_last, 0.0));

    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legend::Legend;
    use crate::raster::ClassGrid;
    use crate::tabulate::tabulate_grid;
    use crate::unify::unify;
    use approx::assert_relative_eq;

    fn unified(yearly_codes: Vec<(i32, Vec<u32>)>, top_n: usize) -> UnifiedTable {
        let tables: Vec<_> = yearly_codes
            .into_iter()
            .map(|(year, codes)| {
                let grid = ClassGrid::new(codes.len(), 1, codes);
                tabulate_grid(year, &grid, &Legend::empty()).unwrap()
            })
            .collect();
        unify(&tables, top_n)
    }

    fn percent_of(frame: &Frame, code: u32) -> f64 {
        frame
            .bars
            .iter()
            .find(|b| b.class_code == code)
            .unwrap()
            .percent
    }

    #[test]
    fn frame_count_formula() {
        let table = unified(
            vec![(1985, vec![3]), (1986, vec![3]), (1987, vec![3])],
            5,
        );
        let frames = build_frames(&table, 10);
        assert_eq!(frames.len(), (3 - 1) * 10 + 1);
    }

    #[test]
    fn exact_frames_carry_exact_percents() {
        // 1985: 3 → 75%, 4 → 25%. 1986: 3 → 25%, 4 → 75%.
        let table = unified(
            vec![(1985, vec![3, 3, 3, 4]), (1986, vec![3, 4, 4, 4])],
            5,
        );
        let frames = build_frames(&table, 4);

        assert_relative_eq!(frames[0].time, 1985.0);
        assert_relative_eq!(percent_of(&frames[0], 3), 75.0);
        assert_relative_eq!(percent_of(&frames[0], 4), 25.0);

        let last = frames.last().unwrap();
        assert_relative_eq!(last.time, 1986.0);
        assert_relative_eq!(percent_of(last, 3), 25.0);
        assert_relative_eq!(percent_of(last, 4), 75.0);
    }

    #[test]
    fn midpoint_frame_is_the_mean_of_endpoints() {
        let table = unified(
            vec![(1985, vec![3, 3, 3, 4]), (1986, vec![3, 4, 4, 4])],
            5,
        );
        let frames = build_frames(&table, 2);
        // frames: 1985.0, 1985.5, 1986.0
        assert_eq!(frames.len(), 3);
        assert_relative_eq!(frames[1].time, 1985.5);
        assert_relative_eq!(percent_of(&frames[1], 3), 50.0);
        assert_relative_eq!(percent_of(&frames[1], 4), 50.0);
    }

    #[test]
    fn label_year_floors_fractional_time() {
        let table = unified(vec![(1985, vec![3]), (1986, vec![3])], 5);
        let frames = build_frames(&table, 10);
        assert_eq!(frames[0].label_year, 1985);
        assert_eq!(frames[3].label_year, 1985);
        assert_eq!(frames[9].label_year, 1985);
        assert_eq!(frames.last().unwrap().label_year, 1986);
    }

    #[test]
    fn bars_sorted_by_percent_descending() {
        let table = unified(vec![(1985, vec![3, 4, 4, 4, 9, 9])], 5);
        let frames = build_frames(&table, 10);
        let bars = &frames[0].bars;
        assert!(bars.windows(2).all(|w| w[0].percent >= w[1].percent));
        assert_eq!(bars[0].class_code, 4);
    }

    #[test]
    fn single_year_yields_one_frame() {
        let table = unified(vec![(1985, vec![3, 4])], 5);
        let frames = build_frames(&table, 10);
        assert_eq!(frames.len(), 1);
        assert_relative_eq!(frames[0].time, 1985.0);
    }

    #[test]
    fn no_years_yields_no_frames() {
        let table = unified(vec![], 5);
        assert!(build_frames(&table, 10).is_empty());
    }

    #[test]
    fn skipped_year_interpolates_between_processed_neighbours() {
        // 1987 missing: the pair (1986, 1988) spans two years of time.
        let table = unified(
            vec![(1986, vec![3]), (1988, vec![3])],
            5,
        );
        let frames = build_frames(&table, 4);
        assert_eq!(frames.len(), 5);
        assert_relative_eq!(frames[1].time, 1986.5);
        assert_relative_eq!(frames[2].time, 1987.0);
        assert_eq!(frames[2].label_year, 1987);
    }
}
