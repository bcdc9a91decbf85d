//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed samples: `o`
//! - fitted curve: `-` line

use crate::models::PolynomialRegression;
use crate::report::SampleResidual;

/// Render the fitted curve with the observed samples overlaid.
pub fn render_ascii_plot(
    residuals: &[SampleResidual],
    model: &PolynomialRegression,
    width: usize,
    height: usize,
) -> String {
    let (x_min, x_max) = x_range_from_residuals(residuals).unwrap_or((-1.0, 1.0));
    let curve = sample_curve(model, x_min, x_max, width.max(2));
    render_plot(residuals, &curve, x_min, x_max, width, height)
}

/// Render the curve alone over `[x_min, x_max]`.
pub fn render_curve_plot(
    model: &PolynomialRegression,
    x_min: f64,
    x_max: f64,
    width: usize,
    height: usize,
) -> String {
    let (x_min, x_max) = if x_min.is_finite() && x_max.is_finite() && x_max > x_min {
        (x_min, x_max)
    } else {
        (-1.0, 1.0)
    };
    let curve = sample_curve(model, x_min, x_max, width.max(2));
    render_plot(&[], &curve, x_min, x_max, width, height)
}

fn render_plot(
    residuals: &[SampleResidual],
    curve: &[(f64, f64)],
    x_min: f64,
    x_max: f64,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    // Determine y-range from observed points and curve points.
    let (y_min, y_max) = y_range(residuals, curve).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw curve first (so points can overlay).
    draw_curve(&mut grid, curve, x_min, x_max, y_min, y_max);

    for r in residuals {
        if !(r.x.is_finite() && r.y_obs.is_finite()) {
            continue;
        }
        let x = map_x(r.x, x_min, x_max, width);
        let y = map_y(r.y_obs, y_min, y_max, height);
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: x=[{x_min:.3}, {x_max:.3}] | y=[{y_min:.2}, {y_max:.2}]\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn x_range_from_residuals(residuals: &[SampleResidual]) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for r in residuals {
        min_x = min_x.min(r.x);
        max_x = max_x.max(r.x);
    }
    if min_x.is_finite() && max_x.is_finite() && max_x > min_x {
        Some((min_x, max_x))
    } else {
        None
    }
}

fn sample_curve(model: &PolynomialRegression, x_min: f64, x_max: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    let xs: Vec<f64> = (0..n)
        .map(|i| {
            let u = i as f64 / (n as f64 - 1.0);
            x_min + u * (x_max - x_min)
        })
        .collect();
    let ys = model.predict_many(&xs);
    xs.into_iter().zip(ys).collect()
}

fn y_range(residuals: &[SampleResidual], curve: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    let observed = residuals.iter().map(|r| r.y_obs);
    let fitted = curve.iter().map(|&(_, y)| y);
    for y in observed.chain(fitted).filter(|y| y.is_finite()) {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else if min_y.is_finite() && min_y == max_y {
        // Flat curve: centre it.
        Some((min_y - 0.5, max_y + 0.5))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        if !y.is_finite() {
            prev = None;
            continue;
        }
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, '-');
        } else {
            grid[row][col] = '-';
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PolynomialRecord, RECORD_NAME};

    fn model(powers: Vec<u32>, coefficients: Vec<f64>) -> PolynomialRegression {
        PolynomialRegression::from_record(PolynomialRecord {
            name: RECORD_NAME.to_string(),
            degree: powers.iter().copied().max().unwrap(),
            powers,
            coefficients,
        })
        .unwrap()
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let flat = model(vec![0], vec![100.0]);
        let points = vec![
            SampleResidual { x: 1.0, y_obs: 100.0, y_fit: 100.0, residual: 0.0 },
            SampleResidual { x: 10.0, y_obs: 110.0, y_fit: 100.0, residual: 10.0 },
        ];

        let txt = render_ascii_plot(&points, &flat, 10, 5);
        let expected = concat!(
            "Plot: x=[1.000, 10.000] | y=[99.50, 110.50]\n",
            "         o\n",
            "          \n",
            "          \n",
            "          \n",
            "o---------\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn curve_plot_rises_for_increasing_line() {
        let line = model(vec![1], vec![1.0]);
        let txt = render_curve_plot(&line, 0.0, 1.0, 10, 5);
        let rows: Vec<&str> = txt.lines().collect();
        assert_eq!(rows.len(), 6);
        assert!(rows[0].starts_with("Plot: x=[0.000, 1.000]"));
        // Bottom-left to top-right.
        assert_eq!(rows[5].chars().next(), Some('-'));
        assert_eq!(rows[1].chars().last(), Some('-'));
    }

    #[test]
    fn flat_curve_without_points_still_renders() {
        let flat = model(vec![0], vec![3.0]);
        let txt = render_curve_plot(&flat, -1.0, 1.0, 10, 5);
        assert!(txt.lines().skip(1).any(|row| row == "----------"));
    }
}
