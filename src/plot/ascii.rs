//! ASCII dial diagram for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! The dial is seen from the indicator side: 0° at the top, angles increasing
//! clockwise. Columns are drawn twice as dense as rows so the circle looks
//! round in a typical terminal font.
//!
//! Plot elements:
//! - rim: `.`
//! - centre: `+`
//! - per-station difference vectors: station index `0`..`7`
//! - resultant: `*` line ending in `R`

use crate::domain::{AlignmentInput, AlignmentResult, Station};

/// Smallest grid that still separates all eight spokes.
pub const MIN_DIAL_SIZE: usize = 9;

/// Render the dial for one calculation. `size` is the grid height in rows.
pub fn render_dial(input: &AlignmentInput, result: &AlignmentResult, size: usize) -> String {
    let dial = Dial::new(size);
    let diffs = input.differences();

    let mut scale = diffs.iter().fold(result.resultant_r, |acc, d| acc.max(d.abs()));
    if !(scale.is_finite() && scale > 0.0) {
        scale = 1.0;
    }

    let mut grid = vec![vec![' '; dial.width]; dial.height];

    for deg in 0..360 {
        let (row, col) = dial.cell(1.0, deg as f64);
        grid[row][col] = '.';
    }

    // A resultant shorter than one cell (e.g. cancellation residue) has no
    // visible direction.
    let tip = dial.cell(result.resultant_r / scale, result.angle);
    let has_resultant = result.resultant_r.is_finite() && tip != dial.centre();
    if has_resultant {
        draw_line(&mut grid, dial.centre(), tip, '*');
    }

    for station in Station::ALL {
        let d = diffs[station.index()];
        if d == 0.0 || !d.is_finite() {
            continue;
        }
        let bearing = if d > 0.0 {
            station.angle_degrees()
        } else {
            station.angle_degrees() + 180.0
        };
        let (row, col) = dial.cell(d.abs() / scale, bearing);
        grid[row][col] = char::from_digit(station.index() as u32, 10).unwrap_or('?');
    }

    let (cr, cc) = dial.centre();
    grid[cr][cc] = '+';
    if has_resultant {
        grid[tip.0][tip.1] = 'R';
    }

    let formatted = result.formatted();
    let mut out = String::new();
    out.push_str(&format!(
        "Dial: 0° top, clockwise | rim = {scale:.3} | R = {} at {}°\n",
        formatted.resultant_r, formatted.angle
    ));
    for row in grid {
        let line: String = row.into_iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.push_str("0-7: ugb-pgb per station (0=0°, 1=45°, ... 7=315°) | R: resultant\n");
    out
}

/// Grid geometry: odd height so the centre falls on a cell.
#[derive(Debug, Clone, Copy)]
struct Dial {
    height: usize,
    width: usize,
    radius: usize,
}

impl Dial {
    fn new(size: usize) -> Self {
        let height = size.max(MIN_DIAL_SIZE) | 1;
        let radius = height / 2;
        Self {
            height,
            width: 4 * radius + 1,
            radius,
        }
    }

    fn centre(&self) -> (usize, usize) {
        (self.radius, 2 * self.radius)
    }

    /// Cell for a point at fraction `r` of the rim along `bearing` degrees.
    fn cell(&self, r: f64, bearing: f64) -> (usize, usize) {
        let r = if r.is_finite() { r.clamp(0.0, 1.0) } else { 0.0 };
        let theta = bearing.to_radians();
        let radius = self.radius as f64;
        let dy = (r * radius * theta.cos()).round();
        let dx = (2.0 * r * radius * theta.sin()).round();
        let row = (radius - dy).clamp(0.0, (self.height - 1) as f64) as usize;
        let col = (2.0 * radius + dx).clamp(0.0, (self.width - 1) as f64) as usize;
        (row, col)
    }
}

/// Integer line drawing (Bresenham-ish). Only blank or rim cells are painted.
fn draw_line(grid: &mut [Vec<char>], from: (usize, usize), to: (usize, usize), ch: char) {
    let (mut y0, mut x0) = (from.0 as isize, from.1 as isize);
    let (y1, x1) = (to.0 as isize, to.1 as isize);

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0 && (y0 as usize) < grid.len() && x0 >= 0 && (x0 as usize) < grid[0].len() {
            let cell = &mut grid[y0 as usize][x0 as usize];
            if *cell == ' ' || *cell == '.' {
                *cell = ch;
            }
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
    use crate::domain::Readings;
    use crate::solver::compute;

    fn input_with_diff(diff: [f64; 8]) -> AlignmentInput {
        AlignmentInput::new(675.0, 1464.0, Readings::ZERO, Readings::new(diff))
    }

    fn char_at(text: &str, row: usize, col: usize) -> Option<char> {
        // Line 0 is the header.
        text.lines().nth(row + 1).and_then(|l| l.chars().nth(col))
    }

    #[test]
    fn resultant_at_zero_degrees_points_up() {
        let input = input_with_diff([8.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let result = compute(&input).unwrap();
        let text = render_dial(&input, &result, 21);

        assert!(text.starts_with("Dial: 0° top, clockwise | rim = 8.000 | R = 8.000 at 0.00°\n"));
        assert_eq!(char_at(&text, 0, 20), Some('R'));
        assert_eq!(char_at(&text, 5, 20), Some('*'));
        assert_eq!(char_at(&text, 10, 20), Some('+'));
        // header + 21 rows + legend
        assert_eq!(text.lines().count(), 23);
    }

    #[test]
    fn resultant_at_ninety_degrees_points_right() {
        let input = input_with_diff([0.0, 0.0, 4.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let result = compute(&input).unwrap();
        let text = render_dial(&input, &result, 21);
        assert_eq!(char_at(&text, 10, 40), Some('R'));
    }

    #[test]
    fn negative_difference_plots_on_the_opposite_side() {
        // -2 at 0° and +4 at 90°: station 0 lands below the centre.
        let input = input_with_diff([-2.0, 0.0, 4.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let result = compute(&input).unwrap();
        let text = render_dial(&input, &result, 21);
        // r = 2 / |(−2, 4)| of the rim, straight down.
        let scale = result.resultant_r;
        let dy = (2.0 / scale * 10.0_f64).round() as usize;
        assert_eq!(char_at(&text, 10 + dy, 20), Some('0'));
    }

    #[test]
    fn zero_result_has_no_resultant_marker() {
        let input = input_with_diff([0.0; 8]);
        let result = compute(&input).unwrap();
        let text = render_dial(&input, &result, 9);
        assert!(!text.lines().skip(1).take(9).any(|l| l.contains('R')));
        assert_eq!(char_at(&text, 4, 8), Some('+'));
    }

    #[test]
    fn cancelled_readings_show_no_resultant() {
        // Opposite stations cancel up to floating-point residue.
        let input = input_with_diff([10.0, 0.0, -10.0, 0.0, 10.0, 0.0, -10.0, 0.0]);
        let result = compute(&input).unwrap();
        assert!(result.resultant_r > 0.0 && result.resultant_r < 1e-12);

        let text = render_dial(&input, &result, 21);
        assert!(!text.lines().skip(1).take(21).any(|l| l.contains('R') || l.contains('*')));
        assert_eq!(char_at(&text, 10, 20), Some('+'));
    }

    #[test]
    fn small_and_even_sizes_are_normalized() {
        let input = input_with_diff([1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let result = compute(&input).unwrap();
        assert_eq!(render_dial(&input, &result, 3).lines().count(), 9 + 2);
        assert_eq!(render_dial(&input, &result, 20).lines().count(), 21 + 2);
    }

    #[test]
    fn rendering_is_deterministic() {
        let input = input_with_diff([1.0, -2.0, 0.5, 3.0, 0.0, -1.0, 2.0, 0.25]);
        let result = compute(&input).unwrap();
        assert_eq!(render_dial(&input, &result, 15), render_dial(&input, &result, 15));
    }
}
