//! Grid coordinate system and order-normalized ranges.

use crate::geom::Point;

/// Default number of horizontal (time) divisions.
pub const DIVS_TIME: f64 = 10.0;
/// Default number of vertical (voltage) divisions.
pub const DIVS_VOLTAGE: f64 = 8.0;
/// Default number of sub-divisions per division.
pub const DIVS_SUB: u32 = 5;

/// Numeric range with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl Range {
    /// Create a new range, swapping bounds if needed.
    pub fn new(mut min: f64, mut max: f64) -> Self {
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        Self { min, max }
    }

    /// Span of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Midpoint of the range.
    pub fn center(&self) -> f64 {
        (self.min + self.max) * 0.5
    }

    /// Check whether both bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Check whether the range has a span of at least `min_span`.
    pub fn has_span(&self, min_span: f64) -> bool {
        self.is_finite() && self.span() >= min_span
    }

    /// Check whether a value lies inside the range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp a value into the range.
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

/// Dimensions of the plotting grid.
///
/// These are fixed constants of the coordinate system: the horizontal axis
/// spans `[-time_divs / 2, time_divs / 2]` and the vertical axis spans
/// `[-voltage_divs / 2, voltage_divs / 2]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    /// Number of horizontal divisions.
    pub time_divs: f64,
    /// Number of vertical divisions.
    pub voltage_divs: f64,
    /// Sub-divisions per division used for dots and ticks.
    pub sub_divs: u32,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            time_divs: DIVS_TIME,
            voltage_divs: DIVS_VOLTAGE,
            sub_divs: DIVS_SUB,
        }
    }
}

impl Grid {
    /// Horizontal extent of the screen.
    pub fn x_range(&self) -> Range {
        Range::new(-self.time_divs / 2.0, self.time_divs / 2.0)
    }

    /// Vertical extent of the screen.
    pub fn y_range(&self) -> Range {
        Range::new(-self.voltage_divs / 2.0, self.voltage_divs / 2.0)
    }

    /// Snap radius on the horizontal axis (1% of full scale).
    pub fn snap_x(&self) -> f64 {
        self.time_divs / 100.0
    }

    /// Snap radius on the vertical axis (1% of full scale).
    pub fn snap_y(&self) -> f64 {
        self.voltage_divs / 100.0
    }

    /// Convert a pixel position inside a view of the given size into grid
    /// divisions. The view center maps to the origin and Y points up.
    pub fn from_pixels(&self, x: f64, y: f64, width: f64, height: f64) -> Point {
        Point::new(
            (x - width / 2.0) * self.time_divs / width,
            (height / 2.0 - y) * self.voltage_divs / height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_normalizes_order() {
        let range = Range::new(3.0, -1.0);
        assert_eq!(range.min, -1.0);
        assert_eq!(range.max, 3.0);
        assert_eq!(range.span(), 4.0);
        assert_eq!(range.center(), 1.0);
    }

    #[test]
    fn pixels_map_to_centered_divisions() {
        let grid = Grid::default();
        let center = grid.from_pixels(50.0, 40.0, 100.0, 80.0);
        assert_eq!(center, Point::new(0.0, 0.0));
        let corner = grid.from_pixels(0.0, 0.0, 100.0, 80.0);
        assert_eq!(corner, Point::new(-5.0, 4.0));
    }
}
