//! Coordinate transforms: the zoom window mapping and grid-to-screen.

use crate::cursor::Cursor;
use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::view::{Grid, Range};

/// Zoom windows narrower than this are treated as degenerate.
pub const MIN_ZOOM_SPAN: f64 = 1e-12;

/// Affine mapping between the full-scale main view and the zoomed view.
///
/// The zoom window is derived from the time markers on every construction
/// and is always order-normalized. Main-view positions are fractions of the
/// record (`0..=1`); zoom-view positions are fractions of the window.
///
/// A window narrower than [`MIN_ZOOM_SPAN`] has no defined mapping: every
/// mapping function returns `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomMapper {
    window: Range,
    time_divs: f64,
}

impl ZoomMapper {
    /// Build the mapper for the current time markers.
    pub fn new(markers: &Cursor, grid: &Grid) -> Self {
        let [first, second] = markers.positions();
        Self {
            window: Range::new(first.x, second.x),
            time_divs: grid.time_divs,
        }
    }

    /// The order-normalized zoom window in divisions.
    pub fn window(&self) -> Range {
        self.window
    }

    /// Check whether the window is too narrow to map.
    pub fn is_degenerate(&self) -> bool {
        !self.window.has_span(MIN_ZOOM_SPAN)
    }

    /// Map a main-view position into zoom space.
    pub fn to_zoom_space(&self, main_position: f64) -> Option<f64> {
        if self.is_degenerate() {
            return None;
        }
        let Range { min, max } = self.window;
        Some(((main_position - 0.5) * self.time_divs - min) / (max - min))
    }

    /// Map a zoom-space position back into the main view.
    pub fn to_main_space(&self, zoom_position: f64) -> Option<f64> {
        if self.is_degenerate() {
            return None;
        }
        let Range { min, max } = self.window;
        Some(0.5 + (min + zoom_position * (max - min)) / self.time_divs)
    }

    /// Magnification of the zoomed view.
    pub fn zoom_factor(&self) -> Option<f64> {
        if self.is_degenerate() {
            return None;
        }
        Some(self.time_divs / self.window.span())
    }

    /// Map a horizontal grid coordinate of the main view into the zoomed
    /// view's grid, centering the window and stretching it to full scale.
    pub fn zoom_x(&self, x: f64) -> Option<f64> {
        let factor = self.zoom_factor()?;
        Some((x - self.window.center()) * factor)
    }
}

/// A slider-like control whose value is derived from another view.
///
/// When the derived value falls outside the declared range the control is
/// disabled and pinned to the exceeded bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DependentControl {
    range: Range,
    value: f64,
    enabled: bool,
}

impl DependentControl {
    /// Create an enabled control at the lower bound of `range`.
    pub fn new(range: Range) -> Self {
        Self {
            range,
            value: range.min,
            enabled: true,
        }
    }

    /// Declared range.
    pub fn range(&self) -> Range {
        self.range
    }

    /// Current value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Whether the control is interactive.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Follow a mapped value. `None` (no defined mapping) disables the
    /// control and keeps its last value.
    pub fn follow(&mut self, mapped: Option<f64>) {
        match mapped {
            Some(value) if self.range.contains(value) => {
                self.enabled = true;
                self.value = value;
            }
            Some(value) => {
                self.enabled = false;
                self.value = if value < self.range.min {
                    self.range.min
                } else {
                    self.range.max
                };
            }
            None => {
                self.enabled = false;
            }
        }
    }
}

/// Transform from grid divisions into screen coordinates.
#[derive(Debug, Clone)]
pub(crate) struct Transform {
    screen: ScreenRect,
    x_axis: Range,
    y_axis: Range,
}

impl Transform {
    /// Create a transform for the full grid shown in `screen`.
    pub(crate) fn new(grid: &Grid, screen: ScreenRect) -> Option<Self> {
        if !screen.is_valid() {
            return None;
        }
        let x_axis = grid.x_range();
        let y_axis = grid.y_range();
        if !x_axis.has_span(MIN_ZOOM_SPAN) || !y_axis.has_span(MIN_ZOOM_SPAN) {
            return None;
        }
        Some(Self {
            screen,
            x_axis,
            y_axis,
        })
    }

    /// Map a grid point into screen space.
    pub(crate) fn grid_to_screen(&self, point: Point) -> ScreenPoint {
        let x_norm = (point.x - self.x_axis.min) / self.x_axis.span();
        let y_norm = (point.y - self.y_axis.min) / self.y_axis.span();
        let sx = self.screen.min.x as f64 + x_norm * self.screen.width() as f64;
        let sy = self.screen.max.y as f64 - y_norm * self.screen.height() as f64;
        ScreenPoint::new(sx as f32, sy as f32)
    }

    /// Map a screen point into grid divisions.
    pub(crate) fn screen_to_grid(&self, point: ScreenPoint) -> Point {
        let x_norm = (point.x as f64 - self.screen.min.x as f64) / self.screen.width() as f64;
        let y_norm = (self.screen.max.y as f64 - point.y as f64) / self.screen.height() as f64;
        Point::new(
            self.x_axis.min + x_norm * self.x_axis.span(),
            self.y_axis.min + y_norm * self.y_axis.span(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::CursorShape;

    fn markers(a: f64, b: f64) -> Cursor {
        Cursor::new(CursorShape::Vertical, Point::new(a, 0.0), Point::new(b, 0.0))
    }

    #[test]
    fn zoom_roundtrip() {
        let grid = Grid::default();
        for (a, b) in [(-1.0, 1.0), (2.5, -3.0), (-5.0, 5.0), (0.1, 0.2)] {
            let mapper = ZoomMapper::new(&markers(a, b), &grid);
            for x in [-0.5, 0.0, 0.25, 0.5, 0.9, 1.0, 1.7] {
                let zoom = mapper.to_zoom_space(x).expect("non-degenerate");
                let back = mapper.to_main_space(zoom).expect("non-degenerate");
                assert!((back - x).abs() < 1e-9, "{a} {b} {x}");
            }
        }
    }

    #[test]
    fn zoom_window_is_order_normalized() {
        let grid = Grid::default();
        let forward = ZoomMapper::new(&markers(-2.0, 3.0), &grid);
        let reversed = ZoomMapper::new(&markers(3.0, -2.0), &grid);
        assert_eq!(forward.window(), reversed.window());
        // Window edges map to 0 and 1 in zoom space.
        let left = forward.to_zoom_space(0.5 + -2.0 / 10.0).expect("mapped");
        let right = forward.to_zoom_space(0.5 + 3.0 / 10.0).expect("mapped");
        assert!(left.abs() < 1e-12);
        assert!((right - 1.0).abs() < 1e-12);
        assert_eq!(forward.zoom_factor(), Some(2.0));
    }

    #[test]
    fn degenerate_window_has_no_mapping() {
        let mapper = ZoomMapper::new(&markers(1.5, 1.5), &Grid::default());
        assert!(mapper.is_degenerate());
        assert_eq!(mapper.to_zoom_space(0.5), None);
        assert_eq!(mapper.to_main_space(0.5), None);
        assert_eq!(mapper.zoom_factor(), None);
        assert_eq!(mapper.zoom_x(0.0), None);
    }

    #[test]
    fn zoom_x_stretches_window_to_full_scale() {
        let mapper = ZoomMapper::new(&markers(1.0, 3.0), &Grid::default());
        assert_eq!(mapper.zoom_x(1.0), Some(-5.0));
        assert_eq!(mapper.zoom_x(3.0), Some(5.0));
        assert_eq!(mapper.zoom_x(2.0), Some(0.0));
    }

    #[test]
    fn dependent_control_clamps_and_disables() {
        let mut control = DependentControl::new(Range::new(0.0, 1.0));
        control.follow(Some(0.4));
        assert!(control.is_enabled());
        assert_eq!(control.value(), 0.4);

        control.follow(Some(-0.3));
        assert!(!control.is_enabled());
        assert_eq!(control.value(), 0.0);

        control.follow(Some(1.2));
        assert!(!control.is_enabled());
        assert_eq!(control.value(), 1.0);

        control.follow(Some(1.0));
        assert!(control.is_enabled());

        control.follow(None);
        assert!(!control.is_enabled());
        assert_eq!(control.value(), 1.0);
    }

    #[test]
    fn screen_roundtrip() {
        let screen = ScreenRect::new(
            ScreenPoint::new(10.0, 20.0),
            ScreenPoint::new(210.0, 180.0),
        );
        let transform = Transform::new(&Grid::default(), screen).expect("valid transform");
        let point = Point::new(2.5, -1.0);
        let roundtrip = transform.screen_to_grid(transform.grid_to_screen(point));
        assert!((roundtrip.x - point.x).abs() < 1e-4);
        assert!((roundtrip.y - point.y).abs() < 1e-4);
        let top_left = transform.grid_to_screen(Point::new(-5.0, 4.0));
        assert_eq!(top_left, ScreenPoint::new(10.0, 20.0));
    }

    #[test]
    fn invalid_screen_rejected() {
        let screen = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(0.0, 10.0));
        assert!(Transform::new(&Grid::default(), screen).is_none());
    }
}
