//! Pointer handling for marker hit-testing and dragging.
//!
//! Pointer positions arrive in grid divisions. Only primary-button events on
//! the main view mutate markers; events aimed at the zoomed view are
//! ignored.

use tracing::trace;

use crate::cursor::{Cursor, CursorSet, MarkerIndex};
use crate::events::ScopeEvent;
use crate::geom::Point;
use crate::view::Grid;

/// Which of the two scope views an event or scene belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewKind {
    /// Full-scale view; the only one that accepts marker edits.
    #[default]
    Main,
    /// View magnified to the window between the time markers.
    Zoomed,
}

/// Pointer event phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// A button was pressed.
    Down,
    /// The pointer moved.
    Move,
    /// A button was released.
    Up,
}

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Left button.
    Primary,
    /// Right button.
    Secondary,
    /// Middle button.
    Middle,
}

/// A pointer event in grid divisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Event phase.
    pub kind: PointerKind,
    /// Pointer position in divisions.
    pub position: Point,
    /// Button that was pressed or released. `None` for moves.
    pub button: Option<PointerButton>,
    /// Whether the primary button is held during a move.
    pub primary_held: bool,
    /// View the event was delivered to.
    pub view: ViewKind,
}

impl PointerEvent {
    /// Primary button pressed at `position`.
    pub fn down(view: ViewKind, position: Point) -> Self {
        Self {
            kind: PointerKind::Down,
            position,
            button: Some(PointerButton::Primary),
            primary_held: true,
            view,
        }
    }

    /// Pointer moved to `position`.
    pub fn moved(view: ViewKind, position: Point, primary_held: bool) -> Self {
        Self {
            kind: PointerKind::Move,
            position,
            button: None,
            primary_held,
            view,
        }
    }

    /// Primary button released at `position`.
    pub fn up(view: ViewKind, position: Point) -> Self {
        Self {
            kind: PointerKind::Up,
            position,
            button: Some(PointerButton::Primary),
            primary_held: false,
            view,
        }
    }

    /// Replace the pressed or released button.
    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = Some(button);
        if button != PointerButton::Primary && self.kind == PointerKind::Down {
            self.primary_held = false;
        }
        self
    }

    /// Build an event from a pixel position inside a view of `width` by
    /// `height` pixels.
    pub fn from_screen(
        kind: PointerKind,
        view: ViewKind,
        grid: &Grid,
        pixel: (f64, f64),
        size: (f64, f64),
    ) -> Self {
        let position = grid.from_pixels(pixel.0, pixel.1, size.0, size.1);
        match kind {
            PointerKind::Down => Self::down(view, position),
            PointerKind::Move => Self::moved(view, position, true),
            PointerKind::Up => Self::up(view, position),
        }
    }

    fn is_primary(&self) -> bool {
        self.button == Some(PointerButton::Primary)
    }
}

/// Find the marker of `cursor` within snap range of `position`.
///
/// Only the axes the cursor shape captures are tested. Each axis keeps its
/// own best distance, starting at full scale. A marker is taken on an axis
/// when it lies within 1% of that axis's full scale, boundary included, and
/// is strictly closer than the current best on that axis. X is tested before
/// Y for every marker, and the last match wins.
pub fn hit_test(cursor: &Cursor, grid: &Grid, position: Point) -> Option<MarkerIndex> {
    let shape = cursor.shape();
    let capture_x = shape.captures_x();
    let capture_y = shape.captures_y();
    let mut best_x = grid.time_divs;
    let mut best_y = grid.voltage_divs;
    let mut hit = None;
    for marker in MarkerIndex::ALL {
        let candidate = cursor.position(marker);
        let dx = (candidate.x - position.x).abs();
        if capture_x && dx <= grid.snap_x() && dx < best_x {
            best_x = dx;
            hit = Some(marker);
        }
        let dy = (candidate.y - position.y).abs();
        if capture_y && dy <= grid.snap_y() && dy < best_y {
            best_y = dy;
            hit = Some(marker);
        }
    }
    hit
}

/// Drag state machine for the selected cursor's markers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragController {
    active_marker: Option<MarkerIndex>,
}

impl DragController {
    /// Create an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marker the current drag is anchored to.
    pub fn active_marker(&self) -> Option<MarkerIndex> {
        self.active_marker
    }

    /// Apply a pointer event to the selected cursor of `cursors`.
    ///
    /// Returns one [`ScopeEvent::MarkerMoved`] per marker update, in the
    /// order the updates happened.
    pub fn handle(
        &mut self,
        cursors: &mut CursorSet,
        grid: &Grid,
        event: &PointerEvent,
    ) -> Vec<ScopeEvent> {
        if event.view != ViewKind::Main {
            return Vec::new();
        }
        match event.kind {
            PointerKind::Down if event.is_primary() => self.press(cursors, grid, event.position),
            PointerKind::Move if event.primary_held => self.drag(cursors, event.position),
            PointerKind::Up if event.is_primary() => self.release(cursors, event.position),
            _ => Vec::new(),
        }
    }

    fn press(&mut self, cursors: &mut CursorSet, grid: &Grid, position: Point) -> Vec<ScopeEvent> {
        self.active_marker = hit_test(cursors.selected_cursor(), grid, position);
        match self.active_marker {
            Some(marker) => {
                trace!(?marker, "marker captured");
                vec![move_marker(cursors, marker, position)]
            }
            None => Vec::new(),
        }
    }

    fn drag(&mut self, cursors: &mut CursorSet, position: Point) -> Vec<ScopeEvent> {
        match self.active_marker {
            Some(marker) => vec![move_marker(cursors, marker, position)],
            None => {
                // Dragging started outside every snap area: collapse the
                // markers onto the pointer and continue with the last one.
                let events = MarkerIndex::ALL
                    .iter()
                    .map(|marker| move_marker(cursors, *marker, position))
                    .collect();
                self.active_marker = Some(MarkerIndex::LAST);
                events
            }
        }
    }

    fn release(&mut self, cursors: &mut CursorSet, position: Point) -> Vec<ScopeEvent> {
        let events = self
            .active_marker
            .map(|marker| vec![move_marker(cursors, marker, position)])
            .unwrap_or_default();
        self.active_marker = None;
        events
    }
}

fn move_marker(cursors: &mut CursorSet, marker: MarkerIndex, position: Point) -> ScopeEvent {
    let cursor = cursors.selected();
    cursors.selected_cursor_mut().set_position(marker, position);
    ScopeEvent::MarkerMoved {
        cursor,
        marker,
        position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{CursorId, CursorShape};

    fn marker_position(set: &CursorSet, marker: MarkerIndex) -> Point {
        set.selected_cursor().position(marker)
    }

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::down(ViewKind::Main, Point::new(x, y))
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::up(ViewKind::Main, Point::new(x, y))
    }

    fn drag_to(x: f64, y: f64) -> PointerEvent {
        PointerEvent::moved(ViewKind::Main, Point::new(x, y), true)
    }

    #[test]
    fn press_within_snap_radius_captures_marker() {
        let grid = Grid::default();
        let mut set = CursorSet::new(1);
        let mut drag = DragController::new();

        // Markers at x = -1 and x = 1; snap radius is 0.1 divisions.
        let events = drag.handle(&mut set, &grid, &down(0.95, 2.0));
        assert_eq!(drag.active_marker(), Some(MarkerIndex::Second));
        assert_eq!(events.len(), 1);
        assert_eq!(marker_position(&set, MarkerIndex::Second), Point::new(0.95, 2.0));

        let mut set = CursorSet::new(1);
        let mut drag = DragController::new();
        let events = drag.handle(&mut set, &grid, &down(0.85, 0.0));
        assert!(events.is_empty());
        assert_eq!(drag.active_marker(), None);
        assert_eq!(marker_position(&set, MarkerIndex::Second), Point::new(1.0, 0.0));
    }

    #[test]
    fn snap_radius_includes_its_boundary() {
        // 6.25 divisions give an exact radius of 0.0625.
        let grid = Grid {
            time_divs: 6.25,
            ..Grid::default()
        };
        let cursor = Cursor::new(
            CursorShape::Vertical,
            Point::new(-1.0, 0.0),
            Point::new(1.0, 0.0),
        );
        assert_eq!(grid.snap_x(), 0.0625);
        assert_eq!(
            hit_test(&cursor, &grid, Point::new(1.0625, 0.0)),
            Some(MarkerIndex::Second)
        );
        assert_eq!(hit_test(&cursor, &grid, Point::new(1.125, 0.0)), None);
    }

    #[test]
    fn unanchored_drag_collapses_then_follows_last_marker() {
        let grid = Grid::default();
        let mut set = CursorSet::new(1);
        let mut drag = DragController::new();
        let p1 = Point::new(3.0, 1.0);
        let p2 = Point::new(-2.0, -0.5);

        drag.handle(&mut set, &grid, &down(0.0, 0.0));
        let events = drag.handle(&mut set, &grid, &drag_to(p1.x, p1.y));
        assert_eq!(events.len(), 2);
        assert_eq!(set.markers().positions(), [p1, p1]);
        assert_eq!(drag.active_marker(), Some(MarkerIndex::Second));

        let events = drag.handle(&mut set, &grid, &drag_to(p2.x, p2.y));
        assert_eq!(events.len(), 1);
        assert_eq!(set.markers().positions(), [p1, p2]);
    }

    #[test]
    fn release_moves_anchored_marker_and_clears() {
        let grid = Grid::default();
        let mut set = CursorSet::new(1);
        let mut drag = DragController::new();
        drag.handle(&mut set, &grid, &down(-1.02, 0.0));
        assert_eq!(drag.active_marker(), Some(MarkerIndex::First));
        let events = drag.handle(&mut set, &grid, &up(-4.0, 0.0));
        assert_eq!(
            events,
            vec![ScopeEvent::MarkerMoved {
                cursor: CursorId::Markers,
                marker: MarkerIndex::First,
                position: Point::new(-4.0, 0.0),
            }]
        );
        assert_eq!(drag.active_marker(), None);

        // Releasing without an anchor changes nothing.
        let events = drag.handle(&mut set, &grid, &up(2.0, 0.0));
        assert!(events.is_empty());
    }

    #[test]
    fn zoomed_view_and_other_buttons_are_ignored() {
        let grid = Grid::default();
        let mut set = CursorSet::new(1);
        let before = *set.markers();
        let mut drag = DragController::new();

        let zoomed_down = PointerEvent::down(ViewKind::Zoomed, Point::new(1.0, 0.0));
        assert!(drag.handle(&mut set, &grid, &zoomed_down).is_empty());
        let zoomed_move = PointerEvent::moved(ViewKind::Zoomed, Point::new(2.0, 0.0), true);
        assert!(drag.handle(&mut set, &grid, &zoomed_move).is_empty());
        let secondary = down(1.0, 0.0).with_button(PointerButton::Secondary);
        assert!(drag.handle(&mut set, &grid, &secondary).is_empty());
        let hover = PointerEvent::moved(ViewKind::Main, Point::new(2.0, 0.0), false);
        assert!(drag.handle(&mut set, &grid, &hover).is_empty());
        assert_eq!(*set.markers(), before);
    }

    #[test]
    fn switched_off_cursor_never_captures() {
        let grid = Grid::default();
        let mut set = CursorSet::new(1);
        set.select(CursorId::Voltage(0));
        assert_eq!(hit_test(set.selected_cursor(), &grid, Point::new(-1.0, -1.0)), None);

        // An unanchored drag still moves both markers of the selected cursor.
        let mut drag = DragController::new();
        drag.handle(&mut set, &grid, &down(-1.0, -1.0));
        drag.handle(&mut set, &grid, &drag_to(0.5, 0.5));
        assert_eq!(set.selected_cursor().positions(), [Point::new(0.5, 0.5); 2]);
        assert_eq!(set.markers().position(MarkerIndex::First), Point::new(-1.0, 0.0));
    }

    #[test]
    fn horizontal_cursor_captures_on_y_only() {
        let grid = Grid::default();
        let cursor = Cursor::new(
            CursorShape::Horizontal,
            Point::new(0.0, -1.0),
            Point::new(4.0, 1.0),
        );
        assert_eq!(hit_test(&cursor, &grid, Point::new(4.0, 0.0)), None);
        assert_eq!(
            hit_test(&cursor, &grid, Point::new(-3.0, 1.05)),
            Some(MarkerIndex::Second)
        );
    }

    #[test]
    fn cross_axis_match_lets_last_marker_win() {
        // Marker 0 is close on X and marker 1 is close on Y; the axes keep
        // separate best distances so marker 1 is taken even though marker 0
        // is nearer overall.
        let grid = Grid::default();
        let cursor = Cursor::new(
            CursorShape::Rectangular,
            Point::new(0.0, 3.0),
            Point::new(3.0, 0.05),
        );
        assert_eq!(
            hit_test(&cursor, &grid, Point::new(0.0, 0.0)),
            Some(MarkerIndex::Second)
        );
    }

    #[test]
    fn screen_positions_are_converted_to_divisions() {
        let grid = Grid::default();
        let event = PointerEvent::from_screen(
            PointerKind::Down,
            ViewKind::Main,
            &grid,
            (150.0, 0.0),
            (200.0, 160.0),
        );
        assert_eq!(event.position, Point::new(2.5, 4.0));
        assert_eq!(event.button, Some(PointerButton::Primary));
    }
}
