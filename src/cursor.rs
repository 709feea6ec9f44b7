//! Measurement cursors and the cursor set.
//!
//! A cursor is a shape plus two marker positions in grid divisions. The
//! scope owns exactly one [`CursorSet`]: the time-marker cursor first, then
//! one cursor per voltage channel, then one per spectrum channel. Other
//! parts of the crate address cursors by [`CursorId`] and never keep copies.

use crate::geom::Point;

/// Shape of a measurement cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorShape {
    /// Cursor is switched off.
    #[default]
    None,
    /// Two horizontal lines at the markers' Y positions.
    Horizontal,
    /// Two vertical lines at the markers' X positions.
    Vertical,
    /// Rectangle spanned by the two markers.
    Rectangular,
}

impl CursorShape {
    /// Whether markers of this shape can be grabbed on the X axis.
    pub fn captures_x(self) -> bool {
        matches!(self, Self::Vertical | Self::Rectangular)
    }

    /// Whether markers of this shape can be grabbed on the Y axis.
    pub fn captures_y(self) -> bool {
        matches!(self, Self::Horizontal | Self::Rectangular)
    }

    /// Shape after pressing the shape button: off turns into a rectangle,
    /// anything else turns off.
    pub fn toggled(self) -> Self {
        match self {
            Self::None => Self::Rectangular,
            _ => Self::None,
        }
    }

    /// Short symbol shown on the shape button.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::None => "OFF",
            Self::Horizontal => "=",
            Self::Vertical => "||",
            Self::Rectangular => "#",
        }
    }
}

/// One of the two markers of a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerIndex {
    /// Marker 0.
    First,
    /// Marker 1.
    Second,
}

impl MarkerIndex {
    /// Both markers in array order.
    pub const ALL: [Self; 2] = [Self::First, Self::Second];

    /// The last marker in array order.
    pub const LAST: Self = Self::Second;

    /// Array index of the marker.
    pub fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }
}

/// A measurement cursor: shape plus two marker positions.
///
/// There is no ordering constraint between the markers; either may be the
/// left or top one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    shape: CursorShape,
    positions: [Point; 2],
}

impl Cursor {
    /// Create a cursor with the given shape and marker positions.
    pub fn new(shape: CursorShape, first: Point, second: Point) -> Self {
        Self {
            shape,
            positions: [first, second],
        }
    }

    /// Access the cursor shape.
    pub fn shape(&self) -> CursorShape {
        self.shape
    }

    /// Replace the cursor shape.
    pub fn set_shape(&mut self, shape: CursorShape) {
        self.shape = shape;
    }

    /// Position of one marker.
    pub fn position(&self, marker: MarkerIndex) -> Point {
        self.positions[marker.index()]
    }

    /// Move one marker.
    pub fn set_position(&mut self, marker: MarkerIndex, position: Point) {
        self.positions[marker.index()] = position;
    }

    /// Both marker positions in index order.
    pub fn positions(&self) -> [Point; 2] {
        self.positions
    }
}

/// Stable identifier of a cursor inside a [`CursorSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorId {
    /// The time-marker pair bounding the zoom window.
    Markers,
    /// The cursor of a voltage channel.
    Voltage(usize),
    /// The cursor of a spectrum channel.
    Spectrum(usize),
}

/// Emitted when the selected cursor changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChange {
    /// Previously selected cursor.
    pub from: CursorId,
    /// Newly selected cursor.
    pub to: CursorId,
}

/// Radio-button style selection: exactly one cursor is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    current: CursorId,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            current: CursorId::Markers,
        }
    }
}

impl Selection {
    /// The selected cursor.
    pub fn current(&self) -> CursorId {
        self.current
    }

    /// Select `id`. Returns the transition, or `None` when it was already
    /// selected.
    pub fn select(&mut self, id: CursorId) -> Option<SelectionChange> {
        if self.current == id {
            return None;
        }
        let change = SelectionChange {
            from: self.current,
            to: id,
        };
        self.current = id;
        Some(change)
    }
}

/// Ordered collection of all cursors of a scope.
#[derive(Debug, Clone)]
pub struct CursorSet {
    cursors: Vec<Cursor>,
    channels: usize,
    selection: Selection,
}

impl CursorSet {
    /// Create the cursor set for a scope with `channels` channels.
    ///
    /// The time markers start as a vertical pair one division left and right
    /// of the center; channel cursors start switched off.
    pub fn new(channels: usize) -> Self {
        let mut cursors = Vec::with_capacity(1 + channels * 2);
        cursors.push(Cursor::new(
            CursorShape::Vertical,
            Point::new(-1.0, 0.0),
            Point::new(1.0, 0.0),
        ));
        for _ in 0..channels * 2 {
            cursors.push(Cursor::new(
                CursorShape::None,
                Point::new(-1.0, -1.0),
                Point::new(1.0, 1.0),
            ));
        }
        Self {
            cursors,
            channels,
            selection: Selection::default(),
        }
    }

    /// Number of channels the set was built for.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Total number of cursors.
    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    /// A set always contains the time-marker cursor.
    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    /// Flat index of a cursor id, if it exists in this set.
    pub fn index_of(&self, id: CursorId) -> Option<usize> {
        match id {
            CursorId::Markers => Some(0),
            CursorId::Voltage(channel) if channel < self.channels => Some(1 + channel),
            CursorId::Spectrum(channel) if channel < self.channels => {
                Some(1 + self.channels + channel)
            }
            _ => None,
        }
    }

    /// Cursor id at a flat index.
    pub fn id_at(&self, index: usize) -> Option<CursorId> {
        match index {
            0 => Some(CursorId::Markers),
            i if i <= self.channels => Some(CursorId::Voltage(i - 1)),
            i if i < self.cursors.len() => Some(CursorId::Spectrum(i - 1 - self.channels)),
            _ => None,
        }
    }

    /// Access a cursor.
    pub fn get(&self, id: CursorId) -> Option<&Cursor> {
        self.index_of(id).and_then(|index| self.cursors.get(index))
    }

    /// Access a cursor mutably.
    pub fn get_mut(&mut self, id: CursorId) -> Option<&mut Cursor> {
        let index = self.index_of(id)?;
        self.cursors.get_mut(index)
    }

    /// Access a cursor by flat index.
    pub fn by_index(&self, index: usize) -> Option<&Cursor> {
        self.cursors.get(index)
    }

    /// Access a cursor by flat index mutably.
    pub fn by_index_mut(&mut self, index: usize) -> Option<&mut Cursor> {
        self.cursors.get_mut(index)
    }

    /// The time-marker cursor.
    pub fn markers(&self) -> &Cursor {
        &self.cursors[0]
    }

    /// The time-marker cursor, mutably.
    pub fn markers_mut(&mut self) -> &mut Cursor {
        &mut self.cursors[0]
    }

    /// Iterate over all cursors with their ids, in set order.
    pub fn iter(&self) -> impl Iterator<Item = (CursorId, &Cursor)> + '_ {
        self.cursors
            .iter()
            .enumerate()
            .filter_map(|(index, cursor)| self.id_at(index).map(|id| (id, cursor)))
    }

    /// The selected cursor id.
    pub fn selected(&self) -> CursorId {
        self.selection.current()
    }

    /// Flat index of the selected cursor.
    pub fn selected_index(&self) -> usize {
        self.index_of(self.selected()).unwrap_or(0)
    }

    /// The selected cursor.
    pub fn selected_cursor(&self) -> &Cursor {
        &self.cursors[self.selected_index()]
    }

    /// The selected cursor, mutably.
    pub fn selected_cursor_mut(&mut self) -> &mut Cursor {
        let index = self.selected_index();
        &mut self.cursors[index]
    }

    /// Select a cursor. Marker positions are left untouched.
    ///
    /// Returns `None` for unknown ids and for re-selecting the current one.
    pub fn select(&mut self, id: CursorId) -> Option<SelectionChange> {
        self.index_of(id)?;
        self.selection.select(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_indices_follow_set_order() {
        let set = CursorSet::new(2);
        assert_eq!(set.len(), 5);
        assert_eq!(set.index_of(CursorId::Markers), Some(0));
        assert_eq!(set.index_of(CursorId::Voltage(1)), Some(2));
        assert_eq!(set.index_of(CursorId::Spectrum(0)), Some(3));
        assert_eq!(set.index_of(CursorId::Spectrum(2)), None);
        for index in 0..set.len() {
            let id = set.id_at(index).expect("id for index");
            assert_eq!(set.index_of(id), Some(index));
        }
        assert_eq!(set.id_at(5), None);
    }

    #[test]
    fn selection_is_exclusive_and_keeps_markers() {
        let mut set = CursorSet::new(2);
        let before = *set.get(CursorId::Voltage(0)).expect("cursor");
        let change = set.select(CursorId::Voltage(0)).expect("transition");
        assert_eq!(change.from, CursorId::Markers);
        assert_eq!(change.to, CursorId::Voltage(0));
        assert_eq!(set.selected(), CursorId::Voltage(0));
        assert_eq!(set.select(CursorId::Voltage(0)), None);
        assert_eq!(set.select(CursorId::Voltage(7)), None);
        assert_eq!(set.selected(), CursorId::Voltage(0));
        assert_eq!(*set.selected_cursor(), before);
    }

    #[test]
    fn shape_toggle_and_capture_axes() {
        assert_eq!(CursorShape::None.toggled(), CursorShape::Rectangular);
        assert_eq!(CursorShape::Vertical.toggled(), CursorShape::None);
        assert!(CursorShape::Rectangular.captures_x() && CursorShape::Rectangular.captures_y());
        assert!(CursorShape::Vertical.captures_x() && !CursorShape::Vertical.captures_y());
        assert!(!CursorShape::Horizontal.captures_x() && CursorShape::Horizontal.captures_y());
        assert!(!CursorShape::None.captures_x() && !CursorShape::None.captures_y());
    }

    #[test]
    fn markers_have_no_ordering_constraint() {
        let mut cursor = Cursor::new(
            CursorShape::Rectangular,
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
        );
        cursor.set_position(MarkerIndex::First, Point::new(3.0, 2.0));
        assert_eq!(cursor.positions(), [Point::new(3.0, 2.0), Point::new(1.0, 1.0)]);
    }
}
