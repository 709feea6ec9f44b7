//! Physical readouts derived from cursor positions.
//!
//! Cursor deltas are measured in grid divisions and converted to seconds,
//! hertz, volts or decibels with the current channel scales. Formatting the
//! quantities into label text is left to the host.

use crate::cursor::{CursorId, CursorShape, MarkerIndex};
use crate::settings::ScopeSettings;
use crate::transform::ZoomMapper;

/// Physical unit of a [`Quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Time.
    Seconds,
    /// Frequency.
    Hertz,
    /// Voltage.
    Volts,
    /// Spectrum magnitude.
    Decibels,
}

/// A value with its unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantity {
    /// Numeric value in the base unit.
    pub value: f64,
    /// Unit of the value.
    pub unit: Unit,
}

impl Quantity {
    /// Create a quantity.
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }
}

/// Magnification details shown while the zoomed view is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomReadout {
    /// Magnification of the zoomed view.
    pub factor: f64,
    /// Time per division inside the zoomed view.
    pub timebase: Quantity,
    /// Frequency per division inside the zoomed view.
    pub frequencybase: Quantity,
}

/// Readout of the time-marker pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerReadout {
    /// Time between the markers.
    pub time_delta: Quantity,
    /// Frequency span between the markers.
    pub freq_delta: Quantity,
    /// Reciprocal of the time delta. `None` when the markers coincide.
    pub frequency: Option<Quantity>,
    /// Position of each marker relative to the trigger point.
    pub offsets: [Quantity; 2],
    /// Present when the zoomed view is shown.
    pub zoom: Option<ZoomReadout>,
}

/// Readout of one channel cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorReadout {
    /// Cursor the readout belongs to.
    pub cursor: CursorId,
    /// Whether the cursor's selector is enabled.
    pub selectable: bool,
    /// Current shape.
    pub shape: CursorShape,
    /// Horizontal delta (time or frequency). Cleared for unused channels.
    pub delta_x: Option<Quantity>,
    /// Vertical delta (voltage or magnitude). Cleared for unused channels.
    pub delta_y: Option<Quantity>,
}

impl CursorReadout {
    fn cleared(cursor: CursorId, shape: CursorShape) -> Self {
        Self {
            cursor,
            selectable: false,
            shape,
            delta_x: None,
            delta_y: None,
        }
    }

    /// Whether the horizontal delta is displayed for the current shape.
    pub fn shows_x(&self) -> bool {
        self.shape.captures_x()
    }

    /// Whether the vertical delta is displayed for the current shape.
    pub fn shows_y(&self) -> bool {
        self.shape.captures_y()
    }

    /// Shape symbol for the shape button.
    pub fn symbol(&self) -> &'static str {
        self.shape.symbol()
    }
}

/// Every readout of the scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurements {
    /// Time-marker readout.
    pub markers: MarkerReadout,
    /// Voltage cursor readouts, one per channel.
    pub voltage: Vec<CursorReadout>,
    /// Spectrum cursor readouts, one per channel.
    pub spectrum: Vec<CursorReadout>,
}

impl Measurements {
    /// Compute all readouts from the current settings.
    pub fn compute(settings: &ScopeSettings) -> Self {
        Self {
            markers: marker_readout(settings),
            voltage: (0..settings.channels())
                .map(|channel| voltage_readout(settings, channel))
                .collect(),
            spectrum: (0..settings.spectrum.len())
                .map(|channel| spectrum_readout(settings, channel))
                .collect(),
        }
    }

    /// Readout of a channel cursor. The time markers have their own
    /// [`MarkerReadout`].
    pub fn cursor(&self, id: CursorId) -> Option<&CursorReadout> {
        match id {
            CursorId::Markers => None,
            CursorId::Voltage(channel) => self.voltage.get(channel),
            CursorId::Spectrum(channel) => self.spectrum.get(channel),
        }
    }
}

fn marker_readout(settings: &ScopeSettings) -> MarkerReadout {
    let horizontal = &settings.horizontal;
    let grid = &settings.grid;
    let markers = settings.cursors.markers();
    let [p0, p1] = markers.positions();
    let divs = (p1.x - p0.x).abs();
    let time = divs * horizontal.timebase;
    let freq = divs * horizontal.frequencybase;

    let offset = |marker: MarkerIndex| {
        let x = markers.position(marker).x;
        Quantity::new(
            0.5 + x / grid.time_divs - horizontal.trigger_position,
            Unit::Seconds,
        )
    };
    let zoom = horizontal
        .zoom
        .then(|| ZoomMapper::new(markers, grid).zoom_factor())
        .flatten()
        .map(|factor| ZoomReadout {
            factor,
            timebase: Quantity::new(time / grid.time_divs, Unit::Seconds),
            frequencybase: Quantity::new(freq / grid.time_divs, Unit::Hertz),
        });

    MarkerReadout {
        time_delta: Quantity::new(time, Unit::Seconds),
        freq_delta: Quantity::new(freq, Unit::Hertz),
        frequency: (time != 0.0).then(|| Quantity::new(1.0 / time, Unit::Hertz)),
        offsets: [offset(MarkerIndex::First), offset(MarkerIndex::Second)],
        zoom,
    }
}

fn voltage_readout(settings: &ScopeSettings, channel: usize) -> CursorReadout {
    let id = CursorId::Voltage(channel);
    let Some(cursor) = settings.cursors.get(id) else {
        return CursorReadout::cleared(id, CursorShape::None);
    };
    let Some(scale) = settings.voltage.get(channel).filter(|scale| scale.used) else {
        return CursorReadout::cleared(id, cursor.shape());
    };
    let [p0, p1] = cursor.positions();
    CursorReadout {
        cursor: id,
        selectable: true,
        shape: cursor.shape(),
        delta_x: Some(Quantity::new(
            (p1.x - p0.x) * settings.horizontal.timebase,
            Unit::Seconds,
        )),
        delta_y: Some(Quantity::new((p1.y - p0.y) * scale.gain, Unit::Volts)),
    }
}

fn spectrum_readout(settings: &ScopeSettings, channel: usize) -> CursorReadout {
    let id = CursorId::Spectrum(channel);
    let Some(cursor) = settings.cursors.get(id) else {
        return CursorReadout::cleared(id, CursorShape::None);
    };
    let Some(scale) = settings.spectrum.get(channel).filter(|scale| scale.used) else {
        return CursorReadout::cleared(id, cursor.shape());
    };
    let [p0, p1] = cursor.positions();
    CursorReadout {
        cursor: id,
        selectable: true,
        shape: cursor.shape(),
        delta_x: Some(Quantity::new(
            (p1.x - p0.x) * settings.horizontal.frequencybase,
            Unit::Hertz,
        )),
        delta_y: Some(Quantity::new(
            (p1.y - p0.y) * scale.magnitude * settings.grid.voltage_divs,
            Unit::Decibels,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;

    fn assert_close(actual: Option<Quantity>, expected: f64, unit: Unit) {
        let quantity = actual.expect("quantity present");
        assert_eq!(quantity.unit, unit);
        assert!(
            (quantity.value - expected).abs() < 1e-12,
            "{} != {expected}",
            quantity.value
        );
    }

    fn settings_with_cursor(id: CursorId, p0: Point, p1: Point) -> ScopeSettings {
        let mut settings = ScopeSettings::new(2);
        let cursor = settings.cursors.get_mut(id).expect("cursor");
        cursor.set_position(MarkerIndex::First, p0);
        cursor.set_position(MarkerIndex::Second, p1);
        settings
    }

    #[test]
    fn voltage_cursor_deltas() {
        let mut settings =
            settings_with_cursor(CursorId::Voltage(0), Point::new(0.0, 0.0), Point::new(2.0, 1.0));
        settings.voltage[0].used = true;
        settings.voltage[0].gain = 0.5;
        settings.horizontal.timebase = 1e-3;

        let measurements = Measurements::compute(&settings);
        let readout = measurements.cursor(CursorId::Voltage(0)).expect("readout");
        assert!(readout.selectable);
        assert_close(readout.delta_x, 2e-3, Unit::Seconds);
        assert_close(readout.delta_y, 0.5, Unit::Volts);
        // Shape None still reports values, it just hides them.
        assert!(!readout.shows_x() && !readout.shows_y());
        assert_eq!(readout.symbol(), "OFF");
    }

    #[test]
    fn spectrum_cursor_scales_by_voltage_divisions() {
        let mut settings = settings_with_cursor(
            CursorId::Spectrum(1),
            Point::new(1.0, 0.5),
            Point::new(-1.0, 1.0),
        );
        settings.spectrum[1].used = true;
        settings.spectrum[1].magnitude = 10.0;
        settings.horizontal.frequencybase = 100.0;

        let measurements = Measurements::compute(&settings);
        let readout = measurements.cursor(CursorId::Spectrum(1)).expect("readout");
        assert_close(readout.delta_x, -200.0, Unit::Hertz);
        assert_close(readout.delta_y, 40.0, Unit::Decibels);
    }

    #[test]
    fn unused_channel_is_cleared_and_disabled() {
        let mut settings = ScopeSettings::new(1);
        settings.voltage[0].used = true;
        assert!(Measurements::compute(&settings).voltage[0].selectable);

        settings.voltage[0].used = false;
        let readout = Measurements::compute(&settings).voltage[0];
        assert!(!readout.selectable);
        assert_eq!(readout.delta_x, None);
        assert_eq!(readout.delta_y, None);
    }

    #[test]
    fn marker_readout_uses_absolute_span() {
        let mut settings =
            settings_with_cursor(CursorId::Markers, Point::new(2.0, 0.0), Point::new(-2.0, 0.0));
        settings.horizontal.timebase = 1e-3;
        settings.horizontal.frequencybase = 50.0;
        settings.horizontal.trigger_position = 0.25;

        let markers = Measurements::compute(&settings).markers;
        assert_close(Some(markers.time_delta), 4e-3, Unit::Seconds);
        assert_close(Some(markers.freq_delta), 200.0, Unit::Hertz);
        assert_close(markers.frequency, 250.0, Unit::Hertz);
        assert_close(Some(markers.offsets[0]), 0.45, Unit::Seconds);
        assert_close(Some(markers.offsets[1]), 0.05, Unit::Seconds);
        assert_eq!(markers.zoom, None);
    }

    #[test]
    fn zoom_readout_when_zoom_is_shown() {
        let mut settings =
            settings_with_cursor(CursorId::Markers, Point::new(-1.0, 0.0), Point::new(1.5, 0.0));
        settings.horizontal.zoom = true;
        settings.horizontal.timebase = 1e-3;
        settings.horizontal.frequencybase = 10.0;

        let zoom = Measurements::compute(&settings).markers.zoom.expect("zoom readout");
        assert!((zoom.factor - 4.0).abs() < 1e-12);
        assert!((zoom.timebase.value - 2.5e-4).abs() < 1e-15);
        assert!((zoom.frequencybase.value - 2.5).abs() < 1e-12);
    }

    #[test]
    fn coincident_markers_have_no_frequency() {
        let mut settings =
            settings_with_cursor(CursorId::Markers, Point::new(1.0, 0.0), Point::new(1.0, 0.0));
        settings.horizontal.zoom = true;
        let markers = Measurements::compute(&settings).markers;
        assert_eq!(markers.frequency, None);
        assert_eq!(markers.zoom, None);
    }
}
