//! Scope controller and builder.
//!
//! [`Scope`] is the single owner of the scope state. Every mutating method
//! runs to completion as one unit: apply the change, regenerate cursor
//! geometry, recompute readouts and the zoom trigger control, then dispatch
//! the resulting [`ScopeEvent`]s in order.

use std::sync::mpsc::Receiver;

use tracing::{debug, trace};

use crate::cursor::{CursorId, CursorSet, CursorShape, MarkerIndex};
use crate::error::ScopeError;
use crate::events::{EventController, EventFilter, ScopeEvent};
use crate::geometry::{CursorGeometry, GridGeometry, SampleFrame, build_frame};
use crate::history::HistoryBuffer;
use crate::interaction::{DragController, PointerEvent};
use crate::measure::Measurements;
use crate::settings::{
    GraphFormat, HorizontalSettings, Interpolation, ScopeSettings, SpectrumChannel, VoltageChannel,
};
use crate::style::Theme;
use crate::transform::{DependentControl, ZoomMapper};
use crate::view::{Grid, Range};

/// Interactive oscilloscope display state.
#[derive(Debug)]
pub struct Scope {
    settings: ScopeSettings,
    theme: Theme,
    drag: DragController,
    history: HistoryBuffer,
    cursor_geometry: CursorGeometry,
    grid_geometry: GridGeometry,
    measurements: Measurements,
    zoom_control: DependentControl,
    events: EventController,
}

impl Scope {
    /// Create a scope with `channels` channels and default settings.
    pub fn new(channels: usize) -> Self {
        Self::builder().channels(channels).build()
    }

    /// Start building a scope with custom configuration.
    pub fn builder() -> ScopeBuilder {
        ScopeBuilder::default()
    }

    fn from_settings(settings: ScopeSettings, theme: Theme, history_capacity: usize) -> Self {
        let mut scope = Self {
            cursor_geometry: CursorGeometry::new(settings.cursors(), &settings.grid),
            grid_geometry: GridGeometry::new(&settings.grid),
            measurements: Measurements::compute(&settings),
            zoom_control: DependentControl::new(Range::new(0.0, 1.0)),
            settings,
            theme,
            drag: DragController::new(),
            history: HistoryBuffer::new(history_capacity),
            events: EventController::new(),
        };
        scope.refresh_zoom_control();
        scope
    }

    /// Access the settings model.
    pub fn settings(&self) -> &ScopeSettings {
        &self.settings
    }

    /// Access the theme.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Access the cursor set.
    pub fn cursors(&self) -> &CursorSet {
        self.settings.cursors()
    }

    /// Access the drag state.
    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Access the frame history.
    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Outlines of every cursor, current with the last mutation.
    pub fn cursor_geometry(&self) -> &CursorGeometry {
        &self.cursor_geometry
    }

    /// Static grid decoration.
    pub fn grid_geometry(&self) -> &GridGeometry {
        &self.grid_geometry
    }

    /// Readouts, current with the last mutation.
    pub fn measurements(&self) -> &Measurements {
        &self.measurements
    }

    /// State of the zoomed view's trigger-position control.
    pub fn zoom_control(&self) -> DependentControl {
        self.zoom_control
    }

    /// Mapping between the main and zoomed views for the current markers.
    pub fn zoom_mapper(&self) -> ZoomMapper {
        ZoomMapper::new(self.settings.cursors().markers(), &self.settings.grid)
    }

    /// Subscribe to change notifications matching `filter`.
    pub fn subscribe(&mut self, filter: EventFilter) -> Receiver<ScopeEvent> {
        self.events.subscribe(filter)
    }

    /// Route a pointer event to the drag controller.
    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        let events = self
            .drag
            .handle(&mut self.settings.cursors, &self.settings.grid, event);
        self.commit(events);
    }

    /// Select the cursor that pointer drags act on.
    pub fn select_cursor(&mut self, id: CursorId) -> Result<(), ScopeError> {
        self.ensure_cursor(id)?;
        let events = self
            .settings
            .cursors
            .select(id)
            .map(|change| ScopeEvent::SelectionChanged {
                from: change.from,
                to: change.to,
            })
            .into_iter()
            .collect();
        self.commit(events);
        Ok(())
    }

    /// Change the shape of a cursor.
    pub fn set_cursor_shape(&mut self, id: CursorId, shape: CursorShape) -> Result<(), ScopeError> {
        let cursor = self
            .settings
            .cursors
            .get_mut(id)
            .ok_or(ScopeError::UnknownCursor(id))?;
        if cursor.shape() == shape {
            return Ok(());
        }
        cursor.set_shape(shape);
        self.commit(vec![ScopeEvent::ShapeChanged { cursor: id, shape }]);
        Ok(())
    }

    /// Toggle a cursor between off and rectangular. Returns the new shape.
    pub fn toggle_cursor_shape(&mut self, id: CursorId) -> Result<CursorShape, ScopeError> {
        let shape = self
            .settings
            .cursors
            .get(id)
            .ok_or(ScopeError::UnknownCursor(id))?
            .shape()
            .toggled();
        self.set_cursor_shape(id, shape)?;
        Ok(shape)
    }

    /// Move a time marker horizontally, clamped to the screen.
    pub fn set_marker(&mut self, marker: MarkerIndex, x: f64) {
        if !x.is_finite() {
            return;
        }
        let x = self.settings.grid.x_range().clamp(x);
        let markers = self.settings.cursors.markers_mut();
        let mut position = markers.position(marker);
        position.x = x;
        markers.set_position(marker, position);
        self.commit(vec![ScopeEvent::MarkerMoved {
            cursor: CursorId::Markers,
            marker,
            position,
        }]);
    }

    /// Set the trigger position from the main view (fraction of the record).
    pub fn set_trigger_position(&mut self, position: f64) {
        if !position.is_finite() {
            return;
        }
        let position = position.clamp(0.0, 1.0);
        self.settings.horizontal.trigger_position = position;
        self.commit(vec![ScopeEvent::TriggerPositionChanged(position)]);
    }

    /// Set the trigger position from the zoomed view's control.
    ///
    /// The value is mapped back into the main view. Without a usable zoom
    /// window nothing changes and `false` is returned.
    pub fn set_zoomed_trigger_position(&mut self, zoom_value: f64) -> bool {
        match self.zoom_mapper().to_main_space(zoom_value) {
            Some(position) => {
                self.set_trigger_position(position);
                true
            }
            None => {
                debug!(zoom_value, "zoom window is degenerate, trigger position unchanged");
                false
            }
        }
    }

    /// Switch a channel on or off.
    pub fn set_channel_used(&mut self, id: CursorId, used: bool) -> Result<(), ScopeError> {
        let flag = match id {
            CursorId::Voltage(channel) => &mut self.voltage_mut(channel)?.used,
            CursorId::Spectrum(channel) => &mut self.spectrum_mut(channel)?.used,
            CursorId::Markers => return Err(ScopeError::UnknownCursor(id)),
        };
        if *flag == used {
            return Ok(());
        }
        *flag = used;
        self.commit(vec![ScopeEvent::ChannelUsedChanged { cursor: id, used }]);
        Ok(())
    }

    /// Set a voltage channel's gain in volts per division.
    pub fn set_gain(&mut self, channel: usize, gain: f64) -> Result<(), ScopeError> {
        self.voltage_mut(channel)?.gain = gain;
        self.commit(vec![ScopeEvent::ChannelScaleChanged {
            cursor: CursorId::Voltage(channel),
        }]);
        Ok(())
    }

    /// Set a spectrum channel's magnitude in decibels per division.
    pub fn set_magnitude(&mut self, channel: usize, magnitude: f64) -> Result<(), ScopeError> {
        self.spectrum_mut(channel)?.magnitude = magnitude;
        self.commit(vec![ScopeEvent::ChannelScaleChanged {
            cursor: CursorId::Spectrum(channel),
        }]);
        Ok(())
    }

    /// Set a channel's vertical offset in divisions.
    pub fn set_offset(&mut self, id: CursorId, offset: f64) -> Result<(), ScopeError> {
        match id {
            CursorId::Voltage(channel) => self.voltage_mut(channel)?.offset = offset,
            CursorId::Spectrum(channel) => self.spectrum_mut(channel)?.offset = offset,
            CursorId::Markers => return Err(ScopeError::UnknownCursor(id)),
        }
        self.commit(vec![ScopeEvent::ChannelScaleChanged { cursor: id }]);
        Ok(())
    }

    /// Set the time per division.
    pub fn set_timebase(&mut self, timebase: f64) {
        self.update_horizontal(|horizontal| horizontal.timebase = timebase);
    }

    /// Set the spectrum frequency per division.
    pub fn set_frequencybase(&mut self, frequencybase: f64) {
        self.update_horizontal(|horizontal| horizontal.frequencybase = frequencybase);
    }

    /// Set the trace arrangement.
    pub fn set_format(&mut self, format: GraphFormat) {
        self.update_horizontal(|horizontal| horizontal.format = format);
    }

    /// Show or hide the zoomed view.
    pub fn set_zoom_enabled(&mut self, enabled: bool) {
        self.update_horizontal(|horizontal| horizontal.zoom = enabled);
    }

    /// Set how trace vertices are connected.
    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        if self.settings.interpolation == interpolation {
            return;
        }
        self.settings.interpolation = interpolation;
        self.commit(vec![ScopeEvent::HorizontalChanged]);
    }

    /// Resize the frame history.
    pub fn set_history_capacity(&mut self, capacity: usize) {
        if self.history.capacity() == capacity {
            return;
        }
        self.history.set_capacity(capacity);
        self.commit(vec![ScopeEvent::HistoryResized { capacity }]);
    }

    /// Build geometry for an acquisition and insert it as the newest frame.
    pub fn insert_frame(&mut self, samples: &SampleFrame) -> Result<(), ScopeError> {
        let channels = self.settings.channels();
        if samples.voltage.len() != channels {
            return Err(ScopeError::ChannelCountMismatch {
                expected: channels,
                actual: samples.voltage.len(),
            });
        }
        if !samples.spectrum.is_empty() && samples.spectrum.len() != channels {
            return Err(ScopeError::ChannelCountMismatch {
                expected: channels,
                actual: samples.spectrum.len(),
            });
        }
        let settings = &self.settings;
        self.history
            .insert_with(|frame| build_frame(samples, settings, frame));
        let retained = self.history.len();
        trace!(retained, "frame inserted");
        self.commit(vec![ScopeEvent::FrameInserted { retained }]);
        Ok(())
    }

    fn update_horizontal(&mut self, update: impl FnOnce(&mut HorizontalSettings)) {
        let before = self.settings.horizontal;
        update(&mut self.settings.horizontal);
        if self.settings.horizontal != before {
            self.commit(vec![ScopeEvent::HorizontalChanged]);
        }
    }

    fn ensure_cursor(&self, id: CursorId) -> Result<(), ScopeError> {
        self.settings
            .cursors()
            .index_of(id)
            .map(|_| ())
            .ok_or(ScopeError::UnknownCursor(id))
    }

    fn voltage_mut(&mut self, channel: usize) -> Result<&mut VoltageChannel, ScopeError> {
        let channels = self.settings.channels();
        self.settings
            .voltage
            .get_mut(channel)
            .ok_or(ScopeError::UnknownChannel { channel, channels })
    }

    fn spectrum_mut(&mut self, channel: usize) -> Result<&mut SpectrumChannel, ScopeError> {
        let channels = self.settings.channels();
        self.settings
            .spectrum
            .get_mut(channel)
            .ok_or(ScopeError::UnknownChannel { channel, channels })
    }

    /// Recompute the zoomed trigger control. Returns the new state when it
    /// differs from the previous one.
    fn refresh_zoom_control(&mut self) -> Option<DependentControl> {
        let before = self.zoom_control;
        let mapper = self.zoom_mapper();
        if mapper.is_degenerate() {
            debug!(
                window = ?mapper.window(),
                "zoom window is degenerate, disabling zoomed trigger control"
            );
        }
        self.zoom_control
            .follow(mapper.to_zoom_space(self.settings.horizontal.trigger_position));
        (self.zoom_control != before).then_some(self.zoom_control)
    }

    fn commit(&mut self, mut events: Vec<ScopeEvent>) {
        if events.is_empty() {
            return;
        }
        self.cursor_geometry
            .regenerate(self.settings.cursors(), &self.settings.grid);
        self.measurements = Measurements::compute(&self.settings);
        let zoom_inputs_changed = events.iter().any(|event| {
            matches!(
                event,
                ScopeEvent::MarkerMoved {
                    cursor: CursorId::Markers,
                    ..
                } | ScopeEvent::TriggerPositionChanged(_)
            )
        });
        if zoom_inputs_changed {
            if let Some(control) = self.refresh_zoom_control() {
                events.push(ScopeEvent::ZoomControlChanged(control));
            }
        }
        self.events.emit_all(&events);
    }
}

/// Builder for configuring a scope before construction.
#[derive(Debug, Clone)]
pub struct ScopeBuilder {
    channels: usize,
    grid: Grid,
    theme: Theme,
    horizontal: HorizontalSettings,
    interpolation: Interpolation,
    history_capacity: usize,
    gains: Vec<(usize, f64)>,
    magnitudes: Vec<(usize, f64)>,
}

impl Default for ScopeBuilder {
    fn default() -> Self {
        Self {
            channels: 2,
            grid: Grid::default(),
            theme: Theme::default(),
            horizontal: HorizontalSettings::default(),
            interpolation: Interpolation::default(),
            history_capacity: 1,
            gains: Vec::new(),
            magnitudes: Vec::new(),
        }
    }
}

impl ScopeBuilder {
    /// Set the number of channels.
    pub fn channels(mut self, channels: usize) -> Self {
        self.channels = channels;
        self
    }

    /// Set the grid dimensions.
    pub fn grid(mut self, grid: Grid) -> Self {
        self.grid = grid;
        self
    }

    /// Set the theme.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the initial horizontal settings.
    pub fn horizontal(mut self, horizontal: HorizontalSettings) -> Self {
        self.horizontal = horizontal;
        self
    }

    /// Set the trace interpolation.
    pub fn interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Set how many frames the history keeps.
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Set the initial gain of a voltage channel. Ignored for channels
    /// beyond the channel count.
    pub fn gain(mut self, channel: usize, gain: f64) -> Self {
        self.gains.push((channel, gain));
        self
    }

    /// Set the initial magnitude of a spectrum channel. Ignored for channels
    /// beyond the channel count.
    pub fn magnitude(mut self, channel: usize, magnitude: f64) -> Self {
        self.magnitudes.push((channel, magnitude));
        self
    }

    /// Build the scope.
    pub fn build(self) -> Scope {
        let mut settings = ScopeSettings::new(self.channels);
        settings.grid = self.grid;
        settings.horizontal = self.horizontal;
        settings.interpolation = self.interpolation;
        for (channel, gain) in self.gains {
            if let Some(scale) = settings.voltage.get_mut(channel) {
                scale.gain = gain;
            }
        }
        for (channel, magnitude) in self.magnitudes {
            if let Some(scale) = settings.spectrum.get_mut(channel) {
                scale.magnitude = magnitude;
            }
        }
        Scope::from_settings(settings, self.theme, self.history_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::geom::Point;
    use crate::geometry::ChannelSamples;
    use crate::interaction::ViewKind;

    fn samples(channels: usize, value: f64) -> SampleFrame {
        SampleFrame {
            voltage: vec![
                ChannelSamples {
                    samples: vec![value; 4],
                    used: true,
                };
                channels
            ],
            spectrum: Vec::new(),
            format: GraphFormat::TY,
        }
    }

    #[test]
    fn builder_applies_configuration() {
        let scope = Scope::builder()
            .channels(3)
            .gain(1, 0.25)
            .magnitude(2, 5.0)
            .gain(9, 1.0)
            .history_capacity(5)
            .build();
        assert_eq!(scope.settings().channels(), 3);
        assert_eq!(scope.settings().voltage[1].gain, 0.25);
        assert_eq!(scope.settings().spectrum[2].magnitude, 5.0);
        assert_eq!(scope.history().capacity(), 5);
        assert_eq!(scope.cursors().len(), 7);
        assert_eq!(scope.cursor_geometry().outlines().len(), 7);
    }

    #[test]
    fn drag_updates_geometry_and_notifies() {
        let mut scope = Scope::new(1);
        let events = scope.subscribe(EventFilter::only(EventKind::MARKER));
        scope.handle_pointer(&PointerEvent::down(ViewKind::Main, Point::new(1.02, 0.0)));
        scope.handle_pointer(&PointerEvent::moved(ViewKind::Main, Point::new(3.0, 0.0), true));
        scope.handle_pointer(&PointerEvent::up(ViewKind::Main, Point::new(3.5, 0.0)));

        let outline = scope.cursor_geometry().outline(0).expect("outline");
        assert_eq!(outline[2].x, 3.5);
        let moved: Vec<_> = events.try_iter().collect();
        assert_eq!(moved.len(), 3);
        assert!(scope.drag().active_marker().is_none());
    }

    #[test]
    fn zoom_control_follows_markers_and_trigger() {
        let mut scope = Scope::new(1);
        let events = scope.subscribe(EventFilter::only(EventKind::ZOOM_CONTROL));
        // Default markers at -1 and 1 with the trigger centered.
        assert!(scope.zoom_control().is_enabled());
        assert!((scope.zoom_control().value() - 0.5).abs() < 1e-12);

        // Window 1..2 lies right of the trigger at x = 0.
        scope.set_marker(MarkerIndex::First, 2.0);
        assert!(!scope.zoom_control().is_enabled());
        assert_eq!(scope.zoom_control().value(), 0.0);

        // x = 1.5 is the middle of the window.
        scope.set_trigger_position(0.65);
        assert!(scope.zoom_control().is_enabled());
        assert!((scope.zoom_control().value() - 0.5).abs() < 1e-9);

        // Re-setting the same position leaves the control unchanged.
        scope.set_trigger_position(0.65);
        let changes: Vec<_> = events.try_iter().collect();
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn degenerate_window_disables_zoom_control() {
        let mut scope = Scope::new(1);
        scope.set_marker(MarkerIndex::First, 1.0);
        assert!(!scope.zoom_control().is_enabled());
        assert!((scope.zoom_control().value() - 0.5).abs() < 1e-12);
        assert!(!scope.set_zoomed_trigger_position(0.3));
        assert_eq!(scope.settings().horizontal.trigger_position, 0.5);
    }

    #[test]
    fn zoomed_trigger_maps_back_to_main() {
        let mut scope = Scope::new(1);
        assert!(scope.set_zoomed_trigger_position(0.75));
        // Window -1..1 of 10 divisions: 0.75 of the window is x = 0.5.
        assert!((scope.settings().horizontal.trigger_position - 0.55).abs() < 1e-12);
        assert!((scope.zoom_control().value() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn set_marker_clamps_to_screen() {
        let mut scope = Scope::new(1);
        scope.set_marker(MarkerIndex::Second, 12.0);
        assert_eq!(scope.cursors().markers().position(MarkerIndex::Second).x, 5.0);
        scope.set_marker(MarkerIndex::First, -7.0);
        assert_eq!(scope.cursors().markers().position(MarkerIndex::First).x, -5.0);
    }

    #[test]
    fn selection_and_shape_toggle() {
        let mut scope = Scope::new(2);
        let events = scope.subscribe(EventFilter::only(EventKind::SELECTION | EventKind::SHAPE));
        scope.select_cursor(CursorId::Spectrum(1)).expect("cursor");
        scope.select_cursor(CursorId::Spectrum(1)).expect("cursor");
        assert_eq!(
            scope.toggle_cursor_shape(CursorId::Spectrum(1)),
            Ok(CursorShape::Rectangular)
        );
        assert_eq!(
            scope.select_cursor(CursorId::Voltage(2)),
            Err(ScopeError::UnknownCursor(CursorId::Voltage(2)))
        );
        let received: Vec<_> = events.try_iter().collect();
        assert_eq!(
            received,
            vec![
                ScopeEvent::SelectionChanged {
                    from: CursorId::Markers,
                    to: CursorId::Spectrum(1),
                },
                ScopeEvent::ShapeChanged {
                    cursor: CursorId::Spectrum(1),
                    shape: CursorShape::Rectangular,
                },
            ]
        );
    }

    #[test]
    fn disabling_channel_clears_readout() {
        let mut scope = Scope::new(2);
        scope.set_channel_used(CursorId::Voltage(1), true).expect("channel");
        let readout = scope.measurements().cursor(CursorId::Voltage(1)).copied();
        assert!(readout.is_some_and(|r| r.selectable && r.delta_y.is_some()));

        scope.set_channel_used(CursorId::Voltage(1), false).expect("channel");
        let readout = scope.measurements().cursor(CursorId::Voltage(1)).copied();
        assert!(readout.is_some_and(|r| !r.selectable && r.delta_y.is_none()));
    }

    #[test]
    fn invalid_channels_are_rejected() {
        let mut scope = Scope::new(2);
        assert_eq!(
            scope.set_gain(2, 1.0),
            Err(ScopeError::UnknownChannel {
                channel: 2,
                channels: 2
            })
        );
        assert_eq!(
            scope.set_offset(CursorId::Markers, 1.0),
            Err(ScopeError::UnknownCursor(CursorId::Markers))
        );
        assert_eq!(
            scope.insert_frame(&samples(3, 0.0)),
            Err(ScopeError::ChannelCountMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn history_capacity_and_frames() {
        let mut scope = Scope::builder().channels(1).history_capacity(2).build();
        let events = scope.subscribe(EventFilter::only(EventKind::FRAME | EventKind::HISTORY));
        for n in 0..3 {
            scope.insert_frame(&samples(1, n as f64)).expect("frame");
        }
        assert_eq!(scope.history().len(), 2);
        scope.set_history_capacity(1);
        assert_eq!(scope.history().len(), 1);
        let latest = scope
            .history()
            .latest()
            .and_then(|frame| frame.voltage(0))
            .map(|trace| trace.vertices()[0].y);
        assert_eq!(latest, Some(2.0));
        let received: Vec<_> = events.try_iter().collect();
        assert_eq!(received.len(), 4);
        assert_eq!(received[3], ScopeEvent::HistoryResized { capacity: 1 });
    }

    #[test]
    fn horizontal_changes_update_readouts() {
        let mut scope = Scope::new(1);
        scope.set_timebase(2e-3);
        scope.set_frequencybase(10.0);
        scope.set_zoom_enabled(true);
        let markers = scope.measurements().markers;
        assert!((markers.time_delta.value - 4e-3).abs() < 1e-15);
        assert!((markers.freq_delta.value - 20.0).abs() < 1e-12);
        assert!(markers.zoom.is_some());
        scope.set_format(GraphFormat::XY);
        assert_eq!(scope.settings().horizontal.format, GraphFormat::XY);
    }
}
