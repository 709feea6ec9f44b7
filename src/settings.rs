//! The scope settings model.
//!
//! [`ScopeSettings`] is the single authoritative owner of the cursor set and
//! of every scale factor the display needs. The interaction and rendering
//! code only reads it or mutates it through [`Scope`](crate::scope::Scope).

use crate::cursor::{CursorId, CursorSet};
use crate::view::Grid;

/// Arrangement of traces on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphFormat {
    /// Time on X, amplitude on Y. Spectrum traces are drawn too.
    #[default]
    TY,
    /// Channel pairs plotted against each other. Spectrum traces are hidden.
    XY,
}

/// How trace vertices are connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Draw samples as dots.
    Off,
    /// Connect samples with straight lines.
    #[default]
    Linear,
}

/// Scale context of one voltage channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoltageChannel {
    /// Volts per division.
    pub gain: f64,
    /// Vertical offset in divisions.
    pub offset: f64,
    /// Whether the channel is shown.
    pub used: bool,
}

impl Default for VoltageChannel {
    fn default() -> Self {
        Self {
            gain: 1.0,
            offset: 0.0,
            used: false,
        }
    }
}

/// Scale context of one spectrum channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumChannel {
    /// Decibels per division.
    pub magnitude: f64,
    /// Vertical offset in divisions.
    pub offset: f64,
    /// Whether the channel is shown.
    pub used: bool,
}

impl Default for SpectrumChannel {
    fn default() -> Self {
        Self {
            magnitude: 20.0,
            offset: 0.0,
            used: false,
        }
    }
}

/// Horizontal (time base and trigger) settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalSettings {
    /// Seconds per division.
    pub timebase: f64,
    /// Hertz per division of the spectrum.
    pub frequencybase: f64,
    /// Trigger position as a fraction of the record (`0..=1`).
    pub trigger_position: f64,
    /// Trace arrangement.
    pub format: GraphFormat,
    /// Whether the zoomed view is shown.
    pub zoom: bool,
}

impl Default for HorizontalSettings {
    fn default() -> Self {
        Self {
            timebase: 1e-3,
            frequencybase: 1e3,
            trigger_position: 0.5,
            format: GraphFormat::TY,
            zoom: false,
        }
    }
}

/// Authoritative settings shared by interaction, measurement and rendering.
#[derive(Debug, Clone)]
pub struct ScopeSettings {
    /// Grid dimensions.
    pub grid: Grid,
    /// Horizontal settings.
    pub horizontal: HorizontalSettings,
    /// Voltage channel scales, one per channel.
    pub voltage: Vec<VoltageChannel>,
    /// Spectrum channel scales, one per channel.
    pub spectrum: Vec<SpectrumChannel>,
    /// Trace interpolation.
    pub interpolation: Interpolation,
    pub(crate) cursors: CursorSet,
}

impl ScopeSettings {
    /// Settings for `channels` channels with default scales.
    pub fn new(channels: usize) -> Self {
        Self {
            grid: Grid::default(),
            horizontal: HorizontalSettings::default(),
            voltage: vec![VoltageChannel::default(); channels],
            spectrum: vec![SpectrumChannel::default(); channels],
            interpolation: Interpolation::default(),
            cursors: CursorSet::new(channels),
        }
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        self.voltage.len()
    }

    /// The cursor set.
    pub fn cursors(&self) -> &CursorSet {
        &self.cursors
    }

    /// Whether the channel a cursor belongs to is shown. The time markers
    /// are always in use.
    pub fn is_cursor_used(&self, id: CursorId) -> bool {
        match id {
            CursorId::Markers => true,
            CursorId::Voltage(channel) => self.voltage.get(channel).is_some_and(|c| c.used),
            CursorId::Spectrum(channel) => self.spectrum.get(channel).is_some_and(|c| c.used),
        }
    }
}
