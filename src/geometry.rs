//! Vertex generation for cursors, grid decoration and traces.
//!
//! Everything here is expressed in grid divisions. The rasterizer maps the
//! vertices to pixels.

use crate::cursor::{Cursor, CursorSet, CursorShape};
use crate::geom::Point;
use crate::history::Frame;
use crate::settings::{GraphFormat, ScopeSettings};
use crate::view::Grid;

/// Length of the sub-division ticks on the axes, in divisions.
const TICK_HALF_LENGTH: f64 = 0.05;

/// Closed outline of a cursor, drawn as a line loop.
pub type Outline = [Point; 4];

/// Build the closed outline of a cursor.
///
/// A switched-off cursor yields a rectangle twice the screen size so that
/// nothing of it is visible.
pub fn cursor_outline(cursor: &Cursor, grid: &Grid) -> Outline {
    let [p0, p1] = cursor.positions();
    let t = grid.time_divs;
    let v = grid.voltage_divs;
    match cursor.shape() {
        CursorShape::None => [
            Point::new(-t, -v),
            Point::new(-t, v),
            Point::new(t, v),
            Point::new(t, -v),
        ],
        CursorShape::Vertical => [
            Point::new(p0.x, -v),
            Point::new(p0.x, v),
            Point::new(p1.x, v),
            Point::new(p1.x, -v),
        ],
        CursorShape::Horizontal => [
            Point::new(-t, p0.y),
            Point::new(t, p0.y),
            Point::new(t, p1.y),
            Point::new(-t, p1.y),
        ],
        CursorShape::Rectangular => [
            Point::new(p0.x, p0.y),
            Point::new(p0.x, p1.y),
            Point::new(p1.x, p1.y),
            Point::new(p1.x, p0.y),
        ],
    }
}

/// Outlines of every cursor in set order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CursorGeometry {
    outlines: Vec<Outline>,
}

impl CursorGeometry {
    /// Build the outlines for a cursor set.
    pub fn new(cursors: &CursorSet, grid: &Grid) -> Self {
        let mut geometry = Self::default();
        geometry.regenerate(cursors, grid);
        geometry
    }

    /// Rebuild all outlines. The set is small, so every cursor is
    /// regenerated on any marker change.
    pub fn regenerate(&mut self, cursors: &CursorSet, grid: &Grid) {
        self.outlines.clear();
        self.outlines
            .extend(cursors.iter().map(|(_, cursor)| cursor_outline(cursor, grid)));
    }

    /// Outline of the cursor at a flat index.
    pub fn outline(&self, index: usize) -> Option<&Outline> {
        self.outlines.get(index)
    }

    /// All outlines in set order.
    pub fn outlines(&self) -> &[Outline] {
        &self.outlines
    }
}

/// Static grid decoration: dots, axes with ticks and the border.
#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry {
    /// Dots on the division lines, drawn as points.
    pub dots: Vec<Point>,
    /// Axis lines and their sub-division ticks, drawn as vertex pairs.
    pub axes: Vec<Point>,
    /// Screen border, drawn as a line loop.
    pub border: [Point; 4],
}

impl GridGeometry {
    /// Generate the decoration for a grid.
    pub fn new(grid: &Grid) -> Self {
        let sub = grid.sub_divs.max(1) as i64;
        let sub_f = sub as f64;
        let half_t = (grid.time_divs / 2.0).floor() as i64;
        let half_v = (grid.voltage_divs / 2.0).floor() as i64;
        let x_edge = grid.time_divs / 2.0;
        let y_edge = grid.voltage_divs / 2.0;

        let mut dots = Vec::new();
        for div in 1..half_t {
            let x = div as f64;
            for dot in 1..half_v * sub {
                let y = dot as f64 / sub_f;
                dots.extend([
                    Point::new(-x, -y),
                    Point::new(-x, y),
                    Point::new(x, -y),
                    Point::new(x, y),
                ]);
            }
        }
        for div in 1..half_v {
            let y = div as f64;
            for dot in 1..half_t * sub {
                // Positions on whole divisions are covered by the loop above.
                if dot % sub == 0 {
                    continue;
                }
                let x = dot as f64 / sub_f;
                dots.extend([
                    Point::new(-x, -y),
                    Point::new(x, -y),
                    Point::new(-x, y),
                    Point::new(x, y),
                ]);
            }
        }

        let mut axes = vec![
            Point::new(-x_edge, 0.0),
            Point::new(x_edge, 0.0),
            Point::new(0.0, -y_edge),
            Point::new(0.0, y_edge),
        ];
        for line in 1..half_t * sub {
            let x = line as f64 / sub_f;
            axes.extend([
                Point::new(x, -TICK_HALF_LENGTH),
                Point::new(x, TICK_HALF_LENGTH),
                Point::new(-x, -TICK_HALF_LENGTH),
                Point::new(-x, TICK_HALF_LENGTH),
            ]);
        }
        for line in 1..half_v * sub {
            let y = line as f64 / sub_f;
            axes.extend([
                Point::new(-TICK_HALF_LENGTH, y),
                Point::new(TICK_HALF_LENGTH, y),
                Point::new(-TICK_HALF_LENGTH, -y),
                Point::new(TICK_HALF_LENGTH, -y),
            ]);
        }

        let border = [
            Point::new(-x_edge, -y_edge),
            Point::new(x_edge, -y_edge),
            Point::new(x_edge, y_edge),
            Point::new(-x_edge, y_edge),
        ];

        Self { dots, axes, border }
    }
}

/// Raw samples of one channel as delivered by the acquisition layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelSamples {
    /// Sample values in physical units (volts or decibels).
    pub samples: Vec<f64>,
    /// Whether the channel is enabled.
    pub used: bool,
}

/// One acquisition: per-channel voltage samples and spectrum magnitudes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleFrame {
    /// Voltage samples, one entry per channel.
    pub voltage: Vec<ChannelSamples>,
    /// Spectrum magnitudes, one entry per channel.
    pub spectrum: Vec<ChannelSamples>,
    /// Display mode the frame was captured for.
    pub format: GraphFormat,
}

/// Spread `samples` evenly across the time axis and scale them into
/// divisions: `y = sample / scale + offset`.
pub fn trace_vertices<'a>(
    samples: &'a [f64],
    scale: f64,
    offset: f64,
    grid: &Grid,
) -> impl Iterator<Item = Point> + 'a {
    let left = -grid.time_divs / 2.0;
    let step = if samples.len() > 1 {
        grid.time_divs / (samples.len() - 1) as f64
    } else {
        0.0
    };
    let scale = if scale.abs() > f64::EPSILON { scale } else { 1.0 };
    samples
        .iter()
        .enumerate()
        .map(move |(index, sample)| Point::new(left + step * index as f64, sample / scale + offset))
}

/// Fill `frame` with the geometry of `samples` using the current channel
/// scales.
///
/// In T-Y mode each channel gets a voltage and a spectrum trace. In X-Y mode
/// channel pairs are plotted against each other: the trace is stored on the
/// first channel of the pair and spectrum traces are omitted.
pub fn build_frame(samples: &SampleFrame, settings: &ScopeSettings, frame: &mut Frame) {
    let grid = settings.grid;
    let channels = settings.channels();
    let spectrum_channels = match samples.format {
        GraphFormat::TY => channels,
        GraphFormat::XY => 0,
    };
    let (voltage, spectrum) = frame.reset(channels, spectrum_channels);

    match samples.format {
        GraphFormat::TY => {
            for (channel, trace) in voltage.iter_mut().enumerate() {
                match settings.voltage.get(channel).zip(samples.voltage.get(channel)) {
                    Some((scale, input)) => trace.refill(
                        input.used,
                        trace_vertices(&input.samples, scale.gain, scale.offset, &grid),
                    ),
                    None => trace.refill(false, std::iter::empty()),
                }
            }
            for (channel, trace) in spectrum.iter_mut().enumerate() {
                match settings.spectrum.get(channel).zip(samples.spectrum.get(channel)) {
                    Some((scale, input)) => trace.refill(
                        input.used,
                        trace_vertices(&input.samples, scale.magnitude, scale.offset, &grid),
                    ),
                    None => trace.refill(false, std::iter::empty()),
                }
            }
        }
        GraphFormat::XY => {
            for (channel, trace) in voltage.iter_mut().enumerate() {
                let inputs = samples.voltage.get(channel).zip(samples.voltage.get(channel + 1));
                let scales = settings.voltage.get(channel).zip(settings.voltage.get(channel + 1));
                let Some(((x_input, y_input), (x_scale, y_scale))) =
                    inputs.zip(scales).filter(|_| channel % 2 == 0)
                else {
                    trace.refill(false, std::iter::empty());
                    continue;
                };
                let x_gain = nonzero(x_scale.gain);
                let y_gain = nonzero(y_scale.gain);
                trace.refill(
                    x_input.used && y_input.used,
                    x_input.samples.iter().zip(&y_input.samples).map(|(x, y)| {
                        Point::new(x / x_gain + x_scale.offset, y / y_gain + y_scale.offset)
                    }),
                );
            }
        }
    }
}

fn nonzero(scale: f64) -> f64 {
    if scale.abs() > f64::EPSILON { scale } else { 1.0 }
}
