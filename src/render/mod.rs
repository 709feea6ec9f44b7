//! Rendering primitives and scene building.
//!
//! [`build_scene`] turns the scope state into a backend-agnostic
//! [`RenderList`] expressed in grid divisions. Backends (such as the GPUI
//! backend) map the commands to pixels with the screen transform and the
//! clipping helpers below.

use tracing::debug;

use crate::cursor::CursorId;
use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::history::{ChannelTrace, HistoryBuffer};
use crate::interaction::ViewKind;
use crate::scope::Scope;
use crate::settings::{GraphFormat, Interpolation};
use crate::transform::{Transform, ZoomMapper};

/// RGBA color in linear space.
///
/// All components are expected to be in the 0.0..=1.0 range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Divide the color's brightness by `factor`. Factors below 1 leave the
    /// color unchanged; alpha is kept.
    pub fn darker(self, factor: f32) -> Self {
        if factor.is_nan() || factor <= 1.0 {
            return self;
        }
        Self::new(self.r / factor, self.g / factor, self.b / factor, self.a)
    }
}

/// Line stroke styling.
///
/// The width is expressed in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f32,
}

impl LineStyle {
    /// Create a line style.
    pub const fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self::new(Color::BLACK, 1.0)
    }
}

/// Styling for dots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointStyle {
    /// Dot color.
    pub color: Color,
    /// Dot size in pixels.
    pub size: f32,
}

/// A line segment in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LineSegment {
    /// Segment start.
    pub start: ScreenPoint,
    /// Segment end.
    pub end: ScreenPoint,
}

impl LineSegment {
    /// Create a new line segment.
    pub(crate) fn new(start: ScreenPoint, end: ScreenPoint) -> Self {
        Self { start, end }
    }
}

/// Draw command in grid divisions.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Connected polyline.
    LineStrip {
        /// Vertices in order.
        points: Vec<Point>,
        /// Stroke styling.
        style: LineStyle,
    },
    /// Closed polyline.
    LineLoop {
        /// Vertices in order; the last connects back to the first.
        points: Vec<Point>,
        /// Stroke styling.
        style: LineStyle,
    },
    /// Independent segments, one per vertex pair.
    Lines {
        /// Segment endpoints.
        points: Vec<Point>,
        /// Stroke styling.
        style: LineStyle,
    },
    /// Isolated dots.
    Points {
        /// Dot positions.
        points: Vec<Point>,
        /// Dot styling.
        style: PointStyle,
    },
}

/// Aggregated render commands.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderList {
    commands: Vec<RenderCommand>,
}

impl RenderList {
    /// Create an empty render list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a render command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Access all render commands.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }
}

const SELECTED_WIDTH: f32 = 3.0;
const CURSOR_WIDTH: f32 = 1.0;
const TRACE_WIDTH: f32 = 1.0;
const DOT_SIZE: f32 = 1.0;

/// Build the scene of one view.
///
/// Traces of every retained frame are drawn oldest last with fading
/// intensity, then the cursors (main view only), then the grid. The zoomed
/// view stretches the traces horizontally to the window between the time
/// markers; without a usable window it shows only the grid.
pub fn build_scene(scope: &Scope, view: ViewKind) -> RenderList {
    let settings = scope.settings();
    let theme = scope.theme();
    let mut list = RenderList::new();

    let mapper = match view {
        ViewKind::Main => None,
        ViewKind::Zoomed => Some(ZoomMapper::new(settings.cursors().markers(), &settings.grid)),
    };
    let draw_traces = match &mapper {
        Some(mapper) if mapper.is_degenerate() => {
            debug!(window = ?mapper.window(), "zoom window is degenerate, drawing grid only");
            false
        }
        _ => true,
    };

    if draw_traces {
        let show_spectrum = settings.horizontal.format == GraphFormat::TY;
        for (age, frame) in scope.history().iter() {
            let dim = 1.0 / HistoryBuffer::fade(age);
            for channel in 0..settings.channels() {
                if show_spectrum && settings.is_cursor_used(CursorId::Spectrum(channel)) {
                    if let Some(trace) = frame.spectrum(channel) {
                        let color = theme.spectrum_color(channel).darker(dim);
                        push_trace(
                            &mut list,
                            trace,
                            color,
                            settings.interpolation,
                            mapper.as_ref(),
                        );
                    }
                }
                if settings.is_cursor_used(CursorId::Voltage(channel)) {
                    if let Some(trace) = frame.voltage(channel) {
                        let color = theme.voltage_color(channel).darker(dim);
                        push_trace(
                            &mut list,
                            trace,
                            color,
                            settings.interpolation,
                            mapper.as_ref(),
                        );
                    }
                }
            }
        }
    }

    if view == ViewKind::Main {
        let cursors = settings.cursors();
        let selected = cursors.selected_index();
        for (index, outline) in scope.cursor_geometry().outlines().iter().enumerate() {
            let Some(id) = cursors.id_at(index) else {
                continue;
            };
            if !settings.is_cursor_used(id) {
                continue;
            }
            let color = match id {
                CursorId::Markers => theme.markers,
                CursorId::Voltage(channel) => theme.voltage_color(channel),
                CursorId::Spectrum(channel) => theme.spectrum_color(channel),
            };
            let width = if index == selected {
                SELECTED_WIDTH
            } else {
                CURSOR_WIDTH
            };
            list.push(RenderCommand::LineLoop {
                points: outline.to_vec(),
                style: LineStyle::new(color, width),
            });
        }
    }

    let grid = scope.grid_geometry();
    list.push(RenderCommand::Points {
        points: grid.dots.clone(),
        style: PointStyle {
            color: theme.grid,
            size: DOT_SIZE,
        },
    });
    list.push(RenderCommand::Lines {
        points: grid.axes.clone(),
        style: LineStyle::new(theme.axes, 1.0),
    });
    list.push(RenderCommand::LineLoop {
        points: grid.border.to_vec(),
        style: LineStyle::new(theme.border, 1.0),
    });
    list
}

fn push_trace(
    list: &mut RenderList,
    trace: &ChannelTrace,
    color: Color,
    interpolation: Interpolation,
    zoom: Option<&ZoomMapper>,
) {
    if !trace.is_used() || trace.vertices().is_empty() {
        return;
    }
    let points: Vec<Point> = match zoom {
        Some(mapper) => trace
            .vertices()
            .iter()
            .filter_map(|vertex| mapper.zoom_x(vertex.x).map(|x| Point::new(x, vertex.y)))
            .collect(),
        None => trace.vertices().to_vec(),
    };
    list.push(match interpolation {
        Interpolation::Linear => RenderCommand::LineStrip {
            points,
            style: LineStyle::new(color, TRACE_WIDTH),
        },
        Interpolation::Off => RenderCommand::Points {
            points,
            style: PointStyle {
                color,
                size: DOT_SIZE,
            },
        },
    });
}

/// Build clipped line segments from a polyline in grid divisions.
///
/// `closed` connects the last vertex back to the first.
pub(crate) fn build_line_segments(
    points: &[Point],
    closed: bool,
    transform: &Transform,
    clip: ScreenRect,
    out: &mut Vec<LineSegment>,
) {
    out.clear();
    if points.len() < 2 {
        return;
    }
    let screen: Vec<ScreenPoint> = points.iter().map(|p| transform.grid_to_screen(*p)).collect();
    let closing = closed.then(|| [screen[screen.len() - 1], screen[0]]);
    for window in screen.windows(2).chain(closing.as_ref().map(|pair| &pair[..])) {
        if let Some((start, end)) = clip_segment(window[0], window[1], clip) {
            out.push(LineSegment::new(start, end));
        }
    }
}

/// Build clipped segments from vertex pairs in grid divisions.
pub(crate) fn build_line_pairs(
    points: &[Point],
    transform: &Transform,
    clip: ScreenRect,
    out: &mut Vec<LineSegment>,
) {
    out.clear();
    for pair in points.chunks_exact(2) {
        let start = transform.grid_to_screen(pair[0]);
        let end = transform.grid_to_screen(pair[1]);
        if let Some((start, end)) = clip_segment(start, end, clip) {
            out.push(LineSegment::new(start, end));
        }
    }
}

/// Build clipped dots from grid points.
pub(crate) fn build_scatter_points(
    points: &[Point],
    transform: &Transform,
    clip: ScreenRect,
    out: &mut Vec<ScreenPoint>,
) {
    out.clear();
    out.extend(
        points
            .iter()
            .map(|point| transform.grid_to_screen(*point))
            .filter(|screen| clip.contains(*screen)),
    );
}

fn clip_segment(
    mut start: ScreenPoint,
    mut end: ScreenPoint,
    rect: ScreenRect,
) -> Option<(ScreenPoint, ScreenPoint)> {
    const LEFT: u8 = 1;
    const RIGHT: u8 = 2;
    const TOP: u8 = 4;
    const BOTTOM: u8 = 8;

    let region = |point: ScreenPoint| {
        let mut code = 0;
        if point.x < rect.min.x {
            code |= LEFT;
        } else if point.x > rect.max.x {
            code |= RIGHT;
        }
        if point.y < rect.min.y {
            code |= TOP;
        } else if point.y > rect.max.y {
            code |= BOTTOM;
        }
        code
    };

    let mut out_start = region(start);
    let mut out_end = region(end);

    loop {
        if (out_start | out_end) == 0 {
            return Some((start, end));
        }
        if (out_start & out_end) != 0 {
            return None;
        }

        let out_code = if out_start != 0 { out_start } else { out_end };
        let (x, y) = if (out_code & TOP) != 0 {
            (
                start.x + (end.x - start.x) * (rect.min.y - start.y) / (end.y - start.y),
                rect.min.y,
            )
        } else if (out_code & BOTTOM) != 0 {
            (
                start.x + (end.x - start.x) * (rect.max.y - start.y) / (end.y - start.y),
                rect.max.y,
            )
        } else if (out_code & RIGHT) != 0 {
            (
                rect.max.x,
                start.y + (end.y - start.y) * (rect.max.x - start.x) / (end.x - start.x),
            )
        } else {
            (
                rect.min.x,
                start.y + (end.y - start.y) * (rect.min.x - start.x) / (end.x - start.x),
            )
        };

        let clipped = ScreenPoint::new(x, y);
        if out_code == out_start {
            start = clipped;
            out_start = region(start);
        } else {
            end = clipped;
            out_end = region(end);
        }
    }
}
