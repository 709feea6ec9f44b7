//! gpui_scope is the display core of an oscilloscope built for GPUI.
//! It renders live multi-channel waveforms with a fading phosphor history
//! and lets the user drag measurement cursors and a time-domain zoom window
//! directly on the screen.

#![forbid(unsafe_code)]

pub mod cursor;
pub mod error;
pub mod events;
pub mod geom;
pub mod geometry;
pub mod history;
pub mod interaction;
pub mod measure;
pub mod render;
pub mod scope;
pub mod settings;
pub mod style;
pub mod transform;
pub mod view;

mod gpui_backend;

pub use cursor::{Cursor, CursorId, CursorSet, CursorShape, MarkerIndex, SelectionChange};
pub use error::ScopeError;
pub use events::{EventController, EventFilter, EventKind, ScopeEvent};
pub use geom::Point;
pub use geometry::{
    ChannelSamples, CursorGeometry, GridGeometry, SampleFrame, build_frame, cursor_outline,
    trace_vertices,
};
pub use gpui_backend::{GpuiScopeView, ScopeHandle, ScopeViewConfig};
pub use history::{ChannelTrace, Frame, HistoryBuffer};
pub use interaction::{DragController, PointerButton, PointerEvent, PointerKind, ViewKind, hit_test};
pub use measure::{CursorReadout, MarkerReadout, Measurements, Quantity, Unit, ZoomReadout};
pub use render::{Color, LineStyle, PointStyle, RenderCommand, RenderList, build_scene};
pub use scope::{Scope, ScopeBuilder};
pub use settings::{
    GraphFormat, HorizontalSettings, Interpolation, ScopeSettings, SpectrumChannel, VoltageChannel,
};
pub use style::Theme;
pub use transform::{DependentControl, MIN_ZOOM_SPAN, ZoomMapper};
pub use view::{DIVS_SUB, DIVS_TIME, DIVS_VOLTAGE, Grid, Range};
