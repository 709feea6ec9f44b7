/// Configuration for the GPUI scope view.
#[derive(Debug, Clone)]
pub struct ScopeViewConfig {
    /// Multiplier applied to every stroke width.
    pub line_width_scale: f32,
    /// Minimum size of a dot in pixels.
    pub point_size: f32,
    /// Fill the view with the theme background before drawing.
    pub paint_background: bool,
}

impl Default for ScopeViewConfig {
    fn default() -> Self {
        Self {
            line_width_scale: 1.0,
            point_size: 2.0,
            paint_background: true,
        }
    }
}
