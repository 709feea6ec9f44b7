use crate::geom::{Point, ScreenPoint};
use crate::transform::Transform;

#[derive(Debug, Clone, Default)]
pub(crate) struct ScopeUiState {
    pub(crate) transform: Option<Transform>,
    pub(crate) primary_held: bool,
}

impl ScopeUiState {
    /// Grid position of a pointer, or `None` before the first layout.
    pub(crate) fn grid_position(&self, pos: ScreenPoint) -> Option<Point> {
        self.transform
            .as_ref()
            .map(|transform| transform.screen_to_grid(pos))
    }
}
