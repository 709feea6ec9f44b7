use std::sync::{Arc, RwLock};

use gpui::prelude::*;
use gpui::{
    MouseButton, MouseDownEvent, MouseMoveEvent, MouseUpEvent, Pixels, Point, Window, canvas, div,
};
use tracing::warn;

use crate::geom::{Point as GridPoint, ScreenPoint};
use crate::interaction::{PointerEvent, ViewKind};
use crate::render::Color;
use crate::scope::Scope;

use super::config::ScopeViewConfig;
use super::frame::build_frame;
use super::paint::{paint_frame, to_hsla};
use super::state::ScopeUiState;

/// A GPUI view that renders one view of a [`Scope`].
///
/// The main view accepts marker drags with the left mouse button. The zoomed
/// view shows the window between the time markers and ignores pointer
/// edits. Both views of a scope share the same state.
#[derive(Clone)]
pub struct GpuiScopeView {
    scope: Arc<RwLock<Scope>>,
    state: Arc<RwLock<ScopeUiState>>,
    config: ScopeViewConfig,
    kind: ViewKind,
}

impl GpuiScopeView {
    /// Create the main view for a scope.
    ///
    /// Uses the default [`ScopeViewConfig`].
    pub fn new(scope: Scope) -> Self {
        Self::with_config(scope, ScopeViewConfig::default())
    }

    /// Create the main view for a scope with a custom configuration.
    pub fn with_config(scope: Scope, config: ScopeViewConfig) -> Self {
        Self {
            scope: Arc::new(RwLock::new(scope)),
            state: Arc::new(RwLock::new(ScopeUiState::default())),
            config,
            kind: ViewKind::Main,
        }
    }

    /// Create the zoomed view sharing this view's scope.
    pub fn zoomed(&self) -> Self {
        Self {
            scope: Arc::clone(&self.scope),
            state: Arc::new(RwLock::new(ScopeUiState::default())),
            config: self.config.clone(),
            kind: ViewKind::Zoomed,
        }
    }

    /// Which view this is.
    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    /// Get a handle for mutating the underlying scope.
    ///
    /// This is useful for streaming frames from async tasks.
    pub fn scope_handle(&self) -> ScopeHandle {
        ScopeHandle {
            scope: Arc::clone(&self.scope),
        }
    }

    fn forward(&self, event: impl FnOnce(GridPoint) -> PointerEvent, pos: ScreenPoint) {
        let Some(position) = self
            .state
            .read()
            .ok()
            .and_then(|state| state.grid_position(pos))
        else {
            return;
        };
        match self.scope.write() {
            Ok(mut scope) => scope.handle_pointer(&event(position)),
            Err(_) => warn!("scope lock poisoned, dropping pointer event"),
        }
    }

    fn on_mouse_down(&mut self, ev: &MouseDownEvent, cx: &mut Context<Self>) {
        if let Ok(mut state) = self.state.write() {
            state.primary_held = true;
        }
        let kind = self.kind;
        self.forward(|position| PointerEvent::down(kind, position), screen_point(ev.position));
        cx.notify();
    }

    fn on_mouse_move(&mut self, ev: &MouseMoveEvent, cx: &mut Context<Self>) {
        let held = ev.pressed_button == Some(MouseButton::Left);
        let was_held = self.state.read().is_ok_and(|state| state.primary_held);
        if !held && !was_held {
            return;
        }
        let kind = self.kind;
        self.forward(
            |position| PointerEvent::moved(kind, position, held),
            screen_point(ev.position),
        );
        cx.notify();
    }

    fn on_mouse_up(&mut self, ev: &MouseUpEvent, cx: &mut Context<Self>) {
        if let Ok(mut state) = self.state.write() {
            state.primary_held = false;
        }
        let kind = self.kind;
        self.forward(|position| PointerEvent::up(kind, position), screen_point(ev.position));
        cx.notify();
    }
}

impl Render for GpuiScopeView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let scope = Arc::clone(&self.scope);
        let state = Arc::clone(&self.state);
        let config = self.config.clone();
        let kind = self.kind;
        let background = self
            .scope
            .read()
            .map(|scope| scope.theme().background)
            .unwrap_or(Color::BLACK);

        div()
            .size_full()
            .bg(to_hsla(background))
            .child(
                canvas(
                    move |bounds, _window, _| {
                        let scope = scope.read().ok()?;
                        let mut state = state.write().ok()?;
                        Some(build_frame(&scope, kind, &mut state, &config, bounds))
                    },
                    move |_, frame, window, _| {
                        if let Some(frame) = frame {
                            paint_frame(&frame, window);
                        }
                    },
                )
                .size_full(),
            )
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_down(ev, cx);
                }),
            )
            .on_mouse_move(cx.listener(|this, ev, _, cx| {
                this.on_mouse_move(ev, cx);
            }))
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_up(ev, cx);
                }),
            )
    }
}

/// A handle for mutating a [`Scope`] held inside a `GpuiScopeView`.
///
/// The handle clones cheaply and can be moved into async tasks. Returns
/// `None` if a previous holder of the lock panicked.
#[derive(Clone)]
pub struct ScopeHandle {
    scope: Arc<RwLock<Scope>>,
}

impl ScopeHandle {
    /// Read the scope state.
    ///
    /// The scope is locked for the duration of the callback.
    pub fn read<R>(&self, f: impl FnOnce(&Scope) -> R) -> Option<R> {
        let scope = self.scope.read().ok()?;
        Some(f(&scope))
    }

    /// Mutate the scope state.
    ///
    /// The scope is locked for the duration of the callback, so a draw never
    /// observes a half-applied update.
    pub fn write<R>(&self, f: impl FnOnce(&mut Scope) -> R) -> Option<R> {
        let mut scope = self.scope.write().ok()?;
        Some(f(&mut scope))
    }
}

fn screen_point(point: Point<Pixels>) -> ScreenPoint {
    ScreenPoint::new(f32::from(point.x), f32::from(point.y))
}
