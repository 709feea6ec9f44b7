//! GPUI integration for gpui_scope.
//!
//! This module provides a GPUI view that renders a [`Scope`](crate::scope::Scope)
//! and forwards pointer input to its marker drag controller. A main and a
//! zoomed view can share one scope.

mod config;
mod frame;
mod paint;
mod state;
mod view;

pub use config::ScopeViewConfig;
pub use view::{GpuiScopeView, ScopeHandle};
