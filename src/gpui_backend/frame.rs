use gpui::{Bounds, Pixels};

use crate::geom::{ScreenPoint, ScreenRect};
use crate::interaction::ViewKind;
use crate::render::{
    Color, LineSegment, LineStyle, RenderCommand, build_line_pairs, build_line_segments,
    build_scatter_points, build_scene,
};
use crate::scope::Scope;
use crate::transform::Transform;

use super::config::ScopeViewConfig;
use super::state::ScopeUiState;

/// Draw command in screen space, clipped to the view.
#[derive(Debug, Clone)]
pub(crate) enum PaintCommand {
    Lines {
        segments: Vec<LineSegment>,
        style: LineStyle,
    },
    Dots {
        points: Vec<ScreenPoint>,
        color: Color,
        size: f32,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct ScopeFrame {
    pub(crate) screen: Option<ScreenRect>,
    pub(crate) background: Option<Color>,
    pub(crate) commands: Vec<PaintCommand>,
}

pub(crate) fn build_frame(
    scope: &Scope,
    view: ViewKind,
    state: &mut ScopeUiState,
    config: &ScopeViewConfig,
    bounds: Bounds<Pixels>,
) -> ScopeFrame {
    let background = config.paint_background.then(|| scope.theme().background);
    let min = ScreenPoint::new(f32::from(bounds.origin.x), f32::from(bounds.origin.y));
    let screen = ScreenRect::new(
        min,
        ScreenPoint::new(
            min.x + f32::from(bounds.size.width),
            min.y + f32::from(bounds.size.height),
        ),
    );

    state.transform = Transform::new(&scope.settings().grid, screen);
    let Some(transform) = state.transform.as_ref() else {
        return ScopeFrame {
            screen: None,
            background,
            commands: Vec::new(),
        };
    };

    let scene = build_scene(scope, view);
    let mut commands = Vec::with_capacity(scene.commands().len());
    for command in scene.commands() {
        match command {
            RenderCommand::LineStrip { points, style } => {
                let mut segments = Vec::new();
                build_line_segments(points, false, transform, screen, &mut segments);
                commands.push(lines(segments, *style, config));
            }
            RenderCommand::LineLoop { points, style } => {
                let mut segments = Vec::new();
                build_line_segments(points, true, transform, screen, &mut segments);
                commands.push(lines(segments, *style, config));
            }
            RenderCommand::Lines { points, style } => {
                let mut segments = Vec::new();
                build_line_pairs(points, transform, screen, &mut segments);
                commands.push(lines(segments, *style, config));
            }
            RenderCommand::Points { points, style } => {
                let mut dots = Vec::new();
                build_scatter_points(points, transform, screen, &mut dots);
                commands.push(PaintCommand::Dots {
                    points: dots,
                    color: style.color,
                    size: style.size.max(config.point_size),
                });
            }
        }
    }

    ScopeFrame {
        screen: Some(screen),
        background,
        commands,
    }
}

fn lines(segments: Vec<LineSegment>, style: LineStyle, config: &ScopeViewConfig) -> PaintCommand {
    PaintCommand::Lines {
        segments,
        style: LineStyle::new(style.color, style.width * config.line_width_scale),
    }
}
