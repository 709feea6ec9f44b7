use gpui::{
    BorderStyle, Bounds, ContentMask, Corners, Edges, PathBuilder, Pixels, Window, point, px, quad,
};

use crate::geom::{ScreenPoint, ScreenRect};
use crate::render::{Color, LineSegment, LineStyle};

use super::frame::{PaintCommand, ScopeFrame};

pub(crate) fn paint_frame(frame: &ScopeFrame, window: &mut Window) {
    let Some(screen) = frame.screen else {
        return;
    };
    if let Some(background) = frame.background {
        paint_fill(window, screen, background);
    }
    let mask = ContentMask {
        bounds: to_bounds(screen),
    };
    window.with_content_mask(Some(mask), |window| {
        for command in &frame.commands {
            match command {
                PaintCommand::Lines { segments, style } => paint_lines(window, segments, *style),
                PaintCommand::Dots {
                    points,
                    color,
                    size,
                } => paint_dots(window, points, *color, *size),
            }
        }
    });
}

fn paint_lines(window: &mut Window, segments: &[LineSegment], style: LineStyle) {
    if segments.is_empty() {
        return;
    }
    let width = style.width.max(0.5);
    let mut builder = PathBuilder::stroke(px(width));
    for segment in segments {
        builder.move_to(point(px(segment.start.x), px(segment.start.y)));
        builder.line_to(point(px(segment.end.x), px(segment.end.y)));
    }
    if let Ok(path) = builder.build() {
        window.paint_path(path, to_rgba(style.color));
    }
}

fn paint_dots(window: &mut Window, points: &[ScreenPoint], color: Color, size: f32) {
    let half = size.max(1.0) * 0.5;
    for pt in points {
        let bounds = Bounds::from_corners(
            point(px(pt.x - half), px(pt.y - half)),
            point(px(pt.x + half), px(pt.y + half)),
        );
        window.paint_quad(quad(
            bounds,
            Corners::all(px(0.0)),
            to_rgba(color),
            Edges::all(px(0.0)),
            to_rgba(color),
            BorderStyle::default(),
        ));
    }
}

fn paint_fill(window: &mut Window, rect: ScreenRect, color: Color) {
    window.paint_quad(quad(
        to_bounds(rect),
        Corners::all(px(0.0)),
        to_rgba(color),
        Edges::all(px(0.0)),
        to_rgba(color),
        BorderStyle::default(),
    ));
}

fn to_rgba(color: Color) -> gpui::Rgba {
    gpui::Rgba {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}

pub(crate) fn to_hsla(color: Color) -> gpui::Hsla {
    gpui::Hsla::from(to_rgba(color))
}

fn to_bounds(rect: ScreenRect) -> Bounds<Pixels> {
    Bounds::from_corners(
        point(px(rect.min.x), px(rect.min.y)),
        point(px(rect.max.x), px(rect.max.y)),
    )
}
