use eframe::egui::{Color32, Painter, Pos2, Rect, Shape, Stroke, Vec2, vec2};

use super::CanvasFrame;

const ARROW_LENGTH: f32 = 10.5;
const ARROW_HALF_WIDTH: f32 = 5.25;

pub(super) fn world_to_screen(
    rect: Rect,
    canvas: CanvasFrame,
    pan: Vec2,
    zoom: f32,
    world: Vec2,
) -> Pos2 {
    rect.center() + pan + (world - canvas.center) * zoom
}

pub(super) fn screen_to_world(
    rect: Rect,
    canvas: CanvasFrame,
    pan: Vec2,
    zoom: f32,
    screen: Pos2,
) -> Vec2 {
    (screen - rect.center() - pan) / zoom + canvas.center
}

/// Shortens a link segment so both endpoints sit exactly on their node's
/// circular boundary. Returns None when the circles touch or overlap, in
/// which case there is nothing left to draw.
pub(super) fn trim_segment(
    source: Vec2,
    target: Vec2,
    source_radius: f32,
    target_radius: f32,
) -> Option<(Vec2, Vec2)> {
    let delta = target - source;
    let distance = delta.length();
    if distance <= source_radius + target_radius || distance <= 1e-3 {
        return None;
    }

    let unit = delta / distance;
    Some((source + unit * source_radius, target - unit * target_radius))
}

pub(super) fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let opacity = opacity.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (color.a() as f32 * opacity) as u8,
    )
}

pub(super) fn draw_arrowhead(
    painter: &Painter,
    tip: Pos2,
    direction: Vec2,
    zoom: f32,
    color: Color32,
) {
    let length = direction.length();
    if length <= 1e-3 {
        return;
    }

    let unit = direction / length;
    let perpendicular = vec2(-unit.y, unit.x);
    let base = tip - unit * (ARROW_LENGTH * zoom);
    let half = perpendicular * (ARROW_HALF_WIDTH * zoom);

    painter.add(Shape::convex_polygon(
        vec![tip, base + half, base - half],
        color,
        Stroke::NONE,
    ));
}
