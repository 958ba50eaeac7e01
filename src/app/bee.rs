use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, vec2};

const ORBIT_RADIUS: f32 = 30.0;
const ORBIT_STEP: f32 = 0.1;
const CHASE_LAG: f32 = 0.08;
const EDGE_MARGIN: f32 = 12.0;

/// Cursor-following decoration: orbits the pointer and chases it with
/// deliberate lag while the pointer stays inside the graph panel.
pub(in crate::app) struct BeeState {
    pos: Vec2,
    angle: f32,
    active: bool,
}

impl BeeState {
    pub(in crate::app) fn new() -> Self {
        Self {
            pos: Vec2::ZERO,
            angle: 0.0,
            active: false,
        }
    }

    pub(in crate::app) fn update(&mut self, rect: Rect, pointer: Option<Pos2>) -> bool {
        let Some(pointer) = pointer.filter(|pointer| rect.contains(*pointer)) else {
            self.active = false;
            return false;
        };

        let local = pointer - rect.min;
        if !self.active {
            self.pos = local;
            self.active = true;
        }

        self.angle += ORBIT_STEP;
        let target = local + vec2(self.angle.cos(), self.angle.sin()) * ORBIT_RADIUS;
        self.pos += (target - self.pos) * CHASE_LAG;

        let max_x = (rect.width() - EDGE_MARGIN).max(EDGE_MARGIN);
        let max_y = (rect.height() - EDGE_MARGIN).max(EDGE_MARGIN);
        self.pos.x = self.pos.x.clamp(EDGE_MARGIN, max_x);
        self.pos.y = self.pos.y.clamp(EDGE_MARGIN, max_y);
        true
    }

    pub(in crate::app) fn draw(&self, painter: &Painter, rect: Rect) {
        if !self.active {
            return;
        }

        let center = rect.min + self.pos;
        let wing = Color32::from_rgba_unmultiplied(198, 219, 255, 160);
        painter.circle_filled(center + vec2(-3.0, -6.5), 3.5, wing);
        painter.circle_filled(center + vec2(3.0, -6.5), 3.5, wing);

        painter.circle_filled(center, 6.0, Color32::from_rgb(240, 195, 60));
        let stripe = Stroke::new(1.8, Color32::from_rgb(60, 48, 20));
        painter.line_segment(
            [center + vec2(-2.0, -5.2), center + vec2(-2.0, 5.2)],
            stripe,
        );
        painter.line_segment([center + vec2(2.0, -5.2), center + vec2(2.0, 5.2)], stripe);
    }
}
