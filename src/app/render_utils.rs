use eframe::egui::{Color32, Pos2, Rect, Vec2};

/// Drawn radius for a node. The collision force derives its radius from
/// this same formula, so layout spacing and rendering stay in sync.
pub(super) fn node_radius(keyword_count: usize) -> f32 {
    5.0 + ((keyword_count as f32).sqrt() * 3.0)
}

pub(super) fn link_width(value: usize) -> f32 {
    (value as f32).sqrt() * 2.0
}

/// Fill color from the first keyword matching a known research category,
/// gray when none does.
pub(super) fn keyword_color(keywords: &[String]) -> Color32 {
    for keyword in keywords {
        let color = match keyword.as_str() {
            "Microgravity" => Some(Color32::from_rgb(0x3b, 0x82, 0xf6)),
            "Space Mission" => Some(Color32::from_rgb(0x8b, 0x5c, 0xf6)),
            "Biomedical Research" => Some(Color32::from_rgb(0x10, 0xb9, 0x81)),
            "Mice" => Some(Color32::from_rgb(0xf5, 0x9e, 0x0b)),
            "Training" => Some(Color32::from_rgb(0xef, 0x44, 0x44)),
            "In Vivo" => Some(Color32::from_rgb(0xec, 0x48, 0x99)),
            "In Vitro" => Some(Color32::from_rgb(0x06, 0xb6, 0xd4)),
            _ => None,
        };
        if let Some(color) = color {
            return color;
        }
    }
    Color32::from_rgb(0x6b, 0x72, 0x80)
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + (world * zoom)
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}
