use egui::{Color32, FontId, Rounding, Stroke, Visuals};
use gantt_geometry::model::{TaskPriority, TaskStatus};

// ── Palette ──────────────────────────────────────────────────────────────────

pub const BG_DARK: Color32 = Color32::from_rgb(24, 24, 32);
pub const BG_PANEL: Color32 = Color32::from_rgb(30, 30, 40);
pub const BG_HEADER: Color32 = Color32::from_rgb(34, 37, 48);
pub const BG_FIELD: Color32 = Color32::from_rgb(20, 20, 28);
pub const BG_SELECTED: Color32 = Color32::from_rgba_premultiplied(80, 140, 220, 45);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(50, 52, 64);
pub const BORDER_ACCENT: Color32 = Color32::from_rgb(90, 140, 220);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(230, 232, 240);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(155, 160, 178);
pub const TEXT_DIM: Color32 = Color32::from_rgb(100, 105, 120);
pub const TEXT_ON_BAR: Color32 = Color32::from_rgb(255, 255, 255);

pub const ACCENT: Color32 = Color32::from_rgb(80, 140, 220);
pub const TODAY_LINE: Color32 = Color32::from_rgb(240, 75, 75);
pub const GRID_LINE: Color32 = Color32::from_rgb(44, 46, 58);
pub const HANDLE_COLOR: Color32 = Color32::from_rgb(255, 255, 255);
pub const CRITICAL: Color32 = Color32::from_rgb(255, 92, 92);
pub const DEPENDENCY: Color32 = Color32::from_rgb(140, 146, 170);

pub const PROGRESS_OVERLAY: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 55);

// ── Sizes ────────────────────────────────────────────────────────────────────

pub const HANDLE_WIDTH: f32 = 7.0;
pub const BAR_ROUNDING: f32 = 5.0;
pub const BAR_INSET: f32 = 3.0; // vertical inset so bars don't touch row edges
pub const SIDE_PANEL_WIDTH: f32 = 340.0;

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_header() -> FontId { FontId::proportional(12.0) }
pub fn font_sub() -> FontId { FontId::proportional(10.5) }
pub fn font_bar() -> FontId { FontId::proportional(11.5) }
pub fn font_small() -> FontId { FontId::proportional(9.5) }

// ── Domain colors ────────────────────────────────────────────────────────────

pub fn status_color(status: TaskStatus) -> Color32 {
    match status {
        TaskStatus::NotStarted => Color32::from_rgb(96, 125, 139),
        TaskStatus::InProgress => Color32::from_rgb(66, 133, 244),
        TaskStatus::Completed => Color32::from_rgb(52, 168, 83),
        TaskStatus::Blocked => Color32::from_rgb(229, 57, 53),
        TaskStatus::OnHold => Color32::from_rgb(251, 140, 0),
    }
}

pub fn priority_color(priority: TaskPriority) -> Color32 {
    match priority {
        TaskPriority::Low => TEXT_DIM,
        TaskPriority::Medium => TEXT_SECONDARY,
        TaskPriority::High => Color32::from_rgb(255, 193, 7),
        TaskPriority::Critical => CRITICAL,
    }
}

// ── Visuals ──────────────────────────────────────────────────────────────────

/// Fill, border and foreground of one widget interaction state.
fn widget_state(
    state: &mut egui::style::WidgetVisuals,
    fill: Color32,
    border: Color32,
    fg: Stroke,
) {
    state.bg_fill = fill;
    state.weak_bg_fill = fill;
    state.bg_stroke = Stroke::new(1.0, border);
    state.fg_stroke = fg;
    state.rounding = Rounding::same(4.0);
}

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.extreme_bg_color = BG_FIELD;

    let w = &mut visuals.widgets;
    widget_state(&mut w.noninteractive, BG_PANEL, BORDER_SUBTLE, Stroke::new(1.0, TEXT_SECONDARY));
    widget_state(&mut w.inactive, Color32::from_rgb(42, 44, 56), BORDER_SUBTLE, Stroke::new(1.0, TEXT_PRIMARY));
    widget_state(&mut w.hovered, Color32::from_rgb(52, 54, 68), ACCENT, Stroke::new(1.0, TEXT_PRIMARY));
    widget_state(&mut w.active, Color32::from_rgb(60, 62, 76), ACCENT, Stroke::new(2.0, Color32::WHITE));

    visuals.selection.bg_fill = BG_SELECTED;
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);
    visuals.window_rounding = Rounding::same(8.0);
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.striped = false;

    ctx.style_mut(|style| {
        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(8.0, 4.0);
        style.spacing.button_padding = egui::vec2(8.0, 4.0);
    });
}
