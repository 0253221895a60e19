use egui::{Color32, Context, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Theme configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub dark_mode: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self { dark_mode: false }
    }
}

/// Palette used by `apply_theme`
struct Palette {
    bg: Color32,
    panel_bg: Color32,
    widget_bg: Color32,
    hover: Color32,
    active: Color32,
    border: Color32,
    text: Color32,
}

impl Palette {
    fn dark() -> Self {
        Self {
            bg: Color32::from_rgb(23, 23, 23),
            panel_bg: Color32::from_rgb(31, 31, 31),
            widget_bg: Color32::from_rgb(40, 40, 40),
            hover: Color32::from_rgb(50, 50, 50),
            active: Color32::from_rgb(60, 60, 60),
            border: Color32::from_rgb(70, 70, 70),
            text: Color32::from_rgb(220, 220, 220),
        }
    }

    fn light() -> Self {
        Self {
            bg: Color32::from_rgb(255, 255, 255),
            panel_bg: Color32::from_rgb(248, 249, 250),
            widget_bg: Color32::from_rgb(233, 236, 239),
            hover: Color32::from_rgb(222, 226, 230),
            active: Color32::from_rgb(206, 212, 218),
            border: Color32::from_rgb(190, 195, 200),
            text: Color32::from_rgb(33, 37, 41),
        }
    }
}

/// Apply the dashboard theme
pub fn apply_theme(ctx: &Context, theme: &Theme) {
    let mut style = Style::default();
    let (mut visuals, palette) = if theme.dark_mode {
        (Visuals::dark(), Palette::dark())
    } else {
        (Visuals::light(), Palette::light())
    };
    let accent = accent_color();

    visuals.window_fill = palette.panel_bg;
    visuals.panel_fill = palette.panel_bg;
    visuals.extreme_bg_color = palette.bg;
    visuals.faint_bg_color = palette.widget_bg;

    for (widget, fill) in [
        (&mut visuals.widgets.noninteractive, palette.widget_bg),
        (&mut visuals.widgets.inactive, palette.widget_bg),
        (&mut visuals.widgets.hovered, palette.hover),
        (&mut visuals.widgets.active, palette.active),
    ] {
        widget.bg_fill = fill;
        widget.weak_bg_fill = fill;
        widget.bg_stroke = Stroke::new(1.0, palette.border);
        widget.fg_stroke = Stroke::new(1.0, palette.text);
        widget.rounding = Rounding::same(4.0);
    }
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, accent);

    visuals.selection.bg_fill = accent.linear_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, accent);
    visuals.hyperlink_color = accent;
    visuals.warn_fg_color = warning_color();
    visuals.error_fg_color = error_color();

    visuals.window_shadow.extrusion = 8.0;
    visuals.popup_shadow.extrusion = 4.0;

    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    style.spacing.menu_margin = egui::Margin::same(8.0);
    style.spacing.indent = 20.0;

    let mut font_sizes = BTreeMap::new();
    font_sizes.insert(TextStyle::Small, FontId::new(11.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Body, FontId::new(13.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Button, FontId::new(13.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace));
    style.text_styles = font_sizes;

    style.visuals = visuals;
    ctx.set_style(style);
}

/// Get the accent color for the theme
pub fn accent_color() -> Color32 {
    Color32::from_rgb(0, 102, 162)
}

/// Get the error color for the theme
pub fn error_color() -> Color32 {
    Color32::from_rgb(214, 62, 42)
}

/// Get the warning color for the theme
pub fn warning_color() -> Color32 {
    Color32::from_rgb(240, 147, 46)
}
