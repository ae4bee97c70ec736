//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::{Theme, Variant};

/// Column background for the red variant (#ebd9d8).
pub const COLUMN_RED: Color = Color::Rgb(0xeb, 0xd9, 0xd8);
/// Column background for the blue variant (#d0ebeb).
pub const COLUMN_BLUE: Color = Color::Rgb(0xd0, 0xeb, 0xeb);
/// Column background for the green variant (#ddebd8).
pub const COLUMN_GREEN: Color = Color::Rgb(0xdd, 0xeb, 0xd8);

/// Near-black text drawn on the pale column colours.
pub const INK: Color = Color::Rgb(20, 20, 20);

/// Colour of a column variant.
pub fn variant_color(variant: Variant) -> Color {
    match variant {
        Variant::Red => COLUMN_RED,
        Variant::Blue => COLUMN_BLUE,
        Variant::Green => COLUMN_GREEN,
    }
}

/// Background and border colours of an alert box.
pub fn alert_colors(theme: Theme) -> (Color, Color) {
    match theme {
        Theme::Light => (Color::Rgb(0xe7, 0xe7, 0xe7), Color::Rgb(95, 95, 95)),
        Theme::Dark => (Color::Rgb(0x57, 0x57, 0x57), Color::Rgb(0x92, 0x92, 0x92)),
    }
}

/// Background and text colours of an input field.
pub fn input_colors(theme: Theme) -> (Color, Color) {
    match theme {
        Theme::Light => (Color::White, INK),
        Theme::Dark => (Color::DarkGray, Color::White),
    }
}
