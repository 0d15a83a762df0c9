//! Console color palette
//!
//! All components pull their colors from here so that screens stay
//! visually consistent.

use ratatui::style::Color;

/// Color palette for console elements
pub struct Palette;

impl Palette {
    // === Text ===

    /// Focused label text, active tab, active content
    pub const ACTIVE: Color = Color::White;

    /// Unfocused label text, inactive content, unfocused borders
    pub const INACTIVE: Color = Color::Gray;

    /// Disabled items
    pub const DISABLED: Color = Color::DarkGray;

    /// Highlighted tab foreground
    pub const TAB_HIGHLIGHT_FG: Color = Color::Black;

    // === Status ===

    pub const SUCCESS: Color = Color::LightGreen;

    pub const WARNING: Color = Color::LightYellow;

    pub const ERROR: Color = Color::Red;

    // === Accents ===

    pub const GREEN: Color = Color::Green;
    pub const YELLOW: Color = Color::Yellow;
    pub const BLUE: Color = Color::Blue;
    pub const LIGHT_BLUE: Color = Color::LightBlue;
    pub const PURPLE: Color = Color::Magenta;
    pub const LIGHT_PURPLE: Color = Color::LightMagenta;
    pub const AQUA: Color = Color::Cyan;
    pub const LIGHT_AQUA: Color = Color::LightCyan;
    pub const LIGHT_RED: Color = Color::LightRed;
}
