use colored::Color;
use comfy_table::Color as TableColor;
use once_cell::sync::Lazy;

/// Terminal colors for messages and help text.
pub struct ColorTheme {
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub info: Color,
    pub highlight: Color,
    pub muted: Color,
    pub primary: Color,
    pub secondary: Color,
    /// Environment variable names in the help appendix.
    pub key: Color,
    pub value: Color,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: Color::Green,
            error: Color::Red,
            warning: Color::Yellow,
            info: Color::Blue,
            highlight: Color::Cyan,
            muted: Color::BrightBlack,
            primary: Color::BrightBlue,
            secondary: Color::Magenta,
            key: Color::BrightCyan,
            value: Color::White,
        }
    }
}

pub static THEME: Lazy<ColorTheme> = Lazy::new(ColorTheme::default);

/// Cell tints for result tables.
pub struct TablePalette {
    pub header: TableColor,
    /// A code that would be written to a record.
    pub written: TableColor,
    pub applied: TableColor,
    /// Skipped handlers and untouched codes.
    pub muted: TableColor,
    pub failed: TableColor,
}

pub const TABLE: TablePalette = TablePalette {
    header: TableColor::Cyan,
    written: TableColor::Yellow,
    applied: TableColor::Green,
    muted: TableColor::DarkGrey,
    failed: TableColor::Red,
};

pub struct Icons {
    pub success: &'static str,
    pub error: &'static str,
    pub warning: &'static str,
    pub info: &'static str,
    pub arrow: &'static str,
    /// Handler changed the record or issued an update.
    pub applied: &'static str,
    /// Handler did not match the event's data.
    pub skipped: &'static str,
}

pub const ICONS: Icons = Icons {
    success: "✓",
    error: "✗",
    warning: "⚠",
    info: "ℹ",
    arrow: "→",
    applied: "~",
    skipped: "-",
};
