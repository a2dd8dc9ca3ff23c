//! Glyphs, labels and colors for terminal progress output.

use crossterm::style::Color;

pub const INDENT_1: &str = "  ";
pub const INDENT_2: &str = "    ";

pub const GLYPH_STATUS: &str = "•";
pub const GLYPH_STEP_RUNNING: &str = "▸";
pub const GLYPH_STEP_DONE: &str = "✓";
pub const GLYPH_STEP_FAILED: &str = "✗";
pub const GLYPH_RELEVANT: &str = "+";
pub const GLYPH_IRRELEVANT: &str = "-";

pub const LABEL_WARNING: &str = "warning:";
pub const LABEL_ERROR: &str = "error:";
pub const LABEL_DOCUMENTS: &str = "Dokumente";
pub const LABEL_PROPOSALS: &str = "Vorschläge";
pub const LABEL_SUGGESTIONS: &str = "Vorschläge zur Umformulierung";

pub fn color_status() -> Color {
    Color::Cyan
}

pub fn color_step() -> Color {
    Color::Blue
}

pub fn color_done() -> Color {
    Color::Green
}

pub fn color_field_key() -> Color {
    Color::DarkGrey
}

pub fn color_detail() -> Color {
    Color::Grey
}

pub fn color_warning() -> Color {
    Color::Yellow
}

pub fn color_error() -> Color {
    Color::Red
}
