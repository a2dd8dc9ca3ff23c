//! Rendering contract and the default terminal renderer.
//!
//! Progress goes to stderr so stdout carries only the final answer.

use crossterm::style::Stylize;

use super::theme;

/// Injectable rendering interface used by the progress view.
///
/// `Renderer` is the terminal implementation; tests substitute a recording
/// sink.
pub trait RenderSink: Send + Sync {
    /// Render a status label change.
    fn status(&self, text: &str);
    /// Render a step that started.
    fn step_started(&self, name: &str);
    /// Render a step that ended, successfully or not.
    fn step_finished(&self, name: &str, failed: bool);
    /// Render one key/value field row.
    fn field(&self, key: &str, value: &str);
    /// Render additional detail text.
    fn detail(&self, text: &str);
    /// Render a warning line.
    fn warn(&self, msg: &str);
    /// Render an error line.
    fn error(&self, msg: &str);
}

/// Terminal renderer writing to stderr.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl RenderSink for Renderer {
    fn status(&self, text: &str) {
        if self.color {
            eprintln!(
                "\r{} {}",
                theme::GLYPH_STATUS.with(theme::color_status()),
                text.with(theme::color_status()).bold()
            );
        } else {
            eprintln!("\r{} {text}", theme::GLYPH_STATUS);
        }
    }

    fn step_started(&self, name: &str) {
        if self.color {
            eprintln!(
                "\r{}{} {}",
                theme::INDENT_1,
                theme::GLYPH_STEP_RUNNING.with(theme::color_step()),
                name.with(theme::color_step())
            );
        } else {
            eprintln!("\r{}{} {name}", theme::INDENT_1, theme::GLYPH_STEP_RUNNING);
        }
    }

    fn step_finished(&self, name: &str, failed: bool) {
        let glyph = if failed {
            theme::GLYPH_STEP_FAILED
        } else {
            theme::GLYPH_STEP_DONE
        };
        if self.color {
            let color = if failed {
                theme::color_error()
            } else {
                theme::color_done()
            };
            eprintln!("\r{}{} {name}", theme::INDENT_1, glyph.with(color));
        } else {
            eprintln!("\r{}{glyph} {name}", theme::INDENT_1);
        }
    }

    fn field(&self, key: &str, value: &str) {
        if self.color {
            eprintln!(
                "\r{}{} {value}",
                theme::INDENT_2,
                format!("{key}:").with(theme::color_field_key()),
            );
        } else {
            eprintln!("\r{}{key}: {value}", theme::INDENT_2);
        }
    }

    fn detail(&self, text: &str) {
        if self.color {
            eprintln!("\r{}{}", theme::INDENT_2, text.with(theme::color_detail()));
        } else {
            eprintln!("\r{}{text}", theme::INDENT_2);
        }
    }

    fn warn(&self, msg: &str) {
        if self.color {
            eprintln!(
                "\r{} {msg}",
                theme::LABEL_WARNING.with(theme::color_warning()).bold()
            );
        } else {
            eprintln!("\r{} {msg}", theme::LABEL_WARNING);
        }
    }

    fn error(&self, msg: &str) {
        if self.color {
            eprintln!(
                "\r{} {msg}",
                theme::LABEL_ERROR.with(theme::color_error()).bold()
            );
        } else {
            eprintln!("\r{} {msg}", theme::LABEL_ERROR);
        }
    }
}
