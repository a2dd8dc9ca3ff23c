//! Terminal presentation: progress on stderr, the final answer on stdout.

pub mod output;
pub mod progress;
pub mod render;
mod theme;

pub use output::format_answer;
pub use progress::ProgressView;
pub use render::{RenderSink, Renderer};
