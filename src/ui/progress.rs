//! Progress view: turns consecutive answer snapshots into render calls.
//!
//! Snapshots are complete, so the view diffs each one against the previous
//! and renders only what changed. Steps only ever get appended, which lets
//! the diff pair them by position.

use crate::answer::Answer;
use crate::types::{DocumentCheck, Step, StepStatus, ToolCall};

use super::render::RenderSink;
use super::theme;

#[derive(Debug, Default)]
pub struct ProgressView {
    last: Option<Answer>,
}

impl ProgressView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the difference between the previous snapshot and `answer`.
    pub fn update(&mut self, sink: &dyn RenderSink, answer: &Answer) {
        let empty = Answer::default();
        let prev = self.last.as_ref().unwrap_or(&empty);

        let status = answer.status.as_deref().unwrap_or_default();
        if !status.is_empty() && Some(status) != prev.status.as_deref() {
            sink.status(status);
        }

        let prev_steps = prev.steps.as_deref().unwrap_or_default();
        for (idx, step) in answer.steps.as_deref().unwrap_or_default().iter().enumerate() {
            render_step(sink, prev_steps.get(idx), step);
        }

        if prev.error_info.is_none() {
            if let Some(error) = &answer.error_info {
                sink.error(&error.message);
                for suggestion in error.suggestions.iter().flatten() {
                    sink.detail(suggestion);
                }
            }
        }

        self.last = Some(answer.clone());
    }
}

fn step_label(step: &Step) -> &str {
    step.display_name.as_deref().unwrap_or(&step.name)
}

fn render_step(sink: &dyn RenderSink, prev: Option<&Step>, step: &Step) {
    if prev.is_none() {
        sink.step_started(step_label(step));
    }

    for call in &step.tool_calls {
        let prev_call = prev.and_then(|p| p.tool_calls.iter().find(|c| c.id == call.id));
        render_tool_call(sink, prev_call, call);
    }

    for check in &step.document_checks {
        let prev_check =
            prev.and_then(|p| p.document_checks.iter().find(|c| c.name == check.name));
        if prev_check != Some(check) {
            render_check(sink, check);
        }
    }

    let was_running = prev.map_or(true, Step::is_running);
    if was_running && !step.is_running() {
        sink.step_finished(step_label(step), step.status == StepStatus::Failed);
    }
}

fn render_tool_call(sink: &dyn RenderSink, prev: Option<&ToolCall>, call: &ToolCall) {
    if prev.is_none() {
        sink.field("Werkzeug", &call.name);
    }
    let had_args = prev.is_some_and(|p| p.args.is_some());
    if let (false, Some(args)) = (had_args, call.args.as_deref()) {
        sink.field("Anfrage", args);
    }
    let had_result = prev.is_some_and(|p| p.result.is_some());
    if let (false, Some(result)) = (had_result, call.result.as_ref()) {
        sink.detail(&format!(
            "{} {}",
            result.documents.len(),
            theme::LABEL_DOCUMENTS
        ));
    }
}

fn render_check(sink: &dyn RenderSink, check: &DocumentCheck) {
    let glyph = if check.relevant {
        theme::GLYPH_RELEVANT
    } else {
        theme::GLYPH_IRRELEVANT
    };
    if check.reason.is_empty() {
        sink.detail(&format!("{glyph} {}", check.name));
    } else {
        sink.detail(&format!("{glyph} {}: {}", check.name, check.reason));
    }
}
