//! Run reconciler: folds normalized agent events into a [`RunState`].
//!
//! One `Reconciler` owns the state of one run. [`Reconciler::apply`] handles a
//! single event and reports whether the visible state changed, which is the
//! caller's cue to emit a progress snapshot. The reconciler itself never
//! fails: malformed input degrades to "nothing changed".
//!
//! Invariants maintained between events:
//! - at most one step is running;
//! - a tool call id appears at most once per run and completes at most once;
//! - the first error (snapshot `error_info`, `RUN_ERROR` or transport failure)
//!   is never overwritten.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::protocol::{AgentEvent, MessageHistory};
use crate::types::{
    generate_id, DocumentCheck, ErrorInfo, Step, StepStatus, ToolCall, ToolCallResult,
    ToolCallStatus,
};

pub mod labels;
pub mod snapshot;
mod state;

pub use state::{RunState, SnapshotView, TrackedDocument};

use labels::step;

/// Lifecycle phase of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Finished,
    Failed,
    Cancelled,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Failed | Self::Cancelled)
    }
}

/// How relevance checks are detected between two snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelevanceDetection {
    /// `is_checked` turned true, or `is_relevant` flipped for a known id.
    #[default]
    Transition,
    /// Any change of a known document record, or a new record already checked.
    Snapshot,
}

impl RelevanceDetection {
    fn triggers(self, prev: Option<&TrackedDocument>, doc: &TrackedDocument) -> bool {
        match (self, prev) {
            (Self::Transition, None) => doc.is_checked,
            (Self::Transition, Some(prev)) => {
                (doc.is_checked && !prev.is_checked) || doc.is_relevant != prev.is_relevant
            }
            (Self::Snapshot, None) => doc.is_checked,
            (Self::Snapshot, Some(prev)) => prev != doc,
        }
    }
}

#[derive(Debug)]
pub struct Reconciler {
    phase: Phase,
    state: RunState,
    relevance: RelevanceDetection,
    /// Assistant text of the current message.
    text: String,
    message_id: Option<String>,
    /// Last full agent-state document, the base for `STATE_DELTA`.
    agent_state: Value,
    /// Streamed argument text per open tool call.
    tool_args: HashMap<String, String>,
    /// Indices of steps created only to host a tool call.
    synthetic_steps: HashSet<usize>,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(RelevanceDetection::default())
    }
}

impl Reconciler {
    pub fn new(relevance: RelevanceDetection) -> Self {
        Self {
            phase: Phase::NotStarted,
            state: RunState::default(),
            relevance,
            text: String::new(),
            message_id: None,
            agent_state: Value::Object(Default::default()),
            tool_args: HashMap::new(),
            synthetic_steps: HashSet::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Locally accumulated assistant text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text for the next emitted answer: the local buffer, or the transport's
    /// history while no text has streamed yet.
    pub fn answer_text(&self, history: &MessageHistory) -> String {
        if self.text.is_empty() {
            history.latest_assistant_text().unwrap_or_default()
        } else {
            self.text.clone()
        }
    }

    /// Apply one event. Returns `true` when the visible state changed.
    pub fn apply(&mut self, event: AgentEvent, history: &MessageHistory) -> bool {
        if self.phase.is_terminal() {
            debug!(kind = event.kind(), phase = ?self.phase, "event after terminal phase ignored");
            return false;
        }
        if self.phase == Phase::NotStarted && !matches!(event, AgentEvent::RunStarted { .. }) {
            debug!(kind = event.kind(), "event before run start; starting run implicitly");
            self.start();
        }
        debug!(kind = event.kind(), "applying event");

        match event {
            AgentEvent::RunStarted { thread_id, run_id } => {
                info!(thread_id = ?thread_id, run_id = ?run_id, "run started");
                self.start();
                true
            }
            AgentEvent::StepStarted { name } => self.start_step(name),
            AgentEvent::StepFinished { name } => self.finish_step(&name),
            AgentEvent::TextDelta { message_id, delta } => self.append_text(message_id, &delta),
            AgentEvent::StateSnapshot { snapshot } => {
                self.agent_state = snapshot;
                self.reconcile_snapshot()
            }
            AgentEvent::StateDelta { operations } => {
                match snapshot::apply_patch(&self.agent_state, &operations) {
                    Ok(patched) => {
                        self.agent_state = patched;
                        self.reconcile_snapshot()
                    }
                    Err(e) => {
                        warn!(error = %e, "state delta dropped");
                        false
                    }
                }
            }
            AgentEvent::ToolCallStart { id, name, args } => self.start_tool_call(id, name, args),
            AgentEvent::ToolCallArgs { id, delta } => {
                self.tool_args.entry(id).or_default().push_str(&delta);
                false
            }
            AgentEvent::ToolCallEnd { id, name, args } => {
                self.finish_tool_call(&id, name.as_deref(), args)
            }
            AgentEvent::RunFinished => {
                self.finish_run(history);
                true
            }
            AgentEvent::RunError { message, code } => {
                self.fail_run(message, code);
                true
            }
        }
    }

    /// Stop processing events. The state is kept as last observed.
    pub fn cancel(&mut self) {
        if !self.phase.is_terminal() {
            info!("run cancelled");
            self.phase = Phase::Cancelled;
        }
    }

    /// Close the run after the transport failed.
    pub fn fail_transport(&mut self) {
        if self.phase.is_terminal() {
            return;
        }
        self.fail_running_steps();
        self.latch_error(ErrorInfo::server_error(labels::TRANSPORT_ERROR_MESSAGE));
        self.state.status = labels::STATUS_TRANSPORT_ERROR.to_string();
        self.text.clear();
        self.phase = Phase::Failed;
    }

    // -----------------------------------------------------------------------
    // Run lifecycle
    // -----------------------------------------------------------------------

    fn start(&mut self) {
        self.state = RunState {
            status: labels::STATUS_INITIALIZING.to_string(),
            ..RunState::default()
        };
        self.text.clear();
        self.message_id = None;
        self.agent_state = Value::Object(Default::default());
        self.tool_args.clear();
        self.synthetic_steps.clear();
        self.phase = Phase::Running;
    }

    fn finish_run(&mut self, history: &MessageHistory) {
        self.state.status.clear();
        for step in &mut self.state.steps {
            if step.is_running() {
                close_step(step, StepStatus::Completed);
            }
            complete_tool_calls(step);
        }
        if self.text.is_empty() {
            if let Some(text) = history.latest_assistant_text() {
                self.text = text;
            }
        }
        info!(steps = self.state.steps.len(), "run finished");
        self.phase = Phase::Finished;
    }

    fn fail_run(&mut self, message: Option<String>, code: Option<String>) {
        warn!(message = ?message, code = ?code, "run error");
        self.state.status = labels::STATUS_RUN_ERROR.to_string();
        self.fail_running_steps();
        let message = message
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| labels::DEFAULT_RUN_ERROR_MESSAGE.to_string());
        self.latch_error(ErrorInfo::server_error(message));
        self.phase = Phase::Failed;
    }

    fn fail_running_steps(&mut self) {
        for step in &mut self.state.steps {
            if step.is_running() {
                step.status = StepStatus::Failed;
            }
        }
    }

    /// First error wins.
    fn latch_error(&mut self, error: ErrorInfo) -> bool {
        if self.state.error_info.is_some() {
            return false;
        }
        self.state.error_info = Some(error);
        true
    }

    // -----------------------------------------------------------------------
    // Steps and text
    // -----------------------------------------------------------------------

    fn current_step_index(&self) -> Option<usize> {
        self.state.steps.iter().rposition(Step::is_running)
    }

    fn push_step(&mut self, step: Step) -> usize {
        if let Some(idx) = self.current_step_index() {
            debug!(closed = %self.state.steps[idx].name, opened = %step.name, "implicitly completing running step");
            close_step(&mut self.state.steps[idx], StepStatus::Completed);
        }
        self.state.steps.push(step);
        self.state.steps.len() - 1
    }

    fn start_step(&mut self, name: String) -> bool {
        self.state.status = labels::step_status(&name);
        let display = labels::display_name(&name).map(str::to_string);
        self.push_step(Step::running(name, display));
        true
    }

    fn finish_step(&mut self, name: &str) -> bool {
        let found = self
            .state
            .steps
            .iter_mut()
            .rev()
            .find(|step| step.name == name && step.is_running());
        match found {
            Some(step) => {
                close_step(step, StepStatus::Completed);
                true
            }
            None => {
                debug!(step = name, "finish for step that is not running");
                false
            }
        }
    }

    fn append_text(&mut self, message_id: Option<String>, delta: &str) -> bool {
        if message_id.is_some() && message_id != self.message_id {
            if self.message_id.is_some() {
                self.text.clear();
            }
            self.message_id = message_id;
        }
        self.text.push_str(delta);

        if let Some(idx) = self.current_step_index() {
            let current = &mut self.state.steps[idx];
            if current.name == step::MODEL {
                current.display_name = Some(labels::DISPLAY_GENERATING.to_string());
                self.state.status = labels::STATUS_GENERATING.to_string();
            } else if current.name == step::GUARD {
                current.display_name = Some(labels::DISPLAY_CHECKING_RESULTS.to_string());
                self.state.status = labels::STATUS_CHECKING_RESULTS.to_string();
            }
        }
        true
    }

    // -----------------------------------------------------------------------
    // Tool calls
    // -----------------------------------------------------------------------

    fn start_tool_call(&mut self, id: String, name: String, args: Option<String>) -> bool {
        if self.find_tool_call(&id).is_some() {
            debug!(tool_call_id = %id, "duplicate tool call start ignored");
            return false;
        }
        let idx = match self.current_step_index() {
            Some(idx) => idx,
            None => {
                let display = labels::display_name(&name)
                    .map(str::to_string)
                    .unwrap_or_else(|| name.clone());
                let idx = self.push_step(Step::running(name.clone(), Some(display)));
                self.synthetic_steps.insert(idx);
                idx
            }
        };
        self.state.status = labels::tool_status(&name);
        let mut call = ToolCall::running(id, name);
        call.args = args.as_deref().and_then(finalize_args);
        self.state.steps[idx].tool_calls.push(call);
        true
    }

    fn finish_tool_call(&mut self, id: &str, name: Option<&str>, args: Option<String>) -> bool {
        let location = self.find_tool_call(id).or_else(|| {
            let name = name?;
            self.state.steps.iter().enumerate().rev().find_map(|(s, step)| {
                step.tool_calls
                    .iter()
                    .rposition(|call| call.name == name && call.status == ToolCallStatus::Running)
                    .map(|c| (s, c))
            })
        });
        let Some((s, c)) = location else {
            debug!(tool_call_id = id, "end for unknown tool call");
            return false;
        };

        let streamed = self.tool_args.remove(&self.state.steps[s].tool_calls[c].id);
        let call = &mut self.state.steps[s].tool_calls[c];
        if call.status != ToolCallStatus::Running {
            return false;
        }
        if let Some(args) = args.or(streamed).as_deref().and_then(finalize_args) {
            call.args = Some(args);
        }
        call.status = ToolCallStatus::Completed;

        if self.synthetic_steps.contains(&s) && self.state.steps[s].is_running() {
            close_step(&mut self.state.steps[s], StepStatus::Completed);
        }
        true
    }

    fn find_tool_call(&self, id: &str) -> Option<(usize, usize)> {
        if id.is_empty() {
            return None;
        }
        self.state.steps.iter().enumerate().find_map(|(s, step)| {
            step.tool_calls
                .iter()
                .position(|call| call.id == id)
                .map(|c| (s, c))
        })
    }

    // -----------------------------------------------------------------------
    // Snapshot diffing
    // -----------------------------------------------------------------------

    fn reconcile_snapshot(&mut self) -> bool {
        let view = SnapshotView::from_value(&self.agent_state);
        let mut changed = false;

        if !view.user_query.is_empty() && view.user_query != self.state.user_query {
            self.state.user_query = view.user_query.clone();
            changed = true;
        }

        let known: HashSet<&str> = self
            .state
            .tracked_documents
            .iter()
            .map(|doc| doc.id.as_str())
            .collect();
        let new_documents: Vec<_> = view
            .documents
            .iter()
            .filter(|doc| !doc.id.is_empty() && !known.contains(doc.id.as_str()))
            .map(TrackedDocument::to_document)
            .collect();
        if !new_documents.is_empty() {
            debug!(count = new_documents.len(), "new documents in snapshot");
            self.attach_result(ToolCallResult {
                documents: new_documents,
                proposals: view.proposals.clone(),
            });
            self.state.status = labels::STATUS_DOCUMENTS_FOUND.to_string();
            changed = true;
        }

        for doc in &view.documents {
            let prev = self
                .state
                .tracked_documents
                .iter()
                .find(|prev| prev.id == doc.id);
            if !self.relevance.triggers(prev, doc) {
                continue;
            }
            self.record_check(doc);
            changed = true;
        }

        if !changed
            && !view.proposals.is_empty()
            && view.proposals.len() != self.state.tracked_proposals.len()
        {
            changed = true;
        }

        if let Some(error) = view.error_info {
            let message = error.message.clone();
            if self.latch_error(error) {
                self.state.status = message;
                changed = true;
            }
        }

        self.state.tracked_documents = view.documents;
        self.state.tracked_proposals = view.proposals;
        changed
    }

    /// Attach a tool result to the running tool-bearing step, or else the
    /// running step.
    fn attach_result(&mut self, result: ToolCallResult) {
        let steps = &mut self.state.steps;
        let target = steps
            .iter()
            .rposition(|s| s.is_running() && step::is_tool_bearing(&s.name))
            .or_else(|| steps.iter().rposition(Step::is_running));
        let Some(idx) = target else {
            debug!("no running step for tool result");
            return;
        };
        let target = &mut steps[idx];
        match target
            .tool_calls
            .iter_mut()
            .find(|call| call.status == ToolCallStatus::Running)
        {
            Some(call) => call.result = Some(result),
            None => {
                let mut call = ToolCall::running(generate_id(), step::RETRIEVE_DOCUMENTS);
                call.result = Some(result);
                target.tool_calls.push(call);
            }
        }
    }

    /// Upsert a relevance check on the step that carries document checks.
    fn record_check(&mut self, doc: &TrackedDocument) {
        let steps = &mut self.state.steps;
        let target = steps
            .iter()
            .rposition(|s| s.name == step::RETRIEVE_DOCUMENTS)
            .or_else(|| steps.iter().rposition(|s| !s.document_checks.is_empty()))
            .or_else(|| steps.iter().rposition(Step::is_running));
        let Some(idx) = target else {
            debug!(document = %doc.id, "no step for relevance check");
            return;
        };

        let name = doc.check_name();
        let url = doc.check_url();
        let checks = &mut steps[idx].document_checks;
        match checks.iter_mut().find(|check| check.name == name) {
            Some(check) => {
                check.relevant = doc.is_relevant;
                check.reason = doc.relevance_reason.clone();
                if url.is_some() {
                    check.url = url;
                }
            }
            None => checks.push(DocumentCheck {
                name: name.clone(),
                relevant: doc.is_relevant,
                reason: doc.relevance_reason.clone(),
                url,
            }),
        }
        self.state.status = labels::checking_status(&name);
    }
}

fn close_step(step: &mut Step, status: StepStatus) {
    step.status = status;
    complete_tool_calls(step);
}

fn complete_tool_calls(step: &mut Step) {
    for call in &mut step.tool_calls {
        call.status = ToolCallStatus::Completed;
    }
}

/// Normalize streamed tool arguments for display: the `query` string when
/// present, compact JSON for other non-empty objects, raw text otherwise.
fn finalize_args(raw: &str) -> Option<String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => match map.get("query") {
            Some(Value::String(query)) => Some(query.clone()),
            _ if map.is_empty() => None,
            _ => Some(Value::Object(map).to_string()),
        },
        _ => {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
    }
}
