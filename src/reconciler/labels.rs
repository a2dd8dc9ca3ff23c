//! User-facing status and display labels.
//!
//! The presentation layer shows these verbatim, so they are part of the
//! outbound contract and stay in German.

pub const STATUS_INITIALIZING: &str = "Initialisiere...";
pub const STATUS_GENERATING: &str = "Generiere Antwort...";
pub const STATUS_CHECKING_RESULTS: &str = "Prüfe Ergebnisse...";
pub const STATUS_DOCUMENTS_FOUND: &str = "Dokumente gefunden.";
pub const STATUS_RUN_ERROR: &str = "Fehler aufgetreten.";
pub const STATUS_TRANSPORT_ERROR: &str = "Fehler";

pub const DISPLAY_GENERATING: &str = "Antwort generieren";
pub const DISPLAY_CHECKING_RESULTS: &str = "Ergebnisse prüfen";

pub const DEFAULT_RUN_ERROR_MESSAGE: &str =
    "Ein Serverfehler ist aufgetreten. Bitte versuchen Sie es später erneut.";
pub const TRANSPORT_ERROR_MESSAGE: &str = "Ein Fehler ist bei der Verarbeitung Ihrer Anfrage aufgetreten. Bitte versuchen Sie es später erneut.";

/// Step names the backend uses for its well-known graph nodes.
pub mod step {
    pub const MODEL: &str = "model";
    pub const GUARD: &str = "guard";
    pub const RETRIEVE_DOCUMENTS: &str = "retrieve_documents";
    pub const GET_AGENT_CAPABILITIES: &str = "get_agent_capabilities";

    /// Steps whose tool calls produce documents.
    pub fn is_tool_bearing(name: &str) -> bool {
        name == RETRIEVE_DOCUMENTS || name == GET_AGENT_CAPABILITIES
    }
}

fn known_status(name: &str) -> Option<&'static str> {
    match name {
        step::MODEL => Some("Denke nach..."),
        step::GUARD => Some(STATUS_CHECKING_RESULTS),
        step::RETRIEVE_DOCUMENTS => Some("Suche Dokumente..."),
        step::GET_AGENT_CAPABILITIES => Some("Lade Fähigkeiten..."),
        _ => None,
    }
}

/// Status shown while a step is running.
pub fn step_status(name: &str) -> String {
    known_status(name)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Verarbeite Schritt: {name}"))
}

/// Status shown while a tool call is running.
pub fn tool_status(name: &str) -> String {
    known_status(name)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Verwende Werkzeug: {name}"))
}

/// Display name for a step, if it has one.
pub fn display_name(name: &str) -> Option<&'static str> {
    match name {
        step::MODEL => Some("Denke nach"),
        step::GUARD => Some(DISPLAY_CHECKING_RESULTS),
        step::GET_AGENT_CAPABILITIES => Some("Fähigkeiten abrufen"),
        step::RETRIEVE_DOCUMENTS => Some("Dokumente suchen"),
        _ => None,
    }
}

/// Status shown while a document's relevance is being checked.
pub fn checking_status(document: &str) -> String {
    format!("Prüfe: {document}…")
}
