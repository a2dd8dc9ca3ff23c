//! Final answer formatting for stdout.

use crate::answer::Answer;

use super::theme;

/// Plain-text rendering of a final answer: the response, then the sources.
pub fn format_answer(answer: &Answer) -> String {
    let mut out = answer.response.trim_end().to_string();

    if !answer.documents.is_empty() {
        out.push_str(&format!("\n\n{}:", theme::LABEL_DOCUMENTS));
        for doc in &answer.documents {
            out.push_str(&format!("\n{}- {}", theme::INDENT_1, doc.name));
            if !doc.ris_url.is_empty() {
                out.push_str(&format!(" <{}>", doc.ris_url));
            }
        }
    }

    if !answer.proposals.is_empty() {
        out.push_str(&format!("\n\n{}:", theme::LABEL_PROPOSALS));
        for proposal in &answer.proposals {
            let name = if proposal.name.is_empty() {
                &proposal.identifier
            } else {
                &proposal.name
            };
            out.push_str(&format!("\n{}- {name}", theme::INDENT_1));
            if !proposal.ris_url.is_empty() {
                out.push_str(&format!(" <{}>", proposal.ris_url));
            }
        }
    }

    if let Some(error) = &answer.error_info {
        if !error.message.is_empty() && error.message != answer.response {
            out.push_str(&format!("\n\n{}", error.message));
        }
        if let Some(suggestions) = error.suggestions.as_deref().filter(|s| !s.is_empty()) {
            out.push_str(&format!("\n{}:", theme::LABEL_SUGGESTIONS));
            for suggestion in suggestions {
                out.push_str(&format!("\n{}- {suggestion}", theme::INDENT_1));
            }
        }
    }

    out.trim_start().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Document, ErrorInfo, ErrorType, Proposal};

    #[test]
    fn lists_sources_after_response() {
        let answer = Answer {
            response: "Es gibt zwei Anträge.\n".into(),
            documents: vec![Document {
                name: "Antrag Radweg".into(),
                ris_url: "https://ris.example/1".into(),
                ..Document::default()
            }],
            proposals: vec![Proposal {
                identifier: "20-26 / A 01".into(),
                ..Proposal::default()
            }],
            ..Answer::default()
        };
        assert_eq!(
            format_answer(&answer),
            "Es gibt zwei Anträge.\n\nDokumente:\n  - Antrag Radweg <https://ris.example/1>\n\nVorschläge:\n  - 20-26 / A 01"
        );
    }

    #[test]
    fn error_only_answer_shows_message_and_suggestions() {
        let answer = Answer {
            error_info: Some(ErrorInfo {
                error_type: ErrorType::NoRelevantDocuments,
                message: "Keine passenden Dokumente.".into(),
                suggestions: Some(vec!["Zeitraum angeben".into()]),
                details: None,
            }),
            ..Answer::default()
        };
        assert_eq!(
            format_answer(&answer),
            "Keine passenden Dokumente.\nVorschläge zur Umformulierung:\n  - Zeitraum angeben"
        );
    }
}
