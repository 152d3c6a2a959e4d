//! Prompt assembly for every model call.
//!
//! Templates live in `prompts/` and are compiled in. Placeholders are
//! `{name}` tokens filled in a single pass, so user-supplied text and
//! document bodies are never rescanned for placeholders.
use crate::document::DocumentRequest;
use std::borrow::Cow;

/// Longest document excerpt, in characters, embedded in a follow-up prompt.
pub const MAX_DOCUMENT_CHARS: usize = 8000;

/// Appended to an excerpt that was cut at [`MAX_DOCUMENT_CHARS`].
pub const TRUNCATION_MARKER: &str = "... [truncated]";

// Prompt templates loaded at compile time
const GENERATE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/prompts/generate.md"));
const ANALYZE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/prompts/analyze.md"));
const REFERENCES: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/references.md"
));
const CLAUSES: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/prompts/clauses.md"));
const NEXT_STEPS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/next_steps.md"
));
const VALIDATE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/prompts/validate.md"));
const CHAT: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/prompts/chat.md"));

/// First [`MAX_DOCUMENT_CHARS`] characters of `text`, marked when cut.
pub fn document_excerpt(text: &str) -> Cow<'_, str> {
    match text.char_indices().nth(MAX_DOCUMENT_CHARS) {
        Some((cut, _)) => Cow::Owned(format!("{}{}", &text[..cut], TRUNCATION_MARKER)),
        None => Cow::Borrowed(text),
    }
}

pub fn generate_prompt(request: &DocumentRequest) -> String {
    let counterparty_line = request
        .counterparty()
        .map(|name| format!("Counterparty: {name}\n"))
        .unwrap_or_default();
    let previous_documents_section = request
        .previous_documents()
        .map(|context| format!("\nPrevious Documents / Context:\n{context}\n"))
        .unwrap_or_default();

    fill(
        GENERATE,
        &[
            ("sub_type", request.sub_type()),
            ("jurisdiction", request.jurisdiction()),
            ("full_name", request.full_name()),
            ("counterparty_line", counterparty_line.as_str()),
            ("details", request.details()),
            ("previous_documents_section", previous_documents_section.as_str()),
        ],
    )
}

pub fn analysis_prompt(document: &str, request: &DocumentRequest) -> String {
    let excerpt = document_excerpt(document);
    fill(
        ANALYZE,
        &[
            ("sub_type", request.sub_type()),
            ("jurisdiction", request.jurisdiction()),
            ("document", &*excerpt),
        ],
    )
}

pub fn references_prompt(document: &str, request: &DocumentRequest) -> String {
    let excerpt = document_excerpt(document);
    fill(
        REFERENCES,
        &[
            ("sub_type", request.sub_type()),
            ("jurisdiction", request.jurisdiction()),
            ("document", &*excerpt),
        ],
    )
}

pub fn clauses_prompt(document: &str) -> String {
    let excerpt = document_excerpt(document);
    fill(CLAUSES, &[("document", &*excerpt)])
}

pub fn next_steps_prompt(document: &str, request: &DocumentRequest) -> String {
    let excerpt = document_excerpt(document);
    fill(
        NEXT_STEPS,
        &[
            ("sub_type", request.sub_type()),
            ("jurisdiction", request.jurisdiction()),
            ("full_name", request.full_name()),
            ("counterparty", request.counterparty().unwrap_or("N/A")),
            ("document", &*excerpt),
        ],
    )
}

pub fn validation_prompt(document: &str) -> String {
    let excerpt = document_excerpt(document);
    fill(VALIDATE, &[("document", &*excerpt)])
}

pub fn chat_prompt(message: &str) -> String {
    fill(CHAT, &[("message", message)])
}

/// Replace `{name}` tokens found in `template` with their values.
///
/// Braces that do not form a known token (JSON examples in the templates)
/// are copied through untouched.
fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        match placeholder_at(tail, vars) {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &tail[consumed..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Match a `{name}` token at the start of `tail`; returns its value and length.
fn placeholder_at<'v>(tail: &str, vars: &[(&str, &'v str)]) -> Option<(&'v str, usize)> {
    let close = tail.find('}')?;
    let name = &tail[1..close];
    if name.is_empty() || !name.chars().all(|ch| ch.is_ascii_lowercase() || ch == '_') {
        return None;
    }
    vars.iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| (*value, close + 1))
}
