//! Input Normalization
//!
//! First stage of every gateway operation: trims and bounds the text,
//! canonicalizes line endings, and fills in a default language tag.
//! Rejecting here short-circuits the remote path entirely.

use crate::config::InputConfig;

/// Text and language tag after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedInput {
    pub text: String,
    pub language: String,
}

/// Normalize raw input. Returns `None` for empty/whitespace-only text.
///
/// The text is trimmed, all line-break styles are converted to `\n`, and the
/// result is truncated to `config.max_chars` characters (truncation is not an
/// error — the remote service bounds request sizes anyway). The language tag
/// is trimmed verbatim; an empty tag falls back to the configured default.
/// Tag validity is not checked here — that is the remote service's call.
pub fn normalize(text: &str, language_tag: &str, config: &InputConfig) -> Option<NormalizedInput> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut canonical = canonicalize_line_endings(trimmed);

    if canonical.chars().count() > config.max_chars {
        canonical = canonical.chars().take(config.max_chars).collect();
    }

    let language = {
        let tag = language_tag.trim();
        if tag.is_empty() {
            config.default_language.clone()
        } else {
            tag.to_string()
        }
    };

    Some(NormalizedInput {
        text: canonical,
        language,
    })
}

/// Convert `\r\n` and bare `\r` line breaks to `\n`.
fn canonicalize_line_endings(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
