//! Translation workflow: locale validation, status transitions, and the
//! locale fallback used when serving an article.

use std::sync::OnceLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Translation statuses
// ---------------------------------------------------------------------------

pub const TRANSLATION_DRAFT: &str = "draft";
pub const TRANSLATION_IN_REVIEW: &str = "in_review";
pub const TRANSLATION_PUBLISHED: &str = "published";

/// All valid article-translation status values.
pub const VALID_TRANSLATION_STATUSES: &[&str] =
    &[TRANSLATION_DRAFT, TRANSLATION_IN_REVIEW, TRANSLATION_PUBLISHED];

/// Validate that a translation status is one of the accepted values.
pub fn validate_translation_status(status: &str) -> Result<(), String> {
    if VALID_TRANSLATION_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid translation status '{status}'. Must be one of: {}",
            VALID_TRANSLATION_STATUSES.join(", ")
        ))
    }
}

// ---------------------------------------------------------------------------
// Translation request statuses
// ---------------------------------------------------------------------------

pub const REQUEST_PENDING: &str = "pending";
pub const REQUEST_ASSIGNED: &str = "assigned";
pub const REQUEST_IN_PROGRESS: &str = "in_progress";
pub const REQUEST_COMPLETED: &str = "completed";
pub const REQUEST_CANCELLED: &str = "cancelled";

/// All valid translation-request status values.
pub const VALID_REQUEST_STATUSES: &[&str] = &[
    REQUEST_PENDING,
    REQUEST_ASSIGNED,
    REQUEST_IN_PROGRESS,
    REQUEST_COMPLETED,
    REQUEST_CANCELLED,
];

/// Validate a translation-request status transition.
///
/// Requests move forward through
/// `pending -> assigned -> in_progress -> completed`; any non-terminal
/// state may be cancelled. Terminal states accept no further transitions.
pub fn validate_request_transition(from: &str, to: &str) -> Result<(), String> {
    let ok = match (from, to) {
        (REQUEST_PENDING, REQUEST_ASSIGNED) => true,
        (REQUEST_ASSIGNED, REQUEST_IN_PROGRESS) => true,
        (REQUEST_IN_PROGRESS, REQUEST_COMPLETED) => true,
        (REQUEST_PENDING | REQUEST_ASSIGNED | REQUEST_IN_PROGRESS, REQUEST_CANCELLED) => true,
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(format!(
            "Invalid translation request transition '{from}' -> '{to}'"
        ))
    }
}

// ---------------------------------------------------------------------------
// Locale validation
// ---------------------------------------------------------------------------

fn locale_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z]{2,3}(-[A-Z]{2})?$").expect("locale regex is valid"))
}

/// Validate a BCP 47-style locale code (`en`, `de`, `pt-BR`).
pub fn validate_locale(locale: &str) -> Result<(), String> {
    if locale_regex().is_match(locale) {
        Ok(())
    } else {
        Err(format!(
            "Invalid locale '{locale}'. Expected a code like 'en' or 'pt-BR'"
        ))
    }
}

// ---------------------------------------------------------------------------
// Locale fallback resolution
// ---------------------------------------------------------------------------

/// A translation's locale and status, borrowed from a loaded row.
#[derive(Debug, Clone, Copy)]
pub struct TranslationCandidate<'a> {
    pub locale: &'a str,
    pub status: &'a str,
}

/// Pick the translation to serve for a read in `requested` locale.
///
/// Returns the index into `candidates` of the published translation in the
/// requested locale, falling back to the published translation in the
/// article's default locale. Unpublished translations are never served.
pub fn resolve_index(
    requested: &str,
    default_locale: &str,
    candidates: &[TranslationCandidate<'_>],
) -> Option<usize> {
    let published_in = |locale: &str| {
        candidates
            .iter()
            .position(|c| c.locale == locale && c.status == TRANSLATION_PUBLISHED)
    };
    published_in(requested).or_else(|| published_in(default_locale))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_locales() {
        assert!(validate_locale("en").is_ok());
        assert!(validate_locale("de").is_ok());
        assert!(validate_locale("pt-BR").is_ok());
        assert!(validate_locale("ast").is_ok());
    }

    #[test]
    fn test_invalid_locales() {
        assert!(validate_locale("").is_err());
        assert!(validate_locale("EN").is_err());
        assert!(validate_locale("en_US").is_err());
        assert!(validate_locale("english").is_err());
    }

    #[test]
    fn test_request_forward_transitions() {
        assert!(validate_request_transition(REQUEST_PENDING, REQUEST_ASSIGNED).is_ok());
        assert!(validate_request_transition(REQUEST_ASSIGNED, REQUEST_IN_PROGRESS).is_ok());
        assert!(validate_request_transition(REQUEST_IN_PROGRESS, REQUEST_COMPLETED).is_ok());
    }

    #[test]
    fn test_request_cancellation_from_non_terminal() {
        assert!(validate_request_transition(REQUEST_PENDING, REQUEST_CANCELLED).is_ok());
        assert!(validate_request_transition(REQUEST_ASSIGNED, REQUEST_CANCELLED).is_ok());
        assert!(validate_request_transition(REQUEST_IN_PROGRESS, REQUEST_CANCELLED).is_ok());
    }

    #[test]
    fn test_request_terminal_states_are_final() {
        assert!(validate_request_transition(REQUEST_COMPLETED, REQUEST_CANCELLED).is_err());
        assert!(validate_request_transition(REQUEST_CANCELLED, REQUEST_ASSIGNED).is_err());
    }

    #[test]
    fn test_request_no_skipping_states() {
        assert!(validate_request_transition(REQUEST_PENDING, REQUEST_COMPLETED).is_err());
        assert!(validate_request_transition(REQUEST_PENDING, REQUEST_IN_PROGRESS).is_err());
    }

    #[test]
    fn test_resolve_prefers_requested_locale() {
        let candidates = [
            TranslationCandidate {
                locale: "en",
                status: TRANSLATION_PUBLISHED,
            },
            TranslationCandidate {
                locale: "de",
                status: TRANSLATION_PUBLISHED,
            },
        ];
        assert_eq!(resolve_index("de", "en", &candidates), Some(1));
    }

    #[test]
    fn test_resolve_falls_back_to_default_locale() {
        let candidates = [
            TranslationCandidate {
                locale: "en",
                status: TRANSLATION_PUBLISHED,
            },
            TranslationCandidate {
                locale: "de",
                status: TRANSLATION_DRAFT,
            },
        ];
        // German exists but is unpublished, so the English default serves.
        assert_eq!(resolve_index("de", "en", &candidates), Some(0));
    }

    #[test]
    fn test_resolve_none_when_nothing_published() {
        let candidates = [TranslationCandidate {
            locale: "en",
            status: TRANSLATION_IN_REVIEW,
        }];
        assert_eq!(resolve_index("en", "en", &candidates), None);
    }
}
