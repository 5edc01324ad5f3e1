//! Compiled masking patterns, fixed per known document templates

use candor_domain::PlaceholderKind;
use regex::Regex;

/// A compiled pattern paired with the placeholder that replaces its matches
#[derive(Debug, Clone)]
pub(crate) struct MaskPattern {
    pub regex: Regex,
    pub placeholder: PlaceholderKind,
    /// Matches bare digit runs with generic separators
    ///
    /// These patterns are skipped on score-bearing documents, where a row
    /// of percentiles is the extraction payload, not an identifier.
    pub digit_run: bool,
}

/// Build the identifier pattern set, in masking order
///
/// Order is part of the contract: more specific patterns run first so that
/// e.g. an e-mail is masked whole rather than as a name plus leftovers.
pub(crate) fn identifier_patterns() -> Vec<MaskPattern> {
    vec![
        MaskPattern {
            regex: compile(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}"),
            placeholder: PlaceholderKind::Email,
            digit_run: false,
        },
        MaskPattern {
            regex: compile(r"(?:https?://|www\.)[^\s<>]+"),
            placeholder: PlaceholderKind::WebLink,
            digit_run: false,
        },
        // National register style: 85.07.30-033.28
        MaskPattern {
            regex: compile(r"\b\d{2}\.\d{2}\.\d{2}-\d{3}\.\d{2}\b"),
            placeholder: PlaceholderKind::NationalId,
            digit_run: false,
        },
        // Dates run before phones: the phone pattern would otherwise eat
        // dotted or dashed dates like 12-03-1995
        MaskPattern {
            regex: compile(r"\b\d{1,2}[-/.]\d{1,2}[-/.]\d{2,4}\b|\b\d{4}[-/.]\d{1,2}[-/.]\d{1,2}\b"),
            placeholder: PlaceholderKind::BirthDate,
            digit_run: true,
        },
        MaskPattern {
            regex: compile(r"\+?\d{1,3}[ .-]?\(?\d{1,3}\)?(?:[ .-]?\d{2,4}){2,4}"),
            placeholder: PlaceholderKind::Phone,
            digit_run: true,
        },
        // Any long digit run that survived the specific patterns
        MaskPattern {
            regex: compile(r"\b\d{7,}\b"),
            placeholder: PlaceholderKind::NationalId,
            digit_run: true,
        },
    ]
}

/// Build a case-insensitive whole-word pattern over the given name terms
///
/// Terms must arrive longest-first; alternation prefers earlier branches.
/// Returns `None` when there is nothing to match.
pub(crate) fn name_pattern(terms: &[String], placeholder: PlaceholderKind) -> Option<MaskPattern> {
    if terms.is_empty() {
        return None;
    }
    let alternation = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Some(MaskPattern {
        regex: compile(&format!(r"(?i)\b(?:{})\b", alternation)),
        placeholder,
        digit_run: false,
    })
}

/// Label zones recognized on page-structured templates
///
/// A line whose label matches one of these keywords has its value masked —
/// either the remainder after the label on the same line, or the whole
/// following line, matching how the known report templates lay fields out.
pub(crate) const LABEL_ZONES: &[(&str, PlaceholderKind)] = &[
    ("address", PlaceholderKind::Address),
    ("phone", PlaceholderKind::Phone),
    ("e-mail", PlaceholderKind::Email),
    ("email", PlaceholderKind::Email),
    ("date of birth", PlaceholderKind::BirthDate),
    ("links", PlaceholderKind::WebLink),
    ("socials", PlaceholderKind::WebLink),
];

fn compile(pattern: &str) -> Regex {
    // All patterns are fixed literals above; a failure here is a programming
    // error caught by the tests below.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid mask pattern {}: {}", pattern, e))
}
