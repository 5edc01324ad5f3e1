//! Redaction profile: the names a run must never leak

use candor_domain::Run;

/// Minimum length for a name word-part to be masked on its own
///
/// Shorter fragments ("J", "de") would over-redact ordinary prose.
const MIN_PART_LEN: usize = 3;

/// The per-run name set driving name masking and verification
///
/// Built from run metadata: the candidate and assessor full names plus any
/// declared aliases (maiden names, nicknames). Word-parts of each alias are
/// masked individually so a bare surname cannot survive.
#[derive(Debug, Clone, Default)]
pub struct RedactionProfile {
    candidate_aliases: Vec<String>,
    assessor_aliases: Vec<String>,
}

impl RedactionProfile {
    /// Build a profile from run metadata
    pub fn from_run(run: &Run) -> Self {
        Self::default()
            .with_candidate_alias(&run.candidate_name)
            .with_assessor_alias(&run.assessor_name)
    }

    /// Add a candidate alias (ignored if blank)
    pub fn with_candidate_alias(mut self, alias: &str) -> Self {
        push_alias(&mut self.candidate_aliases, alias);
        self
    }

    /// Add an assessor alias (ignored if blank)
    pub fn with_assessor_alias(mut self, alias: &str) -> Self {
        push_alias(&mut self.assessor_aliases, alias);
        self
    }

    /// All candidate name forms to mask: full aliases plus word-parts
    pub fn candidate_terms(&self) -> Vec<String> {
        expand_terms(&self.candidate_aliases)
    }

    /// All assessor name forms to mask: full aliases plus word-parts
    pub fn assessor_terms(&self) -> Vec<String> {
        expand_terms(&self.assessor_aliases)
    }

    /// Whether the profile carries any usable name at all
    pub fn is_empty(&self) -> bool {
        self.candidate_aliases.is_empty() && self.assessor_aliases.is_empty()
    }
}

fn push_alias(aliases: &mut Vec<String>, alias: &str) {
    let alias = alias.trim();
    if alias.is_empty() {
        return;
    }
    if !aliases.iter().any(|a| a.eq_ignore_ascii_case(alias)) {
        aliases.push(alias.to_string());
    }
}

/// Expand aliases into full names plus word-parts, longest first
///
/// Longest-first order matters: regex alternation prefers earlier branches,
/// so "Jane Doe" must be tried before "Jane".
fn expand_terms(aliases: &[String]) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for alias in aliases {
        push_term(&mut terms, alias);
        for part in alias.split_whitespace() {
            if part.chars().count() >= MIN_PART_LEN {
                push_term(&mut terms, part);
            }
        }
    }
    terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    terms
}

fn push_term(terms: &mut Vec<String>, term: &str) {
    if !terms.iter().any(|t| t.eq_ignore_ascii_case(term)) {
        terms.push(term.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candor_domain::{Gender, ProgramType};

    #[test]
    fn test_profile_from_run_carries_both_names() {
        let run = Run::new("Jane Doe", "Alex Mercer", Gender::F, ProgramType::Mcp);
        let profile = RedactionProfile::from_run(&run);
        assert!(profile.candidate_terms().contains(&"Jane Doe".to_string()));
        assert!(profile.assessor_terms().contains(&"Mercer".to_string()));
    }

    #[test]
    fn test_terms_include_word_parts() {
        let profile = RedactionProfile::default().with_candidate_alias("Jane Doe");
        let terms = profile.candidate_terms();
        assert!(terms.contains(&"Jane".to_string()));
        assert!(terms.contains(&"Doe".to_string()));
    }

    #[test]
    fn test_short_parts_are_not_expanded() {
        let profile = RedactionProfile::default().with_candidate_alias("Jo Vandenberg");
        let terms = profile.candidate_terms();
        assert!(!terms.contains(&"Jo".to_string()));
        assert!(terms.contains(&"Vandenberg".to_string()));
        // the full alias is still masked even when a part is short
        assert!(terms.contains(&"Jo Vandenberg".to_string()));
    }

    #[test]
    fn test_longest_terms_come_first() {
        let profile = RedactionProfile::default().with_candidate_alias("Jane Doe");
        let terms = profile.candidate_terms();
        assert_eq!(terms[0], "Jane Doe");
    }

    #[test]
    fn test_blank_aliases_are_ignored() {
        let profile = RedactionProfile::default()
            .with_candidate_alias("   ")
            .with_assessor_alias("");
        assert!(profile.is_empty());
    }

    #[test]
    fn test_duplicate_aliases_collapse() {
        let profile = RedactionProfile::default()
            .with_candidate_alias("Jane Doe")
            .with_candidate_alias("jane doe");
        assert_eq!(
            profile
                .candidate_terms()
                .iter()
                .filter(|t| t.eq_ignore_ascii_case("jane doe"))
                .count(),
            1
        );
    }
}
