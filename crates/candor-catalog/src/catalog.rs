//! The per-program prompt sequences

use crate::shape::OutputShape;
use crate::spec::{PromptId, PromptSpec, RepairStrategy};
use candor_domain::{DocumentKind, ProgramType};

/// Catalog version, recorded for traceability of prompt changes
pub const CATALOG_VERSION: &str = "2025.08";

/// Model bound to long-form narrative prompts
pub const MODEL_PRO: &str = "gemini-2.5-pro";

/// Model bound to deterministic scoring and short prompts
pub const MODEL_FLASH: &str = "gemini-2.5-flash";

/// Default retry budget for a prompt
const DEFAULT_RETRIES: u32 = 3;

/// Retry budget for the prompts the report cannot do without
const CRITICAL_RETRIES: u32 = 5;

/// The ordered prompt sequence for one program type
///
/// MCP and NEW share a sequence; DATA and ICP each have their own. ICP
/// prompts additionally consume the program-context document. Construction
/// is total over [`ProgramType`] — unknown program strings are rejected
/// where they enter the system, before a catalog is requested.
#[derive(Debug, Clone)]
pub struct Catalog {
    program: ProgramType,
    specs: Vec<PromptSpec>,
}

impl Catalog {
    /// Build the ordered sequence for the given program
    pub fn for_program(program: ProgramType) -> Self {
        let specs = match program {
            ProgramType::Mcp | ProgramType::New => management_sequence(false),
            ProgramType::Icp => management_sequence(true),
            ProgramType::Data => data_sequence(),
        };
        Self { program, specs }
    }

    /// The program this catalog serves
    pub fn program(&self) -> ProgramType {
        self.program
    }

    /// The specs in dispatch order
    pub fn specs(&self) -> &[PromptSpec] {
        &self.specs
    }

    /// Number of prompts in the sequence
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the sequence is empty (it never is for a known program)
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// Helper assembling one spec with the shared defaults
#[allow(clippy::too_many_arguments)]
fn spec(
    id: &'static str,
    ordinal: usize,
    model: &str,
    temperature: f32,
    inputs: Vec<DocumentKind>,
    depends_on: Vec<PromptId>,
    shape: OutputShape,
    retry_budget: u32,
    template: &'static str,
) -> PromptSpec {
    PromptSpec {
        id: PromptId::new(id),
        ordinal,
        model: model.to_string(),
        temperature,
        inputs,
        depends_on,
        shape,
        retry_budget,
        repair: RepairStrategy::AppendFormatHint,
        template,
    }
}

/// The MCP/NEW sequence; `with_context` adds the ICP program description
fn management_sequence(with_context: bool) -> Vec<PromptSpec> {
    let mut narrative_inputs = vec![
        DocumentKind::AssessorNotes,
        DocumentKind::PersonalityReport,
    ];
    if with_context {
        narrative_inputs.push(DocumentKind::ProgramContext);
    }

    let mut specs = common_head(&narrative_inputs);
    specs.push(spec(
        "quality_scores",
        specs.len(),
        MODEL_FLASH,
        0.1,
        vec![DocumentKind::AssessorNotes],
        vec![],
        OutputShape::label_list("scores", &["-1", "0", "1"], Some(20)),
        CRITICAL_RETRIES,
        QUALITY_SCORES_TEMPLATE,
    ));
    specs.push(interests_spec(specs.len()));
    specs
}

/// The DATA sequence: the common head plus data-specific scoring
fn data_sequence() -> Vec<PromptSpec> {
    let narrative_inputs = vec![
        DocumentKind::AssessorNotes,
        DocumentKind::PersonalityReport,
    ];

    let mut specs = common_head(&narrative_inputs);
    specs.push(spec(
        "quality_scores_data",
        specs.len(),
        MODEL_FLASH,
        0.1,
        vec![DocumentKind::AssessorNotes],
        vec![],
        OutputShape::label_list("scores", &["-1", "0", "1", "N/A"], Some(23)),
        CRITICAL_RETRIES,
        QUALITY_SCORES_DATA_TEMPLATE,
    ));
    specs.push(spec(
        "data_tool_scores",
        specs.len(),
        MODEL_FLASH,
        0.2,
        vec![DocumentKind::AssessorNotes],
        vec![],
        OutputShape::label_list("scores", &["-1", "0", "1", "N/A"], Some(5)),
        DEFAULT_RETRIES,
        DATA_TOOLS_TEMPLATE,
    ));
    specs.push(interests_spec(specs.len()));
    specs
}

/// The prompts every program shares, in order
fn common_head(narrative_inputs: &[DocumentKind]) -> Vec<PromptSpec> {
    let personality = PromptId::new("personality");
    vec![
        spec(
            "first_impression",
            0,
            MODEL_FLASH,
            0.4,
            vec![DocumentKind::AssessorNotes],
            vec![],
            OutputShape::text(),
            DEFAULT_RETRIES,
            FIRST_IMPRESSION_TEMPLATE,
        ),
        spec(
            "personality",
            1,
            MODEL_PRO,
            0.4,
            narrative_inputs.to_vec(),
            vec![],
            OutputShape::text(),
            DEFAULT_RETRIES,
            PERSONALITY_TEMPLATE,
        ),
        spec(
            "cognitive_scores",
            2,
            MODEL_FLASH,
            0.0,
            vec![DocumentKind::CognitiveResult],
            vec![],
            OutputShape::text_list("scores", 6, 6),
            DEFAULT_RETRIES,
            COGNITIVE_SCORES_TEMPLATE,
        ),
        spec(
            "cognitive_remarks",
            3,
            MODEL_FLASH,
            0.3,
            vec![DocumentKind::CognitiveResult],
            vec![],
            OutputShape::text(),
            DEFAULT_RETRIES,
            COGNITIVE_REMARKS_TEMPLATE,
        ),
        spec(
            "language_levels",
            4,
            MODEL_FLASH,
            0.2,
            vec![DocumentKind::AssessorNotes],
            vec![],
            OutputShape::label_list("levels", &["A1", "A2", "B1", "B2", "C1", "C2"], Some(3)),
            DEFAULT_RETRIES,
            LANGUAGE_TEMPLATE,
        ),
        spec(
            "strengths",
            5,
            MODEL_PRO,
            0.3,
            narrative_inputs.to_vec(),
            vec![personality],
            OutputShape::text_list("items", 3, 8),
            DEFAULT_RETRIES,
            STRENGTHS_TEMPLATE,
        ),
        spec(
            "development_points",
            6,
            MODEL_PRO,
            0.3,
            narrative_inputs.to_vec(),
            vec![personality],
            OutputShape::text_list("items", 2, 6),
            CRITICAL_RETRIES,
            DEVELOPMENT_TEMPLATE,
        ),
    ]
}

fn interests_spec(ordinal: usize) -> PromptSpec {
    spec(
        "interests",
        ordinal,
        MODEL_FLASH,
        0.4,
        vec![DocumentKind::AssessorNotes],
        vec![],
        OutputShape::text_list("items", 1, 6),
        DEFAULT_RETRIES,
        INTERESTS_TEMPLATE,
    )
}

const FIRST_IMPRESSION_TEMPLATE: &str = "\
You are an assessor at a talent development program. Give a concise first \
impression of the candidate (max 35 words). Look for mentions of 'first \
impression' or 'FI' in the assessment notes. Focus on overall vibe, \
communication style, nervousness, body language, and emotional tone. Rely \
only on assessor observations; do not judge.";

const PERSONALITY_TEMPLATE: &str = "\
Write an in-depth, balanced personality description of the candidate as a \
starting point for personal development during the traineeship. Highlight \
both strengths and development areas; do not discuss technical skills. Rely \
on the assessment notes as the primary source, with the personality report \
as background; link personality-test findings to observed behaviour rather \
than discussing them separately, and mention contradictions between the two \
sources. Make 75-85 percent of the description strengths, frame development \
points as growth opportunities between two positive observations, and name \
the assessment step where each trait was observed. Conversational yet \
professional tone, 250-400 words, one trait per point, no direct quotes, a \
closing summary of at most three sentences.";

const COGNITIVE_SCORES_TEMPLATE: &str = "\
Extract the six percentile scores from the capacity test results, in this \
exact order: general ability, speed, accuracy, verbal, numerical, abstract. \
Use the percentile value for each category and ignore sten scores in \
parentheses. Report each score as it appears, without reinterpreting it.";

const COGNITIVE_REMARKS_TEMPLATE: &str = "\
Write a 2-3 sentence summary interpreting the candidate's capacity test \
results. Cover overall general ability, the balance between speed and \
accuracy, and the verbal, numerical, and abstract sub-tests. Average \
performance is good; frame the performance positively.";

const LANGUAGE_TEMPLATE: &str = "\
Determine the candidate's language levels for Dutch, French, and English, \
in that order, on the CEFR scale. If the assessment notes state a level \
explicitly, use it; otherwise estimate from how the notes describe the \
candidate's communication.";

const STRENGTHS_TEMPLATE: &str = "\
Identify 6-7 of the candidate's strengths from the assessment notes, \
preferring the end evaluation and strengths visible across multiple \
assessment stages. Cover both personality and skill-based qualities. Start \
each item with a few key words (under 7), followed by one or two sentences \
of context in simple language. Stay consistent with the personality \
description provided as earlier context.";

const DEVELOPMENT_TEMPLATE: &str = "\
Identify 3-5 of the candidate's development points from the assessment \
notes, preferring the end evaluation and points visible across multiple \
assessment stages. Start each item with a few key words (under 7), followed \
by one or two full sentences explaining what is meant. Frame each point \
constructively as a learning opportunity that can enhance an existing \
strength, and stay consistent with the personality description provided as \
earlier context.";

const QUALITY_SCORES_TEMPLATE: &str = "\
Score the candidate on the 20 program qualities, in order: motivation, \
personal development, guts, ownership, positive attitude, involvement, \
collaboration, communication, learning agility, complexity management, \
thinking flexibility, multiple thinking, proactivity, delivering results, \
agile working, stakeholder management, innovation, perspective thinking, \
customer orientation, networking. Use only explicit 'Strong yes'/'Yes'/'Not \
sure'/'No' ratings in the assessment notes: average multiple ratings for \
the same quality, then map averages of 1.4 and below to -1, 1.5 to 2.4 to \
0, and 2.5 and above to 1. Do not infer ratings from prose; when in doubt \
after averaging, use 0.";

const QUALITY_SCORES_DATA_TEMPLATE: &str = "\
Score the candidate on the 23 data-program qualities, in order: motivation, \
guts, self-awareness, enthusiasm, openness, communication, collaboration, \
curious perseverance, analytical thinking, solution focus, business \
perspective, thoroughness, delivering results, flexibility, stakeholder \
management, service orientation, creative drive, end-to-end thinking, \
analytics project management, business and IT knowledge, visualizing data, \
analyzing data, data science models. Use only explicit 'Strong \
yes'/'Yes'/'Not sure'/'No' ratings in the assessment notes: average \
multiple ratings per quality, then map averages of 1.4 and below to -1, 1.5 \
to 2.4 to 0, and 2.5 and above to 1. A quality not mentioned at all scores \
N/A; do not infer ratings from prose.";

const DATA_TOOLS_TEMPLATE: &str = "\
Rate the candidate's proficiency with the five data tools, in order: \
spreadsheets and VBA, BI dashboarding tools, Python or R, SQL, cloud data \
platforms. Use -1 for beginner, 0 for average, 1 for proficient, and N/A \
when a tool is not mentioned. Do not be too strict on spreadsheet \
proficiency.";

const INTERESTS_TEMPLATE: &str = "\
Identify 3-5 of the candidate's professional interests from the assessment \
notes. Be specific, keep each under 10 words, and answer N/A as the only \
item if no clear interest is mentioned.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mcp_and_new_share_a_sequence() {
        let mcp: Vec<_> = Catalog::for_program(ProgramType::Mcp)
            .specs()
            .iter()
            .map(|s| s.id)
            .collect();
        let new: Vec<_> = Catalog::for_program(ProgramType::New)
            .specs()
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(mcp, new);
        assert_eq!(mcp.len(), 9);
    }

    #[test]
    fn test_data_sequence_has_its_own_scoring() {
        let catalog = Catalog::for_program(ProgramType::Data);
        let ids: Vec<_> = catalog.specs().iter().map(|s| s.id.as_str()).collect();
        assert!(ids.contains(&"quality_scores_data"));
        assert!(ids.contains(&"data_tool_scores"));
        assert!(!ids.contains(&"quality_scores"));
        assert_eq!(catalog.len(), 10);
    }

    #[test]
    fn test_icp_narrative_prompts_take_program_context() {
        let catalog = Catalog::for_program(ProgramType::Icp);
        for id in ["personality", "strengths", "development_points"] {
            let spec = catalog.specs().iter().find(|s| s.id.as_str() == id).unwrap();
            assert!(
                spec.inputs.contains(&DocumentKind::ProgramContext),
                "{} should consume the program context",
                id
            );
        }
    }

    #[test]
    fn test_ordinals_match_positions() {
        for program in [
            ProgramType::Mcp,
            ProgramType::Data,
            ProgramType::Icp,
            ProgramType::New,
        ] {
            let catalog = Catalog::for_program(program);
            for (idx, spec) in catalog.specs().iter().enumerate() {
                assert_eq!(spec.ordinal, idx);
            }
        }
    }

    #[test]
    fn test_dependencies_precede_their_dependents() {
        for program in [
            ProgramType::Mcp,
            ProgramType::Data,
            ProgramType::Icp,
            ProgramType::New,
        ] {
            let catalog = Catalog::for_program(program);
            for (idx, spec) in catalog.specs().iter().enumerate() {
                for dep in &spec.depends_on {
                    let dep_idx = catalog
                        .specs()
                        .iter()
                        .position(|s| s.id == *dep)
                        .unwrap_or_else(|| panic!("{} depends on unknown {}", spec.id, dep));
                    assert!(dep_idx < idx, "{} must come after {}", spec.id, dep);
                }
            }
        }
    }

    #[test]
    fn test_inputs_stay_within_required_kinds() {
        for program in [
            ProgramType::Mcp,
            ProgramType::Data,
            ProgramType::Icp,
            ProgramType::New,
        ] {
            let catalog = Catalog::for_program(program);
            for spec in catalog.specs() {
                for kind in &spec.inputs {
                    assert!(
                        program.required_kinds().contains(kind),
                        "{} input {} is not required by {}",
                        spec.id,
                        kind,
                        program
                    );
                }
            }
        }
    }

    #[test]
    fn test_prompt_ids_are_unique_within_a_sequence() {
        let catalog = Catalog::for_program(ProgramType::Data);
        let mut ids: Vec<_> = catalog.specs().iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn test_every_spec_has_a_positive_retry_budget() {
        let catalog = Catalog::for_program(ProgramType::Mcp);
        assert!(catalog.specs().iter().all(|s| s.retry_budget >= 1));
    }
}
