//! Program types and candidate gender

use crate::document::DocumentKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The traineeship track, determining which prompts and document kinds apply
///
/// MCP and NEW share one prompt sequence; DATA and ICP each have their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProgramType {
    /// Management consulting program
    Mcp,
    /// Data analytics program
    Data,
    /// Individual client program; requires an extra program-context document
    Icp,
    /// Newest track; shares the MCP prompt sequence
    New,
}

impl ProgramType {
    /// Canonical uppercase token used in requests and persisted records
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramType::Mcp => "MCP",
            ProgramType::Data => "DATA",
            ProgramType::Icp => "ICP",
            ProgramType::New => "NEW",
        }
    }

    /// Document kinds that must be present before a run may start
    ///
    /// Checked by the pipeline before any workspace or AI activity.
    pub fn required_kinds(&self) -> &'static [DocumentKind] {
        match self {
            ProgramType::Icp => &[
                DocumentKind::PersonalityReport,
                DocumentKind::CognitiveResult,
                DocumentKind::AssessorNotes,
                DocumentKind::ProgramContext,
            ],
            _ => &[
                DocumentKind::PersonalityReport,
                DocumentKind::CognitiveResult,
                DocumentKind::AssessorNotes,
            ],
        }
    }
}

impl fmt::Display for ProgramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProgramType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MCP" => Ok(ProgramType::Mcp),
            "DATA" => Ok(ProgramType::Data),
            "ICP" => Ok(ProgramType::Icp),
            "NEW" => Ok(ProgramType::New),
            other => Err(format!("Unknown program type: {}", other)),
        }
    }
}

/// Candidate gender, carried through for pronoun resolution in the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    /// Male
    M,
    /// Female
    F,
}

impl Gender {
    /// Canonical single-letter token
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::M => "M",
            Gender::F => "F",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "M" => Ok(Gender::M),
            "F" => Ok(Gender::F),
            other => Err(format!("Unknown gender: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_parse_is_case_insensitive() {
        assert_eq!("mcp".parse::<ProgramType>().unwrap(), ProgramType::Mcp);
        assert_eq!("Data".parse::<ProgramType>().unwrap(), ProgramType::Data);
        assert_eq!(" ICP ".parse::<ProgramType>().unwrap(), ProgramType::Icp);
    }

    #[test]
    fn test_unknown_program_is_rejected()  {
        assert!("MNGT".parse::<ProgramType>().is_err());
    }

    #[test]
    fn test_icp_requires_program_context() {
        assert!(ProgramType::Icp
            .required_kinds()
            .contains(&DocumentKind::ProgramContext));
        assert!(!ProgramType::Mcp
            .required_kinds()
            .contains(&DocumentKind::ProgramContext));
    }

    #[test]
    fn test_mcp_and_new_share_requirements() {
        assert_eq!(
            ProgramType::Mcp.required_kinds(),
            ProgramType::New.required_kinds()
        );
    }

    #[test]
    fn test_gender_round_trip() {
        assert_eq!("f".parse::<Gender>().unwrap(), Gender::F);
        assert_eq!(Gender::M.to_string(), "M");
    }
}
