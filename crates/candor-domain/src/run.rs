//! Run module - one assessment session from submission to persisted record

use crate::program::{Gender, ProgramType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Unique identifier for a run based on UUIDv7
///
/// UUIDv7 provides:
/// - Chronological sortability, so persisted records list in run order
/// - 128-bit uniqueness with no coordination between concurrent runs
/// - RFC 9562-standard format with broad ecosystem support
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(uuid::Uuid);

impl RunId {
    /// Generate a new UUIDv7-based RunId
    ///
    /// # Examples
    ///
    /// ```
    /// use candor_domain::RunId;
    ///
    /// let id = RunId::new();
    /// assert!(!id.to_string().is_empty());
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// Parse a RunId from a UUID string
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("Invalid run id: {}", e))
    }

    /// Get the underlying UUID value
    pub fn value(&self) -> uuid::Uuid {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One assessment session
///
/// A run is created when the caller submits a request and lives until the
/// structured record is persisted or the run fails terminally. It is owned
/// exclusively by the extraction pipeline for its duration; runs never share
/// state with each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    /// Unique identifier, generated at start
    pub id: RunId,

    /// Candidate (trainee) full name, as supplied by the caller
    pub candidate_name: String,

    /// Assessor full name, as supplied by the caller
    pub assessor_name: String,

    /// Gender, used downstream for pronoun resolution
    pub gender: Gender,

    /// Traineeship program determining the prompt sequence
    pub program: ProgramType,

    /// Creation timestamp (seconds since Unix epoch)
    pub created_at: u64,
}

impl Run {
    /// Create a new run with a fresh identifier and current timestamp
    pub fn new(
        candidate_name: impl Into<String>,
        assessor_name: impl Into<String>,
        gender: Gender,
        program: ProgramType,
    ) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Self {
            id: RunId::new(),
            candidate_name: candidate_name.into(),
            assessor_name: assessor_name.into(),
            gender,
            program,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_uniqueness() {
        let a = RunId::new();
        let b = RunId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_run_id_string_round_trip() {
        let id = RunId::new();
        let parsed = RunId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_run_id_rejects_garbage() {
        assert!(RunId::from_string("not-a-uuid").is_err());
    }

    #[test]
    fn test_run_carries_metadata() {
        let run = Run::new("Jane Doe", "Alex Mercer", Gender::F, ProgramType::Data);
        assert_eq!(run.candidate_name, "Jane Doe");
        assert_eq!(run.assessor_name, "Alex Mercer");
        assert_eq!(run.program, ProgramType::Data);
        assert!(run.created_at > 0);
    }
}
