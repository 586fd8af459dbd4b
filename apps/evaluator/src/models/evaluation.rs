use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fields parsed out of one model reply. Every value is plain text;
/// absent fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateEvaluation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub sex: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub area: String,
    /// Fit score as text, `N/10`.
    #[serde(default)]
    pub score: String,
    #[serde(default)]
    pub justification: String,
}

impl CandidateEvaluation {
    /// True when the reply yielded no field at all.
    pub fn is_empty(&self) -> bool {
        *self == CandidateEvaluation::default()
    }
}

/// One row of the result set: a successfully evaluated upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub file_name: String,
    #[serde(flatten)]
    pub evaluation: CandidateEvaluation,
}

/// Which pipeline stage failed for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Extraction,
    Model,
    Unparseable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedFile {
    pub file_name: String,
    pub kind: FailureKind,
    pub message: String,
}

/// An upload with an unsupported extension. Never evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub file_name: String,
    pub warning: String,
}

/// What happened to a single upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Evaluated(EvaluationRecord),
    Failed(FailedFile),
    Skipped(SkippedFile),
}

/// Outcome of one batch run. Each list keeps upload order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub records: Vec<EvaluationRecord>,
    pub failures: Vec<FailedFile>,
    pub skipped: Vec<SkippedFile>,
}

impl BatchReport {
    pub fn new(batch_id: Uuid) -> Self {
        Self {
            batch_id,
            records: Vec::new(),
            failures: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Evaluated(record) => self.records.push(record),
            FileOutcome::Failed(failed) => self.failures.push(failed),
            FileOutcome::Skipped(skipped) => self.skipped.push(skipped),
        }
    }
}
