use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::candidate::StagedCandidate;

pub const CODE_SUCCESS: &str = "00";
pub const CODE_FAILURE: &str = "01";

/// Outcome of one pipeline run. Transient — never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub code: String,
    pub message: String,
    /// URL of the republished results sheet; empty on failure or when the
    /// roster was empty.
    pub sheet_url: String,
    pub candidates: Vec<CandidateSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSummary {
    pub email: String,
    pub full_name: String,
    pub evaluation: Option<EvaluationSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub rating: i32,
    pub evaluated_on: NaiveDate,
    pub notes: String,
}

impl RunReport {
    pub fn success(message: impl Into<String>, sheet_url: String, batch: &[StagedCandidate]) -> Self {
        RunReport {
            code: CODE_SUCCESS.to_string(),
            message: message.into(),
            sheet_url,
            candidates: batch.iter().map(CandidateSummary::from_staged).collect(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        RunReport {
            code: CODE_FAILURE.to_string(),
            message: message.into(),
            sheet_url: String::new(),
            candidates: Vec::new(),
        }
    }
}

impl CandidateSummary {
    fn from_staged(staged: &StagedCandidate) -> Self {
        CandidateSummary {
            email: staged.candidate.email.clone(),
            full_name: staged.candidate.full_name.clone(),
            evaluation: staged.evaluation.as_ref().map(|e| EvaluationSummary {
                rating: e.score,
                evaluated_on: e.evaluated_on,
                notes: e.notes.clone(),
            }),
        }
    }
}
