use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One raw roster row as fetched from the candidate source.
/// Profile fields are authoritative on every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub full_name: String,
    pub email: String,
    pub resume_url: String,
    pub key_strengths: String,
    pub biggest_weakness: String,
    pub available_immediately: bool,
}

/// A persisted candidate. Email is the identity key; two sightings of the
/// same email are always merged into one record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub email: String,
    pub full_name: String,
    pub resume_url: String,
    pub resume_text: String,
    pub key_strengths: String,
    pub biggest_weakness: String,
    pub available_immediately: bool,
    /// Tri-state: None = never attempted, Some(false) = not contacted,
    /// Some(true) = contacted.
    pub contacted: Option<bool>,
    pub contacted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CandidateRow {
    /// First sighting: a fresh record from a source row.
    pub fn from_profile(profile: &CandidateProfile, now: DateTime<Utc>) -> Self {
        CandidateRow {
            email: profile.email.clone(),
            full_name: profile.full_name.clone(),
            resume_url: profile.resume_url.clone(),
            resume_text: String::new(),
            key_strengths: profile.key_strengths.clone(),
            biggest_weakness: profile.biggest_weakness.clone(),
            available_immediately: profile.available_immediately,
            contacted: None,
            contacted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Subsequent sighting: profile fields are overwritten with the freshly
    /// fetched values. Resume text, contacted state and created-at survive.
    pub fn apply_profile(&mut self, profile: &CandidateProfile) {
        self.full_name = profile.full_name.clone();
        self.resume_url = profile.resume_url.clone();
        self.key_strengths = profile.key_strengths.clone();
        self.biggest_weakness = profile.biggest_weakness.clone();
        self.available_immediately = profile.available_immediately;
    }
}

/// The AI verdict for one candidate. At most one per candidate; never
/// recomputed once the score is set and non-zero.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EvaluationRow {
    pub id: Uuid,
    pub candidate_email: String,
    pub score: i32,
    pub notes: String,
    pub evaluated_on: NaiveDate,
}

/// A candidate as read back from the store: the row plus its evaluation,
/// if one exists.
#[derive(Debug, Clone)]
pub struct CandidateRecord {
    pub candidate: CandidateRow,
    pub evaluation: Option<EvaluationRow>,
}

/// One entry of the in-memory run batch: the reconciled candidate, the
/// current evaluation view, and whether that evaluation was produced this
/// run (and therefore still needs persisting).
#[derive(Debug, Clone)]
pub struct StagedCandidate {
    pub candidate: CandidateRow,
    pub evaluation: Option<EvaluationRow>,
    pub freshly_evaluated: bool,
}
