//! The recruitment pipeline — the one component that owns cross-cutting
//! invariants and failure policy.
//!
//! A run fetches the roster, reconciles every candidate against the store,
//! performs only the work still missing (resume text, evaluation,
//! notification), then commits the whole batch in one transaction and
//! republishes the roster from the in-memory batch. Re-running against an
//! unchanged source changes nothing: profile fields are overwritten with
//! equal values, scores are never recomputed, nobody is notified twice.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;
use crate::evaluator::Evaluator;
use crate::extractor::ResumeExtractor;
use crate::models::candidate::{CandidateProfile, CandidateRecord, CandidateRow, EvaluationRow, StagedCandidate};
use crate::models::report::RunReport;
use crate::notifier::Notifier;
use crate::source::CandidateSource;
use crate::store::CandidateStore;

/// Screening knobs, carried explicitly instead of read from ambient config.
#[derive(Debug, Clone)]
pub struct ScreeningPolicy {
    pub target_role: String,
    /// Minimum score at which a candidate is notified (inclusive).
    pub eligibility_threshold: i32,
    pub results_sheet_title: String,
}

impl ScreeningPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            target_role: config.target_role.clone(),
            eligibility_threshold: config.eligibility_threshold,
            results_sheet_title: config.results_sheet_title.clone(),
        }
    }
}

pub struct Pipeline {
    source: Arc<dyn CandidateSource>,
    extractor: Arc<dyn ResumeExtractor>,
    evaluator: Arc<dyn Evaluator>,
    notifier: Arc<dyn Notifier>,
    store: Arc<dyn CandidateStore>,
    policy: ScreeningPolicy,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn CandidateSource>,
        extractor: Arc<dyn ResumeExtractor>,
        evaluator: Arc<dyn Evaluator>,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn CandidateStore>,
        policy: ScreeningPolicy,
    ) -> Self {
        Self {
            source,
            extractor,
            evaluator,
            notifier,
            store,
            policy,
        }
    }

    /// Runs one screening pass over the full roster.
    ///
    /// Total: every internal error is caught here and folded into a failure
    /// report — the caller never sees an `Err`.
    pub async fn run_once(&self) -> RunReport {
        match self.process_roster().await {
            Ok(report) => report,
            Err(err) => {
                error!("Screening run failed: {err}");
                RunReport::failure(format!("Unable to complete screening run: {err}"))
            }
        }
    }

    async fn process_roster(&self) -> Result<RunReport, AppError> {
        let roster = self.source.fetch_roster().await?;
        info!("Retrieved {} candidates from the source", roster.len());

        let mut batch: Vec<StagedCandidate> = Vec::new();
        let mut staged_index: HashMap<String, usize> = HashMap::new();
        let mut skipped = 0usize;

        for profile in &roster {
            if let Some(&idx) = staged_index.get(&profile.email) {
                // Same email seen earlier in this roster: merge into the
                // staged record instead of creating a duplicate. The staged
                // evaluation keeps the gate closed, so the evaluator is
                // never invoked twice for one identity in a run.
                let prior = batch[idx].clone();
                let was_fresh = prior.freshly_evaluated;
                let basis = CandidateRecord {
                    candidate: prior.candidate,
                    evaluation: prior.evaluation,
                };
                match self.stage_candidate(profile, Some(basis)).await {
                    Some(mut staged) => {
                        staged.freshly_evaluated |= was_fresh;
                        batch[idx] = staged;
                    }
                    None => skipped += 1,
                }
                continue;
            }

            let existing = self.store.find_by_email(&profile.email).await?;
            match self.stage_candidate(profile, existing).await {
                Some(staged) => {
                    staged_index.insert(profile.email.clone(), batch.len());
                    batch.push(staged);
                }
                None => skipped += 1,
            }
        }

        if !batch.is_empty() {
            self.store.upsert_batch(&batch).await?;
        }

        let sheet_url = if batch.is_empty() {
            String::new()
        } else {
            self.source
                .publish_roster(&batch, &self.policy.results_sheet_title)
                .await?
        };

        info!(
            "Screening run complete: {} staged, {} skipped",
            batch.len(),
            skipped
        );

        let message = if skipped == 0 {
            "Screening complete".to_string()
        } else {
            format!("Screening complete; {skipped} candidate(s) skipped after evaluation failures")
        };
        Ok(RunReport::success(message, sheet_url, &batch))
    }

    /// Stages one candidate: reconcile the profile, fill the resume and
    /// evaluation gaps, decide notification. Returns None when an
    /// evaluation failure skips the candidate for this run — nothing is
    /// persisted for it and the open gap retries it next run.
    async fn stage_candidate(
        &self,
        profile: &CandidateProfile,
        existing: Option<CandidateRecord>,
    ) -> Option<StagedCandidate> {
        let now = Utc::now();

        let (mut candidate, mut evaluation) = match existing {
            Some(record) => {
                let mut c = record.candidate;
                // Source profile fields are authoritative on every run.
                c.apply_profile(profile);
                (c, record.evaluation)
            }
            None => (CandidateRow::from_profile(profile, now), None),
        };

        // Resume gap-fill. An empty extraction result is acceptable — the
        // candidate is still evaluated with whatever text exists.
        if candidate.resume_text.is_empty() && !candidate.resume_url.is_empty() {
            candidate.resume_text = self.extractor.extract_text(&candidate.resume_url).await;
            info!("Processed resume for {}", candidate.full_name);
        }

        // Evaluation gap-fill: scored once, never recomputed; a zero score
        // counts as unset and is retried.
        let mut freshly_evaluated = false;
        if evaluation.as_ref().map_or(true, |e| e.score == 0) {
            match self
                .evaluator
                .evaluate(&candidate, &self.policy.target_role)
                .await
            {
                Ok(outcome) => {
                    let fresh = EvaluationRow {
                        id: Uuid::new_v4(),
                        candidate_email: candidate.email.clone(),
                        score: outcome.score,
                        notes: outcome.notes,
                        evaluated_on: now.date_naive(),
                    };

                    if fresh.score >= self.policy.eligibility_threshold {
                        if let Err(err) = self.notifier.notify(&candidate).await {
                            warn!("Failed to notify {}: {err}", candidate.email);
                        }
                        // Contacted records the attempt, successful or not.
                        candidate.contacted = Some(true);
                        candidate.contacted_at = Some(now);
                    }

                    evaluation = Some(fresh);
                    freshly_evaluated = true;
                }
                Err(err) => {
                    warn!(
                        "Evaluation failed for {}, skipping this run: {err}",
                        candidate.email
                    );
                    return None;
                }
            }
        }

        candidate.updated_at = now;
        Some(StagedCandidate {
            candidate,
            evaluation,
            freshly_evaluated,
        })
    }
}
