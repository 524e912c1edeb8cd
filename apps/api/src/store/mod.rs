//! Durable candidate + evaluation persistence.
//!
//! The store is the only shared mutable resource across runs. The batch
//! write happens in one transaction, so a run's mutations land atomically
//! and never interleave with another run's writes to the same identities.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::errors::AppError;
use crate::models::candidate::{CandidateRecord, CandidateRow, EvaluationRow, StagedCandidate};

/// The persistence seam.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Looks up a candidate and its evaluation by identity.
    async fn find_by_email(&self, email: &str) -> Result<Option<CandidateRecord>, AppError>;

    /// Writes the whole staged batch in one transaction. Candidates are
    /// upserted on email; evaluations staged fresh this run are upserted on
    /// candidate email.
    async fn upsert_batch(&self, batch: &[StagedCandidate]) -> Result<(), AppError>;
}

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgCandidateStore {
    pool: PgPool,
}

impl PgCandidateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateStore for PgCandidateStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<CandidateRecord>, AppError> {
        let candidate: Option<CandidateRow> = sqlx::query_as(
            "SELECT email, full_name, resume_url, resume_text, key_strengths, biggest_weakness, \
             available_immediately, contacted, contacted_at, created_at, updated_at \
             FROM candidates WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        let Some(candidate) = candidate else {
            return Ok(None);
        };

        let evaluation: Option<EvaluationRow> = sqlx::query_as(
            "SELECT id, candidate_email, score, notes, evaluated_on \
             FROM evaluations WHERE candidate_email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(Some(CandidateRecord {
            candidate,
            evaluation,
        }))
    }

    async fn upsert_batch(&self, batch: &[StagedCandidate]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for staged in batch {
            let c = &staged.candidate;
            sqlx::query(
                "INSERT INTO candidates \
                 (email, full_name, resume_url, resume_text, key_strengths, biggest_weakness, \
                  available_immediately, contacted, contacted_at, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
                 ON CONFLICT (email) DO UPDATE SET \
                  full_name = EXCLUDED.full_name, \
                  resume_url = EXCLUDED.resume_url, \
                  resume_text = EXCLUDED.resume_text, \
                  key_strengths = EXCLUDED.key_strengths, \
                  biggest_weakness = EXCLUDED.biggest_weakness, \
                  available_immediately = EXCLUDED.available_immediately, \
                  contacted = EXCLUDED.contacted, \
                  contacted_at = EXCLUDED.contacted_at, \
                  updated_at = EXCLUDED.updated_at",
            )
            .bind(&c.email)
            .bind(&c.full_name)
            .bind(&c.resume_url)
            .bind(&c.resume_text)
            .bind(&c.key_strengths)
            .bind(&c.biggest_weakness)
            .bind(c.available_immediately)
            .bind(c.contacted)
            .bind(c.contacted_at)
            .bind(c.created_at)
            .bind(c.updated_at)
            .execute(&mut *tx)
            .await?;

            if staged.freshly_evaluated {
                if let Some(e) = &staged.evaluation {
                    sqlx::query(
                        "INSERT INTO evaluations (id, candidate_email, score, notes, evaluated_on) \
                         VALUES ($1, $2, $3, $4, $5) \
                         ON CONFLICT (candidate_email) DO UPDATE SET \
                          score = EXCLUDED.score, \
                          notes = EXCLUDED.notes, \
                          evaluated_on = EXCLUDED.evaluated_on",
                    )
                    .bind(e.id)
                    .bind(&e.candidate_email)
                    .bind(e.score)
                    .bind(&e.notes)
                    .bind(e.evaluated_on)
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }

        tx.commit().await?;
        debug!("Committed batch of {} candidates", batch.len());
        Ok(())
    }
}
