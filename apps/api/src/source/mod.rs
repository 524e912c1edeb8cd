//! Candidate roster source — Google Sheets.
//!
//! Fetches raw candidate rows from the intake sheet and publishes the
//! reconciled roster by creating a fresh results spreadsheet.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::config::Config;
use crate::errors::AppError;
use crate::models::candidate::{CandidateProfile, StagedCandidate};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// The roster seam: where candidates come from and where results go back.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Fetches the current roster, in sheet order.
    async fn fetch_roster(&self) -> Result<Vec<CandidateProfile>, AppError>;

    /// Publishes the reconciled roster under the given sheet title and
    /// returns a locator for it.
    async fn publish_roster(
        &self,
        roster: &[StagedCandidate],
        title: &str,
    ) -> Result<String, AppError>;
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct CreatedSpreadsheet {
    #[serde(rename = "spreadsheetId")]
    spreadsheet_id: String,
    #[serde(rename = "spreadsheetUrl")]
    spreadsheet_url: Option<String>,
}

/// Google Sheets values API client.
#[derive(Clone)]
pub struct SheetsSource {
    client: Client,
    spreadsheet_id: String,
    api_token: String,
    range: String,
}

impl SheetsSource {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            spreadsheet_id: config.spreadsheet_id.clone(),
            api_token: config.sheets_api_token.clone(),
            range: config.sheets_range.clone(),
        }
    }
}

#[async_trait]
impl CandidateSource for SheetsSource {
    async fn fetch_roster(&self) -> Result<Vec<CandidateProfile>, AppError> {
        let url = format!("{SHEETS_API_BASE}/{}/values/{}", self.spreadsheet_id, self.range);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| AppError::Source(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Source(format!(
                "roster fetch returned {status}: {body}"
            )));
        }

        let value_range: ValueRange = response
            .json()
            .await
            .map_err(|e| AppError::Source(format!("roster fetch returned bad JSON: {e}")))?;

        let mut roster = Vec::new();
        for (i, row) in value_range.values.iter().enumerate() {
            match profile_from_row(row) {
                Some(profile) => roster.push(profile),
                // Rows are 1-indexed in the sheet and the range starts at A2
                None => warn!("Skipping malformed roster row {}", i + 2),
            }
        }
        Ok(roster)
    }

    async fn publish_roster(
        &self,
        roster: &[StagedCandidate],
        title: &str,
    ) -> Result<String, AppError> {
        // 1. Create the results spreadsheet
        let response = self
            .client
            .post(SHEETS_API_BASE)
            .bearer_auth(&self.api_token)
            .json(&json!({ "properties": { "title": title, "locale": "en_US" } }))
            .send()
            .await
            .map_err(|e| AppError::Source(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Source(format!(
                "spreadsheet create returned {status}: {body}"
            )));
        }

        let created: CreatedSpreadsheet = response
            .json()
            .await
            .map_err(|e| AppError::Source(format!("spreadsheet create returned bad JSON: {e}")))?;

        // 2. Write header + one row per candidate
        let rows = roster_rows(roster);
        let write_url = format!(
            "{SHEETS_API_BASE}/{}/values/Sheet1!A1?valueInputOption=USER_ENTERED",
            created.spreadsheet_id
        );
        let response = self
            .client
            .put(&write_url)
            .bearer_auth(&self.api_token)
            .json(&json!({
                "range": "Sheet1!A1",
                "majorDimension": "ROWS",
                "values": rows,
            }))
            .send()
            .await
            .map_err(|e| AppError::Source(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Source(format!(
                "roster publish returned {status}: {body}"
            )));
        }

        info!(
            "Published {} candidates to spreadsheet {}",
            roster.len(),
            created.spreadsheet_id
        );

        Ok(created.spreadsheet_url.unwrap_or_else(|| {
            format!(
                "https://docs.google.com/spreadsheets/d/{}/edit",
                created.spreadsheet_id
            )
        }))
    }
}

/// Maps one sheet row (`A2:F` = name, email, resume URL, strengths,
/// weakness, availability) to a profile. Returns None for rows too short to
/// carry all six columns or with an empty email.
fn profile_from_row(row: &[String]) -> Option<CandidateProfile> {
    if row.len() < 6 {
        return None;
    }
    let email = row[1].trim();
    if email.is_empty() {
        return None;
    }
    Some(CandidateProfile {
        full_name: row[0].trim().to_string(),
        email: email.to_string(),
        resume_url: row[2].trim().to_string(),
        key_strengths: row[3].clone(),
        biggest_weakness: row[4].clone(),
        available_immediately: row[5].trim().eq_ignore_ascii_case("yes"),
    })
}

/// Cell layout of the published roster: a header row followed by one row
/// per candidate, unchanged candidates included.
fn roster_rows(roster: &[StagedCandidate]) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Full Name".to_string(),
        "Email".to_string(),
        "AI Rating".to_string(),
        "Evaluation Date".to_string(),
        "Key Strengths".to_string(),
        "Biggest Weakness".to_string(),
        "Available Immediately".to_string(),
        "Resume URL".to_string(),
        "Contacted".to_string(),
        "Contacted Date".to_string(),
    ]];

    for staged in roster {
        let candidate = &staged.candidate;
        let (rating, evaluated_on) = match &staged.evaluation {
            Some(e) => (e.score.to_string(), e.evaluated_on.to_string()),
            None => (String::new(), String::new()),
        };
        rows.push(vec![
            candidate.full_name.clone(),
            candidate.email.clone(),
            rating,
            evaluated_on,
            candidate.key_strengths.clone(),
            candidate.biggest_weakness.clone(),
            if candidate.available_immediately {
                "Yes".to_string()
            } else {
                "No".to_string()
            },
            candidate.resume_url.clone(),
            match candidate.contacted {
                Some(true) => "True".to_string(),
                Some(false) => "False".to_string(),
                None => String::new(),
            },
            candidate
                .contacted_at
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        ]);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::{CandidateRow, EvaluationRow};
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_profile_from_full_row() {
        let profile = profile_from_row(&row(&[
            "Ada",
            "ada@x.com",
            "https://drive.google.com/file/d/1/view",
            "Rust",
            "public speaking",
            "Yes",
        ]))
        .unwrap();
        assert_eq!(profile.full_name, "Ada");
        assert_eq!(profile.email, "ada@x.com");
        assert!(profile.available_immediately);
    }

    #[test]
    fn test_availability_is_case_insensitive() {
        for cell in ["yes", "YES", "yEs"] {
            let profile =
                profile_from_row(&row(&["Ada", "ada@x.com", "", "", "", cell])).unwrap();
            assert!(profile.available_immediately, "cell {cell:?}");
        }
        let profile = profile_from_row(&row(&["Ada", "ada@x.com", "", "", "", "no"])).unwrap();
        assert!(!profile.available_immediately);
    }

    #[test]
    fn test_short_row_is_skipped() {
        assert!(profile_from_row(&row(&["Ada", "ada@x.com"])).is_none());
    }

    #[test]
    fn test_empty_email_is_skipped() {
        assert!(profile_from_row(&row(&["Ada", "  ", "", "", "", "yes"])).is_none());
    }

    fn make_staged(score: Option<i32>, contacted: Option<bool>) -> StagedCandidate {
        let now = Utc.with_ymd_and_hms(2025, 3, 29, 12, 0, 0).unwrap();
        StagedCandidate {
            candidate: CandidateRow {
                email: "ada@x.com".to_string(),
                full_name: "Ada".to_string(),
                resume_url: "doc://1".to_string(),
                resume_text: "text".to_string(),
                key_strengths: "Rust".to_string(),
                biggest_weakness: "public speaking".to_string(),
                available_immediately: true,
                contacted,
                contacted_at: contacted.and_then(|c| c.then_some(now)),
                created_at: now,
                updated_at: now,
            },
            evaluation: score.map(|s| EvaluationRow {
                id: Uuid::new_v4(),
                candidate_email: "ada@x.com".to_string(),
                score: s,
                notes: "notes".to_string(),
                evaluated_on: NaiveDate::from_ymd_opt(2025, 3, 29).unwrap(),
            }),
            freshly_evaluated: score.is_some(),
        }
    }

    #[test]
    fn test_roster_rows_header_and_cells() {
        let rows = roster_rows(&[make_staged(Some(92), Some(true))]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "Full Name");
        assert_eq!(rows[0].len(), rows[1].len());
        assert_eq!(rows[1][1], "ada@x.com");
        assert_eq!(rows[1][2], "92");
        assert_eq!(rows[1][3], "2025-03-29");
        assert_eq!(rows[1][6], "Yes");
        assert_eq!(rows[1][8], "True");
        assert_eq!(rows[1][9], "2025-03-29");
    }

    #[test]
    fn test_roster_rows_without_evaluation_or_contact() {
        let rows = roster_rows(&[make_staged(None, None)]);
        assert_eq!(rows[1][2], "");
        assert_eq!(rows[1][3], "");
        assert_eq!(rows[1][8], "");
        assert_eq!(rows[1][9], "");
    }
}
