//! Resume text extraction.
//!
//! Soft-failure contract: extraction never errors toward the pipeline. Any
//! problem — unrecognized URL, download failure, unreadable document —
//! yields an empty string, and the run continues with whatever text exists.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, warn};

/// The extractor seam.
#[async_trait]
pub trait ResumeExtractor: Send + Sync {
    /// Returns the plain text of the referenced document, or an empty
    /// string when it cannot be read. Best-effort: the text may be
    /// truncated or partial.
    async fn extract_text(&self, resume_url: &str) -> String;
}

/// Downloads resumes shared as Google Drive links and extracts PDF text.
#[derive(Clone)]
pub struct DriveResumeExtractor {
    client: Client,
}

impl Default for DriveResumeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DriveResumeExtractor {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    async fn download_and_extract(&self, file_id: &str) -> anyhow::Result<String> {
        let url = format!("https://drive.google.com/uc?export=download&id={file_id}");
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let data: Bytes = response.bytes().await?;

        debug!("Downloaded {} bytes for file {file_id}", data.len());

        let text = pdf_extract::extract_text_from_mem(&data)
            .map_err(|e| anyhow::anyhow!("PDF text extraction failed: {e}"))?;
        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl ResumeExtractor for DriveResumeExtractor {
    async fn extract_text(&self, resume_url: &str) -> String {
        let Some(file_id) = drive_file_id(resume_url) else {
            warn!("Unrecognized resume URL: {resume_url}");
            return String::new();
        };

        match self.download_and_extract(&file_id).await {
            Ok(text) => text,
            Err(err) => {
                warn!("Resume extraction failed for {resume_url}: {err}");
                String::new()
            }
        }
    }
}

/// Pulls the file id out of a Google Drive share link.
/// Handles both `/file/d/<id>/...` and `?id=<id>` URL forms.
fn drive_file_id(url: &str) -> Option<String> {
    if !url.contains("drive.google.com") {
        return None;
    }

    if let Some(rest) = url.split("/file/d/").nth(1) {
        let id: String = rest
            .chars()
            .take_while(|c| !matches!(c, '/' | '?' | '#'))
            .collect();
        if !id.is_empty() {
            return Some(id);
        }
    }

    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);
    for pair in query.split('&') {
        if let Some(id) = pair.strip_prefix("id=") {
            if !id.is_empty() {
                return Some(id.to_string());
            }
        }
    }
    None
}
