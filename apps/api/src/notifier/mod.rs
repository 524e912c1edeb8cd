//! Qualification email delivery over SMTP.
//!
//! Failures surface as `NotifyError`; the pipeline logs and swallows them —
//! a computed score is never discarded because an email could not be sent.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::models::candidate::CandidateRow;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Invalid mailbox: {0}")]
    Mailbox(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Send task aborted: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// The notifier seam.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, candidate: &CandidateRow) -> Result<(), NotifyError>;
}

/// Sends the qualification email through an authenticated STARTTLS relay.
#[derive(Clone)]
pub struct SmtpNotifier {
    server: String,
    port: u16,
    user: String,
    pass: String,
    from_email: String,
    from_name: String,
}

impl SmtpNotifier {
    pub fn new(config: &Config) -> Self {
        Self {
            server: config.smtp_server.clone(),
            port: config.smtp_port,
            user: config.smtp_user.clone(),
            pass: config.smtp_pass.clone(),
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
        }
    }

    fn qualification_email(&self, candidate: &CandidateRow) -> Result<Message, NotifyError> {
        let message = Message::builder()
            .from(format!("{} <{}>", self.from_name, self.from_email).parse()?)
            .to(format!("{} <{}>", candidate.full_name, candidate.email).parse()?)
            .subject("Application Update")
            .header(ContentType::TEXT_HTML)
            .body(build_email_body(&candidate.full_name))?;
        Ok(message)
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, candidate: &CandidateRow) -> Result<(), NotifyError> {
        debug!("Sending qualification email to {}", candidate.email);

        let message = self.qualification_email(candidate)?;
        let creds = Credentials::new(self.user.clone(), self.pass.clone());
        let mailer = SmtpTransport::starttls_relay(&self.server)?
            .port(self.port)
            .credentials(creds)
            .build();

        // lettre's sync transport blocks on socket I/O
        tokio::task::spawn_blocking(move || mailer.send(&message)).await??;
        Ok(())
    }
}

fn build_email_body(full_name: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"></head>
<body style="font-family: Arial, sans-serif; line-height: 1.5; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
    <div style="margin-bottom: 20px;">
        <p style="font-size: 16px; margin-bottom: 10px;">
            Hi <strong>{full_name}</strong>,
        </p>
        <p style="font-size: 16px;">
            Thanks for applying! Based on our initial screening, we'd like to
            move forward with your application.
        </p>
    </div>
    <div style="margin-top: 30px; font-size: 14px; color: #666;">
        <p>Best regards,</p>
        <p>The Hiring Team</p>
    </div>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_greets_candidate_by_name() {
        let body = build_email_body("Ada");
        assert!(body.contains("Hi <strong>Ada</strong>"));
        assert!(body.contains("move forward with your application"));
    }
}
