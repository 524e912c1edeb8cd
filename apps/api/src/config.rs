use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Constructed once in `main` and passed down explicitly — no global state.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,

    // Roster spreadsheet
    pub spreadsheet_id: String,
    pub sheets_api_token: String,
    pub sheets_range: String,
    pub results_sheet_title: String,

    // Screening policy
    pub target_role: String,
    pub eligibility_threshold: i32,

    // Outbound email
    pub smtp_server: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_pass: String,
    pub from_email: String,
    pub from_name: String,

    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            spreadsheet_id: require_env("SPREADSHEET_ID")?,
            sheets_api_token: require_env("SHEETS_API_TOKEN")?,
            sheets_range: env_or("SHEETS_RANGE", "Sheet1!A2:F"),
            results_sheet_title: env_or("RESULTS_SHEET_TITLE", "Candidate Evaluations"),
            target_role: require_env("TARGET_ROLE")?,
            eligibility_threshold: std::env::var("ELIGIBILITY_THRESHOLD")
                .unwrap_or_else(|_| "70".to_string())
                .parse::<i32>()
                .context("ELIGIBILITY_THRESHOLD must be an integer")?,
            smtp_server: require_env("SMTP_SERVER")?,
            smtp_port: std::env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse::<u16>()
                .context("SMTP_PORT must be a valid port number")?,
            smtp_user: require_env("SMTP_USER")?,
            smtp_pass: require_env("SMTP_PASS")?,
            from_email: require_env("FROM_EMAIL")?,
            from_name: env_or("FROM_NAME", "Hiring Team"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
