use anyhow::{Context, Result};

use crate::evaluation::{EvaluationOptions, ReplyFormat};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
/// One attempt per model call; retries are opt-in.
const DEFAULT_LLM_MAX_RETRIES: &str = "1";
const DEFAULT_MAX_UPLOAD_MB: &str = "25";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub llm_max_retries: u32,
    pub reply_format: ReplyFormat,
    pub infer_sex: bool,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let llm_max_retries =
            parse_attempts(&optional_env("LLM_MAX_RETRIES", DEFAULT_LLM_MAX_RETRIES))?;
        let max_upload_bytes =
            parse_upload_limit(&optional_env("MAX_UPLOAD_MB", DEFAULT_MAX_UPLOAD_MB))?;

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: optional_env("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            llm_max_retries,
            reply_format: optional_env("REPLY_FORMAT", "json")
                .parse::<ReplyFormat>()
                .context("REPLY_FORMAT must be 'json' or 'labeled'")?,
            infer_sex: parse_flag(&optional_env("INFER_SEX", "false"))
                .context("INFER_SEX must be true or false")?,
            max_upload_bytes,
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }

    /// Options that shape prompts and reply parsing for every batch.
    pub fn evaluation_options(&self) -> EvaluationOptions {
        EvaluationOptions {
            reply_format: self.reply_format,
            infer_sex: self.infer_sex,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_attempts(value: &str) -> Result<u32> {
    let attempts = value
        .trim()
        .parse::<u32>()
        .context("LLM_MAX_RETRIES must be a positive integer")?;
    Ok(attempts.max(1))
}

fn parse_upload_limit(megabytes: &str) -> Result<usize> {
    megabytes
        .trim()
        .parse::<usize>()
        .context("MAX_UPLOAD_MB must be a whole number of megabytes")?
        .checked_mul(1024 * 1024)
        .context("MAX_UPLOAD_MB is too large")
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("unrecognized boolean value '{other}'"),
    }
}
