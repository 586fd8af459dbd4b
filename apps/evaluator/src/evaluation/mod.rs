// Evaluation pipeline: prompt → model → parse, orchestrated per batch.
// All LLM calls go through llm_client — no direct HTTP calls here.

pub mod batch;
pub mod handlers;
pub mod parser;
pub mod prompts;
pub mod requester;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shape the model is asked to reply in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyFormat {
    /// A single JSON object, validated strictly.
    #[default]
    Json,
    /// `Label: value` lines, parsed best-effort.
    Labeled,
}

#[derive(Debug, Error)]
#[error("unknown reply format '{0}'")]
pub struct UnknownReplyFormat(String);

impl FromStr for ReplyFormat {
    type Err = UnknownReplyFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ReplyFormat::Json),
            "labeled" | "labelled" | "lines" => Ok(ReplyFormat::Labeled),
            other => Err(UnknownReplyFormat(other.to_string())),
        }
    }
}

/// Per-deployment knobs applied to every file in a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationOptions {
    pub reply_format: ReplyFormat,
    /// Whether the model is asked to infer the candidate's sex. Off by default.
    pub infer_sex: bool,
}
