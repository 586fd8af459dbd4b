//! Evaluation Requester — composes the recruiter prompt and sends it to the model.
//!
//! `AppState` holds an `Arc<dyn CandidateEvaluator>`, so the batch orchestrator
//! never depends on a concrete model backend.

use async_trait::async_trait;

use crate::evaluation::prompts::{
    EVALUATION_PROMPT_TEMPLATE, JSON_OUTPUT_FORMAT, JSON_SEX_KEY, LABELED_OUTPUT_FORMAT,
    LABELED_SEX_LINE, RECRUITER_SYSTEM,
};
use crate::evaluation::{EvaluationOptions, ReplyFormat};
use crate::llm_client::prompts::with_json_only;
use crate::llm_client::{ChatPrompt, LlmClient, LlmError};

/// Sends one composed prompt to a model and returns its raw reply text.
#[async_trait]
pub trait CandidateEvaluator: Send + Sync {
    async fn evaluate(&self, prompt: &ChatPrompt) -> Result<String, LlmError>;
}

/// Production evaluator backed by the chat-completions client.
pub struct LlmEvaluator(pub LlmClient);

#[async_trait]
impl CandidateEvaluator for LlmEvaluator {
    async fn evaluate(&self, prompt: &ChatPrompt) -> Result<String, LlmError> {
        self.0.complete(prompt).await
    }
}

/// Builds the system + user prompt for one CV against the recruiter's profile.
pub fn build_prompt(cv_text: &str, target_profile: &str, options: &EvaluationOptions) -> ChatPrompt {
    let output_format = match options.reply_format {
        ReplyFormat::Json => JSON_OUTPUT_FORMAT
            .replace("{sex_key}", if options.infer_sex { JSON_SEX_KEY } else { "" }),
        ReplyFormat::Labeled => LABELED_OUTPUT_FORMAT
            .replace("{sex_line}", if options.infer_sex { LABELED_SEX_LINE } else { "" }),
    };

    let user = EVALUATION_PROMPT_TEMPLATE
        .replace("{output_format}", &output_format)
        .replace("{profile}", target_profile.trim())
        .replace("{cv_text}", cv_text);

    let (system, json_mode) = match options.reply_format {
        ReplyFormat::Json => (with_json_only(RECRUITER_SYSTEM), true),
        ReplyFormat::Labeled => (RECRUITER_SYSTEM.to_string(), false),
    };

    ChatPrompt {
        system,
        user,
        json_mode,
    }
}
