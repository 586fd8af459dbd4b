//! Batch Orchestrator — runs Extractor → Requester → Parser over every upload.
//!
//! Files are processed one at a time in upload order. Each file ends as a
//! record, a tagged failure, or a skip; a bad file never aborts the batch.

use bytes::Bytes;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::evaluation::parser::parse_reply;
use crate::evaluation::requester::{build_prompt, CandidateEvaluator};
use crate::evaluation::EvaluationOptions;
use crate::extraction::{extract_text, DocumentKind};
use crate::models::evaluation::{
    BatchReport, EvaluationRecord, FailedFile, FailureKind, FileOutcome, SkippedFile,
};

/// One uploaded file, held in memory for the duration of the batch.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content: Bytes,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }
}

/// Evaluates every file against the recruiter's profile.
///
/// Rejects a blank profile or an empty file set before touching any file.
pub async fn run_batch(
    evaluator: &dyn CandidateEvaluator,
    options: &EvaluationOptions,
    profile: &str,
    files: Vec<UploadedFile>,
) -> Result<BatchReport, AppError> {
    if profile.trim().is_empty() {
        return Err(AppError::Validation(
            "Por favor ingresa el perfil buscado (profile is required)".to_string(),
        ));
    }
    if files.is_empty() {
        return Err(AppError::Validation(
            "Carga al menos un archivo (at least one file is required)".to_string(),
        ));
    }

    let mut report = BatchReport::new(Uuid::new_v4());
    info!(batch_id = %report.batch_id, files = files.len(), "Starting evaluation batch");

    for file in files {
        let outcome = process_file(evaluator, options, profile, file).await;
        report.push(outcome);
    }

    info!(
        batch_id = %report.batch_id,
        evaluated = report.records.len(),
        failed = report.failures.len(),
        skipped = report.skipped.len(),
        "Evaluation batch finished"
    );

    Ok(report)
}

async fn process_file(
    evaluator: &dyn CandidateEvaluator,
    options: &EvaluationOptions,
    profile: &str,
    file: UploadedFile,
) -> FileOutcome {
    let UploadedFile { file_name, content } = file;

    let Some(kind) = DocumentKind::from_file_name(&file_name) else {
        warn!("Skipping unsupported file: {file_name}");
        return FileOutcome::Skipped(SkippedFile {
            warning: format!("Ignorado: {file_name} (solo se admiten .pdf y .docx)"),
            file_name,
        });
    };

    info!("Evaluating: {file_name}");

    let cv_text = match extract_text(content, kind).await {
        Ok(text) => text,
        Err(e) => return failed(file_name, FailureKind::Extraction, e.to_string()),
    };
    if cv_text.trim().is_empty() {
        warn!("No text extracted from {file_name}; evaluating empty document");
    }

    let prompt = build_prompt(&cv_text, profile, options);
    let reply = match evaluator.evaluate(&prompt).await {
        Ok(reply) => reply,
        Err(e) => return failed(file_name, FailureKind::Model, format!("Error: {e}")),
    };

    match parse_reply(&reply, options) {
        Ok(evaluation) => {
            info!("Evaluated {file_name}: score {}", evaluation.score);
            FileOutcome::Evaluated(EvaluationRecord {
                file_name,
                evaluation,
            })
        }
        Err(e) => failed(file_name, FailureKind::Unparseable, e.to_string()),
    }
}

fn failed(file_name: String, kind: FailureKind, message: String) -> FileOutcome {
    error!("Evaluation of {file_name} failed ({kind:?}): {message}");
    FileOutcome::Failed(FailedFile {
        file_name,
        kind,
        message,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use docx_rs::{Docx, Paragraph, Run};

    use super::*;
    use crate::evaluation::ReplyFormat;
    use crate::llm_client::{ChatPrompt, LlmError};

    /// Replays canned replies in order and records every prompt it receives.
    struct ScriptedEvaluator {
        replies: Mutex<Vec<Result<String, LlmError>>>,
        prompts: Mutex<Vec<ChatPrompt>>,
        calls: AtomicUsize,
    }

    impl ScriptedEvaluator {
        fn new(replies: Vec<Result<String, LlmError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                prompts: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }
        }

        fn always(reply: &str, times: usize) -> Self {
            Self::new((0..times).map(|_| Ok(reply.to_string())).collect())
        }
    }

    #[async_trait]
    impl CandidateEvaluator for ScriptedEvaluator {
        async fn evaluate(&self, prompt: &ChatPrompt) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.clone());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(LlmError::EmptyContent))
        }
    }

    fn labeled() -> EvaluationOptions {
        EvaluationOptions {
            reply_format: ReplyFormat::Labeled,
            infer_sex: false,
        }
    }

    fn docx_bytes(text: &str) -> Vec<u8> {
        let mut buf = std::io::Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)))
            .build()
            .pack(&mut buf)
            .unwrap();
        buf.into_inner()
    }

    #[tokio::test]
    async fn test_empty_profile_processes_nothing() {
        let evaluator = ScriptedEvaluator::always("Puntuación: 8/10", 1);
        let files = vec![UploadedFile::new("ana.docx", docx_bytes("Ana"))];

        let result = run_batch(&evaluator, &labeled(), "   ", files).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(evaluator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_files_is_rejected() {
        let evaluator = ScriptedEvaluator::always("Puntuación: 8/10", 1);
        let result = run_batch(&evaluator, &labeled(), "Diseñador", Vec::new()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_only_unsupported_files_yield_empty_result_set() {
        let evaluator = ScriptedEvaluator::always("Puntuación: 8/10", 2);
        let files = vec![
            UploadedFile::new("notes.txt", "hola"),
            UploadedFile::new("cv.doc", "legacy"),
        ];

        let report = run_batch(&evaluator, &labeled(), "Diseñador", files).await.unwrap();

        assert!(report.records.is_empty());
        assert!(report.failures.is_empty());
        assert_eq!(report.skipped.len(), 2);
        assert!(report.skipped[0].warning.contains("notes.txt"));
        assert_eq!(evaluator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_k_supported_files_yield_k_records_in_upload_order() {
        let evaluator = ScriptedEvaluator::new(vec![
            Ok("Nombre: Ana\nPuntuación: 8/10".to_string()),
            Ok("Nombre: Luis\nPuntuación: 5/10".to_string()),
            Ok("Nombre: Ana\nPuntuación: 8/10".to_string()),
        ]);
        let files = vec![
            UploadedFile::new("ana.docx", docx_bytes("Ana")),
            UploadedFile::new("luis.DOCX", docx_bytes("Luis")),
            UploadedFile::new("ana.docx", docx_bytes("Ana")),
        ];

        let report = run_batch(&evaluator, &labeled(), "Diseñador", files).await.unwrap();

        let rows: Vec<_> = report
            .records
            .iter()
            .map(|r| (r.file_name.as_str(), r.evaluation.score.as_str()))
            .collect();
        assert_eq!(
            rows,
            [("ana.docx", "8/10"), ("luis.DOCX", "5/10"), ("ana.docx", "8/10")]
        );
    }

    #[tokio::test]
    async fn test_extracted_text_and_profile_reach_the_prompt() {
        let evaluator = ScriptedEvaluator::always("Puntuación: 7/10", 1);
        let files = vec![UploadedFile::new("ana.docx", docx_bytes("Experta en Figma"))];

        run_batch(&evaluator, &labeled(), "Diseñador gráfico", files)
            .await
            .unwrap();

        let prompts = evaluator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].user.contains("Experta en Figma"));
        assert!(prompts[0].user.contains("Diseñador gráfico"));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_isolated() {
        let evaluator = ScriptedEvaluator::always("Puntuación: 6/10", 1);
        let files = vec![
            UploadedFile::new("broken.pdf", "definitely not a pdf"),
            UploadedFile::new("ok.docx", docx_bytes("Luis")),
        ];

        let report = run_batch(&evaluator, &labeled(), "Diseñador", files).await.unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].file_name, "broken.pdf");
        assert_eq!(report.failures[0].kind, FailureKind::Extraction);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].file_name, "ok.docx");
    }

    #[tokio::test]
    async fn test_model_failure_is_tagged_and_batch_continues() {
        let evaluator = ScriptedEvaluator::new(vec![
            Err(LlmError::Api {
                status: 401,
                message: "invalid api key".to_string(),
            }),
            Ok("Puntuación: 9/10".to_string()),
        ]);
        let files = vec![
            UploadedFile::new("a.docx", docx_bytes("A")),
            UploadedFile::new("b.docx", docx_bytes("B")),
        ];

        let report = run_batch(&evaluator, &labeled(), "Diseñador", files).await.unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].kind, FailureKind::Model);
        assert!(report.failures[0].message.starts_with("Error: "));
        assert!(report.failures[0].message.contains("invalid api key"));
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].evaluation.score, "9/10");
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_tagged() {
        let evaluator = ScriptedEvaluator::always("Lo siento, no puedo evaluar este CV.", 1);
        let options = EvaluationOptions {
            reply_format: ReplyFormat::Json,
            infer_sex: false,
        };
        let files = vec![UploadedFile::new("a.docx", docx_bytes("A"))];

        let report = run_batch(&evaluator, &options, "Diseñador", files).await.unwrap();

        assert!(report.records.is_empty());
        assert_eq!(report.failures[0].kind, FailureKind::Unparseable);
    }

    #[tokio::test]
    async fn test_sex_column_stays_empty_when_inference_is_off() {
        let evaluator = ScriptedEvaluator::new(vec![
            Ok("Nombre: Ana\nSexo: Femenino\nPuntuación: 8/10".to_string()),
            Ok(r#"{"name": "Luis", "sex": "Masculino", "score": 6, "justification": "ok"}"#
                .to_string()),
        ]);
        let files = vec![
            UploadedFile::new("ana.docx", docx_bytes("Ana")),
            UploadedFile::new("luis.docx", docx_bytes("Luis")),
        ];

        let report = run_batch(&evaluator, &labeled(), "Diseñador", files[..1].to_vec())
            .await
            .unwrap();
        assert_eq!(report.records[0].evaluation.name, "Ana");
        assert_eq!(report.records[0].evaluation.sex, "");

        let json = EvaluationOptions {
            reply_format: ReplyFormat::Json,
            infer_sex: false,
        };
        let report = run_batch(&evaluator, &json, "Diseñador", files[1..].to_vec())
            .await
            .unwrap();
        assert_eq!(report.records[0].evaluation.name, "Luis");
        assert_eq!(report.records[0].evaluation.sex, "");
    }
}
