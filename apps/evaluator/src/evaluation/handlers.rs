//! Axum route handlers for the Evaluation API.

use axum::{
    extract::{Multipart, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::evaluation::batch::{run_batch, UploadedFile};
use crate::models::evaluation::{BatchReport, EvaluationRecord};
use crate::report::{export_file_name, export_xlsx, render_table, XLSX_MIME};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Xlsx,
    Text,
}

#[derive(Debug, Default, Deserialize)]
pub struct EvaluateParams {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    #[serde(flatten)]
    pub report: BatchReport,
    pub export_file_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub records: Vec<EvaluationRecord>,
}

/// Profile text and files pulled out of a multipart form, in upload order.
#[derive(Debug, Default)]
struct EvaluationUpload {
    profile: String,
    files: Vec<UploadedFile>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/evaluations
///
/// Multipart form: `profile` (text) plus one or more `files`. Runs the whole
/// batch and answers with JSON, the spreadsheet, or a text table per `?format=`.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Query(params): Query<EvaluateParams>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let upload = read_upload(multipart).await?;

    let options = state.config.evaluation_options();
    let report = run_batch(state.evaluator.as_ref(), &options, &upload.profile, upload.files).await?;
    let file_name = export_file_name(&chrono::Local::now());

    match params.format {
        OutputFormat::Json => Ok(Json(EvaluateResponse {
            report,
            export_file_name: file_name,
        })
        .into_response()),
        OutputFormat::Xlsx => spreadsheet_response(&report.records, &file_name),
        OutputFormat::Text => Ok((
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            render_table(&report.records),
        )
            .into_response()),
    }
}

/// POST /api/v1/evaluations/export
///
/// Serializes an already-displayed result set without re-running the model.
pub async fn handle_export(Json(request): Json<ExportRequest>) -> Result<Response, AppError> {
    let file_name = export_file_name(&chrono::Local::now());
    spreadsheet_response(&request.records, &file_name)
}

fn spreadsheet_response(records: &[EvaluationRecord], file_name: &str) -> Result<Response, AppError> {
    let bytes = export_xlsx(records)?;
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

async fn read_upload(mut multipart: Multipart) -> Result<EvaluationUpload, AppError> {
    let mut upload = EvaluationUpload::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match (name.as_str(), field.file_name().map(str::to_string)) {
            ("profile", _) => upload.profile = field.text().await?,
            ("files" | "file", Some(file_name)) => {
                let content = field.bytes().await?;
                // a file input left blank still posts an empty, unnamed part
                if file_name.is_empty() && content.is_empty() {
                    debug!("Ignoring empty file field '{name}'");
                    continue;
                }
                upload.files.push(UploadedFile::new(file_name, content));
            }
            _ => debug!("Ignoring multipart field '{name}'"),
        }
    }

    Ok(upload)
}
