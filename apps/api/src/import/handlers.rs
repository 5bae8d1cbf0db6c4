use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use resume_parser::{LayoutHint, ParseOutcome, RawDocument, ResumeParser};
use serde::Deserialize;
use tokio::task::JoinError;
use tracing::info;

use crate::errors::AppError;
use crate::import::decode::{decode, DecodeError, DocumentFormat};
use crate::state::AppState;

const FILE_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct ImportTextRequest {
    pub text: String,
    #[serde(default)]
    pub layout_hints: Option<Vec<LayoutHint>>,
}

struct Upload {
    file_name: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(e.body_text())
    }
}

/// A panic inside a decoder (pdf-extract panics on some malformed files)
/// is reported as a decode failure of that upload.
fn decode_join_error(e: JoinError) -> AppError {
    if e.is_panic() {
        AppError::Decode(DecodeError::Crashed)
    } else {
        parse_join_error(e)
    }
}

/// Text imports decode nothing, so any task failure is internal.
fn parse_join_error(e: JoinError) -> AppError {
    AppError::Internal(anyhow::anyhow!("spawn_blocking failed during import: {e}"))
}

async fn read_upload(multipart: &mut Multipart) -> Result<Upload, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;
        return Ok(Upload {
            file_name,
            content_type,
            data,
        });
    }
    Err(AppError::Validation(format!(
        "multipart field '{FILE_FIELD}' is required"
    )))
}

fn log_outcome(source: &str, outcome: &ParseOutcome) {
    let record = outcome.record.as_ref();
    info!(
        source,
        success = outcome.success,
        confidence = outcome.confidence,
        experience = record.map_or(0, |r| r.experience.len()),
        education = record.map_or(0, |r| r.education.len()),
        warnings = outcome.warnings.len(),
        "Resume import finished"
    );
}

/// POST /api/v1/import
/// Multipart upload with a `file` field holding a PDF, DOCX or text résumé.
pub async fn handle_import(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ParseOutcome>, AppError> {
    let upload = read_upload(&mut multipart).await?;
    if upload.data.len() > state.config.max_upload_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "upload is {} bytes; the limit is {}",
            upload.data.len(),
            state.config.max_upload_bytes
        )));
    }

    let format = DocumentFormat::detect(
        upload.content_type.as_deref(),
        upload.file_name.as_deref(),
        &upload.data,
    )?;
    info!(
        "Importing {} ({} bytes) as {}",
        upload.file_name.as_deref().unwrap_or("<unnamed>"),
        upload.data.len(),
        format.as_str()
    );

    let parser: Arc<ResumeParser> = state.parser.clone();
    let data = upload.data;
    let outcome = tokio::task::spawn_blocking(move || -> Result<ParseOutcome, DecodeError> {
        let document = decode(&data, format)?;
        Ok(parser.parse_document(&document))
    })
    .await
    .map_err(decode_join_error)??;

    log_outcome(format.as_str(), &outcome);
    Ok(Json(outcome))
}

/// POST /api/v1/import/text
/// Already-decoded text, optionally with layout hints.
pub async fn handle_import_text(
    State(state): State<AppState>,
    Json(req): Json<ImportTextRequest>,
) -> Result<Json<ParseOutcome>, AppError> {
    let document = RawDocument {
        text: req.text,
        layout_hints: req.layout_hints,
    };
    let parser = state.parser.clone();
    let outcome = tokio::task::spawn_blocking(move || parser.parse_document(&document))
        .await
        .map_err(parse_join_error)?;

    log_outcome("json", &outcome);
    Ok(Json(outcome))
}
