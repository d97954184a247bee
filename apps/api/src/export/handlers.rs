use axum::{
    extract::{Query, State},
    http::{header, HeaderValue},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::delivery::{
    content_disposition, dated_pdf_filename, default_docx_filename, validate_filename, DOCX_MIME,
    PDF_MIME,
};
use crate::export::plan::{plan_sections, PlanPolicy, PlannedSection};
use crate::export::{encode_paged, encode_rich};
use crate::models::resume::ResumeRecord;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Docx,
    Pdf,
}

impl ExportFormat {
    fn policy(self) -> PlanPolicy {
        match self {
            ExportFormat::Docx => PlanPolicy::RICH,
            ExportFormat::Pdf => PlanPolicy::PAGED,
        }
    }
}

#[derive(Deserialize)]
pub struct PlanQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

#[derive(Serialize)]
pub struct PlanResponse {
    pub format: ExportFormat,
    pub sections: Vec<PlannedSection>,
}

#[derive(Deserialize)]
pub struct PdfExportQuery {
    pub filename: Option<String>,
}

type FileResponse = ([(header::HeaderName, HeaderValue); 2], Bytes);

/// POST /api/v1/resumes/plan
pub async fn handle_plan(
    Query(params): Query<PlanQuery>,
    Json(record): Json<ResumeRecord>,
) -> Json<PlanResponse> {
    let sections = plan_sections(&record, &params.format.policy());
    Json(PlanResponse {
        format: params.format,
        sections,
    })
}

/// POST /api/v1/resumes/export/docx
pub async fn handle_export_docx(
    State(state): State<AppState>,
    Json(record): Json<ResumeRecord>,
) -> Result<FileResponse, AppError> {
    let export_id = Uuid::new_v4();
    info!(%export_id, format = "docx", "Export requested");

    let bytes = encode_rich(&record, state.assets.as_ref(), state.delivery.as_deref())
        .await?
        .ok_or(AppError::ExportFailed)?;

    let filename = default_docx_filename(&record);
    info!(%export_id, %filename, bytes = bytes.len(), "Export ready");
    file_response(DOCX_MIME, &filename, bytes)
}

/// POST /api/v1/resumes/export/pdf
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    Query(params): Query<PdfExportQuery>,
    Json(record): Json<ResumeRecord>,
) -> Result<FileResponse, AppError> {
    let filename = match params.filename {
        Some(name) => {
            validate_filename(&name).map_err(AppError::Validation)?;
            name
        }
        None => dated_pdf_filename(&record, chrono::Local::now().date_naive()),
    };

    let export_id = Uuid::new_v4();
    info!(%export_id, format = "pdf", %filename, "Export requested");

    let bytes = encode_paged(&record, state.page_geometry).await?;
    info!(%export_id, bytes = bytes.len(), "Export ready");
    file_response(PDF_MIME, &filename, bytes)
}

fn file_response(
    mime: &'static str,
    filename: &str,
    bytes: Vec<u8>,
) -> Result<FileResponse, AppError> {
    let disposition = HeaderValue::from_str(&content_disposition(filename))
        .map_err(|e| AppError::Validation(format!("filename is not header-safe: {e}")))?;
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(mime)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Bytes::from(bytes),
    ))
}
