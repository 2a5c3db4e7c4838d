//! Merge route - multipart upload in, merged PDF download out.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::Response,
};
use axum_extra::extract::Multipart;
use pdf_merger_core::UploadedFile;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::helpers::{ApiError, ResultExt, RouteResult};
use crate::state::AppState;

const FILES_FIELD: &str = "files";
const OUTPUT_FILENAME_FIELD: &str = "output_filename";

/// Merge the uploaded `files` parts, in the order received, into one PDF.
///
/// Any failure while reading the upload, parsing an input or writing the
/// output is reported as a single generic 500; nothing partial is returned.
pub async fn merge_pdfs(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> RouteResult<Response> {
    let mut files = Vec::new();
    let mut output_filename: Option<String> = None;

    // Parts are read one at a time; their order is the output page order.
    while let Some(field) = multipart.next_field().await.or_processing_failure()? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            FILES_FIELD => {
                let filename = field.file_name().map(str::to_string);
                let data = field.bytes().await.or_processing_failure()?;
                debug!(
                    "Received {} ({} bytes)",
                    filename.as_deref().unwrap_or("<unnamed>"),
                    data.len()
                );
                files.push(UploadedFile::new(filename, data));
            }
            OUTPUT_FILENAME_FIELD => {
                output_filename = Some(field.text().await.or_processing_failure()?);
            }
            other => debug!("Ignoring form field '{}'", other),
        }
    }

    if files.is_empty() {
        warn!("Merge request without files");
        return Err(ApiError::no_files());
    }

    let output_filename = output_filename
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| state.default_output_filename().to_string());

    // Merge in a blocking task to avoid blocking the async runtime
    let options = *state.merge_options();
    let merged = tokio::task::spawn_blocking(move || {
        pdf_merger_core::merge(&files, &output_filename, &options)
    })
    .await
    .or_processing_failure()?
    .or_processing_failure()?;

    let disposition = HeaderValue::from_str(&format!("attachment; filename={}", merged.filename))
        .or_processing_failure()?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CONTENT_LENGTH, merged.content_length)
        .body(Body::from(merged.bytes))
        .or_processing_failure()
}
