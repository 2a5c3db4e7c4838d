//! Merge handler: ordered inputs in, one serialized PDF out.

use bytes::Bytes;
use tracing::{debug, info};

use crate::config::MergeOptions;
use crate::error::{Error, Result};
use crate::pdf::{OutputAccumulator, ParsedDocument};

const PDF_SUFFIX: &str = ".pdf";

/// One uploaded input document.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original filename, used only for log messages
    pub name: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(name: Option<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name,
            bytes: bytes.into(),
        }
    }

    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

/// Serialized merge result ready to be sent to a client.
#[derive(Debug, Clone)]
pub struct MergedOutput {
    pub bytes: Vec<u8>,
    /// Always `bytes.len()`
    pub content_length: usize,
    /// Output filename, guaranteed to end in `.pdf`
    pub filename: String,
    pub page_count: usize,
}

/// Append `.pdf` unless `name` already ends with it.
pub fn normalize_filename(name: &str) -> String {
    if name.ends_with(PDF_SUFFIX) {
        name.to_string()
    } else {
        format!("{name}{PDF_SUFFIX}")
    }
}

/// Merge `files` in order into a single PDF.
///
/// Fails as a whole if any input cannot be parsed; no partial output is
/// produced.
pub fn merge(
    files: &[UploadedFile],
    output_filename: &str,
    options: &MergeOptions,
) -> Result<MergedOutput> {
    if files.is_empty() {
        return Err(Error::NoInput);
    }

    let mut accumulator = OutputAccumulator::new();

    for (index, file) in files.iter().enumerate() {
        let doc = ParsedDocument::from_bytes(&file.bytes)?;
        let appended = accumulator.append(doc)?;
        debug!(
            "Input {} ({}): {} bytes, {} pages",
            index + 1,
            file.display_name(),
            file.bytes.len(),
            appended
        );
    }

    let page_count = accumulator.page_count();
    let bytes = accumulator.finish(options)?;
    let content_length = bytes.len();
    let filename = normalize_filename(output_filename);

    info!(
        "Merged {} files into {} ({} pages, {} bytes)",
        files.len(),
        filename,
        page_count,
        content_length
    );

    Ok(MergedOutput {
        bytes,
        content_length,
        filename,
        page_count,
    })
}
