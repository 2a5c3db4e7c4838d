use thiserror::Error;

/// Unified error type for pdf-merger-core
///
/// This enum encompasses all error cases that can occur in the library:
/// - PDF operations (parsing, page-tree walking, saving)
/// - Configuration operations (loading)
/// - General I/O operations
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Merge Errors
    // ==========================================================================
    /// No input documents were supplied
    #[error("no input documents to merge")]
    NoInput,

    // ==========================================================================
    // PDF Errors
    // ==========================================================================
    /// Failed to open or parse a PDF file
    #[error("failed to open PDF: {0}")]
    PdfOpen(String),

    /// The PDF is encrypted and cannot be merged
    #[error("PDF is encrypted")]
    PdfEncrypted,

    /// Failed to save a PDF
    #[error("failed to save PDF: {0}")]
    PdfSave(String),

    /// Error from the lopdf library
    #[error("lopdf error: {0}")]
    Lopdf(String),

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    // ==========================================================================
    // I/O Errors
    // ==========================================================================
    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lopdf::Error> for Error {
    fn from(e: lopdf::Error) -> Self {
        Self::Lopdf(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
