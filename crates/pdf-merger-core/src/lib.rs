//! PDF Merger Core Library
//!
//! This library provides the core functionality for merging PDF documents:
//! - PDF parsing and page-tree flattening
//! - Ordered page accumulation into a single output document
//! - Output filename normalization
//! - Server configuration

pub mod config;
pub mod error;
pub mod merge;
pub mod pdf;
pub mod util;

pub use config::{DEFAULT_OUTPUT_FILENAME, MergeOptions, ServerConfig};
pub use error::{Error, Result};
pub use merge::{MergedOutput, UploadedFile, merge, normalize_filename};
pub use pdf::{OutputAccumulator, ParsedDocument};
