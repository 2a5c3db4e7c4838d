//! PDF Merger CLI - Command line tool for merging PDF documents.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_merger_core::{MergedOutput, ServerConfig, UploadedFile};
use std::path::{Path, PathBuf};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "pdf-merge")]
#[command(author, version, about = "Merge PDF documents in order", long_about = None)]
struct Args {
    /// Input PDF files, merged in the order given
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output PDF file (".pdf" is appended if missing)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Re-encode streams with Flate (inputs are copied verbatim otherwise)
    #[arg(long)]
    compress: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Read each input in order.
async fn read_inputs(paths: &[PathBuf], pb: &ProgressBar) -> Result<Vec<UploadedFile>> {
    let mut files = Vec::with_capacity(paths.len());

    for path in paths {
        pb.set_message(path.display().to_string());

        let data = tokio::fs::read(path)
            .await
            .context(format!("Failed to read input: {}", path.display()))?;

        let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        files.push(UploadedFile::new(name, data));
        pb.inc(1);
    }

    Ok(files)
}

/// Merge `paths` and write the result to `output`, with ".pdf" appended
/// when it lacks that suffix.
///
/// `pb` advances once per input read and once more after the merged file
/// is written.
async fn merge_files(
    paths: &[PathBuf],
    output: &Path,
    config: &ServerConfig,
    pb: &ProgressBar,
) -> Result<(PathBuf, MergedOutput)> {
    let files = read_inputs(paths, pb).await?;

    pb.set_message("Merging");
    let merged = pdf_merger_core::merge(&files, &output.to_string_lossy(), &config.merge)
        .context("Failed to merge PDFs")?;

    let output_path = PathBuf::from(&merged.filename);
    tokio::fs::write(&output_path, &merged.bytes)
        .await
        .context(format!("Failed to write output: {}", output_path.display()))?;
    pb.inc(1);

    Ok((output_path, merged))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging
    let log_level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let mut config = if let Some(config_path) = &args.config {
        ServerConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        ServerConfig::load()
    };

    if args.compress {
        config.merge.compress = true;
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.default_output_filename));

    info!("Merging {} files", args.inputs.len());

    // One step per input plus the merge itself
    let pb = ProgressBar::new(args.inputs.len() as u64 + 1);
    // Template is hardcoded and valid, unwrap is safe
    #[allow(clippy::unwrap_used)]
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let (output_path, merged) = merge_files(&args.inputs, &output, &config, &pb).await?;

    pb.finish_with_message("Merge complete");

    // CLI output is intentional
    #[allow(clippy::print_stdout)]
    {
        println!(
            "Merged {} pages ({} bytes) into: {}",
            merged.page_count,
            merged.content_length,
            output_path.display()
        );
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pdf_merger_fixtures::{page_texts, simple_pdf};

    #[tokio::test]
    async fn test_merge_files_writes_normalized_output() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.pdf");
        let b = dir.path().join("b.pdf");
        std::fs::write(&a, simple_pdf(&["a1", "a2"])).unwrap();
        std::fs::write(&b, simple_pdf(&["b1", "b2", "b3"])).unwrap();

        let output = dir.path().join("combined");
        let pb = ProgressBar::hidden();
        pb.set_length(3);
        let (path, merged) = merge_files(&[a, b], &output, &ServerConfig::default(), &pb)
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("combined.pdf"));
        assert!(!output.exists());
        assert_eq!(merged.page_count, 5);
        assert_eq!(pb.position(), 3);

        let written = std::fs::read(&path).unwrap();
        assert_eq!(written.len(), merged.content_length);
        assert_eq!(page_texts(&written), vec!["a1", "a2", "b1", "b2", "b3"]);
    }

    #[tokio::test]
    async fn test_missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.pdf");

        let result = merge_files(
            &[dir.path().join("missing.pdf")],
            &output,
            &ServerConfig::default(),
            &ProgressBar::hidden(),
        )
        .await;

        assert!(result.is_err());
        assert!(!output.exists());
    }
}
