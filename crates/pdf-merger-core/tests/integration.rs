//! Integration tests for pdf-merger-core
//!
//! These tests verify the end-to-end workflow:
//! - Inputs with nested page trees
//! - Page order across several inputs
//! - Verbatim content streams
//! - Encrypted inputs
//! - All-or-nothing failure

use lopdf::{Document, Object, ObjectId};
use pdf_merger_core::{Error, MergeOptions, ParsedDocument, UploadedFile, merge};
use pdf_merger_fixtures::{
    document_page_texts, encrypted_pdf, nested_tree_pdf, page_texts, raw_page_contents,
};

// =============================================================================
// Test Fixtures
// =============================================================================

fn upload(bytes: Vec<u8>) -> UploadedFile {
    UploadedFile::new(None, bytes)
}

// =============================================================================
// Parsing Tests
// =============================================================================

#[test]
fn test_parsed_document_page_order() {
    let parsed = ParsedDocument::from_bytes(&nested_tree_pdf("x")).expect("parse");
    assert_eq!(parsed.page_count(), 3);
    assert_eq!(parsed.page_ids().len(), 3);
    assert_eq!(document_page_texts(parsed.document()), vec!["x1", "x2", "x3"]);
}

#[test]
fn test_parse_garbage_fails() {
    let result = ParsedDocument::from_bytes(b"%PDF-1.4\ngarbage");
    assert!(matches!(result, Err(Error::PdfOpen(_))));
}

#[test]
fn test_parse_empty_bytes_fails() {
    assert!(ParsedDocument::from_bytes(&[]).is_err());
}

#[test]
fn test_parse_password_protected_fails() {
    let result = ParsedDocument::from_bytes(&encrypted_pdf(&["hidden"], "secret"));
    assert!(matches!(result, Err(Error::PdfEncrypted)));
}

#[test]
fn test_parse_empty_user_password_is_decrypted() {
    let parsed = ParsedDocument::from_bytes(&encrypted_pdf(&["visible"], "")).expect("parse");
    assert!(!parsed.document().is_encrypted());
    assert_eq!(document_page_texts(parsed.document()), vec!["visible"]);
}

// =============================================================================
// Merge Tests
// =============================================================================

#[test]
fn test_merge_nested_trees_in_order() {
    let files = [upload(nested_tree_pdf("a")), upload(nested_tree_pdf("b"))];

    let output = merge(&files, "bundle", &MergeOptions::default()).expect("merge");
    assert_eq!(output.filename, "bundle.pdf");
    assert_eq!(output.page_count, 6);

    assert_eq!(
        page_texts(&output.bytes),
        vec!["a1", "a2", "a3", "b1", "b2", "b3"]
    );
}

#[test]
fn test_merge_keeps_inherited_attributes() {
    let output = merge(
        &[upload(nested_tree_pdf("r"))],
        "merged.pdf",
        &MergeOptions::default(),
    )
    .expect("merge");

    let merged = Document::load_mem(&output.bytes).expect("load merged");
    let pages: Vec<ObjectId> = merged.get_pages().into_values().collect();

    for &page_id in &pages {
        let page = merged.get_dictionary(page_id).expect("page dict");
        assert!(page.has(b"MediaBox"), "MediaBox should be pushed down");
        assert!(page.has(b"Resources"), "Resources should be pushed down");
    }

    let last = merged.get_dictionary(pages[2]).expect("page dict");
    assert_eq!(last.get(b"Rotate").and_then(Object::as_i64).ok(), Some(90));

    let first = merged.get_dictionary(pages[0]).expect("page dict");
    assert!(first.get(b"Rotate").is_err());
}

#[test]
fn test_merge_copies_content_streams_verbatim() {
    let a = nested_tree_pdf("a");
    let b = nested_tree_pdf("b");
    let output = merge(
        &[upload(a.clone()), upload(b.clone())],
        "merged.pdf",
        &MergeOptions::default(),
    )
    .expect("merge");

    let mut expected = raw_page_contents(&a);
    expected.extend(raw_page_contents(&b));
    assert_eq!(raw_page_contents(&output.bytes), expected);
}

#[test]
fn test_merge_content_length_matches() {
    for count in 1..=4 {
        let files: Vec<UploadedFile> = (0..count)
            .map(|i| upload(nested_tree_pdf(&format!("f{i}-"))))
            .collect();
        let output = merge(&files, "merged.pdf", &MergeOptions::default()).expect("merge");
        assert_eq!(output.content_length, output.bytes.len());
        assert_eq!(output.page_count, count * 3);
    }
}

#[test]
fn test_merge_aborts_when_first_input_is_corrupt() {
    let files = [upload(b"not a pdf".to_vec()), upload(nested_tree_pdf("ok"))];
    assert!(merge(&files, "merged.pdf", &MergeOptions::default()).is_err());
}

#[test]
fn test_merge_aborts_on_password_protected_input() {
    let files = [
        upload(nested_tree_pdf("ok")),
        upload(encrypted_pdf(&["locked"], "secret")),
    ];
    let result = merge(&files, "merged.pdf", &MergeOptions::default());
    assert!(matches!(result, Err(Error::PdfEncrypted)));
}
