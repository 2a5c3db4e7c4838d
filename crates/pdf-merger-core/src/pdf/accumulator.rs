//! Page accumulation for merged output.
//!
//! Each appended document is renumbered above the objects already held, its
//! page tree is flattened (inheritable attributes pushed down onto the pages)
//! and its structural objects are dropped. `finish` builds a fresh page tree
//! and catalog over the collected pages.

use std::collections::{BTreeMap, HashSet};

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::trace;

use crate::config::MergeOptions;
use crate::error::{Error, Result};
use crate::pdf::ParsedDocument;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in malformed files.
const MAX_TREE_DEPTH: usize = 64;

const DEFAULT_VERSION: &str = "1.5";

/// Ordered collection of pages destined for one output document.
#[derive(Debug, Default)]
pub struct OutputAccumulator {
    objects: BTreeMap<ObjectId, Object>,
    /// Page ids in output order
    page_ids: Vec<ObjectId>,
    max_id: u32,
    version: Option<String>,
}

impl OutputAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages appended so far
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Append every page of `doc`, in its own page order, after the pages
    /// already held.
    pub fn append(&mut self, doc: ParsedDocument) -> Result<usize> {
        let mut doc = doc.into_inner();

        doc.renumber_objects_with(self.max_id + 1);

        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        for &page_id in &page_ids {
            push_down_inherited(&mut doc, page_id)?;
        }

        let pages: HashSet<ObjectId> = page_ids.iter().copied().collect();
        let mut next_max = doc.max_id.max(self.max_id);

        for (object_id, object) in std::mem::take(&mut doc.objects) {
            match object.type_name().unwrap_or(b"") {
                b"Catalog" | b"Pages" | b"Outlines" | b"Outline" | b"XRef" => {}
                b"Page" if !pages.contains(&object_id) => {}
                _ => {
                    next_max = next_max.max(object_id.0);
                    self.objects.insert(object_id, object);
                }
            }
        }

        if self.version.as_deref().is_none_or(|v| doc.version.as_str() > v) {
            self.version = Some(std::mem::take(&mut doc.version));
        }

        trace!("Appended {} pages, max object id {}", page_ids.len(), next_max);

        self.max_id = next_max;
        let appended = page_ids.len();
        self.page_ids.extend(page_ids);
        Ok(appended)
    }

    /// Build the page tree and catalog, then serialize the output document.
    pub fn finish(self, options: &MergeOptions) -> Result<Vec<u8>> {
        let mut document =
            Document::with_version(self.version.as_deref().unwrap_or(DEFAULT_VERSION));
        document.objects = self.objects;
        document.max_id = self.max_id;

        let pages_id = document.new_object_id();

        for &page_id in &self.page_ids {
            let page = document
                .get_object_mut(page_id)
                .and_then(Object::as_dict_mut)
                .map_err(|e| Error::Lopdf(format!("Page {page_id:?} is not a dictionary: {e}")))?;
            page.set("Parent", Object::Reference(pages_id));
        }

        let kids: Vec<Object> = self
            .page_ids
            .iter()
            .map(|&id| Object::Reference(id))
            .collect();

        #[allow(clippy::cast_possible_wrap)]
        let count = self.page_ids.len() as i64;

        let pages_dict = Dictionary::from_iter([
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(count)),
        ]);
        document.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = document.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        document.trailer.set("Root", Object::Reference(catalog_id));

        document.renumber_objects();
        if options.compress {
            document.compress();
        }

        let mut output = Vec::new();
        document
            .save_to(&mut output)
            .map_err(|e| Error::PdfSave(format!("Failed to save merged PDF: {e}")))?;

        Ok(output)
    }
}

/// Copy inheritable attributes from ancestor `Pages` nodes onto the page
/// itself, unless the page already defines them.
fn push_down_inherited(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let page = doc.get_dictionary(page_id)?;

    let mut missing: Vec<&[u8]> = INHERITABLE_KEYS
        .iter()
        .copied()
        .filter(|key| !page.has(key))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }

    let mut inherited: Vec<(Vec<u8>, Object)> = Vec::new();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

    for _ in 0..MAX_TREE_DEPTH {
        let Some(node_id) = parent else { break };
        let Ok(node) = doc.get_dictionary(node_id) else { break };

        missing.retain(|key| {
            node.get(key).map_or(true, |value| {
                inherited.push((key.to_vec(), value.clone()));
                false
            })
        });

        if missing.is_empty() {
            break;
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    if inherited.is_empty() {
        return Ok(());
    }

    let page = doc.get_object_mut(page_id).and_then(Object::as_dict_mut)?;
    for (key, value) in inherited {
        page.set(key, value);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pdf_merger_fixtures::{inherited_media_box_pdf, page_texts, raw_page_contents, simple_pdf};

    #[test]
    fn test_empty_accumulator_produces_zero_page_document() {
        let bytes = OutputAccumulator::new().finish(&MergeOptions::default()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert!(doc.get_pages().is_empty());
    }

    #[test]
    fn test_append_preserves_order() {
        let mut acc = OutputAccumulator::new();
        let a = ParsedDocument::from_bytes(&simple_pdf(&["A1", "A2"])).unwrap();
        let b = ParsedDocument::from_bytes(&simple_pdf(&["B1"])).unwrap();

        assert_eq!(acc.append(a).unwrap(), 2);
        assert_eq!(acc.append(b).unwrap(), 1);
        assert_eq!(acc.page_count(), 3);

        let bytes = acc.finish(&MergeOptions::default()).unwrap();
        assert_eq!(page_texts(&bytes), vec!["A1", "A2", "B1"]);
    }

    #[test]
    fn test_default_options_copy_streams_verbatim() {
        let input = simple_pdf(&["Plain", "Text"]);
        let mut acc = OutputAccumulator::new();
        acc.append(ParsedDocument::from_bytes(&input).unwrap())
            .unwrap();

        let bytes = acc.finish(&MergeOptions::default()).unwrap();
        assert_eq!(raw_page_contents(&bytes), raw_page_contents(&input));
    }

    #[test]
    fn test_compressed_output() {
        // Flate only replaces streams it actually shrinks
        let text = "squeeze ".repeat(64);
        let input = simple_pdf(&[&text]);
        let mut acc = OutputAccumulator::new();
        acc.append(ParsedDocument::from_bytes(&input).unwrap())
            .unwrap();

        let bytes = acc.finish(&MergeOptions { compress: true }).unwrap();
        assert_eq!(page_texts(&bytes), vec![text]);
        assert_ne!(raw_page_contents(&bytes), raw_page_contents(&input));
    }

    #[test]
    fn test_inherited_attributes_pushed_down() {
        let mut acc = OutputAccumulator::new();
        let parsed =
            ParsedDocument::from_bytes(&inherited_media_box_pdf()).unwrap();
        acc.append(parsed).unwrap();

        let bytes = acc.finish(&MergeOptions::default()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let page = doc.get_dictionary(page_id).unwrap();

        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        assert_eq!(media_box.len(), 4);
        assert_eq!(media_box[2].as_i64().unwrap(), 300);
        assert!(page.has(b"Resources"));
    }

    #[test]
    fn test_output_has_single_catalog() {
        let mut acc = OutputAccumulator::new();
        for text in ["one", "two", "three"] {
            acc.append(ParsedDocument::from_bytes(&simple_pdf(&[text])).unwrap())
                .unwrap();
        }

        let bytes = acc.finish(&MergeOptions::default()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let catalogs = doc
            .objects
            .values()
            .filter(|o| o.type_name().ok() == Some(b"Catalog".as_slice()))
            .count();
        assert_eq!(catalogs, 1);
    }
}
