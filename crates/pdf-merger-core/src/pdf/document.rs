use lopdf::{Document, ObjectId};

use crate::error::{Error, Result};

/// A parsed input PDF whose pages are waiting to be appended to the output.
pub struct ParsedDocument {
    inner: Document,
    /// Page object ids ordered by page number
    page_ids: Vec<ObjectId>,
}

impl ParsedDocument {
    /// Parse a PDF from bytes.
    ///
    /// Encrypted documents are rejected: their pages cannot be copied into an
    /// unencrypted output without the key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let inner = Document::load_mem(bytes)
            .map_err(|e| Error::PdfOpen(format!("Failed to parse PDF: {e}")))?;

        if inner.is_encrypted() {
            return Err(Error::PdfEncrypted);
        }

        let page_ids = inner.get_pages().into_values().collect();

        Ok(Self { inner, page_ids })
    }

    /// Get number of pages
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Page object ids in page order.
    pub fn page_ids(&self) -> &[ObjectId] {
        &self.page_ids
    }

    pub const fn document(&self) -> &Document {
        &self.inner
    }

    /// Hand over the underlying document, consuming the wrapper.
    pub fn into_inner(self) -> Document {
        self.inner
    }
}

impl std::fmt::Debug for ParsedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedDocument")
            .field("page_count", &self.page_ids.len())
            .field("object_count", &self.inner.objects.len())
            .finish()
    }
}
