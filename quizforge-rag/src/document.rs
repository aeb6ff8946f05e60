//! Data types for documents, chunks, outlines, and retrieval results.

use serde::{Deserialize, Serialize};

/// A source document: full text plus the per-page segments it was built from.
///
/// Immutable once ingested. The full text is the page segments joined with
/// a single newline, which is what [`Document::from_pages`] produces; chunk
/// spans and page assignment both rely on that layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for the document.
    pub id: String,
    /// The full text content of the document.
    pub text: String,
    /// Per-page text segments, in page order.
    pub pages: Vec<String>,
    /// Source filename, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Document {
    /// Build a document from per-page text segments.
    ///
    /// The full text is the pages joined with `\n`.
    pub fn from_pages(
        id: impl Into<String>,
        pages: Vec<String>,
        source: Option<String>,
    ) -> Self {
        let text = pages.join("\n");
        Self { id: id.into(), text, pages, source }
    }

    /// Character offset of the start of each page within [`Document::text`].
    pub fn page_offsets(&self) -> Vec<usize> {
        let mut offsets = Vec::with_capacity(self.pages.len());
        let mut offset = 0;
        for page in &self.pages {
            offsets.push(offset);
            offset += page.len() + 1; // joined with '\n'
        }
        offsets
    }
}

/// A bounded segment of a [`Document`], the unit of retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier for the chunk (`{document_id}_{seq}`).
    pub id: String,
    /// The ID of the parent [`Document`]. Back-reference, not ownership.
    pub document_id: String,
    /// The text content of the chunk.
    pub text: String,
    /// 1-based page number the chunk starts on.
    pub page: usize,
    /// Position of this chunk in document order.
    pub seq: usize,
    /// Byte span `(start, end)` within the document's full text.
    pub span: (usize, usize),
    /// The vector embedding for this chunk's text. Empty until embedded.
    pub embedding: Vec<f32>,
}

/// A detected section heading, derived at ingest time and not persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutlineEntry {
    /// 1-based page number the heading was found on.
    pub page: usize,
    /// The heading text as it appeared in the document.
    pub heading: String,
}

/// A retrieved [`Chunk`] paired with a similarity score. Transient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}

/// What an ingest run reports back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestReport {
    /// The ID minted for the ingested document.
    pub document_id: String,
    /// Number of chunks embedded and committed to the index.
    pub chunk_count: usize,
    /// Detected section headings in page-then-order sequence.
    pub outline: Vec<OutlineEntry>,
}
