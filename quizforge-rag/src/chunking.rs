//! Document chunking.
//!
//! This module provides the [`Chunker`] trait and [`BoundaryChunker`], which
//! splits by character count with configurable overlap, preferring paragraph
//! and sentence breaks near the target cut point.

use crate::document::{Chunk, Document};

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text, page, and span metadata but
/// no embeddings. Embeddings are attached later by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has no text; degenerate input
    /// is not an error. Each returned chunk has an empty embedding vector.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Splits text into chunks of a target character size with fixed overlap,
/// preferring natural breaks near the cut point.
///
/// Within `tolerance` characters before the target cut, the chunker picks
/// the last paragraph break (`\n\n`), then the last sentence break
/// (`. `, `! `, `? `), then the last line break. If no break exists in the
/// window, it cuts hard at the target size. Consecutive chunks share exactly
/// `chunk_overlap` characters (the last chunk may share fewer), so no
/// semantic unit is lost at a boundary. Duplicated text across the overlap
/// window is intentional; downstream deduplication is not required.
///
/// Chunk IDs are `{document_id}_{seq}` and each chunk records the 1-based
/// page it starts on.
#[derive(Debug, Clone)]
pub struct BoundaryChunker {
    chunk_size: usize,
    chunk_overlap: usize,
    tolerance: usize,
}

impl BoundaryChunker {
    /// Create a new `BoundaryChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size`: target number of characters per chunk
    /// * `chunk_overlap`: characters shared between consecutive chunks
    /// * `tolerance`: how far before the target cut to search for a break
    pub fn new(chunk_size: usize, chunk_overlap: usize, tolerance: usize) -> Self {
        Self { chunk_size, chunk_overlap, tolerance }
    }

    /// Pick the cut point for a chunk spanning `start..hard_end`.
    ///
    /// Searches the window `[hard_end - tolerance, hard_end]` for the break
    /// closest to the target size. Returns `hard_end` if the window holds
    /// no break.
    fn cut_point(&self, text: &str, start: usize, hard_end: usize) -> usize {
        let window_start = hard_end.saturating_sub(self.tolerance).max(start + 1);
        let window_start = floor_char_boundary(text, window_start);
        let window = &text[window_start..hard_end];

        if let Some(pos) = window.rfind("\n\n") {
            return window_start + pos + 2;
        }
        for sep in [". ", "! ", "? "] {
            if let Some(pos) = window.rfind(sep) {
                return window_start + pos + sep.len();
            }
        }
        if let Some(pos) = window.rfind('\n') {
            return window_start + pos + 1;
        }
        hard_end
    }
}

/// Largest index `<= i` that lies on a UTF-8 character boundary.
fn floor_char_boundary(text: &str, mut i: usize) -> usize {
    if i >= text.len() {
        return text.len();
    }
    while i > 0 && !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Smallest index `>= i` that lies on a UTF-8 character boundary.
fn ceil_char_boundary(text: &str, mut i: usize) -> usize {
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i.min(text.len())
}

/// 1-based page number containing byte offset `pos`, given page start offsets.
fn page_at(page_offsets: &[usize], pos: usize) -> usize {
    page_offsets.partition_point(|&start| start <= pos).max(1)
}

impl Chunker for BoundaryChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        let text = &document.text;
        if text.trim().is_empty() {
            return Vec::new();
        }

        let page_offsets = document.page_offsets();
        let mut chunks = Vec::new();
        let mut start = 0;
        let mut seq = 0;

        while start < text.len() {
            // A chunk size smaller than the current character still has to
            // advance by a whole character, never through the middle of one.
            let floored = floor_char_boundary(text, start + self.chunk_size);
            let hard_end =
                if floored <= start { ceil_char_boundary(text, start + 1) } else { floored };
            let end = if hard_end < text.len() {
                floor_char_boundary(text, self.cut_point(text, start, hard_end))
            } else {
                hard_end
            };
            // A pathological window can collapse the cut back onto `start`.
            let end = if end <= start { hard_end } else { end };
            let end = end.min(text.len());

            chunks.push(Chunk {
                id: format!("{}_{seq}", document.id),
                document_id: document.id.clone(),
                text: text[start..end].to_string(),
                page: page_at(&page_offsets, start),
                seq,
                span: (start, end),
                embedding: Vec::new(),
            });
            seq += 1;

            if end >= text.len() {
                break;
            }
            let next = floor_char_boundary(text, end.saturating_sub(self.chunk_overlap));
            // Overlap must never stall the scan.
            start = if next <= start { end } else { next };
        }

        chunks
    }
}
