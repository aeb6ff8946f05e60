//! Ingest and retrieval pipeline.
//!
//! The [`RagPipeline`] coordinates ingestion (chunk → outline → embed →
//! store) and retrieval (embed → search) by composing an
//! [`EmbeddingProvider`], a [`VectorStore`], a [`Chunker`], and a
//! [`HeadingDetector`].
//!
//! # Example
//!
//! ```rust,ignore
//! use quizforge_rag::{RagPipeline, RagConfig, InMemoryVectorStore, BoundaryChunker};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(my_embedder))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .build()?;
//!
//! pipeline.create_collection("docs").await?;
//! let report = pipeline.ingest("docs", Some("notes.pdf"), pages).await?;
//! let chunks = pipeline.retrieve("docs", "query", 5).await?;
//! ```

use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use crate::chunking::{BoundaryChunker, Chunker};
use crate::config::RagConfig;
use crate::document::{Chunk, Document, IngestReport, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::outline::HeadingDetector;
use crate::vectorstore::VectorStore;

/// The ingest/retrieval pipeline.
///
/// Construct one via [`RagPipeline::builder()`]. The chunker and heading
/// detector default to [`BoundaryChunker`] (sized from the config) and
/// [`HeadingDetector::new()`].
pub struct RagPipeline {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    chunker: Arc<dyn Chunker>,
    heading_detector: HeadingDetector,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Create a named collection in the vector store.
    ///
    /// The collection is created with the dimensionality reported by the
    /// configured [`EmbeddingProvider`]; every insertion is checked against it.
    pub async fn create_collection(&self, name: &str) -> Result<()> {
        let dimensions = self.embedding_provider.dimensions();
        self.vector_store.create_collection(name, dimensions).await
    }

    /// Ingest a document: chunk, extract the outline, embed, and store.
    ///
    /// `pages` are the already-extracted per-page text segments. A document
    /// id is minted per ingest. The commit is all-or-nothing: an embedding
    /// failure aborts before any store write, so the index always matches
    /// the reported chunk count. Degenerate input (no text) completes with
    /// zero chunks and an empty outline rather than an error.
    pub async fn ingest(
        &self,
        collection: &str,
        source: Option<&str>,
        pages: Vec<String>,
    ) -> Result<IngestReport> {
        let document = Document::from_pages(
            Uuid::new_v4().to_string(),
            pages,
            source.map(str::to_string),
        );

        let outline = self.heading_detector.detect(&document.pages);
        let mut chunks = self.chunker.chunk(&document);
        if chunks.is_empty() {
            info!(document.id = %document.id, chunk_count = 0, "ingested document (empty)");
            return Ok(IngestReport { document_id: document.id, chunk_count: 0, outline });
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
            error!(document.id = %document.id, error = %e, "embedding failed during ingestion");
            e
        })?;

        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        self.vector_store.upsert(collection, &chunks).await.map_err(|e| {
            error!(document.id = %document.id, error = %e, "upsert failed during ingestion");
            e
        })?;

        let chunk_count = chunks.len();
        info!(
            document.id = %document.id,
            chunk_count,
            outline_entries = outline.len(),
            "ingested document"
        );

        Ok(IngestReport { document_id: document.id, chunk_count, outline })
    }

    /// Query the index: embed the text and search for the `k` nearest chunks.
    ///
    /// Results are ordered by non-increasing similarity with deterministic
    /// tie-break by ascending sequence index; the same text against an
    /// unchanged index returns identical results.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Validation`] for `k == 0` before any external
    /// call; [`RagError::EmbeddingUnavailable`] or
    /// [`RagError::IndexUnavailable`] when a backend cannot be reached.
    pub async fn query(&self, collection: &str, text: &str, k: usize) -> Result<Vec<SearchResult>> {
        if k == 0 {
            return Err(RagError::Validation("retrieval count k must be at least 1".to_string()));
        }

        let query_embedding = self.embedding_provider.embed(text).await.map_err(|e| {
            error!(error = %e, "embedding failed during query");
            e
        })?;

        let results = self.vector_store.search(collection, &query_embedding, k).await?;
        info!(collection, result_count = results.len(), "query completed");
        Ok(results)
    }

    /// Retrieve the `k` most relevant chunks for a free-text query.
    ///
    /// Thin pass-through over [`query`](RagPipeline::query) for consumers
    /// that only need chunk text, stripped of similarity scores.
    pub async fn retrieve(&self, collection: &str, text: &str, k: usize) -> Result<Vec<Chunk>> {
        let results = self.query(collection, text, k).await?;
        Ok(results.into_iter().map(|r| r.chunk).collect())
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// `embedding_provider` and `vector_store` are required; the config
/// defaults to [`RagConfig::default()`], and the chunker and heading
/// detector have config-derived defaults.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    chunker: Option<Arc<dyn Chunker>>,
    heading_detector: Option<HeadingDetector>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Override the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Override the heading detector.
    pub fn heading_detector(mut self, detector: HeadingDetector) -> Self {
        self.heading_detector = Some(detector);
        self
    }

    /// Build the [`RagPipeline`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if a required field is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let config = self.config.unwrap_or_default();
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::Config("vector_store is required".to_string()))?;
        let chunker = self.chunker.unwrap_or_else(|| {
            Arc::new(BoundaryChunker::new(
                config.chunk_size,
                config.chunk_overlap,
                config.boundary_tolerance,
            ))
        });
        let heading_detector = self.heading_detector.unwrap_or_default();

        Ok(RagPipeline { config, embedding_provider, vector_store, chunker, heading_detector })
    }
}
