//! # quizforge-rag
//!
//! Document ingestion and vector retrieval for QuizForge: splits extracted
//! document text into overlapping chunks, derives a per-page structural
//! outline, embeds chunks through an [`EmbeddingProvider`], and serves
//! similarity queries through a [`VectorStore`].
//!
//! ## Components
//!
//! - [`BoundaryChunker`]: character-budget chunking with overlap and
//!   break-point preference
//! - [`HeadingDetector`]: heuristic per-page outline extraction
//! - [`InMemoryVectorStore`]: cosine-similarity store for development/tests
//! - `QdrantVectorStore`: durable backend (feature `qdrant`)
//! - [`RagPipeline`]: the ingest and retrieval orchestrator
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use quizforge_rag::{InMemoryVectorStore, RagConfig, RagPipeline};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(embedder))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .build()?;
//!
//! pipeline.create_collection("docs").await?;
//! let report = pipeline.ingest("docs", Some("paper.pdf"), pages).await?;
//! let chunks = pipeline.retrieve("docs", "transformer attention", 5).await?;
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod inmemory;
pub mod outline;
pub mod pipeline;
#[cfg(feature = "qdrant")]
pub mod qdrant;
pub mod vectorstore;

pub use chunking::{BoundaryChunker, Chunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, IngestReport, OutlineEntry, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use inmemory::InMemoryVectorStore;
pub use outline::HeadingDetector;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
#[cfg(feature = "qdrant")]
pub use qdrant::QdrantVectorStore;
pub use vectorstore::VectorStore;
