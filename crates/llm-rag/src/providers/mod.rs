//! Provider abstractions for embeddings, generation and vector storage
//!
//! Each capability is a trait so the orchestration layer can run against the
//! network clients (Gemini, Weaviate) or any stand-in with the same contract.

pub mod embedding;
pub mod gemini;
pub mod llm;
pub mod vector_store;
pub mod weaviate;

pub use embedding::EmbeddingProvider;
pub use gemini::GeminiClient;
pub use llm::{Candidate, Generation, GenerativeModel, Part};
pub use vector_store::{
    ClassDefinition, GraphQlError, GraphQlResponse, NearVectorQuery, PropertyDefinition,
    StoredRecord, VectorStore,
};
pub use weaviate::WeaviateClient;
