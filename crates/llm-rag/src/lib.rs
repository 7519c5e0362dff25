//! llm-rag: retrieval-augmented question answering over a document corpus
//!
//! Documents are embedded with Gemini and stored in Weaviate; questions are
//! answered by Gemini from the nearest stored documents. The orchestration
//! runs through one of two interchangeable backends behind [`RagService`].

pub mod config;
pub mod docstore;
pub mod error;
pub mod generation;
pub mod providers;
pub mod rag;
pub mod server;
pub mod types;

pub use config::{RagBackend, RagConfig};
pub use error::{Error, Result};
pub use rag::{build_rag_service, DirectRagService, DocStoreRagService, RagService};
pub use server::RagServer;
