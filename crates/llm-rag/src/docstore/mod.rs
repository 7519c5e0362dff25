//! Document-store layer
//!
//! A higher-level abstraction over the raw providers: callers work with
//! [`Document`]s and plain queries while collection management, batching and
//! result decoding happen inside [`WeaviateStore`].

pub mod document;
pub mod embedder;
pub mod llm;
pub mod store;

pub use document::Document;
pub use embedder::Embedder;
pub use llm::generate_from_single_prompt;
pub use store::{WeaviateStore, WeaviateStoreBuilder};
