//! Stub providers shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use llm_rag::providers::{
    Candidate, ClassDefinition, EmbeddingProvider, Generation, GenerativeModel, GraphQlError,
    GraphQlResponse, NearVectorQuery, Part, StoredRecord, VectorStore,
};
use llm_rag::{DirectRagService, DocStoreRagService, Error, RagService, Result};

const DIMENSIONS: usize = 64;

/// Bag-of-words embedder: each word hashed into one of 64 buckets, L2-normalised
#[derive(Default)]
pub struct HashEmbedder {
    /// Drop this many vectors from every batch reply
    pub drop_from_batch: usize,
    pub fail: bool,
    pub closed: AtomicBool,
}

impl HashEmbedder {
    pub fn vector(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; DIMENSIONS];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let mut hash: u64 = 0xcbf29ce484222325;
            for byte in word.to_lowercase().bytes() {
                hash ^= byte as u64;
                hash = hash.wrapping_mul(0x100000001b3);
            }
            vector[(hash % DIMENSIONS as u64) as usize] += 1.0;
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if self.fail {
            return Err(Error::embedding("embedding quota exceeded"));
        }
        Ok(Self::vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if self.fail {
            return Err(Error::embedding("embedding quota exceeded"));
        }
        let keep = texts.len().saturating_sub(self.drop_from_batch);
        Ok(texts.iter().take(keep).map(|t| Self::vector(t)).collect())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn name(&self) -> &str {
        "hash"
    }
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub properties: Map<String, Value>,
    pub vector: Vec<f32>,
}

/// In-memory store answering with the same loosely typed GraphQL shape as Weaviate
#[derive(Default)]
pub struct MemoryVectorStore {
    classes: Mutex<HashSet<String>>,
    objects: Mutex<HashMap<String, Vec<StoredObject>>>,
    pub create_calls: AtomicUsize,
    pub exists_calls: AtomicUsize,
    pub limits: Mutex<Vec<usize>>,
    pub fail_writes: AtomicBool,
    pub query_errors: Mutex<Vec<String>>,
    pub data_override: Mutex<Option<Value>>,
    pub closed: AtomicBool,
}

impl MemoryVectorStore {
    pub fn objects(&self, class: &str) -> Vec<StoredObject> {
        self.objects.lock().get(class).cloned().unwrap_or_default()
    }

    pub fn texts(&self, class: &str) -> Vec<String> {
        self.objects(class)
            .into_iter()
            .filter_map(|o| o.properties.get("text").and_then(|t| t.as_str()).map(String::from))
            .collect()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.lock().contains(class)
    }

    fn hit(object: &StoredObject, fields: &[String], distance: f32) -> Value {
        let mut hit = Map::new();
        for field in fields {
            if field.starts_with("_additional") {
                hit.insert("_additional".to_string(), json!({ "distance": distance }));
            } else {
                let value = object.properties.get(field).cloned().unwrap_or(Value::Null);
                hit.insert(field.clone(), value);
            }
        }
        Value::Object(hit)
    }
}

fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 1.0;
    }
    1.0 - dot / (na * nb)
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn class_exists(&self, class: &str) -> Result<bool> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(self.has_class(class))
    }

    async fn create_class(&self, class: &ClassDefinition) -> Result<()> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.classes.lock().insert(class.class.clone());
        Ok(())
    }

    async fn batch_objects(&self, records: Vec<StoredRecord>) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::storage("adding documents to Weaviate: connection refused"));
        }
        let mut objects = self.objects.lock();
        for record in records {
            if !self.classes.lock().contains(&record.class) {
                return Err(Error::storage(format!("class {} not found", record.class)));
            }
            objects.entry(record.class).or_default().push(StoredObject {
                properties: record.properties,
                vector: record.vector,
            });
        }
        Ok(())
    }

    async fn near_vector(&self, query: &NearVectorQuery) -> Result<GraphQlResponse> {
        self.limits.lock().push(query.limit);

        let errors = self.query_errors.lock().clone();
        if !errors.is_empty() {
            return Ok(GraphQlResponse {
                data: None,
                errors: errors.into_iter().map(|message| GraphQlError { message }).collect(),
            });
        }

        if let Some(data) = self.data_override.lock().clone() {
            return Ok(GraphQlResponse {
                data: Some(data),
                errors: Vec::new(),
            });
        }

        let mut scored: Vec<(f32, StoredObject)> = self
            .objects(&query.class)
            .into_iter()
            .map(|o| (cosine_distance(&query.vector, &o.vector), o))
            .collect();
        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let hits: Vec<Value> = scored
            .iter()
            .take(query.limit)
            .map(|(distance, object)| Self::hit(object, &query.fields, *distance))
            .collect();

        let mut get = Map::new();
        get.insert(query.class.clone(), Value::Array(hits));
        Ok(GraphQlResponse {
            data: Some(json!({ "Get": get })),
            errors: Vec::new(),
        })
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// What the stub model answers with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelMode {
    /// One candidate whose text is the prompt
    Echo,
    NoCandidates,
    NonTextPart,
    Fail,
}

pub struct StubModel {
    pub mode: ModelMode,
    pub prompts: Mutex<Vec<String>>,
    pub closed: AtomicBool,
}

impl StubModel {
    pub fn new(mode: ModelMode) -> Self {
        Self {
            mode,
            prompts: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().last().cloned()
    }
}

#[async_trait]
impl GenerativeModel for StubModel {
    async fn generate(&self, prompt: &str) -> Result<Generation> {
        self.prompts.lock().push(prompt.to_string());
        match self.mode {
            ModelMode::Echo => Ok(Generation::from_texts([prompt])),
            ModelMode::NoCandidates => Ok(Generation::default()),
            ModelMode::NonTextPart => Ok(Generation {
                candidates: vec![Candidate {
                    parts: vec![Part::Other {
                        kind: "functionCall".to_string(),
                    }],
                    finish_reason: Some("STOP".to_string()),
                }],
            }),
            ModelMode::Fail => Err(Error::generation("gen model response: 503 Service Unavailable")),
        }
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-echo"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Direct,
    DocStore,
}

pub const BACKENDS: [Backend; 2] = [Backend::Direct, Backend::DocStore];

/// Stubs wired into one backend, kept around for inspection
pub struct Harness {
    pub embedder: Arc<HashEmbedder>,
    pub store: Arc<MemoryVectorStore>,
    pub model: Arc<StubModel>,
    pub rag: Arc<dyn RagService>,
}

impl Harness {
    pub fn new(backend: Backend) -> Self {
        Self::with(backend, HashEmbedder::default(), ModelMode::Echo)
    }

    pub fn with(backend: Backend, embedder: HashEmbedder, mode: ModelMode) -> Self {
        let embedder = Arc::new(embedder);
        let store = Arc::new(MemoryVectorStore::default());
        let model = Arc::new(StubModel::new(mode));

        let rag: Arc<dyn RagService> = match backend {
            Backend::Direct => Arc::new(DirectRagService::new(
                embedder.clone(),
                store.clone(),
                model.clone(),
            )),
            Backend::DocStore => Arc::new(
                DocStoreRagService::new(embedder.clone(), store.clone(), model.clone())
                    .expect("docstore backend"),
            ),
        };

        Self {
            embedder,
            store,
            model,
            rag,
        }
    }
}

pub fn docs(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|t| t.to_string()).collect()
}
