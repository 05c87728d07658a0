//! End-to-end tests over the in-memory store with deterministic collaborators

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use guardrail_rag::{
    providers::{EmbeddingProvider, InMemoryVectorStore, LlmProvider, VectorStoreProvider},
    server::{build_router, state::AppState},
    Confidence, GuardRail, QueryRequest, RagConfig, Result,
};

const VOCABULARY: &[&str] = &[
    "machine", "learning", "datos", "modelo", "pizza", "queso", "horno", "receta",
];

const ML_TEXT: &str =
    "Machine learning es una rama de la inteligencia artificial que aprende de datos.";
const PIZZA_TEXT: &str = "La pizza napolitana lleva queso y se cocina en un horno de leña.";

const ANSWER: &str = "Según el contexto, machine learning es una rama de la IA que aprende de datos.";

/// Bag-of-keywords embedder: one dimension per vocabulary word
struct KeywordEmbedder;

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let lowered = text.to_lowercase();
        Ok(VOCABULARY
            .iter()
            .map(|word| lowered.matches(word).count() as f32 + 0.01)
            .collect())
    }

    fn dimensions(&self) -> usize {
        VOCABULARY.len()
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

/// LLM that records prompts and replies with a fixed answer
struct ScriptedLlm {
    answer: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.answer.clone())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn model(&self) -> String {
        "scripted".to_string()
    }
}

struct Harness {
    state: AppState,
    store: Arc<InMemoryVectorStore>,
    llm: Arc<ScriptedLlm>,
}

fn harness(chunk_size: usize, answer: &str) -> Harness {
    let mut config = RagConfig::default();
    config.chunking.chunk_size = chunk_size;
    config.chunking.chunk_overlap = 0;

    let store = Arc::new(InMemoryVectorStore::new());
    let llm = Arc::new(ScriptedLlm::new(answer));
    let state = AppState::from_providers(
        config,
        Arc::new(KeywordEmbedder),
        store.clone(),
        llm.clone(),
    );

    Harness { state, store, llm }
}

fn router(h: &Harness) -> Router {
    build_router(h.state.clone())
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn upload_request(filename: &str, content: &str) -> Request<Body> {
    let boundary = "guardrail-test-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: text/plain\r\n\r\n{c}\r\n--{b}--\r\n",
        b = boundary,
        f = filename,
        c = content
    );

    Request::builder()
        .method("POST")
        .uri("/api/documents/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_two_fragments_share_document_id() {
    let h = harness(100, ANSWER);
    let text = format!("{}\n\n{}", ML_TEXT, PIZZA_TEXT);

    let report = h.state.ingest().ingest_text("mezcla.txt", &text).await.unwrap();

    assert_eq!(report.chunks_count, 2);
    assert_eq!(report.vectors_count, 2);
    assert_eq!(
        report.vector_ids,
        vec![
            format!("{}_0", report.document_id),
            format!("{}_1", report.document_id)
        ]
    );
    assert_eq!(h.store.len(), 2);
}

#[tokio::test]
async fn test_query_answers_from_relevant_fragment_only() {
    let h = harness(100, ANSWER);
    h.state
        .ingest()
        .ingest_text("mezcla.txt", &format!("{}\n\n{}", ML_TEXT, PIZZA_TEXT))
        .await
        .unwrap();

    let result = h
        .state
        .engine()
        .query(&QueryRequest::new("¿Qué es machine learning?").with_threshold(0.5))
        .await
        .unwrap();

    assert_eq!(result.guard_rail_triggered, None);
    assert_eq!(result.answer, ANSWER);
    assert_eq!(result.sources.len(), 1);
    assert_eq!(result.sources[0].filename, "mezcla.txt");
    assert!(result.sources[0].chunk_id.ends_with("_0"));
    assert_eq!(result.confidence, Confidence::Low);
    assert_eq!(result.context_chunks_used, Some(1));

    let prompts = h.llm.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains(ML_TEXT));
    assert!(!prompts[0].contains(PIZZA_TEXT));
    assert!(prompts[0].contains("PREGUNTA: ¿Qué es machine learning?"));
}

#[tokio::test]
async fn test_unrelated_query_hits_low_similarity() {
    let h = harness(100, ANSWER);
    h.state.ingest().ingest_text("ml.txt", ML_TEXT).await.unwrap();

    let result = h
        .state
        .engine()
        .query(&QueryRequest::new("¿Cómo se hace una pizza con queso?"))
        .await
        .unwrap();

    assert_eq!(result.guard_rail_triggered, Some(GuardRail::LowSimilarity));
    assert!(result.sources.is_empty());
    assert!(h.llm.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_hedging_llm_keeps_sources() {
    let h = harness(100, "No tengo información específica sobre eso.");
    h.state.ingest().ingest_text("ml.txt", ML_TEXT).await.unwrap();

    let result = h
        .state
        .engine()
        .query(&QueryRequest::new("machine learning datos").with_threshold(0.5))
        .await
        .unwrap();

    assert_eq!(result.guard_rail_triggered, Some(GuardRail::GenericResponse));
    assert_eq!(result.sources.len(), 1);
}

#[tokio::test]
async fn test_http_empty_query_is_success_with_guard_rail() {
    let h = harness(1000, ANSWER);

    let response = router(&h)
        .oneshot(json_request(
            "POST",
            "/api/documents/query",
            json!({"query": "   "}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["guard_rail_triggered"], "empty_query");
    assert_eq!(body["confidence"], "none");
    assert_eq!(body["sources"], json!([]));
    assert!(body["average_similarity"].is_null());
}

#[tokio::test]
async fn test_http_upload_then_query() {
    let h = harness(1000, ANSWER);

    let response = router(&h)
        .oneshot(upload_request("ml.txt", ML_TEXT))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["filename"], "ml.txt");
    assert_eq!(body["chunks_count"], 1);
    assert_eq!(body["vectors_count"], 1);
    assert_eq!(body["status"], "success");
    assert_eq!(body["text_length"], ML_TEXT.chars().count());

    let response = router(&h)
        .oneshot(json_request(
            "POST",
            "/api/documents/query",
            json!({"query": "¿Qué es machine learning?", "max_results": 3, "similarity_threshold": 0.5}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["answer"], ANSWER);
    assert_eq!(body["context_chunks_used"], 1);
    assert!(body["guard_rail_triggered"].is_null());
}

#[tokio::test]
async fn test_http_rejects_unsupported_extension() {
    let h = harness(1000, ANSWER);

    let response = router(&h)
        .oneshot(upload_request("programa.exe", "MZ"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["type"], "unsupported_type");
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn test_http_corrupt_pdf_is_server_error() {
    let h = harness(1000, ANSWER);

    let response = router(&h)
        .oneshot(upload_request("roto.pdf", "esto no es un pdf"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"]["type"], "parse_error");
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn test_http_rejects_blank_document() {
    let h = harness(1000, ANSWER);

    let response = router(&h)
        .oneshot(upload_request("vacio.txt", "   "))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_http_stats_and_delete_all() {
    let h = harness(100, ANSWER);
    h.state
        .ingest()
        .ingest_text("mezcla.txt", &format!("{}\n\n{}", ML_TEXT, PIZZA_TEXT))
        .await
        .unwrap();

    let stats = router(&h)
        .oneshot(
            Request::builder()
                .uri("/api/documents/vectors/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(stats.status(), StatusCode::OK);
    let body = body_json(stats).await;
    assert_eq!(body["total_vectors"], 2);
    assert_eq!(body["dimension"], VOCABULARY.len());

    let response = router(&h)
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/documents/vectors/delete-all")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["vectors_deleted"], 2);
    assert_eq!(body["operation"], "delete_all_vectors");

    assert_eq!(h.store.stats().await.unwrap().total_vector_count, 0);
}

#[tokio::test]
async fn test_health_and_info() {
    let h = harness(1000, ANSWER);

    let response = router(&h)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router(&h)
        .oneshot(Request::builder().uri("/api/info").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["chat_model"], "scripted");
    assert_eq!(body["supported_types"][0], ".pdf");
}
