//! Servidor web Axum que expõe a construção de documentos do prose-core

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use prose_core::{corpus::demo_texts, using_model, Directive, Document, Model, Pipeline};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Estado compartilhado da aplicação: um pipeline e um modelo para todas as requisições
struct AppState {
    pipeline: Pipeline,
    model: Arc<Model>,
}

#[derive(Deserialize)]
struct DocumentRequest {
    text: String,
    /// Diretivas em JSON, ex: `[{"extraction": false}, {"concurrency": true}]`
    #[serde(default)]
    directives: Vec<Directive>,
}

#[derive(Debug, Serialize)]
struct DocumentResponse {
    document: Document,
    processing_ms: u64,
}

/// Falha de uma requisição, já com o status HTTP
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
    stage: Option<&'static str>,
}

impl From<prose_core::Error> for ApiError {
    fn from(err: prose_core::Error) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            stage: err.failed_stage().map(|s| s.name()),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.message,
            "stage": self.stage,
        });
        (self.status, Json(body)).into_response()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let state = Arc::new(AppState {
        pipeline: Pipeline::new(),
        model: Arc::new(Model::build()?),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/document", post(document_handler))
        .route("/demo-texts", get(demo_texts_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    info!("servidor prose iniciado em http://localhost:3000");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Constrói um documento (síncrono; roda fora do runtime async)
///
/// Texto vazio não é erro: volta um documento sem sentenças nem tokens.
fn build_document(state: &AppState, req: DocumentRequest) -> Result<DocumentResponse, ApiError> {
    // O modelo compartilhado vem primeiro; as diretivas do cliente valem depois dele
    let mut directives = Vec::with_capacity(req.directives.len() + 1);
    directives.push(using_model(Arc::clone(&state.model)));
    directives.extend(req.directives);

    let start = Instant::now();
    let document = state.pipeline.build(&req.text, &directives)?;
    Ok(DocumentResponse {
        document,
        processing_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
    })
}

/// Construção de documento via HTTP POST
async fn document_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DocumentRequest>,
) -> Response {
    let bytes = req.text.len();
    let result = tokio::task::spawn_blocking(move || build_document(&state, req)).await;

    match result {
        Ok(Ok(response)) => {
            info!(
                bytes,
                tokens = response.document.tokens().len(),
                entities = response.document.entities().len(),
                ms = response.processing_ms,
                "documento construído"
            );
            Json(response).into_response()
        }
        Ok(Err(err)) => {
            warn!(status = %err.status, error = %err.message, "falha ao construir documento");
            err.into_response()
        }
        Err(join_err) => ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: join_err.to_string(),
            stage: None,
        }
        .into_response(),
    }
}

/// Retorna textos de demonstração
async fn demo_texts_handler() -> impl IntoResponse {
    let texts: Vec<serde_json::Value> = demo_texts()
        .iter()
        .map(|(domain, text)| {
            serde_json::json!({
                "domain": domain,
                "text": text
            })
        })
        .collect();
    Json(texts)
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
