use axum::{
    Json, Router,
    body::Body,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tarjama::mt::{
    AggregatedOutcome, ChannelReporter, CollectingReporter, Orchestrator, TranslateError,
    TranslationEvent, TranslationRequest,
};
use tarjama::{TranslatorConfig, language_names};
use tokio::sync::mpsc;
use tokio_stream::{StreamExt, wrappers::UnboundedReceiverStream};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Serialize)]
pub struct TranslateResponse {
    pub outcome: AggregatedOutcome,
    pub events: Vec<TranslationEvent>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub events: Vec<TranslationEvent>,
}

#[derive(Deserialize)]
pub struct SwapRequest {
    pub request: TranslationRequest,
    pub translated_text: String,
}

#[derive(Deserialize)]
pub struct LanguagesQuery {
    pub locale: Option<String>,
}

#[derive(Serialize)]
pub struct LanguageEntry {
    pub code: &'static str,
    pub name: &'static str,
}

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = TranslatorConfig::from_env()
        .map_err(|e| format!("Invalid configuration: {}", e))?;
    let orchestrator = Orchestrator::from_config(&config)
        .map_err(|e| format!("Failed to initialize translators: {}", e))?;
    let state = AppState {
        orchestrator: Arc::new(orchestrator),
    };

    info!("Starting tarjama translation server");

    let bind = std::env::var("TARJAMA_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("Server running at http://{}", bind);

    axum::serve(listener, app(state)).await?;

    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/languages", get(list_languages))
        .route("/api/translate", post(translate))
        .route("/api/translate/stream", post(translate_stream))
        .route("/api/swap", post(swap_languages))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_languages(Query(query): Query<LanguagesQuery>) -> Json<Vec<LanguageEntry>> {
    let locale = query.locale.as_deref().unwrap_or("en");
    Json(
        language_names(locale)
            .into_iter()
            .map(|(code, name)| LanguageEntry { code, name })
            .collect(),
    )
}

fn error_status(error: &TranslateError) -> StatusCode {
    match error {
        TranslateError::Validation(_) => StatusCode::BAD_REQUEST,
        TranslateError::Provider(_) | TranslateError::AllProvidersFailed(_) => {
            StatusCode::BAD_GATEWAY
        }
    }
}

async fn translate(
    State(state): State<AppState>,
    Json(request): Json<TranslationRequest>,
) -> Result<Json<TranslateResponse>, (StatusCode, Json<ErrorResponse>)> {
    info!(
        source = %request.source_lang,
        targets = ?request.target_langs,
        provider = %request.selection,
        "Translating request"
    );

    let mut reporter = CollectingReporter::new();
    match state.orchestrator.translate(&request, &mut reporter).await {
        Ok(outcome) => Ok(Json(TranslateResponse {
            outcome,
            events: reporter.into_events(),
        })),
        Err(e) => {
            warn!(error = %e, "Translation request failed");
            Err((
                error_status(&e),
                Json(ErrorResponse {
                    error: e.to_string(),
                    events: reporter.into_events(),
                }),
            ))
        }
    }
}

/// One JSON event per line, flushed as the orchestrator reports it
async fn translate_stream(
    State(state): State<AppState>,
    Json(request): Json<TranslationRequest>,
) -> Response {
    let (sender, receiver) = mpsc::unbounded_channel();
    let orchestrator = Arc::clone(&state.orchestrator);
    tokio::spawn(async move {
        let mut reporter = ChannelReporter::new(sender);
        if let Err(e) = orchestrator.translate(&request, &mut reporter).await {
            warn!(error = %e, "Streamed translation request failed");
        }
    });

    let lines = UnboundedReceiverStream::new(receiver)
        .map(|event| serde_json::to_string(&event).map(|line| line + "\n"));

    (
        [(header::CONTENT_TYPE, "application/x-ndjson")],
        Body::from_stream(lines),
    )
        .into_response()
}

async fn swap_languages(
    Json(swap): Json<SwapRequest>,
) -> Result<Json<TranslationRequest>, (StatusCode, Json<ErrorResponse>)> {
    swap.request
        .swapped(&swap.translated_text)
        .map(Json)
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                    events: Vec::new(),
                }),
            )
        })
}
