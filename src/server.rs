//! HTTP adapter over the journal.
//!
//! Provides [`router`] (testable in-process) and [`serve`], which binds it to the
//! configured address. Handlers validate presence of input and map errors to
//! status codes; everything else lives in [`crate::journal`].

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tower_http::cors::CorsLayer;

use crate::config::DreamlogConfig;
use crate::generation::{self, GenerationError, TextGenerator};
use crate::journal::{Journal, JournalEntry, JournalError, JournalStats, SearchResults};

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub dream: String,
    #[serde(default)]
    pub mood: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Journal(#[from] JournalError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::BadRequest(_) | Self::Journal(JournalError::InvalidInput(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Journal(_) | Self::Generation(_) => {
                tracing::error!(error = %self, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Build the HTTP routes around a shared journal.
pub fn router<G: TextGenerator + 'static>(journal: Arc<Journal<G>>) -> Router {
    Router::new()
        .route("/save_journal", post(save_journal::<G>))
        .route("/journal_entries", get(journal_entries::<G>))
        .route("/search", get(search::<G>))
        .route("/stats", get(stats::<G>))
        .route("/patterns", get(patterns::<G>))
        .layer(CorsLayer::permissive())
        .with_state(journal)
}

async fn save_journal<G: TextGenerator + 'static>(
    State(journal): State<Arc<Journal<G>>>,
    payload: Result<Json<SaveRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    if request.dream.trim().is_empty() {
        return Err(ApiError::BadRequest("No dream text provided.".into()));
    }

    let entry = journal.record(&request.dream, request.mood.as_deref()).await?;
    tracing::info!(timestamp = %entry.timestamp, "save_journal handled");
    Ok(Json(json!({ "success": true, "entry": entry })))
}

async fn journal_entries<G: TextGenerator + 'static>(
    State(journal): State<Arc<Journal<G>>>,
) -> Json<Vec<JournalEntry>> {
    let entries = journal.entries();
    tracing::info!(count = entries.len(), "journal_entries handled");
    Json(entries)
}

async fn search<G: TextGenerator + 'static>(
    State(journal): State<Arc<Journal<G>>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, ApiError> {
    if params.q.trim().is_empty() {
        return Err(ApiError::BadRequest("No search query provided.".into()));
    }

    let results = journal.search(&params.q, params.limit).await;
    tracing::info!(query = %params.q, hits = results.results.len(), "search handled");
    Ok(Json(results))
}

async fn stats<G: TextGenerator + 'static>(
    State(journal): State<Arc<Journal<G>>>,
) -> Json<JournalStats> {
    Json(journal.statistics())
}

async fn patterns<G: TextGenerator + 'static>(
    State(journal): State<Arc<Journal<G>>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let patterns = journal.identify_patterns().await?;
    Ok(Json(json!({ "patterns": patterns })))
}

/// Serve the journal over HTTP until ctrl-c.
pub async fn serve(config: DreamlogConfig) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);

    let generator = generation::create_generator(&config.generation)
        .context("failed to set up text generation")?;
    let journal = Arc::new(Journal::from_config(&config, generator));
    tracing::info!(journal = %journal.store().path().display(), "journal ready");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "dream journal listening at http://{bind_addr}/");

    axum::serve(listener, router(journal))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}
