//! Browser chat front end
//!
//! Serves an embedded chat page and a JSON chat endpoint. Like the
//! original browser variant, every submission builds a fresh agent with a
//! freshly registered tool set and runs one full conversation turn; the
//! client carries the visible transcript between submissions.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::agent::ChatEvent;
use crate::context::AppContext;
use crate::llm::Message;

/// One prior transcript entry resubmitted by the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
}

/// Chat submission
#[derive(Debug, Deserialize)]
pub struct ChatApiRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// Chat turn result
#[derive(Debug, Serialize)]
pub struct ChatApiResponse {
    pub events: Vec<ChatEvent>,
    pub reply: String,
    pub terminated: bool,
    pub timestamp: DateTime<Utc>,
}

/// Minimal error body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

fn error_response(status: StatusCode, message: String) -> Response {
    let body = ErrorResponse {
        error: ErrorBody { message },
    };
    (status, Json(body)).into_response()
}

/// Rebuild agent-visible history from the client transcript
///
/// Only plain user/assistant text survives a round trip; tool traffic is
/// display-only and is not resubmitted.
fn history_from_entries(entries: &[HistoryEntry]) -> Vec<Message> {
    entries
        .iter()
        .filter_map(|entry| match entry.role.as_str() {
            "user" => Some(Message::user(entry.content.as_str())),
            "assistant" => Some(Message::assistant(entry.content.as_str())),
            _ => None,
        })
        .collect()
}

pub fn routes(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/chat", post(chat))
        .with_state(ctx)
}

/// Bind and serve until shutdown
pub async fn serve(ctx: Arc<AppContext>, host: &str, port: u16) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {}", addr))?;

    log::info!("Serving chat UI on http://{}", addr);
    println!("bistro web chat listening on http://{}", addr);

    axum::serve(listener, routes(ctx)).await.context("Server failed")?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(include_str!("chat.html"))
}

async fn chat(State(ctx): State<Arc<AppContext>>, Json(request): Json<ChatApiRequest>) -> Response {
    if request.message.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "message must not be empty".to_string());
    }

    // Fresh agent per submission: tools re-register every time
    let agent = ctx.build_agent();
    let mut history = history_from_entries(&request.history);

    match agent.run_turn(&mut history, request.message.trim()).await {
        Ok(report) => {
            let reply = report.reply().to_string();
            Json(ChatApiResponse {
                events: report.events,
                reply,
                terminated: report.terminated,
                timestamp: Utc::now(),
            })
            .into_response()
        }
        Err(e) => {
            log::warn!("chat turn failed: {}", e);
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}
