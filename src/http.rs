//! Slash-command webhook
//!
//! Chat platforms post the command as a form (`text`, `user_name`) and expect
//! a JSON reply telling them whether to show it to the channel or only to the
//! sender.

use crate::command::Visibility;
use crate::error::AppError;
use crate::tools::{Bot, Reply};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tracing::{debug, info, warn};

/// Form body posted by the chat platform
#[derive(Debug, Deserialize)]
pub struct SlashCommand {
    #[serde(default)]
    pub text: String,
    pub user_name: Option<String>,
}

/// JSON body returned to the chat platform
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SlashReply {
    pub response_type: String,
    pub text: String,
}

impl SlashReply {
    fn new(visibility: Visibility, text: String) -> Self {
        let response_type = match visibility {
            Visibility::Public => "in_channel",
            Visibility::Private => "ephemeral",
        };
        Self {
            response_type: response_type.to_string(),
            text,
        }
    }
}

impl From<Reply> for SlashReply {
    fn from(reply: Reply) -> Self {
        Self::new(reply.visibility, reply.text)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Errors only ever go back to the sender
        let body = SlashReply::new(Visibility::Private, format!("Error: {}", self.message()));
        (status, Json(body)).into_response()
    }
}

/// Build the webhook router
pub fn router(bot: Bot) -> Router {
    Router::new()
        .route("/", post(command_handler))
        .route("/health", get(health_handler))
        .with_state(bot)
}

async fn command_handler(
    State(bot): State<Bot>,
    Form(command): Form<SlashCommand>,
) -> Result<Json<SlashReply>, AppError> {
    debug!(
        "Webhook command from {}: '{}'",
        command.user_name.as_deref().unwrap_or("anonymous"),
        command.text
    );

    match bot.handle_async(command.text, command.user_name).await {
        Ok(reply) => Ok(Json(reply.into())),
        Err(e) => {
            warn!("Webhook command failed: {}", e);
            Err(e)
        }
    }
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Serve the webhook until the process is stopped
pub async fn serve(bot: Bot, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;

    info!("Gloss webhook listening on {}", listener.local_addr()?);

    axum::serve(listener, router(bot)).await?;
    Ok(())
}
