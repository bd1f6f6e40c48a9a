//! Search tool implementation
//!
//! Substring search across terms and definitions

use super::{Bot, Reply, ReplyStatus};
use crate::cli::SearchArgs;
use crate::error::AppError;
use crate::mcp::{run_tool, McpResponse};
use crate::search::{search_corpus, SearchResult};
use crate::store::Action;
use serde_json::Value;
use tracing::debug;

/// Handle search tool call (MCP)
pub async fn handle_search(id: Option<Value>, args: Value, bot: &Bot) -> McpResponse {
    run_tool(id, args, bot, |bot, args: SearchArgs| {
        execute_search(bot, &args, None)
    })
    .await
}

/// Shared implementation for search (used by MCP, CLI and bot commands)
pub fn execute_search(bot: &Bot, args: &SearchArgs, user: Option<&str>) -> Result<Reply, AppError> {
    let corpus = bot.store().snapshot()?;
    let result = search_corpus(&args.query, &corpus);
    bot.log(Action::Search, &args.query, user);

    debug!(
        "Search '{}' over {} records matched {}",
        args.query,
        corpus.len(),
        result.terms().len()
    );

    let status = match result {
        SearchResult::Found { .. } => ReplyStatus::Ok,
        SearchResult::NotFound { .. } => ReplyStatus::NoMatch,
    };

    let data = serde_json::to_value(&result)
        .map_err(|e| AppError::Internal(format!("Failed to encode search result: {}", e)))?;

    Ok(Reply::new(bot.formatter().search(args.query.trim(), &result), status).with_data(data))
}
