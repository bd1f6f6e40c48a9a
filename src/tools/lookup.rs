//! Lookup tool implementation
//!
//! Exact definition lookup with ranked suggestions on a miss

use super::{Bot, Reply, ReplyStatus};
use crate::cli::LookupArgs;
use crate::error::AppError;
use crate::mcp::{run_tool, McpResponse};
use crate::search::{lookup_definition, Lookup};
use crate::store::Action;
use serde_json::Value;
use tracing::debug;

/// Handle lookup tool call (MCP)
pub async fn handle_lookup(id: Option<Value>, args: Value, bot: &Bot) -> McpResponse {
    run_tool(id, args, bot, |bot, args: LookupArgs| {
        execute_lookup(bot, &args, None)
    })
    .await
}

/// Shared implementation for lookup (used by MCP, CLI and bot commands)
pub fn execute_lookup(bot: &Bot, args: &LookupArgs, user: Option<&str>) -> Result<Reply, AppError> {
    let corpus = bot.store().snapshot()?;
    let lookup = lookup_definition(&args.term, &corpus);
    bot.log(Action::Lookup, &args.term, user);

    let status = match &lookup {
        Lookup::Hit(record) => {
            debug!("Lookup '{}' hit '{}'", args.term, record.term);
            ReplyStatus::Ok
        }
        Lookup::Miss { suggestions } => {
            debug!("Lookup '{}' missed, {} suggestions", args.term, suggestions.len());
            ReplyStatus::NoMatch
        }
    };

    let data = serde_json::to_value(&lookup)
        .map_err(|e| AppError::Internal(format!("Failed to encode lookup: {}", e)))?;

    Ok(Reply::new(bot.formatter().lookup(args.term.trim(), &lookup), status).with_data(data))
}
