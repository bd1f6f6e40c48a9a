//! Define tool implementation

use super::{Bot, Reply, ReplyStatus};
use crate::cli::DefineArgs;
use crate::error::AppError;
use crate::mcp::{run_tool, McpResponse};
use crate::store::{Action, DefineOutcome};
use serde_json::{json, Value};
use tracing::info;

/// Handle define tool call (MCP)
pub async fn handle_define(id: Option<Value>, args: Value, bot: &Bot) -> McpResponse {
    run_tool(id, args, bot, |bot, args: DefineArgs| {
        execute_define(bot, &args, None)
    })
    .await
}

/// Shared implementation for define (used by MCP, CLI and bot commands)
pub fn execute_define(bot: &Bot, args: &DefineArgs, user: Option<&str>) -> Result<Reply, AppError> {
    let term = args.term.trim();
    let definition = args.definition.trim();

    if term.is_empty() {
        return Err(AppError::InvalidInput("Term cannot be empty".to_string()));
    }
    if definition.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "Definition for '{}' cannot be empty",
            term
        )));
    }

    let outcome = bot.store().define(term, definition, user)?;
    bot.log(Action::Define, term, user);

    match &outcome {
        DefineOutcome::Created => info!("Defined '{}'", term),
        DefineOutcome::Updated { .. } => info!("Redefined '{}'", term),
    }

    let data = json!({
        "term": term,
        "definition": definition,
        "created": outcome == DefineOutcome::Created,
    });

    Ok(Reply::new(bot.formatter().define(term, definition, &outcome), ReplyStatus::Ok).with_data(data))
}
