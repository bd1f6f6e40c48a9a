//! Delete tool implementation

use super::{Bot, Reply, ReplyStatus};
use crate::error::AppError;
use crate::store::Action;
use serde_json::json;
use tracing::info;

/// Shared implementation for delete (used by CLI and bot commands)
pub fn execute_delete(bot: &Bot, term: &str, user: Option<&str>) -> Result<Reply, AppError> {
    let term = term.trim();
    let removed = bot.store().delete(term)?;
    bot.log(Action::Delete, term, user);

    let (display, status) = match &removed {
        Some(definition) => {
            info!("Deleted '{}'", definition.term);
            (definition.term.as_str(), ReplyStatus::Ok)
        }
        None => (term, ReplyStatus::NoMatch),
    };

    Ok(
        Reply::new(bot.formatter().delete(display, removed.is_some()), status)
            .with_data(json!({ "term": display, "deleted": removed.is_some() })),
    )
}
