//! Help, stats and recent commands

use super::{Bot, Reply, ReplyStatus};
use crate::error::AppError;
use crate::store::Action;
use serde_json::json;

pub fn execute_help(bot: &Bot, user: Option<&str>) -> Reply {
    bot.log(Action::Help, "help", user);
    Reply::new(bot.formatter().help(), ReplyStatus::Ok)
}

pub fn execute_stats(bot: &Bot, user: Option<&str>) -> Result<Reply, AppError> {
    // Read before logging so the reply does not count itself
    let stats = bot.store().stats()?;
    bot.log(Action::Stats, "stats", user);

    let data = serde_json::to_value(&stats)
        .map_err(|e| AppError::Internal(format!("Failed to encode stats: {}", e)))?;

    Ok(Reply::new(bot.formatter().stats(&stats), ReplyStatus::Ok).with_data(data))
}

pub fn execute_recent(bot: &Bot, user: Option<&str>) -> Result<Reply, AppError> {
    let terms: Vec<String> = bot
        .store()
        .recent(bot.config().recent_limit)?
        .into_iter()
        .map(|d| d.term)
        .collect();
    bot.log(Action::Recent, "recent", user);

    Ok(Reply::new(bot.formatter().recent(&terms), ReplyStatus::Ok)
        .with_data(json!({ "terms": terms })))
}
