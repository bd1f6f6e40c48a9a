//! Bot tools implementation
//!
//! One module per command. Every tool returns a [`Reply`]; transports (CLI,
//! MCP, HTTP) only decide how to deliver it.

pub mod define;
pub mod delete;
pub mod format;
pub mod info;
pub mod lookup;
pub mod search;

use crate::cli::RunArgs;
use crate::command::{Command, CommandParser, Visibility};
use crate::config::GlossConfig;
use crate::error::{validate_command_text, AppError};
use crate::mcp::{run_tool, McpResponse};
use crate::store::{Action, GlossaryStore};
use format::Formatter;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// How a command went, independent of the reply text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyStatus {
    /// The command did what was asked
    Ok,
    /// Lookup, search or delete found nothing
    NoMatch,
    /// The command was malformed; the reply explains the usage
    Rejected,
}

/// Bot reply ready for delivery
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    pub text: String,
    pub visibility: Visibility,
    pub status: ReplyStatus,
    /// Structured engine result, for clients that want more than text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Reply {
    pub fn new(text: impl Into<String>, status: ReplyStatus) -> Self {
        Self {
            text: text.into(),
            visibility: Visibility::Public,
            status,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

/// Store and configuration shared by every tool
#[derive(Debug, Clone)]
pub struct Bot {
    store: GlossaryStore,
    config: GlossConfig,
}

impl Bot {
    /// Open the store named in the configuration
    pub fn open(config: GlossConfig) -> Result<Self, AppError> {
        let store = GlossaryStore::open(&config.store_path)?;
        Ok(Self { store, config })
    }

    pub fn store(&self) -> &GlossaryStore {
        &self.store
    }

    pub fn config(&self) -> &GlossConfig {
        &self.config
    }

    pub fn formatter(&self) -> Formatter<'_> {
        Formatter::new(&self.config.bot_name)
    }

    /// Log an interaction; a failure here never fails the command
    pub(crate) fn log(&self, action: Action, text: &str, user: Option<&str>) {
        if let Err(e) = self.store.record_interaction(action, text, user) {
            warn!("Failed to log {:?} interaction: {}", action, e);
        }
    }

    /// Parse and execute raw command text
    pub fn handle(&self, text: &str, user: Option<&str>) -> Result<Reply, AppError> {
        validate_command_text(text)?;

        let parsed = CommandParser::parse(text);
        debug!("Parsed command {:?} from '{}'", parsed.command, parsed.original);
        let action = parsed.command.action();

        let reply = match parsed.command {
            Command::Help => info::execute_help(self, user),
            Command::Stats => info::execute_stats(self, user)?,
            Command::Recent => info::execute_recent(self, user)?,
            Command::Search { query } => {
                search::execute_search(self, &crate::cli::SearchArgs { query }, user)?
            }
            Command::Delete { term } => delete::execute_delete(self, &term, user)?,
            Command::Define { term, definition } => define::execute_define(
                self,
                &crate::cli::DefineArgs { term, definition },
                user,
            )?,
            Command::Lookup { term } => {
                lookup::execute_lookup(self, &crate::cli::LookupArgs { term }, user)?
            }
            Command::Invalid { reason } => {
                self.log(action, &parsed.original, user);
                Reply::new(self.formatter().usage_error(&reason), ReplyStatus::Rejected)
            }
        };

        Ok(reply.with_visibility(parsed.visibility))
    }

    /// [`Bot::handle`] on the blocking pool, for async transports
    pub async fn handle_async(&self, text: String, user: Option<String>) -> Result<Reply, AppError> {
        let bot = self.clone();
        tokio::task::spawn_blocking(move || bot.handle(&text, user.as_deref())).await?
    }
}

/// Handle gloss tool call (MCP): raw command text, as typed to the bot
pub async fn handle_command(id: Option<Value>, args: Value, bot: &Bot) -> McpResponse {
    run_tool(id, args, bot, |bot, args: RunArgs| {
        bot.handle(&args.text, args.user.as_deref())
    })
    .await
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_private_reply_for_shh() {
        let (_dir, bot) = temp_bot();
        define_all(&bot, &[("SAWS", "a system")]);

        let reply = bot.handle("shh saws", None).unwrap();
        assert_eq!(reply.visibility, Visibility::Private);
        assert_eq!(reply.status, ReplyStatus::Ok);

        let reply = bot.handle("saws", None).unwrap();
        assert_eq!(reply.visibility, Visibility::Public);
    }

    #[test]
    fn test_invalid_command_is_rejected_with_usage() {
        let (_dir, bot) = temp_bot();
        let reply = bot.handle("orphan =", None).unwrap();
        assert_eq!(reply.status, ReplyStatus::Rejected);
        assert!(reply.text.contains("*orphan* needs a definition"));
    }

    #[test]
    fn test_oversized_command_is_an_error() {
        let (_dir, bot) = temp_bot();
        let err = bot.handle(&"x".repeat(5000), None).unwrap_err();
        assert_eq!(err.error_code(), "invalid_input");
    }

    #[test]
    fn test_interactions_are_logged() {
        let (_dir, bot) = temp_bot();
        define_all(&bot, &[("TAY", "Transitional Age Youth")]);
        bot.handle("tay", Some("maya")).unwrap();
        bot.handle("search youth", None).unwrap();
        bot.handle("delete", None).unwrap();

        let stats = bot.store().stats().unwrap();
        assert_eq!(stats.count(Action::Define), 1);
        assert_eq!(stats.count(Action::Lookup), 1);
        assert_eq!(stats.count(Action::Search), 1);
        assert_eq!(stats.count(Action::Help), 1);
    }

    #[tokio::test]
    async fn test_handle_async() {
        let (_dir, bot) = temp_bot();
        let reply = bot.handle_async("help".to_string(), None).await.unwrap();
        assert_eq!(reply.status, ReplyStatus::Ok);
        assert!(reply.text.contains("search"));
    }
}
