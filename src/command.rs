//! Bot command parser
//!
//! Turns the text a user sends to the bot into a [`Command`]. The text is
//! NFC-normalized and trimmed first; a leading `shh` asks for a private reply.

use crate::store::Action;
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

/// Prefix that turns any command into a private (ephemeral) one
const PRIVATE_PREFIX: &str = "shh";

/// Who gets to see the reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Posted for everyone in the channel
    Public,
    /// Shown only to the user who asked
    Private,
}

/// A parsed bot command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Stats,
    Recent,
    Search { query: String },
    Delete { term: String },
    Define { term: String, definition: String },
    Lookup { term: String },
    /// Recognizable command with missing pieces
    Invalid { reason: String },
}

impl Command {
    /// Interaction kind this command is logged as
    pub fn action(&self) -> Action {
        match self {
            Command::Help | Command::Invalid { .. } => Action::Help,
            Command::Stats => Action::Stats,
            Command::Recent => Action::Recent,
            Command::Search { .. } => Action::Search,
            Command::Delete { .. } => Action::Delete,
            Command::Define { .. } => Action::Define,
            Command::Lookup { .. } => Action::Lookup,
        }
    }
}

/// Parsed command with the text it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Text after NFC normalization and trimming, privacy prefix included
    pub original: String,
    pub command: Command,
    pub visibility: Visibility,
}

/// Command parser
pub struct CommandParser;

impl CommandParser {
    /// Parse raw command text
    pub fn parse(text: &str) -> ParsedCommand {
        let original: String = text.nfc().collect::<String>().trim().to_string();

        let (visibility, body) = match strip_keyword(&original, PRIVATE_PREFIX) {
            Some(rest) => (Visibility::Private, rest),
            None => (Visibility::Public, original.as_str()),
        };

        let command = Self::parse_body(body);

        ParsedCommand {
            original,
            command,
            visibility,
        }
    }

    fn parse_body(body: &str) -> Command {
        let lowered = body.to_lowercase();
        match lowered.as_str() {
            "" | "help" => return Command::Help,
            "stats" => return Command::Stats,
            "recent" => return Command::Recent,
            _ => {}
        }

        if let Some(query) = strip_keyword(body, "search") {
            return Command::Search {
                query: query.to_string(),
            };
        }

        if let Some(term) = strip_keyword(body, "delete") {
            if term.is_empty() {
                return Command::Invalid {
                    reason: "delete needs the term to remove".to_string(),
                };
            }
            return Command::Delete {
                term: term.to_string(),
            };
        }

        if let Some((term, definition)) = body.split_once('=') {
            return Self::parse_define(term.trim(), definition.trim());
        }

        Command::Lookup {
            term: body.to_string(),
        }
    }

    fn parse_define(term: &str, definition: &str) -> Command {
        if term.is_empty() {
            return Command::Invalid {
                reason: "a definition needs a term before the `=`".to_string(),
            };
        }
        if definition.is_empty() {
            return Command::Invalid {
                reason: format!("*{}* needs a definition after the `=`", term),
            };
        }
        Command::Define {
            term: term.to_string(),
            definition: definition.to_string(),
        }
    }
}

/// Strip a leading keyword (case-insensitive) that stands alone or is
/// followed by whitespace. Returns the trimmed remainder.
fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let head = text.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }

    let rest = &text[keyword.len()..];
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}
