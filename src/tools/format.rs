//! Reply formatting
//!
//! Renders engine and store results into the bot's reply text. Terms are
//! wrapped in `*` so chat clients show them in bold.

use crate::search::{Lookup, SearchResult};
use crate::store::{Action, DefineOutcome, StoreStats};

/// Reply formatter for a bot with the given display name
pub struct Formatter<'a> {
    bot_name: &'a str,
}

fn bold(text: &str) -> String {
    format!("*{}*", text)
}

fn bold_list<S: AsRef<str>>(terms: &[S]) -> String {
    terms
        .iter()
        .map(|t| bold(t.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

impl<'a> Formatter<'a> {
    pub fn new(bot_name: &'a str) -> Self {
        Self { bot_name }
    }

    fn no_definition(&self, term: &str) -> String {
        format!(
            "Sorry, but {} has no definition for {}",
            bold(self.bot_name),
            bold(term)
        )
    }

    pub fn lookup(&self, query: &str, lookup: &Lookup) -> String {
        match lookup {
            Lookup::Hit(record) => format!(
                "{} definition for {}: {}",
                bold(self.bot_name),
                bold(&record.term),
                record.definition
            ),
            Lookup::Miss { suggestions } if suggestions.is_empty() => format!(
                "{}. You can set a definition by typing `{} = <definition>`",
                self.no_definition(query),
                query
            ),
            Lookup::Miss { suggestions } => format!(
                "{}. However, {} has these similar terms: {}",
                self.no_definition(query),
                bold(self.bot_name),
                bold_list(suggestions)
            ),
        }
    }

    pub fn search(&self, query: &str, result: &SearchResult) -> String {
        match result {
            SearchResult::Found { terms } => {
                format!("found {} in: {}", bold(query), bold_list(terms))
            }
            SearchResult::NotFound { .. } => format!(
                "could not find {} in any terms or definitions.",
                bold(query)
            ),
        }
    }

    pub fn define(&self, term: &str, definition: &str, outcome: &DefineOutcome) -> String {
        match outcome {
            DefineOutcome::Created => {
                format!("{} has been defined as {}", bold(term), bold(definition))
            }
            DefineOutcome::Updated { previous } => format!(
                "{} has been redefined as {} (was {})",
                bold(term),
                bold(definition),
                bold(previous)
            ),
        }
    }

    pub fn delete(&self, term: &str, removed: bool) -> String {
        if removed {
            format!("{} has been deleted", bold(term))
        } else {
            self.no_definition(term)
        }
    }

    pub fn recent(&self, terms: &[String]) -> String {
        if terms.is_empty() {
            "No definitions yet.".to_string()
        } else {
            format!("Recently defined: {}", bold_list(terms))
        }
    }

    pub fn stats(&self, stats: &StoreStats) -> String {
        format!(
            "I have {} definitions and have answered {} lookups and {} searches.",
            stats.definitions,
            stats.count(Action::Lookup),
            stats.count(Action::Search)
        )
    }

    pub fn help(&self) -> String {
        [
            format!("{} is a glossary. Commands:", bold(self.bot_name)),
            "• `<term> = <definition>` to set a definition".to_string(),
            "• `<term>` to look up a definition".to_string(),
            "• `search <text>` to search terms and definitions".to_string(),
            "• `delete <term>` to remove a definition".to_string(),
            "• `recent` to list recently defined terms".to_string(),
            "• `stats` for glossary statistics".to_string(),
            "Start any command with `shh` to get a private reply.".to_string(),
        ]
        .join("\n")
    }

    pub fn usage_error(&self, reason: &str) -> String {
        format!("Sorry, {}. Type `help` to see what I can do.", reason)
    }
}
