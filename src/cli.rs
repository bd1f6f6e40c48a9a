//! CLI mode implementation
//!
//! Provides command-line access to the glossary next to the MCP and
//! webhook front ends

use clap::{Parser, Subcommand};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Gloss CLI
#[derive(Parser)]
#[command(name = "gloss")]
#[command(about = "Glossary bot: define terms, look them up and search definitions", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Glossary store file (overrides the config file)
    #[arg(long, global = true, env = "GLOSS_STORE")]
    pub store: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output (no short flag to avoid conflicts)
    #[arg(long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set or overwrite the definition of a term
    Define(DefineArgs),
    /// Look up a term, with suggestions when it is not defined
    Lookup(LookupArgs),
    /// Search terms and definitions for a piece of text
    Search(SearchArgs),
    /// Remove a term
    Delete(DeleteArgs),
    /// List recently defined terms
    Recent,
    /// Show glossary statistics
    Stats,
    /// Run a raw bot command, e.g. `shh search youth`
    Run(RunArgs),
    /// Serve the slash-command webhook over HTTP
    Serve(ServeArgs),
}

/// Define tool arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct DefineArgs {
    /// Term to define
    #[schemars(description = "Term to define")]
    pub term: String,

    /// Definition text
    #[schemars(description = "Definition text")]
    pub definition: String,
}

/// Lookup tool arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct LookupArgs {
    /// Term to look up (case-insensitive)
    #[schemars(description = "Term to look up (case-insensitive)")]
    pub term: String,
}

/// Search tool arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct SearchArgs {
    /// Text to find in terms and definitions (case-insensitive)
    #[schemars(description = "Text to find in terms and definitions (case-insensitive)")]
    pub query: String,
}

/// Delete command arguments
#[derive(Parser, Debug)]
pub struct DeleteArgs {
    /// Term to remove
    pub term: String,
}

/// Raw bot command arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct RunArgs {
    /// Command text as typed to the bot, e.g. `saws = a system` or `search youth`
    #[schemars(description = "Command text as typed to the bot, e.g. `saws = a system`, `search youth`, `shh saws`")]
    pub text: String,

    /// Name of the user sending the command
    #[arg(short = 'u', long)]
    #[serde(default)]
    #[schemars(description = "Name of the user sending the command")]
    pub user: Option<String>,
}

/// Webhook server arguments
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Listen address (defaults to the configured one)
    #[arg(short = 'a', long)]
    pub addr: Option<SocketAddr>,
}
