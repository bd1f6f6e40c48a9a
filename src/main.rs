//! Gloss glossary bot: MCP Server, webhook & CLI (Rust)
//!
//! Three front ends over one glossary store:
//! - MCP Server Mode (default): Model Context Protocol server using stdio
//! - Webhook Mode (`serve`): slash-command HTTP endpoint
//! - CLI Mode: Command-line utility for direct tool execution

mod cli;
mod command;
mod config;
mod corpus;
mod error;
mod http;
mod mcp;
mod search;
mod store;
mod tools;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use error::AppError;
use tools::{Bot, Reply, ReplyStatus};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let opened = config::load_config()
        .context("Failed to load configuration")
        .map_err(|e| AppError::ConfigError(format!("{:#}", e)))
        .and_then(|config| Bot::open(config.with_store_path(cli.store.clone())));

    let bot = match opened {
        Ok(bot) => bot,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    };

    match cli.command {
        None => run_mcp_mode(bot).await,
        Some(Commands::Serve(args)) => {
            let addr = args.addr.unwrap_or(bot.config().listen_addr);
            http::serve(bot, addr).await
        }
        Some(command) => run_cli_mode(&bot, command),
    }
}

/// Log to stderr to keep stdout clean; `RUST_LOG` wins over the flags
fn init_logging(cli: &Cli) {
    let log_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run in CLI mode
fn run_cli_mode(bot: &Bot, command: Commands) -> Result<()> {
    let result = execute_cli(bot, command);

    // Handle result and exit with appropriate code
    match result {
        Ok(reply) => {
            println!("{}", reply.text);
            let code = exit_code(&reply);
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e.message());
            std::process::exit(e.exit_code());
        }
    }
}

fn execute_cli(bot: &Bot, command: Commands) -> Result<Reply, AppError> {
    match command {
        Commands::Define(args) => tools::define::execute_define(bot, &args, None),
        Commands::Lookup(args) => tools::lookup::execute_lookup(bot, &args, None),
        Commands::Search(args) => tools::search::execute_search(bot, &args, None),
        Commands::Delete(args) => tools::delete::execute_delete(bot, &args.term, None),
        Commands::Recent => tools::info::execute_recent(bot, None),
        Commands::Stats => tools::info::execute_stats(bot, None),
        Commands::Run(args) => bot.handle(&args.text, args.user.as_deref()),
        Commands::Serve(_) => Err(AppError::Internal(
            "serve is not a one-shot command".to_string(),
        )),
    }
}

/// Map a reply to the process exit code
fn exit_code(reply: &Reply) -> i32 {
    match reply.status {
        ReplyStatus::Ok => 0,
        ReplyStatus::Rejected => 1,
        ReplyStatus::NoMatch => 3,
    }
}

/// Run in MCP server mode
async fn run_mcp_mode(bot: Bot) -> Result<()> {
    info!(
        "Starting gloss MCP Server with store {}",
        bot.store().path().display()
    );

    // Handle stdio MCP communication
    mcp::handle_stdio(bot).await?;

    Ok(())
}
