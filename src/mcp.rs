//! MCP (Model Context Protocol) handling module
//!
//! This module implements the JSON-RPC 2.0 protocol for MCP communication.

use crate::error::AppError;
use crate::tools::{Bot, Reply};
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader as AsyncBufReader};
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info};

/// Upper bound for a single tool call
const TOOL_TIMEOUT: Duration = Duration::from_secs(30);

/// Server context for tracking client information
#[derive(Clone)]
pub struct ServerContext {
    pub client_info: Option<ClientInfo>,
    pub bot: Bot,
}

impl ServerContext {
    pub fn new(bot: Bot) -> Self {
        Self {
            client_info: None,
            bot,
        }
    }

    pub fn get_client_name(&self) -> String {
        self.client_info
            .as_ref()
            .and_then(|info| info.name.as_ref())
            .cloned()
            .unwrap_or_else(|| "Unknown Client".to_string())
    }
}

/// MCP JSON-RPC 2.0 request structure
#[derive(Debug, Deserialize)]
pub struct McpRequest {
    /// JSON-RPC version field, required on the wire but never read
    #[allow(dead_code)]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

/// Initialize request parameters
#[derive(Debug, Deserialize)]
pub struct InitializeParams {
    #[serde(rename = "clientInfo")]
    pub client_info: Option<ClientInfo>,
}

/// Client information
#[derive(Debug, Deserialize, Clone)]
pub struct ClientInfo {
    pub name: Option<String>,
    #[allow(dead_code)]
    pub version: Option<String>,
}

/// MCP JSON-RPC 2.0 response structure
#[derive(Debug, Serialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
}

/// MCP Error structure
#[derive(Debug, Serialize)]
pub struct McpError {
    pub code: String,
    pub message: String,
}

/// MCP Tool call arguments
#[derive(Debug, Deserialize)]
pub struct ToolCallArgs {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// MCP Content item
#[derive(Debug, Serialize)]
pub struct ContentItem {
    pub r#type: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// MCP Tool result
#[derive(Debug, Serialize)]
pub struct ToolResult {
    pub content: Vec<ContentItem>,
}

impl McpResponse {
    /// Create a successful response
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: Option<Value>, code: &str, message: &str) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(McpError {
                code: code.to_string(),
                message: message.to_string(),
            }),
        }
    }

    /// Create an error response from an application error
    pub fn app_error(id: Option<Value>, err: &AppError) -> Self {
        Self::error(id, err.error_code(), &err.message())
    }
}

impl From<Reply> for ToolResult {
    fn from(reply: Reply) -> Self {
        let metadata = json!({
            "visibility": reply.visibility,
            "status": reply.status,
            "data": reply.data,
        });

        Self {
            content: vec![ContentItem {
                r#type: "text".to_string(),
                text: reply.text,
                metadata: Some(metadata),
            }],
        }
    }
}

/// Parse MCP request from JSON string
pub fn parse_request(json: &str) -> Result<McpRequest> {
    let request: McpRequest = serde_json::from_str(json)?;
    Ok(request)
}

/// Serialize MCP response to JSON string
pub fn serialize_response(response: &McpResponse) -> Result<String> {
    Ok(serde_json::to_string(response)?)
}

/// Deserialize tool arguments, run the tool on the blocking pool and wrap
/// the reply as an MCP tool result
pub(crate) async fn run_tool<A, F>(
    id: Option<Value>,
    args: Value,
    bot: &Bot,
    execute: F,
) -> McpResponse
where
    A: DeserializeOwned + Send + 'static,
    F: FnOnce(&Bot, A) -> Result<Reply, AppError> + Send + 'static,
{
    let parsed: A = match serde_json::from_value(args) {
        Ok(parsed) => parsed,
        Err(e) => {
            return McpResponse::app_error(
                id,
                &AppError::InvalidInput(format!("Invalid arguments: {}", e)),
            )
        }
    };

    let bot = bot.clone();
    let task = tokio::task::spawn_blocking(move || execute(&bot, parsed));

    match timeout(TOOL_TIMEOUT, task).await {
        Ok(Ok(Ok(reply))) => match serde_json::to_value(ToolResult::from(reply)) {
            Ok(value) => McpResponse::success(id, value),
            Err(e) => McpResponse::app_error(id, &AppError::Internal(e.to_string())),
        },
        Ok(Ok(Err(e))) => McpResponse::app_error(id, &e),
        Ok(Err(join_error)) => McpResponse::app_error(id, &AppError::from(join_error)),
        Err(_) => McpResponse::error(
            id,
            "timeout",
            &format!("Tool call exceeded {} second timeout", TOOL_TIMEOUT.as_secs()),
        ),
    }
}

/// Handle stdio MCP communication
pub async fn handle_stdio(bot: Bot) -> Result<()> {
    info!("Starting gloss MCP server on stdio");

    let stdin = tokio::io::stdin();
    let mut reader = AsyncBufReader::new(stdin).lines();
    let mut stdout = tokio::io::stdout();

    // Track server context
    let mut context = ServerContext::new(bot);

    while let Some(line) = reader.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        debug!("Received request: {}", line);

        let response = match parse_request(&line) {
            Ok(request) => handle_request(request, &mut context).await,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                McpResponse::error(None, "parse_error", &format!("Invalid JSON: {}", e))
            }
        };

        let response_json = serialize_response(&response)?;
        debug!("Sending response: {}", response_json);

        stdout.write_all(response_json.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    Ok(())
}

/// Handle a single MCP request
async fn handle_request(request: McpRequest, context: &mut ServerContext) -> McpResponse {
    match request.method.as_str() {
        "initialize" => handle_initialize(request, context).await,
        "tools/call" => handle_tool_call(request, context).await,
        "tools/list" => handle_tools_list(request).await,
        _ => McpResponse::error(
            request.id,
            "method_not_found",
            &format!("Method '{}' not found", request.method),
        ),
    }
}

/// Handle tools/call method
async fn handle_tool_call(request: McpRequest, context: &ServerContext) -> McpResponse {
    let args: ToolCallArgs = match serde_json::from_value(request.params.unwrap_or_default()) {
        Ok(args) => args,
        Err(e) => {
            return McpResponse::error(
                request.id.clone(),
                "invalid_params",
                &format!("Invalid parameters: {}", e),
            )
        }
    };

    debug!("Tool '{}' called by {}", args.name, context.get_client_name());

    let bot = &context.bot;
    match args.name.as_str() {
        "gloss" => crate::tools::handle_command(request.id, args.arguments, bot).await,
        "lookup" => crate::tools::lookup::handle_lookup(request.id, args.arguments, bot).await,
        "search" => crate::tools::search::handle_search(request.id, args.arguments, bot).await,
        "define" => crate::tools::define::handle_define(request.id, args.arguments, bot).await,
        _ => McpResponse::error(
            request.id,
            "tool_not_found",
            &format!("Tool '{}' not found", args.name),
        ),
    }
}

/// Handle tools/list method
async fn handle_tools_list(request: McpRequest) -> McpResponse {
    let tools = build_tools_array();

    McpResponse::success(request.id, json!({ "tools": tools }))
}

/// Handle initialize method
async fn handle_initialize(request: McpRequest, context: &mut ServerContext) -> McpResponse {
    if let Some(params) = request.params {
        if let Ok(init_params) = serde_json::from_value::<InitializeParams>(params) {
            context.client_info = init_params.client_info;
            info!("Client connected: {}", context.get_client_name());
        }
    }

    let tools = build_tools_array();
    let result = json!({
        "serverInfo": {
            "name": "gloss",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "capabilities": {
            "tools": { "list": true, "call": true }
        },
        "tools": tools
    });
    McpResponse::success(request.id, result)
}

/// Build the tools array returned from tools/list and initialize
pub(crate) fn build_tools_array() -> Value {
    use crate::cli::{DefineArgs, LookupArgs, RunArgs, SearchArgs};
    use schemars::schema_for;

    // Generate JSON schemas from the CLI argument structs
    let gloss_schema = schema_for!(RunArgs);
    let lookup_schema = schema_for!(LookupArgs);
    let search_schema = schema_for!(SearchArgs);
    let define_schema = schema_for!(DefineArgs);

    json!([
        {
            "name": "gloss",
            "description": "Send a raw command to the glossary bot (`term = definition`, `term`, `search text`, `delete term`, `recent`, `stats`, `help`)",
            "inputSchema": gloss_schema
        },
        {
            "name": "lookup",
            "description": "Look up a term; suggests similar terms when it is not defined",
            "inputSchema": lookup_schema
        },
        {
            "name": "search",
            "description": "Search glossary terms and definitions",
            "inputSchema": search_schema
        },
        {
            "name": "define",
            "description": "Set or overwrite the definition of a term",
            "inputSchema": define_schema
        }
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::temp_bot;

    fn request(id: i64, method: &str, params: Option<Value>) -> McpRequest {
        McpRequest {
            jsonrpc: "2.0".into(),
            id: Some(json!(id)),
            method: method.into(),
            params,
        }
    }

    #[tokio::test]
    async fn test_initialize_response_contains_fields() {
        let (_dir, bot) = temp_bot();
        let mut context = ServerContext::new(bot);
        let params = json!({ "clientInfo": { "name": "inspector", "version": "1" } });

        let resp = handle_request(request(1, "initialize", Some(params)), &mut context).await;
        assert!(resp.error.is_none());
        assert_eq!(context.get_client_name(), "inspector");

        let result = resp.result.expect("result present");
        assert_eq!(
            result
                .get("serverInfo")
                .and_then(|v| v.get("name"))
                .and_then(|v| v.as_str()),
            Some("gloss")
        );
        assert!(result.get("tools").and_then(|v| v.as_array()).is_some());
    }

    #[tokio::test]
    async fn test_tools_list_contains_all_tools() {
        let (_dir, bot) = temp_bot();
        let mut context = ServerContext::new(bot);
        let resp = handle_request(request(2, "tools/list", None), &mut context).await;

        let result = resp.result.expect("result present");
        let names: Vec<String> = result["tools"]
            .as_array()
            .expect("tools array")
            .iter()
            .filter_map(|t| t.get("name").and_then(|n| n.as_str()).map(str::to_string))
            .collect();
        assert_eq!(names, vec!["gloss", "lookup", "search", "define"]);
    }

    #[tokio::test]
    async fn test_define_then_search_via_tools_call() {
        let (_dir, bot) = temp_bot();
        let mut context = ServerContext::new(bot);

        let define = json!({
            "name": "define",
            "arguments": { "term": "SAWS", "definition": "Statewide Automated Welfare System" }
        });
        let resp = handle_request(request(3, "tools/call", Some(define)), &mut context).await;
        assert!(resp.error.is_none());

        let search = json!({ "name": "search", "arguments": { "query": "welfare" } });
        let resp = handle_request(request(4, "tools/call", Some(search)), &mut context).await;
        let result = resp.result.expect("result present");
        let item = &result["content"][0];
        assert_eq!(item["text"], "found *welfare* in: *SAWS*");
        assert_eq!(item["metadata"]["status"], "ok");
        assert_eq!(item["metadata"]["data"]["terms"], json!(["SAWS"]));
    }

    #[tokio::test]
    async fn test_gloss_tool_marks_private_replies() {
        let (_dir, bot) = temp_bot();
        let mut context = ServerContext::new(bot);

        let call = json!({ "name": "gloss", "arguments": { "text": "shh search nothing" } });
        let resp = handle_request(request(5, "tools/call", Some(call)), &mut context).await;
        let item = &resp.result.expect("result present")["content"][0];
        assert_eq!(item["metadata"]["visibility"], "private");
        assert_eq!(item["metadata"]["status"], "no_match");
    }

    #[tokio::test]
    async fn test_invalid_arguments_and_unknown_tool() {
        let (_dir, bot) = temp_bot();
        let mut context = ServerContext::new(bot);

        let call = json!({ "name": "lookup", "arguments": { "query": "x" } });
        let resp = handle_request(request(6, "tools/call", Some(call)), &mut context).await;
        assert_eq!(resp.error.map(|e| e.code), Some("invalid_input".to_string()));

        let call = json!({ "name": "profile", "arguments": {} });
        let resp = handle_request(request(7, "tools/call", Some(call)), &mut context).await;
        assert_eq!(resp.error.map(|e| e.code), Some("tool_not_found".to_string()));

        let resp = handle_request(request(8, "resources/list", None), &mut context).await;
        assert_eq!(resp.error.map(|e| e.code), Some("method_not_found".to_string()));
    }

    #[test]
    fn test_parse_request() {
        let req = parse_request(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#).unwrap();
        assert_eq!(req.method, "tools/list");
        assert!(parse_request("not json").is_err());
    }
}
