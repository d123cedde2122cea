/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests from stdin, one per line
/// 2. Routes tool calls to the tools layer with the current local time
/// 3. Writes JSON-RPC responses to stdout

use chrono::{Local, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::storage::StorageError;
use crate::tools;
use crate::{HabitAnalyticsServer, ServerError};

/// Outcome of a tool call before it is wrapped into a response
enum ToolOutcome {
    Done(ToolCallResult),
    Rejected(JsonRpcError),
}

/// MCP server that handles communication with the client
pub struct McpServer {
    /// The underlying analytics server
    habit_server: HabitAnalyticsServer,
    /// Whether the client has completed the handshake
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(habit_server: HabitAnalyticsServer) -> Self {
        Self {
            habit_server,
            initialized: false,
        }
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line) {
                        let response_str = serde_json::to_string(&response)?;

                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    ///
    /// Returns `None` for blank lines and notifications.
    pub fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        self.handle_request(request)
    }

    /// Handle a JSON-RPC request
    fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.method.starts_with("notifications/") {
            if request.method == "notifications/initialized" {
                self.initialized = true;
            }
            debug!("Received notification {}", request.method);
            return None;
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(request.id, Value::Null)
            }
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request),
            _ => JsonRpcResponse::error(
                request.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        };

        Some(response)
    }

    /// Handle MCP initialization request
    fn handle_initialize(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let params = request
            .params
            .and_then(|p| serde_json::from_value::<InitializeParams>(p).ok());
        match params {
            Some(InitializeParams {
                protocol_version,
                client_info: Some(client),
                ..
            }) => info!(
                "MCP client connected: {} {} (protocol {})",
                client.name, client.version, protocol_version
            ),
            Some(params) => info!("MCP client connected (protocol {})", params.protocol_version),
            None => info!("MCP client connected"),
        }

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: "Habit Analytics MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Self::respond(request.id, &result)
    }

    /// Handle tools/list request
    fn handle_tools_list(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(request.id, json!({ "tools": tool_definitions() }))
    }

    /// Handle tools/call request
    fn handle_tools_call(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match request.params {
            Some(params) => match serde_json::from_value(params) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        request.id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid parameters: {}", e),
                        None,
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        if !self.initialized {
            debug!("Tool call '{}' before initialization handshake", tool_params.name);
        }

        let now = Local::now().naive_local();
        match self.call_tool(&tool_params.name, tool_params.arguments, now) {
            ToolOutcome::Done(result) => Self::respond(request.id, &result),
            ToolOutcome::Rejected(err) => JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id: request.id,
                result: None,
                error: Some(err),
            },
        }
    }

    /// Dispatch a tool by name
    fn call_tool(&self, name: &str, args: Map<String, Value>, now: NaiveDateTime) -> ToolOutcome {
        let storage = self.habit_server.storage();
        let analytics = self.habit_server.analytics();

        match name {
            "habit_create" => run_tool(args, |params: tools::CreateHabitParams| {
                let response = tools::create_habit(storage, params)?;
                let text = match &response.habit_id {
                    Some(habit_id) => format!("{}\nHabit ID: {}", response.message, habit_id),
                    None => response.message.clone(),
                };
                Ok(ToolCallResult::success(text))
            }),
            "habit_log" => run_tool(args, |params: tools::LogHabitParams| {
                let response = tools::log_habit(storage, analytics, params, now)?;
                Ok(ToolCallResult::success(response.message))
            }),
            "habit_unlog" => run_tool(args, |params: tools::UnlogHabitParams| {
                let response = tools::unlog_habit(storage, analytics, params, now)?;
                Ok(ToolCallResult::success(response.message))
            }),
            "habit_update" => run_tool(args, |params: tools::UpdateHabitParams| {
                let response = tools::update_habit(storage, params)?;
                Ok(ToolCallResult::success(response.message))
            }),
            "habit_delete" => run_tool(args, |params: tools::DeleteHabitParams| {
                let response = tools::delete_habit(storage, params)?;
                Ok(ToolCallResult::success(response.message))
            }),
            "habit_list" => run_tool(args, |params: tools::ListHabitsParams| {
                let response = tools::list_habits(storage, analytics, params, now)?;
                Ok(ToolCallResult::success(render_list(&response)))
            }),
            "habit_metrics" => run_tool(args, |params: tools::HabitMetricsParams| {
                let response = tools::habit_metrics(storage, analytics, params, now)?;
                Ok(ToolCallResult::with_json(response.message, &serde_json::to_value(&response.metrics)?))
            }),
            "habit_calendar" => run_tool(args, |params: tools::HabitCalendarParams| {
                let response = tools::habit_calendar(storage, analytics, params, now)?;
                Ok(ToolCallResult::with_json(
                    response.rendered.clone(),
                    &serde_json::to_value(&response.calendar)?,
                ))
            }),
            _ => ToolOutcome::Done(ToolCallResult::error(format!("Unknown tool: {}", name))),
        }
    }

    /// Serialize a result, falling back to an internal error
    fn respond<T: Serialize>(id: Value, result: &T) -> JsonRpcResponse {
        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => {
                error!("Failed to serialize response: {}", e);
                JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string(), None)
            }
        }
    }
}

/// Deserialize arguments and run a tool
///
/// Malformed arguments become `INVALID_PARAMS`. Errors the caller can fix
/// (unknown habit, failed validation) are reported in the tool result;
/// storage failures become JSON-RPC errors.
fn run_tool<P, F>(args: Map<String, Value>, f: F) -> ToolOutcome
where
    P: DeserializeOwned,
    F: FnOnce(P) -> Result<ToolCallResult, StorageError>,
{
    let params: P = match serde_json::from_value(Value::Object(args)) {
        Ok(params) => params,
        Err(e) => {
            return ToolOutcome::Rejected(JsonRpcError {
                code: error_codes::INVALID_PARAMS,
                message: format!("Invalid arguments: {}", e),
                data: None,
            });
        }
    };

    match f(params) {
        Ok(result) => ToolOutcome::Done(result),
        Err(e) => {
            let code = storage_error_to_json_rpc_code(&e);
            match code {
                error_codes::HABIT_NOT_FOUND | error_codes::VALIDATION_ERROR => {
                    debug!("Tool rejected input: {}", e);
                    ToolOutcome::Done(ToolCallResult::error(e.to_string()))
                }
                _ => {
                    warn!("Tool failed: {}", e);
                    ToolOutcome::Rejected(JsonRpcError {
                        code,
                        message: e.to_string(),
                        data: None,
                    })
                }
            }
        }
    }
}

fn render_list(response: &tools::ListHabitsResponse) -> String {
    if response.habits.is_empty() {
        return "No habits found. Create your first habit to get started!".to_string();
    }

    let header = format!("Habit Summary ({} habits)\n", response.summary.total_habits);
    let rows = response
        .habits
        .iter()
        .map(|h| {
            let tags = if h.tags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", h.tags.join(", "))
            };
            format!(
                "- {}{} ({})\n  Target: {} | Streak: {} days | {}: {:.1}% | Total: {}\n  ID: {}",
                h.name,
                tags,
                h.last_completed.as_deref().map_or("never completed".to_string(), |d| format!("last {}", d)),
                h.target,
                h.current_streak,
                h.period_label,
                h.completion_rate,
                h.total_completions,
                h.habit_id
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}\n{}\n\nOn a streak: {} | Average progress: {:.1}%",
        header, rows, response.summary.habits_on_streak, response.summary.avg_completion_rate
    )
}

fn habit_id_schema() -> Value {
    json!({"type": "string", "description": "ID of the habit"})
}

fn frequency_schema() -> Value {
    json!({
        "description": "Target: {\"count\": N, \"period\": \"day|week|month|year\"}, a number of times per week, or text like \"3 times/week\" or \"every 2 days\"",
        "oneOf": [
            {
                "type": "object",
                "properties": {
                    "count": {"type": "integer", "minimum": 1},
                    "period": {"type": "string", "enum": ["day", "week", "month", "year"]}
                },
                "required": ["count", "period"]
            },
            {"type": "number", "minimum": 0},
            {"type": "string"}
        ]
    })
}

/// Tools advertised by `tools/list`
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "habit_create".to_string(),
            description: "Create a new habit with an expected frequency".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string", "description": "Name of the habit"},
                    "frequency": frequency_schema(),
                    "tags": {"type": "array", "items": {"type": "string"}, "description": "Labels for filtering (optional)"},
                    "notes": {"type": "string", "description": "Free-form notes (optional)"}
                },
                "required": ["name"]
            }),
        },
        ToolDefinition {
            name: "habit_log".to_string(),
            description: "Log a completion of a habit; several per day are allowed".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "habit_id": habit_id_schema(),
                    "completed_at": {"type": "string", "description": "ISO date or date-time (optional, defaults to now)"}
                },
                "required": ["habit_id"]
            }),
        },
        ToolDefinition {
            name: "habit_unlog".to_string(),
            description: "Remove one logged completion, matched exactly as it was logged".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "habit_id": habit_id_schema(),
                    "completed_at": {"type": "string", "description": "The logged timestamp to remove"}
                },
                "required": ["habit_id", "completed_at"]
            }),
        },
        ToolDefinition {
            name: "habit_update".to_string(),
            description: "Change a habit's name, frequency, tags or notes".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "habit_id": habit_id_schema(),
                    "name": {"type": "string"},
                    "frequency": frequency_schema(),
                    "tags": {"type": "array", "items": {"type": "string"}},
                    "notes": {"type": "string", "description": "Empty string clears the notes"}
                },
                "required": ["habit_id"]
            }),
        },
        ToolDefinition {
            name: "habit_delete".to_string(),
            description: "Delete a habit and its completion history".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {"habit_id": habit_id_schema()},
                "required": ["habit_id"]
            }),
        },
        ToolDefinition {
            name: "habit_list".to_string(),
            description: "List habits with current streaks and progress in the active period".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "tag": {"type": "string", "description": "Only habits carrying this tag (optional)"},
                    "sort_by": {"type": "string", "enum": ["name", "streak", "completion_rate", "total_completions"], "description": "Sort order (optional, newest first by default)"}
                },
                "required": []
            }),
        },
        ToolDefinition {
            name: "habit_metrics".to_string(),
            description: "Streaks, period completion rate, success rates, best hour and consistency score for a habit".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {"habit_id": habit_id_schema()},
                "required": ["habit_id"]
            }),
        },
        ToolDefinition {
            name: "habit_calendar".to_string(),
            description: "Month grid or year heatmap of a habit's completions".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "habit_id": habit_id_schema(),
                    "view": {"type": "string", "enum": ["month", "heatmap"], "description": "Layout (optional, chosen from the habit's period)"},
                    "month": {"type": "string", "description": "Month for the month view as YYYY-MM (optional, defaults to this month)"}
                },
                "required": ["habit_id"]
            }),
        },
    ]
}
