//! Newline-delimited JSON-RPC over stdio.
//!
//! Requests are handled strictly one at a time in arrival order, so two
//! sync runs never overlap. stdout carries protocol frames only; logging
//! goes to stderr.

use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::coordinator::Coordinator;
use crate::error::{io_err, ServerError};
use crate::protocol::{
    RpcRequest, RpcResponse, ToolCall, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST,
    METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION, SERVER_NAME,
};
use crate::tools::tool_definitions;

/// Serve requests from `reader` until EOF, writing responses to `writer`.
pub async fn serve<R, W>(coordinator: &Coordinator, reader: R, mut writer: W) -> Result<(), ServerError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    tracing::info!(layout = ?coordinator.layout(), "backup-sync server ready");

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| io_err("stdin", e))?
    {
        if line.trim().is_empty() {
            continue;
        }

        let request = match parse_request(&line) {
            Ok(request) => request,
            Err(response) => {
                write_response(&mut writer, &response).await?;
                continue;
            }
        };

        let Some(id) = request.id else {
            tracing::debug!(method = %request.method, "notification ignored");
            continue;
        };

        let response = dispatch(coordinator, id, &request.method, request.params).await;
        write_response(&mut writer, &response).await?;
    }

    tracing::info!("stdin closed; server exiting");
    Ok(())
}

/// Malformed JSON is a parse error; well-formed JSON that is not a request
/// is an invalid request, answered with its `id` when one is present.
fn parse_request(line: &str) -> Result<RpcRequest, RpcResponse> {
    let value: Value = serde_json::from_str(line).map_err(|err| {
        tracing::warn!(error = %err, "unparseable request");
        RpcResponse::error(Value::Null, PARSE_ERROR, format!("Parse error: {err}"))
    })?;
    let id = value.get("id").cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|err| {
        tracing::warn!(error = %err, "invalid request");
        RpcResponse::error(id, INVALID_REQUEST, format!("Invalid Request: {err}"))
    })
}

/// [`serve`] on the process's stdin/stdout.
pub async fn serve_stdio(coordinator: &Coordinator) -> Result<(), ServerError> {
    let stdin = BufReader::new(tokio::io::stdin());
    serve(coordinator, stdin, tokio::io::stdout()).await
}

async fn dispatch(
    coordinator: &Coordinator,
    id: Value,
    method: &str,
    params: Option<Value>,
) -> RpcResponse {
    match method {
        "initialize" => RpcResponse::ok(id, initialize_result()),
        "ping" => RpcResponse::ok(id, json!({})),
        "tools/list" => RpcResponse::ok(id, json!({ "tools": tool_definitions() })),
        "tools/call" => {
            let call: ToolCall = match params.map(serde_json::from_value) {
                Some(Ok(call)) => call,
                Some(Err(err)) => {
                    return RpcResponse::error(id, INVALID_PARAMS, format!("Invalid params: {err}"))
                }
                None => return RpcResponse::error(id, INVALID_PARAMS, "Invalid params: missing"),
            };
            let result = coordinator.call(&call.name, call.arguments).await;
            match serde_json::to_value(result) {
                Ok(value) => RpcResponse::ok(id, value),
                Err(err) => RpcResponse::error(id, INTERNAL_ERROR, err.to_string()),
            }
        }
        other => RpcResponse::error(id, METHOD_NOT_FOUND, format!("Method not found: {other}")),
    }
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": { "tools": {} },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION"),
        }
    })
}

async fn write_response<W>(writer: &mut W, response: &RpcResponse) -> Result<(), ServerError>
where
    W: AsyncWrite + Unpin,
{
    let mut payload = serde_json::to_vec(response)?;
    payload.push(b'\n');
    writer
        .write_all(&payload)
        .await
        .map_err(|e| io_err("stdout", e))?;
    writer.flush().await.map_err(|e| io_err("stdout", e))
}

/// Install a stderr `fmt` subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_tracing(default_level: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
