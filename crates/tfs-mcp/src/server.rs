use std::sync::Arc;

use serde_json::json;
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader},
    sync::mpsc,
};

use tfs_core::dispatcher::FileDispatcher;

use crate::{
    rpc::{
        respond_err, respond_ok, RpcRequest, RpcResponse, INVALID_PARAMS, INVALID_REQUEST,
        JSONRPC_VERSION, METHOD_NOT_FOUND,
    },
    tools,
};

const SERVER_NAME: &str = "telegram-file-sender";
const FALLBACK_PROTOCOL_VERSION: &str = "2024-11-05";

pub struct Server {
    dispatcher: Arc<FileDispatcher>,
}

impl Server {
    pub fn new(dispatcher: Arc<FileDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Handle one JSON-RPC message. Notifications (no `id`) get no response.
    pub async fn handle(&self, req: RpcRequest) -> Option<RpcResponse> {
        let Some(id) = req.id else {
            tracing::debug!(method = %req.method, "notification");
            return None;
        };

        if let Some(v) = req.jsonrpc.as_deref().filter(|v| *v != JSONRPC_VERSION) {
            return Some(respond_err(
                id,
                INVALID_REQUEST,
                &format!("Unsupported jsonrpc version: {v}"),
            ));
        }

        match req.method.as_str() {
            "initialize" => {
                let proto = req
                    .params
                    .as_ref()
                    .and_then(|p| p.get("protocolVersion"))
                    .and_then(|v| v.as_str())
                    .unwrap_or(FALLBACK_PROTOCOL_VERSION);

                Some(respond_ok(
                    id,
                    json!({
                      "protocolVersion": proto,
                      "serverInfo": { "name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION") },
                      "capabilities": { "tools": {} }
                    }),
                ))
            }

            "ping" => Some(respond_ok(id, json!({}))),

            "tools/list" => Some(respond_ok(id, tools::list())),

            "tools/call" => {
                let Some(params) = req.params.as_ref() else {
                    return Some(respond_err(id, INVALID_PARAMS, "Missing params"));
                };

                let name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
                let Some(kind) = tools::kind_for(name) else {
                    return Some(respond_err(
                        id,
                        INVALID_PARAMS,
                        &format!("Unknown tool: {name}"),
                    ));
                };

                let args = params
                    .get("arguments")
                    .cloned()
                    .unwrap_or(serde_json::Value::Null);

                let send_req = match tools::parse_request(kind, &args) {
                    Ok(r) => r,
                    Err(msg) => {
                        tracing::warn!(tool = name, error = %msg, "rejected tool arguments");
                        return Some(respond_ok(id, tools::tool_error(&msg)));
                    }
                };

                let res = self.dispatcher.send(send_req).await;
                Some(respond_ok(id, tools::call_result(&res)))
            }

            _ => Some(respond_err(id, METHOD_NOT_FOUND, "Method not found")),
        }
    }
}

/// Serve newline-delimited JSON-RPC until `input` closes.
///
/// Each request runs on its own task; a single writer task owns `output` so
/// response lines never interleave. In-flight requests finish before return.
pub async fn serve<R, W>(server: Arc<Server>, input: R, output: W) -> anyhow::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let writer = tokio::spawn(async move {
        let mut out = output;
        while let Some(line) = rx.recv().await {
            out.write_all(line.as_bytes()).await?;
            out.write_all(b"\n").await?;
            out.flush().await?;
        }
        out.shutdown().await?;
        anyhow::Ok(())
    });

    let mut reader = BufReader::new(input);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        // Raw bytes: a line that is not UTF-8 is skipped, not fatal.
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let Ok(line) = std::str::from_utf8(&buf) else {
            tracing::debug!(len = buf.len(), "skipping non-utf8 line");
            continue;
        };
        if line.trim().is_empty() {
            continue;
        }

        let req = match serde_json::from_str::<RpcRequest>(line) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!(error = %e, "skipping unparsable line");
                continue;
            }
        };

        let server = server.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let Some(resp) = server.handle(req).await else {
                return;
            };
            match serde_json::to_string(&resp) {
                Ok(out) => {
                    let _ = tx.send(out);
                }
                Err(e) => tracing::error!(error = %e, "failed to encode response"),
            }
        });
    }

    drop(tx);
    writer.await??;
    Ok(())
}
