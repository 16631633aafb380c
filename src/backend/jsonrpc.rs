//! Line-delimited JSON-RPC 2.0 over TCP or TLS.
//!
//! One request is in flight at a time. Replies are matched by id; server
//! notifications and replies to unknown ids are logged and skipped.

use serde_json::{json, Value};

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf, WriteHalf};
use tokio::net::TcpStream;
use tokio_native_tls::TlsConnector;

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::config::{BackendUrl, Scheme};
use crate::error::BackendError;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Generates a unique, monotonically increasing ID for JSON-RPC requests.
pub fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Anything the channel can run over: a plain socket, a TLS stream, or an
/// in-memory duplex in tests.
pub trait RpcStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> RpcStream for T {}

pub struct JsonRpcChannel {
    reader: BufReader<ReadHalf<Box<dyn RpcStream>>>,
    writer: WriteHalf<Box<dyn RpcStream>>,
    request_timeout: Duration,
}

impl JsonRpcChannel {
    /// Opens the TCP connection and, for `ssl://` urls, the TLS session.
    pub async fn connect(
        url: &BackendUrl,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, BackendError> {
        log::debug!("[RPC] Connecting to {}:{} ...", url.host, url.port);

        let tcp = tokio::time::timeout(
            connect_timeout,
            TcpStream::connect((url.host.as_str(), url.port)),
        )
        .await
        .map_err(|_| BackendError::Timeout(connect_timeout))??;

        let stream: Box<dyn RpcStream> = match url.scheme {
            Scheme::Tcp => Box::new(tcp),
            Scheme::Ssl => {
                let connector = TlsConnector::from(native_tls::TlsConnector::new()?);
                let tls = tokio::time::timeout(connect_timeout, connector.connect(&url.host, tcp))
                    .await
                    .map_err(|_| BackendError::Timeout(connect_timeout))??;
                log::debug!("[RPC] TLS connected");
                Box::new(tls)
            }
        };

        Ok(Self::from_stream(stream, request_timeout))
    }

    pub fn from_stream(stream: Box<dyn RpcStream>, request_timeout: Duration) -> Self {
        let (r, w) = tokio::io::split(stream);
        Self {
            reader: BufReader::new(r),
            writer: w,
            request_timeout,
        }
    }

    /// Sends one request and waits for its reply, bounded by the request timeout.
    pub async fn call(&mut self, method: &str, params: Value) -> Result<Value, BackendError> {
        let id = next_id();
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params
        });

        let timeout = self.request_timeout;
        tokio::time::timeout(timeout, self.exchange(id, &request))
            .await
            .map_err(|_| BackendError::Timeout(timeout))?
    }

    async fn exchange(&mut self, id: u64, request: &Value) -> Result<Value, BackendError> {
        self.send(request).await?;

        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line).await? == 0 {
                return Err(BackendError::ConnectionClosed);
            }
            if line.trim().is_empty() {
                continue;
            }
            log::trace!("[RPC] <<< {}", line.trim());

            let mut msg: Value = serde_json::from_str(&line)?;

            match msg.get("id").and_then(Value::as_u64) {
                None => {
                    log::debug!("[RPC] skipping notification {:?}", msg.get("method"));
                    continue;
                }
                Some(other) if other != id => {
                    log::debug!("[RPC] skipping reply with unknown id {}", other);
                    continue;
                }
                Some(_) => {}
            }

            if let Some(error) = msg.get("error").filter(|e| !e.is_null()) {
                return Err(rpc_error(error));
            }

            return match msg.get_mut("result") {
                Some(result) => Ok(result.take()),
                None => Err(BackendError::UnexpectedResponse(format!(
                    "reply {} has neither result nor error",
                    id
                ))),
            };
        }
    }

    async fn send(&mut self, v: &Value) -> Result<(), BackendError> {
        let s = v.to_string();
        log::trace!("[RPC] >>> {}", s);
        self.writer.write_all(s.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}

fn rpc_error(error: &Value) -> BackendError {
    match error {
        Value::Object(fields) => BackendError::Rpc {
            code: fields.get("code").and_then(Value::as_i64).unwrap_or(0),
            message: fields
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        },
        Value::String(message) => BackendError::Rpc {
            code: 0,
            message: message.clone(),
        },
        other => BackendError::Rpc {
            code: 0,
            message: other.to_string(),
        },
    }
}
