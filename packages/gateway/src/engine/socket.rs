//! Unix-socket engine client.
//!
//! Every call opens a new connection, writes one request frame, reads one
//! reply frame, and drops the connection. There is no pooling and no retry,
//! so each HTTP request that reaches the engine pays one connect. That is
//! cheap on a local socket but caps throughput at one in-flight call per
//! connection setup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use flowgate_engine_api::{read_frame, write_frame, EngineReply, EngineRequest, EngineResponse};
use tokio::net::UnixStream;

use super::{Engine, EngineError};

/// [`Engine`] implementation backed by the engine's Unix domain socket.
#[derive(Debug, Clone)]
pub struct SocketEngine {
    path: PathBuf,
    timeout: Option<Duration>,
}

impl SocketEngine {
    /// Client for the socket at `path`. Nothing is connected until the first
    /// call.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            timeout: None,
        }
    }

    /// Bound each call (connect + request + reply) by `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn exchange(&self, request: &EngineRequest) -> Result<EngineReply, EngineError> {
        let mut stream = UnixStream::connect(&self.path).await.map_err(|e| {
            EngineError::Transport(format!("connect {}: {e}", self.path.display()))
        })?;
        write_frame(&mut stream, request).await?;
        let reply = read_frame(&mut stream).await?;
        Ok(reply)
    }
}

#[async_trait]
impl Engine for SocketEngine {
    async fn call(&self, request: EngineRequest) -> Result<EngineResponse, EngineError> {
        let method = request.method();
        tracing::debug!(method, socket = %self.path.display(), "engine call");

        let reply = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.exchange(&request))
                .await
                .map_err(|_| EngineError::Timeout(limit))?,
            None => self.exchange(&request).await,
        };

        let result = match reply {
            Ok(EngineReply::Ok(response)) => Ok(response),
            Ok(EngineReply::Error(message)) => Err(EngineError::Rpc(message)),
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            tracing::warn!(method, "engine call failed: {e}");
        }
        result
    }
}
