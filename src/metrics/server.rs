use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult, MetricsError};
use crate::pool::{PoolStats, WorkerPool};
use crate::shutdown::ShutdownReceiver;

use super::exposition::{PROMETHEUS_CONTENT_TYPE, render_prometheus};
use super::http::{HttpRequest, HttpResponse, read_http_request, write_response};

/// How long a client may take to send its request head.
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP listener exposing the counters of one pool.
pub struct MetricsServer {
    listener: TcpListener,
    pool: Arc<WorkerPool>,
    read_timeout: Duration,
}

impl MetricsServer {
    /// Binds the listener. Port `0` picks a free port; see [`MetricsServer::local_addr`].
    ///
    /// # Errors
    ///
    /// Returns an error when the address cannot be bound.
    pub async fn bind(addr: SocketAddr, pool: Arc<WorkerPool>) -> AppResult<Self> {
        let listener = TcpListener::bind(addr).await.map_err(|err| {
            AppError::metrics(MetricsError::Bind {
                addr: addr.to_string(),
                source: err,
            })
        })?;
        Ok(Self {
            listener,
            pool,
            read_timeout: DEFAULT_READ_TIMEOUT,
        })
    }

    /// Connections that have not sent a full request head within `timeout`
    /// are answered with 408 and closed.
    #[must_use]
    pub const fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// # Errors
    ///
    /// Returns an error when the socket address cannot be read.
    pub fn local_addr(&self) -> AppResult<SocketAddr> {
        self.listener.local_addr().map_err(|err| {
            AppError::metrics(MetricsError::Io {
                context: "read metrics listener address",
                source: err,
            })
        })
    }

    /// Accepts connections until a shutdown signal arrives. Each connection is
    /// served on its own task.
    ///
    /// # Errors
    ///
    /// Returns an error when the listener address cannot be read.
    pub async fn serve(self, mut shutdown_rx: ShutdownReceiver) -> AppResult<()> {
        info!("Serving metrics on http://{}/metrics", self.local_addr()?);
        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    debug!("Metrics listener stopped.");
                    return Ok(());
                }
                accepted = self.listener.accept() => {
                    let (socket, peer) = match accepted {
                        Ok(result) => result,
                        Err(err) => {
                            warn!("Failed to accept metrics connection: {}", err);
                            continue;
                        }
                    };
                    let pool = Arc::clone(&self.pool);
                    let read_timeout = self.read_timeout;
                    tokio::spawn(async move {
                        if let Err(err) = handle_connection(socket, &pool, read_timeout).await {
                            debug!("Metrics connection from {} failed: {}", peer, err);
                        }
                    });
                }
            }
        }
    }
}

async fn handle_connection(
    mut socket: TcpStream,
    pool: &WorkerPool,
    read_timeout: Duration,
) -> AppResult<()> {
    let read = tokio::time::timeout(read_timeout, read_http_request(&mut socket)).await;
    let request = match read {
        Ok(Ok(request)) => request,
        Err(_elapsed) => {
            let response = HttpResponse::text(408, "request timeout\n");
            return write_response(&mut socket, &response).await;
        }
        Ok(Err(rejected)) => {
            let response = HttpResponse::text(rejected.status, rejected.message);
            return write_response(&mut socket, &response).await;
        }
    };
    let response = respond(&request, &pool.stats())?;
    write_response(&mut socket, &response).await
}

/// Routes one request against a stats snapshot.
pub(super) fn respond(request: &HttpRequest, stats: &PoolStats) -> AppResult<HttpResponse> {
    if request.method != "GET" {
        return Ok(HttpResponse::text(405, "method not allowed\n"));
    }
    let response = match request.path.as_str() {
        "/metrics" => HttpResponse {
            status: 200,
            content_type: PROMETHEUS_CONTENT_TYPE,
            body: render_prometheus(stats)?.into_bytes(),
        },
        "/stats" => HttpResponse {
            status: 200,
            content_type: "application/json",
            body: serde_json::to_vec(stats).map_err(|err| {
                AppError::metrics(MetricsError::Serialize {
                    context: "pool stats",
                    source: err,
                })
            })?,
        },
        "/healthz" => HttpResponse::text(200, "ok\n"),
        _ => HttpResponse::text(404, "not found\n"),
    };
    Ok(response)
}
