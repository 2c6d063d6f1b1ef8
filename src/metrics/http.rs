use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::error::{AppError, AppResult, MetricsError};

const MAX_HEADER_BYTES: usize = 16 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct HttpRequest {
    pub(super) method: String,
    pub(super) path: String,
}

/// A request the listener refuses to route, answered with `status`.
#[derive(Debug)]
pub(super) struct RejectedRequest {
    pub(super) status: u16,
    pub(super) message: String,
}

impl RejectedRequest {
    fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

pub(super) struct HttpResponse {
    pub(super) status: u16,
    pub(super) content_type: &'static str,
    pub(super) body: Vec<u8>,
}

impl HttpResponse {
    pub(super) fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: body.into().into_bytes(),
        }
    }
}

/// Reads the request line and headers. Bodies are ignored; every route is a GET.
pub(super) async fn read_http_request(
    socket: &mut TcpStream,
) -> Result<HttpRequest, RejectedRequest> {
    let mut buffer: Vec<u8> = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    let header_end;

    loop {
        let bytes = socket
            .read(&mut chunk)
            .await
            .map_err(|err| RejectedRequest::new(400, format!("Failed to read request: {}", err)))?;
        if bytes == 0 {
            return Err(RejectedRequest::new(400, "Empty request"));
        }
        let read_slice = chunk
            .get(..bytes)
            .ok_or_else(|| RejectedRequest::new(400, "Invalid read length"))?;
        buffer.extend_from_slice(read_slice);
        if let Some(pos) = find_header_end(&buffer) {
            header_end = pos;
            break;
        }
        if buffer.len() > MAX_HEADER_BYTES {
            return Err(RejectedRequest::new(431, "Request headers too large"));
        }
    }

    let header_bytes = buffer
        .get(..header_end)
        .ok_or_else(|| RejectedRequest::new(400, "Malformed request headers"))?;
    parse_request_head(header_bytes)
}

pub(super) fn parse_request_head(header_bytes: &[u8]) -> Result<HttpRequest, RejectedRequest> {
    let header_text = std::str::from_utf8(header_bytes)
        .map_err(|err| RejectedRequest::new(400, format!("Invalid request encoding: {}", err)))?;
    let request_line = header_text
        .split("\r\n")
        .next()
        .ok_or_else(|| RejectedRequest::new(400, "Missing request line"))?;
    let mut parts = request_line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| RejectedRequest::new(400, "Missing HTTP method"))?;
    let target = parts
        .next()
        .ok_or_else(|| RejectedRequest::new(400, "Missing request path"))?;
    let path = target.split_once('?').map_or(target, |(path, _query)| path);

    Ok(HttpRequest {
        method: method.to_owned(),
        path: path.to_owned(),
    })
}

fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|window| window == b"\r\n\r\n")
}

const fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        431 => "Request Header Fields Too Large",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

pub(super) async fn write_response(
    socket: &mut TcpStream,
    response: &HttpResponse,
) -> AppResult<()> {
    let mut head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        response.status,
        status_text(response.status),
        response.content_type,
        response.body.len()
    );
    if response.status == 405 {
        head.push_str("Allow: GET\r\n");
    }
    head.push_str("\r\n");
    socket.write_all(head.as_bytes()).await.map_err(|err| {
        AppError::metrics(MetricsError::Io {
            context: "write metrics response",
            source: err,
        })
    })?;
    socket.write_all(&response.body).await.map_err(|err| {
        AppError::metrics(MetricsError::Io {
            context: "write metrics response body",
            source: err,
        })
    })?;
    socket.shutdown().await.map_err(|err| {
        AppError::metrics(MetricsError::Io {
            context: "close metrics connection",
            source: err,
        })
    })?;
    Ok(())
}
