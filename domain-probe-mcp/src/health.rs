//! Liveness endpoint for the MCP server.
//!
//! A tiny HTTP/1.1 responder on a tokio listener: `/health` answers 200 with
//! `{"status":"healthy"}`, any other path 404. It does not look at checker
//! state.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, warn};

const MAX_REQUEST_HEAD: usize = 8 * 1024;

/// Accept connections until the listener fails.
pub async fn serve(listener: TcpListener) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                debug!(%peer, "Health check connection");
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream).await {
                        debug!(error = %e, "Health check connection failed");
                    }
                });
            }
            Err(e) => {
                warn!(error = %e, "Health check server stopped");
                return;
            }
        }
    }
}

async fn handle_connection(mut stream: TcpStream) -> std::io::Result<()> {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];

    while !head.windows(4).any(|w| w == b"\r\n\r\n") && head.len() < MAX_REQUEST_HEAD {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }

    let head = String::from_utf8_lossy(&head);
    let request_line = head.lines().next().unwrap_or("");
    stream.write_all(route(request_line).as_bytes()).await?;
    stream.shutdown().await
}

/// Build the full HTTP response for a request line such as `GET /health HTTP/1.1`.
pub fn route(request_line: &str) -> String {
    let path = request_line
        .split_whitespace()
        .nth(1)
        .and_then(|target| target.split('?').next())
        .unwrap_or("");

    if path == "/health" {
        let body = format!("{}\n", serde_json::json!({ "status": "healthy" }));
        response("200 OK", "application/json", &body)
    } else {
        response("404 Not Found", "text/plain; charset=utf-8", "404 page not found\n")
    }
}

fn response(status: &str, content_type: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        content_type,
        body.len(),
        body
    )
}
