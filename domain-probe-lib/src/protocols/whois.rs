//! WHOIS protocol client.
//!
//! Speaks plain WHOIS over TCP: connect to the registry's server, send the
//! domain followed by CRLF, and read until the server closes the connection.
//! The whole read loop shares one deadline that starts when the query is
//! written. Reaching that deadline, or any read error, ends the loop and the
//! bytes received so far are returned as the response.

use crate::error::DomainProbeError;
use crate::protocols::registry::RegistryDirectory;
use crate::tld::resolve_tld;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, warn};

/// Standard WHOIS port.
pub const WHOIS_PORT: u16 = 43;

const READ_CHUNK: usize = 4096;

/// Raw text returned by a WHOIS server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhoisResponse {
    /// Server that answered
    pub server: String,
    /// Everything read before EOF, a read error, or the deadline
    pub text: String,
    /// False when the read ended on an error or the deadline instead of EOF
    pub complete: bool,
}

/// WHOIS client with bounded connect and read phases.
#[derive(Debug, Clone)]
pub struct WhoisClient {
    port: u16,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl WhoisClient {
    /// Create a client with the default port and 10 second timeouts.
    pub fn new() -> Self {
        Self {
            port: WHOIS_PORT,
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(10),
        }
    }

    /// Use a non-standard port, e.g. for a local test server.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Query the WHOIS server responsible for `domain`.
    ///
    /// The server comes from the directory entry of the domain's TLD, or the
    /// root server when there is none.
    ///
    /// # Errors
    ///
    /// Returns `DomainProbeError` if the connection cannot be established in
    /// time or the query cannot be written. Read failures never error.
    pub async fn query(
        &self,
        directory: &RegistryDirectory,
        domain: &str,
    ) -> Result<WhoisResponse, DomainProbeError> {
        let tld = resolve_tld(directory, domain);
        let server = directory.whois_server(&tld);
        self.query_server(server, domain).await
    }

    /// Query a specific WHOIS server.
    pub async fn query_server(
        &self,
        server: &str,
        domain: &str,
    ) -> Result<WhoisResponse, DomainProbeError> {
        debug!(server = %server, port = self.port, "Connecting to WHOIS server");

        let stream = timeout(
            self.connect_timeout,
            TcpStream::connect((server, self.port)),
        )
        .await
        .map_err(|_| {
            DomainProbeError::timeout(
                format!("connecting to WHOIS server {}", server),
                self.connect_timeout,
            )
        })?
        .map_err(|e| {
            DomainProbeError::whois(server, format!("failed to connect to WHOIS server: {}", e))
        })?;

        self.exchange(server, stream, domain).await
    }

    /// Send the query line on an open connection and read the reply.
    async fn exchange<S>(
        &self,
        server: &str,
        mut stream: S,
        domain: &str,
    ) -> Result<WhoisResponse, DomainProbeError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        // A failed send is a transport failure, so the caller falls back to DNS.
        stream
            .write_all(format!("{}\r\n", domain).as_bytes())
            .await
            .map_err(|e| {
                DomainProbeError::whois(server, format!("failed to send WHOIS query: {}", e))
            })?;

        let deadline = Instant::now() + self.read_timeout;
        let mut response = Vec::new();
        let mut buf = [0u8; READ_CHUNK];
        let mut complete = false;

        loop {
            match timeout_at(deadline, stream.read(&mut buf)).await {
                Ok(Ok(0)) => {
                    complete = true;
                    break;
                }
                Ok(Ok(n)) => response.extend_from_slice(&buf[..n]),
                Ok(Err(e)) => {
                    debug!(server = %server, error = %e, "WHOIS read ended with error");
                    break;
                }
                Err(_) => {
                    warn!(
                        server = %server,
                        bytes = response.len(),
                        "WHOIS read deadline reached, keeping partial response"
                    );
                    break;
                }
            }
        }

        debug!(server = %server, bytes = response.len(), complete, "WHOIS response read");

        Ok(WhoisResponse {
            server: server.to_string(),
            text: String::from_utf8_lossy(&response).into_owned(),
            complete,
        })
    }
}

impl Default for WhoisClient {
    fn default() -> Self {
        Self::new()
    }
}
