//! Raw WHOIS protocol client
//!
//! One query per TCP connection: the request line is written, then the
//! response is read until the server closes the connection or the read
//! deadline passes.

use crate::config::WhoisConfig;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout, timeout_at, Instant};

/// Flag asking the service for its verbose, tabular output
pub const VERBOSE_FLAG: &str = "-v";

/// Errors from the WHOIS transport
#[derive(Debug, thiserror::Error)]
pub enum WhoisError {
    /// The service host name could not be resolved
    #[error("failed to resolve WHOIS server '{target}': {source}")]
    Resolve {
        /// `host:port` target
        target: String,
        /// Underlying error
        source: io::Error,
    },

    /// The TCP connection could not be established
    #[error("failed to connect to WHOIS server '{target}': {source}")]
    Connect {
        /// `host:port` target
        target: String,
        /// Underlying error
        source: io::Error,
    },

    /// Writing the query failed
    #[error("failed to send query to WHOIS server '{target}': {source}")]
    Write {
        /// `host:port` target
        target: String,
        /// Underlying error
        source: io::Error,
    },

    /// Reading the response failed
    #[error("failed to read response from WHOIS server '{target}': {source}")]
    Read {
        /// `host:port` target
        target: String,
        /// Underlying error
        source: io::Error,
    },

    /// The deadline passed before the server finished
    #[error("WHOIS server '{target}' did not respond within {timeout:?}")]
    Timeout {
        /// `host:port` target
        target: String,
        /// Deadline that was exceeded
        timeout: Duration,
    },
}

/// Client for a WHOIS-like routing data service
#[derive(Debug, Clone)]
pub struct WhoisClient {
    config: WhoisConfig,
    target: String,
    addrs: Vec<SocketAddr>,
}

impl WhoisClient {
    /// Resolve the configured server and check it accepts connections.
    ///
    /// The check connection is closed again immediately; every
    /// [`query`](Self::query) uses a connection of its own.
    pub async fn open(config: WhoisConfig) -> Result<Self, WhoisError> {
        let target = config.target();
        let addrs: Vec<SocketAddr> = tokio::net::lookup_host(target.as_str())
            .await
            .map_err(|source| WhoisError::Resolve {
                target: target.clone(),
                source,
            })?
            .collect();

        if addrs.is_empty() {
            return Err(WhoisError::Resolve {
                target,
                source: io::Error::new(io::ErrorKind::NotFound, "no addresses found"),
            });
        }

        let client = Self {
            config,
            target,
            addrs,
        };
        drop(client.connect().await?);
        log::debug!("WHOIS server {} is reachable", client.target);
        Ok(client)
    }

    /// `host:port` this client talks to
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Send one query and return the complete raw response text
    pub async fn query(&self, text: &str) -> Result<String, WhoisError> {
        let query = text.trim_matches(|c| c == '\r' || c == '\n').trim();
        let mut stream = self.connect().await?;
        let deadline = Instant::now() + self.config.timeout;

        let request = format!("{VERBOSE_FLAG} {query}\r\n");
        log::debug!("WHOIS {} <- {:?}", self.target, request.trim_end());
        stream
            .write_all(request.as_bytes())
            .await
            .map_err(|source| WhoisError::Write {
                target: self.target.clone(),
                source,
            })?;

        let mut buf = Vec::new();
        match timeout_at(deadline, stream.read_to_end(&mut buf)).await {
            Ok(Ok(n)) => log::debug!("WHOIS {} -> {n} bytes", self.target),
            Ok(Err(source)) => {
                return Err(WhoisError::Read {
                    target: self.target.clone(),
                    source,
                })
            }
            Err(_) => {
                return Err(WhoisError::Timeout {
                    target: self.target.clone(),
                    timeout: self.config.timeout,
                })
            }
        }

        let response = String::from_utf8_lossy(&buf);
        Ok(response.trim_matches('\0').to_string())
    }

    async fn connect(&self) -> Result<TcpStream, WhoisError> {
        let mut last_error = None;
        for addr in &self.addrs {
            match timeout(self.config.timeout, TcpStream::connect(addr)).await {
                Ok(Ok(stream)) => return Ok(stream),
                Ok(Err(e)) => {
                    log::trace!("WHOIS connect to {addr} failed: {e}");
                    last_error = Some(e);
                }
                Err(_) => {
                    last_error = Some(io::Error::new(
                        io::ErrorKind::TimedOut,
                        format!("connection to {addr} timed out"),
                    ));
                }
            }
        }
        Err(WhoisError::Connect {
            target: self.target.clone(),
            source: last_error
                .unwrap_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no addresses")),
        })
    }
}
