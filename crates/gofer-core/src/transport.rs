//! Transport client for line-oriented gopher-family servers
//!
//! Every exchange is one connection: connect (bounded), write one request
//! line, read until the peer closes. There is no length framing, so the read
//! ends either on close or when the absolute deadline fires. A deadline
//! expiry after the connection was established is a normal end of reply.

use std::io;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::{timeout, timeout_at, Instant};
use tracing::debug;

use crate::config::defaults::REQUEST_TERMINATOR;
use crate::config::GatewayConfig;

const READ_CHUNK: usize = 8192;

/// Errors talking to a remote server. Each variant names the target address.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("timed out connecting to {addr}")]
    ConnectTimeout { addr: String },

    #[error("failed to send request to {addr}: {source}")]
    Write {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("error reading from {addr}: {source}")]
    Read {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("{addr} closed the connection without sending a greeting")]
    NoGreeting { addr: String },
}

impl TransportError {
    /// The `host:port` this error refers to
    pub fn addr(&self) -> &str {
        match self {
            Self::Connect { addr, .. }
            | Self::ConnectTimeout { addr }
            | Self::Write { addr, .. }
            | Self::Read { addr, .. }
            | Self::NoGreeting { addr } => addr,
        }
    }
}

/// Join host and port the way socket addresses expect (brackets for IPv6)
pub fn join_host_port(host: &str, port: &str) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

/// Connection factory carrying the per-call timeouts
#[derive(Debug, Clone, Copy)]
pub struct Transport {
    connect_timeout: Duration,
    read_deadline: Duration,
}

impl Transport {
    pub fn new(connect_timeout: Duration, read_deadline: Duration) -> Self {
        Self {
            connect_timeout,
            read_deadline,
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(config.connect_timeout, config.read_deadline)
    }

    /// Open a connection; the read deadline starts once it is established
    pub async fn connect(&self, host: &str, port: &str) -> Result<Connection, TransportError> {
        let addr = join_host_port(host, port);

        let stream = match timeout(self.connect_timeout, TcpStream::connect(addr.as_str())).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => return Err(TransportError::Connect { addr, source }),
            Err(_) => return Err(TransportError::ConnectTimeout { addr }),
        };

        debug!("Connected to {}", addr);

        Ok(Connection {
            addr,
            reader: BufReader::new(stream),
            deadline: Instant::now() + self.read_deadline,
        })
    }

    /// Byte-preserving fetch, for opaque item types
    pub async fn fetch_bytes(
        &self,
        host: &str,
        port: &str,
        request_line: &str,
    ) -> Result<Vec<u8>, TransportError> {
        let mut conn = self.connect(host, port).await?;
        conn.send_line(request_line).await?;
        let reply = conn.read_to_close().await?;
        debug!("Fetched {} bytes from {}", reply.len(), conn.addr());
        Ok(reply)
    }

    /// Text fetch, for transparent item types. Invalid UTF-8 is replaced.
    pub async fn fetch_text(
        &self,
        host: &str,
        port: &str,
        request_line: &str,
    ) -> Result<String, TransportError> {
        let bytes = self.fetch_bytes(host, port, request_line).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// One established exchange with a remote server
pub struct Connection {
    addr: String,
    reader: BufReader<TcpStream>,
    deadline: Instant,
}

impl Connection {
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Write `line` followed by the protocol terminator
    pub async fn send_line(&mut self, line: &str) -> Result<(), TransportError> {
        let mut request = String::with_capacity(line.len() + REQUEST_TERMINATOR.len());
        request.push_str(line);
        request.push_str(REQUEST_TERMINATOR);

        let stream = self.reader.get_mut();
        match timeout_at(self.deadline, stream.write_all(request.as_bytes())).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(TransportError::Write {
                addr: self.addr.clone(),
                source,
            }),
            Err(_) => Err(TransportError::Write {
                addr: self.addr.clone(),
                source: io::ErrorKind::TimedOut.into(),
            }),
        }
    }

    /// Read one line including its terminator. `None` means the peer closed.
    ///
    /// Unlike [`read_to_close`](Self::read_to_close), hitting the deadline
    /// here is an error: the caller asked for a line that never came.
    pub async fn read_line(&mut self) -> Result<Option<String>, TransportError> {
        let mut line = String::new();
        match timeout_at(self.deadline, self.reader.read_line(&mut line)).await {
            Ok(Ok(0)) => Ok(None),
            Ok(Ok(_)) => Ok(Some(line)),
            Ok(Err(source)) => Err(TransportError::Read {
                addr: self.addr.clone(),
                source,
            }),
            Err(_) => Err(TransportError::Read {
                addr: self.addr.clone(),
                source: io::ErrorKind::TimedOut.into(),
            }),
        }
    }

    /// Read everything until the peer closes or the deadline fires
    pub async fn read_to_close(&mut self) -> Result<Vec<u8>, TransportError> {
        let mut reply = Vec::new();
        let mut chunk = vec![0u8; READ_CHUNK];

        loop {
            match timeout_at(self.deadline, self.reader.read(&mut chunk)).await {
                Ok(Ok(0)) => break,
                Ok(Ok(n)) => reply.extend_from_slice(&chunk[..n]),
                Ok(Err(source)) => {
                    return Err(TransportError::Read {
                        addr: self.addr.clone(),
                        source,
                    })
                }
                Err(_) => {
                    debug!(
                        "Read deadline reached for {} after {} bytes",
                        self.addr,
                        reply.len()
                    );
                    break;
                }
            }
        }

        Ok(reply)
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    //! Throwaway loopback servers for exercising the clients

    use std::net::SocketAddr;
    use std::time::Duration;

    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serve one connection: optionally send `greeting`, read one request
    /// line, reply with `reply`, then hold the socket for `linger` before
    /// closing. The received request line is delivered on the channel.
    pub async fn serve_once(
        greeting: Option<&'static str>,
        reply: Vec<u8>,
        linger: Duration,
    ) -> (SocketAddr, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(socket);
            if let Some(greeting) = greeting {
                reader.get_mut().write_all(greeting.as_bytes()).await.unwrap();
            }
            let mut request = String::new();
            reader.read_line(&mut request).await.unwrap();
            let _ = tx.send(request);
            reader.get_mut().write_all(&reply).await.unwrap();
            tokio::time::sleep(linger).await;
        });

        (addr, rx)
    }

    /// An address nothing listens on
    pub async fn closed_addr() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_server::{closed_addr, serve_once};
    use super::*;

    fn quick() -> Transport {
        Transport::new(Duration::from_secs(2), Duration::from_millis(300))
    }

    #[test]
    fn test_join_host_port() {
        assert_eq!(join_host_port("example.org", "70"), "example.org:70");
        assert_eq!(join_host_port("::1", "70"), "[::1]:70");
        assert_eq!(join_host_port("[::1]", "70"), "[::1]:70");
    }

    #[tokio::test]
    async fn test_fetch_text_reads_until_close() {
        let reply = b"iHello\t\terror.host\t1\r\n.\r\n".to_vec();
        let (addr, request) = serve_once(None, reply, Duration::ZERO).await;

        let text = quick()
            .fetch_text("127.0.0.1", &addr.port().to_string(), "/docs")
            .await
            .unwrap();

        assert_eq!(text, "iHello\t\terror.host\t1\r\n.\r\n");
        assert_eq!(request.await.unwrap(), "/docs\r\n");
    }

    #[tokio::test]
    async fn test_deadline_ends_reply_successfully() {
        let (addr, _request) =
            serve_once(None, b"partial".to_vec(), Duration::from_secs(5)).await;

        let started = std::time::Instant::now();
        let bytes = quick()
            .fetch_bytes("127.0.0.1", &addr.port().to_string(), "/slow")
            .await
            .unwrap();

        assert_eq!(bytes, b"partial");
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_fetch_bytes_preserves_binary() {
        let payload = vec![0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x00, 0xff, 0xfe, 0x0a];
        let (addr, _request) = serve_once(None, payload.clone(), Duration::ZERO).await;

        let bytes = quick()
            .fetch_bytes("127.0.0.1", &addr.port().to_string(), "/image.gif")
            .await
            .unwrap();

        assert_eq!(bytes, payload);
    }

    #[tokio::test]
    async fn test_connect_failure_names_target() {
        let addr = closed_addr().await;
        let port = addr.port().to_string();

        let err = quick().fetch_text("127.0.0.1", &port, "/").await.unwrap_err();

        assert!(matches!(err, TransportError::Connect { .. }));
        assert_eq!(err.addr(), format!("127.0.0.1:{port}"));
        assert!(err.to_string().contains(&port));
    }

    #[tokio::test]
    async fn test_read_line_then_rest() {
        let (addr, _request) = serve_once(
            Some("200:Database ready\r\n"),
            b"-200:1:name: Ada\r\n200:Ok.\r\n".to_vec(),
            Duration::ZERO,
        )
        .await;

        let mut conn = quick()
            .connect("127.0.0.1", &addr.port().to_string())
            .await
            .unwrap();
        let banner = conn.read_line().await.unwrap();
        assert_eq!(banner.as_deref(), Some("200:Database ready\r\n"));

        conn.send_line("query ada").await.unwrap();
        let rest = conn.read_to_close().await.unwrap();
        assert_eq!(rest, b"-200:1:name: Ada\r\n200:Ok.\r\n");
    }
}
