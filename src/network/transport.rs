//! Stream opening.
//!
//! The connection only needs "open a byte stream, optionally encrypted";
//! [`Connector`] is that seam. [`TcpConnector`] is the production
//! implementation; tests plug in in-memory streams.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{debug, warn};

use super::RemoteAddress;

/// A bidirectional byte stream usable as a session transport.
pub trait AsyncStream: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin> AsyncStream for T {}

/// Type-erased session stream.
pub type BoxedStream = Box<dyn AsyncStream>;

/// Opens transport streams for the connection.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a stream to `address`, encrypted when `address.secure` is set.
    async fn connect(&self, address: &RemoteAddress) -> io::Result<BoxedStream>;
}

/// TCP transport with optional rustls client TLS.
#[derive(Debug, Clone, Default)]
pub struct TcpConnector {
    timeout: Option<Duration>,
}

impl TcpConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail connect attempts that take longer than `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    async fn open(&self, address: &RemoteAddress) -> io::Result<BoxedStream> {
        let tcp_stream = TcpStream::connect((address.hostname.as_str(), address.port)).await?;
        tcp_stream.set_nodelay(true)?;

        if address.secure {
            let tls_stream = upgrade_to_tls(tcp_stream, &address.hostname).await?;
            Ok(Box::new(tls_stream))
        } else {
            Ok(Box::new(tcp_stream))
        }
    }
}

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self, address: &RemoteAddress) -> io::Result<BoxedStream> {
        debug!(address = %address, secure = address.secure, "opening stream");
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.open(address))
                .await
                .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "connect timed out"))?,
            None => self.open(address).await,
        }
    }
}

/// Perform a TLS client handshake against the platform root store.
async fn upgrade_to_tls(
    tcp_stream: TcpStream,
    hostname: &str,
) -> io::Result<tokio_rustls::client::TlsStream<TcpStream>> {
    use tokio_rustls::TlsConnector;
    use tokio_rustls::rustls::pki_types::ServerName;
    use tokio_rustls::rustls::{ClientConfig, RootCertStore};

    let mut roots = RootCertStore::empty();
    let certs = rustls_native_certs::load_native_certs();
    for cert in certs.certs {
        if let Err(e) = roots.add(cert) {
            warn!("Failed to add root cert: {}", e);
        }
    }
    for e in &certs.errors {
        warn!("Error loading native certs: {}", e);
    }

    let config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();

    let connector = TlsConnector::from(Arc::new(config));
    let server_name = ServerName::try_from(hostname.to_string())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    connector.connect(server_name, tcp_stream).await
}
