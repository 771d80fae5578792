//! In-memory transport.
//!
//! Hostnames pick the behavior of a connect attempt:
//! - `refuse.*`: the connect fails with `ConnectionRefused`
//! - `reset.*`: the stream fails its first read with `ConnectionReset`
//! - `closed.*`: the stream fails its first read with `NotConnected`
//! - anything else: a duplex pipe whose far end is delivered to the
//!   [`MockListener`]

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use slirc_client::network::BoxedStream;
use slirc_client::{Connector, RemoteAddress};
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, DuplexStream,
    ReadBuf,
};
use tokio::sync::mpsc;
use tokio::time::timeout;

use super::TIMEOUT;

const PIPE_CAPACITY: usize = 64 * 1024;

pub fn pair() -> (MockConnector, MockListener) {
    let (tx, rx) = mpsc::unbounded_channel();
    (MockConnector { accepted: tx }, MockListener { accepted: rx })
}

/// Connector handing out in-memory streams.
pub struct MockConnector {
    accepted: mpsc::UnboundedSender<MockServer>,
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, address: &RemoteAddress) -> io::Result<BoxedStream> {
        let host = address.hostname.as_str();
        if host.starts_with("refuse.") {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        }
        if host.starts_with("reset.") {
            return Ok(Box::new(FailingStream(io::ErrorKind::ConnectionReset)));
        }
        if host.starts_with("closed.") {
            return Ok(Box::new(FailingStream(io::ErrorKind::NotConnected)));
        }

        let (client_end, server_end) = tokio::io::duplex(PIPE_CAPACITY);
        let server = MockServer {
            address: address.clone(),
            stream: BufReader::new(server_end),
        };
        self.accepted
            .send(server)
            .map_err(|_| io::Error::new(io::ErrorKind::ConnectionRefused, "listener gone"))?;
        Ok(Box::new(client_end))
    }
}

/// Receives the server side of every successful connect.
pub struct MockListener {
    accepted: mpsc::UnboundedReceiver<MockServer>,
}

impl MockListener {
    pub async fn accept(&mut self) -> MockServer {
        timeout(TIMEOUT, self.accepted.recv())
            .await
            .expect("no connection in time")
            .expect("connector dropped")
    }
}

/// Server side of one in-memory session.
pub struct MockServer {
    pub address: RemoteAddress,
    stream: BufReader<DuplexStream>,
}

#[allow(dead_code)]
impl MockServer {
    /// Write raw bytes to the client.
    pub async fn write(&mut self, data: &[u8]) {
        let stream = self.stream.get_mut();
        stream.write_all(data).await.expect("write to client");
        stream.flush().await.expect("flush to client");
    }

    pub async fn write_str(&mut self, data: &str) {
        self.write(data.as_bytes()).await;
    }

    /// Read one line sent by the client, terminator included.
    pub async fn recv_line(&mut self) -> String {
        let mut line = String::new();
        timeout(TIMEOUT, self.stream.read_line(&mut line))
            .await
            .expect("no line in time")
            .expect("read from client");
        line
    }

    /// Read exactly `n` raw bytes sent by the client.
    pub async fn recv_bytes(&mut self, n: usize) -> Vec<u8> {
        let mut buf = vec![0u8; n];
        timeout(TIMEOUT, self.stream.read_exact(&mut buf))
            .await
            .expect("no bytes in time")
            .expect("read from client");
        buf
    }

    /// Wait for the client to close its end.
    pub async fn expect_eof(&mut self) {
        let mut rest = Vec::new();
        timeout(TIMEOUT, self.stream.read_to_end(&mut rest))
            .await
            .expect("no EOF in time")
            .expect("read from client");
    }
}

/// Stream whose reads fail with a fixed error kind and whose writes succeed.
struct FailingStream(io::ErrorKind);

impl AsyncRead for FailingStream {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::new(self.0, "injected failure")))
    }
}

impl AsyncWrite for FailingStream {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
