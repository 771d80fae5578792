//! Background read loop for one session.
//!
//! Reads chunks, decodes them to text, feeds the frame parser and emits every
//! complete message on `raw` before asking the transport for more. The loop
//! ends on cancellation, EOF, or a read failure; the last two close the
//! session they belong to.

use bytes::BytesMut;
use slirc_proto::{FrameParser, LineDecoder};
use tokio::io::{AsyncReadExt, ReadHalf};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, trace};

use super::error_handling::{ReadErrorAction, classify_read_error};
use crate::Client;
use crate::error::{BusError, ClientError, ErrorKind};
use crate::events::{Payload, names};
use crate::network::{BoxedStream, RemoteAddress};
use crate::telemetry::spans;

/// Everything the read loop owns for its session.
pub(super) struct Session {
    pub generation: u64,
    pub address: RemoteAddress,
    pub shutdown: CancellationToken,
    pub decoder: LineDecoder,
    pub buffer_size: usize,
}

/// Task entry point. An error escaping the loop means an `error` emission
/// nobody handled; it ends the task and is logged.
pub(super) async fn run(client: Client, reader: ReadHalf<BoxedStream>, session: Session) {
    let span = spans::session(&session.address, session.generation);
    if let Err(e) = read_loop(&client, reader, session).instrument(span).await {
        error!(error = %e, code = e.error_code(), "read loop terminated");
    }
}

async fn read_loop(
    client: &Client,
    mut reader: ReadHalf<BoxedStream>,
    mut session: Session,
) -> Result<(), BusError> {
    let mut buf = BytesMut::with_capacity(session.buffer_size);
    let mut parser = FrameParser::new();

    loop {
        buf.clear();
        buf.reserve(session.buffer_size);

        let read = tokio::select! {
            biased;
            _ = session.shutdown.cancelled() => {
                debug!("read loop cancelled");
                return Ok(());
            }
            read = reader.read_buf(&mut buf) => read,
        };

        match read {
            Ok(0) => {
                debug!(pending = parser.pending().len(), "end of stream");
                return client
                    .connection()
                    .close_generation(client, session.generation)
                    .await;
            }
            Ok(n) => {
                trace!(bytes = n, "read");
                let text = session.decoder.decode(&buf);
                for message in parser.feed(&text) {
                    debug!(line = %message.raw, "received");
                    client.events().emit(names::RAW, Payload::Message(message))?;
                    if session.shutdown.is_cancelled() {
                        return Ok(());
                    }
                }
            }
            Err(e) => match classify_read_error(&e) {
                ReadErrorAction::Retry => continue,
                ReadErrorAction::Stop => {
                    debug!(error = %e, "stream already closed");
                    return client
                        .connection()
                        .close_generation(client, session.generation)
                        .await;
                }
                ReadErrorAction::Report => {
                    let reported = client.report(ClientError::new(ErrorKind::Read, e));
                    let closed = client
                        .connection()
                        .close_generation(client, session.generation)
                        .await;
                    return reported.and(closed);
                }
            },
        }
    }
}
