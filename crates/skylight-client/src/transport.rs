//! WebSocket transport for the relay channel.
//!
//! Provides [`ConnectedRelay`] which handles WebSocket I/O for frame
//! transport. This is a thin layer that just sends/receives frames -
//! lifecycle logic remains in the Sans-IO [`crate::Connection`].
//!
//! On the wire each frame is one text message holding a JSON envelope
//! `{"tag": ..., "body": ...}`. Malformed envelopes are logged and dropped;
//! they never surface to the caller, and an unknown tag travels through as
//! [`InboundFrame::Unknown`] for the feed layer to discard.

use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use skylight_proto::{InboundFrame, OutboundFrame};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use url::Url;

use crate::error::ClientError;

/// JSON envelope carried in each WebSocket text message.
#[derive(Debug, Serialize, Deserialize)]
struct WireEnvelope {
    tag: String,
    #[serde(default)]
    body: Value,
}

/// Handle to a connected relay channel.
///
/// Provides channels for frame transport. Frames are sent/received via the
/// channels, and an internal task handles the WebSocket I/O. The receiver
/// closing is the transport-down signal.
pub struct ConnectedRelay {
    /// Send frames to the relay.
    pub to_relay: mpsc::Sender<OutboundFrame>,
    /// Receive frames from the relay. Yields `None` once the channel drops.
    pub from_relay: mpsc::Receiver<InboundFrame>,
    /// Abort handle to stop the connection task.
    abort_handle: tokio::task::AbortHandle,
}

impl ConnectedRelay {
    /// Stop the connection.
    ///
    /// Frame delivery ceases immediately; any frame already in flight is
    /// dropped by the closed channel.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

/// Connect to a Skylight relay via WebSocket.
///
/// Returns a [`ConnectedRelay`] with channels for frame transport.
pub async fn connect(relay_url: &str) -> Result<ConnectedRelay, ClientError> {
    let url: Url = relay_url
        .parse()
        .map_err(|e| ClientError::Connection(format!("invalid relay url: {e}")))?;
    if !matches!(url.scheme(), "ws" | "wss") {
        return Err(ClientError::Connection(format!("unsupported scheme: {}", url.scheme())));
    }

    let (socket, _response) = connect_async(url.as_str())
        .await
        .map_err(|e| ClientError::Connection(format!("websocket connect failed: {e}")))?;

    let (to_relay_tx, to_relay_rx) = mpsc::channel::<OutboundFrame>(32);
    let (from_relay_tx, from_relay_rx) = mpsc::channel::<InboundFrame>(32);

    // Spawn connection handler
    let handle = tokio::spawn(run_connection(socket, to_relay_rx, from_relay_tx));

    Ok(ConnectedRelay {
        to_relay: to_relay_tx,
        from_relay: from_relay_rx,
        abort_handle: handle.abort_handle(),
    })
}

/// Run the connection, bridging between channels and the WebSocket.
async fn run_connection(
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    mut to_relay: mpsc::Receiver<OutboundFrame>,
    from_relay: mpsc::Sender<InboundFrame>,
) {
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            outgoing = to_relay.recv() => {
                let Some(frame) = outgoing else {
                    // Caller dropped the sender: orderly teardown.
                    let _ = sink.send(Message::Close(None)).await;
                    break;
                };
                match encode_frame(&frame) {
                    Ok(text) => {
                        if let Err(e) = sink.send(Message::Text(text)).await {
                            tracing::warn!(error = %e, "relay send failed");
                            break;
                        }
                    },
                    Err(e) => tracing::warn!(error = %e, "dropping unencodable frame"),
                }
            },
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(frame) = decode_frame(&text)
                            && from_relay.send(frame).await.is_err()
                        {
                            break;
                        }
                    },
                    Some(Ok(Message::Ping(payload))) => {
                        if sink.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    },
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}, // binary/pong frames carry nothing for us
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "relay stream failed");
                        break;
                    },
                }
            },
        }
    }

    // Dropping `from_relay` here closes the receiver, which the caller
    // observes as transport-down.
}

/// Encode an outbound frame as a wire envelope.
fn encode_frame(frame: &OutboundFrame) -> Result<String, ClientError> {
    let (tag, body) = frame.encode();
    let envelope = WireEnvelope { tag: tag.to_owned(), body };
    serde_json::to_string(&envelope).map_err(|e| ClientError::Codec(e.to_string()))
}

/// Decode one text message into a frame, or log-and-drop.
fn decode_frame(text: &str) -> Option<InboundFrame> {
    let envelope: WireEnvelope = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!(error = %e, "dropping unparseable relay message");
            return None;
        },
    };

    match InboundFrame::decode(&envelope.tag, envelope.body) {
        Ok(frame) => Some(frame),
        Err(e) => {
            tracing::warn!(tag = %envelope.tag, error = %e, "dropping malformed relay frame");
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use skylight_proto::{InboundFrame, OutboundFrame};

    use super::{decode_frame, encode_frame};

    #[test]
    fn encode_produces_tagged_envelope() {
        let text = encode_frame(&OutboundFrame::authenticate("tok")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["tag"], "authenticate");
        assert_eq!(value["body"]["method"], "jwt");
        assert_eq!(value["body"]["token"], "tok");
    }

    #[test]
    fn decode_round_trips_a_live_event() {
        let text = json!({
            "tag": "event",
            "body": { "_id": "a1", "provider": "twitch", "type": "follow" }
        })
        .to_string();

        match decode_frame(&text) {
            Some(InboundFrame::Event(record)) => assert_eq!(record.identity(), Some("a1")),
            other => panic!("unexpected decode result: {other:?}"),
        }
    }

    #[test]
    fn decode_drops_garbage_silently() {
        assert!(decode_frame("not json").is_none());
        // Recognized tag, wrong body shape.
        let text = json!({ "tag": "active-sockets", "body": 7 }).to_string();
        assert!(decode_frame(&text).is_none());
    }

    #[test]
    fn decode_passes_unknown_tags_through() {
        let text = json!({ "tag": "event:v2", "body": {} }).to_string();
        assert!(matches!(decode_frame(&text), Some(InboundFrame::Unknown { .. })));
    }
}
