//! Transport seam: endpoint derivation and the socket implementation.
//!
//! A [`Transport`] turns an endpoint into a [`TransportLink`], a pair of
//! channels carrying outbound text and inbound frames. The manager only
//! ever sees the link, so tests can substitute plain channels.

use std::fmt;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};
use url::Url;

use super::error::{ConnectionError, ConnectionResult};

/// Path of the event socket on the server.
pub const SOCKET_PATH: &str = "/ws";

/// Socket endpoint derived from the server base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint(Url);

impl Endpoint {
    /// Derive the socket endpoint from a server URL.
    ///
    /// A secure server (`https`) gets the secure socket variant (`wss`);
    /// `ws`/`wss` URLs keep their scheme. The path is always [`SOCKET_PATH`].
    pub fn from_base(base: &str) -> ConnectionResult<Self> {
        let invalid = |reason: String| ConnectionError::InvalidEndpoint {
            url: base.to_string(),
            reason,
        };

        let mut url = Url::parse(base).map_err(|err| invalid(err.to_string()))?;
        let scheme = match url.scheme() {
            "https" | "wss" => "wss",
            "http" | "ws" => "ws",
            other => return Err(invalid(format!("unsupported scheme `{other}`"))),
        };
        url.set_scheme(scheme)
            .map_err(|()| invalid(format!("cannot switch scheme to `{scheme}`")))?;
        url.set_path(SOCKET_PATH);
        url.set_query(None);
        url.set_fragment(None);

        Ok(Self(url))
    }

    pub fn url(&self) -> &Url {
        &self.0
    }

    pub fn is_secure(&self) -> bool {
        self.0.scheme() == "wss"
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// What the transport delivers to the manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFrame {
    /// One text message.
    Text(String),
    /// A transport-level error. Usually followed by `Closed`.
    Error(String),
    /// The connection is gone.
    Closed,
}

/// An open connection, seen as two channels.
#[derive(Debug)]
pub struct TransportLink {
    pub outbound: UnboundedSender<String>,
    pub inbound: UnboundedReceiver<TransportFrame>,
}

/// Opens connections to an endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn connect(&self, url: &Url) -> ConnectionResult<TransportLink>;
}

/// WebSocket transport backed by tokio-tungstenite.
///
/// Each connection spawns a writer task draining the outbound channel and
/// a reader task forwarding text frames. Dropping the link's sender closes
/// the socket.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketTransport;

#[async_trait]
impl Transport for WebSocketTransport {
    async fn connect(&self, url: &Url) -> ConnectionResult<TransportLink> {
        let (stream, _response) =
            connect_async(url.as_str())
                .await
                .map_err(|source| ConnectionError::Connect {
                    url: url.to_string(),
                    source,
                })?;
        let (mut sink, mut source) = stream.split();

        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(text) = outbound_rx.recv().await {
                if let Err(err) = sink.send(Message::Text(text)).await {
                    warn!(error = %err, "socket write failed");
                    break;
                }
            }
            let _ = sink.close().await;
            debug!("socket writer finished");
        });

        tokio::spawn(async move {
            while let Some(message) = source.next().await {
                let frame = match message {
                    Ok(Message::Text(text)) => TransportFrame::Text(text),
                    Ok(Message::Binary(bytes)) => {
                        TransportFrame::Text(String::from_utf8_lossy(&bytes).into_owned())
                    }
                    Ok(Message::Close(_)) => break,
                    // ping/pong are answered by tungstenite itself
                    Ok(_) => continue,
                    Err(err) => {
                        let _ = inbound_tx.send(TransportFrame::Error(err.to_string()));
                        break;
                    }
                };
                if inbound_tx.send(frame).is_err() {
                    return;
                }
            }
            let _ = inbound_tx.send(TransportFrame::Closed);
        });

        Ok(TransportLink {
            outbound: outbound_tx,
            inbound: inbound_rx,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_follows_server_security() {
        let plain = Endpoint::from_base("http://localhost:8080").unwrap();
        assert_eq!(plain.url().as_str(), "ws://localhost:8080/ws");
        assert!(!plain.is_secure());

        let secure = Endpoint::from_base("https://research.example.com/app?x=1").unwrap();
        assert_eq!(secure.url().as_str(), "wss://research.example.com/ws");
        assert!(secure.is_secure());

        let direct = Endpoint::from_base("wss://host:9000/custom").unwrap();
        assert_eq!(direct.to_string(), "wss://host:9000/ws");
    }

    #[test]
    fn test_endpoint_rejects_other_schemes() {
        assert!(matches!(
            Endpoint::from_base("ftp://host"),
            Err(ConnectionError::InvalidEndpoint { .. })
        ));
        assert!(Endpoint::from_base("not a url").is_err());
    }
}
