//! Channel-backed transport standing in for the WebSocket.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use rmon_core::connection::{
    ConnectionError, ConnectionResult, Transport, TransportFrame, TransportLink,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::tungstenite;
use url::Url;

/// The server half of one fake connection.
pub struct FakeServer {
    pub to_client: UnboundedSender<TransportFrame>,
    pub from_client: UnboundedReceiver<String>,
}

#[allow(dead_code)]
impl FakeServer {
    pub fn send_text(&self, text: &str) {
        let _ = self.to_client.send(TransportFrame::Text(text.to_string()));
    }

    pub fn close(&self) {
        let _ = self.to_client.send(TransportFrame::Closed);
    }

    /// Everything the client has sent so far.
    pub fn received(&mut self) -> Vec<String> {
        let mut messages = Vec::new();
        while let Ok(message) = self.from_client.try_recv() {
            messages.push(message);
        }
        messages
    }
}

/// Accepts connections unless told to refuse the next ones.
#[derive(Default)]
pub struct FakeTransport {
    refusals: Mutex<VecDeque<()>>,
    servers: Mutex<VecDeque<FakeServer>>,
    attempts: AtomicUsize,
}

#[allow(dead_code)]
impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` connection attempts fail.
    pub fn refuse_next(&self, count: usize) {
        let mut refusals = self.refusals.lock().unwrap_or_else(PoisonError::into_inner);
        refusals.extend(std::iter::repeat(()).take(count));
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Server side of the oldest accepted connection not yet taken.
    pub fn take_server(&self) -> FakeServer {
        match self
            .servers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
        {
            Some(server) => server,
            None => panic!("no accepted connection to take"),
        }
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn connect(&self, url: &Url) -> ConnectionResult<TransportLink> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let refused = self
            .refusals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .is_some();
        if refused {
            return Err(ConnectionError::Connect {
                url: url.to_string(),
                source: tungstenite::Error::ConnectionClosed,
            });
        }

        let (to_client, inbound) = mpsc::unbounded_channel();
        let (outbound, from_client) = mpsc::unbounded_channel();
        self.servers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(FakeServer {
                to_client,
                from_client,
            });

        Ok(TransportLink { outbound, inbound })
    }
}
