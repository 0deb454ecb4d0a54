//! WebSocket transport.
//!
//! One WebSocket per session, addressed as `{base_url}?uid={session}`.
//! Text frames map one-to-one onto channel messages. Binary frames are
//! accepted when they hold valid UTF-8; ping/pong is left to the library.

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use vizedit_core::SessionId;

use crate::channel::{Connector, Link};
use crate::{ChannelError, ChannelResult};

/// Opens WebSocket links against a backend endpoint.
#[derive(Debug, Clone)]
pub struct WsConnector {
    base_url: String,
}

impl WsConnector {
    /// `base_url` is the component endpoint, e.g. `ws://localhost:8080/viz_component`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// The address used for `session`.
    pub fn url_for(&self, session: &SessionId) -> String {
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!("{}{}uid={}", self.base_url, separator, session)
    }
}

impl Connector for WsConnector {
    async fn connect(&self, session: &SessionId) -> ChannelResult<Link> {
        let url = self.url_for(session);
        tracing::debug!("Connecting to {}", url);
        let (socket, _response) = connect_async(url.as_str())
            .await
            .map_err(|e| ChannelError::connection(session, e))?;
        let (mut sink, mut stream) = socket.split();

        let (outbound, mut to_socket) = mpsc::unbounded_channel::<String>();
        let (from_socket, inbound) = mpsc::unbounded_channel::<String>();

        let id = session.clone();
        tokio::spawn(async move {
            while let Some(text) = to_socket.recv().await {
                if let Err(e) = sink.send(Message::text(text)).await {
                    tracing::warn!("Send on session {} failed: {}", id, e);
                    return;
                }
            }
            // Channel closed locally
            let _ = sink.close().await;
        });

        let id = session.clone();
        tokio::spawn(async move {
            while let Some(frame) = stream.next().await {
                let text = match frame {
                    Ok(Message::Text(text)) => text.as_str().to_owned(),
                    Ok(Message::Binary(bytes)) => match String::from_utf8(bytes.to_vec()) {
                        Ok(text) => text,
                        Err(_) => {
                            tracing::warn!("Dropping non-UTF-8 frame on session {}", id);
                            continue;
                        }
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => continue,
                    Err(e) => {
                        tracing::warn!("Receive on session {} failed: {}", id, e);
                        break;
                    }
                };
                if from_socket.send(text).is_err() {
                    break;
                }
            }
        });

        Ok(Link { outbound, inbound })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Channel;
    use tokio::net::TcpListener;

    #[test]
    fn test_url_for() {
        let id = SessionId::new("42").unwrap();
        assert_eq!(
            WsConnector::new("ws://localhost:8080/viz_component").url_for(&id),
            "ws://localhost:8080/viz_component?uid=42"
        );
        assert_eq!(
            WsConnector::new("ws://h/c?token=t").url_for(&id),
            "ws://h/c?token=t&uid=42"
        );
    }

    #[tokio::test]
    async fn test_refused_connection_is_a_connection_error() {
        // Bind then drop to find a port nobody listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let connector = WsConnector::new(format!("ws://{addr}/viz_component"));
        let result = Channel::open(&connector, SessionId::new("s1").unwrap()).await;
        assert!(matches!(result, Err(ChannelError::Connection { .. })));
    }

    #[tokio::test]
    async fn test_echo_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
            while let Some(Ok(message)) = ws.next().await {
                if message.is_text() && ws.send(message).await.is_err() {
                    break;
                }
            }
        });

        let connector = WsConnector::new(format!("ws://{addr}/viz_component"));
        let channel = Channel::open(&connector, SessionId::new("s1").unwrap())
            .await
            .unwrap();
        let (seen_tx, mut seen_rx) = mpsc::unbounded_channel();
        channel.on_message(move |m| {
            let _ = seen_tx.send(m);
        });

        channel.send("y = 2").unwrap();
        assert_eq!(seen_rx.recv().await.unwrap(), "y = 2");
    }
}
