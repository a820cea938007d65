//! Connecting a session to the hub and pumping its frames

use std::sync::Arc;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{error, info, warn};

use super::config::ChannelEndpoint;
use super::error::{ClientError, ClientResult};
use super::session::{Session, SessionState};
use crate::types::ConnectionInfo;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// An open hub connection
struct Link {
    sink: SplitSink<WsStream, Message>,
    stream: SplitStream<WsStream>,
    outbound: mpsc::UnboundedReceiver<String>,
}

impl Session {
    /// Make one connection attempt.
    ///
    /// Returns once the handshake completes; frames are then handled on a
    /// background task until the connection drops, at which point the session
    /// goes back to `Disconnected`. A failed attempt is logged and also
    /// leaves the session `Disconnected`.
    pub async fn connect(self: &Arc<Self>) -> ClientResult<()> {
        let link = match self.open().await {
            Ok(link) => link,
            Err(e) => {
                error!(error = %e, "failed to connect to broadcast channel");
                self.set_state(SessionState::Disconnected);
                return Err(e);
            }
        };

        let session = Arc::clone(self);
        tokio::spawn(async move { session.pump(link).await });
        Ok(())
    }

    /// Run the session in the background, reconnecting as the configured
    /// policy allows. Does not block the caller.
    pub fn start(self: &Arc<Self>) -> JoinHandle<()> {
        let session = Arc::clone(self);
        tokio::spawn(async move { session.run().await })
    }

    async fn run(&self) {
        let mut attempt = 0;

        loop {
            match self.open().await {
                Ok(link) => {
                    attempt = 0;
                    self.pump(link).await;
                }
                Err(e) => {
                    error!(error = %e, "failed to connect to broadcast channel");
                    self.set_state(SessionState::Disconnected);
                }
            }

            let Some(delay) = self.config.reconnect.delay_for(attempt) else {
                break;
            };
            attempt += 1;
            warn!(attempt, ?delay, "reconnecting to broadcast channel");
            tokio::time::sleep(delay).await;
        }
    }

    /// Negotiate (if configured) and complete the WebSocket handshake
    async fn open(&self) -> ClientResult<Link> {
        self.set_state(SessionState::Connecting);
        let timeout = self.config.connect_timeout;

        let url = tokio::time::timeout(timeout, self.resolve_endpoint())
            .await
            .map_err(|_| ClientError::Timeout(timeout))??;
        *self.endpoint.write() = Some(url.clone());

        let (ws, _) = tokio::time::timeout(timeout, connect_async(url.as_str()))
            .await
            .map_err(|_| ClientError::Timeout(timeout))??;

        let (sink, stream) = ws.split();
        let (tx, outbound) = mpsc::unbounded_channel();
        *self.outbound.lock() = Some(tx);
        self.set_state(SessionState::Connected);
        info!(%url, "connected to broadcast channel");

        Ok(Link {
            sink,
            stream,
            outbound,
        })
    }

    async fn resolve_endpoint(&self) -> ClientResult<String> {
        match &self.config.endpoint {
            ChannelEndpoint::Direct(url) => Ok(url.clone()),
            ChannelEndpoint::Negotiate(negotiate_url) => {
                let info: ConnectionInfo = reqwest::Client::new()
                    .get(negotiate_url)
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await?;

                let separator = if info.url.contains('?') { '&' } else { '?' };
                Ok(format!("{}{}id={}", info.url, separator, info.connection_id))
            }
        }
    }

    /// Handle frames in both directions until the connection ends
    async fn pump(&self, link: Link) {
        let Link {
            mut sink,
            mut stream,
            mut outbound,
        } = link;

        loop {
            tokio::select! {
                frame = stream.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            if let Err(e) = self.dispatch(&text) {
                                warn!(error = %e, "dropping hub frame");
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            let _ = sink.send(Message::Pong(data)).await;
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            info!("broadcast channel closed");
                            break;
                        }
                        Some(Ok(_)) => {} // Binary, pong and raw frames are ignored
                        Some(Err(e)) => {
                            error!(error = %e, "broadcast channel error");
                            break;
                        }
                    }
                }

                invocation = outbound.recv() => {
                    let Some(text) = invocation else { break };
                    if let Err(e) = sink.send(Message::Text(text)).await {
                        error!(error = %e, "failed to send invocation");
                        break;
                    }
                }
            }
        }

        self.outbound.lock().take();
        let _ = sink.close().await;
        self.set_state(SessionState::Disconnected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::config::ClientConfig;
    use crate::client::handlers::LogNotifier;
    use crate::client::reconnect::ReconnectPolicy;
    use std::time::Duration;

    /// A local address with nothing listening on it
    async fn refused_addr() -> std::net::SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        addr
    }

    /// A listener that accepts connections and never writes to them
    async fn silent_addr() -> std::net::SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });
        addr
    }

    #[tokio::test]
    async fn test_connecting_while_handshake_in_flight() {
        let addr = silent_addr().await;
        let session = Session::with_default_handlers(
            ClientConfig::direct(format!("ws://{}/api/hub", addr))
                .with_connect_timeout(Duration::from_secs(2)),
            Arc::new(LogNotifier),
        );

        let attempt = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.connect().await })
        };

        tokio::time::timeout(
            Duration::from_secs(1),
            session.wait_for_state(SessionState::Connecting),
        )
        .await
        .unwrap();
        assert_eq!(session.state(), SessionState::Connecting);

        let result = attempt.await.unwrap();
        assert!(matches!(result, Err(ClientError::Timeout(_))));
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[tokio::test]
    async fn test_wss_endpoint_attempts_tls() {
        use tokio_tungstenite::tungstenite::error::{Error as WsError, UrlError};

        // Accept and hang up, so the TLS handshake itself fails
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                drop(stream);
            }
        });

        let session = Session::with_default_handlers(
            ClientConfig::direct(format!("wss://{}/api/hub", addr))
                .with_connect_timeout(Duration::from_secs(5)),
            Arc::new(LogNotifier),
        );

        let err = session.connect().await.unwrap_err();
        assert!(
            !matches!(
                err,
                ClientError::WebSocket(WsError::Url(UrlError::TlsFeatureNotEnabled))
            ),
            "wss:// must reach the TLS handshake, got {:?}",
            err
        );
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[tokio::test]
    async fn test_failed_connect_stays_disconnected() {
        let addr = refused_addr().await;
        let url = format!("ws://{}/api/hub", addr);
        let session = Session::with_default_handlers(
            ClientConfig::direct(url.clone()).with_connect_timeout(Duration::from_secs(5)),
            Arc::new(LogNotifier),
        );

        let result = session.connect().await;

        assert!(result.is_err());
        assert_eq!(session.state(), SessionState::Disconnected);
        assert_eq!(session.endpoint(), Some(url));
    }

    #[tokio::test]
    async fn test_failed_negotiate_stays_disconnected() {
        let addr = refused_addr().await;
        let session = Session::with_default_handlers(
            ClientConfig::negotiate(format!("http://{}/api/negotiate", addr)),
            Arc::new(LogNotifier),
        );

        assert!(matches!(
            session.connect().await,
            Err(ClientError::Negotiate(_))
        ));
        assert_eq!(session.state(), SessionState::Disconnected);
        assert!(session.endpoint().is_none());
    }

    #[tokio::test]
    async fn test_start_gives_up_after_policy() {
        let addr = refused_addr().await;
        let policy = ReconnectPolicy::exponential(2)
            .with_delays(Duration::from_millis(10), Duration::from_millis(20));
        let session = Session::with_default_handlers(
            ClientConfig::direct(format!("ws://{}/api/hub", addr)).with_reconnect(policy),
            Arc::new(LogNotifier),
        );

        let task = session.start();
        tokio::time::timeout(Duration::from_secs(10), task)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(session.state(), SessionState::Disconnected);
    }
}
