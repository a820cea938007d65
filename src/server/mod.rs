//! Hotseat server assembly
//!
//! Wires the store, the send-events trigger, the hub and the router
//! together and serves them until shut down.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::broadcast::{BroadcastDispatcher, Hub, SendEvents};
use crate::config::{ConfigError, ServerConfig};
use crate::event_store::{EventStore, EventStoreConfig, StoreError};

/// Result type for server lifecycle operations
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors starting or stopping the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A running server
pub struct ServerHandle {
    local_addr: SocketAddr,
    store: Arc<EventStore>,
    hub: Arc<Hub>,
    shutdown: oneshot::Sender<()>,
    serve_task: JoinHandle<std::io::Result<()>>,
    trigger_task: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the listener actually bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Base HTTP URL of the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.local_addr)
    }

    pub fn store(&self) -> &Arc<EventStore> {
        &self.store
    }

    pub fn hub(&self) -> &Arc<Hub> {
        &self.hub
    }

    /// Close the hub, stop accepting requests and wait for in-flight ones
    pub async fn shutdown(self) -> ServerResult<()> {
        // Hub sessions end once the hub closes; HTTP shutdown waits on them
        self.hub.close();
        let _ = self.shutdown.send(());
        self.serve_task.await??;
        self.trigger_task.abort();
        info!("server stopped");
        Ok(())
    }
}

/// Open the store, start the send-events trigger and serve the router
pub async fn start(config: ServerConfig) -> ServerResult<ServerHandle> {
    config.validate()?;

    let store = Arc::new(EventStore::open(EventStoreConfig::new(&config.data_dir))?);
    let hub = Arc::new(Hub::new(config.hub_capacity));

    let trigger = SendEvents::new(BroadcastDispatcher::new(Arc::clone(&hub)));
    let trigger_task = trigger.spawn(store.subscribe());

    let listener = TcpListener::bind(config.bind_addr).await?;
    let local_addr = listener.local_addr()?;

    let state = Arc::new(AppState::new(Arc::clone(&store), Arc::clone(&hub), config));
    let app = create_router(state);

    let (shutdown, shutdown_rx) = oneshot::channel::<()>();
    let serve_task = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
    });

    info!(%local_addr, "hotseat server listening");

    Ok(ServerHandle {
        local_addr,
        store,
        hub,
        shutdown,
        serve_task,
        trigger_task,
    })
}
