mod routes;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use agol_webmap_core::prelude::*;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::client::ClientMap;

/// Everything the handlers read. Immutable once built.
pub struct ViewerState {
    pub map: MapModel,
    /// `ClientMap` JSON, encoded once up front.
    pub client_json: String,
    pub hit_tolerance_px: f64,
}

impl ViewerState {
    pub fn new(map: MapModel, hit_tolerance_px: f64) -> serde_json::Result<Self> {
        let client_json = serde_json::to_string(&ClientMap::from_model(&map))?;
        Ok(Self {
            map,
            client_json,
            hit_tolerance_px,
        })
    }
}

pub struct ViewerServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<io::Result<()>>>,
}

impl ViewerServer {
    pub async fn start(addr: SocketAddr, state: Arc<ViewerState>) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let app = routes::create_router(state);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stops accepting connections and waits for in-flight requests.
    pub async fn shutdown(mut self) -> io::Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        match self.handle.take() {
            Some(handle) => handle.await.map_err(io::Error::other)?,
            None => Ok(()),
        }
    }
}

impl Drop for ViewerServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
