//! Connection Hub
//!
//! Owns the outbound side of every open socket. Each handle gets one
//! unbounded FIFO channel drained by that socket's writer task, so events
//! delivered to the same handle arrive in the order they were sent.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{
    mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
    RwLock,
};

use crate::shared::{ConnectionHandle, ServerEvent};

/// Receiving end handed to a socket's writer task
pub type OutboundReceiver = UnboundedReceiver<ServerEvent>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeliveryError {
    /// Handle was never attached or has been detached
    #[error("no open connection for handle {0}")]
    UnknownHandle(ConnectionHandle),
    /// Writer task has gone away; the socket is closing
    #[error("connection {0} is closed")]
    Closed(ConnectionHandle),
}

/// Anything that can push an event down a live connection
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn deliver(&self, handle: &ConnectionHandle, event: ServerEvent) -> Result<(), DeliveryError>;
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionHub {
    // handle -> writer channel
    inner: Arc<RwLock<HashMap<ConnectionHandle, UnboundedSender<ServerEvent>>>>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the outbound channel for a newly accepted connection
    pub async fn attach(&self, handle: ConnectionHandle) -> OutboundReceiver {
        let (tx, rx) = unbounded_channel();
        self.inner.write().await.insert(handle, tx);
        rx
    }

    /// Drop the outbound channel; the writer task ends once it drains
    pub async fn detach(&self, handle: &ConnectionHandle) -> bool {
        self.inner.write().await.remove(handle).is_some()
    }

    pub async fn connection_count(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[async_trait]
impl EventSink for ConnectionHub {
    async fn deliver(&self, handle: &ConnectionHandle, event: ServerEvent) -> Result<(), DeliveryError> {
        let guard = self.inner.read().await;
        let sender = guard
            .get(handle)
            .ok_or_else(|| DeliveryError::UnknownHandle(handle.clone()))?;
        sender
            .send(event)
            .map_err(|_| DeliveryError::Closed(handle.clone()))
    }
}
