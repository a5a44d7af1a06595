//! Connected client tracking
//!
//! Workers register their connection after a successful handshake and hold
//! a [`ClientGuard`] until they return.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;

/// A connected client
#[derive(Debug, Clone)]
pub struct ClientInfo {
    pub addr: SocketAddr,
    pub connected_at: Instant,
}

/// Clients currently being served, keyed by address
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: RwLock<HashMap<SocketAddr, ClientInfo>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `addr` as connected until the returned guard is dropped
    pub fn register(self: &Arc<Self>, addr: SocketAddr) -> ClientGuard {
        self.clients.write().insert(
            addr,
            ClientInfo {
                addr,
                connected_at: Instant::now(),
            },
        );
        ClientGuard {
            registry: Arc::clone(self),
            addr,
        }
    }

    pub fn contains(&self, addr: &SocketAddr) -> bool {
        self.clients.read().contains_key(addr)
    }

    pub fn len(&self) -> usize {
        self.clients.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.read().is_empty()
    }

    /// Copy of the current client list
    pub fn snapshot(&self) -> Vec<ClientInfo> {
        self.clients.read().values().cloned().collect()
    }
}

/// Removes its client from the registry on drop
#[derive(Debug)]
pub struct ClientGuard {
    registry: Arc<ClientRegistry>,
    addr: SocketAddr,
}

impl Drop for ClientGuard {
    fn drop(&mut self) {
        self.registry.clients.write().remove(&self.addr);
    }
}
