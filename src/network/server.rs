//! TCP Server
//!
//! Accepts connections and dispatches each one to its own worker thread.
//!
//! Two loops run for the lifetime of [`Server::run`]:
//! - the **listener** accepts connections and sends them down a channel
//! - the **dispatcher** blocks on that channel (or cancellation) and spawns
//!   a worker per connection without waiting for it
//!
//! The listener is bound before `run` starts either loop. Cancellation is
//! checked once per loop iteration. It does not interrupt handshakes, frame
//! reads or handler calls already in progress.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, OnceLock};
use std::thread;

use crossbeam::channel::{self, select, Receiver, Sender};

use crate::config::Config;
use crate::error::{ChateauError, Result};
use crate::handler::{Endpoint, Registry};
use crate::network::clients::ClientRegistry;
use crate::network::peer::RawPeer;
use crate::network::worker::Worker;
use crate::network::CancelToken;
use crate::protocol::{Codec, DelimitedCodec};
use crate::transport::{Plaintext, SecureTransport};

/// RPC server
pub struct Server {
    config: Config,
    /// Published once by `run`, read-only afterwards
    handlers: OnceLock<Arc<Registry>>,
    clients: Arc<ClientRegistry>,
    transport: Arc<dyn SecureTransport>,
    codec: Arc<dyn Codec>,
    local_addr: OnceLock<SocketAddr>,
}

impl Server {
    /// Create a server using the plaintext transport and the `:` codec
    pub fn new(config: Config) -> Self {
        Self {
            config,
            handlers: OnceLock::new(),
            clients: Arc::new(ClientRegistry::new()),
            transport: Arc::new(Plaintext),
            codec: Arc::new(DelimitedCodec::default()),
            local_addr: OnceLock::new(),
        }
    }

    /// Replace the secure transport
    pub fn with_transport(mut self, transport: impl SecureTransport + 'static) -> Self {
        self.transport = Arc::new(transport);
        self
    }

    /// Replace the frame codec
    pub fn with_codec(mut self, codec: impl Codec + 'static) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Address the listener is bound to, once it is bound
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr.get().copied()
    }

    /// The handler registry, once `run` has published it
    pub fn handlers(&self) -> Option<&Registry> {
        self.handlers.get().map(|registry| registry.as_ref())
    }

    /// Clients currently being served
    pub fn clients(&self) -> &ClientRegistry {
        &self.clients
    }

    /// Serve `endpoint` until `cancel` fires (blocking)
    ///
    /// Fails before serving if the bind address is invalid, the endpoint
    /// registers a name twice or the listener cannot bind. The registry is
    /// published only once the listener is bound, so a failed `run` may be
    /// retried; a second `run` after a successful start is rejected.
    pub fn run(&self, cancel: &CancelToken, endpoint: &dyn Endpoint) -> Result<()> {
        if self.handlers.get().is_some() {
            return Err(ChateauError::AlreadyRunning);
        }

        let addr = self.config.resolve_bind_addr()?;

        let mut registry = Registry::new();
        registry.populate(endpoint)?;

        let listener = bind(addr)?;
        let local_addr = listener.local_addr()?;

        let registry = Arc::new(registry);
        self.handlers
            .set(Arc::clone(&registry))
            .map_err(|_| ChateauError::AlreadyRunning)?;
        let _ = self.local_addr.set(local_addr);

        tracing::info!("Listening on {} with {} handlers", local_addr, registry.len());

        let worker = Arc::new(Worker::new(
            registry,
            Arc::clone(&self.transport),
            Arc::clone(&self.codec),
            Arc::clone(&self.clients),
            cancel.clone(),
            self.config.max_frame_size,
        ));

        let (peers_tx, peers_rx) = channel::unbounded();

        thread::scope(|scope| -> Result<()> {
            let listener = thread::Builder::new()
                .name("chateau-listener".to_string())
                .spawn_scoped(scope, move || self.listen(listener, cancel, peers_tx))?;

            self.dispatch(cancel, peers_rx, &worker);

            listener
                .join()
                .unwrap_or_else(|_| Err(ChateauError::Internal("listener thread panicked".to_string())))
        })
    }

    /// Listener loop: accept until cancelled
    fn listen(&self, listener: TcpListener, cancel: &CancelToken, peers: Sender<RawPeer>) -> Result<()> {
        // Non-blocking accept so cancellation is noticed without a new connection
        listener.set_nonblocking(true)?;

        let local_addr = listener.local_addr()?;
        let poll_interval = self.config.accept_poll_interval();

        loop {
            if cancel.is_cancelled() {
                tracing::info!("Listener on {} shutting down", local_addr);
                return Ok(());
            }

            match listener.accept() {
                Ok((stream, peer_addr)) => {
                    if let Err(e) = self.configure_stream(&stream) {
                        tracing::warn!("Failed to configure connection from {}: {}", peer_addr, e);
                        continue;
                    }

                    tracing::debug!("Accepted connection from {}", peer_addr);
                    if peers.send(RawPeer::new(stream, peer_addr)).is_err() {
                        tracing::debug!("Dispatcher stopped, listener exiting");
                        return Ok(());
                    }
                }
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(ref e) if is_transient(e) => {
                    cancel.wait_timeout(poll_interval);
                }
                Err(e) => {
                    // Nothing was accepted; skip rather than forward a dead peer
                    tracing::warn!("Failed to accept connection: {}", e);
                    cancel.wait_timeout(poll_interval);
                }
            }
        }
    }

    /// Dispatch loop: block until a peer arrives or cancellation fires
    fn dispatch(&self, cancel: &CancelToken, peers: Receiver<RawPeer>, worker: &Arc<Worker>) {
        loop {
            if cancel.is_cancelled() {
                tracing::info!("Dispatcher shutting down");
                return;
            }

            select! {
                recv(peers) -> peer => match peer {
                    Ok(peer) => spawn_worker(worker, peer),
                    Err(_) => {
                        tracing::debug!("Listener stopped, dispatcher exiting");
                        return;
                    }
                },
                recv(cancel.signal()) -> _ => {
                    tracing::info!("Dispatcher shutting down");
                    return;
                }
            }
        }
    }

    /// Accepted sockets go back to blocking mode with the configured timeouts
    fn configure_stream(&self, stream: &TcpStream) -> io::Result<()> {
        stream.set_nonblocking(false)?;
        stream.set_nodelay(true)?;
        stream.set_read_timeout(self.config.read_timeout())?;
        stream.set_write_timeout(self.config.write_timeout())?;
        Ok(())
    }
}

fn bind(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr).map_err(|source| {
        tracing::error!("Failed to bind {}: {}", addr, source);
        ChateauError::Bind {
            addr: addr.to_string(),
            source,
        }
    })
}

fn is_transient(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}

fn spawn_worker(worker: &Arc<Worker>, peer: RawPeer) {
    let addr = peer.peer_addr();
    let worker = Arc::clone(worker);

    let spawned = thread::Builder::new()
        .name(format!("chateau-conn-{}", addr))
        .spawn(move || worker.handle(peer));

    if let Err(e) = spawned {
        tracing::error!("Failed to spawn worker for {}: {}", addr, e);
    }
}
