//! Connection worker
//!
//! Serves exactly one request on one connection:
//! handshake → read frame → resolve handler → decode → invoke → write → close.
//!
//! Only handler business errors reach the wire. Every other failure is
//! logged and the connection is closed without writing anything.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::error::{ChateauError, Result};
use crate::handler::{CallContext, CallTarget, Handler, Registry};
use crate::network::clients::ClientRegistry;
use crate::network::peer::{Peer, RawPeer};
use crate::network::CancelToken;
use crate::protocol::{Codec, Frame};
use crate::transport::SecureTransport;

/// State shared by every connection worker
pub(crate) struct Worker {
    registry: Arc<Registry>,
    transport: Arc<dyn SecureTransport>,
    codec: Arc<dyn Codec>,
    clients: Arc<ClientRegistry>,
    cancel: CancelToken,
    max_frame_size: usize,
}

impl Worker {
    pub(crate) fn new(
        registry: Arc<Registry>,
        transport: Arc<dyn SecureTransport>,
        codec: Arc<dyn Codec>,
        clients: Arc<ClientRegistry>,
        cancel: CancelToken,
        max_frame_size: usize,
    ) -> Self {
        Self {
            registry,
            transport,
            codec,
            clients,
            cancel,
            max_frame_size,
        }
    }

    /// Handle a connection until its single request is answered
    ///
    /// The peer is closed on every return path.
    pub(crate) fn handle(&self, raw: RawPeer) {
        let addr = raw.peer_addr();

        let mut peer = match raw.secure(self.transport.as_ref(), &self.cancel) {
            Ok(peer) => peer,
            Err(e) => {
                tracing::warn!("Handshake with {} failed: {}", addr, e);
                return;
            }
        };

        let _client = self.clients.register(addr);
        tracing::debug!("Connection established from {}", addr);

        match self.serve(&mut peer) {
            Ok(()) => tracing::debug!("Request from {} completed", addr),
            Err(e) => tracing::warn!("Request from {} failed: {}", addr, e),
        }

        if let Err(e) = peer.close() {
            tracing::debug!("Error closing connection to {}: {}", addr, e);
        }
    }

    fn serve(&self, peer: &mut Peer) -> Result<()> {
        let frame = peer.read_frame(self.max_frame_size)?;
        let (handler, offset) = self.resolve(&frame)?;

        let request = self
            .codec
            .decode_message(frame.payload(offset), handler.request_type())?;

        let ctx = CallContext::new(handler.name(), peer.peer_addr(), self.cancel.clone());
        tracing::trace!("Dispatching {:?} call {} for {}", handler.kind(), handler.name(), ctx.peer_addr());

        let invoked = panic::catch_unwind(AssertUnwindSafe(|| match handler.call() {
            CallTarget::Unary(call) => call(&ctx, request),
            CallTarget::Stream(call) => call(&ctx, request, &mut *peer),
        }));

        let reply = match invoked {
            Ok(result) => result?,
            Err(payload) => {
                return Err(ChateauError::Internal(format!(
                    "handler {} panicked: {}",
                    handler.name(),
                    panic_message(payload.as_ref())
                )))
            }
        };

        match reply {
            Ok(response) => peer.write_response(&*response),
            Err(err) => {
                tracing::debug!("Handler {} returned error: {}", handler.name(), err);
                peer.write_error(&err)
            }
        }
    }

    /// Find the handler named in `frame` and where its payload starts
    ///
    /// The payload must hold at least one byte before the delimiter.
    fn resolve(&self, frame: &Frame) -> Result<(&Handler, usize)> {
        let (name, offset) = self.codec.extract_handler_name(frame.as_bytes())?;

        let handler = self
            .registry
            .get(&name)
            .ok_or(ChateauError::HandlerNotFound(name))?;

        let payload_end = frame.payload_end();
        if offset >= payload_end {
            return Err(ChateauError::MalformedMessage {
                offset,
                len: payload_end,
            });
        }

        Ok((handler, offset))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "non-string panic payload"
    }
}
