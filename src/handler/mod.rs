//! Handler Module
//!
//! Named units of request handling logic.
//!
//! ## Calling Conventions
//! - **Unary**: `(context, request) -> response | error`
//! - **Stream**: `(context, request, peer) -> response | error`, where the
//!   handler may exchange any number of extra messages over the peer before
//!   returning
//!
//! Typed closures are erased into a [`CallTarget`] when the handler is
//! built, so dispatch is a plain `match` on the variant.

mod registry;

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::error::{HandlerError, Result};
use crate::message::{downcast, Message, RequestType, Unmarshal};
use crate::network::{CancelToken, Peer};

pub use registry::{Endpoint, Registry, Service};

/// Outcome of a handler call: a response, or a business error for the wire
pub type Reply = std::result::Result<Box<dyn Message>, HandlerError>;

/// Type-erased unary call
pub type UnaryFn = dyn Fn(&CallContext, Box<dyn Message>) -> Result<Reply> + Send + Sync;

/// Type-erased stream call
pub type StreamFn = dyn Fn(&CallContext, Box<dyn Message>, &mut Peer) -> Result<Reply> + Send + Sync;

/// Per-call information handed to handlers
#[derive(Debug, Clone)]
pub struct CallContext {
    handler: String,
    peer_addr: SocketAddr,
    cancel: CancelToken,
}

impl CallContext {
    pub fn new(handler: impl Into<String>, peer_addr: SocketAddr, cancel: CancelToken) -> Self {
        Self {
            handler: handler.into(),
            peer_addr,
            cancel,
        }
    }

    /// Name of the handler being invoked
    pub fn handler(&self) -> &str {
        &self.handler
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// True once the server has been asked to shut down
    ///
    /// Nothing interrupts a running handler; long-running stream handlers
    /// should poll this between exchanges.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// The two handler shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    Unary,
    Stream,
}

/// A handler's erased call target
#[derive(Clone)]
pub enum CallTarget {
    Unary(Arc<UnaryFn>),
    Stream(Arc<StreamFn>),
}

impl CallTarget {
    pub fn kind(&self) -> HandlerKind {
        match self {
            CallTarget::Unary(_) => HandlerKind::Unary,
            CallTarget::Stream(_) => HandlerKind::Stream,
        }
    }
}

/// A registry entry
#[derive(Clone)]
pub struct Handler {
    name: String,
    request_type: RequestType,
    call: CallTarget,
}

impl Handler {
    /// Build a single-response handler
    pub fn unary<Req, Resp, F>(name: impl Into<String>, f: F) -> Self
    where
        Req: Unmarshal,
        Resp: Message + 'static,
        F: Fn(&CallContext, Req) -> std::result::Result<Resp, HandlerError> + Send + Sync + 'static,
    {
        let call = move |ctx: &CallContext, request: Box<dyn Message>| -> Result<Reply> {
            let request = downcast::<Req>(request)?;
            Ok(f(ctx, request).map(|resp| Box::new(resp) as Box<dyn Message>))
        };

        Self {
            name: name.into(),
            request_type: RequestType::of::<Req>(),
            call: CallTarget::Unary(Arc::new(call)),
        }
    }

    /// Build a stream-capable handler
    ///
    /// The handler owns framing of any intermediate messages it exchanges
    /// over the peer.
    pub fn stream<Req, Resp, F>(name: impl Into<String>, f: F) -> Self
    where
        Req: Unmarshal,
        Resp: Message + 'static,
        F: Fn(&CallContext, Req, &mut Peer) -> std::result::Result<Resp, HandlerError>
            + Send
            + Sync
            + 'static,
    {
        let call = move |ctx: &CallContext, request: Box<dyn Message>, peer: &mut Peer| -> Result<Reply> {
            let request = downcast::<Req>(request)?;
            Ok(f(ctx, request, peer).map(|resp| Box::new(resp) as Box<dyn Message>))
        };

        Self {
            name: name.into(),
            request_type: RequestType::of::<Req>(),
            call: CallTarget::Stream(Arc::new(call)),
        }
    }

    /// Assemble a handler from already-erased parts
    ///
    /// Used by generated endpoints that decode into their own types.
    pub fn from_parts(name: impl Into<String>, request_type: RequestType, call: CallTarget) -> Self {
        Self {
            name: name.into(),
            request_type,
            call,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn request_type(&self) -> &RequestType {
        &self.request_type
    }

    pub fn call(&self) -> &CallTarget {
        &self.call
    }

    pub fn kind(&self) -> HandlerKind {
        self.call.kind()
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("request_type", &self.request_type)
            .field("kind", &self.kind())
            .finish()
    }
}
