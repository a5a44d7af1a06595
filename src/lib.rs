//! # Chateau
//!
//! The connection-handling and dispatch core of an RPC server:
//! - Secure-transport handshake on every accepted connection
//! - One newline-delimited request frame per connection
//! - Registry-based handler resolution
//! - Unary and stream-capable handlers
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Listener Thread                          │
//! │                (accept → RawPeer channel)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Dispatcher                              │
//! │          (select! on peers / cancellation)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ one thread per connection
//!                       ▼
//!   ┌─────────────┐  ┌─────────────┐  ┌─────────────┐  ┌──────────┐
//!   │  Handshake  │─▶│ Read Frame  │─▶│   Resolve   │─▶│  Invoke  │
//!   │ (Transport) │  │   ('\n')    │  │  (Registry) │  │ + Write  │
//!   └─────────────┘  └─────────────┘  └─────────────┘  └──────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod message;
pub mod protocol;
pub mod transport;
pub mod handler;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ChateauError, HandlerError, Result};
pub use config::Config;
pub use handler::{CallContext, Endpoint, Handler, Registry, Service};
pub use message::{Message, Text, Unmarshal};
pub use network::{CancelToken, Peer, Server};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of Chateau
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
