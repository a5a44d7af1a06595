//! Network Module
//!
//! TCP server and connection handling.
//!
//! ## Architecture
//! - Single listener thread producing accepted connections
//! - Dispatcher blocking on the connection channel or cancellation
//! - One worker thread per connection (unbounded)
//! - One request per connection, answered then closed

mod cancel;
mod clients;
mod peer;
mod server;
mod worker;

pub use cancel::CancelToken;
pub use clients::{ClientGuard, ClientInfo, ClientRegistry};
pub use peer::{Peer, RawPeer};
pub use server::Server;
