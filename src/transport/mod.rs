//! Transport Module
//!
//! The secure-transport seam. Every accepted connection is handed to a
//! [`SecureTransport`] before any application byte is read; the transport
//! returns the stream the rest of the connection runs on.
//!
//! The handshake algorithm itself lives behind the trait. [`Plaintext`] is
//! the pass-through implementation used by default and in tests.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};

use crate::error::Result;
use crate::network::CancelToken;

/// A bidirectional byte stream a peer can run on
pub trait Stream: Read + Write + Send {
    /// Close both directions of the stream
    fn shutdown(&mut self) -> io::Result<()>;
}

impl Stream for TcpStream {
    fn shutdown(&mut self) -> io::Result<()> {
        TcpStream::shutdown(self, Shutdown::Both)
    }
}

/// Upgrades a raw connection to a secured stream
pub trait SecureTransport: Send + Sync {
    /// Perform the server side of the handshake
    ///
    /// Consumes the raw stream. On failure the stream is dropped, which
    /// closes the connection without writing anything.
    fn server_handshake(&self, cancel: &CancelToken, stream: TcpStream) -> Result<Box<dyn Stream>>;
}

/// Transport that performs no handshake and returns the stream as-is
#[derive(Debug, Clone, Copy, Default)]
pub struct Plaintext;

impl SecureTransport for Plaintext {
    fn server_handshake(&self, _cancel: &CancelToken, stream: TcpStream) -> Result<Box<dyn Stream>> {
        Ok(Box::new(stream))
    }
}
