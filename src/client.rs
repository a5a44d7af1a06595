//! Minimal blocking client
//!
//! Sends one request frame and reads the unframed reply until the server
//! closes the connection. Speaks the plaintext transport only.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::{ChateauError, Result};
use crate::protocol::{DelimitedCodec, FRAME_DELIMITER};

/// A single-request client connection
#[derive(Debug)]
pub struct Client {
    stream: TcpStream,
    codec: DelimitedCodec,
}

impl Client {
    /// Connect to a server
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        Ok(Self {
            stream,
            codec: DelimitedCodec::default(),
        })
    }

    /// Apply the same timeout to reads and writes
    pub fn set_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.stream.set_read_timeout(timeout)?;
        self.stream.set_write_timeout(timeout)?;
        Ok(())
    }

    pub fn peer_addr(&self) -> Result<SocketAddr> {
        Ok(self.stream.peer_addr()?)
    }

    /// Send the request frame for `handler`
    ///
    /// The payload must not contain the frame delimiter.
    pub fn send(&mut self, handler: &str, payload: &[u8]) -> Result<()> {
        if payload.contains(&FRAME_DELIMITER) {
            return Err(ChateauError::MalformedFrame(
                "payload contains the frame delimiter".to_string(),
            ));
        }

        let frame = self.codec.encode_frame(handler, payload);
        self.stream.write_all(&frame)?;
        self.stream.flush()?;
        Ok(())
    }

    /// Raw stream, for extra exchanges with stream handlers
    pub fn stream(&mut self) -> &mut TcpStream {
        &mut self.stream
    }

    /// Read everything the server writes until it closes the connection
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let mut reply = Vec::new();
        self.stream.read_to_end(&mut reply)?;
        Ok(reply)
    }
}

/// Connect, send one request and return the raw reply
pub fn call(addr: impl ToSocketAddrs, handler: &str, payload: &[u8]) -> Result<Vec<u8>> {
    let mut client = Client::connect(addr)?;
    client.send(handler, payload)?;
    client.finish()
}
