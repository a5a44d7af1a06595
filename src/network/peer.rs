//! Peer
//!
//! Wraps one client connection. A connection starts as a [`RawPeer`] and
//! becomes a [`Peer`] only through [`RawPeer::secure`], so frames can never
//! be read before the handshake.

use std::fmt;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpStream};

use crate::error::Result;
use crate::message::Message;
use crate::network::CancelToken;
use crate::protocol::{read_frame, Frame};
use crate::transport::{SecureTransport, Stream};

/// An accepted connection that has not been through the handshake yet
#[derive(Debug)]
pub struct RawPeer {
    stream: TcpStream,
    addr: SocketAddr,
}

impl RawPeer {
    pub fn new(stream: TcpStream, addr: SocketAddr) -> Self {
        Self { stream, addr }
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Run the server handshake and switch to the secured stream
    pub fn secure(self, transport: &dyn SecureTransport, cancel: &CancelToken) -> Result<Peer> {
        let stream = transport.server_handshake(cancel, self.stream)?;
        Ok(Peer::new(stream, self.addr))
    }
}

/// A secured connection
///
/// Reads go through an internal buffer shared by the frame reader and the
/// [`Read`]/[`BufRead`] impls, so nothing read ahead of a frame is lost to
/// stream handlers. Writes are unbuffered.
pub struct Peer {
    reader: BufReader<Box<dyn Stream>>,
    addr: SocketAddr,
    closed: bool,
}

impl Peer {
    pub fn new(stream: Box<dyn Stream>, addr: SocketAddr) -> Self {
        Self {
            reader: BufReader::new(stream),
            addr,
            closed: false,
        }
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Read one delimiter-terminated frame
    pub fn read_frame(&mut self, max_frame_size: usize) -> Result<Frame> {
        read_frame(&mut self.reader, max_frame_size)
    }

    /// Marshal `msg` and write its bytes, unframed
    pub fn write_response(&mut self, msg: &dyn Message) -> Result<()> {
        let bytes = msg.marshal()?;
        let stream = self.reader.get_mut();
        stream.write_all(&bytes)?;
        stream.flush()?;
        tracing::trace!("Wrote {} response bytes to {}", bytes.len(), self.addr);
        Ok(())
    }

    /// Write `error: <err>`, unframed
    pub fn write_error(&mut self, err: &dyn fmt::Display) -> Result<()> {
        let msg = format!("error: {}", err);
        let stream = self.reader.get_mut();
        stream.write_all(msg.as_bytes())?;
        stream.flush()?;
        Ok(())
    }

    /// Shut the connection down
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        self.reader.get_mut().shutdown()?;
        Ok(())
    }
}

impl Read for Peer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl BufRead for Peer {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt)
    }
}

impl Write for Peer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.reader.get_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.reader.get_mut().flush()
    }
}

impl Drop for Peer {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.reader.get_mut().shutdown();
        }
    }
}

impl fmt::Debug for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Peer")
            .field("addr", &self.addr)
            .field("buffered", &self.reader.buffer().len())
            .finish()
    }
}
