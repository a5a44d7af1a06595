//! Shared helpers for server tests

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chateau::config::Config;
use chateau::network::{CancelToken, Server};
use chateau::{Endpoint, Result};

/// A server running on a background thread
pub struct TestServer {
    pub server: Arc<Server>,
    pub cancel: CancelToken,
    pub addr: SocketAddr,
    handle: Option<JoinHandle<Result<()>>>,
}

impl TestServer {
    /// Cancel and wait for `run` to return
    pub fn stop(mut self) -> Result<()> {
        self.cancel.cancel();
        self.handle.take().unwrap().join().unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

pub fn test_config() -> Config {
    Config::builder()
        .bind_host("127.0.0.1")
        .bind_port(0)
        .accept_poll_interval_ms(5)
        .build()
}

/// Start `server` serving `endpoint` and wait until it is bound
pub fn start<E>(server: Server, endpoint: E) -> TestServer
where
    E: Endpoint + Send + 'static,
{
    let server = Arc::new(server);
    let cancel = CancelToken::new();

    let handle = {
        let server = Arc::clone(&server);
        let cancel = cancel.clone();
        thread::spawn(move || server.run(&cancel, &endpoint))
    };

    let deadline = Instant::now() + Duration::from_secs(5);
    let addr = loop {
        if let Some(addr) = server.local_addr() {
            break addr;
        }
        assert!(Instant::now() < deadline, "server did not bind in time");
        thread::sleep(Duration::from_millis(2));
    };

    TestServer {
        server,
        cancel,
        addr,
        handle: Some(handle),
    }
}

/// Send raw bytes and read until the server closes
pub fn exchange(addr: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    stream.write_all(request).unwrap();

    let mut reply = Vec::new();
    stream.read_to_end(&mut reply).unwrap();
    reply
}

/// Connect and read until the server closes, sending nothing
pub fn read_without_request(addr: SocketAddr) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();

    let mut reply = Vec::new();
    stream.read_to_end(&mut reply).unwrap();
    stream.shutdown(Shutdown::Both).ok();
    reply
}

/// Poll `condition` for up to five seconds
pub fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    condition()
}
