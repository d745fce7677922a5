//! Streams snapshot lines to one remote viewer at a time over TCP.
//!
//! Dropping the [`SnapshotFeed`] disconnects the channel, wakes the accept
//! loop with a loopback connection and joins the thread, which closes the
//! listener.

use std::io::{ErrorKind, Write};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, Sender, TrySendError};

use crate::error::Result;

pub const DEFAULT_ADDRESS: &str = "127.0.0.1:9565";

/// A viewer that stops reading is dropped after this long.
const WRITE_TIMEOUT: Duration = Duration::from_secs(2);

pub struct SnapshotFeed {
    /// `None` only while dropping.
    sender: Option<Sender<String>>,
    local_addr: SocketAddr,
    worker: Option<JoinHandle<()>>,
}

impl SnapshotFeed {
    /// Binds immediately and serves viewers from a background thread.
    pub fn bind(addr: impl ToSocketAddrs) -> Result<Self> {
        let listener = TcpListener::bind(addr)?;
        let local_addr = listener.local_addr()?;
        // one slot: a slow viewer sees the newest frame it can keep up with
        let (sender, receiver) = channel::bounded(1);

        let worker = thread::Builder::new()
            .name("snapshot-feed".into())
            .spawn(move || serve(listener, receiver))?;

        log::info!("snapshot feed listening on {local_addr}");
        Ok(Self {
            sender: Some(sender),
            local_addr,
            worker: Some(worker),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Never blocks; returns false if the frame was dropped.
    pub fn publish(&self, line: String) -> bool {
        let Some(sender) = &self.sender else {
            return false;
        };
        match sender.try_send(line) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => false,
            Err(TrySendError::Disconnected(_)) => {
                log::warn!("snapshot feed thread is gone");
                false
            }
        }
    }
}

impl Drop for SnapshotFeed {
    fn drop(&mut self) {
        drop(self.sender.take());

        // accept() only returns once something connects; a refused
        // connection means the listener is already closed
        let woken = match TcpStream::connect_timeout(&loopback(self.local_addr), WRITE_TIMEOUT) {
            Ok(_) => true,
            Err(err) if err.kind() == ErrorKind::ConnectionRefused => true,
            Err(err) => {
                log::warn!("could not wake snapshot feed: {err}");
                false
            }
        };
        if let Some(worker) = self.worker.take().filter(|_| woken) {
            if worker.join().is_err() {
                log::warn!("snapshot feed thread panicked");
            }
        }
        log::debug!("snapshot feed on {} shut down", self.local_addr);
    }
}

/// Same port, but reachable from this host even when bound to a wildcard.
fn loopback(addr: SocketAddr) -> SocketAddr {
    let ip = match addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    SocketAddr::new(ip, addr.port())
}

fn serve(listener: TcpListener, receiver: Receiver<String>) {
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                if let Err(err) = stream.set_write_timeout(Some(WRITE_TIMEOUT)) {
                    log::warn!("failed to set viewer write timeout: {err}");
                }
                let peer = stream
                    .peer_addr()
                    .map(|a| a.to_string())
                    .unwrap_or_else(|_| "unknown".into());
                log::info!("viewer connected: {peer}");
                if !stream_to(stream, &receiver) {
                    log::debug!("snapshot feed closed");
                    return;
                }
                log::info!("viewer disconnected: {peer}");
            }
            Err(err) => log::warn!("failed to accept viewer: {err}"),
        }
    }
}

/// Returns false once the publishing side has gone away.
fn stream_to(mut stream: TcpStream, receiver: &Receiver<String>) -> bool {
    for line in receiver.iter() {
        if let Err(err) = stream.write_all(line.as_bytes()) {
            log::debug!("write to viewer failed: {err}");
            return true;
        }
    }
    false
}
