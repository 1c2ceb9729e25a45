//! One UDP socket serving many peers.
//!
//! A dispatcher thread reads datagrams off the shared socket and routes
//! them by source address into per-peer inboxes. The first datagram from an
//! unknown address creates a virtual connection around the shared socket
//! and hands a server-role `Connection` to `accept`.

use std::collections::HashMap;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use config::Config;
use connection::Connection;
use error::Error;
use transport::Transport;

const MAX_DATAGRAM_SIZE: usize = 64 * 1024;

// How often the dispatcher wakes up to notice a close request.
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(100);

type PeerMap = Arc<Mutex<HashMap<SocketAddr, Sender<Vec<u8>>>>>;

pub struct Listener {
    socket: Arc<UdpSocket>,
    peers: PeerMap,
    incoming: Receiver<Connection<VirtualConn>>,
    shutdown: Arc<AtomicBool>,
    dispatcher: Option<thread::JoinHandle<()>>,
}

impl Listener {
    /// Bind a socket and start dispatching.
    pub fn bind<A: ToSocketAddrs>(addr: A, config: Arc<Config>) -> io::Result<Self> {
        Self::from_socket(UdpSocket::bind(addr)?, config)
    }

    /// Serve an already bound socket.
    pub fn from_socket(socket: UdpSocket, config: Arc<Config>) -> io::Result<Self> {
        socket.set_read_timeout(Some(SHUTDOWN_POLL_INTERVAL))?;
        let socket = Arc::new(socket);
        let peers: PeerMap = Arc::new(Mutex::new(HashMap::new()));
        let shutdown = Arc::new(AtomicBool::new(false));
        let (incoming_tx, incoming_rx) = channel();

        let dispatcher = {
            let socket = socket.clone();
            let peers = peers.clone();
            let shutdown = shutdown.clone();
            thread::Builder::new()
                .name("dtls-listener".to_string())
                .spawn(move || dispatch(socket, peers, incoming_tx, shutdown, config))?
        };

        Ok(Listener {
            socket: socket,
            peers: peers,
            incoming: incoming_rx,
            shutdown: shutdown,
            dispatcher: Some(dispatcher),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Block until a new peer shows up. Every returned connection still has
    /// its handshake ahead of it.
    pub fn accept(&self) -> Result<Connection<VirtualConn>, Error> {
        self.incoming.recv().map_err(|_| Error::Closed)
    }

    /// Stop dispatching and drop every inbox. The socket itself is released
    /// when the listener and all its connections are gone.
    pub fn close(&mut self) -> io::Result<()> {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(dispatcher) = self.dispatcher.take() {
            let _ = dispatcher.join();
        }
        if let Ok(mut peers) = self.peers.lock() {
            peers.clear();
        }
        Ok(())
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

fn dispatch(
    socket: Arc<UdpSocket>,
    peers: PeerMap,
    incoming: Sender<Connection<VirtualConn>>,
    shutdown: Arc<AtomicBool>,
    config: Arc<Config>,
) {
    let mut buf = vec![0; MAX_DATAGRAM_SIZE];
    while !shutdown.load(Ordering::Relaxed) {
        let (n, addr) = match socket.recv_from(&mut buf) {
            Ok(received) => received,
            Err(ref e)
                if e.kind() == io::ErrorKind::WouldBlock
                    || e.kind() == io::ErrorKind::TimedOut =>
            {
                continue;
            }
            Err(e) => {
                warn!("listener socket failed: {}", e);
                break;
            }
        };
        let datagram = buf[..n].to_vec();

        let mut peers_guard = match peers.lock() {
            Ok(guard) => guard,
            Err(_) => break,
        };
        if let Some(inbox) = peers_guard.get(&addr) {
            if inbox.send(datagram).is_ok() {
                continue;
            }
            // The connection behind this entry is gone; forget it. The peer
            // starts over with its next datagram.
            debug!("removing stale peer {}", addr);
            peers_guard.remove(&addr);
            continue;
        }

        debug!("new peer {}", addr);
        let (inbox_tx, inbox_rx) = channel();
        // The very first datagram goes straight into the fresh inbox.
        let _ = inbox_tx.send(datagram);
        peers_guard.insert(addr, inbox_tx);
        drop(peers_guard);

        let conn = VirtualConn {
            socket: socket.clone(),
            peers: peers.clone(),
            remote: addr,
            inbox: inbox_rx,
            deadline: None,
            closed: false,
        };
        if incoming.send(Connection::server(conn, config.clone())).is_err() {
            // Nobody is accepting anymore.
            break;
        }
    }
}

/// One peer's endpoint on the shared socket: reads come from the inbox the
/// dispatcher fills, writes go out via `send_to`. Closing removes the peer
/// from the listener without touching the socket.
pub struct VirtualConn {
    socket: Arc<UdpSocket>,
    peers: PeerMap,
    remote: SocketAddr,
    inbox: Receiver<Vec<u8>>,
    deadline: Option<Duration>,
    closed: bool,
}

impl VirtualConn {
    pub fn remote_addr(&self) -> SocketAddr {
        self.remote
    }
}

impl Transport for VirtualConn {
    fn send(&self, buf: &[u8]) -> io::Result<usize> {
        self.socket.send_to(buf, self.remote)
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.closed {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "closed"));
        }
        let datagram = match self.deadline {
            Some(deadline) => self.inbox.recv_timeout(deadline).map_err(|e| match e {
                RecvTimeoutError::Timeout => {
                    io::Error::new(io::ErrorKind::WouldBlock, "deadline expired")
                }
                RecvTimeoutError::Disconnected => {
                    io::Error::new(io::ErrorKind::BrokenPipe, "listener is gone")
                }
            })?,
            None => self
                .inbox
                .recv()
                .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "listener is gone"))?,
        };
        let n = datagram.len().min(buf.len());
        buf[..n].copy_from_slice(&datagram[..n]);
        Ok(n)
    }

    fn set_read_deadline(&mut self, deadline: Option<Duration>) -> io::Result<()> {
        self.deadline = deadline;
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        if !self.closed {
            self.closed = true;
            if let Ok(mut peers) = self.peers.lock() {
                peers.remove(&self.remote);
            }
        }
        Ok(())
    }
}

impl Drop for VirtualConn {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::UdpSocket;

    #[test]
    fn datagrams_are_routed_by_source_address() {
        let listener =
            Listener::bind("127.0.0.1:0", Arc::new(Config::default())).unwrap();
        let target = listener.local_addr().unwrap();

        let peer_a = UdpSocket::bind("127.0.0.1:0").unwrap();
        let peer_b = UdpSocket::bind("127.0.0.1:0").unwrap();
        peer_a.send_to(b"from a", target).unwrap();
        peer_b.send_to(b"from b", target).unwrap();

        let mut conn_a = listener.accept().unwrap();
        let mut conn_b = listener.accept().unwrap();

        // Raw transport routing check, below the DTLS layer: each virtual
        // connection holds its own peer's bytes.
        let mut buf = [0; 64];
        let n = conn_a.transport_mut().recv(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"from a");
        let n = conn_b.transport_mut().recv(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"from b");

        // More traffic from a known peer lands in the same inbox.
        peer_a.send_to(b"again", target).unwrap();
        let n = conn_a.transport_mut().recv(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"again");
    }

    #[test]
    fn close_is_idempotent_and_wakes_accept() {
        let mut listener =
            Listener::bind("127.0.0.1:0", Arc::new(Config::default())).unwrap();
        listener.close().unwrap();
        listener.close().unwrap();
        match listener.accept() {
            Err(Error::Closed) => {}
            Err(e) => panic!("accept after close: {}", e),
            Ok(_) => panic!("accept after close returned a connection"),
        }
    }
}
