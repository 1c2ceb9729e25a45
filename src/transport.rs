//! The datagram transport a connection runs over. Implementations deliver
//! whole datagrams, never byte streams.

use std::io;
use std::net::{ToSocketAddrs, UdpSocket};
use std::time::Duration;

/// One datagram endpoint: atomic sends, blocking receives with an optional
/// deadline, idempotent close.
pub trait Transport {
    /// Send one datagram. A record must go out in a single call.
    fn send(&self, buf: &[u8]) -> io::Result<usize>;

    /// Receive one datagram into `buf`, honoring the configured deadline.
    /// Deadline expiry surfaces as `WouldBlock` or `TimedOut`.
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Set or clear the receive deadline for subsequent `recv` calls.
    fn set_read_deadline(&mut self, deadline: Option<Duration>) -> io::Result<()>;

    /// Release the endpoint. Must be safe to call more than once.
    fn close(&mut self) -> io::Result<()>;
}

/// A connected UDP socket, the transport of a client connection.
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Bind an ephemeral local socket and connect it to `remote`.
    pub fn connect<A: ToSocketAddrs>(remote: A) -> io::Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.connect(remote)?;
        Ok(UdpTransport { socket: socket })
    }

    /// Wrap an already connected socket.
    pub fn from_socket(socket: UdpSocket) -> Self {
        UdpTransport { socket: socket }
    }
}

impl Transport for UdpTransport {
    fn send(&self, buf: &[u8]) -> io::Result<usize> {
        self.socket.send(buf)
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.socket.recv(buf)
    }

    fn set_read_deadline(&mut self, deadline: Option<Duration>) -> io::Result<()> {
        self.socket.set_read_timeout(deadline)
    }

    fn close(&mut self) -> io::Result<()> {
        // Dropping the socket releases it; nothing to tear down early.
        Ok(())
    }
}

/// In-memory datagram pair for tests: two endpoints connected by channels.
#[cfg(test)]
pub mod pipe {
    use std::io;
    use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
    use std::time::Duration;

    use super::Transport;

    pub struct Pipe {
        tx: Sender<Vec<u8>>,
        rx: Receiver<Vec<u8>>,
        deadline: Option<Duration>,
    }

    pub fn pair() -> (Pipe, Pipe) {
        let (a_tx, a_rx) = channel();
        let (b_tx, b_rx) = channel();
        (
            Pipe {
                tx: a_tx,
                rx: b_rx,
                deadline: None,
            },
            Pipe {
                tx: b_tx,
                rx: a_rx,
                deadline: None,
            },
        )
    }

    impl Pipe {
        /// A handle that can inject datagrams into the peer this endpoint
        /// sends to. Lets tests tamper with traffic in flight.
        pub fn injector(&self) -> Sender<Vec<u8>> {
            self.tx.clone()
        }
    }

    impl Transport for Pipe {
        fn send(&self, buf: &[u8]) -> io::Result<usize> {
            self.tx
                .send(buf.to_vec())
                .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "peer is gone"))?;
            Ok(buf.len())
        }

        fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let datagram = match self.deadline {
                Some(deadline) => self.rx.recv_timeout(deadline).map_err(|e| match e {
                    RecvTimeoutError::Timeout => {
                        io::Error::new(io::ErrorKind::WouldBlock, "deadline expired")
                    }
                    RecvTimeoutError::Disconnected => {
                        io::Error::new(io::ErrorKind::BrokenPipe, "peer is gone")
                    }
                })?,
                None => self
                    .rx
                    .recv()
                    .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "peer is gone"))?,
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
            Ok(())
        }
    }
}
