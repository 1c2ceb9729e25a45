//! The stream-like face of a secure datagram channel.
//!
//! A `Connection` owns the record layer and a handshake machine for its
//! role. The first read or write drives the handshake to completion; after
//! that, reads deliver application data only. Every fatal error tears the
//! connection down for good.

use std::cmp;
use std::sync::Arc;
use std::time::Duration;

use config::Config;
use error::Error;
use handshake::{ClientHandshake, ServerHandshake};
use record::RecordLayer;
use transport::Transport;
use wire::{ContentType, MAX_RECORD_PAYLOAD};

// level fatal (2), description handshake_failure (40)
const ALERT_HANDSHAKE_FAILURE: [u8; 2] = [2, 40];
// level warning (1), description close_notify (0)
const ALERT_CLOSE_NOTIFY: [u8; 2] = [1, 0];

enum Fsm {
    Client(ClientHandshake),
    Server(ServerHandshake),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Handshaking,
    Established,
    Closed,
}

pub struct Connection<T: Transport> {
    records: RecordLayer<T>,
    fsm: Fsm,
    state: State,
    started: bool,
    // Application data already decrypted but not yet handed to the caller.
    pending: Vec<u8>,
    pending_offset: usize,
}

impl<T: Transport> Connection<T> {
    pub fn client(transport: T, config: Arc<Config>) -> Self {
        let fsm = Fsm::Client(ClientHandshake::new(config.clone()));
        Self::new(transport, config, fsm)
    }

    pub fn server(transport: T, config: Arc<Config>) -> Self {
        let fsm = Fsm::Server(ServerHandshake::new(config.clone()));
        Self::new(transport, config, fsm)
    }

    fn new(mut transport: T, config: Arc<Config>, fsm: Fsm) -> Self {
        if let Err(e) = transport.set_read_deadline(config.read_deadline) {
            warn!("could not apply read deadline: {}", e);
        }
        Connection {
            records: RecordLayer::new(transport, config.version),
            fsm: fsm,
            state: State::Handshaking,
            started: false,
            pending: Vec::new(),
            pending_offset: 0,
        }
    }

    /// Change the deadline applied to blocking reads. `None` blocks
    /// indefinitely.
    pub fn set_read_deadline(&mut self, deadline: Option<Duration>) -> Result<(), Error> {
        self.records
            .transport_mut()
            .set_read_deadline(deadline)
            .map_err(Error::from)
    }

    /// Read application data, driving the handshake first if necessary.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        self.complete_handshake()?;
        loop {
            if self.pending_offset < self.pending.len() {
                let n = cmp::min(buf.len(), self.pending.len() - self.pending_offset);
                buf[..n].copy_from_slice(&self.pending[self.pending_offset..self.pending_offset + n]);
                self.pending_offset += n;
                return Ok(n);
            }
            let (content_type, payload) = match self.records.read_record() {
                Ok(record) => record,
                Err(e) => return Err(self.poison(e)),
            };
            match content_type {
                ContentType::ApplicationData => {
                    self.pending = payload;
                    self.pending_offset = 0;
                }
                ContentType::Handshake => {
                    debug!("ignoring handshake record on an established connection");
                }
                ContentType::Alert => {
                    debug!("peer sent alert, closing");
                    self.shutdown();
                    return Err(Error::Closed);
                }
                ContentType::ChangeCipherSpec => {
                    // The record layer consumes these; one surfacing here
                    // would be a bug, not peer behavior.
                    return Err(self.poison(Error::UnexpectedRecord(content_type)));
                }
            }
        }
    }

    /// Write application data, driving the handshake first if necessary.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize, Error> {
        self.complete_handshake()?;
        for chunk in buf.chunks(MAX_RECORD_PAYLOAD) {
            if let Err(e) = self.records.send_record(ContentType::ApplicationData, chunk) {
                return Err(self.poison(e));
            }
        }
        Ok(buf.len())
    }

    /// Close the connection. Idempotent; a close notification is sent on a
    /// best-effort basis.
    pub fn close(&mut self) -> Result<(), Error> {
        if self.state != State::Closed {
            if self.state == State::Established {
                let _ = self.records.send_record(ContentType::Alert, &ALERT_CLOSE_NOTIFY);
            }
            self.shutdown();
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        self.state = State::Closed;
        self.records.close_transport();
    }

    // Mark the connection dead on any fatal error; timeouts pass through.
    fn poison(&mut self, error: Error) -> Error {
        if error.is_fatal() {
            match error {
                Error::Closed => {}
                _ => {
                    let _ = self
                        .records
                        .send_record(ContentType::Alert, &ALERT_HANDSHAKE_FAILURE);
                }
            }
            self.shutdown();
        }
        error
    }

    fn complete_handshake(&mut self) -> Result<(), Error> {
        loop {
            match self.state {
                State::Established => return Ok(()),
                State::Closed => return Err(Error::Closed),
                State::Handshaking => {}
            }
            if !self.started {
                self.started = true;
                if let Fsm::Client(ref mut client) = self.fsm {
                    if let Err(e) = client.begin(&mut self.records) {
                        return Err(self.poison(e));
                    }
                }
            }
            match self.handshake_step() {
                Ok(true) => {
                    debug!("connection established");
                    self.state = State::Established;
                }
                Ok(false) => {}
                Err(e) => return Err(self.poison(e)),
            }
        }
    }

    #[cfg(test)]
    pub fn transport_mut(&mut self) -> &mut T {
        self.records.transport_mut()
    }

    fn handshake_step(&mut self) -> Result<bool, Error> {
        let (content_type, payload) = self.records.read_record()?;
        match content_type {
            ContentType::Handshake => match self.fsm {
                Fsm::Client(ref mut client) => client.handle_record(&mut self.records, &payload),
                Fsm::Server(ref mut server) => server.handle_record(&mut self.records, &payload),
            },
            ContentType::Alert => {
                debug!("peer sent alert during handshake");
                Err(Error::Closed)
            }
            other => Err(Error::UnexpectedRecord(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;
    use transport::pipe::{pair, Pipe};
    use transport::Transport;
    use wire::DTLS_1_2;

    fn exchange<T: Transport + Send + 'static>(
        client_transport: T,
        server_transport: T,
        config: Config,
    ) {
        let config = Arc::new(config);
        let server_config = config.clone();

        let server = thread::spawn(move || {
            let mut conn = Connection::server(server_transport, server_config);
            let mut buf = [0; 64];
            let n = conn.read(&mut buf).unwrap();
            assert_eq!(&buf[..n], b"hello");
            conn.write(b"world").unwrap();
            conn.close().unwrap();
        });

        let mut conn = Connection::client(client_transport, config);
        conn.write(b"hello").unwrap();
        let mut buf = [0; 64];
        let n = conn.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"world");
        conn.close().unwrap();
        // Closing twice must be fine.
        conn.close().unwrap();

        server.join().unwrap();
    }

    #[test]
    fn full_handshake_and_echo() {
        let (client_pipe, server_pipe) = pair();
        exchange(client_pipe, server_pipe, Config::default());
    }

    #[test]
    fn full_handshake_with_cookie_exchange() {
        let (client_pipe, server_pipe) = pair();
        let mut config = Config::default();
        config.cookie_exchange = true;
        exchange(client_pipe, server_pipe, config);
    }

    #[test]
    fn full_handshake_dtls12() {
        let (client_pipe, server_pipe) = pair();
        let mut config = Config::default();
        config.version = DTLS_1_2;
        exchange(client_pipe, server_pipe, config);
    }

    #[test]
    fn closed_connection_rejects_io() {
        let (client_pipe, _server_pipe) = pair();
        let mut conn = Connection::client(client_pipe, Arc::new(Config::default()));
        conn.close().unwrap();
        match conn.read(&mut [0; 16]) {
            Err(Error::Closed) => {}
            other => panic!("read on closed connection: {:?}", other),
        }
        match conn.write(b"x") {
            Err(Error::Closed) => {}
            other => panic!("write on closed connection: {:?}", other),
        }
    }

    /// Flips the last byte of every application-data datagram it receives.
    struct Tamper {
        inner: Pipe,
    }

    impl Transport for Tamper {
        fn send(&self, buf: &[u8]) -> io::Result<usize> {
            self.inner.send(buf)
        }

        fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.inner.recv(buf)?;
            if n > 0 && buf[0] == 23 {
                buf[n - 1] ^= 0x01;
            }
            Ok(n)
        }

        fn set_read_deadline(&mut self, deadline: Option<Duration>) -> io::Result<()> {
            self.inner.set_read_deadline(deadline)
        }

        fn close(&mut self) -> io::Result<()> {
            self.inner.close()
        }
    }

    #[test]
    fn tampered_traffic_kills_the_connection() {
        let (client_pipe, server_pipe) = pair();
        let config = Arc::new(Config::default());
        let server_config = config.clone();

        let server = thread::spawn(move || {
            let mut conn = Connection::server(
                Tamper {
                    inner: server_pipe,
                },
                server_config,
            );
            let mut buf = [0; 64];
            // The handshake passes untouched, the tampered data record must
            // not.
            match conn.read(&mut buf) {
                Err(Error::BadMac) | Err(Error::BadPadding) => {}
                other => panic!("tampered read: {:?}", other),
            }
            // And the connection is gone for good.
            match conn.read(&mut buf) {
                Err(Error::Closed) => {}
                other => panic!("read after fatal error: {:?}", other),
            }
        });

        let mut conn = Connection::client(client_pipe, config);
        conn.write(b"hello").unwrap();
        server.join().unwrap();
    }

    #[test]
    fn read_deadline_expires_without_poisoning() {
        let (client_pipe, server_pipe) = pair();
        let config = Arc::new(Config::default());
        let server_config = config.clone();

        let server = thread::spawn(move || {
            let mut conn = Connection::server(server_pipe, server_config);
            let mut buf = [0; 64];
            let n = conn.read(&mut buf).unwrap();
            assert_eq!(&buf[..n], b"ping");

            // Nothing more is coming for a while; the deadline must fire
            // and leave the connection intact.
            conn.set_read_deadline(Some(Duration::from_millis(20))).unwrap();
            match conn.read(&mut buf) {
                Err(Error::Timeout) => {}
                other => panic!("expected a timeout: {:?}", other),
            }
            conn.set_read_deadline(None).unwrap();
            let n = conn.read(&mut buf).unwrap();
            assert_eq!(&buf[..n], b"pong");
        });

        let mut conn = Connection::client(client_pipe, config);
        conn.write(b"ping").unwrap();
        thread::sleep(Duration::from_millis(120));
        conn.write(b"pong").unwrap();
        server.join().unwrap();
    }

    #[test]
    fn short_reads_drain_a_record_across_calls() {
        let (client_pipe, server_pipe) = pair();
        let config = Arc::new(Config::default());
        let server_config = config.clone();

        let server = thread::spawn(move || {
            let mut conn = Connection::server(server_pipe, server_config);
            let mut collected = Vec::new();
            let mut buf = [0; 4];
            while collected.len() < 11 {
                let n = conn.read(&mut buf).unwrap();
                collected.extend_from_slice(&buf[..n]);
            }
            assert_eq!(collected, b"hello world");
        });

        let mut conn = Connection::client(client_pipe, config);
        conn.write(b"hello world").unwrap();
        server.join().unwrap();
    }
}
