//! The handshake layer: message gating and reassembly, the per-connection
//! context, and the client and server state machines built on top of it.

mod client;
mod fragment;
mod server;

pub use self::client::ClientHandshake;
pub use self::server::ServerHandshake;

use std::collections::HashMap;
use std::sync::Arc;

use dh::KeyAgreement;
use error::Error;
use keylog::KeyLog;
use prf::{keys_from_pre_master_secret, FinishedHash, Prf};
use record::{RecordLayer, SecurityParameters};
use suites::CipherSuite;
use transport::Transport;
use wire::handshake::{Handshake, HandshakeType};
use wire::{ContentType, ProtocolVersion, Random, Reader, COMPRESSION_NULL};

use self::fragment::FragmentList;

/// Split a handshake record body into the messages it carries.
fn parse_record_payload(payload: &[u8]) -> Result<Vec<Handshake>, Error> {
    let mut reader = Reader::new(payload);
    let mut messages = Vec::new();
    while !reader.is_empty() {
        messages.push(Handshake::read(&mut reader)?);
    }
    Ok(messages)
}

/// Frame one handshake message into a record of its own.
fn send_handshake<T: Transport>(
    records: &mut RecordLayer<T>,
    message: &Handshake,
) -> Result<(), Error> {
    debug!("send handshake {} seq={}", message.msg_type, message.message_seq);
    records.send_record(ContentType::Handshake, &message.bytes())
}

/// Everything both roles accumulate over a handshake: negotiated
/// parameters, sequence counters, reassembly state, and one slot per
/// transcript-relevant message.
pub struct HandshakeContext {
    prf: Prf,
    session_id: Vec<u8>,
    cookie: Vec<u8>,
    client_random: Random,
    server_random: Option<Random>,
    suite: Option<&'static CipherSuite>,
    key_agreement: Option<KeyAgreement>,
    master_secret: Option<Vec<u8>>,

    next_receive_seq: u16,
    next_send_seq: u16,
    fragments: HashMap<u16, FragmentList>,

    client_hello: Option<Handshake>,
    server_hello: Option<Handshake>,
    server_certificate: Option<Handshake>,
    server_key_exchange: Option<Handshake>,
    certificate_request: Option<Handshake>,
    server_hello_done: Option<Handshake>,
    client_certificate: Option<Handshake>,
    client_key_exchange: Option<Handshake>,
    certificate_verify: Option<Handshake>,
    client_finished: Option<Handshake>,
    server_finished: Option<Handshake>,
}

impl HandshakeContext {
    fn new(version: ProtocolVersion) -> Self {
        HandshakeContext {
            prf: Prf::for_version(version),
            session_id: Vec::new(),
            cookie: Vec::new(),
            client_random: Random::generate(),
            server_random: None,
            suite: None,
            key_agreement: None,
            master_secret: None,
            next_receive_seq: 0,
            next_send_seq: 0,
            fragments: HashMap::new(),
            client_hello: None,
            server_hello: None,
            server_certificate: None,
            server_key_exchange: None,
            certificate_request: None,
            server_hello_done: None,
            client_certificate: None,
            client_key_exchange: None,
            certificate_verify: None,
            client_finished: None,
            server_finished: None,
        }
    }

    /// Number the next outbound message.
    fn build_message(&mut self, msg_type: HandshakeType, body: Vec<u8>) -> Handshake {
        let message = Handshake::unfragmented(msg_type, self.next_send_seq, body);
        self.next_send_seq += 1;
        message
    }

    /// Gate one inbound message: drop retransmits, buffer fragments and
    /// out-of-order messages, and return every message that is now complete
    /// and next in line, in order.
    fn receive(&mut self, message: Handshake) -> Result<Vec<Handshake>, Error> {
        let mut ready = Vec::new();

        if message.message_seq < self.next_receive_seq {
            debug!(
                "dropping retransmitted handshake {} seq={}",
                message.msg_type, message.message_seq
            );
            return Ok(ready);
        }
        if message.message_seq == self.next_receive_seq && !message.is_fragmented() {
            self.next_receive_seq += 1;
            ready.push(message);
        } else {
            let seq = message.message_seq;
            match self.fragments.remove(&seq) {
                Some(mut list) => {
                    let inserted = list.insert(message);
                    self.fragments.insert(seq, list);
                    inserted?;
                }
                None => {
                    self.fragments.insert(seq, FragmentList::new(message));
                }
            }
        }

        // Drain whatever the buffer can now deliver contiguously.
        loop {
            match self.fragments.get(&self.next_receive_seq) {
                Some(list) if list.is_complete() => {}
                _ => break,
            }
            if let Some(list) = self.fragments.remove(&self.next_receive_seq) {
                ready.push(list.assemble());
                self.next_receive_seq += 1;
            }
        }
        Ok(ready)
    }

    /// The transcript from ClientHello through CertificateVerify, fed from
    /// the stored messages in protocol order. Messages that were never
    /// exchanged simply contribute nothing, and the cookie round stays out
    /// because its messages are never stored.
    fn transcript(&self) -> FinishedHash {
        let mut hash = FinishedHash::new(self.prf);
        let slots = [
            &self.client_hello,
            &self.server_hello,
            &self.server_certificate,
            &self.server_key_exchange,
            &self.certificate_request,
            &self.server_hello_done,
            &self.client_certificate,
            &self.client_key_exchange,
            &self.certificate_verify,
        ];
        for slot in slots.iter() {
            if let Some(ref message) = **slot {
                hash.feed(&message.bytes());
            }
        }
        hash
    }

    /// The transcript a server Finished is computed over: everything above
    /// plus the client Finished.
    fn transcript_with_client_finished(&self) -> FinishedHash {
        let mut hash = self.transcript();
        if let Some(ref message) = self.client_finished {
            hash.feed(&message.bytes());
        }
        hash
    }

    fn master_secret(&self) -> Result<&[u8], Error> {
        match self.master_secret {
            Some(ref master_secret) => Ok(master_secret),
            None => Err(Error::KeyAgreementFailure("master secret not derived yet")),
        }
    }

    /// Run the key schedule and package the two directions' parameters.
    /// Returns `(client_direction, server_direction)`; the caller installs
    /// them as read or write according to its role.
    fn derive_security_parameters(
        &mut self,
        pre_master_secret: &[u8],
        key_log: Option<&Arc<dyn KeyLog>>,
    ) -> Result<(SecurityParameters, SecurityParameters), Error> {
        let suite = match self.suite {
            Some(suite) => suite,
            None => return Err(Error::KeyAgreementFailure("no cipher suite negotiated")),
        };
        let server_random = match self.server_random {
            Some(ref random) => random.bytes(),
            None => return Err(Error::KeyAgreementFailure("no server random")),
        };

        let material = keys_from_pre_master_secret(
            self.prf,
            pre_master_secret,
            &self.client_random.bytes(),
            &server_random,
            suite.mac_len,
            suite.key_len,
        );

        if let Some(key_log) = key_log {
            key_log.log(&self.client_random.bytes(), &material.master_secret);
        }

        let client = SecurityParameters {
            cipher: Some(suite.cipher(&material.client_key)),
            mac: Some(suite.mac(&material.client_mac)),
            compression: COMPRESSION_NULL,
        };
        let server = SecurityParameters {
            cipher: Some(suite.cipher(&material.server_key)),
            mac: Some(suite.mac(&material.server_mac)),
            compression: COMPRESSION_NULL,
        };
        self.master_secret = Some(material.master_secret);
        Ok((client, server))
    }
}

#[cfg(test)]
mod tests {
    use super::client::ClientHandshake;
    use super::server::ServerHandshake;
    use super::*;
    use config::Config;
    use record::RecordLayer;
    use std::sync::Arc;
    use std::time::Duration;
    use transport::pipe::{pair, Pipe};
    use transport::Transport;
    use wire::handshake::Handshake;
    use wire::{ContentType, Reader, DTLS_1_0, DTLS_1_2};

    fn pump(
        client: &mut ClientHandshake,
        client_records: &mut RecordLayer<Pipe>,
        server: &mut ServerHandshake,
        server_records: &mut RecordLayer<Pipe>,
    ) {
        client_records
            .transport_mut()
            .set_read_deadline(Some(Duration::from_millis(50)))
            .unwrap();
        server_records
            .transport_mut()
            .set_read_deadline(Some(Duration::from_millis(50)))
            .unwrap();

        client.begin(client_records).unwrap();
        for _ in 0..64 {
            if client.is_complete() && server.is_complete() {
                return;
            }
            match server_records.read_record() {
                Ok((ContentType::Handshake, payload)) => {
                    server.handle_record(server_records, &payload).unwrap();
                }
                Ok((other, _)) => panic!("server got unexpected record {}", other),
                Err(::error::Error::Timeout) => {}
                Err(e) => panic!("server read failed: {}", e),
            }
            match client_records.read_record() {
                Ok((ContentType::Handshake, payload)) => {
                    client.handle_record(client_records, &payload).unwrap();
                }
                Ok((other, _)) => panic!("client got unexpected record {}", other),
                Err(::error::Error::Timeout) => {}
                Err(e) => panic!("client read failed: {}", e),
            }
        }
        panic!("handshake did not converge");
    }

    fn run_handshake(config: Config) -> (ClientHandshake, ServerHandshake) {
        let config = Arc::new(config);
        let (client_pipe, server_pipe) = pair();
        let mut client_records = RecordLayer::new(client_pipe, config.version);
        let mut server_records = RecordLayer::new(server_pipe, config.version);
        let mut client = ClientHandshake::new(config.clone());
        let mut server = ServerHandshake::new(config.clone());

        pump(
            &mut client,
            &mut client_records,
            &mut server,
            &mut server_records,
        );
        assert!(client.is_complete());
        assert!(server.is_complete());
        (client, server)
    }

    #[test]
    fn anonymous_handshake_agrees_on_the_master_secret() {
        let (client, server) = run_handshake(Config::default());
        assert_eq!(
            client.context().master_secret().unwrap(),
            server.context().master_secret().unwrap()
        );
        assert_eq!(
            client.context().suite.unwrap().id,
            server.context().suite.unwrap().id
        );
    }

    #[test]
    fn dtls12_handshake_uses_the_sha256_prf() {
        let mut config = Config::default();
        config.version = DTLS_1_2;
        let (client, server) = run_handshake(config);
        assert_eq!(client.context().prf, Prf::Tls12);
        assert_eq!(
            client.context().master_secret().unwrap(),
            server.context().master_secret().unwrap()
        );
    }

    #[test]
    fn cookie_exchange_reruns_flight_one() {
        let mut config = Config::default();
        config.cookie_exchange = true;
        let (client, server) = run_handshake(config);

        // The hello the server committed to is the second one, carrying the
        // cookie and message sequence 1; the first hello and the cookie
        // challenge stay outside the transcript.
        let hello_message = server.context().client_hello.clone().unwrap();
        assert_eq!(hello_message.message_seq, 1);

        let hello = ::wire::handshake::ClientHello::read(&mut Reader::new(
            &hello_message.fragment,
        ))
        .unwrap();
        assert!(!hello.cookie.is_empty());
        assert_eq!(hello.cookie, server.context().cookie);
        // Both hellos carried the same client random.
        assert_eq!(hello.random, client.context().client_random);

        assert_eq!(
            client.context().master_secret().unwrap(),
            server.context().master_secret().unwrap()
        );
    }

    #[test]
    fn fragmented_flights_are_reassembled() {
        let config = Arc::new(Config::default());
        let (client_pipe, server_pipe) = pair();
        let mut client_records = RecordLayer::new(client_pipe, DTLS_1_0);
        let mut server_records = RecordLayer::new(server_pipe, DTLS_1_0);
        let mut client = ClientHandshake::new(config.clone());
        let mut server = ServerHandshake::new(config.clone());

        client_records
            .transport_mut()
            .set_read_deadline(Some(Duration::from_millis(50)))
            .unwrap();

        client.begin(&mut client_records).unwrap();
        let (content_type, payload) = server_records.read_record().unwrap();
        assert_eq!(content_type, ContentType::Handshake);

        // Deliver the ClientHello to the server in two fragments, second
        // half first.
        let hello = parse_record_payload(&payload).unwrap().remove(0);
        let split = hello.fragment.len() / 2;
        let mut first = hello.clone();
        first.fragment_length = split as u32;
        first.fragment = hello.fragment[..split].to_vec();
        let mut second = hello.clone();
        second.fragment_offset = split as u32;
        second.fragment_length = (hello.fragment.len() - split) as u32;
        second.fragment = hello.fragment[split..].to_vec();

        for fragment in [second, first].iter() {
            server
                .handle_record(&mut server_records, &fragment.bytes())
                .unwrap();
        }

        // The server must have acted on the assembled hello: flight two is
        // on the wire.
        let (content_type, payload) = client_records.read_record().unwrap();
        assert_eq!(content_type, ContentType::Handshake);
        let messages = parse_record_payload(&payload).unwrap();
        assert_eq!(messages[0].msg_type, HandshakeType::ServerHello);
    }

    #[test]
    fn retransmitted_messages_are_dropped() {
        let mut context = HandshakeContext::new(DTLS_1_0);
        let message = Handshake::unfragmented(HandshakeType::Finished, 0, vec![0; 12]);
        assert_eq!(context.receive(message.clone()).unwrap().len(), 1);
        // Same sequence number again: already processed.
        assert!(context.receive(message).unwrap().is_empty());
    }

    #[test]
    fn out_of_order_messages_wait_for_their_turn() {
        let mut context = HandshakeContext::new(DTLS_1_0);
        let second = Handshake::unfragmented(HandshakeType::ServerKeyExchange, 1, vec![1]);
        let first = Handshake::unfragmented(HandshakeType::ServerHello, 0, vec![0]);

        assert!(context.receive(second).unwrap().is_empty());
        let ready = context.receive(first).unwrap();
        assert_eq!(ready.len(), 2);
        assert_eq!(ready[0].msg_type, HandshakeType::ServerHello);
        assert_eq!(ready[1].msg_type, HandshakeType::ServerKeyExchange);
    }
}
