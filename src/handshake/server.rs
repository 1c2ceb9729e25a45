//! Server side of the handshake.
//!
//! The server sits on a ClientHello, optionally bounces it once through a
//! cookie challenge, then answers with ServerHello, ServerKeyExchange and
//! ServerHelloDone. When the client's key exchange and a valid Finished are
//! in, it promotes its own keys and closes with ChangeCipherSpec, Finished.

use std::sync::Arc;

use rand;

use config::Config;
use error::Error;
use record::RecordLayer;
use suites::{suite_by_id, CipherSuite};
use transport::Transport;
use wire::handshake::{
    ClientHello, ClientKeyExchange, Finished, Handshake, HandshakeType, HelloVerifyRequest,
    ServerHello, ServerKeyExchange,
};
use wire::{Random, Reader, COMPRESSION_NULL, DTLS_1_0};

use super::{parse_record_payload, send_handshake, HandshakeContext};

const COOKIE_LENGTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ServerState {
    WaitClientHello,
    /// Our flight is out; waiting for ClientKeyExchange and Finished.
    WaitClientFlight,
    Complete,
}

pub struct ServerHandshake {
    config: Arc<Config>,
    context: HandshakeContext,
    state: ServerState,
}

impl ServerHandshake {
    pub fn new(config: Arc<Config>) -> Self {
        let context = HandshakeContext::new(config.version);
        ServerHandshake {
            config: config,
            context: context,
            state: ServerState::WaitClientHello,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state == ServerState::Complete
    }

    /// Feed one handshake record. Returns true once the handshake is done.
    pub fn handle_record<T: Transport>(
        &mut self,
        records: &mut RecordLayer<T>,
        payload: &[u8],
    ) -> Result<bool, Error> {
        for message in parse_record_payload(payload)? {
            for message in self.context.receive(message)? {
                self.handle_message(records, message)?;
            }
        }
        Ok(self.is_complete())
    }

    fn handle_message<T: Transport>(
        &mut self,
        records: &mut RecordLayer<T>,
        message: Handshake,
    ) -> Result<(), Error> {
        debug!("server got {} seq={}", message.msg_type, message.message_seq);
        match (self.state, message.msg_type) {
            (ServerState::WaitClientHello, HandshakeType::ClientHello) => {
                self.handle_client_hello(records, message)
            }
            (ServerState::WaitClientFlight, HandshakeType::Certificate) => {
                self.context.client_certificate = Some(message);
                Ok(())
            }
            (ServerState::WaitClientFlight, HandshakeType::ClientKeyExchange) => {
                self.handle_client_key_exchange(records, message)
            }
            (ServerState::WaitClientFlight, HandshakeType::CertificateVerify) => {
                self.context.certificate_verify = Some(message);
                Ok(())
            }
            (ServerState::WaitClientFlight, HandshakeType::Finished) => {
                self.finish(records, message)
            }
            (_, msg_type) => Err(Error::UnexpectedMessage(msg_type)),
        }
    }

    fn handle_client_hello<T: Transport>(
        &mut self,
        records: &mut RecordLayer<T>,
        message: Handshake,
    ) -> Result<(), Error> {
        let hello = ClientHello::read(&mut Reader::new(&message.fragment))?;

        if self.config.cookie_exchange
            && (self.context.cookie.is_empty() || hello.cookie != self.context.cookie)
        {
            return self.send_hello_verify_request(records);
        }

        if hello.client_version != self.config.version {
            return Err(Error::Wire(::wire::Error::UnsupportedVersion(
                hello.client_version.major,
                hello.client_version.minor,
            )));
        }
        if !hello.compression_methods.contains(&COMPRESSION_NULL) {
            return Err(Error::CompressionMismatch);
        }
        let suite = self.select_suite(&hello)?;
        debug!("server negotiated {}", suite.id);

        self.context.client_random = hello.random;
        self.context.session_id = hello.session_id;
        self.context.suite = Some(suite);
        self.context.server_random = Some(Random::generate());
        self.context.client_hello = Some(message);

        self.send_flight_two(records)
    }

    // First suite in the client's preference order that we are configured
    // for and able to run.
    fn select_suite(&self, hello: &ClientHello) -> Result<&'static CipherSuite, Error> {
        for id in &hello.cipher_suites {
            if !self.config.cipher_suites.contains(id) {
                continue;
            }
            let suite = match suite_by_id(*id) {
                Some(suite) => suite,
                None => continue,
            };
            if suite.signed_key_exchange {
                // Serving a signed key exchange needs a certificate and a
                // signing key, which this build has no way to configure.
                warn!("skipping {}: no server certificate available", suite.id);
                continue;
            }
            return Ok(suite);
        }
        Err(Error::CipherSuiteMismatch)
    }

    fn send_hello_verify_request<T: Transport>(
        &mut self,
        records: &mut RecordLayer<T>,
    ) -> Result<(), Error> {
        if self.context.cookie.is_empty() {
            let cookie: [u8; COOKIE_LENGTH] = rand::random();
            self.context.cookie = cookie.to_vec();
        }
        // The challenge is pinned to 1.0 regardless of what ends up being
        // negotiated, and stays out of the transcript.
        let request = HelloVerifyRequest {
            server_version: DTLS_1_0,
            cookie: self.context.cookie.clone(),
        };
        let message = self
            .context
            .build_message(HandshakeType::HelloVerifyRequest, request.bytes());
        debug!("server sent cookie challenge");
        send_handshake(records, &message)
    }

    fn send_flight_two<T: Transport>(
        &mut self,
        records: &mut RecordLayer<T>,
    ) -> Result<(), Error> {
        let suite = match self.context.suite {
            Some(suite) => suite,
            None => return Err(Error::CipherSuiteMismatch),
        };
        let server_random = match self.context.server_random {
            Some(random) => random,
            None => return Err(Error::KeyAgreementFailure("no server random")),
        };

        let hello = ServerHello {
            server_version: self.config.version,
            random: server_random,
            session_id: self.context.session_id.clone(),
            cipher_suite: suite.id,
            compression_method: COMPRESSION_NULL,
            extensions: Vec::new(),
        };
        let hello_message = self
            .context
            .build_message(HandshakeType::ServerHello, hello.bytes());
        self.context.server_hello = Some(hello_message.clone());

        let mut key_agreement = suite.key_agreement();
        let params = key_agreement.generate_server_key_exchange()?;
        self.context.key_agreement = Some(key_agreement);
        let key_exchange = ServerKeyExchange {
            params: params,
            signature: None,
        };
        let key_exchange_message = self
            .context
            .build_message(HandshakeType::ServerKeyExchange, key_exchange.bytes());
        self.context.server_key_exchange = Some(key_exchange_message.clone());

        let done_message = self
            .context
            .build_message(HandshakeType::ServerHelloDone, Vec::new());
        self.context.server_hello_done = Some(done_message.clone());

        send_handshake(records, &hello_message)?;
        send_handshake(records, &key_exchange_message)?;
        send_handshake(records, &done_message)?;

        self.state = ServerState::WaitClientFlight;
        Ok(())
    }

    fn handle_client_key_exchange<T: Transport>(
        &mut self,
        records: &mut RecordLayer<T>,
        message: Handshake,
    ) -> Result<(), Error> {
        let key_exchange = ClientKeyExchange::read(&mut Reader::new(&message.fragment))?;
        self.context.client_key_exchange = Some(message);

        let pre_master_secret = match self.context.key_agreement {
            Some(ref mut key_agreement) => {
                key_agreement.process_client_key_exchange(&key_exchange)?
            }
            None => return Err(Error::KeyAgreementFailure("no key agreement in progress")),
        };

        let (client_params, server_params) = self
            .context
            .derive_security_parameters(&pre_master_secret, self.config.key_log.as_ref())?;
        records.set_pending(client_params, server_params);
        Ok(())
    }

    fn finish<T: Transport>(
        &mut self,
        records: &mut RecordLayer<T>,
        message: Handshake,
    ) -> Result<(), Error> {
        // A Finished before the key exchange means the client skipped part
        // of its flight.
        if self.context.client_key_exchange.is_none() {
            return Err(Error::UnexpectedMessage(HandshakeType::Finished));
        }

        let finished = Finished::read(&mut Reader::new(&message.fragment))?;
        let expected = {
            let master_secret = self.context.master_secret()?;
            self.context.transcript().client_sum(master_secret)
        };
        if finished.verify_data != expected {
            return Err(Error::VerifyDataMismatch);
        }
        self.context.client_finished = Some(message);

        let verify_data = {
            let master_secret = self.context.master_secret()?;
            self.context
                .transcript_with_client_finished()
                .server_sum(master_secret)
        };
        let finished = Finished {
            verify_data: verify_data.to_vec(),
        };
        let finished_message = self
            .context
            .build_message(HandshakeType::Finished, finished.bytes());
        self.context.server_finished = Some(finished_message.clone());

        records.send_change_cipher_spec()?;
        send_handshake(records, &finished_message)?;

        self.state = ServerState::Complete;
        debug!("server handshake complete");
        Ok(())
    }

    #[cfg(test)]
    pub fn context(&self) -> &HandshakeContext {
        &self.context
    }
}
