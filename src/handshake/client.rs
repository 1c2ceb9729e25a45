//! Client side of the handshake.
//!
//! The client opens with its hello, answers an optional cookie challenge by
//! repeating the hello, and once the server's flight is in turns the key
//! exchange around: ClientKeyExchange, ChangeCipherSpec, Finished. The
//! handshake is done when the server's Finished checks out against the
//! transcript.

use std::sync::Arc;

use config::Config;
use error::Error;
use record::RecordLayer;
use suites::suite_by_id;
use transport::Transport;
use wire::handshake::{
    ClientHello, Extension, Finished, Handshake, HandshakeType, HelloVerifyRequest, ServerHello,
    ServerKeyExchange,
};
use wire::{Reader, COMPRESSION_NULL, DTLS_1_2};

use super::{parse_record_payload, send_handshake, HandshakeContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClientState {
    /// Waiting for the server's flight, or for a cookie challenge.
    WaitServerFlight,
    /// Our key exchange is out; waiting for the server Finished.
    WaitFinished,
    Complete,
}

pub struct ClientHandshake {
    config: Arc<Config>,
    context: HandshakeContext,
    state: ClientState,
}

impl ClientHandshake {
    pub fn new(config: Arc<Config>) -> Self {
        let context = HandshakeContext::new(config.version);
        ClientHandshake {
            config: config,
            context: context,
            state: ClientState::WaitServerFlight,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state == ClientState::Complete
    }

    /// Open the handshake by sending the first hello.
    pub fn begin<T: Transport>(&mut self, records: &mut RecordLayer<T>) -> Result<(), Error> {
        self.send_client_hello(records)
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
        debug!("client got {} seq={}", message.msg_type, message.message_seq);
        match (self.state, message.msg_type) {
            (ClientState::WaitServerFlight, HandshakeType::HelloVerifyRequest) => {
                let request = HelloVerifyRequest::read(&mut Reader::new(&message.fragment))?;
                // Repeat the hello with the cookie. Neither the challenge nor
                // the first hello is stored, which keeps both out of the
                // verify-data transcript.
                self.context.cookie = request.cookie;
                self.send_client_hello(records)
            }
            (ClientState::WaitServerFlight, HandshakeType::ServerHello) => {
                self.context.server_hello = Some(message);
                self.try_send_flight_three(records)
            }
            (ClientState::WaitServerFlight, HandshakeType::Certificate) => {
                self.context.server_certificate = Some(message);
                Ok(())
            }
            (ClientState::WaitServerFlight, HandshakeType::ServerKeyExchange) => {
                self.context.server_key_exchange = Some(message);
                self.try_send_flight_three(records)
            }
            (ClientState::WaitServerFlight, HandshakeType::CertificateRequest) => {
                self.context.certificate_request = Some(message);
                Ok(())
            }
            (ClientState::WaitServerFlight, HandshakeType::ServerHelloDone) => {
                self.context.server_hello_done = Some(message);
                self.try_send_flight_three(records)
            }
            (ClientState::WaitFinished, HandshakeType::Finished) => {
                self.finish(message)
            }
            (_, msg_type) => Err(Error::UnexpectedMessage(msg_type)),
        }
    }

    fn send_client_hello<T: Transport>(
        &mut self,
        records: &mut RecordLayer<T>,
    ) -> Result<(), Error> {
        let mut extensions = Vec::new();
        if self.config.version == DTLS_1_2 {
            extensions.push(Extension::signature_algorithms());
        }
        let hello = ClientHello {
            client_version: self.config.version,
            random: self.context.client_random,
            session_id: self.context.session_id.clone(),
            cookie: self.context.cookie.clone(),
            cipher_suites: self.config.cipher_suites.clone(),
            compression_methods: vec![COMPRESSION_NULL],
            extensions: extensions,
        };
        let message = self
            .context
            .build_message(HandshakeType::ClientHello, hello.bytes());
        self.context.client_hello = Some(message.clone());
        send_handshake(records, &message)
    }

    /// Once ServerHello, ServerKeyExchange and ServerHelloDone are all in,
    /// run the key exchange and send our closing flight.
    fn try_send_flight_three<T: Transport>(
        &mut self,
        records: &mut RecordLayer<T>,
    ) -> Result<(), Error> {
        if self.context.server_hello.is_none()
            || self.context.server_key_exchange.is_none()
            || self.context.server_hello_done.is_none()
        {
            return Ok(());
        }

        self.adopt_server_hello()?;
        // adopt_server_hello just filled in the suite.
        let suite = match self.context.suite {
            Some(suite) => suite,
            None => return Err(Error::CipherSuiteMismatch),
        };

        let key_exchange_message = match self.context.server_key_exchange {
            Some(ref message) => message.fragment.clone(),
            None => return Err(Error::UnexpectedMessage(HandshakeType::ServerKeyExchange)),
        };
        let key_exchange = ServerKeyExchange::read(&mut Reader::new(&key_exchange_message))?;
        if suite.signed_key_exchange {
            // The catalog carries the signed suites, but checking the
            // signature needs a certificate store this build does not have.
            return Err(Error::KeyAgreementFailure(
                "certificate verification is not available",
            ));
        }

        let mut key_agreement = suite.key_agreement();
        key_agreement.process_server_key_exchange(&key_exchange.params)?;
        let (pre_master_secret, client_key_exchange) =
            key_agreement.generate_client_key_exchange()?;
        self.context.key_agreement = Some(key_agreement);

        let key_exchange_message = self
            .context
            .build_message(HandshakeType::ClientKeyExchange, client_key_exchange.bytes());
        self.context.client_key_exchange = Some(key_exchange_message.clone());

        let (client_params, server_params) = self
            .context
            .derive_security_parameters(&pre_master_secret, self.config.key_log.as_ref())?;
        records.set_pending(server_params, client_params);

        let verify_data = {
            let master_secret = self.context.master_secret()?;
            self.context.transcript().client_sum(master_secret)
        };
        let finished = Finished {
            verify_data: verify_data.to_vec(),
        };
        let finished_message = self
            .context
            .build_message(HandshakeType::Finished, finished.bytes());
        self.context.client_finished = Some(finished_message.clone());

        send_handshake(records, &key_exchange_message)?;
        records.send_change_cipher_spec()?;
        send_handshake(records, &finished_message)?;

        self.state = ClientState::WaitFinished;
        Ok(())
    }

    // Pull the negotiated parameters out of the stored ServerHello.
    fn adopt_server_hello(&mut self) -> Result<(), Error> {
        let hello_bytes = match self.context.server_hello {
            Some(ref message) => message.fragment.clone(),
            None => return Err(Error::UnexpectedMessage(HandshakeType::ServerHello)),
        };
        let hello = ServerHello::read(&mut Reader::new(&hello_bytes))?;

        if hello.server_version != self.config.version {
            return Err(Error::Wire(::wire::Error::UnsupportedVersion(
                hello.server_version.major,
                hello.server_version.minor,
            )));
        }
        if hello.compression_method != COMPRESSION_NULL {
            return Err(Error::CompressionMismatch);
        }
        if !self.config.cipher_suites.contains(&hello.cipher_suite) {
            return Err(Error::CipherSuiteMismatch);
        }
        let suite = match suite_by_id(hello.cipher_suite) {
            Some(suite) => suite,
            None => return Err(Error::CipherSuiteMismatch),
        };

        debug!("client negotiated {} over {}", suite.id, hello.server_version);
        self.context.server_random = Some(hello.random);
        self.context.session_id = hello.session_id;
        self.context.suite = Some(suite);
        Ok(())
    }

    fn finish(&mut self, message: Handshake) -> Result<(), Error> {
        let finished = Finished::read(&mut Reader::new(&message.fragment))?;
        let expected = {
            let master_secret = self.context.master_secret()?;
            self.context
                .transcript_with_client_finished()
                .server_sum(master_secret)
        };
        if finished.verify_data != expected {
            return Err(Error::VerifyDataMismatch);
        }
        self.context.server_finished = Some(message);
        self.state = ClientState::Complete;
        debug!("client handshake complete");
        Ok(())
    }

    #[cfg(test)]
    pub fn context(&self) -> &HandshakeContext {
        &self.context
    }
}
