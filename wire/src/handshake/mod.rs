//! Handshake message framing and the message body codecs.
//!
//! A handshake message travels inside one or more `Handshake` fragments, each
//! carrying the 12-byte header that repeats the message type, total length
//! and sequence number together with the fragment window it covers.

use std::fmt;

use hex;

use bytes::{Reader, Writer};
use error::Error;

mod client_hello;
mod digitally_signed;
mod extension;
mod finished;
mod hello_verify_request;
mod key_exchange;
mod server_hello;

pub use self::client_hello::ClientHello;
pub use self::digitally_signed::{
    DigitallySigned, HASH_ALGORITHM_SHA1, HASH_ALGORITHM_SHA256, SIGNATURE_ALGORITHM_RSA,
};
pub use self::extension::{
    Extension, ExtensionType, EXTENSION_CERT_TYPE, EXTENSION_SIGNATURE_ALGORITHMS,
};
pub use self::finished::Finished;
pub use self::hello_verify_request::HelloVerifyRequest;
pub use self::key_exchange::{ClientKeyExchange, ServerDhParams, ServerKeyExchange};
pub use self::server_hello::ServerHello;

/// Size of the handshake header on the wire:
/// msg type (1) | length (3) | message seq (2) | fragment offset (3) |
/// fragment length (3).
pub const HANDSHAKE_HEADER_SIZE: usize = 12;

/// Length of the verify data carried in a Finished message.
pub const VERIFY_DATA_LENGTH: usize = 12;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandshakeType {
    HelloRequest = 0,
    ClientHello = 1,
    ServerHello = 2,
    HelloVerifyRequest = 3,
    Certificate = 11,
    ServerKeyExchange = 12,
    CertificateRequest = 13,
    ServerHelloDone = 14,
    CertificateVerify = 15,
    ClientKeyExchange = 16,
    Finished = 20,
}

impl HandshakeType {
    pub fn from_byte(b: u8) -> Result<Self, Error> {
        match b {
            0 => Ok(HandshakeType::HelloRequest),
            1 => Ok(HandshakeType::ClientHello),
            2 => Ok(HandshakeType::ServerHello),
            3 => Ok(HandshakeType::HelloVerifyRequest),
            11 => Ok(HandshakeType::Certificate),
            12 => Ok(HandshakeType::ServerKeyExchange),
            13 => Ok(HandshakeType::CertificateRequest),
            14 => Ok(HandshakeType::ServerHelloDone),
            15 => Ok(HandshakeType::CertificateVerify),
            16 => Ok(HandshakeType::ClientKeyExchange),
            20 => Ok(HandshakeType::Finished),
            other => Err(Error::UnknownHandshakeType(other)),
        }
    }
}

impl fmt::Display for HandshakeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            HandshakeType::HelloRequest => "HelloRequest",
            HandshakeType::ClientHello => "ClientHello",
            HandshakeType::ServerHello => "ServerHello",
            HandshakeType::HelloVerifyRequest => "HelloVerifyRequest",
            HandshakeType::Certificate => "Certificate",
            HandshakeType::ServerKeyExchange => "ServerKeyExchange",
            HandshakeType::CertificateRequest => "CertificateRequest",
            HandshakeType::ServerHelloDone => "ServerHelloDone",
            HandshakeType::CertificateVerify => "CertificateVerify",
            HandshakeType::ClientKeyExchange => "ClientKeyExchange",
            HandshakeType::Finished => "Finished",
        };
        write!(f, "{}", name)
    }
}

/// One handshake fragment as framed on the wire. An unfragmented message has
/// `fragment_offset == 0` and `fragment_length == length`.
#[derive(Clone, PartialEq, Eq)]
pub struct Handshake {
    pub msg_type: HandshakeType,
    pub length: u32,
    pub message_seq: u16,
    pub fragment_offset: u32,
    pub fragment_length: u32,
    pub fragment: Vec<u8>,
}

impl Handshake {
    /// Frame a whole message as a single fragment.
    pub fn unfragmented(msg_type: HandshakeType, message_seq: u16, body: Vec<u8>) -> Self {
        Handshake {
            msg_type: msg_type,
            length: body.len() as u32,
            message_seq: message_seq,
            fragment_offset: 0,
            fragment_length: body.len() as u32,
            fragment: body,
        }
    }

    pub fn is_fragmented(&self) -> bool {
        self.fragment_offset != 0 || self.fragment_length != self.length
    }

    pub fn read(reader: &mut Reader) -> Result<Self, Error> {
        if reader.remaining() < HANDSHAKE_HEADER_SIZE {
            return Err(Error::MalformedHandshake);
        }
        let msg_type = HandshakeType::from_byte(reader.u8()?)?;
        let length = reader.u24()?;
        let message_seq = reader.u16()?;
        let fragment_offset = reader.u24()?;
        let fragment_length = reader.u24()?;
        if fragment_offset
            .checked_add(fragment_length)
            .map_or(true, |end| end > length)
        {
            return Err(Error::MalformedHandshake);
        }
        let fragment = reader
            .take(fragment_length as usize)
            .map_err(|_| Error::MalformedHandshake)?;
        Ok(Handshake {
            msg_type: msg_type,
            length: length,
            message_seq: message_seq,
            fragment_offset: fragment_offset,
            fragment_length: fragment_length,
            fragment: fragment.to_vec(),
        })
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.put_u8(self.msg_type as u8);
        out.put_u24(self.length);
        out.put_u16(self.message_seq);
        out.put_u24(self.fragment_offset);
        out.put_u24(self.fragment_length);
        out.put_slice(&self.fragment);
    }

    /// Header and fragment as one buffer. For assembled messages this is the
    /// exact byte sequence the verify-data transcript is fed with.
    pub fn bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HANDSHAKE_HEADER_SIZE + self.fragment.len());
        self.write(&mut out);
        out
    }
}

impl fmt::Debug for Handshake {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Handshake {{ type: {}, length: {}, seq: {}, offset: {}, fragment: {} }}",
            self.msg_type,
            self.length,
            self.message_seq,
            self.fragment_offset,
            hex::encode(&self.fragment),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Handshake, HandshakeType};
    use bytes::Reader;
    use error::Error;

    #[test]
    fn header_round_trip() {
        let message = Handshake::unfragmented(HandshakeType::Finished, 3, vec![0xab; 12]);
        let bytes = message.bytes();
        assert_eq!(&bytes[..12], &hex!("1400000c000300000000000c")[..]);

        let mut reader = Reader::new(&bytes);
        let decoded = Handshake::read(&mut reader).unwrap();
        assert_eq!(decoded, message);
        assert!(!decoded.is_fragmented());
    }

    #[test]
    fn fragment_window_must_fit_length() {
        // offset 20 + length 20 over a 30 byte message
        let mut bytes = Vec::new();
        Handshake {
            msg_type: HandshakeType::ServerKeyExchange,
            length: 30,
            message_seq: 0,
            fragment_offset: 20,
            fragment_length: 20,
            fragment: vec![0; 20],
        }
        .write(&mut bytes);
        let mut reader = Reader::new(&bytes);
        assert_eq!(
            Handshake::read(&mut reader),
            Err(Error::MalformedHandshake)
        );
    }

    #[test]
    fn fragment_flag() {
        let mut fragment = Handshake::unfragmented(HandshakeType::Certificate, 0, vec![0; 10]);
        fragment.length = 40;
        fragment.fragment_offset = 10;
        assert!(fragment.is_fragmented());
    }
}
