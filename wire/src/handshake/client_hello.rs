use std::fmt;

use hex;

use bytes::{Reader, Writer};
use compression::CompressionMethod;
use error::Error;
use handshake::extension::Extension;
use random::Random;
use record::ProtocolVersion;
use suite::CipherSuiteId;

/// ClientHello body. The cookie field between session id and the cipher
/// suites is what distinguishes this layout from the stream TLS one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientHello {
    pub client_version: ProtocolVersion,
    pub random: Random,
    pub session_id: Vec<u8>,
    pub cookie: Vec<u8>,
    pub cipher_suites: Vec<CipherSuiteId>,
    pub compression_methods: Vec<CompressionMethod>,
    pub extensions: Vec<Extension>,
}

impl ClientHello {
    pub fn read(reader: &mut Reader) -> Result<Self, Error> {
        let client_version = ProtocolVersion::read(reader)?;
        let random = Random::read(reader).map_err(|_| Error::MalformedHandshake)?;
        let session_id = reader.vec8().map_err(|_| Error::MalformedHandshake)?;
        let cookie = reader.vec8().map_err(|_| Error::MalformedHandshake)?;

        let suites_len = reader.u16().map_err(|_| Error::MalformedHandshake)? as usize;
        if suites_len % 2 != 0 || reader.remaining() < suites_len {
            return Err(Error::MalformedHandshake);
        }
        let mut cipher_suites = Vec::with_capacity(suites_len / 2);
        for _ in 0..suites_len / 2 {
            cipher_suites.push(CipherSuiteId::read(reader)?);
        }

        let methods_len = reader.u8().map_err(|_| Error::MalformedHandshake)? as usize;
        if reader.remaining() < methods_len {
            return Err(Error::MalformedHandshake);
        }
        let mut compression_methods = Vec::with_capacity(methods_len);
        for _ in 0..methods_len {
            compression_methods.push(CompressionMethod::read(reader)?);
        }

        // Extensions run to the end of the message, with no length prefix of
        // their own.
        let mut extensions = Vec::new();
        while !reader.is_empty() {
            extensions.push(Extension::read(reader)?);
        }

        Ok(ClientHello {
            client_version: client_version,
            random: random,
            session_id: session_id,
            cookie: cookie,
            cipher_suites: cipher_suites,
            compression_methods: compression_methods,
            extensions: extensions,
        })
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        self.client_version.write(out);
        self.random.write(out);
        out.put_vec8(&self.session_id);
        out.put_vec8(&self.cookie);
        out.put_u16((self.cipher_suites.len() * 2) as u16);
        for suite in &self.cipher_suites {
            suite.write(out);
        }
        out.put_u8(self.compression_methods.len() as u8);
        for method in &self.compression_methods {
            method.write(out);
        }
        for extension in &self.extensions {
            extension.write(out);
        }
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write(&mut out);
        out
    }
}

impl fmt::Display for ClientHello {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ClientHello {{ version: {}, session_id: {}, cookie: {}, suites: {} }}",
            self.client_version,
            hex::encode(&self.session_id),
            hex::encode(&self.cookie),
            self.cipher_suites.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::ClientHello;
    use bytes::Reader;
    use compression::COMPRESSION_NULL;
    use handshake::extension::Extension;
    use random::Random;
    use record::DTLS_1_0;
    use suite::{TLS_DH_ANON_WITH_AES_128_CBC_SHA, TLS_DH_ANON_WITH_AES_256_CBC_SHA256};

    #[test]
    fn round_trip() {
        let hello = ClientHello {
            client_version: DTLS_1_0,
            random: Random::generate(),
            session_id: vec![],
            cookie: vec![0xde, 0xad, 0xbe, 0xef],
            cipher_suites: vec![
                TLS_DH_ANON_WITH_AES_128_CBC_SHA,
                TLS_DH_ANON_WITH_AES_256_CBC_SHA256,
            ],
            compression_methods: vec![COMPRESSION_NULL],
            extensions: vec![Extension {
                extension_type: super::super::EXTENSION_SIGNATURE_ALGORITHMS,
                data: vec![0, 2, 4, 1],
            }],
        };
        let bytes = hello.bytes();
        let decoded = ClientHello::read(&mut Reader::new(&bytes)).unwrap();
        assert_eq!(decoded, hello);
    }

    #[test]
    fn fixed_layout() {
        let hello = ClientHello {
            client_version: DTLS_1_0,
            random: Random {
                gmt_unix_time: 0,
                opaque: [0; 28],
            },
            session_id: vec![0x01],
            cookie: vec![],
            cipher_suites: vec![TLS_DH_ANON_WITH_AES_128_CBC_SHA],
            compression_methods: vec![COMPRESSION_NULL],
            extensions: vec![],
        };
        let mut expected = Vec::new();
        expected.extend_from_slice(&hex!("feff")); // version
        expected.extend_from_slice(&[0; 32]); // random
        expected.extend_from_slice(&hex!("0101")); // session id
        expected.extend_from_slice(&hex!("00")); // empty cookie
        expected.extend_from_slice(&hex!("00020034")); // one suite
        expected.extend_from_slice(&hex!("0100")); // null compression
        assert_eq!(hello.bytes(), expected);
    }
}
