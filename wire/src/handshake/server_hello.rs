use std::fmt;

use hex;

use bytes::{Reader, Writer};
use compression::CompressionMethod;
use error::Error;
use handshake::extension::Extension;
use random::Random;
use record::ProtocolVersion;
use suite::CipherSuiteId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerHello {
    pub server_version: ProtocolVersion,
    pub random: Random,
    pub session_id: Vec<u8>,
    pub cipher_suite: CipherSuiteId,
    pub compression_method: CompressionMethod,
    pub extensions: Vec<Extension>,
}

impl ServerHello {
    pub fn read(reader: &mut Reader) -> Result<Self, Error> {
        let server_version = ProtocolVersion::read(reader)?;
        let random = Random::read(reader).map_err(|_| Error::MalformedHandshake)?;
        let session_id = reader.vec8().map_err(|_| Error::MalformedHandshake)?;
        let cipher_suite = CipherSuiteId::read(reader).map_err(|_| Error::MalformedHandshake)?;
        let compression_method =
            CompressionMethod::read(reader).map_err(|_| Error::MalformedHandshake)?;

        // The extension block, when present, carries its own byte length.
        let mut extensions = Vec::new();
        if !reader.is_empty() {
            let block_len = reader.u16().map_err(|_| Error::MalformedHandshake)? as usize;
            if reader.remaining() != block_len {
                return Err(Error::MalformedHandshake);
            }
            while !reader.is_empty() {
                extensions.push(Extension::read(reader)?);
            }
        }

        Ok(ServerHello {
            server_version: server_version,
            random: random,
            session_id: session_id,
            cipher_suite: cipher_suite,
            compression_method: compression_method,
            extensions: extensions,
        })
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        self.server_version.write(out);
        self.random.write(out);
        out.put_vec8(&self.session_id);
        self.cipher_suite.write(out);
        self.compression_method.write(out);
        if !self.extensions.is_empty() {
            let mut block = Vec::new();
            for extension in &self.extensions {
                extension.write(&mut block);
            }
            out.put_vec16(&block);
        }
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write(&mut out);
        out
    }
}

impl fmt::Display for ServerHello {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ServerHello {{ version: {}, session_id: {}, suite: {}, compression: {} }}",
            self.server_version,
            hex::encode(&self.session_id),
            self.cipher_suite,
            self.compression_method,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::ServerHello;
    use bytes::Reader;
    use compression::COMPRESSION_NULL;
    use error::Error;
    use random::Random;
    use record::DTLS_1_2;
    use suite::TLS_DH_ANON_WITH_AES_256_CBC_SHA256;

    #[test]
    fn round_trip_without_extensions() {
        let hello = ServerHello {
            server_version: DTLS_1_2,
            random: Random::generate(),
            session_id: vec![1, 2, 3],
            cipher_suite: TLS_DH_ANON_WITH_AES_256_CBC_SHA256,
            compression_method: COMPRESSION_NULL,
            extensions: vec![],
        };
        let bytes = hello.bytes();
        let decoded = ServerHello::read(&mut Reader::new(&bytes)).unwrap();
        assert_eq!(decoded, hello);
    }

    #[test]
    fn extension_block_length_is_checked() {
        let hello = ServerHello {
            server_version: DTLS_1_2,
            random: Random::generate(),
            session_id: vec![],
            cipher_suite: TLS_DH_ANON_WITH_AES_256_CBC_SHA256,
            compression_method: COMPRESSION_NULL,
            extensions: vec![],
        };
        let mut bytes = hello.bytes();
        // Claim a two byte extension block but deliver only one byte.
        bytes.extend_from_slice(&[0, 2, 0]);
        assert_eq!(
            ServerHello::read(&mut Reader::new(&bytes)),
            Err(Error::MalformedHandshake)
        );
    }
}
