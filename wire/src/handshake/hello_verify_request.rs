use std::fmt;

use hex;

use bytes::{Reader, Writer};
use error::Error;
use record::ProtocolVersion;

/// The stateless cookie round: the server echoes a cookie which the client
/// must repeat in its second ClientHello before any state is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelloVerifyRequest {
    pub server_version: ProtocolVersion,
    pub cookie: Vec<u8>,
}

impl HelloVerifyRequest {
    pub fn read(reader: &mut Reader) -> Result<Self, Error> {
        let server_version = ProtocolVersion::read(reader)?;
        let cookie = reader.vec8().map_err(|_| Error::MalformedHandshake)?;
        if !reader.is_empty() {
            return Err(Error::MalformedHandshake);
        }
        Ok(HelloVerifyRequest {
            server_version: server_version,
            cookie: cookie,
        })
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        self.server_version.write(out);
        out.put_vec8(&self.cookie);
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write(&mut out);
        out
    }
}

impl fmt::Display for HelloVerifyRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "HelloVerifyRequest {{ version: {}, cookie: {} }}",
            self.server_version,
            hex::encode(&self.cookie),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::HelloVerifyRequest;
    use bytes::Reader;
    use error::Error;
    use record::DTLS_1_0;

    #[test]
    fn round_trip() {
        let request = HelloVerifyRequest {
            server_version: DTLS_1_0,
            cookie: (0..20).collect(),
        };
        let bytes = request.bytes();
        assert_eq!(
            HelloVerifyRequest::read(&mut Reader::new(&bytes)).unwrap(),
            request
        );
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = HelloVerifyRequest {
            server_version: DTLS_1_0,
            cookie: vec![1, 2],
        }
        .bytes();
        bytes.push(0);
        assert_eq!(
            HelloVerifyRequest::read(&mut Reader::new(&bytes)),
            Err(Error::MalformedHandshake)
        );
    }
}
