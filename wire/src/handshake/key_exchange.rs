use std::fmt;

use hex;

use bytes::{Reader, Writer};
use error::Error;
use handshake::digitally_signed::DigitallySigned;

/// The server's ephemeral group parameters: prime, generator and public
/// value, each as a length-prefixed big-endian integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerDhParams {
    pub p: Vec<u8>,
    pub g: Vec<u8>,
    pub public_key: Vec<u8>,
}

impl ServerDhParams {
    pub fn read(reader: &mut Reader) -> Result<Self, Error> {
        Ok(ServerDhParams {
            p: reader.vec16().map_err(|_| Error::MalformedHandshake)?,
            g: reader.vec16().map_err(|_| Error::MalformedHandshake)?,
            public_key: reader.vec16().map_err(|_| Error::MalformedHandshake)?,
        })
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.put_vec16(&self.p);
        out.put_vec16(&self.g);
        out.put_vec16(&self.public_key);
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write(&mut out);
        out
    }
}

impl fmt::Display for ServerDhParams {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ServerDhParams {{ p: {} bits, g: {}, public: {} bytes }}",
            self.p.len() * 8,
            hex::encode(&self.g),
            self.public_key.len(),
        )
    }
}

/// ServerKeyExchange body: the group parameters, followed by a signature over
/// them when the suite authenticates the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerKeyExchange {
    pub params: ServerDhParams,
    pub signature: Option<DigitallySigned>,
}

impl ServerKeyExchange {
    pub fn read(reader: &mut Reader) -> Result<Self, Error> {
        let params = ServerDhParams::read(reader)?;
        let signature = if reader.is_empty() {
            None
        } else {
            Some(DigitallySigned::read(reader)?)
        };
        Ok(ServerKeyExchange {
            params: params,
            signature: signature,
        })
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        self.params.write(out);
        if let Some(ref signature) = self.signature {
            signature.write(out);
        }
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write(&mut out);
        out
    }
}

/// ClientKeyExchange body: the client's public value, length-prefixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientKeyExchange {
    pub public_key: Vec<u8>,
}

impl ClientKeyExchange {
    pub fn read(reader: &mut Reader) -> Result<Self, Error> {
        Ok(ClientKeyExchange {
            public_key: reader.vec16().map_err(|_| Error::MalformedHandshake)?,
        })
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.put_vec16(&self.public_key);
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientKeyExchange, ServerDhParams, ServerKeyExchange};
    use bytes::Reader;
    use handshake::digitally_signed::{
        DigitallySigned, HASH_ALGORITHM_SHA256, SIGNATURE_ALGORITHM_RSA,
    };

    fn params() -> ServerDhParams {
        ServerDhParams {
            p: vec![0xff; 16],
            g: vec![2],
            public_key: vec![0xab; 16],
        }
    }

    #[test]
    fn anonymous_round_trip() {
        let kx = ServerKeyExchange {
            params: params(),
            signature: None,
        };
        let bytes = kx.bytes();
        assert_eq!(ServerKeyExchange::read(&mut Reader::new(&bytes)).unwrap(), kx);
    }

    #[test]
    fn signed_round_trip() {
        let kx = ServerKeyExchange {
            params: params(),
            signature: Some(DigitallySigned {
                hash_algorithm: HASH_ALGORITHM_SHA256,
                signature_algorithm: SIGNATURE_ALGORITHM_RSA,
                signature: vec![0x55; 64],
            }),
        };
        let bytes = kx.bytes();
        assert_eq!(ServerKeyExchange::read(&mut Reader::new(&bytes)).unwrap(), kx);
    }

    #[test]
    fn client_round_trip() {
        let kx = ClientKeyExchange {
            public_key: vec![9; 32],
        };
        let bytes = kx.bytes();
        assert_eq!(
            ClientKeyExchange::read(&mut Reader::new(&bytes)).unwrap(),
            kx
        );
    }
}
