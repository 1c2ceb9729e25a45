use bytes::{Reader, Writer};
use error::Error;

pub const HASH_ALGORITHM_NONE: u8 = 0;
pub const HASH_ALGORITHM_MD5: u8 = 1;
pub const HASH_ALGORITHM_SHA1: u8 = 2;
pub const HASH_ALGORITHM_SHA256: u8 = 4;

pub const SIGNATURE_ALGORITHM_ANONYMOUS: u8 = 0;
pub const SIGNATURE_ALGORITHM_RSA: u8 = 1;
pub const SIGNATURE_ALGORITHM_DSA: u8 = 2;
pub const SIGNATURE_ALGORITHM_ECDSA: u8 = 3;

/// A signature together with the hash/signature algorithm pair that
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitallySigned {
    pub hash_algorithm: u8,
    pub signature_algorithm: u8,
    pub signature: Vec<u8>,
}

impl DigitallySigned {
    pub fn read(reader: &mut Reader) -> Result<Self, Error> {
        Ok(DigitallySigned {
            hash_algorithm: reader.u8().map_err(|_| Error::MalformedHandshake)?,
            signature_algorithm: reader.u8().map_err(|_| Error::MalformedHandshake)?,
            signature: reader.vec16().map_err(|_| Error::MalformedHandshake)?,
        })
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.put_u8(self.hash_algorithm);
        out.put_u8(self.signature_algorithm);
        out.put_vec16(&self.signature);
    }
}
