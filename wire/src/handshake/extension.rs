use std::fmt;

use hex;

use bytes::{Reader, Writer};
use error::Error;
use handshake::digitally_signed::{
    HASH_ALGORITHM_SHA1, HASH_ALGORITHM_SHA256, SIGNATURE_ALGORITHM_RSA,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionType(pub u16);

// From the IANA TLS ExtensionType registry.
pub const EXTENSION_SERVER_NAME: ExtensionType = ExtensionType(0);
pub const EXTENSION_MAX_FRAGMENT_LENGTH: ExtensionType = ExtensionType(1);
pub const EXTENSION_TRUSTED_CA_KEYS: ExtensionType = ExtensionType(3);
pub const EXTENSION_TRUNCATED_HMAC: ExtensionType = ExtensionType(4);
pub const EXTENSION_CERT_TYPE: ExtensionType = ExtensionType(9);
pub const EXTENSION_SUPPORTED_GROUPS: ExtensionType = ExtensionType(10);
pub const EXTENSION_EC_POINT_FORMATS: ExtensionType = ExtensionType(11);
pub const EXTENSION_SIGNATURE_ALGORITHMS: ExtensionType = ExtensionType(13);
pub const EXTENSION_USE_SRTP: ExtensionType = ExtensionType(14);

/// An opaque extension: `type (2) | data length (2) | data`. No extension is
/// interpreted beyond its framing; the payloads below are emitted for peers
/// that want them and otherwise carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub extension_type: ExtensionType,
    pub data: Vec<u8>,
}

impl Extension {
    pub fn read(reader: &mut Reader) -> Result<Self, Error> {
        let extension_type = ExtensionType(reader.u16().map_err(|_| Error::MalformedHandshake)?);
        let data = reader.vec16().map_err(|_| Error::MalformedHandshake)?;
        Ok(Extension {
            extension_type: extension_type,
            data: data,
        })
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.put_u16(self.extension_type.0);
        out.put_vec16(&self.data);
    }

    /// The signature algorithm pairs this library can produce, advertised in
    /// a ClientHello. Peers are free to ignore it and we never let it
    /// constrain suite selection.
    pub fn signature_algorithms() -> Self {
        let pairs: &[(u8, u8)] = &[
            (HASH_ALGORITHM_SHA256, SIGNATURE_ALGORITHM_RSA),
            (HASH_ALGORITHM_SHA1, SIGNATURE_ALGORITHM_RSA),
        ];
        let mut data = Vec::with_capacity(2 + pairs.len() * 2);
        data.put_u16((pairs.len() * 2) as u16);
        for &(hash, signature) in pairs {
            data.put_u8(hash);
            data.put_u8(signature);
        }
        Extension {
            extension_type: EXTENSION_SIGNATURE_ALGORITHMS,
            data: data,
        }
    }

    /// A client's offer to carry OpenPGP certificates.
    pub fn client_cert_type_openpgp() -> Self {
        Extension {
            extension_type: EXTENSION_CERT_TYPE,
            data: vec![1, 1],
        }
    }

    /// A server's pick of the OpenPGP certificate type.
    pub fn server_cert_type_openpgp() -> Self {
        Extension {
            extension_type: EXTENSION_CERT_TYPE,
            data: vec![1],
        }
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Extension {{ type: {}, data: {} }}",
            self.extension_type.0,
            hex::encode(&self.data),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Extension, EXTENSION_SIGNATURE_ALGORITHMS};
    use bytes::Reader;
    use error::Error;

    #[test]
    fn round_trip() {
        let extension = Extension::signature_algorithms();
        let mut bytes = Vec::new();
        extension.write(&mut bytes);
        assert_eq!(bytes, hex!("000d0006000404010201"));

        let decoded = Extension::read(&mut Reader::new(&bytes)).unwrap();
        assert_eq!(decoded, extension);
        assert_eq!(decoded.extension_type, EXTENSION_SIGNATURE_ALGORITHMS);
    }

    #[test]
    fn data_length_is_bounded() {
        // type 13, claimed length 4, only 2 bytes behind it
        let bytes = hex!("000d00040401");
        assert_eq!(
            Extension::read(&mut Reader::new(&bytes)),
            Err(Error::MalformedHandshake)
        );
    }
}
