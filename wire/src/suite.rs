use std::fmt;

use bytes::{Reader, Writer};
use error::Error;

/// A cipher suite identifier as it appears in hello messages. Parsing keeps
/// unknown identifiers around so negotiation can skip over suites we do not
/// implement instead of rejecting the whole hello.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherSuiteId(pub u16);

pub const TLS_NULL_WITH_NULL_NULL: CipherSuiteId = CipherSuiteId(0x0000);
pub const TLS_DH_ANON_WITH_AES_128_CBC_SHA: CipherSuiteId = CipherSuiteId(0x0034);
pub const TLS_DHE_RSA_WITH_AES_256_CBC_SHA: CipherSuiteId = CipherSuiteId(0x0039);
pub const TLS_DHE_RSA_WITH_AES_256_CBC_SHA256: CipherSuiteId = CipherSuiteId(0x006b);
pub const TLS_DH_ANON_WITH_AES_256_CBC_SHA256: CipherSuiteId = CipherSuiteId(0x006d);

impl CipherSuiteId {
    pub fn read(reader: &mut Reader) -> Result<Self, Error> {
        Ok(CipherSuiteId(reader.u16()?))
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.put_u16(self.0);
    }
}

impl fmt::Display for CipherSuiteId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            TLS_NULL_WITH_NULL_NULL => write!(f, "TLS_NULL_WITH_NULL_NULL"),
            TLS_DH_ANON_WITH_AES_128_CBC_SHA => write!(f, "TLS_DH_anon_WITH_AES_128_CBC_SHA"),
            TLS_DHE_RSA_WITH_AES_256_CBC_SHA => write!(f, "TLS_DHE_RSA_WITH_AES_256_CBC_SHA"),
            TLS_DHE_RSA_WITH_AES_256_CBC_SHA256 => {
                write!(f, "TLS_DHE_RSA_WITH_AES_256_CBC_SHA256")
            }
            TLS_DH_ANON_WITH_AES_256_CBC_SHA256 => {
                write!(f, "TLS_DH_anon_WITH_AES_256_CBC_SHA256")
            }
            CipherSuiteId(other) => write!(f, "UNKNOWN_CIPHER_SUITE({:#06x})", other),
        }
    }
}
