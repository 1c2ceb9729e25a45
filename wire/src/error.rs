use std::{error, fmt};

/// Decoding errors of the record and handshake codecs. `Truncated` is what the
/// low level readers produce when they run out of buffer; the framing codecs
/// translate it into the error of the layer they were parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    Truncated,
    MalformedRecord,
    UnknownContentType(u8),
    UnsupportedVersion(u8, u8),
    MalformedHandshake,
    UnknownHandshakeType(u8),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::Error::*;

        match self {
            &Truncated => write!(f, "unexpected end of buffer"),
            &MalformedRecord => write!(f, "malformed record"),
            &UnknownContentType(t) => write!(f, "unknown content type: {}", t),
            &UnsupportedVersion(major, minor) => {
                write!(f, "unsupported protocol version: {},{}", major, minor)
            }
            &MalformedHandshake => write!(f, "malformed handshake message"),
            &UnknownHandshakeType(t) => write!(f, "unknown handshake type: {}", t),
        }
    }
}

impl error::Error for Error {}
