use std::fmt;

use bytes::{Reader, Writer};
use error::Error;

/// Compression method byte from the hello messages. Only null compression is
/// ever negotiated; other values survive parsing so a hello offering several
/// methods is not rejected outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionMethod(pub u8);

pub const COMPRESSION_NULL: CompressionMethod = CompressionMethod(0);

impl CompressionMethod {
    pub fn read(reader: &mut Reader) -> Result<Self, Error> {
        Ok(CompressionMethod(reader.u8()?))
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.put_u8(self.0);
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if *self == COMPRESSION_NULL {
            write!(f, "null")
        } else {
            write!(f, "unknown({})", self.0)
        }
    }
}
