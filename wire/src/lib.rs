#![forbid(unsafe_code)]

extern crate byteorder;
extern crate hex;
extern crate rand;

#[cfg(test)]
#[macro_use]
extern crate hex_literal;

mod bytes;
mod compression;
mod error;
mod random;
mod record;
mod suite;

pub mod handshake;

pub use self::bytes::{Reader, Writer};
pub use self::compression::{CompressionMethod, COMPRESSION_NULL};
pub use self::error::Error;
pub use self::random::Random;
pub use self::record::{
    ContentType, ProtocolVersion, Record, RecordHeader, DTLS_1_0, DTLS_1_2, MAX_RECORD_PAYLOAD,
    RECORD_HEADER_SIZE,
};
pub use self::suite::{
    CipherSuiteId, TLS_DHE_RSA_WITH_AES_256_CBC_SHA, TLS_DHE_RSA_WITH_AES_256_CBC_SHA256,
    TLS_DH_ANON_WITH_AES_128_CBC_SHA, TLS_DH_ANON_WITH_AES_256_CBC_SHA256,
    TLS_NULL_WITH_NULL_NULL,
};
