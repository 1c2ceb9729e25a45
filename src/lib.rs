#![forbid(unsafe_code)]

extern crate aes;
extern crate crypto_mac;
extern crate digest;
extern crate hex;
extern crate hmac;
extern crate md5;
extern crate num_bigint;
extern crate rand;
extern crate sha1;
extern crate sha2;
extern crate wire;

#[macro_use]
extern crate log;

#[macro_use]
extern crate hex_literal;

mod config;
mod connection;
mod dh;
mod error;
mod handshake;
mod keylog;
mod listener;
mod prf;
mod record;
mod suites;
mod transport;

pub use config::Config;
pub use connection::Connection;
pub use error::Error;
pub use keylog::{KeyLog, KeyLogFile};
pub use listener::{Listener, VirtualConn};
pub use suites::{suite_by_id, CipherSuite};
pub use transport::{Transport, UdpTransport};

pub use wire::{
    CipherSuiteId, ProtocolVersion, DTLS_1_0, DTLS_1_2, TLS_DHE_RSA_WITH_AES_256_CBC_SHA,
    TLS_DHE_RSA_WITH_AES_256_CBC_SHA256, TLS_DH_ANON_WITH_AES_128_CBC_SHA,
    TLS_DH_ANON_WITH_AES_256_CBC_SHA256,
};
