use std::sync::Arc;
use std::time::Duration;

use keylog::KeyLog;
use wire::{
    CipherSuiteId, ProtocolVersion, DTLS_1_0, TLS_DH_ANON_WITH_AES_128_CBC_SHA,
    TLS_DH_ANON_WITH_AES_256_CBC_SHA256,
};

/// Knobs shared by every connection created from it. The defaults give a
/// 1.0 endpoint offering the anonymous suites and no cookie exchange.
pub struct Config {
    /// Protocol version offered (client) or required (server).
    pub version: ProtocolVersion,
    /// Suites offered in a ClientHello, and acceptable to a server, in
    /// preference order.
    pub cipher_suites: Vec<CipherSuiteId>,
    /// Whether a server answers the first ClientHello with a cookie
    /// challenge before committing any handshake state.
    pub cookie_exchange: bool,
    /// Deadline applied to blocking reads; `None` blocks indefinitely.
    pub read_deadline: Option<Duration>,
    /// Optional sink for session secrets.
    pub key_log: Option<Arc<dyn KeyLog>>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            version: DTLS_1_0,
            cipher_suites: vec![
                TLS_DH_ANON_WITH_AES_128_CBC_SHA,
                TLS_DH_ANON_WITH_AES_256_CBC_SHA256,
            ],
            cookie_exchange: false,
            read_deadline: None,
            key_log: None,
        }
    }
}
