//! The TLS pseudo-random function and the key schedule built on top of it.

use std::cmp;

use digest::generic_array::ArrayLength;
use digest::{BlockInput, FixedOutput, Input};
use hmac::{Hmac, Mac};
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use wire::handshake::VERIFY_DATA_LENGTH;
use wire::{ProtocolVersion, DTLS_1_2};

pub const MASTER_SECRET_LENGTH: usize = 48;

const MASTER_SECRET_LABEL: &'static [u8] = b"master secret";
const KEY_EXPANSION_LABEL: &'static [u8] = b"key expansion";
const CLIENT_FINISHED_LABEL: &'static [u8] = b"client finished";
const SERVER_FINISHED_LABEL: &'static [u8] = b"server finished";

// p_hash fills `result` with HMAC_hash(secret, A(i) || seed) blocks, where
// A(0) = seed and A(i) = HMAC_hash(secret, A(i-1)).
fn p_hash<D>(result: &mut [u8], secret: &[u8], seed: &[u8])
where
    D: Input + BlockInput + FixedOutput + Default + Clone,
    D::BlockSize: ArrayLength<u8>,
{
    // HMAC accepts keys of any length, so new_varkey cannot fail.
    let base = Hmac::<D>::new_varkey(secret).expect("hmac key");

    let mut hmac = base.clone();
    hmac.input(seed);
    let mut a = hmac.result().code();

    let mut offset = 0;
    while offset < result.len() {
        let mut hmac = base.clone();
        hmac.input(&a);
        hmac.input(seed);
        let block = hmac.result().code();

        let todo = cmp::min(block.len(), result.len() - offset);
        result[offset..offset + todo].copy_from_slice(&block[..todo]);
        offset += todo;

        let mut hmac = base.clone();
        hmac.input(&a);
        a = hmac.result().code();
    }
}

// The two secret halves overlap by one byte when the length is odd.
fn split_secret(secret: &[u8]) -> (&[u8], &[u8]) {
    (
        &secret[..(secret.len() + 1) / 2],
        &secret[secret.len() / 2..],
    )
}

/// The TLS 1.0 PRF: P_MD5 over the first half of the secret, xored with
/// P_SHA1 over the second half.
pub fn prf10(result: &mut [u8], secret: &[u8], label: &[u8], seed: &[u8]) {
    let mut label_and_seed = Vec::with_capacity(label.len() + seed.len());
    label_and_seed.extend_from_slice(label);
    label_and_seed.extend_from_slice(seed);

    let (s1, s2) = split_secret(secret);
    p_hash::<Md5>(result, s1, &label_and_seed);

    let mut sha_out = vec![0; result.len()];
    p_hash::<Sha1>(&mut sha_out, s2, &label_and_seed);
    for (r, s) in result.iter_mut().zip(sha_out.iter()) {
        *r ^= s;
    }
}

/// The TLS 1.2 PRF: P_SHA256 over the whole secret.
pub fn prf12(result: &mut [u8], secret: &[u8], label: &[u8], seed: &[u8]) {
    let mut label_and_seed = Vec::with_capacity(label.len() + seed.len());
    label_and_seed.extend_from_slice(label);
    label_and_seed.extend_from_slice(seed);

    p_hash::<Sha256>(result, secret, &label_and_seed);
}

/// Which PRF a connection runs, decided by the negotiated version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prf {
    Tls10,
    Tls12,
}

impl Prf {
    pub fn for_version(version: ProtocolVersion) -> Self {
        if version == DTLS_1_2 {
            Prf::Tls12
        } else {
            Prf::Tls10
        }
    }

    pub fn expand(&self, result: &mut [u8], secret: &[u8], label: &[u8], seed: &[u8]) {
        match *self {
            Prf::Tls10 => prf10(result, secret, label, seed),
            Prf::Tls12 => prf12(result, secret, label, seed),
        }
    }
}

/// Everything the record layer needs once key agreement is done.
pub struct KeyMaterial {
    pub master_secret: Vec<u8>,
    pub client_mac: Vec<u8>,
    pub server_mac: Vec<u8>,
    pub client_key: Vec<u8>,
    pub server_key: Vec<u8>,
}

/// Derive the master secret and expand the key block. The key expansion seed
/// swaps the two randoms relative to the master secret seed.
pub fn keys_from_pre_master_secret(
    prf: Prf,
    pre_master_secret: &[u8],
    client_random: &[u8; 32],
    server_random: &[u8; 32],
    mac_len: usize,
    key_len: usize,
) -> KeyMaterial {
    let mut seed = [0; 64];
    seed[..32].copy_from_slice(client_random);
    seed[32..].copy_from_slice(server_random);
    let mut master_secret = vec![0; MASTER_SECRET_LENGTH];
    prf.expand(&mut master_secret, pre_master_secret, MASTER_SECRET_LABEL, &seed);

    seed[..32].copy_from_slice(server_random);
    seed[32..].copy_from_slice(client_random);
    let mut key_block = vec![0; 2 * mac_len + 2 * key_len];
    prf.expand(&mut key_block, &master_secret, KEY_EXPANSION_LABEL, &seed);

    let (client_mac, rest) = key_block.split_at(mac_len);
    let (server_mac, rest) = rest.split_at(mac_len);
    let (client_key, server_key) = rest.split_at(key_len);

    KeyMaterial {
        client_mac: client_mac.to_vec(),
        server_mac: server_mac.to_vec(),
        client_key: client_key.to_vec(),
        server_key: server_key.to_vec(),
        master_secret: master_secret,
    }
}

/// A running transcript of handshake messages, hashed incrementally so
/// either Finished sum can be produced at any point. All three digests are
/// fed; the negotiated PRF decides which of them the sum reads.
#[derive(Clone)]
pub struct FinishedHash {
    prf: Prf,
    md5: Md5,
    sha1: Sha1,
    sha256: Sha256,
}

impl FinishedHash {
    pub fn new(prf: Prf) -> Self {
        FinishedHash {
            prf: prf,
            md5: Md5::default(),
            sha1: Sha1::default(),
            sha256: Sha256::default(),
        }
    }

    pub fn feed(&mut self, message: &[u8]) {
        self.md5.input(message);
        self.sha1.input(message);
        self.sha256.input(message);
    }

    fn transcript_hash(&self) -> Vec<u8> {
        match self.prf {
            Prf::Tls10 => {
                let mut seed = Vec::with_capacity(16 + 20);
                seed.extend_from_slice(&self.md5.clone().result());
                seed.extend_from_slice(&self.sha1.clone().result());
                seed
            }
            Prf::Tls12 => self.sha256.clone().result().to_vec(),
        }
    }

    fn sum(&self, label: &[u8], master_secret: &[u8]) -> [u8; VERIFY_DATA_LENGTH] {
        let mut out = [0; VERIFY_DATA_LENGTH];
        self.prf
            .expand(&mut out, master_secret, label, &self.transcript_hash());
        out
    }

    /// Verify data for a client Finished message.
    pub fn client_sum(&self, master_secret: &[u8]) -> [u8; VERIFY_DATA_LENGTH] {
        self.sum(CLIENT_FINISHED_LABEL, master_secret)
    }

    /// Verify data for a server Finished message.
    pub fn server_sum(&self, master_secret: &[u8]) -> [u8; VERIFY_DATA_LENGTH] {
        self.sum(SERVER_FINISHED_LABEL, master_secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The widely used P_SHA256 reference vector: 16 byte secret and seed,
    // label "test label", 100 bytes of output.
    #[test]
    fn prf12_reference_vector() {
        let secret = hex!("9bbe436ba940f017b17652849a71db35");
        let seed = hex!("a0ba9f936cda311827a6f796ffd5198c");
        let expected = hex!("e3f229ba727be17b8d122620557cd453c2aab21d07c3d495329b52d4e61edb5a6b301791e90d35c9c9a46b4e14baf9af0fa022f7077def17abfd3797c0564bab4fbc91666e9def9b97fce34f796789baa48082d122ee42c5a72e5a5110fff70187347b66");

        let mut out = vec![0; expected.len()];
        prf12(&mut out, &secret, b"test label", &seed);
        assert_eq!(out, expected.to_vec());
    }

    // Reference vector for the 1.0 PRF: 48 bytes of 0xab as the secret,
    // label "PRF Testvector", 64 bytes of 0xcd as the seed; the output is
    // 104 bytes long and starts with the prefix below.
    #[test]
    fn prf10_reference_vector() {
        let secret = [0xab; 48];
        let seed = [0xcd; 64];
        let expected_prefix = hex!("d3d4d1e349b5d515044666d51de32bab258cb521");

        let mut out = [0; 104];
        prf10(&mut out, &secret, b"PRF Testvector", &seed);
        assert_eq!(&out[..expected_prefix.len()], &expected_prefix[..]);
    }

    #[test]
    fn prf10_differs_from_prf12() {
        let mut a = [0; 12];
        let mut b = [0; 12];
        prf10(&mut a, b"secret", b"label", b"seed");
        prf12(&mut b, b"secret", b"label", b"seed");
        assert_ne!(a, b);
    }

    #[test]
    fn key_block_partition() {
        let material = keys_from_pre_master_secret(
            Prf::Tls10,
            b"premaster",
            &[1; 32],
            &[2; 32],
            20,
            16,
        );
        assert_eq!(material.master_secret.len(), MASTER_SECRET_LENGTH);
        assert_eq!(material.client_mac.len(), 20);
        assert_eq!(material.server_mac.len(), 20);
        assert_eq!(material.client_key.len(), 16);
        assert_eq!(material.server_key.len(), 16);
        assert_ne!(material.client_key, material.server_key);
        assert_ne!(material.client_mac, material.server_mac);
    }

    #[test]
    fn finished_sums_depend_on_role_and_transcript() {
        let mut hash = FinishedHash::new(Prf::Tls10);
        hash.feed(b"first message");
        let master = [7; 48];

        let client = hash.client_sum(&master);
        let server = hash.server_sum(&master);
        assert_ne!(client, server);

        // Feeding more transcript must change the sums.
        let before = hash.client_sum(&master);
        hash.feed(b"second message");
        assert_ne!(before, hash.client_sum(&master));
    }
}
