//! The cipher suite catalog and the per-direction crypto capabilities a
//! negotiated suite installs into the record layer.

use aes::block_cipher_trait::generic_array::GenericArray as BlockArray;
use aes::block_cipher_trait::BlockCipher;
use aes::{Aes128, Aes256};
use crypto_mac::MacResult;
use digest::generic_array::GenericArray;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;

use dh::KeyAgreement;
use error::Error;
use wire::{
    CipherSuiteId, ContentType, ProtocolVersion, TLS_DHE_RSA_WITH_AES_256_CBC_SHA,
    TLS_DHE_RSA_WITH_AES_256_CBC_SHA256, TLS_DH_ANON_WITH_AES_128_CBC_SHA,
    TLS_DH_ANON_WITH_AES_256_CBC_SHA256,
};

/// AES block size; every suite in the catalog is a CBC suite over AES.
pub const BLOCK_SIZE: usize = 16;

const MAC_SEED_SIZE: usize = 8;

/// A specific combination of key agreement, cipher and MAC, together with
/// the key material lengths its key block expands to.
pub struct CipherSuite {
    pub id: CipherSuiteId,
    pub key_len: usize,
    pub mac_len: usize,
    pub iv_len: usize,
    /// True when the ServerKeyExchange parameters must carry a signature.
    pub signed_key_exchange: bool,
    key_agreement: fn() -> KeyAgreement,
    cipher: fn(&[u8]) -> RecordCipher,
    mac: fn(&[u8]) -> RecordMac,
}

impl CipherSuite {
    pub fn key_agreement(&self) -> KeyAgreement {
        (self.key_agreement)()
    }

    pub fn cipher(&self, key: &[u8]) -> RecordCipher {
        (self.cipher)(key)
    }

    pub fn mac(&self, key: &[u8]) -> RecordMac {
        (self.mac)(key)
    }
}

static CIPHER_SUITES: &'static [CipherSuite] = &[
    CipherSuite {
        id: TLS_DH_ANON_WITH_AES_128_CBC_SHA,
        key_len: 16,
        mac_len: 20,
        iv_len: 16,
        signed_key_exchange: false,
        key_agreement: KeyAgreement::dhe,
        cipher: cipher_aes,
        mac: mac_sha1,
    },
    CipherSuite {
        id: TLS_DH_ANON_WITH_AES_256_CBC_SHA256,
        key_len: 32,
        mac_len: 32,
        iv_len: 16,
        signed_key_exchange: false,
        key_agreement: KeyAgreement::dhe,
        cipher: cipher_aes,
        mac: mac_sha256,
    },
    CipherSuite {
        id: TLS_DHE_RSA_WITH_AES_256_CBC_SHA,
        key_len: 32,
        mac_len: 20,
        iv_len: 16,
        signed_key_exchange: true,
        key_agreement: KeyAgreement::dhe,
        cipher: cipher_aes,
        mac: mac_sha1,
    },
    CipherSuite {
        id: TLS_DHE_RSA_WITH_AES_256_CBC_SHA256,
        key_len: 32,
        mac_len: 32,
        iv_len: 16,
        signed_key_exchange: true,
        key_agreement: KeyAgreement::dhe,
        cipher: cipher_aes,
        mac: mac_sha256,
    },
];

pub fn suite_by_id(id: CipherSuiteId) -> Option<&'static CipherSuite> {
    CIPHER_SUITES.iter().find(|suite| suite.id == id)
}

fn cipher_aes(key: &[u8]) -> RecordCipher {
    // Key lengths come from the suite table, so new_varkey cannot fail.
    match key.len() {
        16 => RecordCipher::Aes128(Aes128::new_varkey(key).expect("aes-128 key")),
        _ => RecordCipher::Aes256(Aes256::new_varkey(key).expect("aes-256 key")),
    }
}

fn mac_sha1(key: &[u8]) -> RecordMac {
    // HMAC accepts keys of any length.
    RecordMac::Sha1(Hmac::new_varkey(key).expect("hmac key"))
}

fn mac_sha256(key: &[u8]) -> RecordMac {
    RecordMac::Sha256(Hmac::new_varkey(key).expect("hmac key"))
}

/// The block cipher of a direction, dispatched statically.
#[derive(Clone)]
pub enum RecordCipher {
    Aes128(Aes128),
    Aes256(Aes256),
}

impl RecordCipher {
    pub fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        let block = BlockArray::from_mut_slice(block);
        match self {
            &RecordCipher::Aes128(ref cipher) => cipher.encrypt_block(block),
            &RecordCipher::Aes256(ref cipher) => cipher.encrypt_block(block),
        }
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        let block = BlockArray::from_mut_slice(block);
        match self {
            &RecordCipher::Aes128(ref cipher) => cipher.decrypt_block(block),
            &RecordCipher::Aes256(ref cipher) => cipher.decrypt_block(block),
        }
    }

    /// CBC-encrypt `data` in place. The caller pads beforehand; `data` must
    /// be a whole number of blocks.
    pub fn encrypt_cbc(&self, iv: &[u8], data: &mut [u8]) {
        debug_assert_eq!(data.len() % BLOCK_SIZE, 0);

        let mut previous = [0; BLOCK_SIZE];
        previous.copy_from_slice(iv);
        for block in data.chunks_mut(BLOCK_SIZE) {
            for (b, p) in block.iter_mut().zip(previous.iter()) {
                *b ^= p;
            }
            self.encrypt_block(block);
            previous.copy_from_slice(block);
        }
    }

    /// CBC-decrypt `data` in place. Padding is left for the caller to strip.
    pub fn decrypt_cbc(&self, iv: &[u8], data: &mut [u8]) {
        debug_assert_eq!(data.len() % BLOCK_SIZE, 0);

        let mut previous = [0; BLOCK_SIZE];
        previous.copy_from_slice(iv);
        for block in data.chunks_mut(BLOCK_SIZE) {
            let mut saved = [0; BLOCK_SIZE];
            saved.copy_from_slice(block);
            self.decrypt_block(block);
            for (b, p) in block.iter_mut().zip(previous.iter()) {
                *b ^= p;
            }
            previous = saved;
        }
    }
}

/// The MAC of a direction. The seed prefix binds epoch and sequence number
/// of the record, the rest covers type, version, length and content.
#[derive(Clone)]
pub enum RecordMac {
    Sha1(Hmac<Sha1>),
    Sha256(Hmac<Sha256>),
}

impl RecordMac {
    pub fn size(&self) -> usize {
        match self {
            &RecordMac::Sha1(_) => 20,
            &RecordMac::Sha256(_) => 32,
        }
    }

    fn seed(epoch: u16, sequence_number: u64) -> [u8; MAC_SEED_SIZE] {
        let mut seed = [0; MAC_SEED_SIZE];
        seed[0] = (epoch >> 8) as u8;
        seed[1] = epoch as u8;
        seed[2] = (sequence_number >> 40) as u8;
        seed[3] = (sequence_number >> 32) as u8;
        seed[4] = (sequence_number >> 24) as u8;
        seed[5] = (sequence_number >> 16) as u8;
        seed[6] = (sequence_number >> 8) as u8;
        seed[7] = sequence_number as u8;
        seed
    }

    fn feed(
        hmac: &mut dyn impl_feed::Feed,
        epoch: u16,
        sequence_number: u64,
        content_type: ContentType,
        version: ProtocolVersion,
        content: &[u8],
    ) {
        hmac.feed(&Self::seed(epoch, sequence_number));
        hmac.feed(&[content_type as u8]);
        hmac.feed(&[version.major, version.minor]);
        hmac.feed(&[(content.len() >> 8) as u8, content.len() as u8]);
        hmac.feed(content);
    }

    pub fn compute(
        &self,
        epoch: u16,
        sequence_number: u64,
        content_type: ContentType,
        version: ProtocolVersion,
        content: &[u8],
    ) -> Vec<u8> {
        match self {
            &RecordMac::Sha1(ref hmac) => {
                let mut hmac = hmac.clone();
                Self::feed(&mut hmac, epoch, sequence_number, content_type, version, content);
                hmac.result().code().to_vec()
            }
            &RecordMac::Sha256(ref hmac) => {
                let mut hmac = hmac.clone();
                Self::feed(&mut hmac, epoch, sequence_number, content_type, version, content);
                hmac.result().code().to_vec()
            }
        }
    }

    /// Recompute the MAC and compare in constant time.
    pub fn verify(
        &self,
        epoch: u16,
        sequence_number: u64,
        content_type: ContentType,
        version: ProtocolVersion,
        content: &[u8],
        received: &[u8],
    ) -> Result<(), Error> {
        if received.len() != self.size() {
            return Err(Error::BadMac);
        }
        let matches = match self {
            &RecordMac::Sha1(ref hmac) => {
                let mut hmac = hmac.clone();
                Self::feed(&mut hmac, epoch, sequence_number, content_type, version, content);
                hmac.result() == MacResult::new(GenericArray::clone_from_slice(received))
            }
            &RecordMac::Sha256(ref hmac) => {
                let mut hmac = hmac.clone();
                Self::feed(&mut hmac, epoch, sequence_number, content_type, version, content);
                hmac.result() == MacResult::new(GenericArray::clone_from_slice(received))
            }
        };
        if matches {
            Ok(())
        } else {
            Err(Error::BadMac)
        }
    }
}

// A one-method trait so the seed feeding is written once while the two HMAC
// variants stay distinct types.
mod impl_feed {
    use hmac::{Hmac, Mac};
    use sha1::Sha1;
    use sha2::Sha256;

    pub trait Feed {
        fn feed(&mut self, data: &[u8]);
    }

    impl Feed for Hmac<Sha1> {
        fn feed(&mut self, data: &[u8]) {
            self.input(data);
        }
    }

    impl Feed for Hmac<Sha256> {
        fn feed(&mut self, data: &[u8]) {
            self.input(data);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wire::{ContentType, DTLS_1_0, TLS_DH_ANON_WITH_AES_128_CBC_SHA, TLS_NULL_WITH_NULL_NULL};

    #[test]
    fn catalog_lookup() {
        let suite = suite_by_id(TLS_DH_ANON_WITH_AES_128_CBC_SHA).unwrap();
        assert_eq!(suite.key_len, 16);
        assert_eq!(suite.mac_len, 20);
        assert!(!suite.signed_key_exchange);

        assert!(suite_by_id(TLS_NULL_WITH_NULL_NULL).is_none());
    }

    #[test]
    fn cbc_round_trip_and_iv_dependence() {
        let cipher = cipher_aes(&hex!("000102030405060708090a0b0c0d0e0f"));
        let iv = hex!("0f0e0d0c0b0a09080706050403020100");
        let plaintext = [0x42; 48];

        let mut data = plaintext;
        cipher.encrypt_cbc(&iv, &mut data);
        assert_ne!(&data[..], &plaintext[..]);

        let mut other = plaintext;
        cipher.encrypt_cbc(&[0; 16], &mut other);
        assert_ne!(&data[..], &other[..]);

        cipher.decrypt_cbc(&iv, &mut data);
        assert_eq!(&data[..], &plaintext[..]);
    }

    #[test]
    fn mac_covers_header_fields() {
        let mac = mac_sha1(b"0123456789abcdef0123");
        let reference = mac.compute(1, 2, ContentType::ApplicationData, DTLS_1_0, b"payload");
        assert_eq!(reference.len(), 20);

        assert!(mac
            .verify(1, 2, ContentType::ApplicationData, DTLS_1_0, b"payload", &reference)
            .is_ok());
        // Any change to the sealed fields must invalidate the MAC.
        assert!(mac
            .verify(2, 2, ContentType::ApplicationData, DTLS_1_0, b"payload", &reference)
            .is_err());
        assert!(mac
            .verify(1, 3, ContentType::ApplicationData, DTLS_1_0, b"payload", &reference)
            .is_err());
        assert!(mac
            .verify(1, 2, ContentType::Handshake, DTLS_1_0, b"payload", &reference)
            .is_err());
        assert!(mac
            .verify(1, 2, ContentType::ApplicationData, DTLS_1_0, b"payloae", &reference)
            .is_err());
    }

    #[test]
    fn epoch_and_sequence_share_the_seed() {
        let seed = RecordMac::seed(0x0102, 0x030405060708);
        assert_eq!(seed, hex!("0102030405060708"));
    }
}
