use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use hex;
use rand;

use bytes::{Reader, Writer};
use error::Error;

/// The 32-byte hello random: a timestamp followed by 28 opaque bytes from the
/// process RNG.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Random {
    pub gmt_unix_time: u32,
    pub opaque: [u8; 28],
}

impl Random {
    pub fn generate() -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(0);
        Random {
            gmt_unix_time: now,
            opaque: rand::random(),
        }
    }

    pub fn read(reader: &mut Reader) -> Result<Self, Error> {
        let gmt_unix_time = reader.u32()?;
        let mut opaque = [0; 28];
        opaque.copy_from_slice(reader.take(28)?);
        Ok(Random {
            gmt_unix_time: gmt_unix_time,
            opaque: opaque,
        })
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.put_u32(self.gmt_unix_time);
        out.put_slice(&self.opaque);
    }

    /// The on-wire form, used as PRF seed material.
    pub fn bytes(&self) -> [u8; 32] {
        let mut b = [0; 32];
        b[0] = (self.gmt_unix_time >> 24) as u8;
        b[1] = (self.gmt_unix_time >> 16) as u8;
        b[2] = (self.gmt_unix_time >> 8) as u8;
        b[3] = self.gmt_unix_time as u8;
        b[4..].copy_from_slice(&self.opaque);
        b
    }
}

impl fmt::Debug for Random {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Random {{ time: {}, opaque: {} }}",
            self.gmt_unix_time,
            hex::encode(&self.opaque[..])
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Random;
    use bytes::Reader;

    #[test]
    fn round_trip() {
        let random = Random::generate();
        let bytes = random.bytes();

        let mut reader = Reader::new(&bytes);
        let decoded = Random::read(&mut reader).unwrap();
        assert_eq!(decoded, random);

        let mut written = Vec::new();
        random.write(&mut written);
        assert_eq!(&written[..], &bytes[..]);
    }

    #[test]
    fn generate_is_fresh() {
        // Two draws must differ in the opaque part.
        let a = Random::generate();
        let b = Random::generate();
        assert_ne!(a.opaque, b.opaque);
    }
}
