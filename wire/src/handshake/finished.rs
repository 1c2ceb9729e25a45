use std::fmt;

use hex;

use bytes::{Reader, Writer};
use error::Error;

/// Finished body. The verify data is the whole remaining fragment; its
/// length is pinned by the PRF output, not by an explicit prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finished {
    pub verify_data: Vec<u8>,
}

impl Finished {
    pub fn read(reader: &mut Reader) -> Result<Self, Error> {
        let verify_data = reader.rest().to_vec();
        if verify_data.is_empty() {
            return Err(Error::MalformedHandshake);
        }
        Ok(Finished {
            verify_data: verify_data,
        })
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.put_slice(&self.verify_data);
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.verify_data.clone()
    }
}

impl fmt::Display for Finished {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Finished {{ verify_data: {} }}", hex::encode(&self.verify_data))
    }
}

#[cfg(test)]
mod tests {
    use super::Finished;
    use bytes::Reader;
    use error::Error;

    #[test]
    fn reads_whole_fragment() {
        let bytes = hex!("34f515344a87344e69bc3275");
        let finished = Finished::read(&mut Reader::new(&bytes)).unwrap();
        assert_eq!(finished.verify_data, bytes.to_vec());
    }

    #[test]
    fn empty_fragment_is_invalid() {
        assert_eq!(
            Finished::read(&mut Reader::new(&[])),
            Err(Error::MalformedHandshake)
        );
    }
}
