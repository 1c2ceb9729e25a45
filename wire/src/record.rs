use std::fmt;

use bytes::{Reader, Writer};
use error::Error;

/// Size of the record header on the wire:
/// type (1) | version (2) | epoch (2) | sequence number (6) | length (2).
pub const RECORD_HEADER_SIZE: usize = 13;

/// Upper bound for a record body. Bodies are length-prefixed with a u16 and a
/// datagram cannot carry more anyway.
pub const MAX_RECORD_PAYLOAD: usize = 1 << 14;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    ChangeCipherSpec = 20,
    Alert = 21,
    Handshake = 22,
    ApplicationData = 23,
}

impl ContentType {
    pub fn from_byte(b: u8) -> Result<Self, Error> {
        match b {
            20 => Ok(ContentType::ChangeCipherSpec),
            21 => Ok(ContentType::Alert),
            22 => Ok(ContentType::Handshake),
            23 => Ok(ContentType::ApplicationData),
            other => Err(Error::UnknownContentType(other)),
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            ContentType::ChangeCipherSpec => "ChangeCipherSpec",
            ContentType::Alert => "Alert",
            ContentType::Handshake => "Handshake",
            ContentType::ApplicationData => "ApplicationData",
        };
        write!(f, "{}", name)
    }
}

/// The `{254, 255}` style version pair. The DTLS versions are the one's
/// complement of the TLS ones, so "newer" compares lower byte-wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolVersion {
    pub major: u8,
    pub minor: u8,
}

pub const DTLS_1_0: ProtocolVersion = ProtocolVersion {
    major: 254,
    minor: 255,
};

pub const DTLS_1_2: ProtocolVersion = ProtocolVersion {
    major: 254,
    minor: 253,
};

impl ProtocolVersion {
    pub fn read(reader: &mut Reader) -> Result<Self, Error> {
        let major = reader.u8()?;
        let minor = reader.u8()?;
        let version = ProtocolVersion {
            major: major,
            minor: minor,
        };
        match version {
            DTLS_1_0 | DTLS_1_2 => Ok(version),
            _ => Err(Error::UnsupportedVersion(major, minor)),
        }
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.put_u8(self.major);
        out.put_u8(self.minor);
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DTLS_1_0 => write!(f, "1.0"),
            DTLS_1_2 => write!(f, "1.2"),
            _ => write!(f, "x.x"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub content_type: ContentType,
    pub version: ProtocolVersion,
    pub epoch: u16,
    pub sequence_number: u64,
    pub length: u16,
}

impl RecordHeader {
    pub fn read(reader: &mut Reader) -> Result<Self, Error> {
        if reader.remaining() < RECORD_HEADER_SIZE {
            return Err(Error::MalformedRecord);
        }
        let content_type = ContentType::from_byte(reader.u8()?)?;
        let version = ProtocolVersion::read(reader)?;
        Ok(RecordHeader {
            content_type: content_type,
            version: version,
            epoch: reader.u16()?,
            sequence_number: reader.u48()?,
            length: reader.u16()?,
        })
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.put_u8(self.content_type as u8);
        self.version.write(out);
        out.put_u16(self.epoch);
        out.put_u48(self.sequence_number);
        out.put_u16(self.length);
    }
}

/// One framed record. `payload` is whatever sits behind the header: plaintext
/// before protection is installed, IV plus ciphertext after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub content_type: ContentType,
    pub version: ProtocolVersion,
    pub epoch: u16,
    pub sequence_number: u64,
    pub payload: Vec<u8>,
}

impl Record {
    /// Decode the next record out of a datagram. A datagram may carry several
    /// records back to back; call this until the reader is exhausted.
    pub fn read(reader: &mut Reader) -> Result<Self, Error> {
        let header = RecordHeader::read(reader)?;
        let payload = reader
            .take(header.length as usize)
            .map_err(|_| Error::MalformedRecord)?;
        Ok(Record {
            content_type: header.content_type,
            version: header.version,
            epoch: header.epoch,
            sequence_number: header.sequence_number,
            payload: payload.to_vec(),
        })
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        RecordHeader {
            content_type: self.content_type,
            version: self.version,
            epoch: self.epoch,
            sequence_number: self.sequence_number,
            length: self.payload.len() as u16,
        }
        .write(out);
        out.put_slice(&self.payload);
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Record {{ type: {}, version: {}, epoch: {}, sequence: {}, length: {} }}",
            self.content_type,
            self.version,
            self.epoch,
            self.sequence_number,
            self.payload.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Reader;
    use error::Error;

    #[test]
    fn build_record_header() {
        let header = RecordHeader {
            content_type: ContentType::Handshake,
            version: DTLS_1_0,
            epoch: 1,
            sequence_number: 4,
            length: 82,
        };
        let mut out = Vec::new();
        header.write(&mut out);
        assert_eq!(out, hex!("16feff00010000000000040052"));
    }

    #[test]
    fn read_record_round_trip() {
        let record = Record {
            content_type: ContentType::ApplicationData,
            version: DTLS_1_2,
            epoch: 3,
            sequence_number: 0x0000_0001_0002,
            payload: b"hello".to_vec(),
        };
        let mut out = Vec::new();
        record.write(&mut out);

        let mut reader = Reader::new(&out);
        assert_eq!(Record::read(&mut reader).unwrap(), record);
        assert!(reader.is_empty());
    }

    #[test]
    fn two_records_in_one_datagram() {
        let first = Record {
            content_type: ContentType::Handshake,
            version: DTLS_1_0,
            epoch: 0,
            sequence_number: 0,
            payload: vec![1, 2, 3],
        };
        let second = Record {
            content_type: ContentType::ChangeCipherSpec,
            version: DTLS_1_0,
            epoch: 0,
            sequence_number: 1,
            payload: vec![1],
        };
        let mut datagram = Vec::new();
        first.write(&mut datagram);
        second.write(&mut datagram);

        let mut reader = Reader::new(&datagram);
        assert_eq!(Record::read(&mut reader).unwrap(), first);
        assert_eq!(Record::read(&mut reader).unwrap(), second);
        assert!(reader.is_empty());
    }

    #[test]
    fn reject_truncated_record() {
        let mut datagram = Vec::new();
        Record {
            content_type: ContentType::Handshake,
            version: DTLS_1_0,
            epoch: 0,
            sequence_number: 0,
            payload: vec![0; 32],
        }
        .write(&mut datagram);
        // Cut the body short: the header claims 32 bytes of payload.
        datagram.truncate(20);

        let mut reader = Reader::new(&datagram);
        assert_eq!(Record::read(&mut reader), Err(Error::MalformedRecord));
    }

    #[test]
    fn reject_unknown_content_type() {
        let mut reader = Reader::new(&hex!("2ffeff00000000000000000000"));
        assert_eq!(
            Record::read(&mut reader),
            Err(Error::UnknownContentType(0x2f))
        );
    }

    #[test]
    fn reject_unknown_version() {
        let mut reader = Reader::new(&hex!("16030300000000000000000000"));
        assert_eq!(
            Record::read(&mut reader),
            Err(Error::UnsupportedVersion(3, 3))
        );
    }
}
