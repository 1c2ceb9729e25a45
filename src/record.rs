//! The record layer: framing, sequence numbering and the cryptographic
//! protection of one direction of a connection.
//!
//! Protection is MAC-then-encrypt: the MAC is appended to the plaintext,
//! the result padded to the block size and CBC-encrypted under a fresh
//! record IV. A ChangeCipherSpec record promotes the pending parameters of
//! the matching direction and opens the next epoch.

use std::collections::VecDeque;

use rand;
use wire;

use error::Error;
use suites::{RecordCipher, RecordMac, BLOCK_SIZE};
use transport::Transport;
use wire::{
    CompressionMethod, ContentType, ProtocolVersion, Reader, Record, RecordHeader,
    COMPRESSION_NULL,
};

const MAX_DATAGRAM_SIZE: usize = 64 * 1024;

/// The crypto state of one direction. Freshly negotiated parameters sit in
/// a pending slot until the ChangeCipherSpec record crosses the wire.
pub struct SecurityParameters {
    pub cipher: Option<RecordCipher>,
    pub mac: Option<RecordMac>,
    pub compression: CompressionMethod,
}

impl SecurityParameters {
    /// The null state every connection starts in.
    pub fn plaintext() -> Self {
        SecurityParameters {
            cipher: None,
            mac: None,
            compression: COMPRESSION_NULL,
        }
    }
}

pub struct RecordLayer<T: Transport> {
    transport: T,
    version: ProtocolVersion,

    current_read: SecurityParameters,
    pending_read: Option<SecurityParameters>,
    current_write: SecurityParameters,
    pending_write: Option<SecurityParameters>,

    write_epoch: u16,
    write_sequence: u64,
    read_epoch: u16,

    // Decrypted records waiting for delivery; a datagram can carry several.
    inbound: VecDeque<(ContentType, Vec<u8>)>,
}

impl<T: Transport> RecordLayer<T> {
    pub fn new(transport: T, version: ProtocolVersion) -> Self {
        RecordLayer {
            transport: transport,
            version: version,
            current_read: SecurityParameters::plaintext(),
            pending_read: None,
            current_write: SecurityParameters::plaintext(),
            pending_write: None,
            write_epoch: 0,
            write_sequence: 0,
            read_epoch: 0,
            inbound: VecDeque::new(),
        }
    }

    /// Stage freshly derived parameters; they take effect per direction when
    /// the corresponding ChangeCipherSpec is sent or received.
    pub fn set_pending(&mut self, read: SecurityParameters, write: SecurityParameters) {
        self.pending_read = Some(read);
        self.pending_write = Some(write);
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn close_transport(&mut self) {
        let _ = self.transport.close();
    }

    /// Protect and send one record in a single datagram.
    pub fn send_record(&mut self, content_type: ContentType, payload: &[u8]) -> Result<(), Error> {
        let epoch = self.write_epoch;
        let sequence = self.write_sequence;
        self.write_sequence += 1;

        let mut body = payload.to_vec();
        if let Some(ref mac) = self.current_write.mac {
            let tag = mac.compute(epoch, sequence, content_type, self.version, payload);
            body.extend_from_slice(&tag);
        }
        if let Some(ref cipher) = self.current_write.cipher {
            pad_to_block_size(&mut body, cipher.block_size());
            let iv: [u8; BLOCK_SIZE] = rand::random();
            cipher.encrypt_cbc(&iv, &mut body);
            let mut framed = Vec::with_capacity(iv.len() + body.len());
            framed.extend_from_slice(&iv);
            framed.extend_from_slice(&body);
            body = framed;
        }

        let mut datagram = Vec::with_capacity(13 + body.len());
        RecordHeader {
            content_type: content_type,
            version: self.version,
            epoch: epoch,
            sequence_number: sequence,
            length: body.len() as u16,
        }
        .write(&mut datagram);
        datagram.extend_from_slice(&body);

        trace!(
            "send record type={} epoch={} seq={} len={}",
            content_type,
            epoch,
            sequence,
            body.len()
        );
        self.transport.send(&datagram)?;

        if content_type == ContentType::ChangeCipherSpec {
            self.promote_write()?;
        }
        Ok(())
    }

    pub fn send_change_cipher_spec(&mut self) -> Result<(), Error> {
        self.send_record(ContentType::ChangeCipherSpec, &[1])
    }

    fn promote_write(&mut self) -> Result<(), Error> {
        match self.pending_write.take() {
            Some(pending) => {
                self.current_write = pending;
                self.write_epoch += 1;
                self.write_sequence = 0;
                Ok(())
            }
            None => Err(Error::UnexpectedRecord(ContentType::ChangeCipherSpec)),
        }
    }

    fn promote_read(&mut self) -> Result<(), Error> {
        match self.pending_read.take() {
            Some(pending) => {
                self.current_read = pending;
                self.read_epoch += 1;
                Ok(())
            }
            None => Err(Error::UnexpectedRecord(ContentType::ChangeCipherSpec)),
        }
    }

    /// Next record from the peer. Blocks on the transport when the queue is
    /// empty; ChangeCipherSpec records are consumed here and never surface.
    pub fn read_record(&mut self) -> Result<(ContentType, Vec<u8>), Error> {
        loop {
            if let Some(record) = self.inbound.pop_front() {
                return Ok(record);
            }
            let mut buf = [0; MAX_DATAGRAM_SIZE];
            let n = self.transport.recv(&mut buf)?;
            self.decode_datagram(&buf[..n])?;
        }
    }

    fn decode_datagram(&mut self, datagram: &[u8]) -> Result<(), Error> {
        let mut reader = Reader::new(datagram);
        while !reader.is_empty() {
            let record = Record::read(&mut reader).map_err(Error::Wire)?;
            trace!("recv {}", record);
            match record.content_type {
                ContentType::ChangeCipherSpec => {
                    if record.payload != [1] {
                        return Err(Error::Wire(wire::Error::MalformedRecord));
                    }
                    self.promote_read()?;
                }
                content_type => {
                    let plaintext = self.unprotect(&record)?;
                    self.inbound.push_back((content_type, plaintext));
                }
            }
        }
        Ok(())
    }

    // Undo CBC and the MAC of a received record, in that order.
    fn unprotect(&mut self, record: &Record) -> Result<Vec<u8>, Error> {
        let mut payload = record.payload.clone();

        if let Some(ref cipher) = self.current_read.cipher {
            let block_size = cipher.block_size();
            if payload.len() < 2 * block_size || payload.len() % block_size != 0 {
                return Err(Error::Wire(wire::Error::MalformedRecord));
            }
            let ciphertext = payload.split_off(block_size);
            let iv = payload;
            payload = ciphertext;
            cipher.decrypt_cbc(&iv, &mut payload);
            strip_padding(&mut payload)?;
        }

        if let Some(ref mac) = self.current_read.mac {
            if payload.len() < mac.size() {
                return Err(Error::BadMac);
            }
            let tag = payload.split_off(payload.len() - mac.size());
            mac.verify(
                record.epoch,
                record.sequence_number,
                record.content_type,
                record.version,
                &payload,
                &tag,
            )?;
        }

        Ok(payload)
    }
}

/// Append TLS block padding: `n + 1` trailing bytes, each of value `n`,
/// chosen so the buffer length becomes a multiple of `block_size`.
fn pad_to_block_size(buf: &mut Vec<u8>, block_size: usize) {
    let padding_length = block_size - 1 - buf.len() % block_size;
    for _ in 0..padding_length + 1 {
        buf.push(padding_length as u8);
    }
}

// Verify and remove the padding of a decrypted buffer.
fn strip_padding(buf: &mut Vec<u8>) -> Result<(), Error> {
    let padding_length = match buf.last() {
        Some(&last) => last as usize,
        None => return Err(Error::BadPadding),
    };
    if padding_length + 1 > buf.len() {
        return Err(Error::BadPadding);
    }
    let content_length = buf.len() - padding_length - 1;
    if buf[content_length..].iter().any(|&b| b as usize != padding_length) {
        return Err(Error::BadPadding);
    }
    buf.truncate(content_length);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use suites::suite_by_id;
    use transport::pipe;
    use wire::{ContentType, DTLS_1_0, TLS_DH_ANON_WITH_AES_128_CBC_SHA};

    fn protected_pair() -> (RecordLayer<pipe::Pipe>, RecordLayer<pipe::Pipe>) {
        let (left, right) = pipe::pair();
        let mut sender = RecordLayer::new(left, DTLS_1_0);
        let mut receiver = RecordLayer::new(right, DTLS_1_0);

        let suite = suite_by_id(TLS_DH_ANON_WITH_AES_128_CBC_SHA).unwrap();
        let key = hex!("4429aea63f088bdfbcc832a21d0520dd");
        let mac_key = [0x5a; 20];

        let protection = || SecurityParameters {
            cipher: Some(suite.cipher(&key)),
            mac: Some(suite.mac(&mac_key)),
            compression: ::wire::COMPRESSION_NULL,
        };
        sender.set_pending(protection(), protection());
        receiver.set_pending(protection(), protection());

        sender.send_change_cipher_spec().unwrap();
        // Drain the ChangeCipherSpec on the receiving side; queue stays
        // empty because the record never surfaces.
        let mut buf = [0; 2048];
        let n = receiver.transport.recv(&mut buf).unwrap();
        receiver.decode_datagram(&buf[..n]).unwrap();
        (sender, receiver)
    }

    #[test]
    fn plaintext_round_trip() {
        let (left, right) = pipe::pair();
        let mut sender = RecordLayer::new(left, DTLS_1_0);
        let mut receiver = RecordLayer::new(right, DTLS_1_0);

        sender
            .send_record(ContentType::ApplicationData, b"attack at dawn")
            .unwrap();
        let (content_type, payload) = receiver.read_record().unwrap();
        assert_eq!(content_type, ContentType::ApplicationData);
        assert_eq!(payload, b"attack at dawn");
    }

    #[test]
    fn sequence_numbers_increase_per_record() {
        let (left, right) = pipe::pair();
        let mut sender = RecordLayer::new(left, DTLS_1_0);
        let mut receiver = RecordLayer::new(right, DTLS_1_0);

        for _ in 0..3 {
            sender.send_record(ContentType::ApplicationData, b"x").unwrap();
        }
        assert_eq!(sender.write_sequence, 3);
        for _ in 0..3 {
            receiver.read_record().unwrap();
        }
    }

    #[test]
    fn change_cipher_spec_opens_a_new_epoch() {
        let (sender, receiver) = protected_pair();
        assert_eq!(sender.write_epoch, 1);
        assert_eq!(sender.write_sequence, 0);
        assert_eq!(receiver.read_epoch, 1);
        assert!(sender.pending_write.is_none());
        assert!(receiver.pending_read.is_none());
    }

    #[test]
    fn encrypted_round_trip() {
        let (mut sender, mut receiver) = protected_pair();
        sender
            .send_record(ContentType::ApplicationData, b"attack at dawn")
            .unwrap();
        let (content_type, payload) = receiver.read_record().unwrap();
        assert_eq!(content_type, ContentType::ApplicationData);
        assert_eq!(payload, b"attack at dawn");
    }

    #[test]
    fn tampered_record_fails_verification() {
        let (mut sender, mut receiver) = protected_pair();
        sender
            .send_record(ContentType::ApplicationData, b"attack at dawn")
            .unwrap();
        let mut buf = [0; 2048];
        let n = receiver.transport.recv(&mut buf).unwrap();
        // Flip one bit in the ciphertext body.
        buf[20] ^= 0x01;
        let result = receiver.decode_datagram(&buf[..n]);
        match result {
            Err(Error::BadMac) | Err(Error::BadPadding) => {}
            other => panic!("tampering went unnoticed: {:?}", other),
        }
    }

    #[test]
    fn padding_vector() {
        let mut buf =
            hex!("1400000c000300000000000c34f515344a87344e69bc3275b3faa0f20791e46dfeb410edefb283add5aa2867")
                .to_vec();
        pad_to_block_size(&mut buf, 16);
        assert_eq!(buf.len() % 16, 0);
        assert_eq!(&buf[buf.len() - 4..], &hex!("03030303"));
    }

    #[test]
    fn embedded_encryption_vector() {
        let key = hex!("4429aea63f088bdfbcc832a21d0520dd");
        let iv = hex!("156456914959a31c6cc84b25842d8a1c");
        let payload =
            hex!("1400000c000300000000000c34f515344a87344e69bc3275b3faa0f20791e46dfeb410edefb283add5aa2867");
        let expected =
            hex!("156456914959a31c6cc84b25842d8a1c10535e811aeb930fb7975847bb3ec015dd10e7af381f78d12f4d9fccd7ff025cd19000530d2808c8cc8e3657215ce605");

        let suite = suite_by_id(TLS_DH_ANON_WITH_AES_128_CBC_SHA).unwrap();
        let cipher = suite.cipher(&key);

        let mut buf = payload.to_vec();
        pad_to_block_size(&mut buf, 16);
        cipher.encrypt_cbc(&iv, &mut buf);

        let mut framed = iv.to_vec();
        framed.extend_from_slice(&buf);
        assert_eq!(framed, expected.to_vec());
    }

    #[test]
    fn padding_length_is_bounded() {
        // A buffer shorter than its claimed padding must be rejected.
        let mut buf = vec![0x10, 0x20, 0xff];
        assert!(strip_padding(&mut buf).is_err());

        // Inconsistent padding bytes as well.
        let mut buf = vec![1, 2, 3, 0x02, 0x01, 0x02];
        assert!(strip_padding(&mut buf).is_err());

        // Well formed padding is removed.
        let mut buf = vec![1, 2, 3, 0x02, 0x02, 0x02];
        strip_padding(&mut buf).unwrap();
        assert_eq!(buf, vec![1, 2, 3]);
    }
}
