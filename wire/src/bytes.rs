use byteorder::{BigEndian, ByteOrder};

use error::Error;

/// A bounded big-endian reader over a borrowed buffer. Every accessor checks
/// the remaining length and fails with `Error::Truncated` instead of slicing
/// out of bounds, so callers can lean on `?` while walking untrusted input.
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Reader { buf: buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Carve the next `n` bytes out of the buffer.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], Error> {
        if self.remaining() < n {
            return Err(Error::Truncated);
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Consume everything that is left.
    pub fn rest(&mut self) -> &'a [u8] {
        let slice = &self.buf[self.pos..];
        self.pos = self.buf.len();
        slice
    }

    pub fn u8(&mut self) -> Result<u8, Error> {
        Ok(self.take(1)?[0])
    }

    pub fn u16(&mut self) -> Result<u16, Error> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    pub fn u24(&mut self) -> Result<u32, Error> {
        Ok(BigEndian::read_u24(self.take(3)?))
    }

    pub fn u32(&mut self) -> Result<u32, Error> {
        Ok(BigEndian::read_u32(self.take(4)?))
    }

    pub fn u48(&mut self) -> Result<u64, Error> {
        Ok(BigEndian::read_u48(self.take(6)?))
    }

    /// A `u8` length prefix followed by that many bytes.
    pub fn vec8(&mut self) -> Result<Vec<u8>, Error> {
        let len = self.u8()? as usize;
        Ok(self.take(len)?.to_vec())
    }

    /// A `u16` length prefix followed by that many bytes.
    pub fn vec16(&mut self) -> Result<Vec<u8>, Error> {
        let len = self.u16()? as usize;
        Ok(self.take(len)?.to_vec())
    }
}

/// Big-endian append-only writer. The odd sizes (u24, u48) are the reason
/// this exists instead of using `byteorder`'s `io::Write` extension directly.
pub trait Writer {
    fn put_u8(&mut self, v: u8);
    fn put_u16(&mut self, v: u16);
    fn put_u24(&mut self, v: u32);
    fn put_u32(&mut self, v: u32);
    fn put_u48(&mut self, v: u64);
    fn put_slice(&mut self, v: &[u8]);
    fn put_vec8(&mut self, v: &[u8]);
    fn put_vec16(&mut self, v: &[u8]);
}

impl Writer for Vec<u8> {
    fn put_u8(&mut self, v: u8) {
        self.push(v);
    }

    fn put_u16(&mut self, v: u16) {
        let mut b = [0; 2];
        BigEndian::write_u16(&mut b, v);
        self.extend_from_slice(&b);
    }

    fn put_u24(&mut self, v: u32) {
        let mut b = [0; 3];
        BigEndian::write_u24(&mut b, v);
        self.extend_from_slice(&b);
    }

    fn put_u32(&mut self, v: u32) {
        let mut b = [0; 4];
        BigEndian::write_u32(&mut b, v);
        self.extend_from_slice(&b);
    }

    fn put_u48(&mut self, v: u64) {
        let mut b = [0; 6];
        BigEndian::write_u48(&mut b, v);
        self.extend_from_slice(&b);
    }

    fn put_slice(&mut self, v: &[u8]) {
        self.extend_from_slice(v);
    }

    fn put_vec8(&mut self, v: &[u8]) {
        self.put_u8(v.len() as u8);
        self.extend_from_slice(v);
    }

    fn put_vec16(&mut self, v: &[u8]) {
        self.put_u16(v.len() as u16);
        self.extend_from_slice(v);
    }
}

#[cfg(test)]
mod tests {
    use super::{Reader, Writer};
    use error::Error;

    #[test]
    fn round_trip_odd_widths() {
        let mut buf = Vec::new();
        buf.put_u24(0x01_02_03);
        buf.put_u48(0x0a_0b_0c_0d_0e_0f);
        buf.put_u16(0xbeef);
        assert_eq!(buf, hex!("0102030a0b0c0d0e0fbeef"));

        let mut reader = Reader::new(&buf);
        assert_eq!(reader.u24().unwrap(), 0x01_02_03);
        assert_eq!(reader.u48().unwrap(), 0x0a_0b_0c_0d_0e_0f);
        assert_eq!(reader.u16().unwrap(), 0xbeef);
        assert!(reader.is_empty());
    }

    #[test]
    fn take_is_bounded() {
        let mut reader = Reader::new(&[1, 2, 3]);
        assert_eq!(reader.take(2).unwrap(), &[1, 2]);
        assert_eq!(reader.take(2), Err(Error::Truncated));
        // The failed take must not have consumed anything.
        assert_eq!(reader.take(1).unwrap(), &[3]);
    }

    #[test]
    fn length_prefixed_vectors() {
        let mut buf = Vec::new();
        buf.put_vec8(&[0xaa, 0xbb]);
        buf.put_vec16(&[0xcc]);
        assert_eq!(buf, hex!("02aabb0001cc"));

        let mut reader = Reader::new(&buf);
        assert_eq!(reader.vec8().unwrap(), vec![0xaa, 0xbb]);
        assert_eq!(reader.vec16().unwrap(), vec![0xcc]);
    }
}
