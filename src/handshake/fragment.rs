//! Reassembly of one handshake message from its fragments.

use error::Error;
use wire::handshake::{Handshake, HandshakeType};

/// All fragments seen so far for one `message_seq`, kept sorted by offset.
/// Fragments may overlap; the list is complete once they cover the whole
/// message without a gap.
pub struct FragmentList {
    msg_type: HandshakeType,
    length: u32,
    message_seq: u16,
    fragments: Vec<Handshake>,
}

impl FragmentList {
    pub fn new(first: Handshake) -> Self {
        FragmentList {
            msg_type: first.msg_type,
            length: first.length,
            message_seq: first.message_seq,
            fragments: vec![first],
        }
    }

    /// Insert another fragment. It must agree with the list about what
    /// message it belongs to.
    pub fn insert(&mut self, fragment: Handshake) -> Result<(), Error> {
        if fragment.msg_type != self.msg_type
            || fragment.length != self.length
            || fragment.message_seq != self.message_seq
        {
            return Err(Error::FragmentMismatch);
        }
        let position = self
            .fragments
            .iter()
            .position(|f| f.fragment_offset > fragment.fragment_offset)
            .unwrap_or(self.fragments.len());
        self.fragments.insert(position, fragment);
        Ok(())
    }

    /// True once the sorted fragments cover `[0, length)` contiguously.
    pub fn is_complete(&self) -> bool {
        let mut covered = 0;
        for fragment in &self.fragments {
            if fragment.fragment_offset > covered {
                return false;
            }
            covered = covered.max(fragment.fragment_offset + fragment.fragment_length);
        }
        covered == self.length
    }

    /// Stitch the fragments into one unfragmented message. Only meaningful
    /// once the list is complete.
    pub fn assemble(&self) -> Handshake {
        let mut body = vec![0; self.length as usize];
        for fragment in &self.fragments {
            let offset = fragment.fragment_offset as usize;
            body[offset..offset + fragment.fragment.len()].copy_from_slice(&fragment.fragment);
        }
        Handshake::unfragmented(self.msg_type, self.message_seq, body)
    }
}

#[cfg(test)]
mod tests {
    use super::FragmentList;
    use wire::handshake::{Handshake, HandshakeType};

    fn fragment(offset: u32, bytes: Vec<u8>) -> Handshake {
        Handshake {
            msg_type: HandshakeType::ServerKeyExchange,
            length: 30,
            message_seq: 2,
            fragment_offset: offset,
            fragment_length: bytes.len() as u32,
            fragment: bytes,
        }
    }

    #[test]
    fn out_of_order_reassembly() {
        let h1 = fragment(0, (0..15).collect());
        let h2 = fragment(20, (20..25).collect());
        let h3 = fragment(10, (10..20).collect());
        let h4 = fragment(25, (25..30).collect());

        let mut list = FragmentList::new(h1);
        list.insert(h2).unwrap();
        assert!(!list.is_complete());
        list.insert(h3).unwrap();
        assert!(!list.is_complete());
        list.insert(h4).unwrap();
        assert!(list.is_complete());

        let assembled = list.assemble();
        assert_eq!(assembled.msg_type, HandshakeType::ServerKeyExchange);
        assert_eq!(assembled.length, 30);
        assert_eq!(assembled.message_seq, 2);
        assert_eq!(assembled.fragment_offset, 0);
        assert_eq!(assembled.fragment_length, 30);
        assert_eq!(assembled.fragment, (0..30).collect::<Vec<u8>>());
        assert!(!assembled.is_fragmented());
    }

    #[test]
    fn overlapping_fragments_are_fine() {
        let mut list = FragmentList::new(fragment(0, (0..20).collect()));
        list.insert(fragment(10, (10..30).collect())).unwrap();
        assert!(list.is_complete());
        assert_eq!(list.assemble().fragment, (0..30).collect::<Vec<u8>>());
    }

    #[test]
    fn gaps_leave_the_list_incomplete() {
        let mut list = FragmentList::new(fragment(0, (0..10).collect()));
        list.insert(fragment(20, (20..30).collect())).unwrap();
        assert!(!list.is_complete());
    }

    #[test]
    fn incompatible_fragments_are_rejected() {
        let mut list = FragmentList::new(fragment(0, (0..10).collect()));

        let mut wrong_type = fragment(10, (10..20).collect());
        wrong_type.msg_type = HandshakeType::Certificate;
        assert!(list.insert(wrong_type).is_err());

        let mut wrong_length = fragment(10, (10..20).collect());
        wrong_length.length = 40;
        assert!(list.insert(wrong_length).is_err());

        let mut wrong_seq = fragment(10, (10..20).collect());
        wrong_seq.message_seq = 3;
        assert!(list.insert(wrong_seq).is_err());
    }
}
