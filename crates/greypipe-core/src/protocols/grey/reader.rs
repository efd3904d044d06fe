use super::layout;

/// Why a structural match attempt stopped before completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stall {
    /// The buffer ran out while the grammar could still match.
    Incomplete,
    /// The bytes at the cursor cannot match.
    Mismatch,
}

pub(crate) struct HeaderCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> HeaderCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    fn peek(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    pub fn expect_byte(&mut self, expected: u8) -> Result<(), Stall> {
        match self.peek() {
            None => Err(Stall::Incomplete),
            Some(b) if b == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => Err(Stall::Mismatch),
        }
    }

    pub fn expect_literal(&mut self, literal: &[u8]) -> Result<(), Stall> {
        for &expected in literal {
            self.expect_byte(expected)?;
        }
        Ok(())
    }

    /// Consume a non-empty decimal digit run. A run that extends to the end
    /// of the buffer is returned as-is; the following delimiter expectation
    /// reports `Incomplete` there, so an unfinished run never completes a
    /// match.
    pub fn read_digits(&mut self) -> Result<&'a [u8], Stall> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if !b.is_ascii_digit() {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(match self.peek() {
                None => Stall::Incomplete,
                Some(_) => Stall::Mismatch,
            });
        }
        Ok(&self.buf[start..self.pos])
    }

    pub fn read_lower_letter(&mut self) -> Result<u8, Stall> {
        match self.peek() {
            None => Err(Stall::Incomplete),
            Some(b) if b.is_ascii_lowercase() => {
                self.pos += 1;
                Ok(b)
            }
            Some(_) => Err(Stall::Mismatch),
        }
    }
}

/// Byte access into one frame segment. The caller guarantees the segment is
/// at least `layout::MIN_SEGMENT_SIZE` bytes long.
pub(crate) struct SegmentReader<'a> {
    segment: &'a [u8],
}

impl<'a> SegmentReader<'a> {
    pub fn new(segment: &'a [u8]) -> Self {
        debug_assert!(segment.len() >= layout::MIN_SEGMENT_SIZE);
        Self { segment }
    }

    pub fn universe_number(&self) -> u16 {
        let bytes = &self.segment[layout::UNIVERSE_NUMBER_RANGE];
        u16::from_le_bytes([bytes[0], bytes[1]])
    }

    pub fn channel_data(&self) -> &'a [u8] {
        &self.segment[layout::UNIVERSE_NUMBER_RANGE.end..]
    }
}

#[cfg(test)]
mod tests {
    use super::{HeaderCursor, SegmentReader, Stall};

    #[test]
    fn expect_literal_consumes_match() {
        let mut cursor = HeaderCursor::new(b"GREY W5");
        assert_eq!(cursor.expect_literal(b"GREY W"), Ok(()));
        assert_eq!(cursor.pos(), 6);
    }

    #[test]
    fn expect_literal_incomplete_at_end() {
        let mut cursor = HeaderCursor::new(b"GRE");
        assert_eq!(cursor.expect_literal(b"GREY W"), Err(Stall::Incomplete));
    }

    #[test]
    fn expect_literal_mismatch() {
        let mut cursor = HeaderCursor::new(b"GRAY W");
        assert_eq!(cursor.expect_literal(b"GREY W"), Err(Stall::Mismatch));
    }

    #[test]
    fn read_digits_stops_at_delimiter() {
        let mut cursor = HeaderCursor::new(b"0042 H");
        assert_eq!(cursor.read_digits(), Ok(&b"0042"[..]));
        assert_eq!(cursor.pos(), 4);
    }

    #[test]
    fn read_digits_requires_at_least_one() {
        let mut cursor = HeaderCursor::new(b" H1");
        assert_eq!(cursor.read_digits(), Err(Stall::Mismatch));
        let mut cursor = HeaderCursor::new(b"");
        assert_eq!(cursor.read_digits(), Err(Stall::Incomplete));
    }

    #[test]
    fn read_lower_letter_rejects_upper() {
        let mut cursor = HeaderCursor::new(b"P");
        assert_eq!(cursor.read_lower_letter(), Err(Stall::Mismatch));
        let mut cursor = HeaderCursor::new(b"p");
        assert_eq!(cursor.read_lower_letter(), Ok(b'p'));
    }

    #[test]
    fn segment_reader_decodes_little_endian_number() {
        let segment = [0x34, 0x12, 0xaa, 0xbb];
        let reader = SegmentReader::new(&segment);
        assert_eq!(reader.universe_number(), 0x1234);
        assert_eq!(reader.channel_data(), &[0xaa, 0xbb]);
    }
}
