use super::error::HeaderError;
use super::layout;
use super::reader::{HeaderCursor, SegmentReader, Stall};

/// Frame geometry announced by a stream header. Immutable once constructed;
/// a later header replaces the value wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryHeader {
    universe_count: usize,
    segment_size: usize,
}

impl GeometryHeader {
    pub fn new(universe_count: usize, segment_size: usize) -> Result<Self, HeaderError> {
        if universe_count < layout::MIN_UNIVERSES {
            return Err(HeaderError::InvalidUniverseCount {
                count: universe_count,
            });
        }
        if segment_size < layout::MIN_SEGMENT_SIZE {
            return Err(HeaderError::InvalidSegmentSize { size: segment_size });
        }
        if universe_count.checked_mul(segment_size).is_none() {
            return Err(HeaderError::FrameLengthOverflow {
                universes: universe_count,
                segment_size,
            });
        }
        Ok(Self {
            universe_count,
            segment_size,
        })
    }

    pub fn universe_count(&self) -> usize {
        self.universe_count
    }

    pub fn segment_size(&self) -> usize {
        self.segment_size
    }

    /// Exact byte length of one frame under this geometry. The product is
    /// checked at construction, so the derived value never overflows.
    pub fn frame_length(&self) -> usize {
        self.universe_count * self.segment_size
    }
}

/// One decoded universe record: little-endian 16-bit number followed by the
/// segment's channel bytes, order preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Universe {
    pub number: u16,
    pub data: Vec<u8>,
}

/// Outcome of a header match attempt at the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderMatch {
    /// A complete header occupies the first `len` bytes.
    Matched { header: GeometryHeader, len: usize },
    /// The buffer is a valid proper prefix of a header; more bytes are
    /// needed to decide.
    Incomplete,
    /// The bytes at the cursor cannot begin a header.
    No,
}

/// Outcome of scanning a buffer for a header anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderScan {
    /// Earliest complete header: starts at `start`, ends at `end`.
    Matched {
        header: GeometryHeader,
        start: usize,
        end: usize,
    },
    /// A header may begin at `start`; everything before it is skippable.
    Pending { start: usize },
    /// No header can begin anywhere in the buffer.
    None,
}

pub fn match_header_at(buf: &[u8]) -> Result<HeaderMatch, HeaderError> {
    let mut cursor = HeaderCursor::new(buf);
    let (size_digits, universe_digits) = match match_structure(&mut cursor) {
        Ok(fields) => fields,
        Err(Stall::Incomplete) => return Ok(HeaderMatch::Incomplete),
        Err(Stall::Mismatch) => return Ok(HeaderMatch::No),
    };

    let segment_size = parse_decimal(size_digits).ok_or_else(|| HeaderError::SegmentSizeOverflow {
        digits: String::from_utf8_lossy(size_digits).into_owned(),
    })?;
    let universe_count =
        parse_decimal(universe_digits).ok_or_else(|| HeaderError::UniverseCountOverflow {
            digits: String::from_utf8_lossy(universe_digits).into_owned(),
        })?;

    let header = GeometryHeader::new(universe_count, segment_size)?;
    Ok(HeaderMatch::Matched {
        header,
        len: cursor.pos(),
    })
}

/// Structural pass over `GREY W<uint> H<uint> F<uint>:<uint> I<letter>
/// A<uint>:<uint>\n`. Returns the `W` and `H` digit runs; the remaining
/// fields are required by the grammar but carry no meaning here.
fn match_structure<'a>(cursor: &mut HeaderCursor<'a>) -> Result<(&'a [u8], &'a [u8]), Stall> {
    cursor.expect_literal(layout::HEADER_TAG)?;
    let size_digits = cursor.read_digits()?;
    cursor.expect_literal(layout::UNIVERSES_PREFIX)?;
    let universe_digits = cursor.read_digits()?;
    cursor.expect_literal(layout::RATE_PREFIX)?;
    cursor.read_digits()?;
    cursor.expect_byte(layout::RATIO_SEPARATOR)?;
    cursor.read_digits()?;
    cursor.expect_literal(layout::INTERLACE_PREFIX)?;
    cursor.read_lower_letter()?;
    cursor.expect_literal(layout::ASPECT_PREFIX)?;
    cursor.read_digits()?;
    cursor.expect_byte(layout::RATIO_SEPARATOR)?;
    cursor.read_digits()?;
    cursor.expect_byte(layout::TERMINATOR)?;
    Ok((size_digits, universe_digits))
}

fn parse_decimal(digits: &[u8]) -> Option<usize> {
    let mut value = 0usize;
    for &b in digits {
        value = value
            .checked_mul(10)?
            .checked_add(usize::from(b - b'0'))?;
    }
    Some(value)
}

pub fn scan_header(buf: &[u8]) -> Result<HeaderScan, HeaderError> {
    for start in 0..buf.len() {
        match match_header_at(&buf[start..])? {
            HeaderMatch::Matched { header, len } => {
                return Ok(HeaderScan::Matched {
                    header,
                    start,
                    end: start + len,
                });
            }
            // A valid prefix runs to the end of the buffer without hitting
            // the terminator, so no later position can hold a complete
            // header either.
            HeaderMatch::Incomplete => return Ok(HeaderScan::Pending { start }),
            HeaderMatch::No => {}
        }
    }
    Ok(HeaderScan::None)
}

/// Split one frame into its universe records, segment order preserved.
/// `frame` must be exactly `header.frame_length()` bytes; anything else is a
/// caller bug, not a stream condition.
pub fn decode_frame(header: &GeometryHeader, frame: &[u8]) -> Vec<Universe> {
    debug_assert_eq!(frame.len(), header.frame_length());
    frame
        .chunks_exact(header.segment_size())
        .map(|segment| {
            let reader = SegmentReader::new(segment);
            Universe {
                number: reader.universe_number(),
                data: reader.channel_data().to_vec(),
            }
        })
        .collect()
}
