use std::io::Read;

use crate::protocols::grey::{
    GeometryHeader, HeaderMatch, HeaderScan, match_header_at, scan_header,
};

use super::RelayError;
use super::buffer::StreamBuffer;

/// One step of stream progress. Frames carry the geometry they were read
/// under, so a later header replacement can never reinterpret them.
#[derive(Debug)]
pub(crate) enum StreamEvent {
    HeaderMatched(GeometryHeader),
    FrameMatched(GeometryHeader, Vec<u8>),
}

/// The stream state machine. `geometry` is the single piece of state:
/// absent until the first header matches (awaiting), then always the most
/// recent header (streaming). Driven purely by stream content.
pub(crate) struct StreamMachine {
    geometry: Option<GeometryHeader>,
}

impl StreamMachine {
    pub fn new() -> Self {
        Self { geometry: None }
    }

    pub fn geometry(&self) -> Option<&GeometryHeader> {
        self.geometry.as_ref()
    }

    /// Pull the next event out of the stream. `None` means the stream ended
    /// cleanly, from either state; partial trailing input is discarded.
    pub fn next_event<R: Read>(
        &mut self,
        buffer: &mut StreamBuffer<R>,
    ) -> Result<Option<StreamEvent>, RelayError> {
        match self.geometry {
            None => self.await_header(buffer),
            Some(geometry) => self.next_with_geometry(buffer, geometry),
        }
    }

    /// Awaiting state: scan anywhere in the accumulated bytes, discarding
    /// whatever precedes the first header.
    fn await_header<R: Read>(
        &mut self,
        buffer: &mut StreamBuffer<R>,
    ) -> Result<Option<StreamEvent>, RelayError> {
        loop {
            match scan_header(buffer.data())? {
                HeaderScan::Matched { header, end, .. } => {
                    buffer.consume(end);
                    self.geometry = Some(header);
                    return Ok(Some(StreamEvent::HeaderMatched(header)));
                }
                HeaderScan::Pending { start } => buffer.consume(start),
                HeaderScan::None => {
                    let len = buffer.len();
                    buffer.consume(len);
                }
            }
            if !buffer.fill_more()? {
                return Ok(None);
            }
        }
    }

    /// Streaming state: the header alternative is checked at the cursor
    /// first; only a definite non-header lets the fixed-length frame
    /// alternative consume bytes.
    fn next_with_geometry<R: Read>(
        &mut self,
        buffer: &mut StreamBuffer<R>,
        geometry: GeometryHeader,
    ) -> Result<Option<StreamEvent>, RelayError> {
        let frame_length = geometry.frame_length();
        loop {
            match match_header_at(buffer.data())? {
                HeaderMatch::Matched { header, len } => {
                    buffer.consume(len);
                    self.geometry = Some(header);
                    return Ok(Some(StreamEvent::HeaderMatched(header)));
                }
                HeaderMatch::Incomplete if !buffer.is_eof() => {
                    if buffer.fill_more()? {
                        continue;
                    }
                    // Stream closed: the prefix can no longer become a
                    // header, so the frame alternative decides below.
                }
                HeaderMatch::Incomplete | HeaderMatch::No => {}
            }
            if buffer.len() >= frame_length {
                return Ok(Some(StreamEvent::FrameMatched(
                    geometry,
                    buffer.take(frame_length),
                )));
            }
            if !buffer.fill_to(frame_length)? {
                return Ok(None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{StreamBuffer, StreamEvent, StreamMachine};
    use std::io::Cursor;

    fn events(stream: Vec<u8>) -> Vec<StreamEvent> {
        let mut buffer = StreamBuffer::new(Cursor::new(stream));
        let mut machine = StreamMachine::new();
        let mut out = Vec::new();
        while let Some(event) = machine.next_event(&mut buffer).unwrap() {
            out.push(event);
        }
        out
    }

    #[test]
    fn header_then_frames() {
        let mut stream = b"GREY W3 H1 F25:1 Ia A0:0\n".to_vec();
        stream.extend_from_slice(&[1, 0, 10, 2, 0, 20]);
        let events = events(stream);
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], StreamEvent::HeaderMatched(_)));
        let StreamEvent::FrameMatched(geometry, bytes) = &events[1] else {
            panic!("expected a frame");
        };
        assert_eq!(geometry.frame_length(), 3);
        assert_eq!(bytes, &[1, 0, 10]);
        assert!(matches!(events[2], StreamEvent::FrameMatched(..)));
    }

    #[test]
    fn new_header_wins_over_frame_bytes() {
        let mut stream = b"GREY W3 H1 F25:1 Ia A0:0\n".to_vec();
        stream.extend_from_slice(b"GREY W4 H1 F25:1 Ia A0:0\n");
        stream.extend_from_slice(&[1, 0, 10, 20]);
        let events = events(stream);
        assert_eq!(events.len(), 3);
        let StreamEvent::HeaderMatched(second) = &events[1] else {
            panic!("expected the replacement header");
        };
        assert_eq!(second.frame_length(), 4);
        let StreamEvent::FrameMatched(geometry, bytes) = &events[2] else {
            panic!("expected a frame under the new geometry");
        };
        assert_eq!(geometry.segment_size(), 4);
        assert_eq!(bytes, &[1, 0, 10, 20]);
    }

    #[test]
    fn partial_frame_at_eof_is_dropped() {
        let mut stream = b"GREY W5 H2 F25:1 Ia A0:0\n".to_vec();
        stream.extend_from_slice(&[1, 0, 10, 11]);
        let events = events(stream);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], StreamEvent::HeaderMatched(_)));
    }

    #[test]
    fn header_prefix_at_eof_yields_frames() {
        // The tail looks like the start of a header but the stream closes,
        // so the bytes fall through to the frame alternative.
        let mut stream = b"GREY W3 H2 F25:1 Ia A0:0\n".to_vec();
        stream.extend_from_slice(b"GREY W");
        let events = events(stream);
        assert_eq!(events.len(), 2);
        let StreamEvent::FrameMatched(_, bytes) = &events[1] else {
            panic!("expected the prefix bytes as a frame");
        };
        assert_eq!(bytes, b"GREY W");
    }

    #[test]
    fn stream_without_header_produces_nothing() {
        assert!(events(b"no geometry here\x00\x01\x02".to_vec()).is_empty());
        assert!(events(Vec::new()).is_empty());
    }
}
