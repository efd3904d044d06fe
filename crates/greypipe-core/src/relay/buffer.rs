use std::io::{self, ErrorKind, Read};

const READ_CHUNK: usize = 64 * 1024;

/// Accumulates stream bytes ahead of the matcher. EOF is sticky: once the
/// reader returns zero bytes, no further reads are attempted.
pub(crate) struct StreamBuffer<R> {
    reader: R,
    data: Vec<u8>,
    eof: bool,
}

impl<R: Read> StreamBuffer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            data: Vec::new(),
            eof: false,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Read one more chunk; returns false once the stream is exhausted.
    pub fn fill_more(&mut self) -> io::Result<bool> {
        if self.eof {
            return Ok(false);
        }
        let start = self.data.len();
        self.data.resize(start + READ_CHUNK, 0);
        let read = loop {
            match self.reader.read(&mut self.data[start..]) {
                Ok(n) => break n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    self.data.truncate(start);
                    return Err(err);
                }
            }
        };
        self.data.truncate(start + read);
        if read == 0 {
            self.eof = true;
        }
        Ok(read > 0)
    }

    /// Buffer at least `needed` bytes; returns false if the stream ends
    /// first (the shortfall stays buffered).
    pub fn fill_to(&mut self, needed: usize) -> io::Result<bool> {
        while self.data.len() < needed {
            if !self.fill_more()? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn consume(&mut self, count: usize) {
        self.data.drain(..count);
    }

    /// Detach exactly `count` bytes from the front of the buffer.
    pub fn take(&mut self, count: usize) -> Vec<u8> {
        let rest = self.data.split_off(count);
        std::mem::replace(&mut self.data, rest)
    }
}

#[cfg(test)]
mod tests {
    use super::StreamBuffer;
    use std::io::Cursor;

    #[test]
    fn fill_to_reports_short_stream() {
        let mut buffer = StreamBuffer::new(Cursor::new(vec![1u8, 2, 3]));
        assert!(!buffer.fill_to(10).unwrap());
        assert!(buffer.is_eof());
        assert_eq!(buffer.data(), &[1, 2, 3]);
    }

    #[test]
    fn take_detaches_front_bytes() {
        let mut buffer = StreamBuffer::new(Cursor::new(vec![1u8, 2, 3, 4, 5]));
        assert!(buffer.fill_to(5).unwrap());
        assert_eq!(buffer.take(2), vec![1, 2]);
        assert_eq!(buffer.data(), &[3, 4, 5]);
    }

    #[test]
    fn consume_discards_front_bytes() {
        let mut buffer = StreamBuffer::new(Cursor::new(vec![9u8, 8, 7]));
        assert!(buffer.fill_to(3).unwrap());
        buffer.consume(2);
        assert_eq!(buffer.data(), &[7]);
    }

    #[test]
    fn eof_is_sticky() {
        let mut buffer = StreamBuffer::new(Cursor::new(Vec::<u8>::new()));
        assert!(!buffer.fill_more().unwrap());
        assert!(!buffer.fill_more().unwrap());
        assert!(buffer.is_eof());
    }
}
