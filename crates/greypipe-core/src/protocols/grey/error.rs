use thiserror::Error;

/// Errors raised for headers that match the grammar but carry unusable
/// numeric fields. All of them are fatal: the stream has announced a
/// geometry the decoder cannot honor, and there is no defined recovery.
#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("segment size field overflows: W{digits}")]
    SegmentSizeOverflow { digits: String },
    #[error("universe count field overflows: H{digits}")]
    UniverseCountOverflow { digits: String },
    #[error("invalid universe count: {count}")]
    InvalidUniverseCount { count: usize },
    #[error("invalid segment size: {size} (universe number plus at least one channel byte)")]
    InvalidSegmentSize { size: usize },
    #[error("frame length overflows: {universes} universe(s) x {segment_size} byte(s)")]
    FrameLengthOverflow {
        universes: usize,
        segment_size: usize,
    },
}
