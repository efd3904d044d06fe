use std::io::{Read, Write};
use std::time::Instant;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::protocols::grey::{HeaderError, decode_frame};
use crate::protocols::ola;
use crate::{DEFAULT_GENERATED_AT, GeometryInfo, RelaySummary, make_stub_summary};

mod buffer;
mod machine;

use buffer::StreamBuffer;
use machine::{StreamEvent, StreamMachine};

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed header: {0}")]
    Header(#[from] HeaderError),
}

/// Knobs for one conversion run.
#[derive(Debug, Clone, Default)]
pub struct RelayOptions {
    /// Emit a progress event every this many frames (0 disables).
    pub progress_interval: u64,
}

/// Drive a GREY byte stream through to command lines until the input ends.
///
/// Blocking and strictly ordered: one line per decoded frame, flushed as it
/// is written, in stream order. End-of-stream anywhere is a clean return;
/// only I/O failures and malformed headers abort the run.
pub fn relay_stream<R: Read, W: Write>(
    input: R,
    mut output: W,
    options: &RelayOptions,
) -> Result<RelaySummary, RelayError> {
    let started = Instant::now();
    let mut buffer = StreamBuffer::new(input);
    let mut machine = StreamMachine::new();
    let mut summary = make_stub_summary();

    while let Some(event) = machine.next_event(&mut buffer)? {
        match event {
            StreamEvent::HeaderMatched(header) => {
                summary.headers_seen += 1;
                tracing::info!(
                    universes = header.universe_count(),
                    segment_bytes = header.segment_size(),
                    frame_bytes = header.frame_length(),
                    "stream geometry announced"
                );
            }
            StreamEvent::FrameMatched(geometry, bytes) => {
                let universes = decode_frame(&geometry, &bytes);
                ola::write_line(&mut output, &universes)?;
                summary.frames_converted += 1;
                if options.progress_interval != 0
                    && summary.frames_converted % options.progress_interval == 0
                {
                    let elapsed = started.elapsed().as_secs_f64();
                    tracing::info!(
                        frames = summary.frames_converted,
                        elapsed_s = elapsed,
                        fps = summary.frames_converted as f64 / elapsed,
                        "conversion progress"
                    );
                }
            }
        }
    }

    summary.geometry = machine.geometry().map(|header| GeometryInfo {
        universes: header.universe_count(),
        segment_bytes: header.segment_size(),
        frame_bytes: header.frame_length(),
    });
    let elapsed = started.elapsed().as_secs_f64();
    summary.elapsed_s = Some(elapsed);
    summary.fps = if elapsed > 0.0 && summary.frames_converted > 0 {
        Some(summary.frames_converted as f64 / elapsed)
    } else {
        None
    };
    summary.generated_at = now_rfc3339().unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
    Ok(summary)
}

fn now_rfc3339() -> Option<String> {
    OffsetDateTime::now_utc().format(&Rfc3339).ok()
}
