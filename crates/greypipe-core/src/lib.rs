//! Greypipe core library: GREY video stream to lighting daemon commands.
//!
//! This crate implements the conversion pipeline used by the CLI: a byte
//! stream of GREY-encoded frames (each multiplexing one or more DMX-style
//! lighting universes) is pulled through a two-state machine that matches
//! geometry headers and fixed-length frames, decodes each frame into
//! per-universe records, and emits one flushed command line per frame.
//! Parsing is byte-oriented and side-effect free; all I/O is isolated in
//! the `source` endpoints and the generic relay loop.
//!
//! Invariants:
//! - At most one geometry is active; a new header replaces it wholesale.
//! - Every frame consumes exactly `universe_count * segment_size` bytes.
//! - Output lines are emitted in strict stream order, one per frame.
//! - End-of-stream is a clean termination from any state; only I/O failures
//!   and malformed headers abort a run.
//!
//! Version française (résumé):
//! Cette crate convertit un flux vidéo GREY en commandes texte pour un
//! démon lumière : machine à deux états (attente d'en-tête / trames),
//! décodage par univers, une ligne par trame, vidée immédiatement. Fin de
//! flux = arrêt propre ; seul un en-tête malformé est fatal.
//!
//! # Examples
//! ```no_run
//! use greypipe_core::{RelayOptions, relay_stream};
//!
//! let summary = relay_stream(std::io::stdin(), std::io::stdout(), &RelayOptions::default())?;
//! eprintln!("converted {} frame(s)", summary.frames_converted);
//! # Ok::<(), greypipe_core::RelayError>(())
//! ```

use serde::{Deserialize, Serialize};

mod protocols;
mod relay;
mod source;

pub use protocols::grey::{
    GeometryHeader, HeaderError, HeaderMatch, HeaderScan, Universe, decode_frame, match_header_at,
    scan_header,
};
pub use protocols::ola::{format_line, write_line};
pub use relay::{RelayError, RelayOptions, relay_stream};
pub use source::{SourceError, StreamInput, StreamOutput};

/// Current summary schema version.
pub const SUMMARY_VERSION: u32 = 1;
/// Default timestamp used when the wall clock cannot be formatted.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// What one conversion run saw and produced.
///
/// # Examples
/// ```
/// use greypipe_core::make_stub_summary;
///
/// let summary = make_stub_summary();
/// assert_eq!(summary.summary_version, greypipe_core::SUMMARY_VERSION);
/// assert_eq!(summary.frames_converted, 0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelaySummary {
    /// Summary schema version (not the binary version).
    pub summary_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the summary generation time.
    pub generated_at: String,

    /// Number of geometry headers matched, including replacements.
    pub headers_seen: u64,
    /// Number of frames decoded and emitted as command lines.
    pub frames_converted: u64,

    /// Geometry active when the stream ended (absent if no header ever
    /// matched).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<GeometryInfo>,
    /// Wall-clock duration of the run in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_s: Option<f64>,
    /// Average frames per second over the run (absent when no frames were
    /// converted).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
}

/// Tool metadata embedded in summaries.
///
/// # Examples
/// ```
/// use greypipe_core::ToolInfo;
///
/// let tool = ToolInfo {
///     name: "greypipe".to_string(),
///     version: "0.1.0".to_string(),
/// };
/// assert_eq!(tool.name, "greypipe");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "greypipe").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Serializable view of a frame geometry.
///
/// # Examples
/// ```
/// use greypipe_core::GeometryInfo;
///
/// let geometry = GeometryInfo {
///     universes: 2,
///     segment_bytes: 5,
///     frame_bytes: 10,
/// };
/// assert_eq!(geometry.frame_bytes, 10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryInfo {
    /// Universes multiplexed per frame.
    pub universes: usize,
    /// Bytes per universe segment.
    pub segment_bytes: usize,
    /// Derived frame length in bytes.
    pub frame_bytes: usize,
}

/// Build a summary with base fields filled and zeroed counters.
///
/// # Examples
/// ```
/// use greypipe_core::make_stub_summary;
///
/// let summary = make_stub_summary();
/// assert!(summary.geometry.is_none());
/// ```
pub fn make_stub_summary() -> RelaySummary {
    RelaySummary {
        summary_version: SUMMARY_VERSION,
        tool: ToolInfo {
            name: "greypipe".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        headers_seen: 0,
        frames_converted: 0,
        geometry: None,
        elapsed_s: None,
        fps: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_omits_optional_fields_when_none() {
        let summary = make_stub_summary();

        let value = serde_json::to_value(&summary).expect("summary json");
        assert!(value.get("geometry").is_none());
        assert!(value.get("elapsed_s").is_none());
        assert!(value.get("fps").is_none());
        assert_eq!(value["summary_version"], SUMMARY_VERSION);
        assert_eq!(value["tool"]["name"], "greypipe");
    }

    #[test]
    fn summary_serializes_geometry_when_present() {
        let mut summary = make_stub_summary();
        summary.headers_seen = 1;
        summary.frames_converted = 3;
        summary.geometry = Some(GeometryInfo {
            universes: 2,
            segment_bytes: 5,
            frame_bytes: 10,
        });

        let value = serde_json::to_value(&summary).expect("summary json");
        assert_eq!(value["geometry"]["universes"], 2);
        assert_eq!(value["geometry"]["frame_bytes"], 10);
        assert_eq!(value["frames_converted"], 3);
    }
}
