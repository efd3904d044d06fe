//! Protocol modules.
//!
//! Each side of the pipe follows a layered structure:
//! - `layout`: byte anchors and grammar literals (source of truth)
//! - `reader`: safe byte access and format conventions
//! - `parser`: domain-level decoding (no direct byte indexing)
//! - `error`: explicit, actionable errors
//!
//! `grey` decodes the incoming video stream, `ola` renders the outgoing
//! daemon commands. Both are pure and contain no I/O; the relay and source
//! layers handle streams and aggregation.

pub mod grey;
pub mod ola;
