//! OLA text command output.
//!
//! The lighting daemon consumes one ASCII line per frame: each universe as
//! `<number> <d0>,<d1>,...`, universes joined by single spaces. Lines are
//! flushed as they are written; the consumer reads line-by-line and must see
//! each frame without buffering delay.

pub mod formatter;

pub use formatter::{format_line, write_line};
