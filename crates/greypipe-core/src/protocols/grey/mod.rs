//! GREY stream format decoding.
//!
//! A GREY stream interleaves textual geometry headers with fixed-length
//! binary frames. The header announces the per-universe segment size and the
//! universe count; every following frame is exactly their product in bytes
//! until the next header replaces the geometry. Matching is incremental: a
//! buffer can be a complete header, a valid prefix awaiting more bytes, or
//! no header at all, and the distinction drives the stream state machine.
//!
//! Byte positions and grammar anchors live in `layout`, structural matching
//! in `reader`, domain decoding in `parser`, explicit errors in `error`.
//!
//! Version française (résumé):
//! Décodage du flux GREY : en-têtes texte annonçant la géométrie, trames
//! binaires de longueur fixe. La correspondance est incrémentale (complète,
//! préfixe valide, ou absente). Positions dans `layout`, lecture dans
//! `reader`, décodage dans `parser`, erreurs dans `error`.

pub mod error;
pub mod layout;
pub mod parser;
pub(crate) mod reader;

pub use error::HeaderError;
pub use parser::{
    GeometryHeader, HeaderMatch, HeaderScan, Universe, decode_frame, match_header_at, scan_header,
};
