//! Document compilation and embed resolution.
//!
//! Two independent passes over the same raw body:
//!
//! - **markdown**: compile the authoring syntax into a serializable node
//!   tree ([`CompiledBody`]). Deterministic, no I/O.
//! - **embed**: resolve `<Tweet id="…"/>` citations through an external
//!   lookup. Network-bound, partial-result tolerant.
//!
//! The page assembler joins both before emitting a page model.

pub mod embed;
pub mod markdown;

pub use embed::{EmbedId, EmbedLookup, EmbedRecord, HttpEmbedLookup, extract_embeds, scan_embed_ids};
pub use markdown::{CompileError, CompiledBody, Node, compile};
