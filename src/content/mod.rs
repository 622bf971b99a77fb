//! Content loading: categories, front matter, and the flat-file store.
//!
//! A content document is a `+++`-delimited TOML header followed by markdown
//! body text, living under `<content>/<category>/`. Documents are parsed
//! once per build and immutable afterwards.

pub mod front_matter;
pub mod store;
pub mod types;

pub use front_matter::FrontMatter;
pub use store::{ContentError, ContentStore};
pub use types::{Category, ContentDocument};
