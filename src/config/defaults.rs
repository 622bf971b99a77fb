//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [base] Section Defaults
// ============================================================================

pub mod base {
    pub fn url() -> Option<String> {
        None
    }

    pub fn author() -> String {
        "<YOUR_NAME>".into()
    }

    pub fn language() -> String {
        "en-US".into()
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn content() -> PathBuf {
        "content".into()
    }

    pub fn output() -> PathBuf {
        "public".into()
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        5277
    }
}

// ============================================================================
// [analytics] Section Defaults
// ============================================================================

pub mod analytics {
    pub fn endpoint() -> String {
        "/api/collect".into()
    }

    /// Route prefixes where content instrumentation is suppressed.
    pub fn suppress_prefixes() -> Vec<String> {
        vec!["/posts/".into()]
    }
}

// ============================================================================
// [embeds] Section Defaults
// ============================================================================

pub mod embeds {
    pub fn endpoint() -> String {
        "https://cdn.syndication.twimg.com/tweet-result".into()
    }

    pub fn timeout_ms() -> u64 {
        5000
    }
}
