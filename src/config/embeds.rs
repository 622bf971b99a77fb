//! `[embeds]` section configuration.
//!
//! Controls resolution of external rich-content citations at build time.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[embeds]` section in paracosm.toml.
///
/// # Example
/// ```toml
/// [embeds]
/// enable = true
/// endpoint = "https://cdn.syndication.twimg.com/tweet-result"
/// timeout_ms = 5000
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct EmbedConfig {
    /// Resolve embed citations during the build.
    ///
    /// When disabled, citations render as plain links to the source post.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub enable: bool,

    /// Lookup endpoint; the embed id is appended as the final path segment.
    #[serde(default = "defaults::embeds::endpoint")]
    #[educe(Default = defaults::embeds::endpoint())]
    pub endpoint: String,

    /// Per-lookup timeout in milliseconds.
    #[serde(default = "defaults::embeds::timeout_ms")]
    #[educe(Default = defaults::embeds::timeout_ms())]
    pub timeout_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_embed_defaults() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert!(config.embeds.enable);
        assert!(config.embeds.endpoint.starts_with("https://"));
        assert_eq!(config.embeds.timeout_ms, 5000);
    }

    #[test]
    fn test_embed_overrides() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test"

            [embeds]
            enable = false
            endpoint = "https://lookup.example.com/status"
            timeout_ms = 1500
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert!(!config.embeds.enable);
        assert_eq!(config.embeds.endpoint, "https://lookup.example.com/status");
        assert_eq!(config.embeds.timeout_ms, 1500);
    }
}
