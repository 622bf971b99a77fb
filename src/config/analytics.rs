//! `[analytics]` section configuration.
//!
//! Controls the instrumentation hooks emitted into rendered pages and the
//! route prefixes where they are suppressed.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[analytics]` section in paracosm.toml.
///
/// # Example
/// ```toml
/// [analytics]
/// enable = true
/// endpoint = "https://stats.example.com/collect"
/// suppress_prefixes = ["/posts/"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct AnalyticsConfig {
    /// Emit tracking attributes and the event bootstrap script.
    #[serde(default = "defaults::r#false")]
    pub enable: bool,

    /// Endpoint the bootstrap script posts events to.
    #[serde(default = "defaults::analytics::endpoint")]
    #[educe(Default = defaults::analytics::endpoint())]
    pub endpoint: String,

    /// Route prefixes where section/link instrumentation is suppressed.
    ///
    /// Matching is a simple prefix test against the page's route path.
    #[serde(default = "defaults::analytics::suppress_prefixes")]
    #[educe(Default = defaults::analytics::suppress_prefixes())]
    pub suppress_prefixes: Vec<String>,
}

impl AnalyticsConfig {
    /// Whether instrumentation should fire on the given route path.
    ///
    /// Returns false when analytics is disabled or the route falls inside
    /// one of the suppressed prefixes.
    pub fn tracks_route(&self, route_path: &str) -> bool {
        self.enable && !self.suppress_prefixes.iter().any(|p| route_path.starts_with(p.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::SiteConfig;

    #[test]
    fn test_analytics_defaults() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert!(!config.analytics.enable);
        assert_eq!(config.analytics.endpoint, "/api/collect");
        assert_eq!(config.analytics.suppress_prefixes, vec!["/posts/"]);
    }

    #[test]
    fn test_tracks_route_disabled() {
        let analytics = AnalyticsConfig::default();
        assert!(!analytics.tracks_route("/"));
    }

    #[test]
    fn test_tracks_route_suppressed_prefix() {
        let analytics = AnalyticsConfig {
            enable: true,
            ..AnalyticsConfig::default()
        };

        assert!(analytics.tracks_route("/"));
        assert!(analytics.tracks_route("/pages/about/"));
        assert!(!analytics.tracks_route("/posts/hello-world/"));
    }

    #[test]
    fn test_tracks_route_custom_prefixes() {
        let analytics = AnalyticsConfig {
            enable: true,
            suppress_prefixes: vec!["/blog/".into(), "/w/".into()],
            ..AnalyticsConfig::default()
        };

        assert!(!analytics.tracks_route("/blog/some-post/"));
        assert!(!analytics.tracks_route("/w/draft/"));
        assert!(analytics.tracks_route("/posts/hello/"));
    }
}
