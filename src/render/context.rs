//! Render-pass context.

use crate::compiler::{EmbedId, EmbedRecord};
use crate::config::AnalyticsConfig;
use crate::page::PageModel;
use std::collections::BTreeMap;

/// Configuration for one render pass over a compiled body.
///
/// The instrumentation flag is computed from the route path and passed in
/// explicitly; handlers never consult ambient navigation state. The
/// context borrows the page's embed mapping for the duration of the pass
/// and never mutates it.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Emit section-view and click-tracking attributes.
    pub track_analytics: bool,

    /// Resolved embeds, keyed by citation id.
    pub embeds: &'a BTreeMap<EmbedId, EmbedRecord>,
}

impl<'a> RenderContext<'a> {
    pub fn new(track_analytics: bool, embeds: &'a BTreeMap<EmbedId, EmbedRecord>) -> Self {
        Self {
            track_analytics,
            embeds,
        }
    }

    /// Context for rendering a page: the tracking flag comes from the
    /// page's route path tested against the configured suppressed
    /// prefixes.
    pub fn for_page(model: &'a PageModel, analytics: &AnalyticsConfig) -> Self {
        Self {
            track_analytics: analytics.tracks_route(&model.route_path()),
            embeds: &model.embeds,
        }
    }
}
