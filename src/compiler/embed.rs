//! Embed extraction and resolution.
//!
//! Scans a raw body for `<Tweet id="…"/>` citations and resolves each
//! distinct id through an external lookup, producing the id-keyed mapping
//! a [`crate::page::PageModel`] carries. Lookups run concurrently; a
//! failing lookup omits that entry and logs a warning instead of failing
//! the page, so one dead embed never blocks a build.

use crate::config::EmbedConfig;
use crate::log;
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;

/// Citation identifier discovered in a raw body.
pub type EmbedId = String;

/// Citation syntax recognized inside raw body text.
static CITATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<Tweet\s+id="([A-Za-z0-9_]+)""#).expect("citation regex is valid")
});

/// Embed lookup errors.
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("lookup request failed")]
    Request(#[from] reqwest::Error),

    #[error("lookup timed out after {0}ms")]
    Timeout(u64),

    #[error("lookup returned status {0}")]
    Status(u16),
}

/// Resolved snapshot of an externally hosted post.
///
/// Fetched once at build time, never refetched at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedRecord {
    pub id: EmbedId,
    pub author_name: String,
    pub author_handle: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub url: String,
}

/// External resolution of one embed id.
///
/// The build talks to this trait only; tests substitute their own
/// implementations.
#[async_trait]
pub trait EmbedLookup: Send + Sync {
    async fn lookup(&self, id: &str) -> Result<EmbedRecord, EmbedError>;
}

/// HTTP lookup against the configured endpoint (`GET {endpoint}/{id}`).
pub struct HttpEmbedLookup {
    client: reqwest::Client,
    endpoint: String,
    timeout_ms: u64,
}

impl HttpEmbedLookup {
    pub fn new(config: &EmbedConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_owned(),
            timeout_ms: config.timeout_ms,
        }
    }
}

#[async_trait]
impl EmbedLookup for HttpEmbedLookup {
    async fn lookup(&self, id: &str) -> Result<EmbedRecord, EmbedError> {
        let url = format!("{}/{id}", self.endpoint);
        let timeout = Duration::from_millis(self.timeout_ms);

        let response = tokio::time::timeout(timeout, self.client.get(&url).send())
            .await
            .map_err(|_| EmbedError::Timeout(self.timeout_ms))??;

        let status = response.status();
        if !status.is_success() {
            return Err(EmbedError::Status(status.as_u16()));
        }

        Ok(response.json::<EmbedRecord>().await?)
    }
}

/// Scan a raw body for citation ids, deduplicated in order of first
/// appearance.
pub fn scan_embed_ids(body: &str) -> Vec<EmbedId> {
    let mut ids = Vec::new();
    for caps in CITATION_RE.captures_iter(body) {
        let id = &caps[1];
        if !ids.iter().any(|known| known == id) {
            ids.push(id.to_owned());
        }
    }
    ids
}

/// Resolve every distinct citation in a body, concurrently.
///
/// Exactly one lookup is issued per distinct id. An id whose lookup fails
/// is omitted from the mapping; the remaining embeds survive.
pub async fn extract_embeds(
    body: &str,
    lookup: &dyn EmbedLookup,
) -> BTreeMap<EmbedId, EmbedRecord> {
    let ids = scan_embed_ids(body);

    let lookups = ids.iter().map(|id| async move {
        match lookup.lookup(id).await {
            Ok(record) => Some((id.clone(), record)),
            Err(err) => {
                log!("warn"; "embed {id} skipped: {err}");
                None
            }
        }
    });

    futures::future::join_all(lookups)
        .await
        .into_iter()
        .flatten()
        .collect()
}
