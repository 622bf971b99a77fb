//! Assembled page payloads and the static-generation boundary types.

use crate::compiler::{CompiledBody, EmbedId, EmbedRecord};
use crate::content::{Category, ContentDocument};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Document metadata: the front matter plus the resolved slug, with the
/// body stripped out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, toml::Value>,
}

impl From<&ContentDocument> for DocumentMeta {
    fn from(doc: &ContentDocument) -> Self {
        Self {
            slug: doc.slug.clone(),
            title: doc.front_matter.title.clone(),
            emoji: doc.front_matter.emoji.clone(),
            date: doc.front_matter.date.clone(),
            extra: doc.front_matter.extra.clone(),
        }
    }
}

impl DocumentMeta {
    /// Page title for the document head: "`{emoji} {title}`" when an emoji
    /// is present, the bare title otherwise.
    pub fn head_title(&self) -> String {
        match &self.emoji {
            Some(emoji) => format!("{emoji} {}", self.title),
            None => self.title.clone(),
        }
    }
}

/// The assembled payload for one route.
///
/// Fully self-contained: rendering a page model never re-reads the
/// content store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageModel {
    pub category: Category,
    pub meta: DocumentMeta,
    pub body: CompiledBody,
    pub embeds: BTreeMap<EmbedId, EmbedRecord>,
}

impl PageModel {
    /// Route path of this page, with trailing slash
    /// (e.g., `/posts/hello-world/`; the category root for an empty slug).
    pub fn route_path(&self) -> String {
        route_path(self.category, &self.meta.slug)
    }
}

/// Route path for a (category, slug) pair.
pub fn route_path(category: Category, slug: &str) -> String {
    if slug.is_empty() {
        category.url_prefix().to_owned()
    } else {
        format!("{}{}/", category.url_prefix(), slug)
    }
}

/// One pre-generated route: a category plus URL path segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePath {
    pub category: Category,
    pub segments: Vec<String>,
}

impl RoutePath {
    /// Split a slug into path segments. The empty slug is the
    /// single-element segment list `[""]`.
    pub fn from_slug(category: Category, slug: &str) -> Self {
        let segments = if slug.is_empty() {
            vec![String::new()]
        } else {
            slug.split('/').map(str::to_owned).collect()
        };
        Self { category, segments }
    }

    /// Rejoin the segments into the slug they were derived from.
    pub fn slug(&self) -> String {
        self.segments.join("/")
    }
}

/// Every path to pre-generate for a category. `fallback` is always false:
/// a path not enumerated at build time is a hard 404.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticPaths {
    pub paths: Vec<RoutePath>,
    pub fallback: bool,
}

/// Result of resolving one route at the static-generation boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum StaticProps {
    Page { props: Box<PageModel> },
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FrontMatter;

    fn doc(slug: &str, title: &str) -> ContentDocument {
        ContentDocument {
            slug: slug.to_owned(),
            category: Category::Post,
            front_matter: FrontMatter {
                title: title.to_owned(),
                slug: Some(slug.to_owned()),
                ..FrontMatter::default()
            },
            body: "raw body".to_owned(),
        }
    }

    #[test]
    fn test_meta_strips_body() {
        let document = doc("hello", "Hello");
        let meta = DocumentMeta::from(&document);

        assert_eq!(meta.slug, "hello");
        assert_eq!(meta.title, "Hello");
        let json = serde_json::to_string(&meta).unwrap();
        assert!(!json.contains("raw body"));
    }

    #[test]
    fn test_head_title_with_emoji() {
        let meta = DocumentMeta {
            title: "Hello".into(),
            emoji: Some("👋".into()),
            ..DocumentMeta::default()
        };
        assert_eq!(meta.head_title(), "👋 Hello");
    }

    #[test]
    fn test_head_title_without_emoji() {
        let meta = DocumentMeta {
            title: "Hello".into(),
            ..DocumentMeta::default()
        };
        assert_eq!(meta.head_title(), "Hello");
    }

    #[test]
    fn test_route_path_with_slug() {
        assert_eq!(route_path(Category::Post, "hello"), "/posts/hello/");
        assert_eq!(route_path(Category::Page, "about/team"), "/pages/about/team/");
    }

    #[test]
    fn test_route_path_empty_slug_is_category_root() {
        assert_eq!(route_path(Category::Post, ""), "/posts/");
    }

    #[test]
    fn test_route_segments_empty_slug() {
        let route = RoutePath::from_slug(Category::Post, "");
        assert_eq!(route.segments, vec![String::new()]);
        assert_eq!(route.slug(), "");
    }

    #[test]
    fn test_route_segments_nested_slug() {
        let route = RoutePath::from_slug(Category::Post, "foo/bar");
        assert_eq!(route.segments, vec!["foo".to_owned(), "bar".to_owned()]);
        assert_eq!(route.slug(), "foo/bar");
    }

    #[test]
    fn test_static_props_serialization() {
        let json = serde_json::to_string(&StaticProps::NotFound).unwrap();
        assert_eq!(json, r#"{"result":"not_found"}"#);
    }
}
