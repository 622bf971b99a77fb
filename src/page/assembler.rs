//! Page assembly.
//!
//! Joins the content store, the document compiler, and the embed extractor
//! into route-ready payloads. Category listings go through a build-scoped
//! [`Memo`] so repeated path/props resolution for the same category scans
//! the disk once.

use crate::compiler::{self, EmbedLookup};
use crate::content::{Category, ContentDocument, ContentStore};
use crate::page::memo::Memo;
use crate::page::model::{DocumentMeta, PageModel, RoutePath, StaticPaths, StaticProps};
use anyhow::Result;
use std::sync::Arc;

pub struct PageAssembler {
    store: ContentStore,
    listings: Memo<Arc<Vec<ContentDocument>>>,
    lookup: Option<Arc<dyn EmbedLookup>>,
}

impl PageAssembler {
    /// `lookup` is the external embed resolver; `None` disables embed
    /// resolution entirely (citations render as plain links).
    pub fn new(store: ContentStore, lookup: Option<Arc<dyn EmbedLookup>>) -> Self {
        Self {
            store,
            listings: Memo::new(),
            lookup,
        }
    }

    /// Memoized category listing. At most one disk scan per category per
    /// assembler lifetime; the cached listing is never invalidated.
    fn documents(&self, category: Category) -> Result<Arc<Vec<ContentDocument>>> {
        let key = Memo::<Arc<Vec<ContentDocument>>>::key(&(category,));
        let docs = self.listings.get_or_try_compute(&key, || {
            self.store.list_documents(category).map(Arc::new)
        })?;
        Ok(docs)
    }

    /// Every known (category, slug) route, in listing order.
    pub fn enumerate_routes(&self, category: Category) -> Result<Vec<RoutePath>> {
        let docs = self.documents(category)?;
        Ok(docs
            .iter()
            .map(|d| RoutePath::from_slug(category, &d.slug))
            .collect())
    }

    /// Static path enumeration for a category. `fallback: false`: any path
    /// not listed here is a hard 404.
    pub fn static_paths(&self, category: Category) -> Result<StaticPaths> {
        Ok(StaticPaths {
            paths: self.enumerate_routes(category)?,
            fallback: false,
        })
    }

    /// Resolve a route into its page payload.
    ///
    /// Returns `None` for an unknown slug; the caller maps that to the
    /// not-found outcome at the generation boundary. Body compilation and
    /// embed resolution run concurrently and are joined before the model
    /// is emitted.
    pub async fn resolve_page(&self, category: Category, slug: &str) -> Result<Option<PageModel>> {
        let docs = self.documents(category)?;
        let Some(doc) = docs.iter().find(|d| d.slug == slug) else {
            return Ok(None);
        };

        let (body, embeds) = tokio::join!(
            async { compiler::compile(&doc.body) },
            async {
                match &self.lookup {
                    Some(lookup) => compiler::extract_embeds(&doc.body, lookup.as_ref()).await,
                    None => Default::default(),
                }
            }
        );

        Ok(Some(PageModel {
            category,
            meta: DocumentMeta::from(doc),
            body: body?,
            embeds,
        }))
    }

    /// `resolve_page` mapped onto the static-generation boundary.
    pub async fn static_props(&self, category: Category, slug: &str) -> Result<StaticProps> {
        Ok(match self.resolve_page(category, slug).await? {
            Some(model) => StaticProps::Page {
                props: Box::new(model),
            },
            None => StaticProps::NotFound,
        })
    }

    /// Drop the memoized listings. Test isolation only; a build never
    /// invalidates its cache.
    #[allow(dead_code)]
    pub fn clear_cache(&self) {
        self.listings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{EmbedError, EmbedRecord, Node};
    use async_trait::async_trait;
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct CountingLookup {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EmbedLookup for CountingLookup {
        async fn lookup(&self, id: &str) -> Result<EmbedRecord, EmbedError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(EmbedRecord {
                id: id.to_owned(),
                author_name: "Author".into(),
                author_handle: "author".into(),
                text: "snapshot".into(),
                created_at: None,
                url: format!("https://example.com/status/{id}"),
            })
        }
    }

    fn write_post(root: &Path, name: &str, content: &str) {
        let dir = root.join("posts");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    fn assembler_for(tmp: &TempDir) -> PageAssembler {
        PageAssembler::new(
            ContentStore::new(tmp.path()),
            Some(Arc::new(CountingLookup {
                calls: AtomicUsize::new(0),
            })),
        )
    }

    #[tokio::test]
    async fn test_resolve_page_assembles_model() {
        let tmp = TempDir::new().unwrap();
        write_post(
            tmp.path(),
            "hello.md",
            "+++\ntitle = \"Hello\"\nslug = \"hello\"\n+++\n## Intro\n\n<Tweet id=\"42\"/>\n",
        );
        let assembler = assembler_for(&tmp);

        let model = assembler
            .resolve_page(Category::Post, "hello")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(model.meta.title, "Hello");
        assert_eq!(model.category, Category::Post);
        assert!(model.embeds.contains_key("42"));
        assert!(matches!(model.body.nodes[0], Node::Heading { .. }));
    }

    #[tokio::test]
    async fn test_resolve_page_unknown_slug_is_none() {
        let tmp = TempDir::new().unwrap();
        write_post(
            tmp.path(),
            "hello.md",
            "+++\ntitle = \"Hello\"\nslug = \"hello\"\n+++\nbody",
        );
        let assembler = assembler_for(&tmp);

        let resolved = assembler
            .resolve_page(Category::Post, "nonexistent-slug")
            .await
            .unwrap();
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn test_static_props_not_found() {
        let tmp = TempDir::new().unwrap();
        let assembler = assembler_for(&tmp);

        let props = assembler
            .static_props(Category::Post, "missing")
            .await
            .unwrap();
        assert_eq!(props, StaticProps::NotFound);
    }

    #[tokio::test]
    async fn test_listing_is_memoized_across_calls() {
        let tmp = TempDir::new().unwrap();
        write_post(
            tmp.path(),
            "hello.md",
            "+++\ntitle = \"Hello\"\nslug = \"hello\"\n+++\nbody",
        );
        let assembler = assembler_for(&tmp);

        let first = assembler.enumerate_routes(Category::Post).unwrap();
        assert_eq!(first.len(), 1);

        // Remove the source file; the memoized listing must still serve it.
        fs::remove_file(tmp.path().join("posts/hello.md")).unwrap();
        let second = assembler.enumerate_routes(Category::Post).unwrap();
        assert_eq!(second, first);

        let resolved = assembler.resolve_page(Category::Post, "hello").await;
        assert!(resolved.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_clear_cache_rescans() {
        let tmp = TempDir::new().unwrap();
        write_post(
            tmp.path(),
            "hello.md",
            "+++\ntitle = \"Hello\"\nslug = \"hello\"\n+++\nbody",
        );
        let assembler = assembler_for(&tmp);

        assert_eq!(assembler.enumerate_routes(Category::Post).unwrap().len(), 1);

        fs::remove_file(tmp.path().join("posts/hello.md")).unwrap();
        assembler.clear_cache();
        assert!(assembler.enumerate_routes(Category::Post).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_enumerate_routes_segment_shapes() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "index.md", "+++\ntitle = \"Index\"\n+++\nbody");
        write_post(
            tmp.path(),
            "foo.md",
            "+++\ntitle = \"Foo\"\nslug = \"foo\"\ndate = \"2024-02-01\"\n+++\nbody",
        );
        write_post(
            tmp.path(),
            "bar.md",
            "+++\ntitle = \"Bar\"\nslug = \"foo/bar\"\ndate = \"2024-01-01\"\n+++\nbody",
        );
        let assembler = assembler_for(&tmp);

        let routes = assembler.enumerate_routes(Category::Post).unwrap();
        let segments: Vec<_> = routes.iter().map(|r| r.segments.clone()).collect();

        assert!(segments.contains(&vec![String::new()]));
        assert!(segments.contains(&vec!["foo".to_owned()]));
        assert!(segments.contains(&vec!["foo".to_owned(), "bar".to_owned()]));
    }

    #[tokio::test]
    async fn test_static_paths_fallback_false() {
        let tmp = TempDir::new().unwrap();
        let assembler = assembler_for(&tmp);

        let paths = assembler.static_paths(Category::Page).unwrap();
        assert!(!paths.fallback);
        assert!(paths.paths.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_without_lookup_yields_no_embeds() {
        let tmp = TempDir::new().unwrap();
        write_post(
            tmp.path(),
            "hello.md",
            "+++\ntitle = \"Hello\"\nslug = \"hello\"\n+++\n<Tweet id=\"42\"/>\n",
        );
        let assembler = PageAssembler::new(ContentStore::new(tmp.path()), None);

        let model = assembler
            .resolve_page(Category::Post, "hello")
            .await
            .unwrap()
            .unwrap();
        assert!(model.embeds.is_empty());
    }
}
