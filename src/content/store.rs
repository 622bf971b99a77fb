//! Flat-file content store.
//!
//! Reads content documents from `<content>/<category>/` directories. Each
//! `.md` file is a front-matter header plus a markdown body. A malformed
//! file fails the whole build with the offending filename; authoring errors
//! are never silently skipped.

use crate::content::front_matter::{self, FrontMatterError};
use crate::content::types::{Category, ContentDocument};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Content-store errors. Every variant names the offending file.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed content file `{0}`")]
    FrontMatter(PathBuf, #[source] FrontMatterError),
}

/// Reads and parses content documents, grouped by category.
#[derive(Debug, Clone)]
pub struct ContentStore {
    content_dir: PathBuf,
}

impl ContentStore {
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
        }
    }

    /// List every published document in a category, ordered by date
    /// (newest first) then title.
    ///
    /// Documents with `published = false` are excluded entirely, not sorted
    /// last. A missing category directory is an empty listing, not an error.
    pub fn list_documents(&self, category: Category) -> Result<Vec<ContentDocument>, ContentError> {
        let dir = self.content_dir.join(category.dir());
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut documents = Vec::new();
        for path in collect_markdown_files(&dir) {
            let doc = self.parse_file(&path, category)?;
            if doc.front_matter.published {
                documents.push(doc);
            }
        }

        documents.sort_by(compare_documents);
        Ok(documents)
    }

    /// Find the published document with an exactly matching slug.
    #[allow(dead_code)] // Direct lookups; the build resolves through the memoized listing
    pub fn find_by_slug(
        &self,
        category: Category,
        slug: &str,
    ) -> Result<Option<ContentDocument>, ContentError> {
        let documents = self.list_documents(category)?;
        Ok(documents.into_iter().find(|d| d.slug == slug))
    }

    fn parse_file(&self, path: &Path, category: Category) -> Result<ContentDocument, ContentError> {
        let raw =
            fs::read_to_string(path).map_err(|err| ContentError::Io(path.to_path_buf(), err))?;

        let (front_matter, body) = front_matter::parse(&raw)
            .map_err(|err| ContentError::FrontMatter(path.to_path_buf(), err))?;

        // A missing slug denotes the category's index document
        let slug = front_matter.slug.clone().unwrap_or_default();

        Ok(ContentDocument {
            slug,
            category,
            front_matter,
            body,
        })
    }
}

/// Collect `.md` files under a directory, in stable path order.
fn collect_markdown_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Order documents by date (newest first), then by title.
///
/// Documents with dates come before documents without.
fn compare_documents(a: &ContentDocument, b: &ContentDocument) -> Ordering {
    match (&b.front_matter.date, &a.front_matter.date) {
        (Some(date_b), Some(date_a)) => date_b.cmp(date_a),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.front_matter.title.cmp(&b.front_matter.title),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_doc(root: &Path, category: Category, name: &str, content: &str) {
        let dir = root.join(category.dir());
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    fn store_with(docs: &[(&str, &str)]) -> (TempDir, ContentStore) {
        let tmp = TempDir::new().unwrap();
        for (name, content) in docs {
            write_doc(tmp.path(), Category::Post, name, content);
        }
        let store = ContentStore::new(tmp.path());
        (tmp, store)
    }

    #[test]
    fn test_list_documents_orders_by_date_desc() {
        let (_tmp, store) = store_with(&[
            (
                "first.md",
                "+++\ntitle = \"First\"\nslug = \"first\"\ndate = \"2024-01-15\"\n+++\nbody",
            ),
            (
                "second.md",
                "+++\ntitle = \"Second\"\nslug = \"second\"\ndate = \"2024-01-20\"\n+++\nbody",
            ),
        ]);

        let docs = store.list_documents(Category::Post).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].front_matter.title, "Second");
        assert_eq!(docs[1].front_matter.title, "First");
    }

    #[test]
    fn test_list_documents_excludes_unpublished() {
        let (_tmp, store) = store_with(&[
            (
                "live.md",
                "+++\ntitle = \"Live\"\nslug = \"live\"\n+++\nbody",
            ),
            (
                "draft.md",
                "+++\ntitle = \"Draft\"\nslug = \"draft\"\npublished = false\n+++\nbody",
            ),
        ]);

        let docs = store.list_documents(Category::Post).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].slug, "live");
    }

    #[test]
    fn test_list_documents_missing_category_dir() {
        let tmp = TempDir::new().unwrap();
        let store = ContentStore::new(tmp.path());
        let docs = store.list_documents(Category::Page).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_missing_slug_defaults_to_empty() {
        let (_tmp, store) = store_with(&[("index.md", "+++\ntitle = \"Index\"\n+++\nbody")]);

        let docs = store.list_documents(Category::Post).unwrap();
        assert_eq!(docs[0].slug, "");
    }

    #[test]
    fn test_find_by_slug_roundtrip() {
        let (_tmp, store) = store_with(&[(
            "hello.md",
            "+++\ntitle = \"Hello\"\nslug = \"hello\"\ndate = \"2024-06-01\"\n+++\nHello body",
        )]);

        let listed = store.list_documents(Category::Post).unwrap();
        let found = store
            .find_by_slug(Category::Post, "hello")
            .unwrap()
            .unwrap();
        assert_eq!(found, listed[0]);
        assert_eq!(found.body, "Hello body");
    }

    #[test]
    fn test_find_by_slug_unknown() {
        let (_tmp, store) = store_with(&[(
            "hello.md",
            "+++\ntitle = \"Hello\"\nslug = \"hello\"\n+++\nbody",
        )]);

        let found = store.find_by_slug(Category::Post, "nonexistent").unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_malformed_file_is_fatal_with_filename() {
        let (_tmp, store) = store_with(&[("broken.md", "no front matter here")]);

        let err = store.list_documents(Category::Post).unwrap_err();
        assert!(err.to_string().contains("broken.md"));
    }

    #[test]
    fn test_sort_without_dates_is_alphabetical() {
        let (_tmp, store) = store_with(&[
            ("b.md", "+++\ntitle = \"Beta\"\nslug = \"b\"\n+++\nbody"),
            ("a.md", "+++\ntitle = \"Alpha\"\nslug = \"a\"\n+++\nbody"),
        ]);

        let docs = store.list_documents(Category::Post).unwrap();
        assert_eq!(docs[0].front_matter.title, "Alpha");
        assert_eq!(docs[1].front_matter.title, "Beta");
    }

    #[test]
    fn test_dated_documents_sort_before_undated() {
        let (_tmp, store) = store_with(&[
            ("undated.md", "+++\ntitle = \"Undated\"\nslug = \"u\"\n+++\nbody"),
            (
                "dated.md",
                "+++\ntitle = \"Dated\"\nslug = \"d\"\ndate = \"2024-01-01\"\n+++\nbody",
            ),
        ]);

        let docs = store.list_documents(Category::Post).unwrap();
        assert_eq!(docs[0].front_matter.title, "Dated");
        assert_eq!(docs[1].front_matter.title, "Undated");
    }

    #[test]
    fn test_categories_are_isolated() {
        let tmp = TempDir::new().unwrap();
        write_doc(
            tmp.path(),
            Category::Post,
            "p.md",
            "+++\ntitle = \"P\"\nslug = \"shared\"\n+++\nbody",
        );
        write_doc(
            tmp.path(),
            Category::Page,
            "q.md",
            "+++\ntitle = \"Q\"\nslug = \"shared\"\n+++\nbody",
        );
        let store = ContentStore::new(tmp.path());

        let post = store.find_by_slug(Category::Post, "shared").unwrap().unwrap();
        let page = store.find_by_slug(Category::Page, "shared").unwrap().unwrap();
        assert_eq!(post.front_matter.title, "P");
        assert_eq!(page.front_matter.title, "Q");
    }
}
