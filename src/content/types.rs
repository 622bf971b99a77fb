//! Content categories and document types.

use crate::content::front_matter::FrontMatter;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Content category, one per flat file collection.
///
/// Each category maps to a subdirectory of the content directory and a URL
/// prefix. New categories are added by extending this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Post,
    Page,
}

impl Category {
    /// All known categories, in build order.
    pub const ALL: &'static [Category] = &[Category::Post, Category::Page];

    /// Subdirectory of the content dir holding this category's documents.
    pub const fn dir(self) -> &'static str {
        match self {
            Category::Post => "posts",
            Category::Page => "pages",
        }
    }

    /// URL prefix for routes in this category, with trailing slash.
    pub const fn url_prefix(self) -> &'static str {
        match self {
            Category::Post => "/posts/",
            Category::Page => "/pages/",
        }
    }

    /// Category name with the first letter upper-cased, for breadcrumbs.
    pub fn capitalized(self) -> String {
        let name = self.dir();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir())
    }
}

/// One unit of authored content: parsed front matter plus the raw body.
///
/// Constructed once per build by parsing a stored file; immutable thereafter.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentDocument {
    /// URL-path-safe identifier, unique within the category.
    ///
    /// The empty string denotes the category's index document.
    pub slug: String,

    /// Collection the source file lives in.
    pub category: Category,

    /// Structured metadata from the file header.
    pub front_matter: FrontMatter,

    /// Unparsed markup source.
    pub body: String,
}
