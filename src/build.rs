//! Site building orchestration.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── per category: static_paths() ──► resolve every route
//!     │        (listing memoized; compile + embed lookup joined per page)
//!     │
//!     ├── render pages through the substitution registry
//!     │
//!     └── write index, document, and 404 pages (minified when enabled)
//! ```

use crate::compiler::{EmbedLookup, HttpEmbedLookup};
use crate::config::SiteConfig;
use crate::content::{Category, ContentStore};
use crate::log;
use crate::page::{DocumentMeta, PageAssembler, PageModel, RoutePath, StaticProps};
use crate::render::template::{render_category_index, render_home, render_not_found, render_page};
use crate::render::{Registry, standard_registry};
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Build the entire site.
///
/// Drives the whole pipeline on a fresh tokio runtime: one build process,
/// cooperative concurrency, runs to completion or fails the whole build.
pub fn build_site(config: &'static SiteConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start build runtime")?;
    runtime.block_on(build_site_inner(config))
}

async fn build_site_inner(config: &'static SiteConfig) -> Result<()> {
    let output = &config.build.output;
    ensure_output_dir(output, config.build.clean)?;

    let lookup: Option<Arc<dyn EmbedLookup>> = config
        .embeds
        .enable
        .then(|| Arc::new(HttpEmbedLookup::new(&config.embeds)) as Arc<dyn EmbedLookup>);

    let assembler = PageAssembler::new(ContentStore::new(&config.build.content), lookup);
    let registry = standard_registry();

    let mut total_pages = 0usize;
    let mut home_sections = Vec::new();

    for &category in Category::ALL {
        let pages = build_category(category, &assembler, &registry, config).await?;
        total_pages += pages.len();

        let entries: Vec<DocumentMeta> = pages.iter().map(|p| p.meta.clone()).collect();

        // The category root belongs to the empty-slug document when one
        // exists; otherwise it gets the generated listing index
        if !entries.iter().any(|m| m.slug.is_empty()) {
            let index = render_category_index(category, &entries, config);
            write_html(&output.join(category.dir()).join("index.html"), &index, config)?;
        }

        home_sections.push((category, entries));
    }

    write_html(
        &output.join("index.html"),
        &render_home(&home_sections, config),
        config,
    )?;
    write_html(&output.join("404.html"), &render_not_found(config), config)?;

    log!("build"; "done: {} pages", total_pages);
    Ok(())
}

/// Resolve and write every enumerated route of one category.
async fn build_category(
    category: Category,
    assembler: &PageAssembler,
    registry: &Registry,
    config: &'static SiteConfig,
) -> Result<Vec<PageModel>> {
    let paths = assembler.static_paths(category)?;
    // fallback is always false: unknown routes fall through to 404.html
    debug_assert!(!paths.fallback);
    log!("build"; "{}: {} routes", category, paths.paths.len());

    let resolutions = paths.paths.iter().map(|route| async move {
        let slug = route.slug();
        let props = assembler.static_props(category, &slug).await?;
        anyhow::Ok((route, props))
    });

    let mut pages = Vec::new();
    for result in futures::future::join_all(resolutions).await {
        let (route, props) = result?;
        let StaticProps::Page { props: model } = props else {
            // Enumerated routes come from the same memoized listing the
            // resolver reads, so an absent page is a pipeline bug
            bail!("enumerated route {:?} did not resolve", route.segments);
        };

        let html = render_page(&model, registry, config);
        write_html(&route_output_path(route, &config.build.output), &html, config)?;
        pages.push(*model);
    }

    Ok(pages)
}

/// Output file for a route:
/// `<output>/<category>/<segments…>/index.html`, with the empty slug
/// landing at the category root.
fn route_output_path(route: &RoutePath, output: &Path) -> PathBuf {
    let mut path = output.join(route.category.dir());
    for segment in route.segments.iter().filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path.join("index.html")
}

/// Write a page, minifying when enabled.
fn write_html(path: &Path, html: &str, config: &SiteConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let bytes = if config.build.minify {
        minify_html_page(html.as_bytes())
    } else {
        html.as_bytes().to_vec()
    };

    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}

/// Minify HTML content using the `minify_html` crate.
fn minify_html_page(html: &[u8]) -> Vec<u8> {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    cfg.minify_js = true;
    minify_html::minify(html, &cfg)
}

/// Ensure the output directory exists, clearing it first when `clean` is
/// set.
fn ensure_output_dir(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to clear output directory: {}", output.display()))?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))
}
