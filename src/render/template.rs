//! Page chrome: the HTML shell around rendered content.
//!
//! Every generated page is a full document with head metadata, breadcrumb
//! navigation, the rendered body inside `<main>`, and the analytics
//! bootstrap when instrumentation is enabled.

use crate::analytics;
use crate::config::SiteConfig;
use crate::content::Category;
use crate::page::{DocumentMeta, PageModel, route_path};
use crate::render::context::RenderContext;
use crate::render::registry::Registry;
use crate::render::{html_escape, render};

/// Render a document page into a complete HTML document.
pub fn render_page(model: &PageModel, registry: &Registry, config: &SiteConfig) -> String {
    let ctx = RenderContext::for_page(model, &config.analytics);
    let body_html = render(&model.body, registry, &ctx);

    let title = html_escape(&model.meta.head_title()).into_owned();
    let description = html_escape(&model.meta.slug).into_owned();
    let breadcrumbs = render_breadcrumbs(model.category, &model.meta.title, config);

    // The page-view hook fires on every document page, independent of the
    // section/link suppression flag
    let page_attrs = if config.analytics.enable {
        format!(
            " data-page-event=\"{}\" data-page-slug=\"{}\" data-page-title=\"{}\"",
            analytics::EVENT_VIEW_POST,
            html_escape(&model.meta.slug),
            html_escape(&model.meta.title),
        )
    } else {
        String::new()
    };

    html_shell(
        config,
        &title,
        &description,
        &page_attrs,
        &format!(
            "{breadcrumbs}\n<h1>{}</h1>\n<main>{body_html}</main>",
            html_escape(&model.meta.title)
        ),
    )
}

/// Render a category index: a dated listing of every published document.
pub fn render_category_index(
    category: Category,
    entries: &[DocumentMeta],
    config: &SiteConfig,
) -> String {
    let items: String = entries
        .iter()
        .map(|meta| {
            let route = route_path(category, &meta.slug);
            let date = meta
                .date
                .as_deref()
                .map(|d| format!("<time>{}</time> ", html_escape(d)))
                .unwrap_or_default();
            format!(
                "<li>{date}<a href=\"{}\">{}</a></li>\n",
                html_escape(&route),
                html_escape(&meta.title)
            )
        })
        .collect();

    let title = html_escape(&category.capitalized()).into_owned();
    html_shell(
        config,
        &title,
        &html_escape(&config.base.description),
        "",
        &format!("<h1>{title}</h1>\n<main><ul class=\"document-list\">\n{items}</ul></main>"),
    )
}

/// Render the site root: one section per category with its document
/// listing.
pub fn render_home(sections: &[(Category, Vec<DocumentMeta>)], config: &SiteConfig) -> String {
    let body: String = sections
        .iter()
        .map(|(category, entries)| {
            let items: String = entries
                .iter()
                .map(|meta| {
                    let route = route_path(*category, &meta.slug);
                    format!(
                        "<li><a href=\"{}\">{}</a></li>\n",
                        html_escape(&route),
                        html_escape(&meta.title)
                    )
                })
                .collect();
            format!(
                "<section><h2><a href=\"{}\">{}</a></h2><ul>\n{items}</ul></section>\n",
                category.url_prefix(),
                html_escape(&category.capitalized()),
            )
        })
        .collect();

    let title = html_escape(&config.base.title).into_owned();
    html_shell(
        config,
        &title,
        &html_escape(&config.base.description),
        "",
        &format!(
            "<h1>{title}</h1>\n<p>{}</p>\n<main>{body}</main>",
            html_escape(&config.base.description)
        ),
    )
}

/// The standard not-found page; any route not enumerated at build time
/// lands here.
pub fn render_not_found(config: &SiteConfig) -> String {
    html_shell(
        config,
        "404",
        "page not found",
        "",
        "<main class=\"not-found\"><h1>404</h1><p>This page does not exist.</p><p><a href=\"/\">Back home</a></p></main>",
    )
}

fn render_breadcrumbs(category: Category, title: &str, config: &SiteConfig) -> String {
    format!(
        "<nav class=\"breadcrumbs\"><a href=\"/\">{}</a> / <a href=\"{}\">{}</a> / <span>{}</span></nav>",
        html_escape(&config.base.title),
        category.url_prefix(),
        html_escape(&category.capitalized()),
        html_escape(title),
    )
}

fn html_shell(
    config: &SiteConfig,
    title: &str,
    description: &str,
    body_attrs: &str,
    content: &str,
) -> String {
    let script = if config.analytics.enable {
        analytics::bootstrap_script(&config.analytics.endpoint)
    } else {
        String::new()
    };

    format!(
        "<!doctype html>\n<html lang=\"{lang}\">\n<head>\n<meta charset=\"utf-8\"/>\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"/>\n<title>{title}</title>\n<meta name=\"description\" content=\"{description}\"/>\n</head>\n<body{body_attrs}>\n{content}\n{script}\n</body>\n</html>\n",
        lang = html_escape(&config.base.language),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::render::standard_registry;
    use std::collections::BTreeMap;

    fn test_config(analytics_enabled: bool) -> SiteConfig {
        let mut config = SiteConfig::from_str(
            r#"
            [base]
            title = "Paracosm"
            description = "A personal site"
            language = "en-US"
        "#,
        )
        .unwrap();
        config.analytics.enable = analytics_enabled;
        config
    }

    fn post_model() -> PageModel {
        PageModel {
            category: Category::Post,
            meta: DocumentMeta {
                slug: "hello".into(),
                title: "Hello World".into(),
                emoji: Some("👋".into()),
                ..DocumentMeta::default()
            },
            body: compile("## Intro\n\nbody text").unwrap(),
            embeds: BTreeMap::new(),
        }
    }

    #[test]
    fn test_render_page_head_title_includes_emoji() {
        let html = render_page(&post_model(), &standard_registry(), &test_config(false));
        assert!(html.contains("<title>👋 Hello World</title>"));
    }

    #[test]
    fn test_render_page_breadcrumbs() {
        let html = render_page(&post_model(), &standard_registry(), &test_config(false));
        assert!(html.contains("<a href=\"/\">Paracosm</a>"));
        assert!(html.contains("<a href=\"/posts/\">Posts</a>"));
        assert!(html.contains("<span>Hello World</span>"));
    }

    #[test]
    fn test_render_page_view_event_only_when_enabled() {
        let with = render_page(&post_model(), &standard_registry(), &test_config(true));
        assert!(with.contains("data-page-event=\"view_blog_post\""));
        assert!(with.contains("<script>"));

        let without = render_page(&post_model(), &standard_registry(), &test_config(false));
        assert!(!without.contains("data-page-event"));
        assert!(!without.contains("<script>"));
    }

    #[test]
    fn test_render_page_suppresses_section_tracking_on_posts() {
        // Post routes sit inside the default suppressed prefix set
        let html = render_page(&post_model(), &standard_registry(), &test_config(true));
        assert!(!html.contains("data-observe-section"));
    }

    #[test]
    fn test_render_category_index_lists_documents() {
        let entries = vec![
            DocumentMeta {
                slug: "hello".into(),
                title: "Hello".into(),
                date: Some("2024-06-01".into()),
                ..DocumentMeta::default()
            },
            DocumentMeta {
                slug: "".into(),
                title: "Index".into(),
                ..DocumentMeta::default()
            },
        ];
        let html = render_category_index(Category::Post, &entries, &test_config(false));

        assert!(html.contains("<a href=\"/posts/hello/\">Hello</a>"));
        assert!(html.contains("<a href=\"/posts/\">Index</a>"));
        assert!(html.contains("<time>2024-06-01</time>"));
    }

    #[test]
    fn test_render_home_sections() {
        let sections = vec![
            (
                Category::Post,
                vec![DocumentMeta {
                    slug: "hello".into(),
                    title: "Hello".into(),
                    ..DocumentMeta::default()
                }],
            ),
            (Category::Page, vec![]),
        ];
        let html = render_home(&sections, &test_config(false));

        assert!(html.contains("<title>Paracosm</title>"));
        assert!(html.contains("<a href=\"/posts/\">Posts</a>"));
        assert!(html.contains("<a href=\"/posts/hello/\">Hello</a>"));
        assert!(html.contains("<a href=\"/pages/\">Pages</a>"));
    }

    #[test]
    fn test_render_not_found() {
        let html = render_not_found(&test_config(false));
        assert!(html.contains("404"));
        assert!(html.contains("This page does not exist."));
    }
}
