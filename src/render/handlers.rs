//! The standard substitution table.
//!
//! Instrumented and styled variants for the element kinds the default
//! passthrough is not enough for: headings get anchor ids and section-view
//! hooks, links get click tracking and forced new-tab behavior, images get
//! fixed intrinsic dimensions, code blocks a language-classed wrapper, and
//! component invocations are resolved against the page's embed mapping.

use crate::compiler::Node;
use crate::render::context::RenderContext;
use crate::render::html_escape;
use crate::render::registry::{ElementKind, ElementRenderer, Registry};
use std::collections::BTreeMap;

/// Intrinsic image dimensions; actual sizing is the stylesheet's job.
const IMAGE_WIDTH: u32 = 1080;
const IMAGE_HEIGHT: u32 = 600;

/// The full substitution table used for page rendering.
pub fn standard_registry() -> Registry {
    Registry::empty()
        .with_handler(ElementKind::Heading, AnchoredHeading)
        .with_handler(ElementKind::Link, TrackedAnchor)
        .with_handler(ElementKind::Image, ThemedImage)
        .with_handler(ElementKind::CodeBlock, CodeBlock)
        .with_handler(ElementKind::Paragraph, UnwrappingParagraph)
        .with_handler(ElementKind::Component, EmbeddedComponent)
}

/// Derive an anchor id from heading text: lower-cased, spaces replaced
/// with hyphens. Duplicate headings produce duplicate ids.
pub fn derive_heading_id(text: &str) -> String {
    text.to_lowercase().replace(' ', "-")
}

// ============================================================================
// Headings
// ============================================================================

/// Headings with anchor ids and a section-view hook.
///
/// An explicitly provided id wins; otherwise the id is derived from the
/// heading's literal text. The `data-observe-section` attribute drives the
/// visibility-triggered `view_landing_section` event and is emitted only
/// when the context's tracking flag is on.
pub struct AnchoredHeading;

impl ElementRenderer for AnchoredHeading {
    fn render(&self, node: &Node, children: &str, ctx: &RenderContext<'_>) -> String {
        let Node::Heading { level, id, .. } = node else {
            return children.to_owned();
        };

        let id = id
            .clone()
            .unwrap_or_else(|| derive_heading_id(&node.plain_text()));
        let id = html_escape(&id).into_owned();

        if ctx.track_analytics && !id.is_empty() {
            format!("<h{level} id=\"{id}\" data-observe-section=\"{id}\">{children}</h{level}>")
        } else {
            format!("<h{level} id=\"{id}\">{children}</h{level}>")
        }
    }
}

// ============================================================================
// Links
// ============================================================================

/// Anchors with click tracking and forced new-tab behavior.
pub struct TrackedAnchor;

impl ElementRenderer for TrackedAnchor {
    fn render(&self, node: &Node, children: &str, ctx: &RenderContext<'_>) -> String {
        let Node::Link { href, .. } = node else {
            return children.to_owned();
        };

        let href = html_escape(href);
        if ctx.track_analytics {
            let label = node.plain_text();
            let label = if label.is_empty() { "unknown" } else { label.as_str() };
            format!(
                "<a href=\"{href}\" target=\"_blank\" rel=\"noreferrer\" data-track-click=\"{}\">{children}</a>",
                html_escape(label)
            )
        } else {
            format!("<a href=\"{href}\" target=\"_blank\" rel=\"noreferrer\">{children}</a>")
        }
    }
}

// ============================================================================
// Images
// ============================================================================

/// Images with fixed intrinsic dimensions and the themed border class.
pub struct ThemedImage;

impl ElementRenderer for ThemedImage {
    fn render(&self, node: &Node, _children: &str, _ctx: &RenderContext<'_>) -> String {
        let Node::Image { src, alt } = node else {
            return String::new();
        };
        render_image(src, alt)
    }
}

fn render_image(src: &str, alt: &str) -> String {
    format!(
        "<img src=\"{}\" alt=\"{}\" width=\"{IMAGE_WIDTH}\" height=\"{IMAGE_HEIGHT}\" class=\"content-image\" loading=\"lazy\"/>",
        html_escape(src),
        html_escape(alt)
    )
}

// ============================================================================
// Code Blocks
// ============================================================================

/// Fenced code blocks with a language class on the inner `<code>`.
pub struct CodeBlock;

impl ElementRenderer for CodeBlock {
    fn render(&self, node: &Node, _children: &str, _ctx: &RenderContext<'_>) -> String {
        let Node::CodeBlock { lang, code } = node else {
            return String::new();
        };

        let code = html_escape(code);
        if lang.is_empty() {
            format!("<div class=\"code-block\"><pre><code>{code}</code></pre></div>")
        } else {
            format!(
                "<div class=\"code-block\"><pre><code class=\"language-{}\">{code}</code></pre></div>",
                html_escape(lang)
            )
        }
    }
}

// ============================================================================
// Paragraphs
// ============================================================================

/// Paragraphs that unwrap a sole block-level child.
///
/// A paragraph whose only child is an image or a component invocation
/// renders its child bare, avoiding duplicate spacing around block-shaped
/// content.
pub struct UnwrappingParagraph;

impl ElementRenderer for UnwrappingParagraph {
    fn render(&self, node: &Node, children: &str, _ctx: &RenderContext<'_>) -> String {
        if let Node::Paragraph { children: nodes } = node
            && let [Node::Image { .. } | Node::Component { .. }] = nodes.as_slice()
        {
            return children.to_owned();
        }
        format!("<p>{children}</p>")
    }
}

// ============================================================================
// Components
// ============================================================================

/// Component invocations resolved against the page's embed mapping.
///
/// `Tweet` renders the resolved snapshot as a citation card, falling back
/// to a plain link when the id has no record (lookup failed or embeds
/// disabled). `Image` renders like a markdown image. Anything else renders
/// to an HTML comment.
pub struct EmbeddedComponent;

impl ElementRenderer for EmbeddedComponent {
    fn render(&self, node: &Node, _children: &str, ctx: &RenderContext<'_>) -> String {
        let Node::Component { name, attrs } = node else {
            return String::new();
        };

        match name.as_str() {
            "Tweet" => render_tweet(attrs, ctx),
            "Image" => render_image(
                attrs.get("src").map_or("", String::as_str),
                attrs.get("alt").map_or("", String::as_str),
            ),
            _ => format!("<!-- unknown component: {name} -->"),
        }
    }
}

fn render_tweet(attrs: &BTreeMap<String, String>, ctx: &RenderContext<'_>) -> String {
    let Some(id) = attrs.get("id") else {
        return "<!-- tweet without id -->".to_owned();
    };

    match ctx.embeds.get(id) {
        Some(record) => format!(
            "<blockquote class=\"tweet\"><p>{}</p><footer>{} (@{}) · <a href=\"{}\" target=\"_blank\" rel=\"noreferrer\">source</a></footer></blockquote>",
            html_escape(&record.text),
            html_escape(&record.author_name),
            html_escape(&record.author_handle),
            html_escape(&record.url),
        ),
        None => format!(
            "<p class=\"tweet-unresolved\"><a href=\"https://twitter.com/i/status/{}\" target=\"_blank\" rel=\"noreferrer\">View post</a></p>",
            html_escape(id)
        ),
    }
}
