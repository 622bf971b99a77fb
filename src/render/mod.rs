//! Component-substitution rendering.
//!
//! Re-hydrates a [`CompiledBody`] into HTML by walking the node tree and
//! dispatching each node through a [`Registry`] of element handlers.
//! Rendering is a pure recursive pass: re-entrant, no suspension, safe to
//! invoke repeatedly on the same compiled body, and it never mutates the
//! page model it borrows.

pub mod context;
pub mod handlers;
pub mod registry;
pub mod template;

pub use context::RenderContext;
pub use handlers::standard_registry;
pub use registry::{ElementKind, ElementRenderer, Registry};

use crate::compiler::{CompiledBody, Node};
use std::borrow::Cow;

/// Render a compiled body through a substitution table.
pub fn render(body: &CompiledBody, registry: &Registry, ctx: &RenderContext<'_>) -> String {
    render_nodes(&body.nodes, registry, ctx)
}

/// Render a node list, depth first.
pub fn render_nodes(nodes: &[Node], registry: &Registry, ctx: &RenderContext<'_>) -> String {
    nodes
        .iter()
        .map(|node| render_node(node, registry, ctx))
        .collect()
}

fn render_node(node: &Node, registry: &Registry, ctx: &RenderContext<'_>) -> String {
    let children = match node {
        Node::Heading { children, .. }
        | Node::Paragraph { children }
        | Node::Emphasis { children }
        | Node::Strong { children }
        | Node::Strikethrough { children }
        | Node::Link { children, .. }
        | Node::BlockQuote { children }
        | Node::List { children, .. }
        | Node::ListItem { children } => render_nodes(children, registry, ctx),
        _ => String::new(),
    };

    registry
        .renderer_for(ElementKind::of(node))
        .render(node, &children, ctx)
}

/// Escape HTML special characters.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
#[inline]
pub fn html_escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['<', '>', '&', '"']) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use std::collections::BTreeMap;

    #[test]
    fn test_render_nested_markup_through_default() {
        let compiled = compile("some *emphasis* and **strong** text").unwrap();
        let embeds = BTreeMap::new();
        let ctx = RenderContext::new(false, &embeds);

        let html = render(&compiled, &Registry::empty(), &ctx);
        assert_eq!(
            html,
            "<p>some <em>emphasis</em> and <strong>strong</strong> text</p>"
        );
    }

    #[test]
    fn test_render_is_repeatable() {
        let compiled = compile("## Title\n\nbody text").unwrap();
        let embeds = BTreeMap::new();
        let ctx = RenderContext::new(false, &embeds);
        let registry = standard_registry();

        let first = render(&compiled, &registry, &ctx);
        let second = render(&compiled, &registry, &ctx);
        assert_eq!(first, second);
    }

    #[test]
    fn test_html_escape_plain() {
        assert_eq!(html_escape("hello world"), "hello world");
    }

    #[test]
    fn test_html_escape_special_chars() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("say \"hi\""), "say &quot;hi&quot;");
    }

    #[test]
    fn test_html_escape_empty() {
        assert_eq!(html_escape(""), "");
    }
}
