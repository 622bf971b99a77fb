//! Typed element-renderer registry.
//!
//! Every node kind in the compiled tree is an enumerated [`ElementKind`].
//! The registry maps kinds to handlers behind the shared
//! [`ElementRenderer`] trait; kinds without a registered handler fall back
//! to the default passthrough renderer, never a lookup miss.

use crate::compiler::Node;
use crate::render::context::RenderContext;
use crate::render::html_escape;
use std::collections::HashMap;

/// Enumerated kinds of compiled-tree nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Heading,
    Paragraph,
    Text,
    Emphasis,
    Strong,
    Strikethrough,
    Link,
    Image,
    CodeBlock,
    InlineCode,
    BlockQuote,
    List,
    ListItem,
    Rule,
    HardBreak,
    Html,
    Component,
}

impl ElementKind {
    /// The kind of a compiled node.
    pub const fn of(node: &Node) -> Self {
        match node {
            Node::Heading { .. } => Self::Heading,
            Node::Paragraph { .. } => Self::Paragraph,
            Node::Text { .. } => Self::Text,
            Node::Emphasis { .. } => Self::Emphasis,
            Node::Strong { .. } => Self::Strong,
            Node::Strikethrough { .. } => Self::Strikethrough,
            Node::Link { .. } => Self::Link,
            Node::Image { .. } => Self::Image,
            Node::CodeBlock { .. } => Self::CodeBlock,
            Node::InlineCode { .. } => Self::InlineCode,
            Node::BlockQuote { .. } => Self::BlockQuote,
            Node::List { .. } => Self::List,
            Node::ListItem { .. } => Self::ListItem,
            Node::Rule => Self::Rule,
            Node::HardBreak => Self::HardBreak,
            Node::Html { .. } => Self::Html,
            Node::Component { .. } => Self::Component,
        }
    }
}

/// A rendering handler for one element kind.
///
/// `children` is the already-rendered HTML of the node's children; leaf
/// nodes receive the empty string.
pub trait ElementRenderer: Send + Sync {
    fn render(&self, node: &Node, children: &str, ctx: &RenderContext<'_>) -> String;
}

/// Element-kind to handler mapping. Pure configuration, supplied at render
/// call time.
#[derive(Default)]
pub struct Registry {
    handlers: HashMap<ElementKind, Box<dyn ElementRenderer>>,
}

impl Registry {
    /// A registry with no substitutions; every kind renders through the
    /// default passthrough.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register a handler for a kind, replacing any previous one.
    pub fn with_handler(
        mut self,
        kind: ElementKind,
        handler: impl ElementRenderer + 'static,
    ) -> Self {
        self.handlers.insert(kind, Box::new(handler));
        self
    }

    /// The handler for a kind, or the default passthrough renderer.
    pub fn renderer_for(&self, kind: ElementKind) -> &dyn ElementRenderer {
        static DEFAULT: DefaultRenderer = DefaultRenderer;
        match self.handlers.get(&kind) {
            Some(handler) => handler.as_ref(),
            None => &DEFAULT,
        }
    }
}

/// Default passthrough rendering for every node kind.
pub struct DefaultRenderer;

impl ElementRenderer for DefaultRenderer {
    fn render(&self, node: &Node, children: &str, _ctx: &RenderContext<'_>) -> String {
        match node {
            Node::Heading { level, id, .. } => match id {
                Some(id) => format!("<h{level} id=\"{}\">{children}</h{level}>", html_escape(id)),
                None => format!("<h{level}>{children}</h{level}>"),
            },
            Node::Paragraph { .. } => format!("<p>{children}</p>"),
            Node::Text { text } => html_escape(text).into_owned(),
            Node::Emphasis { .. } => format!("<em>{children}</em>"),
            Node::Strong { .. } => format!("<strong>{children}</strong>"),
            Node::Strikethrough { .. } => format!("<s>{children}</s>"),
            Node::Link { href, title, .. } => {
                if title.is_empty() {
                    format!("<a href=\"{}\">{children}</a>", html_escape(href))
                } else {
                    format!(
                        "<a href=\"{}\" title=\"{}\">{children}</a>",
                        html_escape(href),
                        html_escape(title)
                    )
                }
            }
            Node::Image { src, alt } => format!(
                "<img src=\"{}\" alt=\"{}\"/>",
                html_escape(src),
                html_escape(alt)
            ),
            Node::CodeBlock { lang, code } => {
                if lang.is_empty() {
                    format!("<pre><code>{}</code></pre>", html_escape(code))
                } else {
                    format!(
                        "<pre><code class=\"language-{}\">{}</code></pre>",
                        html_escape(lang),
                        html_escape(code)
                    )
                }
            }
            Node::InlineCode { code } => format!("<code>{}</code>", html_escape(code)),
            Node::BlockQuote { .. } => format!("<blockquote>{children}</blockquote>"),
            Node::List { start, .. } => match start {
                Some(1) => format!("<ol>{children}</ol>"),
                Some(start) => format!("<ol start=\"{start}\">{children}</ol>"),
                None => format!("<ul>{children}</ul>"),
            },
            Node::ListItem { .. } => format!("<li>{children}</li>"),
            Node::Rule => "<hr/>".to_owned(),
            Node::HardBreak => "<br/>".to_owned(),
            Node::Html { html } => html.clone(),
            Node::Component { name, .. } => format!("<!-- unknown component: {name} -->"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn ctx_with<'a>(embeds: &'a BTreeMap<String, crate::compiler::EmbedRecord>) -> RenderContext<'a> {
        RenderContext::new(false, embeds)
    }

    #[test]
    fn test_default_renderer_for_unregistered_kind() {
        let registry = Registry::empty();
        let embeds = BTreeMap::new();
        let ctx = ctx_with(&embeds);

        let node = Node::Text {
            text: "hi".to_owned(),
        };
        let out = registry
            .renderer_for(ElementKind::of(&node))
            .render(&node, "", &ctx);
        assert_eq!(out, "hi");
    }

    #[test]
    fn test_default_escapes_text() {
        let embeds = BTreeMap::new();
        let ctx = ctx_with(&embeds);
        let node = Node::Text {
            text: "<script>".to_owned(),
        };
        assert_eq!(DefaultRenderer.render(&node, "", &ctx), "&lt;script&gt;");
    }

    #[test]
    fn test_default_list_variants() {
        let embeds = BTreeMap::new();
        let ctx = ctx_with(&embeds);

        let bullet = Node::List {
            start: None,
            children: vec![],
        };
        let ordered = Node::List {
            start: Some(3),
            children: vec![],
        };
        assert_eq!(DefaultRenderer.render(&bullet, "<li>x</li>", &ctx), "<ul><li>x</li></ul>");
        assert_eq!(
            DefaultRenderer.render(&ordered, "<li>x</li>", &ctx),
            "<ol start=\"3\"><li>x</li></ol>"
        );
    }

    #[test]
    fn test_default_unknown_component_is_comment() {
        let embeds = BTreeMap::new();
        let ctx = ctx_with(&embeds);
        let node = Node::Component {
            name: "Widget".to_owned(),
            attrs: BTreeMap::new(),
        };
        assert_eq!(
            DefaultRenderer.render(&node, "", &ctx),
            "<!-- unknown component: Widget -->"
        );
    }

    struct Upcase;
    impl ElementRenderer for Upcase {
        fn render(&self, node: &Node, _children: &str, _ctx: &RenderContext<'_>) -> String {
            node.plain_text().to_uppercase()
        }
    }

    #[test]
    fn test_registered_handler_substitutes_default() {
        let registry = Registry::empty().with_handler(ElementKind::Text, Upcase);
        let embeds = BTreeMap::new();
        let ctx = ctx_with(&embeds);

        let node = Node::Text {
            text: "hi".to_owned(),
        };
        let out = registry
            .renderer_for(ElementKind::of(&node))
            .render(&node, "", &ctx);
        assert_eq!(out, "HI");
    }
}
