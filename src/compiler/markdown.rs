//! Markdown compilation into a serializable node tree.
//!
//! `compile` parses the authoring syntax (markdown plus self-closing
//! component invocations such as `<Tweet id="…"/>`) into [`CompiledBody`],
//! a render-target-independent intermediate form. Compilation is
//! deterministic and performs no I/O; embed resolution happens separately
//! over the same raw body.
//!
//! The tree is opaque to everything except the substitution renderer,
//! which walks it node by node.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use thiserror::Error;

/// A well-formed self-closing component invocation:
/// `<Name attr="value" other="value"/>`.
static COMPONENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^<([A-Z][A-Za-z0-9]*)((?:\s+[A-Za-z_][A-Za-z0-9_-]*="[^"]*")*)\s*/>$"#)
        .expect("component regex is valid")
});

/// One `attr="value"` pair inside a component invocation.
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][A-Za-z0-9_-]*)="([^"]*)""#).expect("attr regex is valid")
});

/// Compilation errors. Fatal to the document's build.
#[derive(Debug, Error)]
pub enum CompileError {
    /// An uppercase tag that is not a well-formed self-closing invocation.
    #[error("invalid component invocation: `{construct}`")]
    InvalidComponent { construct: String },
}

/// Serialized renderable form of a document body.
///
/// Invariant: compiling the same raw body always yields a structurally
/// equal tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompiledBody {
    pub nodes: Vec<Node>,
}

/// One node of the compiled tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Heading {
        level: u8,
        /// Explicit id from heading attributes (`## Title {#custom}`).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        children: Vec<Node>,
    },
    Paragraph {
        children: Vec<Node>,
    },
    Text {
        text: String,
    },
    Emphasis {
        children: Vec<Node>,
    },
    Strong {
        children: Vec<Node>,
    },
    Strikethrough {
        children: Vec<Node>,
    },
    Link {
        href: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        title: String,
        children: Vec<Node>,
    },
    Image {
        src: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        alt: String,
    },
    CodeBlock {
        #[serde(default, skip_serializing_if = "String::is_empty")]
        lang: String,
        code: String,
    },
    InlineCode {
        code: String,
    },
    BlockQuote {
        children: Vec<Node>,
    },
    List {
        /// Start index for ordered lists, None for bullet lists.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<u64>,
        children: Vec<Node>,
    },
    ListItem {
        children: Vec<Node>,
    },
    Rule,
    HardBreak,
    /// Raw lowercase HTML passed through untouched.
    Html {
        html: String,
    },
    /// A component invocation with its literal attributes.
    Component {
        name: String,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        attrs: BTreeMap<String, String>,
    },
}

impl Node {
    /// Literal text content of this node and its descendants.
    pub fn plain_text(&self) -> String {
        fn collect(node: &Node, out: &mut String) {
            match node {
                Node::Text { text } | Node::InlineCode { code: text } => out.push_str(text),
                Node::Heading { children, .. }
                | Node::Paragraph { children }
                | Node::Emphasis { children }
                | Node::Strong { children }
                | Node::Strikethrough { children }
                | Node::Link { children, .. }
                | Node::BlockQuote { children }
                | Node::List { children, .. }
                | Node::ListItem { children } => children.iter().for_each(|c| collect(c, out)),
                Node::Image { alt, .. } => out.push_str(alt),
                _ => {}
            }
        }
        let mut out = String::new();
        collect(self, &mut out);
        out
    }
}

/// Compile a raw body into its serializable intermediate form.
///
/// Deterministic and side-effect-free: no network, no filesystem. Invalid
/// component syntax fails the compilation, naming the offending construct.
pub fn compile(body: &str) -> Result<CompiledBody, CompileError> {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_HEADING_ATTRIBUTES;
    let parser = Parser::new_ext(body, options);

    let mut builder = TreeBuilder::new();
    for event in parser {
        builder.push_event(event)?;
    }
    Ok(CompiledBody {
        nodes: builder.finish(),
    })
}

// ============================================================================
// Tree Building
// ============================================================================

/// In-progress container while walking parser events.
enum Frame {
    Heading { level: u8, id: Option<String>, children: Vec<Node> },
    Paragraph { children: Vec<Node> },
    Emphasis { children: Vec<Node> },
    Strong { children: Vec<Node> },
    Strikethrough { children: Vec<Node> },
    Link { href: String, title: String, children: Vec<Node> },
    Image { src: String, alt: String },
    CodeBlock { lang: String, code: String },
    BlockQuote { children: Vec<Node> },
    List { start: Option<u64>, children: Vec<Node> },
    ListItem { children: Vec<Node> },
    HtmlBlock { html: String },
    /// Unsupported container (tables, footnotes); children merge into parent.
    Transparent { children: Vec<Node> },
}

struct TreeBuilder {
    root: Vec<Node>,
    stack: Vec<Frame>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            root: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn push_event(&mut self, event: Event<'_>) -> Result<(), CompileError> {
        match event {
            Event::Start(tag) => self.start_frame(tag),
            Event::End(_) => self.end_frame()?,
            Event::Text(text) => self.push_text(&text),
            Event::Code(code) => self.attach(Node::InlineCode {
                code: code.into_string(),
            }),
            Event::Html(html) | Event::InlineHtml(html) => self.push_html(&html)?,
            Event::SoftBreak => self.push_text("\n"),
            Event::HardBreak => self.attach(Node::HardBreak),
            Event::Rule => self.attach(Node::Rule),
            _ => {}
        }
        Ok(())
    }

    fn start_frame(&mut self, tag: Tag<'_>) {
        let frame = match tag {
            Tag::Paragraph => Frame::Paragraph { children: Vec::new() },
            Tag::Heading { level, id, .. } => Frame::Heading {
                level: heading_level(level),
                id: id.map(|i| i.into_string()),
                children: Vec::new(),
            },
            Tag::BlockQuote(_) => Frame::BlockQuote { children: Vec::new() },
            Tag::CodeBlock(kind) => Frame::CodeBlock {
                lang: match kind {
                    CodeBlockKind::Fenced(lang) => lang.into_string(),
                    CodeBlockKind::Indented => String::new(),
                },
                code: String::new(),
            },
            Tag::List(start) => Frame::List {
                start,
                children: Vec::new(),
            },
            Tag::Item => Frame::ListItem { children: Vec::new() },
            Tag::Emphasis => Frame::Emphasis { children: Vec::new() },
            Tag::Strong => Frame::Strong { children: Vec::new() },
            Tag::Strikethrough => Frame::Strikethrough { children: Vec::new() },
            Tag::Link { dest_url, title, .. } => Frame::Link {
                href: dest_url.into_string(),
                title: title.into_string(),
                children: Vec::new(),
            },
            Tag::Image { dest_url, .. } => Frame::Image {
                src: dest_url.into_string(),
                alt: String::new(),
            },
            Tag::HtmlBlock => Frame::HtmlBlock { html: String::new() },
            _ => Frame::Transparent { children: Vec::new() },
        };
        self.stack.push(frame);
    }

    fn end_frame(&mut self) -> Result<(), CompileError> {
        let Some(frame) = self.stack.pop() else {
            return Ok(());
        };

        match frame {
            Frame::Heading { level, id, children } => {
                self.attach(Node::Heading { level, id, children });
            }
            Frame::Paragraph { children } => self.attach(Node::Paragraph { children }),
            Frame::Emphasis { children } => self.attach(Node::Emphasis { children }),
            Frame::Strong { children } => self.attach(Node::Strong { children }),
            Frame::Strikethrough { children } => self.attach(Node::Strikethrough { children }),
            Frame::Link { href, title, children } => {
                self.attach(Node::Link { href, title, children });
            }
            Frame::Image { src, alt } => self.attach(Node::Image { src, alt }),
            Frame::CodeBlock { lang, code } => self.attach(Node::CodeBlock { lang, code }),
            Frame::BlockQuote { children } => self.attach(Node::BlockQuote { children }),
            Frame::List { start, children } => self.attach(Node::List { start, children }),
            Frame::ListItem { children } => self.attach(Node::ListItem { children }),
            Frame::HtmlBlock { html } => {
                let node = classify_html(html.trim())?;
                self.attach(node);
            }
            Frame::Transparent { children } => {
                for child in children {
                    self.attach(child);
                }
            }
        }
        Ok(())
    }

    fn push_text(&mut self, text: &str) {
        match self.stack.last_mut() {
            Some(Frame::CodeBlock { code, .. }) => code.push_str(text),
            Some(Frame::HtmlBlock { html }) => html.push_str(text),
            Some(Frame::Image { alt, .. }) => alt.push_str(text),
            _ => self.attach(Node::Text {
                text: text.to_owned(),
            }),
        }
    }

    fn push_html(&mut self, html: &str) -> Result<(), CompileError> {
        // Inside an HTML block the raw lines are buffered and classified once
        // the block closes; inline HTML is classified immediately.
        if let Some(Frame::HtmlBlock { html: buffer }) = self.stack.last_mut() {
            buffer.push_str(html);
            return Ok(());
        }
        let node = classify_html(html.trim())?;
        self.attach(node);
        Ok(())
    }

    fn attach(&mut self, node: Node) {
        match self.stack.last_mut() {
            None => self.root.push(node),
            Some(Frame::Image { alt, .. }) => alt.push_str(&node.plain_text()),
            Some(Frame::CodeBlock { code, .. }) => code.push_str(&node.plain_text()),
            Some(Frame::HtmlBlock { html }) => html.push_str(&node.plain_text()),
            Some(
                Frame::Heading { children, .. }
                | Frame::Paragraph { children }
                | Frame::Emphasis { children }
                | Frame::Strong { children }
                | Frame::Strikethrough { children }
                | Frame::Link { children, .. }
                | Frame::BlockQuote { children }
                | Frame::List { children, .. }
                | Frame::ListItem { children }
                | Frame::Transparent { children },
            ) => children.push(node),
        }
    }

    fn finish(mut self) -> Vec<Node> {
        // Unterminated frames only occur on malformed parser streams; drain
        // them so no content is silently dropped.
        while !self.stack.is_empty() {
            let _ = self.end_frame();
        }
        self.root
    }
}

/// Classify raw HTML: component invocation, invalid invocation, or plain
/// passthrough HTML.
fn classify_html(html: &str) -> Result<Node, CompileError> {
    if let Some(caps) = COMPONENT_RE.captures(html) {
        let name = caps[1].to_owned();
        let attrs = ATTR_RE
            .captures_iter(&caps[2])
            .map(|attr| (attr[1].to_owned(), attr[2].to_owned()))
            .collect();
        return Ok(Node::Component { name, attrs });
    }

    // An uppercase tag that failed the pattern is an authoring error, not
    // passthrough HTML.
    if looks_like_component(html) {
        return Err(CompileError::InvalidComponent {
            construct: html.to_owned(),
        });
    }

    Ok(Node::Html {
        html: html.to_owned(),
    })
}

/// True when the markup starts with `<` followed by an ASCII uppercase letter.
fn looks_like_component(html: &str) -> bool {
    let mut chars = html.chars();
    chars.next() == Some('<') && chars.next().is_some_and(|c| c.is_ascii_uppercase())
}

const fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

// ============================================================================
// Tests
// ============================================================================
