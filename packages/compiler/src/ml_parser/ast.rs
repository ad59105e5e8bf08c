//! ML Parser AST
//!
//! Markup node definitions. Every node keeps the byte spans the template
//! parser needs to anchor diagnostics and rebase embedded expressions.

use crate::parse_util::SourceSpan;

use super::tags::split_ns_name;

/// Node type union
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(Text),
    Comment(Comment),
    ProcessingInstruction(ProcessingInstruction),
}

impl Node {
    pub fn source_span(&self) -> SourceSpan {
        match self {
            Node::Element(el) => el.source_span,
            Node::Text(text) => text.source_span,
            Node::Comment(comment) => comment.source_span,
            Node::ProcessingInstruction(pi) => pi.source_span,
        }
    }
}

/// Attribute node
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    pub source_span: SourceSpan,
    pub name_span: SourceSpan,
    /// Span of the value text, excluding quotes. `None` for valueless attributes.
    pub value_span: Option<SourceSpan>,
}

impl Attribute {
    /// Where the value starts, or where it would start for a valueless attribute.
    pub fn value_offset(&self) -> usize {
        self.value_span.map(|span| span.start).unwrap_or(self.name_span.end)
    }

    pub fn value_or_name_span(&self) -> SourceSpan {
        self.value_span.unwrap_or(self.name_span)
    }
}

/// Element node
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Node>,
    pub is_self_closing: bool,
    pub source_span: SourceSpan,
    pub start_source_span: SourceSpan,
    pub name_span: SourceSpan,
    pub end_source_span: Option<SourceSpan>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&Attribute> {
        self.attrs.iter().find(|attr| attr.name == name)
    }

    /// `(prefix, local name)` for namespaced tags such as `std:foreach`.
    pub fn ns_name(&self) -> Option<(&str, &str)> {
        split_ns_name(&self.name)
    }
}

/// Text node
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub value: String,
    pub source_span: SourceSpan,
}

/// Comment node
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub value: String,
    pub source_span: SourceSpan,
}

/// `<?target content?>`
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingInstruction {
    pub target: String,
    pub content: String,
    pub source_span: SourceSpan,
    /// Span of `content`, trimmed of surrounding whitespace.
    pub content_span: SourceSpan,
}
