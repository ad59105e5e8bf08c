//! ML Parser
//!
//! Lenient single-pass markup parser. Tokenizing and tree building happen in
//! one scan with a stack of open elements; malformed markup is reported as
//! diagnostics and the parser keeps going so the template parser sees as much
//! of the tree as possible.

use crate::chars;
use crate::parse_util::{Diagnostic, SourceSpan};

use super::ast::*;
use super::tags::{get_content_type, is_void_element, TagContentType};

/// Parse tree result
#[derive(Debug, Clone)]
pub struct ParseTreeResult {
    pub root_nodes: Vec<Node>,
    pub errors: Vec<Diagnostic>,
}

/// Main parser class
#[derive(Debug, Default, Clone, Copy)]
pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Parser
    }

    pub fn parse(&self, source: &str) -> ParseTreeResult {
        TreeBuilder::new(source).build()
    }
}

/// Parse `source` with the default parser.
pub fn parse(source: &str) -> ParseTreeResult {
    Parser::new().parse(source)
}

/// Internal tree builder
struct TreeBuilder<'s> {
    source: &'s str,
    pos: usize,
    stack: Vec<Element>,
    root_nodes: Vec<Node>,
    errors: Vec<Diagnostic>,
}

impl<'s> TreeBuilder<'s> {
    fn new(source: &'s str) -> Self {
        TreeBuilder {
            source,
            pos: 0,
            stack: Vec::new(),
            root_nodes: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn build(mut self) -> ParseTreeResult {
        while !self.at_end() {
            if self.starts_with("<!--") {
                self.consume_comment();
            } else if self.starts_with("<![CDATA[") {
                self.consume_cdata();
            } else if self.starts_with("<!") {
                self.consume_doc_type();
            } else if self.starts_with("<?") {
                self.consume_processing_instruction();
            } else if self.starts_with("</") && self.is_name_start_at(2) {
                self.consume_end_tag();
            } else if self.peek() == chars::LT && self.is_name_start_at(1) {
                self.consume_start_tag();
            } else {
                self.consume_text();
            }
        }

        while let Some(mut el) = self.stack.pop() {
            self.errors.push(Diagnostic::at(
                el.start_source_span,
                format!("Unclosed element \"{}\"", el.name),
            ));
            el.source_span.end = self.source.len();
            self.add_node(Node::Element(el));
        }

        ParseTreeResult {
            root_nodes: self.root_nodes,
            errors: self.errors,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn peek(&self) -> char {
        self.source[self.pos..].chars().next().unwrap_or(chars::EOF)
    }

    fn advance(&mut self) {
        if let Some(ch) = self.source[self.pos..].chars().next() {
            self.pos += ch.len_utf8();
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        self.source[self.pos..].starts_with(s)
    }

    fn is_name_start_at(&self, delta: usize) -> bool {
        self.source
            .get(self.pos + delta..)
            .and_then(|rest| rest.chars().next())
            .map_or(false, |ch| ch.is_ascii_alphabetic())
    }

    fn skip_whitespace(&mut self) {
        while chars::is_whitespace(self.peek()) {
            self.advance();
        }
    }

    fn read_name(&mut self) -> SourceSpan {
        let start = self.pos;
        while !self.at_end() && !chars::is_name_end(self.peek()) {
            self.advance();
        }
        SourceSpan::new(start, self.pos)
    }

    /// Byte offset of `needle` in the unread input.
    fn find(&self, needle: &str) -> Option<usize> {
        self.source[self.pos..].find(needle)
    }

    fn add_node(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root_nodes.push(node),
        }
    }

    fn is_construct_start(&self) -> bool {
        self.peek() == chars::LT
            && (self.starts_with("<!")
                || self.starts_with("<?")
                || (self.starts_with("</") && self.is_name_start_at(2))
                || self.is_name_start_at(1))
    }

    fn consume_text(&mut self) {
        let start = self.pos;
        self.advance();
        while !self.at_end() && !self.is_construct_start() {
            self.advance();
        }
        let span = SourceSpan::new(start, self.pos);
        self.add_node(Node::Text(Text {
            value: span.slice(self.source).to_string(),
            source_span: span,
        }));
    }

    fn consume_comment(&mut self) {
        let start = self.pos;
        self.pos += "<!--".len();
        let value = match self.find("-->") {
            Some(index) => {
                let value = self.source[self.pos..self.pos + index].to_string();
                self.pos += index + "-->".len();
                value
            }
            None => {
                self.errors.push(Diagnostic::new(start, self.source.len(), "Unterminated comment"));
                let value = self.source[self.pos..].to_string();
                self.pos = self.source.len();
                value
            }
        };
        self.add_node(Node::Comment(Comment {
            value,
            source_span: SourceSpan::new(start, self.pos),
        }));
    }

    fn consume_cdata(&mut self) {
        let start = self.pos;
        self.pos += "<![CDATA[".len();
        let value = match self.find("]]>") {
            Some(index) => {
                let value = self.source[self.pos..self.pos + index].to_string();
                self.pos += index + "]]>".len();
                value
            }
            None => {
                self.errors.push(Diagnostic::new(
                    start,
                    self.source.len(),
                    "Unterminated CDATA section",
                ));
                let value = self.source[self.pos..].to_string();
                self.pos = self.source.len();
                value
            }
        };
        self.add_node(Node::Text(Text {
            value,
            source_span: SourceSpan::new(start, self.pos),
        }));
    }

    fn consume_doc_type(&mut self) {
        match self.find(">") {
            Some(index) => self.pos += index + 1,
            None => self.pos = self.source.len(),
        }
    }

    fn consume_processing_instruction(&mut self) {
        let start = self.pos;
        self.pos += "<?".len();
        let target_start = self.pos;
        while !self.at_end()
            && !chars::is_whitespace(self.peek())
            && self.peek() != chars::QUESTION
            && self.peek() != chars::GT
        {
            self.advance();
        }
        let target = self.source[target_start..self.pos].to_string();

        let source = self.source;
        let content_start = self.pos;
        let raw = match self.find("?>") {
            Some(index) => {
                let raw = &source[content_start..content_start + index];
                self.pos += index + "?>".len();
                raw
            }
            None => {
                self.errors.push(Diagnostic::new(
                    start,
                    self.source.len(),
                    "Unterminated processing instruction",
                ));
                self.pos = source.len();
                &source[content_start..]
            }
        };
        let leading = raw.len() - raw.trim_start().len();
        let content = raw.trim();
        let content_span = SourceSpan::new(
            content_start + leading,
            content_start + leading + content.len(),
        );
        self.add_node(Node::ProcessingInstruction(ProcessingInstruction {
            target,
            content: content.to_string(),
            source_span: SourceSpan::new(start, self.pos),
            content_span,
        }));
    }

    fn consume_start_tag(&mut self) {
        let start = self.pos;
        self.advance();
        let name_span = self.read_name();
        let name = name_span.slice(self.source).to_string();
        let mut attrs = Vec::new();
        let mut is_self_closing = false;

        loop {
            self.skip_whitespace();
            if self.at_end() {
                self.errors.push(Diagnostic::new(
                    start,
                    self.pos,
                    format!("Unexpected end of input in tag \"{}\"", name),
                ));
                is_self_closing = true;
                break;
            }
            if self.peek() == chars::GT {
                self.advance();
                break;
            }
            if self.starts_with("/>") {
                self.pos += 2;
                is_self_closing = true;
                break;
            }
            if self.peek() == chars::LT {
                self.errors.push(Diagnostic::new(
                    start,
                    self.pos,
                    format!("Unterminated start tag \"{}\"", name),
                ));
                break;
            }
            match self.consume_attribute() {
                Some(attr) => attrs.push(attr),
                None => {
                    let bad = self.pos;
                    let ch = self.peek();
                    self.advance();
                    self.errors.push(Diagnostic::new(
                        bad,
                        self.pos,
                        format!("Unexpected character \"{}\"", ch),
                    ));
                }
            }
        }

        let start_source_span = SourceSpan::new(start, self.pos);
        let element = Element {
            name,
            attrs,
            children: Vec::new(),
            is_self_closing,
            source_span: start_source_span,
            start_source_span,
            name_span,
            end_source_span: None,
        };

        if is_self_closing || is_void_element(&element.name) {
            self.add_node(Node::Element(element));
        } else if get_content_type(&element.name) == TagContentType::RawText {
            self.consume_raw_text(element);
        } else {
            self.stack.push(element);
        }
    }

    fn consume_attribute(&mut self) -> Option<Attribute> {
        let start = self.pos;
        let name_span = self.read_name();
        if name_span.is_empty() {
            return None;
        }

        let before_eq = self.pos;
        self.skip_whitespace();
        let value_span = if self.peek() == chars::EQ {
            self.advance();
            self.skip_whitespace();
            Some(self.consume_attribute_value())
        } else {
            self.pos = before_eq;
            None
        };

        Some(Attribute {
            name: name_span.slice(self.source).to_string(),
            value: value_span
                .map(|span| span.slice(self.source).to_string())
                .unwrap_or_default(),
            source_span: SourceSpan::new(start, self.pos),
            name_span,
            value_span,
        })
    }

    fn consume_attribute_value(&mut self) -> SourceSpan {
        let quote = self.peek();
        if chars::is_quote(quote) {
            self.advance();
            let value_start = self.pos;
            while !self.at_end() && self.peek() != quote {
                self.advance();
            }
            let span = SourceSpan::new(value_start, self.pos);
            if self.at_end() {
                self.errors.push(Diagnostic::new(
                    value_start - 1,
                    self.pos,
                    "Unterminated attribute value",
                ));
            } else {
                self.advance();
            }
            span
        } else {
            let value_start = self.pos;
            while !self.at_end()
                && !chars::is_whitespace(self.peek())
                && self.peek() != chars::GT
                && !self.starts_with("/>")
            {
                self.advance();
            }
            SourceSpan::new(value_start, self.pos)
        }
    }

    fn consume_raw_text(&mut self, mut element: Element) {
        let needle = format!("</{}", element.name.to_ascii_lowercase());
        let text_start = self.pos;
        let text_end = match self.source[self.pos..].to_ascii_lowercase().find(&needle) {
            Some(index) => self.pos + index,
            None => self.source.len(),
        };
        if text_end > text_start {
            let span = SourceSpan::new(text_start, text_end);
            element.children.push(Node::Text(Text {
                value: span.slice(self.source).to_string(),
                source_span: span,
            }));
        }
        self.pos = text_end;
        self.stack.push(element);
    }

    fn consume_end_tag(&mut self) {
        let start = self.pos;
        self.pos += "</".len();
        let name_span = self.read_name();
        let name = name_span.slice(self.source).to_string();
        while !self.at_end() && self.peek() != chars::GT {
            self.advance();
        }
        if !self.at_end() {
            self.advance();
        }
        let end_span = SourceSpan::new(start, self.pos);

        let open_index = self
            .stack
            .iter()
            .rposition(|el| el.name.eq_ignore_ascii_case(&name));
        match open_index {
            Some(index) => {
                while self.stack.len() > index + 1 {
                    if let Some(mut implicit) = self.stack.pop() {
                        implicit.source_span.end = start;
                        self.add_node(Node::Element(implicit));
                    }
                }
                if let Some(mut el) = self.stack.pop() {
                    el.end_source_span = Some(end_span);
                    el.source_span.end = self.pos;
                    self.add_node(Node::Element(el));
                }
            }
            None if is_void_element(&name) => {
                self.errors.push(Diagnostic::at(
                    end_span,
                    format!("Void elements do not have end tags \"{}\"", name),
                ));
            }
            None => {
                self.errors.push(Diagnostic::at(
                    end_span,
                    format!(
                        "Unexpected closing tag \"{}\". It may happen when the tag has already been closed by another tag.",
                        name
                    ),
                ));
            }
        }
    }
}
