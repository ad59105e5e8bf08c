//! Test utilities for the markup parser

use flavour_compiler::ml_parser::{Node, ParseTreeResult};

/// Flatten a parse result into `[kind, ..., depth]` rows, failing on errors.
pub fn humanize_dom(
    parse_result: &ParseTreeResult,
    add_source_span: bool,
) -> Result<Vec<Vec<String>>, String> {
    if !parse_result.errors.is_empty() {
        let error_string = parse_result
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        return Err(format!("Unexpected parse errors:\n{}", error_string));
    }

    Ok(humanize_nodes(&parse_result.root_nodes, add_source_span))
}

pub fn humanize_nodes(nodes: &[Node], add_source_span: bool) -> Vec<Vec<String>> {
    let mut humanizer = Humanizer {
        result: Vec::new(),
        depth: 0,
        include_source_span: add_source_span,
    };
    for node in nodes {
        humanizer.visit(node);
    }
    humanizer.result
}

/// Error messages with their `[start, end)` spans.
pub fn humanize_errors(parse_result: &ParseTreeResult) -> Vec<(String, usize, usize)> {
    parse_result
        .errors
        .iter()
        .map(|e| (e.message.clone(), e.start, e.end))
        .collect()
}

struct Humanizer {
    result: Vec<Vec<String>>,
    depth: usize,
    include_source_span: bool,
}

impl Humanizer {
    fn visit(&mut self, node: &Node) {
        let mut row = match node {
            Node::Element(element) => vec!["Element".to_string(), element.name.clone()],
            Node::Text(text) => vec!["Text".to_string(), text.value.clone()],
            Node::Comment(comment) => vec!["Comment".to_string(), comment.value.clone()],
            Node::ProcessingInstruction(pi) => vec![
                "ProcessingInstruction".to_string(),
                pi.target.clone(),
                pi.content.clone(),
            ],
        };
        row.push(self.depth.to_string());
        if self.include_source_span {
            let span = node.source_span();
            row.push(format!("{}..{}", span.start, span.end));
        }
        self.result.push(row);

        if let Node::Element(element) = node {
            for attr in &element.attrs {
                self.result.push(vec![
                    "Attribute".to_string(),
                    attr.name.clone(),
                    attr.value.clone(),
                ]);
            }
            self.depth += 1;
            for child in &element.children {
                self.visit(child);
            }
            self.depth -= 1;
        }
    }
}
