#![deny(clippy::all)]

/**
 * Flavour Template Compiler
 *
 * Compiles directive templates into bound template trees and renders them
 * through a reconciling component runtime.
 */

// Core modules
pub mod chars;
pub mod config;
pub mod error;
pub mod parse_util;
pub mod tree;

// Parser modules
pub mod expression;
pub mod ml_parser;
pub mod template_parser;

// Runtime
pub mod runtime;

// Re-exports
pub use config::{ParserConfig, ResourceErrorPolicy};
pub use error::{CompileError, RenderError, Result};
pub use parse_util::{Diagnostic, SourceFile, SourceSpan};
pub use template_parser::{TemplateParseResult, TemplateParser};
pub use tree::TemplateNode;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compile `source` as the template of `class_name` with the default
/// configuration.
pub fn compile_template(
    source: &str,
    class_name: &str,
    classes: &dyn template_parser::ClassRepository,
    resources: &dyn template_parser::ResourceProvider,
    expressions: &dyn expression::ExpressionCompiler,
) -> Result<TemplateParseResult> {
    TemplateParser::new(classes, resources, expressions).parse(source, class_name)
}
