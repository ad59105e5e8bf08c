//! ML (Markup Language) Parser Module
//!
//! Handles the HTML/XML-like template markup

pub mod ast;
pub mod parser;
pub mod tags;

pub use ast::*;
pub use parser::{parse, ParseTreeResult, Parser};
pub use tags::*;
