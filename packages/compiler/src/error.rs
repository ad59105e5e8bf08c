//! Compiler and runtime errors
//!
//! Recoverable template problems are reported as [`Diagnostic`]s; the types
//! here cover the failures that abort a compilation or a render pass.
//!
//! [`Diagnostic`]: crate::parse_util::Diagnostic

use std::io;

use thiserror::Error;

/// Fatal compilation failure.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("I/O error reading directive package resource {resource}")]
    ResourceRead {
        resource: String,
        #[source]
        source: io::Error,
    },
}

/// Failure raised while rendering or instantiating components.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("component was already destroyed")]
    Destroyed,
    #[error("binding {0} was not supplied")]
    MissingBinding(&'static str),
    #[error("no runtime implementation registered for directive {0}")]
    UnknownDirective(String),
}

pub type Result<T> = std::result::Result<T, CompileError>;
