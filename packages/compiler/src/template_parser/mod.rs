//! Template Parser Module
//!
//! Directive metadata, package registration and the markup to bound tree
//! transformation.

pub mod directive_registry;
pub mod metadata;
pub mod parser;
pub mod resources;

pub use directive_registry::DirectiveRegistry;
pub use metadata::{
    AttributeKind, ClassDescription, ClassRepository, DirectiveAttributeMetadata, DirectiveMetadata,
    MetadataTable, RepositoryResolver,
};
pub use parser::{TemplateParseResult, TemplateParser, THIS_VARIABLE};
pub use resources::{BuiltinResources, DirectoryResources, MemoryResources, ResourceProvider};
