//! Directive Metadata
//!
//! Declarative description of directive classes: which attributes a directive
//! accepts, how they bind, and where its content goes. Metadata is read from a
//! JSON table instead of being extracted from annotated classes.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::expression::{ClassResolver, ValueType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    /// Declares a template variable named by the attribute value.
    Variable,
    /// Expression evaluated on every render.
    Computation,
    /// Expression executed on demand, result discarded.
    Action,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveAttributeMetadata {
    pub name: String,
    pub kind: AttributeKind,
    #[serde(default = "required_by_default")]
    pub required: bool,
    pub setter_name: String,
    #[serde(default = "unknown_type")]
    pub value_type: ValueType,
}

fn required_by_default() -> bool {
    true
}

fn unknown_type() -> ValueType {
    ValueType::Unknown
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveMetadata {
    /// Local tag name, registered as `prefix:name`.
    pub name: String,
    #[serde(default)]
    pub owning_class_name: String,
    /// Keyed by attribute name, in declaration order.
    #[serde(default, with = "attribute_list")]
    pub attributes: IndexMap<String, DirectiveAttributeMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_setter_name: Option<String>,
    #[serde(default)]
    pub ignore_content: bool,
}

impl DirectiveMetadata {
    pub fn new(name: impl Into<String>, owning_class_name: impl Into<String>) -> Self {
        DirectiveMetadata {
            name: name.into(),
            owning_class_name: owning_class_name.into(),
            attributes: IndexMap::new(),
            content_setter_name: None,
            ignore_content: false,
        }
    }

    pub fn with_attribute(mut self, attribute: DirectiveAttributeMetadata) -> Self {
        self.attributes.insert(attribute.name.clone(), attribute);
        self
    }

    pub fn with_content_setter(mut self, setter_name: impl Into<String>) -> Self {
        self.content_setter_name = Some(setter_name.into());
        self
    }

    pub fn with_ignore_content(mut self, ignore_content: bool) -> Self {
        self.ignore_content = ignore_content;
        self
    }
}

/// Attributes travel as a JSON list; the name inside each entry is the key.
mod attribute_list {
    use indexmap::IndexMap;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DirectiveAttributeMetadata;

    pub fn serialize<S: Serializer>(
        attributes: &IndexMap<String, DirectiveAttributeMetadata>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(attributes.values())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<IndexMap<String, DirectiveAttributeMetadata>, D::Error> {
        let list = Vec::<DirectiveAttributeMetadata>::deserialize(deserializer)?;
        Ok(list.into_iter().map(|attr| (attr.name.clone(), attr)).collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDescription {
    pub name: String,
    pub directive: Option<DirectiveMetadata>,
}

/// Source of class information for imports and directive packages.
pub trait ClassRepository {
    fn describe(&self, class_name: &str) -> Option<ClassDescription>;
}

/// Exposes a [`ClassRepository`] as a [`ClassResolver`] of fully qualified names.
#[derive(Clone, Copy)]
pub struct RepositoryResolver<'a>(pub &'a dyn ClassRepository);

impl ClassResolver for RepositoryResolver<'_> {
    fn find_class(&self, name: &str) -> Option<String> {
        self.0.describe(name).map(|description| description.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directive: Option<DirectiveMetadata>,
}

static BUILTIN_TABLE: Lazy<MetadataTable> = Lazy::new(|| {
    MetadataTable::from_json(include_str!("../../resources/directives.json"))
        .expect("embedded directive table is valid")
});

/// Class metadata keyed by fully qualified class name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataTable {
    #[serde(default)]
    pub classes: IndexMap<String, ClassEntry>,
}

impl MetadataTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut table: MetadataTable = serde_json::from_str(json)?;
        for (class_name, entry) in table.classes.iter_mut() {
            if let Some(directive) = entry.directive.as_mut() {
                directive.owning_class_name = class_name.clone();
            }
        }
        Ok(table)
    }

    /// Metadata of the `flavour.directives` package.
    pub fn builtin() -> &'static MetadataTable {
        &BUILTIN_TABLE
    }

    pub fn with_builtins() -> Self {
        BUILTIN_TABLE.clone()
    }

    pub fn add_class(&mut self, class_name: impl Into<String>) -> &mut Self {
        self.classes.entry(class_name.into()).or_default();
        self
    }

    /// Register `metadata` under its owning class name.
    pub fn add_directive(&mut self, metadata: DirectiveMetadata) -> &mut Self {
        self.classes.insert(
            metadata.owning_class_name.clone(),
            ClassEntry {
                directive: Some(metadata),
            },
        );
        self
    }

    /// Entries of `other` replace entries with the same class name.
    pub fn merge(&mut self, other: MetadataTable) -> &mut Self {
        self.classes.extend(other.classes);
        self
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl ClassRepository for MetadataTable {
    fn describe(&self, class_name: &str) -> Option<ClassDescription> {
        self.classes.get(class_name).map(|entry| ClassDescription {
            name: class_name.to_string(),
            directive: entry.directive.clone(),
        })
    }
}
