//! Bound Template Tree
//!
//! Output of the template parser: literal markup interleaved with directive
//! bindings whose attributes have been resolved to variables and compiled
//! plans. Immutable once emitted.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::expression::{Plan, TypedPlan, ValueType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TemplateNode {
    Element(DomElement),
    Text(DomText),
    Directive(DirectiveBinding),
}

impl TemplateNode {
    pub fn as_directive(&self) -> Option<&DirectiveBinding> {
        match self {
            TemplateNode::Directive(binding) => Some(binding),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&DomElement> {
        match self {
            TemplateNode::Element(element) => Some(element),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomElement {
    pub tag_name: String,
    pub attributes: IndexMap<String, String>,
    pub child_nodes: Vec<TemplateNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomText {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveBinding {
    pub directive_class_name: String,
    pub directive_name: String,
    pub variable_bindings: Vec<DirectiveVariableBinding>,
    pub computation_bindings: Vec<DirectiveComputationBinding>,
    pub action_bindings: Vec<DirectiveActionBinding>,
    pub content_nodes: Vec<TemplateNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_setter_name: Option<String>,
}

impl DirectiveBinding {
    pub fn new(directive_class_name: impl Into<String>, directive_name: impl Into<String>) -> Self {
        DirectiveBinding {
            directive_class_name: directive_class_name.into(),
            directive_name: directive_name.into(),
            ..Default::default()
        }
    }

    pub fn variable(&self, setter_name: &str) -> Option<&DirectiveVariableBinding> {
        self.variable_bindings
            .iter()
            .find(|binding| binding.setter_name == setter_name)
    }

    pub fn computation(&self, setter_name: &str) -> Option<&DirectiveComputationBinding> {
        self.computation_bindings
            .iter()
            .find(|binding| binding.setter_name == setter_name)
    }
}

/// A template variable declared by a directive attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveVariableBinding {
    pub setter_name: String,
    pub value_type: ValueType,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveComputationBinding {
    pub setter_name: String,
    pub plan: TypedPlan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveActionBinding {
    pub setter_name: String,
    pub plan: Plan,
}
