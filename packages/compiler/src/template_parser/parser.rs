//! Template Parser
//!
//! Turns parsed markup into a bound template tree. Directive elements are
//! resolved through the registry, their attributes bound to variables or
//! compiled through the expression compiler, and every problem found along
//! the way is recorded as a diagnostic with an absolute source range.

use std::rc::Rc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::config::ParserConfig;
use crate::error::Result;
use crate::expression::{
    ClassResolver, ExpressionCompiler, ImportingClassResolver, ScopeStack, TypedPlan, ValueType,
};
use crate::ml_parser::{self, Attribute, Element, Node, ProcessingInstruction};
use crate::parse_util::{Diagnostic, SourceSpan};
use crate::tree::{
    DirectiveActionBinding, DirectiveBinding, DirectiveComputationBinding, DirectiveVariableBinding,
    DomElement, DomText, TemplateNode,
};

use super::directive_registry::DirectiveRegistry;
use super::metadata::{
    AttributeKind, ClassRepository, DirectiveAttributeMetadata, DirectiveMetadata, RepositoryResolver,
};
use super::resources::ResourceProvider;

/// Name of the variable bound to the template's backing object.
pub const THIS_VARIABLE: &str = "this";

static NAME_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\.\s*").expect("separator pattern is valid"));

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateParseResult {
    pub nodes: Vec<TemplateNode>,
    pub diagnostics: Vec<Diagnostic>,
}

impl TemplateParseResult {
    pub fn is_successful(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Outcome of parsing a single markup node.
enum Parsed {
    Node(TemplateNode),
    Skip,
}

/// Parser for one template. Consumed by [`TemplateParser::parse`].
pub struct TemplateParser<'a> {
    config: ParserConfig,
    classes: &'a dyn ClassRepository,
    resources: &'a dyn ResourceProvider,
    expressions: &'a dyn ExpressionCompiler,
    class_resolver: ImportingClassResolver<RepositoryResolver<'a>>,
    registry: DirectiveRegistry,
    scope: ScopeStack,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> TemplateParser<'a> {
    pub fn new(
        classes: &'a dyn ClassRepository,
        resources: &'a dyn ResourceProvider,
        expressions: &'a dyn ExpressionCompiler,
    ) -> Self {
        let config = ParserConfig::default();
        TemplateParser {
            registry: DirectiveRegistry::new(&config),
            config,
            classes,
            resources,
            expressions,
            class_resolver: ImportingClassResolver::new(RepositoryResolver(classes)),
            scope: ScopeStack::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.registry = DirectiveRegistry::new(&config);
        self.config = config;
        self
    }

    /// Parse `source` as the template of `class_name`.
    ///
    /// Recoverable problems end up in [`TemplateParseResult::diagnostics`];
    /// only an unreadable directive package under the fatal policy is an error.
    pub fn parse(mut self, source: &str, class_name: &str) -> Result<TemplateParseResult> {
        let prefix = self.config.default_prefix.clone();
        let package = self.config.default_package.clone();
        self.registry.use_package(
            &prefix,
            &package,
            SourceSpan::default(),
            self.classes,
            self.resources,
            &mut self.diagnostics,
        )?;

        self.scope.push(THIS_VARIABLE, ValueType::class(class_name));
        let tree = ml_parser::parse(source);
        debug!(
            nodes = tree.root_nodes.len(),
            errors = tree.errors.len(),
            "parsed template markup"
        );
        self.diagnostics.extend(tree.errors);
        let nodes = self.parse_nodes(&tree.root_nodes);
        self.scope.pop(THIS_VARIABLE);
        let nodes = nodes?;

        debug!(
            nodes = nodes.len(),
            diagnostics = self.diagnostics.len(),
            "bound template"
        );
        Ok(TemplateParseResult {
            nodes,
            diagnostics: self.diagnostics,
        })
    }

    fn error(&mut self, span: SourceSpan, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::at(span, message));
    }

    fn parse_nodes(&mut self, nodes: &[Node]) -> Result<Vec<TemplateNode>> {
        let mut result = Vec::with_capacity(nodes.len());
        for node in nodes {
            if let Parsed::Node(node) = self.parse_node(node)? {
                result.push(node);
            }
        }
        Ok(result)
    }

    fn parse_node(&mut self, node: &Node) -> Result<Parsed> {
        match node {
            Node::Element(element) => match element.ns_name() {
                Some((prefix, name)) => self.parse_directive(element, prefix, name),
                None => self.parse_dom_element(element),
            },
            Node::Text(text) => Ok(Parsed::Node(TemplateNode::Text(DomText {
                value: text.value.clone(),
            }))),
            Node::Comment(_) => Ok(Parsed::Skip),
            Node::ProcessingInstruction(pi) => {
                self.parse_processing_instruction(pi)?;
                Ok(Parsed::Skip)
            }
        }
    }

    fn parse_processing_instruction(&mut self, pi: &ProcessingInstruction) -> Result<()> {
        match pi.target.as_str() {
            "import" => self.parse_import(pi),
            "use" => return self.parse_use(pi),
            _ => {}
        }
        Ok(())
    }

    fn parse_import(&mut self, pi: &ProcessingInstruction) {
        let name = normalize_qualified_name(&pi.content);
        if let Some(package) = name.strip_suffix(".*") {
            self.class_resolver.import_package(package);
            return;
        }
        match self.class_resolver.find_class(&name) {
            Some(full_name) => self.class_resolver.import_class(&full_name),
            None => self.error(pi.content_span, format!("Class was not found: {}", name)),
        }
    }

    fn parse_use(&mut self, pi: &ProcessingInstruction) -> Result<()> {
        let parsed = pi.content.split_once(':').and_then(|(prefix, package)| {
            let prefix = prefix.trim();
            let package = normalize_qualified_name(package);
            (!prefix.is_empty() && !package.is_empty()).then(|| (prefix.to_string(), package))
        });
        let Some((prefix, package)) = parsed else {
            self.error(pi.content_span, "Illegal syntax for 'use' instruction");
            return Ok(());
        };
        self.registry.use_package(
            &prefix,
            &package,
            pi.content_span,
            self.classes,
            self.resources,
            &mut self.diagnostics,
        )
    }

    fn parse_dom_element(&mut self, element: &Element) -> Result<Parsed> {
        let attributes = element
            .attrs
            .iter()
            .map(|attr| (attr.name.clone(), attr.value.clone()))
            .collect();
        let child_nodes = self.parse_nodes(&element.children)?;
        Ok(Parsed::Node(TemplateNode::Element(DomElement {
            tag_name: element.name.clone(),
            attributes,
            child_nodes,
        })))
    }

    fn parse_directive(&mut self, element: &Element, prefix: &str, name: &str) -> Result<Parsed> {
        let Some(metadata) = self.registry.resolve(prefix, name) else {
            self.error(element.name_span, format!("Undefined directive {}", element.name));
            return Ok(Parsed::Skip);
        };

        let mut binding = DirectiveBinding::new(metadata.owning_class_name.clone(), metadata.name.clone());
        let declared = self.bind_variables(element, &metadata, &mut binding);
        self.bind_expressions(element, &metadata, &mut binding);
        let content = self.parse_directive_content(element, &metadata, &mut binding);
        for variable in declared.iter().rev() {
            self.scope.pop(variable);
        }
        content?;

        Ok(Parsed::Node(TemplateNode::Directive(binding)))
    }

    /// Declare the directive's variables. Returns the names pushed onto the
    /// scope, in push order.
    fn bind_variables(
        &mut self,
        element: &Element,
        metadata: &DirectiveMetadata,
        binding: &mut DirectiveBinding,
    ) -> Vec<String> {
        let mut declared: Vec<String> = Vec::new();
        let variables = metadata
            .attributes
            .values()
            .filter(|attr| attr.kind == AttributeKind::Variable);
        for attr_meta in variables {
            let Some(attr) = self.find_attribute(element, attr_meta) else {
                continue;
            };
            let name = attr.value.trim();
            if declared.iter().any(|declared| declared == name) {
                self.error(
                    attr.value_or_name_span(),
                    format!("Variable {} is already used by the same directive", name),
                );
                continue;
            }
            self.scope.push(name, attr_meta.value_type.clone());
            declared.push(name.to_string());
            binding.variable_bindings.push(DirectiveVariableBinding {
                setter_name: attr_meta.setter_name.clone(),
                value_type: attr_meta.value_type.clone(),
                name: name.to_string(),
            });
        }
        declared
    }

    fn bind_expressions(
        &mut self,
        element: &Element,
        metadata: &DirectiveMetadata,
        binding: &mut DirectiveBinding,
    ) {
        for attr_meta in metadata.attributes.values() {
            match attr_meta.kind {
                AttributeKind::Variable => {}
                AttributeKind::Computation => {
                    let Some(attr) = self.find_attribute(element, attr_meta) else {
                        continue;
                    };
                    let plan = self.compile_expression(attr, Some(&attr_meta.value_type));
                    binding.computation_bindings.push(DirectiveComputationBinding {
                        setter_name: attr_meta.setter_name.clone(),
                        plan,
                    });
                }
                AttributeKind::Action => {
                    let Some(attr) = self.find_attribute(element, attr_meta) else {
                        continue;
                    };
                    let plan = self.compile_expression(attr, None);
                    binding.action_bindings.push(DirectiveActionBinding {
                        setter_name: attr_meta.setter_name.clone(),
                        plan: plan.plan,
                    });
                }
            }
        }
    }

    fn parse_directive_content(
        &mut self,
        element: &Element,
        metadata: &Rc<DirectiveMetadata>,
        binding: &mut DirectiveBinding,
    ) -> Result<()> {
        if let Some(setter_name) = &metadata.content_setter_name {
            binding.content_nodes = self.parse_nodes(&element.children)?;
            binding.content_setter_name = Some(setter_name.clone());
        } else if !metadata.ignore_content && !element.children.is_empty() {
            self.error(
                element.source_span,
                format!(
                    "Directive {} should not have any content",
                    metadata.owning_class_name
                ),
            );
        }
        Ok(())
    }

    /// The element's attribute for `attr_meta`, reporting it when required and absent.
    fn find_attribute<'e>(
        &mut self,
        element: &'e Element,
        attr_meta: &DirectiveAttributeMetadata,
    ) -> Option<&'e Attribute> {
        let attr = element.attr(&attr_meta.name);
        if attr.is_none() && attr_meta.required {
            self.error(
                element.start_source_span,
                format!("Missing required attribute: {}", attr_meta.name),
            );
        }
        attr
    }

    /// Compile an attribute value, rebasing the compiler's diagnostics onto
    /// the template source.
    fn compile_expression(&mut self, attr: &Attribute, expected_type: Option<&ValueType>) -> TypedPlan {
        let compiled = self.expressions.compile(
            &attr.value,
            expected_type,
            &self.scope,
            &self.class_resolver,
        );
        let offset = attr.value_offset();
        self.diagnostics.extend(
            compiled
                .diagnostics
                .iter()
                .map(|diagnostic| diagnostic.offset_by(offset)),
        );
        compiled.plan
    }
}

/// `a . b .c` becomes `a.b.c`.
fn normalize_qualified_name(name: &str) -> String {
    NAME_SEPARATOR
        .split(name.trim())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}
