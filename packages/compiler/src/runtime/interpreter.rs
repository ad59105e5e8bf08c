//! Template Interpreter
//!
//! Instantiates a bound template tree into live components. Literal markup
//! becomes static slots; directive bindings are handed to registered
//! constructors together with evaluated computations and a content fragment.

use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::RenderError;
use crate::template_parser::THIS_VARIABLE;
use crate::tree::{DirectiveBinding, TemplateNode};

use super::component::{
    Action, Component, ComponentBase, CompositeComponent, Computation, Fragment, VariableCell,
};
use super::directives::{
    ForEachComponent, IfComponent, TextComponent, FOREACH_CLASS, IF_CLASS, TEXT_CLASS,
};
use super::environment::{Environment, Evaluator};
use super::slot::Slot;

/// Everything a directive constructor receives, keyed by setter name.
pub struct DirectiveContext {
    pub class_name: String,
    pub slot: Slot,
    variables: HashMap<String, VariableCell<Value>>,
    computations: HashMap<String, Box<dyn Computation<Value>>>,
    actions: HashMap<String, Box<dyn Action>>,
    content: Option<Box<dyn Fragment>>,
}

impl DirectiveContext {
    pub fn take_variable(&mut self, setter_name: &str) -> Option<VariableCell<Value>> {
        self.variables.remove(setter_name)
    }

    pub fn take_computation(&mut self, setter_name: &str) -> Option<Box<dyn Computation<Value>>> {
        self.computations.remove(setter_name)
    }

    pub fn take_action(&mut self, setter_name: &str) -> Option<Box<dyn Action>> {
        self.actions.remove(setter_name)
    }

    pub fn take_content(&mut self) -> Option<Box<dyn Fragment>> {
        self.content.take()
    }
}

pub type DirectiveConstructor = Box<dyn Fn(DirectiveContext) -> Box<dyn Component>>;

/// Directive constructors by directive class name.
#[derive(Default)]
pub struct DirectiveFactories {
    constructors: HashMap<String, DirectiveConstructor>,
}

impl DirectiveFactories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut factories = Self::new();
        factories
            .register(FOREACH_CLASS, create_foreach)
            .register(IF_CLASS, create_if)
            .register(TEXT_CLASS, create_text);
        factories
    }

    pub fn register(
        &mut self,
        class_name: impl Into<String>,
        constructor: impl Fn(DirectiveContext) -> Box<dyn Component> + 'static,
    ) -> &mut Self {
        self.constructors
            .insert(class_name.into(), Box::new(constructor));
        self
    }

    pub fn get(&self, class_name: &str) -> Option<&DirectiveConstructor> {
        self.constructors.get(class_name)
    }
}

fn create_foreach(mut context: DirectiveContext) -> Box<dyn Component> {
    let mut component = ForEachComponent::<Value>::new(context.slot.clone());
    if let Some(collection) = context.take_computation("set_collection") {
        component.set_collection(move || collection_items(collection.perform()));
    }
    if let Some(variable) = context.take_variable("set_element_variable") {
        component.set_element_variable(variable.setter());
    }
    if let Some(variable) = context.take_variable("set_index_variable") {
        component.set_index_variable(move |index: usize| variable.set(Value::from(index)));
    }
    if let Some(body) = context.take_content() {
        component.set_body(body);
    }
    Box::new(component)
}

fn create_if(mut context: DirectiveContext) -> Box<dyn Component> {
    let mut component = IfComponent::new(context.slot.clone());
    if let Some(condition) = context.take_computation("set_condition") {
        component.set_condition(move || is_truthy(&condition.perform()));
    }
    if let Some(body) = context.take_content() {
        component.set_body(body);
    }
    Box::new(component)
}

fn create_text(mut context: DirectiveContext) -> Box<dyn Component> {
    let mut component = TextComponent::new(context.slot.clone());
    if let Some(value) = context.take_computation("set_value") {
        component.set_value(move || display_text(&value.perform()));
    }
    Box::new(component)
}

/// Elements iterated by `std:foreach`: arrays as-is, objects by value, `null`
/// as empty, anything else as a single element.
pub fn collection_items(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        Value::Object(map) => map.into_iter().map(|(_, value)| value).collect(),
        other => vec![other],
    }
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(true, |n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Stands in for a directive class with no registered constructor.
struct UnresolvedDirective {
    base: ComponentBase,
    class_name: String,
}

impl Component for UnresolvedDirective {
    fn slot(&self) -> &Slot {
        self.base.slot()
    }

    fn render(&mut self) -> Result<(), RenderError> {
        self.base.ensure_alive()?;
        Err(RenderError::UnknownDirective(self.class_name.clone()))
    }

    fn destroy(&mut self) {
        self.base.destroy();
    }
}

#[derive(Clone)]
pub struct Interpreter {
    evaluator: Rc<dyn Evaluator>,
    factories: Rc<DirectiveFactories>,
}

impl Interpreter {
    pub fn new(evaluator: impl Evaluator + 'static) -> Self {
        Interpreter {
            evaluator: Rc::new(evaluator),
            factories: Rc::new(DirectiveFactories::with_builtins()),
        }
    }

    pub fn with_factories(mut self, factories: DirectiveFactories) -> Self {
        self.factories = Rc::new(factories);
        self
    }

    /// Build components for `nodes` with `model` bound to `this`. Nothing is
    /// rendered until [`TemplateInstance::render`].
    pub fn instantiate(&self, nodes: &[TemplateNode], model: Value) -> TemplateInstance {
        let this = VariableCell::new(model);
        let env = Environment::new().bind(THIS_VARIABLE, this.clone());
        let root = self.create_fragment(nodes, &env);
        TemplateInstance { root, this }
    }

    fn create_fragment(&self, nodes: &[TemplateNode], env: &Environment) -> Box<dyn Component> {
        let slot = Slot::container();
        let children = self.build_nodes(nodes, &slot, env);
        Box::new(CompositeComponent::new(slot, children))
    }

    fn build_nodes(
        &self,
        nodes: &[TemplateNode],
        parent: &Slot,
        env: &Environment,
    ) -> Vec<Box<dyn Component>> {
        let mut components: Vec<Box<dyn Component>> = Vec::new();
        for node in nodes {
            match node {
                TemplateNode::Text(text) => parent.append(&Slot::markup(text.value.clone())),
                TemplateNode::Element(element) => {
                    let slot = Slot::element(element.tag_name.clone(), element.attributes.clone());
                    let children = self.build_nodes(&element.child_nodes, &slot, env);
                    parent.append(&slot);
                    if !children.is_empty() {
                        components.push(Box::new(CompositeComponent::new(slot, children)));
                    }
                }
                TemplateNode::Directive(binding) => {
                    let component = self.build_directive(binding, env);
                    parent.append(component.slot());
                    components.push(component);
                }
            }
        }
        components
    }

    fn build_directive(&self, binding: &DirectiveBinding, env: &Environment) -> Box<dyn Component> {
        let slot = Slot::container();
        let Some(constructor) = self.factories.get(&binding.directive_class_name) else {
            warn!(class = %binding.directive_class_name, "no runtime implementation for directive");
            return Box::new(UnresolvedDirective {
                base: ComponentBase::new(slot),
                class_name: binding.directive_class_name.clone(),
            });
        };
        debug!(class = %binding.directive_class_name, "instantiating directive");

        let mut scope = env.clone();
        let mut variables = HashMap::new();
        for variable in &binding.variable_bindings {
            let cell = VariableCell::new(Value::Null);
            scope = scope.bind(variable.name.clone(), cell.clone());
            variables.insert(variable.setter_name.clone(), cell);
        }

        let computations = binding
            .computation_bindings
            .iter()
            .map(|computation| {
                let evaluator = Rc::clone(&self.evaluator);
                let plan = computation.plan.plan.clone();
                let env = scope.clone();
                let perform: Box<dyn Computation<Value>> =
                    Box::new(move || evaluator.evaluate(&plan, &env));
                (computation.setter_name.clone(), perform)
            })
            .collect();

        let actions = binding
            .action_bindings
            .iter()
            .map(|action| {
                let evaluator = Rc::clone(&self.evaluator);
                let plan = action.plan.clone();
                let env = scope.clone();
                let perform: Box<dyn Action> = Box::new(move || evaluator.execute(&plan, &env));
                (action.setter_name.clone(), perform)
            })
            .collect();

        let content = binding.content_setter_name.as_ref().map(|_| {
            let interpreter = self.clone();
            let nodes = binding.content_nodes.clone();
            let env = scope.clone();
            let fragment: Box<dyn Fragment> =
                Box::new(move || interpreter.create_fragment(&nodes, &env));
            fragment
        });

        constructor(DirectiveContext {
            class_name: binding.directive_class_name.clone(),
            slot,
            variables,
            computations,
            actions,
            content,
        })
    }
}

/// A live template bound to a model object.
pub struct TemplateInstance {
    root: Box<dyn Component>,
    this: VariableCell<Value>,
}

impl TemplateInstance {
    pub fn render(&mut self) -> Result<(), RenderError> {
        self.root.render()
    }

    /// Replace the model; takes effect on the next render.
    pub fn set_model(&self, model: Value) {
        self.this.set(model);
    }

    pub fn model(&self) -> Value {
        self.this.get()
    }

    pub fn slot(&self) -> &Slot {
        self.root.slot()
    }

    pub fn to_html(&self) -> String {
        self.root.slot().to_html()
    }

    pub fn destroy(&mut self) {
        self.root.destroy();
    }
}
