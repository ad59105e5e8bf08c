//! Rendering Runtime
//!
//! Components, the in-memory render target and the interpreter that turns a
//! bound template tree into a live component tree.

pub mod component;
pub mod directives;
pub mod environment;
pub mod interpreter;
pub mod slot;

pub use component::{
    Action, Component, ComponentBase, ComponentState, CompositeComponent, Computation, Fragment,
    Variable, VariableCell,
};
pub use directives::{ForEachComponent, IfComponent, TextComponent};
pub use environment::{Environment, Evaluator};
pub use interpreter::{
    DirectiveConstructor, DirectiveContext, DirectiveFactories, Interpreter, TemplateInstance,
};
pub use slot::{Slot, SlotKind};
