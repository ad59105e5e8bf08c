//! Runtime variable environment

use std::rc::Rc;

use serde_json::Value;

use crate::expression::Plan;

use super::component::VariableCell;

#[derive(Debug)]
struct Frame {
    name: String,
    cell: VariableCell<Value>,
    parent: Option<Rc<Frame>>,
}

/// Persistent chain of variable bindings. Binding returns a new environment
/// and leaves the original untouched; inner bindings shadow outer ones.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    head: Option<Rc<Frame>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&self, name: impl Into<String>, cell: VariableCell<Value>) -> Environment {
        Environment {
            head: Some(Rc::new(Frame {
                name: name.into(),
                cell,
                parent: self.head.clone(),
            })),
        }
    }

    pub fn bind_value(&self, name: impl Into<String>, value: Value) -> Environment {
        self.bind(name, VariableCell::new(value))
    }

    /// Current value of the innermost binding of `name`.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        let mut frame = self.head.as_deref();
        while let Some(current) = frame {
            if current.name == name {
                return Some(current.cell.get());
            }
            frame = current.parent.as_deref();
        }
        None
    }
}

/// Runs plans produced by the matching expression compiler.
pub trait Evaluator {
    fn evaluate(&self, plan: &Plan, env: &Environment) -> Value;

    /// Run an action plan for its effects.
    fn execute(&self, plan: &Plan, env: &Environment) {
        self.evaluate(plan, env);
    }
}
