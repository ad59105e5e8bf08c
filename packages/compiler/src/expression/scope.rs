//! Compile-time variable scopes

use std::collections::HashMap;

use smallvec::SmallVec;

use super::types::ValueType;

/// Variable lookup handed to the expression compiler.
pub trait Scope {
    fn variable_type(&self, name: &str) -> Option<&ValueType>;
}

/// Variable name to a stack of declared types; the innermost declaration wins.
#[derive(Debug, Default)]
pub struct ScopeStack {
    variables: HashMap<String, SmallVec<[ValueType; 2]>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str, value_type: ValueType) {
        self.variables
            .entry(name.to_string())
            .or_default()
            .push(value_type);
    }

    /// Remove the innermost declaration of `name`.
    pub fn pop(&mut self, name: &str) -> Option<ValueType> {
        let stack = self.variables.get_mut(name)?;
        let popped = stack.pop();
        if stack.is_empty() {
            self.variables.remove(name);
        }
        popped
    }

    pub fn depth(&self, name: &str) -> usize {
        self.variables.get(name).map_or(0, |stack| stack.len())
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl Scope for ScopeStack {
    fn variable_type(&self, name: &str) -> Option<&ValueType> {
        self.variables.get(name).and_then(|stack| stack.last())
    }
}
