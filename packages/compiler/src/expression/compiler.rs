//! Expression compiler boundary

use crate::parse_util::Diagnostic;

use super::class_resolver::ClassResolver;
use super::scope::Scope;
use super::types::{TypedPlan, ValueType};

/// Output of an expression compilation. Diagnostic offsets are relative to
/// the start of the expression text.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    pub plan: TypedPlan,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompiledExpression {
    pub fn new(plan: TypedPlan) -> Self {
        CompiledExpression {
            plan,
            diagnostics: Vec::new(),
        }
    }

    pub fn failed(diagnostics: Vec<Diagnostic>) -> Self {
        CompiledExpression {
            plan: TypedPlan::invalid(),
            diagnostics,
        }
    }
}

/// Parses and type-checks expression text embedded in directive attributes.
///
/// `expected_type` is `None` for actions, whose result is discarded.
pub trait ExpressionCompiler {
    fn compile(
        &self,
        text: &str,
        expected_type: Option<&ValueType>,
        scope: &dyn Scope,
        classes: &dyn ClassResolver,
    ) -> CompiledExpression;
}
