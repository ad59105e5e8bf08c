//! Reference path expressions
//!
//! A deliberately small expression language, `name(.member)*`, used by the
//! command line driver and the tests. Plans are `{"path": [...]}` objects and
//! evaluate against JSON data.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use crate::parse_util::Diagnostic;
use crate::runtime::{Environment, Evaluator};

use super::class_resolver::ClassResolver;
use super::compiler::{CompiledExpression, ExpressionCompiler};
use super::scope::Scope;
use super::types::{Plan, TypedPlan, ValueType};

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<ident>[A-Za-z_$][A-Za-z0-9_$]*)|(?P<dot>\.)|(?P<other>\S+)")
        .expect("token pattern is valid")
});

#[derive(Debug, Default, Clone, Copy)]
pub struct PathExpressionCompiler;

impl PathExpressionCompiler {
    pub fn new() -> Self {
        PathExpressionCompiler
    }
}

impl ExpressionCompiler for PathExpressionCompiler {
    fn compile(
        &self,
        text: &str,
        _expected_type: Option<&ValueType>,
        scope: &dyn Scope,
        _classes: &dyn ClassResolver,
    ) -> CompiledExpression {
        let mut path: Vec<&str> = Vec::new();
        let mut head_span = 0..0;
        let mut last_dot = None;
        let mut expect_ident = true;

        for caps in TOKEN.captures_iter(text) {
            if let Some(ident) = caps.name("ident") {
                if !expect_ident {
                    return invalid(ident.start(), ident.end());
                }
                if path.is_empty() {
                    head_span = ident.range();
                }
                path.push(ident.as_str());
                expect_ident = false;
            } else if let Some(dot) = caps.name("dot") {
                if expect_ident {
                    return invalid(dot.start(), dot.end());
                }
                last_dot = Some(dot.range());
                expect_ident = true;
            } else if let Some(other) = caps.name("other") {
                return invalid(other.start(), other.end());
            }
        }

        if path.is_empty() {
            return CompiledExpression::failed(vec![Diagnostic::new(0, text.len(), "Empty expression")]);
        }
        if expect_ident {
            let dot = last_dot.unwrap_or(0..text.len());
            return invalid(dot.start, dot.end);
        }

        let value_type = match scope.variable_type(path[0]) {
            None => {
                return CompiledExpression::failed(vec![Diagnostic::new(
                    head_span.start,
                    head_span.end,
                    format!("Variable {} was not found", path[0]),
                )]);
            }
            Some(value_type) if path.len() == 1 => value_type.clone(),
            Some(_) => ValueType::Unknown,
        };

        CompiledExpression::new(TypedPlan::new(Plan(json!({ "path": path })), value_type))
    }
}

fn invalid(start: usize, end: usize) -> CompiledExpression {
    CompiledExpression::failed(vec![Diagnostic::new(start, end, "Invalid expression")])
}

/// Evaluates plans produced by [`PathExpressionCompiler`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PathEvaluator;

impl Evaluator for PathEvaluator {
    fn evaluate(&self, plan: &Plan, env: &Environment) -> Value {
        let Some(path) = plan.0.get("path").and_then(Value::as_array) else {
            return Value::Null;
        };
        let mut names = path.iter().filter_map(Value::as_str);
        let Some(head) = names.next() else {
            return Value::Null;
        };
        names.fold(env.lookup(head).unwrap_or(Value::Null), |value, name| {
            value.get(name).cloned().unwrap_or(Value::Null)
        })
    }
}
