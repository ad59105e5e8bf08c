//! Expression compiler boundary
//!
//! Types, scopes and class resolution shared between the template parser and
//! an external expression compiler, plus a small reference implementation.

pub mod class_resolver;
pub mod compiler;
pub mod path;
pub mod scope;
pub mod types;

pub use class_resolver::{ClassResolver, ImportingClassResolver};
pub use compiler::{CompiledExpression, ExpressionCompiler};
pub use path::{PathEvaluator, PathExpressionCompiler};
pub use scope::{Scope, ScopeStack};
pub use types::{GenericClass, Plan, PrimitiveKind, TypedPlan, ValueType};
