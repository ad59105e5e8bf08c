//! Value types and plans exchanged with the expression compiler

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Boolean,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }
}

/// A class reference with its type arguments, e.g. `app.util.List<T>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenericClass {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<ValueType>,
}

/// Type of a template variable or expression.
///
/// The template compiler never inspects types beyond passing them between the
/// directive metadata, the scope stack and the expression compiler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueType {
    Primitive(PrimitiveKind),
    Class(GenericClass),
    Array(Box<ValueType>),
    Variable(String),
    Null,
    Unknown,
}

impl ValueType {
    pub fn class(name: impl Into<String>) -> Self {
        ValueType::Class(GenericClass {
            name: name.into(),
            arguments: Vec::new(),
        })
    }

    pub fn generic(name: impl Into<String>, arguments: Vec<ValueType>) -> Self {
        ValueType::Class(GenericClass {
            name: name.into(),
            arguments,
        })
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Primitive(kind) => f.write_str(kind.name()),
            ValueType::Class(class) => {
                f.write_str(&class.name)?;
                if !class.arguments.is_empty() {
                    f.write_str("<")?;
                    for (index, argument) in class.arguments.iter().enumerate() {
                        if index > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}", argument)?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            ValueType::Array(element) => write!(f, "{}[]", element),
            ValueType::Variable(name) => f.write_str(name),
            ValueType::Null => f.write_str("null"),
            ValueType::Unknown => f.write_str("?"),
        }
    }
}

/// Executable representation produced by the expression compiler.
///
/// Opaque to the template compiler; only an [`Evaluator`](crate::runtime::Evaluator)
/// paired with the producing compiler knows how to run it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plan(pub serde_json::Value);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedPlan {
    pub plan: Plan,
    pub value_type: ValueType,
}

impl TypedPlan {
    pub fn new(plan: Plan, value_type: ValueType) -> Self {
        TypedPlan { plan, value_type }
    }

    /// Placeholder plan for expressions that failed to compile.
    pub fn invalid() -> Self {
        TypedPlan::new(Plan::default(), ValueType::Unknown)
    }
}
