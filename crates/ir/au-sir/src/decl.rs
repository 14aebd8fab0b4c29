//! IR declarations: functions, type declarations, modules

use crate::expr::Expr;
use crate::types::Type;
use au_intern::Symbol;
use au_span::Origin;
use serde::Serialize;

/// A lowered function
#[derive(Debug, Clone, PartialEq)]
pub struct Func {
    /// Function name
    pub name: Symbol,
    /// Parameters, fully typed
    pub params: Vec<Param>,
    /// Return type
    pub ret_type: Type,
    /// Body expression; `None` for external functions
    pub body: Option<Expr>,
    /// Effects, deduplicated, in analysis order
    pub effects: Vec<Effect>,
    /// Generic parameters
    pub type_params: Vec<TypeParam>,
    /// Whether this is an external function
    pub external: bool,
    /// Whether the function is exported from its module
    pub exported: bool,
    /// Source location
    pub origin: Option<Origin>,
}

/// A typed function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name
    pub name: Symbol,
    /// Parameter type
    pub ty: Type,
    /// Source location
    pub origin: Option<Origin>,
}

/// A generic type parameter
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    /// Parameter name
    pub name: Symbol,
    /// Optional constraint name (`Numeric`)
    pub constraint: Option<Symbol>,
}

impl TypeParam {
    /// Construct an unconstrained parameter
    pub fn new(name: Symbol) -> Self {
        Self {
            name,
            constraint: None,
        }
    }

    /// Construct a constrained parameter
    pub fn constrained(name: Symbol, constraint: Symbol) -> Self {
        Self {
            name,
            constraint: Some(constraint),
        }
    }
}

/// A function effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// The body can be evaluated at compile time
    Comptime,
    /// The function cannot raise
    NoExcept,
}

impl Effect {
    /// Stable lowercase name, used in events
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Comptime => "comptime",
            Self::NoExcept => "noexcept",
        }
    }
}

/// A lowered type declaration
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    /// Declared name
    pub name: Symbol,
    /// Resolved type
    pub ty: Type,
    /// Generic parameters
    pub type_params: Vec<TypeParam>,
    /// Whether the type is exported
    pub exported: bool,
    /// Source location
    pub origin: Option<Origin>,
}

/// A lowered module
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    /// Module name; `None` for the anonymous main module
    pub name: Option<Symbol>,
    /// Imports, carried through unchanged for the backend
    pub imports: Vec<au_ast::Import>,
    /// Lowered items, in declaration order
    pub items: Vec<Item>,
}

/// One item of a lowered module
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// A type declaration
    Type(TypeDecl),
    /// A function
    Func(Func),
}

/// A function signature as registries and the solver see it
///
/// Shared between the function registry, sum-type constructor registry,
/// and the generic call resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSig {
    /// Function (or constructor) name
    pub name: Symbol,
    /// Declared parameter types
    pub param_types: Vec<Type>,
    /// Declared return type
    pub ret_type: Type,
    /// Generic parameters
    pub type_params: Vec<TypeParam>,
}

impl FunctionSig {
    /// Construct a signature
    pub fn new(
        name: Symbol,
        param_types: Vec<Type>,
        ret_type: Type,
        type_params: Vec<TypeParam>,
    ) -> Self {
        Self {
            name,
            param_types,
            ret_type,
            type_params,
        }
    }

    /// Whether the signature has generic parameters
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }
}
