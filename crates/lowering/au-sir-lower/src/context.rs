//! Statically typed stage contexts
//!
//! Visitors lower a node's children in a fixed order and package them
//! here; rules read exactly the fields their stage offers. A rule asking
//! for a child shape the visitor did not produce is a compiler-internal
//! defect, reported as such by the accessors.

use au_diag::{CompileError, Result};
use au_intern::Symbol;
use au_sir as sir;

/// Context handed to expression-stage rules
pub struct ExprCx {
    /// Lowered children, shaped per node kind
    pub children: ExprChildren,
    /// Expected result type, when the surrounding construct knows one
    /// (declared variable types, declared return types, lambda hints)
    pub expected: Option<sir::Type>,
}

impl ExprCx {
    /// A context with no lowered children and no expectation
    pub fn empty() -> Self {
        Self {
            children: ExprChildren::None,
            expected: None,
        }
    }

    /// A context with children and no expectation
    pub fn with_children(children: ExprChildren) -> Self {
        Self {
            children,
            expected: None,
        }
    }
}

/// Lowered children of an expression node
pub enum ExprChildren {
    /// No pre-lowered children (leaves, and nodes whose rules own scoped
    /// traversal: lambdas, list comprehensions)
    None,
    /// A single lowered operand (unary, await, try, member objects,
    /// match scrutinees)
    Operand(sir::Expr),
    /// Two lowered operands (binary, range)
    Pair {
        /// Left / start operand
        left: sir::Expr,
        /// Right / end operand
        right: sir::Expr,
    },
    /// A lowered call shape; `callee` is the lowered callee for plain
    /// calls, the lowered receiver for method calls, and absent for
    /// module-function calls
    Call {
        /// Lowered callee or receiver
        callee: Option<sir::Expr>,
        /// Lowered arguments
        args: Vec<sir::Expr>,
    },
    /// Lowered if-expression children
    If {
        /// Condition
        condition: sir::Expr,
        /// Then branch
        then_branch: sir::Expr,
        /// Else branch
        else_branch: Option<sir::Expr>,
    },
    /// Lowered index children
    Index {
        /// Indexed object
        object: sir::Expr,
        /// Index
        index: sir::Expr,
    },
    /// Lowered slice children
    Slice {
        /// Sliced object
        object: sir::Expr,
        /// Lower bound
        start: Option<sir::Expr>,
        /// Upper bound
        end: Option<sir::Expr>,
    },
    /// Lowered element list (array and tuple literals)
    Elements(Vec<sir::Expr>),
    /// Lowered record fields, in source order
    Fields(Vec<(Symbol, sir::Expr)>),
    /// Lowered block body
    Block {
        /// Statements
        statements: Vec<sir::Stmt>,
        /// Result expression
        result: sir::Expr,
    },
    /// A lowered loop condition
    Condition(sir::Expr),
    /// A lowered iterable
    Iterable(sir::Expr),
}

impl ExprChildren {
    fn mismatch(stage: &str, wanted: &str) -> CompileError {
        CompileError::internal(format!("{stage} rule expected {wanted} children"))
    }

    /// Take the single operand
    pub fn into_operand(self, rule: &str) -> Result<sir::Expr> {
        match self {
            Self::Operand(expr) => Ok(expr),
            _ => Err(Self::mismatch(rule, "operand")),
        }
    }

    /// Take the operand pair
    pub fn into_pair(self, rule: &str) -> Result<(sir::Expr, sir::Expr)> {
        match self {
            Self::Pair { left, right } => Ok((left, right)),
            _ => Err(Self::mismatch(rule, "pair")),
        }
    }

    /// Take the call shape
    pub fn into_call(self, rule: &str) -> Result<(Option<sir::Expr>, Vec<sir::Expr>)> {
        match self {
            Self::Call { callee, args } => Ok((callee, args)),
            _ => Err(Self::mismatch(rule, "call")),
        }
    }

    /// Take the if shape
    pub fn into_if(self, rule: &str) -> Result<(sir::Expr, sir::Expr, Option<sir::Expr>)> {
        match self {
            Self::If {
                condition,
                then_branch,
                else_branch,
            } => Ok((condition, then_branch, else_branch)),
            _ => Err(Self::mismatch(rule, "if")),
        }
    }

    /// Take the index shape
    pub fn into_index(self, rule: &str) -> Result<(sir::Expr, sir::Expr)> {
        match self {
            Self::Index { object, index } => Ok((object, index)),
            _ => Err(Self::mismatch(rule, "index")),
        }
    }

    /// Take the slice shape
    pub fn into_slice(
        self,
        rule: &str,
    ) -> Result<(sir::Expr, Option<sir::Expr>, Option<sir::Expr>)> {
        match self {
            Self::Slice { object, start, end } => Ok((object, start, end)),
            _ => Err(Self::mismatch(rule, "slice")),
        }
    }

    /// Take the element list
    pub fn into_elements(self, rule: &str) -> Result<Vec<sir::Expr>> {
        match self {
            Self::Elements(elements) => Ok(elements),
            _ => Err(Self::mismatch(rule, "elements")),
        }
    }

    /// Take the record fields
    pub fn into_fields(self, rule: &str) -> Result<Vec<(Symbol, sir::Expr)>> {
        match self {
            Self::Fields(fields) => Ok(fields),
            _ => Err(Self::mismatch(rule, "fields")),
        }
    }

    /// Take the block body
    pub fn into_block(self, rule: &str) -> Result<(Vec<sir::Stmt>, sir::Expr)> {
        match self {
            Self::Block { statements, result } => Ok((statements, result)),
            _ => Err(Self::mismatch(rule, "block")),
        }
    }

    /// Take the loop condition
    pub fn into_condition(self, rule: &str) -> Result<sir::Expr> {
        match self {
            Self::Condition(condition) => Ok(condition),
            _ => Err(Self::mismatch(rule, "condition")),
        }
    }

    /// Take the iterable
    pub fn into_iterable(self, rule: &str) -> Result<sir::Expr> {
        match self {
            Self::Iterable(iterable) => Ok(iterable),
            _ => Err(Self::mismatch(rule, "iterable")),
        }
    }
}

/// Context handed to statement-stage rules
pub struct StmtCx {
    /// Lowered children, shaped per statement kind
    pub children: StmtChildren,
    /// Resolved declared type, for variable declarations with annotations
    pub declared_ty: Option<sir::Type>,
}

impl StmtCx {
    /// A context with no lowered children
    pub fn empty() -> Self {
        Self {
            children: StmtChildren::None,
            declared_ty: None,
        }
    }

    /// A context with children
    pub fn with_children(children: StmtChildren) -> Self {
        Self {
            children,
            declared_ty: None,
        }
    }
}

/// Lowered children of a statement node
pub enum StmtChildren {
    /// No pre-lowered children (break, continue, nested blocks)
    None,
    /// One lowered value (expression statements, variable declarations)
    Value(sir::Expr),
    /// An optional lowered value (return)
    OptionalValue(Option<sir::Expr>),
    /// A lowered assignment pair
    Assign {
        /// Target expression
        target: sir::Expr,
        /// Assigned value
        value: sir::Expr,
    },
    /// A lowered condition (if, while)
    Condition(sir::Expr),
    /// A lowered iterable (for)
    Iterable(sir::Expr),
}

impl StmtChildren {
    fn mismatch(rule: &str, wanted: &str) -> CompileError {
        CompileError::internal(format!("{rule} rule expected {wanted} children"))
    }

    /// Take the single value
    pub fn into_value(self, rule: &str) -> Result<sir::Expr> {
        match self {
            Self::Value(expr) => Ok(expr),
            _ => Err(Self::mismatch(rule, "value")),
        }
    }

    /// Take the optional value
    pub fn into_optional_value(self, rule: &str) -> Result<Option<sir::Expr>> {
        match self {
            Self::OptionalValue(value) => Ok(value),
            _ => Err(Self::mismatch(rule, "optional value")),
        }
    }

    /// Take the assignment pair
    pub fn into_assign(self, rule: &str) -> Result<(sir::Expr, sir::Expr)> {
        match self {
            Self::Assign { target, value } => Ok((target, value)),
            _ => Err(Self::mismatch(rule, "assign")),
        }
    }

    /// Take the condition
    pub fn into_condition(self, rule: &str) -> Result<sir::Expr> {
        match self {
            Self::Condition(condition) => Ok(condition),
            _ => Err(Self::mismatch(rule, "condition")),
        }
    }

    /// Take the iterable
    pub fn into_iterable(self, rule: &str) -> Result<sir::Expr> {
        match self {
            Self::Iterable(iterable) => Ok(iterable),
            _ => Err(Self::mismatch(rule, "iterable")),
        }
    }
}
