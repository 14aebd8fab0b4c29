//! IR expressions, statements, and patterns

use crate::types::Type;
use au_ast::{BinOp, LitValue, UnaryOp};
use au_intern::Symbol;
use au_span::Origin;

/// A typed IR expression
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// What kind of expression this is
    pub kind: ExprKind,
    /// Resolved type; never absent
    pub ty: Type,
    /// Source location
    pub origin: Option<Origin>,
}

impl Expr {
    /// Construct an expression
    pub fn new(kind: ExprKind, ty: Type, origin: Option<Origin>) -> Self {
        Self { kind, ty, origin }
    }

    /// The unit literal
    pub fn unit(origin: Option<Origin>) -> Self {
        Self::new(ExprKind::Unit, Type::Unit, origin)
    }

    /// Stable kind name for internal-defect messages
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ExprKind::Literal { .. } => "Literal",
            ExprKind::Unit => "Unit",
            ExprKind::Regex { .. } => "Regex",
            ExprKind::Var { .. } => "Var",
            ExprKind::Unary { .. } => "Unary",
            ExprKind::Binary { .. } => "Binary",
            ExprKind::Call { .. } => "Call",
            ExprKind::Member { .. } => "Member",
            ExprKind::SafeMember { .. } => "SafeMember",
            ExprKind::SafeCall { .. } => "SafeCall",
            ExprKind::Index { .. } => "Index",
            ExprKind::Slice { .. } => "Slice",
            ExprKind::Record { .. } => "Record",
            ExprKind::Array { .. } => "Array",
            ExprKind::Tuple { .. } => "Tuple",
            ExprKind::If { .. } => "If",
            ExprKind::Match { .. } => "Match",
            ExprKind::Lambda { .. } => "Lambda",
            ExprKind::Block { .. } => "Block",
            ExprKind::Range { .. } => "Range",
            ExprKind::ListComp { .. } => "ListComp",
            ExprKind::Await { .. } => "Await",
            ExprKind::Try { .. } => "Try",
        }
    }
}

/// IR expression kinds
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Literal value
    Literal {
        /// The value
        value: LitValue,
    },
    /// The unit value
    Unit,
    /// Regex literal
    Regex {
        /// Pattern source
        pattern: String,
        /// Flags
        flags: String,
    },
    /// Variable or function reference
    Var {
        /// Referenced name
        name: Symbol,
    },
    /// Unary operation
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<Expr>,
    },
    /// Binary operation
    Binary {
        /// Operator
        op: BinOp,
        /// Left operand
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
    },
    /// Function call
    Call {
        /// Callee
        callee: Box<Expr>,
        /// Arguments
        args: Vec<Expr>,
    },
    /// Member access
    Member {
        /// Object
        object: Box<Expr>,
        /// Member name
        member: Symbol,
    },
    /// Null-safe member access
    SafeMember {
        /// Object
        object: Box<Expr>,
        /// Member name
        member: Symbol,
    },
    /// Null-safe method call
    SafeCall {
        /// Object
        object: Box<Expr>,
        /// Method name
        member: Symbol,
        /// Arguments
        args: Vec<Expr>,
    },
    /// Index access
    Index {
        /// Indexed object
        object: Box<Expr>,
        /// Index
        index: Box<Expr>,
    },
    /// Slice access
    Slice {
        /// Sliced object
        object: Box<Expr>,
        /// Lower bound
        start: Option<Box<Expr>>,
        /// Upper bound
        end: Option<Box<Expr>>,
    },
    /// Record construction
    Record {
        /// Record type name
        type_name: Symbol,
        /// Field initializers, in declaration order
        fields: Vec<(Symbol, Expr)>,
    },
    /// Array literal
    Array {
        /// Elements
        elements: Vec<Expr>,
    },
    /// Tuple literal
    Tuple {
        /// Elements
        elements: Vec<Expr>,
    },
    /// If expression
    If {
        /// Condition
        condition: Box<Expr>,
        /// Then branch
        then_branch: Box<Expr>,
        /// Else branch
        else_branch: Option<Box<Expr>>,
    },
    /// Match expression
    Match {
        /// Scrutinee
        scrutinee: Box<Expr>,
        /// Arms
        arms: Vec<MatchArm>,
    },
    /// Lambda with computed captures
    Lambda {
        /// Captured outer variables, in first-use order
        captures: Vec<Capture>,
        /// Parameters, fully typed
        params: Vec<crate::Param>,
        /// Body
        body: Box<Expr>,
    },
    /// Block with statements and a result
    Block {
        /// Statements, in order
        statements: Vec<Stmt>,
        /// Result expression
        result: Box<Expr>,
    },
    /// Range value
    Range {
        /// Start
        start: Box<Expr>,
        /// End
        end: Box<Expr>,
        /// Whether the end is included
        inclusive: bool,
    },
    /// List comprehension
    ListComp {
        /// Generators, outermost first
        generators: Vec<Generator>,
        /// Output expression (its type is the element type)
        output: Box<Expr>,
    },
    /// Await; the expression type is the unwrapped inner type
    Await {
        /// Awaited expression
        operand: Box<Expr>,
    },
    /// Try; the expression type is the success type
    Try {
        /// Tried expression
        operand: Box<Expr>,
    },
}

/// One lowered generator of a list comprehension
#[derive(Debug, Clone, PartialEq)]
pub struct Generator {
    /// Bound variable
    pub var: Symbol,
    /// Element type of the iterated expression
    pub var_ty: Type,
    /// Iterated expression
    pub iterable: Expr,
    /// Optional filter condition
    pub condition: Option<Expr>,
}

/// One arm of a match expression
#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    /// Pattern with computed bindings
    pub pattern: Pattern,
    /// Optional guard
    pub guard: Option<Expr>,
    /// Arm body
    pub body: Expr,
}

/// One arm of a match statement
#[derive(Debug, Clone, PartialEq)]
pub struct StmtMatchArm {
    /// Pattern with computed bindings
    pub pattern: Pattern,
    /// Optional guard
    pub guard: Option<Expr>,
    /// Arm body statements
    pub body: Vec<Stmt>,
}

/// A lowered pattern
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    /// What kind of pattern this is
    pub kind: PatternKind,
    /// Source location
    pub origin: Option<Origin>,
}

/// Lowered pattern kinds
#[derive(Debug, Clone, PartialEq)]
pub enum PatternKind {
    /// Wildcard
    Wildcard,
    /// Literal pattern
    Literal {
        /// Matched value
        value: LitValue,
    },
    /// Bare variable binding
    Var {
        /// Bound name
        name: Symbol,
    },
    /// Constructor pattern
    Constructor {
        /// Constructor name
        name: Symbol,
        /// Positional fields as written
        fields: Vec<PatternField>,
        /// Names bound by simple fields, in positional order; ignored
        /// (`_`) fields and nested patterns contribute nothing here
        bindings: Vec<Symbol>,
    },
    /// Or pattern
    Or {
        /// Alternatives
        alternatives: Vec<Pattern>,
    },
    /// Regex pattern
    Regex {
        /// Pattern source
        pattern: String,
        /// Flags
        flags: String,
        /// Names bound from capture groups
        bindings: Vec<Symbol>,
    },
}

/// One positional field of a lowered constructor pattern
#[derive(Debug, Clone, PartialEq)]
pub enum PatternField {
    /// A simple binding name
    Binding(Symbol),
    /// A nested pattern
    Nested(Pattern),
}

/// An IR statement; order within a block is significant
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Variable declaration
    VarDecl {
        /// Declared name
        name: Symbol,
        /// Resolved type
        ty: Type,
        /// Initializer
        value: Expr,
        /// Whether the binding is mutable
        mutable: bool,
        /// Source location
        origin: Option<Origin>,
    },
    /// Assignment
    Assign {
        /// Target (variable, member, or index expression)
        target: Expr,
        /// Assigned value
        value: Expr,
        /// Source location
        origin: Option<Origin>,
    },
    /// Return
    Return {
        /// Returned value, if any
        value: Option<Expr>,
        /// Source location
        origin: Option<Origin>,
    },
    /// Break
    Break {
        /// Source location
        origin: Option<Origin>,
    },
    /// Continue
    Continue {
        /// Source location
        origin: Option<Origin>,
    },
    /// Expression statement
    Expr {
        /// The expression
        expr: Expr,
    },
    /// Nested block
    Block {
        /// Statements
        statements: Vec<Stmt>,
        /// Source location
        origin: Option<Origin>,
    },
    /// If statement
    If {
        /// Condition
        condition: Expr,
        /// Then body
        then_body: Vec<Stmt>,
        /// Else body
        else_body: Option<Vec<Stmt>>,
        /// Source location
        origin: Option<Origin>,
    },
    /// While statement
    While {
        /// Condition
        condition: Expr,
        /// Body
        body: Vec<Stmt>,
        /// Source location
        origin: Option<Origin>,
    },
    /// For statement
    For {
        /// Loop variable
        var: Symbol,
        /// Loop variable type (the iterable's element type)
        var_ty: Type,
        /// Iterated expression
        iterable: Expr,
        /// Body
        body: Vec<Stmt>,
        /// Source location
        origin: Option<Origin>,
    },
    /// Match statement (void form of a match expression)
    Match {
        /// Scrutinee
        scrutinee: Expr,
        /// Arms
        arms: Vec<StmtMatchArm>,
        /// Source location
        origin: Option<Origin>,
    },
}

/// A variable captured by a lambda
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    /// Captured name
    pub name: Symbol,
    /// Type of the captured variable at capture time
    pub ty: Type,
    /// How the variable is captured
    pub mode: CaptureMode,
}

/// How a lambda retains a captured variable
///
/// By-value capture is sufficient under reference-counted ownership; the
/// enum leaves room for move and by-reference modes later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// Capture a copy of the value
    ByValue,
}
