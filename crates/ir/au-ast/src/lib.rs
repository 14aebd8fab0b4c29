//! Surface AST node model
//!
//! This is the contract between the parser (out of scope here) and the
//! semantic core. Every category — types, expressions, statements,
//! patterns — is a closed enum so lowering can match exhaustively; there is
//! no runtime kind-tag dispatch. Nodes are plain trees: each unit is
//! consumed exactly once, top-down, so arena indirection would buy nothing.
//!
//! Every node carries an optional [`Origin`] used only for diagnostics.

use au_intern::Symbol;
use au_span::Origin;

/// A parsed module (one compilation unit)
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    /// Module name; `None` for the anonymous main module
    pub name: Option<Symbol>,
    /// Import declarations, in source order
    pub imports: Vec<Import>,
    /// Top-level declarations, in source order
    pub decls: Vec<Decl>,
    /// Source location
    pub origin: Option<Origin>,
}

/// An import declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    /// Path segments (`Math::Vector` → `["Math", "Vector"]`)
    pub path: Vec<Symbol>,
    /// Selective import list; `None` imports everything
    pub items: Option<Vec<ImportItem>>,
    /// Source location
    pub origin: Option<Origin>,
}

/// One item in a selective import
#[derive(Debug, Clone, PartialEq)]
pub struct ImportItem {
    /// Imported name
    pub name: Symbol,
    /// Local alias (`import Foo::{bar as baz}`)
    pub alias: Option<Symbol>,
}

/// A top-level declaration
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    /// Type declaration
    Type(TypeDecl),
    /// Function declaration
    Func(FuncDecl),
}

/// A type declaration
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    /// Declared name
    pub name: Symbol,
    /// Generic parameters
    pub type_params: Vec<TypeParam>,
    /// Right-hand side
    pub ty: TypeExpr,
    /// Whether the type is exported from its module
    pub exported: bool,
    /// Source location
    pub origin: Option<Origin>,
}

/// A generic type parameter
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    /// Parameter name (`T`)
    pub name: Symbol,
    /// Optional constraint name (`T: Numeric`)
    pub constraint: Option<Symbol>,
    /// Source location
    pub origin: Option<Origin>,
}

/// A function declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    /// Function name
    pub name: Symbol,
    /// Generic parameters
    pub type_params: Vec<TypeParam>,
    /// Parameters
    pub params: Vec<Param>,
    /// Declared return type
    pub ret_type: TypeExpr,
    /// Body; `None` for external declarations
    pub body: Option<Expr>,
    /// Whether this is an external (foreign) function
    pub external: bool,
    /// Whether the function is exported from its module
    pub exported: bool,
    /// Source location
    pub origin: Option<Origin>,
}

/// A function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name
    pub name: Symbol,
    /// Declared type
    pub ty: TypeExpr,
    /// Source location
    pub origin: Option<Origin>,
}

/// A type as written in source
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    /// What kind of type syntax this is
    pub kind: TypeExprKind,
    /// Source location
    pub origin: Option<Origin>,
}

/// Type syntax kinds
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExprKind {
    /// A bare name: a primitive, a declared type, or a type parameter
    Name {
        /// The written name
        name: Symbol,
    },
    /// Record type literal
    Record {
        /// Field names and types, in declaration order
        fields: Vec<(Symbol, TypeExpr)>,
    },
    /// Sum (tagged-union) type literal
    Sum {
        /// Variants, in declaration order
        variants: Vec<VariantDef>,
    },
    /// Array type
    Array {
        /// Element type
        element: Box<TypeExpr>,
    },
    /// Tuple type
    Tuple {
        /// Element types
        elements: Vec<TypeExpr>,
    },
    /// Map type
    Map {
        /// Key type
        key: Box<TypeExpr>,
        /// Value type
        value: Box<TypeExpr>,
    },
    /// Function type
    Function {
        /// Parameter types
        params: Vec<TypeExpr>,
        /// Return type
        ret: Box<TypeExpr>,
    },
    /// Generic instantiation (`Option<i32>`)
    Generic {
        /// Base type name
        base: Symbol,
        /// Type arguments
        args: Vec<TypeExpr>,
    },
    /// Shared reference
    Ref {
        /// Referenced type
        inner: Box<TypeExpr>,
    },
    /// Mutable reference
    MutRef {
        /// Referenced type
        inner: Box<TypeExpr>,
    },
}

/// One variant of a sum type
#[derive(Debug, Clone, PartialEq)]
pub struct VariantDef {
    /// Variant name
    pub name: Symbol,
    /// Typed fields, in declaration order
    pub fields: Vec<(Symbol, TypeExpr)>,
    /// Source location
    pub origin: Option<Origin>,
}

/// An expression
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// What kind of expression this is
    pub kind: ExprKind,
    /// Source location
    pub origin: Option<Origin>,
}

impl Expr {
    /// Construct an expression with no origin (used heavily by tests)
    pub fn new(kind: ExprKind) -> Self {
        Self { kind, origin: None }
    }

    /// Stable kind name for internal-defect messages
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ExprKind::Literal { .. } => "Literal",
            ExprKind::StringInterp { .. } => "StringInterp",
            ExprKind::Regex { .. } => "Regex",
            ExprKind::Var { .. } => "Var",
            ExprKind::Unary { .. } => "Unary",
            ExprKind::Binary { .. } => "Binary",
            ExprKind::Pipe { .. } => "Pipe",
            ExprKind::Call { .. } => "Call",
            ExprKind::Member { .. } => "Member",
            ExprKind::SafeMember { .. } => "SafeMember",
            ExprKind::SafeCall { .. } => "SafeCall",
            ExprKind::Index { .. } => "Index",
            ExprKind::Slice { .. } => "Slice",
            ExprKind::RecordLit { .. } => "RecordLit",
            ExprKind::ArrayLit { .. } => "ArrayLit",
            ExprKind::TupleLit { .. } => "TupleLit",
            ExprKind::If { .. } => "If",
            ExprKind::Match { .. } => "Match",
            ExprKind::Lambda { .. } => "Lambda",
            ExprKind::Let { .. } => "Let",
            ExprKind::Do { .. } => "Do",
            ExprKind::Block { .. } => "Block",
            ExprKind::For { .. } => "For",
            ExprKind::While { .. } => "While",
            ExprKind::Range { .. } => "Range",
            ExprKind::ListComp { .. } => "ListComp",
            ExprKind::Await { .. } => "Await",
            ExprKind::Try { .. } => "Try",
        }
    }
}

/// A literal value shared between expressions and patterns
#[derive(Debug, Clone, PartialEq)]
pub enum LitValue {
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// String literal
    Str(String),
    /// Boolean literal
    Bool(bool),
    /// Unit literal `()`
    Unit,
    /// Symbol literal (`:ok`)
    Symbol(Symbol),
}

/// One part of an interpolated string
#[derive(Debug, Clone, PartialEq)]
pub enum InterpPart {
    /// Literal text
    Text(String),
    /// Embedded expression
    Expr(Expr),
}

/// Expression kinds
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Literal value
    Literal {
        /// The value
        value: LitValue,
    },
    /// Interpolated string (`"sum: {total}"`), desugared during lowering
    StringInterp {
        /// Text and expression parts, in order
        parts: Vec<InterpPart>,
    },
    /// Regex literal
    Regex {
        /// Pattern source
        pattern: String,
        /// Flags (`i`, `m`, ...)
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
    /// Pipe (`value |> target`), desugared into a call during lowering
    Pipe {
        /// Piped value
        value: Box<Expr>,
        /// Target callable or call
        target: Box<Expr>,
    },
    /// Function call
    Call {
        /// Callee expression
        callee: Box<Expr>,
        /// Arguments
        args: Vec<Expr>,
    },
    /// Member access
    Member {
        /// Object expression
        object: Box<Expr>,
        /// Member name
        member: Symbol,
    },
    /// Null-safe member access (`a?.b`)
    SafeMember {
        /// Object expression
        object: Box<Expr>,
        /// Member name
        member: Symbol,
    },
    /// Null-safe method call (`a?.f(x)`)
    SafeCall {
        /// Object expression
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
        /// Index expression
        index: Box<Expr>,
    },
    /// Slice access (`a[lo..hi]`, either bound optional)
    Slice {
        /// Sliced object
        object: Box<Expr>,
        /// Lower bound
        start: Option<Box<Expr>>,
        /// Upper bound
        end: Option<Box<Expr>>,
    },
    /// Record literal
    RecordLit {
        /// Record type name
        type_name: Symbol,
        /// Field initializers, in source order
        fields: Vec<(Symbol, Expr)>,
    },
    /// Array literal
    ArrayLit {
        /// Elements
        elements: Vec<Expr>,
    },
    /// Tuple literal
    TupleLit {
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
        /// Arms, in source order
        arms: Vec<MatchArm>,
    },
    /// Lambda
    Lambda {
        /// Parameters
        params: Vec<LambdaParam>,
        /// Optional return type annotation
        ret_type: Option<TypeExpr>,
        /// Body
        body: Box<Expr>,
    },
    /// Let binding, optionally scoped over a body expression
    Let {
        /// Bound name
        name: Symbol,
        /// Optional type annotation
        ty: Option<TypeExpr>,
        /// Whether the binding is mutable
        mutable: bool,
        /// Bound value
        value: Box<Expr>,
        /// Expression the binding scopes over, if any
        body: Option<Box<Expr>>,
    },
    /// Do block, desugared into a block expression during lowering
    Do {
        /// Statements and expressions, in order
        body: Vec<DoItem>,
    },
    /// Block expression
    Block {
        /// Leading statements
        statements: Vec<Stmt>,
        /// Result expression; `None` means unit
        result: Option<Box<Expr>>,
    },
    /// For loop in expression position (unit-valued)
    For {
        /// Loop variable
        var: Symbol,
        /// Optional loop variable annotation
        var_ty: Option<TypeExpr>,
        /// Iterated expression
        iterable: Box<Expr>,
        /// Body
        body: Box<Expr>,
    },
    /// While loop in expression position (unit-valued)
    While {
        /// Condition
        condition: Box<Expr>,
        /// Body
        body: Box<Expr>,
    },
    /// Range expression
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
        /// Output expression
        output: Box<Expr>,
        /// Generators, outermost first
        generators: Vec<Generator>,
    },
    /// Await
    Await {
        /// Awaited expression
        operand: Box<Expr>,
    },
    /// Try (`expr?`)
    Try {
        /// Tried expression
        operand: Box<Expr>,
    },
}

/// One item of a do block
#[derive(Debug, Clone, PartialEq)]
pub enum DoItem {
    /// A statement
    Stmt(Stmt),
    /// An expression (the last one becomes the block result)
    Expr(Expr),
}

/// A lambda parameter, possibly untyped
#[derive(Debug, Clone, PartialEq)]
pub struct LambdaParam {
    /// Parameter name
    pub name: Symbol,
    /// Optional type annotation
    pub ty: Option<TypeExpr>,
    /// Source location
    pub origin: Option<Origin>,
}

/// One generator of a list comprehension
#[derive(Debug, Clone, PartialEq)]
pub struct Generator {
    /// Bound variable
    pub var: Symbol,
    /// Iterated expression
    pub iterable: Expr,
    /// Optional filter condition
    pub condition: Option<Expr>,
    /// Source location
    pub origin: Option<Origin>,
}

/// One arm of a match expression
#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    /// Pattern
    pub pattern: Pattern,
    /// Optional guard
    pub guard: Option<Expr>,
    /// Arm body
    pub body: Expr,
}

/// A pattern
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    /// What kind of pattern this is
    pub kind: PatternKind,
    /// Source location
    pub origin: Option<Origin>,
}

impl Pattern {
    /// Construct a pattern with no origin
    pub fn new(kind: PatternKind) -> Self {
        Self { kind, origin: None }
    }
}

/// Pattern kinds
#[derive(Debug, Clone, PartialEq)]
pub enum PatternKind {
    /// Wildcard (`_`)
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
    /// Sum-type constructor pattern
    Constructor {
        /// Constructor name
        name: Symbol,
        /// Positional fields: simple bindings or nested patterns
        fields: Vec<PatternField>,
    },
    /// Or pattern (`A | B`)
    Or {
        /// Alternatives
        alternatives: Vec<Pattern>,
    },
    /// Regex pattern with named capture bindings
    Regex {
        /// Pattern source
        pattern: String,
        /// Flags
        flags: String,
        /// Names bound from capture groups, in order
        bindings: Vec<Symbol>,
    },
}

/// One positional field of a constructor pattern
#[derive(Debug, Clone, PartialEq)]
pub enum PatternField {
    /// A simple binding name (`_` means ignored)
    Binding(Symbol),
    /// A nested pattern
    Pattern(Pattern),
}

/// A statement
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    /// What kind of statement this is
    pub kind: StmtKind,
    /// Source location
    pub origin: Option<Origin>,
}

impl Stmt {
    /// Construct a statement with no origin
    pub fn new(kind: StmtKind) -> Self {
        Self { kind, origin: None }
    }

    /// Stable kind name for internal-defect messages
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            StmtKind::Expr { .. } => "Expr",
            StmtKind::VarDecl { .. } => "VarDecl",
            StmtKind::Assign { .. } => "Assign",
            StmtKind::Return { .. } => "Return",
            StmtKind::Break => "Break",
            StmtKind::Continue => "Continue",
            StmtKind::If { .. } => "If",
            StmtKind::While { .. } => "While",
            StmtKind::For { .. } => "For",
            StmtKind::Block { .. } => "Block",
        }
    }
}

/// Statement kinds
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Expression statement
    Expr {
        /// The expression
        expr: Expr,
    },
    /// Variable declaration
    VarDecl {
        /// Declared name
        name: Symbol,
        /// Optional type annotation
        ty: Option<TypeExpr>,
        /// Initializer
        value: Expr,
        /// Whether the binding is mutable
        mutable: bool,
    },
    /// Assignment
    Assign {
        /// Assignment target (variable, member, or index)
        target: Expr,
        /// Assigned value
        value: Expr,
    },
    /// Return statement
    Return {
        /// Returned value, if any
        value: Option<Expr>,
    },
    /// Break out of the innermost loop
    Break,
    /// Continue the innermost loop
    Continue,
    /// If statement
    If {
        /// Condition
        condition: Expr,
        /// Then body
        then_body: Vec<Stmt>,
        /// Else body
        else_body: Option<Vec<Stmt>>,
    },
    /// While statement
    While {
        /// Condition
        condition: Expr,
        /// Body
        body: Vec<Stmt>,
    },
    /// For statement
    For {
        /// Loop variable
        var: Symbol,
        /// Iterated expression
        iterable: Expr,
        /// Body
        body: Vec<Stmt>,
    },
    /// Nested statement block
    Block {
        /// Statements
        statements: Vec<Stmt>,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    /// Addition / string concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Modulo (`%`)
    Mod,
    /// Equality (`==`)
    Eq,
    /// Inequality (`!=`)
    Ne,
    /// Less than (`<`)
    Lt,
    /// Less than or equal (`<=`)
    Le,
    /// Greater than (`>`)
    Gt,
    /// Greater than or equal (`>=`)
    Ge,
    /// Logical and (`&&`)
    And,
    /// Logical or (`||`)
    Or,
}

impl BinOp {
    /// Source spelling of the operator
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Negation (`-`)
    Neg,
    /// Identity (`+`)
    Pos,
    /// Logical not (`!`)
    Not,
}

impl UnaryOp {
    /// Source spelling of the operator
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Pos => "+",
            Self::Not => "!",
        }
    }
}
