//! Semantic IR (SIR)
//!
//! The fully-typed intermediate representation produced by lowering and
//! consumed by the backend. The backend may rely on three guarantees:
//!
//! * every [`Expr`] carries a resolved [`Type`];
//! * within a completed function body, every type variable has been
//!   substituted away;
//! * every binding constructor [`Pattern`] carries its `bindings` list in
//!   positional field order.
//!
//! Nodes are immutable and built bottom-up. Like the AST, every category
//! is a closed enum.

mod decl;
mod display;
mod expr;
mod names;
mod types;

pub use decl::{Effect, Func, FunctionSig, Item, Module, Param, TypeDecl, TypeParam};
pub use display::describe;
pub use expr::{
    Capture, CaptureMode, Expr, ExprKind, Generator, MatchArm, Pattern, PatternField, PatternKind,
    Stmt, StmtMatchArm,
};
pub use names::Names;
pub use types::{Field, Type, Variant};
