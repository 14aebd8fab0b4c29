//! AST → Semantic IR lowering
//!
//! The orchestration layer of the semantic core. Traversal and semantics
//! are kept apart:
//!
//! * **Visitors** ([`Lowerer::visit_expr`], [`Lowerer::visit_stmt`]) own
//!   traversal order only. For each AST node kind they recursively lower
//!   the known child positions in a fixed order, assemble a statically
//!   typed stage context, and hand off to the rule engine. Desugaring
//!   (pipes, string interpolation, `let`/`do` blocks) also lives here.
//! * **Rules** ([`engine::RuleEngine`]) perform inference and checking and
//!   build IR nodes. Dispatch is first-match per stage; a node no rule
//!   matches is a compiler-internal defect, never a user error.
//! * **Analyzers** — match analysis and exhaustiveness, purity/effects,
//!   lambda captures — are invoked from rules through the [`Lowerer`].
//!
//! Scope discipline: every scope-introducing construct goes through
//! [`Lowerer::with_scope`], which snapshots the variable registry before
//! binding and restores it on every exit path, success or error.

mod capture;
mod context;
mod decl;
mod effects;
mod engine;
mod infer;
mod lambda;
mod lowerer;
mod matches;
mod pipeline;
mod purity;
mod rules;
mod services;
mod typebuild;
mod visit;

pub use context::{ExprChildren, ExprCx, StmtChildren, StmtCx};
pub use engine::{ExpressionRule, FunctionRule, RuleEngine, Stage, StatementRule};
pub use lowerer::Lowerer;
pub use pipeline::Pipeline;
pub use services::Services;
