//! The rule engine
//!
//! Per named stage, an ordered list of rules. Each rule exposes
//! `applies` and `apply`; dispatch is **first match wins**. A node that no
//! rule matches is a fatal compiler-internal defect — the engine never
//! silently ignores a node, and never reports the gap as a user error.
//!
//! Stages are statically typed: an expression rule can only produce an
//! expression, so the "rule produced the wrong IR kind" defect class is
//! prevented at compile time; the remaining defect class (a rule reading
//! a context shape the visitor did not build) is caught by the typed
//! context accessors in [`crate::context`].

use crate::context::{ExprCx, StmtCx};
use crate::lowerer::Lowerer;
use crate::rules;
use au_ast as ast;
use au_diag::{CompileError, Result};
use au_sir as sir;
use std::fmt;

/// A named dispatch stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Expression lowering
    Expression,
    /// Statement lowering
    Statement,
    /// Whole-function post-processing (effect analysis)
    Function,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Expression => "expression",
            Self::Statement => "statement",
            Self::Function => "function",
        };
        f.write_str(name)
    }
}

/// A rule in the expression stage
pub trait ExpressionRule {
    /// Rule name, for internal-defect messages
    fn name(&self) -> &'static str;
    /// Whether this rule handles the node
    fn applies(&self, node: &ast::Expr, cx: &ExprCx) -> bool;
    /// Build the IR for the node
    fn apply(&self, node: &ast::Expr, lw: &mut Lowerer, cx: ExprCx) -> Result<sir::Expr>;
}

/// A rule in the statement stage
pub trait StatementRule {
    /// Rule name, for internal-defect messages
    fn name(&self) -> &'static str;
    /// Whether this rule handles the node
    fn applies(&self, node: &ast::Stmt, cx: &StmtCx) -> bool;
    /// Build the IR for the node
    fn apply(&self, node: &ast::Stmt, lw: &mut Lowerer, cx: StmtCx) -> Result<sir::Stmt>;
}

/// A rule in the function stage
pub trait FunctionRule {
    /// Rule name, for internal-defect messages
    fn name(&self) -> &'static str;
    /// Whether this rule handles the function
    fn applies(&self, func: &sir::Func) -> bool;
    /// Rewrite the lowered function
    fn apply(&self, func: sir::Func, lw: &mut Lowerer) -> Result<sir::Func>;
}

/// Ordered rule lists, one per stage
pub struct RuleEngine {
    expression: Vec<Box<dyn ExpressionRule>>,
    statement: Vec<Box<dyn StatementRule>>,
    function: Vec<Box<dyn FunctionRule>>,
}

impl RuleEngine {
    /// The standard rule set, in dispatch order
    pub fn standard() -> Self {
        Self {
            expression: rules::standard_expression_rules(),
            statement: rules::standard_statement_rules(),
            function: rules::standard_function_rules(),
        }
    }

    /// An engine with explicit rule lists (used by tests)
    pub fn with_rules(
        expression: Vec<Box<dyn ExpressionRule>>,
        statement: Vec<Box<dyn StatementRule>>,
        function: Vec<Box<dyn FunctionRule>>,
    ) -> Self {
        Self {
            expression,
            statement,
            function,
        }
    }

    /// Dispatch an expression node to the first matching rule
    pub fn dispatch_expression(
        &self,
        node: &ast::Expr,
        lw: &mut Lowerer,
        cx: ExprCx,
    ) -> Result<sir::Expr> {
        for rule in &self.expression {
            if rule.applies(node, &cx) {
                return rule.apply(node, lw, cx);
            }
        }
        Err(no_match(Stage::Expression, node.kind_name()))
    }

    /// Dispatch a statement node to the first matching rule
    pub fn dispatch_statement(
        &self,
        node: &ast::Stmt,
        lw: &mut Lowerer,
        cx: StmtCx,
    ) -> Result<sir::Stmt> {
        for rule in &self.statement {
            if rule.applies(node, &cx) {
                return rule.apply(node, lw, cx);
            }
        }
        Err(no_match(Stage::Statement, node.kind_name()))
    }

    /// Dispatch a lowered function to the first matching rule
    pub fn dispatch_function(&self, func: sir::Func, lw: &mut Lowerer) -> Result<sir::Func> {
        for rule in &self.function {
            if rule.applies(&func) {
                return rule.apply(func, lw);
            }
        }
        Err(no_match(Stage::Function, "Func"))
    }
}

fn no_match(stage: Stage, kind: &str) -> CompileError {
    CompileError::internal(format!("no {stage} rule matched {kind}"))
}
