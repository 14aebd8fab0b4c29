//! Lowering rules, grouped by stage
//!
//! Registration order below is dispatch order. The rules' `applies`
//! predicates are disjoint by node kind, so order mostly documents
//! intent, but first-match semantics are load-bearing: a new overlapping
//! rule can be slotted in front of a general one without touching it.

mod calls;
mod functions;
mod literals;
mod loops;
mod matching;
mod operators;
mod statements;
mod structures;

use crate::engine::{ExpressionRule, FunctionRule, StatementRule};

/// The expression stage, in dispatch order
pub fn standard_expression_rules() -> Vec<Box<dyn ExpressionRule>> {
    vec![
        Box::new(literals::LiteralRule),
        Box::new(literals::RegexRule),
        Box::new(literals::VarRule),
        Box::new(structures::RecordRule),
        Box::new(structures::ArrayRule),
        Box::new(structures::TupleRule),
        Box::new(structures::IfRule),
        Box::new(matching::MatchRule),
        Box::new(loops::ForLoopRule),
        Box::new(loops::WhileLoopRule),
        Box::new(structures::LambdaRule),
        Box::new(structures::ListCompRule),
        Box::new(calls::IndexRule),
        Box::new(calls::SliceRule),
        Box::new(calls::CallRule),
        Box::new(calls::SafeCallRule),
        Box::new(calls::SafeMemberRule),
        Box::new(calls::MemberRule),
        Box::new(calls::AwaitRule),
        Box::new(calls::TryRule),
        Box::new(operators::UnaryRule),
        Box::new(operators::BinaryRule),
        Box::new(structures::RangeRule),
        Box::new(structures::BlockRule),
    ]
}

/// The statement stage, in dispatch order
pub fn standard_statement_rules() -> Vec<Box<dyn StatementRule>> {
    vec![
        Box::new(statements::ExprStmtRule),
        Box::new(statements::VarDeclRule),
        Box::new(statements::ReturnRule),
        Box::new(statements::AssignRule),
        Box::new(statements::BreakRule),
        Box::new(statements::ContinueRule),
        Box::new(statements::IfStmtRule),
        Box::new(statements::ForStmtRule),
        Box::new(statements::WhileStmtRule),
        Box::new(statements::BlockStmtRule),
    ]
}

/// The function stage, in dispatch order
pub fn standard_function_rules() -> Vec<Box<dyn FunctionRule>> {
    vec![Box::new(functions::EffectRule)]
}
