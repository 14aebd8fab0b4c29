//! The match rule
//!
//! Picks the lowering form: a match whose arms are all guard-free, use
//! constructor/wildcard/variable patterns, and have unit-valued block
//! bodies lowers as a match **statement** wrapped in a unit block; any
//! other match lowers as a value-producing match expression through the
//! match analyzer.

use crate::context::ExprCx;
use crate::engine::ExpressionRule;
use crate::lowerer::Lowerer;
use crate::matches;
use au_ast as ast;
use au_diag::Result;
use au_sir as sir;
use au_sir::Type;

/// Lowers match expressions in either form
pub struct MatchRule;

impl ExpressionRule for MatchRule {
    fn name(&self) -> &'static str {
        "match"
    }

    fn applies(&self, node: &ast::Expr, _cx: &ExprCx) -> bool {
        matches!(node.kind, ast::ExprKind::Match { .. })
    }

    fn apply(&self, node: &ast::Expr, lw: &mut Lowerer, cx: ExprCx) -> Result<sir::Expr> {
        let ast::ExprKind::Match { arms, .. } = &node.kind else {
            unreachable!("guarded by applies");
        };
        let scrutinee = cx.children.into_operand(self.name())?;
        let origin = node.origin.clone();

        if matches::is_statement_match(arms) {
            let scrutinee_ty = scrutinee.ty.clone();
            let mut lowered_arms = Vec::with_capacity(arms.len());
            for arm in arms {
                lowered_arms.push(lw.transform_stmt_arm(&scrutinee_ty, arm)?);
            }

            let match_stmt = sir::Stmt::Match {
                scrutinee,
                arms: lowered_arms,
                origin: origin.clone(),
            };
            return Ok(sir::Expr::new(
                sir::ExprKind::Block {
                    statements: vec![match_stmt],
                    result: Box::new(sir::Expr::unit(origin.clone())),
                },
                Type::Unit,
                origin,
            ));
        }

        let scrutinee_ty = scrutinee.ty.clone();
        let analysis = matches::analyze(
            lw,
            &scrutinee_ty,
            arms,
            origin.as_ref(),
            |lw, scrutinee_ty, arm| lw.transform_expr_arm(scrutinee_ty, arm),
        )?;

        Ok(sir::Expr::new(
            sir::ExprKind::Match {
                scrutinee: Box::new(scrutinee),
                arms: analysis.arms,
            },
            analysis.result_type,
            origin,
        ))
    }
}
