//! Loop rules in expression position
//!
//! Loops are statements in the IR; a loop in expression position lowers
//! to its statement wrapped in a unit-valued block, keeping the IR's
//! expression/statement split strict.

use crate::context::ExprCx;
use crate::engine::ExpressionRule;
use crate::lowerer::Lowerer;
use au_ast as ast;
use au_diag::Result;
use au_sir as sir;
use au_sir::Type;

/// Lowers for loops in expression position
pub struct ForLoopRule;

impl ExpressionRule for ForLoopRule {
    fn name(&self) -> &'static str {
        "for-loop"
    }

    fn applies(&self, node: &ast::Expr, _cx: &ExprCx) -> bool {
        matches!(node.kind, ast::ExprKind::For { .. })
    }

    fn apply(&self, node: &ast::Expr, lw: &mut Lowerer, cx: ExprCx) -> Result<sir::Expr> {
        let ast::ExprKind::For {
            var, var_ty, body, ..
        } = &node.kind
        else {
            unreachable!("guarded by applies");
        };
        let iterable = cx.children.into_iterable(self.name())?;
        let origin = node.origin.clone();

        let element_ty = lw.infer_iterable_element(&iterable.ty, origin.as_ref())?;
        let bound_ty = match var_ty {
            Some(annotation) => {
                let annotated = lw.build_type(annotation, None)?;
                lw.ensure_compatible(
                    &element_ty,
                    &annotated,
                    &format!("loop variable '{}'", lw.resolve(*var)),
                    origin.as_ref(),
                )?;
                annotated
            }
            None => element_ty,
        };

        let body_stmts = lw.with_scope(|lw| {
            lw.services.vars.set(*var, bound_ty.clone());
            lw.lower_body_as_stmts(body)
        })?;

        let for_stmt = sir::Stmt::For {
            var: *var,
            var_ty: bound_ty,
            iterable,
            body: body_stmts,
            origin: origin.clone(),
        };
        Ok(sir::Expr::new(
            sir::ExprKind::Block {
                statements: vec![for_stmt],
                result: Box::new(sir::Expr::unit(origin.clone())),
            },
            Type::Unit,
            origin,
        ))
    }
}

/// Lowers while loops in expression position
pub struct WhileLoopRule;

impl ExpressionRule for WhileLoopRule {
    fn name(&self) -> &'static str {
        "while-loop"
    }

    fn applies(&self, node: &ast::Expr, _cx: &ExprCx) -> bool {
        matches!(node.kind, ast::ExprKind::While { .. })
    }

    fn apply(&self, node: &ast::Expr, lw: &mut Lowerer, cx: ExprCx) -> Result<sir::Expr> {
        let ast::ExprKind::While { body, .. } = &node.kind else {
            unreachable!("guarded by applies");
        };
        let condition = cx.children.into_condition(self.name())?;
        let origin = node.origin.clone();

        lw.ensure_boolean(&condition.ty, "while condition", origin.as_ref())?;
        let body_stmts = lw.with_scope(|lw| lw.lower_body_as_stmts(body))?;

        let while_stmt = sir::Stmt::While {
            condition,
            body: body_stmts,
            origin: origin.clone(),
        };
        Ok(sir::Expr::new(
            sir::ExprKind::Block {
                statements: vec![while_stmt],
                result: Box::new(sir::Expr::unit(origin.clone())),
            },
            Type::Unit,
            origin,
        ))
    }
}
