//! Unary and binary operator rules

use crate::context::ExprCx;
use crate::engine::ExpressionRule;
use crate::lowerer::Lowerer;
use au_ast as ast;
use au_diag::Result;
use au_sir as sir;
use au_ty::TyCx;

/// Types unary operations
pub struct UnaryRule;

impl ExpressionRule for UnaryRule {
    fn name(&self) -> &'static str {
        "unary"
    }

    fn applies(&self, node: &ast::Expr, _cx: &ExprCx) -> bool {
        matches!(node.kind, ast::ExprKind::Unary { .. })
    }

    fn apply(&self, node: &ast::Expr, lw: &mut Lowerer, cx: ExprCx) -> Result<sir::Expr> {
        let ast::ExprKind::Unary { op, .. } = &node.kind else {
            unreachable!("guarded by applies");
        };
        let operand = cx.children.into_operand(self.name())?;
        let names = lw.services.names;
        let ty = au_ty::infer_unary_type(
            *op,
            &operand.ty,
            &TyCx {
                names: &names,
                interner: &lw.services.interner,
                type_params: lw.current_type_params(),
                origin: node.origin.as_ref(),
            },
        )?;
        Ok(sir::Expr::new(
            sir::ExprKind::Unary {
                op: *op,
                operand: Box::new(operand),
            },
            ty,
            node.origin.clone(),
        ))
    }
}

/// Types binary operations
pub struct BinaryRule;

impl ExpressionRule for BinaryRule {
    fn name(&self) -> &'static str {
        "binary"
    }

    fn applies(&self, node: &ast::Expr, _cx: &ExprCx) -> bool {
        matches!(node.kind, ast::ExprKind::Binary { .. })
    }

    fn apply(&self, node: &ast::Expr, lw: &mut Lowerer, cx: ExprCx) -> Result<sir::Expr> {
        let ast::ExprKind::Binary { op, .. } = &node.kind else {
            unreachable!("guarded by applies");
        };
        let (left, right) = cx.children.into_pair(self.name())?;
        let names = lw.services.names;
        let ty = au_ty::infer_binary_type(
            *op,
            &left.ty,
            &right.ty,
            &TyCx {
                names: &names,
                interner: &lw.services.interner,
                type_params: lw.current_type_params(),
                origin: node.origin.as_ref(),
            },
        )?;
        Ok(sir::Expr::new(
            sir::ExprKind::Binary {
                op: *op,
                left: Box::new(left),
                right: Box::new(right),
            },
            ty,
            node.origin.clone(),
        ))
    }
}
