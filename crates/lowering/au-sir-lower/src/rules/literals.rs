//! Leaf rules: literals, regexes, variable references

use crate::context::ExprCx;
use crate::engine::ExpressionRule;
use crate::lowerer::Lowerer;
use au_ast as ast;
use au_ast::LitValue;
use au_diag::Result;
use au_sir as sir;
use au_sir::Type;

/// Types and lowers literal values
pub struct LiteralRule;

impl ExpressionRule for LiteralRule {
    fn name(&self) -> &'static str {
        "literal"
    }

    fn applies(&self, node: &ast::Expr, _cx: &ExprCx) -> bool {
        matches!(node.kind, ast::ExprKind::Literal { .. })
    }

    fn apply(&self, node: &ast::Expr, lw: &mut Lowerer, _cx: ExprCx) -> Result<sir::Expr> {
        let ast::ExprKind::Literal { value } = &node.kind else {
            unreachable!("guarded by applies");
        };
        let names = lw.services.names;
        let (kind, ty) = match value {
            LitValue::Unit => (sir::ExprKind::Unit, Type::Unit),
            LitValue::Int(_) => (
                sir::ExprKind::Literal {
                    value: value.clone(),
                },
                names.i32_ty(),
            ),
            LitValue::Float(_) => (
                sir::ExprKind::Literal {
                    value: value.clone(),
                },
                names.f32_ty(),
            ),
            LitValue::Str(_) => (
                sir::ExprKind::Literal {
                    value: value.clone(),
                },
                names.string_ty(),
            ),
            LitValue::Bool(_) => (
                sir::ExprKind::Literal {
                    value: value.clone(),
                },
                names.bool_ty(),
            ),
            LitValue::Symbol(_) => (
                sir::ExprKind::Literal {
                    value: value.clone(),
                },
                Type::Symbol,
            ),
        };
        Ok(sir::Expr::new(kind, ty, node.origin.clone()))
    }
}

/// Lowers regex literals to the opaque `Regex` type
pub struct RegexRule;

impl ExpressionRule for RegexRule {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn applies(&self, node: &ast::Expr, _cx: &ExprCx) -> bool {
        matches!(node.kind, ast::ExprKind::Regex { .. })
    }

    fn apply(&self, node: &ast::Expr, lw: &mut Lowerer, _cx: ExprCx) -> Result<sir::Expr> {
        let ast::ExprKind::Regex { pattern, flags } = &node.kind else {
            unreachable!("guarded by applies");
        };
        let ty = Type::Opaque {
            name: lw.services.interner.intern("Regex"),
        };
        Ok(sir::Expr::new(
            sir::ExprKind::Regex {
                pattern: pattern.clone(),
                flags: flags.clone(),
            },
            ty,
            node.origin.clone(),
        ))
    }
}

/// Resolves variable and function references
pub struct VarRule;

impl ExpressionRule for VarRule {
    fn name(&self) -> &'static str {
        "var"
    }

    fn applies(&self, node: &ast::Expr, _cx: &ExprCx) -> bool {
        matches!(node.kind, ast::ExprKind::Var { .. })
    }

    fn apply(&self, node: &ast::Expr, lw: &mut Lowerer, _cx: ExprCx) -> Result<sir::Expr> {
        let ast::ExprKind::Var { name } = &node.kind else {
            unreachable!("guarded by applies");
        };
        let ty = lw.infer_variable_type(*name, node.origin.as_ref())?;
        Ok(sir::Expr::new(
            sir::ExprKind::Var { name: *name },
            ty,
            node.origin.clone(),
        ))
    }
}
