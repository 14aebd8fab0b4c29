//! Statement rules

use crate::context::StmtCx;
use crate::engine::StatementRule;
use crate::lowerer::Lowerer;
use au_ast as ast;
use au_diag::{CompileError, Result};
use au_sir as sir;

/// Expression statements
pub struct ExprStmtRule;

impl StatementRule for ExprStmtRule {
    fn name(&self) -> &'static str {
        "expr-stmt"
    }

    fn applies(&self, node: &ast::Stmt, _cx: &StmtCx) -> bool {
        matches!(node.kind, ast::StmtKind::Expr { .. })
    }

    fn apply(&self, _node: &ast::Stmt, _lw: &mut Lowerer, cx: StmtCx) -> Result<sir::Stmt> {
        let expr = cx.children.into_value(self.name())?;
        Ok(sir::Stmt::Expr { expr })
    }
}

/// Variable declarations; binds the name for subsequent statements
pub struct VarDeclRule;

impl StatementRule for VarDeclRule {
    fn name(&self) -> &'static str {
        "var-decl"
    }

    fn applies(&self, node: &ast::Stmt, _cx: &StmtCx) -> bool {
        matches!(node.kind, ast::StmtKind::VarDecl { .. })
    }

    fn apply(&self, node: &ast::Stmt, lw: &mut Lowerer, cx: StmtCx) -> Result<sir::Stmt> {
        let ast::StmtKind::VarDecl { name, mutable, .. } = &node.kind else {
            unreachable!("guarded by applies");
        };
        let declared_ty = cx.declared_ty;
        let value = cx.children.into_value(self.name())?;

        let ty = match declared_ty {
            Some(declared) => {
                lw.ensure_compatible(
                    &value.ty,
                    &declared,
                    &format!("variable '{}'", lw.resolve(*name)),
                    node.origin.as_ref(),
                )?;
                declared
            }
            None => value.ty.clone(),
        };

        lw.services.vars.set(*name, ty.clone());
        Ok(sir::Stmt::VarDecl {
            name: *name,
            ty,
            value,
            mutable: *mutable,
            origin: node.origin.clone(),
        })
    }
}

/// Assignments; the target must be a variable, member, or index place
pub struct AssignRule;

impl StatementRule for AssignRule {
    fn name(&self) -> &'static str {
        "assign"
    }

    fn applies(&self, node: &ast::Stmt, _cx: &StmtCx) -> bool {
        matches!(node.kind, ast::StmtKind::Assign { .. })
    }

    fn apply(&self, node: &ast::Stmt, lw: &mut Lowerer, cx: StmtCx) -> Result<sir::Stmt> {
        let (target, value) = cx.children.into_assign(self.name())?;

        if !matches!(
            target.kind,
            sir::ExprKind::Var { .. } | sir::ExprKind::Member { .. } | sir::ExprKind::Index { .. }
        ) {
            return Err(CompileError::user_at(
                "Invalid assignment target",
                node.origin.clone(),
            ));
        }
        lw.ensure_compatible(&value.ty, &target.ty, "assignment", node.origin.as_ref())?;

        Ok(sir::Stmt::Assign {
            target,
            value,
            origin: node.origin.clone(),
        })
    }
}

/// Return statements, checked against the enclosing declared return type
pub struct ReturnRule;

impl StatementRule for ReturnRule {
    fn name(&self) -> &'static str {
        "return"
    }

    fn applies(&self, node: &ast::Stmt, _cx: &StmtCx) -> bool {
        matches!(node.kind, ast::StmtKind::Return { .. })
    }

    fn apply(&self, node: &ast::Stmt, lw: &mut Lowerer, cx: StmtCx) -> Result<sir::Stmt> {
        let value = cx.children.into_optional_value(self.name())?;

        if let (Some(value), Some(expected)) = (&value, lw.current_return_type().cloned()) {
            lw.ensure_compatible(&value.ty, &expected, "return value", node.origin.as_ref())?;
        }

        Ok(sir::Stmt::Return {
            value,
            origin: node.origin.clone(),
        })
    }
}

/// Break statements
pub struct BreakRule;

impl StatementRule for BreakRule {
    fn name(&self) -> &'static str {
        "break"
    }

    fn applies(&self, node: &ast::Stmt, _cx: &StmtCx) -> bool {
        matches!(node.kind, ast::StmtKind::Break)
    }

    fn apply(&self, node: &ast::Stmt, _lw: &mut Lowerer, _cx: StmtCx) -> Result<sir::Stmt> {
        Ok(sir::Stmt::Break {
            origin: node.origin.clone(),
        })
    }
}

/// Continue statements
pub struct ContinueRule;

impl StatementRule for ContinueRule {
    fn name(&self) -> &'static str {
        "continue"
    }

    fn applies(&self, node: &ast::Stmt, _cx: &StmtCx) -> bool {
        matches!(node.kind, ast::StmtKind::Continue)
    }

    fn apply(&self, node: &ast::Stmt, _lw: &mut Lowerer, _cx: StmtCx) -> Result<sir::Stmt> {
        Ok(sir::Stmt::Continue {
            origin: node.origin.clone(),
        })
    }
}

/// If statements; each body is its own scope
pub struct IfStmtRule;

impl StatementRule for IfStmtRule {
    fn name(&self) -> &'static str {
        "if-stmt"
    }

    fn applies(&self, node: &ast::Stmt, _cx: &StmtCx) -> bool {
        matches!(node.kind, ast::StmtKind::If { .. })
    }

    fn apply(&self, node: &ast::Stmt, lw: &mut Lowerer, cx: StmtCx) -> Result<sir::Stmt> {
        let ast::StmtKind::If {
            then_body,
            else_body,
            ..
        } = &node.kind
        else {
            unreachable!("guarded by applies");
        };
        let condition = cx.children.into_condition(self.name())?;
        lw.ensure_boolean(&condition.ty, "if condition", node.origin.as_ref())?;

        let then_ir = lw.with_scope(|lw| lw.visit_stmts(then_body))?;
        let else_ir = match else_body {
            Some(else_body) => Some(lw.with_scope(|lw| lw.visit_stmts(else_body))?),
            None => None,
        };

        Ok(sir::Stmt::If {
            condition,
            then_body: then_ir,
            else_body: else_ir,
            origin: node.origin.clone(),
        })
    }
}

/// While statements; the body is its own scope
pub struct WhileStmtRule;

impl StatementRule for WhileStmtRule {
    fn name(&self) -> &'static str {
        "while-stmt"
    }

    fn applies(&self, node: &ast::Stmt, _cx: &StmtCx) -> bool {
        matches!(node.kind, ast::StmtKind::While { .. })
    }

    fn apply(&self, node: &ast::Stmt, lw: &mut Lowerer, cx: StmtCx) -> Result<sir::Stmt> {
        let ast::StmtKind::While { body, .. } = &node.kind else {
            unreachable!("guarded by applies");
        };
        let condition = cx.children.into_condition(self.name())?;
        lw.ensure_boolean(&condition.ty, "while condition", node.origin.as_ref())?;

        let body_ir = lw.with_scope(|lw| lw.visit_stmts(body))?;
        Ok(sir::Stmt::While {
            condition,
            body: body_ir,
            origin: node.origin.clone(),
        })
    }
}

/// For statements; binds the loop variable inside the body scope
pub struct ForStmtRule;

impl StatementRule for ForStmtRule {
    fn name(&self) -> &'static str {
        "for-stmt"
    }

    fn applies(&self, node: &ast::Stmt, _cx: &StmtCx) -> bool {
        matches!(node.kind, ast::StmtKind::For { .. })
    }

    fn apply(&self, node: &ast::Stmt, lw: &mut Lowerer, cx: StmtCx) -> Result<sir::Stmt> {
        let ast::StmtKind::For { var, body, .. } = &node.kind else {
            unreachable!("guarded by applies");
        };
        let iterable = cx.children.into_iterable(self.name())?;
        let element_ty = lw.infer_iterable_element(&iterable.ty, node.origin.as_ref())?;

        let body_ir = lw.with_scope(|lw| {
            lw.services.vars.set(*var, element_ty.clone());
            lw.visit_stmts(body)
        })?;

        Ok(sir::Stmt::For {
            var: *var,
            var_ty: element_ty,
            iterable,
            body: body_ir,
            origin: node.origin.clone(),
        })
    }
}

/// Nested statement blocks; a block is its own scope
pub struct BlockStmtRule;

impl StatementRule for BlockStmtRule {
    fn name(&self) -> &'static str {
        "block-stmt"
    }

    fn applies(&self, node: &ast::Stmt, _cx: &StmtCx) -> bool {
        matches!(node.kind, ast::StmtKind::Block { .. })
    }

    fn apply(&self, node: &ast::Stmt, lw: &mut Lowerer, _cx: StmtCx) -> Result<sir::Stmt> {
        let ast::StmtKind::Block { statements } = &node.kind else {
            unreachable!("guarded by applies");
        };
        let statements_ir = lw.with_scope(|lw| lw.visit_stmts(statements))?;
        Ok(sir::Stmt::Block {
            statements: statements_ir,
            origin: node.origin.clone(),
        })
    }
}
