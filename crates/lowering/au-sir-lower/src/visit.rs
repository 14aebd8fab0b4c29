//! Visitors: traversal order and desugaring
//!
//! The visitors own traversal order and nothing else. For each node kind
//! they lower the known child positions in a fixed order, build the typed
//! stage context, and dispatch to the rule engine. Nodes that introduce
//! scopes in their *children* (lambdas, match arms, loop bodies, list
//! comprehensions) leave those children to their rules, which lower them
//! under [`Lowerer::with_scope`].
//!
//! Desugaring happens before dispatch:
//! * string interpolation rewrites into a `+` chain;
//! * `value |> target` inserts the value as the target call's first
//!   argument;
//! * `let`/`do` rewrite into the canonical block-with-statements-and-
//!   result form.

use crate::context::{ExprChildren, ExprCx, StmtChildren, StmtCx};
use crate::lowerer::Lowerer;
use au_ast as ast;
use au_diag::Result;
use au_sir as sir;
use au_sir::Type;

impl Lowerer {
    /// Lower an expression
    ///
    /// `expected` is the type the surrounding construct wants, used for
    /// bidirectional generic inference and lambda parameter hints; it is a
    /// hint, never a check.
    pub fn visit_expr(&mut self, node: &ast::Expr, expected: Option<&Type>) -> Result<sir::Expr> {
        use ast::ExprKind as K;

        match &node.kind {
            K::StringInterp { parts } => self.desugar_interp(node, parts, expected),
            K::Pipe { value, target } => self.desugar_pipe(node, value, target, expected),
            K::Let { .. } | K::Do { .. } => {
                let block = desugar_to_block(node);
                self.visit_expr(&block, expected)
            }

            K::Block { statements, result } => {
                self.visit_block(node, statements, result.as_deref(), expected)
            }

            // Leaves, and nodes whose rules own their scoped traversal.
            K::Literal { .. } | K::Regex { .. } | K::Var { .. } | K::Lambda { .. }
            | K::ListComp { .. } => {
                let cx = ExprCx {
                    children: ExprChildren::None,
                    expected: expected.cloned(),
                };
                self.lower_expr(node, cx)
            }

            K::Unary { operand, .. } | K::Await { operand } | K::Try { operand } => {
                let operand = self.visit_expr(operand, None)?;
                let cx = ExprCx {
                    children: ExprChildren::Operand(operand),
                    expected: expected.cloned(),
                };
                self.lower_expr(node, cx)
            }

            K::Binary { left, right, .. } => {
                let left = self.visit_expr(left, None)?;
                let right = self.visit_expr(right, None)?;
                let cx = ExprCx {
                    children: ExprChildren::Pair { left, right },
                    expected: expected.cloned(),
                };
                self.lower_expr(node, cx)
            }

            K::Range { start, end, .. } => {
                let start = self.visit_expr(start, None)?;
                let end = self.visit_expr(end, None)?;
                let cx = ExprCx {
                    children: ExprChildren::Pair {
                        left: start,
                        right: end,
                    },
                    expected: expected.cloned(),
                };
                self.lower_expr(node, cx)
            }

            K::Match { scrutinee, .. } => {
                let scrutinee = self.visit_expr(scrutinee, None)?;
                let cx = ExprCx {
                    children: ExprChildren::Operand(scrutinee),
                    expected: expected.cloned(),
                };
                self.lower_expr(node, cx)
            }

            K::Call { callee, args } => self.visit_call(node, callee, args, expected),

            K::Member { object, .. } | K::SafeMember { object, .. } => {
                let object = self.visit_expr(object, None)?;
                let cx = ExprCx {
                    children: ExprChildren::Operand(object),
                    expected: expected.cloned(),
                };
                self.lower_expr(node, cx)
            }

            K::SafeCall { object, args, .. } => {
                let object = self.visit_expr(object, None)?;
                let args = args
                    .iter()
                    .map(|arg| self.visit_expr(arg, None))
                    .collect::<Result<Vec<_>>>()?;
                let cx = ExprCx {
                    children: ExprChildren::Call {
                        callee: Some(object),
                        args,
                    },
                    expected: expected.cloned(),
                };
                self.lower_expr(node, cx)
            }

            K::Index { object, index } => {
                let object = self.visit_expr(object, None)?;
                let index = self.visit_expr(index, None)?;
                let cx = ExprCx {
                    children: ExprChildren::Index { object, index },
                    expected: expected.cloned(),
                };
                self.lower_expr(node, cx)
            }

            K::Slice { object, start, end } => {
                let object = self.visit_expr(object, None)?;
                let start = start
                    .as_deref()
                    .map(|bound| self.visit_expr(bound, None))
                    .transpose()?;
                let end = end
                    .as_deref()
                    .map(|bound| self.visit_expr(bound, None))
                    .transpose()?;
                let cx = ExprCx {
                    children: ExprChildren::Slice { object, start, end },
                    expected: expected.cloned(),
                };
                self.lower_expr(node, cx)
            }

            K::RecordLit { type_name, fields } => {
                let mut lowered = Vec::with_capacity(fields.len());
                for (field_name, value) in fields {
                    let field_ty = self.services.types.resolve_member(*type_name, *field_name);
                    lowered.push((*field_name, self.visit_expr(value, field_ty.as_ref())?));
                }
                let cx = ExprCx {
                    children: ExprChildren::Fields(lowered),
                    expected: expected.cloned(),
                };
                self.lower_expr(node, cx)
            }

            K::ArrayLit { elements } | K::TupleLit { elements } => {
                let elements = elements
                    .iter()
                    .map(|element| self.visit_expr(element, None))
                    .collect::<Result<Vec<_>>>()?;
                let cx = ExprCx {
                    children: ExprChildren::Elements(elements),
                    expected: expected.cloned(),
                };
                self.lower_expr(node, cx)
            }

            K::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition = self.visit_expr(condition, None)?;
                let then_branch = self.visit_expr(then_branch, expected)?;
                let else_branch = else_branch
                    .as_deref()
                    .map(|branch| self.visit_expr(branch, expected))
                    .transpose()?;
                let cx = ExprCx {
                    children: ExprChildren::If {
                        condition,
                        then_branch,
                        else_branch,
                    },
                    expected: expected.cloned(),
                };
                self.lower_expr(node, cx)
            }

            K::For { iterable, .. } => {
                let iterable = self.visit_expr(iterable, None)?;
                let cx = ExprCx {
                    children: ExprChildren::Iterable(iterable),
                    expected: expected.cloned(),
                };
                self.lower_expr(node, cx)
            }

            K::While { condition, .. } => {
                let condition = self.visit_expr(condition, None)?;
                let cx = ExprCx {
                    children: ExprChildren::Condition(condition),
                    expected: expected.cloned(),
                };
                self.lower_expr(node, cx)
            }
        }
    }

    /// Lower a call, distinguishing module calls and method calls
    ///
    /// Method-call arguments are lowered with lambda parameter hints
    /// derived from the receiver type, so untyped lambda parameters in
    /// `xs.map(|x| ...)` pick up the element type.
    fn visit_call(
        &mut self,
        node: &ast::Expr,
        callee: &ast::Expr,
        args: &[ast::Expr],
        expected: Option<&Type>,
    ) -> Result<sir::Expr> {
        if let ast::ExprKind::Member { object, member } = &callee.kind {
            if let ast::ExprKind::Var { name } = &object.kind {
                if self.is_module_call(*name, *member) {
                    let args = args
                        .iter()
                        .map(|arg| self.visit_expr(arg, None))
                        .collect::<Result<Vec<_>>>()?;
                    let cx = ExprCx {
                        children: ExprChildren::Call { callee: None, args },
                        expected: expected.cloned(),
                    };
                    return self.lower_expr(node, cx);
                }
            }

            // Method call: lower the receiver, then the arguments with
            // hints computed from the receiver's type.
            let object = self.visit_expr(object, None)?;
            let mut lowered_args = Vec::with_capacity(args.len());
            for (index, arg) in args.iter().enumerate() {
                let hint = self.lambda_param_hint(&object.ty, *member, index);
                lowered_args.push(self.visit_expr(arg, hint.as_ref())?);
            }
            let cx = ExprCx {
                children: ExprChildren::Call {
                    callee: Some(object),
                    args: lowered_args,
                },
                expected: expected.cloned(),
            };
            return self.lower_expr(node, cx);
        }

        let callee = self.visit_expr(callee, None)?;
        let args = args
            .iter()
            .map(|arg| self.visit_expr(arg, None))
            .collect::<Result<Vec<_>>>()?;
        let cx = ExprCx {
            children: ExprChildren::Call {
                callee: Some(callee),
                args,
            },
            expected: expected.cloned(),
        };
        self.lower_expr(node, cx)
    }

    /// Whether `Object.member(...)` is a call into a module's functions
    ///
    /// A name that is a visible local is never a module; this mirrors the
    /// shadowing rule for instance calls.
    fn is_module_call(&self, object: au_intern::Symbol, member: au_intern::Symbol) -> bool {
        if self.services.vars.has(object) {
            return false;
        }
        if !au_ty::is_type_param_like(object, &self.services.interner) {
            return false;
        }
        self.services
            .functions
            .fetch_module_member(object, member)
            .is_some()
    }

    /// Lower a block expression inside its own scope
    fn visit_block(
        &mut self,
        node: &ast::Expr,
        statements: &[ast::Stmt],
        result: Option<&ast::Expr>,
        expected: Option<&Type>,
    ) -> Result<sir::Expr> {
        let expected = expected.cloned();
        self.with_scope(|lw| {
            let statements_ir = lw.visit_stmts(statements)?;
            let result_ir = match result {
                Some(result) => lw.visit_expr(result, expected.as_ref())?,
                None => sir::Expr::unit(node.origin.clone()),
            };
            let cx = ExprCx {
                children: ExprChildren::Block {
                    statements: statements_ir,
                    result: result_ir,
                },
                expected,
            };
            lw.lower_expr(node, cx)
        })
    }

    /// Dispatch an expression node through the rule engine
    pub fn lower_expr(&mut self, node: &ast::Expr, cx: ExprCx) -> Result<sir::Expr> {
        let engine = self.engine();
        engine.dispatch_expression(node, self, cx)
    }

    /// Lower a statement
    pub fn visit_stmt(&mut self, node: &ast::Stmt) -> Result<sir::Stmt> {
        use ast::StmtKind as K;

        match &node.kind {
            K::Expr { expr } => {
                let expr = self.visit_expr(expr, None)?;
                self.lower_stmt(node, StmtCx::with_children(StmtChildren::Value(expr)))
            }

            K::VarDecl { ty, value, .. } => {
                let declared_ty = ty
                    .as_ref()
                    .map(|annotation| self.build_type(annotation, None))
                    .transpose()?;
                let value = self.visit_expr(value, declared_ty.as_ref())?;
                let cx = StmtCx {
                    children: StmtChildren::Value(value),
                    declared_ty,
                };
                self.lower_stmt(node, cx)
            }

            K::Assign { target, value } => {
                let target = self.visit_expr(target, None)?;
                let value = self.visit_expr(value, Some(&target.ty.clone()))?;
                self.lower_stmt(
                    node,
                    StmtCx::with_children(StmtChildren::Assign { target, value }),
                )
            }

            K::Return { value } => {
                let expected = self.current_return_type().cloned();
                let value = value
                    .as_ref()
                    .map(|value| self.visit_expr(value, expected.as_ref()))
                    .transpose()?;
                self.lower_stmt(
                    node,
                    StmtCx::with_children(StmtChildren::OptionalValue(value)),
                )
            }

            K::Break | K::Continue | K::Block { .. } => self.lower_stmt(node, StmtCx::empty()),

            K::If { condition, .. } | K::While { condition, .. } => {
                let condition = self.visit_expr(condition, None)?;
                self.lower_stmt(node, StmtCx::with_children(StmtChildren::Condition(condition)))
            }

            K::For { iterable, .. } => {
                let iterable = self.visit_expr(iterable, None)?;
                self.lower_stmt(node, StmtCx::with_children(StmtChildren::Iterable(iterable)))
            }
        }
    }

    /// Lower a statement sequence in order
    ///
    /// Declarations bind as they are lowered, so later statements see
    /// earlier bindings; the *caller* owns the enclosing scope snapshot.
    pub fn visit_stmts(&mut self, statements: &[ast::Stmt]) -> Result<Vec<sir::Stmt>> {
        statements
            .iter()
            .map(|statement| self.visit_stmt(statement))
            .collect()
    }

    /// Dispatch a statement node through the rule engine
    pub fn lower_stmt(&mut self, node: &ast::Stmt, cx: StmtCx) -> Result<sir::Stmt> {
        let engine = self.engine();
        engine.dispatch_statement(node, self, cx)
    }

    /// Lower a loop or arm body expression into statement form
    ///
    /// Blocks contribute their statements directly (a non-unit trailing
    /// result becomes an expression statement); any other expression
    /// becomes a single expression statement. The caller owns the scope.
    pub fn lower_body_as_stmts(&mut self, body: &ast::Expr) -> Result<Vec<sir::Stmt>> {
        if let ast::ExprKind::Block { statements, result } = &body.kind {
            let mut lowered = self.visit_stmts(statements)?;
            if let Some(result) = result.as_deref() {
                let result_ir = self.visit_expr(result, None)?;
                if !matches!(result_ir.kind, sir::ExprKind::Unit) {
                    lowered.push(sir::Stmt::Expr { expr: result_ir });
                }
            }
            return Ok(lowered);
        }
        let expr = self.visit_expr(body, None)?;
        Ok(vec![sir::Stmt::Expr { expr }])
    }

    /// Desugar string interpolation into a `+` chain and lower that
    fn desugar_interp(
        &mut self,
        node: &ast::Expr,
        parts: &[ast::InterpPart],
        expected: Option<&Type>,
    ) -> Result<sir::Expr> {
        let origin = node.origin.clone();
        let as_expr = |part: &ast::InterpPart| -> ast::Expr {
            match part {
                ast::InterpPart::Text(text) => ast::Expr {
                    kind: ast::ExprKind::Literal {
                        value: ast::LitValue::Str(text.clone()),
                    },
                    origin: origin.clone(),
                },
                ast::InterpPart::Expr(expr) => expr.clone(),
            }
        };

        let mut chain = match parts.first() {
            Some(part) => as_expr(part),
            None => ast::Expr {
                kind: ast::ExprKind::Literal {
                    value: ast::LitValue::Str(String::new()),
                },
                origin: origin.clone(),
            },
        };
        for part in &parts[1.min(parts.len())..] {
            chain = ast::Expr {
                kind: ast::ExprKind::Binary {
                    op: ast::BinOp::Add,
                    left: Box::new(chain),
                    right: Box::new(as_expr(part)),
                },
                origin: origin.clone(),
            };
        }
        self.visit_expr(&chain, expected)
    }

    /// Desugar `value |> target` into a call with `value` first
    fn desugar_pipe(
        &mut self,
        node: &ast::Expr,
        value: &ast::Expr,
        target: &ast::Expr,
        expected: Option<&Type>,
    ) -> Result<sir::Expr> {
        let call = match &target.kind {
            ast::ExprKind::Call { callee, args } => {
                let mut new_args = Vec::with_capacity(args.len() + 1);
                new_args.push(value.clone());
                new_args.extend(args.iter().cloned());
                ast::Expr {
                    kind: ast::ExprKind::Call {
                        callee: callee.clone(),
                        args: new_args,
                    },
                    origin: node.origin.clone(),
                }
            }
            _ => ast::Expr {
                kind: ast::ExprKind::Call {
                    callee: Box::new(target.clone()),
                    args: vec![value.clone()],
                },
                origin: node.origin.clone(),
            },
        };
        self.visit_expr(&call, expected)
    }
}

/// Rewrite `let` and `do` expressions into the canonical block form
fn desugar_to_block(node: &ast::Expr) -> ast::Expr {
    match &node.kind {
        ast::ExprKind::Let {
            name,
            ty,
            mutable,
            value,
            body,
        } => {
            let decl = ast::Stmt {
                kind: ast::StmtKind::VarDecl {
                    name: *name,
                    ty: ty.clone(),
                    value: (**value).clone(),
                    mutable: *mutable,
                },
                origin: node.origin.clone(),
            };
            ast::Expr {
                kind: ast::ExprKind::Block {
                    statements: vec![decl],
                    result: body.clone(),
                },
                origin: node.origin.clone(),
            }
        }

        ast::ExprKind::Do { body } => {
            let mut statements = Vec::new();
            let mut result = None;
            let last = body.len().saturating_sub(1);

            for (index, item) in body.iter().enumerate() {
                // A trailing let without a body contributes a declaration,
                // not a result.
                let normalized = normalize_do_item(item, node);
                match normalized {
                    ast::DoItem::Stmt(stmt) => statements.push(stmt),
                    ast::DoItem::Expr(expr) => {
                        if index == last && !is_loop_expr(&expr) {
                            result = Some(Box::new(expr));
                        } else {
                            statements.push(ast::Stmt {
                                origin: expr.origin.clone(),
                                kind: ast::StmtKind::Expr { expr },
                            });
                        }
                    }
                }
            }

            ast::Expr {
                kind: ast::ExprKind::Block { statements, result },
                origin: node.origin.clone(),
            }
        }

        _ => node.clone(),
    }
}

/// Normalize one do-block item: a body-less `let` becomes a declaration
fn normalize_do_item(item: &ast::DoItem, node: &ast::Expr) -> ast::DoItem {
    if let ast::DoItem::Expr(expr) = item {
        if let ast::ExprKind::Let {
            name,
            ty,
            mutable,
            value,
            body: None,
        } = &expr.kind
        {
            return ast::DoItem::Stmt(ast::Stmt {
                kind: ast::StmtKind::VarDecl {
                    name: *name,
                    ty: ty.clone(),
                    value: (**value).clone(),
                    mutable: *mutable,
                },
                origin: expr.origin.clone().or_else(|| node.origin.clone()),
            });
        }
    }
    item.clone()
}

/// Whether an expression is a loop, which never produces a block result
fn is_loop_expr(expr: &ast::Expr) -> bool {
    matches!(
        expr.kind,
        ast::ExprKind::While { .. } | ast::ExprKind::For { .. }
    )
}
