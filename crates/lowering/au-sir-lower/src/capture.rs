//! Lambda capture analysis
//!
//! Finds the free variables of a lambda body: names referenced but bound
//! neither by the lambda's own parameters nor by any binder inside the
//! body. A free name becomes a capture only if it resolves in the outer
//! variable registry; unresolvable names are skipped here and surface as
//! undefined-variable errors during body lowering.
//!
//! The walk threads a `bound` set. Every binder — let, lambda parameters,
//! match-arm pattern bindings, loop and comprehension variables,
//! sequential declarations — extends a **copy** of the set for its own
//! subtree; the enclosing set is never mutated.

use crate::services::Services;
use au_ast as ast;
use au_intern::Symbol;
use au_sir::{Capture, CaptureMode};
use indexmap::IndexSet;
use rustc_hash::FxHashSet;

/// Compute the captures of a lambda before its parameters are bound
///
/// Must be called while the variable registry still holds only the outer
/// scope; the lambda's own parameters are excluded by name.
pub fn analyze(
    params: &[ast::LambdaParam],
    body: &ast::Expr,
    services: &Services,
) -> Vec<Capture> {
    let mut bound = FxHashSet::default();
    for param in params {
        bound.insert(param.name);
    }

    let mut free = IndexSet::new();
    walk_expr(body, &bound, &mut free);

    free.into_iter()
        .filter_map(|name| {
            services.vars.get(name).map(|ty| Capture {
                name,
                ty: ty.clone(),
                mode: CaptureMode::ByValue,
            })
        })
        .collect()
}

fn walk_expr(expr: &ast::Expr, bound: &FxHashSet<Symbol>, free: &mut IndexSet<Symbol>) {
    use ast::ExprKind as K;

    match &expr.kind {
        K::Var { name } => {
            if !bound.contains(name) {
                free.insert(*name);
            }
        }

        K::Literal { .. } | K::Regex { .. } => {}

        K::StringInterp { parts } => {
            for part in parts {
                if let ast::InterpPart::Expr(part) = part {
                    walk_expr(part, bound, free);
                }
            }
        }

        K::Unary { operand, .. } | K::Await { operand } | K::Try { operand } => {
            walk_expr(operand, bound, free);
        }

        K::Binary { left, right, .. } => {
            walk_expr(left, bound, free);
            walk_expr(right, bound, free);
        }

        K::Pipe { value, target } => {
            walk_expr(value, bound, free);
            walk_expr(target, bound, free);
        }

        K::Call { callee, args } => {
            walk_expr(callee, bound, free);
            for arg in args {
                walk_expr(arg, bound, free);
            }
        }

        K::Member { object, .. } | K::SafeMember { object, .. } => walk_expr(object, bound, free),

        K::SafeCall { object, args, .. } => {
            walk_expr(object, bound, free);
            for arg in args {
                walk_expr(arg, bound, free);
            }
        }

        K::Index { object, index } => {
            walk_expr(object, bound, free);
            walk_expr(index, bound, free);
        }

        K::Slice { object, start, end } => {
            walk_expr(object, bound, free);
            if let Some(start) = start {
                walk_expr(start, bound, free);
            }
            if let Some(end) = end {
                walk_expr(end, bound, free);
            }
        }

        K::RecordLit { fields, .. } => {
            for (_, value) in fields {
                walk_expr(value, bound, free);
            }
        }

        K::ArrayLit { elements } | K::TupleLit { elements } => {
            for element in elements {
                walk_expr(element, bound, free);
            }
        }

        K::If {
            condition,
            then_branch,
            else_branch,
        } => {
            walk_expr(condition, bound, free);
            walk_expr(then_branch, bound, free);
            if let Some(else_branch) = else_branch {
                walk_expr(else_branch, bound, free);
            }
        }

        K::Match { scrutinee, arms } => {
            walk_expr(scrutinee, bound, free);
            for arm in arms {
                let mut arm_bound = bound.clone();
                collect_pattern_bindings(&arm.pattern, &mut arm_bound);
                if let Some(guard) = &arm.guard {
                    walk_expr(guard, &arm_bound, free);
                }
                walk_expr(&arm.body, &arm_bound, free);
            }
        }

        K::Lambda { params, body, .. } => {
            // A nested lambda's parameters shadow for its body only.
            let mut inner = bound.clone();
            for param in params {
                inner.insert(param.name);
            }
            walk_expr(body, &inner, free);
        }

        K::Let {
            name, value, body, ..
        } => {
            walk_expr(value, bound, free);
            if let Some(body) = body {
                let mut inner = bound.clone();
                inner.insert(*name);
                walk_expr(body, &inner, free);
            }
        }

        K::Do { body } => {
            let mut current = bound.clone();
            for item in body {
                match item {
                    ast::DoItem::Stmt(stmt) => walk_stmt(stmt, &mut current, free),
                    ast::DoItem::Expr(expr) => {
                        walk_expr(expr, &current, free);
                        if let K::Let {
                            name, body: None, ..
                        } = &expr.kind
                        {
                            current.insert(*name);
                        }
                    }
                }
            }
        }

        K::Block { statements, result } => {
            let mut current = bound.clone();
            for stmt in statements {
                walk_stmt(stmt, &mut current, free);
            }
            if let Some(result) = result {
                walk_expr(result, &current, free);
            }
        }

        K::For {
            var,
            iterable,
            body,
            ..
        } => {
            walk_expr(iterable, bound, free);
            let mut inner = bound.clone();
            inner.insert(*var);
            walk_expr(body, &inner, free);
        }

        K::While { condition, body } => {
            walk_expr(condition, bound, free);
            walk_expr(body, bound, free);
        }

        K::Range { start, end, .. } => {
            walk_expr(start, bound, free);
            walk_expr(end, bound, free);
        }

        K::ListComp { output, generators } => {
            let mut current = bound.clone();
            for generator in generators {
                walk_expr(&generator.iterable, &current, free);
                current.insert(generator.var);
                if let Some(condition) = &generator.condition {
                    walk_expr(condition, &current, free);
                }
            }
            walk_expr(output, &current, free);
        }
    }
}

/// Walk a statement; declarations extend `current` for what follows
fn walk_stmt(stmt: &ast::Stmt, current: &mut FxHashSet<Symbol>, free: &mut IndexSet<Symbol>) {
    use ast::StmtKind as K;

    match &stmt.kind {
        K::Expr { expr } => walk_expr(expr, current, free),

        K::VarDecl { name, value, .. } => {
            walk_expr(value, current, free);
            current.insert(*name);
        }

        K::Assign { target, value } => {
            walk_expr(target, current, free);
            walk_expr(value, current, free);
        }

        K::Return { value } => {
            if let Some(value) = value {
                walk_expr(value, current, free);
            }
        }

        K::Break | K::Continue => {}

        K::If {
            condition,
            then_body,
            else_body,
        } => {
            walk_expr(condition, current, free);
            let mut then_bound = current.clone();
            for stmt in then_body {
                walk_stmt(stmt, &mut then_bound, free);
            }
            if let Some(else_body) = else_body {
                let mut else_bound = current.clone();
                for stmt in else_body {
                    walk_stmt(stmt, &mut else_bound, free);
                }
            }
        }

        K::While { condition, body } => {
            walk_expr(condition, current, free);
            let mut inner = current.clone();
            for stmt in body {
                walk_stmt(stmt, &mut inner, free);
            }
        }

        K::For {
            var,
            iterable,
            body,
        } => {
            walk_expr(iterable, current, free);
            let mut inner = current.clone();
            inner.insert(*var);
            for stmt in body {
                walk_stmt(stmt, &mut inner, free);
            }
        }

        K::Block { statements } => {
            let mut inner = current.clone();
            for stmt in statements {
                walk_stmt(stmt, &mut inner, free);
            }
        }
    }
}

/// Names a pattern binds: bare variables, constructor bindings (nested
/// patterns recursively), or-pattern first alternative, regex captures
fn collect_pattern_bindings(pattern: &ast::Pattern, bound: &mut FxHashSet<Symbol>) {
    match &pattern.kind {
        ast::PatternKind::Var { name } => {
            bound.insert(*name);
        }
        ast::PatternKind::Constructor { fields, .. } => {
            for field in fields {
                match field {
                    ast::PatternField::Binding(name) => {
                        bound.insert(*name);
                    }
                    ast::PatternField::Pattern(nested) => collect_pattern_bindings(nested, bound),
                }
            }
        }
        ast::PatternKind::Or { alternatives } => {
            if let Some(first) = alternatives.first() {
                collect_pattern_bindings(first, bound);
            }
        }
        ast::PatternKind::Regex { bindings, .. } => {
            for binding in bindings {
                bound.insert(*binding);
            }
        }
        ast::PatternKind::Wildcard | ast::PatternKind::Literal { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use au_ast::{ExprKind, LitValue};

    fn var(services: &Services, name: &str) -> ast::Expr {
        ast::Expr::new(ExprKind::Var {
            name: services.intern(name),
        })
    }

    fn int(value: i64) -> ast::Expr {
        ast::Expr::new(ExprKind::Literal {
            value: LitValue::Int(value),
        })
    }

    #[test]
    fn outer_variable_is_captured_but_params_are_not() {
        let mut services = Services::new();
        let total = services.intern("total");
        let x = services.intern("x");
        services.vars.set(total, services.names.i32_ty());

        // |x| x + total
        let body = ast::Expr::new(ExprKind::Binary {
            op: ast::BinOp::Add,
            left: Box::new(var(&services, "x")),
            right: Box::new(var(&services, "total")),
        });
        let params = vec![ast::LambdaParam {
            name: x,
            ty: None,
            origin: None,
        }];

        let captures = analyze(&params, &body, &services);
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].name, total);
        assert_eq!(captures[0].mode, CaptureMode::ByValue);
    }

    #[test]
    fn nested_lambda_params_never_leak_outward() {
        let mut services = Services::new();
        let total = services.intern("total");
        let y = services.intern("y");
        services.vars.set(total, services.names.i32_ty());
        // y is visible outside, so it would be capturable if the walk
        // ever confused it with the nested parameter.
        services.vars.set(y, services.names.i32_ty());

        // |x| (|y| y + total)(x)
        let inner = ast::Expr::new(ExprKind::Lambda {
            params: vec![ast::LambdaParam {
                name: y,
                ty: None,
                origin: None,
            }],
            ret_type: None,
            body: Box::new(ast::Expr::new(ExprKind::Binary {
                op: ast::BinOp::Add,
                left: Box::new(var(&services, "y")),
                right: Box::new(var(&services, "total")),
            })),
        });
        let body = ast::Expr::new(ExprKind::Call {
            callee: Box::new(inner),
            args: vec![var(&services, "x")],
        });
        let params = vec![ast::LambdaParam {
            name: services.intern("x"),
            ty: None,
            origin: None,
        }];

        let captures = analyze(&params, &body, &services);
        let names: Vec<_> = captures.iter().map(|capture| capture.name).collect();
        assert_eq!(names, vec![total]);
    }

    #[test]
    fn sequential_declarations_bind_for_later_statements_only() {
        let mut services = Services::new();
        let seen = services.intern("seen");
        let local = services.intern("local");
        services.vars.set(seen, services.names.i32_ty());
        services.vars.set(local, services.names.i32_ty());

        // { seen; let local = 1; local }
        let body = ast::Expr::new(ExprKind::Block {
            statements: vec![
                ast::Stmt::new(ast::StmtKind::Expr {
                    expr: var(&services, "seen"),
                }),
                ast::Stmt::new(ast::StmtKind::VarDecl {
                    name: local,
                    ty: None,
                    value: int(1),
                    mutable: false,
                }),
            ],
            result: Some(Box::new(var(&services, "local"))),
        });

        let captures = analyze(&[], &body, &services);
        let names: Vec<_> = captures.iter().map(|capture| capture.name).collect();
        assert_eq!(names, vec![seen]);
    }

    #[test]
    fn unresolvable_free_names_are_skipped() {
        let services = Services::new();
        let body = var(&services, "ghost");
        assert!(analyze(&[], &body, &services).is_empty());
    }
}
