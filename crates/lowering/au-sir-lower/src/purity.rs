//! Structural purity analysis
//!
//! Decides whether an IR expression can be evaluated at compile time.
//! Purity is structural — no call-graph analysis. Calls are judged by
//! callee name and registry entry: IO-prefixed names, names producing
//! non-literal values, external functions, and *unrecognized* callees are
//! all impure. This is a deliberate approximation.

use crate::services::Services;
use au_sir as sir;
use au_sir::Type;

/// Callee name prefixes that always mean IO
const IO_PREFIXES: [&str; 6] = ["println", "print", "read", "write", "open", "close"];

/// Callee name prefixes that produce non-literal values
const NON_LITERAL_PREFIXES: [&str; 3] = ["to_string", "format", "String"];

/// Type names that are not compile-time literal types
const NON_LITERAL_TYPE_NAMES: [&str; 5] = ["String", "Array", "Vec", "HashMap", "HashSet"];

/// Whether an expression is pure
pub fn is_pure_expr(expr: &sir::Expr, services: &Services) -> bool {
    use sir::ExprKind as K;

    match &expr.kind {
        K::Literal { .. } | K::Unit | K::Var { .. } => true,
        K::Unary { operand, .. } => is_pure_expr(operand, services),
        K::Binary { left, right, .. } => {
            is_pure_expr(left, services) && is_pure_expr(right, services)
        }
        K::Member { object, .. } => is_pure_expr(object, services),
        K::Record { fields, .. } => fields
            .iter()
            .all(|(_, value)| is_pure_expr(value, services)),
        K::Block { statements, result } => {
            statements.iter().all(|stmt| is_pure_stmt(stmt, services))
                && is_pure_expr(result, services)
        }
        K::Call { callee, args } => is_pure_call(callee, args, expr, services),
        _ => false,
    }
}

fn is_pure_call(
    callee: &sir::Expr,
    args: &[sir::Expr],
    call: &sir::Expr,
    services: &Services,
) -> bool {
    let sir::ExprKind::Var { name } = &callee.kind else {
        // Method and indirect calls are not recognized; conservative.
        return false;
    };

    let text = services.interner.resolve(*name);
    if IO_PREFIXES.iter().any(|prefix| text.starts_with(prefix)) {
        return false;
    }
    if NON_LITERAL_PREFIXES
        .iter()
        .any(|prefix| text.starts_with(prefix))
    {
        return false;
    }

    // Unknown and external callees are conservatively impure.
    match services.functions.fetch(*name) {
        Some(entry) if !entry.external => {}
        _ => {
            if !services.constructors.contains_key(name) {
                return false;
            }
        }
    }

    if is_non_literal_type(&call.ty, services) {
        return false;
    }

    args.iter().all(|arg| is_pure_expr(arg, services))
}

/// Whether a statement is pure
pub fn is_pure_stmt(stmt: &sir::Stmt, services: &Services) -> bool {
    match stmt {
        sir::Stmt::VarDecl { mutable, value, .. } => {
            !mutable && is_pure_expr(value, services)
        }
        sir::Stmt::Expr { expr } => is_pure_expr(expr, services),
        sir::Stmt::Block { statements, .. } => {
            statements.iter().all(|inner| is_pure_stmt(inner, services))
        }
        sir::Stmt::Match {
            scrutinee, arms, ..
        } => {
            is_pure_expr(scrutinee, services)
                && arms.iter().all(|arm| {
                    arm.guard
                        .as_ref()
                        .map_or(true, |guard| is_pure_expr(guard, services))
                        && arm.body.iter().all(|stmt| is_pure_stmt(stmt, services))
                })
        }
        _ => false,
    }
}

/// Whether a type cannot be a compile-time literal
///
/// Strings and the named collection types are non-literal. Arrays carry
/// the conceptual name `array`, which does not match the capitalized
/// collection names; they count as literal.
pub fn is_non_literal_type(ty: &Type, services: &Services) -> bool {
    let names = services.names;
    let Some(name) = names.of(ty) else {
        return false;
    };
    if names.normalize(name) == names.string {
        return true;
    }
    let text = services.interner.resolve(name);
    NON_LITERAL_TYPE_NAMES
        .iter()
        .any(|candidate| text == *candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use au_ast::LitValue;
    use au_sir::{ExprKind, FunctionSig};

    fn int_lit(services: &Services, value: i64) -> sir::Expr {
        sir::Expr::new(
            ExprKind::Literal {
                value: LitValue::Int(value),
            },
            services.names.i32_ty(),
            None,
        )
    }

    fn call(services: &Services, name: &str, args: Vec<sir::Expr>, ty: Type) -> sir::Expr {
        let callee = sir::Expr::new(
            ExprKind::Var {
                name: services.intern(name),
            },
            Type::Function {
                params: vec![],
                ret: Box::new(ty.clone()),
            },
            None,
        );
        sir::Expr::new(
            ExprKind::Call {
                callee: Box::new(callee),
                args,
            },
            ty,
            None,
        )
    }

    #[test]
    fn literals_and_operators_are_pure() {
        let services = Services::new();
        let expr = sir::Expr::new(
            ExprKind::Binary {
                op: au_ast::BinOp::Add,
                left: Box::new(int_lit(&services, 1)),
                right: Box::new(int_lit(&services, 2)),
            },
            services.names.i32_ty(),
            None,
        );
        assert!(is_pure_expr(&expr, &services));
    }

    #[test]
    fn io_prefixed_calls_are_impure() {
        let services = Services::new();
        let expr = call(&services, "println", vec![], Type::Unit);
        assert!(!is_pure_expr(&expr, &services));
    }

    #[test]
    fn unknown_callees_are_conservatively_impure() {
        let services = Services::new();
        let expr = call(&services, "mystery", vec![], services.names.i32_ty());
        assert!(!is_pure_expr(&expr, &services));
    }

    #[test]
    fn known_internal_calls_with_pure_args_are_pure() {
        let mut services = Services::new();
        let double = services.intern("double");
        services.functions.register(
            FunctionSig::new(
                double,
                vec![services.names.i32_ty()],
                services.names.i32_ty(),
                vec![],
            ),
            None,
            false,
            false,
        );
        let expr = call(
            &services,
            "double",
            vec![int_lit(&services, 2)],
            services.names.i32_ty(),
        );
        assert!(is_pure_expr(&expr, &services));
    }

    #[test]
    fn string_producing_calls_are_impure() {
        let mut services = Services::new();
        let greet = services.intern("greet");
        services.functions.register(
            FunctionSig::new(greet, vec![], services.names.string_ty(), vec![]),
            None,
            false,
            false,
        );
        let expr = call(&services, "greet", vec![], services.names.string_ty());
        assert!(!is_pure_expr(&expr, &services));
    }

    #[test]
    fn mutable_declarations_are_impure() {
        let services = Services::new();
        let stmt = sir::Stmt::VarDecl {
            name: services.intern("x"),
            ty: services.names.i32_ty(),
            value: int_lit(&services, 1),
            mutable: true,
            origin: None,
        };
        assert!(!is_pure_stmt(&stmt, &services));
    }
}
