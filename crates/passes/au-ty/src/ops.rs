//! Operator typing rules

use crate::compat::{ensure_boolean, ensure_compatible, ensure_numeric};
use crate::predicates::{is_float, is_numeric, is_string};
use au_ast::{BinOp, UnaryOp};
use au_diag::{CompileError, Result};
use au_intern::Interner;
use au_sir::{describe, Names, Type, TypeParam};
use au_span::Origin;

/// Context threaded through operator typing
pub struct TyCx<'a> {
    /// Well-known names
    pub names: &'a Names,
    /// Interner, for error rendering
    pub interner: &'a Interner,
    /// Type parameters currently in scope (for `Numeric` constraints)
    pub type_params: &'a [TypeParam],
    /// Origin for raised errors
    pub origin: Option<&'a Origin>,
}

/// Infer the result type of a binary operation
pub fn infer_binary_type(op: BinOp, left: &Type, right: &Type, cx: &TyCx<'_>) -> Result<Type> {
    match op {
        BinOp::Add => {
            // Addition doubles as string concatenation.
            if is_string(left, cx.names) && is_string(right, cx.names) {
                Ok(cx.names.string_ty())
            } else if is_numeric(left, cx.names, cx.type_params)
                && is_numeric(right, cx.names, cx.type_params)
            {
                combine_numeric(left, right, cx)
            } else {
                Err(CompileError::user_at(
                    format!(
                        "Cannot add {} and {}",
                        describe(left, cx.interner),
                        describe(right, cx.interner)
                    ),
                    cx.origin.cloned(),
                ))
            }
        }

        BinOp::Sub | BinOp::Mul | BinOp::Mod => {
            let spelled = op.as_str();
            ensure_numeric(
                left,
                &format!("left operand of '{spelled}'"),
                cx.origin,
                cx.names,
                cx.interner,
                cx.type_params,
            )?;
            ensure_numeric(
                right,
                &format!("right operand of '{spelled}'"),
                cx.origin,
                cx.names,
                cx.interner,
                cx.type_params,
            )?;
            combine_numeric(left, right, cx)
        }

        BinOp::Div => {
            ensure_numeric(
                left,
                "left operand of '/'",
                cx.origin,
                cx.names,
                cx.interner,
                cx.type_params,
            )?;
            ensure_numeric(
                right,
                "right operand of '/'",
                cx.origin,
                cx.names,
                cx.interner,
                cx.type_params,
            )?;
            // Division is float when either side is, integer otherwise.
            if is_float(left, cx.names) || is_float(right, cx.names) {
                Ok(cx.names.f32_ty())
            } else {
                Ok(cx.names.i32_ty())
            }
        }

        BinOp::Eq | BinOp::Ne => {
            ensure_compatible(
                left,
                right,
                &format!("comparison '{}'", op.as_str()),
                cx.origin,
                cx.names,
                cx.interner,
            )?;
            Ok(cx.names.bool_ty())
        }

        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
            let spelled = op.as_str();
            ensure_numeric(
                left,
                &format!("left operand of '{spelled}'"),
                cx.origin,
                cx.names,
                cx.interner,
                cx.type_params,
            )?;
            ensure_numeric(
                right,
                &format!("right operand of '{spelled}'"),
                cx.origin,
                cx.names,
                cx.interner,
                cx.type_params,
            )?;
            Ok(cx.names.bool_ty())
        }

        BinOp::And | BinOp::Or => {
            let spelled = op.as_str();
            ensure_boolean(
                left,
                &format!("left operand of '{spelled}'"),
                cx.origin,
                cx.names,
                cx.interner,
            )?;
            ensure_boolean(
                right,
                &format!("right operand of '{spelled}'"),
                cx.origin,
                cx.names,
                cx.interner,
            )?;
            Ok(cx.names.bool_ty())
        }
    }
}

/// Infer the result type of a unary operation
pub fn infer_unary_type(op: UnaryOp, operand: &Type, cx: &TyCx<'_>) -> Result<Type> {
    match op {
        UnaryOp::Not => {
            ensure_boolean(operand, "operand of '!'", cx.origin, cx.names, cx.interner)?;
            Ok(cx.names.bool_ty())
        }
        UnaryOp::Neg | UnaryOp::Pos => {
            ensure_numeric(
                operand,
                &format!("operand of '{}'", op.as_str()),
                cx.origin,
                cx.names,
                cx.interner,
                cx.type_params,
            )?;
            Ok(operand.clone())
        }
    }
}

/// Combine two numeric operand types into a result type
///
/// A shared variable name passes through; two different variables fall
/// back to the default integer type; one variable yields the concrete
/// side; identical names pass through; either float promotes to `f32`.
fn combine_numeric(left: &Type, right: &Type, cx: &TyCx<'_>) -> Result<Type> {
    if left.is_var() && right.is_var() {
        if left.name() == right.name() {
            return Ok(left.clone());
        }
        return Ok(cx.names.i32_ty());
    }
    if left.is_var() {
        return Ok(right.clone());
    }
    if right.is_var() {
        return Ok(left.clone());
    }

    let left_name = cx.names.of(left).map(|name| cx.names.normalize(name));
    let right_name = cx.names.of(right).map(|name| cx.names.normalize(name));
    if left_name.is_some() && left_name == right_name {
        return Ok(left.clone());
    }
    if is_float(left, cx.names) || is_float(right, cx.names) {
        return Ok(cx.names.f32_ty());
    }

    Err(CompileError::user_at(
        format!(
            "Numeric operands must have matching types, got {} and {}",
            describe(left, cx.interner),
            describe(right, cx.interner)
        ),
        cx.origin.cloned(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Interner, Names) {
        let interner = Interner::new();
        let names = Names::new(&interner);
        (interner, names)
    }

    fn cx<'a>(names: &'a Names, interner: &'a Interner) -> TyCx<'a> {
        TyCx {
            names,
            interner,
            type_params: &[],
            origin: None,
        }
    }

    #[test]
    fn mixed_int_float_addition_promotes_to_f32() {
        let (interner, names) = setup();
        let cx = cx(&names, &interner);
        let result = infer_binary_type(BinOp::Add, &names.i32_ty(), &names.f32_ty(), &cx).unwrap();
        assert_eq!(result, names.f32_ty());
    }

    #[test]
    fn string_concatenation_is_string() {
        let (interner, names) = setup();
        let cx = cx(&names, &interner);
        let result =
            infer_binary_type(BinOp::Add, &names.string_ty(), &names.string_ty(), &cx).unwrap();
        assert_eq!(result, names.string_ty());
    }

    #[test]
    fn adding_string_and_int_errors() {
        let (interner, names) = setup();
        let cx = cx(&names, &interner);
        let error =
            infer_binary_type(BinOp::Add, &names.string_ty(), &names.i32_ty(), &cx).unwrap_err();
        assert_eq!(error.to_string(), "Cannot add string and i32");
    }

    #[test]
    fn division_defaults_to_i32() {
        let (interner, names) = setup();
        let cx = cx(&names, &interner);
        let int_div =
            infer_binary_type(BinOp::Div, &names.i32_ty(), &names.i32_ty(), &cx).unwrap();
        assert_eq!(int_div, names.i32_ty());
        let float_div =
            infer_binary_type(BinOp::Div, &names.i32_ty(), &names.f32_ty(), &cx).unwrap();
        assert_eq!(float_div, names.f32_ty());
    }

    #[test]
    fn comparisons_yield_bool() {
        let (interner, names) = setup();
        let cx = cx(&names, &interner);
        let eq = infer_binary_type(BinOp::Eq, &names.i32_ty(), &names.i32_ty(), &cx).unwrap();
        assert_eq!(eq, names.bool_ty());
        let lt = infer_binary_type(BinOp::Lt, &names.i32_ty(), &names.f32_ty(), &cx).unwrap();
        assert_eq!(lt, names.bool_ty());
    }

    #[test]
    fn shared_type_variable_passes_through() {
        let (interner, names) = setup();
        let cx = cx(&names, &interner);
        let t = interner.intern("T");
        let var = Type::Var {
            name: t,
            constraint: None,
        };
        let result = infer_binary_type(BinOp::Add, &var, &var.clone(), &cx).unwrap();
        assert_eq!(result, var);
    }

    #[test]
    fn one_variable_yields_the_concrete_side() {
        let (interner, names) = setup();
        let cx = cx(&names, &interner);
        let t = interner.intern("T");
        let var = Type::Var {
            name: t,
            constraint: None,
        };
        let result = infer_binary_type(BinOp::Mul, &var, &names.f32_ty(), &cx).unwrap();
        assert_eq!(result, names.f32_ty());
    }

    #[test]
    fn logical_ops_require_bool() {
        let (interner, names) = setup();
        let cx = cx(&names, &interner);
        assert!(
            infer_binary_type(BinOp::And, &names.bool_ty(), &names.bool_ty(), &cx).is_ok()
        );
        assert!(infer_binary_type(BinOp::And, &names.i32_ty(), &names.bool_ty(), &cx).is_err());
    }

    #[test]
    fn unary_negation_preserves_operand_type() {
        let (interner, names) = setup();
        let cx = cx(&names, &interner);
        let result = infer_unary_type(UnaryOp::Neg, &names.f32_ty(), &cx).unwrap();
        assert_eq!(result, names.f32_ty());
        assert!(infer_unary_type(UnaryOp::Not, &names.i32_ty(), &cx).is_err());
    }
}
