//! Generic call constraint solver
//!
//! Resolves a call against a (possibly generic) signature, producing the
//! instantiated parameter and return types. Inference is bidirectional:
//! when unifying the arguments leaves type parameters unresolved and the
//! caller knows the expected result type, the declared return type is
//! unified against it to recover parameters that appear only in return
//! position.

use crate::compat::ensure_compatible;
use crate::subst::{substitute, Subst};
use crate::unify::unify;
use au_diag::{CompileError, Result};
use au_intern::Interner;
use au_sir::{FunctionSig, Names, Type, TypeParam};
use au_span::Origin;

/// The result of resolving a generic call
#[derive(Debug, Clone, PartialEq)]
pub struct Instantiation {
    /// Discovered type-parameter bindings
    pub substitutions: Subst,
    /// Parameter types with substitutions applied
    pub param_types: Vec<Type>,
    /// Return type with substitutions applied
    pub ret_type: Type,
}

/// Resolve a call against a signature
///
/// `func_name` is used only in error messages. Argument-count mismatch or
/// per-argument incompatibility is a user error naming the function and
/// the 1-based argument index.
pub fn instantiate(
    sig: &FunctionSig,
    arg_types: &[Type],
    func_name: &str,
    expected_ret: Option<&Type>,
    names: &Names,
    interner: &Interner,
    origin: Option<&Origin>,
) -> Result<Instantiation> {
    // Step 1: unify each declared parameter against its argument, left to
    // right, accumulating bindings. Earlier parameters are never revisited;
    // a failed unification is left for the compatibility check below.
    let mut subst = Subst::default();
    for (param, arg) in sig.param_types.iter().zip(arg_types.iter()) {
        if let Some(next) = unify(param, arg, &subst) {
            subst = next;
        }
    }

    // Step 2: recover return-only type parameters from the expected type.
    if let Some(expected) = expected_ret {
        if is_incomplete(&subst, &sig.type_params) {
            unify_with_expected(&sig.ret_type, expected, &mut subst);
        }
    }

    // Step 3: instantiate parameters and check the call shape.
    let param_types: Vec<Type> = sig
        .param_types
        .iter()
        .map(|param| substitute(param, &subst))
        .collect();

    if param_types.len() != arg_types.len() {
        return Err(CompileError::user_at(
            format!(
                "Function '{func_name}' expects {} argument(s), got {}",
                param_types.len(),
                arg_types.len()
            ),
            origin.cloned(),
        ));
    }

    for (index, (arg, param)) in arg_types.iter().zip(param_types.iter()).enumerate() {
        ensure_compatible(
            arg,
            param,
            &format!("argument {} of '{func_name}'", index + 1),
            origin,
            names,
            interner,
        )?;
    }

    // Step 4: instantiate the return type.
    let ret_type = substitute(&sig.ret_type, &subst);

    Ok(Instantiation {
        substitutions: subst,
        param_types,
        ret_type,
    })
}

/// Whether any type parameter is still unbound (or bound to a variable)
fn is_incomplete(subst: &Subst, type_params: &[TypeParam]) -> bool {
    type_params.iter().any(|param| {
        subst
            .get(&param.name)
            .map_or(true, |bound| bound.is_var())
    })
}

/// Unify the declared return type against an expected type, binding only
/// parameters that have no binding yet
fn unify_with_expected(pattern: &Type, expected: &Type, subst: &mut Subst) {
    match pattern {
        Type::Var { name, .. } => {
            subst.entry(*name).or_insert_with(|| expected.clone());
        }
        Type::Generic { args, .. } => {
            if let Type::Generic {
                args: expected_args,
                ..
            } = expected
            {
                for (pattern_arg, expected_arg) in args.iter().zip(expected_args.iter()) {
                    unify_with_expected(pattern_arg, expected_arg, subst);
                }
            }
        }
        Type::Array { element } => {
            if let Type::Array {
                element: expected_element,
            } = expected
            {
                unify_with_expected(element, expected_element, subst);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Interner, Names) {
        let interner = Interner::new();
        let names = Names::new(&interner);
        (interner, names)
    }

    fn var(interner: &Interner, name: &str) -> Type {
        Type::Var {
            name: interner.intern(name),
            constraint: None,
        }
    }

    #[test]
    fn identity_instantiates_from_argument() {
        let (interner, names) = setup();
        let t = interner.intern("T");
        let sig = FunctionSig::new(
            interner.intern("identity"),
            vec![var(&interner, "T")],
            var(&interner, "T"),
            vec![TypeParam::new(t)],
        );

        let inst = instantiate(
            &sig,
            &[names.i32_ty()],
            "identity",
            None,
            &names,
            &interner,
            None,
        )
        .unwrap();
        assert_eq!(inst.substitutions.get(&t), Some(&names.i32_ty()));
        assert_eq!(inst.param_types, vec![names.i32_ty()]);
        assert_eq!(inst.ret_type, names.i32_ty());
    }

    #[test]
    fn return_only_param_resolves_from_expected_type() {
        let (interner, names) = setup();
        let t = interner.intern("T");
        // fn default<T>() -> T
        let sig = FunctionSig::new(
            interner.intern("default"),
            vec![],
            var(&interner, "T"),
            vec![TypeParam::new(t)],
        );

        let inst = instantiate(
            &sig,
            &[],
            "default",
            Some(&names.string_ty()),
            &names,
            &interner,
            None,
        )
        .unwrap();
        assert_eq!(inst.ret_type, names.string_ty());
    }

    #[test]
    fn arity_mismatch_names_the_function() {
        let (interner, names) = setup();
        let sig = FunctionSig::new(
            interner.intern("add"),
            vec![names.i32_ty(), names.i32_ty()],
            names.i32_ty(),
            vec![],
        );

        let error =
            instantiate(&sig, &[names.i32_ty()], "add", None, &names, &interner, None).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Function 'add' expects 2 argument(s), got 1"
        );
    }

    #[test]
    fn incompatible_argument_names_its_index() {
        let (interner, names) = setup();
        let sig = FunctionSig::new(
            interner.intern("add"),
            vec![names.i32_ty(), names.i32_ty()],
            names.i32_ty(),
            vec![],
        );

        let error = instantiate(
            &sig,
            &[names.i32_ty(), names.string_ty()],
            "add",
            None,
            &names,
            &interner,
            None,
        )
        .unwrap_err();
        assert_eq!(
            error.to_string(),
            "argument 2 of 'add' expected i32, got string"
        );
    }

    #[test]
    fn argument_bindings_win_over_expected_type() {
        let (interner, names) = setup();
        let t = interner.intern("T");
        let sig = FunctionSig::new(
            interner.intern("identity"),
            vec![var(&interner, "T")],
            var(&interner, "T"),
            vec![TypeParam::new(t)],
        );

        // The argument fixes T; the conflicting expected type is ignored.
        let inst = instantiate(
            &sig,
            &[names.i32_ty()],
            "identity",
            Some(&names.string_ty()),
            &names,
            &interner,
            None,
        )
        .unwrap();
        assert_eq!(inst.ret_type, names.i32_ty());
    }
}
