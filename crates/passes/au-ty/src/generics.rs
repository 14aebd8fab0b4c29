//! Generic constructor specialization

use crate::subst::Subst;
use au_sir::{Type, TypeParam};

/// Infer substitutions for a generic constructor matched against a
/// concrete scrutinee type
///
/// Base names must agree. The substitutions are built by a **positional**
/// zip of the declared type parameters against the scrutinee's type
/// arguments — not by unification — so an arity mismatch silently yields a
/// partial map. Callers treat an empty map as "nothing to specialize".
pub fn infer_substitutions(
    type_params: &[TypeParam],
    declared: &Type,
    scrutinee: &Type,
) -> Subst {
    let mut subst = Subst::default();

    let (Some(declared_name), Some(scrutinee_name)) = (declared.name(), scrutinee.name()) else {
        return subst;
    };
    if declared_name != scrutinee_name {
        return subst;
    }

    let Some(args) = scrutinee.generic_args() else {
        return subst;
    };

    for (param, arg) in type_params.iter().zip(args.iter()) {
        subst.insert(param.name, arg.clone());
    }
    subst
}

#[cfg(test)]
mod tests {
    use super::*;
    use au_intern::Interner;
    use au_sir::Names;

    #[test]
    fn positional_zip_binds_params_in_order() {
        let interner = Interner::new();
        let names = Names::new(&interner);
        let result_name = interner.intern("Result");
        let t = interner.intern("T");
        let e = interner.intern("E");

        let declared = Type::Generic {
            base: Box::new(Type::Prim { name: result_name }),
            args: vec![
                Type::Var {
                    name: t,
                    constraint: None,
                },
                Type::Var {
                    name: e,
                    constraint: None,
                },
            ],
        };
        let scrutinee = Type::Generic {
            base: Box::new(Type::Prim { name: result_name }),
            args: vec![names.i32_ty(), names.string_ty()],
        };

        let subst = infer_substitutions(
            &[TypeParam::new(t), TypeParam::new(e)],
            &declared,
            &scrutinee,
        );
        assert_eq!(subst.get(&t), Some(&names.i32_ty()));
        assert_eq!(subst.get(&e), Some(&names.string_ty()));
    }

    #[test]
    fn arity_mismatch_yields_partial_map() {
        let interner = Interner::new();
        let names = Names::new(&interner);
        let pair = interner.intern("Pair");
        let a = interner.intern("A");
        let b = interner.intern("B");

        let declared = Type::Prim { name: pair };
        let scrutinee = Type::Generic {
            base: Box::new(Type::Prim { name: pair }),
            args: vec![names.i32_ty()],
        };

        let subst = infer_substitutions(
            &[TypeParam::new(a), TypeParam::new(b)],
            &declared,
            &scrutinee,
        );
        assert_eq!(subst.len(), 1);
        assert_eq!(subst.get(&a), Some(&names.i32_ty()));
        assert!(!subst.contains_key(&b));
    }

    #[test]
    fn disagreeing_base_names_yield_nothing() {
        let interner = Interner::new();
        let names = Names::new(&interner);
        let option = interner.intern("Option");
        let result_name = interner.intern("Result");
        let t = interner.intern("T");

        let declared = Type::Prim { name: option };
        let scrutinee = Type::Generic {
            base: Box::new(Type::Prim { name: result_name }),
            args: vec![names.i32_ty()],
        };
        assert!(infer_substitutions(&[TypeParam::new(t)], &declared, &scrutinee).is_empty());
    }
}
