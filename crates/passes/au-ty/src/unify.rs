//! Type unification

use crate::equiv::equivalent;
use crate::subst::Subst;
use au_sir::Type;

/// Unify a pattern type (possibly containing type variables) against an
/// actual type
///
/// On success, returns the accumulated bindings: the existing map plus
/// whatever this unification discovered. Rebinding a variable to a
/// non-equivalent type fails. Shapes other than variables, generics, and
/// arrays fall back to [`equivalent`].
pub fn unify(pattern: &Type, actual: &Type, existing: &Subst) -> Option<Subst> {
    match pattern {
        Type::Var { name, .. } => match existing.get(name) {
            Some(bound) => {
                if equivalent(bound, actual) {
                    Some(existing.clone())
                } else {
                    None
                }
            }
            None => {
                let mut subst = existing.clone();
                subst.insert(*name, actual.clone());
                Some(subst)
            }
        },

        Type::Generic {
            base: pattern_base,
            args: pattern_args,
        } => {
            let Type::Generic {
                base: actual_base,
                args: actual_args,
            } = actual
            else {
                return None;
            };

            let base_match = match (pattern_base.name(), actual_base.name()) {
                (Some(pattern_name), Some(actual_name)) => pattern_name == actual_name,
                _ => false,
            };
            if !base_match || pattern_args.len() != actual_args.len() {
                return None;
            }

            // Thread the bindings through each argument, left to right.
            let mut current = existing.clone();
            for (pattern_arg, actual_arg) in pattern_args.iter().zip(actual_args.iter()) {
                current = unify(pattern_arg, actual_arg, &current)?;
            }
            Some(current)
        }

        Type::Array { element } => match actual {
            Type::Array {
                element: actual_element,
            } => unify(element, actual_element, existing),
            _ => None,
        },

        _ => {
            if equivalent(pattern, actual) {
                Some(existing.clone())
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use au_intern::Interner;
    use au_sir::Names;

    #[test]
    fn variable_binds_to_actual() {
        let interner = Interner::new();
        let names = Names::new(&interner);
        let t = interner.intern("T");
        let var = Type::Var {
            name: t,
            constraint: None,
        };

        let subst = unify(&var, &names.i32_ty(), &Subst::default()).unwrap();
        assert_eq!(subst.get(&t), Some(&names.i32_ty()));
    }

    #[test]
    fn rebinding_to_incompatible_type_fails() {
        let interner = Interner::new();
        let names = Names::new(&interner);
        let t = interner.intern("T");
        let var = Type::Var {
            name: t,
            constraint: None,
        };

        let mut existing = Subst::default();
        existing.insert(t, names.string_ty());
        assert!(unify(&var, &names.i32_ty(), &existing).is_none());
        assert!(unify(&var, &names.string_ty(), &existing).is_some());
    }

    #[test]
    fn generic_unification_threads_bindings() {
        let interner = Interner::new();
        let names = Names::new(&interner);
        let result_name = interner.intern("Result");
        let t = interner.intern("T");
        let e = interner.intern("E");

        let pattern = Type::Generic {
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
        let actual = Type::Generic {
            base: Box::new(Type::Prim { name: result_name }),
            args: vec![names.i32_ty(), names.string_ty()],
        };

        let subst = unify(&pattern, &actual, &Subst::default()).unwrap();
        assert_eq!(subst.get(&t), Some(&names.i32_ty()));
        assert_eq!(subst.get(&e), Some(&names.string_ty()));
    }

    #[test]
    fn generic_arity_mismatch_fails() {
        let interner = Interner::new();
        let names = Names::new(&interner);
        let option = interner.intern("Option");
        let t = interner.intern("T");

        let pattern = Type::Generic {
            base: Box::new(Type::Prim { name: option }),
            args: vec![Type::Var {
                name: t,
                constraint: None,
            }],
        };
        let actual = Type::Generic {
            base: Box::new(Type::Prim { name: option }),
            args: vec![names.i32_ty(), names.i32_ty()],
        };
        assert!(unify(&pattern, &actual, &Subst::default()).is_none());
    }

    #[test]
    fn variable_free_unification_mirrors_equivalence() {
        let interner = Interner::new();
        let names = Names::new(&interner);

        let same = unify(&names.i32_ty(), &names.i32_ty(), &Subst::default()).unwrap();
        assert!(same.is_empty());
        assert!(unify(&names.i32_ty(), &names.bool_ty(), &Subst::default()).is_none());
    }
}
