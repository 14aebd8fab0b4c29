//! Structural type equivalence

use au_sir::Type;

/// Whether two types are equivalent
///
/// Type variables compare by name; generic types by base name plus
/// pairwise-equivalent arguments of equal arity; arrays by element;
/// references, tuples, and maps structurally. The poison [`Type::Error`]
/// is equivalent to everything so one reported error does not cascade.
/// Remaining shapes compare by declared name — which makes any two
/// function types equivalent, since they all share the conceptual name
/// `function`.
pub fn equivalent(a: &Type, b: &Type) -> bool {
    if std::ptr::eq(a, b) {
        return true;
    }

    match (a, b) {
        (Type::Error, _) | (_, Type::Error) => true,

        (Type::Var { name: a_name, .. }, Type::Var { name: b_name, .. }) => a_name == b_name,

        (
            Type::Generic {
                base: a_base,
                args: a_args,
            },
            Type::Generic {
                base: b_base,
                args: b_args,
            },
        ) => {
            let base_match = match (a_base.name(), b_base.name()) {
                (Some(a_name), Some(b_name)) => a_name == b_name,
                _ => false,
            };
            base_match
                && a_args.len() == b_args.len()
                && a_args
                    .iter()
                    .zip(b_args.iter())
                    .all(|(a_arg, b_arg)| equivalent(a_arg, b_arg))
        }

        (Type::Array { element: a_elem }, Type::Array { element: b_elem }) => {
            equivalent(a_elem, b_elem)
        }

        (Type::Ref { inner: a_inner }, Type::Ref { inner: b_inner })
        | (Type::MutRef { inner: a_inner }, Type::MutRef { inner: b_inner }) => {
            equivalent(a_inner, b_inner)
        }

        (Type::Tuple { elements: a_elems }, Type::Tuple { elements: b_elems }) => {
            a_elems.len() == b_elems.len()
                && a_elems
                    .iter()
                    .zip(b_elems.iter())
                    .all(|(a_elem, b_elem)| equivalent(a_elem, b_elem))
        }

        (
            Type::Map {
                key: a_key,
                value: a_value,
            },
            Type::Map {
                key: b_key,
                value: b_value,
            },
        ) => equivalent(a_key, b_key) && equivalent(a_value, b_value),

        (Type::Unit, Type::Unit) | (Type::Symbol, Type::Symbol) => true,

        // All function types share one conceptual name.
        (Type::Function { .. }, Type::Function { .. }) => true,

        _ => match (a.name(), b.name()) {
            (Some(a_name), Some(b_name)) => a_name == b_name,
            _ => false,
        },
    }
}

/// Equivalence over optional types: an absent type matches nothing
pub fn equivalent_opt(a: Option<&Type>, b: Option<&Type>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => equivalent(a, b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use au_intern::Interner;
    use au_sir::Names;

    fn names() -> (Interner, Names) {
        let interner = Interner::new();
        let names = Names::new(&interner);
        (interner, names)
    }

    #[test]
    fn primitives_compare_by_name() {
        let (_, names) = names();
        assert!(equivalent(&names.i32_ty(), &names.i32_ty()));
        assert!(!equivalent(&names.i32_ty(), &names.f32_ty()));
    }

    #[test]
    fn type_variables_compare_by_name() {
        let (interner, _) = names();
        let t = interner.intern("T");
        let u = interner.intern("U");
        let var_t = Type::Var {
            name: t,
            constraint: None,
        };
        let var_t2 = Type::Var {
            name: t,
            constraint: None,
        };
        let var_u = Type::Var {
            name: u,
            constraint: None,
        };
        assert!(equivalent(&var_t, &var_t2));
        assert!(!equivalent(&var_t, &var_u));
    }

    #[test]
    fn generics_need_matching_base_and_args() {
        let (interner, names) = names();
        let option = interner.intern("Option");
        let make = |arg: Type| Type::Generic {
            base: Box::new(Type::Prim { name: option }),
            args: vec![arg],
        };
        assert!(equivalent(&make(names.i32_ty()), &make(names.i32_ty())));
        assert!(!equivalent(&make(names.i32_ty()), &make(names.bool_ty())));
    }

    #[test]
    fn arrays_compare_by_element() {
        let (_, names) = names();
        let ints = Type::Array {
            element: Box::new(names.i32_ty()),
        };
        let strings = Type::Array {
            element: Box::new(names.string_ty()),
        };
        assert!(equivalent(&ints, &ints.clone()));
        assert!(!equivalent(&ints, &strings));
    }

    #[test]
    fn error_is_equivalent_to_anything() {
        let (_, names) = names();
        assert!(equivalent(&Type::Error, &names.i32_ty()));
        assert!(equivalent(&names.string_ty(), &Type::Error));
    }

    #[test]
    fn absent_types_never_match() {
        let (_, names) = names();
        let i32_ty = names.i32_ty();
        assert!(!equivalent_opt(Some(&i32_ty), None));
        assert!(!equivalent_opt(None, None));
    }
}
