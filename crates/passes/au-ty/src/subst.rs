//! Type variable substitution

use au_intern::Symbol;
use au_sir::{Field, Type, Variant};
use rustc_hash::FxHashMap;

/// A map from type variable names to their bound types
pub type Subst = FxHashMap<Symbol, Type>;

/// Apply substitutions recursively, returning a new type
///
/// Bound variables are replaced; unbound variables pass through unchanged.
/// Sibling branches are never shared or mutated — the result is a fresh
/// value.
pub fn substitute(ty: &Type, subst: &Subst) -> Type {
    if subst.is_empty() {
        return ty.clone();
    }

    match ty {
        Type::Var { name, .. } => subst.get(name).cloned().unwrap_or_else(|| ty.clone()),

        Type::Generic { base, args } => Type::Generic {
            base: Box::new(substitute(base, subst)),
            args: args.iter().map(|arg| substitute(arg, subst)).collect(),
        },

        Type::Array { element } => Type::Array {
            element: Box::new(substitute(element, subst)),
        },

        Type::Map { key, value } => Type::Map {
            key: Box::new(substitute(key, subst)),
            value: Box::new(substitute(value, subst)),
        },

        Type::Tuple { elements } => Type::Tuple {
            elements: elements.iter().map(|elem| substitute(elem, subst)).collect(),
        },

        Type::Ref { inner } => Type::Ref {
            inner: Box::new(substitute(inner, subst)),
        },

        Type::MutRef { inner } => Type::MutRef {
            inner: Box::new(substitute(inner, subst)),
        },

        Type::Function { params, ret } => Type::Function {
            params: params
                .iter()
                .map(|param| Field::new(param.name, substitute(&param.ty, subst)))
                .collect(),
            ret: Box::new(substitute(ret, subst)),
        },

        Type::Record { name, fields } => Type::Record {
            name: *name,
            fields: fields
                .iter()
                .map(|field| Field::new(field.name, substitute(&field.ty, subst)))
                .collect(),
        },

        Type::Sum { name, variants } => Type::Sum {
            name: *name,
            variants: variants
                .iter()
                .map(|variant| Variant {
                    name: variant.name,
                    fields: variant
                        .fields
                        .iter()
                        .map(|field| Field::new(field.name, substitute(&field.ty, subst)))
                        .collect(),
                })
                .collect(),
        },

        _ => ty.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use au_intern::Interner;
    use au_sir::Names;

    #[test]
    fn empty_substitution_is_identity() {
        let interner = Interner::new();
        let names = Names::new(&interner);
        let ty = Type::Array {
            element: Box::new(names.i32_ty()),
        };
        assert_eq!(substitute(&ty, &Subst::default()), ty);
    }

    #[test]
    fn bound_variables_are_replaced_recursively() {
        let interner = Interner::new();
        let names = Names::new(&interner);
        let t = interner.intern("T");
        let option = interner.intern("Option");

        let generic = Type::Generic {
            base: Box::new(Type::Prim { name: option }),
            args: vec![Type::Var {
                name: t,
                constraint: None,
            }],
        };

        let mut subst = Subst::default();
        subst.insert(t, names.i32_ty());

        let result = substitute(&generic, &subst);
        assert_eq!(result.generic_args(), Some(&[names.i32_ty()][..]));
    }

    #[test]
    fn unbound_variables_pass_through() {
        let interner = Interner::new();
        let names = Names::new(&interner);
        let t = interner.intern("T");
        let u = interner.intern("U");

        let var_u = Type::Var {
            name: u,
            constraint: None,
        };
        let mut subst = Subst::default();
        subst.insert(t, names.i32_ty());

        assert_eq!(substitute(&var_u, &subst), var_u);
    }

    #[test]
    fn sibling_branches_are_independent() {
        let interner = Interner::new();
        let names = Names::new(&interner);
        let t = interner.intern("T");

        let tuple = Type::Tuple {
            elements: vec![
                Type::Var {
                    name: t,
                    constraint: None,
                },
                names.string_ty(),
            ],
        };
        let mut subst = Subst::default();
        subst.insert(t, names.bool_ty());

        let result = substitute(&tuple, &subst);
        let Type::Tuple { elements } = result else {
            panic!("expected a tuple");
        };
        assert_eq!(elements[0], names.bool_ty());
        assert_eq!(elements[1], names.string_ty());
        // The input is untouched.
        let Type::Tuple { elements } = tuple else {
            unreachable!();
        };
        assert!(elements[0].is_var());
    }
}
