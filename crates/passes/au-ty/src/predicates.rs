//! Type predicates
//!
//! Name-based classification with one deliberate looseness inherited from
//! the numeric model: a bare type variable counts as numeric- and
//! integer-compatible, and a name referring to an in-scope type parameter
//! is numeric only when that parameter carries the `Numeric` constraint.

use au_sir::{Names, Type, TypeParam};

/// Whether a type is numeric
pub fn is_numeric(ty: &Type, names: &Names, type_params: &[TypeParam]) -> bool {
    if ty.is_var() {
        return true;
    }
    let Some(name) = names.of(ty) else {
        return false;
    };
    let name = names.normalize(name);
    if names.is_numeric_name(name) {
        return true;
    }
    type_params
        .iter()
        .any(|param| param.name == name && param.constraint == Some(names.numeric))
}

/// Whether a type is an integer (not floating point)
pub fn is_integer(ty: &Type, names: &Names, type_params: &[TypeParam]) -> bool {
    if ty.is_var() {
        return true;
    }
    let Some(name) = names.of(ty) else {
        return false;
    };
    let name = names.normalize(name);
    if names.is_integer_name(name) {
        return true;
    }
    type_params
        .iter()
        .any(|param| param.name == name && param.constraint == Some(names.numeric))
}

/// Whether a type is the default float type
pub fn is_float(ty: &Type, names: &Names) -> bool {
    names
        .of(ty)
        .is_some_and(|name| names.is_float_name(names.normalize(name)))
}

/// Whether a type is the string type
pub fn is_string(ty: &Type, names: &Names) -> bool {
    names
        .of(ty)
        .is_some_and(|name| names.normalize(name) == names.string)
}

/// Whether a type is unit-like (`unit`, `void`, or the unit type itself)
pub fn is_unit_like(ty: &Type, names: &Names) -> bool {
    if ty.is_unit() {
        return true;
    }
    names
        .of(ty)
        .is_some_and(|name| names.is_unit_name(names.normalize(name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use au_intern::Interner;

    #[test]
    fn bare_type_variables_are_numeric_compatible() {
        let interner = Interner::new();
        let names = Names::new(&interner);
        let t = interner.intern("T");
        let var = Type::Var {
            name: t,
            constraint: None,
        };
        assert!(is_numeric(&var, &names, &[]));
        assert!(is_integer(&var, &names, &[]));
    }

    #[test]
    fn constrained_param_names_are_numeric() {
        let interner = Interner::new();
        let names = Names::new(&interner);
        let t = interner.intern("T");
        let referenced = Type::Prim { name: t };

        assert!(!is_numeric(&referenced, &names, &[TypeParam::new(t)]));
        assert!(is_numeric(
            &referenced,
            &names,
            &[TypeParam::constrained(t, names.numeric)]
        ));
    }

    #[test]
    fn only_f32_counts_as_the_float_type() {
        let interner = Interner::new();
        let names = Names::new(&interner);
        assert!(is_float(&names.f32_ty(), &names));
        assert!(!is_float(&Type::Prim { name: names.f64 }, &names));
    }

    #[test]
    fn str_counts_as_string() {
        let interner = Interner::new();
        let names = Names::new(&interner);
        let str_ty = Type::Prim { name: names.str_ };
        assert!(is_string(&str_ty, &names));
    }
}
