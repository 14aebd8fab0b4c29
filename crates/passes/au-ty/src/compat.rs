//! Name-based type compatibility checks
//!
//! Compatibility is deliberately looser than [`crate::equivalent`]: it is
//! the check used at assignment-like seams (arguments, results, match
//! arms) where `auto`, type parameters, and the poison type must all pass
//! silently.

use au_diag::{CompileError, Result};
use au_intern::{Interner, Symbol};
use au_sir::{describe, Names, Type};
use au_span::Origin;

/// Whether a name looks like a type parameter (uppercase first letter)
///
/// The surface language reserves uppercase initials for types and type
/// parameters, so an uppercase expected name is not checked further here;
/// structural mismatches against declared types surface at construction
/// sites instead.
pub fn is_type_param_like(name: Symbol, interner: &Interner) -> bool {
    let text = interner.resolve(name);
    match text.chars().next() {
        Some(first) => first.is_ascii_uppercase(),
        None => true,
    }
}

/// Require `actual` to be compatible with `expected`
///
/// Passes when the expected side has no conceptual name, either side is
/// `auto` or the poison type, the expected side is a type variable or an
/// uppercase (type-parameter-like) name, or the normalized names agree.
/// Otherwise reports `"<context> expected <E>, got <A>"`.
pub fn ensure_compatible(
    actual: &Type,
    expected: &Type,
    context: &str,
    origin: Option<&Origin>,
    names: &Names,
    interner: &Interner,
) -> Result<()> {
    if actual.is_error() || expected.is_error() {
        return Ok(());
    }

    let Some(expected_name) = names.of(expected).map(|name| names.normalize(name)) else {
        return Ok(());
    };
    if expected_name == names.auto {
        return Ok(());
    }
    if expected.is_var() || is_type_param_like(expected_name, interner) {
        return Ok(());
    }

    let actual_name = names.of(actual).map(|name| names.normalize(name));
    if actual_name == Some(names.auto) {
        return Ok(());
    }
    if actual_name == Some(expected_name) {
        return Ok(());
    }

    Err(CompileError::user_at(
        format!(
            "{context} expected {}, got {}",
            describe(expected, interner),
            describe(actual, interner)
        ),
        origin.cloned(),
    ))
}

/// Require a boolean type
pub fn ensure_boolean(
    ty: &Type,
    context: &str,
    origin: Option<&Origin>,
    names: &Names,
    interner: &Interner,
) -> Result<()> {
    if ty.is_error() {
        return Ok(());
    }
    if let Some(name) = names.of(ty).map(|name| names.normalize(name)) {
        if name == names.bool || is_type_param_like(name, interner) {
            return Ok(());
        }
    }
    if ty.is_var() {
        return Ok(());
    }
    Err(CompileError::user_at(
        format!("{context} must be bool, got {}", describe(ty, interner)),
        origin.cloned(),
    ))
}

/// Require a numeric type
pub fn ensure_numeric(
    ty: &Type,
    context: &str,
    origin: Option<&Origin>,
    names: &Names,
    interner: &Interner,
    type_params: &[au_sir::TypeParam],
) -> Result<()> {
    if ty.is_error() {
        return Ok(());
    }
    if crate::predicates::is_numeric(ty, names, type_params) {
        return Ok(());
    }
    if let Some(name) = names.of(ty).map(|name| names.normalize(name)) {
        if is_type_param_like(name, interner) {
            return Ok(());
        }
    }
    Err(CompileError::user_at(
        format!("{context} must be numeric, got {}", describe(ty, interner)),
        origin.cloned(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use au_intern::Interner;

    fn setup() -> (Interner, Names) {
        let interner = Interner::new();
        let names = Names::new(&interner);
        (interner, names)
    }

    #[test]
    fn matching_names_are_compatible() {
        let (interner, names) = setup();
        assert!(ensure_compatible(
            &names.i32_ty(),
            &names.i32_ty(),
            "test",
            None,
            &names,
            &interner
        )
        .is_ok());
    }

    #[test]
    fn auto_passes_either_way() {
        let (interner, names) = setup();
        assert!(ensure_compatible(
            &names.auto_ty(),
            &names.i32_ty(),
            "test",
            None,
            &names,
            &interner
        )
        .is_ok());
        assert!(ensure_compatible(
            &names.i32_ty(),
            &names.auto_ty(),
            "test",
            None,
            &names,
            &interner
        )
        .is_ok());
    }

    #[test]
    fn mismatched_names_error_with_context() {
        let (interner, names) = setup();
        let error = ensure_compatible(
            &names.string_ty(),
            &names.i32_ty(),
            "argument 1 of 'add'",
            None,
            &names,
            &interner,
        )
        .unwrap_err();
        assert_eq!(
            error.to_string(),
            "argument 1 of 'add' expected i32, got string"
        );
    }

    #[test]
    fn boolean_check_rejects_numbers() {
        let (interner, names) = setup();
        assert!(ensure_boolean(&names.bool_ty(), "condition", None, &names, &interner).is_ok());
        assert!(ensure_boolean(&names.i32_ty(), "condition", None, &names, &interner).is_err());
    }
}
