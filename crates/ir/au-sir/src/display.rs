//! Human-readable type descriptions for diagnostics

use crate::types::Type;
use au_intern::Interner;

/// Describe a type for an error message
///
/// Declared types render as their names, structural types by shape. The
/// output is for humans; it is not a parseable syntax.
pub fn describe(ty: &Type, interner: &Interner) -> String {
    match ty {
        Type::Prim { name } | Type::Opaque { name } => interner.resolve(*name),
        Type::Unit => "unit".to_string(),
        Type::Error => "<error>".to_string(),
        Type::Ref { inner } => format!("ref {}", describe(inner, interner)),
        Type::MutRef { inner } => format!("ref mut {}", describe(inner, interner)),
        Type::Record { name, .. } | Type::Sum { name, .. } => interner.resolve(*name),
        Type::Function { params, ret } => {
            let params: Vec<String> = params
                .iter()
                .map(|param| describe(&param.ty, interner))
                .collect();
            format!("fn({}) -> {}", params.join(", "), describe(ret, interner))
        }
        Type::Generic { base, args } => {
            let args: Vec<String> = args.iter().map(|arg| describe(arg, interner)).collect();
            format!("{}<{}>", describe(base, interner), args.join(", "))
        }
        Type::Var { name, .. } => interner.resolve(*name),
        Type::Array { element } => format!("[{}]", describe(element, interner)),
        Type::Map { key, value } => format!(
            "{{{}: {}}}",
            describe(key, interner),
            describe(value, interner)
        ),
        Type::Tuple { elements } => {
            let elements: Vec<String> =
                elements.iter().map(|ty| describe(ty, interner)).collect();
            format!("({})", elements.join(", "))
        }
        Type::Symbol => "symbol".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::Names;

    #[test]
    fn generic_types_render_with_args() {
        let interner = Interner::new();
        let names = Names::new(&interner);
        let option = Type::Generic {
            base: Box::new(Type::Prim {
                name: names.option,
            }),
            args: vec![names.i32_ty()],
        };
        assert_eq!(describe(&option, &interner), "Option<i32>");
    }

    #[test]
    fn arrays_and_tuples_render_by_shape() {
        let interner = Interner::new();
        let names = Names::new(&interner);
        let array = Type::Array {
            element: Box::new(names.string_ty()),
        };
        assert_eq!(describe(&array, &interner), "[string]");
        let tuple = Type::Tuple {
            elements: vec![names.i32_ty(), names.bool_ty()],
        };
        assert_eq!(describe(&tuple, &interner), "(i32, bool)");
    }
}
