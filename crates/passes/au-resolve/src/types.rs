//! Declared-type registry

use au_intern::Symbol;
use au_sir::{Type, TypeParam};
use rustc_hash::FxHashMap;

/// What kind of declaration a registered type came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDefKind {
    /// A primitive or primitive alias
    Primitive,
    /// A record declaration
    Record,
    /// A sum-type declaration
    Sum,
    /// An opaque (extern/stdlib) type
    Opaque,
    /// An alias for another type expression
    Alias,
}

/// Everything the pipeline knows about one declared type
#[derive(Debug, Clone)]
pub struct TypeInfo {
    /// Declared name
    pub name: Symbol,
    /// The resolved semantic type
    pub ir_type: Type,
    /// Declaration kind
    pub kind: TypeDefKind,
    /// Generic parameters of the declaration
    pub type_params: Vec<TypeParam>,
    /// Whether the type is exported from its module
    pub exported: bool,
    /// Owning module, if any
    pub module_name: Option<Symbol>,
}

impl TypeInfo {
    /// Whether this is a sum-type declaration
    pub fn is_sum(&self) -> bool {
        self.kind == TypeDefKind::Sum
    }

    /// Whether this is a record declaration
    pub fn is_record(&self) -> bool {
        self.kind == TypeDefKind::Record
    }

    /// The declared variants, for sum types
    pub fn variants(&self) -> Option<&[au_sir::Variant]> {
        self.ir_type.variants()
    }

    /// The declared fields, for record types
    pub fn fields(&self) -> Option<&[au_sir::Field]> {
        self.ir_type.fields()
    }
}

/// Registry of declared types
///
/// Populated by declaration processing; body lowering only reads it.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: FxHashMap<Symbol, TypeInfo>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a type
    pub fn register(&mut self, info: TypeInfo) {
        self.types.insert(info.name, info);
    }

    /// Look up a type by name
    pub fn lookup(&self, name: Symbol) -> Option<&TypeInfo> {
        self.types.get(&name)
    }

    /// Whether a type with this name is registered
    pub fn has_type(&self, name: Symbol) -> bool {
        self.types.contains_key(&name)
    }

    /// Resolve a member's type on a declared type
    ///
    /// Record fields resolve directly. Alias declarations chase their
    /// underlying type's name one level, which covers aliases of records.
    pub fn resolve_member(&self, type_name: Symbol, member: Symbol) -> Option<Type> {
        let info = self.lookup(type_name)?;
        if let Some(fields) = info.fields() {
            return fields
                .iter()
                .find(|field| field.name == member)
                .map(|field| field.ty.clone());
        }
        if info.kind == TypeDefKind::Alias {
            if let Some(underlying) = info.ir_type.name() {
                if underlying != type_name {
                    return self.resolve_member(underlying, member);
                }
            }
        }
        None
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use au_intern::Interner;
    use au_sir::{Field, Names};

    #[test]
    fn member_resolution_finds_record_fields() {
        let interner = Interner::new();
        let names = Names::new(&interner);
        let point = interner.intern("Point");
        let x = interner.intern("x");
        let y = interner.intern("y");

        let mut registry = TypeRegistry::new();
        registry.register(TypeInfo {
            name: point,
            ir_type: Type::Record {
                name: point,
                fields: vec![
                    Field::new(x, names.f32_ty()),
                    Field::new(y, names.f32_ty()),
                ],
            },
            kind: TypeDefKind::Record,
            type_params: vec![],
            exported: false,
            module_name: None,
        });

        assert_eq!(registry.resolve_member(point, x), Some(names.f32_ty()));
        assert_eq!(registry.resolve_member(point, interner.intern("z")), None);
    }

    #[test]
    fn lookup_distinguishes_kinds() {
        let interner = Interner::new();
        let shape = interner.intern("Shape");

        let mut registry = TypeRegistry::new();
        registry.register(TypeInfo {
            name: shape,
            ir_type: Type::Sum {
                name: shape,
                variants: vec![],
            },
            kind: TypeDefKind::Sum,
            type_params: vec![],
            exported: true,
            module_name: None,
        });

        let info = registry.lookup(shape).unwrap();
        assert!(info.is_sum());
        assert!(!info.is_record());
    }
}
