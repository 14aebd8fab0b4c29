//! Pre-interned well-known names
//!
//! Built once per pipeline from its interner so predicates and builders can
//! compare symbols instead of resolving strings.

use crate::types::Type;
use au_intern::{Interner, Symbol};

/// Well-known names, interned up front
#[derive(Debug, Clone, Copy)]
pub struct Names {
    /// `i8`
    pub i8: Symbol,
    /// `i16`
    pub i16: Symbol,
    /// `i32`
    pub i32: Symbol,
    /// `i64`
    pub i64: Symbol,
    /// `u8`
    pub u8: Symbol,
    /// `u16`
    pub u16: Symbol,
    /// `u32`
    pub u32: Symbol,
    /// `u64`
    pub u64: Symbol,
    /// `f32`
    pub f32: Symbol,
    /// `f64`
    pub f64: Symbol,
    /// `bool`
    pub bool: Symbol,
    /// `string`
    pub string: Symbol,
    /// `str` (normalizes to `string`)
    pub str_: Symbol,
    /// `unit`
    pub unit: Symbol,
    /// `void` (normalizes to unit)
    pub void: Symbol,
    /// `auto` — the inference placeholder primitive
    pub auto: Symbol,
    /// Conceptual name of array types
    pub array: Symbol,
    /// Conceptual name shared by all function types
    pub function: Symbol,
    /// Conceptual name of tuple types
    pub tuple: Symbol,
    /// Conceptual name of map types
    pub map: Symbol,
    /// Conceptual name of the symbol-literal type
    pub symbol: Symbol,
    /// The `Numeric` constraint
    pub numeric: Symbol,
    /// `Range`
    pub range: Symbol,
    /// `Future`
    pub future: Symbol,
    /// `Task`
    pub task: Symbol,
    /// `Awaitable`
    pub awaitable: Symbol,
    /// `Coroutine`
    pub coroutine: Symbol,
    /// `Result`
    pub result: Symbol,
    /// `Option`
    pub option: Symbol,
    /// `Some`
    pub some: Symbol,
    /// `None`
    pub none: Symbol,
    /// `_` — the ignored-binding name
    pub underscore: Symbol,
}

impl Names {
    /// Intern every well-known name
    pub fn new(interner: &Interner) -> Self {
        Self {
            i8: interner.intern("i8"),
            i16: interner.intern("i16"),
            i32: interner.intern("i32"),
            i64: interner.intern("i64"),
            u8: interner.intern("u8"),
            u16: interner.intern("u16"),
            u32: interner.intern("u32"),
            u64: interner.intern("u64"),
            f32: interner.intern("f32"),
            f64: interner.intern("f64"),
            bool: interner.intern("bool"),
            string: interner.intern("string"),
            str_: interner.intern("str"),
            unit: interner.intern("unit"),
            void: interner.intern("void"),
            auto: interner.intern("auto"),
            array: interner.intern("array"),
            function: interner.intern("function"),
            tuple: interner.intern("tuple"),
            map: interner.intern("map"),
            symbol: interner.intern("symbol"),
            numeric: interner.intern("Numeric"),
            range: interner.intern("Range"),
            future: interner.intern("Future"),
            task: interner.intern("Task"),
            awaitable: interner.intern("Awaitable"),
            coroutine: interner.intern("Coroutine"),
            result: interner.intern("Result"),
            option: interner.intern("Option"),
            some: interner.intern("Some"),
            none: interner.intern("None"),
            underscore: interner.intern("_"),
        }
    }

    /// Normalize a type name (`str` → `string`)
    pub fn normalize(&self, name: Symbol) -> Symbol {
        if name == self.str_ {
            self.string
        } else {
            name
        }
    }

    /// Whether a normalized name denotes a numeric primitive
    pub fn is_numeric_name(&self, name: Symbol) -> bool {
        self.is_integer_name(name) || name == self.f32 || name == self.f64
    }

    /// Whether a normalized name denotes an integer primitive
    pub fn is_integer_name(&self, name: Symbol) -> bool {
        name == self.i8
            || name == self.i16
            || name == self.i32
            || name == self.i64
            || name == self.u8
            || name == self.u16
            || name == self.u32
            || name == self.u64
    }

    /// Whether a normalized name is the default float type
    ///
    /// Only `f32` participates in float promotion; `f64` operands must
    /// match exactly.
    pub fn is_float_name(&self, name: Symbol) -> bool {
        name == self.f32
    }

    /// Whether a name denotes unit (`unit` or `void`)
    pub fn is_unit_name(&self, name: Symbol) -> bool {
        name == self.unit || name == self.void
    }

    /// Whether a name denotes a future-like async wrapper
    pub fn is_future_like(&self, name: Symbol) -> bool {
        name == self.future
            || name == self.task
            || name == self.awaitable
            || name == self.coroutine
    }

    /// The conceptual name of a type, covering structural shapes
    ///
    /// Used by name-based compatibility checking; declared names come from
    /// [`Type::name`], structural types answer with their fixed names, and
    /// shapes without any name answer `None`.
    pub fn of(&self, ty: &Type) -> Option<Symbol> {
        match ty {
            Type::Unit => Some(self.unit),
            Type::Array { .. } => Some(self.array),
            Type::Function { .. } => Some(self.function),
            Type::Tuple { .. } => Some(self.tuple),
            Type::Map { .. } => Some(self.map),
            Type::Symbol => Some(self.symbol),
            Type::Error => None,
            _ => ty.name(),
        }
    }

    /// The `i32` type
    pub fn i32_ty(&self) -> Type {
        Type::Prim { name: self.i32 }
    }

    /// The `f32` type
    pub fn f32_ty(&self) -> Type {
        Type::Prim { name: self.f32 }
    }

    /// The `bool` type
    pub fn bool_ty(&self) -> Type {
        Type::Prim { name: self.bool }
    }

    /// The `string` type
    pub fn string_ty(&self) -> Type {
        Type::Prim { name: self.string }
    }

    /// The `auto` placeholder type
    pub fn auto_ty(&self) -> Type {
        Type::Prim { name: self.auto }
    }

    /// A primitive type, normalizing the name first
    pub fn prim(&self, name: Symbol) -> Type {
        let name = self.normalize(name);
        if self.is_unit_name(name) {
            Type::Unit
        } else {
            Type::Prim { name }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_normalizes_to_string() {
        let interner = Interner::new();
        let names = Names::new(&interner);
        assert_eq!(names.normalize(names.str_), names.string);
        assert_eq!(names.prim(names.str_), names.string_ty());
    }

    #[test]
    fn void_prim_becomes_unit() {
        let interner = Interner::new();
        let names = Names::new(&interner);
        assert_eq!(names.prim(names.void), Type::Unit);
        assert_eq!(names.prim(names.unit), Type::Unit);
    }

    #[test]
    fn numeric_names_cover_integers_and_floats() {
        let interner = Interner::new();
        let names = Names::new(&interner);
        assert!(names.is_numeric_name(names.i8));
        assert!(names.is_numeric_name(names.f64));
        assert!(!names.is_numeric_name(names.bool));
        assert!(names.is_integer_name(names.u64));
        assert!(!names.is_integer_name(names.f32));
    }
}
