//! Scoped variable types
//!
//! Every scope-introducing construct (let, lambda parameters, match-arm
//! bindings, loop variables, blocks) must snapshot before binding and
//! restore on **every** exit path, including errors. Correctness of the
//! whole pipeline reduces to strict nesting of these pairs; the lowering
//! crate wraps them in a guaranteed-run helper.

use au_intern::Symbol;
use au_sir::Type;
use rustc_hash::FxHashMap;

/// The lexically visible variable types
#[derive(Debug, Default)]
pub struct VarTypes {
    types: FxHashMap<Symbol, Type>,
}

/// A saved copy of the visible bindings
#[derive(Debug, Clone)]
pub struct VarTypesSnapshot {
    types: FxHashMap<Symbol, Type>,
}

impl VarTypes {
    /// Create an empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind (or rebind) a variable's type
    pub fn set(&mut self, name: Symbol, ty: Type) {
        self.types.insert(name, ty);
    }

    /// The type of a visible variable
    pub fn get(&self, name: Symbol) -> Option<&Type> {
        self.types.get(&name)
    }

    /// Whether a variable is visible
    pub fn has(&self, name: Symbol) -> bool {
        self.types.contains_key(&name)
    }

    /// All visible variable names, in no particular order
    pub fn names(&self) -> Vec<Symbol> {
        self.types.keys().copied().collect()
    }

    /// Save the current visible bindings
    pub fn snapshot(&self) -> VarTypesSnapshot {
        VarTypesSnapshot {
            types: self.types.clone(),
        }
    }

    /// Restore a previously saved binding set
    pub fn restore(&mut self, snapshot: VarTypesSnapshot) {
        self.types = snapshot.types;
    }

    /// Number of visible bindings
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no bindings are visible
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use au_intern::Interner;
    use au_sir::Names;

    #[test]
    fn restore_discards_inner_bindings() {
        let interner = Interner::new();
        let names = Names::new(&interner);
        let outer = interner.intern("outer");
        let inner = interner.intern("inner");

        let mut vars = VarTypes::new();
        vars.set(outer, names.i32_ty());

        let snapshot = vars.snapshot();
        vars.set(inner, names.bool_ty());
        vars.set(outer, names.string_ty());
        assert!(vars.has(inner));

        vars.restore(snapshot);
        assert!(!vars.has(inner));
        assert_eq!(vars.get(outer), Some(&names.i32_ty()));
        assert_eq!(vars.len(), 1);
    }

    #[test]
    fn snapshots_nest() {
        let interner = Interner::new();
        let names = Names::new(&interner);
        let a = interner.intern("a");
        let b = interner.intern("b");

        let mut vars = VarTypes::new();
        let empty = vars.snapshot();
        vars.set(a, names.i32_ty());
        let one = vars.snapshot();
        vars.set(b, names.i32_ty());

        vars.restore(one);
        assert!(vars.has(a) && !vars.has(b));
        vars.restore(empty);
        assert!(vars.is_empty());
    }
}
