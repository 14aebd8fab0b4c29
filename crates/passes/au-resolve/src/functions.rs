//! Function registry

use au_intern::Symbol;
use au_sir::{Effect, FunctionSig};
use indexmap::IndexSet;
use rustc_hash::FxHashMap;

/// Metadata for one registered function
#[derive(Debug, Clone)]
pub struct FunctionEntry {
    /// The signature used for inference and call checking
    pub sig: FunctionSig,
    /// Canonical (registration) name; aliases resolve to this
    pub canonical_name: Symbol,
    /// Owning module, if any
    pub module_name: Option<Symbol>,
    /// Whether the function is exported from its module
    pub exported: bool,
    /// Whether this is an external (foreign) function
    pub external: bool,
    /// Effects computed by effect analysis
    pub effects: Vec<Effect>,
    /// Aliases registered for this function, in registration order
    pub aliases: Vec<Symbol>,
}

/// Registry of function signatures, aliases, and module membership
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: FxHashMap<Symbol, FunctionEntry>,
    aliases: FxHashMap<Symbol, Symbol>,
    modules: FxHashMap<Symbol, IndexSet<Symbol>>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a function under its canonical name
    pub fn register(&mut self, sig: FunctionSig, module_name: Option<Symbol>, exported: bool, external: bool) {
        let canonical_name = sig.name;
        if let Some(module) = module_name {
            self.modules.entry(module).or_default().insert(canonical_name);
        }
        self.functions.insert(
            canonical_name,
            FunctionEntry {
                sig,
                canonical_name,
                module_name,
                exported,
                external,
                effects: Vec::new(),
                aliases: Vec::new(),
            },
        );
    }

    /// Register an import alias for a canonical name
    ///
    /// Unknown canonical names are recorded anyway; the target may be
    /// registered later in the same pass.
    pub fn register_alias(&mut self, alias: Symbol, canonical: Symbol) {
        self.aliases.insert(alias, canonical);
        if let Some(entry) = self.functions.get_mut(&canonical) {
            if !entry.aliases.contains(&alias) {
                entry.aliases.push(alias);
            }
        }
    }

    /// Fetch a function by name or alias
    pub fn fetch(&self, name: Symbol) -> Option<&FunctionEntry> {
        if let Some(entry) = self.functions.get(&name) {
            return Some(entry);
        }
        let canonical = self.aliases.get(&name)?;
        self.functions.get(canonical)
    }

    /// Fetch just the signature, by name or alias
    pub fn fetch_sig(&self, name: Symbol) -> Option<&FunctionSig> {
        self.fetch(name).map(|entry| &entry.sig)
    }

    /// Whether a function (or alias) is registered
    pub fn registered(&self, name: Symbol) -> bool {
        self.fetch(name).is_some()
    }

    /// The canonical name behind a name or alias
    pub fn canonical_name(&self, name: Symbol) -> Option<Symbol> {
        self.fetch(name).map(|entry| entry.canonical_name)
    }

    /// Fetch a function belonging to a module by its member name
    pub fn fetch_module_member(&self, module: Symbol, member: Symbol) -> Option<&FunctionEntry> {
        let members = self.modules.get(&module)?;
        members
            .iter()
            .filter_map(|name| self.functions.get(name))
            .find(|entry| entry.sig.name == member || entry.canonical_name == member)
    }

    /// Whether a module with this name has registered functions
    pub fn has_module(&self, module: Symbol) -> bool {
        self.modules.contains_key(&module)
    }

    /// Canonical names registered under a module, in registration order
    pub fn functions_in_module(&self, module: Symbol) -> Vec<Symbol> {
        self.modules
            .get(&module)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Replace the effects recorded for a function
    pub fn set_effects(&mut self, name: Symbol, effects: Vec<Effect>) {
        if let Some(entry) = self.functions.get_mut(&name) {
            entry.effects = effects;
        }
    }

    /// Number of registered functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use au_intern::Interner;
    use au_sir::Names;

    #[test]
    fn aliases_resolve_to_canonical_entries() {
        let interner = Interner::new();
        let names = Names::new(&interner);
        let length = interner.intern("length");
        let len = interner.intern("len");

        let mut registry = FunctionRegistry::new();
        registry.register(
            FunctionSig::new(length, vec![names.string_ty()], names.i32_ty(), vec![]),
            None,
            false,
            false,
        );
        registry.register_alias(len, length);

        let entry = registry.fetch(len).unwrap();
        assert_eq!(entry.canonical_name, length);
        assert_eq!(registry.canonical_name(len), Some(length));
        assert!(entry.aliases.is_empty() || entry.aliases.contains(&len));
    }

    #[test]
    fn module_members_are_queryable() {
        let interner = Interner::new();
        let names = Names::new(&interner);
        let math = interner.intern("Math");
        let sqrt = interner.intern("sqrt");

        let mut registry = FunctionRegistry::new();
        registry.register(
            FunctionSig::new(sqrt, vec![names.f32_ty()], names.f32_ty(), vec![]),
            Some(math),
            true,
            false,
        );

        assert!(registry.has_module(math));
        let entry = registry.fetch_module_member(math, sqrt).unwrap();
        assert_eq!(entry.sig.name, sqrt);
        assert_eq!(registry.functions_in_module(math), vec![sqrt]);
    }

    #[test]
    fn effects_can_be_recorded_after_lowering() {
        let interner = Interner::new();
        let names = Names::new(&interner);
        let double = interner.intern("double");

        let mut registry = FunctionRegistry::new();
        registry.register(
            FunctionSig::new(double, vec![names.i32_ty()], names.i32_ty(), vec![]),
            None,
            false,
            false,
        );
        registry.set_effects(double, vec![Effect::Comptime]);
        assert_eq!(registry.fetch(double).unwrap().effects, vec![Effect::Comptime]);
    }
}
