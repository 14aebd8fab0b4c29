//! The services container
//!
//! One owned bundle of everything lowering shares: the interner, the
//! well-known names, the three registries, the sum-type constructor table,
//! and the event sink. There are no globals; the container is threaded
//! through visitors and rules by the [`crate::Lowerer`].

use au_diag::{EventSink, NullSink};
use au_intern::{Interner, Symbol};
use au_resolve::{FunctionRegistry, TypeRegistry, VarTypes};
use au_sir::{FunctionSig, Names};
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// Shared lowering services
pub struct Services {
    /// String interner
    pub interner: Interner,
    /// Pre-interned well-known names
    pub names: Names,
    /// Declared types
    pub types: TypeRegistry,
    /// Declared functions
    pub functions: FunctionRegistry,
    /// Lexically scoped variable types
    pub vars: VarTypes,
    /// Sum-type constructor signatures, keyed by constructor name
    pub constructors: FxHashMap<Symbol, FunctionSig>,
    /// Event sink; fire-and-forget, never affects results
    pub events: Rc<dyn EventSink>,
    /// Whether match exhaustiveness checking is enabled
    pub check_exhaustiveness: bool,
}

impl Services {
    /// Create a fresh container with a null event sink
    pub fn new() -> Self {
        Self::with_events(Rc::new(NullSink))
    }

    /// Create a fresh container publishing to the given sink
    pub fn with_events(events: Rc<dyn EventSink>) -> Self {
        let interner = Interner::new();
        let names = Names::new(&interner);
        Self {
            interner,
            names,
            types: TypeRegistry::new(),
            functions: FunctionRegistry::new(),
            vars: VarTypes::new(),
            constructors: FxHashMap::default(),
            events,
            check_exhaustiveness: true,
        }
    }

    /// Intern a string through the container's interner
    pub fn intern(&self, text: &str) -> Symbol {
        self.interner.intern(text)
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::new()
    }
}
