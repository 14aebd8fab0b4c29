//! String interning for names
//!
//! Every identifier, type name, and member name in the pipeline is a
//! [`Symbol`]. The pipeline is single-threaded by design, so the interner
//! is a shared single-threaded [`lasso::Rodeo`] — clones are cheap handles
//! onto the same pool.

pub use lasso::Spur as Symbol;

use lasso::Rodeo;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared string interner
#[derive(Clone)]
pub struct Interner {
    inner: Rc<RefCell<Rodeo>>,
}

impl Interner {
    /// Create an empty interner
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Rodeo::new())),
        }
    }

    /// Intern a string, returning its symbol
    pub fn intern(&self, text: &str) -> Symbol {
        self.inner.borrow_mut().get_or_intern(text)
    }

    /// Look up a string without interning it
    pub fn get(&self, text: &str) -> Option<Symbol> {
        self.inner.borrow().get(text)
    }

    /// Resolve a symbol back to its string
    pub fn resolve(&self, sym: Symbol) -> String {
        self.inner.borrow().resolve(&sym).to_string()
    }

    /// Resolve a symbol, returning `None` for symbols from another pool
    pub fn try_resolve(&self, sym: Symbol) -> Option<String> {
        self.inner
            .borrow()
            .try_resolve(&sym)
            .map(ToString::to_string)
    }

    /// Number of interned strings
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Whether the interner is empty
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_is_idempotent() {
        let interner = Interner::new();
        let a = interner.intern("total");
        let b = interner.intern("total");
        assert_eq!(a, b);
        assert_eq!(interner.resolve(a), "total");
    }

    #[test]
    fn clones_share_the_pool() {
        let interner = Interner::new();
        let clone = interner.clone();
        let sym = clone.intern("shared");
        assert_eq!(interner.get("shared"), Some(sym));
    }
}
