//! The lowerer: services plus traversal state
//!
//! Owns the services container and the small stacks of ambient context a
//! traversal needs (type parameters in scope, the enclosing function's
//! return type). Visitors and rules are all methods on, or receive, this
//! one object — there is no hidden state anywhere else.

use crate::engine::RuleEngine;
use crate::services::Services;
use au_diag::{Event, Result};
use au_intern::Symbol;
use au_sir::{describe, Type, TypeParam};
use au_span::Origin;
use std::rc::Rc;

/// The lowering driver
pub struct Lowerer {
    /// Shared services
    pub services: Services,
    engine: Rc<RuleEngine>,
    type_params: Vec<TypeParam>,
    type_param_frames: Vec<usize>,
    return_types: Vec<Type>,
}

impl Lowerer {
    /// Create a lowerer over a services container
    pub fn new(services: Services, engine: Rc<RuleEngine>) -> Self {
        Self {
            services,
            engine,
            type_params: Vec::new(),
            type_param_frames: Vec::new(),
            return_types: Vec::new(),
        }
    }

    /// The engine handle (cheap clone; the rule lists are immutable)
    pub fn engine(&self) -> Rc<RuleEngine> {
        Rc::clone(&self.engine)
    }

    /// Run `f` inside a variable scope
    ///
    /// Snapshots the variable registry before `f` binds anything and
    /// restores it afterwards on **both** exit paths, so no binding ever
    /// leaks outward and no failed lowering corrupts the enclosing scope.
    pub fn with_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let snapshot = self.services.vars.snapshot();
        let result = f(self);
        self.services.vars.restore(snapshot);
        result
    }

    /// Run `f` with additional type parameters in scope
    pub fn with_type_params<T>(
        &mut self,
        params: &[TypeParam],
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.type_param_frames.push(self.type_params.len());
        self.type_params.extend_from_slice(params);
        let result = f(self);
        let mark = self.type_param_frames.pop().unwrap_or(0);
        self.type_params.truncate(mark);
        result
    }

    /// Type parameters currently in scope, innermost last
    pub fn current_type_params(&self) -> &[TypeParam] {
        &self.type_params
    }

    /// Find an in-scope type parameter by name, innermost first
    pub fn find_type_param(&self, name: Symbol) -> Option<&TypeParam> {
        self.type_params.iter().rev().find(|param| param.name == name)
    }

    /// Run `f` with a declared function return type in scope
    pub fn with_return_type<T>(
        &mut self,
        ret: Type,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.return_types.push(ret);
        let result = f(self);
        self.return_types.pop();
        result
    }

    /// The enclosing function's declared return type, if inside one
    pub fn current_return_type(&self) -> Option<&Type> {
        self.return_types.last()
    }

    /// Compatibility check that also publishes a mismatch event
    ///
    /// The event is observability only; the returned error is what
    /// affects lowering.
    pub fn ensure_compatible(
        &self,
        actual: &Type,
        expected: &Type,
        context: &str,
        origin: Option<&Origin>,
    ) -> Result<()> {
        let result = au_ty::ensure_compatible(
            actual,
            expected,
            context,
            origin,
            &self.services.names,
            &self.services.interner,
        );
        if result.is_err() {
            self.services.events.emit(Event::TypeMismatch {
                context: context.to_string(),
                expected: describe(expected, &self.services.interner),
                actual: describe(actual, &self.services.interner),
            });
        }
        result
    }

    /// Boolean check with the lowering crate's ambient context
    pub fn ensure_boolean(&self, ty: &Type, context: &str, origin: Option<&Origin>) -> Result<()> {
        au_ty::ensure_boolean(
            ty,
            context,
            origin,
            &self.services.names,
            &self.services.interner,
        )
    }

    /// Resolve a symbol for an error message
    pub fn resolve(&self, name: Symbol) -> String {
        self.services.interner.resolve(name)
    }

    /// Describe a type for an error message
    pub fn describe(&self, ty: &Type) -> String {
        describe(ty, &self.services.interner)
    }
}
