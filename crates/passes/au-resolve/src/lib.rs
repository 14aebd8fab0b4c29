//! Pipeline registries
//!
//! Three pieces of shared state, all owned by the services container and
//! mutated on a single call stack:
//!
//! * [`TypeRegistry`] — declared types and their members. Populated by
//!   declaration processing, read-only during body lowering.
//! * [`FunctionRegistry`] — function signatures, aliases, and module
//!   membership. Same lifecycle.
//! * [`VarTypes`] — lexically scoped local variable types, with the
//!   snapshot/restore discipline every scope-introducing construct obeys.

mod functions;
mod scope;
mod types;

pub use functions::{FunctionEntry, FunctionRegistry};
pub use scope::{VarTypes, VarTypesSnapshot};
pub use types::{TypeDefKind, TypeInfo, TypeRegistry};
