//! Type algebra and generic call resolution
//!
//! Pure functions over [`au_sir::Type`] values: equivalence, substitution,
//! unification, positional generic-parameter inference, operator typing,
//! compatibility checking, and the constraint solver that instantiates
//! generic calls (with bidirectional inference from an expected return
//! type).
//!
//! Nothing in this crate owns state. Functions that need well-known names
//! or must render types into error messages take the pipeline's
//! [`au_sir::Names`] and [`au_intern::Interner`] explicitly.

mod compat;
mod equiv;
mod generics;
mod ops;
mod predicates;
mod solver;
mod subst;
mod unify;

pub use compat::{ensure_boolean, ensure_compatible, ensure_numeric, is_type_param_like};
pub use equiv::{equivalent, equivalent_opt};
pub use generics::infer_substitutions;
pub use ops::{infer_binary_type, infer_unary_type, TyCx};
pub use predicates::{is_float, is_integer, is_numeric, is_string, is_unit_like};
pub use solver::{instantiate, Instantiation};
pub use subst::{substitute, Subst};
pub use unify::unify;
