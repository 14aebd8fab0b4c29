//! Structured compile errors and lowering events
//!
//! Two error classes exist, and nothing else:
//!
//! * [`CompileError::User`] — a problem in the program being compiled.
//!   Carries a message and an optional [`Origin`] that is prefixed into the
//!   displayed message.
//! * [`CompileError::Internal`] — a defect in the compiler itself (a rule
//!   engine stage with no matching rule, a rule producing the wrong node
//!   kind). Displayed with an explicit `internal compiler defect` label so
//!   it can never be mistaken for a user error in tests.
//!
//! Both propagate by returning; there are no retries and no partial
//! results from a single lowering call.
//!
//! [`Event`]s are fire-and-forget observability records published through
//! an [`EventSink`]. Sinks must never influence lowering results.

use au_span::Origin;
use serde::Serialize;
use std::cell::RefCell;
use std::fmt;
use thiserror::Error;

/// Result alias used throughout the semantic core
pub type Result<T> = std::result::Result<T, CompileError>;

/// A compile-time error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// A problem in the user's program
    #[error("{}", format_user(.message, .origin.as_ref()))]
    User {
        /// What went wrong
        message: String,
        /// Where it went wrong, when known
        origin: Option<Origin>,
    },

    /// A defect inside the compiler
    #[error("internal compiler defect: {message}")]
    Internal {
        /// What broke, including the offending node kind
        message: String,
    },
}

fn format_user(message: &str, origin: Option<&Origin>) -> String {
    match origin {
        Some(origin) => format!("{origin}: {message}"),
        None => message.to_string(),
    }
}

impl CompileError {
    /// Create a user error with no origin
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
            origin: None,
        }
    }

    /// Create a user error at an origin
    pub fn user_at(message: impl Into<String>, origin: Option<Origin>) -> Self {
        Self::User {
            message: message.into(),
            origin,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// The origin attached to this error, if any
    pub fn origin(&self) -> Option<&Origin> {
        match self {
            Self::User { origin, .. } => origin.as_ref(),
            Self::Internal { .. } => None,
        }
    }

    /// Whether this is a compiler defect rather than a user error
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }
}

/// An observability event published during lowering
///
/// Names are pre-resolved to strings so events stay meaningful outside the
/// pipeline's interner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    /// A type compatibility check failed (the error is raised separately)
    TypeMismatch {
        /// What was being checked
        context: String,
        /// The expected type name
        expected: String,
        /// The actual type name
        actual: String,
    },
    /// A function body finished lowering
    FunctionLowered {
        /// Function name
        name: String,
        /// Effects attached to the lowered function
        effects: Vec<String>,
    },
    /// A match expression passed exhaustiveness analysis
    MatchChecked {
        /// Scrutinee type name
        scrutinee: String,
        /// Number of arms in the match
        arms: usize,
    },
}

/// Receiver for lowering events
///
/// Implementations must be fire-and-forget: publishing an event may never
/// change a lowering result.
pub trait EventSink {
    /// Receive one event
    fn emit(&self, event: Event);
}

/// Sink that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: Event) {}
}

/// Sink that buffers events in memory, for tests and tooling
#[derive(Debug, Default)]
pub struct MemorySink {
    events: RefCell<Vec<Event>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// Number of events received
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Whether no events have been received
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch {
                context,
                expected,
                actual,
            } => write!(f, "type mismatch in {context}: expected {expected}, got {actual}"),
            Self::FunctionLowered { name, effects } => {
                write!(f, "lowered function {name} [{}]", effects.join(", "))
            }
            Self::MatchChecked { scrutinee, arms } => {
                write!(f, "checked match on {scrutinee} ({arms} arms)")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use au_span::FileId;

    use super::*;

    #[test]
    fn user_error_prefixes_origin() {
        let error = CompileError::user_at(
            "Unknown identifier 'total'",
            Some(Origin::point(FileId(0), 4, 9)),
        );
        assert_eq!(
            error.to_string(),
            "line 4, column 9: Unknown identifier 'total'"
        );
    }

    #[test]
    fn user_error_without_origin_is_bare() {
        let error = CompileError::user("Cannot add string and i32");
        assert_eq!(error.to_string(), "Cannot add string and i32");
    }

    #[test]
    fn internal_error_is_labeled() {
        let error = CompileError::internal("no expression rule matched Lambda");
        assert!(error.is_internal());
        assert!(error.to_string().starts_with("internal compiler defect:"));
    }

    #[test]
    fn events_serialize_with_a_kind_tag() {
        let event = Event::FunctionLowered {
            name: "identity".into(),
            effects: vec!["comptime".into()],
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "function_lowered");
        assert_eq!(json["name"], "identity");
    }

    #[test]
    fn memory_sink_buffers_in_order() {
        let sink = MemorySink::new();
        sink.emit(Event::MatchChecked {
            scrutinee: "Shape".into(),
            arms: 3,
        });
        sink.emit(Event::FunctionLowered {
            name: "area".into(),
            effects: vec![],
        });
        assert_eq!(sink.len(), 2);
        assert!(matches!(sink.events()[0], Event::MatchChecked { .. }));
    }
}
