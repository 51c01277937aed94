//! Execution context threaded through evaluation.

use crate::types::Datum;
use std::collections::HashMap;

/// Read-only view of the session an expression is evaluated in.
///
/// Implementations are shared by every worker evaluating rows of the same
/// statement and must not require external locking.
pub trait Context: Send + Sync {
    /// Database selected by the session, if any
    fn current_db(&self) -> Option<&str>;

    /// Value of a session variable, if set
    fn session_var(&self, name: &str) -> Option<Datum>;
}

/// Plain in-memory session
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    current_db: Option<String>,
    vars: HashMap<String, Datum>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_db(db: impl Into<String>) -> Self {
        Self {
            current_db: Some(db.into()),
            vars: HashMap::new(),
        }
    }

    pub fn set_var(&mut self, name: &str, value: Datum) {
        self.vars.insert(name.to_lowercase(), value);
    }
}

impl Context for SessionContext {
    fn current_db(&self) -> Option<&str> {
        self.current_db.as_deref()
    }

    fn session_var(&self, name: &str) -> Option<Datum> {
        self.vars.get(&name.to_lowercase()).cloned()
    }
}
