//! Variable scope management for inference and emission.
//!
//! The environment is an explicit stack of scopes threaded through the
//! traversal; scope entry/exit is a `push_*`/`pop` pair on every path,
//! including early error returns. A scope copied with [`TypeEnv::push_snapshot`]
//! carries its parent's bindings down, so lookups only ever consult the top
//! scope; mutations inside a branch or loop body die with the scope on `pop`
//! while reads of outer bindings keep working.

use crate::types::Type;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Errors from scope operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// The name is already bound in the top scope.
    #[error("'{0}' is already bound in this scope")]
    DuplicateBinding(String),
    /// The name is not bound in the top scope.
    #[error("'{0}' is not bound")]
    NotFound(String),
}

/// One scope's variable bindings.
#[derive(Debug, Clone, Default)]
struct Scope {
    vars: FxHashMap<String, Type>,
}

/// A stack of variable scopes.
#[derive(Debug)]
pub struct TypeEnv {
    scopes: Vec<Scope>,
}

impl TypeEnv {
    /// Create an environment with a single root scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    /// Enter a fresh, empty scope (a function or pattern body, which does
    /// not see the caller's variables).
    pub fn push_fresh(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Enter a copy of the current scope (a branch, loop, or lambda body,
    /// which reads outer bindings but whose own bindings are discarded on
    /// exit).
    pub fn push_snapshot(&mut self) {
        let top = self.scopes.last().cloned().unwrap_or_default();
        self.scopes.push(top);
    }

    /// Leave the current scope. The root scope is never popped.
    pub fn pop(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Current scope depth (1 = root only).
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Bind a new name in the top scope.
    ///
    /// Fails if the name is already bound there.
    pub fn declare(&mut self, name: &str, ty: Type) -> Result<(), ScopeError> {
        let top = match self.scopes.last_mut() {
            Some(scope) => scope,
            None => return Ok(()),
        };
        if top.vars.contains_key(name) {
            return Err(ScopeError::DuplicateBinding(name.to_string()));
        }
        top.vars.insert(name.to_string(), ty);
        Ok(())
    }

    /// Bind or re-type a name in the top scope.
    ///
    /// Assignment creates the variable on first use and overwrites its type
    /// on later assignments.
    pub fn assign(&mut self, name: &str, ty: Type) {
        if let Some(top) = self.scopes.last_mut() {
            top.vars.insert(name.to_string(), ty);
        }
    }

    /// Look up a name in the top scope only.
    ///
    /// Outer bindings are visible because snapshot scopes copy them down;
    /// lookups never chain upward dynamically.
    pub fn get(&self, name: &str) -> Option<&Type> {
        self.scopes.last().and_then(|scope| scope.vars.get(name))
    }

    /// Look up a name, failing if it is not bound.
    pub fn lookup(&self, name: &str) -> Result<&Type, ScopeError> {
        self.get(name)
            .ok_or_else(|| ScopeError::NotFound(name.to_string()))
    }
}

impl Default for TypeEnv {
    fn default() -> Self {
        Self::new()
    }
}
