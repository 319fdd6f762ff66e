//! Lexical scope table.
//!
//! A stack of name → binding frames. Frames push when a block or
//! function body is entered and pop on exit; lookup walks innermost-out.
//! The table lives only for the duration of one validation call.

use lux_ir::{ExpressionType, StructDescription, Variable};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::ErrorKind;

/// What a name can resolve to.
#[derive(Clone, PartialEq, Debug)]
pub enum Binding {
    Variable(Variable),
    Struct(StructDescription),
    Alias(ExpressionType),
}

/// Stack of lexical scopes.
#[derive(Debug)]
pub struct Scope {
    frames: Vec<FxHashMap<String, Binding>>,
}

impl Scope {
    /// New table with a single root frame.
    pub fn new() -> Self {
        Scope {
            frames: vec![FxHashMap::default()],
        }
    }

    /// Enter a nested scope.
    pub fn push(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    /// Leave the innermost scope, dropping its bindings.
    pub fn pop(&mut self) {
        debug_assert!(self.frames.len() > 1, "cannot pop the root scope");
        self.frames.pop();
    }

    /// Bind a name in the innermost scope, shadowing outer bindings.
    pub fn declare(&mut self, name: impl Into<String>, binding: Binding) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.into(), binding);
        }
    }

    /// Resolve a name, innermost scope first.
    pub fn find_identifier(&self, name: &str) -> Option<&Binding> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Resolve alias indirections until a concrete type is reached.
    ///
    /// A `Named` type bound to an alias is unwrapped repeatedly; chains
    /// are legal, cycles are not. A `Named` type bound to anything else
    /// (or to nothing) is returned unchanged; the caller decides whether
    /// an unresolved name is an error.
    pub fn resolve_alias(&self, ty: ExpressionType) -> Result<ExpressionType, ErrorKind> {
        let mut current = ty;
        let mut seen: FxHashSet<String> = FxHashSet::default();

        loop {
            let name = match &current {
                ExpressionType::Named(name) => name.clone(),
                _ => return Ok(current),
            };

            match self.find_identifier(&name) {
                Some(Binding::Alias(aliased)) => {
                    if !seen.insert(name.clone()) {
                        return Err(ErrorKind::AliasCycle(name));
                    }
                    current = aliased.clone();
                }
                _ => return Ok(current),
            }
        }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}
