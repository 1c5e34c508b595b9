//! Variable representation for patterns and rule antecedents

use std::fmt;
use std::sync::Arc;

/// A variable in a statement pattern
///
/// Variables are distinguished from constants syntactically: a variable
/// named `x` renders as `?x`. The name is stored without the `?` sigil.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    name: Arc<str>,
}

impl Variable {
    /// Create a variable with the given name (without the `?` sigil)
    pub fn new(name: impl Into<String>) -> Self {
        Variable {
            name: name.into().into(),
        }
    }

    /// Get the variable name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.name)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.name)
    }
}
