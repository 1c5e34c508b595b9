//! Term and statement representations
//!
//! This module defines the core data types the engine works over:
//! - Constants (symbols)
//! - Variables (pattern placeholders, see [`Variable`])
//! - Statements (a predicate applied to ordered argument terms)
//!
//! Terms are immutable values; equality and hashing are structural.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

mod variable;

pub use variable::Variable;

/// A term: constant, variable, or compound statement
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// A constant symbol
    Constant(Arc<str>),
    /// A variable (for patterns/rules)
    Variable(Variable),
    /// A nested compound statement
    Statement(Arc<Statement>),
}

impl Term {
    /// Create a constant term
    pub fn constant(s: impl Into<String>) -> Self {
        Term::Constant(s.into().into())
    }

    /// Create a variable term
    pub fn variable(name: impl Into<String>) -> Self {
        Term::Variable(Variable::new(name))
    }

    /// Create a nested statement term
    pub fn statement(statement: Statement) -> Self {
        Term::Statement(Arc::new(statement))
    }

    /// Check if this term is a variable
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    /// Check if this term is ground (contains no variables)
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Constant(_) => true,
            Term::Variable(_) => false,
            Term::Statement(s) => s.is_ground(),
        }
    }

    /// Get the constant symbol if this is a constant term
    pub fn as_constant(&self) -> Option<&str> {
        match self {
            Term::Constant(c) => Some(c),
            _ => None,
        }
    }

    /// Get the statement if this is a statement term
    pub fn as_statement(&self) -> Option<&Statement> {
        match self {
            Term::Statement(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Constant(c) => write!(f, "{}", c),
            Term::Variable(v) => write!(f, "{:?}", v),
            Term::Statement(s) => write!(f, "{:?}", s),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Constant(c) => write!(f, "{}", c),
            Term::Variable(v) => write!(f, "{}", v),
            Term::Statement(s) => write!(f, "{}", s),
        }
    }
}

/// A statement: a predicate applied to ordered argument terms
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Statement {
    /// The predicate name
    pub predicate: Arc<str>,
    /// The ordered arguments
    pub args: Vec<Term>,
}

impl Statement {
    pub fn new(predicate: impl Into<String>, args: Vec<Term>) -> Self {
        Statement {
            predicate: predicate.into().into(),
            args,
        }
    }

    /// Number of arguments
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Check if this statement contains any variables
    pub fn has_variables(&self) -> bool {
        !self.is_ground()
    }

    /// Check if this statement is ground (no variables)
    pub fn is_ground(&self) -> bool {
        self.args.iter().all(|t| t.is_ground())
    }
}

impl fmt::Debug for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.predicate)?;
        for arg in &self.args {
            write!(f, " {:?}", arg)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.predicate)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        write!(f, ")")
    }
}

/// Bindings from variables to terms, in accumulation order
pub type Bindings = IndexMap<Variable, Term>;

/// Apply bindings to a term, substituting bound variables
///
/// Unbound variables are left intact.
pub fn substitute(term: &Term, bindings: &Bindings) -> Term {
    match term {
        Term::Variable(v) => bindings.get(v).cloned().unwrap_or_else(|| term.clone()),
        Term::Statement(s) => Term::Statement(Arc::new(instantiate(s, bindings))),
        Term::Constant(_) => term.clone(),
    }
}

/// Apply bindings to a statement, substituting every bound variable occurrence
pub fn instantiate(statement: &Statement, bindings: &Bindings) -> Statement {
    Statement {
        predicate: statement.predicate.clone(),
        args: statement
            .args
            .iter()
            .map(|t| substitute(t, bindings))
            .collect(),
    }
}

/// Apply bindings to a list of statements
pub fn instantiate_all(statements: &[Statement], bindings: &Bindings) -> Vec<Statement> {
    statements.iter().map(|s| instantiate(s, bindings)).collect()
}
