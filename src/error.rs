//! Error types for knowledge base operations
//!
//! Unification failure is not represented here: it is the unifier's normal
//! negative answer and travels as `Option::None`. The variants below cover
//! conditions a caller can observe and react to; none of them is fatal.

use thiserror::Error;

use crate::term::{Statement, Term};

/// A specialized `Result` type for knowledge base operations.
pub type KbResult<T> = std::result::Result<T, KbError>;

/// Conditions reported by knowledge base operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KbError {
    /// A query term was not a well-formed positive fact pattern.
    #[error("invalid query: {0} is not a fact pattern")]
    InvalidQuery(Term),

    /// A retraction named a fact with no structurally-equal counterpart
    /// in the knowledge base.
    #[error("cannot retract unknown fact {0}")]
    UnknownFact(Statement),

    /// A rule was defined with an empty antecedent list.
    #[error("rule {0} has no antecedents")]
    EmptyAntecedent(Statement),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KbError::InvalidQuery(Term::constant("ball"));
        assert!(err.to_string().contains("ball"));

        let err = KbError::UnknownFact(Statement::new("color", vec![Term::constant("ball")]));
        assert!(err.to_string().contains("(color ball)"));
    }
}
