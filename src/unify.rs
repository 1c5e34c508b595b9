//! Unification of statements and statement lists
//!
//! Matching produces a consistent set of variable bindings or fails.
//! Failure is the normal negative result, reported as `None` and never
//! as an error or panic.
//!
//! The engine always matches a rule antecedent (the pattern, carrying the
//! variables that instantiation later substitutes) against a fact statement
//! (the source of ground values). A variable on either side binds, so
//! partially ground facts match as well.

use crate::term::{Bindings, Statement, Term, Variable};

/// Try to unify a single pattern term with a source term under the
/// accumulating bindings
fn match_terms(pattern: &Term, source: &Term, bindings: &mut Bindings) -> bool {
    match (pattern, source) {
        (Term::Variable(var), other) | (other, Term::Variable(var)) => {
            bind_variable(var, other, bindings)
        }
        (Term::Constant(a), Term::Constant(b)) => a == b,
        (Term::Statement(a), Term::Statement(b)) => match_into(a, b, bindings),
        _ => false,
    }
}

/// Bind a variable to a value, or check consistency with its existing binding
fn bind_variable(var: &Variable, value: &Term, bindings: &mut Bindings) -> bool {
    if let Term::Variable(v) = value {
        if v == var {
            return true;
        }
    }
    match bindings.get(var) {
        Some(existing) => existing == value,
        None => {
            bindings.insert(var.clone(), value.clone());
            true
        }
    }
}

/// Unify two statements into an existing binding set
fn match_into(pattern: &Statement, source: &Statement, bindings: &mut Bindings) -> bool {
    if pattern.predicate != source.predicate || pattern.arity() != source.arity() {
        return false;
    }
    pattern
        .args
        .iter()
        .zip(source.args.iter())
        .all(|(p, s)| match_terms(p, s, bindings))
}

/// Unify two statements, producing a binding set on success
pub fn match_statement(pattern: &Statement, source: &Statement) -> Option<Bindings> {
    match_statement_with(pattern, source, Bindings::default())
}

/// Unify two statements, seeded with bindings accumulated so far
pub fn match_statement_with(
    pattern: &Statement,
    source: &Statement,
    mut bindings: Bindings,
) -> Option<Bindings> {
    if match_into(pattern, source, &mut bindings) {
        Some(bindings)
    } else {
        None
    }
}

/// Unify two statement lists pairwise, left to right
///
/// Bindings produced by earlier pairs constrain later pairs. Any pairwise
/// failure (including a length mismatch) aborts the whole match.
pub fn match_statements(patterns: &[Statement], sources: &[Statement]) -> Option<Bindings> {
    if patterns.len() != sources.len() {
        return None;
    }

    let mut bindings = Bindings::default();
    for (pattern, source) in patterns.iter().zip(sources.iter()) {
        bindings = match_statement_with(pattern, source, bindings)?;
    }
    Some(bindings)
}
