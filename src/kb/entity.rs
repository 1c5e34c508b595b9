//! Knowledge base entities and the handles that address them
//!
//! Facts and rules reference each other both ways (a derived item points at
//! its justifications, a justifying item points at its dependents), so the
//! support graph is cyclic. Entities therefore live in the knowledge base's
//! arenas and link to each other through stable opaque handles rather than
//! owned references.

use std::fmt;

use indexmap::IndexSet;

use crate::term::Statement;

/// Stable handle for a fact in the knowledge base
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FactId(pub(crate) u32);

impl fmt::Debug for FactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", self.0)
    }
}

/// Stable handle for a rule in the knowledge base
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub(crate) u32);

impl fmt::Debug for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// A justification pair: the fact and rule whose combination produced a
/// derived item
///
/// A derived item carries one `Support` per distinct derivation path that
/// produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Support {
    /// The justifying fact
    pub fact: FactId,
    /// The justifying rule
    pub rule: RuleId,
}

/// A fact held in the knowledge base
///
/// A fact is asserted (user-stated, permanent until explicitly retracted),
/// derived (exists only while `supported_by` is non-empty), or both at once:
/// an asserted fact may separately be derivable, and retracting its assertion
/// must not remove it while derivation support remains.
#[derive(Clone, Debug)]
pub struct Fact {
    pub(crate) statement: Statement,
    pub(crate) asserted: bool,
    pub(crate) supported_by: Vec<Support>,
    pub(crate) supports_facts: IndexSet<FactId>,
    pub(crate) supports_rules: IndexSet<RuleId>,
}

impl Fact {
    /// Create an externally-asserted fact
    pub(crate) fn asserted(statement: Statement) -> Self {
        Fact {
            statement,
            asserted: true,
            supported_by: Vec::new(),
            supports_facts: IndexSet::new(),
            supports_rules: IndexSet::new(),
        }
    }

    /// Create a fact derived from a justification pair
    pub(crate) fn derived(statement: Statement, support: Support) -> Self {
        Fact {
            statement,
            asserted: false,
            supported_by: vec![support],
            supports_facts: IndexSet::new(),
            supports_rules: IndexSet::new(),
        }
    }

    /// The statement this fact holds
    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    /// Whether this fact was externally asserted
    pub fn is_asserted(&self) -> bool {
        self.asserted
    }

    /// Whether this fact has at least one derivation justification
    pub fn is_supported(&self) -> bool {
        !self.supported_by.is_empty()
    }

    /// The justification pairs supporting this fact
    pub fn supported_by(&self) -> &[Support] {
        &self.supported_by
    }

    /// Facts derived using this fact as a justifying premise
    pub fn supports_facts(&self) -> impl Iterator<Item = FactId> + '_ {
        self.supports_facts.iter().copied()
    }

    /// Rules derived using this fact as a justifying premise
    pub fn supports_rules(&self) -> impl Iterator<Item = RuleId> + '_ {
        self.supports_rules.iter().copied()
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.statement)
    }
}

/// An implication rule held in the knowledge base
///
/// Antecedents are conjunctive. Rules always carry at least one antecedent;
/// firing against a fact consumes the first antecedent, so a rule is
/// progressively specialized until a single antecedent remains, at which
/// point a further successful match yields a fact.
#[derive(Clone, Debug)]
pub struct Rule {
    pub(crate) lhs: Vec<Statement>,
    pub(crate) rhs: Statement,
    pub(crate) asserted: bool,
    pub(crate) supported_by: Vec<Support>,
    pub(crate) supports_facts: IndexSet<FactId>,
    pub(crate) supports_rules: IndexSet<RuleId>,
}

impl Rule {
    /// Create an externally-asserted rule
    pub(crate) fn asserted(lhs: Vec<Statement>, rhs: Statement) -> Self {
        Rule {
            lhs,
            rhs,
            asserted: true,
            supported_by: Vec::new(),
            supports_facts: IndexSet::new(),
            supports_rules: IndexSet::new(),
        }
    }

    /// Create a specialized rule derived from a justification pair
    pub(crate) fn derived(lhs: Vec<Statement>, rhs: Statement, support: Support) -> Self {
        Rule {
            lhs,
            rhs,
            asserted: false,
            supported_by: vec![support],
            supports_facts: IndexSet::new(),
            supports_rules: IndexSet::new(),
        }
    }

    /// The conjunctive antecedents
    pub fn lhs(&self) -> &[Statement] {
        &self.lhs
    }

    /// The consequent
    pub fn rhs(&self) -> &Statement {
        &self.rhs
    }

    /// Whether this rule was externally asserted
    pub fn is_asserted(&self) -> bool {
        self.asserted
    }

    /// Whether this rule has at least one derivation justification
    pub fn is_supported(&self) -> bool {
        !self.supported_by.is_empty()
    }

    /// The justification pairs supporting this rule
    pub fn supported_by(&self) -> &[Support] {
        &self.supported_by
    }

    /// Facts derived using this rule
    pub fn supports_facts(&self) -> impl Iterator<Item = FactId> + '_ {
        self.supports_facts.iter().copied()
    }

    /// Rules derived using this rule
    pub fn supports_rules(&self) -> impl Iterator<Item = RuleId> + '_ {
        self.supports_rules.iter().copied()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, antecedent) in self.lhs.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", antecedent)?;
        }
        write!(f, " => {}", self.rhs)
    }
}
