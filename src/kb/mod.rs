//! Knowledge base: fact and rule storage with provenance tracking
//!
//! The knowledge base owns two insertion-ordered collections of entities,
//! dispatches every addition to the inference engine, answers pattern
//! queries, and removes derived knowledge whose support has vanished when
//! an assertion is withdrawn (truth maintenance).
//!
//! Entities are addressed by stable handles ([`FactId`], [`RuleId`]) and
//! reachable only through the knowledge base's collections or through
//! another entity's support links; nothing outside the knowledge base
//! aliases them.

use std::fmt;

use fnv::FnvHashMap;
use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;

use crate::config::KbConfig;
use crate::error::{KbError, KbResult};
use crate::infer::InferenceEngine;
use crate::term::{Bindings, Statement, Term};
use crate::unify::match_statement;

mod entity;

pub use entity::{Fact, FactId, Rule, RuleId, Support};

/// One result of a query: a binding set and the facts it was obtained from
#[derive(Clone, Debug)]
pub struct QueryAnswer {
    /// Variable bindings produced by unifying the query with the facts
    pub bindings: Bindings,
    /// The matched facts
    pub facts: Vec<FactId>,
}

/// Counts describing the current knowledge base contents
#[derive(Clone, Debug, Default, Serialize)]
pub struct KbStats {
    /// Total facts
    pub facts: usize,
    /// Facts that are externally asserted
    pub asserted_facts: usize,
    /// Facts with at least one derivation justification
    pub derived_facts: usize,
    /// Total rules
    pub rules: usize,
    /// Rules that are externally asserted
    pub asserted_rules: usize,
    /// Rules with at least one derivation justification
    pub derived_rules: usize,
}

/// A forward-chaining knowledge base with dependency-directed retraction
pub struct KnowledgeBase {
    /// Live facts, in insertion order
    pub(crate) facts: IndexMap<FactId, Fact>,
    /// Live rules, in insertion order
    pub(crate) rules: IndexMap<RuleId, Rule>,
    /// Structural lookup from statement to its canonical fact
    pub(crate) fact_index: FnvHashMap<Statement, FactId>,
    pub(crate) next_fact: u32,
    pub(crate) next_rule: u32,
    pub(crate) engine: InferenceEngine,
    pub(crate) config: KbConfig,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::with_config(KbConfig::default())
    }
}

impl KnowledgeBase {
    /// Create an empty knowledge base with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty knowledge base with the given configuration
    pub fn with_config(config: KbConfig) -> Self {
        KnowledgeBase {
            facts: IndexMap::new(),
            rules: IndexMap::new(),
            fact_index: FnvHashMap::default(),
            next_fact: 0,
            next_rule: 0,
            engine: InferenceEngine::default(),
            config,
        }
    }

    /// The active configuration
    pub fn config(&self) -> &KbConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Assertion
    // ------------------------------------------------------------------

    /// Assert a fact, chaining it against every rule to the fix point
    ///
    /// Asserting a statement structurally equal to a stored fact does not
    /// insert a duplicate; the stored fact is marked asserted instead.
    /// Returns the handle of the canonical fact.
    pub fn assert_fact(&mut self, statement: Statement) -> FactId {
        debug!("asserting fact {}", statement);
        let id = self.add_fact(Fact::asserted(statement));
        self.run_agenda();
        id
    }

    /// Assert a rule, chaining every fact against it to the fix point
    ///
    /// The antecedent list must be non-empty. Asserting a structurally
    /// duplicate rule marks the stored rule asserted instead of inserting.
    pub fn assert_rule(&mut self, lhs: Vec<Statement>, rhs: Statement) -> KbResult<RuleId> {
        if lhs.is_empty() {
            return Err(KbError::EmptyAntecedent(rhs));
        }
        debug!("asserting rule with {} antecedents => {}", lhs.len(), rhs);
        let id = self.add_rule(Rule::asserted(lhs, rhs));
        self.run_agenda();
        Ok(id)
    }

    /// Add a fact, merging provenance into an existing structural duplicate
    ///
    /// A structurally-new fact is inserted and scheduled against every
    /// rule. For a duplicate, unseen justification pairs are appended to
    /// the stored fact, or the stored fact is marked asserted when the
    /// incoming one carries no support.
    pub(crate) fn add_fact(&mut self, fact: Fact) -> FactId {
        if let Some(&id) = self.fact_index.get(&fact.statement) {
            if let Some(existing) = self.facts.get_mut(&id) {
                if fact.supported_by.is_empty() {
                    existing.asserted = true;
                } else {
                    for support in fact.supported_by {
                        if !existing.supported_by.contains(&support) {
                            existing.supported_by.push(support);
                        }
                    }
                }
            }
            return id;
        }

        let id = self.insert_fact(fact);
        self.schedule_fact(id);
        id
    }

    /// Add a rule, merging provenance into an existing structural duplicate
    pub(crate) fn add_rule(&mut self, rule: Rule) -> RuleId {
        if let Some(id) = self.find_rule(&rule.lhs, &rule.rhs) {
            if let Some(existing) = self.rules.get_mut(&id) {
                if rule.supported_by.is_empty() {
                    existing.asserted = true;
                } else {
                    for support in rule.supported_by {
                        if !existing.supported_by.contains(&support) {
                            existing.supported_by.push(support);
                        }
                    }
                }
            }
            return id;
        }

        let id = self.insert_rule(rule);
        self.schedule_rule(id);
        id
    }

    /// Insert a fact without duplicate checking
    pub(crate) fn insert_fact(&mut self, fact: Fact) -> FactId {
        let id = FactId(self.next_fact);
        self.next_fact += 1;
        self.fact_index.insert(fact.statement.clone(), id);
        self.facts.insert(id, fact);
        id
    }

    /// Insert a rule without duplicate checking
    pub(crate) fn insert_rule(&mut self, rule: Rule) -> RuleId {
        let id = RuleId(self.next_rule);
        self.next_rule += 1;
        self.rules.insert(id, rule);
        id
    }

    /// Find the rule structurally equal to the given antecedents/consequent
    pub(crate) fn find_rule(&self, lhs: &[Statement], rhs: &Statement) -> Option<RuleId> {
        self.rules
            .iter()
            .find(|(_, rule)| rule.lhs == lhs && &rule.rhs == rhs)
            .map(|(&id, _)| id)
    }

    // ------------------------------------------------------------------
    // Query
    // ------------------------------------------------------------------

    /// Ask a pattern query against the stored facts
    ///
    /// The query must be a statement term; constants and bare variables are
    /// not fact patterns and are rejected as [`KbError::InvalidQuery`].
    /// Every fact whose statement unifies with the query contributes one
    /// answer, in fact insertion order. Read-only.
    pub fn ask(&self, query: &Term) -> KbResult<Vec<QueryAnswer>> {
        let Some(pattern) = query.as_statement() else {
            warn!("invalid ask: {}", query);
            return Err(KbError::InvalidQuery(query.clone()));
        };

        let mut answers = Vec::new();
        for (&id, fact) in &self.facts {
            if let Some(bindings) = match_statement(pattern, &fact.statement) {
                answers.push(QueryAnswer {
                    bindings,
                    facts: vec![id],
                });
            }
        }
        Ok(answers)
    }

    // ------------------------------------------------------------------
    // Retraction
    // ------------------------------------------------------------------

    /// Withdraw the assertion of a fact, cascading removal of any derived
    /// knowledge left without support
    ///
    /// The canonical stored fact is located by structural equality. If the
    /// fact still has a derivation justification it survives as a derived
    /// fact; otherwise it is excised together with every dependent fact or
    /// rule whose last justification it carried. Rules are not externally
    /// retractable; unsupported dependent rules are simply removed.
    pub fn retract(&mut self, statement: &Statement) -> KbResult<()> {
        let Some(&id) = self.fact_index.get(statement) else {
            warn!("retract of unknown fact {}", statement);
            return Err(KbError::UnknownFact(statement.clone()));
        };
        debug!("retracting {}", statement);

        let still_supported = match self.facts.get_mut(&id) {
            Some(fact) => {
                fact.asserted = false;
                fact.is_supported()
            }
            None => return Ok(()),
        };

        if !still_supported {
            self.excise_fact(id);
        }
        Ok(())
    }

    /// Remove a completely unsupported fact and cascade through its
    /// dependents
    fn excise_fact(&mut self, id: FactId) {
        let Some(fact) = self.facts.get(&id) else {
            return;
        };
        let statement = fact.statement.clone();
        let dependent_facts: Vec<FactId> = fact.supports_facts.iter().copied().collect();
        let dependent_rules: Vec<RuleId> = fact.supports_rules.iter().copied().collect();

        for dep in dependent_facts {
            if self.drop_fact_support(dep, id, &statement) {
                self.excise_fact(dep);
            }
        }
        for dep in dependent_rules {
            if self.drop_rule_support(dep, id, &statement) {
                self.rules.shift_remove(&dep);
            }
        }

        self.fact_index.remove(&statement);
        self.facts.shift_remove(&id);
    }

    /// Drop from a dependent fact every justification pair invalidated by
    /// the retraction; returns whether the dependent is now removable
    fn drop_fact_support(&mut self, dep: FactId, retracted: FactId, statement: &Statement) -> bool {
        let retained = {
            let Some(dependent) = self.facts.get(&dep) else {
                return false;
            };
            debug_assert!(
                dependent.supported_by.iter().any(|s| s.fact == retracted),
                "dependent {:?} has no justification pair for {:?}",
                dep,
                retracted
            );
            self.retained_support(&dependent.supported_by, retracted, statement)
        };

        match self.facts.get_mut(&dep) {
            Some(dependent) => {
                dependent.supported_by = retained;
                !dependent.is_supported() && !dependent.asserted
            }
            None => false,
        }
    }

    /// Rule-side counterpart of [`Self::drop_fact_support`]
    fn drop_rule_support(&mut self, dep: RuleId, retracted: FactId, statement: &Statement) -> bool {
        let retained = {
            let Some(dependent) = self.rules.get(&dep) else {
                return false;
            };
            debug_assert!(
                dependent.supported_by.iter().any(|s| s.fact == retracted),
                "dependent {:?} has no justification pair for {:?}",
                dep,
                retracted
            );
            self.retained_support(&dependent.supported_by, retracted, statement)
        };

        match self.rules.get_mut(&dep) {
            Some(dependent) => {
                dependent.supported_by = retained;
                !dependent.is_supported() && !dependent.asserted
            }
            None => false,
        }
    }

    /// Keep the justification pairs that survive retracting `retracted`
    ///
    /// Pairs naming the retracted fact go away. With
    /// [`KbConfig::prune_matching_support`] enabled, so does any pair whose
    /// rule's first antecedent still unifies with the retracted statement,
    /// even if the pair names a different premise fact.
    fn retained_support(
        &self,
        supports: &[Support],
        retracted: FactId,
        statement: &Statement,
    ) -> Vec<Support> {
        let prune = self.config.prune_matching_support;
        supports
            .iter()
            .copied()
            .filter(|s| s.fact != retracted && !(prune && self.rule_head_matches(s.rule, statement)))
            .collect()
    }

    /// Whether a rule's first antecedent unifies with the given statement
    fn rule_head_matches(&self, rule: RuleId, statement: &Statement) -> bool {
        self.rules
            .get(&rule)
            .and_then(|r| r.lhs.first())
            .map(|head| match_statement(head, statement).is_some())
            .unwrap_or(false)
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Iterate over the stored facts in insertion order
    pub fn facts(&self) -> impl Iterator<Item = (FactId, &Fact)> {
        self.facts.iter().map(|(&id, fact)| (id, fact))
    }

    /// Iterate over the stored rules in insertion order
    pub fn rules(&self) -> impl Iterator<Item = (RuleId, &Rule)> {
        self.rules.iter().map(|(&id, rule)| (id, rule))
    }

    /// Get a fact by handle
    pub fn get_fact(&self, id: FactId) -> Option<&Fact> {
        self.facts.get(&id)
    }

    /// Get a rule by handle
    pub fn get_rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(&id)
    }

    /// Check whether a structurally-equal fact is stored
    pub fn contains_fact(&self, statement: &Statement) -> bool {
        self.fact_index.contains_key(statement)
    }

    /// Number of stored facts
    pub fn fact_count(&self) -> usize {
        self.facts.len()
    }

    /// Number of stored rules
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Check if the knowledge base holds no facts and no rules
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty() && self.rules.is_empty()
    }

    /// Counts of asserted and derived contents
    pub fn stats(&self) -> KbStats {
        KbStats {
            facts: self.facts.len(),
            asserted_facts: self.facts.values().filter(|f| f.asserted).count(),
            derived_facts: self.facts.values().filter(|f| f.is_supported()).count(),
            rules: self.rules.len(),
            asserted_rules: self.rules.values().filter(|r| r.asserted).count(),
            derived_rules: self.rules.values().filter(|r| r.is_supported()).count(),
        }
    }
}

impl fmt::Debug for KnowledgeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "KnowledgeBase {{")?;
        for fact in self.facts.values() {
            writeln!(f, "  {}", fact)?;
        }
        for rule in self.rules.values() {
            writeln!(f, "  {}", rule)?;
        }
        write!(f, "}}")
    }
}
