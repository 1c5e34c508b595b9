//! Forward-chaining inference engine
//!
//! Combines one fact with one rule's first antecedent at a time. Each
//! successful firing either fully satisfies a single-antecedent rule
//! (producing a derived fact) or specializes a multi-antecedent rule
//! (producing a derived rule with one antecedent consumed).
//!
//! The fix point is computed over an explicit agenda of (fact, rule) tasks
//! rather than by recursing while the collections grow: every addition
//! schedules the pairings it makes possible, and the agenda is drained
//! until empty. Termination holds because each firing strictly shrinks the
//! antecedent list and structurally-duplicate conclusions are suppressed
//! instead of re-derived.

use std::collections::VecDeque;

use log::{debug, trace, warn};
use serde::Serialize;

use crate::kb::{Fact, FactId, KnowledgeBase, Rule, RuleId, Support};
use crate::term::{instantiate, instantiate_all, Statement};
use crate::unify::match_statement;

/// The forward-chaining engine: pending inference tasks plus counters
#[derive(Debug, Default)]
pub struct InferenceEngine {
    /// Pending (fact, rule) pairings to try
    pub(crate) agenda: VecDeque<(FactId, RuleId)>,
    /// Counters for all runs so far
    pub(crate) stats: InferenceStats,
}

/// Counters describing inference activity
#[derive(Clone, Debug, Default, Serialize)]
pub struct InferenceStats {
    /// Number of (fact, rule) tasks taken off the agenda
    pub tasks_processed: usize,
    /// Number of successful unifications of a fact with a rule head
    pub rules_fired: usize,
    /// Number of new facts derived
    pub facts_derived: usize,
    /// Number of new specialized rules derived
    pub rules_derived: usize,
    /// Whether the last run drained the agenda (reached the fix point)
    pub converged: bool,
}

/// Outcome of a successful firing, before insertion
enum Derivation {
    Fact(Statement),
    Rule(Vec<Statement>, Statement),
}

impl KnowledgeBase {
    /// Counters for inference activity so far
    pub fn inference_stats(&self) -> &InferenceStats {
        &self.engine.stats
    }

    /// Schedule a fact against every existing rule
    pub(crate) fn schedule_fact(&mut self, fact: FactId) {
        for &rule in self.rules.keys() {
            self.engine.agenda.push_back((fact, rule));
        }
    }

    /// Schedule every existing fact against a rule
    pub(crate) fn schedule_rule(&mut self, rule: RuleId) {
        for &fact in self.facts.keys() {
            self.engine.agenda.push_back((fact, rule));
        }
    }

    /// Drain the agenda, firing each pending (fact, rule) task
    ///
    /// Stops early when [`KbConfig::max_steps`](crate::KbConfig::max_steps)
    /// is non-zero and exhausted, clearing the remaining tasks.
    pub(crate) fn run_agenda(&mut self) {
        let mut steps = 0;
        loop {
            if self.config.max_steps > 0
                && steps >= self.config.max_steps
                && !self.engine.agenda.is_empty()
            {
                warn!(
                    "inference stopped after {} steps with {} tasks pending",
                    steps,
                    self.engine.agenda.len()
                );
                self.engine.agenda.clear();
                self.engine.stats.converged = false;
                return;
            }

            let Some((fact, rule)) = self.engine.agenda.pop_front() else {
                break;
            };
            steps += 1;
            self.engine.stats.tasks_processed += 1;
            self.fire(fact, rule);
        }
        self.engine.stats.converged = true;
    }

    /// Attempt to combine one fact with one rule's first antecedent
    fn fire(&mut self, fact_id: FactId, rule_id: RuleId) {
        // Either entity may have been removed since the task was queued.
        let derivation = {
            let Some(fact) = self.facts.get(&fact_id) else {
                return;
            };
            let Some(rule) = self.rules.get(&rule_id) else {
                return;
            };
            trace!("attempting to infer from {} and {}", fact, rule);

            let Some(head) = rule.lhs.first() else {
                return;
            };
            let Some(bindings) = match_statement(head, &fact.statement) else {
                return;
            };

            if rule.lhs.len() == 1 {
                Derivation::Fact(instantiate(&rule.rhs, &bindings))
            } else {
                Derivation::Rule(
                    instantiate_all(&rule.lhs[1..], &bindings),
                    instantiate(&rule.rhs, &bindings),
                )
            }
        };

        let support = Support {
            fact: fact_id,
            rule: rule_id,
        };

        match derivation {
            Derivation::Fact(statement) => {
                // Fix-point termination: an existing equal fact is not
                // re-inserted and not re-scheduled.
                if self.fact_index.contains_key(&statement) {
                    return;
                }
                debug!("derived fact {}", statement);

                let new_id = self.insert_fact(Fact::derived(statement, support));
                if let Some(fact) = self.facts.get_mut(&fact_id) {
                    fact.supports_facts.insert(new_id);
                }
                if let Some(rule) = self.rules.get_mut(&rule_id) {
                    rule.supports_facts.insert(new_id);
                }

                self.engine.stats.rules_fired += 1;
                self.engine.stats.facts_derived += 1;
                self.schedule_fact(new_id);
            }
            Derivation::Rule(lhs, rhs) => {
                if self.find_rule(&lhs, &rhs).is_some() {
                    return;
                }
                debug!("derived rule with {} antecedents => {}", lhs.len(), rhs);

                let new_id = self.insert_rule(Rule::derived(lhs, rhs, support));
                if let Some(fact) = self.facts.get_mut(&fact_id) {
                    fact.supports_rules.insert(new_id);
                }
                if let Some(rule) = self.rules.get_mut(&rule_id) {
                    rule.supports_rules.insert(new_id);
                }

                self.engine.stats.rules_fired += 1;
                self.engine.stats.rules_derived += 1;
                self.schedule_rule(new_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KbConfig;
    use crate::term::Term;

    fn ground(predicate: &str, args: &[&str]) -> Statement {
        Statement::new(predicate, args.iter().map(|a| Term::constant(*a)).collect())
    }

    fn var_stmt(predicate: &str, vars: &[&str]) -> Statement {
        Statement::new(predicate, vars.iter().map(|v| Term::variable(*v)).collect())
    }

    #[test]
    fn test_single_antecedent_rule_derives_fact() {
        let mut kb = KnowledgeBase::new();
        kb.assert_fact(ground("p", &["a"]));
        kb.assert_rule(vec![var_stmt("p", &["x"])], var_stmt("q", &["x"]))
            .unwrap();

        assert!(kb.contains_fact(&ground("q", &["a"])));

        let (qa_id, qa) = kb
            .facts()
            .find(|(_, f)| f.statement() == &ground("q", &["a"]))
            .unwrap();
        assert!(!qa.is_asserted());
        assert_eq!(qa.supported_by().len(), 1);

        // both supporters link back to the derived fact
        let support = qa.supported_by()[0];
        assert!(kb
            .get_fact(support.fact)
            .unwrap()
            .supports_facts()
            .any(|id| id == qa_id));
        assert!(kb
            .get_rule(support.rule)
            .unwrap()
            .supports_facts()
            .any(|id| id == qa_id));
    }

    #[test]
    fn test_fixpoint_regardless_of_insertion_order() {
        // rule first, then fact
        let mut kb = KnowledgeBase::new();
        kb.assert_rule(vec![var_stmt("p", &["x"])], var_stmt("q", &["x"]))
            .unwrap();
        kb.assert_fact(ground("p", &["a"]));
        assert!(kb.contains_fact(&ground("q", &["a"])));
        assert_eq!(kb.fact_count(), 2);

        // fact first, then rule
        let mut kb = KnowledgeBase::new();
        kb.assert_fact(ground("p", &["a"]));
        kb.assert_rule(vec![var_stmt("p", &["x"])], var_stmt("q", &["x"]))
            .unwrap();
        assert!(kb.contains_fact(&ground("q", &["a"])));
        assert_eq!(kb.fact_count(), 2);
    }

    #[test]
    fn test_duplicate_inputs_derive_once() {
        let mut kb = KnowledgeBase::new();
        kb.assert_rule(vec![var_stmt("p", &["x"])], var_stmt("q", &["x"]))
            .unwrap();
        kb.assert_rule(vec![var_stmt("p", &["x"])], var_stmt("q", &["x"]))
            .unwrap();
        kb.assert_fact(ground("p", &["a"]));
        kb.assert_fact(ground("p", &["a"]));

        let derived: Vec<_> = kb
            .facts()
            .filter(|(_, f)| f.statement() == &ground("q", &["a"]))
            .collect();
        assert_eq!(derived.len(), 1);
        assert_eq!(kb.inference_stats().facts_derived, 1);
    }

    #[test]
    fn test_chained_derivation_in_one_pass() {
        let mut kb = KnowledgeBase::new();
        kb.assert_rule(vec![var_stmt("p", &["x"])], var_stmt("q", &["x"]))
            .unwrap();
        kb.assert_rule(vec![var_stmt("q", &["x"])], var_stmt("r", &["x"]))
            .unwrap();
        // a single insertion triggers the whole chain
        kb.assert_fact(ground("p", &["a"]));

        assert!(kb.contains_fact(&ground("q", &["a"])));
        assert!(kb.contains_fact(&ground("r", &["a"])));
        assert!(kb.inference_stats().converged);
    }

    #[test]
    fn test_multi_antecedent_rule_specializes() {
        let mut kb = KnowledgeBase::new();
        kb.assert_rule(
            vec![
                Statement::new("parent", vec![Term::variable("x"), Term::variable("y")]),
                Statement::new("parent", vec![Term::variable("y"), Term::variable("z")]),
            ],
            Statement::new("grandparent", vec![Term::variable("x"), Term::variable("z")]),
        )
        .unwrap();

        kb.assert_fact(ground("parent", &["ada", "ben"]));
        // firing consumed the first antecedent: a derived single-antecedent
        // rule (parent ben ?z) => (grandparent ada ?z) now exists
        assert_eq!(kb.rule_count(), 2);
        let (_, derived) = kb.rules().find(|(_, r)| !r.is_asserted()).unwrap();
        assert_eq!(derived.lhs().len(), 1);
        assert_eq!(
            derived.lhs()[0],
            Statement::new("parent", vec![Term::constant("ben"), Term::variable("z")])
        );

        kb.assert_fact(ground("parent", &["ben", "cal"]));
        assert!(kb.contains_fact(&ground("grandparent", &["ada", "cal"])));
    }

    #[test]
    fn test_derived_rule_removed_when_premise_retracted() {
        let mut kb = KnowledgeBase::new();
        kb.assert_rule(
            vec![
                Statement::new("parent", vec![Term::variable("x"), Term::variable("y")]),
                Statement::new("parent", vec![Term::variable("y"), Term::variable("z")]),
            ],
            Statement::new("grandparent", vec![Term::variable("x"), Term::variable("z")]),
        )
        .unwrap();
        kb.assert_fact(ground("parent", &["ada", "ben"]));
        assert_eq!(kb.rule_count(), 2);

        kb.retract(&ground("parent", &["ada", "ben"])).unwrap();
        assert_eq!(kb.rule_count(), 1);
        assert!(kb.rules().all(|(_, r)| r.is_asserted()));
    }

    #[test]
    fn test_no_match_means_no_op() {
        let mut kb = KnowledgeBase::new();
        kb.assert_rule(vec![var_stmt("p", &["x"])], var_stmt("q", &["x"]))
            .unwrap();
        kb.assert_fact(ground("unrelated", &["a"]));

        assert_eq!(kb.fact_count(), 1);
        assert_eq!(kb.inference_stats().rules_fired, 0);
    }

    #[test]
    fn test_max_steps_bounds_a_run() {
        let mut kb = KnowledgeBase::with_config(KbConfig {
            max_steps: 1,
            ..KbConfig::default()
        });
        kb.assert_rule(vec![var_stmt("p", &["x"])], var_stmt("q", &["x"]))
            .unwrap();
        kb.assert_rule(vec![var_stmt("q", &["x"])], var_stmt("r", &["x"]))
            .unwrap();
        kb.assert_fact(ground("p", &["a"]));

        assert!(!kb.inference_stats().converged);
        // the chain was cut short of (r a)
        assert!(!kb.contains_fact(&ground("r", &["a"])));
    }

    #[test]
    fn test_partially_ground_fact_matches_rule() {
        let mut kb = KnowledgeBase::new();
        kb.assert_rule(
            vec![Statement::new("p", vec![Term::variable("x"), Term::constant("k")])],
            Statement::new("q", vec![Term::variable("x")]),
        )
        .unwrap();
        // the fact itself carries a variable in the first position
        kb.assert_fact(Statement::new(
            "p",
            vec![Term::variable("anything"), Term::constant("k")],
        ));

        assert_eq!(kb.inference_stats().rules_fired, 1);
        assert_eq!(kb.fact_count(), 2);
    }
}
