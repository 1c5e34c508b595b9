//! chainkb - forward-chaining inference over a mutable knowledge base
//!
//! Given asserted facts and implication rules, the engine derives new
//! facts and rules by unification, records why each derived item exists,
//! answers pattern queries, and removes derived knowledge whose support
//! has vanished when an assertion is retracted (truth maintenance).
//!
//! # Architecture
//!
//! - [`term`] - terms, statements, and variable bindings
//! - [`unify`] - statement unification, the matching primitive used by
//!   both querying and inference
//! - [`kb`] - the knowledge base: storage, provenance, query, retraction
//! - [`infer`] - the forward-chaining engine driving the fix point over an
//!   explicit agenda of (fact, rule) tasks
//!
//! Callers construct statements as values and interact through three entry
//! points: assert, ask, retract. Parsing text into statements and
//! formatting results are left to the caller; the data types implement
//! `Display` for human-readable output.
//!
//! # Example
//!
//! ```
//! use chainkb::{KnowledgeBase, Statement, Term};
//!
//! let mut kb = KnowledgeBase::new();
//!
//! kb.assert_fact(Statement::new(
//!     "isa",
//!     vec![Term::constant("socrates"), Term::constant("human")],
//! ));
//! kb.assert_rule(
//!     vec![Statement::new(
//!         "isa",
//!         vec![Term::variable("x"), Term::constant("human")],
//!     )],
//!     Statement::new("isa", vec![Term::variable("x"), Term::constant("mortal")]),
//! )
//! .unwrap();
//!
//! let query = Term::statement(Statement::new(
//!     "isa",
//!     vec![Term::variable("who"), Term::constant("mortal")],
//! ));
//! let answers = kb.ask(&query).unwrap();
//! assert_eq!(answers.len(), 1);
//! ```

pub mod config;
pub mod error;
pub mod infer;
pub mod kb;
pub mod term;
pub mod unify;

// Re-export term types
pub use term::{instantiate, instantiate_all, substitute, Bindings, Statement, Term, Variable};

// Re-export unification entry points
pub use unify::{match_statement, match_statement_with, match_statements};

// Re-export knowledge base types
pub use kb::{Fact, FactId, KbStats, KnowledgeBase, QueryAnswer, Rule, RuleId, Support};

// Re-export engine types
pub use infer::{InferenceEngine, InferenceStats};

// Re-export configuration and error types
pub use config::KbConfig;
pub use error::{KbError, KbResult};
