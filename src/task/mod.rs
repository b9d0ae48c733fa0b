//! The task framework: a name-keyed registry of analysis rules and a
//! finder that dispatches them over a unit's syntax tree.
//!
//! A task is one rule instance bound to one target node of one
//! `SourceUnit`. The registry maps task names to (predicate, factory)
//! pairs; the finder walks every node of a unit, instantiates the tasks
//! whose predicates accept the node, executes them, and collects their
//! findings. Concrete rules live in `crate::tasks`.

mod finder;
mod registry;

pub use finder::{analyze_units, TaskFinder};
pub use registry::{RegistryError, TaskRegistry};

use tree_sitter::Node;

use crate::report::ReportItem;
use crate::unit::SourceUnit;

/// Decides whether a task applies to a node, from the node alone.
pub type TaskPredicate = for<'t> fn(Node<'t>) -> bool;

/// Constructs a task bound to one target node of one unit.
pub type TaskFactory = for<'t> fn(&'t SourceUnit, Node<'t>) -> Box<dyn Task + 't>;

/// A single-execution analysis rule bound to one target node.
///
/// `execute` must be a pure function of the target node, its ancestor
/// context (reachable through the unit's tree), and the unit's source
/// text; it performs no I/O and reads no external mutable state. An
/// empty result is the common case.
///
/// Internal faults are returned as errors, never panicked: the finder
/// converts them into Error-severity findings so one broken rule cannot
/// abort analysis of the rest of the unit.
pub trait Task {
    fn execute(&self) -> anyhow::Result<Vec<ReportItem>>;
}
