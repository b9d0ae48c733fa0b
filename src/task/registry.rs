//! Name-keyed task registration and instantiation.

use std::collections::HashMap;

use thiserror::Error;
use tree_sitter::Node;

use crate::unit::SourceUnit;

use super::{Task, TaskFactory, TaskPredicate};

/// Errors raised by registry lookups.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// `create` was called with a name nothing was registered under.
    /// During dispatch the name always originates from the registry
    /// itself, so this is an internal-consistency fault, not a user
    /// error; callers abort the run rather than continue.
    #[error("no task registered under name {0:?}")]
    UnknownTask(String),
}

struct TaskEntry {
    name: &'static str,
    predicate: TaskPredicate,
    factory: TaskFactory,
}

/// Table mapping task names to (predicate, factory) pairs.
///
/// Built once at process start and read-only afterwards, so it can be
/// shared across concurrent traversals. Match order is registration
/// order, keeping output reproducible across runs.
#[derive(Default)]
pub struct TaskRegistry {
    entries: Vec<TaskEntry>,
    by_name: HashMap<&'static str, usize>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry under `name`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered. Duplicate registration is
    /// a programming error that must surface at process start, not be
    /// silently swallowed at analysis time.
    pub fn register(&mut self, name: &'static str, predicate: TaskPredicate, factory: TaskFactory) {
        if self.by_name.contains_key(name) {
            panic!("task {:?} registered twice", name);
        }
        self.by_name.insert(name, self.entries.len());
        self.entries.push(TaskEntry {
            name,
            predicate,
            factory,
        });
    }

    /// Names whose predicates accept `node`, in registration order.
    pub fn lookup_applicable(&self, node: Node) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|entry| (entry.predicate)(node))
            .map(|entry| entry.name)
            .collect()
    }

    /// Instantiate the task registered under `name`, bound to `node`
    /// within `unit`.
    pub fn create<'t>(
        &self,
        name: &str,
        unit: &'t SourceUnit,
        node: Node<'t>,
    ) -> Result<Box<dyn Task + 't>, RegistryError> {
        let index = self
            .by_name
            .get(name)
            .copied()
            .ok_or_else(|| RegistryError::UnknownTask(name.to_string()))?;
        Ok((self.entries[index].factory)(unit, node))
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
