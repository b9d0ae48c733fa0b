//! Solcheck - rule-based static analysis for Solidity source files.
//!
//! Solcheck parses each input with tree-sitter and walks the syntax
//! tree, dispatching analysis tasks from a name-keyed registry. Each
//! task is bound to a single tree node, executes once, and returns
//! findings; a reporter orders and renders them.
//!
//! # Architecture
//!
//! - `unit`: parsed compilation units (source text + syntax tree)
//! - `task`: the framework - task contract, registry, and tree finder
//! - `tasks`: built-in analysis rules
//! - `report`: findings, ordering, deduplication, and rendering
//! - `resolve`: import remappings and filesystem resolution
//! - `evm`: EVM hard fork selection
//! - `ast`: AST-only output mode
//! - `cli`: argument parsing and run orchestration
//!
//! # Adding a New Rule
//!
//! See `src/tasks/` for examples. Provide a name, a node predicate, and
//! a factory, then register the module in `tasks::builtin_registry`.

pub mod ast;
pub mod cli;
pub mod evm;
pub mod report;
pub mod resolve;
pub mod task;
pub mod tasks;
pub mod unit;

pub use evm::EvmVersion;
pub use report::{ReportItem, Severity, SourceSpan};
pub use task::{analyze_units, RegistryError, Task, TaskFinder, TaskRegistry};
pub use tasks::builtin_registry;
pub use unit::SourceUnit;
