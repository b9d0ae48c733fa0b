//! Flags low-level calls reached through member access.
//!
//! `delegatecall` executes foreign code against this contract's storage,
//! `callcode` is its deprecated predecessor, and bare `call` bypasses
//! the type checks the compiler performs for ordinary external calls.

use tree_sitter::Node;

use crate::report::{ReportItem, Severity};
use crate::task::{Task, TaskRegistry};
use crate::unit::SourceUnit;

pub const NAME: &str = "low_level_call";

pub fn register(registry: &mut TaskRegistry) {
    registry.register(NAME, applies, create);
}

fn applies(node: Node) -> bool {
    node.kind() == "member_expression"
}

fn create<'t>(unit: &'t SourceUnit, node: Node<'t>) -> Box<dyn Task + 't> {
    Box::new(LowLevelCall { unit, node })
}

struct LowLevelCall<'t> {
    unit: &'t SourceUnit,
    node: Node<'t>,
}

impl Task for LowLevelCall<'_> {
    fn execute(&self) -> anyhow::Result<Vec<ReportItem>> {
        let Some(property) = property_node(self.node) else {
            return Ok(Vec::new());
        };
        let (severity, message) = match self.unit.node_text(property) {
            "delegatecall" => (
                Severity::Warning,
                "`delegatecall` executes untrusted code in this contract's storage context",
            ),
            "callcode" => (
                Severity::Warning,
                "`callcode` is deprecated; use `delegatecall` and audit the storage layout",
            ),
            "call" => (
                Severity::Info,
                "low-level `call` bypasses type and existence checks; check the returned success flag",
            ),
            _ => return Ok(Vec::new()),
        };
        Ok(vec![ReportItem::at_node(
            severity,
            message,
            self.unit,
            self.node,
            NAME,
        )])
    }
}

/// Property side of a member access; falls back to the last named child
/// when the grammar exposes no field.
fn property_node(node: Node) -> Option<Node> {
    node.child_by_field_name("property").or_else(|| {
        let count = node.named_child_count();
        if count == 0 {
            None
        } else {
            node.named_child(count - 1)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::test_util::run_rule;

    #[test]
    fn flags_delegatecall_as_warning() {
        let findings = run_rule(
            register,
            "contract A { function f(address lib, bytes memory data) public { lib.delegatecall(data); } }\n",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert!(findings[0].message.contains("delegatecall"));
    }

    #[test]
    fn flags_bare_call_as_info() {
        let findings = run_rule(
            register,
            "contract A { function f(address to) public { (bool ok, bytes memory ret) = to.call(\"\"); require(ok); ret; } }\n",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Info);
    }

    #[test]
    fn ignores_typed_external_calls() {
        let findings = run_rule(
            register,
            "contract A { function f(address payable to) public { to.transfer(1); } }\n",
        );
        assert!(findings.is_empty());
    }
}
