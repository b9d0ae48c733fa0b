//! Flags reads of `tx.origin`.
//!
//! `tx.origin` names the externally-owned account that started the
//! transaction chain, so authorization checks built on it can be
//! satisfied by any contract sitting in the middle of a call.

use tree_sitter::Node;

use crate::report::{ReportItem, Severity};
use crate::task::{Task, TaskRegistry};
use crate::unit::SourceUnit;

pub const NAME: &str = "tx_origin";

pub fn register(registry: &mut TaskRegistry) {
    registry.register(NAME, applies, create);
}

fn applies(node: Node) -> bool {
    node.kind() == "member_expression"
}

fn create<'t>(unit: &'t SourceUnit, node: Node<'t>) -> Box<dyn Task + 't> {
    Box::new(TxOrigin { unit, node })
}

struct TxOrigin<'t> {
    unit: &'t SourceUnit,
    node: Node<'t>,
}

impl Task for TxOrigin<'_> {
    fn execute(&self) -> anyhow::Result<Vec<ReportItem>> {
        let text: String = self
            .unit
            .node_text(self.node)
            .split_whitespace()
            .collect();
        if text != "tx.origin" {
            return Ok(Vec::new());
        }
        Ok(vec![ReportItem::at_node(
            Severity::Warning,
            "use of `tx.origin`; prefer `msg.sender` for authorization checks",
            self.unit,
            self.node,
            NAME,
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::test_util::run_rule;

    #[test]
    fn flags_tx_origin_reads() {
        let findings = run_rule(
            register,
            "contract A { function f() public view returns (address) { return tx.origin; } }\n",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert_eq!(findings[0].origin, NAME);
    }

    #[test]
    fn ignores_msg_sender() {
        let findings = run_rule(
            register,
            "contract A { function f() public view returns (address) { return msg.sender; } }\n",
        );
        assert!(findings.is_empty());
    }

    #[test]
    fn flags_only_the_tx_origin_access_in_a_comparison() {
        let findings = run_rule(
            register,
            "contract A { function f() public view returns (bool) { return tx.origin == msg.sender; } }\n",
        );
        assert_eq!(findings.len(), 1);
    }
}
