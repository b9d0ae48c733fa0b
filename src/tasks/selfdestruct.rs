//! Flags `selfdestruct` calls.
//!
//! Since the Cancun hard fork (EIP-6780) `selfdestruct` only removes
//! contract code when called in the transaction that created the
//! contract; on earlier forks it is merely deprecated. The message
//! adapts to the EVM version selected for the run.

use tree_sitter::Node;

use crate::evm::EvmVersion;
use crate::report::{ReportItem, Severity};
use crate::task::{Task, TaskRegistry};
use crate::unit::SourceUnit;

pub const NAME: &str = "selfdestruct";

pub fn register(registry: &mut TaskRegistry) {
    registry.register(NAME, applies, create);
}

fn applies(node: Node) -> bool {
    node.kind() == "call_expression"
}

fn create<'t>(unit: &'t SourceUnit, node: Node<'t>) -> Box<dyn Task + 't> {
    Box::new(Selfdestruct { unit, node })
}

struct Selfdestruct<'t> {
    unit: &'t SourceUnit,
    node: Node<'t>,
}

impl Task for Selfdestruct<'_> {
    fn execute(&self) -> anyhow::Result<Vec<ReportItem>> {
        let Some(callee) = self.node.named_child(0) else {
            return Ok(Vec::new());
        };
        if self.unit.node_text(callee).trim() != "selfdestruct" {
            return Ok(Vec::new());
        }

        let message = if self.unit.evm_version() >= EvmVersion::Cancun {
            "`selfdestruct` no longer removes code outside the creation transaction since Cancun (EIP-6780); use an explicit disable mechanism"
        } else {
            "`selfdestruct` is deprecated; prefer an explicit disable mechanism"
        };
        Ok(vec![ReportItem::at_node(
            Severity::Warning,
            message,
            self.unit,
            self.node,
            NAME,
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::test_util::{run_rule, run_rule_with};

    const SOURCE: &str =
        "contract A { function kill() public { selfdestruct(payable(msg.sender)); } }\n";

    #[test]
    fn flags_selfdestruct_with_post_cancun_message() {
        let findings = run_rule(register, SOURCE);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert!(findings[0].message.contains("EIP-6780"));
    }

    #[test]
    fn pre_cancun_forks_get_the_deprecation_message() {
        let findings = run_rule_with(register, SOURCE, EvmVersion::London);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("deprecated"));
        assert!(!findings[0].message.contains("EIP-6780"));
    }

    #[test]
    fn ignores_ordinary_calls() {
        let findings = run_rule(
            register,
            "contract A { function f(address payable to) public { to.transfer(1); } }\n",
        );
        assert!(findings.is_empty());
    }
}
