//! Checks the `pragma solidity` directive of a unit.
//!
//! A missing directive leaves the compiler version unconstrained; a
//! floating constraint (`^0.8.0`, `>=0.8.0`) lets builds drift across
//! compiler releases.

use tree_sitter::Node;

use crate::report::{ReportItem, Severity, SourceSpan};
use crate::task::{Task, TaskRegistry};
use crate::unit::SourceUnit;

pub const NAME: &str = "pragma_version";

pub fn register(registry: &mut TaskRegistry) {
    registry.register(NAME, applies, create);
}

fn applies(node: Node) -> bool {
    node.kind() == "source_file"
}

fn create<'t>(unit: &'t SourceUnit, node: Node<'t>) -> Box<dyn Task + 't> {
    Box::new(PragmaVersion { unit, node })
}

struct PragmaVersion<'t> {
    unit: &'t SourceUnit,
    node: Node<'t>,
}

impl Task for PragmaVersion<'_> {
    fn execute(&self) -> anyhow::Result<Vec<ReportItem>> {
        let Some(pragma) = self.solidity_pragma() else {
            return Ok(vec![ReportItem::at_span(
                Severity::Warning,
                "missing `pragma solidity` version directive",
                self.unit,
                SourceSpan::new(1, 1, 1, 1),
                NAME,
            )]);
        };

        let text = self.unit.node_text(pragma);
        if text.contains('^') || text.contains('>') {
            return Ok(vec![ReportItem::at_node(
                Severity::Info,
                "floating compiler version constraint; pin an exact `pragma solidity` version for reproducible builds",
                self.unit,
                pragma,
                NAME,
            )]);
        }
        Ok(Vec::new())
    }
}

impl PragmaVersion<'_> {
    /// First top-level `pragma solidity` directive, if any.
    fn solidity_pragma(&self) -> Option<Node<'_>> {
        let mut cursor = self.node.walk();
        for child in self.node.named_children(&mut cursor) {
            if child.kind() == "pragma_directive" && self.unit.node_text(child).contains("solidity")
            {
                return Some(child);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::test_util::run_rule;

    #[test]
    fn flags_a_missing_version_pragma() {
        let findings = run_rule(register, "contract A {}\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert_eq!(findings[0].span.line, 1);
        assert!(findings[0].message.contains("missing"));
    }

    #[test]
    fn flags_a_floating_constraint() {
        let findings = run_rule(register, "pragma solidity ^0.8.20;\ncontract A {}\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Info);
        assert!(findings[0].message.contains("floating"));
    }

    #[test]
    fn flags_a_range_constraint() {
        let findings = run_rule(
            register,
            "pragma solidity >=0.8.0 <0.9.0;\ncontract A {}\n",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Info);
    }

    #[test]
    fn accepts_an_exact_version() {
        let findings = run_rule(register, "pragma solidity 0.8.24;\ncontract A {}\n");
        assert!(findings.is_empty());
    }

    #[test]
    fn other_pragmas_do_not_satisfy_the_check() {
        let findings = run_rule(register, "pragma abicoder v2;\ncontract A {}\n");
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("missing"));
    }
}
