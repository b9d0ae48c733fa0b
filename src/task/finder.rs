//! Tree traversal and task dispatch.

use rayon::prelude::*;

use crate::report::{ReportItem, Severity, SourceSpan};
use crate::unit::SourceUnit;

use super::{RegistryError, TaskRegistry};

/// Walks a unit's tree and executes every applicable task at every node.
///
/// Traversal is pre-order, root to leaves, children in syntactic order.
/// Every node is visited exactly once, and a finding never cuts the
/// traversal short: a match at a node does not prevent matches in its
/// subtree, and the same task name matching a node and one of its
/// descendants fires both times. Findings come back in discovery order;
/// ordering for output is the reporter's concern, as is deduplication.
pub struct TaskFinder<'r> {
    registry: &'r TaskRegistry,
}

impl<'r> TaskFinder<'r> {
    pub fn new(registry: &'r TaskRegistry) -> Self {
        Self { registry }
    }

    /// Analyze one unit and collect every finding its tasks produce.
    ///
    /// A task that fails contributes exactly one Error-severity finding
    /// under its own name and disturbs neither sibling tasks nor deeper
    /// traversal. The only error path out of here is a registry
    /// inconsistency, which aborts the run.
    pub fn run_unit(&self, unit: &SourceUnit) -> Result<Vec<ReportItem>, RegistryError> {
        let mut findings = Vec::new();
        let mut cursor = unit.root().walk();

        loop {
            let node = cursor.node();
            for name in self.registry.lookup_applicable(node) {
                let task = self.registry.create(name, unit, node)?;
                match task.execute() {
                    Ok(items) => findings.extend(items),
                    Err(fault) => findings.push(ReportItem {
                        severity: Severity::Error,
                        message: format!("task failed: {:#}", fault),
                        file: unit.path().to_string(),
                        span: SourceSpan::of(node),
                        origin: name,
                    }),
                }
            }

            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return Ok(findings);
                }
            }
        }
    }
}

/// Analyze several units against one registry.
///
/// Units are independent and the registry is read-only after setup, so
/// units run in parallel; results come back in input order, one finding
/// list per unit, identical to what sequential analysis would produce.
pub fn analyze_units(
    units: &[SourceUnit],
    registry: &TaskRegistry,
) -> Result<Vec<Vec<ReportItem>>, RegistryError> {
    units
        .par_iter()
        .map(|unit| TaskFinder::new(registry).run_unit(unit))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evm::EvmVersion;
    use crate::task::{Task, TaskRegistry};
    use tree_sitter::Node;

    const MARK: &str = "mark_node";
    const FAULTY: &str = "faulty_rule";

    struct Mark<'t> {
        unit: &'t SourceUnit,
        node: Node<'t>,
    }

    impl Task for Mark<'_> {
        fn execute(&self) -> anyhow::Result<Vec<ReportItem>> {
            Ok(vec![ReportItem::at_node(
                Severity::Info,
                "node visited",
                self.unit,
                self.node,
                MARK,
            )])
        }
    }

    struct Faulty;

    impl Task for Faulty {
        fn execute(&self) -> anyhow::Result<Vec<ReportItem>> {
            Err(anyhow::anyhow!("synthetic rule failure"))
        }
    }

    fn mark_factory<'t>(unit: &'t SourceUnit, node: Node<'t>) -> Box<dyn Task + 't> {
        Box::new(Mark { unit, node })
    }

    fn faulty_factory<'t>(_unit: &'t SourceUnit, _node: Node<'t>) -> Box<dyn Task + 't> {
        Box::new(Faulty)
    }

    fn is_contract(node: Node) -> bool {
        node.kind() == "contract_declaration"
    }

    fn is_member(node: Node) -> bool {
        node.kind() == "member_expression"
    }

    fn is_root(node: Node) -> bool {
        node.kind() == "source_file"
    }

    fn is_pragma(node: Node) -> bool {
        node.kind() == "pragma_directive"
    }

    fn unit_of(source: &str) -> SourceUnit {
        SourceUnit::parse("test.sol", source.to_string(), EvmVersion::default()).unwrap()
    }

    #[test]
    fn executes_once_per_matching_node() {
        let mut registry = TaskRegistry::new();
        registry.register(MARK, is_contract, mark_factory);

        let unit = unit_of("contract A {}\ncontract B {}\ncontract C {}\n");
        let findings = TaskFinder::new(&registry).run_unit(&unit).unwrap();
        assert_eq!(findings.len(), 3);
        assert!(findings.iter().all(|f| f.origin == MARK));
    }

    #[test]
    fn repeated_runs_yield_identical_sequences() {
        let mut registry = TaskRegistry::new();
        registry.register(MARK, is_contract, mark_factory);

        let unit = unit_of("contract A {}\ncontract B {}\n");
        let finder = TaskFinder::new(&registry);
        let first = finder.run_unit(&unit).unwrap();
        let second = finder.run_unit(&unit).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn fault_becomes_one_error_finding_and_analysis_continues() {
        let mut registry = TaskRegistry::new();
        registry.register(FAULTY, is_contract, faulty_factory);
        registry.register(MARK, is_member, mark_factory);

        // The faulting task fires at the contract; the member access in
        // the function body proves traversal kept going below it.
        let unit = unit_of(
            "contract A { function f() public view returns (address) { return msg.sender; } }\n",
        );
        let findings = TaskFinder::new(&registry).run_unit(&unit).unwrap();

        let errors: Vec<_> = findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].origin, FAULTY);
        assert!(errors[0].message.contains("synthetic rule failure"));

        assert!(findings.iter().any(|f| f.origin == MARK));
    }

    #[test]
    fn faulting_task_does_not_block_sibling_task_on_same_node() {
        let mut registry = TaskRegistry::new();
        registry.register(FAULTY, is_contract, faulty_factory);
        registry.register(MARK, is_contract, mark_factory);

        let unit = unit_of("contract A {}\n");
        let findings = TaskFinder::new(&registry).run_unit(&unit).unwrap();
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].origin, FAULTY);
        assert_eq!(findings[1].origin, MARK);
    }

    #[test]
    fn no_matching_nodes_yields_empty_findings() {
        let mut registry = TaskRegistry::new();
        registry.register(MARK, is_pragma, mark_factory);

        let unit = unit_of("contract A {}\n");
        let findings = TaskFinder::new(&registry).run_unit(&unit).unwrap();
        assert!(findings.is_empty());
    }

    #[test]
    fn handles_a_tree_with_only_the_root_node() {
        let mut registry = TaskRegistry::new();
        registry.register(MARK, is_root, mark_factory);

        let unit = unit_of("");
        let findings = TaskFinder::new(&registry).run_unit(&unit).unwrap();
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn same_task_fires_on_node_and_descendant() {
        let mut registry = TaskRegistry::new();
        registry.register(MARK, is_member, mark_factory);

        // a.b.c nests one member expression inside another; both fire.
        let unit = unit_of(
            "contract A { function f() public view returns (uint256) { return a.b.c; } }\n",
        );
        let findings = TaskFinder::new(&registry).run_unit(&unit).unwrap();
        assert_eq!(findings.len(), 2);
    }

    #[test]
    fn analyze_units_preserves_input_order() {
        let mut registry = TaskRegistry::new();
        registry.register(MARK, is_contract, mark_factory);

        let units = vec![
            unit_of("contract A {}\n"),
            unit_of("contract B {}\ncontract C {}\n"),
        ];
        let per_unit = analyze_units(&units, &registry).unwrap();
        let counts: Vec<_> = per_unit.iter().map(Vec::len).collect();
        assert_eq!(counts, vec![1, 2]);
    }
}
