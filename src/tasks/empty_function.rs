//! Flags functions with empty bodies.
//!
//! An empty body on a non-virtual function usually marks unfinished
//! work. Virtual functions and bodyless interface declarations are
//! legitimate and left alone.

use tree_sitter::Node;

use crate::report::{ReportItem, Severity};
use crate::task::{Task, TaskRegistry};
use crate::unit::SourceUnit;

pub const NAME: &str = "empty_function";

pub fn register(registry: &mut TaskRegistry) {
    registry.register(NAME, applies, create);
}

fn applies(node: Node) -> bool {
    node.kind() == "function_definition"
}

fn create<'t>(unit: &'t SourceUnit, node: Node<'t>) -> Box<dyn Task + 't> {
    Box::new(EmptyFunction { unit, node })
}

struct EmptyFunction<'t> {
    unit: &'t SourceUnit,
    node: Node<'t>,
}

impl Task for EmptyFunction<'_> {
    fn execute(&self) -> anyhow::Result<Vec<ReportItem>> {
        // A declaration without a body (interface, abstract) is fine.
        let Some(body) = self.body() else {
            return Ok(Vec::new());
        };
        if body.named_child_count() > 0 {
            return Ok(Vec::new());
        }

        let header = self
            .unit
            .source()
            .get(self.node.start_byte()..body.start_byte())
            .unwrap_or("");
        if header.contains("virtual") {
            return Ok(Vec::new());
        }

        Ok(vec![ReportItem::at_node(
            Severity::Info,
            "function body is empty",
            self.unit,
            self.node,
            NAME,
        )])
    }
}

impl<'t> EmptyFunction<'t> {
    fn body(&self) -> Option<Node<'t>> {
        if let Some(body) = self.node.child_by_field_name("body") {
            return Some(body);
        }
        let mut cursor = self.node.walk();
        let found = self
            .node
            .named_children(&mut cursor)
            .find(|child| child.kind() == "function_body");
        found
    }
}
