//! Checks for an SPDX license identifier comment.

use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::Node;

use crate::report::{ReportItem, Severity, SourceSpan};
use crate::task::{Task, TaskRegistry};
use crate::unit::SourceUnit;

pub const NAME: &str = "spdx_license";

/// Matches `// SPDX-License-Identifier: <id>` (or the `/*` form) at the
/// start of a line.
static SPDX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(//|/\*)\s*SPDX-License-Identifier:\s*\S+").unwrap());

pub fn register(registry: &mut TaskRegistry) {
    registry.register(NAME, applies, create);
}

fn applies(node: Node) -> bool {
    node.kind() == "source_file"
}

fn create<'t>(unit: &'t SourceUnit, _node: Node<'t>) -> Box<dyn Task + 't> {
    Box::new(SpdxLicense { unit })
}

struct SpdxLicense<'t> {
    unit: &'t SourceUnit,
}

impl Task for SpdxLicense<'_> {
    fn execute(&self) -> anyhow::Result<Vec<ReportItem>> {
        if SPDX.is_match(self.unit.source()) {
            return Ok(Vec::new());
        }
        Ok(vec![ReportItem::at_span(
            Severity::Warning,
            "missing SPDX license identifier; add `// SPDX-License-Identifier: <identifier>` as the first line",
            self.unit,
            SourceSpan::new(1, 1, 1, 1),
            NAME,
        )])
    }
}
