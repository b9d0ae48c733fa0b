//! AST-only output mode.
//!
//! `--ast` prints each unit's syntax tree instead of analysis findings:
//! one line per named node, indented by depth, with 1-indexed spans and
//! the covered text for leaves.

use std::io::{self, Write};

use tree_sitter::Node;

use crate::unit::SourceUnit;

/// Longest leaf text echoed inline before it is elided.
const MAX_LEAF_TEXT: usize = 40;

/// Write the syntax tree of `unit` to `out`.
pub fn write_ast<W: Write>(out: &mut W, unit: &SourceUnit) -> io::Result<()> {
    write_node(out, unit, unit.root(), 0)
}

fn write_node<W: Write>(out: &mut W, unit: &SourceUnit, node: Node, depth: usize) -> io::Result<()> {
    let start = node.start_position();
    let end = node.end_position();
    write!(out, "{:indent$}{}", "", node.kind(), indent = depth * 2)?;
    write!(
        out,
        " [{}:{} - {}:{}]",
        start.row + 1,
        start.column + 1,
        end.row + 1,
        end.column + 1
    )?;

    if node.named_child_count() == 0 {
        let text = unit.node_text(node);
        if !text.is_empty() && text.len() <= MAX_LEAF_TEXT && !text.contains('\n') {
            write!(out, " {:?}", text)?;
        }
    }
    writeln!(out)?;

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        write_node(out, unit, child, depth + 1)?;
    }
    Ok(())
}
