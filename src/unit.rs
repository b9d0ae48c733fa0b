//! Parsed compilation units.
//!
//! A `SourceUnit` pairs one input file's source text with its syntax
//! tree. Parsing is delegated entirely to tree-sitter with the Solidity
//! grammar; the analysis engine only ever reads the resulting tree.

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser as TsParser, Query, QueryCursor, Tree};

use crate::evm::EvmVersion;

/// Tree-sitter query for import directives.
const IMPORT_QUERY: &str = "(import_directive) @import";

fn language() -> Language {
    tree_sitter_solidity::LANGUAGE.into()
}

/// One source file's parsed syntax tree plus its source text.
///
/// Units are immutable after construction. The engine borrows a unit for
/// the duration of one traversal; node handles never outlive it.
pub struct SourceUnit {
    path: String,
    source: String,
    tree: Tree,
    evm: EvmVersion,
}

impl SourceUnit {
    /// Parse `source` into a new unit.
    ///
    /// Fails only when tree-sitter cannot produce a tree at all; syntax
    /// errors still yield a tree and are surfaced by `has_parse_errors`.
    pub fn parse(path: impl Into<String>, source: String, evm: EvmVersion) -> anyhow::Result<Self> {
        let path = path.into();
        let mut parser = TsParser::new();
        parser.set_language(&language())?;
        let tree = parser
            .parse(source.as_bytes(), None)
            .ok_or_else(|| anyhow::anyhow!("failed to parse {}", path))?;
        Ok(Self {
            path,
            source,
            tree,
            evm,
        })
    }

    /// The file identifier this unit was loaded from.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// EVM version selected for the run; version-aware tasks consult it.
    pub fn evm_version(&self) -> EvmVersion {
        self.evm
    }

    /// Root node of the syntax tree.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text covered by `node`.
    pub fn node_text(&self, node: Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    /// Whether the tree contains syntax errors. Units with errors are
    /// reported and skipped; the engine is never invoked on a partial
    /// tree.
    pub fn has_parse_errors(&self) -> bool {
        self.root().has_error()
    }

    /// Import paths named by `import` directives, in source order.
    pub fn imports(&self) -> anyhow::Result<Vec<String>> {
        let query = Query::new(&language(), IMPORT_QUERY)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, self.root(), self.source.as_bytes());

        let mut paths = Vec::new();
        while let Some(m) = matches.next() {
            for capture in m.captures {
                if let Some(path) = self.import_path(capture.node) {
                    paths.push(path);
                }
            }
        }
        Ok(paths)
    }

    /// Extract the quoted path from an import directive node.
    fn import_path(&self, directive: Node) -> Option<String> {
        let literal = find_string_literal(directive)?;
        let text = self
            .node_text(literal)
            .trim_matches(|c| c == '"' || c == '\'');
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }
}

/// First named descendant holding a string literal.
fn find_string_literal(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind().contains("string") {
            return Some(child);
        }
        if let Some(found) = find_string_literal(child) {
            return Some(found);
        }
    }
    None
}
