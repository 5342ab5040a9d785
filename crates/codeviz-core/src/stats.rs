//! Basic source statistics reported next to a visualization.

use serde::Serialize;

use crate::graph::NodeKind;
use crate::parser::{LanguageAdapter, NativeTree, TreeSitterBase};

/// Size and declaration counts of one submitted source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodeStats {
    /// Non-blank lines.
    pub lines_of_code: usize,
    pub characters: usize,
    pub functions: usize,
    pub classes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
}

impl CodeStats {
    /// Parse `source` and count declarations over the whole tree, ignoring
    /// any depth limit. A syntax error leaves both counts at zero.
    pub fn collect(source: &str, adapter: &dyn LanguageAdapter) -> Self {
        let mut stats = Self {
            lines_of_code: source.lines().filter(|l| !l.trim().is_empty()).count(),
            characters: source.chars().count(),
            ..Self::default()
        };
        match adapter.parse(source) {
            Ok(tree) => stats.count_declarations(adapter, &tree),
            Err(err) => stats.parse_error = Some(err.to_string()),
        }
        stats
    }

    fn count_declarations(&mut self, adapter: &dyn LanguageAdapter, tree: &NativeTree) {
        let mut stack = vec![tree.root()];
        while let Some(node) = stack.pop() {
            match adapter.classify(node.kind()) {
                NodeKind::Function => self.functions += 1,
                NodeKind::Class | NodeKind::Interface | NodeKind::Enum => self.classes += 1,
                _ => {}
            }
            stack.extend(TreeSitterBase::named_children(&node));
        }
    }
}
