//! Native tree to uniform graph conversion.
//!
//! The walk is iterative: an explicit stack of `(native node, parent id,
//! depth)` frames plus one visited-identity set per pass. Each native node
//! becomes one graph node linked to its parent by a `contains` edge, so the
//! result is always a tree rooted at the native root.

use std::collections::HashSet;

use tracing::{debug, warn};
use tree_sitter::Node;

use super::kind::{truncate_label, LabelRule, NodeKind};
use super::metadata::{Diagnostic, Metadata};
use super::model::{Graph, NodeId, Relation};
use crate::config::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_LABEL_LEN};
use crate::parser::{ExtractionError, LanguageAdapter, NativeTree, ParseError, TreeSitterBase};

/// Node type of the single node produced for unparseable input.
pub const PARSE_ERROR_NODE_TYPE: &str = "parse_error";

/// Graph, metadata and per-node diagnostics of one build pass.
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    pub graph: Graph,
    pub metadata: Metadata,
    pub diagnostics: Vec<Diagnostic>,
}

struct Frame<'t> {
    node: Node<'t>,
    parent: Option<NodeId>,
    depth: usize,
}

/// Builder for the AST graph and its metadata.
pub struct GraphBuilder<'a> {
    adapter: &'a dyn LanguageAdapter,
    max_depth: usize,
    max_label_len: usize,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(adapter: &'a dyn LanguageAdapter) -> Self {
        Self {
            adapter,
            max_depth: DEFAULT_MAX_DEPTH,
            max_label_len: DEFAULT_MAX_LABEL_LEN,
        }
    }

    /// Deepest level (root = 0) whose children are still visited.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_label_len(mut self, max_label_len: usize) -> Self {
        self.max_label_len = max_label_len;
        self
    }

    /// Walk a native tree into `{graph, metadata, diagnostics}`.
    pub fn build(&self, tree: &NativeTree) -> BuildOutput {
        let mut output = BuildOutput::default();
        let mut visited: HashSet<usize> = HashSet::new();
        let mut stack = vec![Frame {
            node: tree.root(),
            parent: None,
            depth: 0,
        }];

        while let Some(frame) = stack.pop() {
            if !visited.insert(frame.node.id()) {
                continue;
            }

            let id = self.add_node(&frame.node, tree, &mut output);
            if let Some(parent) = frame.parent {
                output.graph.add_edge(parent, id, Some(Relation::Contains));
            }

            let children = TreeSitterBase::named_children(&frame.node);
            if children.is_empty() {
                continue;
            }
            if frame.depth >= self.max_depth {
                output.metadata.max_depth_reached = true;
                continue;
            }
            stack.extend(children.into_iter().rev().map(|node| Frame {
                node,
                parent: Some(id),
                depth: frame.depth + 1,
            }));
        }

        output.metadata.total_nodes = output.graph.node_count();
        if output.metadata.max_depth_reached {
            warn!(max_depth = self.max_depth, "AST truncated at depth limit");
        }
        if !output.diagnostics.is_empty() {
            warn!(degraded = output.diagnostics.len(), "some nodes fell back to default labels");
        }
        debug!(
            nodes = output.graph.node_count(),
            edges = output.graph.edge_count(),
            functions = output.metadata.functions.len(),
            classes = output.metadata.classes.len(),
            "built AST graph"
        );
        output
    }

    /// Single-node output for source that failed to parse.
    pub fn placeholder(error: &ParseError) -> BuildOutput {
        let text = error.to_string();
        let graph = Graph::placeholder(PARSE_ERROR_NODE_TYPE, NodeKind::Message, text.clone());
        BuildOutput {
            metadata: Metadata {
                parse_error: Some(text),
                total_nodes: graph.node_count(),
                ..Metadata::default()
            },
            graph,
            diagnostics: Vec::new(),
        }
    }

    fn add_node(&self, node: &Node, tree: &NativeTree, output: &mut BuildOutput) -> NodeId {
        let kind = self.adapter.classify(node.kind());
        let line = tree.line(node);

        let (label, label_error) = match self.extract_label(kind, node, tree) {
            Ok(label) => (truncate_label(&label, self.max_label_len), None),
            Err(err) => (node.kind().to_string(), Some(err)),
        };
        let id = output.graph.add_node(node.kind(), kind, label, Some(line));

        let metadata_error = self
            .adapter
            .collect_metadata(node, tree, &mut output.metadata)
            .err();
        for err in label_error.into_iter().chain(metadata_error) {
            debug!(node = %id, line, error = %err, "degraded node");
            output.diagnostics.push(Diagnostic {
                node: id,
                line: Some(line),
                message: err.to_string(),
            });
        }
        id
    }

    fn extract_label(&self, kind: NodeKind, node: &Node, tree: &NativeTree) -> Result<String, ExtractionError> {
        let label = match kind.label_rule() {
            LabelRule::TypeTag => node.kind(),
            LabelRule::NodeText => first_line(tree.text(node)?),
            LabelRule::Callee => self
                .adapter
                .callee_name(node, tree)
                .ok_or(ExtractionError::Unnamed { kind: node.kind() })?,
            LabelRule::DeclaredName => self.adapter.declared_name(node, tree)?,
            LabelRule::ImportPath => import_path(tree.text(node)?),
        };
        Ok(label.to_string())
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("").trim()
}

fn import_path(text: &str) -> &str {
    let text = first_line(text).trim_end_matches(';').trim();
    text.strip_prefix("import ").unwrap_or(text).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_path() {
        assert_eq!(import_path("import java.util.List;"), "java.util.List");
        assert_eq!(import_path("import os, sys"), "os, sys");
        assert_eq!(import_path("from a import b"), "from a import b");
    }

    #[test]
    fn test_placeholder_carries_error() {
        let output = GraphBuilder::placeholder(&ParseError::new(1, "invalid syntax near `def f(:`"));
        assert_eq!(output.graph.node_count(), 1);
        assert_eq!(output.graph.edge_count(), 0);
        assert_eq!(output.metadata.total_nodes, 1);
        let error = output.metadata.parse_error.as_deref().unwrap();
        assert!(error.contains("line 1"));
        assert_eq!(output.graph.nodes()[0].label, error);
        assert_eq!(output.graph.nodes()[0].node_type, PARSE_ERROR_NODE_TYPE);
    }
}
