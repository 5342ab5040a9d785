//! Function-level control flow graph.
//!
//! Not a basic-block CFG: one node per declared function, wired
//! `entry -> function -> exit`, plus `calls` edges discovered by matching
//! invocation callee names against declared function names.

use std::collections::HashMap;

use tracing::debug;

use crate::graph::{Graph, Metadata, NodeId, NodeKind, Relation};
use crate::parser::{LanguageAdapter, NativeTree, TreeSitterBase};

/// Label of the placeholder emitted when no function is declared.
pub const NO_FUNCTIONS_LABEL: &str = "No functions found";

/// Label of the synthetic caller for module-level calls.
pub const GLOBAL_LABEL: &str = "Global";

/// Innermost function enclosing a native node.
#[derive(Debug, Clone, Copy)]
enum Scope {
    Module,
    Function(NodeId),
    /// Inside a declaration that has no graph node.
    Detached,
}

/// Builds the call graph from metadata and the native tree.
pub struct ControlFlowSynthesizer<'a> {
    adapter: &'a dyn LanguageAdapter,
}

impl<'a> ControlFlowSynthesizer<'a> {
    pub fn new(adapter: &'a dyn LanguageAdapter) -> Self {
        Self { adapter }
    }

    /// Synthesize the call graph.
    ///
    /// Without a tree only the entry/function/exit skeleton is produced.
    pub fn synthesize(&self, metadata: &Metadata, tree: Option<&NativeTree>) -> Graph {
        if metadata.functions.is_empty() {
            debug!("no functions declared; emitting placeholder");
            return Graph::placeholder("message", NodeKind::Message, NO_FUNCTIONS_LABEL);
        }

        let mut graph = Graph::new();
        // Same-named declarations share one node.
        let mut functions: HashMap<&str, NodeId> = HashMap::new();
        for function in &metadata.functions {
            if functions.contains_key(function.name.as_str()) {
                continue;
            }
            let line = Some(function.line);
            let id = graph.add_node("function", NodeKind::Function, function.name.as_str(), line);
            let entry = graph.add_node("entry", NodeKind::Entry, format!("{}_entry", function.name), line);
            let exit = graph.add_node("exit", NodeKind::Exit, format!("{}_exit", function.name), line);
            graph.add_edge(entry, id, Some(Relation::Flow));
            graph.add_edge(id, exit, Some(Relation::Flow));
            functions.insert(function.name.as_str(), id);
        }

        let calls = tree.map_or(0, |tree| self.link_calls(tree, &functions, &mut graph));
        let dropped = graph.retain_connected();

        debug!(
            functions = functions.len(),
            calls,
            dropped,
            "synthesized control flow graph"
        );
        graph
    }

    /// Add a `calls` edge for every invocation of a declared function.
    /// Returns the number of distinct edges added.
    fn link_calls(&self, tree: &NativeTree, functions: &HashMap<&str, NodeId>, graph: &mut Graph) -> usize {
        let mut global: Option<NodeId> = None;
        let mut added = 0;
        let mut stack = vec![(tree.root(), Scope::Module)];

        while let Some((node, scope)) = stack.pop() {
            let kind = self.adapter.classify(node.kind());

            let scope = if kind.is_function() {
                self.adapter
                    .declared_name(&node, tree)
                    .ok()
                    .and_then(|name| functions.get(name))
                    .map_or(Scope::Detached, |&id| Scope::Function(id))
            } else {
                scope
            };

            if kind == NodeKind::Call {
                let callee = self
                    .adapter
                    .callee_name(&node, tree)
                    .and_then(|name| functions.get(name))
                    .copied();
                let caller = match scope {
                    Scope::Function(id) => Some(id),
                    Scope::Module if callee.is_some() => Some(
                        *global.get_or_insert_with(|| graph.add_node("program", NodeKind::Program, GLOBAL_LABEL, None)),
                    ),
                    Scope::Module | Scope::Detached => None,
                };
                if let (Some(caller), Some(callee)) = (caller, callee) {
                    // Recursion is not drawn.
                    if caller != callee && graph.add_edge(caller, callee, Some(Relation::Calls)) {
                        added += 1;
                    }
                }
            }

            stack.extend(
                TreeSitterBase::named_children(&node)
                    .into_iter()
                    .rev()
                    .map(|child| (child, scope)),
            );
        }

        added
    }
}
