//! Core adapter trait for language-specific parsing and node classification.

use tree_sitter::Node;

use super::error::{ExtractionError, ParseError};
use super::language::Language;
use super::treesitter::NativeTree;
use crate::graph::{BindingKind, Metadata, NodeKind, VariableInfo};

/// Language-specific front end of the pipeline.
///
/// An adapter owns everything grammar-specific:
///
/// 1. **Parsing**: source text to a [`NativeTree`], or a [`ParseError`]
/// 2. **Classification**: grammar kinds onto the closed [`NodeKind`] set
/// 3. **Extraction**: names, callees and side-channel [`Metadata`]
/// 4. **Data flow**: how a node binds and reads names, for the DDG
///
/// The graph builder and synthesizers are grammar-agnostic and only talk to
/// the tree through this trait.
pub trait LanguageAdapter: Send + Sync {
    /// The language this adapter parses.
    fn language(&self) -> Language;

    /// File extensions this adapter handles.
    fn supported_extensions(&self) -> &[&'static str];

    /// Check if this adapter can handle the given file extension.
    fn can_parse(&self, extension: &str) -> bool {
        self.supported_extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }

    /// Parse source text into a native tree.
    ///
    /// Implementations normalize line endings and strip a byte-order mark
    /// first, and may retry once in a relaxed mode before giving up.
    fn parse(&self, source: &str) -> Result<NativeTree, ParseError>;

    /// Map a grammar kind onto the closed kind set.
    fn classify(&self, grammar_kind: &str) -> NodeKind;

    /// Name declared by a declaration node.
    fn declared_name<'t>(&self, node: &Node<'t>, tree: &'t NativeTree) -> Result<&'t str, ExtractionError> {
        tree.field_text(node, "name")
    }

    /// Callee name of a call/invocation node.
    fn callee_name<'t>(&self, node: &Node<'t>, tree: &'t NativeTree) -> Option<&'t str>;

    /// Parameter names of a function declaration node.
    fn parameters<'t>(&self, node: &Node<'t>, tree: &'t NativeTree) -> Vec<&'t str>;

    /// Record function, class, import and variable metadata for one node.
    fn collect_metadata(&self, node: &Node, tree: &NativeTree, metadata: &mut Metadata) -> Result<(), ExtractionError>;

    /// How a node participates in name binding and lookup.
    fn flow_step<'t>(&self, node: &Node<'t>, tree: &'t NativeTree) -> FlowStep<'t>;

    /// Names bound by an assignment target.
    fn bind_targets<'t>(&self, target: &Node<'t>, tree: &'t NativeTree, binding: BindingKind) -> BindTargets<'t>;
}

/// Data-flow role of a native node.
#[derive(Debug)]
pub enum FlowStep<'t> {
    /// Evaluate `values`, bind `targets`, then walk `then`.
    Bind {
        values: Vec<Node<'t>>,
        targets: Vec<Node<'t>>,
        binding: BindingKind,
        then: Vec<Node<'t>>,
    },
    /// A function declaration: parameters are bound, then `body` is walked.
    Function {
        name: &'t str,
        parameters: Vec<&'t str>,
        body: Vec<Node<'t>>,
    },
    /// A read of a named value.
    Reference(&'t str),
    /// Walk these children in order.
    Walk(Vec<Node<'t>>),
    /// Nothing below this node reads or binds values.
    Skip,
}

/// A single name bound by an assignment target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundName<'t> {
    pub name: &'t str,
    pub line: u32,
    pub binding: BindingKind,
}

/// Result of destructuring an assignment target.
#[derive(Debug, Default)]
pub struct BindTargets<'t> {
    /// Names the target binds.
    pub names: Vec<BoundName<'t>>,
    /// Sub-expressions that are read, not bound (`a[i] = ...` reads `a` and `i`).
    pub reads: Vec<Node<'t>>,
}

/// Record the variables bound at `node` into `metadata`.
///
/// Shared by the adapters so metadata and the data-dependency walk agree on
/// what counts as a binding.
pub(crate) fn record_bindings(
    adapter: &dyn LanguageAdapter,
    node: &Node,
    tree: &NativeTree,
    metadata: &mut Metadata,
) {
    if let FlowStep::Bind { targets, binding, .. } = adapter.flow_step(node, tree) {
        for target in targets {
            for bound in adapter.bind_targets(&target, tree, binding).names {
                metadata.variables.push(VariableInfo {
                    name: bound.name.to_string(),
                    line: bound.line,
                    binding: bound.binding,
                });
            }
        }
    }
}
