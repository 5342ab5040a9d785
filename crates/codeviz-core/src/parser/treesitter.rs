//! Tree-sitter based parsing utilities shared across language adapters.

use tree_sitter::{Language as TSLanguage, Node, Parser as TSParser, Tree};

use super::error::{ExtractionError, ParseError};
use super::language::Language;

/// Maximum characters of offending text quoted in a syntax error message.
const ERROR_SNIPPET_LEN: usize = 24;

/// Native parse tree produced by a [`super::LanguageAdapter`].
///
/// Owns the (normalized) source so node text and line numbers can be
/// resolved for the lifetime of one pipeline run.
#[derive(Debug)]
pub struct NativeTree {
    tree: Tree,
    source: String,
    language: Language,
    /// Lines prepended by a relaxed fallback parse.
    line_offset: u32,
    /// Rooted at the body of a synthetic wrapper declaration.
    wrapped: bool,
}

impl NativeTree {
    pub(crate) fn new(tree: Tree, source: String, language: Language) -> Self {
        Self {
            tree,
            source,
            language,
            line_offset: 0,
            wrapped: false,
        }
    }

    /// Tree parsed from a snippet wrapped in `line_offset` synthetic lines.
    ///
    /// The root becomes the `body` of the first top-level declaration.
    pub(crate) fn wrapped(tree: Tree, source: String, language: Language, line_offset: u32) -> Self {
        Self {
            tree,
            source,
            language,
            line_offset,
            wrapped: true,
        }
    }

    /// Root of the user-visible tree.
    pub fn root(&self) -> Node<'_> {
        let root = self.tree.root_node();
        if !self.wrapped {
            return root;
        }
        root.named_child(0)
            .and_then(|decl| decl.child_by_field_name("body"))
            .unwrap_or(root)
    }

    /// Normalized source text the tree was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// 1-based line of a node in the caller's original text.
    pub fn line(&self, node: &Node) -> u32 {
        TreeSitterBase::node_line(node)
            .saturating_sub(self.line_offset)
            .max(1)
    }

    /// Source text covered by a node.
    pub fn text<'t>(&'t self, node: &Node) -> Result<&'t str, ExtractionError> {
        self.source
            .get(node.byte_range())
            .ok_or(ExtractionError::TextOutOfRange { kind: node.kind() })
    }

    /// Text of a named field of `node`.
    pub fn field_text<'t>(&'t self, node: &Node, field: &'static str) -> Result<&'t str, ExtractionError> {
        let child = node
            .child_by_field_name(field)
            .ok_or(ExtractionError::MissingField { kind: node.kind(), field })?;
        self.text(&child)
    }
}

/// Base tree-sitter parser with shared functionality.
pub struct TreeSitterBase {
    language: TSLanguage,
    language_name: &'static str,
    extensions: &'static [&'static str],
}

impl TreeSitterBase {
    pub fn new(language: TSLanguage, language_name: &'static str, extensions: &'static [&'static str]) -> Self {
        Self {
            language,
            language_name,
            extensions,
        }
    }

    pub fn language_name(&self) -> &'static str {
        self.language_name
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        self.extensions
    }

    /// Parse source code into a tree-sitter tree.
    pub fn parse_tree(&self, content: &str) -> Result<Tree, ParseError> {
        let mut parser = TSParser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ParseError::new(1, format!("Failed to set language: {}", e)))?;

        parser
            .parse(content, None)
            .ok_or_else(|| ParseError::new(1, "Failed to parse content"))
    }

    /// Parse and reject trees that contain error recovery nodes.
    pub fn parse_strict(&self, content: &str) -> Result<Tree, ParseError> {
        let tree = self.parse_tree(content)?;
        match first_syntax_error(tree.root_node(), content) {
            Some(err) => Err(err),
            None => Ok(tree),
        }
    }

    /// Get line number (1-based) for a node.
    pub fn node_line(node: &Node) -> u32 {
        node.start_position().row as u32 + 1
    }

    /// Named (structural) children of a node, in source order.
    pub fn named_children<'t>(node: &Node<'t>) -> Vec<Node<'t>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor).collect()
    }

    /// First child of a specific kind.
    pub fn child_of_kind<'t>(node: &Node<'t>, kind: &str) -> Option<Node<'t>> {
        let mut cursor = node.walk();
        let found = node.children(&mut cursor).find(|n| n.kind() == kind);
        found
    }
}

/// Strip a byte-order mark and normalize line endings to `\n`.
pub fn normalize_source(source: &str) -> String {
    source
        .trim_start_matches('\u{feff}')
        .replace("\r\n", "\n")
        .replace('\r', "\n")
}

/// Locate the first ERROR or MISSING node in document order.
pub fn first_syntax_error(root: Node, content: &str) -> Option<ParseError> {
    if !root.has_error() {
        return None;
    }

    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_missing() {
            return Some(ParseError::new(
                TreeSitterBase::node_line(&node),
                format!("missing `{}`", node.kind()),
            ));
        }
        if node.is_error() {
            let snippet: String = content
                .get(node.byte_range())
                .and_then(|text| text.lines().map(str::trim).find(|l| !l.is_empty()))
                .unwrap_or("")
                .chars()
                .take(ERROR_SNIPPET_LEN)
                .collect();
            let message = if snippet.is_empty() {
                "invalid syntax".to_string()
            } else {
                format!("invalid syntax near `{}`", snippet)
            };
            return Some(ParseError::new(TreeSitterBase::node_line(&node), message));
        }

        let mut cursor = node.walk();
        let children: Vec<Node> = node
            .children(&mut cursor)
            .filter(|c| c.has_error() || c.is_missing())
            .collect();
        stack.extend(children.into_iter().rev());
    }

    // has_error() without a locatable node; report at the root.
    Some(ParseError::new(TreeSitterBase::node_line(&root), "invalid syntax"))
}
