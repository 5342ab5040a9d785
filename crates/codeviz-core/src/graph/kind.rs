//! Closed node-kind set with its label rules and rendering hints.
//!
//! Adapters map grammar kinds onto [`NodeKind`]; everything else (label
//! extraction, colors, sizes) hangs off the single table in [`NodeKind::spec`].
//! New kinds are added by extending the table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Semantic class of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    // === Grammar-derived ===
    Module,
    Function,
    Class,
    Interface,
    Enum,
    Call,
    Identifier,
    Import,
    Variable,
    Parameter,
    Assignment,
    Literal,
    Return,
    Branch,
    Loop,
    Block,
    Other,

    // === Synthesized ===
    /// Synthetic function entry marker (CFG).
    Entry,
    /// Synthetic function exit marker (CFG).
    Exit,
    /// Module-level caller (CFG).
    Program,
    /// Field binding (DDG).
    Field,
    /// Read of a bound name (DDG).
    Use,
    /// Informational placeholder (parse errors, empty diagrams).
    Message,
}

/// How a node's label is derived from its native node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRule {
    /// The grammar kind itself.
    TypeTag,
    /// First line of the node's source text.
    NodeText,
    /// The callee of a call/invocation.
    Callee,
    /// The declared name of a declaration.
    DeclaredName,
    /// Import statement text without keywords or terminator.
    ImportPath,
}

/// Rendering hints for a node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeStyle {
    /// Hex color.
    pub color: &'static str,
    /// Relative node size.
    pub size: u32,
}

/// Table row for a node kind.
#[derive(Debug, Clone, Copy)]
pub struct KindSpec {
    pub label: LabelRule,
    pub style: NodeStyle,
}

/// Node-kind to rendering-hint lookup table handed to renderers.
pub type StyleTable = BTreeMap<NodeKind, NodeStyle>;

const fn spec(label: LabelRule, color: &'static str, size: u32) -> KindSpec {
    KindSpec {
        label,
        style: NodeStyle { color, size },
    }
}

impl NodeKind {
    pub const ALL: [NodeKind; 23] = [
        Self::Module,
        Self::Function,
        Self::Class,
        Self::Interface,
        Self::Enum,
        Self::Call,
        Self::Identifier,
        Self::Import,
        Self::Variable,
        Self::Parameter,
        Self::Assignment,
        Self::Literal,
        Self::Return,
        Self::Branch,
        Self::Loop,
        Self::Block,
        Self::Other,
        Self::Entry,
        Self::Exit,
        Self::Program,
        Self::Field,
        Self::Use,
        Self::Message,
    ];

    /// Label rule and style for this kind.
    pub fn spec(self) -> KindSpec {
        use LabelRule::*;
        match self {
            Self::Module => spec(TypeTag, "#6e7781", 14),
            Self::Function => spec(DeclaredName, "#FF6347", 20),
            Self::Class => spec(DeclaredName, "#4682B4", 25),
            Self::Interface => spec(DeclaredName, "#9a6700", 22),
            Self::Enum => spec(DeclaredName, "#cf222e", 22),
            Self::Call => spec(Callee, "#0969da", 12),
            Self::Identifier => spec(NodeText, "#D3D3D3", 8),
            Self::Import => spec(ImportPath, "#32CD32", 15),
            Self::Variable => spec(DeclaredName, "#8A2BE2", 15),
            Self::Parameter => spec(DeclaredName, "#ff7f0e", 12),
            Self::Assignment => spec(TypeTag, "#D3D3D3", 10),
            Self::Literal => spec(NodeText, "#D3D3D3", 8),
            Self::Return => spec(TypeTag, "#D3D3D3", 10),
            Self::Branch => spec(TypeTag, "#D3D3D3", 10),
            Self::Loop => spec(TypeTag, "#D3D3D3", 10),
            Self::Block => spec(TypeTag, "#D3D3D3", 8),
            Self::Other => spec(TypeTag, "#D3D3D3", 10),
            Self::Entry => spec(TypeTag, "#2ca02c", 15),
            Self::Exit => spec(TypeTag, "#d62728", 15),
            Self::Program => spec(TypeTag, "#1f77b4", 20),
            Self::Field => spec(TypeTag, "#2ca02c", 15),
            Self::Use => spec(TypeTag, "#8ac926", 10),
            Self::Message => spec(TypeTag, "#d62728", 20),
        }
    }

    pub fn label_rule(self) -> LabelRule {
        self.spec().label
    }

    pub fn style(self) -> NodeStyle {
        self.spec().style
    }

    /// Whether this kind declares a callable.
    pub fn is_function(self) -> bool {
        self == Self::Function
    }
}

/// The complete style table.
pub fn style_table() -> StyleTable {
    NodeKind::ALL.iter().map(|k| (*k, k.style())).collect()
}

/// Truncate a label to `max_len` characters, marking the cut with `...`.
pub fn truncate_label(label: &str, max_len: usize) -> String {
    if label.chars().count() <= max_len {
        return label.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let mut out: String = label.chars().take(keep).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_table_covers_every_kind() {
        let table = style_table();
        assert_eq!(table.len(), NodeKind::ALL.len());
        assert_eq!(table[&NodeKind::Function].color, "#FF6347");
    }

    #[test]
    fn test_declarations_use_declared_name() {
        for kind in [NodeKind::Function, NodeKind::Class, NodeKind::Variable] {
            assert_eq!(kind.label_rule(), LabelRule::DeclaredName);
        }
        assert_eq!(NodeKind::Call.label_rule(), LabelRule::Callee);
        assert_eq!(NodeKind::Block.label_rule(), LabelRule::TypeTag);
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("short", 30), "short");
        let long = "a".repeat(40);
        let cut = truncate_label(&long, 30);
        assert_eq!(cut.chars().count(), 30);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&NodeKind::Entry).unwrap(), "\"entry\"");
    }
}
