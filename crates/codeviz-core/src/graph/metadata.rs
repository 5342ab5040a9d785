//! Side-channel metadata collected while building the AST graph.

use serde::{Deserialize, Serialize};

use super::model::{NodeId, Relation};

/// A declared function or method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    pub line: u32,
    pub parameters: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    /// Java modifiers, Python decorators and `async`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<String>,
}

/// A supertype reference of a class declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supertype {
    pub name: String,
    /// `Extends` or `Implements`.
    pub relation: Relation,
}

impl Supertype {
    pub fn extends(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            relation: Relation::Extends,
        }
    }

    pub fn implements(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            relation: Relation::Implements,
        }
    }
}

/// A declared class, interface or enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    pub line: u32,
    pub supertypes: Vec<Supertype>,
}

/// Where a variable binding was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingKind {
    /// Assignment target or local declaration.
    Local,
    /// Class field or instance attribute.
    Field,
    /// Function parameter.
    Parameter,
    /// Loop variable.
    LoopTarget,
}

/// A variable binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableInfo {
    pub name: String,
    pub line: u32,
    pub binding: BindingKind,
}

/// Import statement flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFlags {
    /// Java `import static`.
    pub is_static: bool,
    /// `import a.b.*` / `from a import *`.
    pub is_wildcard: bool,
    /// Python `from a import b`.
    pub is_from: bool,
}

/// An imported module or symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportInfo {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub line: u32,
    pub flags: ImportFlags,
}

/// Everything the builder learned besides the graph itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub functions: Vec<FunctionInfo>,
    pub classes: Vec<ClassInfo>,
    pub variables: Vec<VariableInfo>,
    pub imports: Vec<ImportInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
    pub total_nodes: usize,
    pub max_depth_reached: bool,
}

impl Metadata {
    /// Look up a declared function by name and line.
    pub fn function_at(&self, name: &str, line: u32) -> Option<&FunctionInfo> {
        self.functions.iter().find(|f| f.name == name && f.line == line)
    }
}

/// A node whose label or metadata could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub node: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    pub message: String,
}
