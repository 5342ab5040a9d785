//! Uniform graph representation and the AST graph builder.
//!
//! ## Components
//!
//! - [`Graph`] - node/edge sets with idempotent edge insertion
//! - [`NodeKind`] - closed node-kind set with label rules and style hints
//! - [`Metadata`] - functions, classes, variables and imports seen while building
//! - [`GraphBuilder`] - walks a native tree into `{Graph, Metadata}`

mod builder;
mod kind;
mod metadata;
mod model;

pub use builder::{BuildOutput, GraphBuilder, PARSE_ERROR_NODE_TYPE};
pub use kind::{style_table, truncate_label, KindSpec, LabelRule, NodeKind, NodeStyle, StyleTable};
pub use metadata::{
    BindingKind, ClassInfo, Diagnostic, FunctionInfo, ImportFlags, ImportInfo, Metadata, Supertype,
    VariableInfo,
};
pub use model::{Edge, Graph, Node, NodeId, Relation};
