//! Language adapters: source text to native parse trees.
//!
//! Provides a `LanguageAdapter` trait with tree-sitter implementations for
//! Python and Java.
//!
//! ## Components
//!
//! - `LanguageAdapter` trait - parsing, kind classification, metadata and data flow
//! - `AdapterRegistry` - maps languages and file extensions to adapters
//! - `NativeTree` - a parsed tree together with its normalized source
//!
//! ## Supported Languages
//!
//! - Python (tree-sitter-python)
//! - Java (tree-sitter-java)

mod error;
mod java;
mod language;
mod python;
mod registry;
mod traits;
mod treesitter;

pub use error::{ExtractionError, ParseError};
pub use java::JavaAdapter;
pub use language::Language;
pub use python::PythonAdapter;
pub use registry::AdapterRegistry;
pub use traits::{BindTargets, BoundName, FlowStep, LanguageAdapter};
pub use treesitter::{first_syntax_error, normalize_source, NativeTree, TreeSitterBase};
