pub mod config;
pub mod error;
pub mod graph;
pub mod layout;
pub mod parser;
pub mod pipeline;
pub mod stats;
pub mod synth;

pub use config::{Config, ConfigError, LayoutConfig, PipelineConfig, ServerConfig};
pub use error::PipelineError;
pub use graph::{Diagnostic, Edge, Graph, GraphBuilder, Metadata, Node, NodeId, NodeKind, Relation};
pub use layout::{layout_seed, LayoutEngine, Point, Positions};
pub use parser::{AdapterRegistry, Language, LanguageAdapter, ParseError};
pub use pipeline::{resolve_language, DiagramType, Pipeline, VisualizeRequest, Visualization};
pub use stats::CodeStats;
pub use synth::{ControlFlowSynthesizer, DataDependencySynthesizer};
