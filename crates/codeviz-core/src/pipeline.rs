//! End-to-end pipeline: parse, build, synthesize, lay out.
//!
//! Stateless and single-pass per request. The only hard failure is an
//! unsupported language; malformed source comes back as a normal
//! [`Visualization`] holding a one-node placeholder graph.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::PipelineError;
use crate::graph::{style_table, BuildOutput, Diagnostic, Graph, GraphBuilder, Metadata, StyleTable};
use crate::layout::{layout_seed, LayoutEngine, Positions};
use crate::parser::{AdapterRegistry, Language};
use crate::stats::CodeStats;
use crate::synth::{ControlFlowSynthesizer, DataDependencySynthesizer};

/// Diagram kinds the pipeline can produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramType {
    #[default]
    Ast,
    Cfg,
    Ddg,
}

impl DiagramType {
    pub const ALL: [DiagramType; 3] = [DiagramType::Ast, DiagramType::Cfg, DiagramType::Ddg];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ast => "ast",
            Self::Cfg => "cfg",
            Self::Ddg => "ddg",
        }
    }

    /// Diagram title shown above the rendered graph.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Ast => "Abstract Syntax Tree (AST)",
            Self::Cfg => "Control Flow Graph (CFG)",
            Self::Ddg => "Data Dependency Graph (DDG)",
        }
    }

    /// Whether the produced graph is a tree (AST).
    pub fn is_tree(&self) -> bool {
        matches!(self, Self::Ast)
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagramType {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ast" => Ok(Self::Ast),
            "cfg" => Ok(Self::Cfg),
            "ddg" => Ok(Self::Ddg),
            _ => Err(PipelineError::UnsupportedDiagram(s.to_string())),
        }
    }
}

/// One pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualizeRequest {
    pub source: String,
    pub language: Language,
    #[serde(default)]
    pub diagram: DiagramType,
    /// Overrides `pipeline.max_depth` from the config.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    /// Wall-clock point after which the layout stops refining.
    #[serde(skip)]
    pub deadline: Option<Instant>,
}

impl VisualizeRequest {
    pub fn new(source: impl Into<String>, language: Language, diagram: DiagramType) -> Self {
        Self {
            source: source.into(),
            language,
            diagram,
            max_depth: None,
            deadline: None,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Everything a renderer needs for one diagram.
#[derive(Debug, Clone, Serialize)]
pub struct Visualization {
    pub title: String,
    pub language: Language,
    pub diagram: DiagramType,
    pub graph: Graph,
    pub metadata: Metadata,
    pub positions: Positions,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
    /// Color and size hint per node kind.
    pub styles: StyleTable,
}

/// The parse -> build -> synthesize -> layout pipeline.
pub struct Pipeline {
    registry: AdapterRegistry,
    config: Config,
    layout: LayoutEngine,
}

impl Pipeline {
    /// Pipeline over the built-in adapters.
    pub fn new(config: Config) -> Self {
        Self::with_registry(config, AdapterRegistry::new())
    }

    pub fn with_registry(config: Config, registry: AdapterRegistry) -> Self {
        let layout = LayoutEngine::new(config.layout.clone());
        Self {
            registry,
            config,
            layout,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Run one request.
    pub fn run(&self, request: &VisualizeRequest) -> Result<Visualization, PipelineError> {
        let adapter = self.registry.adapter(request.language)?;
        let builder = GraphBuilder::new(adapter.as_ref())
            .with_max_depth(request.max_depth.unwrap_or(self.config.pipeline.max_depth))
            .with_max_label_len(self.config.pipeline.max_label_len);

        let (output, tree) = match adapter.parse(&request.source) {
            Ok(tree) => (builder.build(&tree), Some(tree)),
            Err(err) => {
                warn!(language = %request.language, line = err.line, error = %err.message, "parse failed");
                (GraphBuilder::placeholder(&err), None)
            }
        };
        let BuildOutput {
            graph,
            metadata,
            diagnostics,
        } = output;

        // A parse failure keeps its placeholder whatever the diagram.
        let graph = match (request.diagram, tree.as_ref()) {
            (DiagramType::Ast, _) | (_, None) => graph,
            (DiagramType::Cfg, Some(tree)) => {
                ControlFlowSynthesizer::new(adapter.as_ref()).synthesize(&metadata, Some(tree))
            }
            (DiagramType::Ddg, Some(tree)) => DataDependencySynthesizer::new(adapter.as_ref()).synthesize(&metadata, tree),
        };

        let seed = layout_seed(&request.source, request.language, request.diagram);
        let positions = self
            .layout
            .layout_until(&graph, seed, request.diagram.is_tree() && tree.is_some(), request.deadline);

        debug!(
            language = %request.language,
            diagram = %request.diagram,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "pipeline finished"
        );

        Ok(Visualization {
            title: request.diagram.title().to_string(),
            language: request.language,
            diagram: request.diagram,
            graph,
            metadata,
            positions,
            diagnostics,
            styles: style_table(),
        })
    }

    /// Size and declaration counts of `source`, over the full tree.
    pub fn code_stats(&self, source: &str, language: Language) -> Result<CodeStats, PipelineError> {
        let adapter = self.registry.adapter(language)?;
        Ok(CodeStats::collect(source, adapter.as_ref()))
    }

    /// Run with string parameters as received at a boundary.
    ///
    /// `language` may be `auto` to detect it from the source.
    pub fn run_source(&self, source: &str, language: &str, diagram: &str) -> Result<Visualization, PipelineError> {
        let language = resolve_language(source, language)?;
        let diagram: DiagramType = diagram.parse()?;
        self.run(&VisualizeRequest::new(source, language, diagram))
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Parse a language name, detecting it from the source for `auto`.
pub fn resolve_language(source: &str, language: &str) -> Result<Language, PipelineError> {
    if language.trim().eq_ignore_ascii_case("auto") {
        let detected = Language::detect(source);
        debug!(language = %detected, "detected language");
        Ok(detected)
    } else {
        language.parse()
    }
}
