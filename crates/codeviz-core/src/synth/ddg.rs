//! Definition-to-use data dependency graph.
//!
//! Names resolve through one flat table holding the most recent definition
//! of each textual name. There is no lexical scoping: a use may link to a
//! same-named definition in an unrelated function.

use std::collections::HashMap;

use tracing::debug;
use tree_sitter::Node;

use crate::graph::{BindingKind, Graph, Metadata, NodeId, NodeKind, Relation};
use crate::parser::{BoundName, FlowStep, LanguageAdapter, NativeTree};

/// Label of the placeholder emitted when nothing was found.
pub const NO_DEPENDENCIES_LABEL: &str = "No data dependencies found";

enum Task<'t> {
    Visit(Node<'t>),
    /// Bind assignment targets once their values were visited.
    Bind {
        targets: Vec<Node<'t>>,
        binding: BindingKind,
    },
}

#[derive(Default)]
struct FlowState {
    graph: Graph,
    /// Most recent definition per textual name.
    definitions: HashMap<String, NodeId>,
    /// Parameter nodes per declared `(function name, line)`.
    declared: HashMap<(String, u32), Vec<NodeId>>,
    uses: usize,
}

impl FlowState {
    fn declare<S: AsRef<str>>(&mut self, name: &str, line: u32, parameters: &[S]) -> Vec<NodeId> {
        let function = self
            .graph
            .add_node("function", NodeKind::Function, name, Some(line));
        let parameters: Vec<NodeId> = parameters
            .iter()
            .map(|param| {
                let id = self
                    .graph
                    .add_node("parameter", NodeKind::Parameter, param.as_ref(), Some(line));
                self.graph.add_edge(id, function, Some(Relation::Uses));
                id
            })
            .collect();

        self.declared
            .insert((name.to_string(), line), parameters.clone());
        parameters
    }

    /// Parameters become the current definitions of their names.
    fn enter_function(&mut self, name: &str, line: u32, parameters: &[&str]) {
        let declared = match self.declared.get(&(name.to_string(), line)) {
            Some(declared) => declared.clone(),
            // Declared below the depth limit, so missing from metadata.
            None => self.declare(name, line, parameters),
        };
        for (param, id) in parameters.iter().zip(declared) {
            self.definitions.insert(param.to_string(), id);
        }
    }

    fn define(&mut self, bound: &BoundName) {
        let (node_type, kind) = match bound.binding {
            BindingKind::Field => ("field", NodeKind::Field),
            BindingKind::Parameter => ("parameter", NodeKind::Parameter),
            BindingKind::Local | BindingKind::LoopTarget => ("variable", NodeKind::Variable),
        };
        let id = self
            .graph
            .add_node(node_type, kind, bound.name, Some(bound.line));
        self.definitions.insert(bound.name.to_string(), id);
    }

    fn reference(&mut self, name: &str, line: u32) {
        let Some(&definition) = self.definitions.get(name) else {
            return;
        };
        let id = self.graph.add_node("use", NodeKind::Use, name, Some(line));
        self.graph
            .add_edge(definition, id, Some(Relation::Defines));
        self.uses += 1;
    }
}

/// Builds the data dependency graph.
pub struct DataDependencySynthesizer<'a> {
    adapter: &'a dyn LanguageAdapter,
}

impl<'a> DataDependencySynthesizer<'a> {
    pub fn new(adapter: &'a dyn LanguageAdapter) -> Self {
        Self { adapter }
    }

    pub fn synthesize(&self, metadata: &Metadata, tree: &NativeTree) -> Graph {
        let mut state = FlowState::default();
        for function in &metadata.functions {
            state.declare(&function.name, function.line, function.parameters.as_slice());
        }

        let mut stack = vec![Task::Visit(tree.root())];
        while let Some(task) = stack.pop() {
            match task {
                Task::Visit(node) => match self.adapter.flow_step(&node, tree) {
                    FlowStep::Bind {
                        values,
                        targets,
                        binding,
                        then,
                    } => {
                        // Popped as: values, bind, then.
                        stack.extend(then.into_iter().rev().map(Task::Visit));
                        stack.push(Task::Bind { targets, binding });
                        stack.extend(values.into_iter().rev().map(Task::Visit));
                    }
                    FlowStep::Function {
                        name,
                        parameters,
                        body,
                    } => {
                        state.enter_function(name, tree.line(&node), &parameters);
                        stack.extend(body.into_iter().rev().map(Task::Visit));
                    }
                    FlowStep::Reference(name) => state.reference(name, tree.line(&node)),
                    FlowStep::Walk(children) => stack.extend(children.into_iter().rev().map(Task::Visit)),
                    FlowStep::Skip => {}
                },
                Task::Bind { targets, binding } => {
                    let mut reads = Vec::new();
                    for target in &targets {
                        let bound = self.adapter.bind_targets(target, tree, binding);
                        for name in &bound.names {
                            state.define(name);
                        }
                        reads.extend(bound.reads);
                    }
                    stack.extend(reads.into_iter().rev().map(Task::Visit));
                }
            }
        }

        if state.graph.is_empty() {
            debug!("no data dependencies; emitting placeholder");
            return Graph::placeholder("message", NodeKind::Message, NO_DEPENDENCIES_LABEL);
        }

        debug!(
            nodes = state.graph.node_count(),
            uses = state.uses,
            "synthesized data dependency graph"
        );
        state.graph
    }
}
