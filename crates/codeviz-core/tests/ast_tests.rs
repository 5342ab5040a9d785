use std::collections::HashSet;

use codeviz_core::graph::{BindingKind, BuildOutput, GraphBuilder, NodeKind, Relation};
use codeviz_core::parser::{JavaAdapter, LanguageAdapter, PythonAdapter};
use codeviz_core::Graph;

const PYTHON_SAMPLE: &str = r#"
import os
from collections import defaultdict as dd

class Greeter(Base):
    def __init__(self, name):
        self.name = name

    def greet(self, times=1):
        for i in range(times):
            print(f"hello {self.name}")
        return len(self.name)

def main():
    g = Greeter("world")
    g.greet(2)

if __name__ == "__main__":
    main()
"#;

const JAVA_SAMPLE: &str = r#"
import java.util.List;

public class Counter extends Base implements Runnable {
    private int count = 0;

    public Counter(int start) {
        this.count = start;
    }

    @Override
    public void run() {
        for (int i = 0; i < 10; i++) {
            count += i;
        }
        System.out.println(count);
    }
}
"#;

fn build(adapter: &dyn LanguageAdapter, source: &str, max_depth: usize) -> BuildOutput {
    let tree = adapter.parse(source).unwrap();
    GraphBuilder::new(adapter).with_max_depth(max_depth).build(&tree)
}

fn assert_tree(graph: &Graph) {
    assert!(!graph.is_empty());
    let roots = graph.roots();
    assert_eq!(roots.len(), 1, "exactly one root");

    let degrees = graph.in_degrees();
    for node in graph.nodes() {
        let expected = if node.id == roots[0] { 0 } else { 1 };
        assert_eq!(degrees[&node.id], expected, "in-degree of {}", node.label);
    }

    // Every node reachable from the root with in-degree <= 1 means no cycles.
    assert_eq!(graph.depths_from_roots().len(), graph.node_count());
    assert!(graph
        .edges()
        .iter()
        .all(|e| e.relation == Some(Relation::Contains)));
}

/// Graph shape with ids replaced by insertion positions.
fn shape(graph: &Graph) -> (Vec<(String, String)>, HashSet<(usize, usize)>) {
    let nodes = graph
        .nodes()
        .iter()
        .map(|n| (n.node_type.clone(), n.label.clone()))
        .collect();
    let edges = graph
        .edges()
        .iter()
        .map(|e| (graph.index_of(e.source).unwrap(), graph.index_of(e.target).unwrap()))
        .collect();
    (nodes, edges)
}

#[test]
fn test_python_ast_is_a_tree() {
    let output = build(&PythonAdapter::new(), PYTHON_SAMPLE, 64);
    assert_tree(&output.graph);
    assert!(!output.metadata.max_depth_reached);
    assert_eq!(output.metadata.total_nodes, output.graph.node_count());
}

#[test]
fn test_java_ast_is_a_tree() {
    let output = build(&JavaAdapter::new(), JAVA_SAMPLE, 64);
    assert_tree(&output.graph);
}

#[test]
fn test_reparse_is_isomorphic() {
    for (adapter, source) in [
        (&PythonAdapter::new() as &dyn LanguageAdapter, PYTHON_SAMPLE),
        (&JavaAdapter::new() as &dyn LanguageAdapter, JAVA_SAMPLE),
    ] {
        let first = build(adapter, source, 10);
        let second = build(adapter, source, 10);
        assert_eq!(shape(&first.graph), shape(&second.graph));
    }
}

#[test]
fn test_depth_limit_truncates() {
    let source = "x = [[[[[[[[[[[[[[[[1]]]]]]]]]]]]]]]]\n";
    let adapter = PythonAdapter::new();

    let limited = build(&adapter, source, 4);
    assert!(limited.metadata.max_depth_reached);
    assert_tree(&limited.graph);
    let deepest = limited.graph.depths_from_roots().into_values().max().unwrap();
    assert!(deepest <= 4);

    let full = build(&adapter, source, 100);
    assert!(!full.metadata.max_depth_reached);
    assert!(full.graph.node_count() > limited.graph.node_count());
}

#[test]
fn test_python_labels() {
    let output = build(&PythonAdapter::new(), PYTHON_SAMPLE, 64);
    let labels = |kind: NodeKind| -> Vec<&str> {
        output
            .graph
            .nodes()
            .iter()
            .filter(|n| n.kind == kind)
            .map(|n| n.label.as_str())
            .collect()
    };

    assert_eq!(labels(NodeKind::Class), vec!["Greeter"]);
    assert_eq!(labels(NodeKind::Function), vec!["__init__", "greet", "main"]);
    assert!(labels(NodeKind::Call).contains(&"print"));
    assert!(labels(NodeKind::Call).contains(&"greet"));
    assert!(labels(NodeKind::Import).contains(&"os"));

    let module = &output.graph.nodes()[0];
    assert_eq!(module.node_type, "module");
    assert_eq!(module.label, "module");
}

#[test]
fn test_python_metadata() {
    let output = build(&PythonAdapter::new(), PYTHON_SAMPLE, 64);
    let meta = &output.metadata;

    let names: Vec<&str> = meta.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["__init__", "greet", "main"]);
    assert_eq!(meta.functions[0].parameters, vec!["name"]);
    assert_eq!(meta.classes[0].supertypes[0].name, "Base");
    assert_eq!(meta.imports.len(), 2);
    assert_eq!(meta.imports[1].alias.as_deref(), Some("dd"));
    assert!(meta.variables.iter().any(|v| v.name == "self.name"));
    assert!(meta.variables.iter().any(|v| v.name == "g"));
}

#[test]
fn test_java_labels_and_metadata() {
    let output = build(&JavaAdapter::new(), JAVA_SAMPLE, 64);
    let graph = &output.graph;

    let class = graph.nodes().iter().find(|n| n.kind == NodeKind::Class).unwrap();
    assert_eq!(class.label, "Counter");
    assert_eq!(class.line, Some(4));

    let import = graph.nodes().iter().find(|n| n.kind == NodeKind::Import).unwrap();
    assert_eq!(import.label, "java.util.List");

    let calls: Vec<&str> = graph
        .nodes()
        .iter()
        .filter(|n| n.kind == NodeKind::Call)
        .map(|n| n.label.as_str())
        .collect();
    assert_eq!(calls, vec!["println"]);

    let meta = &output.metadata;
    let names: Vec<&str> = meta.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Counter", "run"]);
    assert_eq!(meta.functions[1].return_type.as_deref(), Some("void"));
    assert!(meta.functions[1].modifiers.contains(&"public".to_string()));
    assert_eq!(meta.classes[0].supertypes.len(), 2);
}

#[test]
fn test_long_labels_are_truncated() {
    let name = "a_really_long_function_name_that_keeps_going";
    let source = format!("def {}():\n    pass\n", name);
    let output = build(&PythonAdapter::new(), &source, 10);

    let function = output
        .graph
        .nodes()
        .iter()
        .find(|n| n.kind == NodeKind::Function)
        .unwrap();
    assert_eq!(function.label.chars().count(), 30);
    assert!(function.label.ends_with("..."));
    assert!(name.starts_with(function.label.trim_end_matches("...")));

    // Metadata keeps the full name.
    assert_eq!(output.metadata.functions[0].name, name);
}

#[test]
fn test_line_numbers_are_one_based() {
    let output = build(&PythonAdapter::new(), "x = 1\n\ny = 2\n", 10);
    let lines: Vec<Option<u32>> = output
        .graph
        .nodes()
        .iter()
        .filter(|n| n.node_type == "assignment")
        .map(|n| n.line)
        .collect();
    assert_eq!(lines, vec![Some(1), Some(3)]);
}

#[test]
fn test_unnamed_call_degrades_to_type_label() {
    let output = build(&PythonAdapter::new(), "fns = [print]\nfns[0](1)\n", 64);

    let call = output
        .graph
        .nodes()
        .iter()
        .find(|n| n.kind == NodeKind::Call)
        .unwrap();
    assert_eq!(call.label, "call");
    assert_eq!(call.line, Some(2));

    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].node, call.id);
    assert_eq!(output.diagnostics[0].line, Some(2));
}

#[test]
fn test_python_binding_sites_are_variables() {
    let output = build(
        &PythonAdapter::new(),
        "zs = [y for y in range(3)]\nwith open('f') as fh:\n    data = fh.read()\nif (n := len(data)) > 1:\n    print(n)\n",
        64,
    );
    let variables: Vec<(&str, u32, BindingKind)> = output
        .metadata
        .variables
        .iter()
        .map(|v| (v.name.as_str(), v.line, v.binding))
        .collect();

    assert!(variables.contains(&("y", 1, BindingKind::LoopTarget)));
    assert!(variables.contains(&("fh", 2, BindingKind::Local)));
    assert!(variables.contains(&("data", 3, BindingKind::Local)));
    assert!(variables.contains(&("n", 4, BindingKind::Local)));
    assert!(output.diagnostics.is_empty());
}
