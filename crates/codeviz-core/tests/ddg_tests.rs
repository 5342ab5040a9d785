use codeviz_core::synth::NO_DEPENDENCIES_LABEL;
use codeviz_core::{DiagramType, Graph, Language, NodeKind, Pipeline, Relation, VisualizeRequest};

fn ddg(source: &str, language: Language) -> Graph {
    Pipeline::default()
        .run(&VisualizeRequest::new(source, language, DiagramType::Ddg))
        .unwrap()
        .graph
}

/// `(definition kind, definition line, use line)` of every `defines` edge.
fn def_use(graph: &Graph, name: &str) -> Vec<(NodeKind, Option<u32>, Option<u32>)> {
    graph
        .edges()
        .iter()
        .filter(|e| e.relation == Some(Relation::Defines))
        .filter_map(|e| {
            let def = graph.node(e.source)?;
            let used = graph.node(e.target)?;
            (used.label == name).then_some((def.kind, def.line, used.line))
        })
        .collect()
}

#[test]
fn test_one_definition_two_uses() {
    let graph = ddg("x = 1\nprint(x)\nprint(x)\n", Language::Python);

    let defines: Vec<_> = graph
        .edges()
        .iter()
        .filter(|e| e.relation == Some(Relation::Defines))
        .collect();
    assert_eq!(defines.len(), 2);
    assert_eq!(defines[0].source, defines[1].source);
    assert_ne!(defines[0].target, defines[1].target);

    // Edges run from the definition to uses, never use to use.
    for edge in &defines {
        assert_eq!(graph.node(edge.source).unwrap().kind, NodeKind::Variable);
        assert_eq!(graph.node(edge.target).unwrap().kind, NodeKind::Use);
    }
}

#[test]
fn test_use_links_to_most_recent_definition() {
    let graph = ddg("x = 1\nx = 2\nprint(x)\n", Language::Python);
    assert_eq!(def_use(&graph, "x"), vec![(NodeKind::Variable, Some(2), Some(3))]);
}

#[test]
fn test_right_hand_side_reads_previous_definition() {
    let graph = ddg("x = 1\nx = x + 1\nprint(x)\n", Language::Python);
    assert_eq!(
        def_use(&graph, "x"),
        vec![
            (NodeKind::Variable, Some(1), Some(2)),
            (NodeKind::Variable, Some(2), Some(3)),
        ]
    );
}

#[test]
fn test_augmented_assignment_reads_then_rebinds() {
    let graph = ddg("n = 0\nn += 1\nprint(n)\n", Language::Python);
    assert_eq!(
        def_use(&graph, "n"),
        vec![
            (NodeKind::Variable, Some(1), Some(2)),
            (NodeKind::Variable, Some(2), Some(3)),
        ]
    );
}

#[test]
fn test_parameters_feed_function_and_uses() {
    let graph = ddg("def add(a, b):\n    return a + b\n", Language::Python);

    let function = graph.nodes().iter().find(|n| n.kind == NodeKind::Function).unwrap();
    assert_eq!(function.label, "add");

    let uses_edges: Vec<&str> = graph
        .edges()
        .iter()
        .filter(|e| e.relation == Some(Relation::Uses))
        .map(|e| {
            assert_eq!(e.target, function.id);
            graph.node(e.source).unwrap().label.as_str()
        })
        .collect();
    assert_eq!(uses_edges, vec!["a", "b"]);

    assert_eq!(def_use(&graph, "a"), vec![(NodeKind::Parameter, Some(1), Some(2))]);
    assert_eq!(def_use(&graph, "b"), vec![(NodeKind::Parameter, Some(1), Some(2))]);
}

#[test]
fn test_flat_scope_links_across_functions() {
    // No lexical scoping: g's `y` resolves to f's local.
    let graph = ddg("def f():\n    y = 1\n\ndef g():\n    return y\n", Language::Python);
    assert_eq!(def_use(&graph, "y"), vec![(NodeKind::Variable, Some(2), Some(5))]);
}

#[test]
fn test_loop_targets_are_definitions() {
    let graph = ddg("for item in [1, 2]:\n    print(item)\n", Language::Python);
    assert_eq!(def_use(&graph, "item"), vec![(NodeKind::Variable, Some(1), Some(2))]);
}

#[test]
fn test_self_attributes_are_fields() {
    let source = "class C:\n    def __init__(self):\n        self.total = 0\n\n    def get(self):\n        return self.total\n";
    let graph = ddg(source, Language::Python);
    assert_eq!(def_use(&graph, "self.total"), vec![(NodeKind::Field, Some(3), Some(6))]);
}

#[test]
fn test_undefined_names_are_not_drawn() {
    let graph = ddg("print(undefined_thing)\n", Language::Python);
    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.nodes()[0].label, NO_DEPENDENCIES_LABEL);
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_java_fields_locals_and_parameters() {
    let source = r#"
class Account {
    int balance = 0;

    void deposit(int amount) {
        int fee = 1;
        this.balance = balance + amount - fee;
    }
}
"#;
    let graph = ddg(source, Language::Java);

    assert_eq!(def_use(&graph, "balance"), vec![(NodeKind::Field, Some(3), Some(7))]);
    assert_eq!(def_use(&graph, "amount"), vec![(NodeKind::Parameter, Some(5), Some(7))]);
    assert_eq!(def_use(&graph, "fee"), vec![(NodeKind::Variable, Some(6), Some(7))]);
}

#[test]
fn test_java_enhanced_for() {
    let source = "class A {\n    void f(int[] xs) {\n        for (int x : xs) {\n            g(x);\n        }\n    }\n}";
    let graph = ddg(source, Language::Java);
    assert_eq!(def_use(&graph, "xs"), vec![(NodeKind::Parameter, Some(2), Some(3))]);
    assert_eq!(def_use(&graph, "x"), vec![(NodeKind::Variable, Some(3), Some(4))]);
}

#[test]
fn test_comprehension_target_is_a_definition() {
    let graph = ddg("y = 0\nzs = [y for y in range(3)]\nprint(y)\n", Language::Python);
    // The comprehension body reads its own target; the outer read sees the
    // flat table's latest `y`.
    assert_eq!(
        def_use(&graph, "y"),
        vec![
            (NodeKind::Variable, Some(2), Some(2)),
            (NodeKind::Variable, Some(2), Some(3)),
        ]
    );
}

#[test]
fn test_with_alias_and_walrus_define_names() {
    let graph = ddg(
        "with open('f') as fh:\n    data = fh.read()\nif (n := len(data)) > 1:\n    print(n)\n",
        Language::Python,
    );
    assert_eq!(def_use(&graph, "fh"), vec![(NodeKind::Variable, Some(1), Some(2))]);
    assert_eq!(def_use(&graph, "data"), vec![(NodeKind::Variable, Some(2), Some(3))]);
    assert_eq!(def_use(&graph, "n"), vec![(NodeKind::Variable, Some(3), Some(4))]);
}

#[test]
fn test_except_alias_defines_name() {
    let graph = ddg(
        "try:\n    pass\nexcept ValueError as err:\n    print(err)\n",
        Language::Python,
    );
    assert_eq!(def_use(&graph, "err"), vec![(NodeKind::Variable, Some(3), Some(4))]);
}
