use codeviz_core::graph::PARSE_ERROR_NODE_TYPE;
use codeviz_core::{
    CodeStats, Config, DiagramType, Language, NodeKind, Pipeline, PipelineError, VisualizeRequest,
};

#[test]
fn test_malformed_python_returns_placeholder() {
    let pipeline = Pipeline::default();
    for diagram in DiagramType::ALL {
        let vis = pipeline
            .run(&VisualizeRequest::new("def f(:", Language::Python, diagram))
            .unwrap();
        let error = vis.metadata.parse_error.as_deref().unwrap();
        assert!(error.starts_with("Syntax error at line 1"));

        assert_eq!(vis.graph.node_count(), 1);
        assert_eq!(vis.graph.edge_count(), 0);
        let node = &vis.graph.nodes()[0];
        assert_eq!(node.node_type, PARSE_ERROR_NODE_TYPE);
        assert_eq!(node.label, error);
    }
}

#[test]
fn test_malformed_java_returns_placeholder() {
    let vis = Pipeline::default()
        .run(&VisualizeRequest::new(
            "public class A {\n    void f( {\n}\n",
            Language::Java,
            DiagramType::Ast,
        ))
        .unwrap();
    assert!(vis.metadata.parse_error.is_some());
    assert_eq!(vis.graph.node_count(), 1);
}

#[test]
fn test_unknown_language_is_rejected() {
    let err = Pipeline::default()
        .run_source("x = 1", "ruby", "ast")
        .unwrap_err();
    assert_eq!(err, PipelineError::UnsupportedLanguage("ruby".to_string()));
    assert_eq!(err.to_string(), "Unsupported language: ruby");
}

#[test]
fn test_unknown_diagram_is_rejected() {
    let err = Pipeline::default()
        .run_source("x = 1", "python", "sequence")
        .unwrap_err();
    assert_eq!(err, PipelineError::UnsupportedDiagram("sequence".to_string()));
}

#[test]
fn test_auto_language_detection() {
    let vis = Pipeline::default()
        .run_source(
            "import java.util.List;\npublic class A {\n    public void run() { System.out.println(1); }\n}\n",
            "auto",
            "ast",
        )
        .unwrap();
    assert_eq!(vis.language, Language::Java);
    assert_eq!(vis.graph.nodes()[0].node_type, "program");
}

#[test]
fn test_request_max_depth_overrides_config() {
    let source = "def f():\n    if True:\n        if True:\n            if True:\n                return [1, [2, [3]]]\n";
    let pipeline = Pipeline::default();

    let shallow = pipeline
        .run(&VisualizeRequest::new(source, Language::Python, DiagramType::Ast).with_max_depth(2))
        .unwrap();
    assert!(shallow.metadata.max_depth_reached);
    assert!(shallow.graph.node_count() < 10);

    let deep = pipeline
        .run(&VisualizeRequest::new(source, Language::Python, DiagramType::Ast).with_max_depth(50))
        .unwrap();
    assert!(!deep.metadata.max_depth_reached);
    assert_eq!(deep.metadata.total_nodes, deep.graph.node_count());
}

#[test]
fn test_config_max_depth_is_the_default() {
    let mut config = Config::default();
    config.pipeline.max_depth = 1;
    let vis = Pipeline::new(config)
        .run(&VisualizeRequest::new("x = foo(1)\n", Language::Python, DiagramType::Ast))
        .unwrap();
    assert!(vis.metadata.max_depth_reached);
    // module -> expression_statement
    assert_eq!(vis.graph.node_count(), 2);
}

#[test]
fn test_titles_follow_diagram() {
    let pipeline = Pipeline::default();
    let titles: Vec<String> = DiagramType::ALL
        .iter()
        .map(|d| {
            pipeline
                .run(&VisualizeRequest::new("x = 1\n", Language::Python, *d))
                .unwrap()
                .title
        })
        .collect();
    assert_eq!(
        titles,
        vec![
            "Abstract Syntax Tree (AST)",
            "Control Flow Graph (CFG)",
            "Data Dependency Graph (DDG)",
        ]
    );
}

#[test]
fn test_java_snippet_lines_match_user_text() {
    let vis = Pipeline::default()
        .run(&VisualizeRequest::new(
            "Point(int x) {\n    this.x = x;\n}\n",
            Language::Java,
            DiagramType::Ast,
        ))
        .unwrap();
    assert!(vis.metadata.parse_error.is_none());
    let ctor = vis
        .graph
        .nodes()
        .iter()
        .find(|n| n.kind == NodeKind::Function)
        .unwrap();
    assert_eq!(ctor.label, "Point");
    assert_eq!(ctor.line, Some(1));
    assert_eq!(vis.metadata.functions[0].line, 1);
}

#[test]
fn test_visualization_serializes() {
    let vis = Pipeline::default()
        .run(&VisualizeRequest::new("def f(x):\n    return x\n", Language::Python, DiagramType::Cfg))
        .unwrap();
    let json = serde_json::to_value(&vis).unwrap();

    assert_eq!(json["title"], "Control Flow Graph (CFG)");
    assert_eq!(json["diagram"], "cfg");
    assert_eq!(json["language"], "python");
    assert!(json["graph"]["nodes"].as_array().unwrap().len() == 3);
    assert_eq!(json["graph"]["edges"][0]["relation"], "flow");
    assert_eq!(json["metadata"]["functions"][0]["name"], "f");
    assert_eq!(json["metadata"]["max_depth_reached"], false);
    assert_eq!(json["positions"].as_object().unwrap().len(), 3);
    assert_eq!(json["styles"]["function"]["color"], "#FF6347");
}

#[test]
fn test_code_stats_ignore_depth_limit() {
    let source = "class A:\n    def f(self):\n        pass\n\n    def g(self):\n        pass\n";
    let pipeline = Pipeline::default();
    let vis = pipeline
        .run(&VisualizeRequest::new(source, Language::Python, DiagramType::Ast).with_max_depth(0))
        .unwrap();
    assert!(vis.metadata.functions.is_empty());

    let stats: CodeStats = pipeline.code_stats(source, Language::Python).unwrap();
    assert_eq!(stats.lines_of_code, 5);
    assert_eq!(stats.functions, 2);
    assert_eq!(stats.classes, 1);
    assert!(stats.parse_error.is_none());
}
