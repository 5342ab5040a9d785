use codeviz_core::config::LayoutConfig;
use codeviz_core::{
    layout_seed, Config, DiagramType, Language, LayoutEngine, Pipeline, Point, Relation, Visualization,
    VisualizeRequest,
};

const SOURCE: &str = "def add(a, b):\n    return a + b\n\ndef main():\n    total = add(1, 2)\n    print(total)\n\nmain()\n";

fn run(source: &str, diagram: DiagramType) -> Visualization {
    Pipeline::default()
        .run(&VisualizeRequest::new(source, Language::Python, diagram))
        .unwrap()
}

fn ordered_points(vis: &Visualization) -> Vec<Point> {
    vis.graph.nodes().iter().map(|n| vis.positions[&n.id]).collect()
}

#[test]
fn test_layout_is_deterministic_per_request() {
    for diagram in DiagramType::ALL {
        let first = run(SOURCE, diagram);
        let second = run(SOURCE, diagram);
        assert_eq!(ordered_points(&first), ordered_points(&second), "{}", diagram);
    }
}

#[test]
fn test_every_node_is_placed_within_scale() {
    for diagram in DiagramType::ALL {
        let vis = run(SOURCE, diagram);
        assert_eq!(vis.positions.len(), vis.graph.node_count());
        for p in vis.positions.values() {
            assert!(p.x.abs() <= 1.0 + 1e-9 && p.y.abs() <= 1.0 + 1e-9, "{:?}", p);
        }
    }
}

#[test]
fn test_ast_depth_increases_downwards() {
    let vis = run(SOURCE, DiagramType::Ast);
    for edge in vis.graph.edges() {
        assert_eq!(edge.relation, Some(Relation::Contains));
        let parent = vis.positions[&edge.source];
        let child = vis.positions[&edge.target];
        assert!(parent.y > child.y);
    }
}

#[test]
fn test_seed_changes_with_request() {
    let ast = layout_seed(SOURCE, Language::Python, DiagramType::Ast);
    assert_eq!(ast, layout_seed(SOURCE, Language::Python, DiagramType::Ast));
    assert_ne!(ast, layout_seed(SOURCE, Language::Python, DiagramType::Cfg));
}

#[test]
fn test_placeholder_sits_at_origin() {
    let vis = run("def f(:", DiagramType::Ast);
    assert_eq!(ordered_points(&vis), vec![Point::ORIGIN]);
}

#[test]
fn test_custom_scale_and_spring_length() {
    let config = Config {
        layout: LayoutConfig {
            iterations: 20,
            spring_length: Some(0.3),
            scale: 5.0,
        },
        ..Config::default()
    };
    let vis = Pipeline::new(config)
        .run(&VisualizeRequest::new(SOURCE, Language::Python, DiagramType::Ddg))
        .unwrap();
    let extent = vis
        .positions
        .values()
        .flat_map(|p| [p.x.abs(), p.y.abs()])
        .fold(0.0f64, f64::max);
    assert!((extent - 5.0).abs() < 1e-9);
}

#[test]
fn test_engine_handles_disconnected_graphs() {
    // Two unrelated functions in the CFG form two components.
    let vis = run("def a():\n    pass\n\ndef b():\n    pass\n", DiagramType::Cfg);
    assert_eq!(vis.graph.node_count(), 6);

    let positions = LayoutEngine::new(LayoutConfig::default()).layout(&vis.graph, 11, false);
    assert_eq!(positions.len(), 6);
    assert!(positions.values().all(|p| p.x.is_finite() && p.y.is_finite()));
}

#[test]
fn test_expired_deadline_still_places_every_node() {
    let vis = Pipeline::default()
        .run(&VisualizeRequest::new(SOURCE, Language::Python, DiagramType::Ddg).with_deadline(std::time::Instant::now()))
        .unwrap();
    assert_eq!(vis.positions.len(), vis.graph.node_count());
    assert!(vis.positions.values().all(|p| p.x.is_finite() && p.y.is_finite()));
}
