//! 路径查找集成测试
//!
//! 测试范围：
//! - 双向最短路引擎（平凡路径、并列解、深度上限、方向过滤）
//! - 全路径与简单路径查找
//! - 精确深度查找
//! - 多跳航点拼接
//! - 配置驱动的查找器装配

use std::sync::{Arc, Once};

use graph_traversal::{
    AllPaths, AllSimplePaths, ExactDepthPathFinder, MemoryGraph, MultiHopPathFinder, NodeId, Path,
    RelationshipExpander, ShortestPath, TraversalConfig, TraversalResult,
};

static INIT: Once = Once::new();

fn init_logger() {
    INIT.call_once(|| {
        if let Ok(logger) = flexi_logger::Logger::try_with_str("warn") {
            if let Ok(handle) = logger.start() {
                std::mem::forget(handle);
            }
        }
    });
}

/// 样例图：a→c→b→f→g、a→d→e→g、c→f、c→g、d→g，关系类型 "to"，
/// 另有一条类型为 "likes" 的捷径 a→g
struct Fixture {
    graph: Arc<MemoryGraph>,
    a: NodeId,
    g: NodeId,
}

fn fixture() -> Fixture {
    init_logger();
    let graph = MemoryGraph::new();
    let a = graph.create_node();
    let b = graph.create_node();
    let c = graph.create_node();
    let d = graph.create_node();
    let e = graph.create_node();
    let f = graph.create_node();
    let g = graph.create_node();
    for (from, to) in [
        (a, c),
        (c, b),
        (b, f),
        (f, g),
        (a, d),
        (d, e),
        (e, g),
        (c, f),
        (c, g),
        (d, g),
    ] {
        graph
            .create_relationship(from, to, "to")
            .expect("关系创建失败");
    }
    graph.create_relationship(a, g, "likes").expect("关系创建失败");
    Fixture {
        graph: Arc::new(graph),
        a,
        g,
    }
}

// ==================== 最短路径测试 ====================

#[test]
fn test_shortest_path_trivial() {
    let fx = fixture();
    let finder = ShortestPath::new(3, RelationshipExpander::outgoing().with_type("to"));
    let paths = finder
        .find_all_paths(fx.graph.as_ref(), fx.a, fx.a)
        .expect("搜索失败");
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].length(), 0);
    assert_eq!(paths[0].nodes(), &[fx.a]);
}

#[test]
fn test_shortest_path_sample_scenario() {
    let fx = fixture();
    let finder = ShortestPath::new(3, RelationshipExpander::outgoing().with_type("to"));
    let paths = finder
        .find_all_paths(fx.graph.as_ref(), fx.a, fx.g)
        .expect("搜索失败");

    // a-c-g 与 a-d-g 两条并列最短
    assert_eq!(paths.len(), 2);
    for path in &paths {
        assert_eq!(path.length(), 2);
        assert_eq!(path.start_node(), fx.a);
        assert_eq!(path.end_node(), fx.g);
    }
}

#[test]
fn test_shortest_path_reverse_direction_is_empty() {
    let fx = fixture();
    let finder = ShortestPath::new(3, RelationshipExpander::incoming().with_type("to"));
    let paths = finder
        .find_all_paths(fx.graph.as_ref(), fx.a, fx.g)
        .expect("搜索失败");
    assert!(paths.is_empty());

    let single = finder
        .find_single_path(fx.graph.as_ref(), fx.a, fx.g)
        .expect("搜索失败");
    assert!(single.is_none());
}

#[test]
fn test_shortest_path_ignores_other_types() {
    let fx = fixture();
    // 不限类型时 "likes" 捷径胜出
    let untyped = ShortestPath::new(3, RelationshipExpander::outgoing());
    let paths = untyped
        .find_all_paths(fx.graph.as_ref(), fx.a, fx.g)
        .expect("搜索失败");
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].length(), 1);
    assert_eq!(paths[0].relationships()[0].rel_type, "likes");
}

#[test]
fn test_shortest_path_tie_via_parallel_relationships() {
    init_logger();
    let graph = MemoryGraph::new();
    let a = graph.create_node();
    let b = graph.create_node();
    graph.create_relationship(a, b, "to").expect("关系创建失败");
    graph.create_relationship(a, b, "to").expect("关系创建失败");

    let finder = ShortestPath::new(1, RelationshipExpander::outgoing());
    let paths = finder.find_all_paths(&graph, a, b).expect("搜索失败");
    assert_eq!(paths.len(), 2);
    assert_ne!(
        paths[0].relationships()[0].id,
        paths[1].relationships()[0].id
    );
}

#[test]
fn test_shortest_path_depth_bound() {
    let fx = fixture();
    // 最短距离 2 > max_depth 1
    let finder = ShortestPath::new(1, RelationshipExpander::outgoing().with_type("to"));
    let paths = finder
        .find_all_paths(fx.graph.as_ref(), fx.a, fx.g)
        .expect("搜索失败");
    assert!(paths.is_empty());
}

#[test]
fn test_shortest_single_path_is_minimal() {
    let fx = fixture();
    let finder = ShortestPath::new(3, RelationshipExpander::outgoing().with_type("to"));
    let path = finder
        .find_single_path(fx.graph.as_ref(), fx.a, fx.g)
        .expect("搜索失败")
        .expect("应存在路径");
    assert_eq!(path.length(), 2);
}

// ==================== 全路径测试 ====================

#[test]
fn test_all_paths_within_depth() {
    let fx = fixture();
    let finder = AllPaths::new(3, RelationshipExpander::outgoing().with_type("to"));
    let paths: Vec<Path> = finder
        .find_all_paths(fx.graph.as_ref(), fx.a, fx.g)
        .collect::<TraversalResult<_>>()
        .expect("遍历失败");

    // a-c-g、a-d-g、a-c-f-g、a-d-e-g
    assert_eq!(paths.len(), 4);
    assert!(paths.iter().all(|p| p.length() <= 3));
    assert!(paths.iter().all(|p| p.end_node() == fx.g));
}

#[test]
fn test_simple_paths_exclude_node_revisits() {
    init_logger();
    // s→a→e 与 s→a→b→a→e：后者重访 a 但不重用关系
    let graph = MemoryGraph::new();
    let s = graph.create_node();
    let a = graph.create_node();
    let b = graph.create_node();
    let e = graph.create_node();
    for (from, to) in [(s, a), (a, b), (b, a), (a, e)] {
        graph.create_relationship(from, to, "to").expect("关系创建失败");
    }

    let all: Vec<Path> = AllPaths::new(4, RelationshipExpander::outgoing())
        .find_all_paths(&graph, s, e)
        .collect::<TraversalResult<_>>()
        .expect("遍历失败");
    assert_eq!(all.len(), 2);
    assert!(all.iter().any(|p| p.length() == 4));

    let simple: Vec<Path> = AllSimplePaths::new(4, RelationshipExpander::outgoing())
        .find_all_paths(&graph, s, e)
        .collect::<TraversalResult<_>>()
        .expect("遍历失败");
    assert_eq!(simple.len(), 1);
    assert_eq!(simple[0].length(), 2);
}

// ==================== 精确深度测试 ====================

#[test]
fn test_exact_depth_on_sample_graph() {
    let fx = fixture();
    let finder =
        ExactDepthPathFinder::new(3, 100, RelationshipExpander::outgoing().with_type("to"));
    let paths: Vec<Path> = finder
        .find_all_paths(fx.graph.as_ref(), fx.a, fx.g)
        .collect::<TraversalResult<_>>()
        .expect("搜索失败");

    // 长度恰为 3 的只有 a-c-f-g 与 a-d-e-g
    assert_eq!(paths.len(), 2);
    for path in &paths {
        assert_eq!(path.length(), 3);
        assert_eq!(path.start_node(), fx.a);
        assert_eq!(path.end_node(), fx.g);
    }
}

// ==================== 多跳拼接测试 ====================

#[test]
fn test_multi_hop_stitches_segment_lengths() {
    init_logger();
    // w0→x→w1 距离 2，w1→y→z→w2 距离 3
    let graph = MemoryGraph::new();
    let w0 = graph.create_node();
    let x = graph.create_node();
    let w1 = graph.create_node();
    let y = graph.create_node();
    let z = graph.create_node();
    let w2 = graph.create_node();
    for (from, to) in [(w0, x), (x, w1), (w1, y), (y, z), (z, w2)] {
        graph.create_relationship(from, to, "to").expect("关系创建失败");
    }

    let finder = MultiHopPathFinder::new(Arc::new(graph), 5, RelationshipExpander::outgoing());
    let paths = finder
        .find_paths_from_scratch(&[w0, w1, w2])
        .expect("拼接失败");

    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].length(), 5);
    assert_eq!(paths[0].position_of(w1), Some(2));
}

#[test]
fn test_multi_hop_unreachable_pair_empties_result() {
    let fx = fixture();
    let isolated = fx.graph.create_node();
    let finder = MultiHopPathFinder::new(
        Arc::clone(&fx.graph),
        3,
        RelationshipExpander::outgoing().with_type("to"),
    );
    let paths = finder
        .find_paths_from_scratch(&[fx.a, fx.g, isolated])
        .expect("拼接失败");
    assert!(paths.is_empty());
}

#[test]
fn test_multi_hop_through_sample_graph() {
    let fx = fixture();
    let finder = MultiHopPathFinder::new(
        Arc::clone(&fx.graph),
        3,
        RelationshipExpander::outgoing().with_type("to"),
    );
    // a→g 两条并列最短，g→g 平凡段不改变数量
    let paths = finder
        .find_paths_from_scratch(&[fx.a, fx.g, fx.g])
        .expect("拼接失败");
    assert_eq!(paths.len(), 2);
    assert!(paths.iter().all(|p| p.length() == 2));
}

// ==================== 配置装配测试 ====================

#[test]
fn test_config_drives_finder_assembly() {
    let fx = fixture();
    let config = TraversalConfig {
        default_max_depth: 3,
        supernode_threshold: 10,
        stitcher_parallelism: 2,
    };
    config.validate().expect("默认装配配置应合法");

    let shortest = ShortestPath::new(
        config.default_max_depth,
        RelationshipExpander::outgoing().with_type("to"),
    );
    assert_eq!(
        shortest
            .find_all_paths(fx.graph.as_ref(), fx.a, fx.g)
            .expect("搜索失败")
            .len(),
        2
    );

    let exact = ExactDepthPathFinder::new(
        3,
        config.supernode_threshold,
        RelationshipExpander::outgoing().with_type("to"),
    );
    assert_eq!(
        exact
            .find_all_paths(fx.graph.as_ref(), fx.a, fx.g)
            .collect::<TraversalResult<Vec<_>>>()
            .expect("搜索失败")
            .len(),
        2
    );

    let stitcher = MultiHopPathFinder::new(
        Arc::clone(&fx.graph),
        config.default_max_depth,
        RelationshipExpander::outgoing().with_type("to"),
    )
    .with_parallelism(config.stitcher_parallelism);
    let path = stitcher
        .find_path_from_scratch(&[fx.a, fx.g])
        .expect("拼接失败")
        .expect("应存在路径");
    assert_eq!(path.length(), 2);
}
