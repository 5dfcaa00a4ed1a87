//! End-to-end tests for the analytics engine: path queries, ranking, and the
//! project / query / release lifecycle.

use std::sync::Arc;
use std::thread;

use tripgraph_analytics::{load, AnalyticsEngine, AnalyticsError, AnalyticsWarning};
use tripgraph_core::{AnalyticsConfig, GraphSnapshot, Location, PathPolicy, Trip};
use tripgraph_store::{GraphStore, ProjectionCatalog, ProjectionSpec};

fn store_from(locations: &[(u64, &str)], trips: &[(u64, u64, f64)]) -> GraphStore {
    GraphStore::from_snapshot(GraphSnapshot {
        locations: locations
            .iter()
            .map(|&(id, name)| Location::new(id, name))
            .collect(),
        trips: trips
            .iter()
            .map(|&(s, t, w)| Trip::new(s, t).with_weight("distance", w))
            .collect(),
    })
}

fn line_engine() -> AnalyticsEngine {
    AnalyticsEngine::new(store_from(
        &[(1, "A"), (2, "B"), (3, "C")],
        &[(1, 2, 1.0), (2, 3, 1.0)],
    ))
}

#[test]
fn find_path_follows_natural_orientation() {
    let engine = line_engine();

    let forward = engine.find_path("A", "C").unwrap();
    assert_eq!(forward.paths.len(), 1);
    assert_eq!(forward.paths[0].names(), vec!["A", "B", "C"]);
    assert_eq!(forward.paths[0].hops, 2);
    assert!((forward.paths[0].total_weight - 2.0).abs() < f64::EPSILON);

    let backward = engine.find_path("C", "A").unwrap();
    assert!(backward.paths.is_empty());
}

#[test]
fn find_path_same_location() {
    let engine = line_engine();
    let result = engine.find_path("B", "B").unwrap();

    assert_eq!(result.paths.len(), 1);
    assert_eq!(result.paths[0].names(), vec!["B"]);
    assert_eq!(result.paths[0].hops, 0);
}

#[test]
fn find_path_unknown_name_is_not_found() {
    let engine = line_engine();

    let err = engine.find_path("A", "Atlantis").unwrap_err();
    assert!(matches!(err, AnalyticsError::NodeNotFound { ref name, .. } if name == "Atlantis"));
}

#[test]
fn find_path_ignores_trips_without_distance() {
    let store = GraphStore::from_snapshot(GraphSnapshot {
        locations: vec![Location::new(1, "A"), Location::new(2, "B")],
        trips: vec![Trip::new(1, 2).with_weight("duration", 10.0)],
    });
    let engine = AnalyticsEngine::new(store);

    assert!(engine.find_path("A", "B").unwrap().paths.is_empty());
}

#[test]
fn find_path_all_shortest_policy() {
    let store = store_from(
        &[(1, "A"), (2, "B"), (3, "C"), (4, "D")],
        &[(1, 2, 1.0), (1, 3, 1.0), (2, 4, 1.0), (3, 4, 1.0)],
    );
    let config = AnalyticsConfig {
        path_policy: PathPolicy::AllShortest,
        ..Default::default()
    };
    let engine = AnalyticsEngine::new(store).with_config(config).unwrap();

    let result = engine.find_path("A", "D").unwrap();
    let names: Vec<Vec<&str>> = result.paths.iter().map(|p| p.names()).collect();
    assert_eq!(names, vec![vec!["A", "B", "D"], vec!["A", "C", "D"]]);
}

#[test]
fn with_config_rejects_zero_max_paths() {
    let config = AnalyticsConfig {
        path_policy: PathPolicy::AllShortest,
        max_paths: 0,
        ..Default::default()
    };
    let err = line_engine().with_config(config).unwrap_err();
    assert!(matches!(err, AnalyticsError::Config(_)));
}

#[test]
fn projections_are_released_after_each_call() {
    let engine = line_engine();

    engine.find_path("A", "C").unwrap();
    assert!(engine.catalog().is_empty());

    engine.rank_nodes(10, "distance").unwrap();
    assert!(engine.catalog().is_empty());

    // Error paths release too.
    assert!(engine.find_path("A", "Atlantis").is_err());
    assert!(engine.catalog().is_empty());
}

#[test]
fn rank_nodes_on_cycle_is_uniform() {
    let engine = AnalyticsEngine::new(store_from(
        &[(1, "A"), (2, "B"), (3, "C")],
        &[(1, 2, 1.0), (2, 3, 1.0), (3, 1, 1.0)],
    ));

    let result = engine.rank_nodes(50, "distance").unwrap();
    let top = result.top.unwrap();
    let bottom = result.bottom.unwrap();

    assert!(result.converged);
    assert!(result.warnings.is_empty());
    assert!((top.score - 1.0 / 3.0).abs() < 1e-3);
    assert!((bottom.score - 1.0 / 3.0).abs() < 1e-3);
    // Equal scores: ascending id decides the order.
    assert_eq!(top.name, "A");
    assert_eq!(bottom.name, "C");
}

#[test]
fn rank_nodes_reports_top_and_bottom() {
    // Everything flows into Hub; Leaf receives nothing.
    let engine = AnalyticsEngine::new(store_from(
        &[(1, "Hub"), (2, "Spoke1"), (3, "Spoke2"), (4, "Leaf")],
        &[(2, 1, 1.0), (3, 1, 1.0), (4, 1, 1.0), (1, 2, 1.0), (1, 3, 1.0)],
    ));

    let result = engine.rank_nodes(100, "distance").unwrap();
    assert_eq!(result.top.unwrap().name, "Hub");
    assert_eq!(result.bottom.unwrap().name, "Leaf");
    assert_eq!(result.node_count, 4);
}

#[test]
fn rank_nodes_warns_when_capped() {
    let engine = AnalyticsEngine::new(store_from(
        &[(1, "A"), (2, "B"), (3, "C")],
        &[(1, 2, 1.0), (1, 3, 5.0)],
    ));

    let result = engine.rank_nodes(1, "distance").unwrap();
    assert!(!result.converged);
    assert_eq!(result.iterations, 1);
    assert!(matches!(
        result.warnings.as_slice(),
        [AnalyticsWarning::ConvergenceNotReached { iterations: 1, .. }]
    ));
    assert!(result.top.is_some());
}

#[test]
fn rank_nodes_empty_graph() {
    let engine = AnalyticsEngine::new(GraphStore::new());
    let result = engine.rank_nodes(20, "distance").unwrap();

    assert!(result.top.is_none());
    assert!(result.bottom.is_none());
    assert_eq!(result.node_count, 0);
}

#[test]
fn rank_nodes_rejects_zero_iterations() {
    let engine = line_engine();
    let err = engine.rank_nodes(0, "distance").unwrap_err();
    assert!(matches!(err, AnalyticsError::InvalidParameter(_)));
    assert!(engine.catalog().is_empty());
}

#[test]
fn rank_all_sums_to_one() {
    let engine = AnalyticsEngine::new(store_from(
        &[(1, "A"), (2, "B"), (3, "C"), (4, "D")],
        &[(1, 2, 2.0), (2, 3, 1.0), (3, 1, 4.0), (3, 4, 1.0)],
    ));

    let ranking = engine.rank_all(100, "distance").unwrap();
    assert_eq!(ranking.len(), 4);
    let total: f64 = ranking.iter().map(|r| r.score).sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert!(ranking.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn engine_loaded_from_snapshot_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.json");
    std::fs::write(
        &path,
        r#"{
            "locations": [
                {"id": 100, "name": "Airport"},
                {"id": 200, "name": "Downtown"},
                {"id": 300, "name": "Stadium"}
            ],
            "trips": [
                {"source": 100, "target": 200, "properties": {"distance": 18.2}},
                {"source": 200, "target": 300, "properties": {"distance": 4.1}}
            ]
        }"#,
    )
    .unwrap();

    let engine = AnalyticsEngine::new(load::load_store(&path).unwrap());
    assert_eq!(engine.stats().locations, 3);
    assert_eq!(engine.stats().trips, 2);

    let result = engine.find_path("Airport", "Stadium").unwrap();
    assert_eq!(result.paths[0].names(), vec!["Airport", "Downtown", "Stadium"]);
    assert!((result.paths[0].total_weight - 22.3).abs() < 1e-9);
}

#[test]
fn concurrent_queries_share_an_engine() {
    let engine = Arc::new(AnalyticsEngine::new(store_from(
        &[(1, "A"), (2, "B"), (3, "C"), (4, "D")],
        &[(1, 2, 1.0), (2, 3, 1.0), (3, 4, 1.0), (4, 1, 1.0)],
    )));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for _ in 0..50 {
                    if i % 2 == 0 {
                        let result = engine.find_path("A", "D").unwrap();
                        assert_eq!(result.paths[0].names(), vec!["A", "B", "C", "D"]);
                    } else {
                        let result = engine.rank_nodes(30, "distance").unwrap();
                        assert!((result.top.unwrap().score - 0.25).abs() < 1e-6);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert!(engine.catalog().is_empty());
}

#[test]
fn replacement_is_never_observed_half_done() {
    // "a" trips weigh 1.0, "b" trips weigh 2.0 and there are more of them.
    let mut store = GraphStore::new();
    for id in 0..50u64 {
        store.insert_location(Location::new(id, format!("L{id}")));
    }
    for id in 0..49u64 {
        store
            .insert_trip(Trip::new(id, id + 1).with_weight("a", 1.0))
            .unwrap();
        store
            .insert_trip(Trip::new(id + 1, id).with_weight("b", 2.0))
            .unwrap();
        store
            .insert_trip(Trip::new(id, 49 - id).with_weight("b", 2.0))
            .unwrap();
    }
    let catalog = ProjectionCatalog::new();

    thread::scope(|scope| {
        for writer in 0..2 {
            let (store, catalog) = (&store, &catalog);
            scope.spawn(move || {
                for round in 0..200 {
                    let property = if (round + writer) % 2 == 0 { "a" } else { "b" };
                    let _guard = catalog
                        .project(store, &ProjectionSpec::new("shared", property))
                        .unwrap();
                    thread::yield_now();
                }
            });
        }

        for _ in 0..4 {
            let catalog = &catalog;
            scope.spawn(move || {
                for _ in 0..2000 {
                    let Some(projection) = catalog.get("shared") else {
                        continue;
                    };
                    let (expected_weight, expected_edges) = match projection.weight_property() {
                        "a" => (1.0, 49),
                        _ => (2.0, 98),
                    };
                    assert_eq!(projection.edge_count(), expected_edges);
                    for index in 0..projection.node_count() {
                        for edge in projection.edges(index) {
                            assert_eq!(edge.weight, expected_weight);
                        }
                    }
                }
            });
        }
    });

    assert!(catalog.is_empty());
}
