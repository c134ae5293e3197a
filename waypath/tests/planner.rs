use waypath::util::{parse_cost_grid, parse_nodes};
use waypath::{
    enumerate_sequences, select_path_with_cache, solve_subpath, Planner, PlannerConfig, Point,
    RouteOutcome, SequenceBounds, SubpathCache, WaypointGraph,
};

const GRID: &str = "\
8 6
1 1 1 5 5 1 1 1
1 9 1 5 5 1 9 1
1 9 1 1 1 1 9 1
1 9 9 9 9 9 9 1
1 1 1 1 1 1 1 1
2 2 2 2 2 2 2 2
";

const NODES: &str = "\
6
0 0 0 7 2 2 2 5 5 0 5 7
";

fn create_planner(config: PlannerConfig) -> Planner {
    let surface = parse_cost_grid(GRID).unwrap();
    let positions = parse_nodes(NODES).unwrap();
    Planner::new(surface, positions, config).unwrap()
}

#[test]
fn two_node_uniform_grid() {
    let surface = parse_cost_grid("3 3\n1 1 1\n1 1 1\n1 1 1\n").unwrap();
    let positions = parse_nodes("2\n0 0 2 2\n").unwrap();
    let planner = Planner::new(
        surface,
        positions,
        PlannerConfig {
            min_nodes: 2,
            ..Default::default()
        },
    )
    .unwrap();

    let outcome = planner.route(0, 1).unwrap();
    let path = outcome.path().unwrap();
    assert_eq!(path.nodes, vec![0, 1]);
    assert_eq!(path.cost, 2.0);
    assert_eq!(path.route.len(), 3);
}

#[test]
fn best_path_beats_every_candidate() {
    let planner = create_planner(PlannerConfig::default());

    for (source, dest) in [(0, 5), (4, 1), (2, 3)] {
        let candidates = planner.candidates(source, dest).unwrap();
        let outcome = planner.route(source, dest).unwrap();

        let Some(best) = outcome.path() else {
            assert!(candidates.is_empty());
            continue;
        };

        let cache = SubpathCache::new();
        for candidate in &candidates {
            let costed =
                waypath::cost_sequence(candidate, planner.graph(), planner.surface(), &cache)
                    .unwrap();
            assert!(best.cost <= costed.cost);
        }

        // route is one continuous 8-connected walk through the chosen nodes
        for pair in best.route.windows(2) {
            assert!(pair[0].touches(&pair[1]));
        }
        for node in &best.nodes {
            let pos = planner.graph().node(*node).unwrap().pos;
            assert!(best.route.contains(&pos));
        }
    }
}

#[test]
fn chosen_cost_matches_walked_cells() {
    let planner = create_planner(PlannerConfig::default());
    let outcome = planner.route(0, 5).unwrap();
    let best = outcome.path().unwrap();

    let walked: f64 = best.route[1..]
        .iter()
        .map(|p| planner.surface().get(*p).unwrap())
        .sum();
    assert!((walked - best.cost).abs() < 1e-9);
}

#[test]
fn repeated_runs_agree() {
    let planner = create_planner(PlannerConfig::default());
    let first = planner.route(0, 5).unwrap();
    for _ in 0..4 {
        assert_eq!(planner.route(0, 5).unwrap(), first);
    }
}

#[test]
fn isolated_source_has_no_path() {
    let surface = parse_cost_grid(GRID).unwrap();
    let positions = parse_nodes(NODES).unwrap();
    let graph = WaypointGraph::with_edges(positions, &[(1, 2), (2, 3), (3, 5), (1, 5)]).unwrap();
    let planner = Planner::with_graph(surface, graph, PlannerConfig::default()).unwrap();

    assert!(planner.candidates(0, 5).unwrap().is_empty());
    assert_eq!(planner.route(0, 5).unwrap(), RouteOutcome::NoPathFound);
}

#[test]
fn source_equals_destination() {
    let planner = create_planner(PlannerConfig {
        min_nodes: 1,
        ..Default::default()
    });

    let outcome = planner.route(3, 3).unwrap();
    let path = outcome.path().unwrap();
    assert_eq!(path.nodes, vec![3]);
    assert_eq!(path.cost, 0.0);
    assert_eq!(path.route, vec![Point::new(2, 5)]);
}

#[test]
fn shared_legs_hit_the_cache() {
    let surface = parse_cost_grid(GRID).unwrap();
    let positions = parse_nodes(NODES).unwrap();
    let graph = WaypointGraph::nearest_neighbors(positions, 3).unwrap();
    let sequences = enumerate_sequences(&graph, 0, 5, SequenceBounds::new(3, 5).unwrap()).unwrap();

    let mut legs: Vec<(Point, Point)> = sequences
        .iter()
        .flat_map(|s| s.windows(2))
        .map(|w| (graph.nodes()[w[0]].pos, graph.nodes()[w[1]].pos))
        .collect();
    let total = legs.len();
    legs.sort();
    legs.dedup();

    let cache = SubpathCache::new();
    select_path_with_cache(&sequences, &graph, &surface, &cache).unwrap();

    // every distinct leg solved exactly once, every repeat served from the cache
    let stats = cache.stats();
    assert_eq!(stats.misses, legs.len());
    assert_eq!(stats.hits, total - legs.len());

    for (start, end) in legs {
        let cached = cache.get(&(start, end)).unwrap().unwrap();
        assert_eq!(cached.cost, solve_subpath(&surface, start, end).unwrap().cost);
    }
}
