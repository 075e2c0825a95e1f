use floyd_paths::{
    data_file::parse_graph,
    search::floyd_warshall::floyd_warshall_sequential,
    utility::{
        read_bincode_with_spinnner, triangle_violations, validate_path,
        write_bincode_with_spinnner,
    },
    ConfigurationError, FloydWarshall, GraphStore, Hop, QueryError, SolveError, INFINITY,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Random graph with `components` disconnected groups of vertices, so some
/// pairs stay unreachable.
fn random_graph(number_of_vertices: usize, components: u32, seed: u64) -> GraphStore {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = GraphStore::with_vertices(number_of_vertices).unwrap();
    let order = number_of_vertices as u32;

    for tail in 0..order {
        for head in tail + 1..order {
            if tail % components == head % components && rng.gen_bool(0.3) {
                graph
                    .add_edge_between(tail, head, rng.gen_range(1..50))
                    .unwrap();
            }
        }
    }
    graph
}

fn divisors(number: usize) -> impl Iterator<Item = usize> {
    (1..=number).filter(move |divisor| number % divisor == 0)
}

#[test]
fn every_worker_count_matches_sequential() {
    for seed in 0..4 {
        let graph = random_graph(24, 2, seed);
        let reference = floyd_warshall_sequential(graph.clone());

        for workers in divisors(24) {
            let paths = FloydWarshall::new(workers).solve(graph.clone()).unwrap();
            assert_eq!(paths.distances(), reference.distances(), "{} workers", workers);
            assert_eq!(
                paths.predecessors(),
                reference.predecessors(),
                "{} workers",
                workers
            );
        }
    }
}

#[test]
fn solved_matrices_keep_invariants() {
    let paths = random_graph(30, 3, 7).solve(5).unwrap();
    let distances = paths.distances();
    let order = paths.number_of_vertices();

    for i in 0..order {
        assert_eq!(distances[(i, i)], 0);
        assert_eq!(paths.predecessor(i as u32, i as u32), None);
        for j in 0..order {
            assert_eq!(distances[(i, j)], distances[(j, i)]);
        }
    }
    assert!(triangle_violations(&paths).is_empty());
}

#[test]
fn reconstructed_paths_chain_and_sum_up() {
    let graph = random_graph(36, 2, 11);
    let paths = graph.clone().solve(6).unwrap();
    let order = paths.number_of_vertices() as u32;
    let mut reachable = 0;
    let mut unreachable = 0;

    for source in 0..order {
        for target in 0..order {
            assert_eq!(validate_path(&graph, &paths, source, target), Ok(()));

            match paths.distance(source, target) {
                Ok(distance) => {
                    reachable += 1;
                    let hops: Vec<Hop> = paths.reconstruct_path(source, target).unwrap().collect();
                    assert!(hops.len() < order as usize);

                    let mut at = source;
                    for hop in hops.iter() {
                        assert_eq!(hop.tail, at);
                        assert_eq!(graph.distance(hop.tail, hop.head), Some(hop.weight));
                        at = hop.head;
                    }
                    assert_eq!(at, target);
                    assert_eq!(hops.iter().map(|hop| hop.weight).sum::<u32>(), distance);
                }
                Err(err) => {
                    unreachable += 1;
                    assert_eq!(
                        err,
                        QueryError::Unreachable {
                            from: source,
                            to: target
                        }
                    );
                    assert!(paths.reconstruct_path(source, target).is_err());
                    assert_eq!(paths.distances()[(source as usize, target as usize)], INFINITY);
                }
            }
        }
    }

    assert!(reachable > 0);
    assert!(unreachable > 0);
}

#[test]
fn hops_are_produced_lazily() {
    let mut graph = GraphStore::with_vertices(6).unwrap();
    for tail in 0..5 {
        graph.add_edge_between(tail, tail + 1, 1).unwrap();
    }
    let paths = graph.solve(3).unwrap();

    let mut hops = paths.reconstruct_path(0, 5).unwrap();
    assert_eq!(hops.next().map(|hop| (hop.tail, hop.head)), Some((0, 1)));
    assert_eq!(hops.count(), 4);
}

#[test]
fn road_file_scenario() {
    let roads = "\
4
A
B
C
D
1 2 1
2 3 2
3 4 1
1 4 10
-1
";
    let graph = parse_graph(roads.as_bytes()).unwrap();
    let paths = graph.solve(2).unwrap();
    let a = paths.vertex_by_name("A").unwrap();
    let d = paths.vertex_by_name("D").unwrap();

    assert_eq!(paths.distance(a, d), Ok(4));
    let route: Vec<&str> = std::iter::once(a)
        .chain(paths.reconstruct_path(a, d).unwrap().map(|hop| hop.head))
        .map(|vertex| paths.name(vertex).unwrap())
        .collect();
    assert_eq!(route, vec!["A", "B", "C", "D"]);
}

#[test]
fn uneven_worker_count_is_rejected() {
    let graph = random_graph(5, 1, 3);
    let err = graph.solve(2).unwrap_err();
    assert!(matches!(
        err,
        SolveError::Configuration(ConfigurationError::UnevenPartition {
            workers: 2,
            vertices: 5
        })
    ));
}

#[test]
fn ties_keep_the_first_path_found() {
    // 0 - 1 - 3 and 0 - 2 - 3 are equally long; vertex 1 is tried first.
    let mut graph = GraphStore::with_vertices(4).unwrap();
    graph.add_edge_between(0, 1, 2).unwrap();
    graph.add_edge_between(1, 3, 2).unwrap();
    graph.add_edge_between(0, 2, 1).unwrap();
    graph.add_edge_between(2, 3, 3).unwrap();

    for workers in [1, 2, 4] {
        let paths = graph.clone().solve(workers).unwrap();
        assert_eq!(paths.distance(0, 3), Ok(4));
        assert_eq!(paths.predecessor(0, 3), Some(1));
    }
}

#[test]
fn solved_paths_survive_bincode() {
    let paths = random_graph(12, 1, 5).solve(4).unwrap();
    let bytes = bincode::serialize(&paths).unwrap();
    let restored: floyd_paths::ShortestPaths = bincode::deserialize(&bytes).unwrap();
    assert_eq!(restored.distances(), paths.distances());
    assert_eq!(restored.names(), paths.names());
}

#[test]
fn solved_paths_survive_a_file() {
    let paths = random_graph(8, 2, 13).solve(4).unwrap();
    let file = std::env::temp_dir().join(format!("floyd_paths_{}.bincode", std::process::id()));

    write_bincode_with_spinnner("shortest paths", &file, &paths).unwrap();
    let restored: floyd_paths::ShortestPaths =
        read_bincode_with_spinnner("shortest paths", &file).unwrap();
    std::fs::remove_file(&file).unwrap();

    assert_eq!(restored.predecessors(), paths.predecessors());
    assert_eq!(restored.solve_duration(), paths.solve_duration());
}

#[test]
fn solved_paths_serialize_to_json() {
    let paths = random_graph(4, 1, 9).solve(2).unwrap();
    let json = serde_json::to_value(&paths).unwrap();
    assert_eq!(json["names"], serde_json::json!(["1", "2", "3", "4"]));
    assert_eq!(json["distances"]["order"], 4);
}
