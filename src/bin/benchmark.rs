use clap::Parser;
use floyd_paths::{
    search::floyd_warshall::floyd_warshall_sequential, utility::triangle_violations, FloydWarshall,
    GraphStore,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Solves a random road network with different numbers of threads and
/// compares the running times.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of vertices of the random graph
    #[arg(short, long, default_value_t = 480)]
    number_of_vertices: usize,
    /// Probability of an edge between two vertices
    #[arg(short, long, default_value_t = 0.05)]
    density: f64,
    /// Thread counts to try, counts not dividing the vertices are skipped
    #[arg(short, long, value_delimiter = ',', default_value = "1,2,4,8,16")]
    threads: Vec<usize>,
    /// Seed of the random graph
    #[arg(short, long, default_value_t = 0)]
    seed: u64,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let graph = random_graph(&args);
    println!(
        "Random graph with {} vertices and {} edges",
        graph.number_of_vertices(),
        graph.number_of_edges()
    );

    let reference = floyd_warshall_sequential(graph.clone());
    println!("sequential: {:?}", reference.solve_duration());

    for &threads in args.threads.iter() {
        let paths = match FloydWarshall::new(threads).solve(graph.clone()) {
            Ok(paths) => paths,
            Err(err) => {
                println!("{:>10}: skipped, {}", threads, err);
                continue;
            }
        };

        assert_eq!(
            paths.distances(),
            reference.distances(),
            "{} threads disagree with the sequential solve",
            threads
        );
        println!("{:>10}: {:?}", threads, paths.solve_duration());
    }

    assert!(triangle_violations(&reference).is_empty());
}

/// A random cycle through all vertices plus random chords, so every vertex
/// is reachable.
fn random_graph(args: &Args) -> GraphStore {
    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut graph = GraphStore::with_vertices(args.number_of_vertices).unwrap();
    let order = args.number_of_vertices as u32;

    for tail in 1..order {
        graph
            .add_edge_between(tail - 1, tail, rng.gen_range(1..1_000))
            .unwrap();
    }
    if order > 2 {
        graph
            .add_edge_between(order - 1, 0, rng.gen_range(1..1_000))
            .unwrap();
    }
    for tail in 0..order {
        for head in tail + 2..order {
            if (tail, head) != (0, order - 1) && rng.gen_bool(args.density) {
                graph
                    .add_edge_between(tail, head, rng.gen_range(1..1_000))
                    .unwrap();
            }
        }
    }

    graph
}
