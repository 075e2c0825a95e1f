use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use floyd_paths::{
    data_file::read_graph_file,
    utility::{
        triangle_violations, validate_path, write_bincode_with_spinnner, write_json_with_spinnner,
    },
    FloydWarshall, QueryError, ShortestPaths, Vertex,
};
use log::error;

/// Calculates the shortest roads between all cities of a road file and prints
/// the directions between two of them.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Road file with city names and distances
    #[arg(short, long, default_value = "nqmq.dat")]
    graph: PathBuf,
    /// Number of threads, has to divide the number of cities
    #[arg(short, long, default_value_t = 1)]
    threads: usize,
    /// Start city, by number (starting at 1) or by name
    #[arg(short, long, requires = "to")]
    from: Option<String>,
    /// Destination city, by number (starting at 1) or by name
    #[arg(long, requires = "from")]
    to: Option<String>,
    /// Show a progress bar while relaxing
    #[arg(short, long)]
    progress: bool,
    /// Check the solved matrices before answering
    #[arg(long)]
    verify: bool,
    /// Write the solved matrices to this file, as json if it ends in `.json`
    /// and as bincode otherwise
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            eprintln!("==> {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    println!("==> Reading in values from {}...", args.graph.display());
    let graph = read_graph_file(&args.graph)?;
    println!(
        "    Read in {} cities and {} connecting roads",
        graph.number_of_vertices(),
        graph.number_of_edges()
    );

    println!(
        "==> Starting up {} threads to calculate shortest paths...",
        args.threads
    );
    let unsolved = args.verify.then(|| graph.clone());
    let paths = FloydWarshall::new(args.threads)
        .with_progress(args.progress)
        .solve(graph)?;
    println!(
        "==> Finished calculating shortest paths in {:?}.",
        paths.solve_duration()
    );

    if let Some(unsolved) = unsolved {
        verify(&unsolved, &paths)?;
        println!("==> Verified all shortest paths.");
    }

    if let Some(output) = &args.output {
        if output.extension().is_some_and(|extension| extension == "json") {
            write_json_with_spinnner("shortest paths", output, &paths)?;
        } else {
            write_bincode_with_spinnner("shortest paths", output, &paths)?;
        }
    }

    match (&args.from, &args.to) {
        (Some(from), Some(to)) => print_directions(&paths, lookup(&paths, from)?, lookup(&paths, to)?),
        _ => {
            println!();
            for (number, name) in paths.names().iter().enumerate() {
                println!("{:2}. {}", number + 1, name);
            }
            Ok(())
        }
    }
}

fn verify(
    unsolved: &floyd_paths::GraphStore,
    paths: &ShortestPaths,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some((i, j, k)) = triangle_violations(paths).first() {
        return Err(format!("distance {} -> {} is longer than going over {}", i, j, k).into());
    }

    let order = paths.number_of_vertices() as Vertex;
    for source in 0..order {
        for target in 0..order {
            validate_path(unsolved, paths, source, target)?;
        }
    }
    Ok(())
}

fn lookup(paths: &ShortestPaths, city: &str) -> Result<Vertex, String> {
    if let Some(vertex) = paths.vertex_by_name(city) {
        return Ok(vertex);
    }

    match city.parse::<usize>() {
        Ok(number) if (1..=paths.number_of_vertices()).contains(&number) => {
            Ok((number - 1) as Vertex)
        }
        _ => Err(format!("unknown city {:?}", city)),
    }
}

fn print_directions(
    paths: &ShortestPaths,
    from: Vertex,
    to: Vertex,
) -> Result<(), Box<dyn std::error::Error>> {
    let name = |vertex: Vertex| paths.name(vertex).unwrap_or("?");
    println!("\n==> {} to {}:\n", name(from), name(to));

    let hops = match paths.reconstruct_path(from, to) {
        Ok(hops) => hops,
        Err(QueryError::Unreachable { .. }) => {
            println!("==> No path available between these cities");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    for hop in hops {
        println!("    {} -> {} ({} miles)", name(hop.tail), name(hop.head), hop.weight);
    }
    println!("\n==> Total Distance: {} miles", paths.distance(from, to)?);
    Ok(())
}
