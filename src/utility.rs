use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
    time::Duration,
};

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    graphs::{graph_store::GraphStore, Vertex, INFINITY},
    search::{shortest_paths::ShortestPaths, PathFinding},
};

pub fn get_progressbar_long_jobs(job_name: &str, len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    bar.set_message(job_name.to_string());
    bar.set_style(
        ProgressStyle::with_template(" {msg} {wide_bar} estimated remaining: {eta_precise}")
            .unwrap(),
    );
    bar
}

pub fn get_progressspinner(job_name: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(job_name.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn read_bincode_with_spinnner<T: DeserializeOwned>(
    name: &str,
    path: &Path,
) -> Result<T, Box<dyn std::error::Error>> {
    let spinner = get_progressspinner(&format!("Reading {}", name));
    let reader = BufReader::new(File::open(path)?);
    let value = bincode::deserialize_from(reader)?;
    spinner.finish_and_clear();
    Ok(value)
}

pub fn write_bincode_with_spinnner<T: Serialize>(
    name: &str,
    path: &Path,
    value: &T,
) -> Result<(), Box<dyn std::error::Error>> {
    let spinner = get_progressspinner(&format!("Writing {}", name));
    let writer = BufWriter::new(File::create(path)?);
    bincode::serialize_into(writer, value)?;
    spinner.finish_and_clear();
    Ok(())
}

pub fn write_json_with_spinnner<T: Serialize>(
    name: &str,
    path: &Path,
    value: &T,
) -> Result<(), Box<dyn std::error::Error>> {
    let spinner = get_progressspinner(&format!("Writing {}", name));
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(writer, value)?;
    spinner.finish_and_clear();
    Ok(())
}

/// All triples `(i, j, k)` with `D[i][j] > D[i][k] + D[k][j]`, both terms of
/// the sum finite. Empty for a correctly solved graph.
pub fn triangle_violations(paths: &ShortestPaths) -> Vec<(Vertex, Vertex, Vertex)> {
    let distances = paths.distances();
    let order = distances.order();

    (0..order)
        .into_par_iter()
        .flat_map_iter(|i| {
            (0..order).flat_map(move |j| (0..order).map(move |k| (i, j, k)))
        })
        .filter(|&(i, j, k)| {
            let (direct, first, second) =
                (distances[(i, j)], distances[(i, k)], distances[(k, j)]);
            first != INFINITY
                && second != INFINITY
                && (direct as u64) > first as u64 + second as u64
        })
        .map(|(i, j, k)| (i as Vertex, j as Vertex, k as Vertex))
        .collect()
}

/// Checks the shortest path between `source` and `target` against the edges
/// of the unsolved `graph`.
pub fn validate_path(
    graph: &GraphStore,
    pathfinder: &dyn PathFinding,
    source: Vertex,
    target: Vertex,
) -> Result<(), String> {
    let distance = pathfinder.shortest_path_distance(source, target);
    let Some(path) = pathfinder.shortest_path(source, target) else {
        if distance.is_some() {
            return Err("no path is found but there should be one".to_string());
        }
        return Ok(());
    };

    if Some(path.distance) != distance {
        return Err("wrong path distance".to_string());
    }

    // Ensure fist and last vertex of path are source and target of request.
    if path.vertices.first() != Some(&source) {
        return Err("first vertex of path is not source of request".to_string());
    }
    if path.vertices.last() != Some(&target) {
        return Err("last vertex of path is not target of request".to_string());
    }

    // check if there is an edge between consecutive path vertices.
    let mut true_cost = 0u64;
    for (tail, head) in path.hops() {
        match graph.distance(tail, head) {
            Some(weight) if weight != INFINITY => true_cost += weight as u64,
            _ => return Err(format!("no edge between {} and {} found", tail, head)),
        }
    }

    if true_cost != path.distance as u64 {
        return Err("wrong path distance".to_string());
    }

    Ok(())
}
