use std::{
    ops::Range,
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicBool, Ordering},
        Barrier,
    },
    thread,
    time::Instant,
};

use indicatif::ProgressBar;
use itertools::Itertools;
use log::{debug, info, warn};

use super::{
    shared_matrix::{RowPartition, SharedMatrices},
    shortest_paths::ShortestPaths,
};
use crate::{
    error::{ConfigurationError, SolveError},
    graphs::{graph_store::GraphStore, Vertex, INFINITY},
    utility::get_progressbar_long_jobs,
};

/// All pairs shortest paths by Floyd-Warshall relaxation, split over a fixed
/// number of worker threads.
///
/// Every worker owns a contiguous block of rows for the whole run. Before each
/// of the `n` phases all workers meet at a barrier, so the rows and columns
/// read in phase `k` already contain the writes of every worker from phase
/// `k - 1`.
#[derive(Clone, Debug)]
pub struct FloydWarshall {
    number_of_workers: usize,
    show_progress: bool,
}

impl FloydWarshall {
    pub fn new(number_of_workers: usize) -> FloydWarshall {
        FloydWarshall {
            number_of_workers,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> FloydWarshall {
        self.show_progress = show_progress;
        self
    }

    pub fn number_of_workers(&self) -> usize {
        self.number_of_workers
    }

    /// Row ranges of the workers, in worker order.
    pub fn partitions(
        &self,
        number_of_vertices: usize,
    ) -> Result<Vec<Range<usize>>, ConfigurationError> {
        if number_of_vertices == 0 {
            return Err(ConfigurationError::NoVertices);
        }
        if self.number_of_workers == 0 {
            return Err(ConfigurationError::ZeroWorkers);
        }
        if number_of_vertices % self.number_of_workers != 0 {
            return Err(ConfigurationError::UnevenPartition {
                workers: self.number_of_workers,
                vertices: number_of_vertices,
            });
        }

        Ok((0..self.number_of_workers)
            .map(|worker| {
                worker * number_of_vertices / self.number_of_workers
                    ..(worker + 1) * number_of_vertices / self.number_of_workers
            })
            .collect())
    }

    pub fn solve(&self, graph: GraphStore) -> Result<ShortestPaths, SolveError> {
        self.solve_with(graph, |_, partition, via| relax_phase(partition, via))
    }

    /// Runs `phase(worker, partition, via)` for every worker and phase, with
    /// the barrier and abort handling of [`FloydWarshall::solve`].
    fn solve_with<F>(&self, graph: GraphStore, phase: F) -> Result<ShortestPaths, SolveError>
    where
        F: Fn(usize, &RowPartition, usize) + Sync,
    {
        let number_of_vertices = graph.number_of_vertices();
        let partitions = self.partitions(number_of_vertices)?;

        info!(
            "Starting {} workers on {} vertices ({} rows each)",
            partitions.len(),
            number_of_vertices,
            number_of_vertices / partitions.len()
        );

        let (names, distances, predecessors) = graph.into_parts();
        let matrices = SharedMatrices::new(distances, predecessors);
        let barrier = Barrier::new(partitions.len());
        let aborted = AtomicBool::new(false);
        let pb = if self.show_progress {
            get_progressbar_long_jobs("Relaxing", number_of_vertices as u64)
        } else {
            ProgressBar::hidden()
        };

        let start = Instant::now();
        let outcomes = thread::scope(|scope| {
            let handles = partitions
                .iter()
                .enumerate()
                .map(|(worker, rows)| {
                    let partition = matrices.partition(rows.clone());
                    let barrier = &barrier;
                    let aborted = &aborted;
                    let pb = &pb;
                    let phase = &phase;
                    scope.spawn(move || {
                        relax_rows(worker, &partition, barrier, aborted, pb, phase)
                    })
                })
                .collect_vec();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or(false))
                .collect_vec()
        });
        let solve_duration = start.elapsed();
        pb.finish_and_clear();

        if let Some(worker) = outcomes.iter().position(|&finished| !finished) {
            return Err(SolveError::WorkerPanicked { worker });
        }

        info!("Finished calculating shortest paths in {:?}", solve_duration);

        let (distances, predecessors) = matrices.into_matrices();
        Ok(ShortestPaths::new(
            names,
            distances,
            predecessors,
            solve_duration,
        ))
    }
}

/// Runs all phases for one worker. Returns false if the worker panicked.
///
/// A panicking worker raises `aborted` and keeps passing the barrier so the
/// other workers are not left waiting. Everybody skips the remaining phases.
fn relax_rows<F>(
    worker: usize,
    partition: &RowPartition,
    barrier: &Barrier,
    aborted: &AtomicBool,
    pb: &ProgressBar,
    phase: &F,
) -> bool
where
    F: Fn(usize, &RowPartition, usize),
{
    let mut finished = true;

    for via in 0..partition.order() {
        barrier.wait();
        if aborted.load(Ordering::Relaxed) {
            continue;
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| phase(worker, partition, via)));
        if outcome.is_err() {
            warn!("Worker {} panicked in phase {}", worker, via);
            aborted.store(true, Ordering::Relaxed);
            finished = false;
        }

        if worker == 0 {
            pb.inc(1);
        }
    }

    if finished {
        let rows = partition.rows();
        debug!(
            "Worker {} finished all calculations for rows {} => {}",
            worker,
            rows.start + 1,
            rows.end
        );
    }
    finished
}

/// Relaxes every pair in the partition's rows against `via`.
///
/// Row `via` and column `via` do not change during this phase: going through
/// `via` to reach `via` adds `D[via][via] = 0`, which never beats the current
/// distance strictly.
fn relax_phase(partition: &RowPartition, via: usize) {
    for row in partition.rows() {
        let to_via = partition.distance(row, via);
        if to_via == INFINITY {
            continue;
        }

        for column in 0..partition.order() {
            if row == column {
                continue;
            }
            let from_via = partition.distance(via, column);
            if from_via == INFINITY {
                continue;
            }
            let Some(candidate) = to_via.checked_add(from_via) else {
                continue;
            };

            if candidate < partition.distance(row, column) {
                partition.improve(row, column, candidate, via as Vertex);
            }
        }
    }
}

/// Single threaded relaxation in the same order as [`FloydWarshall`], without
/// any synchronisation.
pub fn floyd_warshall_sequential(graph: GraphStore) -> ShortestPaths {
    let number_of_vertices = graph.number_of_vertices();
    let (names, mut distances, mut predecessors) = graph.into_parts();

    let start = Instant::now();
    for via in 0..number_of_vertices {
        for row in 0..number_of_vertices {
            let to_via = distances[(row, via)];
            if to_via == INFINITY {
                continue;
            }

            for column in 0..number_of_vertices {
                let from_via = distances[(via, column)];
                if row == column || from_via == INFINITY {
                    continue;
                }
                let Some(candidate) = to_via.checked_add(from_via) else {
                    continue;
                };

                if candidate < distances[(row, column)] {
                    distances[(row, column)] = candidate;
                    predecessors[(row, column)] = Some(via as Vertex);
                }
            }
        }
    }

    ShortestPaths::new(names, distances, predecessors, start.elapsed())
}
