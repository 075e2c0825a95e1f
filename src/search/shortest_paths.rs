use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{
    path::{Hops, Path},
    PathFinding,
};
use crate::{
    error::QueryError,
    graphs::{matrix::SquareMatrix, Distance, Vertex, INFINITY},
};

/// Distance and predecessor matrices of a solved graph. Read only.
///
/// Deserialized results are checked before use: both matrices must match the
/// number of names and the predecessors must expand every pair into direct
/// hops in a finite number of steps.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "UncheckedShortestPaths")]
pub struct ShortestPaths {
    names: Vec<String>,
    distances: SquareMatrix<Distance>,
    predecessors: SquareMatrix<Option<Vertex>>,
    solve_duration: Duration,
}

#[derive(Deserialize)]
struct UncheckedShortestPaths {
    names: Vec<String>,
    distances: SquareMatrix<Distance>,
    predecessors: SquareMatrix<Option<Vertex>>,
    solve_duration: Duration,
}

impl TryFrom<UncheckedShortestPaths> for ShortestPaths {
    type Error = String;

    fn try_from(paths: UncheckedShortestPaths) -> Result<Self, Self::Error> {
        let order = paths.names.len();
        if paths.distances.order() != order || paths.predecessors.order() != order {
            return Err(format!(
                "{} names but distance matrix of order {} and predecessor matrix of order {}",
                order,
                paths.distances.order(),
                paths.predecessors.order()
            ));
        }
        if let Some((source, target)) = predecessor_cycle(&paths.predecessors) {
            return Err(format!(
                "predecessors of pair ({}, {}) do not expand into direct hops",
                source, target
            ));
        }

        Ok(ShortestPaths::new(
            paths.names,
            paths.distances,
            paths.predecessors,
            paths.solve_duration,
        ))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Expansion {
    New,
    Open,
    Done,
}

/// Finds a pair whose predecessor expansion never ends: one routed through
/// itself, through a vertex out of range, or back into a pair that is still
/// being expanded.
///
/// A pair `(i, j)` routed through `k` depends on `(i, k)` and `(k, j)`. The
/// pairs are walked depth first with an explicit stack, every pair once.
fn predecessor_cycle(predecessors: &SquareMatrix<Option<Vertex>>) -> Option<(Vertex, Vertex)> {
    let order = predecessors.order();
    let pair = |index: usize| ((index / order) as Vertex, (index % order) as Vertex);
    let mut state = vec![Expansion::New; order * order];

    for start in 0..order * order {
        if state[start] != Expansion::New {
            continue;
        }

        let mut stack = vec![(start, false)];
        while let Some((index, expanded)) = stack.pop() {
            if expanded {
                state[index] = Expansion::Done;
                continue;
            }
            if state[index] == Expansion::Done {
                continue;
            }
            state[index] = Expansion::Open;
            stack.push((index, true));

            let (row, column) = (index / order, index % order);
            let Some(via) = predecessors[(row, column)] else {
                continue;
            };
            let via = via as usize;
            if via >= order || via == row || via == column {
                return Some(pair(index));
            }

            for next in [row * order + via, via * order + column] {
                match state[next] {
                    Expansion::Open => return Some(pair(index)),
                    Expansion::New => stack.push((next, false)),
                    Expansion::Done => {}
                }
            }
        }
    }
    None
}

impl ShortestPaths {
    pub(crate) fn new(
        names: Vec<String>,
        distances: SquareMatrix<Distance>,
        predecessors: SquareMatrix<Option<Vertex>>,
        solve_duration: Duration,
    ) -> ShortestPaths {
        ShortestPaths {
            names,
            distances,
            predecessors,
            solve_duration,
        }
    }

    pub fn number_of_vertices(&self) -> usize {
        self.names.len()
    }

    pub fn name(&self, vertex: Vertex) -> Option<&str> {
        self.names.get(vertex as usize).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn vertex_by_name(&self, name: &str) -> Option<Vertex> {
        self.names
            .iter()
            .position(|candidate| candidate == name)
            .map(|vertex| vertex as Vertex)
    }

    pub fn distances(&self) -> &SquareMatrix<Distance> {
        &self.distances
    }

    pub fn predecessors(&self) -> &SquareMatrix<Option<Vertex>> {
        &self.predecessors
    }

    /// Wall clock time spent relaxing, including starting and joining the
    /// workers.
    pub fn solve_duration(&self) -> Duration {
        self.solve_duration
    }

    /// Vertex the shortest path from `source` to `target` is routed through,
    /// `None` if it is the direct edge or either vertex is out of range.
    pub fn predecessor(&self, source: Vertex, target: Vertex) -> Option<Vertex> {
        self.predecessors
            .get(source as usize, target as usize)
            .copied()
            .flatten()
    }

    fn check_vertex(&self, vertex: Vertex) -> Result<(), QueryError> {
        if vertex as usize >= self.number_of_vertices() {
            return Err(QueryError::VertexOutOfRange {
                vertex,
                vertices: self.number_of_vertices(),
            });
        }
        Ok(())
    }

    pub fn distance(&self, source: Vertex, target: Vertex) -> Result<Distance, QueryError> {
        self.check_vertex(source)?;
        self.check_vertex(target)?;

        match self.distances[(source as usize, target as usize)] {
            INFINITY => Err(QueryError::Unreachable {
                from: source,
                to: target,
            }),
            distance => Ok(distance),
        }
    }

    /// Direct hops of a shortest path from `source` to `target`, in travel
    /// order. Empty if `source == target`.
    pub fn reconstruct_path(&self, source: Vertex, target: Vertex) -> Result<Hops<'_>, QueryError> {
        self.distance(source, target)?;
        Ok(Hops::new(self, source, target))
    }
}

impl PathFinding for ShortestPaths {
    fn shortest_path(&self, source: Vertex, target: Vertex) -> Option<Path> {
        let hops = self.reconstruct_path(source, target).ok()?;
        Some(Path::from_hops(source, hops))
    }

    fn shortest_path_distance(&self, source: Vertex, target: Vertex) -> Option<Distance> {
        self.distance(source, target).ok()
    }

    fn number_of_vertices(&self) -> u32 {
        self.names.len() as u32
    }
}
