use std::iter::FusedIterator;

use itertools::Itertools;
use log::error;
use serde::{Deserialize, Serialize};

use super::shortest_paths::ShortestPaths;
use crate::graphs::{Distance, Vertex, Weight};

/// A single edge taken on a shortest path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hop {
    pub tail: Vertex,
    pub head: Vertex,
    pub weight: Weight,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    pub vertices: Vec<Vertex>,
    pub distance: Distance,
}

impl Path {
    /// Joins consecutive hops into the sequence of visited vertices.
    pub fn from_hops(source: Vertex, hops: impl IntoIterator<Item = Hop>) -> Path {
        let mut vertices = vec![source];
        let mut distance = 0;
        for hop in hops {
            debug_assert_eq!(vertices.last(), Some(&hop.tail));
            vertices.push(hop.head);
            distance += hop.weight;
        }
        Path { vertices, distance }
    }

    pub fn hops(&self) -> impl Iterator<Item = (Vertex, Vertex)> + '_ {
        self.vertices.iter().copied().tuple_windows()
    }
}

/// Lazily expands the predecessor matrix of a solved graph into the direct
/// hops of one shortest path.
///
/// A pair routed through `via` is split into `(tail, via)` and `(via, head)`,
/// the first half being expanded before the second. Pending second halves are
/// kept on a stack instead of the call stack.
pub struct Hops<'a> {
    paths: &'a ShortestPaths,
    pending: Vec<(Vertex, Vertex)>,
}

impl<'a> Hops<'a> {
    pub(crate) fn new(paths: &'a ShortestPaths, source: Vertex, target: Vertex) -> Hops<'a> {
        let pending = if source == target {
            Vec::new()
        } else {
            vec![(source, target)]
        };
        Hops { paths, pending }
    }
}

impl<'a> Iterator for Hops<'a> {
    type Item = Hop;

    fn next(&mut self) -> Option<Hop> {
        let (tail, mut head) = self.pending.pop()?;

        // Every split keeps `tail` and picks a new head, so an acyclic
        // predecessor matrix needs fewer splits than there are vertices.
        let mut splits = 0;
        while let Some(via) = self.paths.predecessor(tail, head) {
            splits += 1;
            if splits >= self.paths.number_of_vertices() {
                error!(
                    "Predecessors starting at ({}, {}) form a cycle, stopping the path",
                    tail, head
                );
                self.pending.clear();
                return None;
            }
            self.pending.push((via, head));
            head = via;
        }

        Some(Hop {
            tail,
            head,
            weight: self.paths.distances()[(tail as usize, head as usize)],
        })
    }
}

impl<'a> FusedIterator for Hops<'a> {}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Hop, Path};
    use crate::{graphs::matrix::SquareMatrix, search::shortest_paths::ShortestPaths};

    #[test]
    fn path_from_hops() {
        let hops = [
            Hop {
                tail: 0,
                head: 2,
                weight: 4,
            },
            Hop {
                tail: 2,
                head: 1,
                weight: 3,
            },
        ];
        let path = Path::from_hops(0, hops);
        assert_eq!(path.vertices, vec![0, 2, 1]);
        assert_eq!(path.distance, 7);
        assert_eq!(path.hops().collect::<Vec<_>>(), vec![(0, 2), (2, 1)]);
    }

    #[test]
    fn empty_path() {
        let path = Path::from_hops(3, Vec::<Hop>::new());
        assert_eq!(path.vertices, vec![3]);
        assert_eq!(path.distance, 0);
    }

    #[test]
    fn cyclic_predecessors_end_the_path() {
        let mut distances = SquareMatrix::new(3, 1);
        let mut predecessors = SquareMatrix::new(3, None);
        for vertex in 0..3 {
            distances[(vertex, vertex)] = 0;
        }
        predecessors[(0, 1)] = Some(2);
        predecessors[(0, 2)] = Some(1);
        let names = vec!["A".into(), "B".into(), "C".into()];
        let paths = ShortestPaths::new(names, distances, predecessors, Duration::ZERO);

        let mut hops = paths.reconstruct_path(0, 1).unwrap();
        assert_eq!(hops.by_ref().take(50).count(), 0);
        assert_eq!(hops.next(), None);
        assert_eq!(paths.reconstruct_path(1, 2).unwrap().count(), 1);
    }
}
