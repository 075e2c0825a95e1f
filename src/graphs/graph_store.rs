use log::warn;

use super::{edge::WeightedEdge, matrix::SquareMatrix, Distance, Vertex, Weight, INFINITY};
use crate::{
    error::{ConfigurationError, SolveError},
    search::{floyd_warshall::FloydWarshall, shortest_paths::ShortestPaths},
};

/// Vertex names plus the distance and predecessor matrices of a graph that
/// has not been solved yet.
///
/// The vertex count is fixed on construction. Edges can only be added, never
/// removed. Solving consumes the store.
#[derive(Clone, Debug)]
pub struct GraphStore {
    names: Vec<String>,
    distances: SquareMatrix<Distance>,
    predecessors: SquareMatrix<Option<Vertex>>,
}

impl GraphStore {
    pub fn new(names: Vec<String>) -> Result<GraphStore, ConfigurationError> {
        let number_of_vertices = names.len();
        if number_of_vertices == 0 {
            return Err(ConfigurationError::NoVertices);
        }

        let mut distances = SquareMatrix::new(number_of_vertices, INFINITY);
        for vertex in 0..number_of_vertices {
            distances[(vertex, vertex)] = 0;
        }

        Ok(GraphStore {
            names,
            distances,
            predecessors: SquareMatrix::new(number_of_vertices, None),
        })
    }

    /// Creates a store whose vertices are named `1` to `number_of_vertices`.
    pub fn with_vertices(number_of_vertices: usize) -> Result<GraphStore, ConfigurationError> {
        GraphStore::new(
            (1..=number_of_vertices)
                .map(|number| number.to_string())
                .collect(),
        )
    }

    pub fn number_of_vertices(&self) -> usize {
        self.names.len()
    }

    /// Number of vertex pairs connected by a direct edge.
    pub fn number_of_edges(&self) -> usize {
        let order = self.number_of_vertices();
        (0..order)
            .flat_map(|tail| (tail + 1..order).map(move |head| (tail, head)))
            .filter(|&pair| self.distances[pair] != INFINITY)
            .count()
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

    /// Current distance between two vertices, `INFINITY` if they are not
    /// connected by an edge.
    pub fn distance(&self, tail: Vertex, head: Vertex) -> Option<Distance> {
        self.distances.get(tail as usize, head as usize).copied()
    }

    fn check_vertex(&self, vertex: Vertex) -> Result<(), ConfigurationError> {
        if vertex as usize >= self.number_of_vertices() {
            return Err(ConfigurationError::VertexOutOfRange {
                vertex,
                vertices: self.number_of_vertices(),
            });
        }
        Ok(())
    }

    /// Inserts an edge in both directions. A second edge between the same
    /// pair replaces the first one.
    pub fn add_edge(&mut self, edge: &WeightedEdge) -> Result<(), ConfigurationError> {
        self.check_vertex(edge.tail())?;
        self.check_vertex(edge.head())?;
        if edge.weight() == INFINITY {
            return Err(ConfigurationError::WeightOutOfRange {
                weight: edge.weight(),
            });
        }

        let (tail, head) = (edge.tail() as usize, edge.head() as usize);
        let previous = self.distances[(tail, head)];
        if previous != INFINITY && previous != edge.weight() {
            warn!(
                "edge {} - {} inserted twice, replacing weight {} with {}",
                edge.tail(),
                edge.head(),
                previous,
                edge.weight()
            );
        }

        self.distances[(tail, head)] = edge.weight();
        self.distances[(head, tail)] = edge.weight();
        Ok(())
    }

    pub fn add_edge_between(
        &mut self,
        tail: Vertex,
        head: Vertex,
        weight: Weight,
    ) -> Result<(), ConfigurationError> {
        let edge = WeightedEdge::new(tail, head, weight)
            .ok_or(ConfigurationError::SelfLoop { vertex: tail })?;
        self.add_edge(&edge)
    }

    /// Runs the parallel relaxation with `number_of_workers` threads.
    pub fn solve(self, number_of_workers: usize) -> Result<ShortestPaths, SolveError> {
        FloydWarshall::new(number_of_workers).solve(self)
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        Vec<String>,
        SquareMatrix<Distance>,
        SquareMatrix<Option<Vertex>>,
    ) {
        (self.names, self.distances, self.predecessors)
    }
}

#[cfg(test)]
mod tests {
    use super::GraphStore;
    use crate::{error::ConfigurationError, graphs::INFINITY};

    #[test]
    fn empty_store_is_rejected() {
        assert_eq!(
            GraphStore::with_vertices(0).unwrap_err(),
            ConfigurationError::NoVertices
        );
    }

    #[test]
    fn initial_distances() {
        let store = GraphStore::with_vertices(3).unwrap();
        for tail in 0..3 {
            for head in 0..3 {
                let expected = if tail == head { 0 } else { INFINITY };
                assert_eq!(store.distance(tail, head), Some(expected));
            }
        }
        assert_eq!(store.name(2), Some("3"));
        assert_eq!(store.number_of_edges(), 0);
    }

    #[test]
    fn edges_are_inserted_symmetrically() {
        let mut store = GraphStore::with_vertices(3).unwrap();
        store.add_edge_between(0, 2, 5).unwrap();
        assert_eq!(store.distance(0, 2), Some(5));
        assert_eq!(store.distance(2, 0), Some(5));
        assert_eq!(store.number_of_edges(), 1);
    }

    #[test]
    fn duplicate_edge_keeps_last_weight() {
        // Replacing instead of keeping the minimum is an assumption about the
        // input data, not a documented requirement of it.
        let mut store = GraphStore::with_vertices(2).unwrap();
        store.add_edge_between(0, 1, 3).unwrap();
        store.add_edge_between(1, 0, 9).unwrap();
        assert_eq!(store.distance(0, 1), Some(9));
        assert_eq!(store.distance(1, 0), Some(9));
    }

    #[test]
    fn invalid_edges_are_rejected() {
        let mut store = GraphStore::with_vertices(2).unwrap();
        assert_eq!(
            store.add_edge_between(0, 2, 1),
            Err(ConfigurationError::VertexOutOfRange {
                vertex: 2,
                vertices: 2
            })
        );
        assert_eq!(
            store.add_edge_between(1, 1, 1),
            Err(ConfigurationError::SelfLoop { vertex: 1 })
        );
    }

    #[test]
    fn infinite_weight_is_rejected() {
        let mut store = GraphStore::with_vertices(2).unwrap();
        assert_eq!(
            store.add_edge_between(0, 1, INFINITY),
            Err(ConfigurationError::WeightOutOfRange { weight: INFINITY })
        );
        assert_eq!(store.distance(0, 1), Some(INFINITY));

        store.add_edge_between(0, 1, INFINITY - 1).unwrap();
        assert_eq!(store.number_of_edges(), 1);
    }

    #[test]
    fn vertices_can_be_found_by_name() {
        let store = GraphStore::new(vec!["Fargo".into(), "Minot".into()]).unwrap();
        assert_eq!(store.vertex_by_name("Minot"), Some(1));
        assert_eq!(store.vertex_by_name("Bismarck"), None);
    }
}
