use path::Path;

use crate::graphs::{Distance, Vertex};

pub mod floyd_warshall;
pub mod path;
pub mod shared_matrix;
pub mod shortest_paths;

pub trait PathFinding: Send + Sync {
    fn shortest_path(&self, source: Vertex, target: Vertex) -> Option<Path>;

    fn shortest_path_distance(&self, source: Vertex, target: Vertex) -> Option<Distance>;

    fn number_of_vertices(&self) -> u32;
}
