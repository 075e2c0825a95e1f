pub mod data_file;
pub mod error;
pub mod graphs;
pub mod search;
pub mod utility;

pub use error::{ConfigurationError, DataFileError, QueryError, SolveError};
pub use graphs::{graph_store::GraphStore, Distance, Vertex, Weight, INFINITY};
pub use search::{
    floyd_warshall::FloydWarshall,
    path::{Hop, Hops, Path},
    shortest_paths::ShortestPaths,
    PathFinding,
};
