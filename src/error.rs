use std::path::PathBuf;

use crate::graphs::{Vertex, Weight};

/// Errors raised before any computation starts.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("a graph needs at least one vertex")]
    NoVertices,

    #[error("at least one worker is needed")]
    ZeroWorkers,

    #[error("{workers} workers are not evenly divisible into {vertices} vertices")]
    UnevenPartition { workers: usize, vertices: usize },

    #[error("vertex {vertex} is out of range for a graph with {vertices} vertices")]
    VertexOutOfRange { vertex: Vertex, vertices: usize },

    #[error("edge from vertex {vertex} to itself")]
    SelfLoop { vertex: Vertex },

    #[error("edge weight {weight} is reserved for unreachable pairs")]
    WeightOutOfRange { weight: Weight },
}

/// Errors returned by queries against a solved graph.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("no path available between {from} and {to}")]
    Unreachable { from: Vertex, to: Vertex },

    #[error("vertex {vertex} is out of range for a graph with {vertices} vertices")]
    VertexOutOfRange { vertex: Vertex, vertices: usize },
}

#[derive(thiserror::Error, Debug)]
pub enum SolveError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A worker died mid run. The partially relaxed matrices are discarded.
    #[error("worker {worker} panicked during the relaxation")]
    WorkerPanicked { worker: usize },
}

#[derive(thiserror::Error, Debug)]
pub enum DataFileError {
    #[error("unable to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Graph(#[from] ConfigurationError),
}

impl DataFileError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> DataFileError {
        DataFileError::Parse {
            line,
            message: message.into(),
        }
    }
}
