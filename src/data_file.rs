//! Reader for the plain text road files.
//!
//! ```text
//! 4            number of vertices
//! Fargo        one name per line
//! Minot
//! Bismarck
//! Grand Forks
//! 1 2 230      edges as `a b weight`, vertices numbered from 1
//! 2 3 110
//! -1           end of edges
//! ```
//!
//! Lines starting with `#` and empty lines before the vertex count are
//! skipped. The terminating `-1` may be left out.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::info;

use crate::{
    error::DataFileError,
    graphs::{edge::WeightedEdge, graph_store::GraphStore, Vertex, Weight},
};

pub fn read_graph_file(path: &Path) -> Result<GraphStore, DataFileError> {
    let file = File::open(path).map_err(|source| DataFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_graph(BufReader::new(file)).map_err(|error| match error {
        DataFileError::Io { source, .. } => DataFileError::Io {
            path: path.to_path_buf(),
            source,
        },
        error => error,
    })
}

pub fn parse_graph<R: BufRead>(reader: R) -> Result<GraphStore, DataFileError> {
    let mut lines = reader.lines().enumerate().map(|(index, line)| {
        line.map(|line| (index + 1, line))
            .map_err(|source| DataFileError::Io {
                path: Default::default(),
                source,
            })
    });

    let (count_line, number_of_vertices) = loop {
        let (number, line) = lines
            .next()
            .ok_or_else(|| DataFileError::parse(0, "missing number of vertices"))??;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let count: usize = line
            .parse()
            .map_err(|_| DataFileError::parse(number, format!("invalid vertex count {:?}", line)))?;
        break (number, count);
    };

    let mut names = Vec::with_capacity(number_of_vertices);
    for vertex in 0..number_of_vertices {
        let (_, line) = lines.next().ok_or_else(|| {
            DataFileError::parse(
                count_line + vertex + 1,
                format!("expected {} vertex names, found {}", number_of_vertices, vertex),
            )
        })??;
        names.push(line.trim().to_string());
    }
    info!("Read in {} vertices", names.len());

    let mut graph = GraphStore::new(names)?;
    let mut number_of_edges = 0;
    for line in lines {
        let (number, line) = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "-1" || line.starts_with("-1 ") {
            break;
        }

        let edge = parse_edge(line, number_of_vertices)
            .map_err(|message| DataFileError::parse(number, message))?;
        graph
            .add_edge(&edge)
            .map_err(|error| DataFileError::parse(number, error.to_string()))?;
        number_of_edges += 1;
    }
    info!("Read in {} connecting roads", number_of_edges);

    Ok(graph)
}

fn parse_edge(line: &str, number_of_vertices: usize) -> Result<WeightedEdge, String> {
    let mut values = line.split_whitespace();
    let mut vertex = |role: &str| -> Result<Vertex, String> {
        let value = values
            .next()
            .ok_or_else(|| format!("no {} found in {:?}", role, line))?;
        let number: usize = value
            .parse()
            .map_err(|_| format!("unable to parse {} {:?}", role, value))?;
        if number == 0 || number > number_of_vertices {
            return Err(format!(
                "{} {} is not in 1..={}",
                role, number, number_of_vertices
            ));
        }
        Ok((number - 1) as Vertex)
    };
    let tail = vertex("tail")?;
    let head = vertex("head")?;

    let value = values
        .next()
        .ok_or_else(|| format!("no weight found in {:?}", line))?;
    let weight: Weight = value
        .parse()
        .map_err(|_| format!("unable to parse weight {:?}", value))?;

    WeightedEdge::new(tail, head, weight)
        .ok_or_else(|| format!("road from vertex {} to itself", tail + 1))
}
