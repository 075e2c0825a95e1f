use serde::{Deserialize, Serialize};

use super::{Vertex, Weight};

/// An undirected road between two distinct vertices.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, PartialOrd, Ord, Debug)]
pub struct WeightedEdge {
    tail: Vertex,
    head: Vertex,
    weight: Weight,
}

impl WeightedEdge {
    pub fn new(tail: Vertex, head: Vertex, weight: Weight) -> Option<WeightedEdge> {
        if tail == head {
            return None;
        }

        Some(WeightedEdge { tail, head, weight })
    }

    pub fn tail(&self) -> Vertex {
        self.tail
    }

    pub fn head(&self) -> Vertex {
        self.head
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub fn reversed(&self) -> WeightedEdge {
        WeightedEdge {
            tail: self.head,
            head: self.tail,
            weight: self.weight,
        }
    }
}
