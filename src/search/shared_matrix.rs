use std::{
    ops::Range,
    sync::atomic::{AtomicU32, Ordering},
};

use crate::graphs::{matrix::SquareMatrix, Distance, Vertex};

/// Predecessor value of a pair whose best path is its direct edge.
const DIRECT: u32 = u32::MAX;

/// Distance and predecessor matrices shared by all workers of a solve.
///
/// Cells are accessed with relaxed atomics. Ordering between phases comes
/// from the barrier the workers pass before every phase, not from the cells.
pub struct SharedMatrices {
    order: usize,
    distances: Vec<AtomicU32>,
    predecessors: Vec<AtomicU32>,
}

impl SharedMatrices {
    pub fn new(
        distances: SquareMatrix<Distance>,
        predecessors: SquareMatrix<Option<Vertex>>,
    ) -> SharedMatrices {
        assert_eq!(distances.order(), predecessors.order());
        let order = distances.order();

        SharedMatrices {
            order,
            distances: distances.into_cells().into_iter().map(AtomicU32::new).collect(),
            predecessors: predecessors
                .into_cells()
                .into_iter()
                .map(|predecessor| AtomicU32::new(predecessor.unwrap_or(DIRECT)))
                .collect(),
        }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    #[inline]
    pub fn distance(&self, row: usize, column: usize) -> Distance {
        debug_assert!(row < self.order && column < self.order);
        self.distances[row * self.order + column].load(Ordering::Relaxed)
    }

    /// Hands out write access to `rows`. Partitions given to concurrently
    /// running workers must not overlap.
    pub fn partition(&self, rows: Range<usize>) -> RowPartition<'_> {
        assert!(rows.end <= self.order, "rows {:?} out of range", rows);
        RowPartition {
            matrices: self,
            rows,
        }
    }

    pub fn into_matrices(self) -> (SquareMatrix<Distance>, SquareMatrix<Option<Vertex>>) {
        let order = self.order;
        let distances = self
            .distances
            .into_iter()
            .map(AtomicU32::into_inner)
            .collect();
        let predecessors = self
            .predecessors
            .into_iter()
            .map(|predecessor| match predecessor.into_inner() {
                DIRECT => None,
                via => Some(via),
            })
            .collect();

        (
            SquareMatrix::from_cells(order, distances).expect("order is preserved"),
            SquareMatrix::from_cells(order, predecessors).expect("order is preserved"),
        )
    }
}

/// A worker's view of the shared matrices: reads anywhere, writes only inside
/// its own row range.
pub struct RowPartition<'a> {
    matrices: &'a SharedMatrices,
    rows: Range<usize>,
}

impl<'a> RowPartition<'a> {
    pub fn rows(&self) -> Range<usize> {
        self.rows.clone()
    }

    pub fn order(&self) -> usize {
        self.matrices.order
    }

    #[inline]
    pub fn distance(&self, row: usize, column: usize) -> Distance {
        self.matrices.distance(row, column)
    }

    /// Records that the best known path from `row` to `column` now has length
    /// `distance` and passes through `via`.
    #[inline]
    pub fn improve(&self, row: usize, column: usize, distance: Distance, via: Vertex) {
        debug_assert!(
            self.rows.contains(&row),
            "write to row {} outside of partition {:?}",
            row,
            self.rows
        );
        let offset = row * self.matrices.order + column;
        self.matrices.distances[offset].store(distance, Ordering::Relaxed);
        self.matrices.predecessors[offset].store(via, Ordering::Relaxed);
    }
}
