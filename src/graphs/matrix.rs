use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// Dense `order x order` matrix stored row by row in a single buffer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "UncheckedMatrix<T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct SquareMatrix<T> {
    order: usize,
    cells: Vec<T>,
}

#[derive(Deserialize)]
struct UncheckedMatrix<T> {
    order: usize,
    cells: Vec<T>,
}

impl<T> TryFrom<UncheckedMatrix<T>> for SquareMatrix<T> {
    type Error = String;

    fn try_from(matrix: UncheckedMatrix<T>) -> Result<Self, Self::Error> {
        let number_of_cells = matrix.cells.len();
        SquareMatrix::from_cells(matrix.order, matrix.cells).ok_or_else(|| {
            format!(
                "matrix of order {} cannot hold {} cells",
                matrix.order, number_of_cells
            )
        })
    }
}

impl<T: Clone> SquareMatrix<T> {
    pub fn new(order: usize, value: T) -> Self {
        SquareMatrix {
            order,
            cells: vec![value; order * order],
        }
    }
}

impl<T> SquareMatrix<T> {
    /// Builds a matrix from row-major cells. Returns `None` if the number of
    /// cells is not `order * order`.
    pub fn from_cells(order: usize, cells: Vec<T>) -> Option<Self> {
        if order.checked_mul(order) != Some(cells.len()) {
            return None;
        }
        Some(SquareMatrix { order, cells })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    fn offset(&self, row: usize, column: usize) -> Option<usize> {
        if row >= self.order || column >= self.order {
            return None;
        }
        Some(row * self.order + column)
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&T> {
        let offset = self.offset(row, column)?;
        self.cells.get(offset)
    }

    pub fn get_mut(&mut self, row: usize, column: usize) -> Option<&mut T> {
        let offset = self.offset(row, column)?;
        self.cells.get_mut(offset)
    }

    pub fn row(&self, row: usize) -> &[T] {
        assert!(row < self.order, "row {} out of range", row);
        &self.cells[row * self.order..(row + 1) * self.order]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        // chunks_exact panics on a zero chunk size
        self.cells.chunks_exact(self.order.max(1))
    }

    pub fn into_cells(self) -> Vec<T> {
        self.cells
    }
}

impl<T> Index<(usize, usize)> for SquareMatrix<T> {
    type Output = T;

    fn index(&self, (row, column): (usize, usize)) -> &T {
        self.get(row, column).unwrap_or_else(|| {
            panic!(
                "index ({}, {}) out of range for order {}",
                row, column, self.order
            )
        })
    }
}

impl<T> IndexMut<(usize, usize)> for SquareMatrix<T> {
    fn index_mut(&mut self, (row, column): (usize, usize)) -> &mut T {
        let order = self.order;
        self.get_mut(row, column).unwrap_or_else(|| {
            panic!(
                "index ({}, {}) out of range for order {}",
                row, column, order
            )
        })
    }
}
