use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::utils::errors::SimulationError;

/// Relative positions of the Moore neighborhood, row-major.
const MOORE_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// How neighbor lookups treat positions past the edge of a grid or strip.
///
/// `Clipped` drops them - edge cells simply have fewer neighbors, and the
/// missing ones behave as dead/inactive.  `Toroidal` wraps them around to
/// the opposite edge.  On a side shorter than 3 cells, wrapping reaches the
/// same cell more than once, and each visit is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Boundary {
    Clipped,
    Toroidal,
}

impl Default for Boundary {
    fn default() -> Self {
        Boundary::Clipped
    }
}

impl Boundary {
    /// Resolves `index + delta` on an axis of length `len`.
    pub fn resolve(self, index: usize, delta: isize, len: usize) -> Option<usize> {
        let target = index as isize + delta;
        match self {
            Boundary::Clipped => {
                if target >= 0 && (target as usize) < len {
                    Some(target as usize)
                } else {
                    None
                }
            }
            Boundary::Toroidal => Some(target.rem_euclid(len as isize) as usize),
        }
    }
}

/// A rows x cols matrix, stored row-major.  Dimensions are fixed at
/// construction and always positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn new(rows: usize, cols: usize, fill: T) -> Result<Self, SimulationError> {
        if rows == 0 || cols == 0 {
            return Err(SimulationError::InvalidDimensions {
                rows,
                cols,
                reason: "rows and columns must both be positive",
            });
        }
        let len = rows
            .checked_mul(cols)
            .ok_or(SimulationError::InvalidDimensions {
                rows,
                cols,
                reason: "the cell count overflows",
            })?;
        Ok(Self {
            rows,
            cols,
            cells: vec![fill; len],
        })
    }

    pub fn fill(&mut self, value: T) {
        for cell in self.cells.iter_mut() {
            *cell = value.clone();
        }
    }
}

impl<T> Grid<T> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cells, row-major - the layout renderers expect.
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }

    pub fn row(&self, row: usize) -> Option<&[T]> {
        if row < self.rows {
            Some(&self.cells[row * self.cols..(row + 1) * self.cols])
        } else {
            None
        }
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.cells.get(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<(), SimulationError> {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = value;
            Ok(())
        } else {
            Err(SimulationError::CellOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Positions of the Moore neighborhood of (row, col) under the given
    /// boundary policy.
    pub fn moore_neighborhood(
        &self,
        row: usize,
        col: usize,
        boundary: Boundary,
    ) -> impl Iterator<Item = (usize, usize)> + '_ {
        MOORE_OFFSETS.iter().filter_map(move |&(dr, dc)| {
            boundary
                .resolve(row, dr, self.rows)
                .zip(boundary.resolve(col, dc, self.cols))
        })
    }

    /// Counts Moore neighbors of (row, col) matching the predicate.
    pub fn count_neighbors<P>(&self, row: usize, col: usize, boundary: Boundary, predicate: P) -> usize
    where
        P: Fn(&T) -> bool,
    {
        self.moore_neighborhood(row, col, boundary)
            .filter(|&(r, c)| predicate(&self[(r, c)]))
            .count()
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(row < self.rows && col < self.cols, "cell outside of grid");
        &self.cells[row * self.cols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(row < self.rows && col < self.cols, "cell outside of grid");
        &mut self.cells[row * self.cols + col]
    }
}
