use log::debug;
use serde::{Deserialize, Serialize};

use super::grid::{Boundary, Grid};
use super::model_trait::{Model, Reportable, SerializableModel};
use crate::input_modeling::dynamic_rng::{default_rng, seeded_rng, DynRng};
use crate::input_modeling::random_variable::Boolean;
use crate::utils::errors::SimulationError;

use simlab_derive::SerializableModel;

/// Birth on exactly 3 live neighbors, survival on 2 or 3 (B3/S23).
pub fn next_state(alive: bool, live_neighbors: usize) -> bool {
    matches!((alive, live_neighbors), (true, 2) | (_, 3))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeRecord {
    pub population: usize,
}

/// Conway's Game of Life on a fixed rows x cols grid.  The grid starts all
/// dead.  Positions past the edge are dead by default (`Boundary::Clipped`);
/// `Boundary::Toroidal` wraps them instead.
#[derive(Debug, Serialize, SerializableModel)]
#[serde(rename_all = "camelCase")]
pub struct LifeAutomaton2D {
    grid: Grid<bool>,
    #[serde(skip)]
    next: Grid<bool>,
    boundary: Boundary,
    #[serde(skip)]
    rng: DynRng,
}

impl LifeAutomaton2D {
    pub fn new(rows: usize, cols: usize, rng: DynRng) -> Result<Self, SimulationError> {
        let grid = Grid::new(rows, cols, false)?;
        debug!("Created {}x{} life grid", rows, cols);
        Ok(Self {
            next: grid.clone(),
            grid,
            boundary: Boundary::default(),
            rng,
        })
    }

    pub fn post(rows: usize, cols: usize) -> Result<Self, SimulationError> {
        Self::new(rows, cols, default_rng())
    }

    pub fn with_seed(rows: usize, cols: usize, seed: u64) -> Result<Self, SimulationError> {
        Self::new(rows, cols, seeded_rng(seed))
    }

    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn set_boundary(&mut self, boundary: Boundary) {
        self.boundary = boundary;
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn grid(&self) -> &Grid<bool> {
        &self.grid
    }

    /// Replaces every cell, each alive with probability `p`.
    pub fn randomize(&mut self, p: f64) -> Result<(), SimulationError> {
        let draws = Boolean::Bernoulli { p }.sample_n(&mut self.rng, self.grid.len())?;
        self.grid.cells_mut().copy_from_slice(&draws);
        debug!("Randomized life grid, population {}", self.population());
        Ok(())
    }

    pub fn clear(&mut self) {
        self.grid.fill(false);
    }

    pub fn get(&self, row: usize, col: usize) -> Option<bool> {
        self.grid.get(row, col).copied()
    }

    pub fn set(&mut self, row: usize, col: usize, alive: bool) -> Result<(), SimulationError> {
        self.grid.set(row, col, alive)
    }

    /// Places a pattern of live cells, given as (row, col) offsets from an
    /// origin.  Nothing is placed unless every cell fits.
    pub fn place(
        &mut self,
        origin: (usize, usize),
        pattern: &[(usize, usize)],
    ) -> Result<(), SimulationError> {
        let (rows, cols) = (self.rows(), self.cols());
        if let Some((row, col)) = pattern
            .iter()
            .map(|(dr, dc)| (origin.0 + dr, origin.1 + dc))
            .find(|(row, col)| *row >= rows || *col >= cols)
        {
            return Err(SimulationError::CellOutOfBounds {
                row,
                col,
                rows,
                cols,
            });
        }
        for (dr, dc) in pattern {
            self.grid[(origin.0 + dr, origin.1 + dc)] = true;
        }
        Ok(())
    }

    pub fn population(&self) -> usize {
        self.grid.cells().iter().filter(|alive| **alive).count()
    }

    pub fn step(&mut self) {
        for row in 0..self.grid.rows() {
            for col in 0..self.grid.cols() {
                let live_neighbors =
                    self.grid
                        .count_neighbors(row, col, self.boundary, |alive| *alive);
                self.next[(row, col)] = next_state(self.grid[(row, col)], live_neighbors);
            }
        }
        std::mem::swap(&mut self.grid, &mut self.next);
    }
}

impl Model for LifeAutomaton2D {
    type Record = LifeRecord;

    fn step(&mut self) {
        LifeAutomaton2D::step(self)
    }

    fn record(&self) -> LifeRecord {
        LifeRecord {
            population: self.population(),
        }
    }

    fn check_invariants(&self) -> Result<(), SimulationError> {
        if self.next.len() != self.grid.len() {
            return Err(SimulationError::InvariantViolation(String::from(
                "life buffers differ in size",
            )));
        }
        Ok(())
    }
}

impl Reportable for LifeAutomaton2D {
    fn status(&self) -> String {
        match self.population() {
            0 => String::from("Extinct"),
            population => format!("Alive ({} cells)", population),
        }
    }
}
