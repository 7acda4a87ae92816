use std::fmt;

use log::{debug, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{Boundary, Grid};
use super::model_trait::{Model, Reportable, SerializableModel};
use crate::input_modeling::dynamic_rng::{default_rng, seeded_rng, DynRng};
use crate::input_modeling::random_variable::bernoulli_trial;
use crate::utils::errors::SimulationError;
use crate::utils::validate_probability;

use simlab_derive::SerializableModel;

/// The state of a single epidemic cell.  Recovered and Dead are absorbing:
/// once entered, a cell never leaves them.  Empty cells never change, and
/// only appear through external placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellState {
    Empty,
    Susceptible,
    Infected,
    Recovered,
    Dead,
}

impl CellState {
    pub const ALL: [CellState; 5] = [
        CellState::Empty,
        CellState::Susceptible,
        CellState::Infected,
        CellState::Recovered,
        CellState::Dead,
    ];

    /// Numeric code used by renderers, 0 (Empty) through 4 (Dead).
    pub fn code(self) -> u8 {
        match self {
            CellState::Empty => 0,
            CellState::Susceptible => 1,
            CellState::Infected => 2,
            CellState::Recovered => 3,
            CellState::Dead => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        CellState::ALL.get(code as usize).copied()
    }

    pub fn is_absorbing(self) -> bool {
        matches!(self, CellState::Recovered | CellState::Dead)
    }
}

/// Number of cells in each state.  Every state is always present, so the
/// counts sum to the number of cells in the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateCounts {
    pub empty: usize,
    pub susceptible: usize,
    pub infected: usize,
    pub recovered: usize,
    pub dead: usize,
}

impl StateCounts {
    pub fn tally<'a, I: IntoIterator<Item = &'a CellState>>(cells: I) -> Self {
        cells.into_iter().fold(Self::default(), |mut counts, state| {
            *counts.get_mut(*state) += 1;
            counts
        })
    }

    pub fn get(&self, state: CellState) -> usize {
        match state {
            CellState::Empty => self.empty,
            CellState::Susceptible => self.susceptible,
            CellState::Infected => self.infected,
            CellState::Recovered => self.recovered,
            CellState::Dead => self.dead,
        }
    }

    fn get_mut(&mut self, state: CellState) -> &mut usize {
        match state {
            CellState::Empty => &mut self.empty,
            CellState::Susceptible => &mut self.susceptible,
            CellState::Infected => &mut self.infected,
            CellState::Recovered => &mut self.recovered,
            CellState::Dead => &mut self.dead,
        }
    }

    pub fn total(&self) -> usize {
        CellState::ALL.iter().map(|state| self.get(*state)).sum()
    }

    /// (state, count) pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (CellState, usize)> + '_ {
        CellState::ALL.iter().map(move |state| (*state, self.get(*state)))
    }
}

impl fmt::Display for StateCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "S={} I={} R={} D={} E={}",
            self.susceptible, self.infected, self.recovered, self.dead, self.empty
        )
    }
}

/// How the initial infections are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InitialSeeding {
    /// Each infection draws a row and a column independently.  Draws may
    /// land on the same cell, leaving fewer infected cells than requested.
    WithReplacement,
    /// Infections land on distinct cells, so exactly the requested number
    /// of cells start infected.
    Distinct,
}

impl Default for InitialSeeding {
    fn default() -> Self {
        InitialSeeding::WithReplacement
    }
}

/// Configuration of a `GridEpidemicModel`.  Deserializes from camelCase
/// JSON or YAML, e.g. `{"rows": 60, "cols": 60, "initInfected": 5, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpidemicParameters {
    pub rows: usize,
    pub cols: usize,
    pub init_infected: usize,
    /// Per infected neighbor, per step
    pub p_infect: f64,
    /// Per step, checked only when the death check fails
    pub p_recover: f64,
    /// Per step
    pub p_die: f64,
    #[serde(default)]
    pub seeding: InitialSeeding,
}

impl Default for EpidemicParameters {
    fn default() -> Self {
        Self {
            rows: 60,
            cols: 60,
            init_infected: 5,
            p_infect: 0.25,
            p_recover: 0.02,
            p_die: 0.005,
            seeding: InitialSeeding::default(),
        }
    }
}

impl EpidemicParameters {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(SimulationError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
                reason: "rows and columns must both be positive",
            });
        }
        if self.init_infected == 0 {
            return Err(SimulationError::InvalidParameter {
                name: "initInfected",
                value: 0.0,
                reason: "at least one cell must start infected",
            });
        }
        validate_probability("pInfect", self.p_infect)?;
        validate_probability("pRecover", self.p_recover)?;
        validate_probability("pDie", self.p_die)?;
        if self.seeding == InitialSeeding::Distinct {
            let cells = self.rows.saturating_mul(self.cols);
            if self.init_infected > cells {
                return Err(SimulationError::TooManyInitialInfections {
                    requested: self.init_infected,
                    cells,
                });
            }
        }
        Ok(())
    }

    pub fn from_json(parameters: &str) -> Result<Self, SimulationError> {
        let parameters: Self = serde_json::from_str(parameters)?;
        parameters.validate()?;
        Ok(parameters)
    }

    pub fn from_yaml(parameters: &str) -> Result<Self, SimulationError> {
        let parameters: Self = serde_yaml::from_str(parameters)?;
        parameters.validate()?;
        Ok(parameters)
    }
}

/// Probability that at least one of `k` infected neighbors transmits, with
/// each transmitting independently with probability `p_infect`.
pub fn infection_probability(p_infect: f64, infected_neighbors: usize) -> f64 {
    1.0 - (1.0 - p_infect).powi(infected_neighbors as i32)
}

/// Step record of the epidemic: the step counter and the counts after the
/// step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpidemicRecord {
    pub t: u64,
    pub counts: StateCounts,
}

/// The grid epidemic model is a stochastic SIR-D automaton.  Every step is
/// computed from a snapshot of the previous grid, into a second buffer that
/// then replaces the grid, so the update is synchronous and independent of
/// the order cells are visited in.  Neighborhoods are the clipped Moore
/// neighborhood - edge and corner cells have fewer neighbors, and nothing
/// wraps.
#[derive(Debug, Serialize, SerializableModel)]
#[serde(rename_all = "camelCase")]
pub struct GridEpidemicModel {
    parameters: EpidemicParameters,
    grid: Grid<CellState>,
    #[serde(skip)]
    next: Grid<CellState>,
    t: u64,
    #[serde(skip)]
    rng: DynRng,
}

impl GridEpidemicModel {
    /// Builds the model with its own random number stream.  Invalid
    /// parameters are rejected before anything is allocated.
    pub fn new(parameters: EpidemicParameters, mut rng: DynRng) -> Result<Self, SimulationError> {
        parameters.validate()?;
        let mut grid = Grid::new(parameters.rows, parameters.cols, CellState::Susceptible)?;
        match parameters.seeding {
            InitialSeeding::WithReplacement => {
                for _ in 0..parameters.init_infected {
                    let row = rng.gen_range(0..parameters.rows);
                    let col = rng.gen_range(0..parameters.cols);
                    grid[(row, col)] = CellState::Infected;
                }
            }
            InitialSeeding::Distinct => {
                let cols = parameters.cols;
                rand::seq::index::sample(&mut rng, grid.len(), parameters.init_infected)
                    .iter()
                    .for_each(|index| grid[(index / cols, index % cols)] = CellState::Infected);
            }
        }
        debug!(
            "Created {}x{} epidemic grid with {} initially infected cells",
            parameters.rows,
            parameters.cols,
            StateCounts::tally(grid.cells()).infected
        );
        Ok(Self {
            next: grid.clone(),
            grid,
            parameters,
            t: 0,
            rng,
        })
    }

    /// Builds the model with the default, fixed-seed random number stream.
    pub fn post(parameters: EpidemicParameters) -> Result<Self, SimulationError> {
        Self::new(parameters, default_rng())
    }

    pub fn with_seed(parameters: EpidemicParameters, seed: u64) -> Result<Self, SimulationError> {
        Self::new(parameters, seeded_rng(seed))
    }

    pub fn parameters(&self) -> &EpidemicParameters {
        &self.parameters
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    /// Steps taken since construction.
    pub fn t(&self) -> u64 {
        self.t
    }

    pub fn grid(&self) -> &Grid<CellState> {
        &self.grid
    }

    pub fn get(&self, row: usize, col: usize) -> Option<CellState> {
        self.grid.get(row, col).copied()
    }

    /// Places a state directly, e.g. Empty cells as obstacles or extra
    /// infections mid-run.  Takes effect from the next step's snapshot.
    pub fn set(&mut self, row: usize, col: usize, state: CellState) -> Result<(), SimulationError> {
        self.grid.set(row, col, state)
    }

    /// Counts of every state, from a full scan of the current grid.
    pub fn counts(&self) -> StateCounts {
        StateCounts::tally(self.grid.cells())
    }

    /// Advances the epidemic one step.
    ///
    /// * A susceptible cell with `k > 0` infected neighbors becomes infected
    ///   with probability `1 - (1 - pInfect)^k`.  No draw is made when
    ///   `k = 0`.
    /// * An infected cell dies with probability `pDie`; failing that, it
    ///   recovers with probability `pRecover`, on a separate draw.
    /// * Empty, recovered, and dead cells are unchanged.
    pub fn step(&mut self) {
        let EpidemicParameters {
            p_infect,
            p_recover,
            p_die,
            ..
        } = self.parameters;
        for row in 0..self.grid.rows() {
            for col in 0..self.grid.cols() {
                let next_state = match self.grid[(row, col)] {
                    CellState::Susceptible => {
                        let infected_neighbors = self.grid.count_neighbors(
                            row,
                            col,
                            Boundary::Clipped,
                            |state| *state == CellState::Infected,
                        );
                        if infected_neighbors > 0
                            && bernoulli_trial(
                                &mut self.rng,
                                infection_probability(p_infect, infected_neighbors),
                            )
                        {
                            CellState::Infected
                        } else {
                            CellState::Susceptible
                        }
                    }
                    CellState::Infected => {
                        if bernoulli_trial(&mut self.rng, p_die) {
                            CellState::Dead
                        } else if bernoulli_trial(&mut self.rng, p_recover) {
                            CellState::Recovered
                        } else {
                            CellState::Infected
                        }
                    }
                    unchanged => unchanged,
                };
                self.next[(row, col)] = next_state;
            }
        }
        std::mem::swap(&mut self.grid, &mut self.next);
        self.t += 1;
        trace!("Epidemic step {}", self.t);
    }
}

impl Model for GridEpidemicModel {
    type Record = EpidemicRecord;

    fn step(&mut self) {
        GridEpidemicModel::step(self)
    }

    fn record(&self) -> EpidemicRecord {
        EpidemicRecord {
            t: self.t,
            counts: self.counts(),
        }
    }

    fn check_invariants(&self) -> Result<(), SimulationError> {
        let cells = self.parameters.rows * self.parameters.cols;
        let total = self.counts().total();
        if total != cells || self.grid.len() != cells {
            return Err(SimulationError::InvariantViolation(format!(
                "epidemic grid holds {} counted cells, expected {}",
                total, cells
            )));
        }
        Ok(())
    }
}

impl Reportable for GridEpidemicModel {
    fn status(&self) -> String {
        let counts = self.counts();
        if counts.infected > 0 {
            format!("Spreading ({})", counts)
        } else {
            format!("Contained ({})", counts)
        }
    }
}
