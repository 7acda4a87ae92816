//! The models module provides the grid engines: a stochastic SIR-D epidemic,
//! Conway's Game of Life, and elementary one-dimensional automata.  Each
//! engine owns its state and random number stream, and advances one
//! synchronous generation per `step`.  The stepping loop itself belongs to
//! the caller, e.g. `simulator::Simulation`.  Additional engines plug into
//! the same controller via the `Model` trait.

pub mod elementary;
pub mod epidemic;
pub mod grid;
pub mod life;
pub mod model_trait;

pub use self::elementary::{ElementaryAutomaton1D, ElementaryRecord, HISTORY_CAPACITY};
pub use self::epidemic::{
    CellState, EpidemicParameters, EpidemicRecord, GridEpidemicModel, InitialSeeding, StateCounts,
};
pub use self::grid::{Boundary, Grid};
pub use self::life::{LifeAutomaton2D, LifeRecord};
pub use self::model_trait::{Model, Reportable, ReportableModel, SerializableModel};
