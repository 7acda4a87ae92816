use serde::Serialize;

use crate::utils::errors::SimulationError;

/// Snapshot support for engines.  `get_type` names the engine and
/// `serialize` captures its state (without the random number generator),
/// for renderers and front ends that consume JSON or YAML.  Usually
/// implemented with `#[derive(SerializableModel)]`.
pub trait SerializableModel {
    fn get_type(&self) -> &'static str {
        "Model"
    }
    fn serialize(&self) -> serde_yaml::Value {
        serde_yaml::Value::Null
    }
}

/// The `Model` trait defines everything a stepping controller needs from an
/// engine: a synchronous, infallible `step`, and a per-step `record` of
/// aggregate state for charts and logs.
pub trait Model: SerializableModel {
    type Record: Clone + Serialize;

    /// Advances exactly one generation.
    fn step(&mut self);

    /// Aggregate state after the most recent step.
    fn record(&self) -> Self::Record;

    /// Verifies the engine's structural invariants.  A failure here is a
    /// defect in the engine, not a recoverable condition.
    fn check_invariants(&self) -> Result<(), SimulationError> {
        Ok(())
    }
}

/// The additional status method of `Reportable` provides improved
/// simulation reasoning and reporting, but does not impact simulation
/// execution or results.
pub trait Reportable {
    fn status(&self) -> String;
}

/// A `ReportableModel` has the stepping of trait `Model` and the status
/// reporting of trait `Reportable`.
pub trait ReportableModel: Model + Reportable {}
impl<T: Model + Reportable> ReportableModel for T {}
