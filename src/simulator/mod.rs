//! The simulator module provides the stepping controller for the engines.
//! Engines only know how to advance a single generation; the controller
//! drives them for a number of steps, or until a condition is met, and
//! collects the per-step records for charts and analysis.  A run can be
//! cancelled between steps through a `StopHandle`, from another thread or
//! from an event handler.
//!
//! `Simulation` is used for Rust-based projects, while the `web` module
//! provides interfaces with better JS/WASM compatibility.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::debug;

use crate::models::model_trait::{Model, Reportable, SerializableModel};
use crate::utils;
use crate::utils::errors::SimulationError;

pub mod web;

pub use self::web::{WebElementary, WebEpidemic, WebLife, WebVariates};

/// A cloneable cancellation flag.  Every clone refers to the same flag.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the controller stop before its next step.
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn resume(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// The `Simulation` struct owns a single engine, counts the steps it has
/// driven, and checks its stop handle between steps.  It adds no timing
/// and no threads of its own - pacing (e.g. an animation frame rate) is up
/// to the caller.
#[derive(Debug)]
pub struct Simulation<M: Model> {
    model: M,
    steps: u64,
    stop: StopHandle,
}

impl<M: Model> Simulation<M> {
    /// This constructor method creates a simulation around an engine.
    pub fn post(model: M) -> Self {
        utils::set_panic_hook();
        debug!("Created simulation of {}", model.get_type());
        Self {
            model,
            steps: 0,
            stop: StopHandle::new(),
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Direct engine access, e.g. to place cells between steps.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    /// Steps driven by this controller.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// A handle for cancelling `step_n` and `step_until` runs.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Clears a stop request, so stepping can continue.
    pub fn resume(&mut self) {
        self.stop.resume();
    }

    /// Advances the engine exactly one step, regardless of the stop handle,
    /// and returns the engine's record of that step.
    pub fn step(&mut self) -> M::Record {
        self.model.step();
        self.steps += 1;
        self.model.record()
    }

    /// Up to `n` steps, one record per step.  Fewer records are returned if
    /// the stop handle is triggered during the run.
    pub fn step_n(&mut self, n: usize) -> Vec<M::Record> {
        let mut records = Vec::new();
        for _ in 0..n {
            if self.stop.is_stopped() {
                debug!("Stopped after {} of {} steps", records.len(), n);
                break;
            }
            records.push(self.step());
        }
        records
    }

    /// Steps until a record satisfies the predicate, the stop handle is
    /// triggered, or `max_steps` steps have run.  The satisfying record is
    /// the last one returned.
    pub fn step_until<P>(&mut self, mut predicate: P, max_steps: usize) -> Vec<M::Record>
    where
        P: FnMut(&M::Record) -> bool,
    {
        let mut records = Vec::new();
        while records.len() < max_steps && !self.stop.is_stopped() {
            let record = self.step();
            let done = predicate(&record);
            records.push(record);
            if done {
                break;
            }
        }
        debug!("Step-until run finished after {} steps", records.len());
        records
    }

    /// Verifies the engine's structural invariants.
    pub fn check_invariants(&self) -> Result<(), SimulationError> {
        self.model.check_invariants()
    }

    /// Serialized snapshot of the engine, without its random number stream.
    pub fn snapshot(&self) -> serde_yaml::Value {
        self.model.serialize()
    }
}

impl<M: Model + Reportable> Simulation<M> {
    /// This method provides the engine's current status string.
    pub fn get_status(&self) -> String {
        self.model.status()
    }
}
