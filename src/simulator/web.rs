use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::Simulation;
use crate::input_modeling::dynamic_rng::{entropy_rng, seeded_rng, DynRng};
use crate::input_modeling::parameters::Parameters;
use crate::input_modeling::variate_factory;
use crate::input_modeling::VariateGenerator;
use crate::models::epidemic::{CellState, EpidemicParameters, GridEpidemicModel};
use crate::models::model_trait::Reportable;
use crate::models::{Boundary, ElementaryAutomaton1D, LifeAutomaton2D};
use crate::output_analysis::{Histogram, IndependentSample};
use crate::utils::errors::SimulationError;
use crate::utils::set_panic_hook;

fn to_js(error: SimulationError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|error| to_js(error.into()))
}

fn yaml<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_yaml::to_string(value).map_err(|error| to_js(error.into()))
}

/// A fixed seed replays a run exactly; without one, the stream is seeded
/// from browser entropy.
fn stream(seed: Option<u32>) -> DynRng {
    match seed {
        Some(seed) => seeded_rng(u64::from(seed)),
        None => entropy_rng(),
    }
}

fn boundary(toroidal: bool) -> Boundary {
    if toroidal {
        Boundary::Toroidal
    } else {
        Boundary::Clipped
    }
}

fn flags(cells: &[bool]) -> Vec<u8> {
    cells.iter().map(|cell| u8::from(*cell)).collect()
}

/// The `WebEpidemic` provides JS/WASM-compatible interfaces to a
/// `Simulation` of the `GridEpidemicModel`.  Configuration and step records
/// are exchanged as JSON or YAML strings, the grid as a flat, row-major
/// array of state codes (0 Empty, 1 Susceptible, 2 Infected, 3 Recovered,
/// 4 Dead).  Errors are returned as JS strings.
#[wasm_bindgen]
#[derive(Debug)]
pub struct WebEpidemic {
    simulation: Simulation<GridEpidemicModel>,
}

impl WebEpidemic {
    fn post(parameters: EpidemicParameters, seed: Option<u32>) -> Result<WebEpidemic, JsValue> {
        set_panic_hook();
        let model = GridEpidemicModel::new(parameters, stream(seed)).map_err(to_js)?;
        Ok(Self {
            simulation: Simulation::post(model),
        })
    }
}

#[wasm_bindgen]
impl WebEpidemic {
    /// A JS/WASM interface for `GridEpidemicModel::new`, which uses a JSON
    /// representation of the epidemic parameters.
    pub fn post_json(parameters: &str, seed: Option<u32>) -> Result<WebEpidemic, JsValue> {
        Self::post(EpidemicParameters::from_json(parameters).map_err(to_js)?, seed)
    }

    /// A JS/WASM interface for `GridEpidemicModel::new`, which uses a YAML
    /// representation of the epidemic parameters.
    pub fn post_yaml(parameters: &str, seed: Option<u32>) -> Result<WebEpidemic, JsValue> {
        Self::post(EpidemicParameters::from_yaml(parameters).map_err(to_js)?, seed)
    }

    /// The default parameters, as JSON, for populating a settings form.
    pub fn default_parameters_json() -> Result<String, JsValue> {
        json(&EpidemicParameters::default())
    }

    /// Get a JSON snapshot of the epidemic.
    pub fn get_json(&self) -> Result<String, JsValue> {
        json(&self.simulation.snapshot())
    }

    /// Get a YAML snapshot of the epidemic.
    pub fn get_yaml(&self) -> Result<String, JsValue> {
        yaml(&self.simulation.snapshot())
    }

    /// A JS/WASM interface for `Simulation.step`, which converts the
    /// returned record to a JSON string.
    pub fn step_json(&mut self) -> Result<String, JsValue> {
        json(&self.simulation.step())
    }

    /// A JS/WASM interface for `Simulation.step_n`, which converts the
    /// returned records to a JSON string.
    pub fn step_n_json(&mut self, n: usize) -> Result<String, JsValue> {
        json(&self.simulation.step_n(n))
    }

    /// Steps until no cell is infected, or `max_steps` have run.
    pub fn step_until_contained_json(&mut self, max_steps: usize) -> Result<String, JsValue> {
        json(
            &self
                .simulation
                .step_until(|record| record.counts.infected == 0, max_steps),
        )
    }

    pub fn counts_json(&self) -> Result<String, JsValue> {
        json(&self.simulation.model().counts())
    }

    pub fn cells(&self) -> Vec<u8> {
        self.simulation
            .model()
            .grid()
            .cells()
            .iter()
            .map(|state| state.code())
            .collect()
    }

    pub fn set_cell(&mut self, row: usize, col: usize, code: u8) -> Result<(), JsValue> {
        let state = CellState::from_code(code).ok_or_else(|| {
            to_js(SimulationError::InvalidParameter {
                name: "code",
                value: f64::from(code),
                reason: "state codes range from 0 to 4",
            })
        })?;
        self.simulation
            .model_mut()
            .set(row, col, state)
            .map_err(to_js)
    }

    pub fn rows(&self) -> usize {
        self.simulation.model().rows()
    }

    pub fn cols(&self) -> usize {
        self.simulation.model().cols()
    }

    pub fn t(&self) -> f64 {
        self.simulation.model().t() as f64
    }

    pub fn status(&self) -> String {
        self.simulation.get_status()
    }
}

/// The `WebLife` provides JS/WASM-compatible interfaces to a `Simulation`
/// of the `LifeAutomaton2D`.  The grid is exchanged as a flat, row-major
/// array of 0/1 flags.
#[wasm_bindgen]
#[derive(Debug)]
pub struct WebLife {
    simulation: Simulation<LifeAutomaton2D>,
}

#[wasm_bindgen]
impl WebLife {
    pub fn post(rows: usize, cols: usize, seed: Option<u32>) -> Result<WebLife, JsValue> {
        set_panic_hook();
        let model = LifeAutomaton2D::new(rows, cols, stream(seed)).map_err(to_js)?;
        Ok(Self {
            simulation: Simulation::post(model),
        })
    }

    pub fn set_toroidal(&mut self, toroidal: bool) {
        self.simulation.model_mut().set_boundary(boundary(toroidal));
    }

    pub fn randomize(&mut self, p: f64) -> Result<(), JsValue> {
        self.simulation.model_mut().randomize(p).map_err(to_js)
    }

    pub fn clear(&mut self) {
        self.simulation.model_mut().clear();
    }

    pub fn set_cell(&mut self, row: usize, col: usize, alive: bool) -> Result<(), JsValue> {
        self.simulation
            .model_mut()
            .set(row, col, alive)
            .map_err(to_js)
    }

    pub fn step_json(&mut self) -> Result<String, JsValue> {
        json(&self.simulation.step())
    }

    pub fn step_n_json(&mut self, n: usize) -> Result<String, JsValue> {
        json(&self.simulation.step_n(n))
    }

    pub fn cells(&self) -> Vec<u8> {
        flags(self.simulation.model().grid().cells())
    }

    pub fn population(&self) -> usize {
        self.simulation.model().population()
    }

    pub fn rows(&self) -> usize {
        self.simulation.model().rows()
    }

    pub fn cols(&self) -> usize {
        self.simulation.model().cols()
    }

    pub fn get_json(&self) -> Result<String, JsValue> {
        json(&self.simulation.snapshot())
    }

    pub fn status(&self) -> String {
        self.simulation.get_status()
    }
}

/// The `WebElementary` provides JS/WASM-compatible interfaces to a
/// `Simulation` of the `ElementaryAutomaton1D`.  The history is exchanged
/// as one flat array of 0/1 flags, oldest generation first, `len()` flags
/// per generation.
#[wasm_bindgen]
#[derive(Debug)]
pub struct WebElementary {
    simulation: Simulation<ElementaryAutomaton1D>,
}

#[wasm_bindgen]
impl WebElementary {
    pub fn post(length: usize, rule: i32) -> Result<WebElementary, JsValue> {
        set_panic_hook();
        let model = ElementaryAutomaton1D::new(length, i64::from(rule)).map_err(to_js)?;
        Ok(Self {
            simulation: Simulation::post(model),
        })
    }

    pub fn set_toroidal(&mut self, toroidal: bool) {
        self.simulation.model_mut().set_boundary(boundary(toroidal));
    }

    pub fn reset(&mut self) {
        self.simulation.model_mut().reset();
    }

    pub fn step_json(&mut self) -> Result<String, JsValue> {
        json(&self.simulation.step())
    }

    pub fn step_n_json(&mut self, n: usize) -> Result<String, JsValue> {
        json(&self.simulation.step_n(n))
    }

    pub fn current(&self) -> Vec<u8> {
        flags(self.simulation.model().current())
    }

    pub fn history(&self) -> Vec<u8> {
        self.simulation
            .model()
            .history()
            .iter()
            .flat_map(|generation| flags(generation))
            .collect()
    }

    pub fn history_len(&self) -> usize {
        self.simulation.model().history().len()
    }

    pub fn len(&self) -> usize {
        self.simulation.model().len()
    }

    pub fn is_empty(&self) -> bool {
        self.simulation.model().is_empty()
    }

    pub fn rule(&self) -> u8 {
        self.simulation.model().rule()
    }

    pub fn generation(&self) -> f64 {
        self.simulation.model().generation() as f64
    }

    pub fn get_json(&self) -> Result<String, JsValue> {
        json(&self.simulation.snapshot())
    }

    pub fn status(&self) -> String {
        self.simulation.model().status()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SampleSummary {
    mean: f64,
    variance: f64,
    histogram: Histogram,
}

/// The `WebVariates` provides JS/WASM-compatible interfaces to the
/// `VariateGenerator`, with distributions selected by name and parameters
/// given as `key=value` text, e.g. `sample("normal", "mu=0, sigma=1", 1000)`.
#[wasm_bindgen]
#[derive(Debug)]
pub struct WebVariates {
    generator: VariateGenerator,
}

#[wasm_bindgen]
impl WebVariates {
    pub fn post(seed: Option<u32>) -> WebVariates {
        set_panic_hook();
        Self {
            generator: VariateGenerator::new(stream(seed)),
        }
    }

    /// The supported distribution names, as a JSON array.
    pub fn variants_json() -> Result<String, JsValue> {
        json(&variate_factory::variants())
    }

    pub fn sample(&mut self, name: &str, parameters: &str, n: usize) -> Result<Vec<f64>, JsValue> {
        self.generator
            .sample_named(name, parameters, n)
            .map_err(to_js)
    }

    pub fn sample_json(&mut self, name: &str, parameters: &str, n: usize) -> Result<String, JsValue> {
        json(&self.sample(name, parameters, n)?)
    }

    pub fn sample_yaml(&mut self, name: &str, parameters: &str, n: usize) -> Result<String, JsValue> {
        yaml(&self.sample(name, parameters, n)?)
    }

    /// Draws `n` variates and summarizes them as JSON: the sample mean and
    /// variance, and a histogram binned for the distribution (`bins` is used
    /// for continuous distributions only).
    pub fn summary_json(
        &mut self,
        name: &str,
        parameters: &str,
        n: usize,
        bins: usize,
    ) -> Result<String, JsValue> {
        let summary = self.summarize(name, parameters, n, bins).map_err(to_js)?;
        json(&summary)
    }
}

impl WebVariates {
    fn summarize(
        &mut self,
        name: &str,
        parameters: &str,
        n: usize,
        bins: usize,
    ) -> Result<SampleSummary, SimulationError> {
        let variable = variate_factory::create(name, &Parameters::parse(parameters)?)?;
        let points = self.generator.sample(&variable, n)?;
        let histogram = Histogram::for_variable(&variable, &points, bins)?;
        let sample = IndependentSample::post(points)?;
        Ok(SampleSummary {
            mean: sample.point_estimate_mean(),
            variance: sample.variance(),
            histogram,
        })
    }
}
