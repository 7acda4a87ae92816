use log::trace;

use super::dynamic_rng::{default_rng, seeded_rng, DynRng};
use super::parameters::Parameters;
use super::random_variable::{Boolean, Continuous, Discrete, RandomVariable};
use super::variate_factory;
use crate::utils::errors::SimulationError;

/// The `VariateGenerator` produces ordered sequences of draws for the
/// distribution viewer.  Parameters are validated at the call boundary,
/// before any random numbers are consumed, so a rejected call leaves the
/// stream position untouched.  Apart from the stream position, the
/// generator holds no state - the same seed and the same sequence of calls
/// always produce the same draws.
#[derive(Debug)]
pub struct VariateGenerator {
    rng: DynRng,
}

impl Default for VariateGenerator {
    fn default() -> Self {
        Self::new(default_rng())
    }
}

impl VariateGenerator {
    pub fn new(rng: DynRng) -> Self {
        Self { rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(seeded_rng(seed))
    }

    /// Continuous draws in [a, b)
    pub fn uniform(&mut self, a: f64, b: f64, n: usize) -> Result<Vec<f64>, SimulationError> {
        self.continuous(Continuous::Uniform { a, b }, n)
    }

    /// Inverse-CDF draws, `-ln(1 - U) / lambda`
    pub fn exponential(&mut self, lambda: f64, n: usize) -> Result<Vec<f64>, SimulationError> {
        self.continuous(Continuous::Exponential { lambda }, n)
    }

    pub fn erlang(&mut self, k: u32, lambda: f64, n: usize) -> Result<Vec<f64>, SimulationError> {
        self.continuous(Continuous::Erlang { k, lambda }, n)
    }

    pub fn gamma(&mut self, shape: f64, scale: f64, n: usize) -> Result<Vec<f64>, SimulationError> {
        self.continuous(Continuous::Gamma { shape, scale }, n)
    }

    pub fn normal(&mut self, mu: f64, sigma: f64, n: usize) -> Result<Vec<f64>, SimulationError> {
        self.continuous(Continuous::Normal { mu, sigma }, n)
    }

    /// Inverse-CDF draws, `lambda * (-ln(1 - U))^(1 / k)`
    pub fn weibull(&mut self, k: f64, lambda: f64, n: usize) -> Result<Vec<f64>, SimulationError> {
        self.continuous(Continuous::Weibull { k, lambda }, n)
    }

    /// 0/1 draws, 1 with probability `p`
    pub fn bernoulli(&mut self, p: f64, n: usize) -> Result<Vec<u8>, SimulationError> {
        trace!("Drawing {} bernoulli variates", n);
        Ok(Boolean::Bernoulli { p }
            .sample_n(&mut self.rng, n)?
            .into_iter()
            .map(u8::from)
            .collect())
    }

    /// Counts of successes in `trials` independent Bernoulli(`p`) trials
    pub fn binomial(&mut self, trials: u64, p: f64, n: usize) -> Result<Vec<u64>, SimulationError> {
        trace!("Drawing {} binomial variates", n);
        Discrete::Binomial { n: trials, p }.sample_n(&mut self.rng, n)
    }

    pub fn poisson(&mut self, lambda: f64, n: usize) -> Result<Vec<u64>, SimulationError> {
        trace!("Drawing {} poisson variates", n);
        Discrete::Poisson { lambda }.sample_n(&mut self.rng, n)
    }

    /// Draws from any random variable, as f64 (booleans become 0 and 1).
    pub fn sample(
        &mut self,
        variable: &RandomVariable,
        n: usize,
    ) -> Result<Vec<f64>, SimulationError> {
        variable.sample_n(&mut self.rng, n)
    }

    /// Draws from a distribution selected by name, with parameters given as
    /// `key=value` text - the distribution viewer's call boundary.
    pub fn sample_named(
        &mut self,
        name: &str,
        parameters: &str,
        n: usize,
    ) -> Result<Vec<f64>, SimulationError> {
        let variable = variate_factory::create(name, &Parameters::parse(parameters)?)?;
        self.sample(&variable, n)
    }

    pub fn rng(&mut self) -> &mut DynRng {
        &mut self.rng
    }

    fn continuous(&mut self, variable: Continuous, n: usize) -> Result<Vec<f64>, SimulationError> {
        trace!("Drawing {} variates from {:?}", n, variable);
        variable.sample_n(&mut self.rng, n)
    }
}
