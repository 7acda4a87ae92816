//! The input modeling module provides the foundation for stochastic engine
//! behaviors.  The module includes a set of random variable distributions,
//! a `VariateGenerator` that produces sequences of draws for the
//! distribution viewer, parsing of `key=value` parameter text, a registry
//! mapping distribution names to random variables, and a structure around
//! random number generation.

pub mod dynamic_rng;
pub mod parameters;
pub mod random_variable;
pub mod variate_factory;
pub mod variate_generator;

pub use dynamic_rng::{default_rng, dyn_rng, entropy_rng, seeded_rng, DynRng};
pub use parameters::Parameters;
pub use random_variable::Boolean as BooleanRandomVariable;
pub use random_variable::Continuous as ContinuousRandomVariable;
pub use random_variable::Discrete as DiscreteRandomVariable;
pub use random_variable::{bernoulli_trial, RandomVariable};
pub use variate_generator::VariateGenerator;
