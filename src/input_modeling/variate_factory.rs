use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use lazy_static::lazy_static;

use super::parameters::Parameters;
use super::random_variable::{Boolean, Continuous, Discrete, RandomVariable};
use crate::utils::errors::SimulationError;

/// Builds a random variable from viewer parameters, filling in defaults for
/// anything not supplied.
pub type VariateConstructor = fn(&Parameters) -> Result<RandomVariable, SimulationError>;

lazy_static! {
    static ref CONSTRUCTORS: Mutex<HashMap<&'static str, VariateConstructor>> = {
        let mut m = HashMap::new();
        m.insert("uniform", uniform as VariateConstructor);
        m.insert("exponential", exponential as VariateConstructor);
        m.insert("erlang", erlang as VariateConstructor);
        m.insert("gamma", gamma as VariateConstructor);
        m.insert("normal", normal as VariateConstructor);
        m.insert("weibull", weibull as VariateConstructor);
        m.insert("bernoulli", bernoulli as VariateConstructor);
        m.insert("binomial", binomial as VariateConstructor);
        m.insert("poisson", poisson as VariateConstructor);
        Mutex::new(m)
    };
}

fn uniform(parameters: &Parameters) -> Result<RandomVariable, SimulationError> {
    Ok(RandomVariable::Continuous(Continuous::Uniform {
        a: parameters.value_or(&["a"], 0.0),
        b: parameters.value_or(&["b"], 1.0),
    }))
}

fn exponential(parameters: &Parameters) -> Result<RandomVariable, SimulationError> {
    Ok(RandomVariable::Continuous(Continuous::Exponential {
        lambda: parameters.value_or(&["lam", "lambda"], 1.0),
    }))
}

fn erlang(parameters: &Parameters) -> Result<RandomVariable, SimulationError> {
    Ok(RandomVariable::Continuous(Continuous::Erlang {
        k: parameters.small_count_or(&["k"], 2)?,
        lambda: parameters.value_or(&["lam", "lambda"], 1.0),
    }))
}

fn gamma(parameters: &Parameters) -> Result<RandomVariable, SimulationError> {
    Ok(RandomVariable::Continuous(Continuous::Gamma {
        shape: parameters.value_or(&["shape"], 2.0),
        scale: parameters.value_or(&["scale"], 1.0),
    }))
}

fn normal(parameters: &Parameters) -> Result<RandomVariable, SimulationError> {
    Ok(RandomVariable::Continuous(Continuous::Normal {
        mu: parameters.value_or(&["mu"], 0.0),
        sigma: parameters.value_or(&["sigma"], 1.0),
    }))
}

fn weibull(parameters: &Parameters) -> Result<RandomVariable, SimulationError> {
    Ok(RandomVariable::Continuous(Continuous::Weibull {
        k: parameters.value_or(&["k"], 1.5),
        lambda: parameters.value_or(&["lam", "lambda"], 1.0),
    }))
}

fn bernoulli(parameters: &Parameters) -> Result<RandomVariable, SimulationError> {
    Ok(RandomVariable::Boolean(Boolean::Bernoulli {
        p: parameters.value_or(&["p"], 0.5),
    }))
}

fn binomial(parameters: &Parameters) -> Result<RandomVariable, SimulationError> {
    Ok(RandomVariable::Discrete(Discrete::Binomial {
        n: parameters.count_or(&["n"], 10)?,
        p: parameters.value_or(&["p"], 0.5),
    }))
}

fn poisson(parameters: &Parameters) -> Result<RandomVariable, SimulationError> {
    Ok(RandomVariable::Discrete(Discrete::Poisson {
        lambda: parameters.value_or(&["lam", "lambda"], 1.0),
    }))
}

/// Adds (or replaces) a distribution name, e.g. an alias for one of the
/// built-in constructors.  Names are matched case-insensitively, so they
/// are registered in lowercase.
pub fn register(name: &'static str, constructor: VariateConstructor) {
    CONSTRUCTORS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name, constructor);
}

/// The registered distribution names, sorted.
pub fn variants() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = CONSTRUCTORS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .keys()
        .copied()
        .collect();
    names.sort_unstable();
    names
}

/// Looks up the distribution by name and builds a validated random
/// variable from the supplied parameters.
pub fn create(name: &str, parameters: &Parameters) -> Result<RandomVariable, SimulationError> {
    let normalized = name.trim().to_ascii_lowercase();
    let constructor = CONSTRUCTORS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(normalized.as_str())
        .copied();
    match constructor {
        Some(constructor) => {
            let variable = constructor(parameters)?;
            variable.validate()?;
            Ok(variable)
        }
        None => Err(SimulationError::UnsupportedDistribution {
            name: name.to_string(),
            expected: variants().join(", "),
        }),
    }
}
