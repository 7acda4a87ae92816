use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::utils::errors::SimulationError;

/// Named numeric distribution parameters, as typed into the distribution
/// viewer: comma-separated `key=value` pairs, e.g. `mu=0, sigma=1`.
/// Later duplicates of a key replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameters(BTreeMap<String, f64>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the `key=value` pair list.  Blank input yields no parameters.
    /// A pair without `=`, an empty key, or a value that is not a number is
    /// rejected rather than skipped.
    pub fn parse(text: &str) -> Result<Self, SimulationError> {
        text.split(',')
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .try_fold(Self::new(), |mut parameters, pair| {
                let (key, value) = pair.split_once('=').ok_or_else(|| {
                    SimulationError::ParameterParse {
                        input: pair.to_string(),
                        reason: "expected a `key=value` pair",
                    }
                })?;
                let key = key.trim();
                if key.is_empty() {
                    return Err(SimulationError::ParameterParse {
                        input: pair.to_string(),
                        reason: "the parameter name is empty",
                    });
                }
                let value = value
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| SimulationError::ParameterParse {
                        input: pair.to_string(),
                        reason: "the value is not a number",
                    })?;
                parameters.insert(key, value);
                Ok(parameters)
            })
    }

    pub fn insert(&mut self, key: &str, value: f64) {
        self.0.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The value of the first key present, trying aliases in order (e.g.
    /// `lam` before `lambda`), or the default when none is present.
    pub fn value_or(&self, keys: &[&str], default: f64) -> f64 {
        keys.iter()
            .find_map(|key| self.get(key))
            .unwrap_or(default)
    }

    /// Like `value_or`, for parameters that must be non-negative integers
    /// (trial counts, Erlang stages).  Fractional values are rejected, not
    /// truncated.
    pub fn count_or(&self, keys: &[&'static str], default: u64) -> Result<u64, SimulationError> {
        let found = keys
            .iter()
            .find_map(|key| self.get(key).map(|value| (*key, value)));
        match found {
            None => Ok(default),
            Some((name, value)) => {
                if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
                    Ok(value as u64)
                } else {
                    Err(SimulationError::InvalidParameter {
                        name,
                        value,
                        reason: "must be a non-negative integer",
                    })
                }
            }
        }
    }

    /// `count_or`, narrowed to u32.
    pub fn small_count_or(&self, keys: &[&'static str], default: u32) -> Result<u32, SimulationError> {
        let count = self.count_or(keys, u64::from(default))?;
        u32::try_from(count).map_err(|_| SimulationError::InvalidParameter {
            name: keys.first().copied().unwrap_or("count"),
            value: count as f64,
            reason: "is too large",
        })
    }
}

impl FromStr for Parameters {
    type Err = SimulationError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}
