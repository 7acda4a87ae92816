//! Random variables underpin the stochastic engine behaviors and the
//! distribution viewer.  Common distributions, with their common
//! parameterizations, are wrapped in enums `Continuous`, `Boolean`, and
//! `Discrete`, and unified by `RandomVariable` for name-driven sampling.
//!
//! The exponential, Erlang, and Weibull variates use inverse-CDF sampling
//! directly, so each draw consumes exactly one uniform variate per
//! exponential stage.

use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
// Continuous distributions
use rand_distr::{Gamma, Normal, Uniform};
// Discrete distributions
use rand_distr::{Bernoulli, Binomial, Poisson};

use crate::utils::errors::SimulationError;
use crate::utils::{validate_positive, validate_probability};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Continuous {
    /// Range is inclusive of a, exclusive of b: [a, b)
    Uniform { a: f64, b: f64 },
    Exponential { lambda: f64 },
    /// Sum of `k` independent exponential stages
    Erlang { k: u32, lambda: f64 },
    Gamma { shape: f64, scale: f64 },
    Normal { mu: f64, sigma: f64 },
    Weibull { k: f64, lambda: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Boolean {
    Bernoulli { p: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Discrete {
    /// Number of successes in `n` independent Bernoulli(`p`) trials
    Binomial { n: u64, p: f64 },
    Poisson { lambda: f64 },
}

/// Any of the supported random variables.  The serialized form is the
/// variant of the wrapped enum, e.g. `{"normal": {"mu": 0.0, "sigma": 1.0}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RandomVariable {
    Continuous(Continuous),
    Boolean(Boolean),
    Discrete(Discrete),
}

/// A single trial succeeding with probability `p`, decided by one uniform
/// [0, 1) draw.  A `p` of 0 never succeeds and a `p` of 1 always does.
pub fn bernoulli_trial<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.gen::<f64>() < p
}

/// Inverse-CDF exponential draw: `-ln(1 - U) / lambda`
fn inverse_exponential<R: Rng + ?Sized>(rng: &mut R, lambda: f64) -> f64 {
    let u: f64 = rng.gen();
    -(1.0 - u).ln() / lambda
}

fn validate_range(a: f64, b: f64) -> Result<(), SimulationError> {
    if !a.is_finite() {
        return Err(SimulationError::InvalidParameter {
            name: "a",
            value: a,
            reason: "must be finite",
        });
    }
    if !(b.is_finite() && a < b && (b - a).is_finite()) {
        return Err(SimulationError::InvalidParameter {
            name: "b",
            value: b,
            reason: "must be finite and greater than a",
        });
    }
    Ok(())
}

impl Continuous {
    /// Checks the parameters against the domain of the distribution,
    /// without consuming any random numbers.
    pub fn validate(&self) -> Result<(), SimulationError> {
        match *self {
            Continuous::Uniform { a, b } => validate_range(a, b),
            Continuous::Exponential { lambda } => validate_positive("lambda", lambda).map(|_| ()),
            Continuous::Erlang { k, lambda } => {
                if k == 0 {
                    return Err(SimulationError::InvalidParameter {
                        name: "k",
                        value: 0.0,
                        reason: "must be an integer of at least 1",
                    });
                }
                validate_positive("lambda", lambda).map(|_| ())
            }
            Continuous::Gamma { shape, scale } => {
                validate_positive("shape", shape)?;
                validate_positive("scale", scale)?;
                Gamma::new(shape, scale)?;
                Ok(())
            }
            Continuous::Normal { mu, sigma } => {
                if !mu.is_finite() {
                    return Err(SimulationError::InvalidParameter {
                        name: "mu",
                        value: mu,
                        reason: "must be finite",
                    });
                }
                // A zero sigma is a constant at mu
                if !(sigma.is_finite() && sigma >= 0.0) {
                    return Err(SimulationError::InvalidParameter {
                        name: "sigma",
                        value: sigma,
                        reason: "must be finite and not negative",
                    });
                }
                Normal::new(mu, sigma)?;
                Ok(())
            }
            Continuous::Weibull { k, lambda } => {
                validate_positive("k", k)?;
                validate_positive("lambda", lambda).map(|_| ())
            }
        }
    }

    /// The generation of random variates drives stochastic behaviors.  This
    /// function requires the random number generator of the engine, and
    /// produces a f64 random variate.
    pub fn random_variate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, SimulationError> {
        self.validate()?;
        self.draw(rng)
    }

    /// Produces `n` variates in draw order, validating the parameters once.
    pub fn sample_n<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        n: usize,
    ) -> Result<Vec<f64>, SimulationError> {
        self.validate()?;
        match *self {
            Continuous::Gamma { shape, scale } => {
                let gamma = Gamma::new(shape, scale)?;
                Ok((0..n).map(|_| gamma.sample(rng)).collect())
            }
            Continuous::Normal { mu, sigma } => {
                let normal = Normal::new(mu, sigma)?;
                Ok((0..n).map(|_| normal.sample(rng)).collect())
            }
            Continuous::Uniform { a, b } => {
                let uniform = Uniform::new(a, b);
                Ok((0..n).map(|_| uniform.sample(rng)).collect())
            }
            _ => (0..n).map(|_| self.draw(rng)).collect(),
        }
    }

    // Assumes validated parameters
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, SimulationError> {
        match *self {
            Continuous::Uniform { a, b } => Ok(Uniform::new(a, b).sample(rng)),
            Continuous::Exponential { lambda } => Ok(inverse_exponential(rng, lambda)),
            Continuous::Erlang { k, lambda } => {
                Ok((0..k).map(|_| inverse_exponential(rng, lambda)).sum())
            }
            Continuous::Gamma { shape, scale } => Ok(Gamma::new(shape, scale)?.sample(rng)),
            Continuous::Normal { mu, sigma } => Ok(Normal::new(mu, sigma)?.sample(rng)),
            Continuous::Weibull { k, lambda } => {
                let u: f64 = rng.gen();
                let variate = lambda * (-(1.0 - u).ln()).powf(1.0 / k);
                if !variate.is_finite() {
                    return Err(SimulationError::InvalidParameter {
                        name: "k",
                        value: k,
                        reason: "is too small, draws overflow",
                    });
                }
                Ok(variate)
            }
        }
    }
}

impl Boolean {
    pub fn validate(&self) -> Result<(), SimulationError> {
        match *self {
            Boolean::Bernoulli { p } => validate_probability("p", p).map(|_| ()),
        }
    }

    /// The generation of random variates drives stochastic behaviors.  This
    /// function requires the random number generator of the engine, and
    /// produces a boolean random variate.
    pub fn random_variate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<bool, SimulationError> {
        self.validate()?;
        match *self {
            Boolean::Bernoulli { p } => Ok(Bernoulli::new(p)?.sample(rng)),
        }
    }

    pub fn sample_n<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        n: usize,
    ) -> Result<Vec<bool>, SimulationError> {
        self.validate()?;
        match *self {
            Boolean::Bernoulli { p } => {
                let bernoulli = Bernoulli::new(p)?;
                Ok((0..n).map(|_| bernoulli.sample(rng)).collect())
            }
        }
    }
}

impl Discrete {
    pub fn validate(&self) -> Result<(), SimulationError> {
        match *self {
            Discrete::Binomial { n, p } => {
                Binomial::new(n, p)?;
                Ok(())
            }
            Discrete::Poisson { lambda } => {
                validate_positive("lambda", lambda)?;
                Poisson::<f64>::new(lambda)?;
                Ok(())
            }
        }
    }

    /// The generation of random variates drives stochastic behaviors.  This
    /// function requires the random number generator of the engine, and
    /// produces a u64 random variate.
    pub fn random_variate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<u64, SimulationError> {
        self.validate()?;
        match *self {
            Discrete::Binomial { n, p } => Ok(Binomial::new(n, p)?.sample(rng)),
            Discrete::Poisson { lambda } => Ok(Poisson::<f64>::new(lambda)?.sample(rng) as u64),
        }
    }

    pub fn sample_n<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        n: usize,
    ) -> Result<Vec<u64>, SimulationError> {
        self.validate()?;
        match *self {
            Discrete::Binomial { n: trials, p } => {
                let binomial = Binomial::new(trials, p)?;
                Ok((0..n).map(|_| binomial.sample(rng)).collect())
            }
            Discrete::Poisson { lambda } => {
                let poisson = Poisson::<f64>::new(lambda)?;
                Ok((0..n).map(|_| poisson.sample(rng) as u64).collect())
            }
        }
    }
}

impl RandomVariable {
    pub fn validate(&self) -> Result<(), SimulationError> {
        match self {
            RandomVariable::Continuous(variable) => variable.validate(),
            RandomVariable::Boolean(variable) => variable.validate(),
            RandomVariable::Discrete(variable) => variable.validate(),
        }
    }

    /// Discrete and boolean variates take integer values, and are binned
    /// one bin per value by the histogram viewer.
    pub fn is_discrete(&self) -> bool {
        !matches!(self, RandomVariable::Continuous(_))
    }

    /// Produces `n` variates as f64, with booleans mapped to 0 and 1.
    pub fn sample_n<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        n: usize,
    ) -> Result<Vec<f64>, SimulationError> {
        match self {
            RandomVariable::Continuous(variable) => variable.sample_n(rng, n),
            RandomVariable::Boolean(variable) => Ok(variable
                .sample_n(rng, n)?
                .into_iter()
                .map(|success| if success { 1.0 } else { 0.0 })
                .collect()),
            RandomVariable::Discrete(variable) => Ok(variable
                .sample_n(rng, n)?
                .into_iter()
                .map(|count| count as f64)
                .collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input_modeling::dynamic_rng::default_rng;

    enum ChiSquareTest {
        Continuous {
            variable: Continuous,
            bin_mapping_fn: fn(f64) -> usize,
        },
        Boolean {
            variable: Boolean,
            bin_mapping_fn: fn(bool) -> usize,
        },
    }

    fn empirical_mean(variable: &RandomVariable, sample_size: usize) -> f64 {
        let mut rng = default_rng();
        variable
            .sample_n(&mut rng, sample_size)
            .unwrap()
            .iter()
            .sum::<f64>()
            / (sample_size as f64)
    }

    fn chi_square(test: &ChiSquareTest, expected_counts: &[usize]) -> f64 {
        let mut class_counts = vec![0; expected_counts.len()];
        let mut rng = default_rng();
        let sample_size = expected_counts.iter().sum();
        (0..sample_size).for_each(|_| {
            let index = match test {
                ChiSquareTest::Continuous {
                    variable,
                    bin_mapping_fn,
                } => bin_mapping_fn(variable.random_variate(&mut rng).unwrap()),
                ChiSquareTest::Boolean {
                    variable,
                    bin_mapping_fn,
                } => bin_mapping_fn(variable.random_variate(&mut rng).unwrap()),
            };
            class_counts[index] += 1
        });
        class_counts.iter().zip(expected_counts.iter()).fold(
            0.0,
            |acc, (class_count, expected_count)| {
                let f_class_count = *class_count as f64;
                let f_expected_count = *expected_count as f64;
                acc + (f_class_count - f_expected_count).powi(2) / f_expected_count
            },
        )
    }

    #[test]
    fn exponential_samples_match_expectation() {
        let variable = RandomVariable::Continuous(Continuous::Exponential { lambda: 7.0 });
        let mean = empirical_mean(&variable, 100000);
        let expected = 1.0 / 7.0;
        assert!((mean - expected).abs() / expected < 0.025);
    }

    #[test]
    fn erlang_samples_match_expectation() {
        let variable = RandomVariable::Continuous(Continuous::Erlang { k: 3, lambda: 2.0 });
        let mean = empirical_mean(&variable, 100000);
        let expected = 1.5;
        assert!((mean - expected).abs() / expected < 0.025);
    }

    #[test]
    fn gamma_samples_match_expectation() {
        let variable = RandomVariable::Continuous(Continuous::Gamma {
            shape: 7.0,
            scale: 11.0,
        });
        let mean = empirical_mean(&variable, 100000);
        let expected = 77.0;
        assert!((mean - expected).abs() / expected < 0.025);
    }

    #[test]
    fn weibull_samples_match_expectation() {
        // Mean of Weibull(k = 2, lambda = 1) is Gamma(1.5) = sqrt(pi) / 2
        let variable = RandomVariable::Continuous(Continuous::Weibull { k: 2.0, lambda: 1.0 });
        let mean = empirical_mean(&variable, 100000);
        let expected = std::f64::consts::PI.sqrt() / 2.0;
        assert!((mean - expected).abs() / expected < 0.025);
    }

    #[test]
    fn poisson_samples_match_expectation() {
        let variable = RandomVariable::Discrete(Discrete::Poisson { lambda: 7.0 });
        let mean = empirical_mean(&variable, 100000);
        let expected = 7.0;
        assert!((mean - expected).abs() / expected < 0.025);
    }

    #[test]
    fn binomial_samples_match_expectation() {
        let variable = RandomVariable::Discrete(Discrete::Binomial { n: 20, p: 0.3 });
        let mean = empirical_mean(&variable, 100000);
        let expected = 6.0;
        assert!((mean - expected).abs() / expected < 0.025);
    }

    #[test]
    fn normal_samples_chi_square() {
        fn bins_mapping(variate: f64) -> usize {
            let mean = 11.0;
            let std_dev = 3.0;
            if variate < mean - 3.0 * std_dev {
                0
            } else if variate < mean - 2.0 * std_dev {
                1
            } else if variate < mean - std_dev {
                2
            } else if variate < mean {
                3
            } else if variate < mean + std_dev {
                4
            } else if variate < mean + 2.0 * std_dev {
                5
            } else if variate < mean + 3.0 * std_dev {
                6
            } else {
                7
            }
        }
        let variable = Continuous::Normal {
            mu: 11.0,
            sigma: 3.0,
        };
        // 8 classes (a.k.a. bins)
        // On each side: within 1 sigma, 1 sigma to 2 sigma, 2 sigma to 3 sigma, 3+ sigma
        let expected_counts: [usize; 8] = [135, 2140, 13591, 34134, 34134, 13591, 2140, 135];
        let chi_square_actual = chi_square(
            &ChiSquareTest::Continuous {
                variable,
                bin_mapping_fn: bins_mapping,
            },
            &expected_counts,
        );
        // At a significance level of 0.001, and with n-1=7 degrees of freedom, the chi square
        // critical value for this scenario is 24.322
        let chi_square_critical = 24.322;
        assert![chi_square_actual < chi_square_critical];
    }

    #[test]
    fn continuous_uniform_samples_chi_square() {
        fn bins_mapping(variate: f64) -> usize {
            ((variate - 7.0) * 10.0) as usize
        }
        let variable = Continuous::Uniform { a: 7.0, b: 11.0 };
        // Constant bin counts, due to uniformity of distribution
        let expected_counts: [usize; 40] = [250; 40];
        let chi_square_actual = chi_square(
            &ChiSquareTest::Continuous {
                variable,
                bin_mapping_fn: bins_mapping,
            },
            &expected_counts,
        );
        // At a significance level of 0.001, and with n-1=39 degrees of freedom, the chi square
        // critical value for this scenario is 72.055
        let chi_square_critical = 72.055;
        assert![chi_square_actual < chi_square_critical];
    }

    #[test]
    fn bernoulli_samples_chi_square() {
        fn bins_mapping(variate: bool) -> usize {
            variate as usize
        }
        let variable = Boolean::Bernoulli { p: 0.3 };
        // Failures (false == 0) is 70% of trials and success (true == 1) is 30% of trials
        let expected_counts: [usize; 2] = [7000, 3000];
        let chi_square_actual = chi_square(
            &ChiSquareTest::Boolean {
                variable,
                bin_mapping_fn: bins_mapping,
            },
            &expected_counts,
        );
        // At a significance level of 0.001, and with n-1=1 degrees of freedom, the chi square
        // critical value for this scenario is 10.828
        let chi_square_critical = 10.828;
        assert![chi_square_actual < chi_square_critical];
    }

    #[test]
    fn bernoulli_trial_respects_degenerate_probabilities() {
        let mut rng = default_rng();
        assert!((0..1000).all(|_| !bernoulli_trial(&mut rng, 0.0)));
        assert!((0..1000).all(|_| bernoulli_trial(&mut rng, 1.0)));
    }

    #[test]
    fn invalid_parameters_are_rejected_before_sampling() {
        let mut rng = default_rng();
        assert!(Continuous::Uniform { a: 1.0, b: 1.0 }.sample_n(&mut rng, 0).is_err());
        assert!(Continuous::Exponential { lambda: 0.0 }.sample_n(&mut rng, 5).is_err());
        assert!(Continuous::Erlang { k: 0, lambda: 1.0 }.sample_n(&mut rng, 5).is_err());
        assert!(Continuous::Gamma { shape: -1.0, scale: 1.0 }.sample_n(&mut rng, 5).is_err());
        assert!(Continuous::Normal { mu: 0.0, sigma: -1.0 }.sample_n(&mut rng, 5).is_err());
        assert!(Continuous::Weibull { k: 0.0, lambda: 1.0 }.sample_n(&mut rng, 5).is_err());
        assert!(Boolean::Bernoulli { p: 1.5 }.sample_n(&mut rng, 5).is_err());
        assert!(Discrete::Binomial { n: 10, p: -0.5 }.sample_n(&mut rng, 5).is_err());
        assert!(Discrete::Poisson { lambda: 0.0 }.sample_n(&mut rng, 5).is_err());
    }

    #[test]
    fn non_finite_parameters_are_rejected() {
        let mut rng = default_rng();
        let infinite = f64::INFINITY;
        assert!(Discrete::Poisson { lambda: infinite }.sample_n(&mut rng, 1).is_err());
        assert!(Discrete::Poisson { lambda: infinite }.random_variate(&mut rng).is_err());
        assert!(Discrete::Poisson { lambda: f64::NAN }.validate().is_err());
        assert!(Continuous::Gamma { shape: 2.0, scale: infinite }.sample_n(&mut rng, 3).is_err());
        assert!(Continuous::Gamma { shape: infinite, scale: 1.0 }.validate().is_err());
        assert!(Continuous::Normal { mu: infinite, sigma: 1.0 }.sample_n(&mut rng, 3).is_err());
        assert!(Continuous::Normal { mu: 0.0, sigma: infinite }.sample_n(&mut rng, 3).is_err());
        assert!(Continuous::Normal { mu: 0.0, sigma: f64::NAN }.validate().is_err());
    }

    #[test]
    fn normal_with_zero_sigma_is_constant() {
        let mut rng = default_rng();
        let draws = Continuous::Normal { mu: 1.0, sigma: 0.0 }.sample_n(&mut rng, 3).unwrap();
        assert_eq!(draws, vec![1.0; 3]);
    }

    #[test]
    fn overflowing_weibull_draws_are_rejected() {
        let mut rng = default_rng();
        let weibull = Continuous::Weibull { k: 1.0e-6, lambda: 1.0 };
        assert!(weibull.validate().is_ok());
        assert!(weibull.sample_n(&mut rng, 100).is_err());
    }

    #[test]
    fn random_variables_deserialize_from_variant_names() {
        let variable: RandomVariable =
            serde_json::from_str(r#"{"normal": {"mu": 0.0, "sigma": 1.0}}"#).unwrap();
        assert_eq!(
            variable,
            RandomVariable::Continuous(Continuous::Normal { mu: 0.0, sigma: 1.0 })
        );
        let variable: RandomVariable = serde_yaml::from_str("binomial:\n  n: 10\n  p: 0.5\n").unwrap();
        assert_eq!(
            variable,
            RandomVariable::Discrete(Discrete::Binomial { n: 10, p: 0.5 })
        );
        assert!(variable.is_discrete());
    }
}
