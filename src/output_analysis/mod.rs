//! The output analysis module provides standard statistical analysis tools
//! for analyzing simulation outputs and generated variates.  Independent,
//! identically-distributed (IID) samples are summarized with the
//! `IndependentSample`.  The `Histogram` bins draws for the distribution
//! viewer, with unit-width bins for discrete variates and equal-width bins
//! over the observed range for continuous ones.

use std::convert::TryFrom;
use num_traits::Float;
use serde::{Deserialize, Serialize};

use crate::input_modeling::random_variable::{Boolean, Discrete, RandomVariable};
use crate::utils::errors::SimulationError;

/// Upper limit on the bins of a discrete histogram.
pub const MAX_UNIT_BINS: usize = 1 << 20;

fn sum<T: Float>(points: &[T]) -> T {
    points.iter().fold(T::zero(), |sum, point| sum + *point)
}

/// This function calculates the sample mean from a set of points - a simple
/// arithmetic mean.
fn sample_mean<T: Float>(points: &[T]) -> Result<T, SimulationError> {
    if points.is_empty() {
        return Err(SimulationError::EmptySample);
    }
    Ok(sum(points) / usize_to_float(points.len())?)
}

/// This function calculates sample variance, given a set of points and the
/// sample mean.
fn sample_variance<T: Float>(points: &[T], mean: &T) -> Result<T, SimulationError> {
    if points.is_empty() {
        return Err(SimulationError::EmptySample);
    }
    Ok(points
        .iter()
        .fold(T::zero(), |acc, point| acc + (*point - *mean).powi(2))
        / usize_to_float(points.len())?)
}

/// This function converts a usize to a Float, with an associated
/// `SimulationError` returned for failed conversions
fn usize_to_float<T: Float>(unconv: usize) -> Result<T, SimulationError> {
    T::from(unconv).ok_or(SimulationError::FloatConvError)
}

/// The independent sample is for independent, identically-distributed (IID)
/// samples, or where treating the data as an IID sample is determined to be
/// reasonable - e.g. the output of a `VariateGenerator` call, or a final
/// epidemic count across replications with distinct seeds.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct IndependentSample<T> {
    points: Vec<T>,
    mean: T,
    variance: T,
}

impl<T: Float> IndependentSample<T> {
    /// This constructor method creates an `IndependentSample` from a vector
    /// of floating point values.  At least one point is required.
    pub fn post(points: Vec<T>) -> Result<IndependentSample<T>, SimulationError> {
        let mean = sample_mean(&points)?;
        let variance = sample_variance(&points, &mean)?;
        Ok(IndependentSample {
            points,
            mean,
            variance,
        })
    }

    /// Return the sample mean.
    pub fn point_estimate_mean(&self) -> T {
        self.mean
    }

    /// Return the sample variance.
    pub fn variance(&self) -> T {
        self.variance
    }

    pub fn standard_deviation(&self) -> T {
        self.variance.sqrt()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[T] {
        &self.points
    }
}

/// Bin counts over equal-width bins starting at `lower`.  Bin `i` covers
/// `[lower + i * width, lower + (i + 1) * width)`, except the last bin of an
/// equal-width histogram, which also includes its upper edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Histogram {
    lower: f64,
    bin_width: f64,
    counts: Vec<usize>,
    total: usize,
}

impl Histogram {
    /// Equal-width bins spanning the observed range of the points.  A
    /// sample with a single distinct value gets a range of width one.
    pub fn post(points: &[f64], bins: usize) -> Result<Self, SimulationError> {
        if points.is_empty() {
            return Err(SimulationError::EmptySample);
        }
        if bins == 0 {
            return Err(SimulationError::InvalidParameter {
                name: "bins",
                value: 0.0,
                reason: "at least one bin is required",
            });
        }
        if let Some(point) = points.iter().find(|point| !point.is_finite()) {
            return Err(SimulationError::InvalidParameter {
                name: "point",
                value: *point,
                reason: "histogram points must be finite",
            });
        }
        let lower = points.iter().copied().fold(f64::INFINITY, f64::min);
        let upper = points.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let span = if upper > lower { upper - lower } else { 1.0 };
        let bin_width = span / bins as f64;
        let mut counts = vec![0; bins];
        for point in points {
            let bin = ((point - lower) / bin_width).floor() as usize;
            counts[bin.min(bins - 1)] += 1;
        }
        Ok(Self {
            lower,
            bin_width,
            counts,
            total: points.len(),
        })
    }

    /// Unit-width bins centered on the integers `0..=upper`, for discrete
    /// variates.  Points outside of that range are not counted.  At most
    /// `MAX_UNIT_BINS` bins are allocated.
    pub fn unit_bins(points: &[f64], upper: u64) -> Result<Self, SimulationError> {
        if points.is_empty() {
            return Err(SimulationError::EmptySample);
        }
        let bins = upper
            .checked_add(1)
            .and_then(|bins| usize::try_from(bins).ok())
            .filter(|bins| *bins <= MAX_UNIT_BINS)
            .ok_or(SimulationError::InvalidParameter {
                name: "upper",
                value: upper as f64,
                reason: "needs too many unit bins",
            })?;
        let mut counts = vec![0; bins];
        for point in points {
            let bin = point.round();
            if bin >= 0.0 && bin < bins as f64 {
                counts[bin as usize] += 1;
            }
        }
        let total = counts.iter().sum();
        Ok(Self {
            lower: -0.5,
            bin_width: 1.0,
            counts,
            total,
        })
    }

    /// Bins suited to the variable the points were drawn from: two bins for
    /// Bernoulli draws, `0..=n` for binomial, `0..=max` for Poisson, and
    /// `bins` equal-width bins for continuous variates.
    pub fn for_variable(
        variable: &RandomVariable,
        points: &[f64],
        bins: usize,
    ) -> Result<Self, SimulationError> {
        match variable {
            RandomVariable::Boolean(Boolean::Bernoulli { .. }) => Self::unit_bins(points, 1),
            RandomVariable::Discrete(Discrete::Binomial { n, .. }) => Self::unit_bins(points, *n),
            RandomVariable::Discrete(Discrete::Poisson { .. }) => {
                let max = points.iter().copied().fold(0.0, f64::max);
                Self::unit_bins(points, max as u64)
            }
            RandomVariable::Continuous(_) => Self::post(points, bins),
        }
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Points counted into a bin.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    /// Bin boundaries, one more than the number of bins.
    pub fn bin_edges(&self) -> Vec<f64> {
        (0..=self.counts.len())
            .map(|edge| self.lower + edge as f64 * self.bin_width)
            .collect()
    }

    /// Count / (total * width) per bin, so the bar areas sum to one.
    pub fn densities(&self) -> Vec<f64> {
        let scale = self.total as f64 * self.bin_width;
        self.counts
            .iter()
            .map(|count| {
                if scale > 0.0 {
                    *count as f64 / scale
                } else {
                    0.0
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input_modeling::random_variable::Continuous;

    fn epsilon() -> f64 {
        1.0e-12
    }

    #[test]
    fn sample_mean_and_variance() {
        let sample = IndependentSample::post(vec![
            1.02, 0.73, 3.20, 0.23, 1.76, 0.47, 1.89, 1.45, 0.44, 0.23,
        ])
        .unwrap();
        assert!((sample.point_estimate_mean() - 1.142).abs() < epsilon());
        assert!((sample.variance() - 0.806_416).abs() < 1.0e-9);
        assert_eq!(sample.len(), 10);
    }

    #[test]
    fn single_point_sample_has_no_variance() {
        let sample = IndependentSample::post(vec![4.0f32]).unwrap();
        assert_eq!(sample.point_estimate_mean(), 4.0);
        assert_eq!(sample.variance(), 0.0);
    }

    #[test]
    fn empty_samples_are_rejected() {
        assert!(matches!(
            IndependentSample::<f64>::post(Vec::new()),
            Err(SimulationError::EmptySample)
        ));
        assert!(matches!(
            Histogram::post(&[], 10),
            Err(SimulationError::EmptySample)
        ));
    }

    #[test]
    fn equal_width_bins_cover_the_range() {
        let histogram = Histogram::post(&[0.0, 0.5, 1.0, 1.5, 2.0], 4).unwrap();
        assert_eq!(histogram.counts(), &[1, 1, 1, 2]);
        assert_eq!(histogram.bin_edges(), vec![0.0, 0.5, 1.0, 1.5, 2.0]);
        let area: f64 = histogram
            .densities()
            .iter()
            .map(|density| density * histogram.bin_width())
            .sum();
        assert!((area - 1.0).abs() < epsilon());
    }

    #[test]
    fn degenerate_range_fills_one_bin() {
        let histogram = Histogram::post(&[3.0, 3.0, 3.0], 5).unwrap();
        assert_eq!(histogram.counts()[0], 3);
        assert_eq!(histogram.total(), 3);
        assert!(Histogram::post(&[1.0, f64::NAN], 5).is_err());
        assert!(Histogram::post(&[1.0], 0).is_err());
    }

    #[test]
    fn unit_bins_count_integers() {
        let histogram = Histogram::unit_bins(&[0.0, 1.0, 1.0, 3.0, 7.0], 3).unwrap();
        assert_eq!(histogram.counts(), &[1, 2, 0, 1]);
        assert_eq!(histogram.total(), 4);
        assert_eq!(histogram.bin_edges()[0], -0.5);
        let area: f64 = histogram.densities().iter().sum();
        assert!((area - 1.0).abs() < epsilon());
    }

    #[test]
    fn oversized_unit_bins_are_rejected() {
        assert!(Histogram::unit_bins(&[0.0], u64::MAX).is_err());
        assert!(Histogram::unit_bins(&[0.0], 1 << 40).is_err());
        assert!(Histogram::unit_bins(&[0.0], MAX_UNIT_BINS as u64 - 1).is_ok());
        let binomial = RandomVariable::Discrete(Discrete::Binomial {
            n: 10_000_000_000_000_000_000,
            p: 1.0e-18,
        });
        assert!(Histogram::for_variable(&binomial, &[10.0, 12.0], 50).is_err());
    }

    #[test]
    fn bins_follow_the_variable() {
        let bernoulli = RandomVariable::Boolean(Boolean::Bernoulli { p: 0.5 });
        assert_eq!(
            Histogram::for_variable(&bernoulli, &[0.0, 1.0, 1.0], 50)
                .unwrap()
                .len(),
            2
        );
        let binomial = RandomVariable::Discrete(Discrete::Binomial { n: 10, p: 0.5 });
        assert_eq!(
            Histogram::for_variable(&binomial, &[4.0, 5.0], 50)
                .unwrap()
                .len(),
            11
        );
        let poisson = RandomVariable::Discrete(Discrete::Poisson { lambda: 1.0 });
        assert_eq!(
            Histogram::for_variable(&poisson, &[0.0, 2.0, 6.0], 50)
                .unwrap()
                .len(),
            7
        );
        let normal = RandomVariable::Continuous(Continuous::Normal { mu: 0.0, sigma: 1.0 });
        assert_eq!(
            Histogram::for_variable(&normal, &[-1.0, 0.0, 1.0], 50)
                .unwrap()
                .len(),
            50
        );
    }
}
