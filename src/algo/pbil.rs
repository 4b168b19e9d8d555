//! Population-based incremental learning algorithm.
//!
//! PBIL maintains a vector of independent per-bit probabilities. Each
//! iteration samples a population from the product distribution, evaluates it
//! and moves the probability vector towards the mean of the selected
//! individuals. It is the first-moment-only baseline for the Boltzmann
//! machine variant in [`bm_pbil`](crate::algo::bm_pbil).
//!
//! # References
//!
//! \[1\] [Population-Based Incremental Learning: A Method for Integrating
//! Genetic Search Based Function Optimization and Competitive
//! Learning](https://dl.acm.org/doi/10.5555/865123)

use getset::{CopyGetters, Setters};
use log::debug;
use nalgebra::DVector;
use rand::Rng;

use crate::{
    bits::{self, BitVector},
    core::{Error, Function, Optimizer, Restartable},
    population::Population,
};

/// Options for [`Pbil`] optimizer.
#[derive(Debug, Clone, CopyGetters, Setters)]
#[getset(get_copy = "pub", set = "pub")]
pub struct PbilOptions {
    /// Number of individuals sampled per iteration. Default: `10`.
    population_size: usize,
    /// Number of selected individuals. Default: `1`.
    selection_size: usize,
    /// Learning rate of the probability vector. Default: `1e-3`.
    learning_rate: f64,
    /// Margin kept between the probabilities and the extremes 0 and 1.
    /// Default: `None`, which resolves to `1 / n` capped at `0.5`.
    margin: Option<f64>,
}

impl Default for PbilOptions {
    fn default() -> Self {
        Self {
            population_size: 10,
            selection_size: 1,
            learning_rate: 1e-3,
            margin: None,
        }
    }
}

/// PBIL optimizer. See [module](self) documentation for more details.
pub struct Pbil<R> {
    options: PbilOptions,
    margin: f64,
    population: Population,
    pv: DVector<f64>,
    mean: DVector<f64>,
    best: BitVector,
    value: f64,
    rng: R,
}

impl<R: Rng> Pbil<R> {
    /// Initializes PBIL optimizer with default options.
    pub fn new<F: Function>(f: &F, rng: R) -> Self {
        Self::init(f, rng, PbilOptions::default())
    }

    /// Initializes PBIL optimizer with given options.
    pub fn with_options<F: Function>(f: &F, rng: R, options: PbilOptions) -> Result<Self, Error> {
        if options.population_size == 0 {
            return Err(Error::invalid_options("population_size must be positive"));
        }

        if options.selection_size == 0 || options.selection_size > options.population_size {
            return Err(Error::invalid_options(format!(
                "selection_size must be in [1, {}]",
                options.population_size
            )));
        }

        if !(options.learning_rate > 0.0) {
            return Err(Error::invalid_options("learning_rate must be positive"));
        }

        if let Some(margin) = options.margin {
            if !(0.0..=0.5).contains(&margin) {
                return Err(Error::invalid_options("margin must be in [0, 0.5]"));
            }
        }

        Ok(Self::init(f, rng, options))
    }

    fn init<F: Function>(f: &F, mut rng: R, options: PbilOptions) -> Self {
        let n = f.dim();

        // The cap keeps the probability bounds ordered for n <= 2; at 0.5 the
        // probability vector is pinned to uniform.
        let margin = options.margin.unwrap_or((1.0 / n as f64).min(0.5));

        let best = bits::random(n, &mut rng);
        let value = f.evaluate(&best);

        let population = Population::new(options.population_size, n);

        Self {
            options,
            margin,
            population,
            pv: DVector::from_element(n, 0.5),
            mean: DVector::zeros(n),
            best,
            value,
            rng,
        }
    }

    fn next_inner<F: Function>(&mut self, f: &F, x: &mut BitVector) -> f64 {
        for i in 0..self.population.len() {
            let Self { population, pv, rng, .. } = self;
            for (b, &p) in population.get_mut(i).iter_mut().zip(pv.iter()) {
                *b = rng.gen::<f64>() < p;
            }
        }

        self.population.eval(f);
        self.population.sort();

        let best = self.population.best(0);
        if best.value() > self.value {
            self.best.copy_from_slice(best.x());
            self.value = best.value();
        }

        self.mean.fill(0.0);
        for i in 0..self.options.selection_size {
            for (m, &b) in self.mean.iter_mut().zip(self.population.best(i).x()) {
                if b {
                    *m += 1.0;
                }
            }
        }
        self.mean /= self.options.selection_size as f64;

        let rate = self.options.learning_rate;
        self.pv.zip_apply(&self.mean, |p, m| *p += rate * (m - *p));

        let (lower, upper) = (self.margin, 1.0 - self.margin);
        self.pv.apply(|p| *p = p.clamp(lower, upper));

        debug!(
            "best value = {}\tprobability vector mean = {}",
            self.value,
            self.pv.mean(),
        );

        x.copy_from_slice(&self.best);
        self.value
    }
}

impl<F: Function, R: Rng> Optimizer<F> for Pbil<R> {
    const NAME: &'static str = "PBIL";
    type Error = std::convert::Infallible;

    fn next(&mut self, f: &F, x: &mut BitVector) -> Result<f64, Self::Error> {
        Ok(self.next_inner(f, x))
    }
}

impl<F: Function, R: Rng> Restartable<F> for Pbil<R> {
    fn restart(&mut self, f: &F) -> Result<(), Self::Error> {
        bits::randomize(&mut self.best, &mut self.rng);
        self.value = f.evaluate(&self.best);
        self.pv.fill(0.5);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::testing::{LeadingOnes, OneMax, TestFunction};

    #[test]
    fn one_max() {
        let f = OneMax::new(10);

        let mut options = PbilOptions::default();
        options
            .set_population_size(40)
            .set_selection_size(10)
            .set_learning_rate(0.1);

        let rng = StdRng::seed_from_u64(40);
        let mut algo = Pbil::with_options(&f, rng, options).unwrap();

        let mut x = vec![false; f.dim()];
        let mut values = Vec::new();
        for _ in 0..300 {
            values.push(algo.next(&f, &mut x).unwrap());
        }

        assert!(
            values.windows(2).all(|pair| pair[1] >= pair[0]),
            "value decrease"
        );
        assert!(f.is_optimum(*values.last().unwrap()), "no solution found");
    }

    #[test]
    fn leading_ones() {
        let f = LeadingOnes::new(8);

        let mut options = PbilOptions::default();
        options
            .set_population_size(40)
            .set_selection_size(5)
            .set_learning_rate(0.1);

        let rng = StdRng::seed_from_u64(41);
        let mut algo = Pbil::with_options(&f, rng, options).unwrap();

        let mut x = vec![false; f.dim()];
        let mut value = f64::NEG_INFINITY;
        for _ in 0..300 {
            value = algo.next(&f, &mut x).unwrap();
        }

        assert!(f.is_optimum(value), "no solution found");
    }

    #[test]
    fn small_dimensions_use_a_capped_default_margin() {
        // 1 / n reaches 0.5 and beyond for n <= 2; the probability vector is
        // then pinned to uniform and the search degrades to random sampling.
        for n in [1, 2] {
            let f = OneMax::new(n);

            let mut algo = Pbil::new(&f, StdRng::seed_from_u64(43 + n as u64));

            let mut x = vec![false; n];
            let mut value = f64::NEG_INFINITY;
            for _ in 0..50 {
                value = algo.next(&f, &mut x).unwrap();
            }

            assert!(f.is_optimum(value), "no solution found for n = {n}");
            assert!(algo.pv.iter().all(|&p| p == 0.5));
        }
    }

    #[test]
    fn invalid_margin_is_rejected() {
        let f = OneMax::new(6);

        let mut options = PbilOptions::default();
        options.set_margin(Some(0.6));
        assert!(Pbil::with_options(&f, StdRng::seed_from_u64(0), options).is_err());
    }

    #[test]
    fn probabilities_stay_bounded() {
        let f = OneMax::new(6);

        let mut options = PbilOptions::default();
        options.set_learning_rate(0.5).set_margin(Some(0.1));

        let rng = StdRng::seed_from_u64(42);
        let mut algo = Pbil::with_options(&f, rng, options).unwrap();

        let mut x = vec![false; f.dim()];
        for _ in 0..100 {
            algo.next(&f, &mut x).unwrap();
        }

        assert!(algo.pv.iter().all(|&p| (0.1..=0.9).contains(&p)));
    }
}
