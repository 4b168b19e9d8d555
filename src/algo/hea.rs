//! Herding evolutionary algorithm.
//!
//! HEA is an estimation of distribution algorithm that replaces random
//! sampling with herding. It maintains a target Walsh moment learned from
//! selected individuals and lets a deterministic herding generator emit
//! populations whose empirical moments track the target. Selection then pulls
//! the target towards the moment of good individuals, closing the loop.
//!
//! # References
//!
//! \[1\] [Herding Evolutionary
//! Algorithm](https://dl.acm.org/doi/10.1145/2739482.2764678)

use getset::{CopyGetters, Setters};
use log::debug;
use rand::Rng;

use crate::{
    bits::{self, BitVector},
    core::{Error, Function, Optimizer, Restartable},
    herding::Herding,
    moment::WalshMoment,
    population::Population,
};

/// Options for [`Hea`] optimizer.
#[derive(Debug, Clone, CopyGetters, Setters)]
#[getset(get_copy = "pub", set = "pub")]
pub struct HeaOptions {
    /// Number of individuals sampled per iteration. Default: `10`.
    population_size: usize,
    /// Margin kept between moment entries and the extremes -1 and 1 when
    /// bounding is enabled. Only validated when
    /// [`bound_moment`](HeaOptions::bound_moment) is set. Default: `None`,
    /// which resolves to `1 / n`.
    margin: Option<f64>,
    /// Number of selected individuals. Default: `1`.
    selection_size: usize,
    /// Herding is restarted every this many iterations. Default: `0` (never).
    reset_period: usize,
    /// Learning rate of the target moment. Default: `1e-4`.
    learning_rate: f64,
    /// Clip the target moment away from the extremes after every update.
    /// Default: `false`.
    bound_moment: bool,
    /// Shuffle the order in which herding decides bits before every sample.
    /// Default: `false`.
    randomize_bit_order: bool,
}

impl Default for HeaOptions {
    fn default() -> Self {
        Self {
            population_size: 10,
            margin: None,
            selection_size: 1,
            reset_period: 0,
            learning_rate: 1e-4,
            bound_moment: false,
            randomize_bit_order: false,
        }
    }
}

impl HeaOptions {
    fn resolve_margin(&self, n: usize) -> f64 {
        self.margin.unwrap_or(1.0 / n as f64)
    }
}

/// Herding evolutionary algorithm optimizer. See [module](self) documentation
/// for more details.
pub struct Hea<M, R> {
    options: HeaOptions,
    margin: f64,
    population: Population,
    target: M,
    selection: M,
    herding: Herding<M>,
    herding_error: f64,
    target_norm: f64,
    delta_norm: f64,
    iteration: usize,
    best: BitVector,
    value: f64,
    rng: R,
}

impl<M: WalshMoment, R: Rng> Hea<M, R> {
    /// Initializes HEA optimizer with default options.
    pub fn new<F: Function>(f: &F, rng: R) -> Self {
        Self::init(f, rng, HeaOptions::default())
    }

    /// Initializes HEA optimizer with given options.
    pub fn with_options<F: Function>(f: &F, rng: R, options: HeaOptions) -> Result<Self, Error> {
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

        // The margin is only ever passed to bound(), so an out-of-range value
        // is harmless unless bounding is enabled.
        if options.bound_moment && !(0.0..1.0).contains(&options.resolve_margin(f.dim())) {
            return Err(Error::invalid_options("margin must be in [0, 1)"));
        }

        Ok(Self::init(f, rng, options))
    }

    fn init<F: Function>(f: &F, mut rng: R, options: HeaOptions) -> Self {
        let n = f.dim();
        let margin = options.resolve_margin(n);

        let best = bits::random(n, &mut rng);
        let value = f.evaluate(&best);

        let mut herding = Herding::new(n);
        herding.set_randomize_bit_order(options.randomize_bit_order);
        herding.init();

        let population = Population::new(options.population_size, n);

        Self {
            options,
            margin,
            population,
            target: M::zeros(n),
            selection: M::zeros(n),
            herding,
            herding_error: 0.0,
            target_norm: 0.0,
            delta_norm: 0.0,
            iteration: 0,
            best,
            value,
            rng,
        }
    }

    /// Like [`next`](Optimizer::next), but evaluates the population using a
    /// pool of independent function instances, one per worker thread (see
    /// [`Population::eval_parallel`]).
    ///
    /// All instances must compute the same function the optimizer was
    /// initialized with.
    ///
    /// # Panics
    ///
    /// Panics if `functions` is empty.
    pub fn next_parallel<F: Function + Send>(
        &mut self,
        functions: &mut [F],
        x: &mut BitVector,
    ) -> f64 {
        self.iterate(|population| population.eval_parallel(functions), x)
    }

    fn iterate(&mut self, evaluate: impl FnOnce(&mut Population), x: &mut BitVector) -> f64 {
        if self.options.reset_period > 0 && self.iteration % self.options.reset_period == 0 {
            self.herding.init();
        }
        self.iteration += 1;

        for i in 0..self.population.len() {
            let Self {
                population,
                herding,
                target,
                rng,
                ..
            } = self;
            herding.sample(target, population.get_mut(i), rng);
        }

        // Diagnostics are taken against the target the population was
        // sampled from, before selection moves it.
        self.herding_error = self.herding.error(&self.target);
        self.target_norm = self.target.norm_2();
        self.delta_norm = self.herding.delta().norm_2();

        evaluate(&mut self.population);
        self.population.sort();

        let best = self.population.best(0);
        if best.value() > self.value {
            self.best.copy_from_slice(best.x());
            self.value = best.value();
        }

        self.selection.init();
        for i in 0..self.options.selection_size {
            self.selection.add(self.population.best(i).x());
        }
        if self.options.selection_size > 1 {
            self.selection.average(self.options.selection_size);
        }

        self.target.update(&self.selection, self.options.learning_rate);
        if self.options.bound_moment {
            self.target.bound(self.margin);
        }

        debug!(
            "herding error = {}\ttarget 2-norm = {}\tdelta 2-norm = {}",
            self.herding_error, self.target_norm, self.delta_norm,
        );

        x.copy_from_slice(&self.best);
        self.value
    }
}

impl<M: WalshMoment, F: Function, R: Rng> Optimizer<F> for Hea<M, R> {
    const NAME: &'static str = "HEA";
    type Error = std::convert::Infallible;

    fn next(&mut self, f: &F, x: &mut BitVector) -> Result<f64, Self::Error> {
        Ok(self.iterate(|population| population.eval(f), x))
    }
}

impl<M: WalshMoment, F: Function, R: Rng> Restartable<F> for Hea<M, R> {
    fn restart(&mut self, f: &F) -> Result<(), Self::Error> {
        bits::randomize(&mut self.best, &mut self.rng);
        self.value = f.evaluate(&self.best);
        self.target.init();
        self.herding.init();
        self.iteration = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::moment::{SymmetricMoment, TriangularMoment};
    use crate::testing::{AdjacentPairs, OneMax, TestFunction};

    fn run<F: Function, M: WalshMoment>(
        f: &F,
        options: HeaOptions,
        iterations: usize,
        seed: u64,
    ) -> Vec<f64> {
        let rng = StdRng::seed_from_u64(seed);
        let mut algo: Hea<M, _> = Hea::with_options(f, rng, options).unwrap();

        let mut x = vec![false; f.dim()];
        let mut values = Vec::new();
        for _ in 0..iterations {
            values.push(algo.next(f, &mut x).unwrap());
        }
        values
    }

    #[test]
    fn one_max() {
        let f = OneMax::new(8);

        let mut options = HeaOptions::default();
        options
            .set_population_size(40)
            .set_selection_size(10)
            .set_learning_rate(0.05);

        let values = run::<_, TriangularMoment>(&f, options, 300, 30);

        assert!(
            values.windows(2).all(|pair| pair[1] >= pair[0]),
            "value decrease"
        );
        assert!(f.is_optimum(*values.last().unwrap()), "no solution found");
    }

    #[test]
    fn adjacent_pairs() {
        let f = AdjacentPairs::new(8, 1.0);

        let mut options = HeaOptions::default();
        options
            .set_population_size(40)
            .set_selection_size(10)
            .set_learning_rate(0.05)
            .set_bound_moment(true)
            .set_randomize_bit_order(true);

        let values = run::<_, SymmetricMoment>(&f, options, 300, 31);

        assert!(
            values.windows(2).all(|pair| pair[1] >= pair[0]),
            "value decrease"
        );
        assert!(f.is_optimum(*values.last().unwrap()), "no solution found");
    }

    #[test]
    fn periodic_reset_is_monotone() {
        let f = OneMax::new(10);

        let mut options = HeaOptions::default();
        options.set_population_size(20).set_reset_period(5);

        let values = run::<_, TriangularMoment>(&f, options, 50, 32);

        assert!(
            values.windows(2).all(|pair| pair[1] >= pair[0]),
            "value decrease"
        );
    }

    #[test]
    fn one_max_with_function_pool() {
        let f = OneMax::new(8);

        let mut options = HeaOptions::default();
        options
            .set_population_size(40)
            .set_selection_size(10)
            .set_learning_rate(0.05);

        let rng = StdRng::seed_from_u64(33);
        let mut algo: Hea<TriangularMoment, _> = Hea::with_options(&f, rng, options).unwrap();

        let mut pool = vec![OneMax::new(8); 3];
        let mut x = vec![false; 8];
        let mut values = Vec::new();
        for _ in 0..300 {
            values.push(algo.next_parallel(&mut pool, &mut x));
        }

        assert!(
            values.windows(2).all(|pair| pair[1] >= pair[0]),
            "value decrease"
        );
        assert!(f.is_optimum(*values.last().unwrap()), "no solution found");
        assert_eq!(f.evaluate(&x), *values.last().unwrap());
    }

    #[test]
    fn dimension_one_runs_with_default_margin() {
        let f = OneMax::new(1);

        let mut algo = Hea::<TriangularMoment, _>::new(&f, StdRng::seed_from_u64(34));

        let mut x = vec![false; 1];
        let mut value = f64::NEG_INFINITY;
        for _ in 0..5 {
            value = algo.next(&f, &mut x).unwrap();
        }

        assert!(f.is_optimum(value), "no solution found");
    }

    #[test]
    fn margin_is_validated_only_when_bounding() {
        let f = OneMax::new(5);

        // Unused margin is not checked.
        let mut options = HeaOptions::default();
        options.set_margin(Some(1.0));
        assert!(
            Hea::<TriangularMoment, _>::with_options(&f, StdRng::seed_from_u64(0), options)
                .is_ok()
        );

        let mut options = HeaOptions::default();
        options.set_margin(Some(1.0)).set_bound_moment(true);
        assert!(
            Hea::<TriangularMoment, _>::with_options(&f, StdRng::seed_from_u64(0), options)
                .is_err()
        );

        // The default margin 1/n is out of range for n = 1.
        let f = OneMax::new(1);
        let mut options = HeaOptions::default();
        options.set_bound_moment(true);
        assert!(
            Hea::<TriangularMoment, _>::with_options(&f, StdRng::seed_from_u64(0), options)
                .is_err()
        );
    }

    #[test]
    fn diagnostics_are_taken_before_the_target_moves() {
        let n = 8;
        let population_size = 5;
        let f = OneMax::new(n);

        let mut options = HeaOptions::default();
        options.set_population_size(population_size);

        let rng = StdRng::seed_from_u64(35);
        let mut algo: Hea<TriangularMoment, _> = Hea::with_options(&f, rng, options).unwrap();

        // Replicate the first iteration's sampling pass against the initial
        // zero target. Herding is deterministic when the bit order is not
        // randomized, so the RNG here is inconsequential.
        let target = TriangularMoment::zeros(n);
        let mut herding = Herding::<TriangularMoment>::new(n);
        herding.init();

        let mut rng = StdRng::seed_from_u64(0);
        let mut x = vec![false; n];
        for _ in 0..population_size {
            herding.sample(&target, &mut x, &mut rng);
        }
        let expected_error = herding.error(&target);
        let expected_delta_norm = herding.delta().norm_2();

        let mut best = vec![false; n];
        algo.next(&f, &mut best).unwrap();

        assert_eq!(algo.herding_error, expected_error);
        assert_eq!(algo.target_norm, target.norm_2());
        assert_eq!(algo.delta_norm, expected_delta_norm);
    }
}
