//! Boltzmann machine PBIL optimization algorithm.
//!
//! BM-PBIL is an estimation of distribution algorithm whose probabilistic
//! model is a Boltzmann machine parameterized by a Walsh moment (external
//! fields and pairwise couplings over spins). Each iteration samples a
//! population from the model by Gibbs sampling, evaluates it and moves the
//! model parameters towards the moment of the selected individuals and away
//! from a baseline moment (the whole population, or the worst individuals).
//! Unlike plain PBIL, the pairwise couplings let the model capture
//! correlations between variables.
//!
//! # References
//!
//! \[1\] [Boltzmann Machine for Population-Based Incremental
//! Learning](https://dl.acm.org/doi/10.5555/3000905.3000945)

use getset::{CopyGetters, Setters};
use log::debug;
use rand::Rng;

use crate::{
    bits::{self, BitVector},
    core::{Error, Function, Optimizer, Restartable},
    moment::WalshMoment,
    population::Population,
    sampler::GibbsSampler,
};

/// How bit vectors are drawn from the Gibbs sampler Markov chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sampling {
    /// A randomly selected site is resampled, repeated
    /// [`num_gibbs_steps`](BmPbilOptions::num_gibbs_steps) times per bit
    /// vector.
    Asynchronous,
    /// All sites are resampled one by one in a fresh random order, repeated
    /// [`num_gibbs_cycles`](BmPbilOptions::num_gibbs_cycles) times per bit
    /// vector.
    AsynchronousFullScan,
    /// All sites are resampled at once from the conditional probabilities of
    /// the current state, repeated
    /// [`num_gibbs_cycles`](BmPbilOptions::num_gibbs_cycles) times per bit
    /// vector.
    Synchronous,
}

/// When the Gibbs sampler Markov chain is reset to a random state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum McReset {
    /// Never. The chain persists across iterations.
    Never,
    /// At the beginning of each iteration.
    Iteration,
    /// Before sampling each bit vector.
    BitVector,
}

/// Options for [`BmPbil`] optimizer.
#[derive(Debug, Clone, CopyGetters, Setters)]
#[getset(get_copy = "pub", set = "pub")]
pub struct BmPbilOptions {
    /// Number of individuals sampled per iteration. Default: `10`.
    population_size: usize,
    /// Number of selected individuals. Default: `1`.
    selection_size: usize,
    /// Learning rate of the model parameters. Default: `1e-3`.
    learning_rate: f64,
    /// Number of single-site Gibbs updates per sampled bit vector in
    /// asynchronous sampling. Default: `100`.
    num_gibbs_steps: usize,
    /// Number of full passes per sampled bit vector in full-scan and
    /// synchronous sampling. Default: `1`.
    num_gibbs_cycles: usize,
    /// Move the model away from the moment of the worst individuals instead
    /// of the moment of the whole population. Default: `false`.
    negative_positive_selection: bool,
    /// Sampling mode. Default: asynchronous (see [`Sampling`]).
    sampling: Sampling,
    /// Markov chain reset strategy. Default: never (see [`McReset`]).
    mc_reset: McReset,
}

impl Default for BmPbilOptions {
    fn default() -> Self {
        Self {
            population_size: 10,
            selection_size: 1,
            learning_rate: 1e-3,
            num_gibbs_steps: 100,
            num_gibbs_cycles: 1,
            negative_positive_selection: false,
            sampling: Sampling::Asynchronous,
            mc_reset: McReset::Never,
        }
    }
}

/// Boltzmann machine PBIL optimizer. See [module](self) documentation for
/// more details.
///
/// The moment representation `M` is a tradeoff: triangular storage halves the
/// memory, the symmetric matrix makes row access contiguous.
pub struct BmPbil<M, R> {
    options: BmPbilOptions,
    population: Population,
    model: M,
    sampler: GibbsSampler,
    moment_best: M,
    moment_other: M,
    permutation: Vec<usize>,
    best: BitVector,
    value: f64,
    rng: R,
}

impl<M: WalshMoment, R: Rng> BmPbil<M, R> {
    /// Initializes BM-PBIL optimizer with default options.
    pub fn new<F: Function>(f: &F, rng: R) -> Self {
        Self::init(f, rng, BmPbilOptions::default())
    }

    /// Initializes BM-PBIL optimizer with given options.
    pub fn with_options<F: Function>(
        f: &F,
        rng: R,
        options: BmPbilOptions,
    ) -> Result<Self, Error> {
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

        Ok(Self::init(f, rng, options))
    }

    fn init<F: Function>(f: &F, mut rng: R, options: BmPbilOptions) -> Self {
        let n = f.dim();

        let best = bits::random(n, &mut rng);
        let value = f.evaluate(&best);

        let mut sampler = GibbsSampler::new(n);
        sampler.init(&mut rng);

        let population = Population::new(options.population_size, n);

        Self {
            options,
            population,
            model: M::zeros(n),
            sampler,
            moment_best: M::zeros(n),
            moment_other: M::zeros(n),
            permutation: (0..n).collect(),
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

    fn sample(&mut self) {
        let n = self.permutation.len();

        match self.options.sampling {
            Sampling::Asynchronous => {
                for _ in 0..self.options.num_gibbs_steps {
                    let i = self.rng.gen_range(0..n);
                    self.sampler.update(&self.model, i, &mut self.rng);
                }
            }
            Sampling::AsynchronousFullScan => {
                for _ in 0..self.options.num_gibbs_cycles {
                    bits::rand_perm(&mut self.permutation, &mut self.rng);
                    for k in 0..n {
                        self.sampler
                            .update(&self.model, self.permutation[k], &mut self.rng);
                    }
                }
            }
            Sampling::Synchronous => {
                for _ in 0..self.options.num_gibbs_cycles {
                    self.sampler.update_sync(&self.model, &mut self.rng);
                }
            }
        }
    }

    fn iterate(&mut self, evaluate: impl FnOnce(&mut Population), x: &mut BitVector) -> f64 {
        if self.options.mc_reset == McReset::Iteration {
            self.sampler.init(&mut self.rng);
        }

        for i in 0..self.population.len() {
            if self.options.mc_reset == McReset::BitVector {
                self.sampler.init(&mut self.rng);
            }
            self.sample();
            self.population
                .get_mut(i)
                .copy_from_slice(self.sampler.state());
        }

        evaluate(&mut self.population);
        self.population.sort();

        let best = self.population.best(0);
        if best.value() > self.value {
            self.best.copy_from_slice(best.x());
            self.value = best.value();
        }

        self.moment_best.init();
        for i in 0..self.options.selection_size {
            self.moment_best.add(self.population.best(i).x());
        }
        self.moment_best.average(self.options.selection_size);

        if self.options.negative_positive_selection {
            self.moment_other.init();
            for i in 0..self.options.selection_size {
                self.moment_other.add(self.population.worst(i).x());
            }
            self.moment_other.average(self.options.selection_size);
        } else {
            self.moment_other.init();
            for i in 0..self.population.len() {
                self.moment_other.add(self.population.get(i));
            }
            self.moment_other.average(self.population.len());
        }

        self.model.update_difference(
            &self.moment_best,
            &self.moment_other,
            self.options.learning_rate,
        );

        let report = self.population.report();

        debug!(
            "best value = {}\taverage value = {}\tmodel 1-norm = {}\tmodel infinite norm = {}",
            report.best(),
            report.avg(),
            self.model.norm_1(),
            self.model.norm_infinite(),
        );

        x.copy_from_slice(&self.best);
        self.value
    }
}

impl<M: WalshMoment, F: Function, R: Rng> Optimizer<F> for BmPbil<M, R> {
    const NAME: &'static str = "BM-PBIL";
    type Error = std::convert::Infallible;

    fn next(&mut self, f: &F, x: &mut BitVector) -> Result<f64, Self::Error> {
        Ok(self.iterate(|population| population.eval(f), x))
    }
}

impl<M: WalshMoment, F: Function, R: Rng> Restartable<F> for BmPbil<M, R> {
    fn restart(&mut self, f: &F) -> Result<(), Self::Error> {
        bits::randomize(&mut self.best, &mut self.rng);
        self.value = f.evaluate(&self.best);
        self.model.init();
        self.sampler.init(&mut self.rng);
        Ok(())
    }
}
