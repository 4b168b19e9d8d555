//! High-level API for optimization.
//!
//! This module contains a "driver" that encapsulates all internal state and
//! provides a simple API to run the iterative optimization process.
//!
//! The simplest way of using the driver is to initialize it with the
//! defaults, which runs BM-PBIL:
//!
//! ```rust
//! use hypercube::OptimizerDriver;
//! # use hypercube::testing::OneMax;
//! # fn make_problem() -> OneMax { OneMax::new(8) }
//!
//! let f = make_problem();
//!
//! let mut optimizer = OptimizerDriver::new(&f);
//! ```
//!
//! If you need a different algorithm or non-default options, use the builder:
//!
//! ```rust
//! use hypercube::{algo::Rls, OptimizerDriver};
//! use rand::thread_rng;
//! # use hypercube::testing::OneMax;
//! # fn make_problem() -> OneMax { OneMax::new(8) }
//!
//! let f = make_problem();
//!
//! let mut optimizer = OptimizerDriver::builder(&f)
//!     .with_algo(|f| Rls::new(f, thread_rng()))
//!     .build();
//! ```
//!
//! Once you have the driver, you can use it to look for the maximum:
//!
//! ```rust
//! # use hypercube::testing::OneMax;
//! # use hypercube::OptimizerDriver;
//! # fn make_problem() -> OneMax { OneMax::new(8) }
//! # let f = make_problem();
//! # let mut optimizer = OptimizerDriver::new(&f);
//! let (x, value) = optimizer
//!     .find(|state| state.fx() == 8.0 || state.iter() >= 100)
//!     .unwrap();
//! ```
//!
//! If you need more control over the iteration process, you can do the
//! iterations manually:
//!
//! ```rust
//! # use hypercube::testing::OneMax;
//! # use hypercube::OptimizerDriver;
//! # fn make_problem() -> OneMax { OneMax::new(8) }
//! # let f = make_problem();
//! # let mut optimizer = OptimizerDriver::new(&f);
//! loop {
//!     let (x, value) = optimizer.next().expect("no optimizer error");
//!     // ...
//! #   break;
//! }
//! ```

use rand::rngs::ThreadRng;

use crate::{
    algo::BmPbil, bits::BitVector, core::Function, core::Optimizer, moment::TriangularMoment,
};

struct Builder<'a, F: Function, A> {
    f: &'a F,
    algo: A,
}

impl<'a, F: Function> Builder<'a, F, BmPbil<TriangularMoment, ThreadRng>> {
    fn new(f: &'a F) -> Self {
        let algo = BmPbil::new(f, rand::thread_rng());
        Self { f, algo }
    }
}

impl<'a, F: Function, A> Builder<'a, F, A> {
    fn with_algo<A2, FA>(self, factory: FA) -> Builder<'a, F, A2>
    where
        FA: FnOnce(&F) -> A2,
    {
        let algo = factory(self.f);

        Builder { f: self.f, algo }
    }
}

/// Builder for the [`OptimizerDriver`].
pub struct OptimizerBuilder<'a, F: Function, A>(Builder<'a, F, A>);

impl<'a, F: Function, A> OptimizerBuilder<'a, F, A> {
    /// Sets specific algorithm to be used.
    ///
    /// This builder method accepts a closure that takes the reference to the
    /// function. Algorithms in hypercube take a random number generator too,
    /// so a short closure is usually needed (e.g., `|f| Rls::new(f,
    /// thread_rng())`).
    pub fn with_algo<A2, FA>(self, factory: FA) -> OptimizerBuilder<'a, F, A2>
    where
        FA: FnOnce(&F) -> A2,
    {
        OptimizerBuilder(self.0.with_algo(factory))
    }

    /// Builds the [`OptimizerDriver`].
    pub fn build(self) -> OptimizerDriver<'a, F, A> {
        let Builder { f, algo } = self.0;

        OptimizerDriver {
            f,
            algo,
            x: vec![false; f.dim()],
            fx: f64::NEG_INFINITY,
        }
    }
}

/// The driver for the optimization process.
///
/// For default settings, use [`OptimizerDriver::new`]. For more flexibility,
/// use [`OptimizerDriver::builder`]. For the usage of the driver, see
/// [module](self) documentation.
pub struct OptimizerDriver<'a, F: Function, A> {
    f: &'a F,
    algo: A,
    x: BitVector,
    fx: f64,
}

impl<'a, F: Function> OptimizerDriver<'a, F, BmPbil<TriangularMoment, ThreadRng>> {
    /// Returns the builder for specifying additional settings.
    pub fn builder(f: &'a F) -> OptimizerBuilder<'a, F, BmPbil<TriangularMoment, ThreadRng>> {
        OptimizerBuilder(Builder::new(f))
    }

    /// Initializes the driver with the default settings.
    pub fn new(f: &'a F) -> Self {
        OptimizerDriver::builder(f).build()
    }
}

impl<'a, F: Function, A> OptimizerDriver<'a, F, A> {
    /// Returns reference to the best point found so far.
    pub fn x(&self) -> &[bool] {
        &self.x
    }

    /// Returns the best function value found so far.
    pub fn fx(&self) -> f64 {
        self.fx
    }
}

impl<'a, F: Function, A: Optimizer<F>> OptimizerDriver<'a, F, A> {
    /// Does one iteration of the process, returning the best point and its
    /// function value in case of no error.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<(&[bool], f64), A::Error> {
        self.fx = self.algo.next(self.f, &mut self.x)?;
        Ok((&self.x, self.fx))
    }

    /// Runs the iterative process until given stopping criterion is satisfied.
    pub fn find<C>(&mut self, stop: C) -> Result<(&[bool], f64), A::Error>
    where
        C: Fn(OptimizerIterState<'_>) -> bool,
    {
        let mut iter = 0;

        loop {
            self.fx = self.algo.next(self.f, &mut self.x)?;

            let state = OptimizerIterState {
                x: &self.x,
                fx: self.fx,
                iter,
            };

            if stop(state) {
                return Ok((&self.x, self.fx));
            }

            iter += 1;
        }
    }

    /// Returns the name of the used optimizer.
    pub fn name(&self) -> &str {
        A::NAME
    }
}

/// State of the current iteration.
pub struct OptimizerIterState<'a> {
    x: &'a BitVector,
    fx: f64,
    iter: usize,
}

impl<'a> OptimizerIterState<'a> {
    /// Returns reference to the best point found so far.
    pub fn x(&self) -> &[bool] {
        self.x
    }

    /// Returns the best function value found so far.
    pub fn fx(&self) -> f64 {
        self.fx
    }

    /// Returns the current iteration number.
    pub fn iter(&self) -> usize {
        self.iter
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::algo::{hea::HeaOptions, Hea, Rls};
    use crate::moment::SymmetricMoment;
    use crate::testing::{OneMax, TestFunction};

    #[test]
    fn optimizer_basic_use_case() {
        let f = OneMax::new(8);
        let mut optimizer = OptimizerDriver::new(&f);

        let (x, value) = optimizer
            .find(|state| state.fx() == f.optimum() || state.iter() >= 500)
            .unwrap();

        assert!(f.is_optimum(value));
        assert_eq!(f.evaluate(x), value);
    }

    #[test]
    fn optimizer_custom() {
        let f = OneMax::new(12);
        let mut optimizer = OptimizerDriver::builder(&f)
            .with_algo(|f| Rls::new(f, StdRng::seed_from_u64(70)))
            .build();

        let (_, value) = optimizer
            .find(|state| state.fx() == f.optimum() || state.iter() >= 2000)
            .unwrap();

        assert!(f.is_optimum(value));
        assert_eq!(optimizer.name(), "RLS");
    }

    #[test]
    fn optimizer_custom_options() {
        let f = OneMax::new(8);

        let mut options = HeaOptions::default();
        options.set_population_size(40).set_selection_size(10);

        let mut optimizer = OptimizerDriver::builder(&f)
            .with_algo(|f| {
                Hea::<SymmetricMoment, _>::with_options(f, StdRng::seed_from_u64(71), options)
                    .unwrap()
            })
            .build();

        let (_, value) = optimizer
            .find(|state| state.fx() == f.optimum() || state.iter() >= 500)
            .unwrap();

        assert!(f.is_optimum(value));
    }

    #[test]
    fn manual_iterations_are_monotone() {
        let f = OneMax::new(10);
        let mut optimizer = OptimizerDriver::builder(&f)
            .with_algo(|f| Rls::new(f, StdRng::seed_from_u64(72)))
            .build();

        let mut previous = f64::NEG_INFINITY;
        for _ in 0..100 {
            let (_, value) = optimizer.next().unwrap();
            assert!(value >= previous);
            previous = value;
        }
    }
}
