//! Random local search algorithm.
//!
//! RLS flips a single uniformly random bit per iteration and keeps the
//! mutation only if it does not decrease the function value. It is a simple
//! baseline and the textbook consumer of incremental evaluation (see
//! [`Function::evaluate_incrementally`]).

use getset::{CopyGetters, Setters};
use rand::Rng;

use crate::{
    bits::{self, BitVector},
    core::{Error, Function, Optimizer, Restartable},
};

/// Options for [`Rls`] optimizer.
#[derive(Debug, Clone, CopyGetters, Setters)]
#[getset(get_copy = "pub", set = "pub")]
pub struct RlsOptions {
    /// Accept mutations with equal value, allowing drift across plateaus.
    /// Default: `true`.
    allow_neutral_moves: bool,
    /// Give up after this many consecutive rejected mutations and restart
    /// from a random point. Default: `0` (never).
    patience: usize,
}

impl Default for RlsOptions {
    fn default() -> Self {
        Self {
            allow_neutral_moves: true,
            patience: 0,
        }
    }
}

/// Random local search optimizer. See [module](self) documentation for more
/// details.
pub struct Rls<R> {
    options: RlsOptions,
    current: BitVector,
    current_value: f64,
    best: BitVector,
    value: f64,
    failures: usize,
    rng: R,
}

impl<R: Rng> Rls<R> {
    /// Initializes RLS optimizer with default options.
    pub fn new<F: Function>(f: &F, rng: R) -> Self {
        Self::init(f, rng, RlsOptions::default())
    }

    /// Initializes RLS optimizer with given options.
    pub fn with_options<F: Function>(f: &F, rng: R, options: RlsOptions) -> Result<Self, Error> {
        Ok(Self::init(f, rng, options))
    }

    fn init<F: Function>(f: &F, mut rng: R, options: RlsOptions) -> Self {
        assert!(f.dim() > 0, "dimension must be positive");

        let current = bits::random(f.dim(), &mut rng);
        let current_value = f.evaluate(&current);

        Self {
            options,
            best: current.clone(),
            value: current_value,
            current,
            current_value,
            failures: 0,
            rng,
        }
    }

    fn next_inner<F: Function>(&mut self, f: &F, x: &mut BitVector) -> f64 {
        if self.options.patience > 0 && self.failures >= self.options.patience {
            bits::randomize(&mut self.current, &mut self.rng);
            self.current_value = f.evaluate(&self.current);
            self.failures = 0;
        }

        let i = self.rng.gen_range(0..self.current.len());
        self.current[i] = !self.current[i];

        let value = f.evaluate_incrementally(&self.current, self.current_value, &[i]);

        let accept = if self.options.allow_neutral_moves {
            value >= self.current_value
        } else {
            value > self.current_value
        };

        if accept {
            self.current_value = value;
            self.failures = 0;
        } else {
            // Revert the flip.
            self.current[i] = !self.current[i];
            self.failures += 1;
        }

        if self.current_value > self.value {
            self.best.copy_from_slice(&self.current);
            self.value = self.current_value;
        }

        x.copy_from_slice(&self.best);
        self.value
    }
}

impl<F: Function, R: Rng> Optimizer<F> for Rls<R> {
    const NAME: &'static str = "RLS";
    type Error = std::convert::Infallible;

    fn next(&mut self, f: &F, x: &mut BitVector) -> Result<f64, Self::Error> {
        Ok(self.next_inner(f, x))
    }
}

impl<F: Function, R: Rng> Restartable<F> for Rls<R> {
    fn restart(&mut self, f: &F) -> Result<(), Self::Error> {
        bits::randomize(&mut self.current, &mut self.rng);
        self.current_value = f.evaluate(&self.current);
        self.best.copy_from_slice(&self.current);
        self.value = self.current_value;
        self.failures = 0;
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
        let f = OneMax::new(20);

        let rng = StdRng::seed_from_u64(50);
        let mut algo = Rls::new(&f, rng);

        let mut x = vec![false; f.dim()];
        let mut values = Vec::new();
        for _ in 0..2000 {
            values.push(algo.next(&f, &mut x).unwrap());
        }

        assert!(
            values.windows(2).all(|pair| pair[1] >= pair[0]),
            "value decrease"
        );
        assert!(f.is_optimum(*values.last().unwrap()), "no solution found");
    }

    #[test]
    fn leading_ones_without_neutral_moves() {
        let f = LeadingOnes::new(12);

        let mut options = RlsOptions::default();
        options.set_allow_neutral_moves(false);

        let rng = StdRng::seed_from_u64(51);
        let mut algo = Rls::with_options(&f, rng, options).unwrap();

        let mut x = vec![false; f.dim()];
        let mut value = f64::NEG_INFINITY;
        for _ in 0..5000 {
            value = algo.next(&f, &mut x).unwrap();
        }

        assert!(f.is_optimum(value), "no solution found");
    }

    #[test]
    fn best_point_matches_best_value() {
        let f = OneMax::new(15);

        let rng = StdRng::seed_from_u64(52);
        let mut algo = Rls::new(&f, rng);

        let mut x = vec![false; f.dim()];
        for _ in 0..100 {
            let value = algo.next(&f, &mut x).unwrap();
            assert_eq!(f.evaluate(&x), value);
        }
    }
}
