//! Restart wrapper for optimizers.
//!
//! Periodically restarting an optimizer that has committed to a region of the
//! hypercube is a cheap way to escape local optima. The wrapper delegates
//! iterations to the inner optimizer, restarts it every fixed number of
//! iterations and keeps the best solution found across all runs.

use crate::{
    bits::BitVector,
    core::{Error, Function, Optimizer, Restartable},
};

/// Restart wrapper. See [module](self) documentation for more details.
pub struct Restart<A> {
    inner: A,
    period: usize,
    iteration: usize,
    best: BitVector,
    value: f64,
}

impl<A> Restart<A> {
    /// Wraps an optimizer so that it is restarted every `period` iterations.
    pub fn new<F: Function>(f: &F, inner: A, period: usize) -> Result<Self, Error> {
        if period == 0 {
            return Err(Error::invalid_options("period must be positive"));
        }

        Ok(Self {
            inner,
            period,
            iteration: 0,
            best: vec![false; f.dim()],
            value: f64::NEG_INFINITY,
        })
    }

    /// Returns the wrapped optimizer.
    pub fn into_inner(self) -> A {
        self.inner
    }
}

impl<F: Function, A: Restartable<F>> Optimizer<F> for Restart<A> {
    const NAME: &'static str = "Restart";
    type Error = A::Error;

    fn next(&mut self, f: &F, x: &mut BitVector) -> Result<f64, Self::Error> {
        if self.iteration > 0 && self.iteration % self.period == 0 {
            self.inner.restart(f)?;
        }
        self.iteration += 1;

        let value = self.inner.next(f, x)?;

        // The inner optimizer forgets its best on restart, so the overall
        // best lives here.
        if value > self.value {
            self.best.copy_from_slice(x);
            self.value = value;
        }

        x.copy_from_slice(&self.best);
        Ok(self.value)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::algo::rls::{Rls, RlsOptions};
    use crate::testing::{OneMax, TestFunction};

    #[test]
    fn best_survives_restarts() {
        let f = OneMax::new(12);

        let mut options = RlsOptions::default();
        options.set_allow_neutral_moves(false);

        let rng = StdRng::seed_from_u64(60);
        let inner = Rls::with_options(&f, rng, options).unwrap();
        let mut algo = Restart::new(&f, inner, 50).unwrap();

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
        assert_eq!(f.evaluate(&x), *values.last().unwrap());
    }

    #[test]
    fn zero_period_is_rejected() {
        let f = OneMax::new(5);
        let rng = StdRng::seed_from_u64(61);
        let inner = Rls::new(&f, rng);

        assert!(Restart::new(&f, inner, 0).is_err());
    }
}
