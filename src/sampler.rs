//! Gibbs sampler driven by Walsh moments.
//!
//! The sampler treats a [`WalshMoment`](crate::moment::WalshMoment) as the
//! parameters of a Boltzmann machine with pairwise interactions and produces
//! bit vectors by Markov-chain Monte Carlo. Model parameters are borrowed per
//! call, so one sampler can serve successive models of the same dimension.

use nalgebra::DVector;
use rand::Rng;

use crate::bits::{self, spin, BitVector};
use crate::moment::WalshMoment;

/// The standard logistic function.
#[inline]
fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Markov chain over the hypercube whose stationary distribution is the
/// Boltzmann distribution implied by a Walsh moment.
///
/// The caller decides how many [`update`](GibbsSampler::update) or
/// [`update_sync`](GibbsSampler::update_sync) transitions constitute one
/// sample and when to reset the chain with [`init`](GibbsSampler::init).
pub struct GibbsSampler {
    state: BitVector,
    pv: DVector<f64>,
}

impl GibbsSampler {
    /// Creates a sampler for bit vectors of length `n`, with an all-zeros
    /// state. Call [`init`](GibbsSampler::init) before sampling.
    pub fn new(n: usize) -> Self {
        assert!(n > 0, "sampler dimension must be positive");

        Self {
            state: vec![false; n],
            pv: DVector::zeros(n),
        }
    }

    /// Resets the chain to a uniformly random state.
    pub fn init<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        bits::randomize(&mut self.state, rng);
    }

    /// Resamples coordinate `i` conditional on all the others.
    ///
    /// This is an exact single-site Gibbs update under the pairwise
    /// interaction energy implied by `model`. Only `state[i]` is mutated.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range or the model dimension does not match.
    pub fn update<M: WalshMoment, R: Rng + ?Sized>(&mut self, model: &M, i: usize, rng: &mut R) {
        assert_eq!(model.dim(), self.state.len(), "dimension mismatch");
        assert!(i < self.state.len(), "site index out of range");

        let delta = -2.0 * self.local_field(model, i);

        self.state[i] = rng.gen::<f64>() < logistic(delta);
    }

    /// Resamples all coordinates simultaneously from their conditional
    /// probabilities given the *current* state.
    ///
    /// All per-site probabilities are computed before any site changes, then
    /// every site is sampled independently. This ignores intra-step
    /// dependencies and is therefore a biased, mean-field-like approximation
    /// of joint sampling, cheaper than a full scan of single-site updates.
    pub fn update_sync<M: WalshMoment, R: Rng + ?Sized>(&mut self, model: &M, rng: &mut R) {
        assert_eq!(model.dim(), self.state.len(), "dimension mismatch");

        for i in 0..self.state.len() {
            self.pv[i] = logistic(-2.0 * self.local_field(model, i));
        }
        for (b, &p) in self.state.iter_mut().zip(self.pv.iter()) {
            *b = rng.gen::<f64>() < p;
        }
    }

    /// Returns the current state. Valid until the next update.
    pub fn state(&self) -> &BitVector {
        &self.state
    }

    /// Energy difference driving site `i`: the first moment plus the signed
    /// contributions of all other sites in the current state.
    fn local_field<M: WalshMoment>(&self, model: &M, i: usize) -> f64 {
        let mut field = model.first(i);
        for (j, &b) in self.state.iter().enumerate() {
            if j != i {
                field += model.second(i, j) * spin(b);
            }
        }
        field
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::bits;
    use crate::moment::{SymmetricMoment, TriangularMoment};

    /// A pure external-field model (no pairwise couplings) pushed far
    /// outside [-1, 1], which makes the sampler effectively deterministic:
    /// every site is set to 1 with overwhelming probability.
    ///
    /// The moment of the all-ones vector and the moment of the all-zeros
    /// vector have identical second moments, so their difference leaves only
    /// the first moment (-2 per site), which is then scaled.
    fn saturated_all_ones<M: WalshMoment>(n: usize) -> M {
        let mut ones = M::zeros(n);
        ones.add(&vec![true; n]);
        let mut zeros = M::zeros(n);
        zeros.add(&vec![false; n]);

        let mut field = M::zeros(n);
        field.scaled_difference(1.0, &ones, &zeros);

        let mut model = M::zeros(n);
        model.scaled_difference(25.0, &field, &M::zeros(n));
        model
    }

    #[test]
    fn update_mutates_single_site() {
        let n = 32;
        let mut rng = StdRng::seed_from_u64(8);

        let mut model = TriangularMoment::zeros(n);
        for _ in 0..10 {
            model.add(&bits::random(n, &mut rng));
        }
        model.average(10);

        let mut sampler = GibbsSampler::new(n);
        sampler.init(&mut rng);

        for _ in 0..200 {
            let before = sampler.state().clone();
            let i = rng.gen_range(0..n);
            sampler.update(&model, i, &mut rng);
            let after = sampler.state();

            for j in 0..n {
                if j != i {
                    assert_eq!(before[j], after[j]);
                }
            }
        }
    }

    #[test]
    fn saturated_model_pins_state() {
        let n = 16;
        let mut rng = StdRng::seed_from_u64(9);

        let model: SymmetricMoment = saturated_all_ones(n);

        let mut sampler = GibbsSampler::new(n);
        sampler.init(&mut rng);

        for i in 0..n {
            sampler.update(&model, i, &mut rng);
        }

        assert!(sampler.state().iter().all(|&b| b));
    }

    #[test]
    fn update_sync_follows_saturated_model() {
        let n = 16;
        let mut rng = StdRng::seed_from_u64(10);

        let model: TriangularMoment = saturated_all_ones(n);

        let mut sampler = GibbsSampler::new(n);
        sampler.init(&mut rng);
        sampler.update_sync(&model, &mut rng);

        assert!(sampler.state().iter().all(|&b| b));
    }

    #[test]
    #[should_panic(expected = "site index out of range")]
    fn update_out_of_range_panics() {
        let mut rng = StdRng::seed_from_u64(11);
        let model = TriangularMoment::zeros(4);
        let mut sampler = GibbsSampler::new(4);
        sampler.update(&model, 4, &mut rng);
    }
}
