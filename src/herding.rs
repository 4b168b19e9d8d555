//! Herding generator for quasi-random bit vector sequences.
//!
//! Given a target Walsh moment, herding deterministically emits a sequence of
//! bit vectors whose time-averaged empirical moments converge to the target.
//! It is an online balancing procedure in the spirit of
//! discrepancy-minimizing sequences: at each step it greedily decides the
//! bits so as to pay down the accumulated deficit between the time-scaled
//! target and what has been produced so far. Unlike Gibbs sampling, no
//! randomness is involved in the convergence argument, which gives faster and
//! more uniform moment matching for a fixed target.
//!
//! # References
//!
//! \[1\] [Herding Dynamical Weights to
//! Learn](https://dl.acm.org/doi/10.1145/1553374.1553517)

use rand::Rng;

use crate::bits::{self, spin, BitVector};
use crate::moment::WalshMoment;

/// Herding generator over a Walsh moment representation `M`.
///
/// The generator maintains the raw (unnormalized) moment `count` of all
/// emitted bit vectors and a time counter that increases by one per sample.
/// Before each decision pass it forms the deficit `delta = time * target -
/// count`; the emitted bit vector is the greedy minimizer of the remaining
/// deficit, decided one bit at a time.
pub struct Herding<M> {
    delta: M,
    count: M,
    error: M,
    permutation: Vec<usize>,
    time: u64,
    randomize_bit_order: bool,
}

impl<M: WalshMoment> Herding<M> {
    /// Creates a herding generator for bit vectors of length `n`.
    pub fn new(n: usize) -> Self {
        assert!(n > 0, "herding dimension must be positive");

        Self {
            delta: M::zeros(n),
            count: M::zeros(n),
            error: M::zeros(n),
            permutation: (0..n).collect(),
            time: 0,
            randomize_bit_order: false,
        }
    }

    /// Resets time to zero, clears the accumulated moment and resets the bit
    /// order to identity.
    pub fn init(&mut self) {
        self.time = 0;
        self.count.init();
        bits::identity_perm(&mut self.permutation);
    }

    /// Controls whether the order in which bit positions are decided is
    /// shuffled before every sample. Randomizing avoids the systematic bias
    /// of always resolving bit 0 first; disabling it makes the sequence
    /// exactly reproducible. Default: `false`.
    pub fn set_randomize_bit_order(&mut self, randomize: bool) {
        self.randomize_bit_order = randomize;
    }

    /// Returns the deficit moment computed by the last sample.
    pub fn delta(&self) -> &M {
        &self.delta
    }

    /// Emits the next bit vector of the sequence into `x`.
    ///
    /// Bits are decided greedily in the chosen order: position i is set
    /// exactly when its deficit first moment, combined with the signed
    /// second-moment deficits of all already-decided positions, is not
    /// positive. The produced vector is then accumulated so that future
    /// samples compensate for it.
    ///
    /// The RNG is used only when bit order randomization is enabled.
    pub fn sample<R: Rng + ?Sized>(&mut self, target: &M, x: &mut BitVector, rng: &mut R) {
        assert_eq!(x.len(), self.permutation.len(), "dimension mismatch");

        if self.randomize_bit_order {
            bits::rand_perm(&mut self.permutation, rng);
        }

        self.time += 1;
        self.delta
            .scaled_difference(self.time as f64, target, &self.count);

        for k in 0..x.len() {
            let i = if self.randomize_bit_order {
                self.permutation[k]
            } else {
                k
            };
            let mut acc = 0.0;
            for l in 0..k {
                let j = if self.randomize_bit_order {
                    self.permutation[l]
                } else {
                    l
                };
                acc += spin(x[j]) * self.delta.second(i, j);
            }
            x[i] = self.delta.first(i) + acc <= 0.0;
        }

        self.count.add(x);
    }

    /// Returns the 2-norm of `time * target - count`, that is how far the
    /// cumulative production is from the ideal proportional target. For a
    /// fixed target this quantity stays bounded instead of growing with time.
    pub fn error(&mut self, target: &M) -> f64 {
        self.error
            .scaled_difference(self.time as f64, target, &self.count);
        self.error.norm_2()
    }
}
