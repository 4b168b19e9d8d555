//! Bit vectors and related helpers.
//!
//! Candidate solutions are plain `Vec<bool>` values of fixed length. The
//! moment machinery maps bits to spins: bit 1 to spin −1 and bit 0 to spin
//! +1, as in Walsh analysis.

use rand::Rng;
use rand_distr::{Distribution, Uniform};

/// A candidate solution: a fixed-length sequence of binary values.
pub type BitVector = Vec<bool>;

/// Creates a uniformly random bit vector of given length.
pub fn random<R: Rng + ?Sized>(n: usize, rng: &mut R) -> BitVector {
    (0..n).map(|_| rng.gen()).collect()
}

/// Fills an existing bit vector with uniformly random bits.
pub fn randomize<R: Rng + ?Sized>(x: &mut [bool], rng: &mut R) {
    x.iter_mut().for_each(|b| *b = rng.gen());
}

/// Spin encoding of a bit: 1 maps to −1 and 0 maps to +1.
#[inline]
pub fn spin(b: bool) -> f64 {
    if b {
        -1.0
    } else {
        1.0
    }
}

/// Resets a permutation to identity.
pub fn identity_perm(perm: &mut [usize]) {
    perm.iter_mut().enumerate().for_each(|(i, p)| *p = i);
}

/// Shuffles a permutation uniformly in place.
pub fn rand_perm<R: Rng + ?Sized>(perm: &mut [usize], rng: &mut R) {
    // Based on https://en.wikipedia.org/wiki/Permutation#Algorithms_to_generate_permutations.
    for i in 0..perm.len() {
        let d = Uniform::new_inclusive(0, i).sample(rng);
        perm[i] = perm[d];
        perm[d] = i;
    }
}
