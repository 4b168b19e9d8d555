//! Walsh moment accumulators.
//!
//! A Walsh moment holds the sufficient statistics of a set of bit vectors
//! under the spin encoding (bit 1 ↦ −1, bit 0 ↦ +1): the first moment is the
//! per-variable mean spin and the second moment is the matrix of pairwise
//! spin correlations. Two representations are provided: [`TriangularMoment`]
//! stores only the strict lower triangle of the second moment in packed form,
//! while [`SymmetricMoment`] stores the full matrix and keeps it mirrored
//! after every mutation. Both produce numerically identical results for the
//! same sequence of operations.
//!
//! Algorithms are generic over the [`WalshMoment`] trait, so the
//! representation is fixed at construction time and the accessors are
//! monomorphized away.

use nalgebra::{DMatrix, DVector};

use crate::bits::spin;

/// Second-order Walsh moment of a set of bit vectors.
///
/// Implementors maintain a first moment (length n) and a second moment
/// (pairwise, indexed by i ≠ j). All operations require matching dimensions
/// and panic otherwise.
pub trait WalshMoment: Clone {
    /// Creates a zeroed moment for bit vectors of length `n`.
    fn zeros(n: usize) -> Self;

    /// Returns the dimension n.
    fn dim(&self) -> usize;

    /// Sets all entries to zero, starting a new accumulation epoch.
    fn init(&mut self);

    /// Accumulates one observation.
    ///
    /// This is the dominant cost of the moment machinery: O(n²) per call,
    /// implemented as tight loops over contiguous storage.
    fn add(&mut self, x: &[bool]);

    /// Divides every entry by `count`.
    ///
    /// After averaging `count` accumulated observations, every entry lies in
    /// [−1, 1].
    ///
    /// # Panics
    ///
    /// Panics if `count` is zero.
    fn average(&mut self, count: usize);

    /// Exponential smoothing towards a target: `self += rate * (target - self)`.
    fn update(&mut self, target: &Self, rate: f64);

    /// Exponential smoothing towards the difference of two moments:
    /// `self += rate * (toward - away)`.
    ///
    /// The result is not necessarily a valid Walsh moment; entries can leave
    /// [−1, 1]. The caller is responsible for calling
    /// [`bound`](WalshMoment::bound) afterwards when the result is used as
    /// model parameters.
    fn update_difference(&mut self, toward: &Self, away: &Self, rate: f64);

    /// Scaled difference of two moments: `self = lambda * a - b`.
    ///
    /// No bounds are guaranteed. Used by herding to form the directional
    /// error signal.
    fn scaled_difference(&mut self, lambda: f64, a: &Self, b: &Self);

    /// Clips every entry into [margin − 1, 1 − margin], keeping the moment
    /// strictly inside the valid spin-correlation range so that sampling
    /// cannot stall on a degenerate model.
    ///
    /// # Panics
    ///
    /// Panics unless `0 <= margin < 1`.
    fn bound(&mut self, margin: f64);

    /// Returns the first moment of variable `i`.
    fn first(&self, i: usize) -> f64;

    /// Returns the second moment of the pair `(i, j)`, `i != j`.
    fn second(&self, i: usize, j: usize) -> f64;

    /// 1-norm of the moment seen as a flattened vector (lower triangle
    /// counted once).
    fn norm_1(&self) -> f64;

    /// 2-norm of the moment seen as a flattened vector.
    fn norm_2(&self) -> f64;

    /// Infinite norm of the moment seen as a flattened vector.
    fn norm_infinite(&self) -> f64;

    /// 2-norm distance to another moment.
    fn distance(&self, other: &Self) -> f64;
}

/// Offset of row `i` in the packed strict lower triangle.
#[inline]
fn tri(i: usize) -> usize {
    (i * i - i) / 2
}

/// Walsh moment storing only the strict lower triangle of the second moment.
///
/// Entry (i, j) with j < i lives at packed index `i(i-1)/2 + j`. The mirrored
/// entry (j, i) is reconstructed on demand by index swapping.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangularMoment {
    first: DVector<f64>,
    second: DVector<f64>,
}

impl WalshMoment for TriangularMoment {
    fn zeros(n: usize) -> Self {
        assert!(n > 0, "moment dimension must be positive");

        Self {
            first: DVector::zeros(n),
            second: DVector::zeros(tri(n)),
        }
    }

    fn dim(&self) -> usize {
        self.first.len()
    }

    fn init(&mut self) {
        self.first.fill(0.0);
        self.second.fill(0.0);
    }

    fn add(&mut self, x: &[bool]) {
        assert_eq!(x.len(), self.first.len(), "dimension mismatch");

        let second = self.second.as_mut_slice();

        for (i, &xi) in x.iter().enumerate() {
            let si = spin(xi);
            self.first[i] += si;

            let row = &mut second[tri(i)..tri(i) + i];
            for (entry, &xj) in row.iter_mut().zip(x.iter()) {
                *entry += si * spin(xj);
            }
        }
    }

    fn average(&mut self, count: usize) {
        assert!(count > 0, "cannot average zero observations");

        let c = count as f64;
        self.first /= c;
        self.second /= c;

        debug_assert!(self.first.iter().all(|m| (-1.0..=1.0).contains(m)));
        debug_assert!(self.second.iter().all(|m| (-1.0..=1.0).contains(m)));
    }

    fn update(&mut self, target: &Self, rate: f64) {
        assert_eq!(target.dim(), self.dim(), "dimension mismatch");

        for (m, &t) in self.first.iter_mut().zip(target.first.iter()) {
            *m += rate * (t - *m);
        }
        for (m, &t) in self.second.iter_mut().zip(target.second.iter()) {
            *m += rate * (t - *m);
        }
    }

    fn update_difference(&mut self, toward: &Self, away: &Self, rate: f64) {
        assert_eq!(toward.dim(), self.dim(), "dimension mismatch");
        assert_eq!(away.dim(), self.dim(), "dimension mismatch");

        for (m, (&t, &a)) in self
            .first
            .iter_mut()
            .zip(toward.first.iter().zip(away.first.iter()))
        {
            *m += rate * (t - a);
        }
        for (m, (&t, &a)) in self
            .second
            .iter_mut()
            .zip(toward.second.iter().zip(away.second.iter()))
        {
            *m += rate * (t - a);
        }
    }

    fn scaled_difference(&mut self, lambda: f64, a: &Self, b: &Self) {
        assert_eq!(a.dim(), self.dim(), "dimension mismatch");
        assert_eq!(b.dim(), self.dim(), "dimension mismatch");

        for (m, (&ma, &mb)) in self
            .first
            .iter_mut()
            .zip(a.first.iter().zip(b.first.iter()))
        {
            *m = lambda * ma - mb;
        }
        for (m, (&ma, &mb)) in self
            .second
            .iter_mut()
            .zip(a.second.iter().zip(b.second.iter()))
        {
            *m = lambda * ma - mb;
        }
    }

    fn bound(&mut self, margin: f64) {
        assert!((0.0..1.0).contains(&margin), "margin must be in [0, 1)");

        let high = 1.0 - margin;
        let low = margin - 1.0;

        self.first.iter_mut().for_each(|m| *m = m.clamp(low, high));
        self.second.iter_mut().for_each(|m| *m = m.clamp(low, high));
    }

    #[inline]
    fn first(&self, i: usize) -> f64 {
        self.first[i]
    }

    #[inline]
    fn second(&self, i: usize, j: usize) -> f64 {
        debug_assert_ne!(i, j);
        if j < i {
            self.second[tri(i) + j]
        } else {
            self.second[tri(j) + i]
        }
    }

    fn norm_1(&self) -> f64 {
        self.first.iter().map(|m| m.abs()).sum::<f64>()
            + self.second.iter().map(|m| m.abs()).sum::<f64>()
    }

    fn norm_2(&self) -> f64 {
        let sum = self.first.iter().map(|m| m * m).sum::<f64>()
            + self.second.iter().map(|m| m * m).sum::<f64>();
        sum.sqrt()
    }

    fn norm_infinite(&self) -> f64 {
        self.first
            .iter()
            .chain(self.second.iter())
            .fold(0.0, |max, m| max.max(m.abs()))
    }

    fn distance(&self, other: &Self) -> f64 {
        assert_eq!(other.dim(), self.dim(), "dimension mismatch");

        let sum = self
            .first
            .iter()
            .zip(other.first.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            + self
                .second
                .iter()
                .zip(other.second.iter())
                .map(|(a, b)| (a - b) * (a - b))
                .sum::<f64>();
        sum.sqrt()
    }
}

/// Walsh moment storing the full n×n second-moment matrix.
///
/// The matrix is kept symmetric by mirroring every write, so
/// [`second`](WalshMoment::second) is a plain lookup. The diagonal is unused
/// and stays zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetricMoment {
    first: DVector<f64>,
    second: DMatrix<f64>,
}

impl WalshMoment for SymmetricMoment {
    fn zeros(n: usize) -> Self {
        assert!(n > 0, "moment dimension must be positive");

        Self {
            first: DVector::zeros(n),
            second: DMatrix::zeros(n, n),
        }
    }

    fn dim(&self) -> usize {
        self.first.len()
    }

    fn init(&mut self) {
        self.first.fill(0.0);
        self.second.fill(0.0);
    }

    fn add(&mut self, x: &[bool]) {
        assert_eq!(x.len(), self.first.len(), "dimension mismatch");

        for (i, &xi) in x.iter().enumerate() {
            let si = spin(xi);
            self.first[i] += si;

            for (j, &xj) in x.iter().enumerate().take(i) {
                let value = self.second[(i, j)] + si * spin(xj);
                self.second[(i, j)] = value;
                self.second[(j, i)] = value;
            }
        }
    }

    fn average(&mut self, count: usize) {
        assert!(count > 0, "cannot average zero observations");

        let c = count as f64;
        self.first /= c;
        self.second /= c;

        debug_assert!(self.first.iter().all(|m| (-1.0..=1.0).contains(m)));
        debug_assert!(self.second.iter().all(|m| (-1.0..=1.0).contains(m)));
        debug_assert!(self.is_symmetric());
    }

    fn update(&mut self, target: &Self, rate: f64) {
        assert_eq!(target.dim(), self.dim(), "dimension mismatch");

        for (m, &t) in self.first.iter_mut().zip(target.first.iter()) {
            *m += rate * (t - *m);
        }
        for (m, &t) in self.second.iter_mut().zip(target.second.iter()) {
            *m += rate * (t - *m);
        }

        debug_assert!(self.is_symmetric());
    }

    fn update_difference(&mut self, toward: &Self, away: &Self, rate: f64) {
        assert_eq!(toward.dim(), self.dim(), "dimension mismatch");
        assert_eq!(away.dim(), self.dim(), "dimension mismatch");

        for (m, (&t, &a)) in self
            .first
            .iter_mut()
            .zip(toward.first.iter().zip(away.first.iter()))
        {
            *m += rate * (t - a);
        }
        for (m, (&t, &a)) in self
            .second
            .iter_mut()
            .zip(toward.second.iter().zip(away.second.iter()))
        {
            *m += rate * (t - a);
        }

        debug_assert!(self.is_symmetric());
    }

    fn scaled_difference(&mut self, lambda: f64, a: &Self, b: &Self) {
        assert_eq!(a.dim(), self.dim(), "dimension mismatch");
        assert_eq!(b.dim(), self.dim(), "dimension mismatch");

        for (m, (&ma, &mb)) in self
            .first
            .iter_mut()
            .zip(a.first.iter().zip(b.first.iter()))
        {
            *m = lambda * ma - mb;
        }
        for (m, (&ma, &mb)) in self
            .second
            .iter_mut()
            .zip(a.second.iter().zip(b.second.iter()))
        {
            *m = lambda * ma - mb;
        }

        debug_assert!(self.is_symmetric());
    }

    fn bound(&mut self, margin: f64) {
        assert!((0.0..1.0).contains(&margin), "margin must be in [0, 1)");

        let high = 1.0 - margin;
        let low = margin - 1.0;

        self.first.iter_mut().for_each(|m| *m = m.clamp(low, high));
        // The diagonal is zero and low <= 0 <= high, so clipping the whole
        // matrix leaves it untouched.
        self.second.iter_mut().for_each(|m| *m = m.clamp(low, high));

        debug_assert!(self.is_symmetric());
    }

    #[inline]
    fn first(&self, i: usize) -> f64 {
        self.first[i]
    }

    #[inline]
    fn second(&self, i: usize, j: usize) -> f64 {
        debug_assert_ne!(i, j);
        self.second[(i, j)]
    }

    fn norm_1(&self) -> f64 {
        self.first.iter().map(|m| m.abs()).sum::<f64>() + self.fold_lower(0.0, |acc, m| acc + m.abs())
    }

    fn norm_2(&self) -> f64 {
        let sum =
            self.first.iter().map(|m| m * m).sum::<f64>() + self.fold_lower(0.0, |acc, m| acc + m * m);
        sum.sqrt()
    }

    fn norm_infinite(&self) -> f64 {
        let max = self.first.iter().fold(0.0f64, |max, m| max.max(m.abs()));
        self.fold_lower(max, |max, m| max.max(m.abs()))
    }

    fn distance(&self, other: &Self) -> f64 {
        assert_eq!(other.dim(), self.dim(), "dimension mismatch");

        let mut sum = self
            .first
            .iter()
            .zip(other.first.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>();
        for i in 0..self.dim() {
            for j in 0..i {
                let d = self.second[(i, j)] - other.second[(i, j)];
                sum += d * d;
            }
        }
        sum.sqrt()
    }
}

impl SymmetricMoment {
    /// Folds over the strict lower triangle so that each pair is counted
    /// once, matching the packed storage of [`TriangularMoment`].
    fn fold_lower(&self, init: f64, f: impl Fn(f64, f64) -> f64) -> f64 {
        let mut acc = init;
        for i in 0..self.dim() {
            for j in 0..i {
                acc = f(acc, self.second[(i, j)]);
            }
        }
        acc
    }

    fn is_symmetric(&self) -> bool {
        let n = self.dim();
        (0..n).all(|i| (0..i).all(|j| self.second[(i, j)] == self.second[(j, i)]))
    }
}
