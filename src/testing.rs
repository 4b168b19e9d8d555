//! Testing functions and utilities.
//!
//! This module contains classical benchmark functions on the hypercube. They
//! are used in tests of the algorithms, but can be useful for experimenting
//! outside the crate too.

use crate::core::Function;

/// Extension trait for benchmark functions.
pub trait TestFunction: Function {
    /// Value of the global maximum.
    fn optimum(&self) -> f64;

    /// Standard stopping rule for tests: whether a value reached the optimum.
    fn is_optimum(&self, value: f64) -> bool {
        value == self.optimum()
    }
}

/// OneMax function. Counts the number of ones.
///
/// The unique maximum is the all-ones vector with value `n`.
#[derive(Debug, Clone)]
pub struct OneMax {
    n: usize,
}

impl OneMax {
    /// Creates the function for bit vectors of length `n`.
    pub fn new(n: usize) -> Self {
        Self { n }
    }
}

impl Function for OneMax {
    fn dim(&self) -> usize {
        self.n
    }

    fn evaluate(&self, x: &[bool]) -> f64 {
        x.iter().filter(|&&b| b).count() as f64
    }

    fn evaluate_incrementally(&self, x: &[bool], value: f64, flipped: &[usize]) -> f64 {
        // Each flipped bit was already flipped in x, so a one gained +1 and a
        // zero gained -1 relative to the stored value.
        let mut value = value;
        for &i in flipped {
            value += if x[i] { 1.0 } else { -1.0 };
        }
        value
    }
}

impl TestFunction for OneMax {
    fn optimum(&self) -> f64 {
        self.n as f64
    }
}

/// LeadingOnes function. Counts the leading ones.
///
/// Harder than [`OneMax`] for distribution-based algorithms because bits only
/// become relevant once all bits before them are set.
#[derive(Debug, Clone)]
pub struct LeadingOnes {
    n: usize,
}

impl LeadingOnes {
    /// Creates the function for bit vectors of length `n`.
    pub fn new(n: usize) -> Self {
        Self { n }
    }
}

impl Function for LeadingOnes {
    fn dim(&self) -> usize {
        self.n
    }

    fn evaluate(&self, x: &[bool]) -> f64 {
        x.iter().take_while(|&&b| b).count() as f64
    }
}

impl TestFunction for LeadingOnes {
    fn optimum(&self) -> f64 {
        self.n as f64
    }
}

/// Quadratic function with strong pairwise structure.
///
/// The value is the number of ones plus a bonus for every *adjacent* pair of
/// equal bits. Both the all-ones vector (global maximum, value `n + (n - 1) *
/// bonus`) and the all-zeros vector (local maximum) are attractors, which
/// rewards algorithms that model pairwise interactions.
#[derive(Debug, Clone)]
pub struct AdjacentPairs {
    n: usize,
    bonus: f64,
}

impl AdjacentPairs {
    /// Creates the function for bit vectors of length `n` with a given bonus
    /// per agreeing adjacent pair.
    pub fn new(n: usize, bonus: f64) -> Self {
        Self { n, bonus }
    }
}

impl Function for AdjacentPairs {
    fn dim(&self) -> usize {
        self.n
    }

    fn evaluate(&self, x: &[bool]) -> f64 {
        let ones = x.iter().filter(|&&b| b).count() as f64;
        let pairs = x.windows(2).filter(|w| w[0] == w[1]).count() as f64;
        ones + self.bonus * pairs
    }
}

impl TestFunction for AdjacentPairs {
    fn optimum(&self) -> f64 {
        self.n as f64 + self.bonus * (self.n - 1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_max_values() {
        let f = OneMax::new(4);
        assert_eq!(f.evaluate(&vec![false; 4]), 0.0);
        assert_eq!(f.evaluate(&vec![true, false, true, false]), 2.0);
        assert_eq!(f.evaluate(&vec![true; 4]), f.optimum());
    }

    #[test]
    fn one_max_incremental_matches_full() {
        let f = OneMax::new(6);
        let mut x = vec![true, false, true, true, false, false];
        let value = f.evaluate(&x);

        let flipped = [1, 3];
        for &i in &flipped {
            x[i] = !x[i];
        }

        assert_eq!(
            f.evaluate_incrementally(&x, value, &flipped),
            f.evaluate(&x)
        );
    }

    #[test]
    fn leading_ones_values() {
        let f = LeadingOnes::new(5);
        assert_eq!(f.evaluate(&vec![true, true, false, true, true]), 2.0);
        assert_eq!(f.evaluate(&vec![false, true, true, true, true]), 0.0);
        assert_eq!(f.evaluate(&vec![true; 5]), f.optimum());
    }

    #[test]
    fn adjacent_pairs_values() {
        let f = AdjacentPairs::new(4, 2.0);
        assert_eq!(f.evaluate(&vec![true; 4]), f.optimum());
        assert_eq!(f.evaluate(&vec![false; 4]), 6.0);
        assert_eq!(f.evaluate(&vec![true, false, true, false]), 2.0);
    }
}
