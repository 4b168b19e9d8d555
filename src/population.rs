//! Abstractions and types for population-based algorithms.
//!
//! The most important type is [`Population`].

use std::cmp::Ordering;

use getset::CopyGetters;
use rand::Rng;

use crate::bits::{self, BitVector};
use crate::core::Function;

/// Population in a population-based algorithm.
///
/// A population is a fixed-size collection of bit vectors with their function
/// values and a permutation giving the sorted order. It is allocated once per
/// algorithm run and never resized; every iteration overwrites the
/// individuals in place.
///
/// There are two important invariants that the population must satisfy:
///
/// 1. Values of individuals and their function values must match. That is, it
///    must not happen that an individual is changed without reevaluating the
///    population (see [`eval`](Population::eval)).
/// 2. Before calling [`best`](Population::best) or
///    [`worst`](Population::worst) the population must be sorted using
///    [`sort`](Population::sort).
///
/// Violating the second invariant results in panic in debug builds.
#[allow(clippy::len_without_is_empty)]
pub struct Population {
    individuals: Vec<BitVector>,
    values: Vec<f64>,
    sorted: Vec<usize>,
    sorted_dirty: bool,
}

impl Population {
    /// Creates a new population of all-zeros individuals.
    pub fn new(population_size: usize, n: usize) -> Self {
        assert!(population_size > 0, "population size must be positive");
        assert!(n > 0, "dimension must be positive");

        Self {
            individuals: vec![vec![false; n]; population_size],
            values: vec![0.0; population_size],
            sorted: (0..population_size).collect(),
            sorted_dirty: true,
        }
    }

    /// Gets the size of the population.
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Gets the length of the individuals.
    pub fn dim(&self) -> usize {
        self.individuals[0].len()
    }

    /// Fills the whole population with uniformly random individuals.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.sorted_dirty = true;

        for x in self.individuals.iter_mut() {
            bits::randomize(x, rng);
        }
    }

    /// Gets an individual by its index in the *unsorted* population.
    pub fn get(&self, index: usize) -> &BitVector {
        &self.individuals[index]
    }

    /// Gets an individual mutably by its index in the *unsorted* population.
    ///
    /// **Important:** It is necessary to reevaluate and sort the population
    /// before using [`best`](Population::best) or
    /// [`worst`](Population::worst) again.
    pub fn get_mut(&mut self, index: usize) -> &mut BitVector {
        self.sorted_dirty = true;
        &mut self.individuals[index]
    }

    /// Evaluates the whole population and stores the values.
    pub fn eval<F: Function>(&mut self, f: &F) {
        self.sorted_dirty = true;

        for (x, value) in self.individuals.iter().zip(self.values.iter_mut()) {
            *value = f.evaluate(x);
        }
    }

    /// Evaluates the whole population using a pool of independent function
    /// instances, one per worker thread.
    ///
    /// Population indices are distributed in contiguous chunks, one chunk per
    /// function instance, and all threads are joined before the method
    /// returns. Each instance is used by exactly one thread, so the function
    /// type only needs to be [`Send`], not [`Sync`]: instances are not
    /// assumed to be reentrant.
    ///
    /// # Panics
    ///
    /// Panics if `functions` is empty.
    pub fn eval_parallel<F: Function + Send>(&mut self, functions: &mut [F]) {
        assert!(!functions.is_empty(), "the function pool must not be empty");

        self.sorted_dirty = true;

        let chunk_size = self.individuals.len().div_ceil(functions.len());

        std::thread::scope(|scope| {
            let individuals = self.individuals.chunks(chunk_size);
            let values = self.values.chunks_mut(chunk_size);

            for ((xs, vs), f) in individuals.zip(values).zip(functions.iter_mut()) {
                scope.spawn(move || {
                    let f = &*f;
                    for (x, value) in xs.iter().zip(vs.iter_mut()) {
                        *value = f.evaluate(x);
                    }
                });
            }
        });
    }

    /// Sorts the population by function value from high to low, non-finite
    /// values last.
    ///
    /// Only the permutation is rearranged; individuals do not move.
    pub fn sort(&mut self) {
        let values = &self.values;
        self.sorted.sort_unstable_by(|lhs, rhs| {
            let lhs = values[*lhs];
            let rhs = values[*rhs];
            if lhs.is_finite() && rhs.is_finite() {
                rhs.partial_cmp(&lhs).unwrap()
            } else if lhs.is_finite() {
                Ordering::Less
            } else if rhs.is_finite() {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        });

        self.sorted_dirty = false;
    }

    /// Gets the i-th best individual.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the population is not sorted. This is the
    /// responsibility of the algorithm.
    pub fn best(&self, i: usize) -> Individual<'_> {
        debug_assert!(
            !self.sorted_dirty,
            "population is supposedly not sorted - this is a bug in the algorithm used"
        );

        let index = self.sorted[i];
        Individual {
            x: &self.individuals[index],
            value: self.values[index],
        }
    }

    /// Gets the i-th worst individual.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the population is not sorted.
    pub fn worst(&self, i: usize) -> Individual<'_> {
        self.best(self.len() - 1 - i)
    }

    /// Creates a simple report about the population in its current state.
    pub fn report(&self) -> PopulationReport {
        PopulationReport::new(self)
    }
}

/// An individual from a population returned by [`best`](Population::best) and
/// [`worst`](Population::worst).
pub struct Individual<'a> {
    x: &'a BitVector,
    value: f64,
}

impl<'a> Individual<'a> {
    /// Gets the bit vector of the individual.
    pub fn x(&self) -> &'a BitVector {
        self.x
    }

    /// Gets the function value of the individual.
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// A simple report about the population in its current state returned by the
/// [`report`](Population::report) method.
#[derive(Debug, Clone, CopyGetters)]
#[get_copy = "pub"]
pub struct PopulationReport {
    /// Value of the best individual in the population.
    best: f64,
    /// Average value of all individuals that have a finite value.
    avg: f64,
    /// Number of individuals having a finite value.
    valid: usize,
    /// Number of individuals *not* having a finite value.
    invalid: usize,
}

impl PopulationReport {
    fn new(population: &Population) -> Self {
        let mut best = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut valid = 0;
        let mut invalid = 0;

        for value in population.values.iter().copied() {
            if value > best {
                best = value;
            }

            if value.is_finite() {
                sum += value;
                valid += 1;
            } else {
                invalid += 1;
            }
        }

        Self {
            best,
            avg: sum / valid as f64,
            valid,
            invalid,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::testing::OneMax;

    #[test]
    fn sort_is_descending_with_valid_permutation() {
        let mut rng = StdRng::seed_from_u64(16);

        let f = OneMax::new(20);
        let mut population = Population::new(30, 20);
        population.randomize(&mut rng);
        population.eval(&f);
        population.sort();

        let mut seen = vec![false; population.len()];
        for i in 0..population.len() {
            let index = population.sorted[i];
            assert!(!seen[index]);
            seen[index] = true;
        }

        for i in 1..population.len() {
            assert!(population.best(i - 1).value() >= population.best(i).value());
        }

        assert_eq!(
            population.worst(0).value(),
            population.best(population.len() - 1).value()
        );
    }

    #[test]
    fn parallel_evaluation_matches_sequential() {
        let mut rng = StdRng::seed_from_u64(17);

        let f = OneMax::new(25);
        let mut population = Population::new(41, 25);
        population.randomize(&mut rng);

        let mut sequential = Population::new(41, 25);
        for i in 0..population.len() {
            sequential.get_mut(i).copy_from_slice(population.get(i));
        }

        sequential.eval(&f);

        let mut pool = vec![OneMax::new(25), OneMax::new(25), OneMax::new(25)];
        population.eval_parallel(&mut pool);

        assert_eq!(population.values, sequential.values);
    }

    #[test]
    fn report_summarizes_values() {
        let mut rng = StdRng::seed_from_u64(18);

        let f = OneMax::new(10);
        let mut population = Population::new(8, 10);
        population.randomize(&mut rng);
        population.eval(&f);
        population.sort();

        let report = population.report();
        assert_eq!(report.best(), population.best(0).value());
        assert_eq!(report.valid(), 8);
        assert_eq!(report.invalid(), 0);
        assert!(report.avg() <= report.best());
    }
}
