use super::function::Function;
use crate::bits::BitVector;

/// Common interface for all optimizers.
///
/// All optimizers implement a common interface defined by the [`Optimizer`]
/// trait. The essential method is [`next`](Optimizer::next) which represents
/// one iteration of the algorithm. Repeated calls to this method should move
/// the best found solution towards the maximum in successful cases.
///
/// ## Implementing an optimizer
///
/// Here is an implementation of a random optimizer (if such a thing can be
/// called an optimizer) which randomly generates points in a hope that
/// eventually finds the maximum with enough luck.
///
/// ```rust
/// use hypercube::bits::{self, BitVector};
/// use hypercube::{Function, Optimizer};
/// use rand::Rng;
///
/// struct Random<R> {
///     rng: R,
///     best: BitVector,
///     value: f64,
/// }
///
/// impl<R: Rng> Random<R> {
///     fn new<F: Function>(f: &F, rng: R) -> Self {
///         Self {
///             rng,
///             best: vec![false; f.dim()],
///             value: f64::NEG_INFINITY,
///         }
///     }
/// }
///
/// impl<F: Function, R: Rng> Optimizer<F> for Random<R> {
///     const NAME: &'static str = "Random";
///     type Error = std::convert::Infallible;
///
///     fn next(&mut self, f: &F, x: &mut BitVector) -> Result<f64, Self::Error> {
///         // Randomly sample the hypercube.
///         let candidate = bits::random(f.dim(), &mut self.rng);
///         let value = f.evaluate(&candidate);
///
///         if value >= self.value {
///             self.best = candidate;
///             self.value = value;
///         }
///
///         x.copy_from_slice(&self.best);
///         Ok(self.value)
///     }
/// }
/// ```
pub trait Optimizer<F: Function> {
    /// Name of the optimizer.
    const NAME: &'static str;

    /// Error while computing the next iteration.
    type Error;

    /// Performs the next iteration of the optimization process.
    ///
    /// After the method returns, `x` must hold the best solution found so far
    /// and the return value must be its function value as computed by
    /// [`Function::evaluate`]. The best value is therefore non-decreasing
    /// over successive calls.
    fn next(&mut self, f: &F, x: &mut BitVector) -> Result<f64, Self::Error>;
}

/// An [`Optimizer`] whose internal state can be reset so that the search
/// starts over.
///
/// Used by the [`Restart`](crate::algo::Restart) wrapper. Restarting forgets
/// the best solution found by the inner optimizer; keeping the overall best
/// across restarts is the responsibility of the caller (which is exactly what
/// the restart wrapper does).
pub trait Restartable<F: Function>: Optimizer<F> {
    /// Resets the internal state of the optimizer.
    fn restart(&mut self, f: &F) -> Result<(), Self::Error>;
}
