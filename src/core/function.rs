/// The trait for defining objective functions.
///
/// ## Defining a function
///
/// A function is any type that implements [`Function`]. There are two
/// required methods: [`dim`](Function::dim) and
/// [`evaluate`](Function::evaluate).
///
/// ```rust
/// use hypercube::Function;
///
/// // A problem is represented by a type.
/// struct OneMax {
///     n: usize,
/// }
///
/// impl Function for OneMax {
///     // The number of binary variables.
///     fn dim(&self) -> usize {
///         self.n
///     }
///
///     // Compute the function value. The algorithms maximize it.
///     fn evaluate(&self, x: &[bool]) -> f64 {
///         x.iter().filter(|&&b| b).count() as f64
///     }
/// }
/// ```
///
/// Functions are *maximized*. There is no error channel: a function must
/// return a value for every point of the hypercube, although non-finite
/// values are tolerated and sorted last by the population machinery.
pub trait Function {
    /// Returns the dimension, that is the length of the bit vectors the
    /// function accepts.
    fn dim(&self) -> usize;

    /// Computes the function value for given values of the variables.
    fn evaluate(&self, x: &[bool]) -> f64;

    /// Computes the function value of a point that differs from a previously
    /// evaluated one only in the given flipped bits.
    ///
    /// `x` is the *new* point (the bits in `flipped` have already been
    /// applied) and `value` is the function value of the previous point.
    /// Local-search algorithms such as [`Rls`](crate::algo::Rls) prefer this
    /// method because implementations can often compute the delta in O(k)
    /// for k flipped bits instead of re-evaluating in O(n).
    ///
    /// The default implementation falls back to a full evaluation.
    fn evaluate_incrementally(&self, x: &[bool], value: f64, flipped: &[usize]) -> f64 {
        let _ = (value, flipped);
        self.evaluate(x)
    }
}
