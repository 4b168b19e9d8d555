#![allow(clippy::many_single_char_names)]
#![warn(missing_docs)]

//! # Hypercube
//!
//! A pure Rust framework and implementation of metaheuristic and estimation
//! of distribution algorithms for black-box optimization on the Boolean
//! hypercube.
//!
//! This library provides algorithms that maximize functions of *n* binary
//! variables written entirely in Rust. No structural knowledge about the
//! function is required; the algorithms only evaluate candidate solutions.
//! All algorithms implement the same interface which is designed to give full
//! control over the process and allows to combine different components to
//! achieve the desired solution. The core of the library is a family of
//! probabilistic-model algorithms built on Walsh moments: moment
//! accumulators, a Gibbs sampler and a herding generator that can be mixed
//! into custom algorithms.
//!
//! ## Algorithms
//!
//! * [BM-PBIL](algo::bm_pbil) -- Recommended method to be used as a default.
//!   Learns a Boltzmann machine with pairwise interactions.
//! * [HEA](algo::hea) -- Replaces random sampling with deterministic herding
//!   for faster moment matching.
//! * [PBIL](algo::pbil) -- First-moment-only baseline with independent
//!   per-bit probabilities.
//! * [RLS](algo::rls) -- Single-bit-flip local search. Cheap and surprisingly
//!   strong on smooth landscapes.
//! * [Restart](algo::restart) -- Wrapper that periodically restarts another
//!   algorithm and keeps the overall best.
//!
//! ## Problem
//!
//! The problem is to find a bit vector maximizing a function over the
//! hypercube:
//!
//! ```text
//! maximize f(x) for x in {0, 1}^n
//! ```
//!
//! Nothing is assumed about `f` beyond the ability to evaluate it at any
//! point, which makes the algorithms applicable to pseudo-Boolean functions
//! arising from combinatorial problems, inference and learning.
//!
//! When it comes to code, the problem is any type that implements the
//! [`Function`] trait.
//!
//! ```rust
//! use hypercube::Function;
//!
//! // A problem is represented by a type.
//! struct OneMax {
//!     n: usize,
//! }
//!
//! impl Function for OneMax {
//!     // The number of binary variables.
//!     fn dim(&self) -> usize {
//!         self.n
//!     }
//!
//!     // Evaluate a candidate solution. The algorithms maximize this value.
//!     fn evaluate(&self, x: &[bool]) -> f64 {
//!         x.iter().filter(|&&b| b).count() as f64
//!     }
//! }
//! ```
//!
//! And that's it. There is no need for defining the structure of the
//! function, gradients or anything else. Functions that can update their
//! value cheaply after a few bit flips may additionally implement
//! [`Function::evaluate_incrementally`], which local search algorithms take
//! advantage of.
//!
//! ## Optimizing
//!
//! When you have your function available, you can use the [`OptimizerDriver`]
//! to run the iteration process until a stopping criterion is reached.
//!
//! ```rust
//! use hypercube::{Function, OptimizerDriver};
//! #
//! # struct OneMax {
//! #     n: usize,
//! # }
//! #
//! # impl Function for OneMax {
//! #     fn dim(&self) -> usize {
//! #         self.n
//! #     }
//! #
//! #     fn evaluate(&self, x: &[bool]) -> f64 {
//! #         x.iter().filter(|&&b| b).count() as f64
//! #     }
//! # }
//!
//! let f = OneMax { n: 8 };
//! let mut optimizer = OptimizerDriver::new(&f);
//!
//! let optimum = 8.0;
//!
//! let (x, value) = optimizer
//!     .find(|state| {
//!         println!("iter = {}\tvalue = {}\tx = {:?}", state.iter(), state.fx(), state.x());
//!         state.fx() == optimum || state.iter() >= 1000
//!     })
//!     .expect("optimizer encountered an error");
//!
//! if value == optimum {
//!     println!("solved");
//! } else {
//!     println!("maximum number of iterations exceeded");
//! }
//! ```
//!
//! ## License
//!
//! Licensed under MIT.

pub mod algo;
pub mod bits;
mod core;
pub mod driver;
pub mod herding;
pub mod moment;
pub mod population;
pub mod sampler;
pub mod testing;

pub use core::*;
pub use driver::OptimizerDriver;

pub use nalgebra;
