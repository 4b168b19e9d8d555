//! Core abstractions and types for Hypercube.
//!
//! *Users* are mainly interested in implementing the [`Function`] trait.
//!
//! Algorithm *developers* are interested in implementing the [`Optimizer`]
//! trait (and [`Restartable`] where meaningful) and using the tools in the
//! [moment](crate::moment), [sampler](crate::sampler),
//! [herding](crate::herding) and [population](crate::population) modules.

mod error;
mod function;
mod optimizer;

pub use error::*;
pub use function::*;
pub use optimizer::*;
