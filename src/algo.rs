//! The collection of optimization algorithms.

pub mod bm_pbil;
pub mod hea;
pub mod pbil;
pub mod restart;
pub mod rls;

pub use bm_pbil::BmPbil;
pub use hea::Hea;
pub use pbil::Pbil;
pub use restart::Restart;
pub use rls::Rls;
