//! Data sources for the statistics dataset.

pub mod remote;

pub use remote::*;
