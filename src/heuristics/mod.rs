//! Genetic-algorithm heuristics.
//!
//! Every stochastic operator sits behind a narrow trait so it can be replaced
//! without touching the generational loop in [`genetic`].

pub mod population;
pub mod selection;
pub mod crossover;
pub mod mutation;
pub mod genetic;

pub use population::*;
pub use selection::*;
pub use crossover::*;
pub use mutation::*;
pub use genetic::*;
