//! Tiered population distribution for the chatload workload generator.
//!
//! Builds a population of teams, channels and users, classifies teams and
//! channels into high/mid/low volume tiers, and assigns memberships so
//! that a small set of teams and channels absorbs most of the simulated
//! activity. The per-user weighted choice tables produced here are what
//! the rest of the system consumes to decide where a user acts next.

pub mod args;
pub mod distribute;

pub use args::PopulationArgs;
pub use distribute::{distribute, Population};
