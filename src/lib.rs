//! A persistent, symmetry-deduplicated index of Tak board positions.
//!
//! Recorded playtak games are replayed move by move; every position along the
//! way is reduced to its canonical symmetry representative and folded into a
//! sqlite store, which accumulates outcome tallies and the moves played out
//! of each position. Lookups accept a position in any orientation and answer
//! with follow-up moves valid from the literal board they were asked about.

pub mod error;
pub mod importer;
pub mod playtak;
pub mod position;
pub mod store;
pub mod symmetry;
pub mod tps;

mod tests;

pub use error::Error;
