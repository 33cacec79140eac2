//! Core deterministic primitives.
//!
//! Seeded randomness and state hashing. Everything above this layer gets
//! its randomness through [`rng::RandomSource`].

pub mod rng;
pub mod hash;

// Re-export core types
pub use rng::{DeterministicRng, RandomSource};
pub use hash::{compute_state_hash, StateHash, StateHasher};
