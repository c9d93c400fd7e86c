//! Poseidon377 - Poseidon over the BLS12-377 scalar field.
//!
//! This crate implements the Poseidon hash with Penumbra's published
//! parameter sets (rates 1 through 7) and its optimized round schedule, so
//! digests match Penumbra's `poseidon377` bit for bit.
//!
//! # Architecture
//!
//! - [`field`] - BLS12-377 scalar field wrapper (Fr) and its encodings
//! - [`params`] - compiled-in parameter sets, lookup and validation
//! - [`arith`] - arithmetic substrates: native, R1CS, emulated R1CS
//! - [`poseidon`] - the permutation engine, sponge hash and multi-hash
//! - [`conformance`] - golden vectors and cross-substrate differential tests
//! - [`error`] - error types with stable numeric codes
//!
//! # Substrates
//!
//! The permutation is written once, generic over [`arith::Arithmetic`]. The
//! same code computes a native digest, constrains it inside an R1CS system
//! over Fr, or constrains it with Fr emulated inside an R1CS system over
//! BLS12-377 Fq. All three must agree on every input.
//!
//! The build.rs script generates the parameter tables from
//! `params/poseidon377.json`, so the constants are static data in Montgomery
//! form.

// Hashing code must avoid unwrap/expect/panic in library code.
// Tests are checked separately with `cargo test`.
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

pub mod arith;
pub mod conformance;
pub mod error;
pub mod field;
pub mod params;
pub mod poseidon;

// Re-export commonly used types
pub use conformance::{DiffResult, DiffTestHarness};
pub use error::{PoseidonError, PoseidonResult};
pub use field::Fr;
pub use params::{parameters, Parameters};
pub use poseidon::{
    domain_from_bytes, hash, hash_1, hash_2, hash_3, hash_4, hash_5, hash_6, hash_7, multi_hash,
};
