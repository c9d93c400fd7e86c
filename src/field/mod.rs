//! BLS12-377 scalar field (Fr) operations.
//!
//! This module provides the Fr type hashed by Poseidon377. The same prime
//! is the base field of decaf377, which is where the published parameter
//! set comes from.
//!
//! Encodings accepted from outside (decimal, hex, fixed 32-byte LE) must be
//! canonical. Arbitrary byte strings, such as domain separators, go through
//! [`Fr::from_le_bytes_mod_order`] and are reduced instead.

mod fr;

pub use fr::Fr;

// Include generated modulus constants
include!(concat!(env!("OUT_DIR"), "/modulus_generated.rs"));
