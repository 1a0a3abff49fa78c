//! Contract type descriptions and canonical key derivation.
//!
//! # Responsibility
//! - Model (possibly parameterized) contract types as an explicit tree.
//! - Derive the canonical lookup key used to index generic contracts.
//! - Parse textual signatures such as `Provider<List<Foo>>`.
//!
//! # Invariants
//! - Key derivation is pure and deterministic.
//! - Wildcard arguments never contribute to a key.
//! - Argument order is significant and preserved.

pub mod key;
pub mod parse;
pub mod type_signature;
