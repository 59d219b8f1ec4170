// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # T81 Types
//!
//! This crate is the foundational library for the T81 ternary arithmetic engine,
//! containing the error taxonomy and the configuration objects shared by the
//! rest of the workspace.
//!
//! ## Architectural Role
//!
//! As the base crate, `t81-types` has minimal dependencies and is itself a
//! dependency for every other crate in the workspace. Consumers of the engine
//! (console front ends, scripting bindings) depend on it to match on error
//! kinds without pulling in the arithmetic code.

/// Bytes of backing storage per limb. One limb is one base-81 digit.
pub const BYTES_PER_LIMB: usize = 1;
/// The radix of one limb: 3^4.
pub const LIMB_RADIX: u32 = 81;
/// The number of trits packed into one limb.
pub const TRITS_PER_LIMB: usize = 4;

/// A top-level, crate-wide `Result` type alias with a default error type.
pub type Result<T, E = crate::error::TernaryError> = std::result::Result<T, E>;

/// Configuration structures for the engine (`EngineConfig`, `CachePolicy`).
pub mod config;
/// The error taxonomy shared by every engine operation.
pub mod error;
