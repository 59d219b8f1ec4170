// Path: crates/engine/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo
    )
)]
#![deny(unsafe_code)]

//! # T81 Engine
//!
//! Arbitrary-precision signed integers written and read as ternary text,
//! stored as base-81 limbs (four trits per byte).
//!
//! ## Key Features
//!
//! *   **Two-tier storage:** limb buffers below a configurable size live on the
//!     heap; larger ones are backed by an unlinked temporary file mapped into
//!     memory, so cold operands can be paged out by the OS.
//!
//! *   **Karatsuba multiplication** above a configurable cutoff, with a small
//!     result cache in front of it.
//!
//! *   **Ternary logic** (Kleene AND/OR/NOT plus mod-3 XOR) over trit arrays and
//!     over big-integer magnitudes.
//!
//! [`TernaryEngine`] is the entry point. The free functions in the submodules
//! are the same operations without instrumentation or caching.

pub mod arith;
pub mod convert;
pub mod derived;
pub mod div;
pub mod engine;
pub mod int;
pub mod logic;
pub mod mul;
pub mod stats;
pub mod storage;

pub use engine::TernaryEngine;
pub use int::{BigTernaryInt, Sign, SignedView};
pub use logic::TritArray;
pub use stats::StatsSnapshot;
pub use storage::{Allocator, LimbStorage, StorageKind, StoragePolicy, ThresholdPolicy};
pub use t81_types::config::{CachePolicy, EngineConfig};
pub use t81_types::error::TernaryError;
