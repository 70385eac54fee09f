//! Blockfall (workspace facade crate).
//!
//! The rules live in `blockfall-core`, the timer-driven session in
//! `blockfall-runtime` and plain data in `blockfall-types`. This package
//! re-exports them under one name and adds the terminal front end used by the
//! `blockfall` binary.

pub use blockfall_core as core;
pub use blockfall_runtime as runtime;
pub use blockfall_types as types;

pub mod input;
pub mod term;
