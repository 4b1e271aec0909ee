//! noisegraph CLI library.
//!
//! Graph file loading, the stderr logger, and the `validate`, `info`,
//! `sample` and `grid` command implementations used by the `noisegraph`
//! binary.

pub mod commands;
pub mod input;
pub mod logger;
