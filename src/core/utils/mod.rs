//! Filesystem helpers shared by the run coordinator.
//!
//! - `tree_walk`: sorted, predicate-gated recursive directory walk
//! - `fs`: encodings and atomic file replacement
//! - `ignore`: literal-path and glob exclusion of templates

pub mod fs;
pub mod ignore;
pub mod tree_walk;

pub use fs::*;
pub use ignore::*;
pub use tree_walk::*;
