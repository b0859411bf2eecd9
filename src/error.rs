//! The crate's error type.
//!
//! Reduction and the graph-store primitives are infallible by design (see
//! the crate-level docs): `new_node` returns `Option`, `connect` is a silent
//! no-op on bad input, and `reduce` reports exhaustion through
//! [`crate::reduce::ReduceOutcome`] rather than `Result`. `Error` is reserved
//! for the boundary operations that really can fail: building a graph for an
//! index too large for the net's capacity, a search that ran out of indices,
//! and reading the optional CLI config file.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("net is full: cannot build a {needed}-node graph in a capacity-{capacity} net")]
  CapacityExhausted { needed: usize, capacity: usize },

  #[error("search exhausted the index ceiling {ceiling} without finding a solution")]
  Exhausted { ceiling: u64 },

  #[error("could not read config file {path}", path = path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("could not parse config file {path}", path = path.display())]
  Config {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },
}
