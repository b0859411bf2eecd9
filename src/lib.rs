//! `icsearch` is a research engine that searches for small
//! interaction-combinator (IC) graphs whose normal form encodes a solution
//! to an externally supplied predicate.
//!
//! The demonstration predicate bundled here is integer factorization: given
//! `N > 1`, the [`search`] driver enumerates candidate graphs via
//! [`enumerator::build_net`], reduces each one with [`Net::reduce`], and
//! asks [`reduce::has_valid_factor`] whether the terminal graph exposes a
//! factor pair.
//!
//! # Known limitation
//!
//! The factorization predicate used by [`reduce`] ("the surviving active δ
//! and γ node indices, each plus one, multiply to `N`") is ad-hoc and has no
//! formal connection to interaction-combinator semantics. It is implemented
//! exactly as originally specified because the search driver and its tests
//! are pinned to this behavior; a reimplementation aiming at genuine
//! factorization should replace it with a proper Church-numeral or
//! output-channel read-out instead of reading node indices.
//!
//! # Layout
//!
//! - [`agent`] -- the three combinator kinds (δ, γ, ε).
//! - [`net`] -- the fixed-capacity graph arena and its connection primitives.
//! - [`reduce`] -- the rewrite rules, the gas-bounded work loop, and the
//!   factorization side channel.
//! - [`enumerator`] -- the total `index -> graph` construction function.
//! - [`search`] -- the driver that ties enumeration, reduction, and the
//!   predicate together, including the optional parallel fan-out.
//! - [`dot`] -- read-only Graphviz export of a net's active nodes.
//! - [`config`] -- the optional TOML configuration file read by the CLI.
//! - [`error`] -- the crate's boundary error type.

pub mod agent;
pub mod config;
pub mod dot;
pub mod enumerator;
pub mod error;
pub mod net;
pub mod reduce;
pub mod search;

pub use agent::Agent;
pub use error::Error;
pub use net::Net;
pub use reduce::{has_valid_factor, ReduceOutcome};
