//! The indexed enumerator: a total, deterministic function from a
//! non-negative integer index to a syntactically valid IC graph.
//!
//! [`build_net`] is the candidate generator driving the search loop in
//! [`crate::search`]. It never fails except on capacity exhaustion, and it
//! is idempotent in `(index, capacity)`: the same index always produces the
//! same graph in a net of the same capacity.

use crate::agent::Agent;
use crate::error::Error;
use crate::net::{Net, AUX1, AUX2, PRINCIPAL};

/// Size cap from the construction schema: the ring has `3 + (index % SIZE_CAP)` nodes.
const SIZE_CAP: u64 = 10;

/// Resets `net` and deterministically constructs the graph for `index`.
///
/// The construction schema:
/// 1. `n = 3 + (index mod SIZE_CAP)`, `pattern = index div SIZE_CAP`.
/// 2. Node 0 is δ, node 1 is γ, their principal ports linked (the mandatory
///    active pair).
/// 3. Nodes `2..n` get a type chosen from two bits of `pattern`, keyed by
///    node index mod 16: `0 -> δ`, `1 -> γ`, `2 | 3 -> ε`.
/// 4. Every node is wired into a ring: principal-principal for non-adjacent
///    nodes two apart, and aux1/aux2 chained around the ring for all nodes.
///
/// Fails with [`Error::CapacityExhausted`] only when `n` exceeds the net's
/// capacity; otherwise every port ends up written and no port is left
/// dangling.
pub fn build_net(index: u64, net: &mut Net) -> Result<(), Error> {
  net.reset_for_build();

  let n = (3 + (index % SIZE_CAP)) as usize;
  let pattern = index / SIZE_CAP;

  if n > net.capacity() {
    return Err(Error::CapacityExhausted { needed: n, capacity: net.capacity() });
  }

  let delta = net.new_node(Agent::Delta).ok_or(Error::CapacityExhausted { needed: n, capacity: net.capacity() })?;
  let gamma = net.new_node(Agent::Gamma).ok_or(Error::CapacityExhausted { needed: n, capacity: net.capacity() })?;
  debug_assert_eq!(delta, 0);
  debug_assert_eq!(gamma, 1);
  net.connect(delta, PRINCIPAL, gamma, PRINCIPAL);

  for k in 2..n {
    let slot = (k % 16) as u64;
    let bits = (pattern >> (slot * 2)) & 0b11;
    let agent = Agent::from_bits(bits);
    let created = net.new_node(agent).ok_or(Error::CapacityExhausted { needed: n, capacity: net.capacity() })?;
    debug_assert_eq!(created, k);
  }

  for i in 0..n {
    let next = (i + 1) % n;
    let prev = (i + n - 1) % n;
    if i == 0 || i == 1 {
      net.connect(i, AUX1, next, AUX2);
      net.connect(i, AUX2, prev, AUX1);
    } else {
      net.connect(i, AUX1, next, AUX2);
      net.connect(i, AUX2, prev, AUX1);
      net.connect(i, PRINCIPAL, (i + 2) % n, PRINCIPAL);
    }
  }

  Ok(())
}

/// Enumeration cursor: the next index to build, advanced by [`next`].
#[derive(Clone, Copy, Debug, Default)]
pub struct EnumState {
  pub current_index: u64,
}

impl EnumState {
  pub fn new(start: u64) -> Self {
    EnumState { current_index: start }
  }
}

/// Builds the graph at `state.current_index` into `net`, then advances
/// `state`. Returns whatever [`build_net`] returned.
pub fn next(state: &mut EnumState, net: &mut Net) -> Result<(), Error> {
  let result = build_net(state.current_index, net);
  state.current_index += 1;
  result
}
