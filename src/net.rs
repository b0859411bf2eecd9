//! The graph store: a fixed-capacity arena of nodes, bidirectional port
//! links, and the primitives used to mutate them.

use std::collections::VecDeque;

use crate::agent::Agent;

/// Port index of the principal port. Only principal-principal links form
/// redexes.
pub const PRINCIPAL: u8 = 0;
/// Port index of the first auxiliary port.
pub const AUX1: u8 = 1;
/// Port index of the second auxiliary port.
pub const AUX2: u8 = 2;

/// A reference to one port of one node: `(node_index, port_index)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
  pub node: usize,
  pub port: u8,
}

impl Link {
  #[inline]
  pub fn new(node: usize, port: u8) -> Self {
    Link { node, port }
  }
}

/// A single node: its agent kind, its three ports, and whether it is still
/// live. Retired nodes (`active = false`) keep their storage slot until the
/// net is reset; they are never reused within a single reduction.
#[derive(Clone, Debug)]
pub struct Node {
  pub agent: Agent,
  pub ports: [Option<Link>; 3],
  pub active: bool,
}

impl Node {
  fn new(agent: Agent) -> Self {
    Node { agent, ports: [None, None, None], active: true }
  }
}

/// A bounded arena of nodes plus the bookkeeping a reduction needs: a redex
/// work-queue, a gas budget, and the factorization side channel.
///
/// The net owns its node vector and redex queue exclusively; node-to-node
/// references are non-owning indices whose validity is scoped to the net's
/// lifetime.
pub struct Net {
  nodes: Vec<Node>,
  capacity: usize,
  used: usize,

  pub gas_limit: u64,
  pub gas_used: u64,

  pub(crate) redexes: VecDeque<(usize, usize)>,

  /// The integer this net is being searched for a factorization of.
  pub input_n: u64,
  /// The first factor found by the side-channel predicate, if any.
  pub factor_a: u64,
  /// The second factor found by the side-channel predicate, if any.
  pub factor_b: u64,
  /// Whether the side-channel predicate has recorded a match.
  pub found: bool,
}

impl Net {
  /// Creates an empty net with room for `capacity` nodes and a reduction
  /// budget of `gas_limit` rewrite steps.
  pub fn new(capacity: usize, gas_limit: u64) -> Self {
    Net {
      nodes: Vec::with_capacity(capacity),
      capacity,
      used: 0,
      gas_limit,
      gas_used: 0,
      redexes: VecDeque::new(),
      input_n: 0,
      factor_a: 0,
      factor_b: 0,
      found: false,
    }
  }

  /// Clears the net back to its empty state, keeping `capacity` and
  /// `gas_limit`. Used by the search driver between candidates, before it
  /// sets `input_n` and calls `build_net` (see `§4.4`'s explicit "reset
  /// net; set input_N; build_net" order): a fresh candidate shouldn't
  /// inherit the side channel of the one before it.
  pub fn reset(&mut self) {
    self.reset_for_build();
    self.input_n = 0;
    self.factor_a = 0;
    self.factor_b = 0;
  }

  /// The narrower reset `build_net` performs on its own: `used`,
  /// `gas_used`, and `found` only. `input_n`/`factor_a`/`factor_b` are left
  /// alone, since the driver is responsible for setting `input_n` itself
  /// right before building a candidate, and `build_net` has no business
  /// clobbering it.
  pub(crate) fn reset_for_build(&mut self) {
    self.nodes.clear();
    self.used = 0;
    self.gas_used = 0;
    self.redexes.clear();
    self.found = false;
  }

  /// Number of node slots in use (including retired ones; retirement does
  /// not shrink `used`).
  #[inline]
  pub fn used_nodes(&self) -> usize {
    self.used
  }

  #[inline]
  pub fn capacity(&self) -> usize {
    self.capacity
  }

  #[inline]
  pub fn node(&self, index: usize) -> &Node {
    &self.nodes[index]
  }

  /// Retires a node in place. Used by the rewrite rules; storage is not
  /// reclaimed until the net is reset.
  pub(crate) fn set_active(&mut self, index: usize, active: bool) {
    self.nodes[index].active = active;
  }

  /// Appends a node with all ports unlinked and `active = true`. Returns
  /// `None` when the net is at capacity; the rewrite or enumerator calling
  /// this is responsible for treating that as `CapacityExhausted`.
  pub fn new_node(&mut self, agent: Agent) -> Option<usize> {
    if self.used == self.capacity {
      return None;
    }
    let index = self.used;
    self.nodes.push(Node::new(agent));
    self.used += 1;
    Some(index)
  }

  /// The single mutation primitive for links.
  ///
  /// Severs any prior link on either endpoint before writing the new
  /// mutual link, which is what lets the rewrite rules reason purely in
  /// terms of pre-read auxiliary peers: whichever end they reconnect,
  /// `connect` cleans up the old peer's back-link for them.
  ///
  /// Out-of-range indices or ports are silently ignored; no caller inside
  /// this crate ever constructs such arguments, so this is defensive only.
  pub fn connect(&mut self, a: usize, pa: u8, b: usize, pb: u8) {
    if a >= self.used || b >= self.used || pa > AUX2 || pb > AUX2 {
      return;
    }

    if let Some(old) = self.nodes[a].ports[pa as usize] {
      self.clear_port(old.node, old.port);
    }
    if let Some(old) = self.nodes[b].ports[pb as usize] {
      self.clear_port(old.node, old.port);
    }

    self.nodes[a].ports[pa as usize] = Some(Link::new(b, pb));
    self.nodes[b].ports[pb as usize] = Some(Link::new(a, pa));

    if pa == PRINCIPAL && pb == PRINCIPAL && self.nodes[a].active && self.nodes[b].active {
      self.redexes.push_back((a, b));
    }
  }

  /// Clears a single port to unlinked, without touching its peer. Only
  /// valid when the caller already knows the peer side is being rewritten
  /// too (used internally by `connect` and the rewrite rules).
  fn clear_port(&mut self, node: usize, port: u8) {
    if node < self.nodes.len() {
      self.nodes[node].ports[port as usize] = None;
    }
  }

  /// Invariant 4: whether `(a, b)` is currently a genuine active pair.
  /// Queue entries are advisory and must be revalidated against this before
  /// a rewrite is applied.
  pub fn is_active_pair(&self, a: usize, b: usize) -> bool {
    if a >= self.used || b >= self.used {
      return false;
    }
    let na = &self.nodes[a];
    let nb = &self.nodes[b];
    na.active
      && nb.active
      && na.ports[PRINCIPAL as usize] == Some(Link::new(b, PRINCIPAL))
      && nb.ports[PRINCIPAL as usize] == Some(Link::new(a, PRINCIPAL))
  }

  /// Iterator over the indices of currently active nodes, in ascending
  /// order.
  pub fn active_indices(&self) -> impl Iterator<Item = usize> + '_ {
    (0..self.used).filter(move |&i| self.nodes[i].active)
  }
}
