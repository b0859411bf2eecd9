//! Read-only Graphviz (DOT) export of a net's active nodes and their links.
//!
//! This is a collaborator, not core: it only reads [`Net`] through its
//! public inspection surface (`active_indices`, `node`) and renders standard
//! `digraph` syntax, one node statement per active node and one edge
//! statement per distinct link (a link is rendered once, from the lower
//! node index's side, to avoid printing each bidirectional pair twice).
//! A link to a retired peer (e.g. the erasure rule's surviving node still
//! pointing at its now-inactive ε) is skipped, so every rendered edge stays
//! within the active subgraph.

use std::fmt::Write as _;

use crate::agent::Agent;
use crate::net::Net;

fn shape(agent: Agent) -> &'static str {
  match agent {
    Agent::Delta => "triangle",
    Agent::Gamma => "invtriangle",
    Agent::Epsilon => "circle",
  }
}

/// Renders the active subgraph of `net` as a Graphviz `digraph`.
///
/// Node labels combine the agent's glyph with its index (e.g. `"δ3"`); edges
/// are labeled with the pair of port indices they connect (e.g. `"1:2"`).
pub fn render(net: &Net) -> String {
  let mut out = String::new();
  writeln!(out, "digraph net {{").unwrap();
  writeln!(out, "  node [fontname=\"monospace\"];").unwrap();

  for i in net.active_indices() {
    let node = net.node(i);
    writeln!(out, "  n{i} [label=\"{}{i}\", shape={}];", node.agent.label(), shape(node.agent)).unwrap();
  }

  for i in net.active_indices() {
    let node = net.node(i);
    for (port, link) in node.ports.iter().enumerate() {
      let Some(link) = link else { continue };
      if !net.node(link.node).active {
        continue;
      }
      // Render each undirected pair once, from its lower-indexed endpoint
      // (or, for a self-loop, its lower port).
      if link.node < i || (link.node == i && (link.port as usize) < port) {
        continue;
      }
      writeln!(out, "  n{i} -> n{} [label=\"{port}:{}\", dir=none];", link.node, link.port).unwrap();
    }
  }

  writeln!(out, "}}").unwrap();
  out
}
