//! The three interaction-combinator agent kinds.

/// An agent kind: one of the three primitive interaction combinators.
///
/// `Delta` and `Gamma` are binary combinators with one principal port and two
/// auxiliary ports; `Epsilon` is the eraser. `Epsilon` nodes are still given
/// three ports for storage uniformity with `Delta`/`Gamma`, but only port 0
/// (the principal port) ever participates in a rewrite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Agent {
  Delta,
  Gamma,
  Epsilon,
}

impl Agent {
  /// Maps a 2-bit pattern to an agent kind, per the enumerator's construction
  /// schema: `0 -> Delta`, `1 -> Gamma`, `2 | 3 -> Epsilon`.
  #[inline]
  pub fn from_bits(bits: u64) -> Agent {
    match bits & 0b11 {
      0 => Agent::Delta,
      1 => Agent::Gamma,
      _ => Agent::Epsilon,
    }
  }

  #[inline]
  pub fn label(&self) -> &'static str {
    match self {
      Agent::Delta => "δ",
      Agent::Gamma => "γ",
      Agent::Epsilon => "ε",
    }
  }
}
