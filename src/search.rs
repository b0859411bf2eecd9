//! The search driver: binds the enumerator and the reduction engine into a
//! loop over candidate indices, with an optional scoped-thread parallel
//! fan-out.
//!
//! The driver owns the upper bound on indices, the progress callback
//! cadence, and the decision to parallelize; neither the enumerator nor the
//! reduction engine know about any of this.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use tracing::{debug, info, instrument};

use crate::enumerator::build_net;
use crate::error::Error;
use crate::net::Net;
use crate::reduce::has_valid_factor;

/// How a search concluded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
  /// A solution was found at this index; `factor_a * factor_b == n`.
  Found { index: u64, factor_a: u64, factor_b: u64 },
  /// The index ceiling was reached without a solution.
  Exhausted,
}

/// Parameters governing a search run. Mirrors the CLI's `-m`/`-g`/`-j`
/// flags plus the internal index ceiling and progress cadence.
#[derive(Clone, Copy, Debug)]
pub struct SearchOpts {
  pub max_nodes: usize,
  pub gas_limit: u64,
  /// One past the highest index the search will try.
  pub index_ceiling: u64,
  /// How many indices elapse between `found=false` progress callbacks.
  pub progress_interval: u64,
  /// Number of worker threads. `1` runs single-threaded with no thread
  /// spawned at all.
  pub jobs: usize,
}

impl Default for SearchOpts {
  fn default() -> Self {
    SearchOpts { max_nodes: 100, gas_limit: 100_000, index_ceiling: 1_000_000, progress_interval: 1_000, jobs: 1 }
  }
}

/// Searches indices `0..opts.index_ceiling` for a net whose reduction
/// exposes a factorization of `n`, calling `progress` periodically.
///
/// Single-threaded when `opts.jobs <= 1`; otherwise fans out across
/// `opts.jobs` scoped worker threads, each owning a private range and a
/// private [`Net`], coordinated by a shared atomic "found" flag and a shared
/// atomic minimum solution index.
#[instrument(skip(progress))]
pub fn search(n: u64, opts: SearchOpts, progress: impl Fn(u64, bool) + Sync) -> SearchOutcome {
  info!(n, max_nodes = opts.max_nodes, gas_limit = opts.gas_limit, jobs = opts.jobs, "starting search");

  let outcome = if opts.jobs <= 1 {
    search_range(n, opts, 0, opts.index_ceiling, &progress)
  } else {
    search_parallel(n, opts, &progress)
  };

  info!(?outcome, "search finished");
  outcome
}

/// Single-threaded search over the half-open index range `[start, end)`.
#[instrument(skip(progress))]
fn search_range(n: u64, opts: SearchOpts, start: u64, end: u64, progress: &(impl Fn(u64, bool) + Sync)) -> SearchOutcome {
  let mut net = Net::new(opts.max_nodes, opts.gas_limit);

  for index in start..end {
    net.reset();
    net.input_n = n;
    match build_net(index, &mut net) {
      Ok(()) => {}
      Err(Error::CapacityExhausted { .. }) => continue,
      Err(_) => continue,
    }

    debug!(index, "reducing candidate");
    net.reduce();

    if has_valid_factor(&net, n) {
      info!(index, factor_a = net.factor_a, factor_b = net.factor_b, "solution found");
      progress(index, true);
      return SearchOutcome::Found { index, factor_a: net.factor_a, factor_b: net.factor_b };
    }

    if opts.progress_interval > 0 && index % opts.progress_interval == 0 {
      progress(index, false);
    }
  }

  SearchOutcome::Exhausted
}

/// Scoped-thread fan-out: partitions `[0, opts.index_ceiling)` into
/// `opts.jobs` contiguous, increasing ranges, one per worker. Workers poll a
/// shared `AtomicBool` stop flag between indices (never mid-reduction) and
/// publish their solution index through a shared `AtomicUsize` via a
/// compare-exchange retry loop, so the minimum winning index survives ties.
fn search_parallel(n: u64, opts: SearchOpts, progress: &(impl Fn(u64, bool) + Sync)) -> SearchOutcome {
  let jobs = opts.jobs.max(1);
  let ceiling = opts.index_ceiling;
  let chunk = ceiling.div_ceil(jobs as u64).max(1);

  let stop = AtomicBool::new(false);
  let winner = AtomicUsize::new(usize::MAX);
  let mut factors = vec![None; jobs];
  let factors = std::sync::Mutex::new(&mut factors);

  thread::scope(|scope| {
    let mut handles = Vec::with_capacity(jobs);
    for worker in 0..jobs {
      let start = worker as u64 * chunk;
      let end = (start + chunk).min(ceiling);
      if start >= end {
        continue;
      }
      let stop = &stop;
      let winner = &winner;
      let factors = &factors;
      handles.push(scope.spawn(move || {
        let mut net = Net::new(opts.max_nodes, opts.gas_limit);
        for index in start..end {
          if stop.load(Ordering::Relaxed) {
            break;
          }
          net.reset();
          net.input_n = n;
          if build_net(index, &mut net).is_err() {
            continue;
          }
          net.reduce();
          if has_valid_factor(&net, n) {
            stop.store(true, Ordering::Relaxed);
            let mut current = winner.load(Ordering::Relaxed);
            while index < current as u64 {
              match winner.compare_exchange_weak(current, index as usize, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => {
                  factors.lock().unwrap()[worker] = Some((index, net.factor_a, net.factor_b));
                  break;
                }
                Err(observed) => current = observed,
              }
            }
            break;
          }
          if opts.progress_interval > 0 && index % opts.progress_interval == 0 {
            progress(index, false);
          }
        }
      }));
    }
    for handle in handles {
      let _ = handle.join();
    }
  });

  let winning_index = winner.load(Ordering::Relaxed);
  if winning_index == usize::MAX {
    return SearchOutcome::Exhausted;
  }

  let factors = factors.lock().unwrap();
  let (index, factor_a, factor_b) =
    factors.iter().flatten().find(|(index, _, _)| *index as usize == winning_index).copied().unwrap_or((winning_index as u64, 0, 0));

  progress(index, true);
  SearchOutcome::Found { index, factor_a, factor_b }
}
