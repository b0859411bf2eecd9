use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use icsearch::config::Config;
use icsearch::dot;
use icsearch::enumerator::build_net;
use icsearch::net::Net;
use icsearch::search::{search, SearchOpts, SearchOutcome};

/// Searches for a small interaction-combinator graph whose normal form
/// encodes a factorization of N.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// The integer to factor. Must be greater than 1.
  n: u64,

  /// Maximum number of nodes in a candidate net.
  #[arg(short = 'm', long = "max-nodes")]
  max_nodes: Option<usize>,

  /// Reduction step budget ("gas") per candidate.
  #[arg(short = 'g', long = "gas-limit")]
  gas_limit: Option<u64>,

  /// Number of worker threads to fan the search out across.
  #[arg(short = 'j', long = "jobs")]
  jobs: Option<usize>,

  /// Highest index (exclusive) the search will try.
  #[arg(long = "index-ceiling", default_value_t = 1_000_000)]
  index_ceiling: u64,

  /// How many indices elapse between progress log lines.
  #[arg(long = "progress-interval")]
  progress_interval: Option<u64>,

  /// Optional TOML file supplying defaults for the options above.
  #[arg(long = "config")]
  config: Option<PathBuf>,

  /// Write the winning net's Graphviz DOT export to this path.
  #[arg(long = "dot")]
  dot: Option<PathBuf>,

  /// Increase log verbosity (-v for debug, -vv for trace).
  #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
  verbose: u8,
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  if cli.n <= 1 {
    eprintln!("N must be greater than 1, got {}", cli.n);
    process::exit(2);
  }

  let mut opts = SearchOpts { index_ceiling: cli.index_ceiling, ..SearchOpts::default() };

  if let Some(path) = &cli.config {
    match Config::load(path) {
      Ok(config) => opts = config.apply(opts),
      Err(err) => {
        eprintln!("{err}");
        process::exit(1);
      }
    }
  }

  if let Some(max_nodes) = cli.max_nodes {
    opts.max_nodes = max_nodes;
  }
  if let Some(gas_limit) = cli.gas_limit {
    opts.gas_limit = gas_limit;
  }
  if let Some(jobs) = cli.jobs {
    opts.jobs = jobs;
  }
  if let Some(progress_interval) = cli.progress_interval {
    opts.progress_interval = progress_interval;
  }

  let outcome = search(cli.n, opts, |index, found| {
    if found {
      info!(index, "solution found");
    } else {
      info!(index, "still searching");
    }
  });

  match outcome {
    SearchOutcome::Found { index, factor_a, factor_b } => {
      println!("found a solution at index {index}: {factor_a} * {factor_b} = {}", cli.n);

      if let Some(dot_path) = &cli.dot {
        if let Err(err) = write_dot(index, &opts, dot_path) {
          eprintln!("{err}");
          process::exit(1);
        }
        println!("wrote DOT export to {}", dot_path.display());
      }
    }
    SearchOutcome::Exhausted => {
      eprintln!("no solution found for N={} within the first {} indices", cli.n, opts.index_ceiling);
      process::exit(1);
    }
  }
}

/// Rebuilds and re-reduces the winning index (search threads don't retain
/// their nets past a found result) solely to render its DOT export.
fn write_dot(index: u64, opts: &SearchOpts, path: &std::path::Path) -> Result<(), icsearch::Error> {
  let mut net = Net::new(opts.max_nodes, opts.gas_limit);
  build_net(index, &mut net)?;
  net.reduce();
  let rendered = dot::render(&net);
  std::fs::write(path, rendered).map_err(|source| icsearch::Error::Io { path: path.to_owned(), source })
}

fn init_tracing(verbose: u8) {
  let default_level = match verbose {
    0 => Level::INFO,
    1 => Level::DEBUG,
    _ => Level::TRACE,
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));
  tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}
