//! The optional `--config` TOML file read by the CLI.
//!
//! Every field is optional: an absent key falls back to the built-in
//! default encoded in [`crate::search::SearchOpts::default`]. CLI flags, in
//! turn, override whatever the config file supplies. The library never
//! reads this file itself; only the binary (`main.rs`) does.

use std::path::Path;

use serde::Deserialize;

use crate::error::Error;
use crate::search::SearchOpts;

/// Deserialized shape of the config file. All fields optional so that a
/// config supplying only `jobs`, say, still layers correctly over defaults.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
  pub max_nodes: Option<usize>,
  pub gas_limit: Option<u64>,
  pub jobs: Option<usize>,
  pub progress_interval: Option<u64>,
}

impl Config {
  /// Reads and parses a TOML config file.
  pub fn load(path: &Path) -> Result<Config, Error> {
    let contents = std::fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_owned(), source })?;
    toml::from_str(&contents).map_err(|source| Error::Config { path: path.to_owned(), source })
  }

  /// Layers this config's present fields over `base`, returning the result.
  /// Fields absent from the config keep `base`'s value.
  pub fn apply(&self, base: SearchOpts) -> SearchOpts {
    SearchOpts {
      max_nodes: self.max_nodes.unwrap_or(base.max_nodes),
      gas_limit: self.gas_limit.unwrap_or(base.gas_limit),
      jobs: self.jobs.unwrap_or(base.jobs),
      progress_interval: self.progress_interval.unwrap_or(base.progress_interval),
      ..base
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  #[test]
  fn absent_keys_fall_back_to_defaults() {
    let config = Config::default();
    let applied = config.apply(SearchOpts::default());
    assert_eq!(applied.max_nodes, SearchOpts::default().max_nodes);
    assert_eq!(applied.gas_limit, SearchOpts::default().gas_limit);
  }

  #[test]
  fn present_keys_override_defaults() {
    let config = Config { jobs: Some(8), ..Config::default() };
    let applied = config.apply(SearchOpts::default());
    assert_eq!(applied.jobs, 8);
    assert_eq!(applied.max_nodes, SearchOpts::default().max_nodes);
  }

  #[test]
  fn load_parses_a_toml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "max_nodes = 250\ngas_limit = 50000\n").unwrap();
    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.max_nodes, Some(250));
    assert_eq!(config.gas_limit, Some(50000));
    assert_eq!(config.jobs, None);
  }

  #[test]
  fn load_missing_file_is_an_io_error() {
    let err = Config::load(Path::new("/nonexistent/icsearch.toml")).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
  }

  #[test]
  fn load_malformed_toml_is_a_config_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "max_nodes = this is not valid toml").unwrap();
    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
  }
}
