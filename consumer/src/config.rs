//! Configuration for the consumer contract tests, resolved from the environment

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::anyhow;
use tracing::debug;

use crate::contract::{GRPC_TRANSPORT, PluginConfig};

/// Default deadline for connecting and for each gRPC call
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings used to build the pact and start the mock transport
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumerConfig {
  /// Consumer name recorded in the pact file
  pub consumer: String,
  /// Provider name recorded in the pact file
  pub provider: String,
  /// Directory the pact files are written to
  pub pact_dir: PathBuf,
  /// Plugin that provides the Protobuf and gRPC support
  pub plugin: PluginConfig,
  /// Mock server catalogue entry to start
  pub transport: String,
  /// Host the mock transport is reached on
  pub host: String,
  /// Deadline for connecting and for each call
  pub call_timeout: Duration
}

impl Default for ConsumerConfig {
  fn default() -> Self {
    ConsumerConfig {
      consumer: "grpcconsumer".to_string(),
      provider: "grpcprovider".to_string(),
      pact_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("pacts"),
      plugin: PluginConfig::default(),
      transport: GRPC_TRANSPORT.to_string(),
      host: "127.0.0.1".to_string(),
      call_timeout: DEFAULT_CALL_TIMEOUT
    }
  }
}

impl ConsumerConfig {
  /// Load the configuration from the process environment. Empty variables are treated as not set.
  ///
  /// * `PACT_CONSUMER_NAME` / `PACT_PROVIDER_NAME` - participant names
  /// * `PACT_OUTPUT_DIR` - directory to write the pact files to
  /// * `PACT_PROTOBUF_PLUGIN_VERSION` - protobuf plugin version to load
  /// * `ROUTE_GUIDE_MOCK_HOST` - host the mock transport is reached on
  /// * `ROUTE_GUIDE_CALL_TIMEOUT_MS` - call deadline in milliseconds
  pub fn from_env() -> anyhow::Result<Self> {
    Self::from_lookup(|key| env::var(key).ok())
  }

  /// Load the configuration using the lookup function to resolve variables
  pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where F: Fn(&str) -> Option<String> {
    let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
    let defaults = ConsumerConfig::default();

    let call_timeout = match var("ROUTE_GUIDE_CALL_TIMEOUT_MS") {
      Some(value) => {
        let millis = value.trim().parse::<u64>()
          .map_err(|err| anyhow!("ROUTE_GUIDE_CALL_TIMEOUT_MS '{}' is not a valid number of milliseconds - {}", value, err))?;
        Duration::from_millis(millis)
      }
      None => defaults.call_timeout
    };

    let config = ConsumerConfig {
      consumer: var("PACT_CONSUMER_NAME").unwrap_or(defaults.consumer),
      provider: var("PACT_PROVIDER_NAME").unwrap_or(defaults.provider),
      pact_dir: var("PACT_OUTPUT_DIR").map(PathBuf::from).unwrap_or(defaults.pact_dir),
      plugin: PluginConfig {
        version: var("PACT_PROTOBUF_PLUGIN_VERSION"),
        .. defaults.plugin
      },
      transport: defaults.transport,
      host: var("ROUTE_GUIDE_MOCK_HOST").unwrap_or(defaults.host),
      call_timeout
    };
    debug!(?config, "Resolved consumer configuration");
    Ok(config)
  }

  /// Address of the mock transport running on the given port. IPv6 hosts are bracketed.
  pub fn mock_address(&self, port: u16) -> String {
    if self.host.contains(':') && !self.host.starts_with('[') {
      format!("[{}]:{}", self.host, port)
    } else {
      format!("{}:{}", self.host, port)
    }
  }
}
