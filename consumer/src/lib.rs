//! Consumer side of the Route Guide gRPC contract tests.
//!
//! The contract tests themselves live in `tests/`; this crate provides the generated client
//! stubs, a deadline bound client wrapper and the contract definitions handed to the Pact
//! protobuf plugin.

/// Generated Route Guide messages and client stubs
pub mod routeguide {
  tonic::include_proto!("routeguide");
}

pub mod client;
pub mod config;
pub mod contract;
