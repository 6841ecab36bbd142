//! Route Guide gRPC provider.
//!
//! Serves the `RouteGuide` service from an in-memory feature database. It is used to exercise
//! the consumer client against a real server.

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::routeguide::route_guide_server::RouteGuideServer;
use crate::service::RouteGuideService;

/// Generated Route Guide messages and server stubs
pub mod routeguide {
  tonic::include_proto!("routeguide");
}

pub mod database;
pub mod service;

/// Feature database bundled with the provider
pub const DEFAULT_DATABASE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/route_guide_db.json");

pub fn setup_logger(log_level: Level) {
  let subscriber = FmtSubscriber::builder()
    .with_max_level(log_level)
    .finish();

  if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
    eprintln!("WARN: Failed to initialise global tracing subscriber - {err}");
  };
}

/// Serve the Route Guide service on the already bound listener. Runs until the server fails.
pub async fn serve(listener: TcpListener, service: RouteGuideService) -> anyhow::Result<()> {
  let address = listener.local_addr()?;
  info!("RouteGuide listening on {}", address);

  Server::builder()
    .add_service(RouteGuideServer::new(service))
    .serve_with_incoming(TcpListenerStream::new(listener))
    .await?;

  Ok(())
}
