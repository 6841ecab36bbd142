//! Route Guide client used by the consumer

use std::time::Duration;

use anyhow::anyhow;
use tonic::{Request, Status};
use tonic::transport::{Channel, Endpoint};
use tracing::{debug, instrument};

use crate::routeguide::{Feature, Point, Rectangle};
use crate::routeguide::route_guide_client::RouteGuideClient;

/// Client for the Route Guide service. Every call is bound by the same deadline, and the
/// connection is released when the client is dropped.
#[derive(Debug, Clone)]
pub struct RouteGuideConsumer {
  client: RouteGuideClient<Channel>,
  timeout: Duration
}

impl RouteGuideConsumer {
  /// Connect to the service at the address, which can be either `host:port` or a URL.
  /// Connecting is bound by the timeout.
  pub async fn connect(address: &str, timeout: Duration) -> anyhow::Result<Self> {
    let uri = if address.contains("://") {
      address.to_string()
    } else {
      format!("http://{}", address)
    };
    debug!(%uri, ?timeout, "Connecting to Route Guide service");

    let endpoint = Endpoint::from_shared(uri.clone())
      .map_err(|err| anyhow!("'{}' is not a valid address - {}", address, err))?
      .connect_timeout(timeout);
    let channel = endpoint.connect().await
      .map_err(|err| anyhow!("Unable to communicate to gRPC server at {} - {}", uri, err))?;

    Ok(RouteGuideConsumer {
      client: RouteGuideClient::new(channel),
      timeout
    })
  }

  /// Deadline applied to each call
  pub fn timeout(&self) -> Duration {
    self.timeout
  }

  fn request<T>(&self, message: T) -> Request<T> {
    let mut request = Request::new(message);
    request.set_timeout(self.timeout);
    request
  }

  /// Fetch the feature at the given point
  #[instrument(skip(self), level = "debug")]
  pub async fn get_feature(&mut self, point: Point) -> Result<Feature, Status> {
    let request = self.request(point);
    let response = self.client.get_feature(request).await?;
    Ok(response.into_inner())
  }

  /// Store a feature, returning the version stored by the service
  #[instrument(skip(self), level = "debug")]
  pub async fn save_feature(&mut self, feature: Feature) -> Result<Feature, Status> {
    let request = self.request(feature);
    let response = self.client.save_feature(request).await?;
    Ok(response.into_inner())
  }

  /// Fetch all the features within the rectangle
  #[instrument(skip(self), level = "debug")]
  pub async fn list_features(&mut self, rectangle: Rectangle) -> Result<Vec<Feature>, Status> {
    let request = self.request(rectangle);
    let mut stream = self.client.list_features(request).await?.into_inner();
    let mut features = vec![];
    while let Some(feature) = stream.message().await? {
      features.push(feature);
    }
    debug!("Received {} features", features.len());
    Ok(features)
  }
}
