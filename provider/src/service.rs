//! Route Guide gRPC service implementation

use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status};
use tracing::{debug, info, warn};

use crate::database::FeatureDatabase;
use crate::routeguide::{Feature, Point, Rectangle};
use crate::routeguide::route_guide_server::RouteGuide;

/// Route Guide service backed by a shared feature database
#[derive(Debug, Clone, Default)]
pub struct RouteGuideService {
  features: Arc<RwLock<FeatureDatabase>>
}

impl RouteGuideService {
  pub fn new(features: FeatureDatabase) -> Self {
    RouteGuideService {
      features: Arc::new(RwLock::new(features))
    }
  }

  /// Current snapshot of the feature database
  pub async fn features(&self) -> FeatureDatabase {
    self.features.read().await.clone()
  }
}

#[tonic::async_trait]
impl RouteGuide for RouteGuideService {
  async fn get_feature(&self, request: Request<Point>) -> Result<Response<Feature>, Status> {
    let point = request.into_inner();
    debug!(?point, "GetFeature");
    let feature = self.features.read().await.find(&point);
    match feature {
      Some(feature) => Ok(Response::new(feature)),
      None => Ok(Response::new(Feature {
        location: Some(point),
        .. Feature::default()
      }))
    }
  }

  type ListFeaturesStream = ReceiverStream<Result<Feature, Status>>;

  async fn list_features(
    &self,
    request: Request<Rectangle>
  ) -> Result<Response<Self::ListFeaturesStream>, Status> {
    let rectangle = request.into_inner();
    debug!(?rectangle, "ListFeatures");
    let (lo, hi) = match (rectangle.lo, rectangle.hi) {
      (Some(lo), Some(hi)) => (lo, hi),
      _ => return Err(Status::invalid_argument("Rectangle requires both the lo and hi points"))
    };

    let features = self.features.read().await.in_rectangle(&lo, &hi);
    let (tx, rx) = mpsc::channel(4);
    tokio::spawn(async move {
      for feature in features {
        if tx.send(Ok(feature)).await.is_err() {
          warn!("ListFeatures client went away before all features were sent");
          break;
        }
      }
    });

    Ok(Response::new(ReceiverStream::new(rx)))
  }

  async fn save_feature(&self, request: Request<Feature>) -> Result<Response<Feature>, Status> {
    let feature = request.into_inner();
    if feature.name.is_empty() {
      return Err(Status::invalid_argument("Feature name is required"));
    }
    if feature.location.is_none() {
      return Err(Status::invalid_argument("Feature location is required"));
    }

    info!(name = %feature.name, location = ?feature.location, "Saving feature");
    let saved = self.features.write().await.save(feature);
    Ok(Response::new(saved))
  }
}
