//! In-memory feature database, loaded from the route guide JSON file

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::anyhow;
use serde::Deserialize;
use tracing::debug;

use crate::routeguide::{Feature, Point};

/// Location entry in the database file
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
struct Location {
  latitude: i32,
  longitude: i32
}

/// Feature entry in the database file
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
struct FeatureEntry {
  location: Location,
  name: String,
  #[serde(default)]
  tags: Vec<String>
}

impl From<FeatureEntry> for Feature {
  fn from(entry: FeatureEntry) -> Self {
    Feature {
      name: entry.name,
      location: Some(Point {
        latitude: entry.location.latitude,
        longitude: entry.location.longitude
      }),
      tags: entry.tags
    }
  }
}

/// Features known to the provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureDatabase {
  features: Vec<Feature>
}

impl FeatureDatabase {
  /// Create a database with the given features
  pub fn new(features: Vec<Feature>) -> Self {
    FeatureDatabase { features }
  }

  /// Load the features from a JSON database file
  pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
    let path = path.as_ref();
    debug!(?path, "Loading feature database");
    let file = File::open(path)
      .map_err(|err| anyhow!("Could not open feature database '{}' - {}", path.display(), err))?;
    let entries: Vec<FeatureEntry> = serde_json::from_reader(BufReader::new(file))
      .map_err(|err| anyhow!("Feature database '{}' is not valid - {}", path.display(), err))?;
    Ok(Self::from_entries(entries))
  }

  /// Parse the features from JSON
  pub fn from_json(json: &str) -> anyhow::Result<Self> {
    let entries: Vec<FeatureEntry> = serde_json::from_str(json)?;
    Ok(Self::from_entries(entries))
  }

  fn from_entries(entries: Vec<FeatureEntry>) -> Self {
    FeatureDatabase {
      features: entries.into_iter().map(Feature::from).collect()
    }
  }

  pub fn len(&self) -> usize {
    self.features.len()
  }

  pub fn is_empty(&self) -> bool {
    self.features.is_empty()
  }

  /// Feature stored at exactly the given point
  pub fn find(&self, point: &Point) -> Option<Feature> {
    self.features.iter()
      .find(|feature| feature.location.as_ref() == Some(point))
      .cloned()
  }

  /// All features within the rectangle formed by the two corners (bounds are inclusive, and
  /// the corners can be given in any order)
  pub fn in_rectangle(&self, lo: &Point, hi: &Point) -> Vec<Feature> {
    let left = lo.longitude.min(hi.longitude);
    let right = lo.longitude.max(hi.longitude);
    let bottom = lo.latitude.min(hi.latitude);
    let top = lo.latitude.max(hi.latitude);

    self.features.iter()
      .filter(|feature| match &feature.location {
        Some(location) => location.longitude >= left && location.longitude <= right &&
          location.latitude >= bottom && location.latitude <= top,
        None => false
      })
      .cloned()
      .collect()
  }

  /// Store the feature, replacing any existing feature at the same location
  pub fn save(&mut self, feature: Feature) -> Feature {
    match self.features.iter_mut().find(|existing| existing.location == feature.location) {
      Some(existing) => {
        debug!(location = ?feature.location, "Replacing existing feature");
        *existing = feature.clone();
      }
      None => self.features.push(feature.clone())
    }
    feature
  }
}
