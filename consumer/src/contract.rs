//! Contract definitions for the Route Guide interactions.
//!
//! These are the JSON templates handed to the Pact protobuf plugin. The plugin owns the
//! matching-rule language, this module only renders the expressions and the `pact:` keys.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use serde_json::{json, Value};

/// Content type for Protobuf message bodies
pub const PROTOBUF_CONTENT_TYPE: &str = "application/protobuf";

/// Catalogue entry for the gRPC mock transport provided by the protobuf plugin
pub const GRPC_TRANSPORT: &str = "protobuf/transport/grpc";

/// Plugin to load for an interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginConfig {
  /// Plugin name
  pub name: String,
  /// Plugin version. If not set, the latest installed version is used.
  pub version: Option<String>
}

impl PluginConfig {
  pub fn new<S: Into<String>>(name: S, version: Option<String>) -> Self {
    PluginConfig { name: name.into(), version }
  }
}

impl Default for PluginConfig {
  fn default() -> Self {
    PluginConfig::new("protobuf", None)
  }
}

fn quote(value: &str) -> String {
  format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Matches any number, using the example value when generating contents
pub fn matching_number<N: Display>(example: N) -> String {
  format!("matching(number, {})", example)
}

/// Matches any value with the same type as the example
pub fn matching_type(example: &str) -> String {
  format!("matching(type, {})", quote(example))
}

/// Matches any non-empty value
pub fn not_empty(example: &str) -> String {
  format!("notEmpty({})", quote(example))
}

/// Matches values against a regular expression
pub fn matching_regex(regex: &str, example: &str) -> String {
  format!("matching(regex, {}, {})", quote(regex), quote(example))
}

/// Synchronous Protobuf request/response interaction for a single gRPC method
#[derive(Debug, Clone, PartialEq)]
pub struct ProtoInteraction {
  /// Proto file the service is defined in
  pub proto_file: PathBuf,
  /// Service and method, in the form `Service/Method`
  pub service: String,
  /// Content type of the messages
  pub content_type: String,
  /// Request message template
  pub request: Value,
  /// Response message template
  pub response: Option<Value>,
  /// Response metadata (i.e. `grpc-status` and `grpc-message`)
  pub response_metadata: Option<Value>
}

impl ProtoInteraction {
  /// Create an interaction for the given service method. The service must be in the form
  /// `Service/Method`.
  pub fn new<P: Into<PathBuf>>(proto_file: P, service: &str) -> anyhow::Result<Self> {
    match service.split_once('/') {
      Some((name, method)) if !name.is_empty() && !method.is_empty() && !method.contains('/') => {
        Ok(ProtoInteraction {
          proto_file: proto_file.into(),
          service: service.to_string(),
          content_type: PROTOBUF_CONTENT_TYPE.to_string(),
          request: json!({}),
          response: None,
          response_metadata: None
        })
      }
      _ => Err(anyhow!("'{}' is not a valid service, it must be in the form Service/Method", service))
    }
  }

  pub fn content_type(mut self, content_type: &str) -> Self {
    self.content_type = content_type.to_string();
    self
  }

  pub fn request(mut self, request: Value) -> Self {
    self.request = request;
    self
  }

  pub fn response(mut self, response: Value) -> Self {
    self.response = Some(response);
    self
  }

  pub fn response_metadata(mut self, metadata: Value) -> Self {
    self.response_metadata = Some(metadata);
    self
  }

  /// JSON contents to pass to the plugin
  pub fn to_json(&self) -> Value {
    let mut contents = json!({
      "pact:proto": self.proto_file.to_string_lossy(),
      "pact:proto-service": self.service,
      "pact:content-type": self.content_type,
      "request": self.request
    });
    if let Some(response) = &self.response {
      contents["response"] = response.clone();
    }
    if let Some(metadata) = &self.response_metadata {
      contents["responseMetadata"] = metadata.clone();
    }
    contents
  }
}

/// Absolute path to the Route Guide proto file
pub fn route_guide_proto() -> anyhow::Result<PathBuf> {
  let path = Path::new(env!("CARGO_MANIFEST_DIR"))
    .join("..")
    .join("proto")
    .join("route_guide.proto");
  path.canonicalize()
    .map_err(|err| anyhow!("Could not resolve the Route Guide proto file '{}' - {}", path.display(), err))
}

/// Interaction for `RouteGuide/GetFeature`: a named feature is returned for the point
pub fn get_feature_interaction(proto_file: &Path) -> anyhow::Result<ProtoInteraction> {
  Ok(ProtoInteraction::new(proto_file, "RouteGuide/GetFeature")?
    .request(json!({
      "latitude": matching_number(180),
      "longitude": matching_number(200)
    }))
    .response(json!({
      "name": not_empty("Big Tree"),
      "location": {
        "latitude": matching_number(180),
        "longitude": matching_number(200)
      }
    })))
}

/// Interaction for `RouteGuide/SaveFeature`: the saved feature is echoed back.
///
/// The response must contain at least one tag for the contract to be satisfied.
pub fn save_feature_interaction(proto_file: &Path) -> anyhow::Result<ProtoInteraction> {
  Ok(ProtoInteraction::new(proto_file, "RouteGuide/SaveFeature")?
    .request(json!({
      "name": not_empty("A shed"),
      "location": {
        "latitude": matching_number(99),
        "longitude": matching_number(99)
      }
    }))
    .response(json!({
      "name": not_empty("A shed"),
      "location": {
        "latitude": matching_number(99),
        "longitude": matching_number(99)
      },
      "tags": [
        matching_type("")
      ]
    })))
}

/// Interaction for `RouteGuide/SaveFeature` where the feature has no name and the provider
/// rejects it with an `INVALID_ARGUMENT` status
pub fn save_unnamed_feature_interaction(proto_file: &Path) -> anyhow::Result<ProtoInteraction> {
  Ok(ProtoInteraction::new(proto_file, "RouteGuide/SaveFeature")?
    .request(json!({
      "location": {
        "latitude": matching_number(99),
        "longitude": matching_number(99)
      }
    }))
    .response_metadata(json!({
      "grpc-status": "INVALID_ARGUMENT",
      "grpc-message": "Feature name is required"
    })))
}
