//! Consumer contract tests for the Route Guide service.
//!
//! These load the Pact protobuf plugin, which provides the Protobuf and gRPC support and runs
//! the gRPC mock server. The plugin must be installed (see `pact-plugin-cli`).

use expectest::prelude::*;
use pact_consumer::mock_server::StartMockServerAsync;
use pact_consumer::prelude::*;
use tonic::Code;

use route_guide_consumer::client::RouteGuideConsumer;
use route_guide_consumer::config::ConsumerConfig;
use route_guide_consumer::contract::{
  get_feature_interaction,
  ProtoInteraction,
  route_guide_proto,
  save_feature_interaction,
  save_unnamed_feature_interaction
};
use route_guide_consumer::routeguide::{Feature, Point};

/// Start a gRPC mock server for the interaction and connect a client to it. The returned mock
/// server verifies the interaction and writes the pact file when it is dropped.
async fn mock_route_guide(
  config: &ConsumerConfig,
  description: &str,
  test_name: &str,
  interaction: ProtoInteraction
) -> (Box<dyn ValidatingMockServer>, RouteGuideConsumer) {
  let contents = interaction.to_json();
  let test_name = test_name.to_string();

  let mut pact_builder = PactBuilderAsync::new_v4(config.consumer.as_str(), config.provider.as_str());
  let mock_server = pact_builder
    .output_dir(config.pact_dir.clone())
    .using_plugin(config.plugin.name.as_str(), config.plugin.version.clone()).await
    .synchronous_message_interaction(description, |mut i| async move {
      i.contents_from(contents).await;
      i.test_name(test_name.as_str());
      i
    })
    .await
    .start_mock_server_async(Some(config.transport.as_str()), None)
    .await;

  let port = mock_server.url().port().expect("mock server URL has no port");
  let client = RouteGuideConsumer::connect(&config.mock_address(port), config.call_timeout).await
    .expect("unable to communicate to grpc server");
  (mock_server, client)
}

#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 1))]
async fn get_feature() {
  let config = ConsumerConfig::from_env().unwrap();
  let interaction = get_feature_interaction(&route_guide_proto().unwrap()).unwrap();
  let (_mock_server, mut client) = mock_route_guide(&config, "Route guide - GetFeature",
    "route_guide_pact::get_feature", interaction).await;

  let feature = client.get_feature(Point { latitude: 180, longitude: 200 }).await.unwrap();

  expect!(feature.name.as_str()).to(be_equal_to("Big Tree"));
  expect!(feature.location.map(|location| location.latitude)).to(be_some().value(180));
}

#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 1))]
async fn save_feature() {
  let config = ConsumerConfig::from_env().unwrap();
  let interaction = save_feature_interaction(&route_guide_proto().unwrap()).unwrap();
  let (_mock_server, mut client) = mock_route_guide(&config, "Route guide - SaveFeature",
    "route_guide_pact::save_feature", interaction).await;
  let feature = Feature {
    name: "A shed".to_string(),
    location: Some(Point { latitude: 99, longitude: 99 }),
    tags: vec![]
  };

  let response = client.save_feature(feature.clone()).await.unwrap();

  expect!(response.name.as_str()).to(be_equal_to(feature.name.as_str()));
  expect!(response.location.map(|location| location.latitude)).to(be_some().value(99));
  expect!(response.tags.is_empty()).to(be_false());
}

#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 1))]
async fn save_unnamed_feature() {
  let config = ConsumerConfig::from_env().unwrap();
  let interaction = save_unnamed_feature_interaction(&route_guide_proto().unwrap()).unwrap();
  let (_mock_server, mut client) = mock_route_guide(&config, "Route guide - SaveFeature without a name",
    "route_guide_pact::save_unnamed_feature", interaction).await;
  let feature = Feature {
    location: Some(Point { latitude: 99, longitude: 99 }),
    .. Feature::default()
  };

  let response = client.save_feature(feature).await;

  expect!(response.as_ref()).to(be_err());
  let status = response.unwrap_err();
  expect!(status.code()).to(be_equal_to(Code::InvalidArgument));
  expect!(status.message()).to(be_equal_to("Feature name is required"));
}

#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 1))]
#[should_panic]
async fn save_feature_with_an_empty_name_fails_the_contract() {
  let config = ConsumerConfig::from_env().unwrap();
  let interaction = save_feature_interaction(&route_guide_proto().unwrap()).unwrap();
  let (mock_server, mut client) = mock_route_guide(&config, "Route guide - SaveFeature",
    "route_guide_pact::save_feature_with_an_empty_name_fails_the_contract", interaction).await;

  // The name is required to be non-empty by the interaction
  let feature = Feature {
    location: Some(Point { latitude: 99, longitude: 99 }),
    .. Feature::default()
  };
  let _ = client.save_feature(feature).await;

  drop(client);
  drop(mock_server);
}
