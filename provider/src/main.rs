use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, Level};

use route_guide_provider::{DEFAULT_DATABASE, serve, setup_logger};
use route_guide_provider::database::FeatureDatabase;
use route_guide_provider::service::RouteGuideService;

#[derive(Parser, Debug)]
#[clap(about, version)]
struct Cli {
  #[clap(long, default_value = "127.0.0.1", env = "ROUTE_GUIDE_HOST")]
  /// Host interface to bind to
  host: String,

  #[clap(short, long, default_value_t = 10000, env = "ROUTE_GUIDE_PORT")]
  /// Port to listen on
  port: u16,

  #[clap(long, env = "ROUTE_GUIDE_DB_FILE")]
  /// Feature database file. Defaults to the bundled route guide database.
  db_file: Option<PathBuf>,

  #[clap(short, long)]
  /// Enable debug level logs
  debug: bool,

  #[clap(short, long)]
  /// Enable trace level logs
  trace: bool
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
  let db_file = cli.db_file.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE));
  let features = FeatureDatabase::load(&db_file)?;
  let listener = TcpListener::bind((cli.host.as_str(), cli.port)).await?;
  serve(listener, RouteGuideService::new(features)).await
}

#[tokio::main]
async fn main() -> Result<(), ExitCode> {
  let cli = Cli::parse();

  let log_level = if cli.trace {
    Level::TRACE
  } else if cli.debug {
    Level::DEBUG
  } else {
    Level::INFO
  };
  setup_logger(log_level);

  run(&cli).await.map_err(|err| {
    error!("error - {}", err);
    ExitCode::FAILURE
  })
}
