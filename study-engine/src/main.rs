use std::sync::Arc;

use clap::Parser;

use study_engine::catalog::Catalog;
use study_engine::config::CliArgs;
use study_engine::recommender::Recommender;
use study_engine::server::StudyServer;
use study_engine::transport::NdjsonTransport;

fn main() {
	let args = CliArgs::parse();

	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
		)
		.init();

	let sources = args.catalog_sources();
	let recommender = match Catalog::load(&sources)
		.and_then(|catalog| Recommender::new(catalog, args.index_config()))
	{
		Ok(r) => r,
		Err(e) => {
			tracing::error!("Startup failed: {}", e);
			std::process::exit(1);
		}
	};

	let transport = NdjsonTransport::new();
	let mut server = StudyServer::new(transport, Arc::new(recommender), sources, args.top_n);

	tracing::info!("study-engine ready");

	if let Err(e) = server.run() {
		tracing::error!("Server error: {}", e);
		std::process::exit(1);
	}
}
