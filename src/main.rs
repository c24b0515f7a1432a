use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use genvoice::{
  adapters::http::{
    DraftRouteDependencies, RequestIdMiddleware, configure_draft_routes, configure_health_routes,
    configure_reference_routes,
  },
  domain::invoice::{DraftRepository, DraftService, InvoiceExtractor},
  infrastructure::{
    config::{Config, StorageBackend},
    extraction::{GeminiConfig, GeminiExtractor, UnconfiguredExtractor},
    persistence::{FileDraftRepository, InMemoryDraftRepository},
  },
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "genvoice=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting genvoice");

  let config = Config::load().context("Failed to load configuration")?;
  tracing::info!("Configuration loaded successfully");

  let repository: Arc<dyn DraftRepository> = match config.storage.backend {
    StorageBackend::File => {
      let repo = FileDraftRepository::new(&config.storage.dir, &config.storage.key);
      tracing::info!(path = %repo.path().display(), "Using file draft storage");
      Arc::new(repo)
    }
    StorageBackend::Memory => {
      tracing::info!("Using in-memory draft storage");
      Arc::new(InMemoryDraftRepository::new())
    }
  };

  let extractor: Arc<dyn InvoiceExtractor> = match config.extraction.api_key() {
    Some(api_key) => {
      tracing::info!(model = %config.extraction.model, "Smart fill enabled");
      Arc::new(
        GeminiExtractor::new(GeminiConfig {
          api_key: api_key.to_string(),
          model: config.extraction.model.clone(),
          base_url: config.extraction.base_url.clone(),
          timeout: Duration::from_secs(config.extraction.timeout_seconds),
        })
        .context("Failed to create Gemini client")?,
      )
    }
    None => {
      tracing::warn!("No extraction API key configured, smart fill is disabled");
      Arc::new(UnconfiguredExtractor::new())
    }
  };

  let draft_service = Arc::new(
    DraftService::load(repository, extractor, config.draft_service()).await,
  );
  let deps = DraftRouteDependencies::new(draft_service);

  let server_host = config.server.host.clone();
  let server_port = config.server.port;
  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  HttpServer::new(move || {
    let deps = deps.clone();
    App::new()
      .wrap(Logger::default())
      .wrap(RequestIdMiddleware::new())
      .service(web::scope("/api/v1/draft").configure(|cfg| configure_draft_routes(cfg, deps)))
      .service(web::scope("/api/v1").configure(configure_reference_routes))
      .configure(configure_health_routes)
  })
  .bind((server_host.as_str(), server_port))
  .with_context(|| format!("Failed to bind {}:{}", server_host, server_port))?
  .run()
  .await
  .context("HTTP server error")?;

  Ok(())
}
