use std::path::Path;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpServer;
use actix_web::middleware;
use actix_web::web;
use tracing::info;

use crate::Result;
use crate::api::AppState;
use crate::api::graph_routes;
use crate::api::health_routes;
use crate::config::Config;
use crate::config::load_config;
use crate::constants::ENGINE_NAME;
use crate::crawler::AddressGraphCrawler;
use crate::err_with_loc;
use crate::tracing::setup_tracing;
use crate::upstream::BlockscoutClient;

/// The HTTP service: one shared crawler behind the graph endpoint.
#[derive(Clone)]
pub struct GraphServer {
    pub config: Config,
    pub crawler: AddressGraphCrawler,
}

impl GraphServer {
    pub async fn run(config_path: impl AsRef<Path>) -> Result<()> {
        let config = load_config(config_path.as_ref())
            .map_err(|e| err_with_loc!(format!("failed to load {}: {}", config_path.as_ref().display(), e)))?;

        let _tracing_guard = setup_tracing(ENGINE_NAME, &config.logging)?;
        info!("starting_address_graph::config::{}", config_path.as_ref().display());

        let server = GraphServer::new(config)?;
        server.serve().await?;

        info!("address_graph::shutdown");
        Ok(())
    }

    pub fn new(config: Config) -> Result<Self> {
        let client = BlockscoutClient::new(&config.upstream, &config.graph).map_err(|e| err_with_loc!(e))?;
        info!(
            "blockscout_client::created::base_url::{}::rate_limit::{}",
            config.upstream.base_url, config.upstream.rate_limit
        );

        let crawler = AddressGraphCrawler::new(Arc::new(client), Arc::new(config.graph.clone()));
        Ok(Self { config, crawler })
    }

    pub async fn serve(self) -> Result<()> {
        let app_state = web::Data::new(AppState {
            crawler: self.crawler.clone(),
        });
        let allowed_origins = self.config.server.allowed_origins.clone();

        let mut http_server = HttpServer::new(move || {
            App::new()
                .wrap(middleware::Logger::default())
                .wrap(cors(&allowed_origins))
                .app_data(app_state.clone())
                .service(graph_routes())
                .service(health_routes())
        });
        if let Some(workers) = self.config.server.workers {
            http_server = http_server.workers(workers);
        }

        let host = self.config.server.host.clone();
        let port = self.config.server.port;
        let http_server = http_server
            .bind((host.as_str(), port))
            .map_err(|e| err_with_loc!(format!("failed to bind {}:{}: {}", host, port, e)))?;

        info!("api_server_listening::{}:{}", host, port);
        http_server.run().await?;
        Ok(())
    }
}

/// Any origin when none are configured, otherwise only the listed ones.
pub fn cors(allowed_origins: &[String]) -> Cors {
    if allowed_origins.is_empty() {
        return Cors::default().allow_any_origin().allow_any_method().allow_any_header();
    }

    allowed_origins
        .iter()
        .fold(Cors::default().allowed_methods(vec!["GET"]).allow_any_header(), |cors, origin| {
            cors.allowed_origin(origin)
        })
}
