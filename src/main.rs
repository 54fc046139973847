mod config;
mod dtos;
mod error;
mod handler;
mod models;
mod routes;
mod service;
mod utils;

use std::sync::Arc;

use config::Config;
use dotenv::dotenv;
use routes::create_router;
use service::{
    compositor::PolaroidApiClient,
    image_host::build_image_host,
    pipeline::{PipelineSettings, PolaroidPipeline},
};
use tracing_subscriber::filter::LevelFilter;

#[derive(Clone)]
pub struct AppState {
    pub env: Config,
    pub pipeline: PolaroidPipeline,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        // One pooled client shared by the image host and the compositor.
        let http_client = reqwest::Client::new();

        let image_host = build_image_host(&config, http_client.clone());
        let compositor = Arc::new(PolaroidApiClient::new(
            http_client,
            config.compositor_url.clone(),
        ));
        let pipeline = PolaroidPipeline::new(image_host, compositor, PipelineSettings::from(&config));

        Self::with_pipeline(config, pipeline)
    }

    pub fn with_pipeline(config: Config, pipeline: PolaroidPipeline) -> Self {
        Self {
            env: config,
            pipeline,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    dotenv().ok();

    let config = match Config::init() {
        Ok(config) => config,
        Err(err) => {
            println!("🔥 Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    println!("🖼️  Image host: {}", config.image_host.to_str());
    println!("📮 Compositor: {}", config.compositor_url);
    println!(
        "⏱️  Timeouts: upload {:?}, compose {:?} (parallel uploads: {})",
        config.upload_timeout, config.compose_timeout, config.parallel_uploads
    );

    let app_state = Arc::new(AppState::new(config.clone()));
    let app = create_router(app_state);

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port)).await {
        Ok(listener) => listener,
        Err(err) => {
            println!("🔥 Failed to bind port {}: {:?}", config.port, err);
            std::process::exit(1);
        }
    };

    println!(
        "🚀 Server is running on http://localhost:{}",
        config.port
    );

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", err);
        std::process::exit(1);
    }
}
