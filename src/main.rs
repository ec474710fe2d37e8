// src/main.rs
//! crate-packer: 3D Container Packing Service
//!
//! A Rust service that solves the container-loading problem with the
//! extreme-point algorithm. Places cuboid cargo into a container considering:
//! - Weight limits
//! - Coplanar support under each placement
//! - Same-family stacking limits
//! - Center-of-gravity balance

mod aggregator;
mod api;
mod config;
mod consts;
mod engine;
mod feasibility;
mod model;
mod normalizer;
mod orderer;
mod placer;
mod statistics;

use config::AppConfig;

#[tokio::main]
async fn main() {
    if let Err(err) = dotenvy::dotenv() {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("⚠️ Could not load .env: {}", err);
        }
    }

    let app_config = AppConfig::from_env();

    println!("🚀 Packing Service starting...");
    api::start_api_server(app_config.api).await;
}
