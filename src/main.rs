use clap::Parser;
use dotenv::dotenv;
use tracing::info;
use crate::config::Config;

pub mod clients;
pub mod config;
pub mod controller;
pub mod helpers;
pub mod models;

#[cfg(test)]
mod test_support;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::parse();
    info!(
        "Relaying bookings for apartment {} to {}",
        config.house_id.as_deref().unwrap_or("<unset>"),
        config.smoobu_api_url,
    );

    controller::serve(config).await
}
