//! Camunda OAuth example
//!
//! In order to run the example call:
//!
//! ```sh
//! export CAMUNDA_REST_URL='[REST API]'
//! export CAMUNDA_CLIENT_ID='[Client ID]'
//! export CAMUNDA_CLIENT_SECRET='[Client Secret]'
//! export CAMUNDA_AUTHORIZATION_SERVER_URL='[OAuth API]'
//!
//! cargo run --example oauth
//! ```
use camunda_api_client::Client;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter("camunda_api_client=trace")
        .init();

    let client = Client::from_env()?;
    let version = client.engine().version().await?;

    dbg!(version);

    Ok(())
}
