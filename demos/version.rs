use camunda_api_client::Client;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let client = Client::new("http://localhost:8080/engine-rest")?;
    let version = client.engine().version().await?;
    let engines = client.engine().list().await?;

    dbg!(version, engines);

    Ok(())
}
