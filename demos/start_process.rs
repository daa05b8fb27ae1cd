use camunda_api_client::{Client, VariableValue};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    dotenvy::dotenv().ok();
    let client = Client::from_env()?;

    tracing::info!("Deploying process");

    let deployment = client
        .deployments()
        .create()
        .with_name("order-process")
        .with_duplicate_filtering(true)
        .with_resource_file("demos/order-process.bpmn")
        .send()
        .await?;

    tracing::info!(id = %deployment.deployment.id, "Deployed");

    tracing::info!("Creating process instance");

    let started = client
        .process_definitions()
        .by_key("order-process")
        .start_process_instance()
        .with_business_key("order-31243")
        .with_variable("orderId", 31243)
        .with_variable("total", VariableValue::double(99.95))
        .with_variables_in_return()
        .send()
        .await?;

    dbg!(started);

    Ok(())
}
