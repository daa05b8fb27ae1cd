use camunda_api_client::external_task::{
    CompleteExternalTask, ExternalTaskFailure, FetchTopic, LockedExternalTask,
};
use camunda_api_client::{Client, VariableValue, Variables};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const WORKER_ID: &str = "payment-worker";
const TOPIC: &str = "payment-service";
const LOCK_DURATION: u64 = 30_000;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    dotenvy::dotenv().ok();
    let client = Client::from_env()?;

    tracing::info!("Launching worker");

    loop {
        let tasks = client
            .external_tasks()
            .fetch_and_lock()
            .with_worker_id(WORKER_ID)
            .with_max_tasks(5)
            .with_async_response_timeout(20_000)
            .with_topic(FetchTopic::new(TOPIC, LOCK_DURATION).with_variables(["orderId"]))
            .send()
            .await;

        let tasks = match tasks {
            Ok(tasks) => tasks,
            Err(err) => {
                tracing::error!(%err, "fetching tasks failed");
                tokio::time::sleep(Duration::from_secs(5)).await;
                continue;
            }
        };

        for task in tasks {
            if let Err(err) = handle_task(&client, task).await {
                tracing::error!(%err, "reporting task result failed");
            }
        }
    }
}

async fn handle_task(client: &Client, task: LockedExternalTask) -> camunda_api_client::Result<()> {
    let resource = client.external_tasks().by_id(&task.task.id);

    let order_id = task
        .variables
        .get("orderId")
        .and_then(|value| value.value_as::<i64>().ok());

    match order_id {
        Some(order_id) => {
            tracing::info!(order_id, "collecting payment");

            let mut variables = Variables::new();
            variables.insert("paid".to_owned(), VariableValue::boolean(true));

            resource
                .complete(&CompleteExternalTask {
                    worker_id: WORKER_ID.to_owned(),
                    variables,
                    ..Default::default()
                })
                .await
        }
        None => {
            resource
                .handle_failure(&ExternalTaskFailure {
                    worker_id: WORKER_ID.to_owned(),
                    error_message: Some("missing variable orderId".to_owned()),
                    retries: task.task.retries.unwrap_or(3).saturating_sub(1),
                    retry_timeout: 10_000,
                    ..Default::default()
                })
                .await
        }
    }
}
