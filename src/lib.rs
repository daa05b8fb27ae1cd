//! A rust client for automating, orchestrating, and monitoring business
//! processes through the REST API of the [Camunda BPM] platform.
//!
//! ## What is Camunda BPM?
//!
//! [Camunda BPM] is a workflow and decision automation platform. Its engine
//! executes BPMN processes, CMMN cases and DMN decisions, and exposes every
//! part of its state through a REST API under `/engine-rest`. This crate wraps
//! that API in typed, async facades: one per resource, e.g.
//! [`Client::process_definitions`] or [`Client::external_tasks`].
//!
//! [Camunda BPM]: https://camunda.com/products/camunda-bpm/
//!
//! ## Example
//!
//! ```no_run
//! use camunda_api_client::{Client, VariableValue};
//! use camunda_api_client::external_task::{CompleteExternalTask, FetchTopic};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a client for a local engine
//!     let client = Client::new("http://localhost:8080/engine-rest")?;
//!
//!     // Deploy a process
//!     client
//!         .deployments()
//!         .create()
//!         .with_name("invoice")
//!         .with_resource_file("invoice.bpmn")
//!         .send()
//!         .await?;
//!
//!     // Start a new instance of the latest version
//!     client
//!         .process_definitions()
//!         .by_key("invoice")
//!         .start_process_instance()
//!         .with_variable("amount", VariableValue::double(30.0))
//!         .with_business_key("order-1")
//!         .send()
//!         .await?;
//!
//!     // Work on external tasks of a topic
//!     let tasks = client
//!         .external_tasks()
//!         .fetch_and_lock()
//!         .with_worker_id("worker-1")
//!         .with_max_tasks(10)
//!         .with_topic(FetchTopic::new("payment", 60_000))
//!         .send()
//!         .await?;
//!
//!     for task in tasks {
//!         client
//!             .external_tasks()
//!             .by_id(&task.task.id)
//!             .complete(&CompleteExternalTask {
//!                 worker_id: "worker-1".into(),
//!                 ..Default::default()
//!             })
//!             .await?;
//!     }
//!
//!     Ok(())
//! }
//! ```
#![warn(
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms,
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    unused_allocation,
    unused_comparisons,
    unused_parens,
    while_true
)]

pub(crate) mod client;
pub(crate) mod common;
pub mod date;
pub(crate) mod error;
pub(crate) mod handler;
pub(crate) mod http;
pub(crate) mod oauth;
pub(crate) mod params;
pub(crate) mod query;
pub(crate) mod variables;

pub mod case_definition;
pub mod case_execution;
pub mod decision_definition;
pub mod deployment;
pub mod engine;
pub mod execution;
pub mod external_task;
pub mod group;
pub mod history;
pub mod incident;
pub mod job;
pub mod job_definition;
pub mod message;
pub mod process_definition;
pub mod process_instance;
pub mod signal;
pub mod tenant;
pub mod user;
pub mod user_task;
pub mod variable_instance;

pub use client::{BasicAuth, Client, ClientConfig, DEFAULT_HOST_URL};
pub use common::{DefinitionSuspensionState, FormInfo, HistoryTimeToLive, Link, SuspensionState};
pub use error::{ApiError, Error, Result};
pub use handler::{ErrorHandler, ResponseHandler};
pub use oauth::OAuthConfig;
pub use params::UrlParameter;
pub use query::{QueryResource, SortOrder, SortingInfo};
pub use variables::{
    ConditionOperator, PatchVariables, VariableQueryParameter, VariableResource, VariableType,
    VariableValue, Variables,
};
