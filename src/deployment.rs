use crate::{
    case_definition::CaseDefinitionInfo,
    common::Link,
    decision_definition::{DecisionDefinitionInfo, DecisionRequirementsDefinitionInfo},
    params::segment,
    process_definition::ProcessDefinitionInfo,
    query::{QueryMethod, QueryResource, SortOrder},
    Client, Error, Result,
};
use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tokio::{fs::File, io::AsyncReadExt};
use tracing::{debug, trace};

/// A deployment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentInfo {
    /// The id of the deployment.
    pub id: String,
    /// The name of the deployment.
    pub name: Option<String>,
    /// The source of the deployment, e.g. `process application`.
    pub source: Option<String>,
    /// The tenant id of the deployment.
    pub tenant_id: Option<String>,
    /// When the deployment was made.
    #[serde(default, with = "crate::date::option")]
    pub deployment_time: Option<DateTime<Utc>>,
    /// Links to related resources.
    #[serde(default)]
    pub links: Vec<Link>,
}

/// A deployment together with the definitions it created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentWithDefinitions {
    /// The deployment.
    #[serde(flatten)]
    pub deployment: DeploymentInfo,
    /// Deployed process definitions by id.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub deployed_process_definitions: HashMap<String, ProcessDefinitionInfo>,
    /// Deployed case definitions by id.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub deployed_case_definitions: HashMap<String, CaseDefinitionInfo>,
    /// Deployed decision definitions by id.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub deployed_decision_definitions: HashMap<String, DecisionDefinitionInfo>,
    /// Deployed decision requirements definitions by id.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub deployed_decision_requirements_definitions:
        HashMap<String, DecisionRequirementsDefinitionInfo>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<HashMap<String, T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<HashMap<String, T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A file of a deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentResourceInfo {
    /// The id of the resource.
    pub id: String,
    /// The name of the resource.
    pub name: String,
    /// The id of the deployment.
    pub deployment_id: String,
}

/// Properties deployments can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeploymentSorting {
    /// by id
    Id,
    /// by name
    Name,
    /// by deployment time
    DeploymentTime,
    /// by tenant id
    TenantId,
}

/// Filter for deployments.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentQuery {
    /// Filter by deployment id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Filter by deployment name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Filter by deployment names that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_like: Option<String>,
    /// Filter by deployment source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Only include deployments without source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub without_source: Option<bool>,
    /// Filter by a list of tenant ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tenant_id_in: Vec<String>,
    /// Only include deployments which belong to no tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub without_tenant_id: Option<bool>,
    /// Include deployments which belong to no tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_deployments_without_tenant_id: Option<bool>,
    /// Only include deployments made after the date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub after: Option<DateTime<Utc>>,
    /// Only include deployments made before the date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub before: Option<DateTime<Utc>>,
    /// Sort the results by a given criterion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<DeploymentSorting>,
    /// Sort the results in a given order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

/// Redeploy some or all resources of a deployment.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeploymentRequest {
    /// Resources to redeploy by id.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resource_ids: Vec<String>,
    /// Resources to redeploy by name.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resource_names: Vec<String>,
    /// The source of the new deployment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Options when deleting a deployment.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDeployment {
    /// Also delete process instances and history.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cascade: Option<bool>,
    /// Skip custom listeners of deleted process instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_custom_listeners: Option<bool>,
    /// Skip input/output mappings of deleted process instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_io_mappings: Option<bool>,
}

#[derive(Debug)]
enum ResourceSource {
    File(String),
    Bytes { name: String, content: Vec<u8> },
}

/// Deploys one or more resources, e.g. BPMN, CMMN or DMN files.
///
/// Note that this is an atomic call, i.e. either all resources are deployed,
/// or none of them are.
#[derive(Debug)]
pub struct CreateDeploymentBuilder {
    client: Client,
    name: Option<String>,
    source: Option<String>,
    tenant_id: Option<String>,
    enable_duplicate_filtering: bool,
    deploy_changed_only: bool,
    resources: Vec<ResourceSource>,
}

impl CreateDeploymentBuilder {
    fn new(client: Client) -> Self {
        CreateDeploymentBuilder {
            client,
            name: None,
            source: None,
            tenant_id: None,
            enable_duplicate_filtering: false,
            deploy_changed_only: false,
            resources: Vec::new(),
        }
    }

    /// Set the name of the deployment.
    pub fn with_name<T: Into<String>>(self, name: T) -> Self {
        CreateDeploymentBuilder {
            name: Some(name.into()),
            ..self
        }
    }

    /// Set the source of the deployment.
    pub fn with_source<T: Into<String>>(self, source: T) -> Self {
        CreateDeploymentBuilder {
            source: Some(source.into()),
            ..self
        }
    }

    /// Set the tenant the deployment belongs to.
    pub fn with_tenant_id<T: Into<String>>(self, tenant_id: T) -> Self {
        CreateDeploymentBuilder {
            tenant_id: Some(tenant_id.into()),
            ..self
        }
    }

    /// Skip the deployment if nothing changed since the last deployment with
    /// the same name. With `changed_only`, only changed resources are deployed.
    pub fn with_duplicate_filtering(self, changed_only: bool) -> Self {
        CreateDeploymentBuilder {
            enable_duplicate_filtering: true,
            deploy_changed_only: changed_only,
            ..self
        }
    }

    /// Add a file to upload, read when the request is sent.
    pub fn with_resource_file<T: Into<String>>(mut self, resource_file: T) -> Self {
        self.resources.push(ResourceSource::File(resource_file.into()));
        self
    }

    /// Add a list of files to upload.
    pub fn with_resource_files(mut self, resource_files: Vec<String>) -> Self {
        self.resources
            .extend(resource_files.into_iter().map(ResourceSource::File));
        self
    }

    /// Add an in-memory resource.
    pub fn with_resource<T: Into<String>>(mut self, name: T, content: Vec<u8>) -> Self {
        self.resources.push(ResourceSource::Bytes {
            name: name.into(),
            content,
        });
        self
    }

    /// Submit the deployment.
    #[tracing::instrument(skip(self), name = "create_deployment", err)]
    pub async fn send(self) -> Result<DeploymentWithDefinitions> {
        if self.resources.is_empty() {
            return Err(Error::InvalidParameters("at least one resource must be set"));
        }

        let mut form = Form::new();
        if let Some(name) = self.name.clone() {
            form = form.text("deployment-name", name);
        }
        if let Some(source) = self.source.clone() {
            form = form.text("deployment-source", source);
        }
        if let Some(tenant_id) = self.tenant_id.clone() {
            form = form.text("tenant-id", tenant_id);
        }
        if self.enable_duplicate_filtering {
            form = form
                .text("enable-duplicate-filtering", "true")
                .text("deploy-changed-only", self.deploy_changed_only.to_string());
        }

        for resource in self.resources {
            let (name, content) = match resource {
                ResourceSource::File(path) => {
                    trace!(file = %path, "reading file");
                    let content = read_file(&path).await?;
                    let name = Path::new(&path)
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or(path);
                    (name, content)
                }
                ResourceSource::Bytes { name, content } => (name, content),
            };
            debug!(resource = %name, size = content.len(), "adding resource");
            form = form.part(name.clone(), Part::bytes(content).file_name(name));
        }

        debug!(name = ?self.name, tenant_id = ?self.tenant_id, "sending deployment");

        self.client
            .post("/deployment/create")
            .multipart(form)
            .send()
            .await
    }
}

async fn read_file(path: &str) -> Result<Vec<u8>> {
    let mut file = File::open(path).await.map_err(|e| Error::FileIo {
        resource_file: path.to_owned(),
        source: e,
    })?;
    let mut content = vec![];
    file.read_to_end(&mut content)
        .await
        .map_err(|e| Error::FileIo {
            resource_file: path.to_owned(),
            source: e,
        })?;
    Ok(content)
}

/// Deployments.
#[derive(Clone, Debug)]
pub struct DeploymentService {
    client: Client,
}

impl DeploymentService {
    pub(crate) fn new(client: Client) -> Self {
        DeploymentService { client }
    }

    /// Query deployments.
    pub fn query(&self, query: DeploymentQuery) -> QueryResource<DeploymentQuery, DeploymentInfo> {
        QueryResource::new(self.client.clone(), "/deployment", QueryMethod::Get, query)
    }

    /// Create a new deployment.
    pub fn create(&self) -> CreateDeploymentBuilder {
        CreateDeploymentBuilder::new(self.client.clone())
    }

    /// A deployment by id.
    pub fn by_id(&self, deployment_id: &str) -> DeploymentResource {
        DeploymentResource {
            client: self.client.clone(),
            path: format!("/deployment/{}", segment(deployment_id)),
        }
    }
}

/// A single deployment.
#[derive(Clone, Debug)]
pub struct DeploymentResource {
    client: Client,
    path: String,
}

impl DeploymentResource {
    /// Retrieve the deployment.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_deployment", err)]
    pub async fn get(&self) -> Result<DeploymentInfo> {
        self.client.get(self.path.as_str()).send().await
    }

    /// The files of the deployment.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_deployment_resources", err)]
    pub async fn resources(&self) -> Result<Vec<DeploymentResourceInfo>> {
        self.client
            .get(format!("{}/resources", self.path))
            .send()
            .await
    }

    /// A single file of the deployment.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_deployment_resource", err)]
    pub async fn resource(&self, resource_id: &str) -> Result<DeploymentResourceInfo> {
        self.client
            .get(format!("{}/resources/{}", self.path, segment(resource_id)))
            .send()
            .await
    }

    /// The content of a file of the deployment.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_deployment_resource_data", err)]
    pub async fn resource_data(&self, resource_id: &str) -> Result<Vec<u8>> {
        self.client
            .get(format!("{}/resources/{}/data", self.path, segment(resource_id)))
            .send_bytes()
            .await
    }

    /// Create a new deployment from resources of this one.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "redeploy", err)]
    pub async fn redeploy(
        &self,
        request: RedeploymentRequest,
    ) -> Result<DeploymentWithDefinitions> {
        self.client
            .post(format!("{}/redeploy", self.path))
            .json(&request)?
            .send()
            .await
    }

    /// Delete the deployment.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "delete_deployment", err)]
    pub async fn delete(&self, options: DeleteDeployment) -> Result<()> {
        self.client
            .delete(self.path.as_str())
            .query(&options)?
            .send_empty()
            .await
    }
}
