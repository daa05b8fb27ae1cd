use crate::{
    common::{DefinitionSuspensionState, FormInfo, HistoryTimeToLive},
    params::segment,
    process_instance::{ModificationInstruction, ProcessInstanceInfo, ProcessInstanceWithVariables},
    query::{QueryMethod, QueryResource, SortOrder},
    variables::{VariableValue, Variables},
    Client, Error, Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// A deployed process definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDefinitionInfo {
    /// The id of the process definition.
    pub id: String,
    /// The key of the process definition, i.e. the id of the BPMN 2.0 XML process definition.
    pub key: String,
    /// The category of the process definition.
    pub category: Option<String>,
    /// The description of the process definition.
    pub description: Option<String>,
    /// The name of the process definition.
    pub name: Option<String>,
    /// The version of the process definition that the engine assigned to it.
    pub version: i32,
    /// The file name of the process definition.
    pub resource: Option<String>,
    /// The deployment id of the process definition.
    pub deployment_id: Option<String>,
    /// The file name of the process definition diagram, if it exists.
    pub diagram: Option<String>,
    /// Whether the definition is suspended.
    #[serde(default)]
    pub suspended: bool,
    /// The tenant id of the process definition.
    pub tenant_id: Option<String>,
    /// The version tag of the process definition.
    pub version_tag: Option<String>,
    /// History time to live value of the process definition.
    pub history_time_to_live: Option<i32>,
    /// Whether the definition is startable in Tasklist.
    #[serde(default)]
    pub startable_in_tasklist: bool,
}

/// Properties process definitions can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProcessDefinitionSorting {
    /// by category
    Category,
    /// by key
    Key,
    /// by id
    Id,
    /// by name
    Name,
    /// by version
    Version,
    /// by deployment id
    DeploymentId,
    /// by tenant id
    TenantId,
    /// by version tag
    VersionTag,
}

/// Filter for process definitions.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDefinitionQuery {
    /// Filter by process definition id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_id: Option<String>,
    /// Filter by a list of process definition ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub process_definition_id_in: Vec<String>,
    /// Filter by process definition name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Filter by process definition names that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_like: Option<String>,
    /// Filter by the deployment the definition belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_id: Option<String>,
    /// Filter by process definition key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Filter by a list of process definition keys.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keys_in: Vec<String>,
    /// Filter by process definition keys that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_like: Option<String>,
    /// Filter by process definition category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Filter by process definition categories that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_like: Option<String>,
    /// Filter by process definition version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
    /// Only include those process definitions that are latest versions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<bool>,
    /// Filter by the name of the process definition resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
    /// Filter by names of those process definition resources that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_name_like: Option<String>,
    /// Filter by a user name who is allowed to start the process.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startable_by: Option<String>,
    /// Only include active process definitions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Only include suspended process definitions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspended: Option<bool>,
    /// Filter by the incident id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_id: Option<String>,
    /// Filter by the incident type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_type: Option<String>,
    /// Filter by the incident message. Exact match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_message: Option<String>,
    /// Filter by the incident message that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_message_like: Option<String>,
    /// Filter by a list of tenant ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tenant_id_in: Vec<String>,
    /// Only include process definitions which belong to no tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub without_tenant_id: Option<bool>,
    /// Include process definitions which belong to no tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_process_definitions_without_tenant_id: Option<bool>,
    /// Filter by the version tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_tag: Option<String>,
    /// Filter by the version tag that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_tag_like: Option<String>,
    /// Only include process definitions which are startable in Tasklist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startable_in_tasklist: Option<bool>,
    /// Only include process definitions which are not startable in Tasklist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_startable_in_tasklist: Option<bool>,
    /// Sort the results by a given criterion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<ProcessDefinitionSorting>,
    /// Sort the results in a given order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

/// The BPMN 2.0 XML of a process definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDefinitionDiagram {
    /// The id of the process definition.
    pub id: String,
    /// The BPMN 2.0 XML.
    pub bpmn20_xml: String,
}

/// Number of incidents of one type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentStatistics {
    /// The type of the incident.
    pub incident_type: String,
    /// The number of incidents of that type.
    pub incident_count: u64,
}

/// Runtime statistics of one activity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStatistics {
    /// The id of the activity.
    pub id: String,
    /// The number of running instances of the activity.
    pub instances: u64,
    /// The number of failed jobs, if requested.
    #[serde(default)]
    pub failed_jobs: u64,
    /// Incident statistics, if requested.
    #[serde(default)]
    pub incidents: Vec<IncidentStatistics>,
}

/// Runtime statistics of one process definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDefinitionStatistics {
    /// The id of the process definition.
    pub id: String,
    /// The number of running instances of the definition.
    pub instances: u64,
    /// The number of failed jobs, if requested.
    #[serde(default)]
    pub failed_jobs: u64,
    /// Incident statistics, if requested.
    #[serde(default)]
    pub incidents: Vec<IncidentStatistics>,
    /// The process definition.
    pub definition: ProcessDefinitionInfo,
}

/// What to include in statistics results.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsOptions {
    /// Include the number of failed jobs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_jobs: Option<bool>,
    /// Include incident statistics of all types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incidents: Option<bool>,
    /// Include incident statistics of one type only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incidents_for_type: Option<String>,
}

/// Options when deleting process definitions.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProcessDefinition {
    /// Also delete running and historic process instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cascade: Option<bool>,
    /// Skip custom listeners of the deleted process instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_custom_listeners: Option<bool>,
    /// Skip input/output mappings of the deleted process instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_io_mappings: Option<bool>,
}

/// Suspend or activate all process definitions with a given key.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDefinitionSuspensionState {
    /// The key of the process definitions.
    pub process_definition_key: String,
    /// `true` to suspend, `false` to activate.
    pub suspended: bool,
    /// Also suspend or activate the process instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_process_instances: Option<bool>,
    /// When to apply the change; immediately if not set.
    #[serde(
        default,
        with = "crate::date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub execution_date: Option<DateTime<Utc>>,
}

/// Submit a start form.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartForm {
    /// The form field values.
    #[serde(skip_serializing_if = "std::collections::HashMap::is_empty")]
    pub variables: Variables,
    /// The business key of the new process instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_key: Option<String>,
}

/// Process definitions.
#[derive(Clone, Debug)]
pub struct ProcessDefinitionService {
    client: Client,
}

impl ProcessDefinitionService {
    pub(crate) fn new(client: Client) -> Self {
        ProcessDefinitionService { client }
    }

    /// Query process definitions.
    pub fn query(
        &self,
        query: ProcessDefinitionQuery,
    ) -> QueryResource<ProcessDefinitionQuery, ProcessDefinitionInfo> {
        QueryResource::new(
            self.client.clone(),
            "/process-definition",
            QueryMethod::Get,
            query,
        )
    }

    /// A process definition by id.
    pub fn by_id(&self, process_definition_id: &str) -> ProcessDefinitionResource {
        let path = format!("/process-definition/{}", segment(process_definition_id));
        ProcessDefinitionResource {
            client: self.client.clone(),
            delete_path: path.clone(),
            path,
        }
    }

    /// The latest version of a process definition which belongs to no tenant.
    pub fn by_key(&self, process_definition_key: &str) -> ProcessDefinitionResource {
        let path = format!("/process-definition/key/{}", segment(process_definition_key));
        ProcessDefinitionResource {
            client: self.client.clone(),
            delete_path: format!("{}/delete", path),
            path,
        }
    }

    /// The latest version of a process definition which belongs to the given tenant.
    pub fn by_key_and_tenant_id(
        &self,
        process_definition_key: &str,
        tenant_id: &str,
    ) -> ProcessDefinitionResource {
        let path = format!(
            "/process-definition/key/{}/tenant-id/{}",
            segment(process_definition_key),
            segment(tenant_id)
        );
        ProcessDefinitionResource {
            client: self.client.clone(),
            delete_path: format!("{}/delete", path),
            path,
        }
    }

    /// Runtime statistics for all process definitions.
    #[tracing::instrument(skip(self), name = "process_definition_statistics", err)]
    pub async fn statistics(
        &self,
        options: StatisticsOptions,
    ) -> Result<Vec<ProcessDefinitionStatistics>> {
        self.client
            .get("/process-definition/statistics")
            .query(&options)?
            .send()
            .await
    }

    /// Suspend or activate all process definitions with a key.
    #[tracing::instrument(skip(self), name = "suspend_process_definitions", err)]
    pub async fn suspend_or_activate(&self, state: ProcessDefinitionSuspensionState) -> Result<()> {
        self.client
            .put("/process-definition/suspended")
            .json(&state)?
            .send_empty()
            .await
    }
}

/// A single process definition.
#[derive(Clone, Debug)]
pub struct ProcessDefinitionResource {
    client: Client,
    path: String,
    delete_path: String,
}

impl ProcessDefinitionResource {
    /// Retrieve the process definition.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_process_definition", err)]
    pub async fn get(&self) -> Result<ProcessDefinitionInfo> {
        self.client.get(self.path.as_str()).send().await
    }

    /// Retrieve the BPMN 2.0 XML.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_process_definition_xml", err)]
    pub async fn xml(&self) -> Result<ProcessDefinitionDiagram> {
        self.client.get(format!("{}/xml", self.path)).send().await
    }

    /// Retrieve the diagram image, if one was deployed.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_process_definition_diagram", err)]
    pub async fn diagram(&self) -> Result<Vec<u8>> {
        self.client
            .get(format!("{}/diagram", self.path))
            .send_bytes()
            .await
    }

    /// Start a new process instance of this definition.
    pub fn start_process_instance(&self) -> StartProcessInstanceBuilder {
        StartProcessInstanceBuilder::new(self.client.clone(), format!("{}/start", self.path))
    }

    /// Start a new process instance by submitting the start form.
    #[tracing::instrument(skip(self, form), fields(path = %self.path), name = "submit_start_form", err)]
    pub async fn submit_form(&self, form: &StartForm) -> Result<ProcessInstanceInfo> {
        trace!(?form, "submitting form");
        self.client
            .post(format!("{}/submit-form", self.path))
            .json(form)?
            .send()
            .await
    }

    /// The start form variables, optionally restricted to some names.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_start_form_variables", err)]
    pub async fn form_variables(&self, variable_names: &[&str]) -> Result<Variables> {
        let request = self.client.get(format!("{}/form-variables", self.path));
        let request = if variable_names.is_empty() {
            request
        } else {
            request.param("variableNames", variable_names.join(","))
        };
        request.send().await
    }

    /// The key of the start form.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_start_form", err)]
    pub async fn start_form(&self) -> Result<FormInfo> {
        self.client.get(format!("{}/startForm", self.path)).send().await
    }

    /// The rendered HTML of an embedded start form.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_rendered_start_form", err)]
    pub async fn rendered_form(&self) -> Result<String> {
        self.client
            .get(format!("{}/rendered-form", self.path))
            .send_text()
            .await
    }

    /// Runtime statistics per activity of this definition.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_activity_statistics", err)]
    pub async fn activity_statistics(
        &self,
        options: StatisticsOptions,
    ) -> Result<Vec<ActivityStatistics>> {
        self.client
            .get(format!("{}/statistics", self.path))
            .query(&options)?
            .send()
            .await
    }

    /// Suspend or activate this definition.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "suspend_process_definition", err)]
    pub async fn suspend_or_activate(&self, state: DefinitionSuspensionState) -> Result<()> {
        self.client
            .put(format!("{}/suspended", self.path))
            .json(&state)?
            .send_empty()
            .await
    }

    /// Change how long historic data of this definition is kept.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "update_history_time_to_live", err)]
    pub async fn update_history_time_to_live(&self, days: Option<i32>) -> Result<()> {
        self.client
            .put(format!("{}/history-time-to-live", self.path))
            .json(&HistoryTimeToLive {
                history_time_to_live: days,
            })?
            .send_empty()
            .await
    }

    /// Delete the definition. Looked up by key, all versions are deleted.
    #[tracing::instrument(skip(self), fields(path = %self.delete_path), name = "delete_process_definition", err)]
    pub async fn delete(&self, options: DeleteProcessDefinition) -> Result<()> {
        self.client
            .delete(self.delete_path.as_str())
            .query(&options)?
            .send_empty()
            .await
    }
}

/// Starts a process instance.
#[derive(Debug)]
pub struct StartProcessInstanceBuilder {
    client: Client,
    path: String,
    request: StartProcessInstance,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct StartProcessInstance {
    #[serde(skip_serializing_if = "std::collections::HashMap::is_empty")]
    variables: Variables,
    #[serde(skip_serializing_if = "Option::is_none")]
    business_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    case_instance_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    start_instructions: Vec<ModificationInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    skip_custom_listeners: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    skip_io_mappings: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    with_variables_in_return: Option<bool>,
}

impl StartProcessInstanceBuilder {
    fn new(client: Client, path: String) -> Self {
        StartProcessInstanceBuilder {
            client,
            path,
            request: StartProcessInstance::default(),
        }
    }

    /// Set a variable of the new instance.
    pub fn with_variable<N: Into<String>, V: Into<VariableValue>>(
        mut self,
        name: N,
        value: V,
    ) -> Self {
        self.request.variables.insert(name.into(), value.into());
        self
    }

    /// Set all variables of the new instance.
    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.request.variables = variables;
        self
    }

    /// Set the business key of the new instance.
    pub fn with_business_key<T: Into<String>>(mut self, business_key: T) -> Self {
        self.request.business_key = Some(business_key.into());
        self
    }

    /// Set the case instance the new instance belongs to.
    pub fn with_case_instance_id<T: Into<String>>(mut self, case_instance_id: T) -> Self {
        self.request.case_instance_id = Some(case_instance_id.into());
        self
    }

    /// Start at the given activities instead of the start event.
    pub fn with_start_instruction(mut self, instruction: ModificationInstruction) -> Self {
        self.request.start_instructions.push(instruction);
        self
    }

    /// Skip custom listeners when starting at arbitrary activities.
    pub fn with_skip_custom_listeners(mut self, skip: bool) -> Self {
        self.request.skip_custom_listeners = Some(skip);
        self
    }

    /// Skip input/output mappings when starting at arbitrary activities.
    pub fn with_skip_io_mappings(mut self, skip: bool) -> Self {
        self.request.skip_io_mappings = Some(skip);
        self
    }

    /// Return the variables of the instance once it reached its first wait state.
    pub fn with_variables_in_return(mut self) -> Self {
        self.request.with_variables_in_return = Some(true);
        self
    }

    /// Submit the start request.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "start_process_instance", err)]
    pub async fn send(self) -> Result<ProcessInstanceWithVariables> {
        let has_instructions = !self.request.start_instructions.is_empty();
        if !has_instructions
            && (self.request.skip_custom_listeners.is_some() || self.request.skip_io_mappings.is_some())
        {
            return Err(Error::InvalidParameters(
                "skipping listeners or mappings requires start instructions",
            ));
        }

        debug!(business_key = ?self.request.business_key, "starting process instance");
        trace!(request = ?self.request, "request:");

        self.client
            .post(self.path)
            .json(&self.request)?
            .send()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn start_request_omits_unset_fields() {
        let mut variables = Variables::new();
        variables.insert("Amount_EUR".into(), VariableValue::double(10.0));
        let request = StartProcessInstance {
            variables,
            business_key: Some("order-1".into()),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "variables": { "Amount_EUR": { "value": 10.0, "type": "Double" } },
                "businessKey": "order-1"
            })
        );
    }

    #[test]
    fn definition_parses_engine_json() {
        let definition: ProcessDefinitionInfo = serde_json::from_value(json!({
            "id": "invoice:1:c3a63aaa-2046-11e7-8f94-34f39ab71d4e",
            "key": "invoice",
            "category": "http://www.omg.org/spec/BPMN/20100524/MODEL",
            "description": null,
            "name": "Invoice Receipt",
            "version": 1,
            "resource": "invoice.v1.bpmn",
            "deploymentId": "c398cd26-2046-11e7-8f94-34f39ab71d4e",
            "diagram": null,
            "suspended": false,
            "tenantId": null,
            "versionTag": "V1.0",
            "historyTimeToLive": 5,
            "startableInTasklist": true
        }))
        .unwrap();

        assert_eq!(definition.key, "invoice");
        assert_eq!(definition.version_tag.as_deref(), Some("V1.0"));
        assert_eq!(definition.history_time_to_live, Some(5));
        assert!(definition.startable_in_tasklist);
    }

    #[test]
    fn sorting_uses_engine_names() {
        assert_eq!(
            serde_json::to_value(ProcessDefinitionSorting::DeploymentId).unwrap(),
            json!("deploymentId")
        );
    }
}
