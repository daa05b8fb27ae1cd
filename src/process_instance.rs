use crate::{
    common::{Link, SuspensionState},
    params::segment,
    query::{QueryMethod, QueryResource, SortingInfo},
    variables::{VariableQueryParameter, VariableResource, VariableValue, Variables},
    Client, Result,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A running process instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInstanceInfo {
    /// The id of the process instance.
    pub id: String,
    /// The id of the process definition this instance belongs to.
    pub definition_id: Option<String>,
    /// The business key of the process instance.
    pub business_key: Option<String>,
    /// The id of the case instance associated with the process instance.
    pub case_instance_id: Option<String>,
    /// Whether the process instance has ended. Always `false` for runtime queries.
    #[serde(default)]
    pub ended: bool,
    /// Whether the process instance is suspended.
    #[serde(default)]
    pub suspended: bool,
    /// The tenant id of the process instance.
    pub tenant_id: Option<String>,
    /// Links to related resources.
    #[serde(default)]
    pub links: Vec<Link>,
}

/// A started process instance, with its variables if they were requested.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessInstanceWithVariables {
    /// The process instance.
    #[serde(flatten)]
    pub instance: ProcessInstanceInfo,
    /// The variables at the first wait state.
    #[serde(default)]
    pub variables: Variables,
}

/// Properties process instances can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProcessInstanceSorting {
    /// by instance id
    InstanceId,
    /// by definition key
    DefinitionKey,
    /// by definition id
    DefinitionId,
    /// by tenant id
    TenantId,
    /// by business key
    BusinessKey,
}

/// Filter for process instances, sent as JSON body.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInstanceQuery {
    /// Filter by a list of process instance ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub process_instance_ids: Vec<String>,
    /// Filter by business key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_key: Option<String>,
    /// Filter by business keys that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_key_like: Option<String>,
    /// Filter by case instance id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_instance_id: Option<String>,
    /// Filter by the process definition the instances run on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_id: Option<String>,
    /// Filter by the key of the process definition the instances run on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_key: Option<String>,
    /// Filter by a list of process definition keys.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub process_definition_key_in: Vec<String>,
    /// Exclude instances of the given process definition keys.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub process_definition_key_not_in: Vec<String>,
    /// Filter by the deployment the instances' definition belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_id: Option<String>,
    /// Restrict to instances that have the given process instance as sub process instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub super_process_instance: Option<String>,
    /// Restrict to instances that were started as sub process of the given instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_process_instance: Option<String>,
    /// Restrict to instances that have the given case instance as sub case instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub super_case_instance: Option<String>,
    /// Restrict to instances that were started as sub process of the given case instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_case_instance: Option<String>,
    /// Only include active instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Only include suspended instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspended: Option<bool>,
    /// Only include instances with incidents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_incident: Option<bool>,
    /// Filter by incident id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_id: Option<String>,
    /// Filter by incident type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_type: Option<String>,
    /// Filter by incident message. Exact match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_message: Option<String>,
    /// Filter by incident messages that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_message_like: Option<String>,
    /// Filter by a list of tenant ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tenant_id_in: Vec<String>,
    /// Only include instances which belong to no tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub without_tenant_id: Option<bool>,
    /// Only include instances with an active activity of the given ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub activity_id_in: Vec<String>,
    /// Only include top level instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_process_instances: Option<bool>,
    /// Only include instances that have variables with certain values.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<VariableQueryParameter>,
    /// Match variable names case-insensitively.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_names_ignore_case: Option<bool>,
    /// Match variable values case-insensitively.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_values_ignore_case: Option<bool>,
    /// Sorting criteria, applied in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sorting: Vec<SortingInfo<ProcessInstanceSorting>>,
}

/// Suspend or activate all process instances of a definition.
///
/// Exactly one of the definition selectors must be set.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInstanceSuspensionState {
    /// `true` to suspend, `false` to activate.
    pub suspended: bool,
    /// Select the instances by process definition id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_id: Option<String>,
    /// Select the instances by process definition key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_key: Option<String>,
    /// Restrict a key selection to a tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_tenant_id: Option<String>,
    /// Restrict a key selection to definitions without tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_definition_without_tenant_id: Option<bool>,
}

/// Options when deleting a process instance.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProcessInstance {
    /// Skip custom listeners.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_custom_listeners: Option<bool>,
    /// Skip input/output mappings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_io_mappings: Option<bool>,
    /// Skip deletion of sub process instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_subprocesses: Option<bool>,
}

/// The activity instance tree of a process instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityInstance {
    /// The id of the activity instance.
    pub id: String,
    /// The id of the parent activity instance.
    pub parent_activity_instance_id: Option<String>,
    /// The id of the activity.
    pub activity_id: String,
    /// The name of the activity.
    pub activity_name: Option<String>,
    /// The type of the activity, e.g. `userTask`.
    pub activity_type: Option<String>,
    /// The id of the process instance.
    pub process_instance_id: String,
    /// The id of the process definition.
    pub process_definition_id: String,
    /// Child activity instances.
    #[serde(default)]
    pub child_activity_instances: Vec<ActivityInstance>,
    /// Child transition instances, i.e. asynchronous continuations.
    #[serde(default)]
    pub child_transition_instances: Vec<TransitionInstance>,
    /// The executions of this activity instance.
    #[serde(default)]
    pub execution_ids: Vec<String>,
}

/// An asynchronous continuation waiting to be executed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionInstance {
    /// The id of the transition instance.
    pub id: String,
    /// The id of the parent activity instance.
    pub parent_activity_instance_id: Option<String>,
    /// The id of the activity the transition starts or ends at.
    pub activity_id: String,
    /// The name of that activity.
    pub activity_name: Option<String>,
    /// The type of that activity.
    pub activity_type: Option<String>,
    /// The id of the process instance.
    pub process_instance_id: String,
    /// The id of the process definition.
    pub process_definition_id: String,
    /// The execution of the transition instance.
    pub execution_id: Option<String>,
}

/// The kind of a modification instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModificationInstructionType {
    /// Cancel an activity or transition instance.
    Cancel,
    /// Start before an activity.
    StartBeforeActivity,
    /// Start after an activity.
    StartAfterActivity,
    /// Start on a sequence flow.
    StartTransition,
}

/// A variable set while executing a modification instruction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerVariableValue {
    /// The typed value.
    #[serde(flatten)]
    pub value: VariableValue,
    /// Set the variable locally in the started activity instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local: Option<bool>,
}

/// One step of a process instance modification, or a start instruction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModificationInstruction {
    /// The kind of the instruction.
    #[serde(rename = "type")]
    pub instruction_type: ModificationInstructionType,
    /// The activity to start or cancel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
    /// The sequence flow to start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_id: Option<String>,
    /// The activity instance to cancel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_instance_id: Option<String>,
    /// The transition instance to cancel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_instance_id: Option<String>,
    /// The activity instance that becomes the parent of started instances.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ancestor_activity_instance_id: Option<String>,
    /// Variables set when starting.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub variables: HashMap<String, TriggerVariableValue>,
}

impl ModificationInstruction {
    fn new(instruction_type: ModificationInstructionType) -> Self {
        ModificationInstruction {
            instruction_type,
            activity_id: None,
            transition_id: None,
            activity_instance_id: None,
            transition_instance_id: None,
            ancestor_activity_instance_id: None,
            variables: HashMap::new(),
        }
    }

    /// Start before the given activity.
    pub fn start_before_activity<T: Into<String>>(activity_id: T) -> Self {
        ModificationInstruction {
            activity_id: Some(activity_id.into()),
            ..Self::new(ModificationInstructionType::StartBeforeActivity)
        }
    }

    /// Start after the given activity.
    pub fn start_after_activity<T: Into<String>>(activity_id: T) -> Self {
        ModificationInstruction {
            activity_id: Some(activity_id.into()),
            ..Self::new(ModificationInstructionType::StartAfterActivity)
        }
    }

    /// Start the given sequence flow.
    pub fn start_transition<T: Into<String>>(transition_id: T) -> Self {
        ModificationInstruction {
            transition_id: Some(transition_id.into()),
            ..Self::new(ModificationInstructionType::StartTransition)
        }
    }

    /// Cancel all instances of the given activity.
    pub fn cancel_activity<T: Into<String>>(activity_id: T) -> Self {
        ModificationInstruction {
            activity_id: Some(activity_id.into()),
            ..Self::new(ModificationInstructionType::Cancel)
        }
    }

    /// Cancel a single activity instance.
    pub fn cancel_activity_instance<T: Into<String>>(activity_instance_id: T) -> Self {
        ModificationInstruction {
            activity_instance_id: Some(activity_instance_id.into()),
            ..Self::new(ModificationInstructionType::Cancel)
        }
    }

    /// Cancel a single transition instance.
    pub fn cancel_transition_instance<T: Into<String>>(transition_instance_id: T) -> Self {
        ModificationInstruction {
            transition_instance_id: Some(transition_instance_id.into()),
            ..Self::new(ModificationInstructionType::Cancel)
        }
    }

    /// Start below the given activity instance.
    pub fn with_ancestor_activity_instance_id<T: Into<String>>(self, id: T) -> Self {
        ModificationInstruction {
            ancestor_activity_instance_id: Some(id.into()),
            ..self
        }
    }

    /// Set a variable in the scope of the started activity.
    pub fn with_variable<N: Into<String>, V: Into<VariableValue>>(
        mut self,
        name: N,
        value: V,
        local: bool,
    ) -> Self {
        self.variables.insert(
            name.into(),
            TriggerVariableValue {
                value: value.into(),
                local: Some(local),
            },
        );
        self
    }
}

/// Modify a running process instance.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInstanceModification {
    /// Skip custom listeners.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_custom_listeners: Option<bool>,
    /// Skip input/output mappings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_io_mappings: Option<bool>,
    /// The instructions, executed in order.
    pub instructions: Vec<ModificationInstruction>,
    /// An annotation for the user operation log.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

/// Process instances.
#[derive(Clone, Debug)]
pub struct ProcessInstanceService {
    client: Client,
}

impl ProcessInstanceService {
    pub(crate) fn new(client: Client) -> Self {
        ProcessInstanceService { client }
    }

    /// Query process instances.
    pub fn query(
        &self,
        query: ProcessInstanceQuery,
    ) -> QueryResource<ProcessInstanceQuery, ProcessInstanceInfo> {
        QueryResource::new(
            self.client.clone(),
            "/process-instance",
            QueryMethod::Post,
            query,
        )
    }

    /// A process instance by id.
    pub fn by_id(&self, process_instance_id: &str) -> ProcessInstanceResource {
        ProcessInstanceResource {
            client: self.client.clone(),
            path: format!("/process-instance/{}", segment(process_instance_id)),
        }
    }

    /// Suspend or activate all process instances of a definition.
    #[tracing::instrument(skip(self), name = "suspend_process_instances", err)]
    pub async fn suspend_or_activate(&self, state: ProcessInstanceSuspensionState) -> Result<()> {
        self.client
            .put("/process-instance/suspended")
            .json(&state)?
            .send_empty()
            .await
    }
}

/// A single process instance.
#[derive(Clone, Debug)]
pub struct ProcessInstanceResource {
    client: Client,
    path: String,
}

impl ProcessInstanceResource {
    /// Retrieve the process instance.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_process_instance", err)]
    pub async fn get(&self) -> Result<ProcessInstanceInfo> {
        self.client.get(self.path.as_str()).send().await
    }

    /// Delete the process instance.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "delete_process_instance", err)]
    pub async fn delete(&self, options: DeleteProcessInstance) -> Result<()> {
        self.client
            .delete(self.path.as_str())
            .query(&options)?
            .send_empty()
            .await
    }

    /// The activity instance tree.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_activity_instances", err)]
    pub async fn activity_instances(&self) -> Result<ActivityInstance> {
        self.client
            .get(format!("{}/activity-instances", self.path))
            .send()
            .await
    }

    /// The variables visible in the process instance scope.
    pub fn variables(&self) -> VariableResource {
        VariableResource::new(self.client.clone(), format!("{}/variables", self.path))
    }

    /// Suspend or activate the process instance.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "suspend_process_instance", err)]
    pub async fn suspend_or_activate(&self, suspended: bool) -> Result<()> {
        self.client
            .put(format!("{}/suspended", self.path))
            .json(&SuspensionState { suspended })?
            .send_empty()
            .await
    }

    /// Start and cancel activities of the process instance.
    #[tracing::instrument(skip(self, modification), fields(path = %self.path), name = "modify_process_instance", err)]
    pub async fn modify(&self, modification: &ProcessInstanceModification) -> Result<()> {
        debug!(
            instructions = modification.instructions.len(),
            "modifying process instance"
        );
        self.client
            .post(format!("{}/modification", self.path))
            .json(modification)?
            .send_empty()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SortOrder;
    use crate::variables::ConditionOperator;
    use serde_json::json;

    #[test]
    fn query_body_contains_only_set_filters() {
        let query = ProcessInstanceQuery {
            process_definition_key: Some("invoice".into()),
            variables: vec![VariableQueryParameter::new(
                "amount",
                ConditionOperator::Gteq,
                100,
            )],
            sorting: vec![SortingInfo::desc(ProcessInstanceSorting::BusinessKey)],
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({
                "processDefinitionKey": "invoice",
                "variables": [{ "name": "amount", "operator": "gteq", "value": 100 }],
                "sorting": [{ "sortBy": "businessKey", "sortOrder": "desc" }]
            })
        );
        assert_eq!(query.sorting[0].sort_order, SortOrder::Desc);
    }

    #[test]
    fn modification_instructions_serialize_with_type() {
        let instruction = ModificationInstruction::start_before_activity("approveInvoice")
            .with_variable("approver", "demo", true);

        assert_eq!(
            serde_json::to_value(&instruction).unwrap(),
            json!({
                "type": "startBeforeActivity",
                "activityId": "approveInvoice",
                "variables": {
                    "approver": { "value": "demo", "type": "String", "local": true }
                }
            })
        );
    }

    #[test]
    fn activity_instance_tree_parses() {
        let tree: ActivityInstance = serde_json::from_value(json!({
            "id": "8f72bc9f-d505-11e5-bad5-e4a7a094a9d6",
            "parentActivityInstanceId": null,
            "activityId": "executionProcess:1:8ef5c393-d505-11e5-bad5-e4a7a094a9d6",
            "activityType": "processDefinition",
            "processInstanceId": "8f72bc9f-d505-11e5-bad5-e4a7a094a9d6",
            "processDefinitionId": "executionProcess:1:8ef5c393-d505-11e5-bad5-e4a7a094a9d6",
            "childActivityInstances": [{
                "id": "SubProcess_1:8f72bca9-d505-11e5-bad5-e4a7a094a9d6",
                "parentActivityInstanceId": "8f72bc9f-d505-11e5-bad5-e4a7a094a9d6",
                "activityId": "SubProcess_1",
                "activityType": "subProcess",
                "processInstanceId": "8f72bc9f-d505-11e5-bad5-e4a7a094a9d6",
                "processDefinitionId": "executionProcess:1:8ef5c393-d505-11e5-bad5-e4a7a094a9d6",
                "childActivityInstances": [],
                "childTransitionInstances": [],
                "executionIds": ["8f72bca9-d505-11e5-bad5-e4a7a094a9d6"],
                "activityName": "SubProcess"
            }],
            "childTransitionInstances": [],
            "executionIds": ["8f72bc9f-d505-11e5-bad5-e4a7a094a9d6"],
            "activityName": "Execution Process"
        }))
        .unwrap();

        assert_eq!(tree.child_activity_instances.len(), 1);
        assert_eq!(tree.child_activity_instances[0].activity_id, "SubProcess_1");
        assert_eq!(tree.activity_name.as_deref(), Some("Execution Process"));
    }
}
