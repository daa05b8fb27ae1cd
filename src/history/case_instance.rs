use crate::{
    params::segment,
    query::{QueryMethod, QueryResource, SortOrder},
    variables::VariableQueryParameter,
    Client, Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A historic case instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricCaseInstance {
    pub id: String,
    pub business_key: Option<String>,
    pub case_definition_id: Option<String>,
    pub case_definition_key: Option<String>,
    pub case_definition_name: Option<String>,
    #[serde(default, with = "crate::date::option")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::date::option")]
    pub close_time: Option<DateTime<Utc>>,
    pub duration_in_millis: Option<u64>,
    pub create_user_id: Option<String>,
    pub super_case_instance_id: Option<String>,
    pub super_process_instance_id: Option<String>,
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub terminated: bool,
    #[serde(default)]
    pub closed: bool,
}

/// Properties historic case instances can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoricCaseInstanceSorting {
    /// by case instance id
    InstanceId,
    /// by case definition id
    DefinitionId,
    /// by business key
    BusinessKey,
    /// by creation time
    CreateTime,
    /// by close time
    CloseTime,
    /// by duration
    Duration,
    /// by tenant id
    TenantId,
}

/// Filter for historic case instances.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricCaseInstanceQuery {
    /// Filter by case instance id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_instance_id: Option<String>,
    /// Filter by a list of case instance ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub case_instance_ids: Vec<String>,
    /// Filter by business key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_key: Option<String>,
    /// Filter by business keys that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_key_like: Option<String>,
    /// Filter by case definition id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_definition_id: Option<String>,
    /// Filter by case definition key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_definition_key: Option<String>,
    /// Filter by case definition name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_definition_name: Option<String>,
    /// Only include instances created before the date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub created_before: Option<DateTime<Utc>>,
    /// Only include instances created after the date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub created_after: Option<DateTime<Utc>>,
    /// Only include instances closed before the date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub closed_before: Option<DateTime<Utc>>,
    /// Only include instances closed after the date.
    #[serde(with = "crate::date::option", skip_serializing_if = "Option::is_none")]
    pub closed_after: Option<DateTime<Utc>>,
    /// Filter by the user who created the instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Only include instances called from this case instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub super_case_instance_id: Option<String>,
    /// Only include instances called from this process instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub super_process_instance_id: Option<String>,
    /// Only include finished instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished: Option<bool>,
    /// Only include unfinished instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unfinished: Option<bool>,
    /// Only include active instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Only include completed instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    /// Only include terminated instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminated: Option<bool>,
    /// Only include closed instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed: Option<bool>,
    /// Filter by a list of tenant ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tenant_id_in: Vec<String>,
    /// Only include instances with matching variables.
    #[serde(
        serialize_with = "crate::params::comma_separated",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub variables: Vec<VariableQueryParameter>,
    /// Sort the results by a given criterion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<HistoricCaseInstanceSorting>,
    /// Sort the results in a given order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

/// Historic case instances.
#[derive(Clone, Debug)]
pub struct HistoricCaseInstanceService {
    client: Client,
}

impl HistoricCaseInstanceService {
    pub(crate) fn new(client: Client) -> Self {
        HistoricCaseInstanceService { client }
    }

    /// Query historic case instances.
    pub fn query(
        &self,
        query: HistoricCaseInstanceQuery,
    ) -> QueryResource<HistoricCaseInstanceQuery, HistoricCaseInstance> {
        QueryResource::new(
            self.client.clone(),
            "/history/case-instance",
            QueryMethod::Get,
            query,
        )
    }

    /// Retrieve a historic case instance.
    #[tracing::instrument(skip(self), name = "get_historic_case_instance", err)]
    pub async fn get(&self, id: &str) -> Result<HistoricCaseInstance> {
        self.client
            .get(format!("/history/case-instance/{}", segment(id)))
            .send()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::query_pairs;

    #[test]
    fn id_lists_are_comma_separated() {
        let query = HistoricCaseInstanceQuery {
            case_instance_ids: vec!["a".into(), "b".into()],
            closed: Some(true),
            ..Default::default()
        };

        let pairs = query_pairs(&query).unwrap();

        assert!(pairs.contains(&("caseInstanceIds".to_owned(), "a,b".to_owned())));
        assert!(pairs.contains(&("closed".to_owned(), "true".to_owned())));
    }
}
