use crate::{params::segment, Client, Result};
use serde::{Deserialize, Serialize};

/// How many instances of a case activity are in each state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricCaseActivityStatistics {
    /// The id of the case activity.
    pub id: String,
    /// Available instances.
    pub available: u64,
    /// Enabled instances.
    pub enabled: u64,
    /// Disabled instances.
    pub disabled: u64,
    /// Active instances.
    pub active: u64,
    /// Completed instances.
    pub completed: u64,
    /// Terminated instances.
    pub terminated: u64,
}

/// Historic data of case definitions.
#[derive(Clone, Debug)]
pub struct HistoricCaseDefinitionService {
    client: Client,
}

impl HistoricCaseDefinitionService {
    pub(crate) fn new(client: Client) -> Self {
        HistoricCaseDefinitionService { client }
    }

    /// Per activity state counts of a case definition.
    #[tracing::instrument(skip(self), name = "get_historic_case_activity_statistics", err)]
    pub async fn statistics(
        &self,
        case_definition_id: &str,
    ) -> Result<Vec<HistoricCaseActivityStatistics>> {
        self.client
            .get(format!(
                "/history/case-definition/{}/statistics",
                segment(case_definition_id)
            ))
            .send()
            .await
    }
}
