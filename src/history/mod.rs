//! Historic data, kept after process, case and decision instances finished.
pub mod activity_instance;
pub mod case_activity_instance;
pub mod case_definition;
pub mod case_instance;
pub mod decision_instance;
pub mod detail;
pub mod incident;
pub mod job_log;
pub mod process_instance;
pub mod variable_instance;

use crate::Client;
use activity_instance::HistoricActivityInstanceService;
use case_activity_instance::HistoricCaseActivityInstanceService;
use case_definition::HistoricCaseDefinitionService;
use case_instance::HistoricCaseInstanceService;
use decision_instance::HistoricDecisionInstanceService;
use detail::HistoricDetailService;
use incident::HistoricIncidentService;
use job_log::HistoricJobLogService;
use process_instance::HistoricProcessInstanceService;
use variable_instance::HistoricVariableInstanceService;

/// Entry point to the history endpoints under `/history`.
#[derive(Clone, Debug)]
pub struct HistoryService {
    client: Client,
}

impl HistoryService {
    pub(crate) fn new(client: Client) -> Self {
        HistoryService { client }
    }

    /// Historic activity instances.
    pub fn activity_instances(&self) -> HistoricActivityInstanceService {
        HistoricActivityInstanceService::new(self.client.clone())
    }

    /// Historic case activity instances.
    pub fn case_activity_instances(&self) -> HistoricCaseActivityInstanceService {
        HistoricCaseActivityInstanceService::new(self.client.clone())
    }

    /// Historic statistics of case definitions.
    pub fn case_definitions(&self) -> HistoricCaseDefinitionService {
        HistoricCaseDefinitionService::new(self.client.clone())
    }

    /// Historic case instances.
    pub fn case_instances(&self) -> HistoricCaseInstanceService {
        HistoricCaseInstanceService::new(self.client.clone())
    }

    /// Historic decision instances.
    pub fn decision_instances(&self) -> HistoricDecisionInstanceService {
        HistoricDecisionInstanceService::new(self.client.clone())
    }

    /// Historic variable updates and form field submissions.
    pub fn details(&self) -> HistoricDetailService {
        HistoricDetailService::new(self.client.clone())
    }

    /// Historic incidents.
    pub fn incidents(&self) -> HistoricIncidentService {
        HistoricIncidentService::new(self.client.clone())
    }

    /// Historic job logs.
    pub fn job_logs(&self) -> HistoricJobLogService {
        HistoricJobLogService::new(self.client.clone())
    }

    /// Historic process instances.
    pub fn process_instances(&self) -> HistoricProcessInstanceService {
        HistoricProcessInstanceService::new(self.client.clone())
    }

    /// Historic variable instances.
    pub fn variable_instances(&self) -> HistoricVariableInstanceService {
        HistoricVariableInstanceService::new(self.client.clone())
    }
}
