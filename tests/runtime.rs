use camunda_api_client::execution::{ExecutionQuery, ExecutionSorting};
use camunda_api_client::incident::IncidentQuery;
use camunda_api_client::job::JobQuery;
use camunda_api_client::job_definition::JobDefinitionSuspensionState;
use camunda_api_client::variable_instance::VariableInstanceQuery;
use camunda_api_client::{
    Client, ConditionOperator, Error, SortingInfo, VariableQueryParameter, VariableType,
    VariableValue, Variables,
};
use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> Client {
    Client::new(format!("{}/engine-rest", server.uri())).unwrap()
}

#[tokio::test]
async fn executions_are_queried_by_process_variables() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/execution"))
        .and(body_json(json!({
            "processDefinitionKey": "invoice",
            "processVariables": [{ "name": "amount", "operator": "gt", "value": 1000 }],
            "sorting": [{ "sortBy": "instanceId", "sortOrder": "asc" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "x1",
            "processInstanceId": "p1",
            "ended": false,
            "tenantId": null
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let query = ExecutionQuery {
        process_definition_key: Some("invoice".into()),
        process_variables: vec![VariableQueryParameter::new(
            "amount",
            ConditionOperator::Gt,
            1000,
        )],
        sorting: vec![SortingInfo::asc(ExecutionSorting::InstanceId)],
        ..Default::default()
    };
    let executions = client(&server)
        .executions()
        .query(query)
        .list()
        .await
        .unwrap();

    assert_eq!(executions[0].process_instance_id, "p1");
}

#[tokio::test]
async fn execution_is_signalled_with_variables() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/execution/x1/signal"))
        .and(body_json(json!({
            "variables": { "approved": { "value": true, "type": "Boolean" } }
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut variables = Variables::new();
    variables.insert("approved".into(), VariableValue::boolean(true));
    client(&server)
        .executions()
        .by_id("x1")
        .signal(&variables)
        .await
        .unwrap();
}

#[tokio::test]
async fn message_subscription_is_triggered() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(
            "/engine-rest/execution/x1/messageSubscriptions/payment%20received/trigger",
        ))
        .and(body_json(json!({ "variables": {} })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .executions()
        .by_id("x1")
        .trigger_message_subscription("payment received", &Variables::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn message_subscription_is_read() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/engine-rest/execution/x1/messageSubscriptions/paid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "s1",
            "eventType": "message",
            "eventName": "paid",
            "executionId": "x1",
            "processInstanceId": "p1",
            "activityId": "waitForPayment",
            "createdDate": "2013-01-23T13:59:43.000+0200",
            "tenantId": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let subscription = client(&server)
        .executions()
        .by_id("x1")
        .message_subscription("paid")
        .await
        .unwrap();

    assert_eq!(subscription.event_type, "message");
    assert_eq!(
        subscription.created_date,
        Some(Utc.with_ymd_and_hms(2013, 1, 23, 11, 59, 43).unwrap())
    );
}

#[tokio::test]
async fn incidents_are_listed_and_resolved() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/engine-rest/incident"))
        .and(query_param("incidentType", "failedJob"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "i1",
            "incidentType": "failedJob",
            "processInstanceId": "p1",
            "incidentTimestamp": "2014-03-01T08:00:00.000+0000"
        }])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/engine-rest/incident/i1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let query = IncidentQuery {
        incident_type: Some("failedJob".into()),
        ..Default::default()
    };
    let incidents = client.incidents().query(query).list().await.unwrap();
    client.incidents().resolve(&incidents[0].id).await.unwrap();
}

#[tokio::test]
async fn failed_jobs_get_new_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/engine-rest/job"))
        .and(query_param("withException", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "j1",
            "retries": 0,
            "exceptionMessage": "boom",
            "suspended": false,
            "priority": 0
        }])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/engine-rest/job/j1/retries"))
        .and(body_json(json!({ "retries": 3 })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let query = JobQuery {
        with_exception: Some(true),
        ..Default::default()
    };
    let jobs = client.jobs().query(query).list().await.unwrap();
    assert_eq!(jobs[0].retries, 0);

    client.jobs().by_id(&jobs[0].id).set_retries(3).await.unwrap();
}

#[tokio::test]
async fn job_due_date_uses_engine_format() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/engine-rest/job/j1/duedate"))
        .and(body_json(json!({ "duedate": "2024-05-01T10:00:00.000+0000" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .jobs()
        .by_id("j1")
        .set_due_date(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())
        .await
        .unwrap();
}

#[tokio::test]
async fn job_is_executed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/job/j1/execute"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).jobs().by_id("j1").execute().await.unwrap();
}

#[tokio::test]
async fn job_definition_priority_applies_to_jobs() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/engine-rest/job-definition/jd1/jobPriority"))
        .and(body_json(json!({ "priority": 10, "includeJobs": true })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .job_definitions()
        .by_id("jd1")
        .set_priority(Some(10), true)
        .await
        .unwrap();
}

#[tokio::test]
async fn job_definition_priority_is_cleared() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/engine-rest/job-definition/jd1/jobPriority"))
        .and(body_json(json!({ "priority": null })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .job_definitions()
        .by_id("jd1")
        .set_priority(None, false)
        .await
        .unwrap();
}

#[tokio::test]
async fn job_definitions_of_process_are_suspended() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/engine-rest/job-definition/suspended"))
        .and(body_json(json!({
            "suspended": true,
            "includeJobs": true,
            "processDefinitionKey": "invoice"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let state = JobDefinitionSuspensionState {
        suspended: true,
        include_jobs: Some(true),
        process_definition_key: Some("invoice".into()),
        ..Default::default()
    };
    client(&server)
        .job_definitions()
        .suspend_or_activate(state)
        .await
        .unwrap();
}

#[tokio::test]
async fn variable_instances_are_queried_serialized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/variable-instance"))
        .and(query_param("deserializeValues", "false"))
        .and(body_json(json!({ "processInstanceIdIn": ["p1"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "v1",
            "name": "order",
            "type": "Object",
            "value": "{\"id\":1}",
            "valueInfo": {
                "objectTypeName": "com.example.Order",
                "serializationDataFormat": "application/json"
            },
            "processInstanceId": "p1"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let query = VariableInstanceQuery {
        process_instance_id_in: vec!["p1".into()],
        ..Default::default()
    };
    let variables = client(&server)
        .variable_instances()
        .query(query, false)
        .list()
        .await
        .unwrap();

    assert_eq!(variables[0].value.variable_type, Some(VariableType::Object));
    assert_eq!(variables[0].value.value, json!("{\"id\":1}"));
}

#[tokio::test]
async fn variable_instance_is_read_without_deserialization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/engine-rest/variable-instance/v1"))
        .and(query_param("deserializeValue", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "v1",
            "name": "amount",
            "type": "Integer",
            "value": 5
        })))
        .expect(1)
        .mount(&server)
        .await;

    let variable = client(&server)
        .variable_instances()
        .get("v1", false)
        .await
        .unwrap();

    assert_eq!(variable.name, "amount");
    assert_eq!(variable.value.value, json!(5));
}

#[tokio::test]
async fn signal_without_name_is_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/signal"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let result = client(&server)
        .signals()
        .throw()
        .with_variable("approved", true)
        .send()
        .await;

    assert!(matches!(result, Err(Error::InvalidParameters(_))));
}
