use camunda_api_client::case_definition::CreateCaseInstance;
use camunda_api_client::case_execution::{CaseExecutionQuery, CaseExecutionTransition};
use camunda_api_client::decision_definition::DecisionDefinitionQuery;
use camunda_api_client::{
    Client, ConditionOperator, VariableQueryParameter, VariableValue, Variables,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> Client {
    Client::new(format!("{}/engine-rest", server.uri())).unwrap()
}

#[tokio::test]
async fn case_instance_is_created_from_latest_definition() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/case-definition/key/loan/create"))
        .and(body_json(json!({
            "variables": { "amount": { "value": 100, "type": "Integer" } },
            "businessKey": "loan-7"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "c1",
            "caseDefinitionId": "loan:1:a",
            "businessKey": "loan-7",
            "tenantId": null,
            "active": true,
            "completed": false,
            "terminated": false,
            "links": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = CreateCaseInstance {
        business_key: Some("loan-7".into()),
        ..Default::default()
    }
    .with_variable("amount", 100);
    let instance = client(&server)
        .case_definitions()
        .by_key("loan")
        .create_case_instance(request)
        .await
        .unwrap();

    assert_eq!(instance.id, "c1");
    assert!(instance.active);
    assert_eq!(instance.business_key.as_deref(), Some("loan-7"));
}

#[tokio::test]
async fn case_definition_of_tenant_returns_xml() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/engine-rest/case-definition/key/loan/tenant-id/t1/xml"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "loan:1:a",
            "cmmnXml": "<definitions/>"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let diagram = client(&server)
        .case_definitions()
        .by_key_and_tenant_id("loan", "t1")
        .xml()
        .await
        .unwrap();

    assert_eq!(diagram.cmmn_xml, "<definitions/>");
}

#[tokio::test]
async fn case_executions_are_filtered_by_variables() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/engine-rest/case-execution"))
        .and(query_param("active", "true"))
        .and(query_param("variables", "amount_gteq_100"))
        .and(query_param("caseInstanceVariables", "region_eq_north"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "e1",
            "caseInstanceId": "c1",
            "activityId": "review",
            "active": true
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let query = CaseExecutionQuery {
        active: Some(true),
        variables: vec![VariableQueryParameter::new(
            "amount",
            ConditionOperator::Gteq,
            100,
        )],
        case_instance_variables: vec![VariableQueryParameter::new(
            "region",
            ConditionOperator::Eq,
            "north",
        )],
        ..Default::default()
    };
    let executions = client(&server)
        .case_executions()
        .query(query)
        .list()
        .await
        .unwrap();

    assert_eq!(executions[0].activity_id.as_deref(), Some("review"));
}

#[tokio::test]
async fn case_execution_completes_with_variable_changes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/case-execution/e1/complete"))
        .and(body_json(json!({
            "variables": {
                "approved": { "value": true, "type": "Boolean", "local": false }
            },
            "deletions": [{ "name": "draft", "local": true }]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let transition = CaseExecutionTransition::default()
        .with_variable("approved", true, false)
        .with_deletion("draft", true);

    client(&server)
        .case_executions()
        .by_id("e1")
        .complete(&transition)
        .await
        .unwrap();
}

#[tokio::test]
async fn case_execution_is_started_manually() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/case-execution/e1/manual-start"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .case_executions()
        .by_id("e1")
        .manual_start(&CaseExecutionTransition::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn decision_is_evaluated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/decision-definition/key/dish/evaluate"))
        .and(body_json(json!({
            "variables": { "season": { "value": "Winter", "type": "String" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "dish": { "value": "Stew", "type": "String", "valueInfo": {} } }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut inputs = Variables::new();
    inputs.insert("season".into(), VariableValue::string("Winter"));
    let results = client(&server)
        .decision_definitions()
        .by_key("dish")
        .evaluate(&inputs)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["dish"].value, json!("Stew"));
}

#[tokio::test]
async fn decision_definitions_are_counted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/engine-rest/decision-definition/count"))
        .and(query_param("key", "dish"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 4 })))
        .expect(1)
        .mount(&server)
        .await;

    let query = DecisionDefinitionQuery {
        key: Some("dish".into()),
        ..Default::default()
    };
    let count = client(&server)
        .decision_definitions()
        .query(query)
        .count()
        .await
        .unwrap();

    assert_eq!(count, 4);
}

#[tokio::test]
async fn decision_history_time_to_live_is_updated() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/engine-rest/decision-definition/dish%3A1%3Aa/history-time-to-live"))
        .and(body_json(json!({ "historyTimeToLive": 30 })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .decision_definitions()
        .by_id("dish:1:a")
        .update_history_time_to_live(Some(30))
        .await
        .unwrap();
}
