use camunda_api_client::message::MessageCorrelationResultType;
use camunda_api_client::process_definition::{DeleteProcessDefinition, ProcessDefinitionQuery};
use camunda_api_client::process_instance::{
    ModificationInstruction, ProcessInstanceModification, ProcessInstanceQuery,
    ProcessInstanceSorting,
};
use camunda_api_client::{
    Client, Error, PatchVariables, SortingInfo, VariableType, VariableValue,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> Client {
    Client::new(format!("{}/engine-rest", server.uri())).unwrap()
}

fn definition(id: &str, version: i32) -> serde_json::Value {
    json!({
        "id": id,
        "key": "invoice",
        "name": "Invoice Receipt",
        "version": version,
        "suspended": false,
        "tenantId": null
    })
}

#[tokio::test]
async fn definitions_are_listed_with_paging() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/engine-rest/process-definition"))
        .and(query_param("key", "invoice"))
        .and(query_param("latestVersion", "true"))
        .and(query_param("firstResult", "10"))
        .and(query_param("maxResults", "5"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([definition("invoice:2:b", 2)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let query = ProcessDefinitionQuery {
        key: Some("invoice".into()),
        latest_version: Some(true),
        ..Default::default()
    };
    let definitions = client(&server)
        .process_definitions()
        .query(query)
        .list_page(10, 5)
        .await
        .unwrap();

    assert_eq!(definitions.len(), 1);
    assert_eq!(definitions[0].version, 2);
}

#[tokio::test]
async fn definitions_are_counted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/engine-rest/process-definition/count"))
        .and(query_param("key", "invoice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 42 })))
        .expect(1)
        .mount(&server)
        .await;

    let query = ProcessDefinitionQuery {
        key: Some("invoice".into()),
        ..Default::default()
    };
    let count = client(&server)
        .process_definitions()
        .query(query)
        .count()
        .await
        .unwrap();

    assert_eq!(count, 42);
}

#[tokio::test]
async fn definition_by_key_and_tenant_is_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(
            "/engine-rest/process-definition/key/invoice/tenant-id/tenant%20one",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(definition("invoice:1:a", 1)))
        .expect(1)
        .mount(&server)
        .await;

    let definition = client(&server)
        .process_definitions()
        .by_key_and_tenant_id("invoice", "tenant one")
        .get()
        .await
        .unwrap();

    assert_eq!(definition.id, "invoice:1:a");
}

#[tokio::test]
async fn delete_by_key_uses_delete_path() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/engine-rest/process-definition/key/invoice/delete"))
        .and(query_param("cascade", "true"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .process_definitions()
        .by_key("invoice")
        .delete(DeleteProcessDefinition {
            cascade: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn process_instance_is_started_with_typed_variables() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/process-definition/key/invoice/start"))
        .and(body_json(json!({
            "variables": {
                "amount": { "value": 30.5, "type": "Double" },
                "creditor": { "value": "Great Pizza", "type": "String" }
            },
            "businessKey": "order-1",
            "withVariablesInReturn": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p1",
            "definitionId": "invoice:1:a",
            "businessKey": "order-1",
            "ended": false,
            "suspended": false,
            "tenantId": null,
            "links": [{ "method": "GET", "href": "http://localhost/process-instance/p1", "rel": "self" }],
            "variables": {
                "amount": { "value": 30.5, "type": "Double", "valueInfo": {} }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let started = client(&server)
        .process_definitions()
        .by_key("invoice")
        .start_process_instance()
        .with_variable("amount", 30.5)
        .with_variable("creditor", "Great Pizza")
        .with_business_key("order-1")
        .with_variables_in_return()
        .send()
        .await
        .unwrap();

    assert_eq!(started.instance.id, "p1");
    assert_eq!(started.instance.links.len(), 1);
    assert_eq!(
        started.variables["amount"].variable_type,
        Some(VariableType::Double)
    );
}

#[tokio::test]
async fn skip_flags_without_instructions_are_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .process_definitions()
        .by_key("invoice")
        .start_process_instance()
        .with_skip_custom_listeners(true)
        .send()
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidParameters(_)));
}

#[tokio::test]
async fn instance_query_sends_body_and_paging_in_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/process-instance"))
        .and(query_param("maxResults", "20"))
        .and(body_json(json!({
            "businessKeyLike": "order-%",
            "sorting": [{ "sortBy": "businessKey", "sortOrder": "asc" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "p1", "businessKey": "order-1" },
            { "id": "p2", "businessKey": "order-2" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let query = ProcessInstanceQuery {
        business_key_like: Some("order-%".into()),
        sorting: vec![SortingInfo::asc(ProcessInstanceSorting::BusinessKey)],
        ..Default::default()
    };
    let instances = client(&server)
        .process_instances()
        .query(query)
        .max_results(20)
        .list()
        .await
        .unwrap();

    assert_eq!(instances.len(), 2);
    assert_eq!(instances[1].business_key.as_deref(), Some("order-2"));
}

#[tokio::test]
async fn instance_variables_are_read_and_patched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/engine-rest/process-instance/p1/variables"))
        .and(query_param("deserializeValues", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "approverID": { "value": "mary", "type": "String", "valueInfo": {} },
            "order": {
                "value": "{\"id\":3}",
                "type": "Object",
                "valueInfo": {
                    "objectTypeName": "com.example.Order",
                    "serializationDataFormat": "application/json"
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/process-instance/p1/variables"))
        .and(body_json(json!({
            "modifications": { "approved": { "value": true, "type": "Boolean" } },
            "deletions": ["approverID"]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let variables = client(&server).process_instances().by_id("p1").variables();

    let all = variables.get_all(false).await.unwrap();
    assert_eq!(all["approverID"].value, json!("mary"));
    assert_eq!(
        all["order"].value_as::<serde_json::Value>().unwrap(),
        json!({ "id": 3 })
    );

    variables
        .modify(
            &PatchVariables::default()
                .with_modification("approved", true)
                .with_deletion("approverID"),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn single_variable_is_set_under_encoded_name() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/engine-rest/process-instance/p1/variables/due%20date"))
        .and(body_json(json!({
            "value": "2021-03-04T05:06:07.000+0000",
            "type": "Date"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let due = chrono::DateTime::parse_from_rfc3339("2021-03-04T05:06:07Z")
        .unwrap()
        .with_timezone(&chrono::Utc);

    client(&server)
        .process_instances()
        .by_id("p1")
        .variables()
        .set("due date", &VariableValue::date(due))
        .await
        .unwrap();
}

#[tokio::test]
async fn instance_modification_sends_instructions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/process-instance/p1/modification"))
        .and(body_partial_json(json!({
            "instructions": [
                { "type": "startBeforeActivity", "activityId": "approve" },
                { "type": "cancel", "activityInstanceId": "review:1" }
            ]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let modification = ProcessInstanceModification {
        instructions: vec![
            ModificationInstruction::start_before_activity("approve"),
            ModificationInstruction::cancel_activity_instance("review:1"),
        ],
        ..Default::default()
    };

    client(&server)
        .process_instances()
        .by_id("p1")
        .modify(&modification)
        .await
        .unwrap();
}

#[tokio::test]
async fn message_is_correlated_without_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/message"))
        .and(body_json(json!({
            "messageName": "invoice-paid",
            "businessKey": "order-1",
            "processVariables": { "paid": { "value": true, "type": "Boolean" } }
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .messages()
        .correlate()
        .with_name("invoice-paid")
        .with_business_key("order-1")
        .with_process_variable("paid", true)
        .send()
        .await
        .unwrap();
}

#[tokio::test]
async fn message_correlation_returns_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/message"))
        .and(body_partial_json(json!({
            "messageName": "order-placed",
            "resultEnabled": true,
            "variablesInResultEnabled": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "resultType": "ProcessDefinition",
            "execution": null,
            "processInstance": { "id": "p9", "ended": false, "suspended": false },
            "variables": { "orderId": { "value": 7, "type": "Integer", "valueInfo": {} } }
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let results = client(&server)
        .messages()
        .correlate()
        .with_name("order-placed")
        .send_with_result(true)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].result_type,
        MessageCorrelationResultType::ProcessDefinition
    );
    assert_eq!(
        results[0].process_instance.as_ref().map(|p| p.id.as_str()),
        Some("p9")
    );
    assert_eq!(results[0].variables["orderId"].value, json!(7));
}

#[tokio::test]
async fn message_without_name_is_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .messages()
        .correlate()
        .with_business_key("order-1")
        .send()
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidParameters(_)));
}

#[tokio::test]
async fn signal_is_thrown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/signal"))
        .and(body_json(json!({
            "name": "alert",
            "variables": { "level": { "value": 3, "type": "Integer" } },
            "tenantId": "acme"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .signals()
        .throw()
        .with_name("alert")
        .with_variable("level", 3)
        .with_tenant_id("acme")
        .send()
        .await
        .unwrap();
}
