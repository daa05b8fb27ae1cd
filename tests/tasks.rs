use camunda_api_client::external_task::{CompleteExternalTask, ExternalTaskFailure, FetchTopic};
use camunda_api_client::user_task::{IdentityLink, TaskQuery};
use camunda_api_client::{Client, Error, VariableValue, Variables};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> Client {
    Client::new(format!("{}/engine-rest", server.uri())).unwrap()
}

#[tokio::test]
async fn tasks_are_queried_by_assignee() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/task"))
        .and(body_json(json!({ "assignee": "demo" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "t1",
            "name": "Approve Invoice",
            "assignee": "demo",
            "created": "2013-01-23T13:42:42.000+0200",
            "due": null,
            "delegationState": "PENDING",
            "priority": 50,
            "suspended": false
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let query = TaskQuery {
        assignee: Some("demo".into()),
        ..Default::default()
    };
    let tasks = client(&server).user_tasks().query(query).list().await.unwrap();

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].priority, 50);
    assert!(tasks[0].created.is_some());
    assert!(tasks[0].due.is_none());
}

#[tokio::test]
async fn claim_returns_unit_on_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/task/t1/claim"))
        .and(body_json(json!({ "userId": "demo" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .user_tasks()
        .by_id("t1")
        .claim("demo")
        .await
        .unwrap();
}

#[tokio::test]
async fn task_is_completed_with_variables() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/task/t1/complete"))
        .and(body_json(json!({
            "variables": { "approved": { "value": true, "type": "Boolean" } }
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/task/t2/complete"))
        .and(body_json(json!({
            "variables": {},
            "withVariablesInReturn": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "approved": { "value": true, "type": "Boolean", "valueInfo": {} }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let mut variables = Variables::new();
    variables.insert("approved".into(), VariableValue::boolean(true));

    client
        .user_tasks()
        .by_id("t1")
        .complete(&variables)
        .await
        .unwrap();
    let returned = client
        .user_tasks()
        .by_id("t2")
        .complete_with_variables_in_return(&Variables::new())
        .await
        .unwrap();

    assert_eq!(returned["approved"].value, json!(true));
}

#[tokio::test]
async fn identity_links_are_filtered_by_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/engine-rest/task/t1/identity-links"))
        .and(query_param("type", "candidate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "userId": null, "groupId": "accounting", "type": "candidate" }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/task/t1/identity-links/delete"))
        .and(body_json(json!({ "groupId": "accounting", "type": "candidate" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let task = client(&server).user_tasks().by_id("t1");
    let links = task.identity_links(Some("candidate")).await.unwrap();

    assert_eq!(
        links,
        vec![IdentityLink {
            user_id: None,
            group_id: Some("accounting".into()),
            link_type: "candidate".into(),
        }]
    );

    task.delete_identity_link(&links[0]).await.unwrap();
}

#[tokio::test]
async fn external_tasks_are_fetched_and_locked() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/external-task/fetchAndLock"))
        .and(body_json(json!({
            "workerId": "worker-1",
            "maxTasks": 1,
            "topics": [{
                "topicName": "payment",
                "lockDuration": 10000,
                "variables": ["amount"]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "e1",
            "topicName": "payment",
            "workerId": "worker-1",
            "lockExpirationTime": "2015-10-06T16:34:42.000+0200",
            "retries": null,
            "suspended": false,
            "priority": 0,
            "variables": { "amount": { "value": 30, "type": "Integer", "valueInfo": {} } }
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let tasks = client(&server)
        .external_tasks()
        .fetch_and_lock()
        .with_worker_id("worker-1")
        .with_topic(FetchTopic::new("payment", 10_000).with_variables(["amount"]))
        .send()
        .await
        .unwrap();

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].task.id, "e1");
    assert!(tasks[0].task.lock_expiration_time.is_some());
    assert_eq!(tasks[0].variables["amount"].value_as::<i32>().unwrap(), 30);
}

#[tokio::test]
async fn fetch_without_worker_or_topic_is_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;
    let client = client(&server);

    let err = client
        .external_tasks()
        .fetch_and_lock()
        .with_topic(FetchTopic::new("payment", 10_000))
        .send()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidParameters(_)));

    let err = client
        .external_tasks()
        .fetch_and_lock()
        .with_worker_id("worker-1")
        .send()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidParameters(_)));
}

#[tokio::test]
async fn external_task_is_completed_or_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/external-task/e1/complete"))
        .and(body_json(json!({
            "workerId": "worker-1",
            "variables": { "paid": { "value": true, "type": "Boolean" } }
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/external-task/e2/failure"))
        .and(body_json(json!({
            "workerId": "worker-1",
            "errorMessage": "card declined",
            "retries": 2,
            "retryTimeout": 5000
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let mut variables = Variables::new();
    variables.insert("paid".into(), true.into());

    client
        .external_tasks()
        .by_id("e1")
        .complete(&CompleteExternalTask {
            worker_id: "worker-1".into(),
            variables,
            ..Default::default()
        })
        .await
        .unwrap();
    client
        .external_tasks()
        .by_id("e2")
        .handle_failure(&ExternalTaskFailure {
            worker_id: "worker-1".into(),
            error_message: Some("card declined".into()),
            retries: 2,
            retry_timeout: 5000,
            ..Default::default()
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn lock_is_extended() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/external-task/e1/extendLock"))
        .and(body_json(json!({ "workerId": "worker-1", "newDuration": 60000 })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .external_tasks()
        .by_id("e1")
        .extend_lock("worker-1", 60_000)
        .await
        .unwrap();
}
