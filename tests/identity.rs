use camunda_api_client::group::{GroupInfo, GroupQuery};
use camunda_api_client::tenant::TenantInfo;
use camunda_api_client::user::{UserCredentials, UserProfile};
use camunda_api_client::Client;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> Client {
    Client::new(format!("{}/engine-rest", server.uri())).unwrap()
}

#[tokio::test]
async fn group_is_created() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/group/create"))
        .and(body_json(json!({
            "id": "sales",
            "name": "Sales",
            "type": "WORKFLOW"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let group = GroupInfo {
        id: "sales".into(),
        name: Some("Sales".into()),
        group_type: Some("WORKFLOW".into()),
    };
    client(&server).groups().create(&group).await.unwrap();
}

#[tokio::test]
async fn groups_of_member_are_listed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/engine-rest/group"))
        .and(query_param("member", "demo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "sales", "name": "Sales", "type": "WORKFLOW" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let query = GroupQuery {
        member: Some("demo".into()),
        ..Default::default()
    };
    let groups = client(&server).groups().query(query).list().await.unwrap();

    assert_eq!(groups[0].group_type.as_deref(), Some("WORKFLOW"));
}

#[tokio::test]
async fn group_membership_is_changed() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/engine-rest/group/sales/members/demo"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/engine-rest/group/sales/members/john"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let group = client(&server).groups().by_id("sales");
    group.add_member("demo").await.unwrap();
    group.remove_member("john").await.unwrap();
}

#[tokio::test]
async fn tenant_is_renamed() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/engine-rest/tenant/t1"))
        .and(body_json(json!({ "id": "t1", "name": "Tenant One" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let tenant = TenantInfo {
        id: "t1".into(),
        name: Some("Tenant One".into()),
    };
    client(&server)
        .tenants()
        .by_id("t1")
        .update(&tenant)
        .await
        .unwrap();
}

#[tokio::test]
async fn tenant_members_are_managed() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/engine-rest/tenant/t1/user-members/demo"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/engine-rest/tenant/t1/group-members/sales"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let tenant = client(&server).tenants().by_id("t1");
    tenant.add_user("demo").await.unwrap();
    tenant.remove_group("sales").await.unwrap();
}

#[tokio::test]
async fn user_is_created_with_password() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/engine-rest/user/create"))
        .and(body_json(json!({
            "profile": {
                "id": "jonny",
                "firstName": "John",
                "lastName": "Doe",
                "email": null
            },
            "credentials": { "password": "s3cret" }
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let profile = UserProfile {
        id: "jonny".into(),
        first_name: Some("John".into()),
        last_name: Some("Doe".into()),
        email: None,
    };
    let credentials = UserCredentials {
        password: "s3cret".into(),
    };
    client(&server)
        .users()
        .create(&profile, &credentials)
        .await
        .unwrap();
}

#[tokio::test]
async fn user_password_is_changed() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/engine-rest/user/jonny/credentials"))
        .and(body_json(json!({
            "password": "n3w",
            "authenticatedUserPassword": "demo"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .users()
        .by_id("jonny")
        .update_credentials("n3w", "demo")
        .await
        .unwrap();
}

#[tokio::test]
async fn user_profile_is_read() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/engine-rest/user/jonny/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "jonny",
            "firstName": "John",
            "lastName": "Doe",
            "email": "john@example.org"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = client(&server)
        .users()
        .by_id("jonny")
        .profile()
        .await
        .unwrap();

    assert_eq!(profile.email.as_deref(), Some("john@example.org"));
}
