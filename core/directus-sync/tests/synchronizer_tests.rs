use directus_client::{ClientConfig, DirectusClient};
use directus_model::{kinds, FieldValue, Record, ResourceSchema};
use directus_sync::{EntitySynchronizer, ReadOutcome, ResourceLifecycle, SyncError};
use directus_types::RemoteId;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn synchronizer(server: &MockServer, schema: ResourceSchema) -> EntitySynchronizer {
    let config = ClientConfig {
        base_url: server.uri(),
        token: "test-token".to_string(),
        insecure_http: true,
        ..Default::default()
    };
    let client = DirectusClient::new(&config).unwrap();
    EntitySynchronizer::new(Arc::new(client), schema)
}

fn data(value: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "data": value }))
}

fn text(s: &str) -> FieldValue {
    FieldValue::Text(s.into())
}

async fn mount_role_read(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/roles/r1"))
        .and(query_param("fields", "*,policies.policy.id"))
        .respond_with(data(body))
        .mount(server)
        .await;
}

// ── Create ──────────────────────────────────────────────────────

#[tokio::test]
async fn create_role_attaches_policies_then_rereads() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/roles"))
        .and(body_json(json!({"name": "Editors"})))
        .respond_with(data(json!({"id": "r1", "name": "Editors"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/roles/r1"))
        .and(body_json(json!({"policies": {
            "create": [
                {"role": "r1", "policy": {"id": "p1"}},
                {"role": "r1", "policy": {"id": "p2"}}
            ],
            "update": [],
            "delete": []
        }})))
        .respond_with(data(json!({"id": "r1"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_role_read(
        &server,
        json!({
            "id": "r1",
            "name": "Editors",
            "icon": null,
            "policies": [{"policy": {"id": "p1"}}, {"policy": {"id": "p2"}}]
        }),
    )
    .await;

    let roles = synchronizer(&server, kinds::role());
    let desired = Record::new()
        .with("name", text("Editors"))
        .with("description", text(""))
        .with_associations(["p1", "p2", "p1"]);
    let created = roles.create(&desired).await.unwrap();

    assert_eq!(
        created,
        Record::new()
            .with_id("r1")
            .with("name", text("Editors"))
            .with_associations(["p1", "p2"])
    );
}

#[tokio::test]
async fn create_role_without_policies_skips_patch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/roles"))
        .respond_with(data(json!({"id": "r1"})))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(data(json!({})))
        .expect(0)
        .mount(&server)
        .await;
    mount_role_read(&server, json!({"id": "r1", "name": "Solo", "policies": []})).await;

    let roles = synchronizer(&server, kinds::role());
    for desired in [
        Record::new().with("name", text("Solo")),
        Record::new().with("name", text("Solo")).with_associations(Vec::<String>::new()),
    ] {
        let created = roles.create(&desired).await.unwrap();
        assert_eq!(created.associations, Some(vec![]));
    }
}

#[tokio::test]
async fn create_permission_sends_raw_json_as_structure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/permissions"))
        .and(body_json(json!({
            "collection": "articles",
            "action": "read",
            "policy": "p1",
            "permissions": {"status": {"_eq": "published"}},
            "fields": ["*"]
        })))
        .respond_with(data(json!({"id": 7.0})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/permissions/7"))
        .respond_with(data(json!({
            "id": 7,
            "collection": "articles",
            "action": "read",
            "policy": "p1",
            "permissions": {"status": {"_eq": "published"}},
            "validation": null,
            "presets": null,
            "fields": ["*"],
            "system": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let permissions = synchronizer(&server, kinds::permission());
    let desired = Record::new()
        .with("collection", text("articles"))
        .with("action", text("read"))
        .with("policy", text("p1"))
        .with("permissions", FieldValue::RawJson(r#"{"status":{"_eq":"published"}}"#.into()))
        .with("validation", FieldValue::RawJson(String::new()))
        .with("fields", FieldValue::TextList(vec!["*".into()]));
    let created = permissions.create(&desired).await.unwrap();

    assert_eq!(created.id, Some(RemoteId::Int(7)));
    assert_eq!(created.get_bool("system"), Some(false));
    assert_eq!(created.get_str("permissions"), Some(r#"{"status":{"_eq":"published"}}"#));
}

#[tokio::test]
async fn create_with_invalid_raw_json_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(data(json!({"id": 1})))
        .expect(0)
        .mount(&server)
        .await;

    let permissions = synchronizer(&server, kinds::permission());
    let desired = Record::new()
        .with("policy", text("p1"))
        .with("presets", FieldValue::RawJson("{broken".into()));
    let err = permissions.create(&desired).await.unwrap_err();
    assert!(matches!(err, SyncError::InvalidPayload { ref field, .. } if field == "presets"));
}

#[tokio::test]
async fn create_surfaces_api_rejection_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/policies"))
        .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"errors":[{"message":"bad"}]}"#))
        .mount(&server)
        .await;

    let policies = synchronizer(&server, kinds::policy());
    let err = policies
        .create(&Record::new().with("name", text("x")))
        .await
        .unwrap_err();
    match err {
        SyncError::Api { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, r#"{"errors":[{"message":"bad"}]}"#);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn create_dangling_policy_reference_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/roles"))
        .respond_with(data(json!({"id": "r1"})))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/roles/r1"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let roles = synchronizer(&server, kinds::role());
    let desired = Record::new()
        .with("name", text("r"))
        .with_associations(["missing-policy"]);
    let err = roles.create(&desired).await.unwrap_err();
    assert!(matches!(err, SyncError::Api { status: 403, .. }));
}

#[tokio::test]
async fn create_response_without_id_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/policies"))
        .respond_with(data(json!({"name": "x"})))
        .mount(&server)
        .await;

    let policies = synchronizer(&server, kinds::policy());
    let err = policies
        .create(&Record::new().with("name", text("x")))
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Decode(_)));
}

// ── Update ──────────────────────────────────────────────────────

#[tokio::test]
async fn update_patches_scalars_then_diffs_policies() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/roles/r1"))
        .and(body_json(json!({"name": "Editors", "icon": null, "description": null})))
        .respond_with(data(json!({"id": "r1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/roles/r1"))
        .and(query_param("fields", "policies.policy.id"))
        .respond_with(data(json!({"policies": [{"policy": {"id": "p2"}}, {"policy": {"id": "p3"}}]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/roles/r1"))
        .and(body_json(json!({"policies": {
            "create": [{"role": "r1", "policy": {"id": "p1"}}],
            "update": [],
            "delete": [{"role": "r1", "policy": {"id": "p3"}}]
        }})))
        .respond_with(data(json!({"id": "r1"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_role_read(
        &server,
        json!({
            "id": "r1",
            "name": "Editors",
            "policies": [{"policy": {"id": "p2"}}, {"policy": {"id": "p1"}}]
        }),
    )
    .await;

    let roles = synchronizer(&server, kinds::role());
    let desired = Record::new()
        .with("name", text("Editors"))
        .with("description", text(""))
        .with_associations(["p1", "p2"]);
    let updated = roles.update(&RemoteId::from("r1"), &desired).await.unwrap();
    assert_eq!(updated.associations, Some(vec!["p2".to_string(), "p1".to_string()]));
}

#[tokio::test]
async fn update_with_unchanged_policies_skips_junction_patch() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/roles/r1"))
        .and(body_partial_json(json!({"name": "Editors"})))
        .respond_with(data(json!({"id": "r1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(body_partial_json(json!({"policies": {"update": []}})))
        .respond_with(data(json!({})))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/roles/r1"))
        .and(query_param("fields", "policies.policy.id"))
        .respond_with(data(json!({"policies": [{"policy": "p1"}]})))
        .expect(1)
        .mount(&server)
        .await;
    mount_role_read(
        &server,
        json!({"id": "r1", "name": "Editors", "policies": [{"policy": {"id": "p1"}}]}),
    )
    .await;

    let roles = synchronizer(&server, kinds::role());
    let desired = Record::new()
        .with("name", text("Editors"))
        .with_associations(["p1"]);
    roles.update(&RemoteId::from("r1"), &desired).await.unwrap();
}

#[tokio::test]
async fn update_with_undeclared_policies_leaves_them_alone() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/roles/r1"))
        .respond_with(data(json!({"id": "r1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("fields", "policies.policy.id"))
        .respond_with(data(json!({"policies": []})))
        .expect(0)
        .mount(&server)
        .await;
    mount_role_read(
        &server,
        json!({"id": "r1", "name": "Editors", "policies": [{"policy": {"id": "keep"}}]}),
    )
    .await;

    let roles = synchronizer(&server, kinds::role());
    let updated = roles
        .update(&RemoteId::from("r1"), &Record::new().with("name", text("Editors")))
        .await
        .unwrap();
    assert_eq!(updated.associations, Some(vec!["keep".to_string()]));
}

#[tokio::test]
async fn update_with_empty_policies_detaches_all_without_deleting_role() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/roles/r1"))
        .and(body_partial_json(json!({"name": "Editors"})))
        .respond_with(data(json!({"id": "r1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/roles/r1"))
        .and(query_param("fields", "policies.policy.id"))
        .respond_with(data(json!({"policies": [{"policy": {"id": "p1"}}]})))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/roles/r1"))
        .and(body_json(json!({"policies": {
            "create": [],
            "update": [],
            "delete": [{"role": "r1", "policy": {"id": "p1"}}]
        }})))
        .respond_with(data(json!({"id": "r1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;
    mount_role_read(&server, json!({"id": "r1", "name": "Editors", "policies": []})).await;

    let roles = synchronizer(&server, kinds::role());
    let desired = Record::new()
        .with("name", text("Editors"))
        .with_associations(Vec::<String>::new());
    let updated = roles.update(&RemoteId::from("r1"), &desired).await.unwrap();
    assert_eq!(updated.associations, Some(vec![]));
}

#[tokio::test]
async fn update_reread_404_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/policies/p1"))
        .respond_with(data(json!({"id": "p1"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/policies/p1"))
        .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
        .mount(&server)
        .await;

    let policies = synchronizer(&server, kinds::policy());
    let err = policies
        .update(&RemoteId::from("p1"), &Record::new().with("name", text("x")))
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Api { status: 404, .. }));
    assert!(err.is_not_found());
}

// ── Delete ──────────────────────────────────────────────────────

#[tokio::test]
async fn delete_succeeds_on_204_and_404() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/policies/p1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/policies/p2"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let policies = synchronizer(&server, kinds::policy());
    policies.delete(&RemoteId::from("p1")).await.unwrap();
    policies.delete(&RemoteId::from("p2")).await.unwrap();
}

#[tokio::test]
async fn delete_surfaces_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/permissions/3"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let permissions = synchronizer(&server, kinds::permission());
    let err = permissions.delete(&RemoteId::Int(3)).await.unwrap_err();
    assert_eq!(err.to_string(), "directus api 500: boom");
}

// ── Read ────────────────────────────────────────────────────────

#[tokio::test]
async fn read_present_and_gone() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/f1"))
        .respond_with(data(json!({
            "id": "f1",
            "title": "Logo",
            "filesize": "2048",
            "metadata": {"exif": {}},
            "uploaded_on": "2024-01-01T00:00:00Z"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/f2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let files = synchronizer(&server, kinds::file());
    let present = files.read(&RemoteId::from("f1")).await.unwrap().into_record().unwrap();
    assert_eq!(present.get_str("title"), Some("Logo"));
    assert_eq!(present.get_int("filesize"), Some(2048));
    assert_eq!(present.get_str("metadata"), Some(r#"{"exif":{}}"#));
    assert_eq!(present.get_str("uploaded_on"), Some("2024-01-01T00:00:00Z"));

    let gone = files.read(&RemoteId::from("f2")).await.unwrap();
    assert_eq!(gone, ReadOutcome::Gone);
}

#[tokio::test]
async fn read_forbidden_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/policies/p1"))
        .respond_with(ResponseTemplate::new(403).set_body_string("no"))
        .mount(&server)
        .await;

    let policies = synchronizer(&server, kinds::policy());
    let err = policies.read(&RemoteId::from("p1")).await.unwrap_err();
    assert!(matches!(err, SyncError::Api { status: 403, .. }));
}

#[tokio::test]
async fn read_malformed_envelope_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/policies/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let policies = synchronizer(&server, kinds::policy());
    let err = policies.read(&RemoteId::from("p1")).await.unwrap_err();
    assert!(matches!(err, SyncError::Decode(_)));
}

// ── Import ──────────────────────────────────────────────────────

#[tokio::test]
async fn import_permission_requires_integer_id() {
    let server = MockServer::start().await;
    let permissions = synchronizer(&server, kinds::permission());
    let err = permissions.import("abc").await.unwrap_err();
    assert!(matches!(err, SyncError::InvalidId { ref kind, .. } if kind == "permission"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn import_reads_existing_entity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/permissions/12"))
        .respond_with(data(json!({"id": "12", "policy": "p1", "action": "read"})))
        .expect(1)
        .mount(&server)
        .await;

    let permissions = synchronizer(&server, kinds::permission());
    let record = permissions.import("12").await.unwrap();
    assert_eq!(record.id, Some(RemoteId::Int(12)));
    assert_eq!(record.get_str("action"), Some("read"));
}

#[tokio::test]
async fn import_missing_entity_is_not_found() {
    let server = MockServer::start().await;
    let roles = synchronizer(&server, kinds::role());
    let err = roles.import("nope").await.unwrap_err();
    assert!(matches!(err, SyncError::NotFound { .. }));
    assert_eq!(err.to_string(), "role nope not found");
}

// ── Singleton ───────────────────────────────────────────────────

#[tokio::test]
async fn setting_create_patches_with_create_encoding() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/settings"))
        .and(body_json(json!({"project_name": "Site", "public_registration": false})))
        .respond_with(data(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/settings"))
        .respond_with(data(json!({
            "id": 1,
            "project_name": "Site",
            "public_registration": false,
            "project_id": "abc"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(data(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let settings = synchronizer(&server, kinds::setting());
    let desired = Record::new()
        .with("project_name", text("Site"))
        .with("project_color", text(""))
        .with("public_registration", FieldValue::Boolean(false));
    let record = settings.create(&desired).await.unwrap();
    assert_eq!(record.id, Some(RemoteId::from("1")));
    assert_eq!(record.get_str("project_id"), Some("abc"));
}

#[tokio::test]
async fn setting_update_sends_every_field() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/settings"))
        .respond_with(data(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/settings"))
        .respond_with(data(json!({"project_name": "Site"})))
        .mount(&server)
        .await;

    let settings = synchronizer(&server, kinds::setting());
    let id = RemoteId::from("settings");
    let record = settings
        .update(&id, &Record::new().with("project_name", text("Site")))
        .await
        .unwrap();
    assert_eq!(record.id, Some(id));

    let received = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&received[0].body).unwrap();
    let writable = kinds::setting().writable_fields().count();
    assert_eq!(body.as_object().unwrap().len(), writable);
    assert_eq!(body["custom_css"], Value::Null);
    assert!(body.get("project_id").is_none());
}

#[tokio::test]
async fn setting_delete_makes_no_request() {
    let server = MockServer::start().await;
    let settings = synchronizer(&server, kinds::setting());
    settings.delete(&RemoteId::from("1")).await.unwrap();
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── Idempotence ─────────────────────────────────────────────────

#[tokio::test]
async fn reapplying_read_state_changes_no_associations() {
    let server = MockServer::start().await;
    let observed = json!({
        "id": "r1",
        "name": "Editors",
        "icon": "badge",
        "policies": [{"policy": {"id": "p1"}}, {"policy": {"id": "p2"}}]
    });
    mount_role_read(&server, observed).await;
    Mock::given(method("GET"))
        .and(path("/roles/r1"))
        .and(query_param("fields", "policies.policy.id"))
        .respond_with(data(json!({"policies": [{"policy": {"id": "p1"}}, {"policy": {"id": "p2"}}]})))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/roles/r1"))
        .and(body_json(json!({"name": "Editors", "icon": "badge", "description": null})))
        .respond_with(data(json!({"id": "r1"})))
        .expect(1)
        .mount(&server)
        .await;

    let roles = synchronizer(&server, kinds::role());
    let current = roles.read(&RemoteId::from("r1")).await.unwrap().into_record().unwrap();
    let again = roles.update(&RemoteId::from("r1"), &current).await.unwrap();
    assert_eq!(again, current);
}
