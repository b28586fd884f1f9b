#![allow(clippy::unwrap_used)]
// Integration tests for `Console` against a mocked management API.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use qmc_core::{
    Console, ConsoleConfig, CoreError, Credentials, DeletePlan, ReplicationNodePanel, Submission,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Console) {
    let server = MockServer::start().await;
    let config = ConsoleConfig::new(Url::parse(&server.uri()).unwrap());
    (server, Console::new(config).unwrap())
}

fn node_body(remotes: Value) -> Value {
    json!([{
        "id": "n1",
        "name": "node1",
        "role": "MASTER",
        "groupName": "grp",
        "address": "h1:5000",
        "statistics": {"lastKnownReplicationTransactionId": 9},
        "environmentConfiguration": {"je.cleaner.threads": "2"},
        "remotereplicationnodes": remotes
    }])
}

async fn mount_metadata(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/service/metadata"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "GroupProvider": {
                "GroupFile": {"attributes": {"name": {"type": "String"}, "path": {"type": "String"}}},
                "ManagedGroupProvider": {"attributes": {"name": {"type": "String"}}}
            },
            "Plugin": {
                "MANAGEMENT-JMX": {"attributes": {"usePlatformMBeanServer": {"type": "Boolean"}}}
            }
        })))
        .expect(1)
        .mount(server)
        .await;
}

// ── HA panel ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_panel_flattens_and_syncs() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/latest/virtualhostnode/node1"))
        .and(query_param("depth", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(node_body(json!([
            {"name": "node2", "role": "REPLICA", "statistics": {"lastKnownReplicationTransactionId": 8}}
        ]))))
        .mount(&server)
        .await;

    let mut panel = ReplicationNodePanel::new();
    let first = console.refresh_panel(&mut panel, "node1").await.unwrap();
    assert!(first.members);
    assert!(first.environment);

    let members = panel.members().rows();
    assert_eq!(members[0]["lastKnownReplicationTransactionId"], 8);
    assert_eq!(members[1]["lastKnownReplicationTransactionId"], 9);

    let second = console.refresh_panel(&mut panel, "node1").await.unwrap();
    assert!(!second.any());
}

#[tokio::test]
async fn test_missing_node_is_not_found() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/latest/virtualhostnode/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = console.replication_node("gone").await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { ref name, .. } if name == "gone"));
}

#[tokio::test]
async fn test_failed_node_load_keeps_server_message() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/latest/virtualhostnode/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"errorMessage": "store unavailable"})))
        .mount(&server)
        .await;

    let err = console.replication_node("broken").await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::Api { ref message, status: Some(500) } if message == "store unavailable"
    ));
}

#[tokio::test]
async fn test_transfer_mastership_puts_role() {
    let (server, console) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/latest/replicationnode/node1/node2"))
        .and(body_json(json!({"role": "MASTER"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    console.transfer_mastership("node1", "node2").await.unwrap();
}

#[tokio::test]
async fn test_remove_and_delete_nodes() {
    let (server, console) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/latest/replicationnode/node1/node3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/latest/virtualhostnode/node1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    console.remove_replication_node("node1", "node3").await.unwrap();
    console.delete_virtual_host_node("node1").await.unwrap();
}

#[tokio::test]
async fn test_forbidden_operation() {
    let (server, console) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/latest/virtualhostnode/node1"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = console.delete_virtual_host_node("node1").await.unwrap_err();
    assert!(matches!(err, CoreError::AccessForbidden));
}

// ── Group providers ─────────────────────────────────────────────────

#[tokio::test]
async fn test_add_group_provider() {
    let (server, console) = setup().await;
    mount_metadata(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/latest/groupprovider"))
        .and(body_json(json!({"name": "file", "type": "GroupFile", "path": "/etc/groups"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let types = console.group_provider_types().await.unwrap();
    assert_eq!(types[0].id, "GroupFile");

    let mut dialog = console.open_group_provider_add().await.unwrap();
    dialog
        .select_type(console.metadata().await.unwrap(), "GroupFile")
        .unwrap();
    dialog.set("name", json!("file")).unwrap();
    dialog.set("path", json!("/etc/groups")).unwrap();

    let submission = console.submit_group_provider(&dialog).await.unwrap();
    assert!(matches!(submission, Submission::Create(_)));
}

#[tokio::test]
async fn test_edit_group_provider_sends_changes() {
    let (server, console) = setup().await;
    mount_metadata(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/latest/groupprovider/file"))
        .and(query_param("actuals", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "file", "type": "GroupFile", "path": "/etc/groups"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/latest/groupprovider/file"))
        .and(body_json(json!({"path": "/etc/qpid/groups"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut dialog = console.open_group_provider_edit("file").await.unwrap();
    assert_eq!(dialog.title(), "Edit Group Provider - file");
    dialog.set("path", json!("/etc/qpid/groups")).unwrap();
    console.submit_group_provider(&dialog).await.unwrap();
}

#[tokio::test]
async fn test_list_and_delete_group_providers() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/latest/groupprovider"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a1", "name": "file"},
            {"id": "b2", "name": "managed"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/latest/groupprovider"))
        .and(query_param("id", "a1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let rows = console.list_group_providers().await.unwrap();
    assert_eq!(rows.len(), 2);

    let plan = DeletePlan::from_selection(&rows[..1], "Delete group provider").unwrap();
    assert_eq!(plan.message(), "Delete group provider 'file'?");
    console
        .delete_objects("groupprovider", None, &plan, None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_rows_by_reference() {
    let (server, console) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/latest/queue/vh/vh"))
        .and(query_param("id", "q 1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let rows: Vec<_> = json!([{"id": "q 1", "name": "q1"}])
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect();
    let plan = DeletePlan::from_selection(&rows, "Delete queue").unwrap();
    console
        .delete_rows("api/latest/queue/vh/vh", &plan, None)
        .await
        .unwrap();
}

// ── JMX plugin ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_jmx_save_sends_changed_values() {
    let (server, console) = setup().await;
    mount_metadata(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/latest/plugin/jmxManagement"))
        .and(query_param("actuals", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "jmxManagement", "type": "MANAGEMENT-JMX", "usePlatformMBeanServer": true}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/latest/plugin/jmxManagement"))
        .and(body_json(json!({"usePlatformMBeanServer": false})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut dialog = console.open_jmx_editor("jmxManagement").await.unwrap();
    dialog.set("usePlatformMBeanServer", json!(false)).unwrap();
    let sent = console.save_jmx(&dialog).await.unwrap();
    assert_eq!(Value::Object(sent), json!({"usePlatformMBeanServer": false}));
}

#[tokio::test]
async fn test_jmx_editor_rejects_other_plugins() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/latest/plugin/httpManagement"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "httpManagement", "type": "MANAGEMENT-HTTP"}
        ])))
        .mount(&server)
        .await;

    let err = console.open_jmx_editor("httpManagement").await.unwrap_err();
    assert!(matches!(err, CoreError::NotAllowed { .. }));
}

// ── Credentials ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_credentials_are_sent() {
    let server = MockServer::start().await;
    let mut config = ConsoleConfig::new(Url::parse(&server.uri()).unwrap());
    config.credentials = Some(Credentials::new(
        "admin",
        SecretString::from("admin".to_owned()),
    ));
    let console = Console::new(config).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/latest/groupprovider"))
        .and(header("authorization", "Basic YWRtaW46YWRtaW4="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    assert!(console.list_group_providers().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unauthenticated_request() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/latest/groupprovider"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = console.list_group_providers().await.unwrap_err();
    assert!(matches!(err, CoreError::AuthenticationRequired));
}
