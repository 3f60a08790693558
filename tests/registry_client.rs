use registry_browser::image::manifest::{
    DOCKER_MANIFEST_LIST_V2, DOCKER_MANIFEST_V2, MANIFEST_ACCEPT, OCI_IMAGE_INDEX,
    OCI_IMAGE_MANIFEST,
};
use registry_browser::{Logger, RegistryClient, RegistryConnection, RegistryError};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const AMD64_DIGEST: &str = "sha256:1111111111111111111111111111111111111111111111111111111111111111";
const ARM64_DIGEST: &str = "sha256:2222222222222222222222222222222222222222222222222222222222222222";
const CONFIG_DIGEST: &str = "sha256:cccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccc";

fn client_for(server: &MockServer) -> RegistryClient {
    let connection = RegistryConnection::new(format!("{}/", server.uri()));
    RegistryClient::from_connection_with_logger(&connection, Logger::new_quiet()).unwrap()
}

fn concrete_manifest(layer_sizes: &[u64]) -> serde_json::Value {
    json!({
        "schemaVersion": 2,
        "mediaType": DOCKER_MANIFEST_V2,
        "config": {
            "mediaType": "application/vnd.docker.container.image.v1+json",
            "size": 1469,
            "digest": CONFIG_DIGEST
        },
        "layers": layer_sizes.iter().enumerate().map(|(i, size)| json!({
            "mediaType": "application/vnd.docker.image.rootfs.diff.tar.gzip",
            "size": size,
            "digest": format!("sha256:{:064}", i)
        })).collect::<Vec<_>>()
    })
}

fn manifest_response(body: serde_json::Value, media_type: &str, digest: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_raw(body.to_string(), media_type)
        .insert_header("Docker-Content-Digest", digest)
}

fn manifest_list(entries: &[(&str, &str, &str)]) -> serde_json::Value {
    json!({
        "schemaVersion": 2,
        "mediaType": DOCKER_MANIFEST_LIST_V2,
        "manifests": entries.iter().map(|(digest, os, arch)| json!({
            "mediaType": DOCKER_MANIFEST_V2,
            "size": 528,
            "digest": digest,
            "platform": {"os": os, "architecture": arch}
        })).collect::<Vec<_>>()
    })
}

#[tokio::test]
async fn check_connection_accepts_ok_and_unauthorized() {
    for status in [200, 401] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/"))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .check_connection()
            .await
            .unwrap_or_else(|e| panic!("status {status} should be accepted: {e}"));
    }
}

#[tokio::test]
async fn check_connection_rejects_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .mount(&server)
        .await;

    let err = client_for(&server).check_connection().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn check_connection_reports_refused_connections() {
    // Reserve a port, then free it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let connection = RegistryConnection::new(format!("http://127.0.0.1:{}", port));
    let client = RegistryClient::from_connection_with_logger(&connection, Logger::new_quiet()).unwrap();

    let err = client.check_connection().await.unwrap_err();
    assert!(matches!(err, RegistryError::Connection(_)), "got {err:?}");
}

#[tokio::test]
async fn basic_auth_is_sent_only_with_both_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/_catalog"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"repositories": []})))
        .mount(&server)
        .await;

    let with_auth = RegistryConnection::new(server.uri()).with_credentials("admin", "secret");
    let half_auth = RegistryConnection::new(server.uri()).with_credentials("admin", "");

    RegistryClient::from_connection(&with_auth)
        .unwrap()
        .get_catalog()
        .await
        .unwrap();
    RegistryClient::from_connection(&half_auth)
        .unwrap()
        .get_catalog()
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let first = requests[0]
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok());
    assert_eq!(first, Some("Basic YWRtaW46c2VjcmV0"));
    assert!(requests[1].headers.get("authorization").is_none());
}

#[tokio::test]
async fn catalog_is_decoded_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/_catalog"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "repositories": ["library/alpine", "app", "app"]
        })))
        .mount(&server)
        .await;

    let catalog = client_for(&server).get_catalog().await.unwrap();
    assert_eq!(catalog.repositories, vec!["library/alpine", "app", "app"]);
}

#[tokio::test]
async fn catalog_failure_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/_catalog"))
        .respond_with(ResponseTemplate::new(403).set_body_string(r#"{"errors":[{"code":"DENIED"}]}"#))
        .mount(&server)
        .await;

    match client_for(&server).get_catalog().await.unwrap_err() {
        RegistryError::UnexpectedStatus { status, body, .. } => {
            assert_eq!(status, 403);
            assert_eq!(body, r#"{"errors":[{"code":"DENIED"}]}"#);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_catalog_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/_catalog"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_catalog().await.unwrap_err();
    assert!(matches!(err, RegistryError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn tags_keep_registry_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/library/alpine/tags/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "library/alpine",
            "tags": ["latest", "3.19", "3.20", "edge"]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let tags = client.get_tags("library/alpine").await.unwrap();
    assert_eq!(tags.name, "library/alpine");
    assert_eq!(tags.tags, vec!["latest", "3.19", "3.20", "edge"]);

    let info = client.get_repository_info("library/alpine").await.unwrap();
    assert_eq!(info.tag_count, 4);
}

#[tokio::test]
async fn concrete_manifest_uses_headers_for_digest_and_media_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/app/manifests/v1"))
        .respond_with(manifest_response(
            concrete_manifest(&[100, 0, 2_000]),
            OCI_IMAGE_MANIFEST,
            AMD64_DIGEST,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let manifest = client_for(&server).get_manifest("app", "v1").await.unwrap();
    assert_eq!(manifest.digest, AMD64_DIGEST);
    assert_eq!(manifest.media_type, OCI_IMAGE_MANIFEST);
    assert_eq!(manifest.total_size, 1469 + 100 + 0 + 2_000);
    assert_eq!(manifest.layers.len(), 3);

    let requests = server.received_requests().await.unwrap();
    let accept = requests[0].headers.get("accept").and_then(|v| v.to_str().ok());
    assert_eq!(accept, Some(MANIFEST_ACCEPT));
}

#[tokio::test]
async fn manifest_list_resolves_to_linux_amd64() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/app/manifests/latest"))
        .respond_with(manifest_response(
            manifest_list(&[
                (ARM64_DIGEST, "linux", "arm64"),
                (AMD64_DIGEST, "linux", "amd64"),
            ]),
            DOCKER_MANIFEST_LIST_V2,
            "sha256:ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v2/app/manifests/{}", AMD64_DIGEST)))
        .respond_with(manifest_response(concrete_manifest(&[10]), DOCKER_MANIFEST_V2, AMD64_DIGEST))
        .expect(1)
        .mount(&server)
        .await;

    let manifest = client_for(&server).get_manifest("app", "latest").await.unwrap();
    assert_eq!(manifest.digest, AMD64_DIGEST);
    assert_eq!(manifest.media_type, DOCKER_MANIFEST_V2);
}

#[tokio::test]
async fn oci_index_without_amd64_resolves_to_first_entry() {
    let server = MockServer::start().await;
    let mut index = manifest_list(&[(ARM64_DIGEST, "linux", "arm64"), (AMD64_DIGEST, "windows", "amd64")]);
    index["mediaType"] = json!(OCI_IMAGE_INDEX);

    Mock::given(method("GET"))
        .and(path("/v2/app/manifests/latest"))
        .respond_with(manifest_response(index, OCI_IMAGE_INDEX, AMD64_DIGEST))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v2/app/manifests/{}", ARM64_DIGEST)))
        .respond_with(manifest_response(concrete_manifest(&[]), OCI_IMAGE_MANIFEST, ARM64_DIGEST))
        .expect(1)
        .mount(&server)
        .await;

    let manifest = client_for(&server).get_manifest("app", "latest").await.unwrap();
    assert_eq!(manifest.digest, ARM64_DIGEST);
    assert_eq!(manifest.total_size, 1469);
}

#[tokio::test]
async fn empty_manifest_list_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/app/manifests/latest"))
        .respond_with(manifest_response(manifest_list(&[]), DOCKER_MANIFEST_LIST_V2, AMD64_DIGEST))
        .mount(&server)
        .await;

    let err = client_for(&server).get_manifest("app", "latest").await.unwrap_err();
    assert!(err.is_not_found(), "got {err:?}");
}

#[tokio::test]
async fn nested_manifest_lists_stop_after_one_hop() {
    let server = MockServer::start().await;
    let list = manifest_list(&[(AMD64_DIGEST, "linux", "amd64")]);
    Mock::given(method("GET"))
        .and(path("/v2/app/manifests/latest"))
        .respond_with(manifest_response(list.clone(), DOCKER_MANIFEST_LIST_V2, ARM64_DIGEST))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v2/app/manifests/{}", AMD64_DIGEST)))
        .respond_with(manifest_response(list, DOCKER_MANIFEST_LIST_V2, AMD64_DIGEST))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).get_manifest("app", "latest").await.unwrap_err();
    assert!(matches!(err, RegistryError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn missing_manifest_is_an_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/app/manifests/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_string("MANIFEST_UNKNOWN"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_manifest("app", "nope").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("MANIFEST_UNKNOWN"));
}

#[tokio::test]
async fn image_config_blob_is_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v2/app/blobs/{}", CONFIG_DIGEST)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "architecture": "amd64",
            "os": "linux",
            "config": {"Cmd": ["/app"], "Labels": {"org.opencontainers.image.source": "https://example.com"}},
            "rootfs": {"type": "layers", "diff_ids": []}
        })))
        .mount(&server)
        .await;

    let config = client_for(&server)
        .get_image_config("app", CONFIG_DIGEST)
        .await
        .unwrap();
    assert_eq!(config.os, "linux");
    assert_eq!(config.config.cmd, Some(vec!["/app".to_string()]));
    assert_eq!(config.rootfs.fs_type, "layers");
}

#[tokio::test]
async fn image_info_combines_manifest_and_config() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/app/manifests/v1"))
        .respond_with(manifest_response(concrete_manifest(&[500, 31]), DOCKER_MANIFEST_V2, AMD64_DIGEST))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v2/app/blobs/{}", CONFIG_DIGEST)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"architecture": "amd64", "os": "linux"})))
        .mount(&server)
        .await;

    let info = client_for(&server).get_image_info("app", "v1").await.unwrap();
    assert_eq!(info.name, "app");
    assert_eq!(info.tag, "v1");
    assert_eq!(info.digest, AMD64_DIGEST);
    assert_eq!(info.total_size, 1469 + 500 + 31);
    assert_eq!(info.layer_count, 2);
    assert_eq!(info.config.architecture, "amd64");
}

#[tokio::test]
async fn image_info_fails_when_config_blob_is_missing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/app/manifests/v1"))
        .respond_with(manifest_response(concrete_manifest(&[1]), DOCKER_MANIFEST_V2, AMD64_DIGEST))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v2/app/blobs/{}", CONFIG_DIGEST)))
        .respond_with(ResponseTemplate::new(404).set_body_string("BLOB_UNKNOWN"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_image_info("app", "v1").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn delete_accepts_ok_and_accepted() {
    for status in [200, 202] {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path(format!("/v2/app/manifests/{}", AMD64_DIGEST)))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .delete_manifest("app", AMD64_DIGEST)
            .await
            .unwrap_or_else(|e| panic!("status {status} should be accepted: {e}"));
    }
}

#[tokio::test]
async fn delete_rejects_other_statuses_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("/v2/app/manifests/{}", AMD64_DIGEST)))
        .respond_with(ResponseTemplate::new(405).set_body_string("UNSUPPORTED"))
        .mount(&server)
        .await;

    match client_for(&server).delete_manifest("app", AMD64_DIGEST).await.unwrap_err() {
        RegistryError::UnexpectedStatus { status, body, .. } => {
            assert_eq!(status, 405);
            assert_eq!(body, "UNSUPPORTED");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
