//! Request/response behavior against a mock Wistia server

use serde_json::{json, Value};
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{basic_auth, body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wistia_client::prelude::*;

const SECRET: &str = "test-secret";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("wistia_client=debug")
        .with_test_writer()
        .try_init();
}

fn client_for(server: &MockServer, format: Format) -> WistiaClient {
    init_tracing();
    let config = ClientConfig::new(SECRET)
        .with_base_url(format!("{}/v1/", server.uri()))
        .with_format(format)
        .with_timeout(Duration::from_secs(5));
    WistiaClient::with_config(config).unwrap()
}

fn params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

#[tokio::test]
async fn test_get_decodes_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/medias.json"))
        .and(basic_auth("api", SECRET))
        .and(header_exists("x-request-id"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "id": 1, "name": "Video A" }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Format::Json);
    let result = client.get("medias", &Params::new()).await.unwrap();

    assert_eq!(result, json!([{ "id": 1, "name": "Video A" }]));
}

#[tokio::test]
async fn test_decoded_objects_keep_key_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/medias/abc.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"z": 1, "a": 2, "m": {"y": 0, "b": 1}}"#),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Format::Json);
    let result = client.get("medias/abc", &Params::new()).await.unwrap();

    let keys: Vec<&str> = result.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["z", "a", "m"]);

    let nested: Vec<&str> = result["m"].as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(nested, ["y", "b"]);
}

#[tokio::test]
async fn test_get_sends_params_as_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/medias.json"))
        .and(query_param("project_id", "abc"))
        .and(query_param("sort[by]", "created"))
        .and(query_param("archived", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Format::Json);
    let filters = params(json!({
        "project_id": "abc",
        "sort": { "by": "created" },
        "archived": false
    }));

    assert_eq!(client.get("medias", &filters).await.unwrap(), json!([]));
}

#[tokio::test]
async fn test_client_error_yields_status_descriptor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/medias.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server, Format::Json);
    let err = client.get("medias", &Params::new()).await.unwrap_err();

    assert!(err.is_client_error());
    assert_eq!(err.status(), Some(404));
    assert_eq!(
        serde_json::to_value(err.descriptor().unwrap()).unwrap(),
        json!({ "status": 404 })
    );
}

#[tokio::test]
async fn test_every_verb_maps_client_errors() {
    let server = MockServer::start().await;
    Mock::given(path("/v1/medias/1.json"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let client = client_for(&server, Format::Json);
    let empty = Params::new();
    let results = [
        client.get("medias/1", &empty).await,
        client.post("medias/1", &empty).await,
        client.put("medias/1", &empty).await,
        client.delete("medias/1", &empty).await,
    ];

    for result in results {
        let err = result.unwrap_err();
        assert_eq!(err.descriptor(), Some(ErrorDescriptor { status: 401 }));
    }
}

#[tokio::test]
async fn test_post_sends_json_body_with_accept_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/medias/1/captions.json"))
        .and(header("accept", "application/json"))
        .and(body_json(json!({ "language": "eng" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "language": "eng" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Format::Json);
    let result = client
        .post("medias/1/captions", &params(json!({ "language": "eng" })))
        .await
        .unwrap();

    assert_eq!(result, json!({ "language": "eng" }));
}

#[tokio::test]
async fn test_put_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/medias/abc.json"))
        .and(header("accept", "application/json"))
        .and(body_json(json!({ "name": "Renamed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hashed_id": "abc" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Format::Json);
    let result = client
        .put("medias/abc", &params(json!({ "name": "Renamed" })))
        .await
        .unwrap();

    assert_eq!(result["hashed_id"], "abc");
}

#[tokio::test]
async fn test_delete_uses_query_and_tolerates_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/medias/abc.json"))
        .and(query_param("force", "1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Format::Json);
    let result = client
        .delete("medias/abc", &params(json!({ "force": true })))
        .await
        .unwrap();

    assert_eq!(result, Value::Null);
}

#[tokio::test]
async fn test_malformed_json_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/medias.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let client = client_for(&server, Format::Json);
    let err = client.get("medias", &Params::new()).await.unwrap_err();

    assert!(matches!(err, ApiError::Json(_)));
    assert!(err.descriptor().is_none());
}

#[tokio::test]
async fn test_server_error_is_not_a_client_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/medias.json"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = client_for(&server, Format::Json);
    let err = client.get("medias", &Params::new()).await.unwrap_err();

    assert!(err.is_server_error());
    assert!(!err.is_client_error());
    match err {
        ApiError::Server { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_unreachable_host_is_a_transport_error() {
    init_tracing();
    let config = ClientConfig::new(SECRET)
        .with_base_url("http://127.0.0.1:1/v1/")
        .with_timeout(Duration::from_secs(2));
    let client = WistiaClient::with_config(config).unwrap();

    let err = client.get("medias", &Params::new()).await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.status(), None);
    assert_eq!(err.descriptor(), Some(ErrorDescriptor { status: 404 }));
}

#[tokio::test]
async fn test_truncated_client_error_body_keeps_status() {
    init_tracing();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    // Answers one request with a 403 whose body is shorter than advertised.
    let server = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        stream
            .write_all(b"HTTP/1.1 403 Forbidden\r\nContent-Length: 100\r\n\r\nshort")
            .unwrap();
        stream.flush().unwrap();
        let _ = stream.shutdown(Shutdown::Both);
    });

    let config = ClientConfig::new(SECRET)
        .with_base_url(format!("http://{addr}/v1/"))
        .with_timeout(Duration::from_secs(5));
    let client = WistiaClient::with_config(config).unwrap();

    let err = client.get("medias", &Params::new()).await.unwrap_err();
    server.join().unwrap();

    assert!(err.is_client_error());
    assert_eq!(err.status(), Some(403));
    assert_eq!(err.descriptor(), Some(ErrorDescriptor { status: 403 }));
}

#[tokio::test]
async fn test_xml_format_returns_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/medias.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<medias></medias>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Format::Xml);
    let result = client.get("medias", &Params::new()).await.unwrap();

    assert_eq!(result, Value::String("<medias></medias>".to_string()));
}

#[tokio::test]
async fn test_medias_index_matches_get() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/medias.json"))
        .and(query_param("type", "Video"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "id": 2, "type": "Video" }])),
        )
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server, Format::Json);
    let filters = params(json!({ "type": "Video" }));

    let via_accessor = client.medias().index(&filters).await.unwrap();
    let via_get = client.get("medias", &filters).await.unwrap();
    let via_typed = client
        .medias()
        .index_with(&MediaFilters::new().with_type("Video"))
        .await
        .unwrap();

    assert_eq!(via_accessor, via_get);
    assert_eq!(via_typed, via_get);
}

#[tokio::test]
async fn test_medias_index_passes_errors_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/medias.json"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = client_for(&server, Format::Json);
    let err = client.medias().index(&Params::new()).await.unwrap_err();

    assert_eq!(err.descriptor(), Some(ErrorDescriptor { status: 403 }));
}

#[tokio::test]
async fn test_medias_accessor_is_created_once() {
    let server = MockServer::start().await;
    let client = client_for(&server, Format::Json);

    assert!(!client.is_loaded(ResourceKind::Medias));
    let first = client.medias();
    let second = client.resource::<MediasApi>();

    assert!(client.is_loaded(ResourceKind::Medias));
    assert!(Arc::ptr_eq(&first, &second));
}
