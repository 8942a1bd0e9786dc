use meetup_archiver::components::api::{queries, GraphqlClient, QueryExecutor};
use meetup_archiver::config::Config;
use meetup_archiver::error::Error;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(endpoint: String) -> Config {
    Config {
        api_token: "test-token".to_string(),
        endpoint,
        page_size: 50,
        excluded_host: "Former member".to_string(),
        output_dir: ".".to_string(),
    }
}

#[tokio::test]
async fn successful_query_returns_the_data_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "self": { "id": "u1", "name": "Test User" } }
        })))
        .mount(&server)
        .await;

    let client = GraphqlClient::new(&test_config(server.uri())).unwrap();
    let data = client.execute(queries::SELF_QUERY, json!({})).await.unwrap();

    assert_eq!(data["self"]["id"], "u1");
}

#[tokio::test]
async fn auth_probe_succeeds_against_a_valid_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "self": { "id": "u1", "name": "Test User" } }
        })))
        .mount(&server)
        .await;

    let client = GraphqlClient::new(&test_config(server.uri())).unwrap();
    assert!(client.probe_auth().await.is_ok());
}

#[tokio::test]
async fn unauthorized_maps_to_authentication_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = GraphqlClient::new(&test_config(server.uri())).unwrap();
    let err = client
        .execute(queries::SELF_QUERY, json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::AuthenticationFailed));
}

#[tokio::test]
async fn throttling_error_maps_to_rate_limited_with_hint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{
                "message": "Too many requests",
                "extensions": { "code": "RATE_LIMITED", "resetAt": "2023-01-01T00:01:00Z" }
            }]
        })))
        .mount(&server)
        .await;

    let client = GraphqlClient::new(&test_config(server.uri())).unwrap();
    let err = client
        .execute(queries::SELF_QUERY, json!({}))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::RateLimited(Some(ref hint)) if hint == "2023-01-01T00:01:00Z"
    ));
}

#[tokio::test]
async fn application_error_maps_to_graphql_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "Field 'events' is unavailable" }]
        })))
        .mount(&server)
        .await;

    let client = GraphqlClient::new(&test_config(server.uri())).unwrap();
    let err = client
        .execute(queries::SELF_QUERY, json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::GraphQl(ref msg) if msg.contains("unavailable")));
}

#[tokio::test]
async fn server_failure_maps_to_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let client = GraphqlClient::new(&test_config(server.uri())).unwrap();
    let err = client
        .execute(queries::SELF_QUERY, json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
}
