//! Room Service Client Mock Tests
//!
//! Exercises RoomServiceClient against a wiremock HTTP server. Each test:
//! 1. Starts a mock HTTP server
//! 2. Configures the expected request/response
//! 3. Creates a RoomServiceClient pointing to the mock server
//! 4. Makes the API call
//! 5. Asserts on the normalized result and on what was actually sent

use castersphere_sdk::{
    Anonymous, AuthScheme, CasterSphereError, ClientConfig, MessageEnvelope, MessageMode,
    Principal, ResponseMode, RoomServiceClient, TransportError,
};
use serde_json::json;
use wiremock::{
    matchers::{body_json, header, header_exists, method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

const SECRET: &str = "test-shared-secret";
const APP_ID: &str = "app-123";
const ISSUER: &str = "https://app.example.com";

fn config_for(
    base_url: &str,
    scheme: AuthScheme,
    response_mode: ResponseMode,
    message_mode: MessageMode,
) -> ClientConfig {
    ClientConfig::builder()
        .with_base_url(base_url)
        .with_app_id(APP_ID)
        .with_shared_secret(SECRET)
        .with_app_issuer_url(ISSUER)
        .with_auth_scheme(scheme)
        .with_response_mode(response_mode)
        .with_message_mode(message_mode)
        .build()
        .unwrap()
}

fn client_for(server: &MockServer) -> RoomServiceClient {
    RoomServiceClient::new(
        config_for(
            &server.uri(),
            AuthScheme::Bearer,
            ResponseMode::Json,
            MessageMode::Plain,
        ),
        Principal::new("42", "ada@example.com"),
    )
}

fn authorization(request: &Request) -> String {
    request
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string()
}

// ============================================================================
// Operation Tests
// ============================================================================

#[tokio::test]
async fn test_list_rooms_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rooms"))
        .and(header("app-id", APP_ID))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "lobby", "members": 3},
            {"name": "dev", "members": 1}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.list_rooms().await.unwrap();

    assert_eq!(result.status, 200);
    let rooms = result.as_json().unwrap().as_array().unwrap();
    assert_eq!(rooms.len(), 2);
    assert_eq!(rooms[0]["name"], "lobby");
}

#[tokio::test]
async fn test_create_room_sends_room_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/create-room"))
        .and(header("app-id", APP_ID))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"room": "lobby"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"created": "lobby"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.create_room("lobby").await.unwrap();

    assert_eq!(result.status, 201);
    assert_eq!(result.as_json(), Some(&json!({"created": "lobby"})));
}

#[tokio::test]
async fn test_join_and_leave_room() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/join"))
        .and(body_json(json!({"room": "lobby"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"joined": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/leave"))
        .and(body_json(json!({"room": "lobby"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"left": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let joined = client.join_room("lobby").await.unwrap();
    assert_eq!(joined.as_json(), Some(&json!({"joined": true})));

    let left = client.leave_room("lobby").await.unwrap();
    assert_eq!(left.as_json(), Some(&json!({"left": true})));
}

#[tokio::test]
async fn test_send_message_plain_persisted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/message"))
        .and(body_json(json!({
            "room": "lobby",
            "hashed_msg": "hello",
            "persist": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.send_message("lobby", "hello", true).await.unwrap();

    assert_eq!(result.status, 200);
    assert_eq!(result.as_json(), Some(&json!({"ok": true})));
}

#[tokio::test]
async fn test_send_message_signed_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = RoomServiceClient::new(
        config_for(
            &mock_server.uri(),
            AuthScheme::Bearer,
            ResponseMode::Json,
            MessageMode::SignedEnvelope,
        ),
        Principal::new("42", "ada@example.com"),
    );
    let result = client.send_message("lobby", "hello", true).await.unwrap();
    assert_eq!(result.as_json(), Some(&json!({"ok": true})));

    let requests = mock_server.received_requests().await.unwrap();
    let sent: serde_json::Value = requests[0].body_json().unwrap();
    assert_eq!(sent["room"], "lobby");
    assert_eq!(sent["persist"], true);

    let hashed_msg = sent["hashed_msg"].as_str().unwrap();
    assert_ne!(hashed_msg, "hello");

    let envelope = client.issuer().verify_message(hashed_msg).unwrap();
    assert_eq!(
        envelope,
        MessageEnvelope {
            iss: ISSUER.to_string(),
            message: "hello".to_string(),
        }
    );
}

// ============================================================================
// Authentication Header Tests
// ============================================================================

#[tokio::test]
async fn test_bearer_token_carries_principal_claims() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rooms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client.list_rooms().await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let auth = authorization(&requests[0]);
    assert!(auth.starts_with("Bearer "));

    let token = AuthScheme::Bearer.extract_token(&auth).unwrap();
    let claims = client.issuer().verify(token).unwrap();
    assert_eq!(claims.platform, "web");
    assert_eq!(claims.iss, ISSUER);
    assert_eq!(claims.username.as_deref(), Some("ada@example.com"));
    assert_eq!(claims.sender_id.as_deref(), Some("42"));
}

#[tokio::test]
async fn test_basic_scheme_is_used_consistently() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let client = RoomServiceClient::new(
        config_for(
            &mock_server.uri(),
            AuthScheme::Basic,
            ResponseMode::Json,
            MessageMode::Plain,
        ),
        Anonymous,
    );

    client.list_rooms().await.unwrap();
    client.create_room("lobby").await.unwrap();
    client.join_room("lobby").await.unwrap();
    client.leave_room("lobby").await.unwrap();
    client.send_message("lobby", "hi", false).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 5);
    for request in &requests {
        let auth = authorization(request);
        assert!(auth.starts_with("Basic "), "unexpected header: {}", auth);

        let claims = client
            .issuer()
            .verify(AuthScheme::Basic.extract_token(&auth).unwrap())
            .unwrap();
        assert_eq!(claims.username, None);
        assert_eq!(claims.sender_id, None);
    }
}

// ============================================================================
// Response Normalization Tests
// ============================================================================

#[tokio::test]
async fn test_error_status_is_not_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/join"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"error": "room is private"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.join_room("secret-room").await.unwrap();

    assert_eq!(result.status, 403);
    assert!(!result.is_success());
    assert_eq!(result.as_json().unwrap()["error"], "room is private");
}

#[tokio::test]
async fn test_non_json_404_in_json_mode_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rooms"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let error = client.list_rooms().await.unwrap_err();

    match error {
        CasterSphereError::ResponseDecode { status, body, .. } => {
            assert_eq!(status, 404);
            assert_eq!(body, b"Not Found".to_vec());
        }
        other => panic!("expected ResponseDecode, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_404_in_passthrough_mode() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rooms"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = RoomServiceClient::new(
        config_for(
            &mock_server.uri(),
            AuthScheme::Bearer,
            ResponseMode::Passthrough,
            MessageMode::Plain,
        ),
        Anonymous,
    );
    let result = client.list_rooms().await.unwrap();

    assert_eq!(result.status, 404);
    assert_eq!(result.raw_bytes(), Some(&b"Not Found"[..]));
}

// ============================================================================
// Transport Failure Tests
// ============================================================================

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Grab a free port, then release it so nothing listens on it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = RoomServiceClient::new(
        config_for(&uri, AuthScheme::Bearer, ResponseMode::Json, MessageMode::Plain),
        Anonymous,
    );

    let list = client.list_rooms().await;
    assert!(matches!(
        list,
        Err(CasterSphereError::Transport(TransportError::Connect(_)))
    ));

    let send = client.send_message("lobby", "hello", false).await;
    assert!(matches!(send, Err(CasterSphereError::Transport(_))));
}
