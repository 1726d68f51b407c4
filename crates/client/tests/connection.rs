//! Integration tests for the authenticated connection: bearer-header
//! injection, public-path bypass, the 401 refresh-and-retry path and its
//! fallbacks, driven against a `wiremock` mock server.

use serde_json::{json, Value};
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use investpro_client::{
    Client, ClientError, ConnectionConfig, ConnectionInfo, KycDocument, KycSubmission,
    MemoryTokenStorage, TokenScope, TokenStore, UnauthorizedEvent, REFRESH_ENDPOINT,
};
use investpro_primitives::user::User;
use investpro_primitives::ApiResponse;

fn ok_envelope(data: Value) -> Value {
    json!({ "success": true, "message": "", "data": data, "errors": null })
}

fn profile_data() -> Value {
    json!({ "id": 1, "email": "user@example.com", "username": "user" })
}

fn base_url(server: &MockServer) -> Url {
    Url::parse(&server.uri()).expect("mock server URI should parse")
}

async fn seed_customer_tokens(storage: &MemoryTokenStorage, access: &str, refresh: Option<&str>) {
    TokenStore::new(storage.clone())
        .set_tokens(access, refresh, TokenScope::Customer)
        .await
        .expect("seeding tokens should succeed");
}

#[tokio::test]
async fn private_path_carries_bearer_header() {
    let server = MockServer::start().await;
    let storage = MemoryTokenStorage::new();
    seed_customer_tokens(&storage, "tok", None).await;

    Mock::given(method("GET"))
        .and(path("/customer/profile/"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(profile_data())))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::customer(base_url(&server), storage);
    let profile = client.profile().await.expect("request should succeed");
    assert_eq!(profile.email, "user@example.com");
}

#[tokio::test]
async fn public_path_never_carries_auth_header() {
    let server = MockServer::start().await;
    let storage = MemoryTokenStorage::new();
    seed_customer_tokens(&storage, "tok", Some("ref")).await;

    Mock::given(method("POST"))
        .and(path("/customer/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "access": "a", "refresh": "r"
        }))))
        .mount(&server)
        .await;

    let client = Client::customer(base_url(&server), storage);
    client
        .login(investpro_primitives::auth::LoginRequest::new(
            "user@example.com",
            "pw",
        ))
        .await
        .expect("login should succeed");

    let requests = server.received_requests().await.expect("requests recorded");
    assert_eq!(requests.len(), 1, "exactly one request expected");
    assert!(
        !requests[0].headers.contains_key("authorization"),
        "public path must not carry an authorization header"
    );
}

#[tokio::test]
async fn missing_token_still_sends_the_request() {
    let server = MockServer::start().await;
    let storage = MemoryTokenStorage::new();

    Mock::given(method("GET"))
        .and(path("/customer/profile/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(profile_data())))
        .mount(&server)
        .await;

    let connection = ConnectionInfo::new(ConnectionConfig::customer(base_url(&server)), storage);
    let response: ApiResponse<User> = connection
        .get("customer/profile/")
        .await
        .expect("unauthenticated request should still be sent");
    assert!(response.success, "envelope should be successful");

    let requests = server.received_requests().await.expect("requests recorded");
    assert!(
        !requests[0].headers.contains_key("authorization"),
        "no token means no authorization header"
    );
}

#[tokio::test]
async fn refresh_and_retry_recovers_from_401() {
    let server = MockServer::start().await;
    let storage = MemoryTokenStorage::new();
    seed_customer_tokens(&storage, "stale", Some("r1")).await;

    Mock::given(method("GET"))
        .and(path("/customer/profile/"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Token expired" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/token/refresh/"))
        .and(body_json(json!({ "refresh": "r1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "fresh" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/customer/profile/"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(profile_data())))
        .expect(1)
        .mount(&server)
        .await;

    let config =
        ConnectionConfig::customer(base_url(&server)).with_refresh_endpoint(REFRESH_ENDPOINT);
    let connection = ConnectionInfo::new(config, storage);

    let response: ApiResponse<User> = connection
        .get("customer/profile/")
        .await
        .expect("retried request should succeed");
    assert!(response.success, "caller sees the retried outcome");

    // New access token stored; refresh token untouched.
    let tokens = connection.tokens();
    assert_eq!(
        tokens.access_token(TokenScope::Customer).await.unwrap(),
        Some("fresh".to_owned())
    );
    assert_eq!(
        tokens.refresh_token(TokenScope::Customer).await.unwrap(),
        Some("r1".to_owned())
    );

    // The refresh call itself is unauthenticated.
    let requests = server.received_requests().await.expect("requests recorded");
    let refresh_calls: Vec<_> = requests
        .iter()
        .filter(|request| request.url.path() == "/auth/token/refresh/")
        .collect();
    assert_eq!(refresh_calls.len(), 1, "exactly one refresh call expected");
    assert!(
        !refresh_calls[0].headers.contains_key("authorization"),
        "refresh call must not carry a bearer header"
    );
}

#[tokio::test]
async fn failed_refresh_clears_tokens_and_propagates_401() {
    let server = MockServer::start().await;
    let storage = MemoryTokenStorage::new();
    seed_customer_tokens(&storage, "stale", Some("r1")).await;

    Mock::given(method("GET"))
        .and(path("/customer/profile/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "nope" })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "nope" })))
        .expect(1)
        .mount(&server)
        .await;

    let config =
        ConnectionConfig::customer(base_url(&server)).with_refresh_endpoint(REFRESH_ENDPOINT);
    let connection = ConnectionInfo::new(config, storage);
    let mut events = connection.subscribe_unauthorized();

    let result: Result<ApiResponse<User>, ClientError> = connection.get("customer/profile/").await;
    assert!(
        matches!(
            result,
            Err(ClientError::Unauthorized {
                scope: TokenScope::Customer
            })
        ),
        "caller receives the original 401"
    );

    let tokens = connection.tokens();
    assert_eq!(tokens.access_token(TokenScope::Customer).await.unwrap(), None);
    assert_eq!(tokens.refresh_token(TokenScope::Customer).await.unwrap(), None);

    assert_eq!(
        events.try_recv().expect("an unauthorized event was emitted"),
        UnauthorizedEvent {
            scope: TokenScope::Customer
        }
    );
}

#[tokio::test]
async fn no_refresh_endpoint_means_no_refresh_call() {
    let server = MockServer::start().await;
    let storage = MemoryTokenStorage::new();
    seed_customer_tokens(&storage, "stale", Some("r1")).await;

    Mock::given(method("GET"))
        .and(path("/customer/profile/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "nope" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "fresh" })))
        .expect(0)
        .mount(&server)
        .await;

    let connection = ConnectionInfo::new(ConnectionConfig::customer(base_url(&server)), storage);

    let result: Result<ApiResponse<User>, ClientError> = connection.get("customer/profile/").await;
    assert!(matches!(result, Err(ClientError::Unauthorized { .. })), "401 propagates");

    let tokens = connection.tokens();
    assert_eq!(tokens.access_token(TokenScope::Customer).await.unwrap(), None);
}

#[tokio::test]
async fn a_retried_request_is_not_refreshed_twice() {
    let server = MockServer::start().await;
    let storage = MemoryTokenStorage::new();
    seed_customer_tokens(&storage, "stale", Some("r1")).await;

    // Every attempt is rejected, whatever token it carries.
    Mock::given(method("GET"))
        .and(path("/customer/profile/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "nope" })))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "fresh" })))
        .expect(1)
        .mount(&server)
        .await;

    let config =
        ConnectionConfig::customer(base_url(&server)).with_refresh_endpoint(REFRESH_ENDPOINT);
    let connection = ConnectionInfo::new(config, storage);

    let result: Result<ApiResponse<User>, ClientError> = connection.get("customer/profile/").await;
    assert!(
        matches!(result, Err(ClientError::Unauthorized { .. })),
        "second 401 ends the cycle"
    );

    let tokens = connection.tokens();
    assert_eq!(tokens.access_token(TokenScope::Customer).await.unwrap(), None);
    assert_eq!(tokens.refresh_token(TokenScope::Customer).await.unwrap(), None);
}

#[tokio::test]
async fn admin_401_leaves_customer_tokens_alone() {
    let server = MockServer::start().await;
    let storage = MemoryTokenStorage::new();

    let store = TokenStore::new(storage.clone());
    store
        .set_tokens("cust-access", Some("cust-refresh"), TokenScope::Customer)
        .await
        .unwrap();
    store
        .set_tokens("admin-access", Some("admin-refresh"), TokenScope::Admin)
        .await
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/admin/users/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "nope" })))
        .mount(&server)
        .await;

    let connection =
        ConnectionInfo::new(ConnectionConfig::admin(base_url(&server)), storage.clone());
    let mut events = connection.subscribe_unauthorized();

    let result: Result<ApiResponse<Value>, ClientError> = connection.get("admin/users/").await;
    assert!(matches!(
        result,
        Err(ClientError::Unauthorized {
            scope: TokenScope::Admin
        })
    ));
    assert_eq!(
        events.try_recv().unwrap(),
        UnauthorizedEvent {
            scope: TokenScope::Admin
        }
    );

    assert_eq!(store.access_token(TokenScope::Admin).await.unwrap(), None);
    assert_eq!(
        store.access_token(TokenScope::Customer).await.unwrap(),
        Some("cust-access".to_owned())
    );
    assert_eq!(
        store.refresh_token(TokenScope::Customer).await.unwrap(),
        Some("cust-refresh".to_owned())
    );
}

#[tokio::test]
async fn multipart_submissions_use_a_multipart_content_type() {
    let server = MockServer::start().await;
    let storage = MemoryTokenStorage::new();
    seed_customer_tokens(&storage, "tok", None).await;

    Mock::given(method("POST"))
        .and(path("/customer/kyc/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "id": 5,
            "user_id": 1,
            "status": "pending",
            "passport_image": "kyc/5.png",
            "submitted_at": "2024-06-01T00:00:00Z",
            "reviewed_at": null,
            "notes": null
        }))))
        .mount(&server)
        .await;

    let client = Client::customer(base_url(&server), storage);
    let record = client
        .submit_kyc(KycSubmission {
            passport_image: Some(KycDocument {
                file_name: "passport.png".to_owned(),
                content: vec![0x89, 0x50, 0x4e, 0x47],
            }),
            notes: Some("  first submission  ".to_owned()),
        })
        .await
        .expect("submission should succeed");
    assert_eq!(record.id, 5);

    let requests = server.received_requests().await.expect("requests recorded");
    let content_type = requests[0]
        .headers
        .get("content-type")
        .expect("content-type present")
        .to_str()
        .unwrap()
        .to_owned();
    assert!(
        content_type.starts_with("multipart/form-data"),
        "multipart body must keep its boundary content-type, got {content_type}"
    );
    assert_eq!(
        requests[0].headers.get("authorization").unwrap(),
        "Bearer tok",
        "KYC submission is an authenticated call"
    );
}

#[tokio::test]
async fn envelope_detail_takes_precedence_in_errors() {
    let server = MockServer::start().await;
    let storage = MemoryTokenStorage::new();
    seed_customer_tokens(&storage, "tok", None).await;

    Mock::given(method("GET"))
        .and(path("/customer/deposits/requests/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "outer message",
            "data": null,
            "errors": { "detail": "Insufficient permissions" }
        })))
        .mount(&server)
        .await;

    let client = Client::customer(base_url(&server), storage);
    let err = client
        .deposit_requests()
        .await
        .expect_err("rejected envelope should fail");
    assert_eq!(err.to_string(), "Insufficient permissions");
}

#[tokio::test]
async fn non_401_statuses_propagate_unchanged() {
    let server = MockServer::start().await;
    let storage = MemoryTokenStorage::new();
    seed_customer_tokens(&storage, "tok", Some("r1")).await;

    Mock::given(method("GET"))
        .and(path("/customer/profile/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let config =
        ConnectionConfig::customer(base_url(&server)).with_refresh_endpoint(REFRESH_ENDPOINT);
    let connection = ConnectionInfo::new(config, storage);

    let result: Result<ApiResponse<User>, ClientError> = connection.get("customer/profile/").await;
    match result {
        Err(ClientError::Http { status, body }) => {
            assert_eq!(status.as_u16(), 500, "status passes through");
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("expected an HTTP error, got {other:?}"),
    }

    // A 500 is not an auth failure: tokens stay put.
    let tokens = connection.tokens();
    assert_eq!(
        tokens.access_token(TokenScope::Customer).await.unwrap(),
        Some("tok".to_owned())
    );
}

#[tokio::test]
async fn a_401_on_a_public_path_still_logs_the_scope_out() {
    let server = MockServer::start().await;
    let storage = MemoryTokenStorage::new();
    seed_customer_tokens(&storage, "stale", None).await;

    Mock::given(method("POST"))
        .and(path("/customer/login/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "bad creds" })))
        .mount(&server)
        .await;

    let connection =
        ConnectionInfo::new(ConnectionConfig::customer(base_url(&server)), storage);
    let mut events = connection.subscribe_unauthorized();

    let result: Result<ApiResponse<Value>, ClientError> = connection
        .post("customer/login/", &json!({ "email": "e", "password": "p" }))
        .await;
    assert!(matches!(result, Err(ClientError::Unauthorized { .. })));
    assert!(events.try_recv().is_ok(), "event fires for public paths too");
    assert_eq!(
        connection
            .tokens()
            .access_token(TokenScope::Customer)
            .await
            .unwrap(),
        None
    );
}

#[tokio::test]
async fn concurrent_401s_each_refresh_independently() {
    let server = MockServer::start().await;
    let storage = MemoryTokenStorage::new();
    seed_customer_tokens(&storage, "stale", Some("r1")).await;

    for endpoint in ["/customer/deposits/requests/", "/customer/withdrawals/requests/"] {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .and(header("authorization", "Bearer stale"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "detail": "expired" })),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(endpoint))
            .and(header("authorization", "Bearer fresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
            .mount(&server)
            .await;
    }

    // No de-duplication of concurrent refreshes: depending on timing the
    // endpoint is hit once or twice, and both requests must still succeed.
    Mock::given(method("POST"))
        .and(path("/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "fresh" })))
        .expect(1..=2)
        .mount(&server)
        .await;

    let config =
        ConnectionConfig::customer(base_url(&server)).with_refresh_endpoint(REFRESH_ENDPOINT);
    let connection = ConnectionInfo::new(config, storage);

    let (deposits, withdrawals) = tokio::join!(
        connection.get::<ApiResponse<Value>>("customer/deposits/requests/"),
        connection.get::<ApiResponse<Value>>("customer/withdrawals/requests/"),
    );
    assert!(deposits.expect("deposits call succeeds").success);
    assert!(withdrawals.expect("withdrawals call succeeds").success);

    assert_eq!(
        connection
            .tokens()
            .access_token(TokenScope::Customer)
            .await
            .unwrap(),
        Some("fresh".to_owned())
    );
}
