//! HTTP-level tests for the reqwest API client and token refresher.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use inhouse_client::domain::ports::{
    ApiError, ApiRequest, MemoryTokenStore, Method, ResourcePath, TokenStore,
};
use inhouse_client::domain::{LoginCredentials, TokenPair};
use inhouse_client::outbound::http::ApiClient;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const OLD_ACCESS: &str = "access.token.one";
const NEW_ACCESS: &str = "access.token.two";
const REFRESH: &str = "refresh.token.one";

fn signed_in() -> Arc<MemoryTokenStore> {
    let pair = TokenPair::new(OLD_ACCESS, REFRESH).expect("valid pair");
    Arc::new(MemoryTokenStore::with_tokens(pair))
}

fn client_for(server: &MockServer, tokens: Arc<MemoryTokenStore>) -> ApiClient {
    let base = Url::parse(&format!("{}/", server.uri())).expect("valid base");
    let tokens: Arc<dyn TokenStore> = tokens;
    ApiClient::new(base, Duration::from_secs(5), tokens).expect("client builds")
}

async fn call(
    api: &ApiClient,
    verb: Method,
    segments: &[&str],
    body: Option<Value>,
) -> Result<Value, ApiError> {
    let resource = ResourcePath::new(segments.iter().copied());
    api.request(verb, &resource, body).await.unwrap_or_throw()
}

#[tokio::test]
async fn sends_bearer_token_and_camelises_the_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/7"))
        .and(header("authorization", format!("Bearer {OLD_ACCESS}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "valorant_accounts": ["Faker#KR1"],
            "ranking_ballots": [
                { "rated_by": 7, "user_id": 42, "ranking": "A", "ranking_type": "LEAGUE" }
            ],
        })))
        .expect(1)
        .mount(&server)
        .await;
    let api = client_for(&server, signed_in());

    let profile = call(&api, Method::Get, &["users", "7"], None)
        .await
        .expect("profile loads");
    assert_eq!(
        profile,
        json!({
            "id": 7,
            "valorantAccounts": ["Faker#KR1"],
            "rankingBallots": [
                { "rated_by": 7, "user_id": 42, "ranking": "A", "ranking_type": "LEAGUE" }
            ],
        })
    );
}

#[tokio::test]
async fn refreshes_once_after_401_and_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/7"))
        .and(header("authorization", format!("Bearer {OLD_ACCESS}").as_str()))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/token/refresh"))
        .and(body_json(json!({ "refresh": REFRESH })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": NEW_ACCESS })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/7"))
        .and(header("authorization", format!("Bearer {NEW_ACCESS}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 7 })))
        .expect(1)
        .mount(&server)
        .await;
    let tokens = signed_in();
    let api = client_for(&server, Arc::clone(&tokens));

    let profile = call(&api, Method::Get, &["users", "7"], None)
        .await
        .expect("retry succeeds");
    assert_eq!(profile, json!({ "id": 7 }));
    assert!(!api.login_required());

    let access = tokens.access_token().expect("read").expect("stored");
    let refresh = tokens.refresh_token().expect("read").expect("stored");
    assert_eq!(access.as_str(), NEW_ACCESS);
    assert_eq!(refresh.as_str(), REFRESH);
}

#[tokio::test]
async fn rejected_refresh_requires_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/7"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/token/refresh"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Token is blacklisted" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let api = client_for(&server, signed_in());

    let error = call(&api, Method::Get, &["users", "7"], None)
        .await
        .expect_err("login required");
    assert!(error.requires_login());
    assert!(api.login_required());
}

#[tokio::test]
async fn missing_refresh_token_requires_login_without_refreshing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/token/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let api = client_for(&server, Arc::new(MemoryTokenStore::default()));

    let error = call(&api, Method::Get, &["users"], None)
        .await
        .expect_err("login required");
    assert!(matches!(error, ApiError::LoginRequired { .. }));
    assert!(api.login_required());
}

#[tokio::test]
async fn second_401_after_refresh_requires_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/7"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/token/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": NEW_ACCESS,
            "refresh": "refresh.token.two",
        })))
        .expect(1)
        .mount(&server)
        .await;
    let tokens = signed_in();
    let api = client_for(&server, Arc::clone(&tokens));

    let error = call(&api, Method::Get, &["users", "7"], None)
        .await
        .expect_err("login required");
    assert!(error.requires_login());
    let refresh = tokens.refresh_token().expect("read").expect("stored");
    assert_eq!(refresh.as_str(), "refresh.token.two");
}

#[tokio::test]
async fn other_statuses_carry_the_body_preview() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summoners/register"))
        .and(body_json(json!({ "in_game_name": "Faker" })))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "Summoner not found" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let api = client_for(&server, signed_in());

    let error = call(
        &api,
        Method::Post,
        &["summoners", "register"],
        Some(json!({ "in_game_name": "Faker" })),
    )
    .await
    .expect_err("rejected");
    assert_eq!(error.status(), Some(400));
    assert!(error.to_string().contains("Summoner not found"));
    assert!(!api.login_required());
}

#[tokio::test]
async fn delete_resolves_each_segment_and_accepts_empty_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/valorant-accounts/Faker/KR1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let api = client_for(&server, signed_in());

    let body = call(&api, Method::Delete, &["valorant-accounts", "Faker", "KR1"], None)
        .await
        .expect("deleted");
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn ballot_echoes_keep_their_wire_keys() {
    let ballot = json!({ "user_id": 42, "rated_by": 7, "ranking": "A", "ranking_type": "LEAGUE" });
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/rankings/rank"))
        .and(body_json(ballot.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(ballot.clone()))
        .expect(1)
        .mount(&server)
        .await;
    let api = client_for(&server, signed_in());

    let echoed = call(&api, Method::Put, &["rankings", "rank"], Some(ballot.clone()))
        .await
        .expect("ballot saved");
    assert_eq!(echoed, ballot);
}

#[tokio::test]
async fn undecodable_bodies_are_decode_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;
    let api = client_for(&server, signed_in());

    let error = call(&api, Method::Get, &["users"], None)
        .await
        .expect_err("not JSON");
    assert!(matches!(error, ApiError::Decode { .. }));
}

#[tokio::test]
async fn unreachable_servers_are_transport_errors() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let address = listener.local_addr().expect("local address");
    drop(listener);
    let base = Url::parse(&format!("http://{address}/")).expect("valid base");
    let tokens: Arc<dyn TokenStore> = signed_in();
    let api = ApiClient::new(base, Duration::from_secs(5), tokens).expect("client builds");

    let error = call(&api, Method::Get, &["users"], None)
        .await
        .expect_err("connection refused");
    assert!(matches!(
        error,
        ApiError::Transport { .. } | ApiError::Timeout { .. }
    ));
}

#[tokio::test]
async fn login_stores_the_issued_pair() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_json(json!({ "username": "faker", "password": "t1-forever" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": NEW_ACCESS,
            "refresh": "refresh.token.two",
        })))
        .expect(1)
        .mount(&server)
        .await;
    let tokens = Arc::new(MemoryTokenStore::default());
    let api = client_for(&server, Arc::clone(&tokens));

    let credentials = LoginCredentials::try_from_parts("faker", "t1-forever").expect("valid");
    api.login(&credentials).await.expect("login succeeds");

    assert!(tokens.has_token_pair());
    let access = tokens.access_token().expect("read").expect("stored");
    assert_eq!(access.as_str(), NEW_ACCESS);

    api.logout().expect("logout");
    assert!(!tokens.has_token_pair());
    assert!(api.login_required());
}
