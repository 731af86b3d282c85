use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use session_cell::{Credentials, Phase, SessionService, SessionState, SessionUser};
use shared_gateway::ApiGateway;
use shared_models::error::ApiError;
use shared_utils::test_utils::{MockBackendResponses, TestConfig};

fn service_for(server: &MockServer) -> (SessionService, Arc<SessionState>) {
    let config = TestConfig::for_backend(&server.uri()).to_app_config();
    let gateway = Arc::new(ApiGateway::new(&config).expect("client should build"));
    let state = Arc::new(SessionState::new());
    (SessionService::new(gateway, state.clone()), state)
}

#[tokio::test]
async fn test_login_establishes_the_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"userName": "lmendez", "password": "s3cret"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockBackendResponses::items(json!({
                    "id": 7,
                    "fullName": "Laura Méndez"
                })))
                .insert_header("set-cookie", "cm_session=tok-1; Path=/; HttpOnly"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let (service, state) = service_for(&mock_server);
    let user = service
        .login(&Credentials::new("lmendez", "s3cret"))
        .await
        .expect("login should succeed");

    assert_eq!(
        user,
        SessionUser {
            id: 7,
            full_name: "Laura Méndez".to_string()
        }
    );
    assert!(state.is_authenticated());
    assert_eq!(state.current_user(), Some(user));
}

#[tokio::test]
async fn test_rejected_login_surfaces_the_backend_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(MockBackendResponses::message("Credenciales inválidas")),
        )
        .mount(&mock_server)
        .await;

    let (service, state) = service_for(&mock_server);
    let result = service.login(&Credentials::new("lmendez", "wrong")).await;

    assert_matches!(result, Err(ApiError::Unauthorized(m)) if m == "Credenciales inválidas");
    assert_eq!(state.phase(), Phase::Anonymous);
}

#[tokio::test]
async fn test_probe_confirms_a_live_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&mock_server)
        .await;

    let (service, state) = service_for(&mock_server);
    assert!(service.probe().await);
    // A confirming probe never downgrades the phase on its own.
    assert_eq!(state.phase(), Phase::Unknown);
}

#[tokio::test]
async fn test_failed_probe_resolves_to_anonymous() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/verify"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(MockBackendResponses::message("Sesión expirada")),
        )
        .mount(&mock_server)
        .await;

    let (service, state) = service_for(&mock_server);
    assert!(!service.probe().await);
    assert_eq!(state.phase(), Phase::Anonymous);
}

#[tokio::test]
async fn test_probe_without_success_flag_is_anonymous() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let (service, state) = service_for(&mock_server);
    assert!(!service.probe().await);
    assert_eq!(state.phase(), Phase::Anonymous);
}

#[tokio::test]
async fn test_logout_clears_locally_even_when_the_backend_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let (service, state) = service_for(&mock_server);
    state.establish(SessionUser {
        id: 7,
        full_name: "Laura Méndez".to_string(),
    });

    let acknowledged = service.logout().await;

    assert!(!acknowledged);
    assert_eq!(state.phase(), Phase::Anonymous);
}

#[tokio::test]
async fn test_logout_notifies_the_backend() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (service, state) = service_for(&mock_server);
    state.establish(SessionUser {
        id: 7,
        full_name: "Laura Méndez".to_string(),
    });

    assert!(service.logout().await);
    assert_eq!(state.phase(), Phase::Anonymous);
}
