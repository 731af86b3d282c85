use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use patient_cell::{PatientService, PatientUpdateRequest};
use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_gateway::ApiGateway;
use shared_models::error::ApiError;
use shared_models::params::ListParams;
use shared_query::QueryCache;
use shared_utils::test_utils::{MockBackendResponses, TestConfig};

fn service_for(server: &MockServer) -> PatientService {
    let config = TestConfig::for_backend(&server.uri()).to_app_config();
    let gateway = Arc::new(ApiGateway::new(&config).expect("client should build"));
    PatientService::new(gateway, Arc::new(QueryCache::new()))
}

#[tokio::test]
async fn test_search_results_are_capped_and_keyed_by_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/patients"))
        .and(query_param("limit", "10"))
        .and(query_param("search", "ana"))
        .and(query_param_is_missing("offset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::items(
            json!([MockBackendResponses::patient_row(40, "Ana", "Ruiz")]),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/patients"))
        .and(query_param("search", "jor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::items(
            json!([MockBackendResponses::patient_row(41, "Jorge", "Paz")]),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let ana_params = ListParams::limited(10).with_search("ana");

    let anas = service.list(&ana_params).await.expect("search should succeed");
    assert_eq!(anas[0].full_name(), "Ana Ruiz");

    let jors = service
        .list(&ListParams::all().with_search("jor"))
        .await
        .expect("second search should succeed");
    assert_eq!(jors[0].full_name(), "Jorge Paz");

    // Retyping the first query is answered from the cache.
    let anas_again = service.list(&ana_params).await.expect("cached search should succeed");
    assert_eq!(anas_again, anas);
}

#[tokio::test]
async fn test_rows_decode_the_patient_surname_spelling() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::items(
            json!([MockBackendResponses::patient_row(40, "Ana", "Ruiz")]),
        )))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let rows = service.list(&ListParams::all()).await.expect("list should succeed");

    assert_eq!(rows[0].lastname, "Ruiz");
    assert_eq!(rows[0].birthdate, NaiveDate::from_ymd_opt(1988, 4, 12).unwrap());
    assert_eq!(rows[0].gender.name, "Femenino");
}

#[tokio::test]
async fn test_by_id_with_zero_fails_without_a_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let result = service.by_id(0).await;

    assert_matches!(result, Err(ApiError::InvalidRequest(m)) if m.contains("patient id"));
}

#[tokio::test]
async fn test_update_puts_to_the_id_path_and_invalidates_search_keys() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::items(
            json!([MockBackendResponses::patient_row(40, "Ana", "Ruiz")]),
        )))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    service.list(&ListParams::all()).await.expect("list should succeed");

    Mock::given(method("PUT"))
        .and(path("/patients/40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::items(json!(true))))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::items(
            json!([MockBackendResponses::patient_row(40, "Ana María", "Ruiz")]),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    service
        .update(&PatientUpdateRequest {
            id: 40,
            name: "Ana María".to_string(),
            lastname: "Ruiz".to_string(),
            email: "ana.ruiz@mail.com".to_string(),
            phone: "3001234540".to_string(),
            birthdate: NaiveDate::from_ymd_opt(1988, 4, 12).unwrap(),
            document: "52000040".to_string(),
            document_type_id: 1,
            gender_id: 2,
        })
        .await
        .expect("update should succeed");

    let after = service.list(&ListParams::all()).await.expect("list should refetch");
    assert_eq!(after[0].name, "Ana María");
}
