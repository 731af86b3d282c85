use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use schedule_cell::ScheduleForm;
use shared_gateway::ApiGateway;
use shared_models::error::ApiError;
use shared_query::QueryCache;
use shared_utils::test_utils::{MockBackendResponses, TestConfig};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 20).expect("test date should exist")
}

fn form_for(server: &MockServer) -> ScheduleForm {
    let config = TestConfig::for_backend(&server.uri()).to_app_config();
    let gateway = Arc::new(ApiGateway::new(&config).expect("client should build"));
    ScheduleForm::new(gateway, Arc::new(QueryCache::new()), today())
}

fn fill(form: &mut ScheduleForm) {
    form.set_speciality(Some(3));
    form.set_doctor(Some(1));
    form.set_range(today(), Some(NaiveDate::from_ymd_opt(2025, 8, 22).unwrap()));
    form.set_start_hour("08:00");
    form.set_end_hour("12:00");
    form.set_duration(Some(2));
}

#[tokio::test]
async fn test_submit_posts_one_batch_and_resets_the_form() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/appointments"))
        .and(body_json(json!({
            "dates": ["2025-08-20", "2025-08-21", "2025-08-22"],
            "startHour": "08:00",
            "endHour": "12:00",
            "durationId": 2,
            "doctorId": 1,
            "specialityId": 3
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(MockBackendResponses::items(json!(true))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut form = form_for(&mock_server);
    fill(&mut form);

    let created = form.submit().await.expect("batch should be accepted");

    assert_eq!(created, 3);
    assert_eq!(form.speciality_id(), None);
    assert_eq!(form.doctor_id(), None);
    assert_eq!(form.duration_id(), None);
    assert_eq!(form.start_hour(), "");
    assert_eq!(form.end_hour(), "");
    assert_eq!(form.dates(), &[today()], "the range collapses back onto today");
    assert!(!form.is_submitting());
}

#[tokio::test]
async fn test_incomplete_form_never_reaches_the_backend() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(MockBackendResponses::items(json!(true))))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut form = form_for(&mock_server);
    fill(&mut form);
    form.set_duration(None);

    let result = form.submit().await;

    assert_matches!(
        result,
        Err(ApiError::InvalidRequest(m)) if m == "Por favor complete todos los campos requeridos"
    );
    assert_eq!(form.speciality_id(), Some(3), "a refused submit keeps the entries");
}

#[tokio::test]
async fn test_failed_submit_keeps_the_entries_for_a_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(400).set_body_json(MockBackendResponses::message(
            "Ya existen agendas para la fecha seleccionada",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut form = form_for(&mock_server);
    fill(&mut form);

    let result = form.submit().await;

    assert_matches!(
        result,
        Err(ApiError::Rejected(m)) if m == "Ya existen agendas para la fecha seleccionada"
    );
    assert_eq!(form.speciality_id(), Some(3));
    assert_eq!(form.dates().len(), 3);
    assert_eq!(form.start_hour(), "08:00");
    assert!(!form.is_submitting());
}

#[tokio::test]
async fn test_speciality_options_request_only_active_rows() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/specialities"))
        .and(query_param("status", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::items(
            json!([MockBackendResponses::speciality_row(3, "Cardiología", "CAR")]),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let form = form_for(&mock_server);
    let options = form.speciality_options().await.expect("options should load");

    assert_eq!(options.len(), 1);
    assert_eq!(options[0].name, "Cardiología");
}

#[tokio::test]
async fn test_duration_options_come_from_the_catalog() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/durations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::items(
            json!([
                MockBackendResponses::duration_row(1, "00:20:00"),
                MockBackendResponses::duration_row(2, "00:30:00"),
            ]),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let form = form_for(&mock_server);
    let durations = form.duration_options().await.expect("catalog should load");

    assert_eq!(durations.len(), 2);
    assert_eq!(durations[1].minutes(), Some(30));
    assert_eq!(durations[1].label(), "30 min");
}

#[tokio::test]
async fn test_doctor_options_cascade_from_the_chosen_speciality() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/DoctorsHasSpecialities/specialities/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::items(
            json!([MockBackendResponses::doctor_row(1, "Elena", "Vargas")]),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut form = form_for(&mock_server);
    assert!(form
        .doctor_options()
        .await
        .expect("no roster without a speciality")
        .is_empty());

    form.set_speciality(Some(3));
    let roster = form.doctor_options().await.expect("roster should load");

    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].full_name(), "Elena Vargas");
}
