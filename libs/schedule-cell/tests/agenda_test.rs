use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use schedule_cell::{AgendaQuery, AgendaService, CalendarService, MonthGrid};
use shared_gateway::ApiGateway;
use shared_models::error::ApiError;
use shared_query::QueryCache;
use shared_utils::test_utils::{MockBackendResponses, TestConfig};

fn gateway_for(server: &MockServer) -> Arc<ApiGateway> {
    let config = TestConfig::for_backend(&server.uri()).to_app_config();
    Arc::new(ApiGateway::new(&config).expect("client should build"))
}

fn agenda_for(server: &MockServer) -> AgendaService {
    AgendaService::new(gateway_for(server), Arc::new(QueryCache::new()))
}

fn day_query(date: &str) -> AgendaQuery {
    AgendaQuery {
        date: date.parse().expect("test date should parse"),
        speciality_id: None,
        doctor_id: None,
        occupied: None,
        limit: 37,
        offset: 0,
    }
}

#[tokio::test]
async fn test_for_day_decodes_rows_and_reuses_the_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appointments/dates/2025-08-20/filters"))
        .and(query_param("limit", "37"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::items(
            json!([
                MockBackendResponses::appointment_row(9, "2025-08-20", "08:00", "08:30"),
                MockBackendResponses::occupied_appointment_row(10, "2025-08-20", "08:30", "09:00"),
            ]),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = agenda_for(&mock_server);
    let query = day_query("2025-08-20");
    let first = service.for_day(&query).await.expect("agenda should load");
    let second = service.for_day(&query).await.expect("cached agenda should load");

    assert_eq!(first.len(), 2);
    assert!(!first[0].is_occuped);
    assert_eq!(first[0].doctor.full_name(), "Elena Vargas");
    assert_eq!(first[0].duration.minutes(), Some(30));
    assert_eq!(first[0].date(), NaiveDate::from_ymd_opt(2025, 8, 20));
    assert!(first[1].is_occuped);
    assert_eq!(
        first[1].patient.as_ref().map(|patient| patient.full_name()),
        Some("Ana Ruiz".to_string())
    );
    assert_eq!(second, first);
}

#[tokio::test]
async fn test_for_day_forwards_the_active_filter_axes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appointments/dates/2025-08-20/filters"))
        .and(query_param("limit", "37"))
        .and(query_param("offset", "74"))
        .and(query_param("specialityId", "3"))
        .and(query_param("isOccuped", "false"))
        .and(query_param_is_missing("doctorId"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockBackendResponses::items(json!([]))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = agenda_for(&mock_server);
    let query = AgendaQuery {
        speciality_id: Some(3),
        occupied: Some(false),
        offset: 74,
        ..day_query("2025-08-20")
    };
    let rows = service.for_day(&query).await.expect("agenda should load");

    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_for_day_without_items_is_an_empty_sequence() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appointments/dates/2025-08-20/filters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let service = agenda_for(&mock_server);
    let rows = service
        .for_day(&day_query("2025-08-20"))
        .await
        .expect("agenda should load");

    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_each_page_caches_on_its_own_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appointments/dates/2025-08-20/filters"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::items(
            json!([MockBackendResponses::appointment_row(9, "2025-08-20", "08:00", "08:30")]),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/appointments/dates/2025-08-20/filters"))
        .and(query_param("offset", "37"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::items(
            json!([MockBackendResponses::appointment_row(46, "2025-08-20", "10:00", "10:30")]),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = agenda_for(&mock_server);
    let first_page = day_query("2025-08-20");
    let second_page = AgendaQuery {
        offset: 37,
        ..first_page.clone()
    };

    let first = service.for_day(&first_page).await.expect("page one should load");
    let second = service.for_day(&second_page).await.expect("page two should load");
    let first_again = service.for_day(&first_page).await.expect("page one should come from cache");

    assert_eq!(first[0].id, 9);
    assert_eq!(second[0].id, 46);
    assert_eq!(first_again, first);
}

#[tokio::test]
async fn test_by_id_with_zero_fails_without_a_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = agenda_for(&mock_server);
    let result = service.by_id(0).await;

    assert_matches!(result, Err(ApiError::InvalidRequest(m)) if m.contains("appointment id"));
}

#[tokio::test]
async fn test_by_id_always_revalidates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appointments/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::items(
            MockBackendResponses::appointment_row(9, "2025-08-20", "08:00", "08:30"),
        )))
        .expect(2)
        .mount(&mock_server)
        .await;

    let service = agenda_for(&mock_server);
    let first = service.by_id(9).await.expect("fetch should succeed");
    let second = service.by_id(9).await.expect("refetch should succeed");

    assert_eq!(first.id, 9);
    assert_eq!(second, first);
}

#[tokio::test]
async fn test_month_occupancy_caches_per_month() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appointments/occupation/month/2025/8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::items(
            json!([
                MockBackendResponses::day_row("2025-08-20", "disponible"),
                MockBackendResponses::day_row("2025-08-21", "ocupada"),
            ]),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/appointments/occupation/month/2025/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::items(
            json!([MockBackendResponses::day_row("2025-09-01", "sin_citas")]),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = CalendarService::new(gateway_for(&mock_server), Arc::new(QueryCache::new()));
    let august = MonthGrid {
        year: 2025,
        month: 8,
    };

    let days = service.month_occupancy(august).await.expect("month should load");
    let cached = service.month_occupancy(august).await.expect("month should come from cache");
    let september = service
        .month_occupancy(august.next())
        .await
        .expect("next month should load");

    assert_eq!(days.len(), 2);
    assert_eq!(days[1].status_day, "ocupada");
    assert_eq!(cached, days);
    assert_eq!(september.len(), 1);
}
