use serde_json::{json, Value};

use shared_config::AppConfig;

pub struct TestConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub schedule_page_size: u32,
    pub patient_search_limit: u32,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:4000".to_string(),
            request_timeout_secs: 1,
            schedule_page_size: 37,
            patient_search_limit: 10,
        }
    }
}

impl TestConfig {
    /// Points the config at a mock backend, usually `MockServer::uri()`.
    pub fn for_backend(base_url: &str) -> Self {
        Self {
            api_base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            api_base_url: self.api_base_url.clone(),
            request_timeout_secs: self.request_timeout_secs,
            schedule_page_size: self.schedule_page_size,
            patient_search_limit: self.patient_search_limit,
        }
    }
}

/// Canned backend payloads in the exact shape the REST API emits.
pub struct MockBackendResponses;

impl MockBackendResponses {
    /// Wraps a payload in the `{"items": ...}` envelope every success
    /// response uses.
    pub fn items(payload: Value) -> Value {
        json!({ "items": payload })
    }

    /// The error body shape for business rejections.
    pub fn message(text: &str) -> Value {
        json!({ "Message": text })
    }

    pub fn speciality_row(id: i64, name: &str, code: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "description": format!("Consulta de {}", name.to_lowercase()),
            "code": code,
            "status": true
        })
    }

    pub fn doctor_row(id: i64, name: &str, last_name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "lastName": last_name,
            "document": format!("10{:06}", id),
            "documentType": { "id": 1, "name": "Cédula de ciudadanía", "code": "CC" },
            "email": format!(
                "{}.{}@confirmamed.co",
                name.to_lowercase(),
                last_name.to_lowercase()
            )
        })
    }

    pub fn patient_row(id: i64, name: &str, lastname: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "lastname": lastname,
            "email": format!("{}.{}@mail.com", name.to_lowercase(), lastname.to_lowercase()),
            "phone": format!("30012345{:02}", id % 100),
            "birthdate": "1988-04-12",
            "document": format!("52{:06}", id),
            "documentType": { "id": 1, "name": "Cédula de ciudadanía" },
            "gender": { "id": 2, "name": "Femenino" }
        })
    }

    pub fn user_row(id: i64, username: &str) -> Value {
        json!({
            "id": id,
            "name": "Laura",
            "lastname": "Méndez",
            "email": format!("{}@confirmamed.co", username),
            "username": username,
            "office": Self::office_row(1, "Sede Norte"),
            "doctor": Self::doctor_row(1, "Elena", "Vargas"),
            "status": true
        })
    }

    pub fn office_row(id: i64, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "description": "Sede principal",
            "nit": format!("900123{:03}-1", id),
            "brand": "ConfirmaMed",
            "address": "Cra 15 # 93-60",
            "status": true
        })
    }

    pub fn duration_row(id: i64, interval: &str) -> Value {
        json!({ "id": id, "interval": interval })
    }

    pub fn document_type_row(id: i64, name: &str, code: &str) -> Value {
        json!({ "id": id, "name": name, "code": code })
    }

    pub fn gender_row(id: i64, name: &str) -> Value {
        json!({ "id": id, "name": name })
    }

    /// A free slot on the schedule board.
    pub fn appointment_row(id: i64, date: &str, start: &str, end: &str) -> Value {
        json!({
            "id": id,
            "dateAppointment": date,
            "startHour": start,
            "endHour": end,
            "isOccuped": false,
            "isApproved": true,
            "duration": Self::duration_row(2, "00:30:00"),
            "speciality": { "id": 3, "name": "Cardiología" },
            "doctor": { "id": 1, "name": "Elena", "lastName": "Vargas" },
            "patient": null,
            "userId": 1
        })
    }

    /// A slot already taken by a patient.
    pub fn occupied_appointment_row(id: i64, date: &str, start: &str, end: &str) -> Value {
        let mut row = Self::appointment_row(id, date, start, end);
        row["isOccuped"] = json!(true);
        row["patient"] = json!({ "id": 40, "name": "Ana", "lastname": "Ruiz" });
        row
    }

    /// One day of the month occupancy feed, tinted the way the backend
    /// tints each status.
    pub fn day_row(date: &str, status: &str) -> Value {
        let color = match status {
            "ocupada" => "#FF4C4C",
            "sin_citas" => "#E0E0E0",
            _ => "#4CAF50",
        };
        json!({ "calendarDate": date, "statusDay": status, "color": color })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_points_at_backend() {
        let config = TestConfig::for_backend("http://127.0.0.1:9999").to_app_config();

        assert_eq!(config.api_base_url, "http://127.0.0.1:9999");
        assert_eq!(config.schedule_page_size, 37);
        assert_eq!(config.patient_search_limit, 10);
    }

    #[test]
    fn test_rows_carry_the_wire_field_names() {
        let doctor = MockBackendResponses::doctor_row(1, "Elena", "Vargas");
        assert_eq!(doctor["lastName"], "Vargas");

        let patient = MockBackendResponses::patient_row(2, "Ana", "Ruiz");
        assert_eq!(patient["lastname"], "Ruiz");

        let slot = MockBackendResponses::appointment_row(9, "2026-03-10", "08:00", "12:00");
        assert_eq!(slot["isOccuped"], false);
        assert_eq!(slot["dateAppointment"], "2026-03-10");

        let day = MockBackendResponses::day_row("2026-03-10", "disponible");
        assert_eq!(day["calendarDate"], "2026-03-10");
        assert_eq!(day["statusDay"], "disponible");
    }
}
