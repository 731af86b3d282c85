use serde::{Deserialize, Serialize};

use shared_models::refs::DoctorRef;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Office {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub nit: String,
    pub brand: String,
    pub address: String,
    pub status: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct OfficeRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub nit: String,
    pub brand: String,
    pub address: String,
    pub status: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct OfficeUpdateRequest {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
}

/// A console operator account. Each one is tied to an office and the doctor
/// whose agenda it manages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub username: String,
    pub office: Office,
    pub doctor: DoctorRef,
    pub status: bool,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.lastname)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserRequest {
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(rename = "officeId")]
    pub office_id: i64,
    #[serde(rename = "doctorId")]
    pub doctor_id: i64,
    pub status: bool,
}

/// Partial update; an omitted field keeps its current value. The password in
/// particular only travels when the operator is actually changing it.
#[derive(Debug, Clone, Serialize)]
pub struct UserUpdateRequest {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "officeId", skip_serializing_if = "Option::is_none")]
    pub office_id: Option<i64>,
    #[serde(rename = "doctorId", skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
}
