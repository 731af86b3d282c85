use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Speciality {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub code: String,
    pub status: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpecialityRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub code: String,
    pub status: bool,
}

/// Partial update; only the provided fields travel to the backend.
#[derive(Debug, Clone, Serialize)]
pub struct SpecialityUpdateRequest {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttachDoctorsRequest {
    #[serde(rename = "specialityId")]
    pub speciality_id: i64,
    #[serde(rename = "doctorIds")]
    pub doctor_ids: Vec<i64>,
}
