use serde::{Deserialize, Serialize};

use shared_models::refs::NamedRef;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub document: String,
    #[serde(rename = "documentType")]
    pub document_type: NamedRef,
    pub email: String,
}

impl Doctor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorRequest {
    pub name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub document: String,
    #[serde(rename = "documentTypeId")]
    pub document_type_id: i64,
    pub email: String,
    pub status: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorUpdateRequest {
    pub id: i64,
    pub name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub document: String,
    #[serde(rename = "documentTypeId")]
    pub document_type_id: i64,
    pub email: String,
    pub status: bool,
}
