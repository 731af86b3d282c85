use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shared_models::refs::NamedRef;

/// Note the lowercase `lastname`: the backend spells patient surnames
/// differently from doctor surnames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub birthdate: NaiveDate,
    pub document: String,
    #[serde(rename = "documentType")]
    pub document_type: NamedRef,
    pub gender: NamedRef,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.lastname)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientRequest {
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub birthdate: NaiveDate,
    pub document: String,
    #[serde(rename = "documentTypeId")]
    pub document_type_id: i64,
    #[serde(rename = "genderId")]
    pub gender_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientUpdateRequest {
    pub id: i64,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub birthdate: NaiveDate,
    pub document: String,
    #[serde(rename = "documentTypeId")]
    pub document_type_id: i64,
    #[serde(rename = "genderId")]
    pub gender_id: i64,
}
